// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Value, json};

use common::context::Session;
use kapi_model::handler::{ApiException, FnHandler, HandlerError, HandlerRegistry};
use kapi_model_builder::{BuildOptions, build, declaration::DeclarationSource};
use kapi_resolver::{
    ActionDispatcher, DispatcherOptions,
    session::{SessionError, SessionParser},
};

fn param(name: &str, typ: &str, tags: Value) -> Value {
    json!({"name": name, "type": typ, "description": format!("The {name}"), "tags": tags})
}

fn action(name: &str, params: Vec<Value>, returns: Option<&str>) -> Value {
    let parameters = params
        .iter()
        .map(|param| param["name"].clone())
        .collect::<Vec<_>>();
    json!({
        "kind": "callable",
        "qualifiedName": format!("Controller.{name}"),
        "ownerQualifiedName": "Controller",
        "description": format!("Run {name}"),
        "tags": {"action": name},
        "params": params,
        "parameters": parameters,
        "returns": returns,
    })
}

fn objects() -> DeclarationSource {
    serde_json::from_value(json!({
        "name": "objects",
        "exports": ["KalturaTestEnum", "KalturaBaseEntry", "KalturaMediaEntry"],
        "records": [
            {
                "kind": "enum",
                "qualifiedName": "KalturaTestEnum",
                "extends": "KalturaStringEnum",
                "description": "Test enum",
                "values": {"VAL1": "abc", "VAL2": "def"},
            },
            {
                "kind": "type",
                "qualifiedName": "KalturaBaseEntry",
                "extends": "KalturaObject",
                "description": "Base entry",
                "tags": {"abstract": true},
            },
            {
                "kind": "property",
                "qualifiedName": "KalturaBaseEntry.Name",
                "ownerQualifiedName": "KalturaBaseEntry",
                "description": "Entry name",
                "tags": {"property": "name", "type": "string", "maxLength": 10},
            },
            {
                "kind": "type",
                "qualifiedName": "KalturaMediaEntry",
                "extends": "KalturaBaseEntry",
                "description": "Media entry",
            },
            {
                "kind": "property",
                "qualifiedName": "KalturaMediaEntry.Duration",
                "ownerQualifiedName": "KalturaMediaEntry",
                "description": "Duration in seconds",
                "tags": {"property": "duration", "type": "number", "default": 0},
            },
        ],
    }))
    .unwrap()
}

fn controller() -> DeclarationSource {
    serde_json::from_value(json!({
        "name": "controller",
        "records": [
            {
                "kind": "module",
                "qualifiedName": "Controller",
                "description": "Test service",
                "tags": {"service": "test"},
            },
            action("doNothing", vec![], None),
            action("echoString", vec![param("myArg", "string", json!({}))], Some("string")),
            action(
                "bounded",
                vec![param("val", "number", json!({"minValue": 3, "maxValue": 5}))],
                Some("number"),
            ),
            action("addEntry", vec![param("entry", "KalturaBaseEntry", json!({}))], Some("KalturaBaseEntry")),
            action("enumArg", vec![param("val", "KalturaTestEnum", json!({}))], Some("string")),
            action(
                "flags",
                vec![
                    param("first", "boolean", json!({})),
                    param("second", "boolean", json!({"optional": true})),
                ],
                Some("string"),
            ),
            action("whoAmI", vec![], Some("number")),
            action("fail", vec![param("how", "string", json!({}))], Some("string")),
            action("unbound", vec![], None),
        ],
    }))
    .unwrap()
}

fn handlers() -> HandlerRegistry {
    HandlerRegistry::new()
        .with(
            "Controller.doNothing",
            FnHandler::new(&[], |_, _| async { Ok::<_, HandlerError>(Some(json!("ignored"))) }),
        )
        .with(
            "Controller.echoString",
            FnHandler::new(&["myArg"], |_, args| async move {
                Ok::<_, HandlerError>(Some(Value::from(args[0].clone())))
            }),
        )
        .with(
            "Controller.bounded",
            FnHandler::new(&["val"], |_, args| async move {
                tokio::task::yield_now().await;
                Ok::<_, HandlerError>(Some(Value::from(args[0].clone())))
            }),
        )
        .with(
            "Controller.addEntry",
            FnHandler::new(&["entry"], |_, args| async move {
                Ok::<_, HandlerError>(Some(Value::from(args[0].clone())))
            }),
        )
        .with(
            "Controller.enumArg",
            FnHandler::new(&["val"], |_, args| async move {
                Ok::<_, HandlerError>(Some(Value::from(args[0].clone())))
            }),
        )
        .with(
            "Controller.flags",
            FnHandler::new(&["first", "second"], |_, args| async move {
                Ok::<_, HandlerError>(Some(json!(format!("{} {}", args[0], args[1]))))
            }),
        )
        .with(
            "Controller.whoAmI",
            FnHandler::new(&[], |context, _| async move {
                Ok::<_, HandlerError>(Some(json!(context.partner_id())))
            }),
        )
        .with(
            "Controller.fail",
            FnHandler::new(&["how"], |_, args| async move {
                match args[0].as_str() {
                    Some("api") => Err::<Option<Value>, HandlerError>(ApiException::new(
                        "ENTRY_ID_NOT_FOUND",
                        "Entry id [0_abc] not found",
                    )
                    .with_arg("entryId", "0_abc")
                    .into()),
                    Some("panic") => panic!("handler exploded"),
                    _ => Err(HandlerError::Internal(anyhow!("database unavailable"))),
                }
            }),
        )
}

struct TestSessionParser;

#[async_trait]
impl SessionParser for TestSessionParser {
    async fn parse(&self, token: &str) -> Result<Session, SessionError> {
        match token {
            "valid" => Ok(Session {
                partner_id: 102,
                expiry: Some(i64::MAX),
                ..Default::default()
            }),
            "expired" => Ok(Session {
                partner_id: 102,
                expiry: Some(1),
                ..Default::default()
            }),
            "unknown-partner" => Err(SessionError::PartnerUnknown),
            _ => Err(SessionError::InvalidFormat),
        }
    }
}

fn dispatcher_with(options: DispatcherOptions) -> ActionDispatcher {
    let system = build(
        vec![objects(), controller()],
        &handlers(),
        BuildOptions::default(),
    )
    .unwrap();

    ActionDispatcher::new(Arc::new(system), options)
        .with_session_parser(Arc::new(TestSessionParser))
}

fn dispatcher() -> ActionDispatcher {
    dispatcher_with(DispatcherOptions::default())
}

#[test_log::test(tokio::test)]
async fn no_arguments_no_result() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.resolve("test", "doNothing", &json!({})).await.unwrap(),
        None
    );
    assert_eq!(
        dispatcher.call("test", "doNothing", &json!({})).await,
        Value::Null
    );
}

#[test_log::test(tokio::test)]
async fn required_arguments() {
    let dispatcher = dispatcher();

    insta::assert_snapshot!(
        dispatcher.call("test", "echoString", &json!({})).await,
        @r#"{"error":{"code":"ARGUMENT_CANNOT_BE_EMPTY","message":"Argument [myArg] cannot be empty","args":{"argument":"myArg"}}}"#
    );
    assert_eq!(
        dispatcher
            .call("test", "echoString", &json!({"myArg": null}))
            .await["error"]["code"],
        "ARGUMENT_CANNOT_BE_EMPTY"
    );
    assert_eq!(
        dispatcher
            .call("test", "echoString", &json!({"myArg": 12}))
            .await,
        json!("12")
    );
}

#[test_log::test(tokio::test)]
async fn value_bounds() {
    let dispatcher = dispatcher();

    for (val, expected) in [(json!(3), json!(3)), (json!("5"), json!(5)), (json!(4.8), json!(4))] {
        assert_eq!(
            dispatcher.call("test", "bounded", &json!({ "val": val })).await,
            expected
        );
    }

    let below = dispatcher.call("test", "bounded", &json!({"val": 2})).await;
    assert_eq!(below["error"]["code"], "ARGUMENT_MIN_VALUE_CROSSED");
    assert_eq!(below["error"]["message"], "Argument [val] minimum value is [3]");

    let above = dispatcher.call("test", "bounded", &json!({"val": 6})).await;
    assert_eq!(above["error"]["message"], "Argument [val] maximum value is [5]");

    let text = dispatcher.call("test", "bounded", &json!({"val": "three"})).await;
    assert_eq!(text["error"]["code"], "ARGUMENT_MUST_BE_NUMERIC");
}

#[test_log::test(tokio::test)]
async fn abstract_arguments_need_a_subtype() {
    let dispatcher = dispatcher();

    insta::assert_snapshot!(
        dispatcher
            .call("test", "addEntry", &json!({"entry": {"name": "clip"}}))
            .await,
        @r#"{"error":{"code":"ABSTRACT_PARAMETER","message":"Abstract parameter type [KalturaBaseEntry]","args":{"objectType":"KalturaBaseEntry"}}}"#
    );
}

#[test_log::test(tokio::test)]
async fn discriminated_objects() {
    let dispatcher = dispatcher();

    let entry = dispatcher
        .call(
            "test",
            "addEntry",
            &json!({"entry": {"objectType": "KalturaMediaEntry", "name": "clip", "extra": true}}),
        )
        .await;
    assert_eq!(
        entry,
        json!({"objectType": "KalturaMediaEntry", "duration": 0, "name": "clip"})
    );

    // The result can be sent straight back
    let again = dispatcher
        .call("test", "addEntry", &json!({ "entry": entry }))
        .await;
    assert_eq!(again, entry);

    let unsupported = dispatcher
        .call("test", "addEntry", &json!({"entry": {"objectType": "KalturaOther"}}))
        .await;
    assert_eq!(unsupported["error"]["code"], "OBJECT_TYPE_NOT_SUPPORTED");

    let too_long = dispatcher
        .call(
            "test",
            "addEntry",
            &json!({"entry": {"objectType": "KalturaMediaEntry", "name": "a very long name"}}),
        )
        .await;
    assert_eq!(
        too_long["error"]["message"],
        "Argument [name] maximum length is [10]"
    );

    let scalar = dispatcher
        .call("test", "addEntry", &json!({"entry": "clip"}))
        .await;
    assert_eq!(scalar["error"]["code"], "ARGUMENT_MUST_BE_OBJECT");
}

#[test_log::test(tokio::test)]
async fn enum_literals() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.call("test", "enumArg", &json!({"val": "abc"})).await,
        json!("abc")
    );

    insta::assert_snapshot!(
        dispatcher.call("test", "enumArg", &json!({"val": "xyz"})).await,
        @r#"{"error":{"code":"ARGUMENT_INVALID_ENUM_VALUE","message":"Argument [val] values must be of type [KalturaTestEnum]","args":{"argument":"val","enumType":"KalturaTestEnum"}}}"#
    );
}

#[test_log::test(tokio::test)]
async fn optional_arguments_are_null() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.call("test", "flags", &json!({"first": "1"})).await,
        json!("true null")
    );
    assert_eq!(
        dispatcher
            .call("test", "flags", &json!({"first": 0, "second": "true"}))
            .await,
        json!("false true")
    );
    assert_eq!(
        dispatcher
            .call("test", "flags", &json!({"first": "yes"}))
            .await["error"]["code"],
        "ARGUMENT_MUST_BE_BOOLEAN"
    );
}

#[test_log::test(tokio::test)]
async fn routing_errors() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.resolve("", "doNothing", &json!({})).await.unwrap_err().code(),
        "SERVICE_NOT_SPECIFIED"
    );
    assert_eq!(
        dispatcher.resolve("test", "", &json!({})).await.unwrap_err().code(),
        "ACTION_NOT_SPECIFIED"
    );

    insta::assert_snapshot!(
        dispatcher.call("media", "list", &json!({})).await,
        @r#"{"error":{"code":"SERVICE_DOES_NOT_EXISTS","message":"Service [media] does not exist","args":{"service":"media"}}}"#
    );
    insta::assert_snapshot!(
        dispatcher.call("test", "list", &json!({})).await,
        @r#"{"error":{"code":"ACTION_DOES_NOT_EXISTS","message":"Action [list] does not exist for service [test]","args":{"service":"test","action":"list"}}}"#
    );
}

#[test_log::test(tokio::test)]
async fn non_object_payloads_carry_no_arguments() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.call("test", "doNothing", &json!([1, 2])).await,
        Value::Null
    );
    assert_eq!(
        dispatcher.call("test", "echoString", &json!("x")).await["error"]["code"],
        "ARGUMENT_CANNOT_BE_EMPTY"
    );
}

#[test_log::test(tokio::test)]
async fn sessions() {
    let dispatcher = dispatcher();

    assert_eq!(
        dispatcher.call("test", "whoAmI", &json!({})).await,
        Value::Null
    );
    assert_eq!(
        dispatcher.call("test", "whoAmI", &json!({"ks": "valid"})).await,
        json!(102)
    );

    for (token, code) in [
        ("expired", "KS_EXPIRED"),
        ("garbage", "INVALID_KS_FORMAT"),
        ("unknown-partner", "PARTNER_INVALID"),
    ] {
        assert_eq!(
            dispatcher.call("test", "whoAmI", &json!({ "ks": token })).await["error"]["code"],
            code
        );
    }
}

#[test_log::test(tokio::test)]
async fn expiry_enforcement_can_be_disabled() {
    let dispatcher = dispatcher_with(DispatcherOptions {
        session_field: "token".to_string(),
        enforce_session_expiry: false,
    });

    assert_eq!(
        dispatcher.call("test", "whoAmI", &json!({"token": "expired"})).await,
        json!(102)
    );
    assert_eq!(
        dispatcher.call("test", "whoAmI", &json!({"ks": "expired"})).await,
        Value::Null
    );
}

#[test_log::test(tokio::test)]
async fn handler_failures() {
    let dispatcher = dispatcher();

    insta::assert_snapshot!(
        dispatcher.call("test", "fail", &json!({"how": "api"})).await,
        @r#"{"error":{"code":"ENTRY_ID_NOT_FOUND","message":"Entry id [0_abc] not found","args":{"entryId":"0_abc"}}}"#
    );

    let internal = r#"{"error":{"code":"INTERNAL_SERVER_ERROR","message":"Internal server error occurred"}}"#;
    for how in ["internal", "panic"] {
        assert_eq!(
            dispatcher
                .call("test", "fail", &json!({ "how": how }))
                .await
                .to_string(),
            internal
        );
    }
    assert_eq!(
        dispatcher.call("test", "unbound", &json!({})).await.to_string(),
        internal
    );
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn concurrent_requests() {
    let dispatcher = Arc::new(dispatcher());

    let calls = (0..32).map(|i| {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let val = 3 + i % 3;
            let result = dispatcher
                .call("test", "bounded", &json!({ "val": val.to_string() }))
                .await;
            (val, result)
        })
    });

    for call in futures::future::join_all(calls).await {
        let (val, result) = call.unwrap();
        assert_eq!(result, json!(val));
    }
}
