// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::{Value, json};

use kapi_model::{handler::HandlerRegistry, system::ApiSystem};
use kapi_model_builder::{BuildOptions, build, declaration::DeclarationSource};

fn property(owner: &str, accessor: &str, tags: Value) -> Value {
    json!({
        "kind": "property",
        "qualifiedName": format!("{owner}.{accessor}"),
        "ownerQualifiedName": owner,
        "description": format!("The {accessor}"),
        "tags": tags,
    })
}

fn object(name: &str, extends: &str, tags: Value) -> Value {
    json!({
        "kind": "type",
        "qualifiedName": name,
        "extends": extends,
        "description": format!("{name} type"),
        "tags": tags,
    })
}

/// A small entry hierarchy:
/// `KalturaBaseEntry` (abstract) <- `KalturaPlayableEntry` <- `KalturaMediaEntry`, and
/// `KalturaBaseEntry` <- `KalturaPlaylist`.
pub(crate) fn entry_system() -> ApiSystem {
    let objects: DeclarationSource = serde_json::from_value(json!({
        "name": "objects",
        "exports": [
            "KalturaEntryStatus", "KalturaMediaType", "KalturaBaseEntry",
            "KalturaPlayableEntry", "KalturaMediaEntry", "KalturaPlaylist",
        ],
        "records": [
            {
                "kind": "enum",
                "qualifiedName": "KalturaEntryStatus",
                "extends": "KalturaNumericEnum",
                "description": "Entry status",
                "values": {"READY": 2, "DELETED": 3},
            },
            {
                "kind": "enum",
                "qualifiedName": "KalturaMediaType",
                "extends": "KalturaStringEnum",
                "description": "Media type",
                "values": {"VAL1": "abc", "VAL2": "def"},
            },
            object("KalturaBaseEntry", "KalturaObject", json!({"abstract": true})),
            property("KalturaBaseEntry", "Id", json!({"property": "id", "type": "string", "default": ""})),
            property("KalturaBaseEntry", "Name", json!({"property": "name", "type": "string"})),
            property("KalturaBaseEntry", "Status", json!({"property": "status", "type": "KalturaEntryStatus", "default": "READY"})),
            object("KalturaPlayableEntry", "KalturaBaseEntry", json!({})),
            property("KalturaPlayableEntry", "Duration", json!({"property": "duration", "type": "number", "minValue": 0})),
            object("KalturaMediaEntry", "KalturaPlayableEntry", json!({})),
            property("KalturaMediaEntry", "MediaType", json!({"property": "mediaType", "type": "KalturaMediaType"})),
            property("KalturaMediaEntry", "Tags", json!({"property": "tags", "type": "string[]"})),
            object("KalturaPlaylist", "KalturaBaseEntry", json!({})),
            property("KalturaPlaylist", "Entries", json!({"property": "entries", "type": "array<KalturaBaseEntry>"})),
        ],
    }))
    .unwrap();

    let controller: DeclarationSource = serde_json::from_value(json!({
        "name": "controller",
        "records": [
            {
                "kind": "module",
                "qualifiedName": "Controller",
                "description": "Entries",
                "tags": {"service": "entry"},
            },
            {
                "kind": "callable",
                "qualifiedName": "Controller.list",
                "ownerQualifiedName": "Controller",
                "description": "List entries",
                "tags": {"action": "list"},
                "params": [],
                "parameters": [],
            },
        ],
    }))
    .unwrap();

    build(
        vec![objects, controller],
        &HandlerRegistry::new(),
        BuildOptions::default(),
    )
    .unwrap()
}
