// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

use super::ObjectInstance;

/// Represent a value that can be used in:
/// - coerced action arguments
/// - object properties
/// - property defaults
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Val {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Val>),
    /// An instance of a registered object type
    Object(ObjectInstance),
    /// A map with no associated type (for example, a handler-provided JSON object)
    Map(IndexMap<String, Val>),
}

pub const TRUE: Val = Val::Bool(true);
pub const FALSE: Val = Val::Bool(false);

impl Val {
    pub fn get(&self, key: &str) -> Option<&Val> {
        match self {
            Val::Object(o) => o.get(key),
            Val::Map(m) => m.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Val::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Val::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Val::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectInstance> {
        match self {
            Val::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Val]> {
        match self {
            Val::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<i64> for Val {
    fn from(value: i64) -> Self {
        Val::Number(value.into())
    }
}

impl From<bool> for Val {
    fn from(value: bool) -> Self {
        Val::Bool(value)
    }
}

impl From<String> for Val {
    fn from(value: String) -> Self {
        Val::String(value)
    }
}

impl From<&str> for Val {
    fn from(value: &str) -> Self {
        Val::String(value.to_string())
    }
}

impl From<ObjectInstance> for Val {
    fn from(value: ObjectInstance) -> Self {
        Val::Object(value)
    }
}

impl Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::Null => write!(f, "null"),
            Val::Bool(b) => write!(f, "{b}"),
            Val::Number(n) => write!(f, "{n}"),
            Val::String(s) => write!(f, "\"{s}\""),
            Val::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Val::Object(o) => {
                write!(f, "{}{{", o.object_type())?;
                for (i, (k, v)) in o.properties().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Val::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<Val> for serde_json::Value {
    fn from(value: Val) -> Self {
        match value {
            Val::Null => serde_json::Value::Null,
            Val::Bool(b) => serde_json::Value::Bool(b),
            Val::Number(n) => serde_json::Value::Number(n),
            Val::String(s) => serde_json::Value::String(s),
            Val::List(l) => serde_json::Value::Array(l.into_iter().map(|v| v.into()).collect()),
            Val::Object(o) => o.into_json(),
            Val::Map(m) => {
                serde_json::Value::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Val {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Val::Null,
            serde_json::Value::Bool(b) => Val::Bool(b),
            serde_json::Value::Number(n) => Val::Number(n),
            serde_json::Value::String(s) => Val::String(s),
            serde_json::Value::Array(l) => Val::List(l.into_iter().map(|v| v.into()).collect()),
            serde_json::Value::Object(o) => {
                Val::Map(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn display() {
        let mut object = ObjectInstance::new("KalturaTest");
        object.set("name", "abc".into());
        object.set("tags", Val::List(vec![1.into(), 2.into()]));

        assert_eq!(object.clone().into_json()["objectType"], json!("KalturaTest"));
        assert_eq!(
            Val::Object(object).to_string(),
            r#"KalturaTest{name: "abc", tags: [1, 2]}"#
        );
    }

    #[test]
    fn json_objects_become_untyped_maps() {
        let val = Val::from(json!({"a": [true, null], "b": 1.5}));

        assert!(matches!(val, Val::Map(_)));
        assert_eq!(val.get("a"), Some(&Val::List(vec![TRUE, Val::Null])));
        assert_eq!(serde_json::Value::from(val), json!({"a": [true, null], "b": 1.5}));
    }
}
