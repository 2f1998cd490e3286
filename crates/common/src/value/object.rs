// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use indexmap::IndexMap;
use serde::{Serialize, Serializer, de::DeserializeOwned, ser::SerializeMap};

use super::{OBJECT_TYPE_FIELD, Val};

/// A value produced by coercing a JSON object against a registered object type.
///
/// `object_type` is the concrete type selected for the value (the declared type, or the subtype
/// named by the payload's discriminant). Properties keep the order in which they were set.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectInstance {
    object_type: String,
    properties: IndexMap<String, Val>,
}

impl ObjectInstance {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn get(&self, name: &str) -> Option<&Val> {
        self.properties.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Val) {
        self.properties.insert(name.into(), value);
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Val)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The JSON form: the discriminant first, then each property.
    pub fn into_json(self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            OBJECT_TYPE_FIELD.to_string(),
            serde_json::Value::String(self.object_type),
        );
        for (k, v) in self.properties {
            map.insert(k, v.into());
        }
        serde_json::Value::Object(map)
    }

    /// Deserialize the instance into a handler's own record type.
    pub fn to_record<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.clone().into_json())
    }
}

impl Serialize for ObjectInstance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.properties.len() + 1))?;
        map.serialize_entry(OBJECT_TYPE_FIELD, &self.object_type)?;
        for (k, v) in &self.properties {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Media {
        object_type: String,
        name: String,
        duration: Option<i64>,
    }

    #[test]
    fn into_record() {
        let mut object = ObjectInstance::new("KalturaMedia");
        object.set("name", "clip".into());
        object.set("duration", 30.into());

        assert_eq!(
            object.to_record::<Media>().unwrap(),
            Media {
                object_type: "KalturaMedia".to_string(),
                name: "clip".to_string(),
                duration: Some(30),
            }
        );
    }

    #[test]
    fn serializes_discriminant_first() {
        let mut object = ObjectInstance::new("KalturaMedia");
        object.set("name", "clip".into());

        insta::assert_snapshot!(
            serde_json::to_string(&object).unwrap(),
            @r#"{"objectType":"KalturaMedia","name":"clip"}"#
        );
    }
}
