// Copyright (c) 2018 Chef Software Inc. and/or applicable contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{collections::{BTreeMap,
                        HashMap},
          iter::FromIterator,
          result};

use serde::de::{self,
                Deserialize,
                Deserializer};
use serde_json::{self,
                 Value};

pub const ID: &str = "id";
pub const USERNAME: &str = "username";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const PHOTO_URL: &str = "photo_url";
pub const AUTH_DATE: &str = "auth_date";
pub const HASH: &str = "hash";

/// The fields posted back by the login widget, exactly as submitted.
///
/// Keys are kept sorted only so that `Debug` and serialized output are stable;
/// the signature does not depend on map order (see `canonical`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClaimedFields(BTreeMap<String, String>);

impl ClaimedFields {
    pub fn new() -> Self { ClaimedFields::default() }

    /// Parses the JSON object the widget callback posts. Numbers and booleans
    /// keep their textual form, `null` counts as absent.
    pub fn from_json(body: &str) -> serde_json::Result<Self> { serde_json::from_str(body) }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
        where K: Into<String>,
              V: Into<String>
    {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    pub fn contains(&self, key: &str) -> bool { self.0.contains_key(key) }

    pub fn remove(&mut self, key: &str) -> Option<String> { self.0.remove(key) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Copy of these fields with the given keys dropped.
    pub fn without(&self, keys: &[&str]) -> ClaimedFields {
        self.iter()
            .filter(|(k, _)| !keys.contains(k))
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> { self.0 }
}

impl<K, V> FromIterator<(K, V)> for ClaimedFields
    where K: Into<String>,
          V: Into<String>
{
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = (K, V)>
    {
        ClaimedFields(iter.into_iter()
                          .map(|(k, v)| (k.into(), v.into()))
                          .collect())
    }
}

impl From<HashMap<String, String>> for ClaimedFields {
    fn from(map: HashMap<String, String>) -> Self { map.into_iter().collect() }
}

impl From<BTreeMap<String, String>> for ClaimedFields {
    fn from(map: BTreeMap<String, String>) -> Self { ClaimedFields(map) }
}

impl<'de> Deserialize<'de> for ClaimedFields {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut fields = BTreeMap::new();

        for (key, value) in raw {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(de::Error::custom(format!("field `{}` must be a scalar value",
                                                         key)));
                }
            };
            fields.insert(key, rendered);
        }

        Ok(ClaimedFields(fields))
    }
}
