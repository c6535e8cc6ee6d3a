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

use crate::fields::{ClaimedFields,
                    HASH};

/// Builds the "data-check-string" that Telegram signs: every field except
/// `hash` rendered as `key=value`, sorted bytewise on the whole line and joined
/// with `\n`.
///
/// Sorting happens on the rendered line, not the key, so `a0=..` sorts before
/// `a=..`.
pub fn data_check_string(fields: &ClaimedFields) -> String {
    let mut lines = fields.iter()
                          .filter(|(key, _)| *key != HASH)
                          .map(|(key, value)| format!("{}={}", key, value))
                          .collect::<Vec<_>>();
    lines.sort();
    lines.join("\n")
}
