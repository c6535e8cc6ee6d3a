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

use chrono::{DateTime,
             Utc};

use crate::{config::TelegramCfg,
            error::Result,
            fields::ClaimedFields};

/// A user whose login data passed verification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginUser {
    pub id:           String,
    pub nickname:     Option<String>,
    pub display_name: String,
    pub avatar_url:   Option<String>,
    /// Every verified field except `auth_date` and `hash`.
    pub raw:          ClaimedFields,
}

/// A login method driven entirely by a client-side widget: the browser
/// collects signed claims and the server only has to check them.
pub trait LoginProvider: Sync + Send {
    fn name(&self) -> &'static str;

    fn verify_at(&self,
                 config: &TelegramCfg,
                 fields: &ClaimedFields,
                 now: DateTime<Utc>)
                 -> Result<LoginUser>;

    fn verify(&self, config: &TelegramCfg, fields: &ClaimedFields) -> Result<LoginUser> {
        self.verify_at(config, fields, Utc::now())
    }

    /// Markup that embeds the login widget into a page.
    fn render_widget(&self, config: &TelegramCfg) -> String;
}
