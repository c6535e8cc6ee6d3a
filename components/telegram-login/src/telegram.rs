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

use std::convert::TryFrom;

use chrono::{DateTime,
             Utc};

use crate::{canonical::data_check_string,
            config::TelegramCfg,
            error::{Error,
                    FieldFault,
                    InvalidField,
                    Result},
            fields::*,
            signature,
            types::*,
            widget};

pub struct Telegram;

const HASH_LEN: usize = 64;

fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn check_id(fields: &ClaimedFields) -> Option<FieldFault> {
    match fields.get(ID) {
        None => Some(FieldFault::Missing),
        Some(id) if !is_decimal(id) || id.parse::<u64>().is_err() => Some(FieldFault::Malformed),
        Some(_) => None,
    }
}

// Older than max_age is stale; exactly max_age is still accepted.
fn check_auth_date(config: &TelegramCfg,
                   fields: &ClaimedFields,
                   now: DateTime<Utc>)
                   -> Option<FieldFault> {
    let auth_date = match fields.get(AUTH_DATE) {
        None => return Some(FieldFault::Missing),
        Some(v) if !is_decimal(v) => return Some(FieldFault::Malformed),
        Some(v) => {
            match v.parse::<i64>() {
                Ok(ts) => ts,
                Err(_) => return Some(FieldFault::Malformed),
            }
        }
    };

    let now = now.timestamp();
    let max_age = i64::try_from(config.max_auth_age_secs).unwrap_or(i64::MAX);
    let skew = i64::try_from(config.allowed_clock_skew_secs).unwrap_or(i64::MAX);

    if now.saturating_sub(auth_date) > max_age {
        Some(FieldFault::Stale)
    } else if auth_date > now.saturating_add(skew) {
        Some(FieldFault::FromFuture)
    } else {
        None
    }
}

fn check_hash(fields: &ClaimedFields) -> Option<FieldFault> {
    match fields.get(HASH) {
        None => Some(FieldFault::Missing),
        Some(hash) => {
            let len = hash.chars().count();
            if len == HASH_LEN {
                None
            } else {
                Some(FieldFault::WrongLength(len))
            }
        }
    }
}

/// Shape and freshness checks that must pass before any hashing happens.
/// Returns the submitted hash.
fn validate<'a>(config: &TelegramCfg,
                fields: &'a ClaimedFields,
                now: DateTime<Utc>)
                -> Result<&'a str> {
    let invalid = vec![(ID, check_id(fields)),
                       (AUTH_DATE, check_auth_date(config, fields, now)),
                       (HASH, check_hash(fields)),].into_iter()
                                                   .filter_map(|(field, fault)| {
                                                       fault.map(|f| InvalidField::new(field, f))
                                                   })
                                                   .collect::<Vec<_>>();

    if !invalid.is_empty() {
        debug!("Telegram login data rejected, fields={:?}",
               invalid.iter().map(|i| i.field).collect::<Vec<_>>());
        return Err(Error::Validation(invalid));
    }

    Ok(fields.get(HASH).unwrap_or_default())
}

impl Telegram {
    /// Maps verified widget fields onto a `LoginUser`. `display_name` is
    /// `first_name + " " + last_name` verbatim, so a missing last name leaves
    /// a trailing space.
    fn map_user(&self, raw: ClaimedFields) -> LoginUser {
        let id = raw.get(ID).unwrap_or_default().to_string();
        let nickname = raw.get(USERNAME).map(str::to_string);
        let display_name = format!("{} {}",
                                   raw.get(FIRST_NAME).unwrap_or_default(),
                                   raw.get(LAST_NAME).unwrap_or_default());
        let avatar_url = raw.get(PHOTO_URL).map(str::to_string);

        LoginUser { id,
                    nickname,
                    display_name,
                    avatar_url,
                    raw }
    }
}

impl LoginProvider for Telegram {
    fn name(&self) -> &'static str { "telegram" }

    fn verify_at(&self,
                 config: &TelegramCfg,
                 fields: &ClaimedFields,
                 now: DateTime<Utc>)
                 -> Result<LoginUser> {
        let submitted = validate(config, fields, now)?;
        let id = fields.get(ID).unwrap_or_default();

        if config.client_secret.is_empty() {
            warn!("Telegram client_secret is not configured, refusing login for id={}",
                  id);
            return Err(Error::SignatureMismatch);
        }

        let data = data_check_string(fields);
        if let Err(e) = signature::verify_hash(&config.client_secret, &data, submitted) {
            warn!("Telegram login signature mismatch, id={}", id);
            return Err(e);
        }

        debug!("Telegram login verified, id={}", id);
        Ok(self.map_user(fields.without(&[AUTH_DATE, HASH])))
    }

    fn render_widget(&self, config: &TelegramCfg) -> String { widget::render(config) }
}
