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

//! Login provider for the Telegram Login Widget.
//!
//! The widget runs in the browser and posts a set of claimed identity fields
//! signed by Telegram with a key derived from the bot token. Verification
//! rebuilds that signature locally; there is no code or token exchange.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod canonical;
pub mod config;
pub mod error;
pub mod fields;
pub mod signature;
pub mod telegram;
pub mod types;
pub mod widget;

pub use crate::{config::TelegramCfg,
                error::{Error,
                        Result},
                fields::ClaimedFields,
                telegram::Telegram,
                types::{LoginProvider,
                        LoginUser}};
