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

use std::{error,
          fmt,
          fs,
          io,
          path::Path};

use serde::de::DeserializeOwned;

/// Maximum age of a widget login, in seconds.
pub const DEFAULT_MAX_AUTH_AGE_SECS: u64 = 86_400;

/// Bot username providing a value in development environments only.
pub const DEV_TELEGRAM_BOT: &str = "habitat_dev_bot";

/// Bot id providing a value in development environments only.
pub const DEV_TELEGRAM_CLIENT_ID: &str = "5000000000";

/// The bot token shared with Telegram. Formatting never shows the value.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new<S: Into<String>>(secret: S) -> Self { SharedSecret(secret.into()) }

    pub fn as_bytes(&self) -> &[u8] { self.0.as_bytes() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "SharedSecret(<redacted>)") }
}

impl fmt::Display for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "<redacted>") }
}

impl From<&str> for SharedSecret {
    fn from(secret: &str) -> Self { SharedSecret::new(secret) }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TelegramCfg {
    /// Bot username, as shown in the widget.
    pub bot:                     String,
    /// Numeric bot id. Public.
    pub client_id:               String,
    pub client_secret:           SharedSecret,
    /// Where the widget posts the signed login data.
    pub redirect_url:            String,
    pub max_auth_age_secs:       u64,
    /// How far `auth_date` may run ahead of the local clock.
    pub allowed_clock_skew_secs: u64,
}

impl Default for TelegramCfg {
    fn default() -> Self {
        TelegramCfg { bot:                     DEV_TELEGRAM_BOT.to_string(),
                      client_id:               DEV_TELEGRAM_CLIENT_ID.to_string(),
                      client_secret:           SharedSecret::default(),
                      redirect_url:            "http://localhost/".to_string(),
                      max_auth_age_secs:       DEFAULT_MAX_AUTH_AGE_SECS,
                      allowed_clock_skew_secs: 0, }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    IO(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::IO(ref e) => write!(f, "Error reading config file, {}", e),
            ConfigError::Parse(ref e) => write!(f, "Error parsing config file, {}", e),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ConfigError::IO(ref e) => Some(e),
            ConfigError::Parse(ref e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError { ConfigError::IO(err) }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> ConfigError { ConfigError::Parse(err) }
}

/// Configuration structures loadable from a TOML file.
pub trait ConfigFile: DeserializeOwned + Sized {
    fn from_file<T: AsRef<Path>>(filepath: T) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(filepath.as_ref())?;
        debug!("Loading config from {}", filepath.as_ref().display());
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(raw)?) }
}

impl ConfigFile for TelegramCfg {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_raw() {
        let content = r#"
        bot = "my_site_bot"
        client_id = "123456789"
        client_secret = "123456789:AAE-secret-token"
        redirect_url = "https://example.com/auth/telegram/callback"
        max_auth_age_secs = 3600
        allowed_clock_skew_secs = 30
        "#;

        let config = TelegramCfg::from_raw(content).unwrap();
        assert_eq!(config.bot, "my_site_bot");
        assert_eq!(config.client_id, "123456789");
        assert_eq!(config.client_secret, SharedSecret::new("123456789:AAE-secret-token"));
        assert_eq!(config.redirect_url, "https://example.com/auth/telegram/callback");
        assert_eq!(config.max_auth_age_secs, 3600);
        assert_eq!(config.allowed_clock_skew_secs, 30);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = TelegramCfg::from_raw("client_secret = \"abc\"").unwrap();
        assert_eq!(config.bot, DEV_TELEGRAM_BOT);
        assert_eq!(config.client_id, DEV_TELEGRAM_CLIENT_ID);
        assert_eq!(config.max_auth_age_secs, DEFAULT_MAX_AUTH_AGE_SECS);
        assert_eq!(config.allowed_clock_skew_secs, 0);
    }

    #[test]
    fn config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bot = \"file_bot\"\nclient_secret = \"from-file\"").unwrap();

        let config = TelegramCfg::from_file(file.path()).unwrap();
        assert_eq!(config.bot, "file_bot");
        assert_eq!(config.client_secret.as_bytes(), b"from-file");
    }

    #[test]
    fn bad_config_is_reported() {
        match TelegramCfg::from_raw("max_auth_age_secs = \"soon\"") {
            Err(ConfigError::Parse(_)) => (),
            other => panic!("expected parse error, got {:?}", other),
        }
        match TelegramCfg::from_file("/nonexistent/telegram.toml") {
            Err(ConfigError::IO(_)) => (),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn secret_is_never_formatted() {
        let config = TelegramCfg { client_secret: SharedSecret::new("hunter2"),
                                   ..Default::default() };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
        assert_eq!(config.client_secret.to_string(), "<redacted>");
    }
}
