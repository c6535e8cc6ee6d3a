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

use std::borrow::Cow;

use serde_json::Value;

use crate::config::TelegramCfg;

/// Telegram's widget loader.
pub const WIDGET_SCRIPT_URL: &str = "https://telegram.org/js/telegram-widget.js";

/// Escapes text for use inside a double-quoted HTML attribute.
pub fn html_attr(s: &str) -> Cow<'_, str> {
    if s.contains(&['&', '<', '>', '"', '\''][..]) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

/// Renders `s` as a quoted JavaScript string literal that is also safe to
/// place inside an inline `<script>` element.
pub fn js_string(s: &str) -> String {
    // JSON string syntax is a subset of JS string syntax; the remaining
    // characters could close the script element or end a JS line.
    Value::String(s.to_string()).to_string()
                                .replace('<', "\\u003c")
                                .replace('>', "\\u003e")
                                .replace('&', "\\u0026")
                                .replace('\u{2028}', "\\u2028")
                                .replace('\u{2029}', "\\u2029")
}

/// Markup for a `#telegram-login` button: loads the widget, asks Telegram
/// for the signed login data on click and posts it as JSON to the configured
/// callback, following the redirect that comes back.
///
/// The page must provide `meta[name=csrf-token]`.
pub fn render(config: &TelegramCfg) -> String {
    debug!("Rendering Telegram login widget for bot {}", config.bot);

    format!(r##"<script src="{script}" data-telegram-login="{bot}" data-request-access="write"></script>
<script>
    document.querySelector("#telegram-login").addEventListener("click", event => {{
        window.Telegram.Login.auth(
            {{bot_id: {bot_id}, request_access: true}},
            (data) => {{
                if (!data) {{
                    console.error("authorization failed");
                    return;
                }}

                fetch({callback}, {{
                    headers: {{
                        "Content-Type": "application/json",
                        "Accept": "application/json",
                        "X-Requested-With": "XMLHttpRequest",
                        "X-CSRF-Token": document.querySelector("meta[name=csrf-token]").content
                    }},
                    method: "post",
                    credentials: "same-origin",
                    body: JSON.stringify(data)
                }}).then(response => {{
                    if (!response.redirected) {{
                        return;
                    }}
                    window.location.href = response.url;
                }});
            }}
        );
    }});
</script>"##,
            script = WIDGET_SCRIPT_URL,
            bot = html_attr(&config.bot),
            bot_id = js_string(&config.client_id),
            callback = js_string(&config.redirect_url))
}
