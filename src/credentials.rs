//! API credential loading.
//!
//! The credential lives in a flat property file under the key
//! [`API_KEY_PROPERTY`]. It is read once when the relay starts and handed to
//! [`crate::relay::Relay::new`]. A missing file or key is not fatal: the relay
//! keeps running and answers every call with a config-missing failure.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Property holding the generative API key
pub const API_KEY_PROPERTY: &str = "google.ai.api.key";

/// Environment variable that overrides the property file
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

/// Generative API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, rejecting blank values
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Parse a Java-style property file.
///
/// `#` and `!` start comment lines. The key ends at the first unescaped `=`,
/// `:` or whitespace. A line ending in an odd number of backslashes continues
/// on the next line, whose leading whitespace is dropped.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    let mut logical = String::new();
    let mut continuing = false;

    for line in content.lines() {
        let line = line.trim_start();
        if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        continuing = trailing % 2 == 1;
        if continuing {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        let (key, value) = split_entry(&logical);
        props.insert(key, value);
        logical.clear();
    }
    if continuing {
        let (key, value) = split_entry(&logical);
        props.insert(key, value);
    }
    props
}

/// Split one logical line into an unescaped key and value.
fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim_start();
    (unescape(&line[..key_end]), unescape(value))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Read the credential from a property file.
pub fn load_api_key(path: &Path) -> Option<ApiKey> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Credentials file {} not readable: {}", path.display(), e);
            return None;
        }
    };

    let key = parse_properties(&content)
        .remove(API_KEY_PROPERTY)
        .and_then(ApiKey::new);
    if key.is_none() {
        tracing::warn!("No {} in {}", API_KEY_PROPERTY, path.display());
    }
    key
}

/// Resolve the credential: an explicit value (flag or environment) wins over the file.
pub fn resolve_api_key(explicit: Option<&str>, path: &Path) -> Option<ApiKey> {
    if let Some(key) = explicit.and_then(ApiKey::new) {
        tracing::debug!("Using API key from command line / {}", API_KEY_ENV);
        return Some(key);
    }
    load_api_key(path)
}
