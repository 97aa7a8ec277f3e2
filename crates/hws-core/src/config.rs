//! Highlighter configuration.
//!
//! Options are read from the host's persisted settings, a flat JSON object.
//! Every key is optional and read on its own: a missing or wrongly-typed
//! value falls back to that key's default without affecting the others.
//!
//! | Key                                                | Type   | Default     |
//! |----------------------------------------------------|--------|-------------|
//! | `highlight_whitespaces_enabled`                    | bool   | `true`      |
//! | `highlight_whitespaces_file_max_size`              | bytes  | `1048576`   |
//! | `highlight_whitespaces_space_highlight_scope_name` | string | `"invalid"` |
//! | `highlight_whitespaces_tab_highlight_scope_name`   | string | `"invalid"` |

use serde_json::{Map, Value};
use tracing::debug;

use crate::region::RegionKey;

/// Settings key for the initial enabled state.
pub const KEY_ENABLED: &str = "highlight_whitespaces_enabled";
/// Settings key for the largest buffer (in bytes) that gets scanned.
pub const KEY_MAX_SIZE: &str = "highlight_whitespaces_file_max_size";
/// Settings key for the style applied to space runs.
pub const KEY_SPACE_SCOPE: &str = "highlight_whitespaces_space_highlight_scope_name";
/// Settings key for the style applied to tab runs.
pub const KEY_TAB_SCOPE: &str = "highlight_whitespaces_tab_highlight_scope_name";

pub const DEFAULT_ENABLED: bool = true;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;
pub const DEFAULT_SCOPE_NAME: &str = "invalid";

/// Resolved highlighter options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Highlighting state when the highlighter starts.
    pub enabled: bool,
    /// Buffers larger than this many bytes are never scanned.
    pub max_file_size: u64,
    /// Highlight style name for space-run regions.
    pub space_scope: String,
    /// Highlight style name for tab-run regions.
    pub tab_scope: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            space_scope: DEFAULT_SCOPE_NAME.to_string(),
            tab_scope: DEFAULT_SCOPE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Read the options from a settings object, key by key.
    #[must_use]
    pub fn from_map(settings: &Map<String, Value>) -> Self {
        Self {
            enabled: read(settings, KEY_ENABLED, Value::as_bool).unwrap_or(DEFAULT_ENABLED),
            max_file_size: read(settings, KEY_MAX_SIZE, Value::as_u64)
                .unwrap_or(DEFAULT_MAX_FILE_SIZE),
            space_scope: read(settings, KEY_SPACE_SCOPE, Value::as_str)
                .map_or_else(|| DEFAULT_SCOPE_NAME.to_string(), str::to_string),
            tab_scope: read(settings, KEY_TAB_SCOPE, Value::as_str)
                .map_or_else(|| DEFAULT_SCOPE_NAME.to_string(), str::to_string),
        }
    }

    /// The style name for a region set.
    #[inline]
    #[must_use]
    pub fn scope(&self, key: RegionKey) -> &str {
        match key {
            RegionKey::Spaces => &self.space_scope,
            RegionKey::Tabs => &self.tab_scope,
        }
    }
}

/// Look up `key` and convert it. Present-but-wrong values are logged and
/// treated as missing.
fn read<'a, T>(
    settings: &'a Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&'a Value) -> Option<T>,
) -> Option<T> {
    let value = settings.get(key)?;
    let converted = convert(value);
    if converted.is_none() {
        debug!(key, %value, "ignoring malformed setting, using default");
    }
    converted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
