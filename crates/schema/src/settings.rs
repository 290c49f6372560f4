//! Engine tuning knobs, loadable from RON or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, carousel::DEFAULT_AUTOPLAY_DELAY_MS};

/// Default search debounce window.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default bound on the parsed-wrapper cache.
pub const DEFAULT_WRAPPER_CACHE: usize = 256;

/// Runtime settings for a render tree.
///
/// ```ron
/// (debounce_ms: 300, diagnostics: true, autoplay_delay_ms: 3000)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Quiet period before a typed search query is dispatched.
    pub debounce_ms: u64,
    /// Collect per-pass diagnostics into the render output.
    pub diagnostics: bool,
    /// Autoplay delay for `autoplay: true` carousels.
    pub autoplay_delay_ms: u64,
    /// Capacity of the parsed-wrapper cache.
    pub wrapper_cache_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            diagnostics: true,
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            wrapper_cache_size: DEFAULT_WRAPPER_CACHE,
        }
    }
}

impl EngineSettings {
    /// Parse settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        Self::from_ron_at(text, None)
    }

    /// Parse settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::from_json(&e, text, None))
    }

    /// Parse RON settings; `path` is attached to error locations.
    pub(crate) fn from_ron_at(text: &str, path: Option<&Path>) -> Result<Self, Error> {
        ron::from_str(text).map_err(|e| Error::Invalid {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let s = EngineSettings::from_ron("(debounce_ms: 2000)").unwrap();
        assert_eq!(s.debounce_ms, 2000);
        assert!(s.diagnostics);
        assert_eq!(s.autoplay_delay_ms, 3000);
        assert_eq!(EngineSettings::from_json("{}").unwrap(), EngineSettings::default());
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = EngineSettings::from_ron("(debounce: 1)").unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
        let err = EngineSettings::from_json(r#"{"nope": true}"#).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
    }
}
