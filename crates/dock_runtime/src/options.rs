//! Runtime configuration for the dock store.

use serde::{Deserialize, Serialize};

use crate::persistence::DOCK_STATE_KEY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Options supplied by the composition root when constructing a [`crate::DockStore`].
pub struct DockOptions {
    /// Storage key under which the App snapshot is persisted.
    pub storage_key: String,
    /// Prefix used by sequential id generators for split windows.
    pub split_window_prefix: String,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            storage_key: DOCK_STATE_KEY.to_string(),
            split_window_prefix: "win-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_options_fill_in_defaults() {
        let options: DockOptions =
            serde_json::from_str(r#"{"storage_key":"custom.key"}"#).expect("decode options");
        assert_eq!(options.storage_key, "custom.key");
        assert_eq!(options.split_window_prefix, "win-");
    }
}
