use serde::{Deserialize, Serialize};

/// Upload ceiling the document server accepts (50 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Inputs longer than this are rejected before tokenizing.
    pub max_input_bytes: usize,
    /// Report html5ever's recoverable parse errors as debug events.
    pub log_recoverable_errors: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            log_recoverable_errors: true,
        }
    }
}

impl ExtractOptions {
    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts: ExtractOptions = serde_json::from_str(r#"{"max_input_bytes": 10}"#).unwrap();
        assert_eq!(opts.max_input_bytes, 10);
        assert!(opts.log_recoverable_errors);
    }

    #[test]
    fn default_ceiling_is_fifty_mebibytes() {
        assert_eq!(ExtractOptions::default().max_input_bytes, 52_428_800);
    }
}
