use serde::{Deserialize, Serialize};

fn default_binary() -> String {
    "tree-tagger".to_string()
}

fn default_parameter_dir() -> String {
    ".treetagger/lib".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

/// External POS tagger invocation settings. The tagger being absent is a
/// recoverable condition at call time, never checked at startup.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TaggerConfig {
    /// Path to the tree-tagger executable
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Directory holding the per-language parameter files
    #[serde(default = "default_parameter_dir")]
    pub parameter_dir: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl TaggerConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(binary) = std::env::var("KARTEI_TAGGER_BINARY") {
            config.binary = binary;
        }
        if let Ok(dir) = std::env::var("KARTEI_TAGGER_DIR") {
            config.parameter_dir = dir;
        }
        config
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            parameter_dir: default_parameter_dir(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
