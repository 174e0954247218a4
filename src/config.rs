use serde::{Deserialize, Serialize};

/// Limits applied to every formula the engine parses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest formula accepted, in bytes.
    pub max_formula_len: usize,
    /// Deepest nesting of parentheses, calls and prefix operators.
    pub max_depth: usize,
}

impl EngineConfig {
    pub const DEFAULT_MAX_FORMULA_LEN: usize = 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new(max_formula_len: usize, max_depth: usize) -> Self {
        Self {
            max_formula_len,
            max_depth,
        }
    }

    /// Reads `SHEET_MAX_FORMULA_LEN` and `SHEET_MAX_DEPTH`, keeping the default
    /// for any variable that is unset or not a number.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: usize| match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("ignoring {}={:?}: not a number", key, raw);
                default
            }),
        };

        Self {
            max_formula_len: read("SHEET_MAX_FORMULA_LEN", Self::DEFAULT_MAX_FORMULA_LEN),
            max_depth: read("SHEET_MAX_DEPTH", Self::DEFAULT_MAX_DEPTH),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FORMULA_LEN, Self::DEFAULT_MAX_DEPTH)
    }
}
