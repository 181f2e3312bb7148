//! Names the rewrite rules introduce or match on.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! retval_name = "_retval"
//!
//! [diagnostic]
//! callee = "print"
//! message = "This is an additional statement."
//!
//! [length]
//! builtin = "len"
//! string = "string.len"
//! collection = "table.getn"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid rewrite config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid rewrite config: `{field}` must not be empty")]
    Empty { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Temporary a function's return value is bound to before `return`.
    pub retval_name: String,
    /// Name of the call a `for` iterable must be to be lowered.
    pub range_builtin: String,
    pub diagnostic: DiagnosticConfig,
    pub length: LengthConfig,
}

/// Statement injected at the top of every function body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    pub callee: String,
    pub message: String,
}

/// Replacements for the length builtin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LengthConfig {
    pub builtin: String,
    /// Used when the first argument is a string literal.
    pub string: String,
    /// Used for anything else.
    pub collection: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            retval_name: "_retval".into(),
            range_builtin: "range".into(),
            diagnostic: DiagnosticConfig::default(),
            length: LengthConfig::default(),
        }
    }
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            callee: "print".into(),
            message: "This is an additional statement.".into(),
        }
    }
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            builtin: "len".into(),
            string: "string.len".into(),
            collection: "table.getn".into(),
        }
    }
}

impl RewriteConfig {
    /// Parse a TOML document, filling unset fields with defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("retval_name", &self.retval_name),
            ("range_builtin", &self.range_builtin),
            ("diagnostic.callee", &self.diagnostic.callee),
            ("length.builtin", &self.length.builtin),
            ("length.string", &self.length.string),
            ("length.collection", &self.length.collection),
        ];
        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(ConfigError::Empty { field: *field }),
            None => Ok(()),
        }
    }
}
