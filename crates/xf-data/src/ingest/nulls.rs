//! Missing-value tokens for optional sensor columns

use serde::{Serialize, Deserialize};

/// Cell contents that mean "no reading"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullConfig {
    /// Tokens to treat as missing
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self::from_tokens(&xf_core::DashboardSettings::default().null_tokens)
    }
}

impl NullConfig {
    /// Case-insensitive, whitespace-trimming matcher over `tokens`
    pub fn from_tokens(tokens: &[String]) -> Self {
        Self {
            patterns: tokens.to_vec(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }

    /// Check if a cell should be read as a missing value
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }
}
