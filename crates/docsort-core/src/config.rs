//! Sort configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::order::{StringOrder, ValueOrder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// String collation used by the value comparator.
    pub string_order: StringOrder,

    /// Upper bound on branches one sort field may expand to in a single
    /// document. Documents over the bound are rejected instead of sorted.
    pub max_branches_per_field: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            string_order: StringOrder::Utf16,
            max_branches_per_field: 1_000_000,
        }
    }
}

impl SortConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `DOCSORT_STRING_ORDER`: `utf16` or `codepoint`
    /// - `DOCSORT_MAX_BRANCHES_PER_FIELD`: branch limit per sort field
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("DOCSORT_STRING_ORDER") {
            match s.parse::<StringOrder>() {
                Ok(v) => cfg.string_order = v,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value = %s, error = %_e, "ignoring DOCSORT_STRING_ORDER");
                }
            }
        }

        if let Ok(s) = std::env::var("DOCSORT_MAX_BRANCHES_PER_FIELD") {
            match s.parse::<usize>() {
                Ok(v) => cfg.max_branches_per_field = v,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value = %s, error = %_e, "ignoring DOCSORT_MAX_BRANCHES_PER_FIELD");
                }
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_branches_per_field == 0 {
            return Err(Error::Config(
                "max_branches_per_field must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn value_order(&self) -> ValueOrder {
        ValueOrder::new(self.string_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let cfg = SortConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.value_order().string_order(), StringOrder::Utf16);
    }

    #[test]
    fn test_zero_branch_limit_is_rejected() {
        let cfg = SortConfig {
            max_branches_per_field: 0,
            ..SortConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let cfg: SortConfig = serde_json::from_str(r#"{"string_order": "codepoint"}"#).unwrap();
        assert_eq!(cfg.string_order, StringOrder::CodePoint);
        assert_eq!(cfg.max_branches_per_field, 1_000_000);
    }
}
