// Descriptor document limits
//
// Documents come from files the tool does not control. These limits keep the
// loader from exhausting memory or the stack:
// - Memory exhaustion from very large documents
// - Stack overflow from deeply nested anonymous types
// - Pathologically long names and scope paths
//
// All limits have sensible defaults and can be overridden via typestring.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up next to the working directory
pub const CONFIG_FILE: &str = "typestring.toml";

/// Document loader limits with permissive defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderLimits {
    pub max_input_size: usize,        // Maximum document size in bytes
    pub max_type_count: usize,        // Maximum number of entries per document
    pub max_nesting_depth: usize,     // Maximum anonymous nesting depth below a root
    pub max_identifier_length: usize, // Maximum name / scope / token length in bytes
}

impl Default for LoaderLimits {
    fn default() -> Self {
        Self {
            max_input_size: 10_000_000, // 10 MB
            max_type_count: 100_000,
            max_nesting_depth: 256,
            max_identifier_length: 1_000,
        }
    }
}

impl LoaderLimits {
    /// Create with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Load limits from a typestring.toml, falling back to defaults
    ///
    /// Returns error only if TOML is malformed, not if file is missing
    pub fn from_config_toml<P: AsRef<Path>>(path: P) -> Result<Self, LimitError> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("{} not found, using default limits", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| LimitError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ConfigFile = toml::from_str(&content).map_err(|source| LimitError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // Only override specified values
        let mut limits = Self::default();

        if let Some(limits_config) = config.limits {
            if let Some(v) = limits_config.max_input_size {
                limits.max_input_size = v;
            }
            if let Some(v) = limits_config.max_type_count {
                limits.max_type_count = v;
            }
            if let Some(v) = limits_config.max_nesting_depth {
                limits.max_nesting_depth = v;
            }
            if let Some(v) = limits_config.max_identifier_length {
                limits.max_identifier_length = v;
            }
        }

        log::debug!("loaded limits from {}: {:?}", path.display(), limits);
        Ok(limits)
    }

    /// Validate that all limits are reasonable (positive, not absurdly large)
    pub fn validate(&self) -> Result<(), LimitError> {
        const MAX_REASONABLE: usize = 100_000_000; // 100 MB

        if self.max_input_size == 0 || self.max_input_size > MAX_REASONABLE {
            return Err(LimitError::invalid("max_input_size", self.max_input_size));
        }

        if self.max_type_count == 0 || self.max_type_count > 10_000_000 {
            return Err(LimitError::invalid("max_type_count", self.max_type_count));
        }

        // the core recurses once per nesting level
        if self.max_nesting_depth == 0 || self.max_nesting_depth > 10_000 {
            return Err(LimitError::invalid("max_nesting_depth", self.max_nesting_depth));
        }

        if self.max_identifier_length == 0 || self.max_identifier_length > 100_000 {
            return Err(LimitError::invalid(
                "max_identifier_length",
                self.max_identifier_length,
            ));
        }

        Ok(())
    }
}

/// TOML configuration structures for deserialization
#[derive(Debug, Deserialize)]
struct ConfigFile {
    limits: Option<LimitsConfig>,
}

#[derive(Debug, Deserialize)]
struct LimitsConfig {
    max_input_size: Option<usize>,
    max_type_count: Option<usize>,
    max_nesting_depth: Option<usize>,
    max_identifier_length: Option<usize>,
}

/// Error type for limit validation and loading
#[derive(Debug, Error)]
pub enum LimitError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid limit '{name}': {value} (must be positive and reasonable)")]
    Invalid { name: &'static str, value: usize },
}

impl LimitError {
    fn invalid(name: &'static str, value: usize) -> Self {
        LimitError::Invalid { name, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_reasonable() {
        let limits = LoaderLimits::default();
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let limits = LoaderLimits::new();
        assert_eq!(limits.max_input_size, 10_000_000);
        assert_eq!(limits.max_type_count, 100_000);
        assert_eq!(limits.max_nesting_depth, 256);
        assert_eq!(limits.max_identifier_length, 1_000);
    }

    #[test]
    fn test_validation_catches_zero_values() {
        let mut limits = LoaderLimits::default();
        limits.max_input_size = 0;
        assert!(limits.validate().is_err());

        limits = LoaderLimits::default();
        limits.max_type_count = 0;
        assert!(limits.validate().is_err());

        limits = LoaderLimits::default();
        limits.max_nesting_depth = 0;
        assert!(limits.validate().is_err());

        limits = LoaderLimits::default();
        limits.max_identifier_length = 0;
        assert!(limits.validate().is_err());
    }

    #[test]
    fn test_validation_catches_too_large_values() {
        let mut limits = LoaderLimits::default();
        limits.max_input_size = 200_000_000;
        assert!(limits.validate().is_err());

        limits = LoaderLimits::default();
        limits.max_nesting_depth = 20_000;
        assert!(matches!(
            limits.validate(),
            Err(LimitError::Invalid {
                name: "max_nesting_depth",
                value: 20_000
            })
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let limits = LoaderLimits::from_config_toml(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(limits, LoaderLimits::default());
    }

    #[test]
    fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[limits]
max_input_size = 2000000
max_nesting_depth = 64
"#,
        )
        .unwrap();

        let limits = LoaderLimits::from_config_toml(&path).unwrap();
        assert_eq!(limits.max_input_size, 2_000_000); // Overridden
        assert_eq!(limits.max_nesting_depth, 64); // Overridden
        assert_eq!(limits.max_type_count, 100_000); // Default
        assert_eq!(limits.max_identifier_length, 1_000); // Default
    }

    #[test]
    fn test_file_without_limits_table_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "").unwrap();

        let limits = LoaderLimits::from_config_toml(&path).unwrap();
        assert_eq!(limits, LoaderLimits::default());
    }

    #[test]
    fn test_malformed_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = LoaderLimits::from_config_toml(&path);
        assert!(matches!(result, Err(LimitError::Parse { .. })));
    }
}
