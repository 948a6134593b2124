//! Saved filter state

use std::path::Path;

use serde::{Deserialize, Serialize};
use xf_core::{ConfigError, FilterRange};

/// One optional interval per chart, by chart position.
///
/// Serialized as a JSON array of `null` or `{"lo": .., "hi": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(pub Vec<Option<FilterRange>>);

impl FilterState {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Number of charts with a filter
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|f| f.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let state = FilterState(vec![None, Some(FilterRange::new(55.0, 70.0))]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"[null,{"lo":55.0,"hi":70.0}]"#);
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.active_count(), 1);
    }

    #[test]
    fn test_reversed_bounds_in_file_are_kept_as_written() {
        let state: FilterState = serde_json::from_str(r#"[{"lo":70,"hi":55}]"#).unwrap();
        // normalization happens when the filter is applied
        assert_eq!(state.0[0].map(|r| r.lo), Some(70.0));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("xf-filters-{}.json", std::process::id()));
        let state = FilterState(vec![Some(FilterRange::new(1.0, 2.0)), None]);
        state.save(&path).unwrap();
        assert_eq!(FilterState::load(&path).unwrap(), state);
        let _ = std::fs::remove_file(path);
    }
}
