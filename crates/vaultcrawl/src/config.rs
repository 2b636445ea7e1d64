//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every section and field is optional.
//!
//! ```toml
//! [layout]
//! max_cells = 4096
//! sparsity = 1.35
//! braid_ratio = 0.06
//!
//! [navigation]
//! history_cap = 80
//! reveal_radius = 1
//!
//! [search]
//! limit = 20
//!
//! [viewport]
//! cell_size = 1.0
//! padding = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vaultcrawl_procedural::LayoutConfig;

use crate::error::ConfigError;

/// Navigation limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum travel-history entries; oldest are evicted first.
    pub history_cap: usize,
    /// Cells revealed around the current room, in passage steps.
    pub reveal_radius: usize,
    /// Maximum remembered command lines.
    pub command_history_cap: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            history_cap: 80,
            reveal_radius: 1,
            command_history_cap: 100,
        }
    }
}

/// Search limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum results per query.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Map viewport geometry, in layout units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Side length of one cell.
    pub cell_size: f64,
    /// Margin around the grid when fitting.
    pub padding: f64,
    /// Smallest visible extent, in cells.
    pub min_extent: f64,
    /// Largest visible extent, as a multiple of the fitted grid.
    pub max_extent_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            padding: 0.5,
            min_extent: 3.0,
            max_extent_factor: 1.5,
        }
    }
}

/// Text map rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Cells shown around the current room by `map`.
    pub local_radius: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { local_radius: 4 }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid sizing and carving.
    pub layout: LayoutConfig,
    /// Navigation limits.
    pub navigation: NavigationConfig,
    /// Search limits.
    pub search: SearchConfig,
    /// Viewport geometry.
    pub viewport: ViewportConfig,
    /// Text map rendering.
    pub map: MapConfig,
}

impl EngineConfig {
    /// Small limits and no braids, for tests.
    #[must_use]
    pub fn testing() -> Self {
        Self {
            layout: LayoutConfig {
                braid_ratio: 0.0,
                ..LayoutConfig::default()
            },
            navigation: NavigationConfig {
                history_cap: 8,
                reveal_radius: 1,
                command_history_cap: 16,
            },
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Names the first out-of-range field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.layout.max_cells == 0 {
            return invalid("layout.max_cells", "must be at least 1");
        }
        if !self.layout.sparsity.is_finite() || self.layout.sparsity < 1.0 {
            return invalid("layout.sparsity", "must be a finite number >= 1.0");
        }
        if !(0.0..=1.0).contains(&self.layout.braid_ratio) {
            return invalid("layout.braid_ratio", "must be within [0, 1]");
        }
        if self.navigation.history_cap == 0 {
            return invalid("navigation.history_cap", "must be at least 1");
        }
        if self.search.limit == 0 {
            return invalid("search.limit", "must be at least 1");
        }
        let vp = &self.viewport;
        if !(vp.cell_size.is_finite() && vp.cell_size > 0.0) {
            return invalid("viewport.cell_size", "must be positive");
        }
        if !(vp.padding.is_finite() && vp.padding >= 0.0) {
            return invalid("viewport.padding", "must be non-negative");
        }
        if !(vp.min_extent.is_finite() && vp.min_extent > 0.0) {
            return invalid("viewport.min_extent", "must be positive");
        }
        if !(vp.max_extent_factor.is_finite() && vp.max_extent_factor >= 1.0) {
            return invalid("viewport.max_extent_factor", "must be >= 1.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.navigation.history_cap, 80);
        assert_eq!(config.search.limit, 20);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [navigation]
            history_cap = 12

            [layout]
            braid_ratio = 0.0
            "#,
        )
        .unwrap();
        assert_eq!(config.navigation.history_cap, 12);
        assert_eq!(config.navigation.reveal_radius, 1);
        assert_eq!(config.layout.braid_ratio, 0.0);
        assert_eq!(config.layout.max_cells, 4096);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = EngineConfig::from_toml_str("[layout]\nsparsity = 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "layout.sparsity", .. }));

        let err = EngineConfig::from_toml_str("[navigation]\nhistory_cap = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "navigation.history_cap", .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("[layout\nmax_cells = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_testing_preset_is_valid() {
        assert!(EngineConfig::testing().validate().is_ok());
    }
}
