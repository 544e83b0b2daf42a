//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cardmap/cardmap.toml`
//! 3. Local config: `<catalog_dir>/.cardmap.toml` (next to the catalog file)
//! 4. Environment variables: `CARDMAP_*` prefix

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, TomlResultExt};
use crate::domain::{LayerTaxonomy, LayoutConfig};

/// Layer taxonomy buckets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayerSettings {
    /// Layer keys treated as terminal destinations
    pub endpoints: Vec<String>,
    /// Layer keys treated as pass-through points
    pub throughpoints: Vec<String>,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            endpoints: vec!["database".into(), "warehouse".into()],
            throughpoints: vec!["api".into(), "form".into(), "service".into()],
        }
    }
}

/// Raw layer config for intermediate parsing (arrays are Option to detect "not specified").
///
/// - `None` → not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayerSettings {
    pub endpoints: Option<Vec<String>>,
    pub throughpoints: Option<Vec<String>>,
}

/// Raw layout constants; unspecified values inherit.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub card_width: Option<f64>,
    pub card_height: Option<f64>,
    pub horizontal_spacing: Option<f64>,
    pub vertical_spacing: Option<f64>,
    pub min_width: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog: Option<PathBuf>,
    pub layers: RawLayerSettings,
    pub layout: RawLayoutSettings,
}

impl LayerSettings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Result is sorted and de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["api", "form"], &["queue"])     // → ["api", "form", "queue"]
    /// merge_array(&["api", "form"], &["!form"])     // → ["api"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: BTreeSet<String> = base.iter().cloned().collect();
        for item in overlay {
            match item.strip_prefix('!') {
                Some(negated) => {
                    result.remove(negated);
                }
                None => {
                    result.insert(item.clone());
                }
            }
        }
        result.into_iter().collect()
    }

    /// Merge a local overlay: arrays union with negation.
    pub fn merge(&self, overlay: &RawLayerSettings) -> Self {
        Self {
            endpoints: overlay
                .endpoints
                .as_ref()
                .map(|o| Self::merge_array(&self.endpoints, o))
                .unwrap_or_else(|| self.endpoints.clone()),
            throughpoints: overlay
                .throughpoints
                .as_ref()
                .map(|o| Self::merge_array(&self.throughpoints, o))
                .unwrap_or_else(|| self.throughpoints.clone()),
        }
    }

    /// Apply global config: specified arrays REPLACE the defaults.
    pub fn apply_global(&self, global: &RawLayerSettings) -> Self {
        Self {
            endpoints: global
                .endpoints
                .clone()
                .unwrap_or_else(|| self.endpoints.clone()),
            throughpoints: global
                .throughpoints
                .clone()
                .unwrap_or_else(|| self.throughpoints.clone()),
        }
    }
}

/// Overlay layout constants; scalars replace at every level.
fn overlay_layout(base: &LayoutConfig, raw: &RawLayoutSettings) -> LayoutConfig {
    LayoutConfig {
        card_width: raw.card_width.unwrap_or(base.card_width),
        card_height: raw.card_height.unwrap_or(base.card_height),
        horizontal_spacing: raw.horizontal_spacing.unwrap_or(base.horizontal_spacing),
        vertical_spacing: raw.vertical_spacing.unwrap_or(base.vertical_spacing),
        min_width: raw.min_width.unwrap_or(base.min_width),
    }
}

/// Unified configuration for cardmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Default catalog file, used when `--catalog` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Layer taxonomy
    pub layers: LayerSettings,
    /// Layout constants
    pub layout: LayoutConfig,
}

/// Get the XDG config directory for cardmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cardmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cardmap.toml"))
}

/// Get the path to the local config file next to a catalog.
pub fn local_config_path(catalog_dir: &Path) -> PathBuf {
    catalog_dir.join(".cardmap.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// The layer taxonomy described by `layers`.
    pub fn taxonomy(&self) -> Result<LayerTaxonomy, ApplicationError> {
        Ok(LayerTaxonomy::from_buckets(
            self.layers.endpoints.iter().cloned(),
            self.layers.throughpoints.iter().cloned(),
        )?)
    }

    fn expand_paths(&mut self) {
        if let Some(catalog) = self.catalog.take() {
            self.catalog = Some(expand_path(&catalog));
        }
    }

    /// Merge a local overlay: arrays UNION, scalars replace.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog: overlay.catalog.clone().or_else(|| self.catalog.clone()),
            layers: self.layers.merge(&overlay.layers),
            layout: overlay_layout(&self.layout, &overlay.layout),
        }
    }

    /// Apply global config onto defaults: arrays REPLACE, scalars replace.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            catalog: global.catalog.clone().or_else(|| self.catalog.clone()),
            layers: self.layers.apply_global(&global.layers),
            layout: overlay_layout(&self.layout, &global.layout),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `catalog_dir` - Directory of the catalog file, searched for `.cardmap.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with `!item` negation
    /// - Any → Env vars: REPLACE
    pub fn load(catalog_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = catalog_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply CARDMAP_* environment variables as explicit overrides.
    ///
    /// `CARDMAP_LAYERS__ENDPOINTS=database,lake` replaces the whole list.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CARDMAP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("layers.endpoints")
                    .with_list_parse_key("layers.throughpoints"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<Vec<String>>("layers.endpoints") {
            settings.layers.endpoints = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("layers.throughpoints") {
            settings.layers.throughpoints = val;
        }

        let layout = &mut settings.layout;
        for (key, slot) in [
            ("layout.card_width", &mut layout.card_width),
            ("layout.card_height", &mut layout.card_height),
            ("layout.horizontal_spacing", &mut layout.horizontal_spacing),
            ("layout.vertical_spacing", &mut layout.vertical_spacing),
            ("layout.min_width", &mut layout.min_width),
        ] {
            if let Ok(val) = config.get_float(key) {
                *slot = val;
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).serializing("settings")
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cardmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cardmap/cardmap.toml  (defines your baseline)
#   Local:  <catalog_dir>/.cardmap.toml     (catalog-specific additions)
#   Env:    CARDMAP_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global. Use "!item" to remove an inherited item:
#     throughpoints = ["queue", "!form"]

# Catalog used when --catalog is not given
# catalog = "~/catalogs/main.toml"

[layers]
# Terminal destinations: orphaned when nothing links to them
# endpoints = ["database", "warehouse"]

# Pass-through points: orphaned when they link nowhere
# throughpoints = ["api", "form", "service"]

[layout]
# card_width = 220.0
# card_height = 90.0
# horizontal_spacing = 40.0
# vertical_spacing = 160.0
# min_width = 600.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
