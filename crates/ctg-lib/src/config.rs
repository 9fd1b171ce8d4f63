use crate::chart::SurfaceMetrics;
use crate::error::{CtgError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Backing resolution in pixels.
    pub width: f64,
    pub height: f64,
    /// On-screen width; defaults to `width` when the surface is not scaled.
    #[serde(default)]
    pub css_width: Option<f64>,
}

impl SurfaceConfig {
    pub fn metrics(&self) -> SurfaceMetrics {
        SurfaceMetrics {
            backing_width: self.width,
            css_width: self.css_width.unwrap_or(self.width),
        }
    }

    fn validate(&self, chart: &'static str) -> Result<()> {
        let dims = [Some(self.width), Some(self.height), self.css_width];
        if dims.iter().flatten().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(CtgError::InvalidSurface {
                chart,
                reason: format!(
                    "dimensions must be positive, got {}x{} (css {:?})",
                    self.width, self.height, self.css_width
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct SimulatorConfig {
    /// Fixed seed for reproducible strips; entropy when absent.
    pub seed: Option<u64>,
    pub fhr_chart: SurfaceConfig,
    pub toco_chart: SurfaceConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fhr_chart: SurfaceConfig {
                width: 1200.0,
                height: 420.0,
                css_width: None,
            },
            toco_chart: SurfaceConfig {
                width: 1200.0,
                height: 200.0,
                css_width: None,
            },
        }
    }
}

/// Surface table as written; missing keys fall back per chart.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SurfaceTable {
    width: Option<f64>,
    height: Option<f64>,
    css_width: Option<f64>,
}

impl SurfaceTable {
    fn or(self, fallback: SurfaceConfig) -> SurfaceConfig {
        SurfaceConfig {
            width: self.width.unwrap_or(fallback.width),
            height: self.height.unwrap_or(fallback.height),
            css_width: self.css_width.or(fallback.css_width),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    seed: Option<u64>,
    fhr_chart: SurfaceTable,
    toco_chart: SurfaceTable,
}

impl From<ConfigFile> for SimulatorConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = SimulatorConfig::default();
        Self {
            seed: file.seed,
            fhr_chart: file.fhr_chart.or(defaults.fhr_chart),
            toco_chart: file.toco_chart.or(defaults.toco_chart),
        }
    }
}

impl SimulatorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CtgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimulatorConfig =
            toml::from_str(&contents).map_err(|source| CtgError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.fhr_chart.validate("fhr")?;
        self.toco_chart.validate("toco")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctg.toml");
        fs::write(
            &path,
            "seed = 42\n[fhr_chart]\nwidth = 2400\nheight = 840\ncss_width = 1200\n",
        )
        .unwrap();
        let config = SimulatorConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fhr_chart.metrics().scale(), 2.0);
        assert_eq!(config.toco_chart, SimulatorConfig::default().toco_chart);
    }

    #[test]
    fn partial_surface_table_keeps_chart_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctg.toml");
        fs::write(&path, "[toco_chart]\nwidth = 800\n[fhr_chart]\nheight = 500\n").unwrap();
        let config = SimulatorConfig::load(&path).unwrap();
        assert_eq!(config.toco_chart.width, 800.0);
        assert_eq!(config.toco_chart.height, 200.0);
        assert_eq!(config.fhr_chart.width, 1200.0);
        assert_eq!(config.fhr_chart.height, 500.0);
        assert_eq!(config.fhr_chart.css_width, None);
    }

    #[test]
    fn rejects_zero_height() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[toco_chart]\nwidth = 800\nheight = 0\n").unwrap();
        let err = SimulatorConfig::load(&path).unwrap_err();
        assert!(matches!(err, CtgError::InvalidSurface { chart: "toco", .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimulatorConfig::load(Path::new("/nonexistent/ctg.toml")).unwrap_err();
        assert!(matches!(err, CtgError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "seed = [").unwrap();
        let err = SimulatorConfig::load(&path).unwrap_err();
        assert!(matches!(err, CtgError::ConfigParse { .. }));
    }
}
