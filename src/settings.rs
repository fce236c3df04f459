// Settings - layered configuration for the analysis CLI

use std::path::{Path, PathBuf};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use crate::common::error::{ErrorCode, GraphError, Result};
use crate::graph_ensure;
use crate::graph::GraphKind;
use crate::io::{EdgeListFormat, EdgeListReader};
use crate::landmarks::{LandmarkConfig, OracleKind, SelectionMethod};

/// Prefix for environment overrides, e.g. `GRAPH_LANDMARKS__LANDMARKS__COUNT=8`
pub const ENV_PREFIX: &str = "GRAPH_LANDMARKS";

fn default_seed() -> u64 {
    0
}

fn default_sample_size() -> usize {
    100
}

/// Where the edge list lives and how to read it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetSettings {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub weighted: bool,
    #[serde(default)]
    pub format: EdgeListFormat,
    /// First CSV row is a header
    #[serde(default)]
    pub has_headers: bool,
}

impl DatasetSettings {
    pub fn kind(&self) -> GraphKind {
        GraphKind {
            directed: self.directed,
            weighted: self.weighted,
        }
    }

    pub fn reader(&self) -> EdgeListReader {
        EdgeListReader::new(self.kind(), self.format).has_headers(self.has_headers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub oracle: OracleKind,
    /// Seed for every randomized step
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Source vertices sampled by the characteristics estimator
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub landmarks: LandmarkConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            oracle: OracleKind::default(),
            seed: default_seed(),
            sample_size: default_sample_size(),
            dataset: DatasetSettings::default(),
            landmarks: LandmarkConfig::default(),
        }
    }
}

/// `GRAPH_LANDMARKS__SECTION__KEY` overrides; `landmarks.manual` takes a comma separated list
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("landmarks.manual")
}

impl Settings {
    /// Load settings from an optional TOML file, overridden by environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(GraphError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("settings file {} not found", path.display()),
                )));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(env);

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string, without environment overrides
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GraphError::invalid_argument(format!("cannot render settings: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        graph_ensure!(self.sample_size > 0, ErrorCode::ConfigInvalid, "sample_size must be positive");
        graph_ensure!(
            self.landmarks.method == SelectionMethod::Manual || self.landmarks.count > 0,
            ErrorCode::ConfigInvalid,
            "landmarks.count must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_source() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.dataset.kind(), GraphKind::UNDIRECTED);
        assert_eq!(settings.landmarks.method, SelectionMethod::Random);
    }

    #[test]
    fn test_full_document() {
        let source = r#"
            seed = 42
            sample_size = 16
            oracle = "lca"

            [dataset]
            path = "data/web-Google.txt"
            directed = true
            format = "whitespace"

            [landmarks]
            count = 8
            method = "best_cov"
            path_samples = 500
        "#;
        let settings = Settings::from_toml(source).unwrap();

        assert_eq!(settings.seed, 42);
        assert_eq!(settings.oracle, OracleKind::Lca);
        assert_eq!(settings.dataset.kind(), GraphKind::DIRECTED);
        assert_eq!(settings.dataset.path.as_deref(), Some(Path::new("data/web-Google.txt")));
        assert_eq!(settings.landmarks.method, SelectionMethod::BestCoverage);
        assert_eq!(settings.landmarks.path_samples, 500);
    }

    #[test]
    fn test_manual_landmarks() {
        let settings = Settings::from_toml("[landmarks]\nmethod = \"manual\"\nmanual = [3, 9, 27]\n").unwrap();
        assert_eq!(settings.landmarks.manual, vec![3, 9, 27]);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(Settings::from_toml("sample_size = 0").is_err());
        assert!(Settings::from_toml("[landmarks]\ncount = 0").is_err());
        assert!(Settings::from_toml("[landmarks]\nmethod = \"closeness\"").is_err());
        assert!(Settings::load(Some(Path::new("/nonexistent/settings.toml"))).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let vars: config::Map<String, String> = [
            ("GRAPH_LANDMARKS__SEED", "9"),
            ("GRAPH_LANDMARKS__LANDMARKS__METHOD", "manual"),
            ("GRAPH_LANDMARKS__LANDMARKS__MANUAL", "3,9,27"),
            ("GRAPH_LANDMARKS__DATASET__HAS_HEADERS", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = Settings::load_with(None, environment().source(Some(vars))).unwrap();
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.landmarks.method, SelectionMethod::Manual);
        assert_eq!(settings.landmarks.manual, vec![3, 9, 27]);
        assert!(settings.dataset.has_headers);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.landmarks = LandmarkConfig::new(SelectionMethod::MaxDegree, 6);
        settings.oracle = OracleKind::Lca;

        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("max_deg"));
        assert_eq!(Settings::from_toml(&rendered).unwrap(), settings);
    }
}
