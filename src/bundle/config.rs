use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::invoker::BundleError;

/// Product prefix of every artifact name.
pub const PRODUCT_NAME: &str = "qwen-tts";

/// Packaging tool invoked by default.
pub const DEFAULT_TOOL: &str = "pyinstaller";

/// Service entry point handed to the packaging tool.
pub const DEFAULT_ENTRY_POINT: &str = "server.py";

/// Conventional output directory of the packaging tool.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Runtime modules the packaging tool's import analysis misses.
pub const HIDDEN_IMPORTS: &[&str] = &[
    "flask",
    "flask_cors",
    "scipy",
    "scipy.signal",
    "scipy.special",
    "scipy.special._cdflib",
    "qwen_tts",
];

/// Settings for a packaging run.
///
/// Defaults reproduce the stock command line. Individual fields can be
/// overridden through [`BundleConfigBuilder`] or a JSON file, where missing
/// keys fall back to their defaults. The cache clear and the
/// [`HIDDEN_IMPORTS`] are always part of the command and cannot be turned
/// off here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct BundleConfig {
    /// Packaging tool executable (looked up on PATH).
    pub tool: String,
    /// Product prefix of the artifact name.
    pub product: String,
    /// Entry-point script, relative to `work_dir`.
    pub entry_point: PathBuf,
    /// Modules force-included in addition to [`HIDDEN_IMPORTS`].
    pub extra_hidden_imports: Vec<String>,
    /// Directory the tool writes the finished executable to.
    pub dist_dir: PathBuf,
    /// Working directory of the tool process. `None` uses the current one.
    #[builder(setter(into, strip_option))]
    pub work_dir: Option<PathBuf>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            product: PRODUCT_NAME.to_string(),
            entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
            extra_hidden_imports: Vec::new(),
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            work_dir: None,
        }
    }
}

impl BundleConfig {
    /// Load a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, BundleError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| BundleError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        log::info!("Loaded bundle config from {}", path.display());
        Ok(config)
    }

    /// Reject configs that cannot form a command line.
    pub fn validate(&self) -> Result<(), BundleError> {
        check_fields(&self.tool, &self.product, &self.entry_point)
            .map_err(BundleError::InvalidConfig)
    }

    /// Every module passed with `--hidden-import`: the fixed list first,
    /// then the extras that are not already in it.
    pub fn hidden_imports(&self) -> impl Iterator<Item = &str> {
        HIDDEN_IMPORTS.iter().copied().chain(
            self.extra_hidden_imports
                .iter()
                .map(String::as_str)
                .filter(|module| !HIDDEN_IMPORTS.contains(module)),
        )
    }

    /// Location of the finished executable for `artifact_name`.
    pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
        let dist = match &self.work_dir {
            Some(dir) if self.dist_dir.is_relative() => dir.join(&self.dist_dir),
            _ => self.dist_dir.clone(),
        };
        dist.join(artifact_name)
    }
}

impl BundleConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = BundleConfig::default();
        check_fields(
            self.tool.as_ref().unwrap_or(&defaults.tool),
            self.product.as_ref().unwrap_or(&defaults.product),
            self.entry_point.as_ref().unwrap_or(&defaults.entry_point),
        )
    }
}

fn check_fields(tool: &str, product: &str, entry_point: &Path) -> Result<(), String> {
    if tool.trim().is_empty() {
        return Err("packaging tool must not be empty".to_string());
    }
    if product.trim().is_empty() {
        return Err("product name must not be empty".to_string());
    }
    if entry_point.as_os_str().is_empty() {
        return Err("entry point must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_stock_command() {
        let config = BundleConfig::default();
        assert_eq!(config.tool, "pyinstaller");
        assert_eq!(config.product, "qwen-tts");
        assert_eq!(config.entry_point, PathBuf::from("server.py"));
        assert!(config.extra_hidden_imports.is_empty());
        assert_eq!(config.hidden_imports().collect::<Vec<_>>(), HIDDEN_IMPORTS);
    }

    #[test]
    fn builder_keeps_defaults_for_unset_fields() {
        let config = BundleConfigBuilder::default()
            .tool("/opt/venv/bin/pyinstaller")
            .work_dir("conductor/qwen-tts")
            .build()
            .unwrap();
        assert_eq!(config.tool, "/opt/venv/bin/pyinstaller");
        assert_eq!(config.work_dir, Some(PathBuf::from("conductor/qwen-tts")));
        assert_eq!(config.entry_point, PathBuf::from("server.py"));
        assert!(config.extra_hidden_imports.is_empty());
    }

    #[test]
    fn builder_rejects_empty_tool() {
        let err = BundleConfigBuilder::default().tool("  ").build().unwrap_err();
        assert!(err.to_string().contains("packaging tool"));
    }

    #[test]
    fn builder_rejects_empty_entry_point() {
        assert!(BundleConfigBuilder::default().entry_point("").build().is_err());
    }

    #[test]
    fn json_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(&path, r#"{ "entry_point": "app.py" }"#).unwrap();

        let config = BundleConfig::from_json_file(&path).unwrap();
        assert_eq!(config.entry_point, PathBuf::from("app.py"));
        assert_eq!(config.tool, DEFAULT_TOOL);
    }

    #[test]
    fn json_cannot_drop_fixed_hidden_imports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(&path, r#"{ "hidden_imports": [], "clean": false }"#).unwrap();

        let config = BundleConfig::from_json_file(&path).unwrap();
        assert_eq!(config.hidden_imports().collect::<Vec<_>>(), HIDDEN_IMPORTS);
    }

    #[test]
    fn extra_hidden_imports_follow_fixed_list() {
        let config = BundleConfigBuilder::default()
            .extra_hidden_imports(vec!["soundfile".to_string(), "scipy".to_string()])
            .build()
            .unwrap();
        let imports: Vec<&str> = config.hidden_imports().collect();
        assert_eq!(&imports[..HIDDEN_IMPORTS.len()], HIDDEN_IMPORTS);
        assert_eq!(&imports[HIDDEN_IMPORTS.len()..], ["soundfile"]);
    }

    #[test]
    fn validate_rejects_blank_product() {
        let config = BundleConfig {
            product: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BundleError::InvalidConfig(_))));
        assert!(BundleConfig::default().validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(&path, "{ not json").unwrap();

        match BundleConfig::from_json_file(&path) {
            Err(BundleError::Config(msg)) => assert!(msg.contains("bundle.json")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn artifact_path_is_under_work_dir_dist() {
        let config = BundleConfigBuilder::default()
            .work_dir("svc")
            .build()
            .unwrap();
        assert_eq!(
            config.artifact_path("qwen-tts-x86_64-unknown-linux-gnu"),
            PathBuf::from("svc/dist/qwen-tts-x86_64-unknown-linux-gnu")
        );
        assert_eq!(
            BundleConfig::default().artifact_path("a"),
            PathBuf::from("dist/a")
        );
    }
}
