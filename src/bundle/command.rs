use std::fmt;

use super::config::{BundleConfig, DEFAULT_DIST_DIR, HIDDEN_IMPORTS, PRODUCT_NAME};
use crate::platform::TargetTriple;

/// Canonical artifact name: `qwen-tts-<arch>-<os-vendor-abi>`.
pub fn artifact_name(triple: &TargetTriple) -> String {
    product_artifact_name(PRODUCT_NAME, triple)
}

/// Artifact name for an arbitrary product prefix.
pub fn product_artifact_name(product: &str, triple: &TargetTriple) -> String {
    format!("{product}-{triple}")
}

/// A fully assembled packaging-tool invocation.
///
/// The argument order is fixed: output mode, name, cache flag, output
/// directory (only when not the default), hidden imports, then the entry
/// point as the single positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    argv: Vec<String>,
}

impl BuildCommand {
    pub fn new(config: &BundleConfig, artifact_name: &str) -> Self {
        let mut argv = Vec::with_capacity(HIDDEN_IMPORTS.len() + 6);
        argv.push(config.tool.clone());
        argv.push("--onefile".to_string());
        argv.push(format!("--name={artifact_name}"));
        argv.push("--clean".to_string());
        if config.dist_dir.as_os_str() != DEFAULT_DIST_DIR {
            argv.push(format!("--distpath={}", config.dist_dir.display()));
        }
        argv.extend(
            config
                .hidden_imports()
                .map(|module| format!("--hidden-import={module}")),
        );
        argv.push(config.entry_point.to_string_lossy().into_owned());
        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn entry_point(&self) -> &str {
        &self.argv[self.argv.len() - 1]
    }

    pub fn hidden_imports(&self) -> impl Iterator<Item = &str> {
        self.argv
            .iter()
            .filter_map(|arg| arg.strip_prefix("--hidden-import="))
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
