use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::command::{product_artifact_name, BuildCommand};
use super::config::BundleConfig;
use crate::platform::TargetTriple;

#[derive(thiserror::Error, Debug)]
pub enum BundleError {
    #[error("{tool} failed with exit code {}", describe_exit(.code))]
    PackagingFailed { tool: String, code: Option<i32> },
    #[error("Packaging tool '{0}' not found. Install it with `pip install pyinstaller` or set `tool` in the bundle config.")]
    ToolNotFound(String),
    #[error("Failed to start packaging tool: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid bundle config file: {0}")]
    Config(String),
    #[error("Invalid bundle config: {0}")]
    InvalidConfig(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Runs an argv to completion and reports its exit code.
///
/// `Ok(None)` means the process ended without an exit code (killed by a
/// signal). Errors are reserved for failing to start the process at all.
pub trait CommandExecutor {
    fn execute(&mut self, argv: &[String]) -> std::io::Result<Option<i32>>;
}

/// Spawns the command as a child process with inherited stdio and waits.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    work_dir: Option<PathBuf>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(work_dir.into()),
        }
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&mut self, argv: &[String]) -> std::io::Result<Option<i32>> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
        })?;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        let status = command.status()?;
        log::debug!("{program} exited with {status}");
        Ok(status.code())
    }
}

/// Package the service for `triple` and return the artifact path.
///
/// Runs the packaging tool once. Any non-zero exit aborts with
/// [`BundleError::PackagingFailed`]; there is no retry. Progress lines go to
/// stdout.
pub fn run_bundle<E: CommandExecutor>(
    config: &BundleConfig,
    triple: &TargetTriple,
    executor: &mut E,
) -> Result<PathBuf, BundleError> {
    run_bundle_with_output(config, triple, executor, &mut std::io::stdout().lock())
}

/// [`run_bundle`] with progress lines written to `out`.
///
/// The completion line is only written once the tool has exited with 0.
pub fn run_bundle_with_output<E: CommandExecutor, W: Write>(
    config: &BundleConfig,
    triple: &TargetTriple,
    executor: &mut E,
    out: &mut W,
) -> Result<PathBuf, BundleError> {
    writeln!(out, "Starting Qwen TTS bundling process...")?;
    log::info!("Bundling for target {triple}");

    let name = product_artifact_name(&config.product, triple);
    let command = BuildCommand::new(config, &name);

    writeln!(out, "Executing: {command}")?;
    out.flush()?;
    let code = executor.execute(command.argv()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BundleError::ToolNotFound(command.program().to_string())
        } else {
            BundleError::Spawn(e)
        }
    })?;

    if code != Some(0) {
        log::error!("{} exited with {code:?}", command.program());
        return Err(BundleError::PackagingFailed {
            tool: command.program().to_string(),
            code,
        });
    }

    let artifact = config.artifact_path(&name);
    writeln!(out, "Bundling complete. Executable: {}", artifact.display())?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExit(std::io::Result<Option<i32>>);

    impl CommandExecutor for FixedExit {
        fn execute(&mut self, _argv: &[String]) -> std::io::Result<Option<i32>> {
            match &self.0 {
                Ok(code) => Ok(*code),
                Err(e) => Err(std::io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn linux() -> TargetTriple {
        TargetTriple::resolve("linux", "x86_64")
    }

    #[test]
    fn success_returns_dist_path() {
        let path = run_bundle(&BundleConfig::default(), &linux(), &mut FixedExit(Ok(Some(0))))
            .unwrap();
        assert_eq!(path, PathBuf::from("dist/qwen-tts-x86_64-unknown-linux-gnu"));
    }

    #[test]
    fn non_zero_exit_is_packaging_failure() {
        let err = run_bundle(&BundleConfig::default(), &linux(), &mut FixedExit(Ok(Some(2))))
            .unwrap_err();
        match err {
            BundleError::PackagingFailed { tool, code } => {
                assert_eq!(tool, "pyinstaller");
                assert_eq!(code, Some(2));
            }
            other => panic!("expected packaging failure, got {other:?}"),
        }
    }

    #[test]
    fn progress_lines_stop_before_completion_on_failure() {
        let mut out = Vec::new();
        let result = run_bundle_with_output(
            &BundleConfig::default(),
            &linux(),
            &mut FixedExit(Ok(Some(1))),
            &mut out,
        );
        assert!(result.is_err());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Starting Qwen TTS bundling process...\n"));
        assert!(printed.contains("Executing: pyinstaller --onefile"));
        assert!(!printed.contains("Bundling complete"));
    }

    #[test]
    fn completion_line_names_artifact() {
        let mut out = Vec::new();
        run_bundle_with_output(
            &BundleConfig::default(),
            &linux(),
            &mut FixedExit(Ok(Some(0))),
            &mut out,
        )
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed.lines().last(),
            Some("Bundling complete. Executable: dist/qwen-tts-x86_64-unknown-linux-gnu")
        );
    }

    #[test]
    fn signal_termination_is_packaging_failure() {
        let err = run_bundle(&BundleConfig::default(), &linux(), &mut FixedExit(Ok(None)))
            .unwrap_err();
        assert!(matches!(err, BundleError::PackagingFailed { code: None, .. }));
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn missing_tool_is_reported_by_name() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = run_bundle(&BundleConfig::default(), &linux(), &mut FixedExit(Err(missing)))
            .unwrap_err();
        assert!(matches!(err, BundleError::ToolNotFound(ref tool) if tool == "pyinstaller"));
    }

    #[test]
    fn process_executor_rejects_empty_argv() {
        let err = ProcessExecutor::new().execute(&[]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn process_executor_reports_spawn_failure() {
        let argv = vec!["qwen-tts-bundle-no-such-tool".to_string()];
        let err = ProcessExecutor::new().execute(&argv).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn process_executor_returns_exit_code() {
        let mut executor = ProcessExecutor::in_dir(std::env::temp_dir());
        let ok = executor.execute(&["true".to_string()]).unwrap();
        assert_eq!(ok, Some(0));

        let argv = ["sh", "-c", "exit 3"].map(String::from);
        assert_eq!(executor.execute(&argv).unwrap(), Some(3));
    }
}
