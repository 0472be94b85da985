//! Single-file packaging of the Qwen TTS service.
//!
//! The service is frozen into one executable by an external packaging tool
//! (PyInstaller by default). The produced file is named after the host's
//! target triple so builds for different platforms can sit side by side:
//!
//! ```text
//! dist/
//! ├── qwen-tts-aarch64-apple-darwin
//! ├── qwen-tts-x86_64-unknown-linux-gnu
//! └── qwen-tts-x86_64-pc-windows-msvc
//! ```
//!
//! # System Requirements
//!
//! The packaging tool must be on PATH (or configured with an absolute path)
//! and must run in the service directory containing `server.py`:
//! - `pip install pyinstaller`
//!
//! # Example
//!
//! ```rust,no_run
//! use qwen_tts_bundle::bundle::{run_bundle, BundleConfigBuilder, ProcessExecutor};
//! use qwen_tts_bundle::platform::TargetTriple;
//!
//! let config = BundleConfigBuilder::default()
//!     .work_dir("conductor/qwen-tts")
//!     .build()?;
//! let mut executor = ProcessExecutor::in_dir("conductor/qwen-tts");
//! let artifact = run_bundle(&config, &TargetTriple::host(), &mut executor)?;
//! println!("Built {}", artifact.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod config;
pub mod invoker;

pub use command::{artifact_name, BuildCommand};
pub use config::{BundleConfig, BundleConfigBuilder, PRODUCT_NAME};
pub use invoker::{
    run_bundle, run_bundle_with_output, BundleError, CommandExecutor, ProcessExecutor,
};
