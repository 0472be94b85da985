//! # qwen-tts-bundle
//!
//! Packaging and performance verification for the Qwen3-TTS speech service.
//!
//! ## Features
//!
//! - **Target naming**: canonical `<arch>-<os-vendor-abi>` triple of the host,
//!   used to name the single-file executable
//! - **Packaging**: drives PyInstaller to freeze the service into one file
//! - **Verification**: one-shot load + generate probe with output-format checks
//!   and latency reporting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qwen_tts_bundle::bundle::{artifact_name, run_bundle, BundleConfig, ProcessExecutor};
//! use qwen_tts_bundle::platform::TargetTriple;
//!
//! let triple = TargetTriple::host();
//! println!("Building {}", artifact_name(&triple));
//!
//! let artifact = run_bundle(&BundleConfig::default(), &triple, &mut ProcessExecutor::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bundle;
pub mod platform;
pub mod verify;

use std::path::Path;

/// Audio produced by a single generation call.
///
/// Contains raw f32 audio samples and the sample rate of the output audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio (24000 for the 12 Hz Qwen3-TTS models)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        log::debug!("Wrote {} samples to {}", self.samples.len(), path.display());
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
