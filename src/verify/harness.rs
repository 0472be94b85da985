use std::time::Instant;

use serde::Serialize;

use super::model::{CustomVoiceModel, ModelContext, ModelLoader};
use crate::SynthesisResult;

/// Model variant the service is expected to run.
///
/// Kept as its own literal rather than reusing the service constant, so a
/// silent model swap in the service is caught.
pub const EXPECTED_MODEL_NAME: &str = "Qwen/Qwen3-TTS-12Hz-0.6B-CustomVoice";

/// Output sample rate of the 12 Hz tokenizer's decoder.
pub const EXPECTED_SAMPLE_RATE: u32 = 24000;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VerificationFailure {
    #[error("Configured model '{actual}' does not match expected '{expected}'")]
    ModelMismatch { expected: String, actual: String },
    #[error("Model failed to load: {0}")]
    ModelLoad(String),
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Generated audio is empty")]
    EmptyAudio,
    #[error("Sample rate {actual} Hz does not match expected {expected} Hz")]
    SampleRate { expected: u32, actual: u32 },
}

/// Fixed inputs of the latency probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub text: String,
    pub speaker: String,
    pub language: String,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            text: "This is a speed test for the 0.6B model.".to_string(),
            speaker: "Aiden".to_string(),
            language: "English".to_string(),
        }
    }
}

/// Timing and shape of one load + generate cycle.
///
/// Only produced by [`check_load_and_generate`], after the audio has been
/// checked to be non-empty with a positive sample rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMetrics {
    model_identifier: String,
    text: String,
    speaker: String,
    language: String,
    load_duration_seconds: f64,
    generation_duration_seconds: f64,
    audio_sample_count: usize,
    sample_rate_hz: u32,
}

impl GenerationMetrics {
    pub fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn load_duration_seconds(&self) -> f64 {
        self.load_duration_seconds
    }

    pub fn generation_duration_seconds(&self) -> f64 {
        self.generation_duration_seconds
    }

    pub fn audio_sample_count(&self) -> usize {
        self.audio_sample_count
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Length of the generated audio in seconds. Always positive.
    pub fn audio_duration_secs(&self) -> f64 {
        self.audio_sample_count as f64 / self.sample_rate_hz as f64
    }

    /// Generation time divided by audio duration; below 1.0 is faster than
    /// real time.
    pub fn real_time_factor(&self) -> f64 {
        self.generation_duration_seconds / self.audio_duration_secs()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of a passing [`check_load_and_generate`].
#[derive(Debug)]
pub struct GenerationRun {
    pub metrics: GenerationMetrics,
    pub audio: SynthesisResult,
}

/// Exact-match check of the configured model identifier.
pub fn check_model_identifier(configured: &str, expected: &str) -> Result<(), VerificationFailure> {
    if configured == expected {
        Ok(())
    } else {
        Err(VerificationFailure::ModelMismatch {
            expected: expected.to_string(),
            actual: configured.to_string(),
        })
    }
}

/// Load the model through `ctx`, run one generation, and check its output.
///
/// Latency is measured and reported but not bounded.
pub fn check_load_and_generate<L: ModelLoader>(
    ctx: &ModelContext<L>,
    request: &GenerationRequest,
) -> Result<GenerationRun, VerificationFailure> {
    let start = Instant::now();
    let model = ctx
        .model()
        .map_err(|e| VerificationFailure::ModelLoad(e.to_string()))?;
    let load_duration = start.elapsed();
    log::info!("Model {} ready in {:.2}s", ctx.model_name(), load_duration.as_secs_f64());

    log::info!(
        "Generating speech for {:?} with speaker {} ({})",
        request.text,
        request.speaker,
        request.language
    );
    let start = Instant::now();
    let speech = model
        .generate_custom_voice(&request.text, &request.speaker, &request.language)
        .map_err(|e| VerificationFailure::Generation(e.to_string()))?;
    let generation_duration = start.elapsed();

    let audio = speech.into_result().ok_or(VerificationFailure::EmptyAudio)?;
    if audio.samples.is_empty() {
        return Err(VerificationFailure::EmptyAudio);
    }
    if audio.sample_rate != EXPECTED_SAMPLE_RATE {
        return Err(VerificationFailure::SampleRate {
            expected: EXPECTED_SAMPLE_RATE,
            actual: audio.sample_rate,
        });
    }

    let metrics = GenerationMetrics {
        model_identifier: ctx.model_name().to_string(),
        text: request.text.clone(),
        speaker: request.speaker.clone(),
        language: request.language.clone(),
        load_duration_seconds: load_duration.as_secs_f64(),
        generation_duration_seconds: generation_duration.as_secs_f64(),
        audio_sample_count: audio.samples.len(),
        sample_rate_hz: audio.sample_rate,
    };

    log::info!(
        "Generated {:.2}s audio in {:.2}s",
        metrics.audio_duration_secs(),
        metrics.generation_duration_seconds()
    );
    log::info!("Real-time factor: {:.2}x", metrics.real_time_factor());

    Ok(GenerationRun { metrics, audio })
}
