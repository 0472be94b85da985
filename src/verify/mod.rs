//! Post-packaging performance verification of the synthesis engine.
//!
//! Two independent checks:
//! - **identity**: the service's configured model is exactly
//!   [`EXPECTED_MODEL_NAME`], so a model swap never goes unnoticed;
//! - **load and generate**: the model loads once through a [`ModelContext`],
//!   one fixed generation request produces non-empty audio at
//!   [`EXPECTED_SAMPLE_RATE`], and load time, generation time and real-time
//!   factor are reported.
//!
//! The engine itself is supplied by the caller through [`ModelLoader`] and
//! [`CustomVoiceModel`].
//!
//! # Example
//!
//! ```rust,ignore
//! use qwen_tts_bundle::verify::{
//!     check_load_and_generate, check_model_identifier, GenerationRequest, ModelContext,
//!     ServiceConfig, EXPECTED_MODEL_NAME,
//! };
//!
//! let config = ServiceConfig::from_env();
//! check_model_identifier(&config.model_name, EXPECTED_MODEL_NAME)?;
//!
//! let ctx = ModelContext::from_config(MyQwenLoader::new(), &config);
//! let run = check_load_and_generate(&ctx, &GenerationRequest::default())?;
//! println!("Real-time factor: {:.2}x", run.metrics.real_time_factor());
//! run.audio.write_wav(std::path::Path::new("speed_test.wav"))?;
//! ```

pub mod harness;
pub mod model;

pub use harness::{
    check_load_and_generate, check_model_identifier, GenerationMetrics, GenerationRequest,
    GenerationRun, VerificationFailure, EXPECTED_MODEL_NAME, EXPECTED_SAMPLE_RATE,
};
pub use model::{
    CustomVoiceModel, GeneratedAudio, GeneratedSpeech, ModelContext, ModelLoader, ServiceConfig,
    MODEL_NAME,
};
