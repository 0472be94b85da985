use std::error::Error;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::SynthesisResult;

/// Model variant the service is configured to serve.
pub const MODEL_NAME: &str = "Qwen/Qwen3-TTS-12Hz-0.6B-CustomVoice";

/// Environment variable that overrides [`MODEL_NAME`].
pub const MODEL_ENV_VAR: &str = "QWEN_TTS_MODEL";

/// Model settings of the speech service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub model_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_name: MODEL_NAME.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read the config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(MODEL_ENV_VAR) {
            Some(name) if !name.trim().is_empty() => {
                log::info!("Model overridden by {MODEL_ENV_VAR}: {name}");
                Self { model_name: name }
            }
            _ => Self::default(),
        }
    }
}

/// Audio returned by a generation call.
///
/// Models hand back either one waveform or a batch of them.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedAudio {
    Single(Vec<f32>),
    Sequence(Vec<Vec<f32>>),
}

impl GeneratedAudio {
    /// The waveform to evaluate: the buffer itself, or the first of a batch.
    ///
    /// Returns `None` only for an empty batch.
    pub fn into_primary(self) -> Option<Vec<f32>> {
        match self {
            Self::Single(samples) => Some(samples),
            Self::Sequence(batch) => batch.into_iter().next(),
        }
    }
}

/// Output of [`CustomVoiceModel::generate_custom_voice`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSpeech {
    pub audio: GeneratedAudio,
    pub sample_rate: u32,
}

impl GeneratedSpeech {
    /// Normalize to a single [`SynthesisResult`].
    pub fn into_result(self) -> Option<SynthesisResult> {
        let sample_rate = self.sample_rate;
        self.audio.into_primary().map(|samples| SynthesisResult {
            samples,
            sample_rate,
        })
    }
}

/// A loaded speech model that speaks with a named preset voice.
pub trait CustomVoiceModel {
    fn generate_custom_voice(
        &self,
        text: &str,
        speaker: &str,
        language: &str,
    ) -> Result<GeneratedSpeech, Box<dyn Error>>;
}

/// Loads a model by its identifier (e.g. a hub repository name).
pub trait ModelLoader {
    type Model: CustomVoiceModel;

    fn load(&self, model_name: &str) -> Result<Self::Model, Box<dyn Error>>;
}

/// Holds the lazily loaded model for the lifetime of the context.
///
/// The first call to [`ModelContext::model`] loads it, every later call
/// returns the same instance. Loading happens behind a one-time barrier, so
/// concurrent callers never load twice. A failed load leaves the context
/// empty and the next call tries again.
pub struct ModelContext<L: ModelLoader> {
    loader: L,
    model_name: String,
    model: OnceLock<L::Model>,
    init: Mutex<()>,
}

impl<L: ModelLoader> ModelContext<L> {
    pub fn new(loader: L, model_name: impl Into<String>) -> Self {
        Self {
            loader,
            model_name: model_name.into(),
            model: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn from_config(loader: L, config: &ServiceConfig) -> Self {
        Self::new(loader, config.model_name.clone())
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[cfg(test)]
    pub(crate) fn loader(&self) -> &L {
        &self.loader
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Get the model, loading it on first use.
    pub fn model(&self) -> Result<&L::Model, Box<dyn Error>> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        log::info!("Loading model {}", self.model_name);
        let start = Instant::now();
        let model = self.loader.load(&self.model_name)?;
        log::debug!("Model {} loaded in {:.2?}", self.model_name, start.elapsed());

        Ok(self.model.get_or_init(|| model))
    }
}
