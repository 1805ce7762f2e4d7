//! Fire-and-forget text to speech.
//!
//! [`SpeechAnnouncer`] turns a number into an [`Utterance`] and hands it to a
//! platform [`SpeechSink`]. Nothing waits on the sink and no completion is
//! reported back; a missing speech capability is a silent no-op.

use std::sync::Arc;

use crate::error::SpeechSettingsError;

/// Voice configuration applied to every utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    locale: String,
    rate: f32,
    pitch: f32,
}

impl SpeechSettings {
    /// # Errors
    ///
    /// Returns `SpeechSettingsError` for an empty locale, a rate outside
    /// `0.1..=10` or a pitch outside `0..=2`.
    pub fn new(locale: impl Into<String>, rate: f32, pitch: f32) -> Result<Self, SpeechSettingsError> {
        let locale = locale.into().trim().to_string();
        if locale.is_empty() {
            return Err(SpeechSettingsError::EmptyLocale);
        }
        if !(0.1..=10.0).contains(&rate) {
            return Err(SpeechSettingsError::RateOutOfRange(rate));
        }
        if !(0.0..=2.0).contains(&pitch) {
            return Err(SpeechSettingsError::PitchOutOfRange(pitch));
        }
        Ok(Self {
            locale,
            rate,
            pitch,
        })
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 0.8,
            pitch: 1.0,
        }
    }
}

/// What the platform is asked to say.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Platform speech capability.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}

/// Sink that never speaks, for tests and hosts that run without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl SpeechSink for SilentSink {
    fn speak(&self, utterance: &Utterance) {
        tracing::debug!(text = %utterance.text, "silent sink; utterance skipped");
    }
}

#[derive(Clone)]
pub struct SpeechAnnouncer {
    settings: SpeechSettings,
    sink: Arc<dyn SpeechSink>,
}

impl SpeechAnnouncer {
    #[must_use]
    pub fn new(settings: SpeechSettings, sink: Arc<dyn SpeechSink>) -> Self {
        Self { settings, sink }
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::new(SpeechSettings::default(), Arc::new(SilentSink))
    }

    #[must_use]
    pub fn utterance_for(&self, number: u32) -> Utterance {
        Utterance {
            text: number.to_string(),
            locale: self.settings.locale.clone(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
        }
    }

    pub fn announce(&self, number: u32) {
        let utterance = self.utterance_for(number);
        tracing::debug!(number, locale = %utterance.locale, "announcing number");
        self.sink.speak(&utterance);
    }
}

impl std::fmt::Debug for SpeechAnnouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAnnouncer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
