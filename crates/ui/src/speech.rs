use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dioxus::document;
use dioxus::prelude::spawn;
use services::{SpeechSink, Utterance};

/// Speaks through the webview's `speechSynthesis`, when the platform has it.
#[derive(Debug, Clone, Default)]
pub struct WebSpeechSink {
    unavailable_reported: Arc<AtomicBool>,
}

impl SpeechSink for WebSpeechSink {
    fn speak(&self, utterance: &Utterance) {
        let script = document::eval(&speech_script(utterance));
        let sink = self.clone();
        spawn(async move {
            let spoken = script.join::<bool>().await.ok();
            sink.note_outcome(spoken);
        });
    }
}

impl WebSpeechSink {
    /// Warn the first time the webview could not speak; returns whether it did.
    fn note_outcome(&self, spoken: Option<bool>) -> bool {
        if spoken == Some(true) {
            return false;
        }
        if self.unavailable_reported.swap(true, Ordering::Relaxed) {
            tracing::debug!("speech unavailable; utterance skipped");
            return false;
        }
        tracing::warn!("speech synthesis unavailable; numbers will not be spoken");
        true
    }
}

/// Script that queues `utterance`, or does nothing without speech support.
#[must_use]
pub fn speech_script(utterance: &Utterance) -> String {
    format!(
        r"(function() {{
            if (!('speechSynthesis' in window)) {{
                return false;
            }}
            const utterance = new SpeechSynthesisUtterance({text:?});
            utterance.lang = {lang:?};
            utterance.rate = {rate};
            utterance.pitch = {pitch};
            window.speechSynthesis.speak(utterance);
            return true;
        }})();",
        text = utterance.text,
        lang = utterance.locale,
        rate = utterance.rate,
        pitch = utterance.pitch,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::{SpeechAnnouncer, SpeechSettings};

    fn utterance(text: &str) -> Utterance {
        let settings = SpeechSettings::default();
        Utterance {
            text: text.to_string(),
            locale: settings.locale().to_string(),
            rate: settings.rate(),
            pitch: settings.pitch(),
        }
    }

    #[test]
    fn script_guards_missing_speech_support() {
        let js = speech_script(&SpeechAnnouncer::silent().utterance_for(42));
        assert!(js.contains("'speechSynthesis' in window"));
        assert!(js.contains("return false;"));
    }

    #[test]
    fn script_carries_text_and_voice_settings() {
        let js = speech_script(&SpeechAnnouncer::silent().utterance_for(999_999));
        assert!(js.contains(r#"new SpeechSynthesisUtterance("999999")"#), "{js}");
        assert!(js.contains(r#"utterance.lang = "en-US";"#), "{js}");
        assert!(js.contains("utterance.rate = 0.8;"), "{js}");
        assert!(js.contains("utterance.pitch = 1;"), "{js}");
    }

    #[test]
    fn unavailable_speech_warns_once() {
        let sink = WebSpeechSink::default();
        assert!(!sink.note_outcome(Some(true)));
        assert!(sink.note_outcome(Some(false)));
        assert!(!sink.note_outcome(None));
        assert!(!sink.note_outcome(Some(false)));

        // Clones share the flag.
        assert!(!sink.clone().note_outcome(None));
        assert!(WebSpeechSink::default().note_outcome(None));
    }

    #[test]
    fn text_is_escaped_as_a_string_literal() {
        let js = speech_script(&utterance("a\"b"));
        assert!(js.contains(r#"SpeechSynthesisUtterance("a\"b")"#), "{js}");
    }
}
