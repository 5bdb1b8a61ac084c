use serde::Deserialize;
use std::ops::Range;

use crate::error::AppResult;

/// Element id of the optional JSON config block in the host page
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Half-open numeric range `[min, max)` used for randomized shape attributes
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> Range<f64> {
        self.min..self.max
    }

    /// Draw a value from the span; degenerate spans yield `min`
    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.range())
        } else {
            self.min
        }
    }
}

/// Settings for the animated heart/pulse background
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub heart_count: usize,
    pub pulse_count: usize,
    pub heart_size: Span,
    pub heart_speed: Span,
    pub heart_opacity: Span,
    /// Progress added to every pulse trace per frame
    pub pulse_increment: f64,
    /// Horizontal extent of the pulse waveform in pixels
    pub pulse_width: f64,
    pub pulse_alpha: f32,
    pub heart_line_width: f32,
    pub pulse_line_width: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            heart_count: 15,
            pulse_count: 5,
            heart_size: Span::new(10.0, 30.0),
            heart_speed: Span::new(0.1, 0.6),
            heart_opacity: Span::new(0.1, 0.6),
            pulse_increment: 0.001,
            pulse_width: 100.0,
            pulse_alpha: 0.2,
            heart_line_width: 1.0,
            pulse_line_width: 2.0,
        }
    }
}

/// Settings for the simulated chat assistant
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub reply_delay_ms: u32,
    pub canned_reply: String,
    pub history_key_prefix: String,
    pub voice_placeholder: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            canned_reply: "I understand you're interested in health information. How can I assist you today?"
                .to_string(),
            history_key_prefix: "chat_history_".to_string(),
            voice_placeholder:
                "Voice input detected. In a real implementation, this would be converted to text."
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backdrop: BackdropConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read overrides from the host page, falling back to defaults
    pub fn load() -> Self {
        let Some(raw) = gloo_utils::document()
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };

        if raw.trim().is_empty() {
            return Self::default();
        }

        match Self::from_json(&raw) {
            Ok(config) => {
                log::debug!("loaded app config overrides");
                config
            }
            Err(e) => {
                log::warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backdrop.heart_count, 15);
        assert_eq!(config.backdrop.pulse_count, 5);
        assert_eq!(config.backdrop.pulse_increment, 0.001);
        assert_eq!(config.chat.reply_delay_ms, 1000);
        assert_eq!(config.chat.history_key_prefix, "chat_history_");
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{ "backdrop": { "heart_count": 3 }, "chat": { "reply_delay_ms": 250 } }"#,
        )
        .unwrap();

        assert_eq!(config.backdrop.heart_count, 3);
        assert_eq!(config.backdrop.pulse_count, 5);
        assert_eq!(config.chat.reply_delay_ms, 250);
        assert_eq!(config.chat.canned_reply, ChatConfig::default().canned_reply);
    }

    #[test]
    fn test_malformed_rejected() {
        assert!(AppConfig::from_json("{ backdrop: ").is_err());
    }

    #[test]
    fn test_span_sample_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let span = Span::new(10.0, 30.0);
        for _ in 0..100 {
            let v = span.sample(&mut rng);
            assert!((10.0..30.0).contains(&v));
        }
        assert_eq!(Span::new(4.0, 4.0).sample(&mut rng), 4.0);
    }
}
