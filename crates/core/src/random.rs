use crate::model::DifficultyTier;

/// Source of uniform values in `[0, 1)`.
///
/// Injected into [`NumberGenerator`] so tests can replay a known sequence.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values outside `[0, 1)` are clamped into range.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }
}

/// Draws the number for each round from a tier's range.
pub struct NumberGenerator {
    source: Box<dyn RandomSource>,
}

impl NumberGenerator {
    #[must_use]
    pub fn new(source: Box<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// `floor(r * (max - min + 1)) + min`, clamped to the tier's bounds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn generate(&mut self, tier: DifficultyTier) -> u32 {
        let range = tier.range();
        let r = self.source.next_unit();
        let offset = (r * f64::from(range.span())).floor() as u32;
        range.min().saturating_add(offset).min(range.max())
    }
}

impl std::fmt::Debug for NumberGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberGenerator").finish_non_exhaustive()
    }
}
