use serde::{Deserialize, Serialize};
use validator::ValidationError;
use crate::constants::{DEFAULT_MAX_SELECTABLE, DEFAULT_MIN_SELECTABLE};
use crate::validation::validate_selectable_bounds;

/// Inclusive bounds on how many active entries permit a spin.
///
/// Only gates the spin affordance. The wheel itself will spin over any
/// non-empty set of labels it is handed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawSpinConfiguration")]
pub struct SpinConfiguration {
    min_selectable: usize,
    max_selectable: usize,
}

#[derive(Deserialize)]
struct RawSpinConfiguration {
    min_selectable: usize,
    max_selectable: usize,
}

impl TryFrom<RawSpinConfiguration> for SpinConfiguration {
    type Error = ValidationError;

    fn try_from(raw: RawSpinConfiguration) -> Result<Self, Self::Error> {
        Self::new(raw.min_selectable, raw.max_selectable)
    }
}

impl SpinConfiguration {
    pub fn new(min_selectable: usize, max_selectable: usize) -> Result<Self, ValidationError> {
        validate_selectable_bounds(min_selectable, max_selectable)?;
        Ok(Self { min_selectable, max_selectable })
    }

    pub fn min_selectable(&self) -> usize {
        self.min_selectable
    }

    pub fn max_selectable(&self) -> usize {
        self.max_selectable
    }

    /// Whether `count` active entries lies within the configured bounds.
    pub fn admits(&self, count: usize) -> bool {
        (self.min_selectable..=self.max_selectable).contains(&count)
    }
}

impl Default for SpinConfiguration {
    fn default() -> Self {
        Self {
            min_selectable: DEFAULT_MIN_SELECTABLE,
            max_selectable: DEFAULT_MAX_SELECTABLE,
        }
    }
}
