//! Spin plan: how far each reel rolls before it stops
//!
//! The front end animates a reel by repeating fixed-length roll steps for the
//! reel's spin duration. Only the resulting step count matters to the outcome,
//! since every step cycles one cell from the top of the reel to the bottom.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Staggered spin schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinPlan {
    /// Spin duration of the first reel (ms)
    pub spin_duration_ms: f64,

    /// Extra spin time for each following reel (ms)
    pub reel_stagger_ms: f64,

    /// Duration of one roll step (ms)
    pub roll_step_ms: f64,

    /// Display scale applied to every duration
    pub scale: f64,

    /// Pre-spin shuffle phase before reels start rolling (ms)
    pub start_delay_ms: f64,

    /// Interval between pre-spin shuffle frames (ms)
    pub shuffle_interval_ms: f64,
}

impl SpinPlan {
    /// Standard schedule: 2s first reel, +300ms per reel, 100ms steps
    pub fn standard() -> Self {
        Self {
            spin_duration_ms: 2000.0,
            reel_stagger_ms: 300.0,
            roll_step_ms: 100.0,
            scale: 1.0,
            start_delay_ms: 1500.0,
            shuffle_interval_ms: 100.0,
        }
    }

    /// Same schedule at another display scale
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            scale,
            ..self.clone()
        }
    }

    /// Spin duration of a reel, scale applied (ms)
    pub fn reel_spin_duration_ms(&self, reel_index: usize) -> f64 {
        (self.spin_duration_ms + reel_index as f64 * self.reel_stagger_ms) * self.scale
    }

    /// Number of roll steps a reel takes before it stops
    pub fn roll_steps(&self, reel_index: usize) -> usize {
        let step = self.roll_step_ms * self.scale;
        (self.reel_spin_duration_ms(reel_index) / step).floor().max(0.0) as usize
    }

    /// Full reshuffles shown before the near-miss layout is dealt
    ///
    /// Frames tick every `shuffle_interval_ms`, starting one interval in. The
    /// first tick with `tick * interval >= start_delay - interval` deals the
    /// near-miss layout instead of reshuffling.
    pub fn shuffle_frames(&self) -> usize {
        let deal_tick =
            ((self.start_delay_ms - self.shuffle_interval_ms) / self.shuffle_interval_ms).ceil();
        deal_tick.max(1.0) as usize - 1
    }

    /// Check that every duration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("spin_duration_ms", self.spin_duration_ms),
            ("reel_stagger_ms", self.reel_stagger_ms),
            ("start_delay_ms", self.start_delay_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTiming(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let positive = [
            ("roll_step_ms", self.roll_step_ms),
            ("scale", self.scale),
            ("shuffle_interval_ms", self.shuffle_interval_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTiming(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for SpinPlan {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staggered_roll_steps() {
        let plan = SpinPlan::standard();
        let steps: Vec<usize> = (0..5).map(|i| plan.roll_steps(i)).collect();
        assert_eq!(steps, vec![20, 23, 26, 29, 32]);
    }

    #[test]
    fn test_scale_shortens_duration_not_steps() {
        let plan = SpinPlan::standard().scaled(0.5);
        assert_eq!(plan.reel_spin_duration_ms(0), 1000.0);
        assert_eq!(plan.roll_steps(0), 20);
    }

    #[test]
    fn test_shuffle_frames() {
        // 1500ms delay, 100ms ticks: ticks 1..=13 reshuffle, tick 14 deals
        assert_eq!(SpinPlan::standard().shuffle_frames(), 13);

        let short = SpinPlan {
            start_delay_ms: 800.0,
            ..SpinPlan::standard()
        };
        assert_eq!(short.shuffle_frames(), 6);

        let uneven = SpinPlan {
            start_delay_ms: 1450.0,
            ..SpinPlan::standard()
        };
        assert_eq!(uneven.shuffle_frames(), 13);

        let one_tick = SpinPlan {
            start_delay_ms: 100.0,
            ..SpinPlan::standard()
        };
        assert_eq!(one_tick.shuffle_frames(), 0);

        let instant = SpinPlan {
            start_delay_ms: 0.0,
            ..SpinPlan::standard()
        };
        assert_eq!(instant.shuffle_frames(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(SpinPlan::standard().validate().is_ok());

        let zero_step = SpinPlan {
            roll_step_ms: 0.0,
            ..SpinPlan::standard()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(ConfigError::InvalidTiming(_))
        ));

        let nan_scale = SpinPlan::standard().scaled(f64::NAN);
        assert!(nan_scale.validate().is_err());

        let negative = SpinPlan {
            reel_stagger_ms: -1.0,
            ..SpinPlan::standard()
        };
        assert!(negative.validate().is_err());
    }
}
