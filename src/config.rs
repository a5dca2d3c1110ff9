use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunables for the particle spawner
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub spawn_interval_ms: u64,
    pub heart_weight: f64,      // Chance a tick spawns a heart instead of a flower
    pub burst_probability: f64, // Chance a tick also spawns one of each kind
    pub lifetime_range: (u64, u64),
    pub scale_range: (f64, f64),
    pub drift_range: (f64, f64),
    pub base_size: f64,
    pub rise: f64, // Vertical travel over the lifetime (upward)
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub removal_delay_ms: u64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 520,
            heart_weight: 0.55,
            burst_probability: 0.12,
            lifetime_range: (3800, 5600),
            scale_range: (0.7, 1.6),
            drift_range: (-60.0, 60.0),
            base_size: 20.0,
            rise: 420.0,
            fade_in_ms: 600,
            fade_out_ms: 600,
            removal_delay_ms: 500,
        }
    }
}

impl SpawnerConfig {
    /// Reject settings the spawner cannot sample from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        check_probability("heart_weight", self.heart_weight)?;
        check_probability("burst_probability", self.burst_probability)?;

        let (lo, hi) = self.lifetime_range;
        if lo > hi {
            return Err(ConfigError::InvertedRange {
                field: "lifetime_range",
                min: lo as f64,
                max: hi as f64,
            });
        }
        check_range("scale_range", self.scale_range)?;
        check_range("drift_range", self.drift_range)?;
        if self.scale_range.0 <= 0.0 {
            return Err(ConfigError::InvertedRange {
                field: "scale_range",
                min: self.scale_range.0,
                max: self.scale_range.1,
            });
        }
        Ok(())
    }

    /// Total time from spawn until a particle with `lifetime_ms` is detached
    pub fn removal_after(&self, lifetime_ms: u64) -> u64 {
        lifetime_ms + self.fade_out_ms + self.removal_delay_ms
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

fn check_range(field: &'static str, (min, max): (f64, f64)) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

/// Which container ids the spawner mounts into
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MountConfig {
    pub primary: String,
    pub fallback: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            primary: "globalAnimation".to_string(),
            fallback: "animationArea".to_string(),
        }
    }
}

/// Regions the terminal stage publishes
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub global_layer: bool,
    pub panel: bool,
    pub cell_width_px: u16,  // Used when the terminal doesn't report pixels
    pub cell_height_px: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            global_layer: true,
            panel: true,
            cell_width_px: 8,
            cell_height_px: 16,
        }
    }
}

/// Runtime options for `termbloom run`
#[derive(Clone, Debug)]
pub struct BloomConfig {
    pub spawner: SpawnerConfig,
    pub mount: MountConfig,
    pub layout: LayoutConfig,
    pub time_step: f32,
    pub seed: Option<u64>,
    pub reduced_motion: bool,
}
