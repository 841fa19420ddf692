use core::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

/// Tunables shared by the tracker, drag controller and fall simulator.
///
/// Distances are in world units (pixels with the default 2D camera), durations
/// in seconds unless typed as [`Duration`].
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DragFallSettings {
    /// Pointer sampling cadence while a drag is tracked.
    pub sample_interval: Duration,
    /// Distance from each horizontal viewport edge that starts auto-scrolling.
    pub edge_margin: f32,
    /// Normalized scroll units per second before damping.
    pub scroll_speed: f32,
    /// Fraction of the per-frame scroll step applied, in `(0, 1]`.
    pub scroll_damping: f32,
    /// Scale while lifted.
    pub lift_scale: f32,
    pub scale_duration: f32,
    /// World units per second.
    pub fall_speed: f32,
    pub snap_duration: f32,
    pub bounce_height: f32,
    pub rebound_height: f32,
    pub bounce_step_duration: f32,
}

impl Default for DragFallSettings {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(16),
            edge_margin: 100.0,
            scroll_speed: 5.0,
            scroll_damping: 0.1,
            lift_scale: 1.5,
            scale_duration: 0.4,
            fall_speed: 2500.0,
            snap_duration: 0.3,
            bounce_height: 30.0,
            rebound_height: 15.0,
            bounce_step_duration: 0.1,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("Sample interval must be greater than zero")]
    ZeroSampleInterval,

    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("Edge margin must be a non-negative finite number, got {0}")]
    InvalidEdgeMargin(f32),

    #[error("Scroll damping must lie in (0, 1], got {0}")]
    DampingOutOfRange(f32),
}

impl DragFallSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.sample_interval.is_zero() {
            return Err(SettingsError::ZeroSampleInterval);
        }

        if !self.edge_margin.is_finite() || self.edge_margin < 0.0 {
            return Err(SettingsError::InvalidEdgeMargin(self.edge_margin));
        }

        if !(self.scroll_damping > 0.0 && self.scroll_damping <= 1.0) {
            return Err(SettingsError::DampingOutOfRange(self.scroll_damping));
        }

        let positives = [
            ("scroll_speed", self.scroll_speed),
            ("lift_scale", self.lift_scale),
            ("scale_duration", self.scale_duration),
            ("fall_speed", self.fall_speed),
            ("snap_duration", self.snap_duration),
            ("bounce_height", self.bounce_height),
            ("rebound_height", self.rebound_height),
            ("bounce_step_duration", self.bounce_step_duration),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NotPositive { name, value });
            }
        }

        Ok(())
    }
}
