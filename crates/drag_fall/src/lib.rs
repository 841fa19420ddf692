//! Pointer dragging for 2D entities, with edge scrolling of the containing
//! viewport and a short fall onto whatever lies below after release.

use bevy::prelude::*;

pub mod bounds;
pub mod drag;
pub mod fall;
pub mod obstacle;
pub mod pointer;
pub mod settings;
pub mod tween;
pub mod viewport;

#[cfg(test)]
mod test_support;

use drag::DragPlugin;
use fall::FallPlugin;
use obstacle::ObstaclePlugin;
use pointer::{PointerTracker, PointerTrackerPlugin};
use settings::DragFallSettings;
use tween::TweenPlugin;
use viewport::ViewportPlugin;

pub mod prelude {
    pub use crate::bounds::Footprint;
    pub use crate::drag::{DragSession, DragState, Draggable};
    pub use crate::fall::{FallCompleted, Falling, StartFall};
    pub use crate::obstacle::{InnerRegion, Obstacle, ObstacleKind, ObstacleTag, RegionBounds};
    pub use crate::pointer::{PointerCapturePlugin, PointerInput, TrackingStopped};
    pub use crate::settings::{DragFallSettings, SettingsError};
    pub use crate::viewport::{ScrollContent, ScrollViewport};
    pub use crate::{DragFallPlugin, DragFallSet};
}

/// Per-frame order of the drag and fall systems, all in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragFallSet {
    Sample,
    Drag,
    Fall,
    Settle,
    Animate,
}

#[derive(Default)]
pub struct DragFallPlugin {
    pub settings: DragFallSettings,
}

impl Plugin for DragFallPlugin {
    fn build(&self, app: &mut App) {
        let settings = match self.settings.validate() {
            Ok(()) => self.settings.clone(),
            Err(error) => {
                error!("Invalid drag settings, using defaults: {error}");
                DragFallSettings::default()
            }
        };

        app.insert_resource(PointerTracker::new(settings.sample_interval))
            .insert_resource(settings)
            .configure_sets(
                Update,
                (
                    DragFallSet::Sample,
                    DragFallSet::Drag,
                    DragFallSet::Fall,
                    DragFallSet::Settle,
                    DragFallSet::Animate,
                )
                    .chain(),
            )
            .add_plugins((
                ObstaclePlugin,
                PointerTrackerPlugin,
                DragPlugin,
                FallPlugin,
                TweenPlugin,
                ViewportPlugin,
            ));
    }
}
