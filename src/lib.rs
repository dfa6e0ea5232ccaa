use bevy::prelude::*;

pub mod preview {
    pub mod rotator;
    pub mod systems;
    pub mod trails;
    pub mod ui;
}

pub mod build {
    pub mod automation;
    pub mod pipeline;
    pub mod window;
}

pub use preview::systems::PreviewPlugin;
pub use build::window::BuildWindowPlugin;

// scene markers the preview systems look for

#[derive(Component)]
pub struct PreviewCamera;

#[derive(Component)]
pub struct PreviewTarget;

// empty entity at the top of the product, the mouse tilts around it
#[derive(Component)]
pub struct PreviewPivot;

// widgets hidden until the user gets control
#[derive(Component)]
pub struct PreviewControl;

#[derive(Event, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrailSelected(pub usize);

#[derive(Event, Debug, Copy, Clone)]
pub struct ControlsRevealed;
