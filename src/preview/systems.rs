use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::preview::rotator::{PreviewFrame, PreviewRotator, PreviewSettings};
use crate::preview::{trails, ui};
use crate::{ControlsRevealed, PreviewCamera, PreviewPivot, PreviewTarget, TrailSelected};

// entities resolved once after the scene has spawned
#[derive(Resource, Debug, Copy, Clone)]
pub struct PreviewRig {
    pub camera: Entity,
    pub target: Entity,
    pub pivot: Option<Entity>,
}

/// Cursor position in y-up screen space, held when the cursor leaves the window.
#[derive(Resource, Default, Debug, Copy, Clone)]
pub struct PointerSample(pub Vec2);

pub struct PreviewPlugin;

impl Plugin for PreviewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PreviewSettings>()
            .init_resource::<PointerSample>()
            .add_event::<TrailSelected>()
            .add_event::<ControlsRevealed>()
            .add_systems(
                PostStartup,
                (
                    (sample_pointer, init_preview).chain(),
                    (trails::build_trail_roster, ui::spawn_preview_controls).chain(),
                ),
            )
            .add_systems(
                Update,
                (sample_pointer, tick_preview, ui::reveal_controls).chain(),
            )
            .add_systems(
                Update,
                (
                    ui::axis_button_clicks,
                    ui::dropdown_header_clicks,
                    ui::trail_option_clicks,
                    ui::button_feedback,
                ),
            )
            .add_systems(
                Update,
                (
                    trails::apply_trail_selection,
                    trails::record_trails,
                    trails::draw_trails.run_if(resource_exists::<GizmoConfigStore>),
                )
                    .chain()
                    .after(ui::trail_option_clicks)
                    .after(tick_preview),
            );
    }
}

pub fn sample_pointer(
    mut pointer: ResMut<PointerSample>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else { return };

    // bevy's cursor origin is top left, the tilt math wants y up
    if let Some(pos) = window.cursor_position() {
        pointer.0 = Vec2::new(pos.x, window.height() - pos.y);
    }
}

pub fn init_preview(
    mut commands: Commands,
    settings: Res<PreviewSettings>,
    pointer: Res<PointerSample>,
    cameras: Query<(Entity, Has<PreviewCamera>), With<Camera3d>>,
    targets: Query<Entity, With<PreviewTarget>>,
    pivots: Query<(Entity, &Transform), With<PreviewPivot>>,
) {
    // tagged camera first, any 3d camera otherwise
    let camera = cameras
        .iter()
        .find(|(_, tagged)| *tagged)
        .or_else(|| cameras.iter().next())
        .map(|(entity, _)| entity);
    let target = targets.iter().next();

    let mut pivot = pivots.iter().next();
    if pivot.is_some_and(|(entity, _)| Some(entity) == camera || Some(entity) == target) {
        error!("PreviewPivot must sit on its own entity, not the camera or the product.");
        pivot = None;
    }

    let rotator = PreviewRotator::new(*settings, pivot.map(|(_, t)| t.rotation), pointer.0);
    commands.insert_resource(rotator);

    let Some(camera) = camera else {
        error!("No 3d camera found for the preview.");
        return;
    };
    let Some(target) = target else {
        error!("No PreviewTarget found. Tag the product entity with PreviewTarget.");
        return;
    };

    commands.insert_resource(PreviewRig {
        camera,
        target,
        pivot: pivot.map(|(entity, _)| entity),
    });
    info!("preview rig ready: camera {camera}, target {target}");
}

pub fn tick_preview(
    time: Res<Time>,
    pointer: Res<PointerSample>,
    rig: Option<Res<PreviewRig>>,
    rotator: Option<ResMut<PreviewRotator>>,
    mut transforms: Query<&mut Transform>,
    mut revealed: EventWriter<ControlsRevealed>,
    mut reported: Local<bool>,
) {
    let (Some(rig), Some(mut rotator)) = (rig, rotator) else { return };
    let dt = time.delta_secs();

    let ticked = match rig.pivot {
        Some(pivot) => transforms
            .get_many_mut([rig.camera, rig.target, pivot])
            .map(|[mut camera, mut target, mut pivot]| {
                let mut frame = PreviewFrame {
                    camera: &mut *camera,
                    target: &mut *target,
                    pivot: Some(&mut *pivot),
                };
                rotator.tick(&mut frame, dt, pointer.0)
            }),
        None => transforms
            .get_many_mut([rig.camera, rig.target])
            .map(|[mut camera, mut target]| {
                let mut frame = PreviewFrame {
                    camera: &mut *camera,
                    target: &mut *target,
                    pivot: None,
                };
                rotator.tick(&mut frame, dt, pointer.0)
            }),
    };

    // a despawned rig entity would otherwise log every frame
    let outcome = match ticked {
        Ok(outcome) => outcome,
        Err(err) => {
            if !*reported {
                error!("Preview rig lost its transforms, rotation paused: {err}");
                *reported = true;
            }
            return;
        }
    };

    if outcome.phase_changed {
        info!("preview phase -> {:?}", rotator.phase());
    }
    if outcome.controls_revealed {
        revealed.write(ControlsRevealed);
    }
}
