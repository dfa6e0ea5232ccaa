// three phase preview: camera orbit, object spin, then mouse tilt with idle return
use bevy::log::error;
use bevy::prelude::{Resource, Transform};
use glam::{Quat, Vec2, Vec3};

const FULL_TURN: f32 = 360.0; // degrees

#[derive(Resource, Debug, Copy, Clone)]
pub struct PreviewSettings {
    pub camera_rotate_speed: f32, // degrees per second
    pub object_spin_speed: f32,   // degrees per second
    pub hover_height: f32,
    pub sensitivity: f32, // degrees per pixel
    pub return_speed: f32,
    pub smooth_time: f32,       // seconds
    pub idle_threshold: f32,    // seconds
    pub move_threshold_sq: f32, // pixels^2
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            camera_rotate_speed: 20.0,
            object_spin_speed: 100.0,
            hover_height: 1.5,
            sensitivity: 0.2,
            return_speed: 2.0,
            smooth_time: 0.2,
            idle_threshold: 3.0,
            move_threshold_sq: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PreviewPhase {
    CameraOrbiting { swept: f32 },
    ObjectSpinning { swept: f32 },
    UserControl,
}

/// Restricts the mouse tilt to a single axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisLock {
    /// horizontal mouse movement only, yaw about world up
    Horizontal,
    /// vertical mouse movement only, pitch about the pivot's right axis
    Vertical,
}

/// Transforms touched by one tick. The pivot may be missing in a broken scene.
pub struct PreviewFrame<'a> {
    pub camera: &'a mut Transform,
    pub target: &'a mut Transform,
    pub pivot: Option<&'a mut Transform>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub phase_changed: bool,
    pub controls_revealed: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct PreviewRotator {
    pub settings: PreviewSettings,
    phase: PreviewPhase,
    rest_rotation: Quat,
    target_rotation: Quat,
    last_pointer: Vec2,
    idle_time: f32,
    axis_lock: Option<AxisLock>,
    controls_revealed: bool,
}

impl PreviewRotator {
    pub fn new(settings: PreviewSettings, pivot_rotation: Option<Quat>, pointer: Vec2) -> Self {
        let rotation = pivot_rotation.unwrap_or_else(|| {
            error!("Preview pivot not assigned. Add a PreviewPivot entity at the top of the product.");
            Quat::IDENTITY
        });

        Self {
            settings,
            phase: PreviewPhase::CameraOrbiting { swept: 0.0 },
            rest_rotation: rotation,
            target_rotation: rotation,
            last_pointer: pointer,
            idle_time: 0.0,
            axis_lock: None,
            controls_revealed: false,
        }
    }

    pub fn phase(&self) -> PreviewPhase {
        self.phase
    }

    pub fn axis_lock(&self) -> Option<AxisLock> {
        self.axis_lock
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }

    pub fn rest_rotation(&self) -> Quat {
        self.rest_rotation
    }

    pub fn target_rotation(&self) -> Quat {
        self.target_rotation
    }

    pub fn controls_revealed(&self) -> bool {
        self.controls_revealed
    }

    // selecting one lock always drops the other
    pub fn select_axis_lock(&mut self, lock: AxisLock) {
        self.axis_lock = Some(lock);
    }

    /// Advances the preview by one frame. `pointer` is in y-up screen space.
    pub fn tick(&mut self, frame: &mut PreviewFrame, dt: f32, pointer: Vec2) -> TickOutcome {
        frame.target.translation.y = self.settings.hover_height;

        let mut outcome = TickOutcome::default();
        match self.phase {
            PreviewPhase::CameraOrbiting { swept } => {
                let step = self.settings.camera_rotate_speed * dt;
                let center = frame.target.translation;
                frame
                    .camera
                    .rotate_around(center, Quat::from_rotation_y(step.to_radians()));

                let swept = swept + step;
                self.phase = PreviewPhase::CameraOrbiting { swept };
                if swept >= FULL_TURN {
                    outcome.phase_changed = self.finish_orbit();
                }
            }

            PreviewPhase::ObjectSpinning { swept } => {
                let step = self.settings.object_spin_speed * dt;
                // world up, not the product's own up
                frame.target.rotate_y(step.to_radians());

                let swept = swept + step;
                self.phase = PreviewPhase::ObjectSpinning { swept };
                if swept >= FULL_TURN {
                    let pivot_rotation = frame.pivot.as_deref().map(|p| p.rotation);
                    outcome.phase_changed = self.finish_spin(pivot_rotation);
                }
            }

            PreviewPhase::UserControl => {
                if !self.controls_revealed {
                    self.controls_revealed = true;
                    outcome.controls_revealed = true;
                }
                self.follow_pointer(frame.pivot.as_deref_mut(), dt, pointer);
            }
        }

        self.last_pointer = pointer;
        outcome
    }

    fn finish_orbit(&mut self) -> bool {
        if !matches!(self.phase, PreviewPhase::CameraOrbiting { .. }) {
            return false;
        }
        self.phase = PreviewPhase::ObjectSpinning { swept: 0.0 };
        true
    }

    // rest pose is where the pivot ended up after the spin, not where it started
    fn finish_spin(&mut self, pivot_rotation: Option<Quat>) -> bool {
        if !matches!(self.phase, PreviewPhase::ObjectSpinning { .. }) {
            return false;
        }
        if let Some(rotation) = pivot_rotation {
            self.rest_rotation = rotation;
            self.target_rotation = rotation;
        }
        self.phase = PreviewPhase::UserControl;
        true
    }

    fn follow_pointer(&mut self, pivot: Option<&mut Transform>, dt: f32, pointer: Vec2) {
        let delta = pointer - self.last_pointer;
        let moving = delta.length_squared() > self.settings.move_threshold_sq;

        if moving {
            self.idle_time = 0.0;
        } else {
            self.idle_time += dt;
        }

        let Some(pivot) = pivot else { return };

        if moving {
            let change = self.rotation_change(delta, pivot.rotation);
            self.target_rotation = change * pivot.rotation;
        } else if self.idle_time > self.settings.idle_threshold {
            let t = (self.settings.return_speed * dt).clamp(0.0, 1.0);
            // glam's lerp renormalizes, so repeated calls stay on the unit sphere
            self.target_rotation = pivot.rotation.lerp(self.rest_rotation, t);
        }

        // framerate dependent easing toward the target
        let t = if self.settings.smooth_time > 0.0 {
            (dt / self.settings.smooth_time).clamp(0.0, 1.0)
        } else {
            1.0
        };
        pivot.rotation = pivot.rotation.slerp(self.target_rotation, t).normalize();
    }

    fn rotation_change(&self, delta: Vec2, pivot_rotation: Quat) -> Quat {
        let yaw_deg = delta.x * self.settings.sensitivity;
        let pitch_deg = -delta.y * self.settings.sensitivity;

        let yaw = Quat::from_axis_angle(Vec3::Y, yaw_deg.to_radians());
        let right = (pivot_rotation * Vec3::X).normalize();
        let pitch = Quat::from_axis_angle(right, pitch_deg.to_radians());

        match self.axis_lock {
            Some(AxisLock::Horizontal) => yaw,
            Some(AxisLock::Vertical) => pitch,
            None => yaw * pitch,
        }
    }
}
