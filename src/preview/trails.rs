use std::collections::VecDeque;

use bevy::prelude::*;

use crate::TrailSelected;

const DEFAULT_MAX_POINTS: usize = 64;
const DEFAULT_MIN_SPACING: f32 = 0.02;

/// A ribbon that follows its entity while active, drawn with gizmos.
#[derive(Component, Debug, Clone)]
#[require(Visibility)]
pub struct TrailEffect {
    pub slot: usize, // requested dropdown position, renumbered 0..n by the roster
    pub name: String,
    pub color: Color,
    pub max_points: usize,
    pub min_spacing: f32,
    points: VecDeque<Vec3>,
    active: bool,
}

impl TrailEffect {
    pub fn new(slot: usize, name: impl Into<String>, color: Color) -> Self {
        Self {
            slot,
            name: name.into(),
            color,
            max_points: DEFAULT_MAX_POINTS,
            min_spacing: DEFAULT_MIN_SPACING,
            points: VecDeque::new(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    // only the chosen slot survives, every trail drops its old ribbon
    pub fn apply_selection(&mut self, index: usize) {
        self.active = self.slot == index;
        self.clear();
    }

    pub fn record(&mut self, pos: Vec3) {
        if !self.active {
            return;
        }
        if let Some(last) = self.points.back() {
            if last.distance_squared(pos) < self.min_spacing * self.min_spacing {
                return;
            }
        }
        self.points.push_back(pos);
        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }
}

/// Trail names in dropdown order.
#[derive(Resource, Default, Debug, Clone)]
pub struct TrailRoster {
    pub names: Vec<String>,
}

// all trails start hidden until the user picks one
pub fn build_trail_roster(
    mut commands: Commands,
    mut trails: Query<(Entity, &mut TrailEffect, &mut Visibility)>,
) {
    let mut order: Vec<(usize, Entity)> = Vec::new();
    for (entity, mut trail, mut visibility) in &mut trails {
        trail.deactivate();
        trail.clear();
        *visibility = Visibility::Hidden;
        order.push((trail.slot, entity));
    }
    order.sort();

    // requested slots may have gaps or repeats, renumber to dropdown positions
    let mut names = Vec::with_capacity(order.len());
    for (index, (_, entity)) in order.into_iter().enumerate() {
        if let Ok((_, mut trail, _)) = trails.get_mut(entity) {
            trail.slot = index;
            names.push(trail.name.clone());
        }
    }

    commands.insert_resource(TrailRoster { names });
}

pub fn apply_trail_selection(
    mut events: EventReader<TrailSelected>,
    mut trails: Query<(&mut TrailEffect, &mut Visibility)>,
) {
    for TrailSelected(index) in events.read() {
        for (mut trail, mut visibility) in &mut trails {
            trail.apply_selection(*index);
            *visibility = if trail.is_active() {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
        info!("trail {} selected", index);
    }
}

pub fn record_trails(mut trails: Query<(&mut TrailEffect, &GlobalTransform)>) {
    for (mut trail, global) in &mut trails {
        if trail.is_active() {
            trail.record(global.translation());
        }
    }
}

pub fn draw_trails(trails: Query<&TrailEffect>, mut gizmos: Gizmos) {
    for trail in &trails {
        if trail.is_active() && trail.points.len() > 1 {
            gizmos.linestrip(trail.points(), trail.color);
        }
    }
}
