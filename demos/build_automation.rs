use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bat_preview::BuildWindowPlugin;
use bat_preview::build::automation::BuildConfig;

// usage: cargo run --example build_automation -- [scenes_dir] [exporter]
fn main() {
    let mut args = std::env::args().skip(1);
    let mut config = BuildConfig::default();
    if let Some(dir) = args.next() {
        config.scenes_dir = PathBuf::from(dir);
    }
    let exporter = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bat-exporter"));

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Build Automation".into(),
                resolution: WindowResolution::new(420.0, 560.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(BuildWindowPlugin { config, exporter })
        .add_systems(Startup, |mut commands: Commands| {
            commands.spawn(Camera2d);
        })
        .run();
}
