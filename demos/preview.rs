use bevy::prelude::*;
use bat_preview::preview::trails::TrailEffect;
use bat_preview::{PreviewCamera, PreviewPivot, PreviewPlugin, PreviewTarget};

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, PreviewPlugin))
        .add_systems(Startup, setup)
        .run();
}

// a bat hanging from its pivot, three swappable trails on the tip
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // floor
    commands.spawn((
        Mesh3d(meshes.add(Circle::new(4.0))),
        MeshMaterial3d(materials.add(Color::WHITE)),
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
    ));

    let bat_mesh = meshes.add(Cuboid::new(0.12, 1.0, 0.12));
    let bat_material = materials.add(Color::srgb_u8(150, 100, 60));

    commands
        .spawn((Transform::from_xyz(0.0, 1.5, 0.0), Visibility::default(), PreviewTarget))
        .with_children(|target| {
            target
                .spawn((Transform::from_xyz(0.0, 0.5, 0.0), Visibility::default(), PreviewPivot))
                .with_children(|pivot| {
                    pivot
                        .spawn((
                            Mesh3d(bat_mesh),
                            MeshMaterial3d(bat_material),
                            Transform::from_xyz(0.0, -0.5, 0.0),
                        ))
                        .with_children(|bat| {
                            let trails = [
                                ("Ember", Color::srgb(1.0, 0.45, 0.1)),
                                ("Frost", Color::srgb(0.4, 0.8, 1.0)),
                                ("Venom", Color::srgb(0.3, 1.0, 0.3)),
                            ];
                            for (slot, (name, color)) in trails.into_iter().enumerate() {
                                bat.spawn((
                                    Transform::from_xyz(0.0, -0.5, 0.0),
                                    Visibility::Hidden,
                                    TrailEffect::new(slot, name, color),
                                ));
                            }
                        });
                });
        });

    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 2.0),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 3.0, 6.0).looking_at(Vec3::new(0.0, 1.5, 0.0), Vec3::Y),
        PreviewCamera,
    ));
}
