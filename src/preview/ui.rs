use bevy::prelude::*;

use crate::preview::rotator::{AxisLock, PreviewRotator};
use crate::preview::trails::TrailRoster;
use crate::{ControlsRevealed, PreviewControl, TrailSelected};

pub const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const ACTIVE_BUTTON: Color = Color::srgb(0.30, 0.50, 0.35);
const FONT_SIZE: f32 = 16.0;

#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisLockButton(pub AxisLock);

#[derive(Component)]
pub struct TrailDropdown;

#[derive(Component)]
pub struct TrailDropdownHeader;

#[derive(Component)]
pub struct TrailDropdownLabel;

#[derive(Component)]
pub struct TrailOptionList;

#[derive(Component, Debug, Copy, Clone)]
pub struct TrailOption(pub usize);

pub fn button_node() -> Node {
    Node {
        width: Val::Px(150.0),
        height: Val::Px(32.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::bottom(Val::Px(6.0)),
        ..default()
    }
}

pub fn label(text: impl Into<String>) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

// axis buttons and the trail dropdown, hidden until user control starts
pub fn spawn_preview_controls(mut commands: Commands, roster: Res<TrailRoster>) {
    if roster.names.is_empty() {
        warn!("Trail dropdown or trail list not set up properly.");
    }

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(16.0),
            top: Val::Px(16.0),
            flex_direction: FlexDirection::Column,
            ..default()
        })
        .with_children(|root| {
            for (lock, text) in [(AxisLock::Horizontal, "X Axis"), (AxisLock::Vertical, "Y Axis")] {
                root.spawn((
                    Button,
                    button_node(),
                    BackgroundColor(NORMAL_BUTTON),
                    Visibility::Hidden,
                    PreviewControl,
                    AxisLockButton(lock),
                ))
                .with_child(label(text));
            }

            root.spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                Visibility::Hidden,
                PreviewControl,
                TrailDropdown,
            ))
            .with_children(|dropdown| {
                dropdown
                    .spawn((
                        Button,
                        button_node(),
                        BackgroundColor(NORMAL_BUTTON),
                        TrailDropdownHeader,
                    ))
                    .with_child((label("Select trail"), TrailDropdownLabel));

                dropdown
                    .spawn((
                        Node {
                            flex_direction: FlexDirection::Column,
                            display: Display::None,
                            ..default()
                        },
                        TrailOptionList,
                    ))
                    .with_children(|list| {
                        for (index, name) in roster.names.iter().enumerate() {
                            list.spawn((
                                Button,
                                button_node(),
                                BackgroundColor(NORMAL_BUTTON),
                                TrailOption(index),
                            ))
                            .with_child(label(name.clone()));
                        }
                    });
            });
        });
}

pub fn reveal_controls(
    mut events: EventReader<ControlsRevealed>,
    mut controls: Query<&mut Visibility, With<PreviewControl>>,
) {
    if events.read().last().is_none() {
        return;
    }
    for mut visibility in &mut controls {
        *visibility = Visibility::Inherited;
    }
    info!("preview controls revealed");
}

pub fn axis_button_clicks(
    buttons: Query<(&Interaction, &AxisLockButton), Changed<Interaction>>,
    rotator: Option<ResMut<PreviewRotator>>,
) {
    let Some(mut rotator) = rotator else { return };
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            rotator.select_axis_lock(button.0);
        }
    }
}

pub fn dropdown_header_clicks(
    headers: Query<&Interaction, (Changed<Interaction>, With<TrailDropdownHeader>)>,
    mut lists: Query<&mut Node, With<TrailOptionList>>,
) {
    for interaction in &headers {
        if *interaction != Interaction::Pressed {
            continue;
        }
        for mut node in &mut lists {
            node.display = match node.display {
                Display::None => Display::Flex,
                _ => Display::None,
            };
        }
    }
}

pub fn trail_option_clicks(
    options: Query<(&Interaction, &TrailOption), Changed<Interaction>>,
    roster: Res<TrailRoster>,
    mut lists: Query<&mut Node, With<TrailOptionList>>,
    mut labels: Query<&mut Text, With<TrailDropdownLabel>>,
    mut selected: EventWriter<TrailSelected>,
) {
    for (interaction, option) in &options {
        if *interaction != Interaction::Pressed {
            continue;
        }
        selected.write(TrailSelected(option.0));

        if let Some(name) = roster.names.get(option.0) {
            for mut text in &mut labels {
                text.0 = name.clone();
            }
        }
        for mut node in &mut lists {
            node.display = Display::None;
        }
    }
}

// other panels (the build window) colour their own buttons
type PreviewButton = Or<(With<AxisLockButton>, With<TrailDropdownHeader>, With<TrailOption>)>;

pub fn button_feedback(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor, Option<&AxisLockButton>),
        (With<Button>, PreviewButton),
    >,
    rotator: Option<Res<PreviewRotator>>,
) {
    let lock = rotator.and_then(|r| r.axis_lock());
    for (interaction, mut color, axis) in &mut buttons {
        let engaged = axis.is_some_and(|a| Some(a.0) == lock);
        *color = match (*interaction, engaged) {
            (_, true) => ACTIVE_BUTTON.into(),
            (Interaction::Hovered | Interaction::Pressed, false) => HOVERED_BUTTON.into(),
            (Interaction::None, false) => NORMAL_BUTTON.into(),
        };
    }
}
