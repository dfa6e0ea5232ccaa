use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::automation::{BuildAutomation, BuildConfig, ReviewState, scene_name};
use super::pipeline::{BuildError, BuildPipeline, BuildTarget, CommandPipeline};

const PANEL_COLOR: Color = Color::srgb(0.10, 0.10, 0.12);
const BOX_COLOR: Color = Color::srgb(0.16, 0.18, 0.24);
const NORMAL_BUTTON: Color = Color::srgb(0.20, 0.20, 0.22);
const HOVERED_BUTTON: Color = Color::srgb(0.30, 0.30, 0.34);

#[derive(Resource)]
pub struct PipelineHandle(pub Box<dyn BuildPipeline + Send + Sync>);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildAction {
    Windows,
    Android,
    All,
    ReviewYes,
    ReviewNo,
    Begin,
}

#[derive(Component, Debug, Copy, Clone)]
pub struct BuildButton(pub BuildAction);

#[derive(Component, Debug, Clone)]
pub struct SceneToggle(pub PathBuf);

#[derive(Component, Debug, Clone)]
pub struct SceneToggleLabel(pub PathBuf);

#[derive(Component)]
pub struct ReviewPrompt;

#[derive(Component)]
pub struct PendingHelp;

#[derive(Component)]
pub struct PlayerSettingsPanel;

#[derive(Component)]
pub struct PlayerSettingsText;

/// Editor-style panel: pick scenes, build per platform.
pub struct BuildWindowPlugin {
    pub config: BuildConfig,
    pub exporter: PathBuf,
}

impl Default for BuildWindowPlugin {
    fn default() -> Self {
        Self {
            config: BuildConfig::default(),
            exporter: PathBuf::from("bat-exporter"),
        }
    }
}

impl Plugin for BuildWindowPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<BuildAutomation>() {
            app.insert_resource(BuildAutomation::open(self.config.clone()));
        }
        if !app.world().contains_resource::<PipelineHandle>() {
            app.insert_resource(PipelineHandle(Box::new(CommandPipeline::new(
                self.exporter.clone(),
            ))));
        }

        app.add_systems(Startup, spawn_build_window).add_systems(
            Update,
            (
                (scene_toggle_clicks, build_button_clicks),
                (sync_scene_labels, sync_panel_sections),
                button_feedback,
            )
                .chain(),
        );
    }
}

fn toggle_text(automation: &BuildAutomation, scene: &Path) -> String {
    let mark = if automation.is_selected(scene) { "[x]" } else { "[ ]" };
    format!("{mark} {}", scene_name(scene, &automation.config.scene_extension))
}

fn text(value: impl Into<String>, size: f32) -> impl Bundle {
    (
        Text::new(value),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn button(action: BuildAction) -> impl Bundle {
    (
        Button,
        Node {
            min_width: Val::Px(160.0),
            height: Val::Px(30.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            margin: UiRect::vertical(Val::Px(3.0)),
            ..default()
        },
        BackgroundColor(NORMAL_BUTTON),
        BuildButton(action),
    )
}

fn boxed(display: Display) -> Node {
    Node {
        flex_direction: FlexDirection::Column,
        padding: UiRect::all(Val::Px(8.0)),
        margin: UiRect::top(Val::Px(8.0)),
        display,
        ..default()
    }
}

pub fn spawn_build_window(mut commands: Commands, automation: Res<BuildAutomation>) {
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(12.0)),
                width: Val::Px(360.0),
                ..default()
            },
            BackgroundColor(PANEL_COLOR),
        ))
        .with_children(|panel| {
            panel.spawn(text("Select Scenes to Build", 20.0));

            if automation.scenes().is_empty() {
                panel.spawn(text(
                    format!("no scenes in {}", automation.config.scenes_dir.display()),
                    14.0,
                ));
            }
            for scene in automation.scenes() {
                panel
                    .spawn((
                        Button,
                        Node {
                            padding: UiRect::all(Val::Px(4.0)),
                            ..default()
                        },
                        BackgroundColor(NORMAL_BUTTON),
                        SceneToggle(scene.clone()),
                    ))
                    .with_child((
                        text(toggle_text(&automation, scene), 15.0),
                        SceneToggleLabel(scene.clone()),
                    ));
            }

            panel.spawn(Node {
                height: Val::Px(15.0),
                ..default()
            });

            for (action, caption) in [
                (BuildAction::Windows, "Build Windows"),
                (BuildAction::Android, "Build Android"),
                (BuildAction::All, "Build All"),
            ] {
                panel.spawn(button(action)).with_child(text(caption, 15.0));
            }

            panel
                .spawn((boxed(Display::None), BackgroundColor(BOX_COLOR), ReviewPrompt))
                .with_children(|prompt| {
                    prompt.spawn(text("Player Settings", 16.0));
                    prompt.spawn(text(
                        "Do you want to modify Player Settings before building?",
                        14.0,
                    ));
                    prompt.spawn(button(BuildAction::ReviewYes)).with_child(text("Yes", 15.0));
                    prompt.spawn(button(BuildAction::ReviewNo)).with_child(text("No", 15.0));
                });

            panel
                .spawn((boxed(Display::None), BackgroundColor(BOX_COLOR), PlayerSettingsPanel))
                .with_child((text("", 14.0), PlayerSettingsText));

            panel
                .spawn((boxed(Display::None), BackgroundColor(BOX_COLOR), PendingHelp))
                .with_children(|help| {
                    help.spawn(text(
                        "Once done adjusting Player Settings, click below to start build.",
                        14.0,
                    ));
                    help.spawn(button(BuildAction::Begin)).with_child(text("Begin Build", 15.0));
                });
        });
}

pub fn scene_toggle_clicks(
    toggles: Query<(&Interaction, &SceneToggle), Changed<Interaction>>,
    mut automation: ResMut<BuildAutomation>,
) {
    for (interaction, toggle) in &toggles {
        if *interaction == Interaction::Pressed {
            automation.toggle(&toggle.0);
        }
    }
}

pub fn build_button_clicks(
    buttons: Query<(&Interaction, &BuildButton), Changed<Interaction>>,
    mut automation: ResMut<BuildAutomation>,
    mut pipeline: ResMut<PipelineHandle>,
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }

        let pipeline = pipeline.0.as_mut();
        let result = match button.0 {
            BuildAction::Windows => automation.request_build(BuildTarget::Windows).map(|_| Vec::new()),
            BuildAction::Android => automation.request_build(BuildTarget::Android).map(|_| Vec::new()),
            BuildAction::All => automation.build_all(pipeline),
            BuildAction::ReviewYes => automation.answer_review(true, pipeline),
            BuildAction::ReviewNo => automation.answer_review(false, pipeline),
            BuildAction::Begin => automation.begin_build(pipeline),
        };

        match result {
            // already reported by the automation
            Err(BuildError::NoScenesSelected) => {}
            Err(err) => error!("{err}"),
            Ok(artifacts) if !artifacts.is_empty() => {
                info!("{} artifact(s) written", artifacts.len());
            }
            Ok(_) => {}
        }
    }
}

pub fn sync_scene_labels(
    automation: Res<BuildAutomation>,
    mut labels: Query<(&SceneToggleLabel, &mut Text)>,
) {
    if !automation.is_changed() {
        return;
    }
    for (label, mut value) in &mut labels {
        value.0 = toggle_text(&automation, &label.0);
    }
}

#[allow(clippy::type_complexity)]
pub fn sync_panel_sections(
    automation: Res<BuildAutomation>,
    mut sections: ParamSet<(
        Query<&mut Node, With<ReviewPrompt>>,
        Query<&mut Node, With<PlayerSettingsPanel>>,
        Query<&mut Node, With<PendingHelp>>,
    )>,
    mut settings_text: Query<&mut Text, With<PlayerSettingsText>>,
) {
    if !automation.is_changed() {
        return;
    }

    let review = automation.review_state();
    let show = |visible: bool| if visible { Display::Flex } else { Display::None };

    for mut node in &mut sections.p0() {
        node.display = show(review == ReviewState::Asking);
    }
    for mut node in &mut sections.p1() {
        node.display = show(review == ReviewState::Reviewing);
    }
    for mut node in &mut sections.p2() {
        node.display = show(automation.pending().is_some() && review != ReviewState::Asking);
    }

    for mut value in &mut settings_text {
        value.0 = format!(
            "Product: {}\nVersion: {}\nPending: {}",
            automation.config.product_name,
            automation.product_version().unwrap_or("-"),
            automation
                .pending()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_owned()),
        );
    }
}

pub fn button_feedback(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in &mut buttons {
        *color = match interaction {
            Interaction::Hovered | Interaction::Pressed => HOVERED_BUTTON.into(),
            Interaction::None => NORMAL_BUTTON.into(),
        };
    }
}
