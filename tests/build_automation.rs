use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use bat_preview::build::automation::*;
use bat_preview::build::pipeline::{BuildError, BuildPipeline, BuildTarget, CommandPipeline};

#[derive(Default)]
struct RecordingPipeline {
    versions: Vec<String>,
    builds: Vec<(PathBuf, PathBuf, BuildTarget)>,
    fail_on: Option<String>,
}

impl BuildPipeline for RecordingPipeline {
    fn set_product_version(&mut self, version: &str) {
        self.versions.push(version.to_owned());
    }

    fn build_player(
        &mut self,
        scenes: &[PathBuf],
        output: &Path,
        target: BuildTarget,
    ) -> Result<(), BuildError> {
        assert_eq!(scenes.len(), 1);
        self.builds.push((scenes[0].clone(), output.to_path_buf(), target));
        match &self.fail_on {
            Some(name) if scenes[0].to_string_lossy().contains(name.as_str()) => {
                Err(BuildError::PipelineFailed {
                    scene: scenes[0].clone(),
                    code: Some(1),
                })
            }
            _ => Ok(()),
        }
    }
}

// fresh scratch folder with a scenes/ dir inside
fn scratch() -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "bat_preview_build_{}_{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("scenes")).unwrap();
    for name in ["intro.scn.ron", "arena.scn.ron", "notes.txt", "bare.ron"] {
        fs::write(dir.join("scenes").join(name), "()").unwrap();
    }
    dir
}

fn config(root: &Path) -> BuildConfig {
    BuildConfig {
        scenes_dir: root.join("scenes"),
        output_root: root.join("out"),
        ..BuildConfig::default()
    }
}

fn opened(root: &Path) -> BuildAutomation {
    BuildAutomation::open(config(root))
}

#[test]
fn lists_only_scene_files_sorted() {
    let root = scratch();
    let automation = opened(&root);
    let names: Vec<String> = automation
        .scenes()
        .iter()
        .map(|p| scene_name(p, "scn.ron"))
        .collect();
    assert_eq!(names, vec!["arena", "intro"]);
}

#[test]
fn missing_scene_dir_leaves_list_empty() {
    let automation = BuildAutomation::open(BuildConfig {
        scenes_dir: PathBuf::from("/definitely/not/here"),
        ..BuildConfig::default()
    });
    assert!(automation.scenes().is_empty());
}

#[test]
fn selection_keeps_order_without_duplicates() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();

    automation.set_selected(&scenes[1], true);
    automation.set_selected(&scenes[0], true);
    automation.set_selected(&scenes[1], true);
    assert_eq!(automation.selected(), &[scenes[1].clone(), scenes[0].clone()]);

    automation.toggle(&scenes[1]);
    assert_eq!(automation.selected(), &[scenes[0].clone()]);
    assert!(!automation.is_selected(&scenes[1]));
}

#[test]
fn empty_selection_builds_nothing() {
    let root = scratch();
    let mut automation = opened(&root);
    let mut pipeline = RecordingPipeline::default();

    assert!(matches!(
        automation.request_build(BuildTarget::Windows),
        Err(BuildError::NoScenesSelected)
    ));
    assert_eq!(automation.pending(), None);
    assert_eq!(automation.review_state(), ReviewState::Idle);

    assert!(matches!(
        automation.build_all(&mut pipeline),
        Err(BuildError::NoScenesSelected)
    ));
    assert!(matches!(
        automation.build_target(BuildTarget::Android, &mut pipeline),
        Err(BuildError::NoScenesSelected)
    ));

    assert!(pipeline.builds.is_empty());
    assert!(pipeline.versions.is_empty());
    assert!(!root.join("out").exists());
}

#[test]
fn declining_review_builds_immediately() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();
    automation.set_selected(&scenes[0], true);
    let mut pipeline = RecordingPipeline::default();

    automation.request_build(BuildTarget::Android).unwrap();
    assert_eq!(automation.pending(), Some(BuildTarget::Android));
    assert_eq!(automation.review_state(), ReviewState::Asking);

    let artifacts = automation.answer_review(false, &mut pipeline).unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(pipeline.builds.len(), 1);
    assert_eq!(pipeline.builds[0].2, BuildTarget::Android);
    assert_eq!(automation.pending(), None);
    assert_eq!(automation.review_state(), ReviewState::Idle);
}

#[test]
fn accepting_review_waits_for_begin_build() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();
    automation.set_selected(&scenes[0], true);
    automation.set_selected(&scenes[1], true);
    let mut pipeline = RecordingPipeline::default();

    automation.request_build(BuildTarget::Windows).unwrap();
    let artifacts = automation.answer_review(true, &mut pipeline).unwrap();
    assert!(artifacts.is_empty());
    assert!(pipeline.builds.is_empty());
    assert_eq!(automation.review_state(), ReviewState::Reviewing);
    assert_eq!(automation.pending(), Some(BuildTarget::Windows));

    let artifacts = automation.begin_build(&mut pipeline).unwrap();
    assert_eq!(artifacts.len(), 2);
    assert!(pipeline.builds.iter().all(|b| b.2 == BuildTarget::Windows));
    assert_eq!(automation.pending(), None);

    // nothing left to begin
    assert!(automation.begin_build(&mut pipeline).unwrap().is_empty());
    assert_eq!(pipeline.builds.len(), 2);
}

#[test]
fn artifacts_follow_naming_scheme() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();
    automation.set_selected(&scenes[1], true); // intro
    let mut pipeline = RecordingPipeline::default();

    let artifacts = automation.build_target(BuildTarget::Windows, &mut pipeline).unwrap();
    let version = pipeline.versions[0].clone();
    assert_eq!(automation.product_version(), Some(version.as_str()));

    let expected = root
        .join("out")
        .join("Windows")
        .join(format!("intro_BatShowcase_{version}.exe"));
    assert_eq!(artifacts, vec![expected.clone()]);
    assert_eq!(pipeline.builds[0].0, scenes[1]);
    assert_eq!(pipeline.builds[0].1, expected);
    assert!(root.join("out").join("Windows").is_dir());
}

#[test]
fn build_all_runs_windows_then_android() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();
    automation.set_selected(&scenes[0], true);
    automation.set_selected(&scenes[1], true);
    let mut pipeline = RecordingPipeline::default();

    // a pending review does not get in the way
    automation.request_build(BuildTarget::Android).unwrap();
    automation.build_all(&mut pipeline).unwrap();

    let order: Vec<(PathBuf, BuildTarget)> = pipeline
        .builds
        .iter()
        .map(|(scene, _, target)| (scene.clone(), *target))
        .collect();
    assert_eq!(
        order,
        vec![
            (scenes[0].clone(), BuildTarget::Windows),
            (scenes[1].clone(), BuildTarget::Windows),
            (scenes[0].clone(), BuildTarget::Android),
            (scenes[1].clone(), BuildTarget::Android),
        ]
    );
    assert_eq!(pipeline.versions.len(), 2);
    assert!(pipeline.builds[2].1.extension().is_some_and(|e| e == "apk"));
    assert_eq!(automation.pending(), Some(BuildTarget::Android));
}

#[test]
fn pipeline_failure_does_not_stop_other_scenes() {
    let root = scratch();
    let mut automation = opened(&root);
    let scenes = automation.scenes().to_vec();
    automation.set_selected(&scenes[0], true);
    automation.set_selected(&scenes[1], true);
    let mut pipeline = RecordingPipeline {
        fail_on: Some("arena".to_owned()),
        ..RecordingPipeline::default()
    };

    let artifacts = automation.build_target(BuildTarget::Android, &mut pipeline).unwrap();
    assert_eq!(pipeline.builds.len(), 2);

    // only the scene that actually built is reported
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0], pipeline.builds[1].1);
    assert!(artifacts[0].to_string_lossy().contains("intro"));
}

#[test]
fn version_stamp_format() {
    let now = chrono::Local::now();
    let version = version_stamp("1.0.", now);
    let digits = version.strip_prefix("1.0.").unwrap();
    assert_eq!(digits.len(), 14);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn command_pipeline_passes_scene_target_and_output() {
    let mut pipeline = CommandPipeline::new("exporter");
    pipeline.set_product_version("1.0.20250101000000");
    let cmd = pipeline.command(
        &[PathBuf::from("intro.scn.ron")],
        Path::new("out/Android/intro.apk"),
        BuildTarget::Android,
    );

    let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(cmd.get_program(), "exporter");
    assert_eq!(
        args,
        vec![
            "--scene",
            "intro.scn.ron",
            "--target",
            "aarch64-linux-android",
            "--output",
            "out/Android/intro.apk",
            "--version",
            "1.0.20250101000000",
        ]
    );
}

#[test]
fn command_pipeline_reports_missing_exporter() {
    let mut pipeline = CommandPipeline::new("/no/such/exporter-binary");
    let err = pipeline
        .build_player(&[PathBuf::from("a.scn.ron")], Path::new("out.exe"), BuildTarget::Windows)
        .unwrap_err();
    assert!(matches!(err, BuildError::PipelineSpawn { .. }));
}
