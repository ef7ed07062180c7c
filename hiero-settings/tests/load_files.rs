use std::fs;

use hiero_settings::{HieroSettings, SettingsError};

fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn load_or_default_without_file() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let s = HieroSettings::load_or_default(dir.path().join("hiero.json"))?;
    assert_eq!(s, HieroSettings::default());
    Ok(())
}

#[test]
fn load_missing_file_is_io_error() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let err = HieroSettings::load(dir.path().join("hiero.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
    Ok(())
}

#[test]
fn save_then_load_json_and_toml() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let mut s = HieroSettings::default();
    s.imageio.workfile.working_space = "ACES - ACEScg".into();
    s.load.load_clip.families.retain(|f| f != "review");

    for name in ["hiero.json", "hiero.toml"] {
        let path = dir.path().join(name);
        assert_eq!(s.save(&path)?, None);
        let back = HieroSettings::load(&path)?;
        assert_eq!(back, s, "{name} did not round trip");
    }
    Ok(())
}

#[test]
fn save_over_existing_file_keeps_backup() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hiero.json");
    fs::write(&path, r#"{"imageio": {"workfile": {"viewerLut": "P3"}}}"#)?;

    let backup = HieroSettings::default()
        .save(&path)?
        .expect("existing file should be backed up");
    assert!(backup.exists());
    assert_eq!(HieroSettings::load(&backup)?.viewer_lut(), "P3");
    assert_eq!(HieroSettings::load(&path)?.viewer_lut(), "sRGB");
    Ok(())
}

#[test]
fn studio_and_project_layers() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let studio = dir.path().join("studio.json");
    let project = dir.path().join("project.toml");
    fs::write(
        &studio,
        r#"{
            "imageio": {"workfile": {"workingSpace": "ACES - ACEScg"}},
            "publish": {"ValidateFrameRange": {"enabled": false}}
        }"#,
    )?;
    fs::write(
        &project,
        "[create.CreateShotClip]\nhandleStart = 5\nhandleEnd = 5\n",
    )?;

    let s = HieroSettings::load_layers(&[
        studio.as_path(),
        dir.path().join("absent.json").as_path(),
        project.as_path(),
    ])?;
    assert_eq!(s.working_space(), "ACES - ACEScg");
    assert!(!s.is_publish_step_enabled("ValidateFrameRange"));
    assert_eq!(s.shot_clip().frame_range(10).start, 996);
    assert_eq!(s.shot_clip().handle_end, 5);
    Ok(())
}

#[test]
fn unsupported_extension() -> anyhow::Result<()> {
    init_log();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("hiero.yaml");
    fs::write(&path, "imageio: {}")?;
    assert!(matches!(
        HieroSettings::load(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
    Ok(())
}

#[test]
fn invalid_document_is_reported() -> anyhow::Result<()> {
    init_log();
    let s = HieroSettings::from_json_str(
        r#"{
            "imageio": {"regexInputs": {"inputs": [{"regex": "", "colorspace": "sRGB"}]}},
            "load": {"LoadClip": {"families": ["plate", "plate"]}}
        }"#,
    )?;
    match s.validated() {
        Err(SettingsError::Validation(issues)) => {
            let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
            assert_eq!(
                paths,
                ["imageio.regexInputs.inputs.0.regex", "load.LoadClip.families"]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn shot_creation_from_loaded_settings() -> anyhow::Result<()> {
    init_log();
    let s = HieroSettings::from_json_str(
        r#"{"create": {"CreateShotClip": {
            "hierarchy": "{folder}/{episode}/{sequence}",
            "countFrom": 100,
            "countSteps": 20,
            "shot": "sh####"
        }}}"#,
    )?;
    let clip = s.shot_clip();
    assert_eq!(clip.hierarchy_path(2, "main")?, "shots/ep01/sq01");
    assert_eq!(clip.clip_name(2, "main", "A001")?, "mainsq01sh0140");
    assert_eq!(s.shot_naming_template(), "{track}{sequence}{shot}");
    Ok(())
}
