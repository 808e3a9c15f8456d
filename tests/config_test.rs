use assert_fs::prelude::*;
use predicates::prelude::*;
use tts_slides::{Error, PrivacyStatus, VideoOptions};

#[test]
fn test_load_from_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("tts-slides.toml");
    config
        .write_str(
            r#"
            voice = "es-ES-Standard-A"
            font_size = 28.0
            request_pause_ms = 0
            privacy_status = "private"
            work_dir = "/var/tmp/tts-slides"
            "#,
        )
        .unwrap();

    let options = VideoOptions::load(config.path()).unwrap();
    assert_eq!(options.voice, "es-ES-Standard-A");
    assert_eq!(options.slide_style().font_size, 28.0);
    assert!(options.request_pause().is_zero());
    assert_eq!(options.privacy_status, PrivacyStatus::Private);
    assert_eq!(options.work_dir.as_deref(), Some(std::path::Path::new("/var/tmp/tts-slides")));
}

#[test]
fn test_invalid_file_mentions_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("broken.toml");
    config.write_str("slide_height = 361").unwrap();

    let err = VideoOptions::load(config.path()).unwrap_err();
    assert!(predicate::str::contains("broken.toml").eval(&err.to_string()));
}

#[test]
fn test_unknown_voice_is_not_checked_by_config() {
    // голос проверяется при создании клиента синтеза
    let options = VideoOptions::from_toml("voice = \"xx-XX-Unknown\"").unwrap();
    assert!(tts_slides::tts::find_voice(&options.voice).is_err());
}

#[test]
fn test_config_error_type() {
    let err = VideoOptions::from_toml("voice = 1").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
