mod common;

use assert_fs::prelude::*;
use common::{dir_entries, ffmpeg_available, system_font, MockTtsProvider};
use log::LevelFilter;
use predicates::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tts_slides::logging::setup_test_logging;
use tts_slides::{EncodedVideo, Error, VideoCreator, VideoOptions};

const TEXT: &str = "Hola mundo. Esto es una prueba. Este es el final";

fn init_test_logger() {
    setup_test_logging(LevelFilter::Debug);
}

fn options() -> VideoOptions {
    VideoOptions {
        segment_chars: 20,
        ..VideoOptions::default()
    }
    .with_request_pause(Duration::ZERO)
}

#[tokio::test]
async fn test_prepare_builds_timeline_with_outro() {
    init_test_logger();
    let Some(_) = system_font() else {
        eprintln!("Шрифт не найден, тест пропущен");
        return;
    };

    let provider = MockTtsProvider::default();
    let creator = VideoCreator::new(options(), provider.clone()).unwrap();
    let prepared = creator.prepare(TEXT).await.unwrap();

    assert_eq!(
        provider.requests(),
        vec!["Hola mundo.", "Esto es una prueba.", "Este es el final."]
    );
    assert_eq!(prepared.segments.len(), 3);
    assert_eq!(prepared.timeline.len(), 4);

    // 11 символов -> 2 десятка -> 1 с, 19 -> 1 с, 17 -> 1 с
    let starts: Vec<f64> = prepared.segments.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 1.0, 2.0]);
    assert!((prepared.timeline.total_duration() - 8.0).abs() < 1e-9);

    let outro = prepared.timeline.clips().last().unwrap();
    assert!(outro.audio.is_none());
    assert_eq!(outro.duration, 5.0);

    let workdir = assert_fs::fixture::ChildPath::new(prepared.workdir());
    workdir.child("audio_000.mp3").assert(predicate::path::is_file());
    workdir.child("slide_002.png").assert(predicate::path::is_file());
    workdir.child("slide_outro.png").assert(predicate::path::is_file());
}

#[tokio::test]
async fn test_prepare_without_outro() {
    let Some(_) = system_font() else {
        return;
    };

    let creator = VideoCreator::new(options().with_outro(false), MockTtsProvider::default()).unwrap();
    let prepared = creator.prepare("Una sola frase").await.unwrap();

    assert_eq!(prepared.timeline.len(), 1);
    assert!(prepared.timeline.clips()[0].audio.is_some());
}

#[tokio::test]
async fn test_workdir_removed_with_prepared_video() {
    let Some(_) = system_font() else {
        return;
    };

    let creator = VideoCreator::new(options(), MockTtsProvider::default()).unwrap();
    let prepared = creator.prepare(TEXT).await.unwrap();
    let workdir = prepared.workdir().to_path_buf();
    assert!(workdir.exists());

    drop(prepared);
    assert!(!workdir.exists());
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let Some(_) = system_font() else {
        return;
    };

    let provider = MockTtsProvider::default();
    let creator = VideoCreator::new(options(), provider.clone()).unwrap();

    let result = creator.prepare("   \n  ").await;
    assert!(matches!(result, Err(Error::InvalidParameters(_))));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_provider_error_stops_pipeline() {
    let Some(_) = system_font() else {
        return;
    };

    let provider = MockTtsProvider::failing_on(1);
    let creator = VideoCreator::new(options(), provider.clone()).unwrap();

    let result = creator.create_video_in_memory(TEXT).await;
    assert!(matches!(result, Err(Error::Tts(_))));
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let Some(_) = system_font() else {
        return;
    };

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let creator = VideoCreator::new(options(), MockTtsProvider::default())
        .unwrap()
        .with_progress_callback(Box::new(move |progress: f32, _: &str| sink.lock().unwrap().push(progress)));

    creator.prepare(TEXT).await.unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*seen.last().unwrap(), 70.0);
}

#[tokio::test]
async fn test_missing_font_is_reported() {
    let result = VideoCreator::new(
        options().with_font_path("/nonexistent/font.ttf"),
        MockTtsProvider::default(),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_invalid_name_rejected_before_synthesis() {
    let Some(_) = system_font() else {
        return;
    };

    let provider = MockTtsProvider::default();
    let creator = VideoCreator::new(options(), provider.clone()).unwrap();
    let dir = assert_fs::TempDir::new().unwrap();

    let result = creator.create_video_file(TEXT, dir.path(), "../escape").await;
    assert!(matches!(result, Err(Error::InvalidParameters(_))));
    assert!(provider.requests().is_empty());
}

fn can_encode() -> bool {
    if system_font().is_none() || !ffmpeg_available() {
        eprintln!("Шрифт или ffmpeg не найдены, тест пропущен");
        return false;
    }
    true
}

#[tokio::test]
async fn test_create_video_file() {
    init_test_logger();
    if !can_encode() {
        return;
    }

    let work = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    let creator = VideoCreator::new(options().with_work_dir(work.path()), MockTtsProvider::default()).unwrap();

    let artifact = creator.create_video_file(TEXT, out.path(), "video_generado").await.unwrap();

    let expected = out.child("video_generado.mp4");
    assert_eq!(artifact.video, EncodedVideo::File(expected.path().to_path_buf()));
    expected.assert(predicate::path::is_file());
    assert!(artifact.video.len().unwrap() > 0);
    assert_eq!(artifact.segments.len(), 3);
    assert!((artifact.duration - 8.0).abs() < 1e-9);

    assert!(dir_entries(work.path()).is_empty());
}

#[tokio::test]
async fn test_create_video_in_memory() {
    if !can_encode() {
        return;
    }

    let work = assert_fs::TempDir::new().unwrap();
    let creator = VideoCreator::new(options().with_work_dir(work.path()), MockTtsProvider::default()).unwrap();

    let artifact = creator.create_video_in_memory(TEXT).await.unwrap();

    let EncodedVideo::Memory(bytes) = &artifact.video else {
        panic!("ожидалось видео в памяти, получено {:?}", artifact.video);
    };
    assert!(bytes.len() > 8);
    assert_eq!(&bytes[4..8], b"ftyp");
    assert!(bytes.windows(4).any(|w| w == b"moof"));

    assert!(dir_entries(work.path()).is_empty());
}

#[tokio::test]
async fn test_workdir_removed_when_encoding_fails() {
    let Some(_) = system_font() else {
        return;
    };

    let work = assert_fs::TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    let creator = VideoCreator::new(
        options()
            .with_work_dir(work.path())
            .with_ffmpeg_path("/nonexistent/ffmpeg-binary"),
        MockTtsProvider::default(),
    )
    .unwrap();

    let result = creator.create_video_file(TEXT, out.path(), "video_generado").await;

    assert!(matches!(result, Err(Error::VideoEncoding(_))));
    assert!(dir_entries(work.path()).is_empty());
    out.child("video_generado.mp4").assert(predicate::path::missing());
}
