use crate::audio::inspect_audio;
use crate::config::VideoOptions;
use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_error, log_info};
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::render::SlideRenderer;
use crate::text::segment_text_with_limit;
use crate::tts::TtsProvider;
use crate::video::{EncodedVideo, FfmpegEncoder, Timeline, VideoOutput};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Озвученный и отрисованный сегмент текста
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInfo {
    pub index: usize,
    pub text: String,
    /// Время начала в итоговом видео, с
    pub start: f64,
    /// Длительность озвучки, с
    pub duration: f64,
}

/// Подготовленный к кодированию видеоряд.
///
/// Владеет временной папкой с аудио и слайдами; папка удаляется вместе с ним.
#[derive(Debug)]
pub struct PreparedVideo {
    pub timeline: Timeline,
    pub segments: Vec<SegmentInfo>,
    workdir: TempDir,
}

impl PreparedVideo {
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }
}

/// Результат создания видео
#[derive(Debug, Clone, PartialEq)]
pub struct VideoArtifact {
    pub video: EncodedVideo,
    pub segments: Vec<SegmentInfo>,
    /// Общая длительность, включая финальный слайд
    pub duration: f64,
}

/// Создает озвученное слайд-шоу из текста
pub struct VideoCreator<P: TtsProvider> {
    options: VideoOptions,
    provider: P,
    renderer: SlideRenderer,
    encoder: FfmpegEncoder,
    progress_tracker: ProgressTracker,
}

impl<P: TtsProvider> VideoCreator<P> {
    /// Создает экземпляр; шрифт загружается из `options.font_path`
    pub fn new(options: VideoOptions, provider: P) -> Result<Self> {
        options.validate()?;
        let renderer = SlideRenderer::from_font_file(&options.font_path)?;
        Ok(Self::with_renderer(options, provider, renderer))
    }

    /// Создает экземпляр с готовым отрисовщиком
    pub fn with_renderer(options: VideoOptions, provider: P, renderer: SlideRenderer) -> Self {
        let encoder = FfmpegEncoder::new(options.ffmpeg_path.clone(), options.encode_settings());
        log_debug(&format!("Создан VideoCreator с настройками: {:?}", options));
        Self {
            options,
            provider,
            renderer,
            encoder,
            progress_tracker: ProgressTracker::new(),
        }
    }

    /// Устанавливает функцию обратного вызова для отслеживания прогресса
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_tracker = ProgressTracker::with_callback(callback);
        self
    }

    pub fn options(&self) -> &VideoOptions {
        &self.options
    }

    /// Создает видео и записывает его в `output`
    pub async fn create_video(&self, text: &str, output: VideoOutput) -> Result<VideoArtifact> {
        log_info("Начало создания видео");

        let result = async {
            let prepared = self.prepare(text).await?;
            self.encode(&prepared, &output).await
        }
        .await;

        if let Err(e) = &result {
            let _ = log_error::<(), _>(e, "Ошибка при создании видео");
        }
        result
    }

    /// Создает видео в файле `<dir>/<name>.mp4`
    pub async fn create_video_file(&self, text: &str, dir: &Path, name: &str) -> Result<VideoArtifact> {
        self.create_video(text, VideoOutput::File(output_file_path(dir, name)?)).await
    }

    /// Создает видео в памяти
    pub async fn create_video_in_memory(&self, text: &str) -> Result<VideoArtifact> {
        self.create_video(text, VideoOutput::Memory).await
    }

    /// Озвучивает текст по сегментам и рисует слайды, не запуская кодирование
    pub async fn prepare(&self, text: &str) -> Result<PreparedVideo> {
        self.progress_tracker.update(0.0, "Разбиение текста на сегменты")?;
        let texts = segment_text_with_limit(text, self.options.segment_chars);
        if texts.is_empty() {
            return Err(Error::new(ErrorType::InvalidParameters, "Текст не содержит предложений"));
        }
        log_info(&format!("Текст разбит на {} сегментов", texts.len()));

        let mut builder = tempfile::Builder::new();
        builder.prefix("tts-slides-");
        let workdir = match &self.options.work_dir {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };
        log_debug(&format!("Временная папка: {}", workdir.path().display()));

        let progress = self.progress_tracker.create_child(5.0, 70.0);
        let mut timeline = Timeline::new();
        let mut segments = Vec::with_capacity(texts.len());

        for (i, segment_text) in texts.iter().enumerate() {
            progress.step(i, texts.len(), &format!("Обработка сегмента {} из {}", i + 1, texts.len()))?;
            log_info(&format!("Обработка сегмента {} из {}", i + 1, texts.len()));

            let tts_segment = self.provider.synthesize_segment(i, segment_text).await?;
            let audio_path = workdir.path().join(format!("audio_{:03}.mp3", i));
            tokio::fs::write(&audio_path, &tts_segment.audio_data).await?;

            let duration = inspect_audio(&tts_segment.audio_data, Some("mp3"))?.duration;

            let slide_path = workdir.path().join(format!("slide_{:03}.png", i));
            self.renderer
                .render_to_file(segment_text, &self.options.slide_style(), &slide_path)?;

            let start = timeline.push_narrated(&slide_path, &audio_path, duration).start;
            segments.push(SegmentInfo {
                index: i,
                text: tts_segment.text,
                start,
                duration,
            });

            if i + 1 < texts.len() {
                tokio::time::sleep(self.options.request_pause()).await;
            }
        }

        if self.options.outro_enabled {
            let outro_path = workdir.path().join("slide_outro.png");
            self.renderer
                .render_to_file(&self.options.outro_text, &self.options.outro_style(), &outro_path)?;
            timeline.push_silent(&outro_path, self.options.outro_duration);
        }

        progress.update(100.0, "Сегменты озвучены")?;
        Ok(PreparedVideo {
            timeline,
            segments,
            workdir,
        })
    }

    /// Кодирует подготовленный видеоряд
    pub async fn encode(&self, prepared: &PreparedVideo, output: &VideoOutput) -> Result<VideoArtifact> {
        let progress = self.progress_tracker.create_child(70.0, 100.0);
        let video = self
            .encoder
            .encode(&prepared.timeline, prepared.workdir(), output, &progress)
            .await?;

        self.progress_tracker.update(100.0, "Видео сгенерировано")?;
        log_info(&format!(
            "Видео сгенерировано: {:.2} с, {} сегментов",
            prepared.timeline.total_duration(),
            prepared.segments.len()
        ));

        Ok(VideoArtifact {
            video,
            segments: prepared.segments.clone(),
            duration: prepared.timeline.total_duration(),
        })
    }
}

/// Путь к выходному файлу `<dir>/<name>.mp4`; имя не может содержать разделители пути
pub fn output_file_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidParameters(format!("Некорректное имя видео: {:?}", name)));
    }
    Ok(dir.join(format!("{}.mp4", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_path() {
        assert_eq!(
            output_file_path(Path::new("/out"), "video_generado").unwrap(),
            PathBuf::from("/out/video_generado.mp4")
        );
        assert_eq!(
            output_file_path(Path::new("."), " mi video ").unwrap(),
            PathBuf::from("./mi video.mp4")
        );
    }

    #[test]
    fn test_output_file_path_rejects_traversal() {
        assert!(output_file_path(Path::new("/out"), "").is_err());
        assert!(output_file_path(Path::new("/out"), "../etc/x").is_err());
        assert!(output_file_path(Path::new("/out"), "..").is_err());
    }
}
