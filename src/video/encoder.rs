use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_info};
use crate::progress::ChildProgressTracker;
use crate::video::timeline::{Clip, Timeline};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Куда записывается готовое видео
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutput {
    /// MP4 файл на диске
    File(PathBuf),
    /// Буфер в памяти (фрагментированный MP4)
    Memory,
}

/// Результат кодирования
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedVideo {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl EncodedVideo {
    /// Размер видео в байтах
    pub fn len(&self) -> Result<u64> {
        match self {
            Self::File(path) => Ok(std::fs::metadata(path)?.len()),
            Self::Memory(bytes) => Ok(bytes.len() as u64),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }
}

/// Параметры кодирования
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub fps: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub threads: u32,
    pub audio_sample_rate: u32,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            fps: 24,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "ultrafast".to_string(),
            threads: 4,
            audio_sample_rate: 44100,
        }
    }
}

/// Кодировщик видео через внешний ffmpeg.
///
/// Каждый клип кодируется в отдельный MP4 фрагмент с одинаковыми параметрами
/// потоков, затем фрагменты склеиваются concat демультиплексором без
/// перекодирования.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg: PathBuf,
    settings: EncodeSettings,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg", EncodeSettings::default())
    }
}

impl FfmpegEncoder {
    pub fn new(ffmpeg: impl Into<PathBuf>, settings: EncodeSettings) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &EncodeSettings {
        &self.settings
    }

    /// Аргументы ffmpeg для кодирования одного клипа в файл `output`
    pub fn part_args(&self, clip: &Clip, output: &Path) -> Vec<OsString> {
        let s = &self.settings;
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-loop".into(),
            "1".into(),
            "-framerate".into(),
            s.fps.to_string().into(),
            "-i".into(),
            clip.slide.clone().into(),
        ];

        match &clip.audio {
            Some(audio) => {
                args.push("-i".into());
                args.push(audio.clone().into());
            }
            None => {
                args.append(&mut vec!["-f".into(), "lavfi".into(), "-i".into()]);
                args.push(format!("anullsrc=channel_layout=stereo:sample_rate={}", s.audio_sample_rate).into());
            }
        }

        // аудио клипа длится ровно `-t`, как и видео
        if clip.audio.is_some() {
            args.append(&mut vec!["-af".into(), "apad".into()]);
        }

        args.append(&mut vec![
            "-map".into(),
            "0:v:0".into(),
            "-map".into(),
            "1:a:0".into(),
            "-t".into(),
            format!("{:.3}", clip.duration).into(),
            "-c:v".into(),
            s.video_codec.clone().into(),
            "-preset".into(),
            s.preset.clone().into(),
            "-tune".into(),
            "stillimage".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-r".into(),
            s.fps.to_string().into(),
            "-c:a".into(),
            s.audio_codec.clone().into(),
            "-ar".into(),
            s.audio_sample_rate.to_string().into(),
            "-ac".into(),
            "2".into(),
            "-threads".into(),
            s.threads.to_string().into(),
            output.into(),
        ]);

        args
    }

    /// Аргументы ffmpeg для склейки фрагментов из списка `list`
    pub fn concat_args(&self, list: &Path, output: &VideoOutput) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list.into(),
            "-c".into(),
            "copy".into(),
        ];

        match output {
            VideoOutput::File(path) => {
                args.append(&mut vec!["-movflags".into(), "+faststart".into(), path.into()]);
            }
            VideoOutput::Memory => {
                args.append(&mut vec![
                    "-movflags".into(),
                    "frag_keyframe+empty_moov".into(),
                    "-f".into(),
                    "mp4".into(),
                    "pipe:1".into(),
                ]);
            }
        }

        args
    }

    async fn run(&self, args: Vec<OsString>, what: &str) -> Result<Vec<u8>> {
        log_debug(&format!("ffmpeg {}: {:?}", what, args));

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::new(
                    ErrorType::VideoEncoding,
                    &format!("Не удалось запустить {}: {}", self.ffmpeg.display(), e),
                )
            })?;

        if !output.status.success() {
            return Err(Error::VideoEncoding(format!(
                "ffmpeg завершился с ошибкой ({}) на этапе \"{}\": {}",
                output.status,
                what,
                stderr_tail(&output.stderr, 20)
            )));
        }

        Ok(output.stdout)
    }

    /// Кодирует видеоряд. Промежуточные файлы пишутся в `workdir`.
    pub async fn encode(
        &self,
        timeline: &Timeline,
        workdir: &Path,
        output: &VideoOutput,
        progress: &ChildProgressTracker,
    ) -> Result<EncodedVideo> {
        if timeline.is_empty() {
            return Err(Error::new(ErrorType::VideoEncoding, "Видеоряд пуст"));
        }

        let mut parts = Vec::with_capacity(timeline.len());
        for (i, clip) in timeline.clips().iter().enumerate() {
            progress.step(i, timeline.len() + 1, &format!("Кодирование клипа {}/{}", i + 1, timeline.len()))?;

            let part = workdir.join(format!("part_{:03}.mp4", i));
            self.run(self.part_args(clip, &part), "кодирование клипа").await?;
            parts.push(part);
        }

        let list = workdir.join("parts.txt");
        tokio::fs::write(&list, concat_list(&parts)).await?;

        progress.step(timeline.len(), timeline.len() + 1, "Склейка видео")?;
        let stdout = self.run(self.concat_args(&list, output), "склейка").await?;

        let encoded = match output {
            VideoOutput::File(path) => EncodedVideo::File(path.clone()),
            VideoOutput::Memory => {
                if stdout.is_empty() {
                    return Err(Error::new(ErrorType::VideoEncoding, "ffmpeg не вернул данных"));
                }
                EncodedVideo::Memory(stdout)
            }
        };

        log_info(&format!(
            "Видео закодировано: {} клипов, {:.2} с",
            timeline.len(),
            timeline.total_duration()
        ));
        progress.update(100.0, "Видео готово")?;

        Ok(encoded)
    }
}

/// Содержимое списка для concat демультиплексора
pub fn concat_list(parts: &[PathBuf]) -> String {
    parts
        .iter()
        .map(|p| format!("file '{}'\n", p.to_string_lossy().replace('\'', "'\\''")))
        .collect()
}

fn stderr_tail(stderr: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
