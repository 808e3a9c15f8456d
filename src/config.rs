use crate::error::{Error, ErrorType, Result};
use crate::render::{SlideStyle, DEFAULT_FONT_PATH, OUTRO_FONT_SIZE, OUTRO_TEXT};
use crate::text::{DEFAULT_DESCRIPTION_CHARS, DEFAULT_SEGMENT_CHARS};
use crate::tts::{RetryPolicy, DEFAULT_VOICE};
use crate::upload::PrivacyStatus;
use crate::video::EncodeSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Настройки создания видео.
///
/// Все поля имеют значения по умолчанию, поэтому TOML файл может задавать
/// только нужные параметры.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    /// Голос синтеза речи
    pub voice: String,
    /// Максимальная длина сегмента текста в символах
    pub segment_chars: usize,
    /// Пауза между запросами к синтезу речи, мс
    pub request_pause_ms: u64,
    /// Количество повторов при HTTP 429
    pub max_retries: u32,
    /// Базовая задержка повтора, мс (задержка n-го повтора = база * 2^n)
    pub retry_base_delay_ms: u64,

    /// Путь к TrueType шрифту
    pub font_path: PathBuf,
    pub slide_width: u32,
    pub slide_height: u32,
    pub font_size: f32,
    pub line_height: u32,
    pub margin: u32,

    /// Добавлять ли финальный слайд
    pub outro_enabled: bool,
    pub outro_text: String,
    pub outro_font_size: f32,
    /// Длительность финального слайда, с
    pub outro_duration: f64,

    /// Папка для временных файлов; по умолчанию системная
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// Путь к ffmpeg
    pub ffmpeg_path: PathBuf,
    pub fps: u32,
    pub preset: String,
    pub threads: u32,

    /// Длина описания видео на YouTube в символах
    pub description_chars: usize,
    pub privacy_status: PrivacyStatus,

    /// Уровень логирования: error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for VideoOptions {
    fn default() -> Self {
        let style = SlideStyle::default();
        let encode = EncodeSettings::default();
        Self {
            voice: DEFAULT_VOICE.to_string(),
            segment_chars: DEFAULT_SEGMENT_CHARS,
            request_pause_ms: 200,
            max_retries: 3,
            retry_base_delay_ms: 1000,

            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            slide_width: style.width,
            slide_height: style.height,
            font_size: style.font_size,
            line_height: style.line_height,
            margin: style.margin,

            outro_enabled: true,
            outro_text: OUTRO_TEXT.to_string(),
            outro_font_size: OUTRO_FONT_SIZE,
            outro_duration: 5.0,

            work_dir: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            fps: encode.fps,
            preset: encode.preset,
            threads: encode.threads,

            description_chars: DEFAULT_DESCRIPTION_CHARS,
            privacy_status: PrivacyStatus::Public,

            log_level: "info".to_string(),
        }
    }
}

impl VideoOptions {
    /// Загружает настройки из TOML файла
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| {
            Error::new(ErrorType::Config, &format!("{}: {}", path.display(), e))
        })
    }

    /// Загружает настройки из файла, если он существует, иначе возвращает настройки по умолчанию
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Разбирает настройки из строки TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let options: Self = toml::from_str(content)
            .map_err(|e| Error::new(ErrorType::Config, &e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Проверяет согласованность настроек
    pub fn validate(&self) -> Result<()> {
        if self.segment_chars == 0 {
            return Err(Error::InvalidParameters("segment_chars должен быть больше 0".into()));
        }
        if self.slide_width < 2 || self.slide_height < 2 {
            return Err(Error::InvalidParameters("Размер слайда слишком мал".into()));
        }
        // yuv420p требует четных размеров кадра
        if self.slide_width % 2 != 0 || self.slide_height % 2 != 0 {
            return Err(Error::InvalidParameters("Размеры слайда должны быть четными".into()));
        }
        if self.margin >= self.slide_width {
            return Err(Error::InvalidParameters("Отступ больше ширины слайда".into()));
        }
        if self.font_size <= 0.0 || self.outro_font_size <= 0.0 {
            return Err(Error::InvalidParameters("Размер шрифта должен быть положительным".into()));
        }
        if self.fps == 0 {
            return Err(Error::InvalidParameters("fps должен быть больше 0".into()));
        }
        if !self.outro_duration.is_finite() || self.outro_duration < 0.0 {
            return Err(Error::InvalidParameters("Некорректная длительность финального слайда".into()));
        }
        self.log_level_filter()?;
        Ok(())
    }

    /// Уровень логирования
    pub fn log_level_filter(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| Error::InvalidParameters(format!("Неизвестный уровень логирования: {}", self.log_level)))
    }

    /// Оформление обычных слайдов
    pub fn slide_style(&self) -> SlideStyle {
        SlideStyle {
            width: self.slide_width,
            height: self.slide_height,
            font_size: self.font_size,
            line_height: self.line_height,
            margin: self.margin,
            ..SlideStyle::default()
        }
    }

    /// Оформление финального слайда
    pub fn outro_style(&self) -> SlideStyle {
        SlideStyle {
            font_size: self.outro_font_size,
            ..self.slide_style()
        }
    }

    /// Политика повторов синтеза речи
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }

    /// Параметры кодирования видео
    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            fps: self.fps,
            preset: self.preset.clone(),
            threads: self.threads,
            ..EncodeSettings::default()
        }
    }

    pub fn request_pause(&self) -> Duration {
        Duration::from_millis(self.request_pause_ms)
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_font_path(mut self, font_path: impl Into<PathBuf>) -> Self {
        self.font_path = font_path.into();
        self
    }

    pub fn with_outro(mut self, enabled: bool) -> Self {
        self.outro_enabled = enabled;
        self
    }

    pub fn with_privacy_status(mut self, privacy_status: PrivacyStatus) -> Self {
        self.privacy_status = privacy_status;
        self
    }

    pub fn with_ffmpeg_path(mut self, ffmpeg_path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = ffmpeg_path.into();
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    pub fn with_request_pause(mut self, pause: Duration) -> Self {
        self.request_pause_ms = pause.as_millis() as u64;
        self
    }
}
