use thiserror::Error;

/// Типы ошибок, которые могут возникнуть при создании видео
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Ошибка ввода/вывода
    Io,
    /// Ошибка синтеза речи
    Tts,
    /// Ошибка обработки аудио
    AudioProcessingError,
    /// Ошибка отрисовки слайда
    Rendering,
    /// Ошибка кодирования видео
    VideoEncoding,
    /// Ошибка авторизации OAuth
    Auth,
    /// Ошибка загрузки на YouTube
    Upload,
    /// Ошибка конфигурации
    Config,
    /// Неверные параметры
    InvalidParameters,
}

/// Ошибки, которые могут возникнуть при создании и загрузке видео
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка синтеза речи: {0}")]
    Tts(String),

    /// Сервис синтеза ответил статусом, отличным от успешного
    #[error("Ошибка синтеза речи: HTTP {status}: {body}")]
    TtsStatus { status: u16, body: String },

    /// Сервис синтеза отвечал 429 на все попытки
    #[error("Достигнуто максимальное количество повторов ({attempts}): {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("Ошибка обработки аудио: {0}")]
    AudioProcessing(String),

    #[error("Ошибка отрисовки слайда: {0}")]
    Rendering(String),

    #[error("Ошибка кодирования видео: {0}")]
    VideoEncoding(String),

    #[error("Ошибка авторизации: {0}")]
    Auth(String),

    #[error("Ошибка загрузки видео: {0}")]
    Upload(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    #[error("Неверные параметры: {0}")]
    InvalidParameters(String),

    #[error("Ошибка HTTP запроса: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Ошибка сериализации JSON: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Ошибка логирования: {0}")]
    LoggedError(String),
}

impl Error {
    /// Создает новую ошибку указанного типа с сообщением
    pub fn new(error_type: ErrorType, message: &str) -> Self {
        match error_type {
            ErrorType::Io => Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
            ErrorType::Tts => Self::Tts(message.to_string()),
            ErrorType::AudioProcessingError => Self::AudioProcessing(message.to_string()),
            ErrorType::Rendering => Self::Rendering(message.to_string()),
            ErrorType::VideoEncoding => Self::VideoEncoding(message.to_string()),
            ErrorType::Auth => Self::Auth(message.to_string()),
            ErrorType::Upload => Self::Upload(message.to_string()),
            ErrorType::Config => Self::Config(message.to_string()),
            ErrorType::InvalidParameters => Self::InvalidParameters(message.to_string()),
        }
    }

    /// Возвращает true, если сервис ответил ограничением частоты запросов (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::TtsStatus { status, .. } => *status == 429,
            Self::HttpRequest(e) => e.status().map(|s| s.as_u16() == 429).unwrap_or(false),
            _ => false,
        }
    }
}

/// Результат с обработкой ошибок
pub type Result<T> = std::result::Result<T, Error>;
