use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_warning};
use crate::tts::retry::RetryPolicy;
use crate::tts::voices::{find_voice, Voice};
use crate::tts::TtsSegment;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Адрес REST метода синтеза Cloud Text-to-Speech
pub const GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Способ авторизации в Cloud Text-to-Speech
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleAuth {
    /// Ключ API, передается параметром `key`
    ApiKey(String),
    /// OAuth токен доступа сервисного аккаунта
    AccessToken(String),
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

impl GoogleAuth {
    /// Берет учетные данные из окружения: `GOOGLE_TTS_API_KEY`, затем `GOOGLE_ACCESS_TOKEN`
    pub fn from_env() -> Result<Self> {
        if let Ok(key) = std::env::var("GOOGLE_TTS_API_KEY") {
            return Ok(Self::ApiKey(key));
        }
        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            return Ok(Self::AccessToken(token));
        }
        Err(Error::new(
            ErrorType::Config,
            "Не заданы GOOGLE_TTS_API_KEY или GOOGLE_ACCESS_TOKEN",
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Клиент Google Cloud Text-to-Speech
pub struct GoogleTts {
    auth: GoogleAuth,
    voice: Voice,
    retry_policy: RetryPolicy,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleTts {
    /// Создает клиент для указанного голоса из каталога
    pub fn new(auth: GoogleAuth, voice_name: &str) -> Result<Self> {
        Ok(Self {
            auth,
            voice: find_voice(voice_name)?,
            retry_policy: RetryPolicy::default(),
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Устанавливает политику повторов
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Переопределяет адрес сервиса
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Выбранный голос
    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    fn request_body<'a>(&'a self, text: &'a str) -> SynthesizeRequest<'a> {
        SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: self.voice.language_code(),
                name: self.voice.name,
                ssml_gender: self.voice.gender.as_str(),
            },
            audio_config: AudioConfig { audio_encoding: "MP3" },
        }
    }

    async fn request_once(&self, text: &str) -> Result<Vec<u8>> {
        let mut request = self.client.post(&self.endpoint).json(&self.request_body(text));
        request = match &self.auth {
            GoogleAuth::ApiKey(key) => request.query(&[("key", key)]),
            GoogleAuth::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request.send().await.map_err(|e| {
            Error::new(
                ErrorType::Tts,
                &format!("Ошибка при отправке запроса к Text-to-Speech: {}", e),
            )
        })?;

        let status = response.status();
        log_debug(&format!("Получен ответ от Text-to-Speech, статус: {}", status));

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Не удалось получить текст ошибки".to_string());
            return Err(Error::TtsStatus {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body: SynthesizeResponse = response.json().await?;
        let bytes = BASE64.decode(body.audio_content.as_bytes()).map_err(|e| {
            Error::new(ErrorType::Tts, &format!("Некорректный base64 в ответе: {}", e))
        })?;

        if bytes.len() < 100 {
            log_warning(&format!("Получены подозрительно малые аудио данные: {} байт", bytes.len()));
        } else {
            log_debug(&format!("Получено {} байт MP3", bytes.len()));
        }

        Ok(bytes)
    }

    /// Синтезирует речь для текста, повторяя запрос при HTTP 429
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        log_debug(&format!(
            "Text-to-Speech запрос ({} символов), голос {}",
            text.chars().count(),
            self.voice.name
        ));
        self.retry_policy.run(|| self.request_once(text)).await
    }

    /// Синтезирует речь и сохраняет MP3 в файл
    pub async fn synthesize_to_file<P: AsRef<Path>>(&self, text: &str, path: P) -> Result<()> {
        let audio_data = self.synthesize(text).await?;
        let mut file = File::create(path).await?;
        file.write_all(&audio_data).await?;
        Ok(())
    }

    /// Синтезирует речь для сегмента текста
    pub async fn synthesize_segment(&self, index: usize, text: &str) -> Result<TtsSegment> {
        let audio_data = self.synthesize(text).await?;
        Ok(TtsSegment::new(index, text, audio_data))
    }
}
