use crate::error::Result;
use std::future::Future;
use std::path::Path;

mod google;
mod retry;
mod voices;

pub use google::{GoogleAuth, GoogleTts, GOOGLE_TTS_ENDPOINT};
pub use retry::RetryPolicy;
pub use voices::{
    available_voices, find_voice, SsmlVoiceGender, Voice, DEFAULT_VOICE, LANGUAGE_CODE,
};

/// Озвученный сегмент текста
#[derive(Debug, Clone)]
pub struct TtsSegment {
    /// Порядковый номер сегмента
    pub index: usize,
    /// Текст сегмента
    pub text: String,
    /// MP3 данные
    pub audio_data: Vec<u8>,
}

impl TtsSegment {
    pub fn new(index: usize, text: &str, audio_data: Vec<u8>) -> Self {
        Self {
            index,
            text: text.to_string(),
            audio_data,
        }
    }
}

/// Интерфейс для TTS провайдеров
pub trait TtsProvider: Send + Sync {
    /// Синтезирует речь для текста и возвращает MP3
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Синтезирует речь и сохраняет в файл
    fn synthesize_to_file<P: AsRef<Path> + Send>(
        &self,
        text: &str,
        path: P,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Синтезирует речь для сегмента текста
    fn synthesize_segment(&self, index: usize, text: &str) -> impl Future<Output = Result<TtsSegment>> + Send;
}

impl TtsProvider for GoogleTts {
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        GoogleTts::synthesize(self, text)
    }

    fn synthesize_to_file<P: AsRef<Path> + Send>(
        &self,
        text: &str,
        path: P,
    ) -> impl Future<Output = Result<()>> + Send {
        GoogleTts::synthesize_to_file(self, text, path)
    }

    fn synthesize_segment(&self, index: usize, text: &str) -> impl Future<Output = Result<TtsSegment>> + Send {
        GoogleTts::synthesize_segment(self, index, text)
    }
}
