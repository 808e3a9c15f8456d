use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tts_slides::tts::{TtsProvider, TtsSegment};
use tts_slides::{Error, Result};

/// WAV с тишиной: symphonia определяет формат по содержимому, поэтому
/// такие данные подходят вместо MP3 от настоящего сервиса
pub fn silent_wav(sample_rate: u32, frames: u32) -> Vec<u8> {
    let data_size = frames * 2;
    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(44 + data_size as usize, 0);
    wav
}

// Мок для TtsProvider: половина секунды тишины на каждые 10 символов
#[derive(Clone, Default)]
pub struct MockTtsProvider {
    pub requests: Arc<Mutex<Vec<String>>>,
    pub fail_on: Option<usize>,
}

impl MockTtsProvider {
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn speak(&self, text: &str) -> Result<Vec<u8>> {
        let mut requests = self.requests.lock().unwrap();
        if self.fail_on == Some(requests.len()) {
            return Err(Error::Tts("HTTP 500: backend error".into()));
        }
        requests.push(text.to_string());
        let tens = text.chars().count().div_ceil(10).max(1) as u32;
        Ok(silent_wav(8000, tens * 4000))
    }
}

impl TtsProvider for MockTtsProvider {
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
        let result = self.speak(text);
        async move { result }
    }

    fn synthesize_to_file<P: AsRef<Path> + Send>(
        &self,
        text: &str,
        path: P,
    ) -> impl Future<Output = Result<()>> + Send {
        let result = self.speak(text);
        async move {
            tokio::fs::write(path, result?).await?;
            Ok(())
        }
    }

    fn synthesize_segment(&self, index: usize, text: &str) -> impl Future<Output = Result<TtsSegment>> + Send {
        let result = self.speak(text).map(|audio| TtsSegment::new(index, text, audio));
        async move { result }
    }
}

/// Путь к системному шрифту, если он установлен
pub fn system_font() -> Option<&'static Path> {
    let path = Path::new(tts_slides::render::DEFAULT_FONT_PATH);
    path.exists().then_some(path)
}

/// Установлен ли ffmpeg
pub fn ffmpeg_available() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Содержимое папки, отсортированное по имени
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
