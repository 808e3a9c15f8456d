use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_info};
use crate::video::EncodedVideo;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Адрес метода возобновляемой загрузки YouTube Data API v3
pub const YOUTUBE_UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Категория "People & Blogs"
pub const DEFAULT_CATEGORY_ID: &str = "22";

/// Видимость загруженного видео
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

impl FromStr for PrivacyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            _ => Err(Error::InvalidParameters(format!("Неизвестная видимость: {}", s))),
        }
    }
}

/// Метаданные загружаемого видео
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub privacy_status: PrivacyStatus,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            privacy_status: PrivacyStatus::default(),
        }
    }

    pub fn with_privacy_status(mut self, privacy_status: PrivacyStatus) -> Self {
        self.privacy_status = privacy_status;
        self
    }

    /// Тело ресурса `videos` для частей `snippet,status`
    pub fn to_resource(&self) -> VideoResource<'_> {
        VideoResource {
            snippet: Snippet {
                title: &self.title,
                description: &self.description,
                category_id: &self.category_id,
            },
            status: Status {
                privacy_status: self.privacy_status,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: Status,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    category_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    privacy_status: PrivacyStatus,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

/// Клиент загрузки видео на YouTube
pub struct YouTubeUploader {
    endpoint: String,
    client: reqwest::Client,
}

impl Default for YouTubeUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeUploader {
    pub fn new() -> Self {
        Self {
            endpoint: YOUTUBE_UPLOAD_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Загружает видео и возвращает его идентификатор
    pub async fn upload(&self, video: &EncodedVideo, metadata: &VideoMetadata, access_token: &str) -> Result<String> {
        let bytes = match video {
            EncodedVideo::File(path) => tokio::fs::read(path).await?,
            EncodedVideo::Memory(bytes) => bytes.clone(),
        };
        if bytes.is_empty() {
            return Err(Error::new(ErrorType::Upload, "Пустой файл видео"));
        }

        log_info(&format!("Загрузка видео \"{}\" ({} байт)", metadata.title, bytes.len()));

        let session = self.start_session(bytes.len(), metadata, access_token).await?;
        log_debug(&format!("Открыта сессия загрузки: {}", session));

        let response = self
            .client
            .put(&session)
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, "video/mp4")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!("YouTube вернул {}: {}", status, body)));
        }

        let uploaded: UploadedVideo = response.json().await?;
        log_info(&format!("Видео загружено, ID: {}", uploaded.id));
        Ok(uploaded.id)
    }

    async fn start_session(&self, length: usize, metadata: &VideoMetadata, access_token: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(access_token)
            .header("X-Upload-Content-Length", length.to_string())
            .header("X-Upload-Content-Type", "video/mp4")
            .json(&metadata.to_resource())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!("Не удалось начать загрузку ({}): {}", status, body)));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::new(ErrorType::Upload, "В ответе нет адреса сессии загрузки"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_json() {
        let metadata = VideoMetadata::new("video_generado", "Hola. Esto es una prueba.");
        let json = serde_json::to_value(metadata.to_resource()).unwrap();

        assert_eq!(json["snippet"]["title"], "video_generado");
        assert_eq!(json["snippet"]["description"], "Hola. Esto es una prueba.");
        assert_eq!(json["snippet"]["categoryId"], "22");
        assert_eq!(json["status"]["privacyStatus"], "public");
    }

    #[test]
    fn test_privacy_status_parsing() {
        assert_eq!("Unlisted".parse::<PrivacyStatus>().unwrap(), PrivacyStatus::Unlisted);
        assert_eq!(PrivacyStatus::Private.as_str(), "private");
        assert!("secret".parse::<PrivacyStatus>().is_err());
    }

    #[tokio::test]
    async fn test_empty_video_rejected_before_request() {
        let uploader = YouTubeUploader::new().with_endpoint("http://127.0.0.1:9/unused");
        let result = uploader
            .upload(&EncodedVideo::Memory(Vec::new()), &VideoMetadata::new("t", "d"), "token")
            .await;
        assert!(matches!(result, Err(Error::Upload(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let uploader = YouTubeUploader::new();
        let result = uploader
            .upload(&EncodedVideo::File("/nonexistent/video.mp4".into()), &VideoMetadata::new("t", "d"), "token")
            .await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
