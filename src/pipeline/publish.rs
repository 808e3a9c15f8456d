use crate::config::VideoOptions;
use crate::error::Result;
use crate::logging::log_info;
use crate::text::description_excerpt;
use crate::upload::{AuthFlow, AuthPrompt, Authenticator, VideoMetadata, YouTubeUploader};
use crate::video::EncodedVideo;

/// Метаданные видео: название и начало исходного текста в качестве описания
pub fn video_metadata(name: &str, text: &str, options: &VideoOptions) -> VideoMetadata {
    VideoMetadata::new(name.trim(), description_excerpt(text, options.description_chars))
        .with_privacy_status(options.privacy_status)
}

/// Авторизуется и загружает видео на YouTube, возвращает идентификатор видео
pub async fn publish_video(
    video: &EncodedVideo,
    metadata: &VideoMetadata,
    authenticator: &Authenticator,
    flow: &AuthFlow,
    prompt: &mut dyn AuthPrompt,
    uploader: &YouTubeUploader,
) -> Result<String> {
    let access_token = authenticator.access_token(flow, prompt).await?;
    let video_id = uploader.upload(video, metadata, &access_token).await?;
    log_info(&format!(
        "Видео опубликовано: https://www.youtube.com/watch?v={}",
        video_id
    ));
    Ok(video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::PrivacyStatus;

    #[test]
    fn test_video_metadata_uses_text_excerpt() {
        let options = VideoOptions::default().with_privacy_status(PrivacyStatus::Private);
        let text = "a".repeat(250);
        let metadata = video_metadata(" mi_video ", &text, &options);

        assert_eq!(metadata.title, "mi_video");
        assert_eq!(metadata.description.chars().count(), 200);
        assert_eq!(metadata.privacy_status, PrivacyStatus::Private);
        assert_eq!(metadata.category_id, "22");
    }
}
