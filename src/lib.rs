//! Превращает текстовый файл в озвученное слайд-шоу.
//!
//! Текст разбивается на сегменты, каждый сегмент озвучивается через
//! Google Cloud Text-to-Speech и рисуется на отдельном слайде, после чего
//! ffmpeg собирает слайды и аудио в MP4. Готовое видео можно загрузить на YouTube.

pub mod audio;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod text;
pub mod tts;
pub mod upload;
pub mod video;

pub use config::VideoOptions;
pub use error::{Error, ErrorType, Result};
pub use logging::{
    log_debug, log_error, log_info, log_trace, log_warning, setup_logging, setup_test_logging,
};
pub use pipeline::{
    output_file_path, publish_video, video_metadata, PreparedVideo, SegmentInfo, VideoArtifact,
    VideoCreator,
};
pub use progress::{ChildProgressTracker, ProgressCallback, ProgressTracker};
pub use render::{SlideRenderer, SlideStyle};
pub use text::{description_excerpt, segment_text};
pub use tts::{GoogleAuth, GoogleTts, TtsProvider, TtsSegment};
pub use upload::{
    AuthFlow, AuthPrompt, Authenticator, ClientSecrets, PrivacyStatus, TokenStore, VideoMetadata,
    YouTubeUploader,
};
pub use video::{EncodedVideo, Timeline, VideoOutput};
