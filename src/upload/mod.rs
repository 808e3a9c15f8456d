mod oauth;
mod secrets;
mod youtube;

pub use oauth::{
    authorization_url, loopback_redirect_uri, parse_redirect_request, AuthFlow, AuthPrompt, Authenticator, Token,
    TokenStore, DEFAULT_REDIRECT_TIMEOUT, OOB_REDIRECT_URI, YOUTUBE_UPLOAD_SCOPE,
};
pub use secrets::{ClientKind, ClientSecrets};
pub use youtube::{
    PrivacyStatus, VideoMetadata, VideoResource, YouTubeUploader, DEFAULT_CATEGORY_ID, YOUTUBE_UPLOAD_ENDPOINT,
};
