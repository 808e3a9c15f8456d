use assert_fs::prelude::*;
use predicates::prelude::*;
use tts_slides::upload::{ClientKind, Token, OOB_REDIRECT_URI};
use tts_slides::{
    video_metadata, AuthFlow, AuthPrompt, Authenticator, ClientSecrets, Error, PrivacyStatus, Result, TokenStore,
    VideoOptions,
};

struct NoPrompt;

impl AuthPrompt for NoPrompt {
    fn show_url(&mut self, _url: &str) {}

    fn read_code(&mut self) -> Result<String> {
        Ok(String::new())
    }
}

#[test]
fn test_client_secrets_from_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("client_secret.json");
    file.write_str(
        r#"{"web": {"client_id": "web-id", "client_secret": "web-secret",
            "redirect_uris": ["https://example.org/callback"]}}"#,
    )
    .unwrap();

    let secrets = ClientSecrets::from_file(file.path()).unwrap();
    assert_eq!(secrets.kind, ClientKind::Web);
    assert_eq!(secrets.default_redirect_uri(), Some("https://example.org/callback"));
    assert!(!format!("{:?}", secrets).contains("web-secret"));
}

#[test]
fn test_client_secrets_missing_file() {
    let result = ClientSecrets::from_file("/nonexistent/client_secret.json");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_token_store_writes_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    let store = TokenStore::new(temp.child("cache").child("token.json").path());
    store
        .save(&Token {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_at: None,
        })
        .unwrap();

    let saved = temp.child("cache").child("token.json");
    saved.assert(predicate::path::is_file());
    saved.assert(predicate::str::contains("\"refresh_token\": \"refresh\""));
    saved.assert(predicate::str::contains("expires_at").not());
}

#[tokio::test]
async fn test_cached_token_used_without_prompt() {
    let temp = assert_fs::TempDir::new().unwrap();
    let store = TokenStore::new(temp.child("token.json").path());
    store
        .save(&Token {
            access_token: "cached".into(),
            refresh_token: None,
            expires_at: None,
        })
        .unwrap();

    let secrets = ClientSecrets::from_json(r#"{"installed": {"client_id": "id", "client_secret": "s"}}"#).unwrap();
    let auth = Authenticator::new(secrets).with_token_store(store);

    let token = auth.access_token(&AuthFlow::InstalledApp, &mut NoPrompt).await.unwrap();
    assert_eq!(token, "cached");
}

#[tokio::test]
async fn test_manual_flow_falls_back_to_oob() {
    struct Recording(Vec<String>);

    impl AuthPrompt for Recording {
        fn show_url(&mut self, url: &str) {
            self.0.push(url.to_string());
        }

        fn read_code(&mut self) -> Result<String> {
            Ok(String::new())
        }
    }

    let secrets = ClientSecrets::from_json(r#"{"web": {"client_id": "id", "client_secret": "s"}}"#).unwrap();
    let auth = Authenticator::new(secrets);
    let mut prompt = Recording(Vec::new());

    let result = auth.authorize(&AuthFlow::ManualCode { redirect_uri: None }, &mut prompt).await;
    assert!(matches!(result, Err(Error::Auth(_))));

    let encoded: String = reqwest::Url::parse_with_params("http://x", &[("r", OOB_REDIRECT_URI)])
        .unwrap()
        .query()
        .unwrap()
        .trim_start_matches("r=")
        .to_string();
    assert!(prompt.0[0].contains(&format!("redirect_uri={}", encoded)));
}

#[test]
fn test_video_metadata_from_options() {
    let options = VideoOptions::default().with_privacy_status(PrivacyStatus::Unlisted);
    let text = "Érase una vez. ".repeat(30);
    let metadata = video_metadata("cuento", &text, &options);

    assert_eq!(metadata.title, "cuento");
    assert_eq!(metadata.description, text.chars().take(200).collect::<String>());
    assert_eq!(metadata.privacy_status, PrivacyStatus::Unlisted);
}
