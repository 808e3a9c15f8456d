use crate::error::{Error, ErrorType, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Тип OAuth клиента из Google Cloud Console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Приложение для компьютера (`installed`)
    Installed,
    /// Веб-приложение (`web`)
    Web,
}

#[derive(Debug, Deserialize)]
struct RawClient {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSecrets {
    installed: Option<RawClient>,
    web: Option<RawClient>,
}

/// Секреты OAuth клиента (`client_secret_*.json`)
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecrets {
    pub kind: ClientKind,
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uris: Vec<String>,
}

impl std::fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}

impl ClientSecrets {
    /// Читает секреты из JSON файла
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorType::Config,
                &format!("Не удалось прочитать секреты клиента {}: {}", path.display(), e),
            )
        })?;
        Self::from_json(&content)
    }

    /// Разбирает секреты из строки JSON с разделом `installed` или `web`
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawSecrets = serde_json::from_str(content)?;
        let (kind, client) = match (raw.installed, raw.web) {
            (Some(client), _) => (ClientKind::Installed, client),
            (None, Some(client)) => (ClientKind::Web, client),
            (None, None) => {
                return Err(Error::new(
                    ErrorType::Config,
                    "В секретах клиента нет раздела installed или web",
                ))
            }
        };

        Ok(Self {
            kind,
            client_id: client.client_id,
            client_secret: client.client_secret,
            auth_uri: client.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: client.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            redirect_uris: client.redirect_uris,
        })
    }

    /// Первый зарегистрированный адрес перенаправления
    pub fn default_redirect_uri(&self) -> Option<&str> {
        self.redirect_uris.first().map(String::as_str)
    }
}
