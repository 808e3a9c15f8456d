use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_info, log_warning};
use crate::upload::secrets::ClientSecrets;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Область доступа для загрузки видео
pub const YOUTUBE_UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

/// Адрес перенаправления для ручного ввода кода
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Запас времени до истечения токена, после которого он считается просроченным
const EXPIRY_MARGIN_SECS: i64 = 60;

const REDIRECT_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nConnection: close\r\n\r\n\
<html><body><p>Авторизация завершена, окно можно закрыть.</p></body></html>";

const NOT_FOUND_RESPONSE: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Сколько ждать запроса в одном соединении с сервером перенаправления
const REDIRECT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Сколько по умолчанию ждать, пока пользователь пройдет страницу согласия
pub const DEFAULT_REDIRECT_TIMEOUT: Duration = Duration::from_secs(300);

/// Способ получения согласия пользователя
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFlow {
    /// Приложение для компьютера: код перехватывается локальным сервером на 127.0.0.1
    InstalledApp,
    /// Веб-поток: пользователь вставляет код вручную
    ManualCode {
        /// Адрес перенаправления; по умолчанию первый из секретов клиента
        redirect_uri: Option<String>,
    },
}

/// Взаимодействие с пользователем во время авторизации
pub trait AuthPrompt {
    /// Показывает пользователю ссылку на страницу согласия
    fn show_url(&mut self, url: &str);

    /// Запрашивает код авторизации
    fn read_code(&mut self) -> Result<String>;
}

/// OAuth токен
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// Проверяет, истек ли токен к моменту `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<String>, now: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: self.expires_in.map(|secs| now + ChronoDuration::seconds(secs)),
        }
    }
}

/// Файл с кэшированным токеном
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Загружает токен; отсутствие файла не является ошибкой
    pub fn load(&self) -> Result<Option<Token>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(token)?)?;
        log_debug(&format!("Токен сохранен в {}", self.path.display()));
        Ok(())
    }
}

/// Строит ссылку на страницу согласия
pub fn authorization_url(secrets: &ClientSecrets, redirect_uri: &str, state: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", YOUTUBE_UPLOAD_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| Error::new(ErrorType::Auth, &format!("Некорректный auth_uri: {}", e)))?;
    Ok(url.into())
}

/// Что пришло на сервер перенаправления
#[derive(Debug, PartialEq, Eq)]
enum Redirect {
    /// Код авторизации с правильным state
    Code(String),
    /// Пользователь отказал в доступе
    Denied(String),
    /// Посторонний запрос: favicon, пустое соединение, чужой state
    Foreign,
}

fn classify_redirect(request: &str, expected_state: &str) -> Redirect {
    let target = request.lines().next().and_then(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("GET"), Some(target)) if target.starts_with("/?") => Some(target),
            _ => None,
        }
    });
    let Some(target) = target else {
        return Redirect::Foreign;
    };
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{}", target)) else {
        return Redirect::Foreign;
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Redirect::Foreign;
    }
    match (code, error) {
        (_, Some(error)) => Redirect::Denied(error),
        (Some(code), None) => Redirect::Code(code),
        (None, None) => Redirect::Foreign,
    }
}

/// Извлекает код авторизации из первой строки HTTP запроса перенаправления
pub fn parse_redirect_request(request: &str, expected_state: &str) -> Result<String> {
    match classify_redirect(request, expected_state) {
        Redirect::Code(code) => Ok(code),
        Redirect::Denied(error) => Err(Error::Auth(format!("Пользователь отклонил доступ: {}", error))),
        Redirect::Foreign => Err(Error::new(ErrorType::Auth, "Некорректный запрос перенаправления")),
    }
}

/// Адрес перенаправления для локального сервера
pub fn loopback_redirect_uri(addr: SocketAddr) -> String {
    format!("http://{}:{}", addr.ip(), addr.port())
}

fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Клиент OAuth 2 для Google
pub struct Authenticator {
    secrets: ClientSecrets,
    store: Option<TokenStore>,
    redirect_timeout: Duration,
    client: reqwest::Client,
}

impl Authenticator {
    pub fn new(secrets: ClientSecrets) -> Self {
        Self {
            secrets,
            store: None,
            redirect_timeout: DEFAULT_REDIRECT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Включает кэширование токена в файле
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Ограничивает ожидание перенаправления в потоке для компьютера
    pub fn with_redirect_timeout(mut self, timeout: Duration) -> Self {
        self.redirect_timeout = timeout;
        self
    }

    pub fn secrets(&self) -> &ClientSecrets {
        &self.secrets
    }

    /// Возвращает действующий токен доступа: из кэша, обновленный или полученный заново
    pub async fn access_token(&self, flow: &AuthFlow, prompt: &mut dyn AuthPrompt) -> Result<String> {
        let cached = match &self.store {
            Some(store) => store.load().unwrap_or_else(|e| {
                log_warning(&format!("Не удалось прочитать кэш токена: {}", e));
                None
            }),
            None => None,
        };

        let token = match cached {
            Some(token) if !token.is_expired() => {
                log_debug("Используется кэшированный токен");
                token
            }
            Some(Token { refresh_token: Some(refresh_token), .. }) => {
                match self.refresh(&refresh_token).await {
                    Ok(token) => token,
                    Err(e) => {
                        log_warning(&format!("Не удалось обновить токен, нужна повторная авторизация: {}", e));
                        self.authorize(flow, prompt).await?
                    }
                }
            }
            _ => self.authorize(flow, prompt).await?,
        };

        if let Some(store) = &self.store {
            store.save(&token)?;
        }
        Ok(token.access_token)
    }

    /// Проходит авторизацию выбранным способом
    pub async fn authorize(&self, flow: &AuthFlow, prompt: &mut dyn AuthPrompt) -> Result<Token> {
        let state = new_state();

        let (code, redirect_uri) = match flow {
            AuthFlow::InstalledApp => {
                let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
                let redirect_uri = loopback_redirect_uri(listener.local_addr()?);

                prompt.show_url(&authorization_url(&self.secrets, &redirect_uri, &state)?);
                log_info(&format!("Ожидание перенаправления на {}", redirect_uri));

                let code = receive_code(&listener, &state, self.redirect_timeout).await?;
                (code, redirect_uri)
            }
            AuthFlow::ManualCode { redirect_uri } => {
                let redirect_uri = redirect_uri
                    .clone()
                    .or_else(|| self.secrets.default_redirect_uri().map(str::to_string))
                    .unwrap_or_else(|| OOB_REDIRECT_URI.to_string());

                prompt.show_url(&authorization_url(&self.secrets, &redirect_uri, &state)?);
                let code = prompt.read_code()?.trim().to_string();
                if code.is_empty() {
                    return Err(Error::new(ErrorType::Auth, "Код авторизации не введен"));
                }
                (code, redirect_uri)
            }
        };

        self.exchange_code(&code, &redirect_uri).await
    }

    /// Обменивает код авторизации на токен
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Token> {
        let params = [
            ("code", code),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];
        let token = self.token_request(&params, None).await?;
        log_info("Получен новый токен доступа");
        Ok(token)
    }

    /// Обновляет токен по refresh token
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        let params = [
            ("refresh_token", refresh_token),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let token = self.token_request(&params, Some(refresh_token.to_string())).await?;
        log_info("Токен доступа обновлен");
        Ok(token)
    }

    async fn token_request(&self, params: &[(&str, &str)], previous_refresh: Option<String>) -> Result<Token> {
        let response = self.client.post(&self.secrets.token_uri).form(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("Сервер токенов вернул {}: {}", status, body)));
        }

        let response: TokenResponse = response.json().await?;
        Ok(response.into_token(previous_refresh, Utc::now()))
    }
}

/// Ждет перенаправления с кодом не дольше `deadline`.
///
/// Соединения обрабатываются параллельно, поэтому простаивающее соединение
/// браузера не мешает настоящему перенаправлению.
async fn receive_code(listener: &TcpListener, state: &str, deadline: Duration) -> Result<String> {
    tokio::time::timeout(deadline, accept_redirects(listener, state))
        .await
        .map_err(|_| Error::new(ErrorType::Auth, "Истекло время ожидания перенаправления"))?
}

async fn accept_redirects(listener: &TcpListener, state: &str) -> Result<String> {
    let (tx, mut rx) = mpsc::channel::<Result<String>>(1);
    let state: Arc<str> = Arc::from(state);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                log_debug(&format!("Подключение к серверу перенаправления от {}", peer));

                let tx = tx.clone();
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Some(result) = handle_connection(stream, &state).await {
                        let _ = tx.send(result).await;
                    }
                });
            }
            Some(result) = rx.recv() => return result,
        }
    }
}

async fn handle_connection(mut stream: TcpStream, state: &str) -> Option<Result<String>> {
    let request = match tokio::time::timeout(REDIRECT_READ_TIMEOUT, read_request(&mut stream)).await {
        Ok(Ok(request)) => request,
        Ok(Err(e)) => {
            log_debug(&format!("Ошибка чтения запроса перенаправления: {}", e));
            return None;
        }
        Err(_) => {
            log_debug("Соединение не прислало запрос, закрываем");
            return None;
        }
    };

    let (response, result) = match classify_redirect(&request, state) {
        Redirect::Code(code) => (REDIRECT_RESPONSE, Some(Ok(code))),
        Redirect::Denied(error) => (
            REDIRECT_RESPONSE,
            Some(Err(Error::Auth(format!("Пользователь отклонил доступ: {}", error)))),
        ),
        Redirect::Foreign => (NOT_FOUND_RESPONSE, None),
    };

    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
    result
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buffer = vec![0u8; 8192];
    let mut read = 0;
    while read < buffer.len() {
        let n = stream.read(&mut buffer[read..]).await?;
        if n == 0 {
            break;
        }
        read += n;
        if buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buffer[..read]).into_owned())
}
