use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tts_slides::tts::available_voices;
use tts_slides::upload::ClientKind;
use tts_slides::{
    log_debug, log_info, publish_video, setup_logging, video_metadata, AuthFlow, AuthPrompt, Authenticator,
    ClientSecrets, EncodedVideo, GoogleAuth, GoogleTts, PrivacyStatus, TokenStore, VideoCreator, VideoOptions,
    YouTubeUploader,
};

const CLIENT_SECRETS_ENV: &str = "YOUTUBE_CLIENT_SECRETS";
const DEFAULT_CLIENT_SECRETS: &str = "client_secrets.json";
const DEFAULT_TOKEN_CACHE: &str = "youtube_token.json";

#[derive(Parser, Debug)]
#[command(name = "tts-slides")]
#[command(about = "Создает озвученное слайд-шоу из текстового файла и загружает его на YouTube")]
#[command(version)]
struct Args {
    /// TOML файл с настройками
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Подробный вывод
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Создать видео из текстового файла
    Generate {
        /// Текстовый файл в UTF-8
        file: PathBuf,

        /// Голос синтеза речи
        #[arg(long)]
        voice: Option<String>,

        /// Имя видео, оно же название на YouTube
        #[arg(short, long, default_value = "video_generado")]
        name: String,

        /// Папка для готового видео
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Собрать видео в памяти, не сохраняя файл
        #[arg(long)]
        in_memory: bool,

        /// Загрузить видео на YouTube
        #[arg(long)]
        upload: bool,

        #[command(flatten)]
        youtube: YouTubeArgs,
    },
    /// Показать доступные голоса
    Voices,
    /// Загрузить готовый MP4 на YouTube
    Upload {
        /// Файл видео
        video: PathBuf,

        /// Название видео; по умолчанию имя файла
        #[arg(short, long)]
        title: Option<String>,

        /// Текстовый файл, из которого берется описание
        #[arg(long)]
        text: Option<PathBuf>,

        #[command(flatten)]
        youtube: YouTubeArgs,
    },
}

#[derive(clap::Args, Debug)]
struct YouTubeArgs {
    /// Способ авторизации; по умолчанию определяется по типу клиента
    #[arg(long, value_enum)]
    auth: Option<AuthMode>,

    /// Видимость видео
    #[arg(long, value_enum)]
    privacy: Option<Privacy>,

    /// Файл с секретами OAuth клиента (или переменная YOUTUBE_CLIENT_SECRETS)
    #[arg(long)]
    client_secrets: Option<PathBuf>,

    /// Файл для кэширования токена
    #[arg(long, default_value = DEFAULT_TOKEN_CACHE)]
    token_cache: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AuthMode {
    /// Локальный сервер перехватывает перенаправление
    Installed,
    /// Код авторизации вводится вручную
    Manual,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Privacy {
    Public,
    Unlisted,
    Private,
}

impl From<Privacy> for PrivacyStatus {
    fn from(privacy: Privacy) -> Self {
        match privacy {
            Privacy::Public => PrivacyStatus::Public,
            Privacy::Unlisted => PrivacyStatus::Unlisted,
            Privacy::Private => PrivacyStatus::Private,
        }
    }
}

/// Показывает ссылку в stderr и читает код из stdin
struct TerminalPrompt;

impl AuthPrompt for TerminalPrompt {
    fn show_url(&mut self, url: &str) {
        eprintln!("Откройте ссылку в браузере и разрешите доступ:\n\n{}\n", url);
    }

    fn read_code(&mut self) -> tts_slides::Result<String> {
        eprint!("Введите код авторизации: ");
        std::io::stderr().flush()?;
        let mut code = String::new();
        std::io::stdin().lock().read_line(&mut code)?;
        Ok(code)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let options = match &args.config {
        Some(path) => VideoOptions::load(path)
            .with_context(|| format!("Не удалось загрузить настройки из {}", path.display()))?,
        None => VideoOptions::default(),
    };
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        options.log_level_filter()?
    };
    setup_logging(level);

    match args.command {
        Commands::Voices => {
            for voice in available_voices() {
                println!("{:<24} {}", voice.name, voice.gender.as_str());
            }
            Ok(())
        }
        Commands::Generate {
            file,
            voice,
            name,
            output_dir,
            in_memory,
            upload,
            youtube,
        } => {
            let mut options = options;
            if let Some(voice) = voice {
                options = options.with_voice(voice);
            }
            if let Some(privacy) = youtube.privacy {
                options = options.with_privacy_status(privacy.into());
            }
            generate(&file, &name, &output_dir, in_memory, upload, &youtube, options).await
        }
        Commands::Upload {
            video,
            title,
            text,
            youtube,
        } => {
            let mut options = options;
            if let Some(privacy) = youtube.privacy {
                options = options.with_privacy_status(privacy.into());
            }
            let title = match title {
                Some(title) => title,
                None => video
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .context("Не удалось определить название видео по имени файла")?,
            };
            let text = match text {
                Some(path) => read_text(&path)?,
                None => String::new(),
            };
            let metadata = video_metadata(&title, &text, &options);
            let video_id = upload_video(&EncodedVideo::File(video), &metadata, &youtube).await?;
            println!("{}", video_id);
            Ok(())
        }
    }
}

async fn generate(
    file: &Path,
    name: &str,
    output_dir: &Path,
    in_memory: bool,
    upload: bool,
    youtube: &YouTubeArgs,
    options: VideoOptions,
) -> Result<()> {
    let text = read_text(file)?;

    let auth = GoogleAuth::from_env()?;
    let provider = GoogleTts::new(auth, &options.voice)?.with_retry_policy(options.retry_policy());
    let creator = VideoCreator::new(options, provider)?.with_progress_callback(Box::new(|progress: f32, status: &str| {
        log_debug(&format!("[{:>5.1}%] {}", progress, status));
    }));

    let artifact = if in_memory {
        creator.create_video_in_memory(&text).await?
    } else {
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("Не удалось создать папку {}", output_dir.display()))?;
        creator.create_video_file(&text, output_dir, name).await?
    };

    match &artifact.video {
        EncodedVideo::File(path) => println!("{}", path.display()),
        EncodedVideo::Memory(bytes) => log_info(&format!("Видео собрано в памяти: {} байт", bytes.len())),
    }

    if upload {
        let metadata = video_metadata(name, &text, creator.options());
        let video_id = upload_video(&artifact.video, &metadata, youtube).await?;
        println!("https://www.youtube.com/watch?v={}", video_id);
    }
    Ok(())
}

async fn upload_video(
    video: &EncodedVideo,
    metadata: &tts_slides::VideoMetadata,
    youtube: &YouTubeArgs,
) -> Result<String> {
    let secrets_path = youtube
        .client_secrets
        .clone()
        .or_else(|| std::env::var_os(CLIENT_SECRETS_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_SECRETS));
    let secrets = ClientSecrets::from_file(&secrets_path)
        .with_context(|| format!("Не удалось прочитать секреты клиента из {}", secrets_path.display()))?;

    let flow = match (youtube.auth, secrets.kind) {
        (Some(AuthMode::Installed), _) | (None, ClientKind::Installed) => AuthFlow::InstalledApp,
        (Some(AuthMode::Manual), _) | (None, ClientKind::Web) => AuthFlow::ManualCode { redirect_uri: None },
    };

    let authenticator = Authenticator::new(secrets).with_token_store(TokenStore::new(&youtube.token_cache));
    let video_id = publish_video(
        video,
        metadata,
        &authenticator,
        &flow,
        &mut TerminalPrompt,
        &YouTubeUploader::new(),
    )
    .await?;
    Ok(video_id)
}

fn read_text(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Не удалось прочитать {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("Файл {} пуст", path.display());
    }
    Ok(text)
}
