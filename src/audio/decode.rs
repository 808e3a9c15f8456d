use crate::error::{Error, ErrorType, Result};
use crate::logging::{log_debug, log_warning};
use std::io::Cursor;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Параметры декодированного аудио клипа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioInfo {
    /// Длительность в секундах
    pub duration: f64,
    /// Частота дискретизации
    pub sample_rate: u32,
    /// Количество каналов
    pub channels: u16,
    /// Количество фреймов (сэмплов на канал)
    pub frames: u64,
}

fn decoding_error(message: String) -> Error {
    Error::new(ErrorType::AudioProcessingError, &message)
}

/// Декодирует аудио данные (MP3 от синтеза речи) и возвращает их параметры.
///
/// Длительность считается по фактически декодированным фреймам, так как у
/// MP3 без заголовка Xing количество фреймов в контейнере неизвестно.
pub fn inspect_audio(data: &[u8], extension: Option<&str>) -> Result<AudioInfo> {
    log_debug(&format!("Декодирование аудио данных размером {} байт", data.len()));

    if data.len() < 4 {
        return Err(decoding_error("Пустые или слишком короткие аудио данные".to_string()));
    }

    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let detected = get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| decoding_error(format!("Ошибка определения формата: {}", e)))?;
    let mut format = detected.format;

    let track = format
        .default_track()
        .ok_or_else(|| decoding_error("Не найден аудио поток".to_string()))?;
    if track.codec_params.codec == CODEC_TYPE_NULL {
        return Err(decoding_error("Поток не является аудио".to_string()));
    }

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16).unwrap_or(0);

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decoding_error(format!("Ошибка создания декодера: {}", e)))?;

    let mut frames = 0u64;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(err) => {
                log_warning(&format!("Ошибка чтения пакета: {}, пропускаем", err));
                continue;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;
                frames += decoded.frames() as u64;
            }
            Err(SymphoniaError::DecodeError(err)) => {
                log_warning(&format!("Ошибка декодирования пакета: {}, пропускаем", err));
            }
            Err(err) => return Err(decoding_error(format!("Ошибка декодирования: {}", err))),
        }
    }

    if frames == 0 || sample_rate == 0 {
        return Err(decoding_error("Не получены аудио сэмплы".to_string()));
    }

    let info = AudioInfo {
        duration: frames as f64 / sample_rate as f64,
        sample_rate,
        channels,
        frames,
    };
    log_debug(&format!(
        "Декодировано {} фреймов, {} Гц, {} кан., {:.3} с",
        info.frames, info.sample_rate, info.channels, info.duration
    ));

    Ok(info)
}

/// Возвращает длительность MP3 клипа в секундах
pub fn mp3_duration(mp3_data: &[u8]) -> Result<f64> {
    inspect_audio(mp3_data, Some("mp3")).map(|info| info.duration)
}
