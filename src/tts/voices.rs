use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Код языка, на котором работают все голоса каталога
pub const LANGUAGE_CODE: &str = "es-ES";

/// Голос по умолчанию
pub const DEFAULT_VOICE: &str = "es-ES-Journey-D";

/// Пол голоса в терминах SSML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlVoiceGender {
    Male,
    Female,
    Neutral,
}

impl SsmlVoiceGender {
    /// Возвращает строковое представление, принятое в Cloud Text-to-Speech
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

/// Голос синтеза речи
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Имя голоса, например `es-ES-Neural2-A`
    pub name: &'static str,
    /// Пол голоса
    pub gender: SsmlVoiceGender,
}

impl Voice {
    /// Код языка голоса
    pub fn language_code(&self) -> &'static str {
        LANGUAGE_CODE
    }
}

static VOICES: Lazy<BTreeMap<&'static str, SsmlVoiceGender>> = Lazy::new(|| {
    use SsmlVoiceGender::{Female, Male};

    BTreeMap::from([
        ("es-ES-Journey-D", Male),
        ("es-ES-Journey-F", Female),
        ("es-ES-Journey-O", Female),
        ("es-ES-Neural2-A", Female),
        ("es-ES-Neural2-B", Male),
        ("es-ES-Neural2-C", Female),
        ("es-ES-Neural2-D", Female),
        ("es-ES-Neural2-E", Female),
        ("es-ES-Neural2-F", Male),
        ("es-ES-Polyglot-1", Male),
        ("es-ES-Standard-A", Female),
        ("es-ES-Standard-B", Male),
        ("es-ES-Standard-C", Female),
    ])
});

/// Возвращает все доступные голоса, отсортированные по имени
pub fn available_voices() -> Vec<Voice> {
    VOICES
        .iter()
        .map(|(name, gender)| Voice { name: *name, gender: *gender })
        .collect()
}

/// Ищет голос по точному имени
pub fn find_voice(name: &str) -> Result<Voice> {
    VOICES
        .get_key_value(name)
        .map(|(name, gender)| Voice { name: *name, gender: *gender })
        .ok_or_else(|| Error::InvalidParameters(format!("Неизвестный голос: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(available_voices().len(), 13);
    }

    #[test]
    fn test_find_voice() {
        let voice = find_voice("es-ES-Neural2-F").unwrap();
        assert_eq!(voice.gender, SsmlVoiceGender::Male);
        assert_eq!(voice.language_code(), "es-ES");

        assert_eq!(find_voice("es-ES-Standard-C").unwrap().gender, SsmlVoiceGender::Female);
        assert!(find_voice(DEFAULT_VOICE).is_ok());
    }

    #[test]
    fn test_find_voice_is_exact() {
        assert!(find_voice("es-es-neural2-f").is_err());
        assert!(find_voice("alloy").is_err());
    }

    #[test]
    fn test_gender_serialization() {
        assert_eq!(serde_json::to_string(&SsmlVoiceGender::Female).unwrap(), "\"FEMALE\"");
        assert_eq!(SsmlVoiceGender::Male.as_str(), "MALE");
    }
}
