use std::path::{Path, PathBuf};

/// Клип видеоряда: неподвижный слайд на время своей длительности
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Путь к изображению слайда
    pub slide: PathBuf,
    /// Озвучка клипа; `None` означает тишину
    pub audio: Option<PathBuf>,
    /// Время начала клипа в секундах
    pub start: f64,
    /// Длительность клипа в секундах
    pub duration: f64,
}

impl Clip {
    /// Время окончания клипа
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Последовательность клипов, склеиваемых встык
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    clips: Vec<Clip>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет озвученный слайд в конец
    pub fn push_narrated(&mut self, slide: impl Into<PathBuf>, audio: impl Into<PathBuf>, duration: f64) -> &Clip {
        self.push(slide.into(), Some(audio.into()), duration)
    }

    /// Добавляет слайд без звука в конец
    pub fn push_silent(&mut self, slide: impl Into<PathBuf>, duration: f64) -> &Clip {
        self.push(slide.into(), None, duration)
    }

    fn push(&mut self, slide: PathBuf, audio: Option<PathBuf>, duration: f64) -> &Clip {
        let start = self.total_duration();
        self.clips.push(Clip {
            slide,
            audio,
            start,
            duration: duration.max(0.0),
        });
        &self.clips[self.clips.len() - 1]
    }

    /// Общая длительность
    pub fn total_duration(&self) -> f64 {
        self.clips.last().map(Clip::end).unwrap_or(0.0)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Все файлы, на которые ссылается видеоряд
    pub fn referenced_files(&self) -> Vec<&Path> {
        self.clips
            .iter()
            .flat_map(|c| std::iter::once(c.slide.as_path()).chain(c.audio.as_deref()))
            .collect()
    }
}
