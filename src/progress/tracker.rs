use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};

/// Тип для функций обратного вызова прогресса
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync + 'static>;

/// Трекер прогресса
#[derive(Clone)]
pub struct ProgressTracker {
    /// Текущий прогресс (от 0.0 до 100.0)
    progress: Arc<Mutex<f32>>,
    /// Текущий статус
    status: Arc<Mutex<String>>,
    /// Функция обратного вызова для отслеживания прогресса
    callback: Option<Arc<ProgressCallback>>,
}

impl ProgressTracker {
    /// Создает новый трекер прогресса
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(0.0)),
            status: Arc::new(Mutex::new(String::new())),
            callback: None,
        }
    }

    /// Создает новый трекер прогресса с функцией обратного вызова
    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
            ..Self::new()
        }
    }

    /// Обновляет прогресс
    pub fn update(&self, progress: f32, status: &str) -> Result<()> {
        let clamped_progress = progress.clamp(0.0, 100.0);

        *self.progress.lock().map_err(poisoned)? = clamped_progress;
        *self.status.lock().map_err(poisoned)? = status.to_string();

        if let Some(callback) = &self.callback {
            callback(clamped_progress, status);
        }

        Ok(())
    }

    /// Возвращает текущий прогресс
    pub fn get_progress(&self) -> f32 {
        self.progress.lock().map(|p| *p).unwrap_or(0.0)
    }

    /// Возвращает текущий статус
    pub fn get_status(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Создает дочерний трекер прогресса с заданным диапазоном
    pub fn create_child(&self, start: f32, end: f32) -> ChildProgressTracker {
        ChildProgressTracker {
            parent: self.clone(),
            start,
            end,
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::InvalidParameters("Состояние трекера прогресса повреждено".to_string())
}

/// Дочерний трекер прогресса
#[derive(Clone)]
pub struct ChildProgressTracker {
    parent: ProgressTracker,
    start: f32,
    end: f32,
}

impl ChildProgressTracker {
    /// Обновляет прогресс в диапазоне родителя
    pub fn update(&self, progress: f32, status: &str) -> Result<()> {
        let clamped_progress = progress.clamp(0.0, 100.0);
        let parent_progress = self.start + (self.end - self.start) * clamped_progress / 100.0;
        self.parent.update(parent_progress, status)
    }

    /// Обновляет прогресс по номеру шага из общего количества
    pub fn step(&self, done: usize, total: usize, status: &str) -> Result<()> {
        let progress = if total == 0 {
            100.0
        } else {
            done as f32 * 100.0 / total as f32
        };
        self.update(progress, status)
    }
}
