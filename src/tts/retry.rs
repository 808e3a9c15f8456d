use crate::error::{Error, Result};
use crate::logging::{log_error, log_warning};
use std::future::Future;
use std::time::Duration;

/// Политика повторов запросов к синтезу речи.
///
/// Повторяются только ответы с ограничением частоты (HTTP 429); задержка
/// перед n-м повтором равна `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Максимальное количество повторов после первой попытки
    pub max_retries: u32,
    /// Базовая задержка
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Задержка перед повтором с номером `retry` (начиная с 1)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry)
    }

    /// Выполняет операцию, повторяя ее при ограничении частоты запросов
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let _ = log_error::<(), _>(
                        &e,
                        &format!("Ошибка при запросе аудио (попытка {})", retry + 1),
                    );

                    if !e.is_rate_limited() {
                        return Err(e);
                    }
                    if retry >= self.max_retries {
                        return Err(Error::RetriesExhausted {
                            attempts: retry + 1,
                            message: e.to_string(),
                        });
                    }

                    retry += 1;
                    let delay = self.delay_for(retry);
                    log_warning(&format!("Превышен лимит запросов, повтор через {:.1?}", delay));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
