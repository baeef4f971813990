use std::future::Future;
use std::time::Duration;

use crate::common::error::AppError;

// Política de escrita resiliente: o loop de retry que o cliente fazia na mão
// vira um valor parametrizado (máximo de tentativas + função de backoff).
// As retentativas são estritamente sequenciais — nunca em paralelo — para
// manter a ordenação determinística.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: fn(u32) -> Duration,
}

// Backoff linear: tentativa N espera N segundos antes da próxima.
fn linear_backoff(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

impl RetryPolicy {
    // Política padrão para criação de leads: até 3 tentativas.
    pub fn lead_writes() -> Self {
        Self {
            max_attempts: 3,
            backoff: linear_backoff,
        }
    }

    // Executa `op` até obter sucesso ou esgotar as tentativas. Apenas erros
    // transitórios do store são retentados; qualquer outro erro sobe na hora.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Falha transitória do store, retentando: {err}"
                    );
                    tokio::time::sleep((self.backoff)(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn no_backoff(_attempt: u32) -> Duration {
        Duration::ZERO
    }

    fn transient() -> AppError {
        AppError::DatabaseError(sqlx::Error::PoolTimedOut)
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: no_backoff,
        };
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|_| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 { Err(transient()) } else { Ok(n) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: no_backoff,
        };
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn validation_errors_never_retry() {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: no_backoff,
        };
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::DuplicateLead) }
            })
            .await;

        assert!(matches!(result, Err(AppError::DuplicateLead)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
