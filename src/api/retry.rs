// Bounded retry for transport failures.
//
// One call drives a single question to a terminal outcome. The retry delay is
// awaited inside the calling task, so aborting that task also cancels any
// pending retry.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::client::AskBackend;
use super::error::retry_notice;
use crate::config::RetryConfig;
use crate::protocol::AskEvent;

/// Fixed-delay retry policy: no backoff growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        RetryPolicy {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

/// Ask `question`, resending after transport failures until the policy's
/// bound is reached. Every outcome is reported on `tx` tagged with
/// `generation`.
///
/// Returns the number of retries that were made.
pub async fn ask_with_retry(
    backend: &dyn AskBackend,
    question: &str,
    policy: RetryPolicy,
    tx: &mpsc::Sender<AskEvent>,
    generation: u64,
) -> u32 {
    let mut retries = 0;

    loop {
        let outcome = backend.ask(question).await.and_then(|resp| resp.into_answer());

        let event = match outcome {
            Ok(answer) => {
                info!(generation, retries, "question answered");
                AskEvent::Answered {
                    answer: answer.text,
                    processing_time: answer.processing_time,
                    generation,
                }
            }
            Err(err) if err.is_retryable() && retries < policy.max_retries => {
                retries += 1;
                warn!(generation, attempt = retries, error = %err, "transport failure, retrying");
                let notice = AskEvent::Retrying {
                    attempt: retries,
                    max: policy.max_retries,
                    message: retry_notice(retries, policy.max_retries),
                    generation,
                };
                if tx.send(notice).await.is_err() {
                    // Receiver dropped: nobody is waiting for this answer.
                    return retries;
                }
                tokio::time::sleep(policy.delay).await;
                continue;
            }
            Err(err) => {
                warn!(generation, retries, error = %err, "question failed");
                AskEvent::Failed {
                    message: err.user_message(),
                    generation,
                }
            }
        };

        let _ = tx.send(event).await;
        return retries;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
