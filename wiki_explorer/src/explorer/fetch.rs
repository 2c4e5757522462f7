//! Generator requests running in the background.
//!
//! Every request captures its topic when it is issued and reports back
//! under that topic, whatever the current topic has become in the meantime.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use wiki_graph::TopicKey;

use crate::deep_dive::DeepDiveKind;
use crate::error::{ExplorationError, GenerationError};

/// What a background request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Article,
    DeepDive(DeepDiveKind),
}

/// Result of a request, reported by [`Explorer::settle_next`](super::Explorer::settle_next).
#[derive(Debug, Clone, PartialEq)]
pub struct SettledFetch {
    /// The topic as it was when the request was issued.
    pub topic: String,
    pub request: FetchRequest,
    pub error: Option<ExplorationError>,
}

impl SettledFetch {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Raw outcome of a spawned request, applied to the session when joined.
pub(crate) struct Settlement {
    pub topic: String,
    pub key: TopicKey,
    pub request: FetchRequest,
    pub result: Result<String, GenerationError>,
}

/// Aborts the wrapped task when dropped, so an abandoned request does not
/// keep running behind the session's back.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run a generator call on its own task with a deadline.
///
/// A panicking generator is reported as a service error and an expired
/// deadline as [`GenerationError::Timeout`]; the request always settles.
pub(crate) async fn run_with_timeout<F>(timeout: Duration, request: F) -> Result<String, GenerationError>
where
    F: Future<Output = Result<String, GenerationError>> + Send + 'static,
{
    let mut task = AbortOnDrop(tokio::spawn(request));
    match tokio::time::timeout(timeout, &mut task.0).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(GenerationError::Service(format!(
            "generator task failed: {join_error}"
        ))),
        Err(_) => Err(GenerationError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_result_passes_through() {
        let result = run_with_timeout(Duration::from_secs(1), async { Ok("text".to_string()) }).await;
        assert_eq!(result, Ok("text".to_string()));
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let result = run_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("late".to_string())
        })
        .await;
        assert_eq!(result, Err(GenerationError::Timeout(Duration::from_millis(10))));
    }

    #[tokio::test]
    async fn test_panic_becomes_service_error() {
        let result = run_with_timeout(Duration::from_secs(1), async {
            if true {
                panic!("generator exploded");
            }
            Ok(String::new())
        })
        .await;
        assert!(matches!(result, Err(GenerationError::Service(_))));
    }
}
