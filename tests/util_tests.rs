//! Tests for the retry and timeout helpers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agentry::error::AgentryError;
use agentry::util::{with_timeout, RetryPolicy};

#[tokio::test(start_paused = true)]
async fn retry_policy_retries_transient_errors_until_success() {
    let policy = RetryPolicy {
        max_attempts: 4,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(100),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_task = attempts.clone();

    let task = tokio::spawn(async move {
        policy
            .execute(|| {
                let attempts = attempts_for_task.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(AgentryError::Timeout(100))
                    } else {
                        Ok::<_, AgentryError>("ok")
                    }
                }
            })
            .await
    });

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(1)).await;
    let result = task.await.unwrap();

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_policy_stops_immediately_for_non_transient_errors() {
    let policy = RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
        multiplier: 2.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AgentryError::Protocol("unexpected action".to_string()))
            }
        })
        .await;

    match result {
        Err(AgentryError::Protocol(message)) => assert_eq!(message, "unexpected action"),
        other => panic!("expected protocol error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retry_policy_gives_up_after_max_attempts() {
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(10),
        multiplier: 1.0,
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AgentryError::Timeout(50))
            }
        })
        .await;

    assert!(matches!(result, Err(AgentryError::Timeout(50))));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn with_timeout_bounds_a_slow_future() {
    let result = with_timeout(Duration::from_millis(100), async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(())
    })
    .await;

    assert!(matches!(result, Err(AgentryError::Timeout(100))));
}

#[tokio::test]
async fn with_timeout_passes_through_a_fast_future() {
    let result = with_timeout(Duration::from_secs(5), async { Ok("done") }).await;
    assert_eq!(result.unwrap(), "done");
}
