//! Worker pool for handler tasks
//!
//! Tasks run on the tokio runtime captured at construction, so `submit` can be
//! called from any thread and never waits. An optional semaphore caps how many
//! tasks run at once; queued tasks wait inside the runtime, not in the caller.

use anyhow::Result;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// How an isolated handler task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Failed(String),
    Panicked(String),
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, TaskOutcome::Completed)
    }
}

#[derive(Clone)]
pub struct WorkerPool {
    runtime: Handle,
    permits: Option<Arc<Semaphore>>,
}

impl WorkerPool {
    /// `max_concurrent == 0` leaves the pool unbounded
    pub fn new(runtime: Handle, max_concurrent: usize) -> Self {
        let permits = (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent)));
        Self { runtime, permits }
    }

    /// Pool on the runtime of the calling context. Panics outside a tokio runtime.
    pub fn current(max_concurrent: usize) -> Self {
        Self::new(Handle::current(), max_concurrent)
    }

    pub fn is_bounded(&self) -> bool {
        self.permits.is_some()
    }

    /// Schedule `task`, returning immediately
    pub fn submit<F, T>(&self, task: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        self.runtime.spawn(async move {
            let _permit = match permits {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            task.await
        })
    }
}

/// Run `task` as its own tokio task so a panic cannot escape into the caller
pub async fn isolate<F>(task: F) -> TaskOutcome
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(Ok(())) => TaskOutcome::Completed,
        Ok(Err(e)) => TaskOutcome::Failed(format!("{e:#}")),
        Err(join_error) if join_error.is_panic() => {
            TaskOutcome::Panicked(panic_message(join_error.into_panic()))
        }
        Err(join_error) => TaskOutcome::Failed(join_error.to_string()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_isolate_maps_outcomes() {
        assert_eq!(isolate(async { Ok(()) }).await, TaskOutcome::Completed);
        assert_eq!(
            isolate(async { Err(anyhow::anyhow!("nope")) }).await,
            TaskOutcome::Failed("nope".to_string())
        );
        let outcome = isolate(async {
            if true {
                panic!("handler blew up");
            }
            Ok(())
        })
        .await;
        assert_eq!(outcome, TaskOutcome::Panicked("handler blew up".to_string()));
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn test_submit_returns_result() {
        let pool = WorkerPool::current(0);
        assert!(!pool.is_bounded());
        let handle = pool.submit(async { 21 * 2 });
        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_bounded_pool_caps_concurrency() {
        let pool = WorkerPool::current(2);
        assert!(pool.is_bounded());
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_submit_from_non_runtime_thread() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let pool = WorkerPool::new(runtime.handle().clone(), 0);

        let handle = std::thread::spawn(move || pool.submit(async { "done" }))
            .join()
            .unwrap();

        assert_eq!(runtime.block_on(handle).unwrap(), "done");
    }
}
