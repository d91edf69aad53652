//! Bounded task scheduling
//!
//! Each concurrency domain (listing pages, detail pages) gets its own
//! [`TaskPool`]: a semaphore capping how many of its tasks run at once and a
//! `JoinSet` owning them. Results come back in input order no matter which
//! task finishes first, and a task that panics only loses its own slot.

use crate::CrawlError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct TaskPool {
    name: &'static str,
    limit: usize,
    permits: Arc<Semaphore>,
}

impl TaskPool {
    /// Creates a pool running at most `limit` tasks at once (minimum 1)
    pub fn new(name: &'static str, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            name,
            limit,
            permits: Arc::new(Semaphore::new(limit)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Tasks currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.limit - self.permits.available_permits()
    }

    /// Runs `task` over every input and collects the results in input order
    ///
    /// Every task is spawned up front and waits for a permit before doing any
    /// work. The caller's tracing span is attached to each task so log lines
    /// keep the crawl context.
    ///
    /// # Arguments
    ///
    /// * `inputs` - One entry per task
    /// * `task` - Builds the future for one input
    ///
    /// # Returns
    ///
    /// One result per input, in the same order. A task that panicked or was
    /// cancelled yields `CrawlError::Task`.
    pub async fn run<I, T, F, Fut>(&self, inputs: Vec<I>, task: F) -> Vec<Result<T, CrawlError>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<T, CrawlError>> + Send + 'static,
    {
        let total = inputs.len();
        let span = tracing::Span::current();
        let mut set = JoinSet::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            let work = task(input);
            set.spawn(
                async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return (
                                index,
                                Err(CrawlError::Task("task pool closed".to_string())),
                            )
                        }
                    };
                    (index, work.await)
                }
                .instrument(span.clone()),
            );
        }

        let mut slots: Vec<Option<Result<T, CrawlError>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => tracing::error!("{} task did not complete: {}", self.name, e),
            }
        }

        tracing::debug!("{} pool finished {} task(s)", self.name, total);

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(CrawlError::Task(format!("{} task did not complete", self.name)))
                })
            })
            .collect()
    }
}
