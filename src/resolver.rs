use crate::error::Result;
use crate::sources::ReportLookup;
use crate::types::{Message, Report};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Resolves each message's report concurrently.
///
/// One task is spawned per message carrying a `report_id`. Results land in a
/// slot vector indexed by message position, so completion order never
/// affects the output. The first failing lookup aborts the batch: the
/// remaining tasks are cancelled when the `JoinSet` is dropped and no partial
/// result is returned.
#[derive(Clone)]
pub struct ReportResolver {
    lookup: Arc<dyn ReportLookup>,
    max_concurrent: Option<usize>,
}

impl ReportResolver {
    pub fn new(lookup: Arc<dyn ReportLookup>) -> Self {
        Self {
            lookup,
            max_concurrent: None,
        }
    }

    /// Bound the number of lookups in flight at once
    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent.filter(|&n| n > 0);
        self
    }

    /// Returns one slot per message, in message order. Messages without a
    /// `report_id` and reports the store does not know both yield `None`.
    pub async fn resolve(&self, messages: &[Message]) -> Result<Vec<Option<Report>>> {
        let mut slots: Vec<Option<Report>> = vec![None; messages.len()];
        let permits = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for (index, message) in messages.iter().enumerate() {
            let Some(report_id) = message.report_id else {
                continue;
            };
            let lookup = Arc::clone(&self.lookup);
            let permits = permits.clone();

            tasks.spawn(async move {
                // the semaphore is never closed
                let _permit = match permits {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                debug!(index, %report_id, "looking up report");
                lookup.get(report_id).await.map(|report| (index, report))
            });
        }

        let spawned = tasks.len();
        while let Some(joined) = tasks.join_next().await {
            let (index, report) = joined??;
            slots[index] = report;
        }

        debug!(
            messages = messages.len(),
            lookups = spawned,
            found = slots.iter().filter(|s| s.is_some()).count(),
            "report resolution complete"
        );
        Ok(slots)
    }
}
