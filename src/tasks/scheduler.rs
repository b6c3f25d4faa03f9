//! One-shot delayed actions.
//!
//! A single worker task owns a min-heap of pending jobs ordered by fire
//! time, then by scheduling order. Due jobs are started in that order, each
//! on its own task, so a slow or failing job never holds up the others.
//! Nothing is persisted; pending jobs die with the process.

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, error, info};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::error::BotError;

type Job = BoxFuture<'static, Result<(), BotError>>;

struct Pending {
    fire_at: Instant,
    seq: u64,
    label: String,
    job: Job,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the BinaryHeap pops the earliest job first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Clone)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Pending>,
    seq: Arc<AtomicU64>,
}

impl Scheduler {
    /// Spawns the worker. It exits once every handle is dropped and the
    /// remaining jobs have fired.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(rx));
        let scheduler = Self {
            tx,
            seq: Arc::new(AtomicU64::new(0)),
        };
        (scheduler, worker)
    }

    pub fn schedule_after<F>(
        &self,
        delay: Duration,
        label: impl Into<String>,
        job: F,
    ) -> Result<(), BotError>
    where
        F: Future<Output = Result<(), BotError>> + Send + 'static,
    {
        let pending = Pending {
            fire_at: Instant::now() + delay,
            seq: self.seq.fetch_add(1, AtomicOrdering::Relaxed),
            label: label.into(),
            job: job.boxed(),
        };
        debug!("Scheduling `{}` in {:?}", pending.label, delay);
        self.tx
            .send(pending)
            .map_err(|_| BotError::SchedulerStopped)
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Pending>) {
    info!("Starting deferred task scheduler...");
    let mut queue: BinaryHeap<Pending> = BinaryHeap::new();
    let mut open = true;

    loop {
        if !open && queue.is_empty() {
            break;
        }

        let next_fire = queue.peek().map(|pending| pending.fire_at);
        let wait_for_next = async move {
            match next_fire {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            received = rx.recv(), if open => match received {
                Some(pending) => queue.push(pending),
                None => open = false,
            },
            _ = wait_for_next => fire_due(&mut queue),
        }
    }

    info!("Deferred task scheduler stopped.");
}

fn fire_due(queue: &mut BinaryHeap<Pending>) {
    let now = Instant::now();
    while queue.peek().is_some_and(|pending| pending.fire_at <= now) {
        let Some(pending) = queue.pop() else { break };
        let label = pending.label;
        let job = pending.job;
        tokio::spawn(async move {
            match std::panic::AssertUnwindSafe(job).catch_unwind().await {
                Ok(Ok(())) => debug!("Scheduled task `{}` completed", label),
                Ok(Err(e)) => error!("Scheduled task `{}` failed: {}", label, e),
                Err(_) => error!("Scheduled task `{}` panicked", label),
            }
        });
    }
}
