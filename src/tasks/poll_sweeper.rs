use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::time::interval;

use crate::store::PollStore;

const CHECK_INTERVAL_SECONDS: u64 = 60;

/// Drops polls older than `ttl` once a minute. Clicks on a dropped poll
/// get the generic "could not be recorded" notice.
pub async fn sweep_expired_polls_task(store: Arc<PollStore>, ttl: StdDuration) {
    info!(
        "Starting background task to expire polls older than {} hour(s)...",
        ttl.as_secs() / 3600
    );
    let mut interval = interval(StdDuration::from_secs(CHECK_INTERVAL_SECONDS));

    loop {
        interval.tick().await;
        sweep_once(&store, ttl);
    }
}

pub fn sweep_once(store: &PollStore, ttl: StdDuration) -> usize {
    let Ok(ttl) = chrono::Duration::from_std(ttl) else {
        return 0;
    };
    let cutoff = Utc::now() - ttl;
    let removed = store.prune_created_before(cutoff);
    if removed > 0 {
        info!("Expired {} poll(s) created before {}", removed, cutoff.to_rfc3339());
    } else {
        debug!("No polls to expire.");
    }
    removed
}
