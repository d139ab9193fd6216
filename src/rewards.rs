// 7.0: reward counter updater. consumes settlement notices and applies the
// trade-count / gems-count increments with milestone bonuses. runs as its own
// task, decoupled from the settlement path. a notice naming an unknown user is
// logged and dropped, never retried and never surfaced to the trade caller.

use crate::account::GemAward;
use crate::events::{NotificationReceiver, TradeSettledNotice};
use crate::store::{AccountStore, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

// Consumer loop. Notices are processed one at a time off the channel, so two
// trades by the same user always bump counters in settlement order.
pub async fn run(mut rx: NotificationReceiver, store: Arc<AccountStore>) {
    while let Some(notice) = rx.recv().await {
        let _ = apply(&store, &notice).await;
    }
}

pub fn spawn(rx: NotificationReceiver, store: Arc<AccountStore>) -> JoinHandle<()> {
    tokio::spawn(run(rx, store))
}

// 7.1: one notice, one reward update.
pub async fn apply(
    store: &AccountStore,
    notice: &TradeSettledNotice,
) -> Result<GemAward, StoreError> {
    let entry = store.entry(&notice.user_id).await.ok_or_else(|| {
        error!(user = %notice.user_id, "dropping reward update for unknown user");
        StoreError::NotFound(notice.user_id.clone())
    })?;

    let mut record = entry.lock().await;
    let award = record.account.record_settled_trade();

    if award.bonus > 0 {
        info!(
            user = %notice.user_id,
            trades = record.account.trade_count,
            bonus = award.bonus,
            "milestone bonus awarded"
        );
    } else {
        info!(
            user = %notice.user_id,
            trades = record.account.trade_count,
            gems = record.account.gems_count,
            "reward counters updated"
        );
    }

    Ok(award)
}
