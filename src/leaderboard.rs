// 8.0: leaderboard ranking. pure function over an account snapshot.
// dense ranking: ties share a rank, the next distinct gems value jumps by the
// cohort size. output is truncated by row count, not by rank, so ties sitting
// on the cutoff are not all included.

use crate::account::Account;
use crate::types::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: u64,
    pub user_id: UserId,
    pub gems_count: u64,
    pub trade_count: u32,
}

pub fn rank(accounts: &[Account], limit: usize) -> Vec<RankEntry> {
    if limit == 0 {
        return Vec::new();
    }

    // stable sort keeps input order among equal-gems accounts
    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| b.gems_count.cmp(&a.gems_count));

    let mut entries = Vec::with_capacity(limit.min(sorted.len()));
    let mut current_rank: u64 = 1;
    let mut previous_gems: Option<u64> = None;
    let mut cohort_size: u64 = 0;

    for account in sorted {
        if entries.len() >= limit {
            break;
        }

        if previous_gems != Some(account.gems_count) {
            current_rank += cohort_size;
            cohort_size = 1;
        } else {
            cohort_size += 1;
        }

        entries.push(RankEntry {
            rank: current_rank,
            user_id: account.user_id.clone(),
            gems_count: account.gems_count,
            trade_count: account.trade_count,
        });
        previous_gems = Some(account.gems_count);
    }

    entries
}
