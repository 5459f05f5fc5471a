//! Pool configuration and counters from the `pools` command.

use std::fmt;

use serde::Deserialize;

/// Daemon-assigned index of a pool.
///
/// The index is only meaningful against the pool list it was read from. The
/// daemon renumbers pools when one is added or removed, so a `PoolId` held
/// across such a change may point at a different pool or at none. There is no
/// client-side way to detect this; the daemon rejects indices that are out of
/// range, nothing more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub i64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One configured pool as reported by `pools`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoolInfo {
    #[serde(rename = "POOL", alias = "Pool")]
    pub pool: PoolId,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "User")]
    pub user: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Priority")]
    pub priority: i64,
    #[serde(rename = "Quota")]
    pub quota: i64,
    #[serde(rename = "Long Poll")]
    pub long_poll: String,
    #[serde(rename = "Getworks")]
    pub getworks: i64,
    #[serde(rename = "Accepted")]
    pub accepted: i64,
    #[serde(rename = "Rejected")]
    pub rejected: i64,
    #[serde(rename = "Works")]
    pub works: i64,
    #[serde(rename = "Discarded")]
    pub discarded: i64,
    #[serde(rename = "Stale")]
    pub stale: i64,
    #[serde(rename = "Get Failures")]
    pub get_failures: i64,
    #[serde(rename = "Remote Failures")]
    pub remote_failures: i64,
    #[serde(rename = "Last Share Time")]
    pub last_share_time: i64,
    #[serde(rename = "Diff1 Shares")]
    pub diff1_shares: i64,
    #[serde(rename = "Proxy Type")]
    pub proxy_type: String,
    #[serde(rename = "Proxy")]
    pub proxy: String,
    #[serde(rename = "Difficulty Accepted")]
    pub difficulty_accepted: f64,
    #[serde(rename = "Difficulty Rejected")]
    pub difficulty_rejected: f64,
    #[serde(rename = "Difficulty Stale")]
    pub difficulty_stale: f64,
    #[serde(rename = "Last Share Difficulty")]
    pub last_share_difficulty: f64,
    #[serde(rename = "Has Stratum")]
    pub has_stratum: bool,
    #[serde(rename = "Stratum Active")]
    pub stratum_active: bool,
    #[serde(rename = "Stratum URL")]
    pub stratum_url: String,
    #[serde(rename = "Has GBT")]
    pub has_gbt: bool,
    #[serde(rename = "Best Share")]
    pub best_share: i64,
    #[serde(rename = "Pool Rejected%")]
    pub pool_rejected_percent: f64,
    #[serde(rename = "Pool Stale%")]
    pub pool_stale_percent: f64,
}

impl PoolInfo {
    pub fn is_alive(&self) -> bool {
        self.status == "Alive"
    }
}
