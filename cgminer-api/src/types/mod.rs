//! Records decoded from daemon responses.
//!
//! Field names on the wire follow the daemon's vocabulary ("MHS av",
//! "Best Share", "Device Hardware%"). Every record defaults missing fields,
//! since the cgminer forks (bmminer, bfgminer, sgminer) each omit different
//! keys. Records are plain values: nothing here refers to anything else.

mod device;
mod hash_rate;
mod pool;
mod stats;
mod summary;

pub use device::Device;
pub use hash_rate::HashRate;
pub use pool::{PoolId, PoolInfo};
pub use stats::MinerStats;
pub use summary::SummaryStats;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field some firmware sends as a string and some as a number.
///
/// Numbers are kept in their JSON text form, null becomes an empty string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
