//! Command catalog: names, parameters, and response decoding.
//!
//! Each `decode_*` function turns repaired response text into the command's
//! result, applying that command's rule on how many payload entries are
//! allowed. Decoding is independent of the transport so every rule can be
//! tested against canned text.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::messages::{
    DevsResponse, Envelope, PoolsResponse, StatsResponse, StatusEntry, StatusResponse,
    SummaryResponse,
};
use crate::types::{Device, MinerStats, PoolInfo, SummaryStats};

pub const DEVS: &str = "devs";
pub const POOLS: &str = "pools";
pub const SUMMARY: &str = "summary";
pub const STATS: &str = "stats";
pub const ADD_POOL: &str = "addpool";
pub const ENABLE_POOL: &str = "enablepool";
pub const DISABLE_POOL: &str = "disablepool";
pub const REMOVE_POOL: &str = "removepool";
pub const SWITCH_POOL: &str = "switchpool";
pub const RESTART: &str = "restart";
pub const QUIT: &str = "quit";

/// Parse response text into the command's envelope.
fn decode<R>(command: &'static str, text: &str) -> ApiResult<R>
where
    R: DeserializeOwned + Envelope,
{
    let envelope: R =
        serde_json::from_str(text).map_err(|source| ApiError::Decode { command, source })?;

    // Every well-formed envelope carries at least one status entry
    let first = envelope
        .status()
        .first()
        .ok_or(ApiError::UnexpectedCardinality {
            command,
            expected: 1,
            actual: 0,
        })?;

    if !first.status.is_success() {
        debug!(
            command,
            code = first.code,
            description = %first.description,
            "Daemon reported non-success status"
        );
    }

    Ok(envelope)
}

/// Take the single entry of a payload list that must hold exactly one.
fn exactly_one<T>(command: &'static str, mut items: Vec<T>) -> ApiResult<T> {
    if items.len() != 1 {
        return Err(ApiError::UnexpectedCardinality {
            command,
            expected: 1,
            actual: items.len(),
        });
    }
    Ok(items.remove(0))
}

/// Fail unless the first status entry reports success.
fn require_success(command: &'static str, status: &[StatusEntry]) -> ApiResult<()> {
    let first = status.first().ok_or(ApiError::UnexpectedCardinality {
        command,
        expected: 1,
        actual: 0,
    })?;

    if !first.status.is_success() {
        return Err(ApiError::Remote {
            code: first.code,
            description: first.description.clone(),
        });
    }
    Ok(())
}

pub fn decode_devs(text: &str) -> ApiResult<Vec<Device>> {
    decode::<DevsResponse>(DEVS, text).map(|r| r.devs)
}

pub fn decode_pools(text: &str) -> ApiResult<Vec<PoolInfo>> {
    decode::<PoolsResponse>(POOLS, text).map(|r| r.pools)
}

/// The daemon always sends exactly one summary record; anything else is an error.
pub fn decode_summary(text: &str) -> ApiResult<SummaryStats> {
    let response = decode::<SummaryResponse>(SUMMARY, text)?;
    exactly_one(SUMMARY, response.summary)
}

/// Expect exactly one stats record.
///
/// Some firmware (bmminer) sends a firmware-identification record ahead of
/// the hardware record. That is reported as a cardinality error carrying the
/// observed count; use [`decode_stats_entries`] to choose among them.
pub fn decode_stats(text: &str) -> ApiResult<MinerStats> {
    let response = decode::<StatsResponse>(STATS, text)?;
    exactly_one(STATS, response.stats)
}

pub fn decode_stats_entries(text: &str) -> ApiResult<Vec<MinerStats>> {
    decode::<StatsResponse>(STATS, text).map(|r| r.stats)
}

pub fn decode_add_pool(text: &str) -> ApiResult<()> {
    let response = decode::<StatusResponse>(ADD_POOL, text)?;
    require_success(ADD_POOL, response.status())
}

/// Build the `addpool` parameter.
///
/// The daemon splits parameters on unescaped commas and treats `\` as the
/// escape character, so both are escaped in each field.
pub fn add_pool_parameter(url: &str, user: &str, password: &str) -> String {
    [url, user, password]
        .iter()
        .map(|field| escape_parameter(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_parameter(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        if c == '\\' || c == ',' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
