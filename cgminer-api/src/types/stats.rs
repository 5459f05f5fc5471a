//! Hardware statistics from the `stats` command.
//!
//! `stats` is the least standardized command across firmware. The layout here
//! follows the Antminer (bmminer) record: eight temperature pairs and eight
//! chain rates. Keys outside that set are kept in [`MinerStats::extra`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::{HashRate, string_or_number};

/// One record of the `STATS` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinerStats {
    #[serde(rename = "Elapsed")]
    pub elapsed: i64,
    /// Sent as a string by bmminer, as a number by other firmware
    #[serde(rename = "GHS 5s", deserialize_with = "string_or_number")]
    pub ghs_5s: String,
    #[serde(rename = "GHS av")]
    pub ghs_av: f64,
    #[serde(rename = "frequency", deserialize_with = "string_or_number")]
    pub frequency: String,

    #[serde(rename = "temp1")]
    pub temp1: f64,
    #[serde(rename = "temp2")]
    pub temp2: f64,
    #[serde(rename = "temp3")]
    pub temp3: f64,
    #[serde(rename = "temp4")]
    pub temp4: f64,
    #[serde(rename = "temp5")]
    pub temp5: f64,
    #[serde(rename = "temp6")]
    pub temp6: f64,
    #[serde(rename = "temp7")]
    pub temp7: f64,
    #[serde(rename = "temp8")]
    pub temp8: f64,

    #[serde(rename = "temp2_1")]
    pub temp2_1: f64,
    #[serde(rename = "temp2_2")]
    pub temp2_2: f64,
    #[serde(rename = "temp2_3")]
    pub temp2_3: f64,
    #[serde(rename = "temp2_4")]
    pub temp2_4: f64,
    #[serde(rename = "temp2_5")]
    pub temp2_5: f64,
    #[serde(rename = "temp2_6")]
    pub temp2_6: f64,
    #[serde(rename = "temp2_7")]
    pub temp2_7: f64,
    #[serde(rename = "temp2_8")]
    pub temp2_8: f64,

    #[serde(rename = "chain_rate1", deserialize_with = "string_or_number")]
    pub chain_rate1: String,
    #[serde(rename = "chain_rate2", deserialize_with = "string_or_number")]
    pub chain_rate2: String,
    #[serde(rename = "chain_rate3", deserialize_with = "string_or_number")]
    pub chain_rate3: String,
    #[serde(rename = "chain_rate4", deserialize_with = "string_or_number")]
    pub chain_rate4: String,
    #[serde(rename = "chain_rate5", deserialize_with = "string_or_number")]
    pub chain_rate5: String,
    #[serde(rename = "chain_rate6", deserialize_with = "string_or_number")]
    pub chain_rate6: String,
    #[serde(rename = "chain_rate7", deserialize_with = "string_or_number")]
    pub chain_rate7: String,
    #[serde(rename = "chain_rate8", deserialize_with = "string_or_number")]
    pub chain_rate8: String,

    #[serde(rename = "chain_rateideal6")]
    pub chain_rate_ideal6: f64,
    #[serde(rename = "chain_rateideal7")]
    pub chain_rate_ideal7: f64,
    #[serde(rename = "chain_rateideal8")]
    pub chain_rate_ideal8: f64,

    /// Every key not mapped above (fan speeds, firmware identifiers, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MinerStats {
    /// Average hashrate since the daemon started.
    pub fn hashrate(&self) -> HashRate {
        HashRate::from_gigahashes(self.ghs_av)
    }

    /// Board temperatures (`tempN`) that carry a reading.
    ///
    /// Unpopulated chain slots report zero and are skipped.
    pub fn board_temperatures(&self) -> Vec<f64> {
        [
            self.temp1, self.temp2, self.temp3, self.temp4, self.temp5, self.temp6,
            self.temp7, self.temp8,
        ]
        .into_iter()
        .filter(|t| *t != 0.0)
        .collect()
    }

    /// Chip temperatures (`temp2_N`) that carry a reading.
    pub fn chip_temperatures(&self) -> Vec<f64> {
        [
            self.temp2_1, self.temp2_2, self.temp2_3, self.temp2_4, self.temp2_5,
            self.temp2_6, self.temp2_7, self.temp2_8,
        ]
        .into_iter()
        .filter(|t| *t != 0.0)
        .collect()
    }
}
