//! Per-device status from the `devs` command.

use serde::Deserialize;

use super::HashRate;

/// One mining device (GPU, ASC or PGA) as reported by `devs`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Device {
    #[serde(rename = "GPU")]
    pub gpu: i64,
    #[serde(rename = "Enabled")]
    pub enabled: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Fan Speed")]
    pub fan_speed: i64,
    #[serde(rename = "Fan Percent")]
    pub fan_percent: i64,
    #[serde(rename = "GPU Clock")]
    pub gpu_clock: i64,
    #[serde(rename = "Memory Clock")]
    pub memory_clock: i64,
    #[serde(rename = "GPU Voltage")]
    pub gpu_voltage: f64,
    #[serde(rename = "Powertune")]
    pub powertune: i64,
    #[serde(rename = "MHS av")]
    pub mhs_av: f64,
    #[serde(rename = "MHS 5s")]
    pub mhs_5s: f64,
    #[serde(rename = "Accepted")]
    pub accepted: i64,
    #[serde(rename = "Rejected")]
    pub rejected: i64,
    #[serde(rename = "Hardware Errors")]
    pub hardware_errors: i64,
    #[serde(rename = "Utility")]
    pub utility: f64,
    #[serde(rename = "Intensity")]
    pub intensity: String,
    #[serde(rename = "Last Share Pool")]
    pub last_share_pool: i64,
    /// Some tooling spells this key "Lash Share Time".
    #[serde(rename = "Last Share Time", alias = "Lash Share Time")]
    pub last_share_time: i64,
    #[serde(rename = "TotalMH", alias = "Total MH")]
    pub total_mh: f64,
    #[serde(rename = "Diff1 Work")]
    pub diff1_work: i64,
    #[serde(rename = "Difficulty Accepted")]
    pub difficulty_accepted: f64,
    #[serde(rename = "Difficulty Rejected")]
    pub difficulty_rejected: f64,
    #[serde(rename = "Last Share Difficulty")]
    pub last_share_difficulty: f64,
    #[serde(rename = "Last Valid Work")]
    pub last_valid_work: i64,
    #[serde(rename = "Device Hardware%")]
    pub device_hardware_percent: f64,
    #[serde(rename = "Device Rejected%")]
    pub device_rejected_percent: f64,
    #[serde(rename = "Device Elapsed")]
    pub device_elapsed: i64,
}

impl Device {
    /// Average hashrate since the device started.
    pub fn hashrate(&self) -> HashRate {
        HashRate::from_megahashes(self.mhs_av)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled == "Y"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_decode_gpu_device() {
        let json = r#"{
            "GPU":0,"Enabled":"Y","Status":"Alive","Temperature":71.0,
            "Fan Speed":3120,"Fan Percent":65,"GPU Clock":1050,"Memory Clock":1500,
            "GPU Voltage":1.175,"Powertune":20,"MHS av":712.45,"MHS 5s":715.02,
            "Accepted":1843,"Rejected":12,"Hardware Errors":0,"Utility":9.87,
            "Intensity":"13","Last Share Pool":0,"Last Share Time":1700000100,
            "TotalMH":8012345.5,"Diff1 Work":30012,"Difficulty Accepted":29488.0,
            "Difficulty Rejected":192.0,"Last Share Difficulty":16.0,
            "Last Valid Work":1700000101,"Device Hardware%":0.0,
            "Device Rejected%":0.64,"Device Elapsed":11250
        }"#;

        let dev: Device = serde_json::from_str(json).unwrap();
        assert_eq!(dev.gpu, 0);
        assert!(dev.is_enabled());
        assert_eq!(dev.status, "Alive");
        assert_eq!(dev.fan_speed, 3120);
        assert_eq!(dev.mhs_av, 712.45);
        assert_eq!(dev.intensity, "13");
        assert_eq!(dev.last_share_time, 1_700_000_100);
        assert_eq!(dev.device_rejected_percent, 0.64);
        assert_eq!(dev.device_elapsed, 11250);
        assert_eq!(dev.hashrate().to_human_readable(), "712.45 MH/s");
    }

    #[test_case(r#"{"Last Share Time":1700000100}"#; "canonical")]
    #[test_case(r#"{"Lash Share Time":1700000100}"#; "misspelled")]
    fn test_last_share_time_spellings(json: &str) {
        let dev: Device = serde_json::from_str(json).unwrap();
        assert_eq!(dev.last_share_time, 1_700_000_100);
    }

    #[test]
    fn test_decode_asic_device_with_missing_gpu_fields() {
        // ASIC firmware omits the GPU-only keys entirely
        let json = r#"{"ASC":0,"Name":"BTM","Enabled":"N","Status":"Dead","MHS av":0.0}"#;

        let dev: Device = serde_json::from_str(json).unwrap();
        assert!(!dev.is_enabled());
        assert_eq!(dev.status, "Dead");
        assert_eq!(dev.gpu_clock, 0);
        assert!(dev.hashrate().is_zero());
    }
}
