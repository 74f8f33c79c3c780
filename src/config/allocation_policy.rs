use crate::domain::types::UtilizationBand;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY_LIMIT_PCT: u32 = 100;
pub const DEFAULT_HIGH_THRESHOLD_PCT: u32 = 90;
pub const DEFAULT_ELEVATED_THRESHOLD_PCT: u32 = 70;

/// Tunables for allocation checks and dashboard badges.
///
/// Stored in config_kv (scope_id='global'); missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPolicy {
    /// Hard-capacity ceiling per employee per day
    #[serde(default = "default_capacity_limit")]
    pub capacity_limit_pct: u32,

    /// At or above: `High` badge
    #[serde(default = "default_high_threshold")]
    pub high_threshold_pct: u32,

    /// At or above: `Elevated` badge
    #[serde(default = "default_elevated_threshold")]
    pub elevated_threshold_pct: u32,
}

fn default_capacity_limit() -> u32 {
    DEFAULT_CAPACITY_LIMIT_PCT
}

fn default_high_threshold() -> u32 {
    DEFAULT_HIGH_THRESHOLD_PCT
}

fn default_elevated_threshold() -> u32 {
    DEFAULT_ELEVATED_THRESHOLD_PCT
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            capacity_limit_pct: DEFAULT_CAPACITY_LIMIT_PCT,
            high_threshold_pct: DEFAULT_HIGH_THRESHOLD_PCT,
            elevated_threshold_pct: DEFAULT_ELEVATED_THRESHOLD_PCT,
        }
    }
}

impl AllocationPolicy {
    pub fn utilization_band(&self, pct: u32) -> UtilizationBand {
        if pct >= self.high_threshold_pct {
            UtilizationBand::High
        } else if pct >= self.elevated_threshold_pct {
            UtilizationBand::Elevated
        } else {
            UtilizationBand::Normal
        }
    }

    /// Thresholds must be ordered: elevated <= high.
    pub fn is_consistent(&self) -> bool {
        self.elevated_threshold_pct <= self.high_threshold_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let policy = AllocationPolicy::default();
        assert_eq!(policy.utilization_band(69), UtilizationBand::Normal);
        assert_eq!(policy.utilization_band(70), UtilizationBand::Elevated);
        assert_eq!(policy.utilization_band(89), UtilizationBand::Elevated);
        assert_eq!(policy.utilization_band(90), UtilizationBand::High);
        assert_eq!(policy.utilization_band(130), UtilizationBand::High);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy: AllocationPolicy =
            serde_json::from_str(r#"{"capacity_limit_pct": 120}"#).unwrap();
        assert_eq!(policy.capacity_limit_pct, 120);
        assert_eq!(policy.high_threshold_pct, DEFAULT_HIGH_THRESHOLD_PCT);
        assert!(policy.is_consistent());
    }
}
