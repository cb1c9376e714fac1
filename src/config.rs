// ==========================================
// 餐饮成本核算引擎 - 分析参数配置
// ==========================================
// 职责: 可调分析参数 (带默认值, 可序列化持久到配置文件)
// 红线: 引擎自身不读文件, 配置由调用方装配后注入
// ==========================================

use serde::{Deserialize, Serialize};

/// 建议抑制阈值默认值 (%): 变化不超过该幅度的建议视为噪声
pub const DEFAULT_MIN_CHANGE_PERCENT: f64 = 0.5;

/// 默认采样的最近生产次数
pub const DEFAULT_LAST_N_RUNS: usize = 5;

// ==========================================
// AdvisorConfig - 用量修订建议参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// 采样最近 N 次生产记录
    pub last_n_runs: usize,
    /// 建议抑制阈值 (%), 严格大于才输出
    pub min_change_percent: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            last_n_runs: DEFAULT_LAST_N_RUNS,
            min_change_percent: DEFAULT_MIN_CHANGE_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.last_n_runs, 5);
        assert_eq!(config.min_change_percent, 0.5);
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = AdvisorConfig {
            last_n_runs: 10,
            min_change_percent: 1.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AdvisorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
