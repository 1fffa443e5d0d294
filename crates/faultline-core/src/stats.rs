//! Aggregate counts served by the stats endpoint

use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Per-level entry counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelCounts {
    pub error: u64,
    pub warn: u64,
    pub info: u64,
    pub debug: u64,
}

impl LevelCounts {
    pub fn get(&self, level: LogLevel) -> u64 {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warn,
            LogLevel::Info => self.info,
            LogLevel::Debug => self.debug,
        }
    }

    pub fn set(&mut self, level: LogLevel, count: u64) {
        match level {
            LogLevel::Error => self.error = count,
            LogLevel::Warn => self.warn = count,
            LogLevel::Info => self.info = count,
            LogLevel::Debug => self.debug = count,
        }
    }
}

/// Totals for the dashboard header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: u64,
    pub by_level: LevelCounts,
    #[serde(rename = "last24Hours")]
    pub last_24_hours: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_wire_shape() {
        let mut by_level = LevelCounts::default();
        by_level.set(LogLevel::Error, 3);
        let stats = LogStats {
            total: 7,
            by_level,
            last_24_hours: 2,
        };

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["byLevel"]["error"], 3);
        assert_eq!(json["byLevel"]["debug"], 0);
        assert_eq!(json["last24Hours"], 2);
    }
}
