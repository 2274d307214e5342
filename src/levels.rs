//! Severity level registry.
//!
//! # Levels
//! ```text
//! error=0  warn=1  info=2  debug=3  verbose=4  silly=5
//! ```
//!
//! # Design Decisions
//! - Lower rank = more severe
//! - A level is enabled against a threshold iff `rank <= threshold.rank`
//! - Colors are display-only and used by the console transport

use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// A named log severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Verbose,
    Silly,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Level; 6] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Verbose,
        Level::Silly,
    ];

    /// Numeric rank of the level (error=0 … silly=5).
    pub fn rank(self) -> u8 {
        match self {
            Level::Error => 0,
            Level::Warn => 1,
            Level::Info => 2,
            Level::Debug => 3,
            Level::Verbose => 4,
            Level::Silly => 5,
        }
    }

    /// Level for a rank, if the rank exists in the table.
    pub fn from_rank(rank: u8) -> Option<Level> {
        Self::ALL.get(rank as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Verbose => "verbose",
            Level::Silly => "silly",
        }
    }

    /// Console color for this level.
    pub fn color(self) -> Color {
        match self {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Verbose => Color::Magenta,
            Level::Silly => Color::Cyan,
        }
    }

    /// Returns true if a record at `self` passes a gate set to `threshold`.
    pub fn is_enabled_at(self, threshold: Level) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    /// Exact, case-sensitive lookup in the registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name() == s)
            .ok_or_else(|| LoggerError::InvalidLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table() {
        let ranks: Vec<u8> = Level::ALL.iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
        for level in Level::ALL {
            assert_eq!(Level::from_rank(level.rank()), Some(level));
        }
        assert_eq!(Level::from_rank(6), None);
    }

    #[test]
    fn test_gate_ordering() {
        for threshold in Level::ALL {
            for level in Level::ALL {
                assert_eq!(
                    level.is_enabled_at(threshold),
                    level.rank() <= threshold.rank(),
                    "{level} against {threshold}"
                );
            }
        }
        assert!(Level::Error.is_enabled_at(Level::Warn));
        assert!(Level::Warn.is_enabled_at(Level::Warn));
        assert!(!Level::Info.is_enabled_at(Level::Warn));
    }

    #[test]
    fn test_parse() {
        assert_eq!("verbose".parse::<Level>().unwrap(), Level::Verbose);
        assert!("Info".parse::<Level>().is_err()); // Case sensitive

        let err = "invalid".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid log level: invalid. Log level not changed.");
    }

    #[test]
    fn test_every_level_has_color() {
        assert_eq!(Level::Error.color(), Color::Red);
        assert_eq!(Level::Silly.color(), Color::Cyan);
        let distinct: std::collections::HashSet<_> =
            Level::ALL.iter().map(|l| format!("{:?}", l.color())).collect();
        assert_eq!(distinct.len(), Level::ALL.len());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Level::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
        let level: Level = serde_json::from_str("\"silly\"").unwrap();
        assert_eq!(level, Level::Silly);
    }
}
