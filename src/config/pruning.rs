use crate::error::TestnetError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// How much historical state a validator keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruningStrategy {
    Default,
    /// Keep everything
    #[default]
    Nothing,
    Everything,
    Custom { keep_recent: u64, interval: u64 },
}

impl FromStr for PruningStrategy {
    type Err = TestnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(PruningStrategy::Default),
            "nothing" => Ok(PruningStrategy::Nothing),
            "everything" => Ok(PruningStrategy::Everything),
            other => {
                let parts: Vec<&str> = other.split(':').collect();
                match parts.as_slice() {
                    ["custom", keep_recent, interval] => {
                        let keep_recent = keep_recent.parse().map_err(|_| {
                            TestnetError::Config(format!("invalid pruning keep-recent in {s}"))
                        })?;
                        let interval: u64 = interval.parse().map_err(|_| {
                            TestnetError::Config(format!("invalid pruning interval in {s}"))
                        })?;
                        if interval == 0 {
                            return Err(TestnetError::Config(
                                "pruning interval must be positive".to_string(),
                            ));
                        }
                        Ok(PruningStrategy::Custom {
                            keep_recent,
                            interval,
                        })
                    }
                    _ => Err(TestnetError::Config(format!(
                        "unknown pruning strategy: {s}"
                    ))),
                }
            }
        }
    }
}

impl fmt::Display for PruningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruningStrategy::Default => write!(f, "default"),
            PruningStrategy::Nothing => write!(f, "nothing"),
            PruningStrategy::Everything => write!(f, "everything"),
            PruningStrategy::Custom {
                keep_recent,
                interval,
            } => write!(f, "custom:{keep_recent}:{interval}"),
        }
    }
}

// Written to app.toml in its string form
impl Serialize for PruningStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PruningStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
