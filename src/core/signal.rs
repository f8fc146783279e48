//! Purchasing signal derived from how a rate moved.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Percentage distance from the yearly baseline that counts as meaningful.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Buy,
    Wait,
    Neutral,
}

impl SignalKind {
    pub fn message(&self) -> &'static str {
        match self {
            SignalKind::Buy => "구매 유리 구간",
            SignalKind::Wait => "구매 주의",
            SignalKind::Neutral => "안정적",
        }
    }
}

impl Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SignalKind::Buy => "BUY",
                SignalKind::Wait => "WAIT",
                SignalKind::Neutral => "NEUTRAL",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signal: SignalKind,
    pub message: String,
}

impl From<SignalKind> for Signal {
    fn from(kind: SignalKind) -> Self {
        Signal {
            signal: kind,
            message: kind.message().to_string(),
        }
    }
}

/// Classifies a pair using the default ±2% threshold.
pub fn classify(vs_last_year: f64, vs_seven_day: f64) -> Signal {
    classify_with_threshold(vs_last_year, vs_seven_day, DEFAULT_THRESHOLD_PERCENT)
}

/// Buy when well below the yearly baseline and still falling, wait when well
/// above it and still rising, neutral otherwise. First match wins.
pub fn classify_with_threshold(vs_last_year: f64, vs_seven_day: f64, threshold: f64) -> Signal {
    let kind = if vs_last_year < -threshold && vs_seven_day < 0.0 {
        SignalKind::Buy
    } else if vs_last_year > threshold && vs_seven_day > 0.0 {
        SignalKind::Wait
    } else {
        SignalKind::Neutral
    };
    kind.into()
}
