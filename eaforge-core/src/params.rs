//! Typed parameter sets, one variant per indicator kind.
//!
//! The registry names parameters as strings (that is what the presentation
//! sends and what the compiled specification prints); this module maps those
//! names onto typed fields so a MACD can never carry a `Deviation`.

use serde::{Deserialize, Serialize};

use crate::error::BuilderError;
use crate::registry::{parameters_for, IndicatorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IndicatorParams {
    #[serde(rename = "RSI")]
    Rsi { period: i64 },
    #[serde(rename = "SMA")]
    Sma { period: i64 },
    #[serde(rename = "EMA")]
    Ema { period: i64 },
    #[serde(rename = "MACD")]
    Macd {
        fast_ema: i64,
        slow_ema: i64,
        signal_sma: i64,
    },
    BollingerBands { period: i64, deviation: f64 },
    Stochastic {
        k_period: i64,
        d_period: i64,
        slowing: i64,
    },
}

impl IndicatorParams {
    /// Registry defaults for a kind.
    pub fn defaults(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Rsi => IndicatorParams::Rsi { period: 14 },
            IndicatorKind::Sma => IndicatorParams::Sma { period: 20 },
            IndicatorKind::Ema => IndicatorParams::Ema { period: 20 },
            IndicatorKind::Macd => IndicatorParams::Macd {
                fast_ema: 12,
                slow_ema: 26,
                signal_sma: 9,
            },
            IndicatorKind::BollingerBands => IndicatorParams::BollingerBands {
                period: 20,
                deviation: 2.0,
            },
            IndicatorKind::Stochastic => IndicatorParams::Stochastic {
                k_period: 5,
                d_period: 3,
                slowing: 3,
            },
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorParams::Rsi { .. } => IndicatorKind::Rsi,
            IndicatorParams::Sma { .. } => IndicatorKind::Sma,
            IndicatorParams::Ema { .. } => IndicatorKind::Ema,
            IndicatorParams::Macd { .. } => IndicatorKind::Macd,
            IndicatorParams::BollingerBands { .. } => IndicatorKind::BollingerBands,
            IndicatorParams::Stochastic { .. } => IndicatorKind::Stochastic,
        }
    }

    /// Read a parameter by its registry name.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match (self, name) {
            (
                IndicatorParams::Rsi { period }
                | IndicatorParams::Sma { period }
                | IndicatorParams::Ema { period }
                | IndicatorParams::BollingerBands { period, .. },
                "Period",
            ) => *period as f64,
            (IndicatorParams::Macd { fast_ema, .. }, "FastEMA") => *fast_ema as f64,
            (IndicatorParams::Macd { slow_ema, .. }, "SlowEMA") => *slow_ema as f64,
            (IndicatorParams::Macd { signal_sma, .. }, "SignalSMA") => *signal_sma as f64,
            (IndicatorParams::BollingerBands { deviation, .. }, "Deviation") => *deviation,
            (IndicatorParams::Stochastic { k_period, .. }, "KPeriod") => *k_period as f64,
            (IndicatorParams::Stochastic { d_period, .. }, "DPeriod") => *d_period as f64,
            (IndicatorParams::Stochastic { slowing, .. }, "Slowing") => *slowing as f64,
            _ => return None,
        };
        Some(value)
    }

    /// Assign a parameter by its registry name.
    ///
    /// No range checks: zero and negative values are stored as given.
    /// Integral parameters truncate toward zero.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), BuilderError> {
        let kind = self.kind();
        let whole = value.trunc() as i64;
        match (self, name) {
            (
                IndicatorParams::Rsi { period }
                | IndicatorParams::Sma { period }
                | IndicatorParams::Ema { period }
                | IndicatorParams::BollingerBands { period, .. },
                "Period",
            ) => *period = whole,
            (IndicatorParams::Macd { fast_ema, .. }, "FastEMA") => *fast_ema = whole,
            (IndicatorParams::Macd { slow_ema, .. }, "SlowEMA") => *slow_ema = whole,
            (IndicatorParams::Macd { signal_sma, .. }, "SignalSMA") => *signal_sma = whole,
            (IndicatorParams::BollingerBands { deviation, .. }, "Deviation") => *deviation = value,
            (IndicatorParams::Stochastic { k_period, .. }, "KPeriod") => *k_period = whole,
            (IndicatorParams::Stochastic { d_period, .. }, "DPeriod") => *d_period = whole,
            (IndicatorParams::Stochastic { slowing, .. }, "Slowing") => *slowing = whole,
            _ => {
                return Err(BuilderError::UnknownParameter {
                    kind,
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    /// `(name, value)` pairs in registry declaration order.
    pub fn values(&self) -> Vec<(&'static str, f64)> {
        parameters_for(self.kind())
            .iter()
            .filter_map(|spec| self.get(spec.name).map(|v| (spec.name, v)))
            .collect()
    }
}
