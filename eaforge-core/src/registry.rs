//! Indicator registry: the static table behind every indicator kind.
//!
//! For each supported kind the registry declares:
//! - the ordered list of configurable parameters with their defaults
//! - the ordered list of output suffixes the kind exposes to conditions
//!
//! Single-output kinds expose one unnamed output (`[""]`). Declaration order
//! is significant: it fixes both the catalog order and the parameter order in
//! the compiled specification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuilderError;

/// Supported technical indicator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "SMA")]
    Sma,
    #[serde(rename = "EMA")]
    Ema,
    #[serde(rename = "MACD")]
    Macd,
    BollingerBands,
    Stochastic,
}

impl IndicatorKind {
    /// Every kind, in registry order.
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::Rsi,
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Macd,
        IndicatorKind::BollingerBands,
        IndicatorKind::Stochastic,
    ];

    /// Identifier prefix used in instance labels and output ids (`RSI` in `RSI_1`).
    pub fn code(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::BollingerBands => "BollingerBands",
            IndicatorKind::Stochastic => "Stochastic",
        }
    }

    /// Number of addressable outputs (1, 2 or 3).
    pub fn output_count(self) -> usize {
        outputs_for(self).len()
    }

    pub fn is_multi_output(self) -> bool {
        self.output_count() > 1
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for IndicatorKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsi" => Ok(IndicatorKind::Rsi),
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "macd" => Ok(IndicatorKind::Macd),
            "bollingerbands" | "bollinger_bands" | "bollinger" => {
                Ok(IndicatorKind::BollingerBands)
            }
            "stochastic" | "stoch" => Ok(IndicatorKind::Stochastic),
            _ => Err(BuilderError::UnknownIndicatorKind(s.to_string())),
        }
    }
}

/// One configurable parameter of an indicator kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
    /// Integral parameters (periods) drop any fractional part on assignment.
    pub integral: bool,
}

static RSI_PARAMS: [ParamSpec; 1] = [ParamSpec {
    name: "Period",
    default: 14.0,
    integral: true,
}];

static MA_PARAMS: [ParamSpec; 1] = [ParamSpec {
    name: "Period",
    default: 20.0,
    integral: true,
}];

static MACD_PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "FastEMA",
        default: 12.0,
        integral: true,
    },
    ParamSpec {
        name: "SlowEMA",
        default: 26.0,
        integral: true,
    },
    ParamSpec {
        name: "SignalSMA",
        default: 9.0,
        integral: true,
    },
];

static BOLLINGER_PARAMS: [ParamSpec; 2] = [
    ParamSpec {
        name: "Period",
        default: 20.0,
        integral: true,
    },
    ParamSpec {
        name: "Deviation",
        default: 2.0,
        integral: false,
    },
];

static STOCHASTIC_PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "KPeriod",
        default: 5.0,
        integral: true,
    },
    ParamSpec {
        name: "DPeriod",
        default: 3.0,
        integral: true,
    },
    ParamSpec {
        name: "Slowing",
        default: 3.0,
        integral: true,
    },
];

static SINGLE_OUTPUT: [&str; 1] = [""];
static MAIN_SIGNAL: [&str; 2] = ["Main", "Signal"];
static BANDS: [&str; 3] = ["Upper", "Middle", "Lower"];

/// Ordered parameter list (name + default) for a kind.
pub fn parameters_for(kind: IndicatorKind) -> &'static [ParamSpec] {
    match kind {
        IndicatorKind::Rsi => &RSI_PARAMS,
        IndicatorKind::Sma | IndicatorKind::Ema => &MA_PARAMS,
        IndicatorKind::Macd => &MACD_PARAMS,
        IndicatorKind::BollingerBands => &BOLLINGER_PARAMS,
        IndicatorKind::Stochastic => &STOCHASTIC_PARAMS,
    }
}

/// Ordered output suffixes for a kind; `[""]` for single-output kinds.
pub fn outputs_for(kind: IndicatorKind) -> &'static [&'static str] {
    match kind {
        IndicatorKind::Rsi | IndicatorKind::Sma | IndicatorKind::Ema => &SINGLE_OUTPUT,
        IndicatorKind::Macd | IndicatorKind::Stochastic => &MAIN_SIGNAL,
        IndicatorKind::BollingerBands => &BANDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_counts_per_kind() {
        assert_eq!(IndicatorKind::Rsi.output_count(), 1);
        assert_eq!(IndicatorKind::Sma.output_count(), 1);
        assert_eq!(IndicatorKind::Ema.output_count(), 1);
        assert_eq!(IndicatorKind::Macd.output_count(), 2);
        assert_eq!(IndicatorKind::Stochastic.output_count(), 2);
        assert_eq!(IndicatorKind::BollingerBands.output_count(), 3);
    }

    #[test]
    fn single_output_kinds_expose_unnamed_output() {
        for kind in [IndicatorKind::Rsi, IndicatorKind::Sma, IndicatorKind::Ema] {
            assert_eq!(outputs_for(kind), &[""]);
            assert!(!kind.is_multi_output());
        }
    }

    #[test]
    fn bollinger_outputs_in_declaration_order() {
        assert_eq!(
            outputs_for(IndicatorKind::BollingerBands),
            &["Upper", "Middle", "Lower"]
        );
    }

    #[test]
    fn only_bollinger_deviation_is_fractional() {
        for kind in IndicatorKind::ALL {
            for spec in parameters_for(kind) {
                let expect_integral = !(kind == IndicatorKind::BollingerBands
                    && spec.name == "Deviation");
                assert_eq!(spec.integral, expect_integral, "{kind} {}", spec.name);
            }
        }
    }

    #[test]
    fn rsi_defaults() {
        let params = parameters_for(IndicatorKind::Rsi);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Period");
        assert_eq!(params[0].default, 14.0);
    }

    #[test]
    fn parse_kind_accepts_codes_and_aliases() {
        assert_eq!("RSI".parse::<IndicatorKind>().unwrap(), IndicatorKind::Rsi);
        assert_eq!("macd".parse::<IndicatorKind>().unwrap(), IndicatorKind::Macd);
        assert_eq!(
            "bollinger_bands".parse::<IndicatorKind>().unwrap(),
            IndicatorKind::BollingerBands
        );
    }

    #[test]
    fn parse_unknown_kind_is_rejected() {
        let err = "ichimoku".parse::<IndicatorKind>().unwrap_err();
        assert_eq!(err, BuilderError::UnknownIndicatorKind("ichimoku".into()));
    }

    #[test]
    fn kind_serializes_as_code() {
        let json = serde_json::to_string(&IndicatorKind::Macd).unwrap();
        assert_eq!(json, "\"MACD\"");
        let back: IndicatorKind = serde_json::from_str("\"BollingerBands\"").unwrap();
        assert_eq!(back, IndicatorKind::BollingerBands);
    }

    #[test]
    fn display_matches_code() {
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.to_string(), kind.code());
        }
    }
}
