//! Named strategy presets: common indicator + condition archetypes.
//!
//! Presets are expressed as the event sequence a user would produce in the
//! form, so they go through exactly the same builder paths.

use std::str::FromStr;

use crate::builder::{BuilderEvent, StrategyBuilder};
use crate::compiler::{RiskParameters, StrategyMetadata};
use crate::conditions::{ConditionField, Connective, ListKind, Operator, ValueKind};
use crate::error::BuilderError;
use crate::registry::IndicatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPreset {
    RsiReversal,
    MaCrossover,
    BollingerBounce,
    MacdMomentum,
    StochasticOversold,
}

/// Right-hand side of a preset condition.
enum Rhs {
    Literal(f64),
    Output(&'static str),
}

impl StrategyPreset {
    pub fn all() -> &'static [StrategyPreset] {
        &[
            StrategyPreset::RsiReversal,
            StrategyPreset::MaCrossover,
            StrategyPreset::BollingerBounce,
            StrategyPreset::MacdMomentum,
            StrategyPreset::StochasticOversold,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyPreset::RsiReversal => "rsi_reversal",
            StrategyPreset::MaCrossover => "ma_crossover",
            StrategyPreset::BollingerBounce => "bollinger_bounce",
            StrategyPreset::MacdMomentum => "macd_momentum",
            StrategyPreset::StochasticOversold => "stochastic_oversold",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyPreset::RsiReversal => "Buy when RSI(14) is oversold, exit when overbought",
            StrategyPreset::MaCrossover => "SMA(10) crossing SMA(50) in both directions",
            StrategyPreset::BollingerBounce => {
                "Close below the lower band with weak RSI, exit at the middle band"
            }
            StrategyPreset::MacdMomentum => "MACD signal cross filtered by EMA(200) trend",
            StrategyPreset::StochasticOversold => "Stochastic cross inside the oversold zone",
        }
    }

    fn ea_name(self) -> &'static str {
        match self {
            StrategyPreset::RsiReversal => "RsiReversalEA",
            StrategyPreset::MaCrossover => "MaCrossoverEA",
            StrategyPreset::BollingerBounce => "BollingerBounceEA",
            StrategyPreset::MacdMomentum => "MacdMomentumEA",
            StrategyPreset::StochasticOversold => "StochasticOversoldEA",
        }
    }

    /// Default metadata: the preset's EA name on EURUSD H1.
    pub fn default_metadata(self) -> StrategyMetadata {
        StrategyMetadata {
            ea_name: self.ea_name().to_string(),
            ..StrategyMetadata::default()
        }
    }

    /// The form events that compose this preset.
    pub fn events(self) -> Vec<BuilderEvent> {
        use IndicatorKind::*;
        use ListKind::{Entry, Exit};
        use Operator::*;

        let mut ev = Vec::new();
        match self {
            StrategyPreset::RsiReversal => {
                ev.push(BuilderEvent::IndicatorAdded(Rsi));
                condition(&mut ev, Entry, 0, None, "RSI_1", Less, Rhs::Literal(30.0));
                condition(&mut ev, Exit, 0, None, "RSI_1", Greater, Rhs::Literal(70.0));
            }
            StrategyPreset::MaCrossover => {
                ev.push(BuilderEvent::IndicatorAdded(Sma));
                ev.push(param(0, "Period", 10.0));
                ev.push(BuilderEvent::IndicatorAdded(Sma));
                ev.push(param(1, "Period", 50.0));
                condition(&mut ev, Entry, 0, None, "SMA_1", CrossesAbove, Rhs::Output("SMA_2"));
                condition(&mut ev, Exit, 0, None, "SMA_1", CrossesBelow, Rhs::Output("SMA_2"));
            }
            StrategyPreset::BollingerBounce => {
                ev.push(BuilderEvent::IndicatorAdded(BollingerBands));
                ev.push(BuilderEvent::IndicatorAdded(Rsi));
                condition(
                    &mut ev,
                    Entry,
                    0,
                    None,
                    "Price_Close",
                    Less,
                    Rhs::Output("BollingerBands_1_Lower"),
                );
                condition(
                    &mut ev,
                    Entry,
                    1,
                    Some(Connective::And),
                    "RSI_1",
                    Less,
                    Rhs::Literal(35.0),
                );
                condition(
                    &mut ev,
                    Exit,
                    0,
                    None,
                    "Price_Close",
                    GreaterEqual,
                    Rhs::Output("BollingerBands_1_Middle"),
                );
                condition(
                    &mut ev,
                    Exit,
                    1,
                    Some(Connective::Or),
                    "RSI_1",
                    Greater,
                    Rhs::Literal(65.0),
                );
            }
            StrategyPreset::MacdMomentum => {
                ev.push(BuilderEvent::IndicatorAdded(Macd));
                ev.push(BuilderEvent::IndicatorAdded(Ema));
                ev.push(param(1, "Period", 200.0));
                condition(
                    &mut ev,
                    Entry,
                    0,
                    None,
                    "MACD_1_Main",
                    CrossesAbove,
                    Rhs::Output("MACD_1_Signal"),
                );
                condition(
                    &mut ev,
                    Entry,
                    1,
                    Some(Connective::And),
                    "Price_Close",
                    Greater,
                    Rhs::Output("EMA_1"),
                );
                condition(
                    &mut ev,
                    Exit,
                    0,
                    None,
                    "MACD_1_Main",
                    CrossesBelow,
                    Rhs::Output("MACD_1_Signal"),
                );
            }
            StrategyPreset::StochasticOversold => {
                ev.push(BuilderEvent::IndicatorAdded(Stochastic));
                ev.push(param(0, "KPeriod", 14.0));
                condition(
                    &mut ev,
                    Entry,
                    0,
                    None,
                    "Stochastic_1_Main",
                    CrossesAbove,
                    Rhs::Output("Stochastic_1_Signal"),
                );
                condition(
                    &mut ev,
                    Entry,
                    1,
                    Some(Connective::And),
                    "Stochastic_1_Main",
                    Less,
                    Rhs::Literal(20.0),
                );
                condition(
                    &mut ev,
                    Exit,
                    0,
                    None,
                    "Stochastic_1_Main",
                    Greater,
                    Rhs::Literal(80.0),
                );
            }
        }
        ev
    }

    /// Build the preset into a fresh builder.
    pub fn build(self, metadata: StrategyMetadata) -> Result<StrategyBuilder, BuilderError> {
        let mut builder = StrategyBuilder::new(metadata, RiskParameters::default());
        builder.apply_all(self.events())?;
        Ok(builder)
    }
}

impl FromStr for StrategyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyPreset::all()
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = StrategyPreset::all().iter().map(|p| p.name()).collect();
                format!("unknown preset '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

fn param(index: usize, name: &str, value: f64) -> BuilderEvent {
    BuilderEvent::IndicatorParameterChanged {
        index,
        name: name.to_string(),
        value,
    }
}

/// Append the events for one condition row at `index` of `list`.
fn condition(
    ev: &mut Vec<BuilderEvent>,
    list: ListKind,
    index: usize,
    connective: Option<Connective>,
    subject: &str,
    operator: Operator,
    rhs: Rhs,
) {
    let field = |field| BuilderEvent::ConditionFieldChanged { list, index, field };

    ev.push(BuilderEvent::ConditionAdded { list, after: None });
    ev.push(field(ConditionField::Subject(subject.to_string())));
    ev.push(field(ConditionField::Operator(operator)));
    match rhs {
        Rhs::Literal(v) => ev.push(field(ConditionField::Literal(v))),
        Rhs::Output(id) => {
            ev.push(field(ConditionField::ValueKind(ValueKind::Output)));
            ev.push(field(ConditionField::ValueRef(id.to_string())));
        }
    }
    if let Some(c) = connective {
        ev.push(field(ConditionField::Connective(c)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds() {
        for &preset in StrategyPreset::all() {
            let builder = preset.build(preset.default_metadata());
            assert!(builder.is_ok(), "{} failed: {:?}", preset.name(), builder.err());
            let builder = builder.unwrap();
            assert!(!builder.indicators().is_empty());
            assert!(!builder.conditions(ListKind::Entry).is_empty());
            assert!(!builder.conditions(ListKind::Exit).is_empty());
        }
    }

    #[test]
    fn names_roundtrip_through_from_str() {
        for &preset in StrategyPreset::all() {
            assert_eq!(preset.name().parse::<StrategyPreset>().unwrap(), preset);
        }
        assert!("martingale".parse::<StrategyPreset>().is_err());
    }

    #[test]
    fn ma_crossover_compiles_expected_rule() {
        let preset = StrategyPreset::MaCrossover;
        let text = preset.build(preset.default_metadata()).unwrap().compile();
        assert!(text.contains("- SMA_1: Period=10\n- SMA_2: Period=50"));
        assert!(text.contains("- SMA #1 crosses above SMA #2"));
        assert!(text.contains("EA Name: MaCrossoverEA"));
    }

    #[test]
    fn bollinger_bounce_uses_connectives() {
        let preset = StrategyPreset::BollingerBounce;
        let text = preset.build(preset.default_metadata()).unwrap().compile();
        assert!(text.contains("- Price (Close) < BollingerBands #1 (Lower)\n- AND RSI #1 < 35"));
        assert!(text.contains("- OR RSI #1 > 65"));
    }
}
