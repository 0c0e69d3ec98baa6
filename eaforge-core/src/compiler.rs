//! Specification compiler: strategy model in, one prompt document out.
//!
//! Sections, in fixed order, separated by one blank line:
//! 1. Header (EA name, symbol, timeframe)
//! 2. Indicators
//! 3. Entry Conditions
//! 4. Exit Conditions
//! 5. Risk Management
//! 6. Closing instruction
//!
//! Empty collections never drop their section; they render a single
//! `- None` line so the receiving model always sees the full structure.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::{derive_catalog, SelectorOptions};
use crate::conditions::{Condition, ConditionList, ValueKind};
use crate::indicator_set::IndicatorSet;

/// Placeholder line for an empty section.
pub const NONE_LINE: &str = "- None";

/// Opening line of the header section.
pub const PREAMBLE: &str =
    "Create a MetaTrader 5 Expert Advisor (MQL5) with the following specification:";

/// Final instruction appended to every specification.
pub const CLOSING_INSTRUCTION: &str = "Please generate complete, well-commented MQL5 code for \
this Expert Advisor. Expose every indicator period, threshold and risk setting as an input \
parameter, make the code ready for backtesting in the Strategy Tester, and finish with a short \
guide explaining how to backtest and optimize it.";

/// Identifying strings for the generated program, copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyMetadata {
    pub ea_name: String,
    pub symbol: String,
    pub timeframe: String,
}

impl Default for StrategyMetadata {
    fn default() -> Self {
        Self {
            ea_name: "MyExpertAdvisor".into(),
            symbol: "EURUSD".into(),
            timeframe: "H1".into(),
        }
    }
}

/// Risk settings as entered; never parsed or validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParameters {
    pub stop_loss: String,
    pub take_profit: String,
    pub lot_size: String,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            stop_loss: "50 pips".into(),
            take_profit: "100 pips".into(),
            lot_size: "0.1".into(),
        }
    }
}

/// Compile the full specification text.
///
/// Pure: identical inputs give byte-identical output.
pub fn compile_specification(
    indicators: &IndicatorSet,
    entry: &ConditionList,
    exit: &ConditionList,
    risk: &RiskParameters,
    metadata: &StrategyMetadata,
) -> String {
    let options = SelectorOptions::from_catalog(&derive_catalog(indicators));

    let sections = [
        header_section(metadata),
        titled("Indicators:", indicator_lines(indicators)),
        titled("Entry Conditions:", condition_lines(entry, &options)),
        titled("Exit Conditions:", condition_lines(exit, &options)),
        titled("Risk Management:", risk_lines(risk)),
        CLOSING_INSTRUCTION.to_string(),
    ];
    sections.join("\n\n")
}

fn header_section(metadata: &StrategyMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{PREAMBLE}");
    let _ = writeln!(out, "EA Name: {}", metadata.ea_name);
    let _ = writeln!(out, "Symbol: {}", metadata.symbol);
    let _ = write!(out, "Timeframe: {}", metadata.timeframe);
    out
}

/// Title line followed by the body lines, or `- None` when there are none.
fn titled(title: &str, lines: Vec<String>) -> String {
    let mut out = String::from(title);
    if lines.is_empty() {
        out.push('\n');
        out.push_str(NONE_LINE);
    }
    for line in lines {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// `- RSI_1: Period=14` per instance, parameters in declaration order.
fn indicator_lines(indicators: &IndicatorSet) -> Vec<String> {
    indicators
        .iter()
        .zip(indicators.labels())
        .map(|(inst, label)| {
            let params = inst
                .params()
                .values()
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {label}: {params}")
        })
        .collect()
}

fn condition_lines(list: &ConditionList, options: &SelectorOptions) -> Vec<String> {
    list.iter()
        .enumerate()
        .map(|(i, cond)| condition_line(i, cond, options))
        .collect()
}

/// `- {subject} {op} {value}`, with the connective ahead of the subject on
/// every row but the first.
fn condition_line(index: usize, cond: &Condition, options: &SelectorOptions) -> String {
    let subject = options.label_of(&cond.subject).unwrap_or(&cond.subject);
    let value = match cond.value_kind {
        ValueKind::Literal => cond.literal.to_string(),
        ValueKind::Output => cond
            .value_ref
            .as_deref()
            .map(|id| options.label_of(id).unwrap_or(id).to_string())
            .unwrap_or_else(|| "?".to_string()),
    };
    match cond.connective {
        Some(conn) if index > 0 => format!("- {conn} {subject} {} {value}", cond.operator),
        _ => format!("- {subject} {} {value}", cond.operator),
    }
}

fn risk_lines(risk: &RiskParameters) -> Vec<String> {
    vec![
        format!("- Stop Loss: {}", risk.stop_loss),
        format!("- Take Profit: {}", risk.take_profit),
        format!("- Lot Size: {}", risk.lot_size),
    ]
}
