//! Strategy drafts: serializable snapshots of a strategy under construction.
//!
//! A draft is loaded by replaying it through `StrategyBuilder` as the same
//! event sequence the form would produce: every indicator first (with its
//! parameter overrides), then entry rows, then exit rows. Invariants are
//! therefore enforced by the builder, and a draft that names an id the
//! catalog does not contain is rejected rather than repaired.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::StrategyBuilder;
use crate::compiler::{RiskParameters, StrategyMetadata};
use crate::conditions::{ConditionField, ConditionList, Connective, ListKind, Operator, ValueKind};
use crate::error::BuilderError;
use crate::fingerprint::SpecHash;
use crate::params::IndicatorParams;
use crate::registry::IndicatorKind;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("read draft {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse draft TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("serialize draft TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("parse draft JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid draft: {0}")]
    Builder(#[from] BuilderError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDraft {
    pub kind: IndicatorKind,
    /// Overrides on top of registry defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

/// One condition row. `value` is the literal (defaulting to 0) and
/// `value_ref` the indicator output; a row keeps both.
///
/// `value_kind` picks the rendered side. When omitted it is `Output` if
/// `value_ref` is present, `Literal` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<Connective>,
    pub subject: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_ref: Option<String>,
}

impl ConditionDraft {
    pub fn resolved_value_kind(&self) -> ValueKind {
        match (self.value_kind, &self.value_ref) {
            (Some(kind), _) => kind,
            (None, Some(_)) => ValueKind::Output,
            (None, None) => ValueKind::Literal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyDraft {
    #[serde(default)]
    pub metadata: StrategyMetadata,
    #[serde(default)]
    pub risk: RiskParameters,
    #[serde(default)]
    pub indicators: Vec<IndicatorDraft>,
    #[serde(default)]
    pub entry: Vec<ConditionDraft>,
    #[serde(default)]
    pub exit: Vec<ConditionDraft>,
}

impl StrategyDraft {
    /// Load a draft; `.json` files parse as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self, DraftError> {
        let content = std::fs::read_to_string(path).map_err(|source| DraftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, DraftError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, DraftError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, DraftError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Hash of the canonical JSON form (parameter maps are key-sorted).
    pub fn fingerprint(&self) -> Result<SpecHash, DraftError> {
        let json = serde_json::to_string(self)?;
        Ok(SpecHash::of_text(&json))
    }

    /// Replay the draft into a fresh builder.
    pub fn into_builder(self) -> Result<StrategyBuilder, DraftError> {
        let mut builder = StrategyBuilder::new(self.metadata, self.risk);

        for ind in &self.indicators {
            let index = builder.add_indicator(ind.kind);
            for (name, value) in &ind.params {
                builder.set_indicator_parameter(index, name, *value)?;
            }
        }

        replay_rows(&mut builder, ListKind::Entry, self.entry)?;
        replay_rows(&mut builder, ListKind::Exit, self.exit)?;
        Ok(builder)
    }
}

fn replay_rows(
    builder: &mut StrategyBuilder,
    list: ListKind,
    rows: Vec<ConditionDraft>,
) -> Result<(), BuilderError> {
    for row in rows {
        let value_kind = row.resolved_value_kind();
        let index = builder.add_condition(list, None);
        let mut set = |field| builder.set_condition_field(list, index, field);

        set(ConditionField::Subject(row.subject))?;
        set(ConditionField::Operator(row.operator))?;
        set(ConditionField::Literal(row.value.unwrap_or(0.0)))?;
        if let Some(id) = row.value_ref {
            set(ConditionField::ValueRef(id))?;
        }
        set(ConditionField::ValueKind(value_kind))?;
        if let Some(conn) = row.connective {
            set(ConditionField::Connective(conn))?;
        }
    }
    Ok(())
}

impl StrategyBuilder {
    /// Snapshot the current state as a draft.
    ///
    /// Only parameters that differ from registry defaults are written.
    pub fn to_draft(&self) -> StrategyDraft {
        let indicators = self
            .indicators()
            .iter()
            .map(|inst| {
                let defaults = IndicatorParams::defaults(inst.kind());
                let params = inst
                    .params()
                    .values()
                    .into_iter()
                    .filter(|(name, value)| defaults.get(name) != Some(*value))
                    .map(|(name, value)| (name.to_string(), value))
                    .collect();
                IndicatorDraft {
                    kind: inst.kind(),
                    params,
                }
            })
            .collect();

        StrategyDraft {
            metadata: self.metadata().clone(),
            risk: self.risk().clone(),
            indicators,
            entry: draft_rows(self.conditions(ListKind::Entry)),
            exit: draft_rows(self.conditions(ListKind::Exit)),
        }
    }
}

/// Both value sides are written, so switching `value_kind` after a reload
/// finds the same literal and reference as before.
fn draft_rows(list: &ConditionList) -> Vec<ConditionDraft> {
    list.iter()
        .map(|row| ConditionDraft {
            connective: row.connective,
            subject: row.subject.clone(),
            operator: row.operator,
            value_kind: Some(row.value_kind),
            value: Some(row.literal),
            value_ref: row.value_ref.clone(),
        })
        .collect()
}
