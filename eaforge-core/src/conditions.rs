//! Condition rows and the two ordered condition lists (entry, exit).
//!
//! Row order is the left-to-right order of the generated rule. The first row
//! never carries a connective and every later row always does; `add` and
//! `remove` restore that placement before returning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::SelectorOptions;
use crate::error::{BuilderError, Selector};

/// Comparison operators. Forwarded verbatim; this crate never evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "crosses above")]
    CrossesAbove,
    #[serde(rename = "crosses below")]
    CrossesBelow,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Greater,
        Operator::Less,
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::Equal,
        Operator::CrossesAbove,
        Operator::CrossesBelow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "==",
            Operator::CrossesAbove => "crosses above",
            Operator::CrossesBelow => "crosses below",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BuilderError::UnknownOperator(s.to_string()))
    }
}

/// Logical link between a row and the row before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Connective {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Connective::And),
            "OR" => Ok(Connective::Or),
            _ => Err(BuilderError::UnknownConnective(s.to_string())),
        }
    }
}

/// Whether a row compares against a literal or another indicator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Literal,
    Output,
}

/// Which list a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Entry,
    Exit,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Entry => write!(f, "entry"),
            ListKind::Exit => write!(f, "exit"),
        }
    }
}

/// One condition row.
///
/// A row keeps both the literal and the value-indicator selection, as the
/// form shows both inputs; `value_kind` decides which one the rule uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub subject: String,
    pub operator: Operator,
    pub value_kind: ValueKind,
    pub literal: f64,
    /// `None` only while the catalog is empty.
    pub value_ref: Option<String>,
    pub connective: Option<Connective>,
}

impl Condition {
    /// A fresh row pointing at the first candidate of each selector.
    pub fn with_defaults(options: &SelectorOptions) -> Self {
        Self {
            subject: options.default_subject().to_string(),
            operator: Operator::Greater,
            value_kind: ValueKind::Literal,
            literal: 0.0,
            value_ref: options.default_value().map(str::to_string),
            connective: None,
        }
    }
}

/// A single editable field of a condition row.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionField {
    Subject(String),
    Operator(Operator),
    ValueKind(ValueKind),
    Literal(f64),
    ValueRef(String),
    Connective(Connective),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionList {
    kind: ListKind,
    rows: Vec<Condition>,
}

impl ConditionList {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Insert a default row after `after` (append when `None` or past the end).
    ///
    /// Returns the index of the new row.
    pub fn add(&mut self, after: Option<usize>, options: &SelectorOptions) -> usize {
        let index = match after {
            Some(i) => (i + 1).min(self.rows.len()),
            None => self.rows.len(),
        };
        self.rows.insert(index, Condition::with_defaults(options));
        self.normalize_connectives();
        index
    }

    /// Remove the row at `index`. Out of range is a no-op returning `None`.
    pub fn remove(&mut self, index: usize) -> Option<Condition> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        self.normalize_connectives();
        Some(removed)
    }

    /// Change one field of the row at `index`.
    ///
    /// Selector fields must name a current candidate; the first row rejects
    /// a connective.
    pub fn set_field(
        &mut self,
        index: usize,
        field: ConditionField,
        options: &SelectorOptions,
    ) -> Result<(), BuilderError> {
        let list = self.kind;
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(BuilderError::ConditionIndexOutOfRange { list, index, len })?;

        match field {
            ConditionField::Subject(id) => {
                if !options.subject_contains(&id) {
                    return Err(BuilderError::UnknownSelection {
                        selector: Selector::Subject,
                        id,
                    });
                }
                row.subject = id;
            }
            ConditionField::ValueRef(id) => {
                if !options.value_contains(&id) {
                    return Err(BuilderError::UnknownSelection {
                        selector: Selector::Value,
                        id,
                    });
                }
                row.value_ref = Some(id);
            }
            ConditionField::Operator(op) => row.operator = op,
            ConditionField::ValueKind(kind) => row.value_kind = kind,
            ConditionField::Literal(v) => row.literal = v,
            ConditionField::Connective(c) => {
                if index == 0 {
                    return Err(BuilderError::ConnectiveOnFirstRow { list });
                }
                row.connective = Some(c);
            }
        }
        Ok(())
    }

    /// First row loses its connective; later rows without one get `AND`.
    fn normalize_connectives(&mut self) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == 0 {
                row.connective = None;
            } else if row.connective.is_none() {
                row.connective = Some(Connective::And);
            }
        }
    }

    pub fn rows(&self) -> &[Condition] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Condition] {
        &mut self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::derive_catalog;
    use crate::indicator_set::IndicatorSet;
    use crate::registry::IndicatorKind;

    fn rsi_options() -> SelectorOptions {
        let mut set = IndicatorSet::new();
        set.add(IndicatorKind::Rsi);
        SelectorOptions::from_catalog(&derive_catalog(&set))
    }

    fn connectives(list: &ConditionList) -> Vec<Option<Connective>> {
        list.iter().map(|c| c.connective).collect()
    }

    #[test]
    fn first_row_has_no_connective_later_rows_do() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        list.add(None, &options);
        list.add(None, &options);
        assert_eq!(
            connectives(&list),
            vec![None, Some(Connective::And), Some(Connective::And)]
        );
    }

    #[test]
    fn removing_first_row_strips_promoted_connective() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Exit);
        list.add(None, &options);
        list.add(None, &options);
        list.set_field(1, ConditionField::Connective(Connective::Or), &options)
            .unwrap();
        list.remove(0);
        assert_eq!(connectives(&list), vec![None]);
    }

    #[test]
    fn add_after_inserts_in_place() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        list.add(None, &options);
        list.set_field(1, ConditionField::Literal(2.0), &options).unwrap();
        let idx = list.add(Some(0), &options);
        assert_eq!(idx, 1);
        assert_eq!(list.get(1).unwrap().literal, 0.0);
        assert_eq!(list.get(2).unwrap().literal, 2.0);
    }

    #[test]
    fn add_after_past_end_appends() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        assert_eq!(list.add(Some(10), &options), 1);
    }

    #[test]
    fn existing_connectives_survive_removal_elsewhere() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        for _ in 0..3 {
            list.add(None, &options);
        }
        list.set_field(2, ConditionField::Connective(Connective::Or), &options)
            .unwrap();
        list.remove(1);
        assert_eq!(connectives(&list), vec![None, Some(Connective::Or)]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        assert!(list.remove(5).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn new_row_defaults() {
        let options = rsi_options();
        let row = Condition::with_defaults(&options);
        assert_eq!(row.subject, "Price_Close");
        assert_eq!(row.operator, Operator::Greater);
        assert_eq!(row.value_kind, ValueKind::Literal);
        assert_eq!(row.value_ref.as_deref(), Some("RSI_1"));
    }

    #[test]
    fn connective_on_first_row_is_rejected() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        let err = list
            .set_field(0, ConditionField::Connective(Connective::Or), &options)
            .unwrap_err();
        assert_eq!(err, BuilderError::ConnectiveOnFirstRow { list: ListKind::Entry });
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        let err = list
            .set_field(0, ConditionField::Subject("MACD_1_Main".into()), &options)
            .unwrap_err();
        assert!(matches!(err, BuilderError::UnknownSelection { selector: Selector::Subject, .. }));
        assert_eq!(list.get(0).unwrap().subject, "Price_Close");
    }

    #[test]
    fn price_field_is_not_a_value_option() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Entry);
        list.add(None, &options);
        let err = list
            .set_field(0, ConditionField::ValueRef("Price_Close".into()), &options)
            .unwrap_err();
        assert!(matches!(err, BuilderError::UnknownSelection { selector: Selector::Value, .. }));
    }

    #[test]
    fn set_field_out_of_range_errors() {
        let options = rsi_options();
        let mut list = ConditionList::new(ListKind::Exit);
        let err = list
            .set_field(0, ConditionField::Literal(1.0), &options)
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::ConditionIndexOutOfRange {
                list: ListKind::Exit,
                index: 0,
                len: 0
            }
        );
    }

    #[test]
    fn operator_parses_from_label() {
        assert_eq!("crosses above".parse::<Operator>().unwrap(), Operator::CrossesAbove);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::GreaterEqual);
        assert!("!=".parse::<Operator>().is_err());
    }

    #[test]
    fn operator_serializes_verbatim() {
        let json = serde_json::to_string(&Operator::CrossesBelow).unwrap();
        assert_eq!(json, "\"crosses below\"");
    }

    #[test]
    fn connective_parses_case_insensitively() {
        assert_eq!("or".parse::<Connective>().unwrap(), Connective::Or);
        assert!("xor".parse::<Connective>().is_err());
    }
}
