//! Errors raised while mutating a strategy under construction.

use crate::conditions::ListKind;
use crate::registry::IndicatorKind;

/// Which kind of condition selector rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Subject,
    Value,
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Subject => write!(f, "subject"),
            Selector::Value => write!(f, "value"),
        }
    }
}

/// A mutation that cannot be applied to the current model.
///
/// Out-of-range removals are not errors (they are no-ops); everything here
/// is a change the model would have to corrupt itself to accept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuilderError {
    #[error("indicator index {index} out of range (set has {len})")]
    IndicatorIndexOutOfRange { index: usize, len: usize },
    #[error("{list} condition index {index} out of range (list has {len})")]
    ConditionIndexOutOfRange {
        list: ListKind,
        index: usize,
        len: usize,
    },
    #[error("{kind} has no parameter named '{name}'")]
    UnknownParameter { kind: IndicatorKind, name: String },
    #[error("'{id}' is not a selectable {selector} option")]
    UnknownSelection { selector: Selector, id: String },
    #[error("first {list} condition cannot carry a connective")]
    ConnectiveOnFirstRow { list: ListKind },
    #[error("Unknown indicator kind: {0}")]
    UnknownIndicatorKind(String),
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    #[error("Unknown connective: {0}")]
    UnknownConnective(String),
}
