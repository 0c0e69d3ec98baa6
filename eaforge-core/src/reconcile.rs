//! Selection reconciler.
//!
//! Runs after every catalog change. Each row's subject and value-indicator
//! selection is kept if it still names a candidate in the new
//! `SelectorOptions`, otherwise it falls back to the first candidate. After a
//! pass no row references an id outside the candidate sets.

use std::ops::AddAssign;

use crate::catalog::SelectorOptions;
use crate::conditions::ConditionList;

/// How many selections a reconciliation pass kept and rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub kept: usize,
    pub repaired: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.repaired == 0
    }
}

impl AddAssign for ReconcileReport {
    fn add_assign(&mut self, rhs: Self) {
        self.kept += rhs.kept;
        self.repaired += rhs.repaired;
    }
}

/// Re-apply stored selections of one list against fresh candidate sets.
pub fn reconcile_list(list: &mut ConditionList, options: &SelectorOptions) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for row in list.rows_mut() {
        if options.subject_contains(&row.subject) {
            report.kept += 1;
        } else {
            row.subject = options.default_subject().to_string();
            report.repaired += 1;
        }

        let still_valid = row
            .value_ref
            .as_deref()
            .is_some_and(|id| options.value_contains(id));
        if still_valid {
            report.kept += 1;
        } else {
            let fallback = options.default_value().map(str::to_string);
            if row.value_ref != fallback {
                row.value_ref = fallback;
                report.repaired += 1;
            }
        }
    }

    report
}
