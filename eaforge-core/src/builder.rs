//! Strategy builder: the single owner of one strategy under construction.
//!
//! Every mutation the presentation layer can send arrives as a
//! `BuilderEvent` (or the equivalent method) and is applied synchronously.
//! Indicator mutations re-derive the output catalog and reconcile both
//! condition lists before returning, so candidate sets read afterwards are
//! always consistent with the indicator set.

use chrono::Utc;
use tracing::{debug, info};

use crate::catalog::{derive_catalog, OutputCatalog, SelectorOptions};
use crate::compiler::{compile_specification, RiskParameters, StrategyMetadata};
use crate::conditions::{Condition, ConditionField, ConditionList, ListKind};
use crate::error::BuilderError;
use crate::handoff::{SpecificationSink, Submission};
use crate::indicator_set::{IndicatorInstance, IndicatorSet};
use crate::reconcile::{reconcile_list, ReconcileReport};
use crate::registry::IndicatorKind;

/// Discrete mutation events from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderEvent {
    IndicatorAdded(IndicatorKind),
    IndicatorRemoved(usize),
    IndicatorParameterChanged {
        index: usize,
        name: String,
        value: f64,
    },
    ConditionAdded {
        list: ListKind,
        after: Option<usize>,
    },
    ConditionRemoved {
        list: ListKind,
        index: usize,
    },
    ConditionFieldChanged {
        list: ListKind,
        index: usize,
        field: ConditionField,
    },
}

#[derive(Debug, Clone)]
pub struct StrategyBuilder {
    metadata: StrategyMetadata,
    risk: RiskParameters,
    indicators: IndicatorSet,
    entry: ConditionList,
    exit: ConditionList,
    catalog: OutputCatalog,
    options: SelectorOptions,
}

impl StrategyBuilder {
    pub fn new(metadata: StrategyMetadata, risk: RiskParameters) -> Self {
        Self {
            metadata,
            risk,
            indicators: IndicatorSet::new(),
            entry: ConditionList::new(ListKind::Entry),
            exit: ConditionList::new(ListKind::Exit),
            catalog: OutputCatalog::default(),
            options: SelectorOptions::default(),
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: BuilderEvent) -> Result<(), BuilderError> {
        match event {
            BuilderEvent::IndicatorAdded(kind) => {
                self.add_indicator(kind);
            }
            BuilderEvent::IndicatorRemoved(index) => {
                self.remove_indicator(index);
            }
            BuilderEvent::IndicatorParameterChanged { index, name, value } => {
                self.set_indicator_parameter(index, &name, value)?;
            }
            BuilderEvent::ConditionAdded { list, after } => {
                self.add_condition(list, after);
            }
            BuilderEvent::ConditionRemoved { list, index } => {
                self.remove_condition(list, index);
            }
            BuilderEvent::ConditionFieldChanged { list, index, field } => {
                self.set_condition_field(list, index, field)?;
            }
        }
        Ok(())
    }

    /// Apply events in order, stopping at the first failure.
    pub fn apply_all<I>(&mut self, events: I) -> Result<(), BuilderError>
    where
        I: IntoIterator<Item = BuilderEvent>,
    {
        events.into_iter().try_for_each(|e| self.apply(e))
    }

    // ── Indicator mutations ─────────────────────────────────────────

    /// Append an indicator with registry defaults; returns its index.
    pub fn add_indicator(&mut self, kind: IndicatorKind) -> usize {
        self.indicators.add(kind);
        let index = self.indicators.len() - 1;
        debug!(kind = %kind, index, "indicator added");
        self.refresh();
        index
    }

    /// Remove the indicator at `index`; out of range is a no-op.
    /// The catalog is re-derived either way.
    pub fn remove_indicator(&mut self, index: usize) -> Option<IndicatorInstance> {
        let removed = self.indicators.remove(index);
        match &removed {
            Some(inst) => debug!(kind = %inst.kind(), index, "indicator removed"),
            None => debug!(index, "indicator removal ignored: index out of range"),
        }
        self.refresh();
        removed
    }

    pub fn set_indicator_parameter(
        &mut self,
        index: usize,
        name: &str,
        value: f64,
    ) -> Result<(), BuilderError> {
        self.indicators.set_parameter(index, name, value)?;
        debug!(index, name, value, "indicator parameter changed");
        self.refresh();
        Ok(())
    }

    /// Re-derive the catalog and repair every condition selector against it.
    fn refresh(&mut self) -> ReconcileReport {
        self.catalog = derive_catalog(&self.indicators);
        self.options = SelectorOptions::from_catalog(&self.catalog);

        let mut report = reconcile_list(&mut self.entry, &self.options);
        report += reconcile_list(&mut self.exit, &self.options);

        debug!(
            indicators = self.indicators.len(),
            outputs = self.catalog.len(),
            kept = report.kept,
            repaired = report.repaired,
            "output catalog re-derived"
        );
        report
    }

    // ── Condition mutations ─────────────────────────────────────────

    /// Add a default row after `after` (or at the end); returns its index.
    pub fn add_condition(&mut self, list: ListKind, after: Option<usize>) -> usize {
        let (target, options) = self.split(list);
        let index = target.add(after, options);
        debug!(list = %list, index, "condition added");
        index
    }

    /// Remove a row; out of range is a no-op.
    pub fn remove_condition(&mut self, list: ListKind, index: usize) -> Option<Condition> {
        let (target, _) = self.split(list);
        let removed = target.remove(index);
        debug!(list = %list, index, removed = removed.is_some(), "condition removed");
        removed
    }

    pub fn set_condition_field(
        &mut self,
        list: ListKind,
        index: usize,
        field: ConditionField,
    ) -> Result<(), BuilderError> {
        let (target, options) = self.split(list);
        target.set_field(index, field, options)
    }

    fn split(&mut self, list: ListKind) -> (&mut ConditionList, &SelectorOptions) {
        let target = match list {
            ListKind::Entry => &mut self.entry,
            ListKind::Exit => &mut self.exit,
        };
        (target, &self.options)
    }

    // ── Metadata ────────────────────────────────────────────────────

    pub fn metadata(&self) -> &StrategyMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut StrategyMetadata {
        &mut self.metadata
    }

    pub fn risk(&self) -> &RiskParameters {
        &self.risk
    }

    pub fn risk_mut(&mut self) -> &mut RiskParameters {
        &mut self.risk
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn catalog(&self) -> &OutputCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn conditions(&self, list: ListKind) -> &ConditionList {
        match list {
            ListKind::Entry => &self.entry,
            ListKind::Exit => &self.exit,
        }
    }

    // ── Output ──────────────────────────────────────────────────────

    pub fn compile(&self) -> String {
        compile_specification(
            &self.indicators,
            &self.entry,
            &self.exit,
            &self.risk,
            &self.metadata,
        )
    }

    /// Compile, hand the text to `sink`, and end the session.
    pub fn submit<S: SpecificationSink + ?Sized>(self, sink: &mut S) -> Submission {
        let text = self.compile();
        let submission = Submission::new(&text, Utc::now().naive_utc());
        info!(
            spec_hash = %submission.spec_hash.short(),
            bytes = submission.byte_len,
            ea_name = %self.metadata.ea_name,
            "specification submitted"
        );
        sink.submit_specification(&text);
        submission
    }
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        Self::new(StrategyMetadata::default(), RiskParameters::default())
    }
}
