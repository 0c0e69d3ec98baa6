//! eaforge core: the strategy specification compiler.
//!
//! A trader composes a strategy out of technical indicators and ordered
//! entry/exit conditions. This crate holds that model in memory and compiles
//! it into one textual specification for a code-generating language model:
//! - Indicator registry (supported kinds, parameters, named outputs)
//! - Indicator set with positional identity (`RSI_1`, `MACD_2`, ...)
//! - Output catalog derivation (multi-output kinds fan out per sub-output)
//! - Condition lists with connective placement rules
//! - Selection reconciler that repairs dangling selector references
//! - Deterministic specification compiler
//!
//! `StrategyBuilder` ties these together behind the mutation events a
//! presentation layer sends, and hands the compiled text to a
//! `SpecificationSink`.

pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod conditions;
pub mod draft;
pub mod error;
pub mod fingerprint;
pub mod handoff;
pub mod indicator_set;
pub mod params;
pub mod presets;
pub mod reconcile;
pub mod registry;

pub use builder::{BuilderEvent, StrategyBuilder};
pub use catalog::{derive_catalog, OutputCatalog, OutputRef, PriceField, SelectorOptions};
pub use compiler::{compile_specification, RiskParameters, StrategyMetadata};
pub use conditions::{
    Condition, ConditionField, ConditionList, Connective, ListKind, Operator, ValueKind,
};
pub use draft::{ConditionDraft, DraftError, IndicatorDraft, StrategyDraft};
pub use error::{BuilderError, Selector};
pub use fingerprint::SpecHash;
pub use handoff::{SpecificationSink, Submission};
pub use indicator_set::{IndicatorInstance, IndicatorSet};
pub use params::IndicatorParams;
pub use presets::StrategyPreset;
pub use reconcile::{reconcile_list, ReconcileReport};
pub use registry::{outputs_for, parameters_for, IndicatorKind, ParamSpec};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the model types can move to a worker thread.
    ///
    /// The presentation layer may compile on a background thread while the
    /// conversation collaborator streams; a non-Send field breaks the build here.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<IndicatorSet>();
        require_sync::<IndicatorSet>();
        require_send::<OutputCatalog>();
        require_sync::<OutputCatalog>();
        require_send::<ConditionList>();
        require_sync::<ConditionList>();
        require_send::<StrategyBuilder>();
        require_sync::<StrategyBuilder>();
        require_send::<StrategyDraft>();
        require_sync::<StrategyDraft>();
        require_send::<Submission>();
        require_sync::<Submission>();
    }
}
