//! Indicator set: ordered collection of indicator instances.
//!
//! Identity is positional and never stored: the n-th instance of kind K is
//! `K_n`, counting only instances of the same kind in collection order.
//! Labels are recomputed from the vector on every call, so removing an
//! earlier RSI renumbers every later RSI and leaves other kinds untouched.

use std::collections::HashMap;

use crate::error::BuilderError;
use crate::params::IndicatorParams;
use crate::registry::IndicatorKind;

/// One configured indicator: its kind is carried by the parameter variant.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorInstance {
    params: IndicatorParams,
}

impl IndicatorInstance {
    /// New instance with registry defaults.
    pub fn new(kind: IndicatorKind) -> Self {
        Self {
            params: IndicatorParams::defaults(kind),
        }
    }

    pub fn kind(&self) -> IndicatorKind {
        self.params.kind()
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }
}

/// Format a positional label: `RSI_1`, `BollingerBands_2`.
pub fn instance_label(kind: IndicatorKind, ordinal: usize) -> String {
    format!("{}_{}", kind.code(), ordinal)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    instances: Vec<IndicatorInstance>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new instance with registry defaults.
    pub fn add(&mut self, kind: IndicatorKind) {
        self.instances.push(IndicatorInstance::new(kind));
    }

    /// Remove the instance at `index`. Out of range is a no-op returning `None`.
    pub fn remove(&mut self, index: usize) -> Option<IndicatorInstance> {
        if index < self.instances.len() {
            Some(self.instances.remove(index))
        } else {
            None
        }
    }

    /// Change one parameter of the instance at `index`.
    pub fn set_parameter(
        &mut self,
        index: usize,
        name: &str,
        value: f64,
    ) -> Result<(), BuilderError> {
        let len = self.instances.len();
        let instance = self
            .instances
            .get_mut(index)
            .ok_or(BuilderError::IndicatorIndexOutOfRange { index, len })?;
        instance.params.set(name, value)
    }

    /// 1-based ordinal of each instance among instances of its own kind.
    pub fn ordinals(&self) -> Vec<usize> {
        let mut seen: HashMap<IndicatorKind, usize> = HashMap::new();
        self.instances
            .iter()
            .map(|inst| {
                let n = seen.entry(inst.kind()).or_insert(0);
                *n += 1;
                *n
            })
            .collect()
    }

    /// Positional label of the instance at `index`, e.g. `MACD_2`.
    pub fn label_of(&self, index: usize) -> Option<String> {
        let kind = self.instances.get(index)?.kind();
        let ordinal = self.instances[..=index]
            .iter()
            .filter(|inst| inst.kind() == kind)
            .count();
        Some(instance_label(kind, ordinal))
    }

    /// Labels for every instance, in collection order.
    pub fn labels(&self) -> Vec<String> {
        self.instances
            .iter()
            .zip(self.ordinals())
            .map(|(inst, n)| instance_label(inst.kind(), n))
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&IndicatorInstance> {
        self.instances.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
