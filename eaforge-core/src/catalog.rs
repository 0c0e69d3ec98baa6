//! Output catalog derivation and selector candidate sets.
//!
//! `derive_catalog` is a pure function of the indicator set: for each
//! instance in order, for each output suffix its kind declares, one
//! `OutputRef`. `SelectorOptions` turns a catalog into the candidate lists
//! condition selectors may hold:
//! - subject selectors: the two price fields, then the catalog
//! - value selectors: the catalog alone

use serde::{Deserialize, Serialize};

use crate::indicator_set::{instance_label, IndicatorSet};
use crate::registry::outputs_for;

/// One addressable indicator output (or price field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    pub id: String,
    pub label: String,
}

/// Raw price fields, always selectable as a condition subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Close,
    Open,
}

impl PriceField {
    /// Subject order: Close before Open.
    pub const ALL: [PriceField; 2] = [PriceField::Close, PriceField::Open];

    pub fn id(self) -> &'static str {
        match self {
            PriceField::Close => "Price_Close",
            PriceField::Open => "Price_Open",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceField::Close => "Price (Close)",
            PriceField::Open => "Price (Open)",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn output_ref(self) -> OutputRef {
        OutputRef {
            id: self.id().to_string(),
            label: self.label().to_string(),
        }
    }
}

/// Ordered list of every indicator output currently addressable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputCatalog {
    entries: Vec<OutputRef>,
}

impl OutputCatalog {
    pub fn entries(&self) -> &[OutputRef] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputRef> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&OutputRef> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&OutputRef> {
        self.entries.first()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expand the indicator set into its addressable outputs.
///
/// Single-output kinds yield `K_n` / `K #n`; multi-output kinds yield
/// `K_n_Suffix` / `K #n (Suffix)` per suffix, in declaration order.
pub fn derive_catalog(set: &IndicatorSet) -> OutputCatalog {
    let mut entries = Vec::new();
    for (inst, ordinal) in set.iter().zip(set.ordinals()) {
        let kind = inst.kind();
        let base_id = instance_label(kind, ordinal);
        let base_label = format!("{} #{}", kind.code(), ordinal);
        for suffix in outputs_for(kind) {
            let entry = if suffix.is_empty() {
                OutputRef {
                    id: base_id.clone(),
                    label: base_label.clone(),
                }
            } else {
                OutputRef {
                    id: format!("{base_id}_{suffix}"),
                    label: format!("{base_label} ({suffix})"),
                }
            };
            entries.push(entry);
        }
    }
    OutputCatalog { entries }
}

/// Candidate sets for the two kinds of condition selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    subject: Vec<OutputRef>,
    value: Vec<OutputRef>,
}

impl SelectorOptions {
    pub fn from_catalog(catalog: &OutputCatalog) -> Self {
        let subject = PriceField::ALL
            .into_iter()
            .map(PriceField::output_ref)
            .chain(catalog.iter().cloned())
            .collect();
        Self {
            subject,
            value: catalog.entries().to_vec(),
        }
    }

    pub fn subject(&self) -> &[OutputRef] {
        &self.subject
    }

    pub fn value(&self) -> &[OutputRef] {
        &self.value
    }

    pub fn subject_contains(&self, id: &str) -> bool {
        self.subject.iter().any(|o| o.id == id)
    }

    pub fn value_contains(&self, id: &str) -> bool {
        self.value.iter().any(|o| o.id == id)
    }

    /// First subject candidate; always a price field.
    pub fn default_subject(&self) -> &str {
        self.subject
            .first()
            .map(|o| o.id.as_str())
            .unwrap_or(PriceField::Close.id())
    }

    /// First value candidate; `None` while the catalog is empty.
    pub fn default_value(&self) -> Option<&str> {
        self.value.first().map(|o| o.id.as_str())
    }

    /// Human-readable label for any subject or value id.
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.subject
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self::from_catalog(&OutputCatalog::default())
    }
}
