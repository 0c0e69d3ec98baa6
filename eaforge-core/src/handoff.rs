//! Hand-off boundary to the conversation collaborator.
//!
//! The compiled specification leaves this crate as one opaque message. What
//! happens next (request, streaming, rendering, retries) belongs to the sink.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fingerprint::SpecHash;

/// Receiver of compiled specifications.
pub trait SpecificationSink {
    fn submit_specification(&mut self, text: &str);
}

/// Collects submitted messages in order; used by tests and embedders.
impl SpecificationSink for Vec<String> {
    fn submit_specification(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Record of one hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub spec_hash: SpecHash,
    pub byte_len: usize,
    pub submitted_at: NaiveDateTime,
}

impl Submission {
    pub fn new(text: &str, submitted_at: NaiveDateTime) -> Self {
        Self {
            spec_hash: SpecHash::of_text(text),
            byte_len: text.len(),
            submitted_at,
        }
    }
}
