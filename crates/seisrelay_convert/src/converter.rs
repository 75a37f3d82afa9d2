//! The record conversion collaborator contract.

use crate::classify::Classification;
use crate::error::Result;

/// Converts raw bulletin bytes into a structured JSON record.
///
/// Implementations own the domain-specific parsing and validation logic;
/// the relay pipeline treats them as a black box. For [`Quake`] and
/// [`Tsunami`] bulletins the converter additionally validates the record
/// semantically and may fail with a validation error or warning, both fatal
/// for that event. Early warnings carry no validation step.
///
/// [`Quake`]: Classification::Quake
/// [`Tsunami`]: Classification::Tsunami
pub trait RecordConverter: Send + Sync {
    fn convert(&self, classification: Classification, raw: &[u8]) -> Result<serde_json::Value>;
}
