//! Seisrelay Convert - Bulletin Classification & Record Conversion
//!
//! Maps incoming bulletin file names onto a fixed set of content categories
//! and turns bulletin bytes into the JSON payload delivered to the sink.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Classifier │────▶│  Converter   │────▶│   Envelope   │
//! │ (name →    │     │ (bytes →     │     │ (record +    │
//! │  category) │     │  record)     │     │  timestamp)  │
//! └────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The converter itself is a collaborator behind the [`RecordConverter`]
//! trait; the relay pipeline never depends on its internals. A built-in
//! implementation for JMA bulletin headers ships as [`JmaBulletinConverter`].

pub mod classify;
pub mod converter;
pub mod envelope;
pub mod error;
pub mod jma;

// Re-exports for convenience
pub use classify::{classify, Classification};
pub use converter::RecordConverter;
pub use envelope::{seal, Timestamp, CONVERT_TIME_FORMAT};
pub use error::{ConvertError, Result};
pub use jma::JmaBulletinConverter;
