//! VO-SE Render Request Library
//!
//! This crate provides the declarative side of the VO-SE singing resynthesis
//! engine: what a host sends in and what it gets back.
//!
//! # Overview
//!
//! - **Notes**: a [`NoteRenderRequest`] names a source recording and carries
//!   per-frame pitch, gender, tension and breath curves.
//! - **Config**: [`EngineConfig`] fixes the operating point (44.1 kHz, 5 ms
//!   frames) and the mix policy.
//! - **Reports**: a [`RenderReport`] lists every skipped or altered note
//!   next to the output hash.
//!
//! # Example
//!
//! ```
//! use vose_spec::{NoteRenderRequest, EngineConfig};
//! use vose_spec::validation::validate_notes;
//! use vose_spec::hash::canonical_request_hash;
//!
//! let notes = vec![
//!     NoteRenderRequest::builder("a")
//!         .constant_pitch(220.0, 100)
//!         .build(),
//! ];
//!
//! assert!(validate_notes(&notes).is_ok());
//! let hash = canonical_request_hash(&notes).unwrap();
//! assert_eq!(hash.len(), 64);
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.sample_rate, 44100);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Engine configuration
//! - [`error`]: Error and warning types for validation
//! - [`hash`]: Canonical request hashing
//! - [`note`]: Note request type and builder
//! - [`report`]: Render report types and builder
//! - [`validation`]: Request validation functions

pub mod config;
pub mod error;
pub mod hash;
pub mod note;
pub mod report;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{EngineConfig, Placement, DEFAULT_FRAME_PERIOD_MS, DEFAULT_SAMPLE_RATE};
pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::canonical_request_hash;
pub use note::{NoteRenderRequest, NoteRenderRequestBuilder};
pub use report::{NoteIssue, RenderReport, RenderReportBuilder, StageTiming, REPORT_VERSION};
pub use validation::{validate_note, validate_note_timing, validate_notes};
