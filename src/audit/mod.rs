//! The check contract and run-scoped state.
//!
//! - [`Check`] - The trait implemented by every audit check
//! - [`Registry`] - Shared options and inter-check data for one run
//! - [`Score`] - Outcome of a check
//! - [`Markup`] - Plain text or HTML shaping of messages

pub mod check;
pub mod markup;
pub mod registry;
pub mod score;

pub use check::{Action, Check, CheckDescriptor};
pub use markup::Markup;
pub use registry::{AuditOptions, Registry, Slot};
pub use score::Score;
