//! Check scoring orchestration and dependency resolution.

pub mod auditor;
pub mod engine;
pub mod filter;

pub use auditor::Auditor;
pub use engine::{Engine, ScoringContext};
pub use filter::{Selection, SkipList};
