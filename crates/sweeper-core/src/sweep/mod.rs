//! Enumerate, filter, adapt, and delete: the sweep pipeline.

pub mod adapter;
pub mod enumerate;
mod errors;
pub mod filter;
pub mod orchestrator;
pub mod report;
pub mod runner;

pub use adapter::{SweepResource, Sweepable, adapt};
pub use enumerate::{Enumeration, collect_identifiers, effective_page_size, enumerate};
pub use errors::SweepError;
pub use filter::{Classification, classify, skip_reason};
pub use report::{FailureRecord, FailureStage, OutcomeEntry, SkipReason, SweepOutcome, SweepReport};
pub use runner::{RegionalSweeper, RunContext, SweepOptions, sweep_resources};
