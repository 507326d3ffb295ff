//! Core library for sweeper.
//!
//! Finds resources left behind by test runs and deletes them. A sweep of one
//! resource type in one region runs the same pipeline for every type:
//! [`sweep::enumerate`] lists identifiers page by page, [`sweep::classify`]
//! applies the skip policy, [`sweep::adapt`] turns survivors into
//! [`sweep::Sweepable`] handles, and [`sweep::orchestrator::run`] deletes them
//! and collects a [`sweep::SweepReport`].

pub mod api;
pub mod clients;
pub mod errors;
pub mod invoke;
pub mod logging;
pub mod registry;
pub mod shutdown;
pub mod sweep;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{
    ApiError, ApiErrorKind, Candidate, FieldValue, LifecycleState, ManagedBy, Page, PageRequest,
    ResourceApi, ResourceData,
};
pub use clients::{ClientError, ClientFactory, RegionalClientCache};
pub use errors::{SweeperError, SweeperResult};
pub use invoke::{InvocationSummary, SweepRun, invoke};
pub use logging::init_logging;
pub use registry::{RegistryError, Sweeper, SweeperRegistry};
pub use shutdown::wait_for_shutdown_signal;
pub use sweep::{
    FailureRecord, FailureStage, RegionalSweeper, RunContext, SkipReason, SweepError,
    SweepOptions, SweepOutcome, SweepReport, Sweepable,
};
