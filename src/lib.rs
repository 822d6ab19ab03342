//! Renames voice clips and writes their tags from conventions encoded in
//! the filenames.
//!
//! The pipeline is `normalize -> parse -> synthesize`, driven per file by
//! [`planner::BatchPlanner`] and applied by [`executor::Executor`].

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod fs_ops;
pub mod name_parser;
pub mod normalizer;
pub mod planner;
pub mod report;
pub mod synthesizer;
pub mod tag_parser;
pub mod tag_writer;

pub use batch::{Action, Batch, Collision, OperationStatus, PlannedOperation};
pub use config::{ConfigBuilder, Mode, PlanConfig};
pub use error::{InvocationError, MutationError};
pub use executor::{spawn_execution, ExecutionEvent, Executor, Outcome, OutcomeEvent, StopSignal, Summary};
pub use planner::BatchPlanner;
pub use tag_writer::{LoftyTagWriter, TagWriter};
