//! Job-shop domain models.
//!
//! Provides the core data types for representing job-shop problems and
//! their solutions.
//!
//! | Type | Role |
//! |------|------|
//! | [`Operation`] | One processing step, bound to one machine |
//! | [`Job`] | Ordered sequence of operations |
//! | [`Machine`] | Resource that runs one operation at a time |
//! | [`ProblemInstance`] | Validated owner of all jobs and machines |
//! | [`Schedule`] | Machine order (decision variable) + decoded times |

mod instance;
mod job;
mod machine;
mod operation;
mod schedule;

pub use instance::{
    InstanceBuilder, InstanceError, JobDefinition, OperationDefinition, ProblemDefinition,
    ProblemInstance,
};
pub use job::Job;
pub use machine::Machine;
pub use operation::{Operation, OperationKey};
pub use schedule::{MachineOrder, OperationTimes, Schedule, TimeWindow};
