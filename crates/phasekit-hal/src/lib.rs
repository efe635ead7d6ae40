//! Backend interface for phasekit.
//!
//! The estimator never talks to a simulator directly. It holds a
//! `&dyn Backend`, submits a measured circuit, waits for the job and reads
//! back [`Counts`]. Anything that implements [`Backend`] can stand in, which
//! is how the tests swap in slow or failing backends.
//!
//! # Counts keys
//!
//! Each key has one character per classical bit, with classical bit 0 as
//! the **rightmost** character. `u64::from_str_radix(key, 2)` gives the
//! register value directly.
//!
//! ```ignore
//! use phasekit_adapter_sim::SimulatorBackend;
//! use phasekit_hal::Backend;
//! use phasekit_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("flip", 2, 2);
//! circuit
//!     .x(QubitId(0))?
//!     .measure(QubitId(0), ClbitId(0))?
//!     .measure(QubitId(1), ClbitId(1))?;
//!
//! let backend = SimulatorBackend::with_seed(1);
//! let job = backend.submit(&circuit, 100).await?;
//! let result = backend.wait(&job).await?;
//! assert_eq!(result.counts.get("01"), 100);
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
