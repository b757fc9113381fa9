//! Error type for the driver engine (§7): a call site only ever needs to
//! distinguish a runtime protocol violation from a sandbox-side failure,
//! so this is a thin enum over the two taxonomy members `ta_diagnostic`
//! already defines rather than a new hierarchy.

use ta_diagnostic::{AlgorithmRuntimeError, InterfaceError};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Interface(#[from] InterfaceError),
    #[error(transparent)]
    Runtime(#[from] AlgorithmRuntimeError),
}
