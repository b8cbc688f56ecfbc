use thiserror::Error;

use crate::types::QubitHandle;

pub type Result<T> = std::result::Result<T, Error>;

/// All fatal error conditions recognized by `qscope`.
///
/// Every variant is fatal to the current [`scope`](crate::scope); the
/// library never retries or silently recovers from one of these. Most
/// variants carry the debug identity of the offending handle so the message
/// stays useful without a live simulator in hand.
#[derive(Error, Debug)]
pub enum Error {
    /// A handle was used that was never allocated in the current scope (or
    /// was allocated in a different one), or a qubit was paired with itself
    /// where two distinct qubits are required (e.g. `swap(q, q)`).
    #[error("usage error: qubit {0:?} is not a valid handle in this scope")]
    UsageError(QubitHandle),

    /// A controlled operation was given the same qubit as control and
    /// target.
    #[error("physics error: control and target are the same qubit ({0:?})")]
    PhysicsError(QubitHandle),

    /// A qubit was released at scope exit without first being driven back
    /// to `|0>`.
    #[error("release error: qubit {0:?} must be reset to |0> before release")]
    ReleaseError(QubitHandle),

    /// The instruction stream handed to the compiler or simulator was
    /// malformed (arity mismatch, or an unrecognized gate surfacing where
    /// the simulator requires a recognized one).
    #[error("compile error: {0}")]
    CompileError(String),
}
