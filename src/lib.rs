//! # qscope
//!
//! A sparse-state quantum circuit simulator for up to 64 logical qubits,
//! built around a compile-then-simulate pipeline that normalizes
//! user-level gates to a small native basis (U3 + CNOT) with algebraic
//! simplification before execution.
//!
//! # Features
//!
//! * **Sparse state representation**: memory cost scales with the number
//!   of non-zero amplitudes rather than with `2^N`. Gate application is
//!   scatter-style, with adaptive pruning keeping the active set bounded.
//!
//! * **Compile-then-simulate pipeline**: every flush runs the current
//!   instruction buffer through an optimizer (identity elimination,
//!   rotation merging, self-inverse cancellation, commutation-aware
//!   lookback), a transpiler down to `{U3, CNOT}`, and a second optimizer
//!   pass over the decomposed output.
//!
//! * **Scoped lifetime management**: [`scope::run`] allocates qubits,
//!   hands back an [`Operations`] recorder, and enforces that every
//!   allocated qubit is back in `|0>` before it releases the scope — a
//!   qubit left non-zero is a fatal [`Error::ReleaseError`].
//!
//! * **Stochastic noise channels**: an optional [`NoiseModel`] adds
//!   post-gate bit-flip error, readout inversion, and T1/T2 relaxation.
//!
//! # Usage
//!
//! ```rust
//! use qscope::prelude::*;
//!
//! fn bell_pair() -> Result<()> {
//!     scope::run(2, NoiseModel::ideal(), |qs, ops| {
//!         ops.h(qs[0])?;
//!         ops.cnot(qs[0], qs[1])?;
//!         let r1 = ops.m(qs[0])?;
//!         let r2 = ops.m(qs[1])?;
//!         assert_eq!(r1, r2);
//!         ops.reset(qs[0])?;
//!         ops.reset(qs[1])?;
//!         Ok(())
//!     })
//! }
//! bell_pair().unwrap();
//! ```

pub mod compiler;
pub mod error;
pub mod gates;
pub mod ir;
pub mod manager;
pub mod noise;
pub mod optimizer;
pub mod recorder;
pub mod scope;
pub mod simulator;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::gates::GateName;
    pub use crate::noise::NoiseModel;
    pub use crate::recorder::Operations;
    pub use crate::scope;
    pub use crate::types::QubitHandle;
}

// Hide test_utils from public documentation; only used by unit/integration tests.
#[cfg(test)]
pub mod test_utils;
