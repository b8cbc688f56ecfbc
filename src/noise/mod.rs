//! The `NoiseModel` configuration surface (§3/§6). Absence of a model
//! disables all four channels.

/// Four probabilities in `[0,1]` describing a simple stochastic noise
/// profile. Builder methods mirror the teacher crate's own
/// `QuantumCircuit::apply_*` chaining style.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseModel {
    /// Post-gate coherent X-flip probability, per affected qubit.
    pub gate_error: f64,
    /// Classical bit-flip probability applied to a reported measurement.
    pub readout_error: f64,
    /// Amplitude-damping strength toward `|0>` per gate step.
    pub t1: f64,
    /// Phase-damping strength per gate step.
    pub t2: f64,
}

impl NoiseModel {
    pub fn ideal() -> Self {
        Self::default()
    }

    pub fn with_gate_error(mut self, p: f64) -> Self {
        self.gate_error = p;
        self
    }

    pub fn with_readout_error(mut self, p: f64) -> Self {
        self.readout_error = p;
        self
    }

    pub fn with_t1(mut self, p: f64) -> Self {
        self.t1 = p;
        self
    }

    pub fn with_t2(mut self, p: f64) -> Self {
        self.t2 = p;
        self
    }

    /// `true` iff every channel is disabled — equivalent to no profile at
    /// all for the purposes of §4.2's dispatch.
    pub fn is_ideal(&self) -> bool {
        self.gate_error == 0.0 && self.readout_error == 0.0 && self.t1 == 0.0 && self.t2 == 0.0
    }
}
