//! The sparse state-vector engine (C2): the subsystem with the largest
//! share of this crate. Owns the [`SparseState`](sparse_state::SparseState),
//! the measurement result cache, and the injected RNG.

mod collision_map;
mod sparse_state;

use std::collections::HashMap;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::gates::{self, GateName};
use crate::ir::{Instruction, QubitRef};
use crate::noise::NoiseModel;
use crate::types::QubitHandle;

use sparse_state::SparseState;

/// Below this squared-magnitude floor an entry is dropped outright,
/// regardless of memory pressure (§4.2).
const BASE_PRUNE_THRESHOLD: f64 = 1e-15;

/// Prune more aggressively once the active entry count exceeds this many
/// entries.
const MEMORY_BUDGET: usize = 5000;

/// The running simulator for one scope: a sparse state plus the bookkeeping
/// (position map, measurement cache, RNG, noise profile) `Run` needs.
pub struct Simulator {
    state: SparseState,
    positions: HashMap<QubitHandle, usize>,
    results: HashMap<QubitHandle, bool>,
    noise: NoiseModel,
    rng: StdRng,
    epsilon_override: Option<f64>,
}

impl Simulator {
    /// `Initialize(qubit_order, noise?)`. The position map is fixed for the
    /// simulator's lifetime.
    pub fn new(qubit_order: &[QubitHandle], noise: NoiseModel) -> Self {
        Self::with_rng(qubit_order, noise, StdRng::from_entropy())
    }

    /// Same as [`Simulator::new`] but with a caller-supplied seed, for
    /// deterministic replay in tests (§8 "Determinism under fixed RNG").
    pub fn with_seed(qubit_order: &[QubitHandle], noise: NoiseModel, seed: [u8; 32]) -> Self {
        Self::with_rng(qubit_order, noise, StdRng::from_seed(seed))
    }

    fn with_rng(qubit_order: &[QubitHandle], noise: NoiseModel, rng: StdRng) -> Self {
        let positions = qubit_order
            .iter()
            .enumerate()
            .map(|(i, h)| (*h, i))
            .collect();
        Simulator {
            state: SparseState::zero(),
            positions,
            results: HashMap::new(),
            noise,
            rng,
            epsilon_override: None,
        }
    }

    /// Overrides the `IsZero` epsilon, bypassing the `100 x` default
    /// derived from the current prune threshold.
    pub fn with_epsilon_override(mut self, epsilon: f64) -> Self {
        self.epsilon_override = Some(epsilon);
        self
    }

    fn bit(&self, handle: QubitHandle) -> usize {
        self.positions[&handle]
    }

    fn current_prune_threshold(&self) -> f64 {
        let over_budget = (self.state.active_count() as f64 / MEMORY_BUDGET as f64).max(1.0);
        BASE_PRUNE_THRESHOLD * over_budget
    }

    fn effective_epsilon(&self) -> f64 {
        self.epsilon_override
            .unwrap_or_else(|| 100.0 * self.current_prune_threshold())
    }

    fn prune(&mut self) {
        let threshold = self.current_prune_threshold();
        self.state.prune(threshold);
        log::trace!(
            "pruned to {} active entries at threshold {:e}",
            self.state.active_count(),
            threshold
        );
    }

    /// `IsZero(qubit)`.
    pub fn is_zero(&self, qubit: QubitHandle) -> bool {
        self.state.probability_of_bit(self.bit(qubit)) < self.effective_epsilon()
    }

    /// `GetResult(qubit)` — `None` is the "no measurement yet" sentinel.
    pub fn get_result(&self, qubit: QubitHandle) -> Option<bool> {
        self.results.get(&qubit).copied()
    }

    /// Total squared-magnitude of the active state, for the normalization
    /// invariant in tests.
    pub fn norm_squared(&self) -> f64 {
        self.state.norm_squared()
    }

    /// Debug/testing-only dense materialization (Non-goals, §1).
    pub fn to_dense(&self, num_qubits: usize) -> ndarray::Array1<Complex64> {
        self.state.to_dense(num_qubits)
    }

    /// `Run(instruction_list)`.
    pub fn run(&mut self, instructions: &[Instruction]) -> Result<()> {
        for instruction in instructions {
            self.run_one(instruction)?;
        }
        Ok(())
    }

    fn run_one(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction.gate {
            GateName::If => {
                let cond = instruction.condition.as_ref().expect("IF carries a condition");
                if self.results.get(&cond.qubit).copied() == Some(cond.expected) {
                    let body = instruction.body.as_ref().expect("IF carries a body");
                    self.run(body)?;
                }
                Ok(())
            }
            GateName::While => {
                let cond = instruction.condition.as_ref().expect("WHILE carries a condition");
                let body = instruction.body.as_ref().expect("WHILE carries a body");
                while self.results.get(&cond.qubit).copied() == Some(cond.expected) {
                    self.run(body)?;
                }
                Ok(())
            }
            GateName::Measure => {
                let q = instruction.qubit_ref.single().expect("MEASURE carries one qubit");
                self.measure(q);
                Ok(())
            }
            GateName::Reset => {
                let q = instruction.qubit_ref.single().expect("RESET carries one qubit");
                self.reset(q);
                Ok(())
            }
            _ => self.apply_gate(instruction),
        }
    }

    fn apply_gate(&mut self, instruction: &Instruction) -> Result<()> {
        let targets = instruction.qubit_ref.qubits();
        match instruction.qubit_ref {
            QubitRef::One(q) => {
                let matrix = gates::matrix_for(&instruction.gate, &instruction.params)
                    .ok_or_else(|| Error::CompileError(format!("{:?} has no matrix", instruction.gate)))?;
                let bit = self.bit(q);
                if matches!(instruction.gate, GateName::Z) {
                    self.state.flip_sign_where_bit_set(bit);
                } else {
                    self.state.apply_1q(bit, &matrix);
                }
            }
            QubitRef::Two(a, b) => {
                let bit_a = self.bit(a);
                let bit_b = self.bit(b);
                match instruction.gate {
                    GateName::Cnot => self.state.permute_cnot(bit_a, bit_b),
                    GateName::Swap => self.state.permute_swap(bit_a, bit_b),
                    GateName::Cz => self.state.conditional_sign_flip(bit_a, bit_b),
                    _ => {
                        let matrix = gates::matrix_for(&instruction.gate, &instruction.params).ok_or_else(|| {
                            Error::CompileError(format!("{:?} has no matrix", instruction.gate))
                        })?;
                        self.state.apply_2q(bit_a, bit_b, &matrix);
                    }
                }
            }
            QubitRef::Three(a, b, c) => {
                let matrix = gates::matrix_for(&instruction.gate, &instruction.params)
                    .ok_or_else(|| Error::CompileError(format!("{:?} has no matrix", instruction.gate)))?;
                self.state.apply_3q(self.bit(a), self.bit(b), self.bit(c), &matrix);
            }
            QubitRef::None => {
                return Err(Error::CompileError(format!(
                    "{:?} requires a qubit operand",
                    instruction.gate
                )))
            }
        }
        self.prune();
        if !self.noise.is_ideal() {
            for target in targets {
                self.apply_noise_channel(target);
            }
            self.prune();
        }
        Ok(())
    }

    fn apply_noise_channel(&mut self, qubit: QubitHandle) {
        let bit = self.bit(qubit);
        if self.noise.gate_error > 0.0 && self.rng.gen::<f64>() < self.noise.gate_error {
            self.state.flip_bit_all(bit);
            log::trace!("gate_error flip on {:?}", qubit);
        }
        if self.noise.t2 > 0.0 && self.rng.gen::<f64>() < self.noise.t2 {
            self.state.flip_sign_where_bit_set(bit);
            log::trace!("t2 phase kick on {:?}", qubit);
        }
        if self.noise.t1 > 0.0 {
            let p1 = self.state.probability_of_bit(bit);
            let jump_probability = self.noise.t1 * p1;
            if jump_probability > 0.0 && self.rng.gen::<f64>() < jump_probability {
                self.state.collapse(bit, true, p1);
                self.state.flip_bit_all(bit);
                log::trace!("t1 relaxation jump on {:?}", qubit);
            } else {
                self.state.scale_where_bit_set(bit, (1.0 - self.noise.t1).sqrt());
                self.state.renormalize();
            }
        }
    }

    /// `Measure(qubit)`. The physical collapse always follows the true
    /// sampled outcome so the normalization invariant holds even at
    /// `readoutError=1.0`; only the classically cached/reported bit is
    /// independently flipped by the readout channel. See `DESIGN.md` for
    /// why this departs from a literal reading of the noise order.
    pub fn measure(&mut self, qubit: QubitHandle) -> bool {
        let bit = self.bit(qubit);
        let true_p1 = self.state.probability_of_bit(bit);
        let true_result = self.rng.gen::<f64>() < true_p1;
        let p_outcome = if true_result { true_p1 } else { 1.0 - true_p1 };
        self.state.collapse(bit, true_result, p_outcome);
        self.prune();

        let reported = if self.noise.readout_error > 0.0 && self.rng.gen::<f64>() < self.noise.readout_error {
            !true_result
        } else {
            true_result
        };
        self.results.insert(qubit, reported);
        reported
    }

    /// `Collapse` with an explicit, already-known outcome and probability —
    /// used directly by tests exercising §4.2 in isolation.
    pub fn collapse(&mut self, qubit: QubitHandle, result: bool, p_outcome: f64) {
        self.state.collapse(self.bit(qubit), result, p_outcome);
        self.prune();
    }

    /// RESET: "measure; if 1 apply X; prune" with noise suppressed for the
    /// reset itself (§4.2). Uses the true physical outcome, not the
    /// readout-noisy report, since a classically noisy bit must not decide
    /// a physical correction.
    pub fn reset(&mut self, qubit: QubitHandle) {
        let bit = self.bit(qubit);
        let true_p1 = self.state.probability_of_bit(bit);
        let true_result = self.rng.gen::<f64>() < true_p1;
        let p_outcome = if true_result { true_p1 } else { 1.0 - true_p1 };
        self.state.collapse(bit, true_result, p_outcome);
        if true_result {
            self.state.flip_bit_all(bit);
        }
        self.results.insert(qubit, false);
        self.prune();
    }
}
