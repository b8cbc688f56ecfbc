//! The gate-level intermediate representation (C3): an append-only
//! instruction list with structured body blocks, as described in §3/§4.3.

use crate::gates::GateName;
use crate::types::QubitHandle;

/// The qubit operand(s) of an instruction. Control blocks (`IF`/`WHILE`)
/// carry no operand of their own — the qubit they inspect lives in
/// [`Condition`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum QubitRef {
    None,
    One(QubitHandle),
    Two(QubitHandle, QubitHandle),
    Three(QubitHandle, QubitHandle, QubitHandle),
}

impl QubitRef {
    pub fn single(&self) -> Option<QubitHandle> {
        match self {
            QubitRef::One(q) => Some(*q),
            _ => None,
        }
    }

    /// All qubits touched by this operand, in order.
    pub fn qubits(&self) -> Vec<QubitHandle> {
        match self {
            QubitRef::None => vec![],
            QubitRef::One(a) => vec![*a],
            QubitRef::Two(a, b) => vec![*a, *b],
            QubitRef::Three(a, b, c) => vec![*a, *b, *c],
        }
    }
}

/// The guard of an `IF`/`WHILE` block: run the body iff the cached
/// measurement result of `qubit` equals `expected`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub qubit: QubitHandle,
    pub expected: bool,
}

/// One node of the IR: `{gate, qubit_ref, params, condition?, body?, timestamp}`
/// per §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub gate: GateName,
    pub qubit_ref: QubitRef,
    pub params: Vec<f64>,
    pub condition: Option<Condition>,
    pub body: Option<Vec<Instruction>>,
    pub timestamp: u64,
}

impl Instruction {
    fn new(gate: GateName, qubit_ref: QubitRef, params: Vec<f64>) -> Self {
        Instruction {
            gate,
            qubit_ref,
            params,
            condition: None,
            body: None,
            timestamp: 0,
        }
    }

    pub fn single(gate: GateName, q: QubitHandle) -> Self {
        Self::new(gate, QubitRef::One(q), vec![])
    }

    pub fn single_with_params(gate: GateName, q: QubitHandle, params: Vec<f64>) -> Self {
        Self::new(gate, QubitRef::One(q), params)
    }

    pub fn two(gate: GateName, a: QubitHandle, b: QubitHandle) -> Self {
        Self::new(gate, QubitRef::Two(a, b), vec![])
    }

    pub fn two_with_params(gate: GateName, a: QubitHandle, b: QubitHandle, params: Vec<f64>) -> Self {
        Self::new(gate, QubitRef::Two(a, b), params)
    }

    pub fn three(gate: GateName, a: QubitHandle, b: QubitHandle, c: QubitHandle) -> Self {
        Self::new(gate, QubitRef::Three(a, b, c), vec![])
    }

    pub fn control_block(gate: GateName, condition: Condition, body: Vec<Instruction>) -> Self {
        Instruction {
            gate,
            qubit_ref: QubitRef::None,
            params: vec![],
            condition: Some(condition),
            body: Some(body),
            timestamp: 0,
        }
    }
}

/// Append-only ordered instruction list. `snapshot()` hands out an owned
/// copy so downstream compilation never observes a buffer being mutated
/// mid-read (the "defensive frozen array" of Design Notes §9 — instructions
/// are small and `Clone`, so a copy is cheaper than borrow-checker
/// gymnastics here).
#[derive(Debug, Default)]
pub struct InstructionBuffer {
    instructions: Vec<Instruction>,
    next_timestamp: u64,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut instruction: Instruction) {
        instruction.timestamp = self.next_timestamp;
        self.next_timestamp += 1;
        self.instructions.push(instruction);
    }

    pub fn snapshot(&self) -> Vec<Instruction> {
        self.instructions.clone()
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }
}
