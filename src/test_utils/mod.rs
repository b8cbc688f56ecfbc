use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::gates::GateName;
use crate::ir::Instruction;
use crate::types::QubitHandle;

pub fn assert_eq_complex(a: Complex64, b: Complex64) {
    let diff = (a - b).norm();
    assert!(diff <= 1e-8, "complex numbers differ: |{a} - {b}| = {diff} > 1e-8");
}

#[allow(dead_code)]
pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= 1e-8, "values differ: |{a} - {b}| > 1e-8");
}

/// Generates a random single-qubit-dominated IR over `handles`, for
/// fuzzing the optimizer/transpiler round trip against a direct run
/// (§8 "Optimizer soundness").
pub fn random_circuit(handles: &[QubitHandle], gate_count: usize, seed: u64) -> Vec<Instruction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ir = Vec::with_capacity(gate_count);
    for _ in 0..gate_count {
        let q = handles[rng.gen_range(0..handles.len())];
        let gate_idx = rng.gen_range(0..8u32);
        let instruction = match gate_idx {
            0 => Instruction::single(GateName::H, q),
            1 => Instruction::single(GateName::X, q),
            2 => Instruction::single(GateName::Y, q),
            3 => Instruction::single(GateName::Z, q),
            4 => Instruction::single(GateName::S, q),
            5 => Instruction::single(GateName::T, q),
            6 => Instruction::single_with_params(GateName::Rz, q, vec![rng.gen_range(0.0..std::f64::consts::TAU)]),
            _ => {
                if handles.len() < 2 {
                    Instruction::single(GateName::X, q)
                } else {
                    let mut other = handles[rng.gen_range(0..handles.len())];
                    while other == q {
                        other = handles[rng.gen_range(0..handles.len())];
                    }
                    Instruction::two(GateName::Cnot, q, other)
                }
            }
        };
        ir.push(instruction);
    }
    ir
}
