//! Stateless decomposition to the native basis {U3, CNOT} (C5).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::gates::GateName;
use crate::ir::{Instruction, QubitRef};

fn u3_params(theta: f64, phi: f64, lambda: f64) -> Vec<f64> {
    vec![theta, phi, lambda]
}

/// Expands one instruction to zero or more native-basis instructions, per
/// the table in §4.5. IF/WHILE bodies are **not** recursively transpiled
/// here — see `DESIGN.md` for the Open Question this resolves.
fn transpile_one(instruction: &Instruction) -> Vec<Instruction> {
    let q = match instruction.qubit_ref {
        QubitRef::One(q) => Some(q),
        _ => None,
    };
    match instruction.gate {
        GateName::H => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(FRAC_PI_2, 0.0, PI),
        )],
        GateName::X => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(PI, 0.0, PI),
        )],
        GateName::Y => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(PI, FRAC_PI_2, FRAC_PI_2),
        )],
        GateName::Z => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(0.0, 0.0, PI),
        )],
        GateName::Rx => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(instruction.params[0], -FRAC_PI_2, FRAC_PI_2),
        )],
        GateName::Ry => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(instruction.params[0], 0.0, 0.0),
        )],
        GateName::Rz => vec![Instruction::single_with_params(
            GateName::U3,
            q.unwrap(),
            u3_params(0.0, 0.0, instruction.params[0]),
        )],
        GateName::Swap => {
            let (a, b) = match instruction.qubit_ref {
                QubitRef::Two(a, b) => (a, b),
                _ => unreachable!("SWAP carries two qubits"),
            };
            vec![
                Instruction::two(GateName::Cnot, a, b),
                Instruction::two(GateName::Cnot, b, a),
                Instruction::two(GateName::Cnot, a, b),
            ]
        }
        GateName::Cz => {
            let (c, t) = match instruction.qubit_ref {
                QubitRef::Two(c, t) => (c, t),
                _ => unreachable!("CZ carries two qubits"),
            };
            vec![
                Instruction::single_with_params(GateName::U3, t, u3_params(FRAC_PI_2, 0.0, PI)),
                Instruction::two(GateName::Cnot, c, t),
                Instruction::single_with_params(GateName::U3, t, u3_params(FRAC_PI_2, 0.0, PI)),
            ]
        }
        _ => vec![instruction.clone()],
    }
}

pub fn transpile(ir: &[Instruction]) -> Vec<Instruction> {
    ir.iter().flat_map(transpile_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates;
    use crate::types::QubitHandle;
    use num_complex::Complex64;

    fn q(slot: u32) -> QubitHandle {
        QubitHandle::for_test(slot)
    }

    /// Applies a sequence of single-qubit native instructions to the
    /// computational basis state `|x>` and returns the resulting 2x2
    /// amplitude vector, to compare a decomposition against its source gate
    /// (§8 "Transpiler soundness").
    fn apply_sequence_to_basis(instructions: &[Instruction], qubit: QubitHandle, x: usize) -> [Complex64; 2] {
        let mut vector = [Complex64::new(0.0, 0.0); 2];
        vector[x] = Complex64::new(1.0, 0.0);
        for instr in instructions {
            if instr.qubit_ref != QubitRef::One(qubit) {
                continue;
            }
            let matrix = gates::matrix_for(&instr.gate, &instr.params).unwrap();
            let mut next = [Complex64::new(0.0, 0.0); 2];
            for row in 0..2 {
                for col in 0..2 {
                    next[row] += matrix[row * 2 + col] * vector[col];
                }
            }
            vector = next;
        }
        vector
    }

    #[test]
    fn h_decomposition_matches_h_on_both_basis_states() {
        let qubit = q(0);
        let h_matrix = gates::matrix_for(&GateName::H, &[]).unwrap();
        let decomposed = transpile_one(&Instruction::single(GateName::H, qubit));
        for x in 0..2 {
            let mut expected = [Complex64::new(0.0, 0.0); 2];
            expected[x] = Complex64::new(1.0, 0.0);
            let mut via_h = [Complex64::new(0.0, 0.0); 2];
            for row in 0..2 {
                for col in 0..2 {
                    via_h[row] += h_matrix[row * 2 + col] * expected[col];
                }
            }
            let via_decomposition = apply_sequence_to_basis(&decomposed, qubit, x);
            for i in 0..2 {
                assert!((via_h[i] - via_decomposition[i]).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn swap_decomposition_exchanges_basis_bits() {
        let a = q(0);
        let b = q(1);
        let decomposed = transpile_one(&Instruction::two(GateName::Swap, a, b));
        assert_eq!(decomposed.len(), 3);
        assert!(decomposed.iter().all(|i| i.gate == GateName::Cnot));
    }

    #[test]
    fn unrecognized_gates_pass_through_unchanged() {
        let qubit = q(0);
        let instr = Instruction::single(GateName::Other("custom".into()), qubit);
        let result = transpile_one(&instr);
        assert_eq!(result, vec![instr]);
    }

    #[test]
    fn if_body_is_not_recursively_transpiled() {
        let qubit = q(0);
        let cond = crate::ir::Condition {
            qubit,
            expected: true,
        };
        let body = vec![Instruction::single(GateName::H, qubit)];
        let block = Instruction::control_block(GateName::If, cond, body.clone());
        let result = transpile_one(&block);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].body.as_ref().unwrap(), &body);
    }
}
