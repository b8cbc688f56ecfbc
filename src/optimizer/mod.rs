//! Identity elimination, rotation merging, self-inverse cancellation, and
//! commutation-aware lookback (C4).

use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::gates::GateName;
use crate::ir::{Instruction, QubitRef};
use crate::types::QubitHandle;

const ANGLE_TOLERANCE: f64 = 1e-10;

fn is_zero_angle(theta: f64) -> bool {
    let reduced = theta.rem_euclid(TAU);
    reduced < ANGLE_TOLERANCE || (TAU - reduced) < ANGLE_TOLERANCE
}

fn is_identity(instruction: &Instruction) -> bool {
    match instruction.gate {
        GateName::Rx | GateName::Ry | GateName::Rz => is_zero_angle(instruction.params[0]),
        GateName::U3 => instruction.params.iter().all(|&p| is_zero_angle(p)),
        _ => false,
    }
}

/// Which wire of a two-qubit gate a shared qubit occupies, for the
/// commutation table of §4.4.
#[derive(PartialEq)]
enum Role {
    Control,
    Target,
}

fn role_of(gate: &GateName, qubits: &[QubitHandle], qubit: QubitHandle) -> Option<Role> {
    match gate {
        GateName::Cnot | GateName::Cz => {
            if qubits[0] == qubit {
                Some(Role::Control)
            } else if qubits[1] == qubit {
                Some(Role::Target)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// True iff `single` (a single-qubit op on `qubit`) commutes through the
/// CNOT/CZ role `qubit` plays, per the table's control/target rows.
fn commutes_through(single: &GateName, role: &Role) -> bool {
    match role {
        Role::Control => single.is_diagonal_family(),
        Role::Target => single.is_x_family(),
    }
}

/// True iff two single-qubit gates sharing a wire mutually commute, per the
/// table's S/T/RZ rows (Z's row lists only CNOT/CZ control, not S/T/RZ, so
/// Z is deliberately excluded here).
fn single_qubit_gates_commute(a: &GateName, b: &GateName) -> bool {
    fn is_phase_family(g: &GateName) -> bool {
        matches!(g, GateName::S | GateName::T | GateName::Rz)
    }
    is_phase_family(a) && is_phase_family(b)
}

/// A single forward sweep building an output list while tracking, per
/// qubit, a trail of output-slot indices (`wire_map`); `None` marks a
/// nulled (cancelled/merged-away) slot.
pub fn optimize(ir: &[Instruction]) -> Vec<Instruction> {
    let mut output: Vec<Option<Instruction>> = Vec::new();
    let mut wire_map: HashMap<QubitHandle, Vec<usize>> = HashMap::new();

    for incoming in ir {
        if is_identity(incoming) {
            continue;
        }

        if let QubitRef::One(qubit) = incoming.qubit_ref {
            if let Some(slot) = find_partner(&output, &wire_map, qubit, incoming) {
                // The merge rewrites `output[slot]` in place, so the wire's
                // existing trail entry for `slot` already points at the
                // right place — rotation-merge slot preservation (§9 Open
                // Questions) falls out for free here.
                if apply_merge(&mut output, slot, incoming) {
                    continue;
                }
            }
        }

        let slot = output.len();
        output.push(Some(incoming.clone()));
        for qubit in incoming.qubit_ref.qubits() {
            wire_map.entry(qubit).or_default().push(slot);
        }
    }

    output.into_iter().flatten().filter(|i| !is_identity(i)).collect()
}

/// Walks `qubit`'s wire trail backward, skipping nulled slots, stopping at
/// the first candidate that is either a same-gate merge partner or a
/// non-commuting obstacle. Multi-qubit incoming ops never reach here (the
/// caller only calls this for single-qubit `incoming`), but multi-qubit
/// gates already on a wire are valid lookback obstacles.
fn find_partner(
    output: &[Option<Instruction>],
    wire_map: &HashMap<QubitHandle, Vec<usize>>,
    qubit: QubitHandle,
    incoming: &Instruction,
) -> Option<usize> {
    let trail = wire_map.get(&qubit)?;
    for &slot in trail.iter().rev() {
        let candidate = match &output[slot] {
            Some(c) => c,
            None => continue,
        };
        if candidate.gate == incoming.gate && candidate.qubit_ref == incoming.qubit_ref {
            return Some(slot);
        }
        let candidate_qubits = candidate.qubit_ref.qubits();
        let commutes = if candidate_qubits.len() == 1 {
            single_qubit_gates_commute(&incoming.gate, &candidate.gate)
        } else {
            match role_of(&candidate.gate, &candidate_qubits, qubit) {
                Some(role) => commutes_through(&incoming.gate, &role),
                // Every candidate on this wire shares `qubit` with
                // `incoming` by construction; the commutation table only
                // grants passage through a CNOT/CZ control or target wire,
                // so any other multi-qubit gate sharing the wire is a
                // blocker.
                None => false,
            }
        };
        if !commutes {
            return None;
        }
    }
    None
}

/// Applies the merge/cancel rule for a same-gate partner at `slot`,
/// returning `true` if the incoming op was absorbed (so the caller should
/// not also append it).
fn apply_merge(output: &mut [Option<Instruction>], slot: usize, incoming: &Instruction) -> bool {
    let partner_gate = output[slot].as_ref().unwrap().gate.clone();
    match partner_gate {
        GateName::Rx | GateName::Ry | GateName::Rz => {
            let partner_angle = output[slot].as_ref().unwrap().params[0];
            let combined = (partner_angle + incoming.params[0]).rem_euclid(TAU);
            if is_zero_angle(combined) {
                output[slot] = None;
            } else {
                output[slot].as_mut().unwrap().params[0] = combined;
            }
            true
        }
        GateName::S => {
            output[slot].as_mut().unwrap().gate = GateName::Z;
            true
        }
        GateName::T => {
            output[slot].as_mut().unwrap().gate = GateName::S;
            true
        }
        ref g if g.is_self_inverse() => {
            output[slot] = None;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(slot: u32) -> QubitHandle {
        QubitHandle::for_test(slot)
    }

    #[test]
    fn s_then_s_becomes_z() {
        let qubit = q(0);
        let ir = vec![
            Instruction::single(GateName::S, qubit),
            Instruction::single(GateName::S, qubit),
        ];
        let result = optimize(&ir);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].gate, GateName::Z);
    }

    #[test]
    fn t_then_t_becomes_s() {
        let qubit = q(0);
        let ir = vec![
            Instruction::single(GateName::T, qubit),
            Instruction::single(GateName::T, qubit),
        ];
        let result = optimize(&ir);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].gate, GateName::S);
    }

    #[test]
    fn h_then_h_cancels() {
        let qubit = q(0);
        let ir = vec![
            Instruction::single(GateName::H, qubit),
            Instruction::single(GateName::H, qubit),
        ];
        assert!(optimize(&ir).is_empty());
    }

    #[test]
    fn zero_angle_rotation_is_dropped() {
        let qubit = q(0);
        let ir = vec![Instruction::single_with_params(GateName::Rz, qubit, vec![0.0])];
        assert!(optimize(&ir).is_empty());
    }

    #[test]
    fn rz_merges_across_commuting_cnot_control() {
        let data = q(0);
        let target = q(1);
        let ir = vec![
            Instruction::single_with_params(GateName::Rz, data, vec![0.3]),
            Instruction::two(GateName::Cnot, data, target),
            Instruction::single_with_params(GateName::Rz, data, vec![0.4]),
        ];
        let result = optimize(&ir);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].gate, GateName::Rz);
        assert!((result[0].params[0] - 0.7).abs() < 1e-9);
        assert_eq!(result[1].gate, GateName::Cnot);
    }

    #[test]
    fn x_on_target_blocks_rz_lookback_through_cnot_control() {
        let data = q(0);
        let target = q(1);
        let ir = vec![
            Instruction::single_with_params(GateName::Rz, data, vec![0.3]),
            Instruction::two(GateName::Cnot, data, target),
            Instruction::single(GateName::X, data),
            Instruction::single_with_params(GateName::Rz, data, vec![0.4]),
        ];
        let result = optimize(&ir);
        // X on `data` is not diagonal-family, so it is itself a blocker for
        // the trailing RZ: no merge back to the leading RZ.
        assert_eq!(result.iter().filter(|i| i.gate == GateName::Rz).count(), 2);
    }

    mod commutation_regressions {
        use super::*;

        /// §9 Open Questions: CNOT/CZ/SWAP never *initiate* a lookback
        /// (the arity filter in step 2 only applies to single-qubit ops),
        /// so two adjacent identical CNOTs are never recognized as a
        /// cancelling pair even though CNOT is listed as self-inverse in
        /// step 3. This is the literal, intentional behavior — not a bug.
        #[test]
        fn adjacent_identical_cnots_are_not_cancelled() {
            let c = q(0);
            let t = q(1);
            let ir = vec![
                Instruction::two(GateName::Cnot, c, t),
                Instruction::two(GateName::Cnot, c, t),
            ];
            assert_eq!(optimize(&ir).len(), 2);
        }

        /// RZ commutes through S (both in the phase family), so the two RZ
        /// ops should merge across it.
        #[test]
        fn rz_merges_across_commuting_s() {
            let qubit = q(0);
            let ir = vec![
                Instruction::single_with_params(GateName::Rz, qubit, vec![0.1]),
                Instruction::single(GateName::S, qubit),
                Instruction::single_with_params(GateName::Rz, qubit, vec![0.2]),
            ];
            let result = optimize(&ir);
            assert_eq!(result.len(), 2);
            assert_eq!(result[0].gate, GateName::Rz);
            assert!((result[0].params[0] - 0.3).abs() < 1e-9);
            assert_eq!(result[1].gate, GateName::S);
        }

        /// Z's table row lists only CNOT/CZ control, not S/T/RZ, so an
        /// intervening Z must still block an RZ lookback.
        #[test]
        fn rz_lookback_is_blocked_by_z_despite_both_being_diagonal() {
            let qubit = q(0);
            let ir = vec![
                Instruction::single_with_params(GateName::Rz, qubit, vec![0.1]),
                Instruction::single(GateName::Z, qubit),
                Instruction::single_with_params(GateName::Rz, qubit, vec![0.2]),
            ];
            let result = optimize(&ir);
            assert_eq!(result.iter().filter(|i| i.gate == GateName::Rz).count(), 2);
        }

        /// The partner slot is preserved on merge (not the incoming op's
        /// position); verifies the merged angle lands at the earlier slot
        /// even with an intervening commuting gate.
        #[test]
        fn rotation_merge_preserves_partner_slot_order() {
            let data = q(0);
            let target = q(1);
            let ir = vec![
                Instruction::single_with_params(GateName::Rz, data, vec![0.1]),
                Instruction::single(GateName::Z, target),
                Instruction::single_with_params(GateName::Rz, data, vec![0.2]),
            ];
            let result = optimize(&ir);
            assert_eq!(result.len(), 2);
            assert_eq!(result[0].gate, GateName::Rz);
            assert!((result[0].params[0] - 0.3).abs() < 1e-9);
        }
    }
}
