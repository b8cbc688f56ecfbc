//! Shared client-side algorithm helpers used by the integration tests.
//! These are ordinary consumers of [`qscope::recorder::Operations`] — they
//! hold no state of their own and live outside `src/` because the
//! algorithm library itself is out of scope for the core crate.

use std::f64::consts::PI;

use qscope::error::Result;
use qscope::recorder::Operations;
use qscope::types::QubitHandle;

/// `CPhase(theta)` on `(a, b)`, built from `RZZ` and two `RZ`s (the native
/// basis has no dedicated controlled-phase gate). Differs from the textbook
/// matrix only by a global phase, which is unobservable.
pub fn controlled_phase(ops: &Operations, a: QubitHandle, b: QubitHandle, theta: f64) -> Result<()> {
    ops.rzz(a, b, -theta / 2.0)?;
    ops.rz(theta / 2.0, a)?;
    ops.rz(theta / 2.0, b)?;
    Ok(())
}

pub fn qft(ops: &Operations, qubits: &[QubitHandle]) -> Result<()> {
    let n = qubits.len();
    for i in 0..n {
        ops.h(qubits[i])?;
        for j in (i + 1)..n {
            let angle = PI / (1u64 << (j - i)) as f64;
            controlled_phase(ops, qubits[j], qubits[i], angle)?;
        }
    }
    for i in 0..n / 2 {
        ops.swap(qubits[i], qubits[n - 1 - i])?;
    }
    Ok(())
}

pub fn inverse_qft(ops: &Operations, qubits: &[QubitHandle]) -> Result<()> {
    let n = qubits.len();
    for i in 0..n / 2 {
        ops.swap(qubits[i], qubits[n - 1 - i])?;
    }
    for i in (0..n).rev() {
        for j in ((i + 1)..n).rev() {
            let angle = PI / (1u64 << (j - i)) as f64;
            controlled_phase(ops, qubits[j], qubits[i], -angle)?;
        }
        ops.h(qubits[i])?;
    }
    Ok(())
}

/// Two-qubit Grover with a caller-supplied phase oracle and a single
/// iteration (optimal for `N = 4`).
pub fn run_grover(ops: &Operations, qubits: [QubitHandle; 2], oracle: impl Fn(&Operations) -> Result<()>) -> Result<()> {
    let [a, b] = qubits;
    ops.h(a)?;
    ops.h(b)?;
    oracle(ops)?;
    ops.h(a)?;
    ops.h(b)?;
    ops.x(a)?;
    ops.x(b)?;
    ops.cz(a, b)?;
    ops.x(a)?;
    ops.x(b)?;
    ops.h(a)?;
    ops.h(b)?;
    Ok(())
}

pub fn run_bernstein_vazirani(
    ops: &Operations,
    data: &[QubitHandle],
    ancilla: QubitHandle,
    oracle: impl Fn(&Operations) -> Result<()>,
) -> Result<Vec<bool>> {
    ops.x(ancilla)?;
    ops.h(ancilla)?;
    for &q in data {
        ops.h(q)?;
    }
    oracle(ops)?;
    for &q in data {
        ops.h(q)?;
    }
    data.iter().map(|&q| ops.m(q)).collect()
}

/// Returns `"constant"` or `"balanced"`. `oracle` must act on `data` and
/// `ancilla` only.
pub fn run_deutsch_jozsa(
    ops: &Operations,
    data: &[QubitHandle],
    ancilla: QubitHandle,
    oracle: impl Fn(&Operations) -> Result<()>,
) -> Result<&'static str> {
    ops.x(ancilla)?;
    ops.h(ancilla)?;
    for &q in data {
        ops.h(q)?;
    }
    oracle(ops)?;
    for &q in data {
        ops.h(q)?;
    }
    let mut all_zero = true;
    for &q in data {
        if ops.m(q)? {
            all_zero = false;
        }
    }
    Ok(if all_zero { "constant" } else { "balanced" })
}
