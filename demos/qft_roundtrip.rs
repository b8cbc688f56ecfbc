//! QFT followed by its inverse on a computational basis input, demonstrating
//! the round-trip property from the testable-properties section.

use std::f64::consts::PI;

use qscope::error::Result;
use qscope::noise::NoiseModel;
use qscope::recorder::Operations;
use qscope::scope;
use qscope::types::QubitHandle;

fn controlled_phase(ops: &Operations, a: QubitHandle, b: QubitHandle, theta: f64) -> Result<()> {
    ops.rzz(a, b, -theta / 2.0)?;
    ops.rz(theta / 2.0, a)?;
    ops.rz(theta / 2.0, b)?;
    Ok(())
}

fn qft(ops: &Operations, qubits: &[QubitHandle]) -> Result<()> {
    let n = qubits.len();
    for i in 0..n {
        ops.h(qubits[i])?;
        for j in (i + 1)..n {
            controlled_phase(ops, qubits[j], qubits[i], PI / (1u64 << (j - i)) as f64)?;
        }
    }
    for i in 0..n / 2 {
        ops.swap(qubits[i], qubits[n - 1 - i])?;
    }
    Ok(())
}

fn inverse_qft(ops: &Operations, qubits: &[QubitHandle]) -> Result<()> {
    let n = qubits.len();
    for i in 0..n / 2 {
        ops.swap(qubits[i], qubits[n - 1 - i])?;
    }
    for i in (0..n).rev() {
        for j in ((i + 1)..n).rev() {
            controlled_phase(ops, qubits[j], qubits[i], -(PI / (1u64 << (j - i)) as f64))?;
        }
        ops.h(qubits[i])?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    scope::run(2, NoiseModel::ideal(), |qs, ops| {
        ops.x(qs[0])?;
        qft(ops, qs)?;
        inverse_qft(ops, qs)?;
        let r0 = ops.m(qs[0])?;
        let r1 = ops.m(qs[1])?;
        println!("qft round-trip result: [{}, {}]", r0 as u8, r1 as u8);
        ops.reset(qs[0])?;
        ops.reset(qs[1])?;
        Ok(())
    })
    .expect("qft round-trip scope failed");
}
