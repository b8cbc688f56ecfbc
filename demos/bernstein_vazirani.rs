//! Bernstein-Vazirani against a single-bit hidden string encoded as
//! `CNOT(data, ancilla)` (hidden bit = 1).

use qscope::error::Result;
use qscope::noise::NoiseModel;
use qscope::recorder::Operations;
use qscope::scope;
use qscope::types::QubitHandle;

fn run_bernstein_vazirani(ops: &Operations, data: QubitHandle, ancilla: QubitHandle) -> Result<bool> {
    ops.x(ancilla)?;
    ops.h(ancilla)?;
    ops.h(data)?;
    ops.cnot(data, ancilla)?; // oracle for hidden string "1"
    ops.h(data)?;
    ops.m(data)
}

fn main() {
    env_logger::init();
    scope::run(2, NoiseModel::ideal(), |qs, ops| {
        let hidden_bit = run_bernstein_vazirani(ops, qs[0], qs[1])?;
        println!("bernstein-vazirani hidden bit: {}", hidden_bit as u8);
        ops.reset(qs[0])?;
        ops.reset(qs[1])?;
        Ok(())
    })
    .expect("bernstein-vazirani scope failed");
}
