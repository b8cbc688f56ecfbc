//! Two-qubit Grover's algorithm against a `CZ` oracle marking `|11>`.
//! A client of [`qscope::recorder::Operations`] only — no library state.

use qscope::error::Result;
use qscope::noise::NoiseModel;
use qscope::recorder::Operations;
use qscope::scope;
use qscope::types::QubitHandle;

fn run_grover(ops: &Operations, a: QubitHandle, b: QubitHandle) -> Result<()> {
    ops.h(a)?;
    ops.h(b)?;
    ops.cz(a, b)?; // oracle: phase-flip |11>
    ops.h(a)?;
    ops.h(b)?;
    ops.x(a)?;
    ops.x(b)?;
    ops.cz(a, b)?; // diffusion
    ops.x(a)?;
    ops.x(b)?;
    ops.h(a)?;
    ops.h(b)?;
    Ok(())
}

fn main() {
    env_logger::init();
    scope::run(2, NoiseModel::ideal(), |qs, ops| {
        run_grover(ops, qs[0], qs[1])?;
        let r0 = ops.m(qs[0])?;
        let r1 = ops.m(qs[1])?;
        println!("grover result: [{}, {}]", r0 as u8, r1 as u8);
        ops.reset(qs[0])?;
        ops.reset(qs[1])?;
        Ok(())
    })
    .expect("grover scope failed");
}
