//! Universal properties from the testable-properties section that aren't
//! already pinned down by a concrete scenario or a module-local unit test.

mod common;

use qscope::noise::NoiseModel;
use qscope::scope;

#[test]
fn determinism_under_fixed_rng_is_observable_through_the_public_api() {
    let run_once = |seed| {
        scope::try_run_with_seed(2, NoiseModel::ideal().with_readout_error(0.25), seed, |qs, ops| {
            ops.h(qs[0])?;
            ops.cnot(qs[0], qs[1])?;
            let r1 = ops.m(qs[0])?;
            let r2 = ops.m(qs[1])?;
            ops.reset(qs[0])?;
            ops.reset(qs[1])?;
            Ok((r1, r2))
        })
        .unwrap()
    };
    let seed = [5u8; 32];
    assert_eq!(run_once(seed), run_once(seed));
}

#[test]
fn qft_round_trip_holds_for_one_through_four_qubits() {
    for n in 1..=4usize {
        for x in 0..(1u32 << n) {
            scope::run(n, NoiseModel::ideal(), |qs, ops| {
                for (i, &q) in qs.iter().enumerate() {
                    if (x >> i) & 1 == 1 {
                        ops.x(q)?;
                    }
                }
                common::qft(ops, qs)?;
                common::inverse_qft(ops, qs)?;
                for (i, &q) in qs.iter().enumerate() {
                    assert_eq!(ops.m(q)?, (x >> i) & 1 == 1);
                    ops.reset(q)?;
                }
                Ok(())
            })
            .unwrap();
        }
    }
}
