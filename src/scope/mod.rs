//! The scope entry point (C9): allocates `N` qubits, binds a simulator,
//! invokes the user callback, and enforces cleanup on every exit path.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::ir::InstructionBuffer;
use crate::manager::QubitManager;
use crate::noise::NoiseModel;
use crate::recorder::{Engine, Operations};
use crate::simulator::Simulator;
use crate::types::QubitHandle;

/// Allocates `num_qubits` handles, runs `callback` with them and an
/// [`Operations`] recorder, then flushes once more and releases every
/// handle — even if `callback` returned `Err` or panicked. A release
/// failure always dominates: it is reported even when the callback itself
/// succeeded (§7 "any subsequent release failure dominates").
pub fn run<F>(num_qubits: usize, noise: NoiseModel, callback: F) -> Result<()>
where
    F: FnOnce(&[QubitHandle], &Operations) -> Result<()>,
{
    try_run(num_qubits, noise, callback)
}

/// Same as [`run`], but seeds the simulator's RNG deterministically instead
/// of drawing from entropy — the exposed seeding point §5 calls for so
/// tests can assert "determinism under fixed RNG" (§8).
pub fn run_with_seed<F>(num_qubits: usize, noise: NoiseModel, seed: [u8; 32], callback: F) -> Result<()>
where
    F: FnOnce(&[QubitHandle], &Operations) -> Result<()>,
{
    try_run_with_seed(num_qubits, noise, seed, callback)
}

/// Same as [`run`], but the callback may return any value `T`, which is
/// handed back alongside a successful cleanup.
pub fn try_run<F, T>(num_qubits: usize, noise: NoiseModel, callback: F) -> Result<T>
where
    F: FnOnce(&[QubitHandle], &Operations) -> Result<T>,
{
    let mut manager = QubitManager::new();
    let handles = manager.allocate_many(num_qubits);
    let simulator = Simulator::new(&handles, noise);
    run_scope(manager, handles, simulator, callback)
}

/// Same as [`try_run`], with a deterministic seed.
pub fn try_run_with_seed<F, T>(num_qubits: usize, noise: NoiseModel, seed: [u8; 32], callback: F) -> Result<T>
where
    F: FnOnce(&[QubitHandle], &Operations) -> Result<T>,
{
    let mut manager = QubitManager::new();
    let handles = manager.allocate_many(num_qubits);
    let simulator = Simulator::with_seed(&handles, noise, seed);
    run_scope(manager, handles, simulator, callback)
}

fn run_scope<F, T>(manager: QubitManager, handles: Vec<QubitHandle>, simulator: Simulator, callback: F) -> Result<T>
where
    F: FnOnce(&[QubitHandle], &Operations) -> Result<T>,
{
    let top_buffer = Rc::new(RefCell::new(InstructionBuffer::new()));
    let engine = Rc::new(RefCell::new(Engine::new(manager, simulator, top_buffer.clone())));
    let operations = Operations::new(engine.clone(), top_buffer);

    log::debug!("scope opened with {} qubits", handles.len());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(&handles, &operations)));

    let cleanup_result = cleanup(&engine, &handles);

    match outcome {
        Ok(callback_result) => {
            let callback_result = callback_result?;
            cleanup_result?;
            Ok(callback_result)
        }
        Err(panic_payload) => {
            // Cleanup already ran above; a release failure during it still
            // surfaces, but if cleanup itself succeeded the original panic
            // is resumed so the caller sees the real failure.
            cleanup_result?;
            panic::resume_unwind(panic_payload);
        }
    }
}

fn cleanup(engine: &Rc<RefCell<Engine>>, handles: &[QubitHandle]) -> Result<()> {
    engine.borrow_mut().flush()?;
    log::debug!("scope flushed, releasing {} qubits", handles.len());
    let mut guard = engine.borrow_mut();
    let Engine {
        manager, simulator, ..
    } = &mut *guard;
    for &handle in handles {
        manager.release(handle, simulator)?;
    }
    Ok(())
}
