//! The validated user-facing surface (C8): buffers operations into the IR,
//! validates handles and structural preconditions against the qubit
//! manager, and triggers a flush on measurement.
//!
//! IF/WHILE callbacks need a recorder bound to a fresh inner buffer that
//! still shares the parent's qubit manager, simulator, and flush behavior.
//! Rust has no implicit shared-mutable capture for that, so `Engine` —
//! manager + simulator + the scope's single top-level buffer — is held
//! behind `Rc<RefCell<_>>` and cloned into every nested [`Operations`]
//! instance (the same pattern the wider example pack's compiler crates use
//! for a shared, mutably-aliased context).

use std::cell::RefCell;
use std::rc::Rc;

use crate::compiler;
use crate::error::{Error, Result};
use crate::gates::GateName;
use crate::ir::{Condition, Instruction, InstructionBuffer};
use crate::manager::QubitManager;
use crate::simulator::Simulator;
use crate::types::QubitHandle;

pub(crate) struct Engine {
    pub(crate) manager: QubitManager,
    pub(crate) simulator: Simulator,
    top_buffer: Rc<RefCell<InstructionBuffer>>,
}

impl Engine {
    pub(crate) fn new(manager: QubitManager, simulator: Simulator, top_buffer: Rc<RefCell<InstructionBuffer>>) -> Self {
        Engine {
            manager,
            simulator,
            top_buffer,
        }
    }

    /// Compiles and runs whatever is currently in the scope's top-level
    /// buffer, then clears it (§4.9's flush hook, §3's "cleared immediately
    /// after each flush" invariant).
    pub(crate) fn flush(&mut self) -> Result<()> {
        let ir = {
            let mut top = self.top_buffer.borrow_mut();
            let snapshot = top.snapshot();
            top.clear();
            snapshot
        };
        if ir.is_empty() {
            return Ok(());
        }
        let compiled = compiler::compile(&ir);
        self.simulator.run(&compiled)
    }
}

/// A capability set bound to one instruction buffer (the scope's top-level
/// buffer, or a fresh one built while recording an IF/WHILE body) and a
/// shared [`Engine`].
pub struct Operations {
    engine: Rc<RefCell<Engine>>,
    buffer: Rc<RefCell<InstructionBuffer>>,
}

impl Operations {
    pub(crate) fn new(engine: Rc<RefCell<Engine>>, buffer: Rc<RefCell<InstructionBuffer>>) -> Self {
        Operations { engine, buffer }
    }

    fn validate(&self, handle: QubitHandle) -> Result<()> {
        self.engine.borrow().manager.validate(handle)
    }

    fn push(&self, instruction: Instruction) {
        self.buffer.borrow_mut().push(instruction);
    }

    fn single(&self, gate: GateName, q: QubitHandle) -> Result<()> {
        self.validate(q)?;
        self.push(Instruction::single(gate, q));
        Ok(())
    }

    fn single_with_params(&self, gate: GateName, q: QubitHandle, params: Vec<f64>) -> Result<()> {
        self.validate(q)?;
        self.push(Instruction::single_with_params(gate, q, params));
        Ok(())
    }

    pub fn h(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::H, q)
    }

    pub fn x(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::X, q)
    }

    pub fn y(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::Y, q)
    }

    pub fn z(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::Z, q)
    }

    pub fn s(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::S, q)
    }

    pub fn t(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::T, q)
    }

    pub fn rx(&self, theta: f64, q: QubitHandle) -> Result<()> {
        self.single_with_params(GateName::Rx, q, vec![theta])
    }

    pub fn ry(&self, theta: f64, q: QubitHandle) -> Result<()> {
        self.single_with_params(GateName::Ry, q, vec![theta])
    }

    pub fn rz(&self, theta: f64, q: QubitHandle) -> Result<()> {
        self.single_with_params(GateName::Rz, q, vec![theta])
    }

    pub fn u3(&self, theta: f64, phi: f64, lambda: f64, q: QubitHandle) -> Result<()> {
        self.single_with_params(GateName::U3, q, vec![theta, phi, lambda])
    }

    pub fn cnot(&self, control: QubitHandle, target: QubitHandle) -> Result<()> {
        self.validate(control)?;
        self.validate(target)?;
        if control == target {
            return Err(Error::PhysicsError(control));
        }
        self.push(Instruction::two(GateName::Cnot, control, target));
        Ok(())
    }

    pub fn cz(&self, control: QubitHandle, target: QubitHandle) -> Result<()> {
        self.validate(control)?;
        self.validate(target)?;
        if control == target {
            return Err(Error::PhysicsError(control));
        }
        self.push(Instruction::two(GateName::Cz, control, target));
        Ok(())
    }

    pub fn swap(&self, a: QubitHandle, b: QubitHandle) -> Result<()> {
        self.validate(a)?;
        self.validate(b)?;
        if a == b {
            return Err(Error::UsageError(a));
        }
        self.push(Instruction::two(GateName::Swap, a, b));
        Ok(())
    }

    pub fn rzz(&self, a: QubitHandle, b: QubitHandle, theta: f64) -> Result<()> {
        self.validate(a)?;
        self.validate(b)?;
        self.push(Instruction::two_with_params(GateName::Rzz, a, b, vec![theta]));
        Ok(())
    }

    pub fn ccx(&self, c1: QubitHandle, c2: QubitHandle, target: QubitHandle) -> Result<()> {
        self.validate(c1)?;
        self.validate(c2)?;
        self.validate(target)?;
        self.push(Instruction::three(GateName::Ccx, c1, c2, target));
        Ok(())
    }

    pub fn reset(&self, q: QubitHandle) -> Result<()> {
        self.single(GateName::Reset, q)
    }

    /// `m(q)`: appends `MEASURE` and synchronously flushes, returning the
    /// resulting classical bit. The flush always runs against the scope's
    /// top-level buffer — even when `self` is a nested recorder building an
    /// IF/WHILE body, per `DESIGN.md`.
    pub fn m(&self, q: QubitHandle) -> Result<bool> {
        self.single(GateName::Measure, q)?;
        self.engine.borrow_mut().flush()?;
        let result = self.engine.borrow().simulator.get_result(q);
        Ok(result.unwrap_or(false))
    }

    fn control_block<F>(&self, gate: GateName, q: QubitHandle, expected: bool, build_body: F) -> Result<()>
    where
        F: FnOnce(&Operations) -> Result<()>,
    {
        self.validate(q)?;
        let child_buffer = Rc::new(RefCell::new(InstructionBuffer::new()));
        let child = Operations::new(self.engine.clone(), child_buffer.clone());
        build_body(&child)?;
        let body = child_buffer.borrow().snapshot();
        let condition = Condition { qubit: q, expected };
        self.push(Instruction::control_block(gate, condition, body));
        Ok(())
    }

    /// `if(q, v, cb)`.
    pub fn if_<F>(&self, q: QubitHandle, expected: bool, build_body: F) -> Result<()>
    where
        F: FnOnce(&Operations) -> Result<()>,
    {
        self.control_block(GateName::If, q, expected, build_body)
    }

    /// `while(q, v, cb)`.
    pub fn while_<F>(&self, q: QubitHandle, expected: bool, build_body: F) -> Result<()>
    where
        F: FnOnce(&Operations) -> Result<()>,
    {
        self.control_block(GateName::While, q, expected, build_body)
    }
}
