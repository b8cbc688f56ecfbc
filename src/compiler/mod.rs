//! Orchestrates prune → transpile → prune (C6).

use crate::ir::Instruction;
use crate::optimizer;
use crate::transpiler;

/// `compile(ir) = optimize(transpile(optimize(ir)))`. The leading optimize
/// exploits high-level identities before decomposition; the trailing one
/// exploits adjacency created by decomposition (two U3s flanking a
/// cancelled CZ, for instance).
pub fn compile(ir: &[Instruction]) -> Vec<Instruction> {
    let pruned = optimizer::optimize(ir);
    let transpiled = transpiler::transpile(&pruned);
    optimizer::optimize(&transpiled)
}
