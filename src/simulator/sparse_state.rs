//! The sparse basis-index → amplitude mapping itself: two parallel flat
//! buffers plus a scratch pair used as the scatter destination (§3).

use num_complex::Complex64;

use super::collision_map::CollisionMap;
use crate::types::BasisIndex;

pub(crate) struct SparseState {
    indices: Vec<BasisIndex>,
    amps: Vec<Complex64>,
    scratch_indices: Vec<BasisIndex>,
    scratch_amps: Vec<Complex64>,
    collisions: CollisionMap,
}

impl SparseState {
    /// The all-zero basis state `|0...0>`.
    pub fn zero() -> Self {
        SparseState {
            indices: vec![0],
            amps: vec![Complex64::new(1.0, 0.0)],
            scratch_indices: Vec::new(),
            scratch_amps: Vec::new(),
            collisions: CollisionMap::with_capacity(16),
        }
    }

    pub fn active_count(&self) -> usize {
        self.indices.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (BasisIndex, Complex64)> + '_ {
        self.indices.iter().copied().zip(self.amps.iter().copied())
    }

    pub fn norm_squared(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn renormalize(&mut self) {
        let norm_sq = self.norm_squared();
        if norm_sq > 0.0 {
            let scale = 1.0 / norm_sq.sqrt();
            for amp in self.amps.iter_mut() {
                *amp *= scale;
            }
        }
    }

    /// Drops every entry whose squared magnitude is below `threshold`.
    pub fn prune(&mut self, threshold: f64) {
        let mut write = 0;
        for read in 0..self.indices.len() {
            if self.amps[read].norm_sqr() >= threshold {
                self.indices[write] = self.indices[read];
                self.amps[write] = self.amps[read];
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.amps.truncate(write);
    }

    /// Total probability mass of entries with `bit` set.
    pub fn probability_of_bit(&self, bit: usize) -> f64 {
        self.entries()
            .filter(|(idx, _)| (idx >> bit) & 1 == 1)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Retains only entries whose `bit` equals `value`, rescaling by
    /// `1/sqrt(p_outcome)`. Undefined (per §4.2) if `p_outcome` is zero —
    /// callers must not collapse against an impossible outcome.
    pub fn collapse(&mut self, bit: usize, value: bool, p_outcome: f64) {
        let scale = Complex64::new(1.0 / p_outcome.sqrt(), 0.0);
        let mut write = 0;
        for read in 0..self.indices.len() {
            let idx = self.indices[read];
            if ((idx >> bit) & 1 == 1) == value {
                self.indices[write] = idx;
                self.amps[write] = self.amps[read] * scale;
                write += 1;
            }
        }
        self.indices.truncate(write);
        self.amps.truncate(write);
    }

    /// XORs `bit` into every active index (coherent bit-flip of the basis
    /// label, used by the gate-error and T1-relaxation noise channels).
    pub fn flip_bit_all(&mut self, bit: usize) {
        let mask = 1u64 << bit;
        for idx in self.indices.iter_mut() {
            *idx ^= mask;
        }
    }

    /// Negates the amplitude of every entry with `bit` set. This is both
    /// the specialized Z gate (no index change, §4.2) and the T2
    /// phase-damping kick.
    pub fn flip_sign_where_bit_set(&mut self, bit: usize) {
        let mask = 1u64 << bit;
        for (idx, amp) in self.indices.iter().zip(self.amps.iter_mut()) {
            if idx & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    /// Scales the amplitude of every entry with `bit` set by `factor`
    /// (T1 amplitude damping of the `|1>` branch).
    pub fn scale_where_bit_set(&mut self, bit: usize, factor: f64) {
        let mask = 1u64 << bit;
        for (idx, amp) in self.indices.iter().zip(self.amps.iter_mut()) {
            if idx & mask != 0 {
                *amp *= factor;
            }
        }
    }

    /// CNOT specialized as an index permutation: never collides (it is a
    /// bijection), so it mutates indices in place with no scratch pass.
    pub fn permute_cnot(&mut self, control_bit: usize, target_bit: usize) {
        let control_mask = 1u64 << control_bit;
        let target_mask = 1u64 << target_bit;
        for idx in self.indices.iter_mut() {
            if *idx & control_mask != 0 {
                *idx ^= target_mask;
            }
        }
    }

    /// SWAP specialized as an index permutation.
    pub fn permute_swap(&mut self, bit_a: usize, bit_b: usize) {
        let mask_a = 1u64 << bit_a;
        let mask_b = 1u64 << bit_b;
        for idx in self.indices.iter_mut() {
            let a = (*idx & mask_a != 0) as u64;
            let b = (*idx & mask_b != 0) as u64;
            if a != b {
                *idx ^= mask_a | mask_b;
            }
        }
    }

    /// CZ specialized as a conditional sign flip.
    pub fn conditional_sign_flip(&mut self, bit_a: usize, bit_b: usize) {
        let mask = (1u64 << bit_a) | (1u64 << bit_b);
        for (idx, amp) in self.indices.iter().zip(self.amps.iter_mut()) {
            if idx & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn begin_scatter(&mut self, max_new_entries: usize) {
        self.scratch_indices.clear();
        self.scratch_amps.clear();
        self.collisions.clear();
        self.collisions.ensure_capacity(max_new_entries);
    }

    fn scatter_add(&mut self, index: BasisIndex, amp: Complex64) {
        if amp == Complex64::new(0.0, 0.0) {
            return;
        }
        match self.collisions.get(index) {
            Some(slot) => self.scratch_amps[slot] += amp,
            None => {
                let slot = self.scratch_indices.len();
                self.collisions.insert(index, slot);
                self.scratch_indices.push(index);
                self.scratch_amps.push(amp);
            }
        }
    }

    fn end_scatter(&mut self) {
        std::mem::swap(&mut self.indices, &mut self.scratch_indices);
        std::mem::swap(&mut self.amps, &mut self.scratch_amps);
    }

    /// Generic single-qubit scatter application. `matrix` is the row-major
    /// flat 2x2 unitary.
    pub fn apply_1q(&mut self, bit: usize, matrix: &[Complex64]) {
        self.begin_scatter(self.indices.len() * 2);
        let mask = 1u64 << bit;
        for i in 0..self.indices.len() {
            let idx = self.indices[i];
            let amp = self.amps[i];
            let col = ((idx & mask) != 0) as usize;
            let idx0 = idx & !mask;
            let idx1 = idx | mask;
            self.scatter_add(idx0, matrix[0 * 2 + col] * amp);
            self.scatter_add(idx1, matrix[1 * 2 + col] * amp);
        }
        self.end_scatter();
    }

    /// Generic two-qubit scatter application. `bit_a` is the
    /// more-significant index component, matching the catalog's `(control,
    /// target)` / `(qarg1, qarg2)` row ordering.
    pub fn apply_2q(&mut self, bit_a: usize, bit_b: usize, matrix: &[Complex64]) {
        self.begin_scatter(self.indices.len() * 4);
        let mask_a = 1u64 << bit_a;
        let mask_b = 1u64 << bit_b;
        let cleared = !(mask_a | mask_b);
        for i in 0..self.indices.len() {
            let idx = self.indices[i];
            let amp = self.amps[i];
            let a = ((idx & mask_a) != 0) as usize;
            let b = ((idx & mask_b) != 0) as usize;
            let col = (a << 1) | b;
            let base = idx & cleared;
            for row in 0..4usize {
                let coeff = matrix[row * 4 + col];
                if coeff == Complex64::new(0.0, 0.0) {
                    continue;
                }
                let mut target = base;
                if row & 0b10 != 0 {
                    target |= mask_a;
                }
                if row & 0b01 != 0 {
                    target |= mask_b;
                }
                self.scatter_add(target, coeff * amp);
            }
        }
        self.end_scatter();
    }

    /// Generic three-qubit scatter application, ordered `(a, b, c)` to
    /// match the CCX catalog entry's `(control1, control2, target)` rows.
    pub fn apply_3q(&mut self, bit_a: usize, bit_b: usize, bit_c: usize, matrix: &[Complex64]) {
        self.begin_scatter(self.indices.len() * 8);
        let mask_a = 1u64 << bit_a;
        let mask_b = 1u64 << bit_b;
        let mask_c = 1u64 << bit_c;
        let cleared = !(mask_a | mask_b | mask_c);
        for i in 0..self.indices.len() {
            let idx = self.indices[i];
            let amp = self.amps[i];
            let a = ((idx & mask_a) != 0) as usize;
            let b = ((idx & mask_b) != 0) as usize;
            let cc = ((idx & mask_c) != 0) as usize;
            let col = (a << 2) | (b << 1) | cc;
            let base = idx & cleared;
            for row in 0..8usize {
                let coeff = matrix[row * 8 + col];
                if coeff == Complex64::new(0.0, 0.0) {
                    continue;
                }
                let mut target = base;
                if row & 0b100 != 0 {
                    target |= mask_a;
                }
                if row & 0b010 != 0 {
                    target |= mask_b;
                }
                if row & 0b001 != 0 {
                    target |= mask_c;
                }
                self.scatter_add(target, coeff * amp);
            }
        }
        self.end_scatter();
    }

    /// Materializes the dense `2^n` statevector. Debug/testing
    /// convenience only (Non-goals, §1) — never used on the hot path.
    pub fn to_dense(&self, num_qubits: usize) -> ndarray::Array1<Complex64> {
        let dim = 1usize << num_qubits;
        let mut dense = ndarray::Array1::from_elem(dim, Complex64::new(0.0, 0.0));
        for (idx, amp) in self.entries() {
            dense[idx as usize] = amp;
        }
        dense
    }
}
