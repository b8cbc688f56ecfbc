//! Complex 2ⁿ×2ⁿ unitaries in row-major flat form, for `n` in {1,2,3}.
//!
//! Fixed-angle gates are computed once into `lazy_static` statics (the
//! catalog is closed — there is no dynamic registration). Parameterized
//! families (`RX`, `RY`, `RZ`, `U3`, `RZZ`) are pure functions of their
//! angle parameters, matching the rest of the catalog's flat row-major
//! layout so callers never special-case the two kinds.

use lazy_static::lazy_static;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use super::GateName;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

lazy_static! {
    static ref H: Vec<Complex64> = vec![
        c(FRAC_1_SQRT_2, 0.0), c(FRAC_1_SQRT_2, 0.0),
        c(FRAC_1_SQRT_2, 0.0), c(-FRAC_1_SQRT_2, 0.0),
    ];
    static ref X: Vec<Complex64> = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)];
    static ref Y: Vec<Complex64> = vec![c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)];
    static ref Z: Vec<Complex64> = vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)];
    static ref S: Vec<Complex64> = vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)];
    static ref T: Vec<Complex64> = {
        let phase = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
        vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), phase]
    };
    static ref CNOT: Vec<Complex64> = {
        // basis order |control,target>: 00,01,10,11
        let mut m = vec![c(0.0, 0.0); 16];
        let one = c(1.0, 0.0);
        m[0 * 4 + 0] = one;
        m[1 * 4 + 1] = one;
        m[2 * 4 + 3] = one;
        m[3 * 4 + 2] = one;
        m
    };
    static ref CZ: Vec<Complex64> = {
        let mut m = vec![c(0.0, 0.0); 16];
        m[0] = c(1.0, 0.0);
        m[5] = c(1.0, 0.0);
        m[10] = c(1.0, 0.0);
        m[15] = c(-1.0, 0.0);
        m
    };
    static ref SWAP: Vec<Complex64> = {
        let mut m = vec![c(0.0, 0.0); 16];
        let one = c(1.0, 0.0);
        m[0 * 4 + 0] = one;
        m[1 * 4 + 2] = one;
        m[2 * 4 + 1] = one;
        m[3 * 4 + 3] = one;
        m
    };
    static ref CCX: Vec<Complex64> = {
        // basis order |c1,c2,target>: only the |11x> block is permuted.
        let mut m = vec![c(0.0, 0.0); 64];
        let one = c(1.0, 0.0);
        for row in 0..6 {
            m[row * 8 + row] = one;
        }
        m[6 * 8 + 7] = one;
        m[7 * 8 + 6] = one;
        m
    };
}

/// `U3(theta, phi, lambda)` — the universal single-qubit form all fixed
/// and other parameterized single-qubit gates are calibrated against (§4.1).
pub fn u3(theta: f64, phi: f64, lambda: f64) -> Vec<Complex64> {
    let (half_cos, half_sin) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    let e_il = Complex64::from_polar(1.0, lambda);
    let e_iphi = Complex64::from_polar(1.0, phi);
    let e_i_phi_l = Complex64::from_polar(1.0, phi + lambda);
    vec![
        c(half_cos, 0.0),
        -e_il * half_sin,
        e_iphi * half_sin,
        e_i_phi_l * half_cos,
    ]
}

pub fn rx(theta: f64) -> Vec<Complex64> {
    let (cos, sin) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    vec![c(cos, 0.0), c(0.0, -sin), c(0.0, -sin), c(cos, 0.0)]
}

pub fn ry(theta: f64) -> Vec<Complex64> {
    let (cos, sin) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    vec![c(cos, 0.0), c(-sin, 0.0), c(sin, 0.0), c(cos, 0.0)]
}

pub fn rz(theta: f64) -> Vec<Complex64> {
    vec![
        Complex64::from_polar(1.0, -theta / 2.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        Complex64::from_polar(1.0, theta / 2.0),
    ]
}

/// `RZZ(theta) = exp(-i theta/2 * Z⊗Z)`, diagonal in the computational basis.
pub fn rzz(theta: f64) -> Vec<Complex64> {
    let plus = Complex64::from_polar(1.0, -theta / 2.0);
    let minus = Complex64::from_polar(1.0, theta / 2.0);
    let mut m = vec![c(0.0, 0.0); 16];
    m[0] = plus;
    m[5] = minus;
    m[10] = minus;
    m[15] = plus;
    m
}

/// Returns the row-major flat unitary for a fixed or parameterized gate, or
/// `None` for meta instructions and unrecognized gate names that carry no
/// matrix of their own.
pub fn matrix_for(name: &GateName, params: &[f64]) -> Option<Vec<Complex64>> {
    match name {
        GateName::H => Some(H.clone()),
        GateName::X => Some(X.clone()),
        GateName::Y => Some(Y.clone()),
        GateName::Z => Some(Z.clone()),
        GateName::S => Some(S.clone()),
        GateName::T => Some(T.clone()),
        GateName::Rx => Some(rx(params[0])),
        GateName::Ry => Some(ry(params[0])),
        GateName::Rz => Some(rz(params[0])),
        GateName::U3 => Some(u3(params[0], params[1], params[2])),
        GateName::Cnot => Some(CNOT.clone()),
        GateName::Cz => Some(CZ.clone()),
        GateName::Swap => Some(SWAP.clone()),
        GateName::Rzz => Some(rzz(params[0])),
        GateName::Ccx => Some(CCX.clone()),
        GateName::Reset | GateName::Measure | GateName::If | GateName::While => None,
        GateName::Other(_) => None,
    }
}
