//! Complex-scalar primitives used throughout the expansion operators.
//!
//! These mirror the five primitives of `original_source/FMM.c`
//! (`cadd`, `smul`, `cmul`, `cinv`, `clgn`) but are thin wrappers over
//! `num::Complex<f64>` rather than a hand-rolled 2-tuple, since the
//! arithmetic itself (`+`, `*`, `Complex::inv`) is exactly what `num`
//! already provides.

use num::Complex;

/// `s*a + t*b` for real scalars `s`, `t`.
#[inline]
pub fn add(s: f64, a: Complex<f64>, t: f64, b: Complex<f64>) -> Complex<f64> {
    a * s + b * t
}

/// `s*a` for a real scalar `s`.
#[inline]
pub fn smul(a: Complex<f64>, s: f64) -> Complex<f64> {
    a * s
}

/// `a*b`.
#[inline]
pub fn cmul(a: Complex<f64>, b: Complex<f64>) -> Complex<f64> {
    a * b
}

/// `1/a`. Undefined at `a = 0`; callers must ensure non-coincident
/// cell centers (guaranteed by the well-separatedness of M2L pairs).
#[inline]
pub fn cinv(a: Complex<f64>) -> Complex<f64> {
    debug_assert!(a.norm_sqr() > 0.0, "cinv undefined at zero");
    a.inv()
}

/// `log(a)`, principal branch via `atan2`. The source restricts the
/// argument to `atan(im/re)`, which is only correct for `Re(a) > 0`;
/// M2L displacement vectors between well-separated cells can have
/// `Re(a) < 0`, so this crate uses the full `atan2` branch instead
/// (see SPEC_FULL.md's `clog` note). Undefined at `a = 0`.
#[inline]
pub fn clog(a: Complex<f64>) -> Complex<f64> {
    debug_assert!(a.norm_sqr() > 0.0, "clog undefined at zero");
    Complex::new(a.norm().ln(), a.im.atan2(a.re))
}
