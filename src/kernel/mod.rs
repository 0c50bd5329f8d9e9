//! The numerical kernels behind every container operation.
//!
//! The functions here follow the shape of the BLAS, LAPACK and vForce routines they stand in
//! for: flat slices, explicit lengths, strides and leading dimensions, row-major layout, and one
//! function per element type. They trust their caller to have checked shapes already.
//!
//! With the `arrayfire` feature enabled the `f32` and `f64` elementwise, power, norm and GEMM
//! entry points run on ArrayFire; the rest always use the portable implementation.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::{Complex, Result};

#[cfg(feature = "arrayfire")]
mod af;
mod native;

#[cfg(feature = "arrayfire")]
pub use self::af::{dgemm, dnrm2, sgemm, snrm2, vdop, vdpow, vdpows, vsop, vspow, vspows};
#[cfg(not(feature = "arrayfire"))]
pub use native::{dgemm, dnrm2, sgemm, snrm2, vdop, vdpow, vdpows, vsop, vspow, vspows};

/// An elementwise arithmetic operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// One side of an elementwise operation: either a whole slice or a scalar broadcast to the
/// length of the output.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a, T> {
    Slice(&'a [T]),
    Scalar(T),
}

/// An exponential function applied elementwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Exponential {
    /// `e^x`
    Exp,
    /// `2^x`
    Exp2,
    /// `e^x - 1`
    Expm1,
}

/// The distribution sampled by a random fill.
///
/// The discriminants match the `idist` codes of LAPACK's `?larnv`, so a code can be converted
/// with [`num_traits::FromPrimitive`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum Distribution {
    /// Uniform on `[0, 1)`.
    Uniform01 = 1,
    /// Uniform on `[-1, 1)`.
    UniformSigned = 2,
    /// Standard normal, mean 0 and variance 1.
    Normal = 3,
}

/// Elementwise operation on `i32` values. Results outside the range of `i32` wrap around.
///
/// Panics: on division by zero.
pub fn viop(op: BinaryOp, lhs: Operand<i32>, rhs: Operand<i32>, out: &mut [i32]) {
    native::viop(op, lhs, rhs, out)
}

pub fn vcop(
    op: BinaryOp,
    lhs: Operand<Complex<f32>>,
    rhs: Operand<Complex<f32>>,
    out: &mut [Complex<f32>],
) {
    native::vop(op, lhs, rhs, out)
}

pub fn vzop(
    op: BinaryOp,
    lhs: Operand<Complex<f64>>,
    rhs: Operand<Complex<f64>>,
    out: &mut [Complex<f64>],
) {
    native::vop(op, lhs, rhs, out)
}

/// Single-precision complex `C ← αAB + βC` in row-major layout.
#[allow(clippy::too_many_arguments)]
pub fn cgemm(
    m: usize,
    n: usize,
    k: usize,
    alpha: Complex<f32>,
    a: &[Complex<f32>],
    lda: usize,
    b: &[Complex<f32>],
    ldb: usize,
    beta: Complex<f32>,
    c: &mut [Complex<f32>],
    ldc: usize,
) -> Result<()> {
    native::gemm(m, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
}

/// Double-precision complex `C ← αAB + βC` in row-major layout.
#[allow(clippy::too_many_arguments)]
pub fn zgemm(
    m: usize,
    n: usize,
    k: usize,
    alpha: Complex<f64>,
    a: &[Complex<f64>],
    lda: usize,
    b: &[Complex<f64>],
    ldb: usize,
    beta: Complex<f64>,
    c: &mut [Complex<f64>],
    ldc: usize,
) -> Result<()> {
    native::gemm(m, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
}

pub fn scnrm2(n: usize, x: &[Complex<f32>], incx: usize) -> f32 {
    native::nrm2_complex(n, x, incx)
}

pub fn dznrm2(n: usize, x: &[Complex<f64>], incx: usize) -> f64 {
    native::nrm2_complex(n, x, incx)
}

pub fn sdot(n: usize, x: &[f32], incx: usize, y: &[f32], incy: usize) -> f32 {
    native::dot(n, x, incx, y, incy)
}

pub fn ddot(n: usize, x: &[f64], incx: usize, y: &[f64], incy: usize) -> f64 {
    native::dot(n, x, incx, y, incy)
}

pub fn iiamax(n: usize, x: &[i32], incx: usize) -> Option<usize> {
    native::iamax(n, x, incx, |x: &i32| x.unsigned_abs())
}

pub fn isamax(n: usize, x: &[f32], incx: usize) -> Option<usize> {
    native::iamax(n, x, incx, |x: &f32| x.abs())
}

pub fn idamax(n: usize, x: &[f64], incx: usize) -> Option<usize> {
    native::iamax(n, x, incx, |x: &f64| x.abs())
}

/// Complex magnitudes are compared as `|re| + |im|`.
pub fn icamax(n: usize, x: &[Complex<f32>], incx: usize) -> Option<usize> {
    native::iamax(n, x, incx, |x: &Complex<f32>| x.l1_norm())
}

/// Complex magnitudes are compared as `|re| + |im|`.
pub fn izamax(n: usize, x: &[Complex<f64>], incx: usize) -> Option<usize> {
    native::iamax(n, x, incx, |x: &Complex<f64>| x.l1_norm())
}

pub fn vsexp(func: Exponential, x: &[f32], out: &mut [f32]) {
    native::exponential(func, x, out)
}

pub fn vdexp(func: Exponential, x: &[f64], out: &mut [f64]) {
    native::exponential(func, x, out)
}

/// Fill `out` with random `f32` values from `dist`, advancing `iseed`.
///
/// Every seed word must be in `[0, 4096)` and `iseed[3]` must be odd.
pub fn slarnv(dist: Distribution, iseed: &mut [i32; 4], out: &mut [f32]) {
    debug_assert!(iseed[3] % 2 == 1, "the last seed word must be odd");
    native::larnv(dist, iseed, out)
}

/// Fill `out` with random `f64` values from `dist`, advancing `iseed`.
///
/// Every seed word must be in `[0, 4096)` and `iseed[3]` must be odd.
pub fn dlarnv(dist: Distribution, iseed: &mut [i32; 4], out: &mut [f64]) {
    debug_assert!(iseed[3] % 2 == 1, "the last seed word must be odd");
    native::larnv(dist, iseed, out)
}

#[cfg(test)]
mod tests {
    use num_traits::FromPrimitive;

    use super::*;

    #[test]
    fn test_distribution_codes() {
        assert_eq!(Distribution::from_i32(1), Some(Distribution::Uniform01));
        assert_eq!(Distribution::from_i32(2), Some(Distribution::UniformSigned));
        assert_eq!(Distribution::from_i32(3), Some(Distribution::Normal));
        assert_eq!(Distribution::from_i32(4), None);
    }

    #[test]
    fn test_izamax() {
        let x = [
            Complex::new(1., 1.),
            Complex::new(-3., 0.),
            Complex::new(2., -1.),
        ];
        assert_eq!(izamax(3, &x, 1), Some(1));
    }

    #[test]
    fn test_iiamax() {
        assert_eq!(iiamax(4, &[1, -7, 7, 2], 1), Some(1));
    }

    #[test]
    fn test_ddot() {
        assert_eq!(ddot(3, &[1., 2., 3.], 1, &[4., 5., 6.], 1), 32.);
    }
}
