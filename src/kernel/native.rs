//! Portable kernels. GEMM, dot products and elementwise arithmetic run on `ndarray` views of
//! the input slices (GEMM is backed by `matrixmultiply`); the norm, search, power and random
//! kernels are loops over the slices.

use std::ops::{Add, Div, Mul, Sub};

use ndarray::linalg::general_mat_mul;
use ndarray::{
    s, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, LinalgScalar, ShapeBuilder, ShapeError,
    Zip,
};
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, StandardNormal, Uniform};

use crate::{error, ArrayError, Complex, ErrorKind, Result};

use super::{BinaryOp, Distribution, Exponential, Operand};

pub fn vop<T>(op: BinaryOp, lhs: Operand<T>, rhs: Operand<T>, out: &mut [T])
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>,
{
    broadcast(lhs, rhs, out, |l, r| match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
    })
}

/// Integer arithmetic wraps around on overflow.
///
/// Panics: on division by zero.
pub fn viop(op: BinaryOp, lhs: Operand<i32>, rhs: Operand<i32>, out: &mut [i32]) {
    broadcast(lhs, rhs, out, |l: i32, r: i32| match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div => l.wrapping_div(r),
    })
}

// every slice operand must have the same length as `out`
fn broadcast<T, F>(lhs: Operand<T>, rhs: Operand<T>, out: &mut [T], apply: F)
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let out = ArrayViewMut1::from(out);

    match (lhs, rhs) {
        (Operand::Slice(l), Operand::Slice(r)) => Zip::from(out)
            .and(ArrayView1::from(l))
            .and(ArrayView1::from(r))
            .for_each(|o, l, r| *o = apply(*l, *r)),
        (Operand::Scalar(l), Operand::Slice(r)) => Zip::from(out)
            .and(ArrayView1::from(r))
            .for_each(|o, r| *o = apply(l, *r)),
        (Operand::Slice(l), Operand::Scalar(r)) => Zip::from(out)
            .and(ArrayView1::from(l))
            .for_each(|o, l| *o = apply(*l, r)),
        (Operand::Scalar(l), Operand::Scalar(r)) => {
            let mut out = out;
            out.fill(apply(l, r));
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn gemm<T: LinalgScalar>(
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    let a = ArrayView2::from_shape((m, k).strides((lda, 1)), a).map_err(layout_error)?;
    let b = ArrayView2::from_shape((k, n).strides((ldb, 1)), b).map_err(layout_error)?;
    let mut c = ArrayViewMut2::from_shape((m, n).strides((ldc, 1)), c).map_err(layout_error)?;
    general_mat_mul(alpha, &a, &b, beta, &mut c);
    Ok(())
}

fn layout_error(cause: ShapeError) -> ArrayError {
    error(
        ErrorKind::InvalidSize,
        format!("invalid row-major matrix layout: {}", cause),
    )
}

pub fn nrm2<T: Float>(n: usize, x: &[T], incx: usize) -> T {
    if incx == 0 {
        return T::zero();
    }

    scaled_norm(x.iter().step_by(incx).take(n).copied())
}

pub fn nrm2_complex<T: Float>(n: usize, x: &[Complex<T>], incx: usize) -> T {
    if incx == 0 {
        return T::zero();
    }

    let parts = x
        .iter()
        .step_by(incx)
        .take(n)
        .flat_map(|value| [value.re, value.im]);

    scaled_norm(parts)
}

// sum of squares accumulated relative to the largest magnitude seen so far, so that the
// intermediate values neither overflow nor underflow
fn scaled_norm<T: Float, I: Iterator<Item = T>>(values: I) -> T {
    let mut scale = T::zero();
    let mut ssq = T::one();

    for value in values {
        if value.is_zero() {
            continue;
        }

        let abs = value.abs();
        if scale < abs {
            ssq = T::one() + ssq * (scale / abs).powi(2);
            scale = abs;
        } else {
            ssq = ssq + (abs / scale).powi(2);
        }
    }

    scale * ssq.sqrt()
}

pub fn dot<T: LinalgScalar>(n: usize, x: &[T], incx: usize, y: &[T], incy: usize) -> T {
    if incx == 0 || incy == 0 {
        return T::zero();
    }

    let x = strided(x, incx);
    let y = strided(y, incy);
    let len = n.min(x.len()).min(y.len());
    x.slice_move(s![..len]).dot(&y.slice_move(s![..len]))
}

// every `inc`th element of `x`, starting with the first
fn strided<T>(x: &[T], inc: usize) -> ArrayView1<T> {
    ArrayView1::from(x).slice_move(s![..;inc as isize])
}

/// The index (in units of `incx`) of the first element with the greatest `magnitude`.
pub fn iamax<T, M, F>(n: usize, x: &[T], incx: usize, magnitude: F) -> Option<usize>
where
    M: PartialOrd,
    F: Fn(&T) -> M,
{
    if incx == 0 {
        return None;
    }

    let mut values = x.iter().step_by(incx).take(n).enumerate();
    let (mut max_index, first) = values.next()?;
    let mut max = magnitude(first);

    for (i, value) in values {
        let value = magnitude(value);
        if value > max {
            max = value;
            max_index = i;
        }
    }

    Some(max_index)
}

pub fn pows<T: Float>(base: &[T], exponent: T, out: &mut [T]) {
    for (o, x) in out.iter_mut().zip(base) {
        *o = x.powf(exponent);
    }
}

pub fn pow<T: Float>(base: &[T], exponents: &[T], out: &mut [T]) {
    for ((o, x), e) in out.iter_mut().zip(base).zip(exponents) {
        *o = x.powf(*e);
    }
}

pub fn exponential<T: Float>(func: Exponential, x: &[T], out: &mut [T]) {
    let apply = |x: T| match func {
        Exponential::Exp => x.exp(),
        Exponential::Exp2 => x.exp2(),
        Exponential::Expm1 => x.exp_m1(),
    };

    for (o, x) in out.iter_mut().zip(x) {
        *o = apply(*x);
    }
}

pub fn larnv<T>(dist: Distribution, iseed: &mut [i32; 4], out: &mut [T])
where
    T: Float + SampleUniform,
    StandardNormal: rand_distr::Distribution<T>,
{
    let seed = iseed
        .iter()
        .fold(0u64, |seed, word| (seed << 12) | (*word as u64 & 0xfff));

    let mut rng = StdRng::seed_from_u64(seed);

    match dist {
        Distribution::Uniform01 => {
            let uniform = Uniform::new(T::zero(), T::one());
            out.iter_mut().for_each(|o| *o = uniform.sample(&mut rng));
        }
        Distribution::UniformSigned => {
            let uniform = Uniform::new(-T::one(), T::one());
            out.iter_mut().for_each(|o| *o = uniform.sample(&mut rng));
        }
        Distribution::Normal => {
            out.iter_mut().for_each(|o| *o = StandardNormal.sample(&mut rng));
        }
    }

    for word in iseed[..3].iter_mut() {
        *word = rng.gen_range(0..4096);
    }

    iseed[3] = 2 * rng.gen_range(0..2048) + 1;
}

macro_rules! real_kernels {
    ($t:ty, $vop:ident, $gemm:ident, $nrm2:ident, $pows:ident, $pow:ident) => {
        pub fn $vop(op: BinaryOp, lhs: Operand<$t>, rhs: Operand<$t>, out: &mut [$t]) {
            vop(op, lhs, rhs, out)
        }

        #[allow(clippy::too_many_arguments)]
        pub fn $gemm(
            m: usize,
            n: usize,
            k: usize,
            alpha: $t,
            a: &[$t],
            lda: usize,
            b: &[$t],
            ldb: usize,
            beta: $t,
            c: &mut [$t],
            ldc: usize,
        ) -> Result<()> {
            gemm(m, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
        }

        pub fn $nrm2(n: usize, x: &[$t], incx: usize) -> $t {
            nrm2(n, x, incx)
        }

        pub fn $pows(base: &[$t], exponent: $t, out: &mut [$t]) {
            pows(base, exponent, out)
        }

        pub fn $pow(base: &[$t], exponents: &[$t], out: &mut [$t]) {
            pow(base, exponents, out)
        }
    };
}

real_kernels!(f32, vsop, sgemm, snrm2, vspows, vspow);
real_kernels!(f64, vdop, dgemm, dnrm2, vdpows, vdpow);
