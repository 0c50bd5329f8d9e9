//! ArrayFire kernels for `f32` and `f64`.
//!
//! ArrayFire arrays are column-major, so a row-major `m x n` buffer uploads as its own
//! transpose. Products are computed as `(AB)^T = B^T A^T`, which downloads as row-major `AB`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use arrayfire as af;

use crate::Result;

use super::{BinaryOp, Operand};

// the device queue is shared by every caller in the process
static AF_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    AF_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn dim4(len: usize) -> af::Dim4 {
    af::Dim4::new(&[len as u64, 1, 1, 1])
}

#[inline]
fn dim2(rows: usize, columns: usize) -> af::Dim4 {
    af::Dim4::new(&[rows as u64, columns as u64, 1, 1])
}

// copy the leading `columns` values of every row out of a strided row-major buffer
fn pack<T: Copy>(rows: usize, columns: usize, values: &[T], ld: usize) -> Vec<T> {
    (0..rows)
        .flat_map(|row| values[row * ld..row * ld + columns].iter().copied())
        .collect()
}

macro_rules! af_kernels {
    ($t:ty, $vop:ident, $gemm:ident, $nrm2:ident, $pows:ident, $pow:ident) => {
        pub fn $vop(op: BinaryOp, lhs: Operand<$t>, rhs: Operand<$t>, out: &mut [$t]) {
            if out.is_empty() {
                return;
            }

            let len = out.len();
            let operand = |operand: Operand<$t>| match operand {
                Operand::Slice(values) => af::Array::new(values, dim4(len)),
                Operand::Scalar(value) => af::constant(value, dim4(len)),
            };

            let _guard = lock();
            let lhs = operand(lhs);
            let rhs = operand(rhs);
            let result = match op {
                BinaryOp::Add => af::add(&lhs, &rhs, false),
                BinaryOp::Sub => af::sub(&lhs, &rhs, false),
                BinaryOp::Mul => af::mul(&lhs, &rhs, false),
                BinaryOp::Div => af::div(&lhs, &rhs, false),
            };

            result.host(out);
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
            let a = pack(m, k, a, lda);
            let b = pack(k, n, b, ldb);
            let mut product = vec![0 as $t; m * n];

            {
                let _guard = lock();
                let a_t = af::Array::new(&a, dim2(k, m));
                let b_t = af::Array::new(&b, dim2(n, k));
                let c_t = af::matmul(&b_t, &a_t, af::MatProp::NONE, af::MatProp::NONE);
                c_t.host(&mut product);
            }

            for row in 0..m {
                let c = &mut c[row * ldc..row * ldc + n];
                let product = &product[row * n..(row + 1) * n];
                for (c, p) in c.iter_mut().zip(product) {
                    *c = alpha * p + beta * *c;
                }
            }

            Ok(())
        }

        pub fn $nrm2(n: usize, x: &[$t], incx: usize) -> $t {
            if n == 0 || incx == 0 {
                return 0.;
            }

            let x: Vec<$t> = x.iter().step_by(incx).take(n).copied().collect();
            let _guard = lock();
            let x = af::Array::new(&x, dim4(x.len()));
            af::norm(&x, af::NormType::VECTOR_2, 0., 0.) as $t
        }

        pub fn $pows(base: &[$t], exponent: $t, out: &mut [$t]) {
            if out.is_empty() {
                return;
            }

            let _guard = lock();
            let base = af::Array::new(base, dim4(out.len()));
            let exponent = af::constant(exponent, dim4(out.len()));
            af::pow(&base, &exponent, false).host(out);
        }

        pub fn $pow(base: &[$t], exponents: &[$t], out: &mut [$t]) {
            if out.is_empty() {
                return;
            }

            let _guard = lock();
            let base = af::Array::new(base, dim4(out.len()));
            let exponents = af::Array::new(exponents, dim4(out.len()));
            af::pow(&base, &exponents, false).host(out);
        }
    };
}

af_kernels!(f32, vsop, sgemm, snrm2, vspows, vspow);
af_kernels!(f64, vdop, dgemm, dnrm2, vdpows, vdpow);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dgemm() {
        let a = [1., 2., 3., 4., 5., 6.];
        let b = [7., 8., 9., 10., 11., 12.];
        let mut c = [0.; 4];
        dgemm(2, 2, 3, 1., &a, 3, &b, 2, 0., &mut c, 2).unwrap();
        assert_eq!(c, [58., 64., 139., 154.]);
    }

    #[test]
    fn test_vdop() {
        let mut out = [0.; 3];
        vdop(
            BinaryOp::Add,
            Operand::Slice(&[1., 2., 3.]),
            Operand::Scalar(1.),
            &mut out,
        );
        assert_eq!(out, [2., 3., 4.]);
    }

    #[test]
    fn test_dnrm2() {
        assert!((dnrm2(2, &[3., 4.], 1) - 5.).abs() < 1e-12);
    }
}
