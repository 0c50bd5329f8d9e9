use std::fmt;

use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use serde::{Deserialize, Serialize};

use super::kernel::{self, BinaryOp, Distribution, Exponential, Operand};
use super::{Complex, Result};

/// The data type of an array element.
///
/// Data types are ordered by the width of the values they can represent, for the purpose of
/// promoting mixed-type operands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum DType {
    I32,
    F32,
    F64,
    C32,
    C64,
}

impl DType {
    /// The data type able to hold values of both `self` and `other`.
    pub fn promote(self, other: DType) -> DType {
        match (self, other) {
            (DType::F64, DType::C32) | (DType::C32, DType::F64) => DType::C64,
            (l, r) => Ord::max(l, r),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C32 | DType::C64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DType::I32 => "i32",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::C32 => "Complex<f32>",
            DType::C64 => "Complex<f64>",
        };

        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for super::Complex<f32> {}
    impl Sealed for super::Complex<f64> {}
}

/// A supported array element type.
///
/// This trait is sealed: it is implemented for `i32`, `f32`, `f64`, `Complex<f32>` and
/// `Complex<f64>` only, and each implementation calls the kernel for its own type.
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static + sealed::Sealed
{
    const DTYPE: DType;

    /// The text of this value as printed in an array description.
    fn describe(&self) -> String;

    /// Convert this value into a `Complex<f64>`, without loss for every supported type.
    fn into_complex(self) -> Complex<f64>;

    /// Convert a `Complex<f64>` into this type, discarding the imaginary part for real types
    /// and truncating toward zero for integers.
    fn from_complex(value: Complex<f64>) -> Self;

    /// Compute `out[i] = lhs[i] (op) rhs[i]`.
    fn elementwise(op: BinaryOp, lhs: Operand<Self>, rhs: Operand<Self>, out: &mut [Self]);

    /// Compute the row-major product `c = a * b` of an `m x k` and a `k x n` matrix.
    fn gemm(m: usize, n: usize, k: usize, a: &[Self], b: &[Self], c: &mut [Self]) -> Result<()>;

    /// The offset of the first value with the greatest magnitude.
    fn iamax(values: &[Self]) -> Option<usize>;
}

/// An element type with a Euclidean norm.
pub trait Norm: Element {
    /// The real type of this element's magnitude.
    type Real: Float + fmt::Debug;

    fn nrm2(values: &[Self]) -> Self::Real;
}

/// A real floating-point element type.
pub trait Floating: Norm<Real = Self> + Float + SampleUniform {
    fn dot(x: &[Self], y: &[Self]) -> Self;

    fn exponential(func: Exponential, x: &[Self], out: &mut [Self]);

    fn larnv(dist: Distribution, iseed: &mut [i32; 4], out: &mut [Self]);

    fn pow(base: &[Self], exponents: &[Self], out: &mut [Self]);

    fn pows(base: &[Self], exponent: Self, out: &mut [Self]);
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    fn describe(&self) -> String {
        self.to_string()
    }

    fn into_complex(self) -> Complex<f64> {
        Complex::new(self.into(), 0.)
    }

    fn from_complex(value: Complex<f64>) -> Self {
        value.re as i32
    }

    fn elementwise(op: BinaryOp, lhs: Operand<Self>, rhs: Operand<Self>, out: &mut [Self]) {
        kernel::viop(op, lhs, rhs, out)
    }

    fn gemm(m: usize, n: usize, k: usize, a: &[Self], b: &[Self], c: &mut [Self]) -> Result<()> {
        let a: Vec<f64> = a.iter().copied().map(f64::from).collect();
        let b: Vec<f64> = b.iter().copied().map(f64::from).collect();
        let mut product = vec![0.; m * n];

        kernel::dgemm(m, n, k, 1., &a, k, &b, n, 0., &mut product, n)?;

        // truncate toward zero, then wrap into range like the elementwise kernels
        for (c, p) in c.iter_mut().zip(product) {
            *c = p as i64 as i32;
        }

        Ok(())
    }

    fn iamax(values: &[Self]) -> Option<usize> {
        kernel::iiamax(values.len(), values, 1)
    }
}

macro_rules! real_element {
    (
        $t:ty, $dtype:expr, $precision:expr,
        $vop:path, $gemm:path, $iamax:path, $nrm2:path,
        $dot:path, $exp:path, $larnv:path, $pow:path, $pows:path
    ) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            fn describe(&self) -> String {
                format!("{:.*}", $precision, self)
            }

            fn into_complex(self) -> Complex<f64> {
                Complex::new(self.into(), 0.)
            }

            fn from_complex(value: Complex<f64>) -> Self {
                value.re as $t
            }

            fn elementwise(op: BinaryOp, lhs: Operand<Self>, rhs: Operand<Self>, out: &mut [Self]) {
                $vop(op, lhs, rhs, out)
            }

            fn gemm(
                m: usize,
                n: usize,
                k: usize,
                a: &[Self],
                b: &[Self],
                c: &mut [Self],
            ) -> Result<()> {
                $gemm(m, n, k, 1., a, k, b, n, 0., c, n)
            }

            fn iamax(values: &[Self]) -> Option<usize> {
                $iamax(values.len(), values, 1)
            }
        }

        impl Norm for $t {
            type Real = $t;

            fn nrm2(values: &[Self]) -> $t {
                $nrm2(values.len(), values, 1)
            }
        }

        impl Floating for $t {
            fn dot(x: &[Self], y: &[Self]) -> Self {
                $dot(x.len(), x, 1, y, 1)
            }

            fn exponential(func: Exponential, x: &[Self], out: &mut [Self]) {
                $exp(func, x, out)
            }

            fn larnv(dist: Distribution, iseed: &mut [i32; 4], out: &mut [Self]) {
                $larnv(dist, iseed, out)
            }

            fn pow(base: &[Self], exponents: &[Self], out: &mut [Self]) {
                $pow(base, exponents, out)
            }

            fn pows(base: &[Self], exponent: Self, out: &mut [Self]) {
                $pows(base, exponent, out)
            }
        }
    };
}

real_element!(
    f32,
    DType::F32,
    2,
    kernel::vsop,
    kernel::sgemm,
    kernel::isamax,
    kernel::snrm2,
    kernel::sdot,
    kernel::vsexp,
    kernel::slarnv,
    kernel::vspow,
    kernel::vspows
);

real_element!(
    f64,
    DType::F64,
    4,
    kernel::vdop,
    kernel::dgemm,
    kernel::idamax,
    kernel::dnrm2,
    kernel::ddot,
    kernel::vdexp,
    kernel::dlarnv,
    kernel::vdpow,
    kernel::vdpows
);

macro_rules! complex_element {
    ($t:ty, $dtype:expr, $precision:expr, $vop:path, $gemm:path, $iamax:path, $nrm2:path) => {
        impl Element for Complex<$t> {
            const DTYPE: DType = $dtype;

            fn describe(&self) -> String {
                format!("{:.*}{:+.*}i", $precision, self.re, $precision, self.im)
            }

            fn into_complex(self) -> Complex<f64> {
                Complex::new(self.re.into(), self.im.into())
            }

            fn from_complex(value: Complex<f64>) -> Self {
                Complex::new(value.re as $t, value.im as $t)
            }

            fn elementwise(op: BinaryOp, lhs: Operand<Self>, rhs: Operand<Self>, out: &mut [Self]) {
                $vop(op, lhs, rhs, out)
            }

            fn gemm(
                m: usize,
                n: usize,
                k: usize,
                a: &[Self],
                b: &[Self],
                c: &mut [Self],
            ) -> Result<()> {
                let one = Complex::new(1., 0.);
                let zero = Complex::new(0., 0.);
                $gemm(m, n, k, one, a, k, b, n, zero, c, n)
            }

            fn iamax(values: &[Self]) -> Option<usize> {
                $iamax(values.len(), values, 1)
            }
        }

        impl Norm for Complex<$t> {
            type Real = $t;

            fn nrm2(values: &[Self]) -> $t {
                $nrm2(values.len(), values, 1)
            }
        }
    };
}

complex_element!(
    f32,
    DType::C32,
    2,
    kernel::vcop,
    kernel::cgemm,
    kernel::icamax,
    kernel::scnrm2
);

complex_element!(
    f64,
    DType::C64,
    4,
    kernel::vzop,
    kernel::zgemm,
    kernel::izamax,
    kernel::dznrm2
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote() {
        assert_eq!(DType::I32.promote(DType::F32), DType::F32);
        assert_eq!(DType::F64.promote(DType::F32), DType::F64);
        assert_eq!(DType::F64.promote(DType::C32), DType::C64);
        assert_eq!(DType::C32.promote(DType::F32), DType::C32);
    }

    #[test]
    fn test_describe() {
        assert_eq!(18.2f64.describe(), "18.2000");
        assert_eq!(18.2f32.describe(), "18.20");
        assert_eq!((-3i32).describe(), "-3");
        assert_eq!(Complex::new(1.0f64, -2.0).describe(), "1.0000-2.0000i");
        assert_eq!(Complex::new(1.5f32, 0.25).describe(), "1.50+0.25i");
    }

    #[test]
    fn test_integer_gemm_truncates() {
        let mut c = [0; 1];
        i32::gemm(1, 1, 2, &[3, -4], &[2, 1], &mut c).unwrap();
        assert_eq!(c, [2]);
    }

    #[test]
    fn test_integer_gemm_wraps() {
        let mut c = [0; 1];
        i32::gemm(1, 1, 1, &[i32::MAX], &[2], &mut c).unwrap();
        assert_eq!(c, [i32::MAX.wrapping_mul(2)]);

        i32::gemm(1, 1, 2, &[i32::MAX, 1], &[1, 1], &mut c).unwrap();
        assert_eq!(c, [i32::MIN]);
    }

    #[test]
    fn test_complex_gemm() {
        let i = Complex::new(0., 1.);
        let one = Complex::new(1., 0.);
        let mut c = [Complex::new(9., 9.); 1];
        Complex::<f64>::gemm(1, 1, 2, &[i, one], &[i, one], &mut c).unwrap();
        assert_eq!(c, [Complex::new(0., 0.)]);
    }
}
