use std::fmt;
use std::ops::*;

use serde::{Deserialize, Serialize};

use super::{
    error, or_panic, ArrayInstance, Complex, DType, Element, ErrorKind, Matrix, Result,
    ShapedArray,
};

/// A single value of any supported element type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    I32(i32),
    F32(f32),
    F64(f64),
    C32(Complex<f32>),
    C64(Complex<f64>),
}

impl Scalar {
    pub fn dtype(&self) -> DType {
        match self {
            Self::I32(_) => DType::I32,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
            Self::C32(_) => DType::C32,
            Self::C64(_) => DType::C64,
        }
    }

    /// Convert this value to the given data type, truncating or discarding the imaginary part
    /// where necessary.
    pub fn cast_into(self, dtype: DType) -> Scalar {
        let value = match self {
            Self::I32(i) => i.into_complex(),
            Self::F32(f) => f.into_complex(),
            Self::F64(f) => f.into_complex(),
            Self::C32(c) => c.into_complex(),
            Self::C64(c) => c,
        };

        match dtype {
            DType::I32 => Self::I32(Element::from_complex(value)),
            DType::F32 => Self::F32(Element::from_complex(value)),
            DType::F64 => Self::F64(Element::from_complex(value)),
            DType::C32 => Self::C32(Element::from_complex(value)),
            DType::C64 => Self::C64(value),
        }
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::I32(i)
    }
}

impl From<f32> for Scalar {
    fn from(f: f32) -> Self {
        Self::F32(f)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::F64(f)
    }
}

impl From<Complex<f32>> for Scalar {
    fn from(c: Complex<f32>) -> Self {
        Self::C32(c)
    }
}

impl From<Complex<f64>> for Scalar {
    fn from(c: Complex<f64>) -> Self {
        Self::C64(c)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::I32(i) => i.describe(),
            Self::F32(x) => x.describe(),
            Self::F64(x) => x.describe(),
            Self::C32(c) => c.describe(),
            Self::C64(c) => c.describe(),
        };

        f.write_str(&text)
    }
}

/// A [`ShapedArray`] whose element type is only known at run time.
///
/// Binary operations on arrays of different data types first cast both operands to the
/// promoted data type (see [`DType::promote`]).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Array {
    I32(ShapedArray<i32>),
    F32(ShapedArray<f32>),
    F64(ShapedArray<f64>),
    C32(ShapedArray<Complex<f32>>),
    C64(ShapedArray<Complex<f64>>),
}

macro_rules! dispatch {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            Array::I32($a) => $body,
            Array::F32($a) => $body,
            Array::F64($a) => $body,
            Array::C32($a) => $body,
            Array::C64($a) => $body,
        }
    };
}

macro_rules! zip {
    ($left:expr, $right:expr, $method:ident, $func:path) => {{
        use Array::*;
        match ($left, $right) {
            (I32(l), I32(r)) => $func(l, r).map(I32),
            (F32(l), F32(r)) => $func(l, r).map(F32),
            (F64(l), F64(r)) => $func(l, r).map(F64),
            (C32(l), C32(r)) => $func(l, r).map(C32),
            (C64(l), C64(r)) => $func(l, r).map(C64),
            (l, r) => {
                let dtype = l.dtype().promote(r.dtype());
                let l = l.cast_into(dtype);
                let r = r.cast_into(dtype);
                l.$method(&r)
            }
        }
    }};
}

impl Array {
    fn cast_inner<T: Element>(&self) -> ShapedArray<T> {
        dispatch!(self, a => a.map(|x| T::from_complex(x.into_complex())))
    }

    /// Construct a new array of the given `shape`, filled with `value`.
    pub fn constant(value: Scalar, shape: Vec<usize>) -> Result<Array> {
        match value {
            Scalar::I32(i) => ShapedArray::filled(shape, i).map(Self::I32),
            Scalar::F32(f) => ShapedArray::filled(shape, f).map(Self::F32),
            Scalar::F64(f) => ShapedArray::filled(shape, f).map(Self::F64),
            Scalar::C32(c) => ShapedArray::filled(shape, c).map(Self::C32),
            Scalar::C64(c) => ShapedArray::filled(shape, c).map(Self::C64),
        }
    }

    pub fn dtype(&self) -> DType {
        dispatch!(self, a => a.dtype())
    }

    pub fn shape(&self) -> Vec<usize> {
        dispatch!(self, a => a.shape())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, a => a.is_empty())
    }

    /// Convert this array to the given data type.
    pub fn cast_into(&self, dtype: DType) -> Array {
        if dtype == self.dtype() {
            return self.clone();
        }

        match dtype {
            DType::I32 => Self::I32(self.cast_inner()),
            DType::F32 => Self::F32(self.cast_inner()),
            DType::F64 => Self::F64(self.cast_inner()),
            DType::C32 => Self::C32(self.cast_inner()),
            DType::C64 => Self::C64(self.cast_inner()),
        }
    }

    /// Get the element at the given coordinate.
    pub fn get_value(&self, coord: &[usize]) -> Result<Scalar> {
        dispatch!(self, a => a.get(coord).map(Scalar::from))
    }

    pub fn add(&self, other: &Array) -> Result<Array> {
        zip!(self, other, add, super::ops::add)
    }

    pub fn subtract(&self, other: &Array) -> Result<Array> {
        zip!(self, other, subtract, super::ops::subtract)
    }

    /// Multiply this array by `other`, elementwise.
    pub fn hadamard(&self, other: &Array) -> Result<Array> {
        zip!(self, other, hadamard, super::ops::hadamard)
    }

    pub fn divide(&self, other: &Array) -> Result<Array> {
        zip!(self, other, divide, super::ops::divide)
    }

    /// The matrix product of two 2-dimensional arrays.
    pub fn matmul(&self, other: &Array) -> Result<Array> {
        zip!(self, other, matmul, matmul)
    }

    /// The Euclidean norm of every element of this array.
    ///
    /// The norm of an integer array is computed in double precision.
    pub fn norm(&self) -> Scalar {
        match self {
            Self::I32(a) => Scalar::F64(a.map(f64::from).norm()),
            Self::F32(a) => Scalar::F32(a.norm()),
            Self::F64(a) => Scalar::F64(a.norm()),
            Self::C32(a) => Scalar::F32(a.norm()),
            Self::C64(a) => Scalar::F64(a.norm()),
        }
    }

    /// Raise every element of this array to the power `exponent`.
    ///
    /// Integer operands are promoted to `f64`. Complex powers are not supported.
    pub fn pow(&self, exponent: Scalar) -> Result<Array> {
        let dtype = self.dtype().promote(exponent.dtype());
        let unsupported = || {
            error(
                ErrorKind::UnsupportedDType,
                format!("cannot raise an array of {} to a power", dtype),
            )
        };

        if dtype.is_complex() {
            return Err(unsupported());
        }

        let dtype = if dtype == DType::I32 { DType::F64 } else { dtype };
        match (self.cast_into(dtype), exponent.cast_into(dtype)) {
            (Self::F32(a), Scalar::F32(e)) => a.pow(e).map(Self::F32),
            (Self::F64(a), Scalar::F64(e)) => a.pow(e).map(Self::F64),
            _ => Err(unsupported()),
        }
    }
}

fn matmul<T: Element>(left: &ShapedArray<T>, right: &ShapedArray<T>) -> Result<ShapedArray<T>> {
    let left = Matrix::try_from(left.clone())?;
    let right = Matrix::try_from(right.clone())?;
    left.matmul(&right).map(ShapedArray::from)
}

impl Add for &Array {
    type Output = Array;

    fn add(self, other: Self) -> Self::Output {
        or_panic(Array::add(self, other))
    }
}

impl AddAssign for Array {
    fn add_assign(&mut self, other: Self) {
        let sum = &*self + &other;
        *self = sum;
    }
}

impl Sub for &Array {
    type Output = Array;

    fn sub(self, other: Self) -> Self::Output {
        or_panic(self.subtract(other))
    }
}

impl SubAssign for Array {
    fn sub_assign(&mut self, other: Self) {
        let diff = &*self - &other;
        *self = diff;
    }
}

impl Mul for &Array {
    type Output = Array;

    fn mul(self, other: Self) -> Self::Output {
        or_panic(self.hadamard(other))
    }
}

impl MulAssign for Array {
    fn mul_assign(&mut self, other: Array) {
        let product = &*self * &other;
        *self = product;
    }
}

impl Div for &Array {
    type Output = Array;

    fn div(self, other: Self) -> Self::Output {
        or_panic(self.divide(other))
    }
}

impl DivAssign for Array {
    fn div_assign(&mut self, other: Array) {
        let quotient = &*self / &other;
        *self = quotient;
    }
}

macro_rules! from_shaped {
    ($t:ty, $variant:ident) => {
        impl From<ShapedArray<$t>> for Array {
            fn from(array: ShapedArray<$t>) -> Array {
                Array::$variant(array)
            }
        }

        impl From<Matrix<$t>> for Array {
            fn from(matrix: Matrix<$t>) -> Array {
                Array::$variant(matrix.into())
            }
        }
    };
}

from_shaped!(i32, I32);
from_shaped!(f32, F32);
from_shaped!(f64, F64);
from_shaped!(Complex<f32>, C32);
from_shaped!(Complex<f64>, C64);

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        dispatch!(self, a => fmt::Display::fmt(a, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array<T: Element>(shape: Vec<usize>, values: Vec<T>) -> ShapedArray<T> {
        ShapedArray::new(shape, values).unwrap()
    }

    #[test]
    fn test_get_value() {
        let arr = Array::from(array(vec![3], vec![1i32, 2, 3]));
        assert_eq!(arr.get_value(&[1]).unwrap(), Scalar::I32(2));
        assert!(arr.get_value(&[3]).is_err());
    }

    #[test]
    fn test_cast_into() {
        let arr = Array::from(array(vec![2], vec![1.7f64, -2.5]));
        assert_eq!(arr.cast_into(DType::I32), Array::from(array(vec![2], vec![1i32, -2])));
        assert_eq!(arr.cast_into(DType::F64), arr);

        let complex = arr.cast_into(DType::C32);
        assert_eq!(complex.get_value(&[0]).unwrap(), Scalar::C32(Complex::new(1.7, 0.)));
        assert_eq!(Scalar::from(3.9f64).cast_into(DType::I32), Scalar::I32(3));
    }

    #[test]
    fn test_promotion() {
        let ints = Array::from(array(vec![2], vec![1i32, 2]));
        let floats = Array::from(array(vec![2], vec![0.5f32, 0.5]));

        let sum = &ints + &floats;
        assert_eq!(sum.dtype(), DType::F32);
        assert_eq!(sum, Array::from(array(vec![2], vec![1.5f32, 2.5])));

        let doubles = Array::from(array(vec![2], vec![1.0f64, 1.]));
        let complex = Array::from(array(vec![2], vec![Complex::new(0.0f32, 1.); 2]));
        assert_eq!(doubles.add(&complex).unwrap().dtype(), DType::C64);
    }

    #[test]
    fn test_assign() {
        let mut arr = Array::from(array(vec![3], vec![1.0f64, 2., 3.]));
        arr += Array::constant(Scalar::F64(1.), vec![3]).unwrap();
        arr *= Array::constant(Scalar::I32(2), vec![3]).unwrap();
        arr -= Array::constant(Scalar::F64(4.), vec![3]).unwrap();
        arr /= Array::constant(Scalar::F64(2.), vec![3]).unwrap();
        assert_eq!(arr, Array::from(array(vec![3], vec![0.0f64, 1., 2.])));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Array::constant(Scalar::F64(1.), vec![2, 3]).unwrap();
        let b = Array::constant(Scalar::I32(1), vec![3, 2]).unwrap();
        assert_eq!(a.add(&b).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_matmul() {
        let a = Array::from(Matrix::new(2, 3, vec![1i32, 2, 3, 4, 5, 6]).unwrap());
        let b = Array::from(Matrix::new(3, 2, vec![7.0f64, 8., 9., 10., 11., 12.]).unwrap());
        let product = a.matmul(&b).unwrap();
        assert_eq!(product, Array::from(array(vec![2, 2], vec![58.0f64, 64., 139., 154.])));

        let v = Array::constant(Scalar::F64(1.), vec![3]).unwrap();
        assert_eq!(a.matmul(&v).unwrap_err().kind(), ErrorKind::ShapeMismatch);
        assert_eq!(a.matmul(&a).unwrap_err().kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_norm() {
        let ints = Array::from(array(vec![2], vec![3i32, 4]));
        assert_eq!(ints.norm(), Scalar::F64(5.));

        let complex = Array::from(array(vec![1], vec![Complex::new(3.0f32, 4.)]));
        assert_eq!(complex.norm(), Scalar::F32(5.));
    }

    #[test]
    fn test_pow() {
        let ints = Array::from(array(vec![3], vec![1i32, 2, 3]));
        let squares = ints.pow(Scalar::I32(2)).unwrap();
        assert_eq!(squares, Array::from(array(vec![3], vec![1.0f64, 4., 9.])));

        let complex = Array::constant(Scalar::C64(Complex::new(1.0f64, 1.)), vec![2]).unwrap();
        let cause = complex.pow(Scalar::F64(2.)).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::UnsupportedDType);

        let reals = Array::from(array(vec![2], vec![1.0f64, 2.]));
        let cause = reals.pow(Scalar::C32(Complex::new(0.0f32, 1.))).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::UnsupportedDType);
    }

    #[test]
    fn test_serde() {
        let arr = Array::from(array(vec![2], vec![1.5f32, 2.5]));
        let json = serde_json::to_string(&arr).unwrap();
        assert_eq!(serde_json::from_str::<Array>(&json).unwrap(), arr);
    }

    #[test]
    fn test_display() {
        let arr = Array::from(array(vec![2], vec![1i32, 2]));
        assert_eq!(arr.to_string(), "2 ShapedArray<i32>\n( 1  2 )");
    }
}
