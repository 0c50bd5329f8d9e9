//! Provides shaped numeric containers ([`Vector`], [`Matrix`] and the n-dimensional
//! [`ShapedArray`]) over owned, contiguous buffers of `i32`, `f32`, `f64`, `Complex<f32>` and
//! `Complex<f64>` values. Arithmetic, matrix products, norms, powers and random fills are
//! dispatched to BLAS/LAPACK-style kernels in the [`kernel`] module, one kernel signature per
//! element type.
//!
//! Every operation validates its operands, allocates a fresh output container and returns it;
//! containers never share storage. Fallible operations return a [`Result`]; the `std::ops`
//! operators are sugar over them which panic with the same message.
//!
//! The [`Array`] enum wraps a [`ShapedArray`] of any supported element type, for callers which
//! only know the data type at run time.
//!
//! Example usage:
//! ```
//! # use blasarray::{ArrayInstance, Matrix, Vector};
//! let a = Matrix::from_rows(vec![vec![1., 2., 3.], vec![4., 5., 6.]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![7., 8.], vec![9., 10.], vec![11., 12.]]).unwrap();
//!
//! let product = a.matmul(&b).unwrap();
//! assert_eq!(product.values(), &[58., 64., 139., 154.]);
//!
//! let v = Vector::from(vec![3.0f64, 4.]);
//! assert_eq!(v.norm(), 5.);
//! ```
//!
//! Enable the `arrayfire` feature to route the `f32` and `f64` kernels through ArrayFire. You
//! will have to install ArrayFire separately by following the instructions at
//! [https://arrayfire.org/docs/installing.htm](https://arrayfire.org/docs/installing.htm).

use std::fmt;

pub use array::*;
pub use buffer::*;
pub use coords::*;
pub use describe::*;
pub use dtype::*;
pub use instance::*;
pub use linalg::*;
pub use matrix::*;
pub use ops::*;
pub use power::*;
pub use random::*;
pub use shaped::*;
pub use vector::*;

mod array;
mod buffer;
mod coords;
mod describe;
mod dtype;
mod instance;
mod linalg;
mod matrix;
mod ops;
mod power;
mod random;
mod shaped;
mod vector;

pub mod kernel;

/// A complex number (an alias for [`num_complex::Complex`]).
pub type Complex<T> = num_complex::Complex<T>;

/// The invariant violated by a failed operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// An elementwise operation was given containers of different shapes.
    ShapeMismatch,
    /// The inner dimensions of a matrix product disagree.
    DimensionMismatch,
    /// A per-element parameter list has the wrong length.
    LengthMismatch,
    /// A nested constructor was given non-rectangular input.
    RaggedShape,
    /// A requested size or dimension is not allowed.
    InvalidSize,
    /// An index or coordinate is outside of the container.
    IndexOutOfRange,
    /// An operation is not defined for the data type of its operands.
    UnsupportedDType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::ShapeMismatch => "shape mismatch",
            Self::DimensionMismatch => "dimension mismatch",
            Self::LengthMismatch => "length mismatch",
            Self::RaggedShape => "ragged shape",
            Self::InvalidSize => "invalid size",
            Self::IndexOutOfRange => "index out of range",
            Self::UnsupportedDType => "unsupported data type",
        };

        f.write_str(name)
    }
}

/// The error type used for operations which may fail recoverably.
#[derive(Clone, Eq, PartialEq)]
pub struct ArrayError {
    kind: ErrorKind,
    message: String,
}

impl ArrayError {
    /// The invariant which this error reports as violated.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A description of the conflicting dimensions or values.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for ArrayError {}

impl fmt::Debug for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// The result of an operation which may fail recoverably.
pub type Result<T> = std::result::Result<T, ArrayError>;

fn error<I: fmt::Display>(kind: ErrorKind, message: I) -> ArrayError {
    ArrayError {
        kind,
        message: message.to_string(),
    }
}

/// Unwrap the result of an operator which has no way to return an error.
#[inline]
fn or_panic<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(cause) => panic!("{}", cause),
    }
}

/// Check that `shape` describes a valid container and return its number of elements.
fn validate_shape(shape: &[usize]) -> Result<usize> {
    if shape.is_empty() {
        return Err(error(
            ErrorKind::InvalidSize,
            "an array must have at least one dimension",
        ));
    }

    if shape.contains(&0) {
        return Err(error(
            ErrorKind::InvalidSize,
            format!("every dimension must be positive, found shape {:?}", shape),
        ));
    }

    shape
        .iter()
        .try_fold(1usize, |size, dim| size.checked_mul(*dim))
        .ok_or_else(|| {
            error(
                ErrorKind::InvalidSize,
                format!("shape {:?} has too many elements", shape),
            )
        })
}
