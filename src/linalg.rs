use log::debug;
use num_traits::{Float, Zero};

use super::ops::subtract;
use super::{
    error, ArrayInstance, Coord, Element, ErrorKind, Floating, Matrix, Norm, Result, ShapedArray,
    Vector,
};

/// The product of an `m x k` matrix and a `k x n` matrix.
pub fn matmul<T: Element>(left: &Matrix<T>, right: &Matrix<T>) -> Result<Matrix<T>> {
    let (m, k, n) = (left.rows(), left.columns(), right.columns());

    if k != right.rows() {
        return Err(error(
            ErrorKind::DimensionMismatch,
            format!(
                "cannot multiply a {}x{} matrix by a {}x{} matrix",
                m,
                k,
                right.rows(),
                n
            ),
        ));
    }

    debug!("gemm {}x{} by {}x{} of {}", m, k, k, n, T::DTYPE);

    let mut product = Matrix::zeros(m, n)?;
    T::gemm(m, n, k, left.values(), right.values(), product.values_mut())?;
    Ok(product)
}

/// The Euclidean norm of all the elements of `array`.
pub fn norm<A>(array: &A) -> <A::DType as Norm>::Real
where
    A: ArrayInstance,
    A::DType: Norm,
{
    A::DType::nrm2(array.values())
}

/// The dot product of two vectors of the same length.
pub fn dot<T: Floating>(left: &Vector<T>, right: &Vector<T>) -> Result<T> {
    if left.len() == right.len() {
        Ok(T::dot(left.values(), right.values()))
    } else {
        Err(error(
            ErrorKind::LengthMismatch,
            format!(
                "cannot compute the dot product of vectors of length {} and {}",
                left.len(),
                right.len()
            ),
        ))
    }
}

/// The default relative tolerance of [`is_approx`], the square root of the machine epsilon.
pub fn default_rtol<R: Float>() -> R {
    R::epsilon().sqrt()
}

/// Return `true` if `left` and `right` have the same shape and
/// `norm(left - right) <= rtol * max(norm(left), norm(right))`, with the default relative
/// tolerance.
pub fn is_approx<A>(left: &A, right: &A) -> bool
where
    A: ArrayInstance,
    A::DType: Norm,
{
    is_approx_with(left, right, default_rtol(), Zero::zero())
}

/// Return `true` if `left` and `right` have the same shape and
/// `norm(left - right) <= max(atol, rtol * max(norm(left), norm(right)))`.
pub fn is_approx_with<A>(
    left: &A,
    right: &A,
    rtol: <A::DType as Norm>::Real,
    atol: <A::DType as Norm>::Real,
) -> bool
where
    A: ArrayInstance,
    A::DType: Norm,
{
    let difference = match subtract(left, right) {
        Ok(difference) => norm(&difference),
        Err(_) => return false,
    };

    let scale = Float::max(norm(left), norm(right));
    difference <= Float::max(atol, rtol * scale)
}

macro_rules! norm_methods {
    ($container:ident) => {
        impl<T: Norm> $container<T> {
            /// The Euclidean norm of every element of this container.
            pub fn norm(&self) -> T::Real {
                norm(self)
            }

            /// See [`is_approx`].
            pub fn is_approx(&self, other: &Self) -> bool {
                is_approx(self, other)
            }

            /// See [`is_approx_with`].
            pub fn is_approx_with(&self, other: &Self, rtol: T::Real, atol: T::Real) -> bool {
                is_approx_with(self, other, rtol, atol)
            }
        }
    };
}

norm_methods!(Vector);
norm_methods!(Matrix);
norm_methods!(ShapedArray);

impl<T: Element> Vector<T> {
    /// The index of the first element with the greatest magnitude, or `None` if this vector
    /// is empty.
    ///
    /// The magnitude of a complex number is taken to be `|re| + |im|`.
    pub fn max_abs_index(&self) -> Option<usize> {
        T::iamax(self.values())
    }
}

impl<T: Floating> Vector<T> {
    pub fn dot(&self, other: &Self) -> Result<T> {
        dot(self, other)
    }
}

impl<T: Element> Matrix<T> {
    /// Compute the matrix product `self * other`.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        matmul(self, other)
    }

    /// The `(row, column)` of the first element, in row-major order, with the greatest
    /// magnitude.
    pub fn max_abs_index(&self) -> (usize, usize) {
        let index = T::iamax(self.values()).unwrap_or_default();
        (index / self.columns(), index % self.columns())
    }
}

impl<T: Element> ShapedArray<T> {
    /// The coordinate of the first element, in row-major order, with the greatest magnitude.
    pub fn max_abs_index(&self) -> Coord {
        let index = T::iamax(self.values()).unwrap_or_default();
        self.coord_of(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Complex;

    #[test]
    fn test_matmul() {
        let a = Matrix::from_rows(vec![vec![1., 2., 3.], vec![4., 5., 6.]]).unwrap();
        let b = Matrix::from_rows(vec![vec![7., 8.], vec![9., 10.], vec![11., 12.]]).unwrap();
        let expected = Matrix::from_rows(vec![vec![58., 64.], vec![139., 154.]]).unwrap();

        assert_eq!(a.matmul(&b).unwrap(), expected);
        assert_eq!(&a * &b, expected);
    }

    #[test]
    fn test_matmul_f32() {
        let a = Matrix::new(2, 2, vec![1.0f32, 2., 3., 4.]).unwrap();
        let identity = Matrix::new(2, 2, vec![1.0f32, 0., 0., 1.]).unwrap();
        assert_eq!(matmul(&a, &identity).unwrap(), a);
    }

    #[test]
    fn test_matmul_integer() {
        let a = Matrix::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let b = Matrix::new(3, 2, vec![7, 8, 9, 10, 11, 12]).unwrap();
        assert_eq!(a.matmul(&b).unwrap().values(), &[58, 64, 139, 154]);
    }

    #[test]
    fn test_matmul_complex() {
        let i = Complex::new(0.0f32, 1.);
        let a = Matrix::new(1, 2, vec![i, i]).unwrap();
        let b = Matrix::new(2, 1, vec![i, Complex::new(2., 0.)]).unwrap();
        let product = a.matmul(&b).unwrap();
        assert_eq!(product.values(), &[Complex::new(-1., 2.)]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3).unwrap();
        let cause = a.matmul(&a).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::DimensionMismatch);
        assert!(cause.message().contains("2x3"));
    }

    #[test]
    fn test_norm() {
        assert_eq!(Vector::from(vec![3.0f64, 4.]).norm(), 5.);
        assert_eq!(Vector::from(vec![3.0f32, 4.]).norm(), 5.);

        let m = Matrix::new(2, 2, vec![1.0f64, 1., 1., 1.]).unwrap();
        assert_eq!(m.norm(), 2.);

        let c = Vector::from(vec![Complex::new(3.0f64, 4.)]);
        assert_eq!(c.norm(), 5.);
    }

    #[test]
    fn test_dot() {
        let a = Vector::from(vec![1., 2., 3.]);
        let b = Vector::from(vec![4., 5., 6.]);
        assert_eq!(a.dot(&b).unwrap(), 32.);

        let c = Vector::from(vec![1.]);
        assert_eq!(a.dot(&c).unwrap_err().kind(), ErrorKind::LengthMismatch);
    }

    #[test]
    fn test_max_abs_index() {
        let v = Vector::from(vec![1, -9, 9, 3]);
        assert_eq!(v.max_abs_index(), Some(1));
        assert_eq!(Vector::<f64>::from(vec![]).max_abs_index(), None);

        let m = Matrix::new(2, 3, vec![1., 2., 3., 4., -8., 5.]).unwrap();
        assert_eq!(m.max_abs_index(), (1, 1));

        let a = ShapedArray::new(vec![2, 2, 2], vec![0., 0., 0., 0., 0., 7., 0., 0.]).unwrap();
        assert_eq!(a.max_abs_index(), vec![1, 0, 1]);
    }

    #[test]
    fn test_is_approx() {
        let a = Vector::from(vec![1.0f64, 2., 3.]);
        let b = Vector::from(vec![1., 2., 3. + 1e-12]);
        let c = Vector::from(vec![1., 2., 3.1]);

        assert!(a.is_approx(&b));
        assert!(!a.is_approx(&c));
        assert!(a.is_approx_with(&c, 0.1, 0.));
        assert!(a.is_approx_with(&c, 0., 0.2));
        assert!(!a.is_approx(&Vector::from(vec![1., 2.])));
    }
}
