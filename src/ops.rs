use log::trace;

use super::kernel::{BinaryOp, Operand};
use super::{error, ArrayInstance, Buffer, Element, ErrorKind, Result};

/// Add two containers with the same shape, elementwise.
pub fn add<A: ArrayInstance>(left: &A, right: &A) -> Result<A> {
    zip_with(BinaryOp::Add, "add", left, right)
}

/// Subtract `right` from `left`, elementwise.
pub fn subtract<A: ArrayInstance>(left: &A, right: &A) -> Result<A> {
    zip_with(BinaryOp::Sub, "subtract", left, right)
}

/// Multiply two containers with the same shape, elementwise (the Hadamard product).
pub fn hadamard<A: ArrayInstance>(left: &A, right: &A) -> Result<A> {
    zip_with(BinaryOp::Mul, "multiply", left, right)
}

/// An alias of [`hadamard`].
pub fn elementwise_multiply<A: ArrayInstance>(left: &A, right: &A) -> Result<A> {
    hadamard(left, right)
}

/// Divide `left` by `right`, elementwise.
///
/// Panics: on integer division by zero.
pub fn divide<A: ArrayInstance>(left: &A, right: &A) -> Result<A> {
    zip_with(BinaryOp::Div, "divide", left, right)
}

/// Compute `container + scalar`.
pub fn add_scalar<A: ArrayInstance>(container: &A, scalar: A::DType) -> Result<A> {
    broadcast(
        BinaryOp::Add,
        Operand::Slice(container.values()),
        Operand::Scalar(scalar),
        container,
    )
}

/// Compute `container - scalar`.
pub fn subtract_scalar<A: ArrayInstance>(container: &A, scalar: A::DType) -> Result<A> {
    broadcast(
        BinaryOp::Sub,
        Operand::Slice(container.values()),
        Operand::Scalar(scalar),
        container,
    )
}

/// Compute `scalar - container`.
pub fn scalar_subtract<A: ArrayInstance>(scalar: A::DType, container: &A) -> Result<A> {
    broadcast(
        BinaryOp::Sub,
        Operand::Scalar(scalar),
        Operand::Slice(container.values()),
        container,
    )
}

/// Compute `container * scalar`.
pub fn scale<A: ArrayInstance>(container: &A, scalar: A::DType) -> Result<A> {
    broadcast(
        BinaryOp::Mul,
        Operand::Slice(container.values()),
        Operand::Scalar(scalar),
        container,
    )
}

/// Compute `container / scalar`.
pub fn divide_scalar<A: ArrayInstance>(container: &A, scalar: A::DType) -> Result<A> {
    broadcast(
        BinaryOp::Div,
        Operand::Slice(container.values()),
        Operand::Scalar(scalar),
        container,
    )
}

/// Compute `scalar / container`.
pub fn scalar_divide<A: ArrayInstance>(scalar: A::DType, container: &A) -> Result<A> {
    broadcast(
        BinaryOp::Div,
        Operand::Scalar(scalar),
        Operand::Slice(container.values()),
        container,
    )
}

fn zip_with<A: ArrayInstance>(op: BinaryOp, name: &str, left: &A, right: &A) -> Result<A> {
    let (l, r) = (left.shape(), right.shape());
    if l != r {
        return Err(error(
            ErrorKind::ShapeMismatch,
            format!("cannot {} arrays with shapes {:?} and {:?}", name, l, r),
        ));
    }

    broadcast(
        op,
        Operand::Slice(left.values()),
        Operand::Slice(right.values()),
        left,
    )
}

fn broadcast<A: ArrayInstance>(
    op: BinaryOp,
    lhs: Operand<A::DType>,
    rhs: Operand<A::DType>,
    like: &A,
) -> Result<A> {
    trace!("{:?} over {} {} elements", op, like.len(), A::DType::DTYPE);

    let mut buffer = Buffer::allocate(like.len())?;
    A::DType::elementwise(op, lhs, rhs, buffer.as_mut_slice());
    Ok(like.with_buffer(buffer))
}

/// Implement the named elementwise methods and the `std::ops` operators of a container type,
/// other than multiplication of two containers.
macro_rules! container_ops {
    ($container:ident) => {
        impl<T: $crate::Element> $container<T> {
            /// Add `other` to this container, elementwise.
            pub fn add(&self, other: &Self) -> $crate::Result<Self> {
                $crate::ops::add(self, other)
            }

            pub fn subtract(&self, other: &Self) -> $crate::Result<Self> {
                $crate::ops::subtract(self, other)
            }

            /// Multiply this container by `other`, elementwise.
            pub fn hadamard(&self, other: &Self) -> $crate::Result<Self> {
                $crate::ops::hadamard(self, other)
            }

            pub fn elementwise_multiply(&self, other: &Self) -> $crate::Result<Self> {
                $crate::ops::hadamard(self, other)
            }

            pub fn divide(&self, other: &Self) -> $crate::Result<Self> {
                $crate::ops::divide(self, other)
            }

            pub fn add_scalar(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::add_scalar(self, scalar)
            }

            pub fn subtract_scalar(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::subtract_scalar(self, scalar)
            }

            /// Compute `scalar - self`.
            pub fn scalar_subtract(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::scalar_subtract(scalar, self)
            }

            pub fn scale(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::scale(self, scalar)
            }

            pub fn divide_scalar(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::divide_scalar(self, scalar)
            }

            /// Compute `scalar / self`.
            pub fn scalar_divide(&self, scalar: T) -> $crate::Result<Self> {
                $crate::ops::scalar_divide(scalar, self)
            }
        }

        impl<T: $crate::Element> std::ops::Add for &$container<T> {
            type Output = $container<T>;

            fn add(self, other: Self) -> Self::Output {
                $crate::or_panic($crate::ops::add(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::AddAssign<&$container<T>> for $container<T> {
            fn add_assign(&mut self, other: &$container<T>) {
                let sum = &*self + other;
                *self = sum;
            }
        }

        impl<T: $crate::Element> std::ops::Sub for &$container<T> {
            type Output = $container<T>;

            fn sub(self, other: Self) -> Self::Output {
                $crate::or_panic($crate::ops::subtract(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::SubAssign<&$container<T>> for $container<T> {
            fn sub_assign(&mut self, other: &$container<T>) {
                let diff = &*self - other;
                *self = diff;
            }
        }

        impl<T: $crate::Element> std::ops::Div for &$container<T> {
            type Output = $container<T>;

            fn div(self, other: Self) -> Self::Output {
                $crate::or_panic($crate::ops::divide(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::DivAssign<&$container<T>> for $container<T> {
            fn div_assign(&mut self, other: &$container<T>) {
                let quotient = &*self / other;
                *self = quotient;
            }
        }

        impl<T: $crate::Element> std::ops::Add<T> for &$container<T> {
            type Output = $container<T>;

            fn add(self, other: T) -> Self::Output {
                $crate::or_panic($crate::ops::add_scalar(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::AddAssign<T> for $container<T> {
            fn add_assign(&mut self, other: T) {
                let sum = &*self + other;
                *self = sum;
            }
        }

        impl<T: $crate::Element> std::ops::Sub<T> for &$container<T> {
            type Output = $container<T>;

            fn sub(self, other: T) -> Self::Output {
                $crate::or_panic($crate::ops::subtract_scalar(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::SubAssign<T> for $container<T> {
            fn sub_assign(&mut self, other: T) {
                let diff = &*self - other;
                *self = diff;
            }
        }

        impl<T: $crate::Element> std::ops::Mul<T> for &$container<T> {
            type Output = $container<T>;

            fn mul(self, other: T) -> Self::Output {
                $crate::or_panic($crate::ops::scale(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::MulAssign<T> for $container<T> {
            fn mul_assign(&mut self, other: T) {
                let product = &*self * other;
                *self = product;
            }
        }

        impl<T: $crate::Element> std::ops::Div<T> for &$container<T> {
            type Output = $container<T>;

            fn div(self, other: T) -> Self::Output {
                $crate::or_panic($crate::ops::divide_scalar(self, other))
            }
        }

        impl<T: $crate::Element> std::ops::DivAssign<T> for $container<T> {
            fn div_assign(&mut self, other: T) {
                let quotient = &*self / other;
                *self = quotient;
            }
        }

        $crate::ops::scalar_ops!(
            $container,
            i32,
            f32,
            f64,
            $crate::Complex<f32>,
            $crate::Complex<f64>
        );
    };
}

/// Implement `scalar (op) container` for each concrete element type.
macro_rules! scalar_ops {
    ($container:ident, $($t:ty),*) => {
        $(
            impl std::ops::Add<&$container<$t>> for $t {
                type Output = $container<$t>;

                fn add(self, other: &$container<$t>) -> Self::Output {
                    $crate::or_panic($crate::ops::add_scalar(other, self))
                }
            }

            impl std::ops::Sub<&$container<$t>> for $t {
                type Output = $container<$t>;

                fn sub(self, other: &$container<$t>) -> Self::Output {
                    $crate::or_panic($crate::ops::scalar_subtract(self, other))
                }
            }

            impl std::ops::Mul<&$container<$t>> for $t {
                type Output = $container<$t>;

                fn mul(self, other: &$container<$t>) -> Self::Output {
                    $crate::or_panic($crate::ops::scale(other, self))
                }
            }

            impl std::ops::Div<&$container<$t>> for $t {
                type Output = $container<$t>;

                fn div(self, other: &$container<$t>) -> Self::Output {
                    $crate::or_panic($crate::ops::scalar_divide(self, other))
                }
            }
        )*
    };
}

pub(crate) use container_ops;
pub(crate) use scalar_ops;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, ShapedArray, Vector};

    #[test]
    fn test_add() {
        let a = Vector::from(vec![1., 2., 3.]);
        let b = Vector::from(vec![4., 5., 6.]);
        assert_eq!(add(&a, &b).unwrap().values(), &[5., 7., 9.]);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3).unwrap();
        let b = Matrix::<f64>::zeros(3, 2).unwrap();

        for result in [add(&a, &b), subtract(&a, &b), hadamard(&a, &b), divide(&a, &b)] {
            let cause = result.unwrap_err();
            assert_eq!(cause.kind(), ErrorKind::ShapeMismatch);
            assert!(cause.message().contains("[2, 3]"));
            assert!(cause.message().contains("[3, 2]"));
        }
    }

    #[test]
    fn test_scalar_forms() {
        let a = ShapedArray::new(vec![2, 2], vec![1., 2., 4., 8.]).unwrap();

        assert_eq!(add_scalar(&a, 1.).unwrap().values(), &[2., 3., 5., 9.]);
        assert_eq!(subtract_scalar(&a, 1.).unwrap().values(), &[0., 1., 3., 7.]);
        assert_eq!(scalar_subtract(1., &a).unwrap().values(), &[0., -1., -3., -7.]);
        assert_eq!(scale(&a, 2.).unwrap().values(), &[2., 4., 8., 16.]);
        assert_eq!(divide_scalar(&a, 2.).unwrap().values(), &[0.5, 1., 2., 4.]);
        assert_eq!(scalar_divide(8., &a).unwrap().values(), &[8., 4., 2., 1.]);
        assert_eq!(add_scalar(&a, 1.).unwrap().shape(), &[2, 2]);
    }

    #[test]
    fn test_operators() {
        let a = Vector::from(vec![1i32, 2, 3]);
        let b = Vector::from(vec![3i32, 2, 1]);

        assert_eq!((&a + &b).values(), &[4, 4, 4]);
        assert_eq!((&a - &b).values(), &[-2, 0, 2]);
        assert_eq!((&a / &b).values(), &[0, 1, 3]);
        assert_eq!((10 - &a).values(), &[9, 8, 7]);
        assert_eq!((2 * &a).values(), &[2, 4, 6]);
        assert_eq!((&a * 2).values(), &[2, 4, 6]);

        let mut c = a.clone();
        c += &b;
        c *= 2;
        c -= 1;
        assert_eq!(c.values(), &[7, 7, 7]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let a = Vector::from(vec![i32::MAX, i32::MIN]);
        let b = Vector::from(vec![1i32, 1]);

        assert_eq!(a.add(&b).unwrap().values(), &[i32::MIN, i32::MIN + 1]);
        assert_eq!(a.subtract(&b).unwrap().values(), &[i32::MAX - 1, i32::MAX]);
        assert_eq!(a.scale(2).unwrap().values(), &[-2, 0]);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn test_operator_panics() {
        let a = Vector::from(vec![1., 2.]);
        let b = Vector::from(vec![1., 2., 3.]);
        let _ = &a + &b;
    }

    #[test]
    fn test_complex() {
        let i = crate::Complex::new(0., 1.);
        let a = Vector::from(vec![i, i]);
        let product = hadamard(&a, &a).unwrap();
        assert_eq!(product.values(), &[crate::Complex::new(-1., 0.); 2]);
    }
}
