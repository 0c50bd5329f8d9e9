use log::trace;

use super::kernel::Exponential;
use super::{
    error, ArrayInstance, Buffer, Element, ErrorKind, Floating, Matrix, Result, ShapedArray, Vector,
};

/// Raise every element of `array` to the power `exponent`.
pub fn pow<A>(array: &A, exponent: A::DType) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    trace!("pow of {} {} elements", array.len(), A::DType::DTYPE);

    let mut buffer = Buffer::allocate(array.len())?;
    A::DType::pows(array.values(), exponent, buffer.as_mut_slice());
    Ok(array.with_buffer(buffer))
}

/// Raise each element of `array` to the power of the corresponding element of `exponents`.
pub fn pow_each<A>(array: &A, exponents: &[A::DType]) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    if exponents.len() != array.len() {
        return Err(error(
            ErrorKind::LengthMismatch,
            format!(
                "{} exponents were given for an array of {} elements",
                exponents.len(),
                array.len()
            ),
        ));
    }

    trace!("pow of {} {} elements", array.len(), A::DType::DTYPE);

    let mut buffer = Buffer::allocate(array.len())?;
    A::DType::pow(array.values(), exponents, buffer.as_mut_slice());
    Ok(array.with_buffer(buffer))
}

/// Compute `e^x` for every element `x` of `array`.
pub fn exp<A>(array: &A) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    exponential(Exponential::Exp, array)
}

/// Compute `2^x` for every element `x` of `array`.
pub fn exp2<A>(array: &A) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    exponential(Exponential::Exp2, array)
}

/// Compute `e^x - 1` for every element `x` of `array`, accurately even for `x` near zero.
pub fn expm1<A>(array: &A) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    exponential(Exponential::Expm1, array)
}

fn exponential<A>(func: Exponential, array: &A) -> Result<A>
where
    A: ArrayInstance,
    A::DType: Floating,
{
    trace!("{:?} of {} {} elements", func, array.len(), A::DType::DTYPE);

    let mut buffer = Buffer::allocate(array.len())?;
    A::DType::exponential(func, array.values(), buffer.as_mut_slice());
    Ok(array.with_buffer(buffer))
}

macro_rules! power_methods {
    ($container:ident) => {
        impl<T: Floating> $container<T> {
            /// Raise every element to the power `exponent`.
            pub fn pow(&self, exponent: T) -> Result<Self> {
                pow(self, exponent)
            }

            /// Raise each element to the power of the corresponding exponent.
            pub fn pow_each(&self, exponents: &[T]) -> Result<Self> {
                pow_each(self, exponents)
            }

            pub fn exp(&self) -> Result<Self> {
                exp(self)
            }

            pub fn exp2(&self) -> Result<Self> {
                exp2(self)
            }

            pub fn expm1(&self) -> Result<Self> {
                expm1(self)
            }
        }
    };
}

power_methods!(Vector);
power_methods!(Matrix);
power_methods!(ShapedArray);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_pow() {
        let v = Vector::from(vec![1., 2., 3., 4., 5.]);
        assert_eq!(v.pow(2.).unwrap().values(), &[1., 4., 9., 16., 25.]);

        let m = Matrix::new(1, 2, vec![4.0f32, 9.]).unwrap();
        assert_eq!(m.pow(0.5).unwrap().values(), &[2., 3.]);
    }

    #[test]
    fn test_pow_each() {
        let a = ShapedArray::new(vec![3], vec![2., 2., 2.]).unwrap();
        assert_eq!(a.pow_each(&[0., 1., 3.]).unwrap().values(), &[1., 2., 8.]);

        let cause = a.pow_each(&[1., 2.]).unwrap_err();
        assert_eq!(cause.kind(), ErrorKind::LengthMismatch);
    }

    #[test]
    fn test_exp() {
        let v = Vector::from(vec![0.0f64, 1., 2.]);

        let exp = v.exp().unwrap();
        assert_relative_eq!(exp[0], 1.);
        assert_relative_eq!(exp[1], std::f64::consts::E, max_relative = 1e-12);

        assert_eq!(v.exp2().unwrap().values(), &[1., 2., 4.]);

        let tiny = Vector::from(vec![1e-10f64]);
        assert_relative_eq!(tiny.expm1().unwrap()[0], 1e-10, max_relative = 1e-9);
    }
}
