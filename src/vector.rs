use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use super::ops::container_ops;
use super::{describe, error, or_panic, ArrayInstance, Buffer, Element, ErrorKind, Result};

/// A rank-1 container.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector<T> {
    buffer: Buffer<T>,
}

impl<T: Element> Vector<T> {
    /// Construct a new `Vector` of `len` zeros.
    pub fn zeros(len: usize) -> Result<Self> {
        Buffer::allocate(len).map(Self::from)
    }

    /// Construct a new `Vector` of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Result<Self> {
        Buffer::filled(len, value).map(Self::from)
    }

    /// Get the element at `index`, or an `IndexOutOfRange` error.
    pub fn get(&self, index: usize) -> Result<T> {
        self.buffer
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Set the element at `index`, or return an `IndexOutOfRange` error.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if index < self.len() {
            self.buffer[index] = value;
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn out_of_range(&self, index: usize) -> crate::ArrayError {
        error(
            ErrorKind::IndexOutOfRange,
            format!("index {} is out of range for a Vector of length {}", index, self.len()),
        )
    }
}

impl<T: Element> ArrayInstance for Vector<T> {
    type DType = T;

    fn shape(&self) -> Vec<usize> {
        vec![self.buffer.len()]
    }

    fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Buffer<T> {
        &mut self.buffer
    }

    fn with_buffer(&self, buffer: Buffer<T>) -> Self {
        debug_assert_eq!(buffer.len(), self.len());
        Self { buffer }
    }

    fn into_buffer(self) -> Buffer<T> {
        self.buffer
    }
}

container_ops!(Vector);

impl<T: Element> Mul for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, other: Self) -> Self::Output {
        or_panic(super::ops::hadamard(self, other))
    }
}

impl<T: Element> MulAssign<&Vector<T>> for Vector<T> {
    fn mul_assign(&mut self, other: &Vector<T>) {
        let product = &*self * other;
        *self = product;
    }
}

impl<T: Element> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.buffer.get(index) {
            Some(value) => value,
            None => panic!("{}", self.out_of_range(index)),
        }
    }
}

impl<T: Element> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        if index >= self.len() {
            panic!("{}", self.out_of_range(index));
        }

        &mut self.buffer[index]
    }
}

impl<T> From<Buffer<T>> for Vector<T> {
    fn from(buffer: Buffer<T>) -> Self {
        Self { buffer }
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        Self {
            buffer: values.into(),
        }
    }
}

impl<T: Copy> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        Self {
            buffer: values.iter().copied().collect(),
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            buffer: iter.into_iter().collect(),
        }
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: Element> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-element Vector<{}>", self.len(), T::DTYPE)?;
        f.write_str(&describe(self.values(), &[self.len()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Vector::<f32>::zeros(3).unwrap().values(), &[0., 0., 0.]);
        assert_eq!(Vector::filled(2, 7).unwrap().values(), &[7, 7]);
        assert_eq!(Vector::from(&[1., 2.][..]).values(), &[1., 2.]);

        let collected: Vector<i32> = (1..4).collect();
        assert_eq!(collected, Vector::from(vec![1, 2, 3]));
        assert_eq!(collected.shape(), vec![3]);
    }

    #[test]
    fn test_index() {
        let mut v = Vector::from(vec![1., 2., 3.]);
        v[1] = 5.;
        assert_eq!(v[1], 5.);
        assert_eq!(v.get(2).unwrap(), 3.);

        v.set(0, -1.).unwrap();
        assert_eq!(v.values(), &[-1., 5., 3.]);

        assert_eq!(v.get(3).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(v.set(3, 0.).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn test_index_panics() {
        let v = Vector::from(vec![1, 2]);
        let _ = v[2];
    }

    #[test]
    fn test_hadamard() {
        let a = Vector::from(vec![1., 2., 3.]);
        let b = Vector::from(vec![2., 2., 2.]);
        assert_eq!(a.hadamard(&b).unwrap().values(), &[2., 4., 6.]);
        assert_eq!((&a * &b).values(), &[2., 4., 6.]);
    }

    #[test]
    fn test_display() {
        let v = Vector::from(vec![1., 2., 3., 4.]);
        assert_eq!(
            v.to_string(),
            "4-element Vector<f64>\n( 1.0000  2.0000  3.0000  4.0000 )"
        );
    }

    #[test]
    fn test_serde() {
        let v = Vector::from(vec![1, 2, 3]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1,2,3]");
        assert_eq!(serde_json::from_str::<Vector<i32>>(&json).unwrap(), v);
    }
}
