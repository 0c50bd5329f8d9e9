use std::ops::{Deref, DerefMut};
use std::slice::Iter;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{error, ErrorKind, Result};

/// An owned, contiguous block of elements.
///
/// A `Buffer` is the only owner of its storage: it is never reference counted and never
/// aliased by another container. Cloning a `Buffer` copies its contents. The storage is released
/// when the `Buffer` is dropped.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Buffer<T> {
    data: Box<[T]>,
}

impl<T: Copy> Buffer<T> {
    /// Allocate a buffer of `count` default-valued (i.e. zero) elements.
    pub fn allocate(count: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::filled(count, T::default())
    }

    /// Allocate a buffer of `count` elements, each initialized to `value`.
    pub fn filled(count: usize, value: T) -> Result<Self> {
        let mut data = reserve(count)?;
        data.resize(count, value);
        Ok(Self::from(data))
    }

    /// Allocate a buffer holding a copy of the given `values`.
    pub fn copy_from_slice(values: &[T]) -> Result<Self> {
        let mut data = reserve(values.len())?;
        data.extend_from_slice(values);
        Ok(Self::from(data))
    }
}

impl<T> Buffer<T> {
    /// The number of elements in this buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }
}

fn reserve<T>(count: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(count).map_err(|cause| {
        error(
            ErrorKind::InvalidSize,
            format!("cannot allocate a buffer of {} elements: {}", count, cause),
        )
    })?;

    Ok(data)
}

impl<T> Deref for Buffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for Buffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    fn from(values: Vec<T>) -> Self {
        Self {
            data: values.into_boxed_slice(),
        }
    }
}

impl<T> FromIterator<T> for Buffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for Buffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Buffer<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}
