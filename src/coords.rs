use super::{error, ErrorKind, Result};

/// An n-dimensional coordinate.
pub type Coord = Vec<usize>;

/// The row-major stride of each axis of the given `shape`, i.e. the number of elements
/// between consecutive indices along that axis.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    (0..shape.len())
        .map(|axis| shape[axis + 1..].iter().product())
        .collect()
}

/// Compute the offset of `coord` in a row-major buffer with the given `shape`.
pub fn offset_of(shape: &[usize], coord: &[usize]) -> Result<usize> {
    if coord.len() != shape.len() {
        return Err(error(
            ErrorKind::IndexOutOfRange,
            format!(
                "coordinate {:?} does not have the {} dimensions of shape {:?}",
                coord,
                shape.len(),
                shape
            ),
        ));
    }

    if coord.iter().zip(shape).any(|(i, dim)| i >= dim) {
        return Err(error(
            ErrorKind::IndexOutOfRange,
            format!("coordinate {:?} is out of bounds for shape {:?}", coord, shape),
        ));
    }

    Ok(coord
        .iter()
        .zip(strides(shape))
        .map(|(i, stride)| i * stride)
        .sum())
}

/// Compute the coordinate of the element at `offset` in a row-major buffer with the given
/// `shape`.
///
/// Panics: if `offset` is not less than the product of `shape`.
pub fn coord_of(shape: &[usize], offset: usize) -> Coord {
    assert!(
        offset < shape.iter().product(),
        "offset {} is out of bounds for shape {:?}",
        offset,
        shape
    );

    strides(shape)
        .into_iter()
        .zip(shape)
        .map(|(stride, dim)| (offset / stride) % dim)
        .collect()
}
