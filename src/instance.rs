use super::{Buffer, DType, Element};

/// Common accessors of every shaped container.
pub trait ArrayInstance: Sized {
    type DType: Element;

    /// The dimensions of this container, outermost first.
    fn shape(&self) -> Vec<usize>;

    fn buffer(&self) -> &Buffer<Self::DType>;

    fn buffer_mut(&mut self) -> &mut Buffer<Self::DType>;

    /// Construct a container with the same shape as `self` around the given `buffer`.
    ///
    /// The caller must ensure that `buffer` has exactly [`ArrayInstance::len`] elements.
    fn with_buffer(&self, buffer: Buffer<Self::DType>) -> Self;

    fn into_buffer(self) -> Buffer<Self::DType>;

    fn dtype(&self) -> DType {
        Self::DType::DTYPE
    }

    fn len(&self) -> usize {
        self.buffer().len()
    }

    fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    /// The elements of this container in row-major order.
    fn values(&self) -> &[Self::DType] {
        self.buffer().as_slice()
    }

    fn values_mut(&mut self) -> &mut [Self::DType] {
        self.buffer_mut().as_mut_slice()
    }

    fn to_vec(&self) -> Vec<Self::DType> {
        self.values().to_vec()
    }

    fn into_vec(self) -> Vec<Self::DType> {
        self.into_buffer().into_vec()
    }
}
