use crate::error::ConvertError;
use crate::tensor::precision::{Layout, Precision};

/// Read-only view over one inference output blob. The bytes stay owned by
/// the inference stage and are only borrowed for the duration of a call.
#[derive(Clone, Copy, Debug)]
pub struct OutputBlob<'a> {
    data: Option<&'a [u8]>,
    precision: Precision,
    layout: Layout,
    dims: &'a [usize],
}

impl<'a> OutputBlob<'a> {
    /// `dims[0]` is the batch dimension.
    pub fn new(
        data: &'a [u8],
        precision: Precision,
        layout: Layout,
        dims: &'a [usize],
    ) -> Result<Self, ConvertError> {
        let expected = dims.iter().product::<usize>() * precision.size_in_bytes();
        if data.len() != expected {
            return Err(ConvertError::BlobSizeMismatch {
                dims: dims.to_vec(),
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data: Some(data),
            precision,
            layout,
            dims,
        })
    }

    /// A blob whose data pointer was never filled in by the inference stage.
    pub fn without_data(precision: Precision, layout: Layout, dims: &'a [usize]) -> Self {
        Self {
            data: None,
            precision,
            layout,
            dims,
        }
    }

    pub fn data(&self) -> Option<&'a [u8]> {
        self.data
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn dims(&self) -> &'a [usize] {
        self.dims
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.num_elements() * self.precision.size_in_bytes()
    }
}

/// Named blobs of one inference batch, walked in insertion order.
#[derive(Clone, Debug, Default)]
pub struct OutputBlobs<'a> {
    blobs: Vec<(String, Option<OutputBlob<'a>>)>,
}

impl<'a> OutputBlobs<'a> {
    pub fn new() -> Self {
        Self { blobs: Vec::new() }
    }

    pub fn insert(&mut self, layer_name: impl Into<String>, blob: OutputBlob<'a>) {
        self.set(layer_name.into(), Some(blob));
    }

    /// Register a layer the inference stage reported without a blob.
    pub fn insert_missing(&mut self, layer_name: impl Into<String>) {
        self.set(layer_name.into(), None);
    }

    fn set(&mut self, layer_name: String, blob: Option<OutputBlob<'a>>) {
        match self.blobs.iter_mut().find(|(name, _)| *name == layer_name) {
            Some(entry) => entry.1 = blob,
            None => self.blobs.push((layer_name, blob)),
        }
    }

    pub fn get(&self, layer_name: &str) -> Option<&OutputBlob<'a>> {
        self.blobs
            .iter()
            .find(|(name, _)| name == layer_name)
            .and_then(|(_, blob)| blob.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&OutputBlob<'a>>)> {
        self.blobs
            .iter()
            .map(|(name, blob)| (name.as_str(), blob.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
