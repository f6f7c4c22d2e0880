use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected while setting a converter up, fatal to pipeline startup
    Configuration,
    /// Bad blob or frame, the item is skipped
    InputValidation,
    /// Resize/reshape failure, the record is skipped
    Processing,
}

#[derive(Error, Debug)]
pub enum ConvertError {
    // Configuration errors
    #[error("Unknown converter: {0}")]
    UnknownConverter(String),

    #[error("Converter already registered: {0}")]
    DuplicateConverter(String),

    #[error("Invalid converter config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    // Input validation errors
    #[error("Output blob is empty: {0}")]
    NullBlob(String),

    #[error("Output blob has no data: {0}")]
    NullData(String),

    #[error("Blob of {total_bytes} bytes cannot be split into {batch_size} frames")]
    BatchSizeMismatch { total_bytes: usize, batch_size: usize },

    #[error("Blob holds {actual} bytes but its dims {dims:?} need {expected}")]
    BlobSizeMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Frame index {frame_index} out of range for batch of {batch_size}")]
    FrameOutOfRange { frame_index: usize, batch_size: usize },

    // Processing errors
    #[error("Unsupported precision: {0:?}")]
    UnsupportedPrecision(crate::tensor::precision::Precision),

    #[error("Blob declares a {declared_width}x{declared_height} plane but the configured source is {configured_width}x{configured_height}")]
    SourceResolutionMismatch {
        declared_width: usize,
        declared_height: usize,
        configured_width: usize,
        configured_height: usize,
    },

    #[error("Expected {expected} elements per frame, got {actual}")]
    ElementCountMismatch { expected: usize, actual: usize },

    #[error("Payload of {actual} bytes does not match dims {dims:?} ({expected} bytes)")]
    PayloadSizeMismatch {
        dims: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Dimension {0} does not fit in u32")]
    DimOverflow(usize),

    #[error("Resize buffer error: {0}")]
    ResizeBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownConverter(_)
            | Self::DuplicateConverter(_)
            | Self::InvalidConfig(_)
            | Self::ConfigParse(_) => ErrorKind::Configuration,
            Self::NullBlob(_)
            | Self::NullData(_)
            | Self::BatchSizeMismatch { .. }
            | Self::BlobSizeMismatch { .. }
            | Self::FrameOutOfRange { .. } => ErrorKind::InputValidation,
            Self::UnsupportedPrecision(_)
            | Self::SourceResolutionMismatch { .. }
            | Self::ElementCountMismatch { .. }
            | Self::PayloadSizeMismatch { .. }
            | Self::DimOverflow(_)
            | Self::ResizeBuffer(_)
            | Self::Resize(_)
            | Self::IoError(_)
            | Self::Context { .. } => ErrorKind::Processing,
        }
    }

    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
