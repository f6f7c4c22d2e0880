use serde::{Deserialize, Serialize};

/// Input geometry of the model, fixed for the lifetime of a converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInputImageInfo {
    pub width: usize,
    pub height: usize,
    pub batch_size: usize,
}

impl ModelInputImageInfo {
    pub fn new(width: usize, height: usize, batch_size: usize) -> Self {
        Self {
            width,
            height,
            batch_size,
        }
    }
}
