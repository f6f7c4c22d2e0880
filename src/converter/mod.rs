pub mod converter;
pub mod filter;
pub mod raw_copy;
pub mod registry;
pub mod resize;
pub mod segmentation_mask;
