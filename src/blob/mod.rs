pub mod output_blob;
pub mod sample;
pub mod slicing;
