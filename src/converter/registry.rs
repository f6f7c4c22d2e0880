use std::collections::HashMap;

use tracing::debug;

use crate::{config::ConverterConfig, error::ConvertError, model_info::ModelInputImageInfo};

use super::{
    converter::{BlobToTensorConverter, ConverterInitializer},
    raw_copy::RawCopyConverter,
    segmentation_mask::SegmentationMaskConverter,
};

pub type ConverterFactory = fn(ConverterInitializer) -> Box<dyn BlobToTensorConverter>;

/// Converter name to factory. Consulted once per pipeline configuration.
pub struct ConverterRegistry {
    factories: HashMap<String, ConverterFactory>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(RawCopyConverter::NAME.to_string(), raw_data_copy);
        registry
            .factories
            .insert(SegmentationMaskConverter::NAME.to_string(), segmentation_mask);
        registry
    }

    pub fn register(&mut self, name: &str, factory: ConverterFactory) -> Result<(), ConvertError> {
        if self.factories.contains_key(name) {
            return Err(ConvertError::DuplicateConverter(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate `config` and build the converter it names.
    pub fn create(
        &self,
        config: ConverterConfig,
        model_input: ModelInputImageInfo,
    ) -> Result<Box<dyn BlobToTensorConverter>, ConvertError> {
        let config = config.build()?;
        let factory = self
            .factories
            .get(&config.converter)
            .ok_or_else(|| ConvertError::UnknownConverter(config.converter.clone()))?;

        debug!(converter = %config.converter, model = %config.model_name, "creating converter");
        Ok(factory(ConverterInitializer::from_config(&config, model_input)))
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

fn raw_data_copy(init: ConverterInitializer) -> Box<dyn BlobToTensorConverter> {
    Box::new(RawCopyConverter::new(init))
}

fn segmentation_mask(init: ConverterInitializer) -> Box<dyn BlobToTensorConverter> {
    Box::new(SegmentationMaskConverter::new(init))
}
