use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Converter settings read from the surrounding element's properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub converter: String,
    pub model_name: String,
    pub model_name_filter: Option<String>,
    pub layer_name_filter: Option<String>,
    // Inference batch, when it differs from the model input batch
    pub source_batch_size: Option<usize>,
    // Legacy plane size for flat segmentation blobs
    pub source_width: Option<usize>,
    pub source_height: Option<usize>,
}

impl ConverterConfig {
    pub fn build(self) -> Result<Self, ConvertError> {
        check_filter("model_name_filter", self.model_name_filter.as_deref())?;
        check_filter("layer_name_filter", self.layer_name_filter.as_deref())?;

        if self.converter.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("converter name is empty".to_string()));
        }

        if self.source_batch_size == Some(0) {
            return Err(ConvertError::InvalidConfig("source_batch_size must be positive".to_string()));
        }

        match (self.source_width, self.source_height) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(ConvertError::InvalidConfig("source resolution must be positive".to_string()))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConvertError::InvalidConfig(
                    "source_width and source_height must be set together".to_string(),
                ))
            }
            _ => {}
        }

        Ok(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let config: Self = serde_json::from_str(json)?;
        config.build()
    }

    pub fn source_resolution(&self) -> Option<(usize, usize)> {
        self.source_width.zip(self.source_height)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            converter: "raw_data_copy".to_string(),
            model_name: String::new(),
            model_name_filter: None,
            layer_name_filter: None,
            source_batch_size: None,
            source_width: None,
            source_height: None,
        }
    }
}

fn check_filter(field: &str, filter: Option<&str>) -> Result<(), ConvertError> {
    if let Some(filter) = filter {
        if filter.is_empty() {
            return Err(ConvertError::InvalidConfig(format!("{} is empty", field)));
        }
    }
    Ok(())
}
