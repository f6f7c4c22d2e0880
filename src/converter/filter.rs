use crate::tensor::tensor_record::TensorRecord;

/// Selects blobs and tensors by model and layer name. A filter matches any
/// name that contains it; an unset filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConverterFilter {
    pub model_name: Option<String>,
    pub layer_name: Option<String>,
}

impl ConverterFilter {
    pub fn new(model_name: Option<String>, layer_name: Option<String>) -> Self {
        Self { model_name, layer_name }
    }

    pub fn matches_model(&self, model_name: &str) -> bool {
        contains(self.model_name.as_deref(), model_name)
    }

    pub fn matches_layer(&self, layer_name: &str) -> bool {
        contains(self.layer_name.as_deref(), layer_name)
    }

    pub fn matches(&self, record: &TensorRecord) -> bool {
        self.matches_model(record.model_name()) && self.matches_layer(record.layer_name())
    }
}

fn contains(filter: Option<&str>, candidate: &str) -> bool {
    filter.map_or(true, |filter| candidate.contains(filter))
}
