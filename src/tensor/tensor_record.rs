use std::collections::BTreeMap;

use crate::error::ConvertError;

use super::precision::{Layout, Precision};

/// Value of one field in the structure attached to a frame buffer.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Str(String),
    UIntArray(Vec<u32>),
    Bytes(Vec<u8>),
}

/// Named, ordered field list handed to the host buffer format.
///
/// Field names are read by downstream consumers and must stay stable:
/// `layer_name`, `model_name`, `precision`, `layout`, `format`, `dims`,
/// `tensor_id` and `data_buffer`.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorStructure {
    pub name: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl TensorStructure {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, field: &str) -> Option<i32> {
        match self.get(field) {
            Some(FieldValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// One converted tensor. The payload is owned by the record and its size
/// always equals `product(dims) * precision.size_in_bytes()`.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorRecord {
    name: String,
    layer_name: String,
    model_name: String,
    precision: Precision,
    layout: Layout,
    dims: Vec<usize>,
    payload: Vec<u8>,
    tensor_id: Option<i32>,
    format: Option<String>,
    extra: BTreeMap<String, FieldValue>,
}

impl TensorRecord {
    pub fn new(
        name: impl Into<String>,
        precision: Precision,
        layout: Layout,
        dims: Vec<usize>,
        payload: Vec<u8>,
    ) -> Result<Self, ConvertError> {
        if let Some(&dim) = dims.iter().find(|&&d| u32::try_from(d).is_err()) {
            return Err(ConvertError::DimOverflow(dim));
        }

        let expected = dims.iter().product::<usize>() * precision.size_in_bytes();
        if payload.len() != expected {
            return Err(ConvertError::PayloadSizeMismatch {
                dims,
                expected,
                actual: payload.len(),
            });
        }

        let name = name.into();
        Ok(Self {
            layer_name: name.clone(),
            name,
            model_name: String::new(),
            precision,
            layout,
            dims,
            payload,
            tensor_id: None,
            format: None,
            extra: BTreeMap::new(),
        })
    }

    pub fn with_layer_name(mut self, layer_name: impl Into<String>) -> Self {
        self.layer_name = layer_name.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_tensor_id(mut self, tensor_id: i32) -> Self {
        self.tensor_id = Some(tensor_id);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn tensor_id(&self) -> Option<i32> {
        self.tensor_id
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn extra(&self) -> &BTreeMap<String, FieldValue> {
        &self.extra
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Payload read back as `f32`, only for FP32 records.
    pub fn to_f32(&self) -> Option<Vec<f32>> {
        if self.precision != Precision::FP32 {
            return None;
        }
        Some(
            self.payload
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    /// Move the record into the structure attached to a frame buffer.
    pub fn into_structure(self) -> TensorStructure {
        let mut fields = vec![
            ("layer_name".to_string(), FieldValue::Str(self.layer_name)),
            ("model_name".to_string(), FieldValue::Str(self.model_name)),
            ("precision".to_string(), FieldValue::Int(self.precision.code())),
            ("layout".to_string(), FieldValue::Int(self.layout.code())),
            // empty string when unset
            ("format".to_string(), FieldValue::Str(self.format.unwrap_or_default())),
        ];
        // dims were checked to fit in u32 on construction
        fields.push((
            "dims".to_string(),
            FieldValue::UIntArray(self.dims.iter().map(|&d| d as u32).collect()),
        ));
        if let Some(tensor_id) = self.tensor_id {
            fields.push(("tensor_id".to_string(), FieldValue::Int(tensor_id)));
        }
        fields.push(("data_buffer".to_string(), FieldValue::Bytes(self.payload)));
        fields.extend(self.extra);

        TensorStructure {
            name: self.name,
            fields,
        }
    }
}
