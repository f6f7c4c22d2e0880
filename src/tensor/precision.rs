use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    FP32,
    FP16,
    FP64,
    U8,
    I8,
    U16,
    I16,
    I32,
    I64,
    U64,
}

impl Precision {
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Precision::U8 | Precision::I8 => 1,
            Precision::FP16 | Precision::U16 | Precision::I16 => 2,
            Precision::FP32 | Precision::I32 => 4,
            Precision::FP64 | Precision::I64 | Precision::U64 => 8,
        }
    }

    // Integer codes carried by the `precision` field of attached tensors
    pub fn code(&self) -> i32 {
        match self {
            Precision::FP32 => 10,
            Precision::FP16 => 11,
            Precision::FP64 => 13,
            Precision::I16 => 30,
            Precision::U8 => 40,
            Precision::I8 => 50,
            Precision::U16 => 60,
            Precision::I32 => 70,
            Precision::I64 => 72,
            Precision::U64 => 73,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let precision = match code {
            10 => Precision::FP32,
            11 => Precision::FP16,
            13 => Precision::FP64,
            30 => Precision::I16,
            40 => Precision::U8,
            50 => Precision::I8,
            60 => Precision::U16,
            70 => Precision::I32,
            72 => Precision::I64,
            73 => Precision::U64,
            _ => return None,
        };
        Some(precision)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    Any,
    NCHW,
    NHWC,
    CHW,
    HW,
    NC,
    C,
}

impl Layout {
    pub fn code(&self) -> i32 {
        match self {
            Layout::Any => 0,
            Layout::NCHW => 1,
            Layout::NHWC => 2,
            Layout::C => 96,
            Layout::CHW => 128,
            Layout::HW => 192,
            Layout::NC => 193,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let layout = match code {
            0 => Layout::Any,
            1 => Layout::NCHW,
            2 => Layout::NHWC,
            96 => Layout::C,
            128 => Layout::CHW,
            192 => Layout::HW,
            193 => Layout::NC,
            _ => return None,
        };
        Some(layout)
    }
}
