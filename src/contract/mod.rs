//! Model contract: the input/output schema shipped with every package
//!
//! The contract is a protobuf message with two on-disk encodings selected by
//! file extension: `.protobin` (canonical wire format) and `.prototxt`
//! (human-readable text format, see [`text`]). Loading from either and
//! serializing back is lossless; packing always writes the binary encoding.

mod reader;
pub mod text;

pub use reader::{read_contract, ContractFormat};

use prost::Message;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from contract reading, parsing, and decoding.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The contract file's extension maps to no known encoding.
    #[error("unsupported contract extension {extension:?} (expected .protobin or .prototxt)")]
    UnsupportedFormat { extension: String },

    /// The contract file could not be read.
    #[error("failed to read contract {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The binary encoding did not decode as a contract message.
    #[error("invalid binary contract: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The text encoding did not parse.
    #[error("invalid text contract at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Element type of a tensor field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    Invalid = 0,
    Float32 = 1,
    Float64 = 2,
    Int32 = 3,
    Int64 = 4,
    Uint8 = 5,
    String = 6,
    Bool = 7,
}

impl DataType {
    /// Wire name used by the text encoding (e.g. `FLOAT32`).
    pub fn as_str_name(self) -> &'static str {
        match self {
            DataType::Invalid => "INVALID",
            DataType::Float32 => "FLOAT32",
            DataType::Float64 => "FLOAT64",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Uint8 => "UINT8",
            DataType::String => "STRING",
            DataType::Bool => "BOOL",
        }
    }

    /// Inverse of [`as_str_name`](Self::as_str_name).
    pub fn from_str_name(name: &str) -> Option<DataType> {
        match name {
            "INVALID" => Some(DataType::Invalid),
            "FLOAT32" => Some(DataType::Float32),
            "FLOAT64" => Some(DataType::Float64),
            "INT32" => Some(DataType::Int32),
            "INT64" => Some(DataType::Int64),
            "UINT8" => Some(DataType::Uint8),
            "STRING" => Some(DataType::String),
            "BOOL" => Some(DataType::Bool),
            _ => None,
        }
    }
}

/// Tensor dimensionality; `-1` marks a variable dimension.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorShape {
    #[prost(int64, repeated, tag = "1")]
    pub dims: Vec<i64>,
}

/// One named input or output of a signature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelField {
    #[prost(string, tag = "1")]
    pub name: String,

    /// Absent shape means scalar.
    #[prost(message, optional, tag = "2")]
    pub shape: Option<TensorShape>,

    #[prost(enumeration = "DataType", tag = "3")]
    pub dtype: i32,
}

impl ModelField {
    /// The field's data type, or `Invalid` if the stored tag is unknown.
    pub fn data_type(&self) -> DataType {
        DataType::try_from(self.dtype).unwrap_or(DataType::Invalid)
    }
}

/// One callable surface of the model (e.g. `predict`).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelSignature {
    #[prost(string, tag = "1")]
    pub signature_name: String,

    #[prost(message, repeated, tag = "2")]
    pub inputs: Vec<ModelField>,

    #[prost(message, repeated, tag = "3")]
    pub outputs: Vec<ModelField>,
}

/// The full interface contract of a model.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelContract {
    #[prost(string, tag = "1")]
    pub model_name: String,

    #[prost(message, repeated, tag = "2")]
    pub signatures: Vec<ModelSignature>,
}

impl ModelContract {
    /// Serialize to the canonical binary encoding.
    pub fn to_binary(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Decode from the canonical binary encoding.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, ContractError> {
        Ok(Self::decode(bytes)?)
    }
}

impl std::fmt::Display for ModelContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", text::render(self))
    }
}
