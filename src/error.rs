//! Error types for the cushion calculator.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::CalculationResult;

/// Error codes for calculator failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty input (-2)
    EmptyInput = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Unsupported input format (-4)
    UnsupportedFormat = -4,
    /// Invalid argument supplied by the caller (-5)
    InvalidArgument = -5,
    /// Formulas drifted from the reference cases (E900, STRICT_AUDIT_MISMATCH)
    StrictAuditMismatch = 900,
}

/// Main error type for the calculator.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty input: {path}")]
    EmptyInput { path: PathBuf },

    #[error("Unsupported file format '{extension}' (expected csv, json or xlsx)")]
    UnsupportedFormat { extension: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {message}")]
    Spreadsheet { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of objects, found {found}")]
    InvalidJsonShape { found: String },

    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        expected: String,
        value: String,
    },

    #[error("Invalid family code '{code}': {reason}")]
    InvalidFamily { code: String, reason: String },

    #[error(
        "Formula audit failed: reference results drifted (40x50 -> {first:?}, 40x40 -> {second:?})"
    )]
    FormulaAudit {
        first: Box<CalculationResult>,
        second: Box<CalculationResult>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalcError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CalcError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CalcError::EmptyInput { .. } => ErrorCode::EmptyInput,
            CalcError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            CalcError::Csv(_) => ErrorCode::ParseError,
            CalcError::Spreadsheet { .. } => ErrorCode::ParseError,
            CalcError::Json(_) => ErrorCode::ParseError,
            CalcError::InvalidJsonShape { .. } => ErrorCode::ParseError,
            CalcError::InvalidValue { .. } => ErrorCode::InvalidArgument,
            CalcError::InvalidFamily { .. } => ErrorCode::InvalidArgument,
            CalcError::FormulaAudit { .. } => ErrorCode::StrictAuditMismatch,
            CalcError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether the application must stop before doing anything else.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CalcError::FormulaAudit { .. })
    }
}

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;
