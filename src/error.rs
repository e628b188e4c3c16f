// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "PARSE_ERROR")]
    Parse,
    #[serde(rename = "POSITION_LOST")]
    PositionLost,
    #[serde(rename = "INTERNAL_ERROR")]
    Unclassified,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Parse => "PARSE_ERROR",
            ErrorCode::PositionLost => "POSITION_LOST",
            ErrorCode::Unclassified => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Resolves a byte offset into `source`. Offsets past the end clamp to the last position.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let mut offset = (offset as usize).min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() as u32 + 1;
        SourceLocation { line, column }
    }
}

/// The single failure shape that leaves the compiler.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {file_id}: {message}{}", location_suffix(.location))]
pub struct CompilerError {
    pub file_id: String,
    pub code: ErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub cause: Option<String>,
}

fn location_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!(" ({}:{})", loc.line, loc.column),
        None => String::new(),
    }
}

impl CompilerError {
    pub fn new(code: ErrorCode, file_id: &str, message: impl Into<String>) -> Self {
        CompilerError {
            file_id: file_id.to_string(),
            code,
            message: message.into(),
            location: None,
            cause: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Wraps a generator failure, resolving its position against `source` when it has one.
    pub fn from_generate(err: GenerateError, file_id: &str, source: &str) -> Self {
        let message = err.to_string();
        match err {
            GenerateError::PositionLost { start, end } => {
                let mut out = CompilerError::new(ErrorCode::PositionLost, file_id, message);
                if start <= end && (end as usize) <= source.len() {
                    out = out.with_location(SourceLocation::from_offset(source, start));
                }
                out
            }
            GenerateError::Unsupported { .. } | GenerateError::NotStatic => {
                CompilerError::new(ErrorCode::Unclassified, file_id, message)
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }
}

/// Failures raised while generating code for one node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("node at {start}..{end} has no resolvable source position")]
    PositionLost { start: u32, end: u32 },
    #[error("unsupported syntax in markup: {what}")]
    Unsupported { what: &'static str },
    #[error("element is not static and cannot be serialized as a template")]
    NotStatic,
}

pub type GenResult<T = String> = Result<T, GenerateError>;
