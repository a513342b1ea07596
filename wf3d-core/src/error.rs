//! Error types for OBJ/MTL loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for OBJ/MTL loading operations.
pub type ObjResult<T> = Result<T, ObjError>;

/// Errors that can occur while loading a model or its materials.
///
/// A failed parse never yields a partial model: the in-progress value is
/// dropped and only the error is returned.
#[derive(Debug, Error)]
pub enum ObjError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directive carried a missing or unparseable field.
    #[error("line {line}: malformed directive: {message}")]
    MalformedDirective {
        /// 1-based line number in the source file.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// A face line violated the corner grammar.
    #[error("line {line}: malformed face: {message}")]
    MalformedFace {
        /// 1-based line number in the source file.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// `usemtl` referenced a material not defined by any library parsed so
    /// far. Forward references are unsupported.
    #[error("line {line}: unknown material: {name}")]
    UnknownMaterial {
        /// 1-based line number in the source file.
        line: usize,
        /// The name that failed to resolve.
        name: String,
    },

    /// A material field directive appeared before the first `newmtl`.
    #[error("line {line}: {directive} before newmtl")]
    OrphanDirective {
        /// 1-based line number in the source file.
        line: usize,
        /// The directive keyword.
        directive: String,
    },

    /// An `illum` value outside the defined 0-10 range.
    #[error("line {line}: unknown illumination model {value}")]
    UnknownIlluminationModel {
        /// 1-based line number in the source file.
        line: usize,
        /// The rejected value.
        value: u32,
    },

    /// A texture map failed to decode.
    #[error("failed to decode texture {path}: {source}")]
    Image {
        /// Path of the image file.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// Face tables disagree in length, so the channels cannot be zipped into
    /// per-triangle buffers.
    #[error("face channel mismatch: {vertex_faces} vertex faces, {other_faces} {channel} faces")]
    FaceChannelMismatch {
        /// Number of vertex-index faces.
        vertex_faces: usize,
        /// Number of faces in the mismatched channel.
        other_faces: usize,
        /// The mismatched channel ("normal" or "texcoord").
        channel: &'static str,
    },

    /// A face referenced an index past the end of its table.
    #[error("face index {index} out of range for table of {count} entries")]
    IndexOutOfRange {
        /// The 1-based index the face carried.
        index: u32,
        /// Number of entries in the referenced table.
        count: usize,
    },
}

impl ObjError {
    /// Create a `MalformedDirective` error.
    pub fn malformed_directive(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedDirective {
            line,
            message: message.into(),
        }
    }

    /// Create a `MalformedFace` error.
    pub fn malformed_face(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedFace {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ObjError::malformed_face(7, "inconsistent corner format");
        assert!(format!("{err}").contains("line 7"));

        let err = ObjError::UnknownMaterial {
            line: 3,
            name: "gold".to_string(),
        };
        assert!(format!("{err}").contains("gold"));
    }
}
