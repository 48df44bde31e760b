//! Fatal loader errors. Recoverable per-line problems are [`crate::obj::Diagnostic`]s.

use std::io;

use thiserror::Error;

use crate::layout::AttributeKind;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Failed to read OBJ source {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error(
        "Inconsistent faces definition: {kind} indices present on line {present_line} \
         but missing on line {absent_line}"
    )]
    InconsistentAttributes {
        kind: AttributeKind,
        present_line: usize,
        absent_line: usize,
    },

    #[error("OBJ {kind} index {index} out of bounds (len={len}) on line {line}")]
    IndexOutOfRange {
        line: usize,
        kind: AttributeKind,
        index: usize,
        len: usize,
    },

    #[error("Invalid attribute layout '{layout}': {reason}")]
    InvalidLayout { layout: String, reason: String },

    #[error("Layout requests {kind} attributes but the mesh defines none")]
    MissingAttribute { kind: AttributeKind },

    #[error("Too many unique vertices in OBJ (>{})", u32::MAX)]
    TooManyVertices,
}

pub type ObjResult<T> = Result<T, ObjError>;
