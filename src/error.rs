use std::fmt;
use std::io;
use std::path::PathBuf;

/// Field being decoded when the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Header,
    TriangleCount,
    Normal,
    Vertex(u8),
    AttributeCount,
    Attributes,
    VertexCount,
    VertexData,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Header => write!(f, "80-byte header"),
            Field::TriangleCount => write!(f, "triangle count"),
            Field::Normal => write!(f, "normal vector"),
            Field::Vertex(n) => write!(f, "vertex {}", n),
            Field::AttributeCount => write!(f, "attribute byte count"),
            Field::Attributes => write!(f, "attribute bytes"),
            Field::VertexCount => write!(f, "vertex count"),
            Field::VertexData => write!(f, "vertex data"),
        }
    }
}

/// Errors raised while converting a mesh.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("input truncated while reading {field}{}", triangle_suffix(.triangle))]
    Truncated { field: Field, triangle: Option<u32> },

    #[error("{triangles} triangles overflow the u32 vertex count")]
    CountOverflow { triangles: u32 },

    #[error("output {} would overwrite its own source", .path.display())]
    SameFile { path: PathBuf },

    #[error("output {} is also produced by {}", .output.display(), .first.display())]
    OutputCollision { output: PathBuf, first: PathBuf },

    #[error("declared triangle count needs at least {expected} bytes, file has {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
}

fn triangle_suffix(triangle: &Option<u32>) -> String {
    match triangle {
        Some(index) => format!(" of triangle {}", index),
        None => String::new(),
    }
}

impl ConvertError {
    /// Map a failed read to `Truncated` when the input simply ended early.
    pub(crate) fn from_read(err: io::Error, field: Field, triangle: Option<u32>) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ConvertError::Truncated { field, triangle }
        } else {
            ConvertError::Read(err)
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, ConvertError::Truncated { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_maps_to_truncated() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let converted = ConvertError::from_read(err, Field::Vertex(2), Some(4));
        assert!(converted.is_truncated());
        assert_eq!(
            converted.to_string(),
            "input truncated while reading vertex 2 of triangle 4"
        );
    }

    #[test]
    fn test_other_io_errors_stay_read_errors() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let converted = ConvertError::from_read(err, Field::Header, None);
        assert!(matches!(converted, ConvertError::Read(_)));
    }
}
