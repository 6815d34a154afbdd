//! Error types for graph construction, solving, and image handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all seam computation operations
#[derive(Debug)]
pub enum SeamError {
    /// Failed to load a patch image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The two patch images have different dimensions
    DimensionMismatch {
        /// Dimensions of the first patch (width, height)
        first: (usize, usize),
        /// Dimensions of the second patch (width, height)
        second: (usize, usize),
    },

    /// The tile does not satisfy the square/even-size precondition
    InvalidTileSize {
        /// Tile width in pixels
        width: usize,
        /// Tile height in pixels
        height: usize,
    },

    /// An edge between this ordered node pair already exists
    DuplicateEdge {
        /// Tail node index
        from: usize,
        /// Head node index
        to: usize,
    },

    /// An edge endpoint does not name a node in the network
    UnknownNode {
        /// The offending node index
        id: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Solver internal invariant violated
    ///
    /// Negative residual capacity, an infinite-bottleneck path, a
    /// non-positive bottleneck on a purportedly valid path, or re-parenting
    /// onto a tree-less node. These indicate a bug in the solver, not bad
    /// input, and abort the computation.
    Solver {
        /// Name of the phase or operation that failed
        operation: &'static str,
        /// Description of the violated invariant
        reason: String,
    },
}

impl fmt::Display for SeamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::DimensionMismatch { first, second } => {
                write!(
                    f,
                    "Patch dimensions don't match: {}x{} vs {}x{}",
                    first.0, first.1, second.0, second.1
                )
            }
            Self::InvalidTileSize { width, height } => {
                write!(
                    f,
                    "Wang tiles must be square with even side length, got {width}x{height}"
                )
            }
            Self::DuplicateEdge { from, to } => {
                write!(f, "Edge {from} -> {to} already exists")
            }
            Self::UnknownNode { id } => {
                write!(f, "Node {id} is not part of this network")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Solver { operation, reason } => {
                write!(f, "Solver invariant violated in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for SeamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for seam computation results
pub type Result<T> = std::result::Result<T, SeamError>;

/// Create a solver-invariant error
pub fn solver_error(operation: &'static str, reason: &impl ToString) -> SeamError {
    SeamError::Solver {
        operation,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::SeamError;
    use std::error::Error;

    #[test]
    fn display_includes_context() {
        let err = SeamError::DimensionMismatch {
            first: (64, 64),
            second: (64, 32),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("64x64"));
        assert!(rendered.contains("64x32"));

        let err = SeamError::DuplicateEdge { from: 3, to: 7 };
        assert!(err.to_string().contains("3 -> 7"));
    }

    #[test]
    fn io_sources_are_exposed() {
        let err = SeamError::FileSystem {
            path: "out/tile.png".into(),
            operation: "create directory",
            source: std::io::Error::other("denied"),
        };
        assert!(err.source().is_some());

        let err = SeamError::UnknownNode { id: 12 };
        assert!(err.source().is_none());
    }
}
