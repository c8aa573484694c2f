use thiserror::Error;

/// Top-level error type for shapemark.
#[derive(Debug, Error)]
pub enum ShapemarkError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Coarse classification of a failure, as seen by the user of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-positive dimension, radius, step or similar caller mistake.
    InvalidArgument,
    /// The construction cannot be realized as a valid solid.
    GeometryDegenerate,
    /// The source object lacks the requested geometric feature.
    NoGeometry,
    /// The view to delete is the one currently displayed.
    ActiveViewConflict,
    /// The host document refused or failed an operation.
    Host,
    /// A broken internal invariant (missing store entity, open wire, ...).
    Internal,
}

impl ShapemarkError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Geometry(GeometryError::ParameterOutOfRange { .. }) => ErrorKind::InvalidArgument,
            Self::Geometry(_) => ErrorKind::GeometryDegenerate,
            Self::Topology(_) | Self::Tessellation(_) => ErrorKind::Internal,
            Self::Operation(OperationError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            Self::Operation(OperationError::NoGeometry(_)) => ErrorKind::NoGeometry,
            Self::Operation(OperationError::Failed(_)) => ErrorKind::GeometryDegenerate,
            Self::Host(HostError::ActiveViewConflict) => ErrorKind::ActiveViewConflict,
            Self::Host(_) => ErrorKind::Host,
        }
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to solid construction and queries.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no geometry: {0}")]
    NoGeometry(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors reported by the host document.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no mutation scope is open")]
    NoOpenMutation,

    #[error("mutation scope '{0}' is already open")]
    MutationInProgress(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("view not found: {0}")]
    ViewNotFound(String),

    #[error("this view can't be deleted while it is opened; open another view and try again")]
    ActiveViewConflict,

    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Convenience type alias for results using [`ShapemarkError`].
pub type Result<T> = std::result::Result<T, ShapemarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let invalid: ShapemarkError = OperationError::InvalidArgument("dx".into()).into();
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let degenerate: ShapemarkError = GeometryError::Degenerate("radius".into()).into();
        assert_eq!(degenerate.kind(), ErrorKind::GeometryDegenerate);

        let missing: ShapemarkError = OperationError::NoGeometry("bbox".into()).into();
        assert_eq!(missing.kind(), ErrorKind::NoGeometry);

        let active: ShapemarkError = HostError::ActiveViewConflict.into();
        assert_eq!(active.kind(), ErrorKind::ActiveViewConflict);

        let lost: ShapemarkError = TopologyError::WireNotClosed.into();
        assert_eq!(lost.kind(), ErrorKind::Internal);
    }

    #[test]
    fn transparent_messages() {
        let err: ShapemarkError = OperationError::NoGeometry("element has no bounding box".into()).into();
        assert_eq!(err.to_string(), "no geometry: element has no bounding box");
    }
}
