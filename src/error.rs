//! Error types for marga-traj.

use thiserror::Error;

/// Trajectory generation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Bad caller-supplied data: too few waypoints, an over-limit waypoint
    /// velocity, an update on a path that does not support it, or a tank
    /// projection of a non-tank trajectory.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A waypoint velocity constraint cannot be satisfied within the
    /// acceleration limit.
    #[error("constraint infeasible: {0}")]
    ConstraintInfeasible(String),

    /// The quintic coefficient system has no solution.
    #[error("matrix is singular")]
    SingularMatrix,

    /// An arc-length lookup was attempted before the table was built.
    #[error("arc-length table not generated; call compute_len first")]
    LookupNotReady,

    /// Gauss-Jordan elimination was asked to reduce a system with more
    /// rows than columns.
    #[error("domain out of range: {0}")]
    DomainOutOfRange(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
