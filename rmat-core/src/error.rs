//! Error types for the R-MAT core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running an R-MAT generator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RmatError {
    /// The graph must contain at least one vertex.
    #[error("vertex count must be greater than zero (got {got})")]
    InvalidVertexCount {
        /// The invalid vertex count supplied by the caller.
        got: u64,
    },
    /// The graph must contain at least one edge.
    #[error("edge count must be greater than zero (got {got})")]
    InvalidEdgeCount {
        /// The invalid edge count supplied by the caller.
        got: u64,
    },
    /// Quadrant constants were negative, non-finite, or summed past one.
    #[error(
        "R-MAT constants must be non-negative and sum to at most one (got a={a}, b={b}, c={c})"
    )]
    InvalidConstants {
        /// Likelihood of quadrant (0, 0).
        a: f32,
        /// Likelihood of quadrant (0, 1).
        b: f32,
        /// Likelihood of quadrant (1, 0).
        c: f32,
    },
    /// Noise magnitude fell outside `[0, 2]`.
    #[error("R-MAT noise must lie within [0, 2] (got {noise})")]
    InvalidNoise {
        /// The rejected noise magnitude.
        noise: f32,
    },
    /// A dedicated worker pool needs at least one thread.
    #[error("parallelism must be at least 1 (got {got})")]
    InvalidParallelism {
        /// The rejected thread count.
        got: usize,
    },
    /// The partitioner needs room for at least one block.
    #[error("maximum block count must be at least 1 (got {got})")]
    InvalidMaxBlockCount {
        /// The rejected block ceiling.
        got: usize,
    },
    /// A retry limit of zero would reject every out-of-range candidate
    /// immediately.
    #[error("retry limit must be at least 1 (got {got})")]
    InvalidRetryLimit {
        /// The rejected limit.
        got: u64,
    },
    /// The partitioner was asked to split zero elements.
    #[error("cannot partition an empty workload into blocks")]
    EmptyWorkload,
    /// A block discarded more consecutive candidates than the configured
    /// retry limit allows.
    #[error("block {block} exceeded the retry limit of {limit} rejected candidates for one edge")]
    RetryLimitExceeded {
        /// Index of the block that gave up.
        block: u64,
        /// The configured per-edge retry limit.
        limit: u64,
    },
    /// The dedicated worker pool could not be started.
    #[error("failed to start worker pool: {message}")]
    ThreadPool {
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`RmatError`] variants.
    enum RmatErrorCode for RmatError {
        /// The graph must contain at least one vertex.
        InvalidVertexCount => InvalidVertexCount { .. } => "RMAT_INVALID_VERTEX_COUNT",
        /// The graph must contain at least one edge.
        InvalidEdgeCount => InvalidEdgeCount { .. } => "RMAT_INVALID_EDGE_COUNT",
        /// Quadrant constants were negative, non-finite, or summed past one.
        InvalidConstants => InvalidConstants { .. } => "RMAT_INVALID_CONSTANTS",
        /// Noise magnitude fell outside `[0, 2]`.
        InvalidNoise => InvalidNoise { .. } => "RMAT_INVALID_NOISE",
        /// A dedicated worker pool needs at least one thread.
        InvalidParallelism => InvalidParallelism { .. } => "RMAT_INVALID_PARALLELISM",
        /// The partitioner needs room for at least one block.
        InvalidMaxBlockCount => InvalidMaxBlockCount { .. } => "RMAT_INVALID_MAX_BLOCK_COUNT",
        /// The retry limit must be positive.
        InvalidRetryLimit => InvalidRetryLimit { .. } => "RMAT_INVALID_RETRY_LIMIT",
        /// The partitioner was asked to split zero elements.
        EmptyWorkload => EmptyWorkload => "RMAT_EMPTY_WORKLOAD",
        /// A block exceeded the configured retry limit.
        RetryLimitExceeded => RetryLimitExceeded { .. } => "RMAT_RETRY_LIMIT_EXCEEDED",
        /// The dedicated worker pool could not be started.
        ThreadPoolFailure => ThreadPool { .. } => "RMAT_THREAD_POOL_FAILURE",
    }
}

impl RmatError {
    /// Returns `true` for errors raised while validating configuration, before
    /// any generation work starts.
    ///
    /// # Examples
    /// ```
    /// use rmat_core::RmatError;
    ///
    /// assert!(RmatError::InvalidNoise { noise: 2.5 }.is_configuration());
    /// assert!(!RmatError::EmptyWorkload.is_configuration());
    /// ```
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidVertexCount { .. }
                | Self::InvalidEdgeCount { .. }
                | Self::InvalidConstants { .. }
                | Self::InvalidNoise { .. }
                | Self::InvalidParallelism { .. }
                | Self::InvalidMaxBlockCount { .. }
                | Self::InvalidRetryLimit { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RmatError>;
