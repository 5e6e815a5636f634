use std::sync::Arc;

use rmat_core::{RmatError, RmatErrorCode};
use rstest::rstest;

#[rstest]
#[case(RmatError::InvalidVertexCount { got: 0 }, RmatErrorCode::InvalidVertexCount, "RMAT_INVALID_VERTEX_COUNT")]
#[case(RmatError::InvalidEdgeCount { got: 0 }, RmatErrorCode::InvalidEdgeCount, "RMAT_INVALID_EDGE_COUNT")]
#[case(
    RmatError::InvalidConstants { a: 0.5, b: 0.5, c: 0.5 },
    RmatErrorCode::InvalidConstants,
    "RMAT_INVALID_CONSTANTS",
)]
#[case(RmatError::InvalidNoise { noise: 2.5 }, RmatErrorCode::InvalidNoise, "RMAT_INVALID_NOISE")]
#[case(
    RmatError::InvalidParallelism { got: 0 },
    RmatErrorCode::InvalidParallelism,
    "RMAT_INVALID_PARALLELISM",
)]
#[case(
    RmatError::InvalidMaxBlockCount { got: 0 },
    RmatErrorCode::InvalidMaxBlockCount,
    "RMAT_INVALID_MAX_BLOCK_COUNT",
)]
#[case(
    RmatError::InvalidRetryLimit { got: 0 },
    RmatErrorCode::InvalidRetryLimit,
    "RMAT_INVALID_RETRY_LIMIT",
)]
#[case(RmatError::EmptyWorkload, RmatErrorCode::EmptyWorkload, "RMAT_EMPTY_WORKLOAD")]
#[case(
    RmatError::RetryLimitExceeded { block: 2, limit: 8 },
    RmatErrorCode::RetryLimitExceeded,
    "RMAT_RETRY_LIMIT_EXCEEDED",
)]
#[case(
    RmatError::ThreadPool { message: Arc::from("no threads") },
    RmatErrorCode::ThreadPoolFailure,
    "RMAT_THREAD_POOL_FAILURE",
)]
fn returns_expected_code(
    #[case] error: RmatError,
    #[case] expected: RmatErrorCode,
    #[case] rendered: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), rendered);
    assert_eq!(error.code().to_string(), rendered);
}

#[rstest]
fn messages_name_offending_values() {
    let err = RmatError::InvalidConstants {
        a: -0.1,
        b: 0.1,
        c: 0.1,
    };
    assert!(err.to_string().contains("a=-0.1"));
    let err = RmatError::RetryLimitExceeded { block: 4, limit: 9 };
    assert_eq!(
        err.to_string(),
        "block 4 exceeded the retry limit of 9 rejected candidates for one edge"
    );
}
