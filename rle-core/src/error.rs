use thiserror::Error;

/// Failure modes for interval arithmetic and run-container operations.
///
/// The first three variants are programmer errors: the caller violated a
/// documented precondition (e.g. merging disjoint intervals, selecting a
/// rank beyond the cardinality, advancing an exhausted iterator). Callers
/// are expected to treat them as bugs rather than handle them as part of
/// normal control flow. `MalformedInput` and `Io` are the only variants a
/// well-behaved caller can expect to observe in practice, since they come
/// from parsing untrusted bytes at a deserialization boundary.
#[derive(Error, Debug)]
pub enum RleError {
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    #[error("rank {rank} is out of range for cardinality {cardinality}")]
    OutOfRange { rank: u64, cardinality: u64 },

    #[error("iterator exhausted")]
    ExhaustedIterator,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type RleResult<T> = Result<T, RleError>;
