use thiserror::Error;

/// Failures of the claim-checking pipeline.
///
/// Only `InvalidInput` and `Config` are ever returned to callers. The
/// `*Unavailable` and `Timeout` variants describe collaborator failures that
/// the pipeline absorbs and logs before degrading to a weaker signal.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Empty or whitespace-only claim.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    /// Search collaborator failed or timed out.
    #[error("evidence unavailable: {0}")]
    EvidenceUnavailable(String),

    /// NLI collaborator failed or returned malformed output.
    #[error("inference unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("timeout: exceeded {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}

pub type CheckResult<T> = Result<T, CheckError>;
