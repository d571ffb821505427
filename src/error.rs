use std::{io, process::ExitStatus};
use thiserror::Error;

/// Failure modes of a balancing run. Already-balanced and nothing-to-give
/// outcomes are normal terminations, not errors.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The scheduler CLI itself could not be invoked.
    #[error("could not invoke {command}: {source}")]
    QueueUnavailable {
        command: &'static str,
        #[source]
        source: io::Error,
    },

    /// The queue listing command ran but reported failure.
    #[error("{command} exited with {status}: {stderr}")]
    QueueCommandFailed {
        command: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    /// The queue listing came back in a shape we refuse to act on.
    #[error("queue listing is corrupt: {reason}")]
    QueueCorrupt { reason: String },

    /// More than two accounts hold priority-pending jobs, so the
    /// two-account giver/taker move is not actionable.
    #[error("{0} accounts hold priority-pending jobs; expected at most two")]
    TooManyAccounts(usize),

    /// The account pair option did not contain exactly two names.
    #[error("expected exactly two billing accounts, got {0}")]
    AccountPair(usize),
}
