//! Error type shared by every git-tidy workflow.

use thiserror::Error;

/// Errors raised while driving `git` or validating a workflow.
#[derive(Error, Debug)]
pub enum TidyError {
    /// The `git` process could not be started at all.
    #[error("failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// A required `git` invocation exited with a non-zero status.
    #[error("git command failed: {args}\nError: {stderr}")]
    Git { args: String, stderr: String },

    /// The scripted replay (`git rebase -i`) did not complete.
    #[error("rebase failed: {0}")]
    Replay(String),

    /// Input or repository state rules out the requested operation.
    #[error("{0}")]
    Precondition(String),

    /// A safety branch is already live for this workflow.
    #[error("backup branch {0} is still active")]
    BackupActive(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl TidyError {
    /// Wraps an I/O error with a short description of what was attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        TidyError::Io {
            context: context.into(),
            source,
        }
    }
}
