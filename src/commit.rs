use crate::error::TidyError;

use std::collections::BTreeSet;

/// A commit in the range being tidied, as reported by `git`.
///
/// Snapshots are fetched once per run and never mutated. `files` is kept
/// sorted so every consumer sees paths in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub subject: String,
    pub message: String,
    pub files: BTreeSet<String>,
}

impl Commit {
    pub fn new(
        sha: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
        files: BTreeSet<String>,
    ) -> Self {
        Self {
            sha: sha.into(),
            subject: subject.into(),
            message: message.into(),
            files,
        }
    }

    /// First eight characters of the object id.
    pub fn short_sha(&self) -> &str {
        short(&self.sha)
    }

    /// Splits a `%H|%s` log record into `(sha, subject)`.
    ///
    /// Only the first `|` separates the fields; the subject may contain more.
    pub fn parse_log_line(line: &str) -> Result<(String, String), TidyError> {
        match line.split_once('|') {
            Some((sha, subject)) if !sha.is_empty() => Ok((sha.to_string(), subject.to_string())),
            _ => Err(TidyError::Precondition(format!(
                "unexpected git log record: {}",
                line
            ))),
        }
    }
}

/// Abbreviates an object id to at most eight characters.
pub fn short(sha: &str) -> &str {
    match sha.char_indices().nth(8) {
        Some((i, _)) => &sha[..i],
        None => sha,
    }
}
