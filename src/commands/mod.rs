//! Workflows behind each subcommand.
//!
//! Every workflow takes a typed options struct, talks to git only through
//! the [`Git`](crate::git::Git) trait and returns an
//! [`Outcome`](crate::backup::Outcome) or a [`TidyError`].

pub mod chunked;
pub mod configure;
pub mod group;
pub mod inspect;
pub mod merge;
pub mod preflight;
pub mod rerere;
pub mod resume;
pub mod revert;
pub mod skip_merged;
pub mod smart_rebase;
pub mod split;
pub mod squash;

use crate::error::TidyError;
use crate::git::Git;

use tracing::warn;

/// Which side wins a conflicting hunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConflictBias {
    Ours,
    Theirs,
    #[default]
    None,
}

/// Merge settings shared by the replay, merge and revert workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTuning {
    /// Prefix every git call with the safe `-c` settings.
    pub optimize_merge: bool,
    pub conflict_bias: ConflictBias,
    pub rename_detect: bool,
    /// Similarity percentage passed to `find-renames`.
    pub rename_threshold: Option<u8>,
}

impl Default for MergeTuning {
    fn default() -> Self {
        Self {
            optimize_merge: false,
            conflict_bias: ConflictBias::None,
            rename_detect: true,
            rename_threshold: None,
        }
    }
}

/// Settings applied through `-c` when merge optimization is on.
const OPTIMIZE_SETTINGS: [&str; 7] = [
    "rerere.enabled=true",
    "merge.conflictStyle=zdiff3",
    "diff.algorithm=patience",
    "diff.indentHeuristic=true",
    "diff.renames=true",
    "merge.renames=true",
    "merge.renameLimit=32767",
];

/// Settings applied through `-c` when a replay onto a base is optimized.
const REPLAY_SETTINGS: [&str; 10] = [
    "rerere.enabled=true",
    "rerere.autoUpdate=true",
    "merge.conflictStyle=zdiff3",
    "diff.algorithm=patience",
    "diff.indentHeuristic=true",
    "diff.renames=true",
    "merge.renames=true",
    "merge.renameLimit=32767",
    "rebase.backend=merge",
    "rebase.autoStash=true",
];

impl MergeTuning {
    pub fn validate(&self) -> Result<(), TidyError> {
        match self.rename_threshold {
            Some(t) if t > 100 => Err(TidyError::Precondition(format!(
                "Invalid --rename-threshold {}: must be within 0..=100",
                t
            ))),
            _ => Ok(()),
        }
    }

    /// `-c key=value` pairs to put before a merge or revert.
    pub fn config_prefix(&self) -> Vec<String> {
        self.prefix_from(&OPTIMIZE_SETTINGS)
    }

    /// `-c key=value` pairs for replaying commits onto a base; adds rerere
    /// auto-update and the merge rebase backend with auto-stash.
    pub fn replay_config_prefix(&self) -> Vec<String> {
        self.prefix_from(&REPLAY_SETTINGS)
    }

    fn prefix_from(&self, settings: &[&str]) -> Vec<String> {
        if !self.optimize_merge {
            return Vec::new();
        }
        settings
            .iter()
            .flat_map(|s| [String::from("-c"), s.to_string()])
            .collect()
    }

    /// `-X` strategy options for merge, cherry-pick and revert.
    pub fn strategy_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self.conflict_bias {
            ConflictBias::Ours => args.extend(["-X".to_string(), "ours".to_string()]),
            ConflictBias::Theirs => args.extend(["-X".to_string(), "theirs".to_string()]),
            ConflictBias::None => {}
        }
        if !self.rename_detect {
            args.extend(["-X".to_string(), "no-renames".to_string()]);
        } else if let Some(t) = self.rename_threshold {
            args.extend(["-X".to_string(), format!("find-renames={}", t)]);
        } else {
            args.extend(["-X".to_string(), "find-renames".to_string()]);
        }
        args
    }
}

/// Borrows owned arguments for [`Git::run`](crate::git::Git::run).
pub(crate) fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

/// Runs a cleanup step; a failure is logged and never replaces the error
/// that led to the cleanup.
pub(crate) fn best_effort<G: Git + ?Sized>(git: &mut G, args: &[&str]) {
    match git.try_run(args) {
        Ok(out) if out.success() => {}
        Ok(out) => warn!(
            args = %args.join(" "),
            stderr = %out.stderr.trim(),
            "cleanup step failed"
        ),
        Err(e) => warn!(args = %args.join(" "), error = %e, "cleanup step failed"),
    }
}

/// Rejects zero where a positive count is required.
pub(crate) fn positive(flag: &str, value: Option<usize>) -> Result<(), TidyError> {
    match value {
        Some(0) => Err(TidyError::Precondition(format!(
            "Invalid {}: must be > 0",
            flag
        ))),
        _ => Ok(()),
    }
}
