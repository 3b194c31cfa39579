//! Per-file splitting of commits.

use crate::commit::Commit;
use crate::error::TidyError;
use crate::git::Git;

use tracing::info;

/// One commit to create while splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCommit {
    /// Path to stage, or `None` for an empty commit.
    pub file: Option<String>,
    pub message: String,
}

/// How a single commit is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub sha: String,
    pub derived: Vec<DerivedCommit>,
}

impl SplitPlan {
    /// Plans the split of `commit` into one commit per changed file.
    ///
    /// Commits touching at most one file are kept as they are. Otherwise
    /// files are visited in sorted order and each derived message is
    /// `split off <file>` followed by the original message.
    pub fn for_commit(commit: &Commit) -> Self {
        let derived = if commit.files.len() <= 1 {
            vec![DerivedCommit {
                file: commit.files.iter().next().cloned(),
                message: commit.message.clone(),
            }]
        } else {
            commit
                .files
                .iter()
                .map(|file| DerivedCommit {
                    file: Some(file.clone()),
                    message: format!("split off {}\n\n{}", file, commit.message),
                })
                .collect()
        };

        Self {
            sha: commit.sha.clone(),
            derived,
        }
    }

    /// Returns `true` when the commit is rebuilt unchanged.
    pub fn is_identity(&self) -> bool {
        self.derived.len() == 1
    }
}

/// Returns `true` if at least one commit touches more than one file.
pub fn needs_splitting(commits: &[Commit]) -> bool {
    commits.iter().any(|c| c.files.len() > 1)
}

/// Rebuilds history from `base` following `plans`, in order.
///
/// The worktree must be clean: this resets hard to `base` and then
/// re-applies each original commit with `cherry-pick --no-commit`,
/// committing one file at a time. The first failing step stops the run;
/// undoing commits already created is left to the backup supervisor.
///
/// Returns the messages of the commits created.
pub fn execute<G: Git + ?Sized>(
    git: &mut G,
    base: &str,
    plans: &[SplitPlan],
) -> Result<Vec<String>, TidyError> {
    git.run(&["reset", "--hard", base])?;

    let mut created = Vec::new();
    for plan in plans {
        info!(sha = %plan.sha, commits = plan.derived.len(), "rebuilding commit");

        if plan.is_identity() && plan.derived[0].file.is_none() {
            let message = &plan.derived[0].message;
            git.run(&["commit", "--allow-empty", "-m", message])?;
            created.push(message.clone());
            continue;
        }

        git.run(&["cherry-pick", "--no-commit", &plan.sha])?;
        git.run(&["reset", "-q"])?;
        for derived in &plan.derived {
            if let Some(file) = &derived.file {
                git.run(&["add", "-A", "--", file])?;
            }
            git.run(&["commit", "-m", &derived.message])?;
            created.push(derived.message.clone());
        }
    }

    Ok(created)
}
