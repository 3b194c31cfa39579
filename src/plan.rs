//! Reordering plans and their replay through `git rebase -i`.

use crate::commit::short;
use crate::error::TidyError;
use crate::git::{Git, build_sequence_editor_env};
use crate::grouping::Group;

use std::fmt;
use std::io::Write;
use tracing::info;

/// One line of a rebase todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanLine {
    /// Replay `sha` unchanged.
    Pick { sha: String, subject: String },
    /// Comment separating two groups; `number` is 1-based.
    Boundary { number: usize, description: String },
}

impl fmt::Display for PlanLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanLine::Pick { sha, subject } => write!(f, "pick {} {}", short(sha), subject),
            PlanLine::Boundary {
                number,
                description,
            } => write!(f, "# Group {}: Files: {}", number, description),
        }
    }
}

/// Ordered pick list produced from a grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayPlan {
    lines: Vec<PlanLine>,
}

impl ReplayPlan {
    /// Flattens `groups` into a pick list.
    ///
    /// Returns `None` when there is at most one group, since replaying
    /// would not change the order of anything.
    pub fn build(groups: &[Group]) -> Option<Self> {
        if groups.len() <= 1 {
            return None;
        }

        let mut lines = Vec::new();
        for (idx, group) in groups.iter().enumerate() {
            if idx > 0 {
                lines.push(PlanLine::Boundary {
                    number: idx + 1,
                    description: group.describe(),
                });
            }
            for commit in group.commits() {
                lines.push(PlanLine::Pick {
                    sha: commit.sha.clone(),
                    subject: commit.subject.clone(),
                });
            }
        }
        Some(Self { lines })
    }

    pub fn lines(&self) -> &[PlanLine] {
        &self.lines
    }

    /// Object ids in the order they will be picked.
    pub fn picks(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            PlanLine::Pick { sha, .. } => Some(sha.as_str()),
            PlanLine::Boundary { .. } => None,
        })
    }

    /// Serializes the plan as rebase todo text.
    pub fn to_todo(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Runs `git rebase -i` with `plan` installed as the todo list.
///
/// `base` is the commit to replay onto; `None` replays from the root.
/// `exe` is the path of this program, which git calls back as the
/// sequence editor. The plan file is removed when this returns.
pub fn replay<G: Git + ?Sized>(
    git: &mut G,
    plan: &ReplayPlan,
    base: Option<&str>,
    exe: &str,
) -> Result<(), TidyError> {
    let mut file = tempfile::Builder::new()
        .prefix("git-tidy-plan-")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| TidyError::io("cannot create plan file", e))?;
    file.write_all(plan.to_todo().as_bytes())
        .map_err(|e| TidyError::io("cannot write plan file", e))?;
    file.flush()
        .map_err(|e| TidyError::io("cannot write plan file", e))?;

    let plan_path = file.path().to_string_lossy().to_string();
    let editor = build_sequence_editor_env(exe, &plan_path);

    let args = match base {
        Some(b) => vec!["rebase", "-i", b],
        None => vec!["rebase", "-i", "--root"],
    };
    info!(base = base.unwrap_or("--root"), "starting scripted rebase");

    let out = git.invoke(&args, &[("GIT_SEQUENCE_EDITOR", editor.as_str())])?;
    if out.success() {
        Ok(())
    } else {
        Err(TidyError::Replay(out.stderr.trim().to_string()))
    }
}
