//! `group-commits`: reorder a range so commits touching similar files sit
//! next to each other.

use crate::backup::{Outcome, supervise};
use crate::banner::{grouping_lines, print_banner};
use crate::commit::Commit;
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::grouping::{DEFAULT_THRESHOLD, Group, group_commits};
use crate::plan::{ReplayPlan, replay};
use crate::prompt::{ConfirmPrompter, proceed};

use console::style;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupOptions {
    /// Start of the range; picked automatically when `None`.
    pub base: Option<String>,
    pub threshold: f64,
    pub dry_run: bool,
    pub prompt: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            base: None,
            threshold: DEFAULT_THRESHOLD,
            dry_run: false,
            prompt: true,
        }
    }
}

impl GroupOptions {
    pub fn validate(&self) -> Result<(), TidyError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(TidyError::Precondition(format!(
                "Invalid --threshold {}: must be between 0.0 and 1.0",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Fetches the range to work on, resolving the default base if needed.
pub(crate) fn load_range<G: Git + ?Sized>(
    git: &mut G,
    base: Option<&str>,
) -> Result<Vec<Commit>, TidyError> {
    let base = match base {
        Some(b) => b.to_string(),
        None => git::default_base(git)?,
    };
    info!(base = %base, "listing commits");
    git::list_commits(git, &base)
}

/// Prints the proposed grouping without touching the repository.
fn preview(commits: &[Commit], groups: &[Group]) {
    println!(
        "Found {} commits, would group into {} groups:",
        commits.len(),
        groups.len()
    );
    for (i, group) in groups.iter().enumerate() {
        println!(
            "\n{}",
            style(format!("Group {} ({} commits):", i + 1, group.len())).bold()
        );
        println!("  Files: {}", group.describe());
        for commit in group.commits() {
            println!("    {} {}", commit.short_sha(), commit.subject);
        }
    }
}

/// Runs the grouping workflow.
///
/// `exe` is the path git should call back as the sequence editor.
pub fn run<G, P>(
    git: &mut G,
    prompter: &mut P,
    opts: &GroupOptions,
    exe: &str,
) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    opts.validate()?;

    if opts.dry_run {
        let commits = load_range(git, opts.base.as_deref())?;
        let groups = group_commits(&commits, opts.threshold);
        preview(&commits, &groups);
        return Ok(Outcome::Completed);
    }

    git::ensure_clean(git, "grouping")?;

    supervise(git, |git, _ctx| {
        let commits = load_range(git, opts.base.as_deref())?;
        if commits.is_empty() {
            return Ok(Outcome::NoOp(String::from("No commits found to rebase")));
        }
        println!("Found {} commits to analyze", commits.len());

        let groups = group_commits(&commits, opts.threshold);
        let plan = match ReplayPlan::build(&groups) {
            Some(p) => p,
            None => {
                return Ok(Outcome::NoOp(String::from(
                    "No grouping needed - commits are already optimally ordered",
                )));
            }
        };

        print_banner(
            &format!(
                "Rebasing {} commits into {} groups",
                commits.len(),
                groups.len()
            ),
            &grouping_lines(&groups),
        );

        if !proceed(prompter, opts.prompt, "Proceed with rebase?")? {
            return Ok(Outcome::Cancelled);
        }

        let base = git::parent_of(git, &commits[0].sha)?;
        replay(git, &plan, base.as_deref(), exe)?;
        println!("{}", style("Rebase completed successfully!").green().bold());
        Ok(Outcome::Completed)
    })
}
