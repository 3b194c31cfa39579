//! `preflight-check`: guards run before rewriting a branch onto a base.

use crate::backup::Outcome;
use crate::error::TidyError;
use crate::git::{self, Git};

use console::style;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightOptions {
    pub base: String,
    /// Branch to check; the current branch when `None`.
    pub branch: Option<String>,
    pub allow_dirty: bool,
    pub allow_wip: bool,
    pub dry_run: bool,
}

impl Default for PreflightOptions {
    fn default() -> Self {
        Self {
            base: String::from("origin/main"),
            branch: None,
            allow_dirty: false,
            allow_wip: false,
            dry_run: false,
        }
    }
}

/// Commit counts on each side of `base...branch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    /// Commits on the base missing from the branch.
    pub behind: usize,
    /// Commits on the branch missing from the base.
    pub ahead: usize,
}

/// True for subjects such as `WIP: parser` or `wip parser`.
pub fn looks_like_wip(subject: &str) -> bool {
    subject.contains("WIP") || subject.to_lowercase().starts_with("wip")
}

fn parse_counts(text: &str) -> Option<Divergence> {
    let mut fields = text.split_whitespace();
    let behind = fields.next()?.parse().ok()?;
    let ahead = fields.next()?.parse().ok()?;
    Some(Divergence { behind, ahead })
}

/// Fetches, then checks the worktree, the tip's subject and how far
/// `branch` has drifted from `base`.
pub fn check<G: Git + ?Sized>(
    git: &mut G,
    opts: &PreflightOptions,
) -> Result<Divergence, TidyError> {
    let branch = match &opts.branch {
        Some(b) => b.clone(),
        None => git::current_branch(git)?.ok_or_else(|| {
            TidyError::Precondition(String::from("HEAD is detached; pass --branch"))
        })?,
    };

    let fetch = git.try_run(&["fetch", "--all", "--prune"])?;
    if !fetch.success() {
        warn!(stderr = %fetch.stderr.trim(), "fetch failed; using local refs");
    }

    if !opts.allow_dirty && !git::worktree_clean(git)? {
        return Err(TidyError::Precondition(String::from(
            "Working tree is dirty; commit or stash changes or use --allow-dirty",
        )));
    }

    let subject = git.run(&["show", "-s", "--pretty=%s", &branch])?;
    if !opts.allow_wip && looks_like_wip(&subject) {
        return Err(TidyError::Precondition(String::from(
            "Head commit looks like WIP; use --allow-wip to proceed",
        )));
    }

    let range = format!("{}...{}", opts.base, branch);
    let counts = git.run(&["rev-list", "--left-right", "--count", &range])?;
    let divergence = parse_counts(&counts).ok_or_else(|| TidyError::Git {
        args: format!("rev-list --left-right --count {}", range),
        stderr: format!("unexpected output: {}", counts),
    })?;

    println!(
        "{} Behind/ahead ({}): {} {}",
        style("Preflight OK.").green(),
        range,
        divergence.behind,
        divergence.ahead
    );
    Ok(divergence)
}

pub fn run<G: Git + ?Sized>(git: &mut G, opts: &PreflightOptions) -> Result<Outcome, TidyError> {
    check(git, opts)?;
    if opts.dry_run {
        println!("Dry-run: no changes made");
    }
    Ok(Outcome::Completed)
}
