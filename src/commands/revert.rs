//! `smart-revert` and `select-reverts`.

use crate::backup::{Outcome, supervise};
use crate::commands::{MergeTuning, as_strs, positive};
use crate::commit::short;
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::prompt::{ConfirmPrompter, proceed};

use console::style;
use tracing::warn;

/// Filters for picking commits to revert from the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectRevertsOptions {
    pub range: Option<String>,
    pub count: Option<usize>,
    pub grep: Option<String>,
    pub author: Option<String>,
}

/// Object ids matching the filters, newest first.
pub fn select_reverts<G: Git + ?Sized>(
    git: &mut G,
    opts: &SelectRevertsOptions,
) -> Result<Vec<String>, TidyError> {
    positive("--count", opts.count)?;

    let mut args = vec![String::from("log"), String::from("--pretty=%H")];
    if let Some(n) = opts.count {
        args.push(format!("-n{}", n));
    }
    if let Some(grep) = &opts.grep {
        args.push(format!("--grep={}", grep));
    }
    if let Some(author) = &opts.author {
        args.push(format!("--author={}", author));
    }
    if let Some(range) = &opts.range {
        args.push(range.clone());
    }

    let out = git.run(&as_strs(&args))?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertOptions {
    /// Explicit commits; selected from `range`/`count` when empty.
    pub commits: Vec<String>,
    pub range: Option<String>,
    pub count: Option<usize>,
    pub apply: bool,
    pub prompt: bool,
    pub backup: bool,
    pub tuning: MergeTuning,
    pub max_conflicts: Option<usize>,
}

impl Default for RevertOptions {
    fn default() -> Self {
        Self {
            commits: Vec::new(),
            range: None,
            count: None,
            apply: false,
            prompt: true,
            backup: true,
            tuning: MergeTuning::default(),
            max_conflicts: None,
        }
    }
}

fn revert_args(tuning: &MergeTuning, apply: bool, sha: &str) -> Vec<String> {
    let mut args = tuning.config_prefix();
    args.push(String::from("revert"));
    if apply {
        args.push(String::from("--no-edit"));
    } else {
        args.push(String::from("--no-commit"));
    }
    args.extend(tuning.strategy_args());
    args.push(sha.to_string());
    args
}

fn abort_revert<G: Git + ?Sized>(git: &mut G) -> Result<(), TidyError> {
    let out = git.try_run(&["revert", "--abort"])?;
    if !out.success() {
        warn!(stderr = %out.stderr.trim(), "revert --abort failed");
    }
    Ok(())
}

/// Reverts `commits` in order until one fails; returns the failing id and
/// its error output.
fn revert_each<G: Git + ?Sized>(
    git: &mut G,
    opts: &RevertOptions,
    commits: &[String],
) -> Result<Option<(String, String)>, TidyError> {
    for sha in commits {
        let out = git.try_run(&as_strs(&revert_args(&opts.tuning, opts.apply, sha)))?;
        if !out.success() {
            eprintln!(
                "{}",
                style(format!("Revert failed for {}: {}", short(sha), out.stderr.trim())).red()
            );
            // The first conflict always ends the run; only a limit of one is reached here.
            if opts.max_conflicts == Some(1) {
                eprintln!("Max conflicts reached; stopping further reverts");
            }
            return Ok(Some((sha.clone(), out.stderr.trim().to_string())));
        }
    }
    Ok(None)
}

pub fn run<G, P>(git: &mut G, prompter: &mut P, opts: &RevertOptions) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    positive("--max-conflicts", opts.max_conflicts)?;
    opts.tuning.validate()?;

    let commits = if opts.commits.is_empty() {
        let filters = SelectRevertsOptions {
            range: opts.range.clone(),
            count: opts.count,
            ..SelectRevertsOptions::default()
        };
        select_reverts(git, &filters)?
    } else {
        opts.commits.clone()
    };
    if commits.is_empty() {
        return Ok(Outcome::NoOp(String::from("No commits selected to revert")));
    }

    git::ensure_clean(git, "reverting")?;

    if !opts.apply {
        println!("Previewing revert of {} commit(s)...", commits.len());
        match revert_each(git, opts, &commits)? {
            None => println!("{}", style("Revert would be clean").green()),
            Some(_) => {
                abort_revert(git)?;
                println!("Revert preview ended with conflicts surfaced.");
            }
        }
        git.run(&["reset", "--hard", "HEAD"])?;
        return Ok(Outcome::Completed);
    }

    let question = format!("Proceed to revert {} commit(s)?", commits.len());
    if !proceed(prompter, opts.prompt, &question)? {
        return Ok(Outcome::Cancelled);
    }

    let body = |git: &mut G| -> Result<Outcome, TidyError> {
        match revert_each(git, opts, &commits)? {
            None => {
                println!(
                    "{}",
                    style(format!("Reverted {} commit(s)", commits.len())).green().bold()
                );
                Ok(Outcome::Completed)
            }
            Some((sha, stderr)) => Err(TidyError::Git {
                args: format!("revert {}", sha),
                stderr,
            }),
        }
    };

    if opts.backup {
        supervise(git, |git, _ctx| body(git))
    } else {
        let result = body(git);
        if result.is_err() {
            eprintln!("Revert ended with conflicts; resolve manually or run `git revert --abort`.");
        }
        result
    }
}
