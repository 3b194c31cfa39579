//! `smart-merge`: preview or perform a merge with rename detection and a
//! safety branch.

use crate::backup::{Outcome, supervise};
use crate::commands::{MergeTuning, as_strs};
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::prompt::{ConfirmPrompter, proceed};

use console::style;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Branch to merge from.
    pub source: String,
    /// Branch to merge into; the current branch when `None`.
    pub into: Option<String>,
    /// Perform the merge instead of previewing it.
    pub apply: bool,
    pub prompt: bool,
    pub backup: bool,
    pub tuning: MergeTuning,
    /// Try committing as-is when git stops without unmerged paths.
    pub auto_resolve_trivial: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            source: String::new(),
            into: None,
            apply: false,
            prompt: true,
            backup: true,
            tuning: MergeTuning::default(),
            auto_resolve_trivial: false,
        }
    }
}

/// Full argument list for the merge itself.
pub fn merge_args(opts: &MergeOptions) -> Vec<String> {
    let mut args = opts.tuning.config_prefix();
    args.push(String::from("merge"));
    args.extend(opts.tuning.strategy_args());
    if !opts.apply {
        args.push(String::from("--no-commit"));
    }
    args.push(String::from("--no-ff"));
    args.push(opts.source.clone());
    args
}

fn abort_merge<G: Git + ?Sized>(git: &mut G) -> Result<(), TidyError> {
    let out = git.try_run(&["merge", "--abort"])?;
    if !out.success() {
        warn!(stderr = %out.stderr.trim(), "merge --abort failed");
    }
    Ok(())
}

pub fn run<G, P>(git: &mut G, prompter: &mut P, opts: &MergeOptions) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    if opts.source.is_empty() {
        return Err(TidyError::Precondition(String::from(
            "Missing --branch for smart-merge",
        )));
    }
    opts.tuning.validate()?;

    let target = match &opts.into {
        Some(t) => t.clone(),
        None => git::current_branch(git)?.ok_or_else(|| {
            TidyError::Precondition(String::from("HEAD is detached; pass --into"))
        })?,
    };
    let args = merge_args(opts);

    // The backup must record the target's position, so switch first.
    git::ensure_clean(git, "merging")?;
    git.run(&["switch", &target])?;

    if !opts.apply {
        println!("Previewing merge of {} into {}...", opts.source, target);
        let out = git.try_run(&as_strs(&args))?;
        if out.success() {
            println!("{}", style("Merge would be clean").green());
        } else {
            println!("Merge resulted in conflicts: {}", out.stderr.trim());
            println!("Merge preview ended with conflicts surfaced.");
        }
        abort_merge(git)?;
        return Ok(Outcome::Completed);
    }

    let question = format!("Proceed to merge {} into {}?", opts.source, target);
    if !proceed(prompter, opts.prompt, &question)? {
        return Ok(Outcome::Cancelled);
    }

    let body = |git: &mut G| -> Result<Outcome, TidyError> {
        let out = git.try_run(&as_strs(&args))?;
        if out.success() {
            println!("{}", style("Merge completed cleanly").green().bold());
            return Ok(Outcome::Completed);
        }

        eprintln!("Merge resulted in conflicts: {}", out.stderr.trim());
        if opts.auto_resolve_trivial {
            let commit = git.invoke(&["commit", "--no-edit"], &[("GIT_EDITOR", "true")])?;
            if commit.success() {
                println!("Merge committed after trivial resolution");
                return Ok(Outcome::Completed);
            }
        }
        Err(TidyError::Git {
            args: args.join(" "),
            stderr: out.stderr.trim().to_string(),
        })
    };

    if opts.backup {
        supervise(git, |git, _ctx| body(git))
    } else {
        let result = body(git);
        if result.is_err() {
            eprintln!("Conflicts left in place; resolve manually or run `git merge --abort`.");
        }
        result
    }
}
