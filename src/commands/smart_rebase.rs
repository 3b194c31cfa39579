//! `smart-rebase`: preflight, pick a base, then rebase under a backup.
//!
//! By default the rebase goes through [`skip_merged`] so commits already
//! on the base are dropped; `--no-skip-merged` runs a plain `git rebase`
//! instead. A range-diff of the old and new tips is printed afterwards.

use crate::backup::{Outcome, supervise};
use crate::commands::inspect::{self, FALLBACK_BASE, PREFERRED_BASES};
use crate::commands::preflight::{self, PreflightOptions};
use crate::commands::skip_merged::{self, SkipMergedOptions};
use crate::commands::{MergeTuning, as_strs, positive};
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::prompt::{ConfirmPrompter, proceed};

use console::style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartRebaseOptions {
    /// Branch to rebase; the current branch when `None`.
    pub branch: Option<String>,
    /// Base to rebase onto; picked with `select-base` when `None`.
    pub base: Option<String>,
    pub dry_run: bool,
    pub prompt: bool,
    pub backup: bool,
    pub tuning: MergeTuning,
    pub chunk_size: Option<usize>,
    pub max_conflicts: Option<usize>,
    pub auto_resolve_trivial: bool,
    /// Print a range-diff of the old and new tips.
    pub summary: bool,
    /// Drop commits whose patches are already on the base.
    pub skip_merged: bool,
}

impl Default for SmartRebaseOptions {
    fn default() -> Self {
        Self {
            branch: None,
            base: None,
            dry_run: false,
            prompt: true,
            backup: true,
            tuning: MergeTuning::default(),
            chunk_size: None,
            max_conflicts: None,
            auto_resolve_trivial: false,
            summary: true,
            skip_merged: true,
        }
    }
}

/// Arguments of the plain rebase used when merged commits are kept.
pub fn rebase_args(tuning: &MergeTuning, base: &str) -> Vec<String> {
    let mut args = tuning.replay_config_prefix();
    args.push(String::from("rebase"));
    args.extend(tuning.strategy_args());
    args.push(base.to_string());
    args
}

pub fn run<G, P>(
    git: &mut G,
    prompter: &mut P,
    opts: &SmartRebaseOptions,
) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    positive("--chunk-size", opts.chunk_size)?;
    positive("--max-conflicts", opts.max_conflicts)?;
    opts.tuning.validate()?;

    let branch = match &opts.branch {
        Some(b) => b.clone(),
        None => git::current_branch(git)?.ok_or_else(|| {
            TidyError::Precondition(String::from("HEAD is detached; pass --branch"))
        })?,
    };
    let base = match &opts.base {
        Some(b) => b.clone(),
        None => {
            let preferred: Vec<String> = PREFERRED_BASES.iter().map(|s| s.to_string()).collect();
            inspect::select_base(git, &preferred, FALLBACK_BASE)?
        }
    };

    preflight::check(
        git,
        &PreflightOptions {
            base: base.clone(),
            branch: Some(branch.clone()),
            allow_dirty: false,
            allow_wip: false,
            dry_run: opts.dry_run,
        },
    )?;

    if opts.dry_run {
        println!("Would rebase {} onto {} (smart mode)", branch, base);
        return Ok(Outcome::Completed);
    }

    let question = format!("Proceed to rebase {} onto {}?", branch, base);
    if !proceed(prompter, opts.prompt, &question)? {
        return Ok(Outcome::Cancelled);
    }

    // The backup must record the branch being rewritten.
    if git::current_branch(git)?.as_deref() != Some(branch.as_str()) {
        git.run(&["switch", &branch])?;
    }
    let old_tip = git::head(git)?;

    let mut body = |git: &mut G| -> Result<Outcome, TidyError> {
        let outcome = if opts.skip_merged {
            let inner = SkipMergedOptions {
                base: base.clone(),
                branch: Some(branch.clone()),
                dry_run: false,
                prompt: false,
                backup: false,
                chunk_size: opts.chunk_size,
                max_conflicts: opts.max_conflicts,
                tuning: opts.tuning.clone(),
                auto_resolve_trivial: opts.auto_resolve_trivial,
                ..SkipMergedOptions::default()
            };
            skip_merged::run(git, &mut *prompter, &inner)?
        } else {
            let args = rebase_args(&opts.tuning, &base);
            let out = git.try_run(&as_strs(&args))?;
            if !out.success() {
                eprintln!("Rebase failed: {}", out.stderr.trim());
                return Err(TidyError::Git {
                    args: args.join(" "),
                    stderr: out.stderr.trim().to_string(),
                });
            }
            println!("{}", style("Rebase completed").green().bold());
            Outcome::Completed
        };

        if opts.summary {
            let old = format!("{}..{}", base, old_tip);
            let new = format!("{}..{}", base, branch);
            println!("{}", inspect::range_diff(git, &old, &new)?);
        }
        Ok(outcome)
    };

    if opts.backup {
        supervise(git, |git, _ctx| body(git))
    } else {
        body(git)
    }
}
