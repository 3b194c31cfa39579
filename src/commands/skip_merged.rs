//! `rebase-skip-merged`: replay only the commits whose content is not yet
//! on the base branch.
//!
//! `git cherry` compares patches rather than object ids, so commits that
//! landed upstream under a different id are recognized and left out. The
//! remaining commits are cherry-picked in order onto a temporary branch
//! created from the base, and the branch is moved there once every pick
//! succeeded.

use crate::backup::{Outcome, supervise};
use crate::commands::{MergeTuning, as_strs, best_effort, positive, rerere};
use crate::commit::short;
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::prompt::{ConfirmPrompter, proceed};

use console::style;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipMergedOptions {
    pub base: String,
    /// Branch to rebase; the current branch when `None`.
    pub branch: Option<String>,
    pub dry_run: bool,
    pub prompt: bool,
    pub backup: bool,
    pub chunk_size: Option<usize>,
    pub max_conflicts: Option<usize>,
    pub tuning: MergeTuning,
    pub rerere_cache: Option<PathBuf>,
    pub use_rerere_cache: bool,
    pub auto_resolve_trivial: bool,
}

impl Default for SkipMergedOptions {
    fn default() -> Self {
        Self {
            base: String::from("origin/main"),
            branch: None,
            dry_run: false,
            prompt: true,
            backup: true,
            chunk_size: None,
            max_conflicts: None,
            tuning: MergeTuning::default(),
            rerere_cache: None,
            use_rerere_cache: false,
            auto_resolve_trivial: false,
        }
    }
}

impl SkipMergedOptions {
    pub fn validate(&self) -> Result<(), TidyError> {
        positive("--chunk-size", self.chunk_size)?;
        positive("--max-conflicts", self.max_conflicts)?;
        if self.use_rerere_cache && self.rerere_cache.is_none() {
            return Err(TidyError::Precondition(String::from(
                "--use-rerere-cache requires --rerere-cache PATH",
            )));
        }
        self.tuning.validate()
    }
}

/// Object ids from `git cherry -v` lines marked `+` (not yet upstream).
pub fn unique_commits(cherry: &str) -> Vec<String> {
    cherry
        .lines()
        .filter_map(|line| line.strip_prefix("+ "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Prepends the tuning prefix to `args`.
fn tuned(prefix: &[String], args: &[&str]) -> Vec<String> {
    prefix
        .iter()
        .cloned()
        .chain(args.iter().map(|a| a.to_string()))
        .collect()
}

/// Per-run state for the replay onto the temporary branch.
struct Replayer<'a> {
    prefix: Vec<String>,
    pick_opts: Vec<String>,
    opts: &'a SkipMergedOptions,
    conflicts: usize,
}

impl Replayer<'_> {
    /// Cherry-picks `shas` in order, stopping at the first conflict.
    fn replay<G: Git + ?Sized>(&mut self, git: &mut G, shas: &[String]) -> Result<(), TidyError> {
        for sha in shas {
            let mut args = tuned(&self.prefix, &["cherry-pick"]);
            args.extend(self.pick_opts.iter().cloned());
            args.push(sha.clone());

            let out = git.try_run(&as_strs(&args))?;
            if out.success() {
                continue;
            }
            if self.opts.auto_resolve_trivial && continue_if_resolved(git)? {
                info!(sha = %sha, "continued after trivial resolution");
                continue;
            }

            self.conflicts += 1;
            eprintln!(
                "{}",
                style(format!("Cherry-pick failed for {}: {}", short(sha), out.stderr.trim())).red()
            );
            if self.opts.max_conflicts.is_some_and(|max| self.conflicts >= max) {
                eprintln!("Max conflicts reached; aborting");
            }
            let abort = git.try_run(&["cherry-pick", "--abort"])?;
            if !abort.success() {
                warn!(stderr = %abort.stderr.trim(), "cherry-pick --abort failed");
            }
            return Err(TidyError::Replay(format!(
                "cherry-pick of {} stopped with conflicts",
                short(sha)
            )));
        }
        Ok(())
    }
}

/// Continues a stopped pick when no path is left unmerged.
fn continue_if_resolved<G: Git + ?Sized>(git: &mut G) -> Result<bool, TidyError> {
    let unmerged = git.try_run(&["diff", "--name-only", "--diff-filter=U"])?;
    if !unmerged.success() || !unmerged.stdout.trim().is_empty() {
        return Ok(false);
    }
    let cont = git.invoke(&["cherry-pick", "--continue"], &[("GIT_EDITOR", "true")])?;
    Ok(cont.success())
}

pub fn run<G, P>(
    git: &mut G,
    prompter: &mut P,
    opts: &SkipMergedOptions,
) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    opts.validate()?;

    let current = git::current_branch(git)?;
    let start = match &current {
        Some(b) => b.clone(),
        None => git::head(git)?,
    };
    let branch = match (&opts.branch, current) {
        (Some(b), _) => b.clone(),
        (None, Some(b)) => b,
        (None, None) => {
            return Err(TidyError::Precondition(String::from(
                "HEAD is detached; pass --branch",
            )));
        }
    };
    let prefix = opts.tuning.replay_config_prefix();

    let fetch = git.try_run(&as_strs(&tuned(&prefix, &["fetch", "--all", "--prune"])))?;
    if !fetch.success() {
        warn!(stderr = %fetch.stderr.trim(), "fetch failed; using local refs");
    }

    let cherry = git.run(&as_strs(&tuned(&prefix, &["cherry", "-v", &opts.base, &branch])))?;
    let unique = unique_commits(&cherry);
    println!(
        "Found {} commits unique to {} relative to {}",
        unique.len(),
        branch,
        opts.base
    );

    if unique.is_empty() {
        return Ok(Outcome::NoOp(String::from(
            "No commits to replay; branch is effectively up-to-date with base",
        )));
    }

    if opts.dry_run {
        println!("Would replay (oldest to newest):");
        for sha in &unique {
            println!("  {}", short(sha));
        }
        return Ok(Outcome::Completed);
    }

    git::ensure_clean(git, "rebasing")?;

    let question = format!(
        "Proceed to rebase {} onto {} replaying {} commits?",
        branch,
        opts.base,
        unique.len()
    );
    if !proceed(prompter, opts.prompt, &question)? {
        return Ok(Outcome::Cancelled);
    }

    let body = |git: &mut G| -> Result<Outcome, TidyError> {
        replay_onto_base(git, opts, &prefix, &start, &branch, &unique)
    };
    if opts.backup {
        supervise(git, |git, _ctx| body(git))
    } else {
        body(git)
    }
}

fn replay_onto_base<G: Git + ?Sized>(
    git: &mut G,
    opts: &SkipMergedOptions,
    prefix: &[String],
    start: &str,
    branch: &str,
    unique: &[String],
) -> Result<Outcome, TidyError> {
    let git_dir = git::git_dir(git)?;
    let shared = if opts.use_rerere_cache { opts.rerere_cache.as_deref() } else { None };

    let mut imported = false;
    if let Some(path) = shared {
        match rerere::import(&git_dir, path) {
            Ok(n) => {
                info!(files = n, "rerere cache imported");
                imported = true;
            }
            Err(e) => eprintln!("Warning: failed to import rerere cache; continuing ({})", e),
        }
    }

    let temp = format!("{}-rebased", branch);
    git.run(&as_strs(&tuned(prefix, &["switch", "-c", &temp, &opts.base])))?;

    let mut pick_opts = opts.tuning.strategy_args();
    if opts.auto_resolve_trivial {
        pick_opts.extend([String::from("-X"), String::from("ignore-space-change")]);
    }
    let mut replayer = Replayer {
        prefix: prefix.to_vec(),
        pick_opts,
        opts,
        conflicts: 0,
    };

    let chunk = opts.chunk_size.unwrap_or(unique.len()).max(1);
    let total = unique.len().div_ceil(chunk);
    for (i, shas) in unique.chunks(chunk).enumerate() {
        info!(chunk = i + 1, total, "replaying chunk");
        if let Err(e) = replayer.replay(git, shas) {
            best_effort(git, &["switch", start]);
            best_effort(git, &["branch", "-D", &temp]);
            return Err(e);
        }
    }

    git.run(&as_strs(&tuned(prefix, &["branch", "-f", branch, &temp])))?;
    git.run(&as_strs(&tuned(prefix, &["switch", branch])))?;
    best_effort(git, &as_strs(&tuned(prefix, &["branch", "-D", &temp])));

    if let (Some(path), true) = (shared, imported) {
        if let Err(e) = rerere::export(&git_dir, path) {
            eprintln!("Warning: failed to export rerere cache ({})", e);
        }
    }

    println!(
        "{}",
        style("Rebase-skip-merged completed successfully.").green().bold()
    );
    Ok(Outcome::Completed)
}
