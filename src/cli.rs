use crate::backup::Outcome;
use crate::commands::configure::{ConfigureOptions, Preset, Scope};
use crate::commands::group::GroupOptions;
use crate::commands::inspect::{self, FALLBACK_BASE, PREFERRED_BASES};
use crate::commands::merge::MergeOptions;
use crate::commands::rerere::RerereAction;
use crate::commands::revert::{RevertOptions, SelectRevertsOptions, select_reverts};
use crate::commands::skip_merged::SkipMergedOptions;
use crate::commands::split::SplitOptions;
use crate::commands::chunked::ChunkedReplayOptions;
use crate::commands::preflight::PreflightOptions;
use crate::commands::smart_rebase::SmartRebaseOptions;
use crate::commands::{
    ConflictBias, MergeTuning, chunked, configure, group, merge, preflight, rerere, resume, revert,
    skip_merged, smart_rebase, split, squash,
};
use crate::error::TidyError;
use crate::git::SystemGit;
use crate::grouping::DEFAULT_THRESHOLD;
use crate::prompt::DialoguerConfirmPrompter;
use crate::sequence_editor;

use clap::{Args, Parser, Subcommand};
use console::style;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GIT_TIDY_LOG";

/// Reorganize commit history by grouping and splitting commits.
#[derive(Parser, Debug)]
#[command(name = "git-tidy")]
#[command(about = "Reorganize commit history by grouping and splitting commits")]
#[command(version)]
pub struct Cli {
    /// Log every git invocation to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reorder commits so those touching similar files sit together
    GroupCommits {
        /// Base ref of the range (default: merge-base with main or the last 10 commits)
        #[arg(long)]
        base: Option<String>,

        /// Minimum file-set similarity for joining a group (0.0 to 1.0)
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Show the proposed groups without rewriting anything
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(long)]
        no_prompt: bool,
    },

    /// Split each multi-file commit into one commit per file
    SplitCommits {
        #[arg(long)]
        base: Option<String>,

        #[arg(long)]
        dry_run: bool,

        #[arg(long)]
        no_prompt: bool,
    },

    /// Print the commands that squash the range into one commit
    SquashAll {
        #[arg(long)]
        base: Option<String>,
    },

    /// Apply recommended git settings for merges and rebases
    ConfigureRepo {
        #[arg(long, value_enum, default_value_t = Scope::Local)]
        scope: Scope,

        #[arg(long, value_enum, default_value_t = Preset::Safe)]
        preset: Preset,

        #[arg(long)]
        dry_run: bool,
    },

    /// Rebase onto a base, replaying only commits not already there
    RebaseSkipMerged {
        #[arg(long, default_value = "origin/main")]
        base: String,

        /// Branch to rebase (default: current)
        #[arg(long)]
        branch: Option<String>,

        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        safety: SafetyArgs,

        /// Cherry-pick this many commits per step
        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        max_conflicts: Option<usize>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Shared rerere cache directory
        #[arg(long)]
        rerere_cache: Option<PathBuf>,

        /// Import the shared cache before and export it after
        #[arg(long)]
        use_rerere_cache: bool,

        /// Continue automatically when no paths are left unmerged
        #[arg(long)]
        auto_resolve_trivial: bool,
    },

    /// Preflight, pick a base and rebase under a backup, skipping merged commits
    SmartRebase {
        /// Branch to rebase (default: current)
        #[arg(long)]
        branch: Option<String>,

        /// Base to rebase onto (default: first of origin/main, main, origin/master, master)
        #[arg(long)]
        base: Option<String>,

        #[command(flatten)]
        dry_run: DryRunArgs,

        #[command(flatten)]
        safety: SafetyArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[arg(long)]
        chunk_size: Option<usize>,

        #[arg(long)]
        max_conflicts: Option<usize>,

        #[arg(long, overrides_with = "no_auto_resolve_trivial")]
        auto_resolve_trivial: bool,
        #[arg(long, overrides_with = "auto_resolve_trivial")]
        no_auto_resolve_trivial: bool,

        /// Print a range-diff of the old and new tips (default)
        #[arg(long, overrides_with = "no_summary")]
        summary: bool,
        #[arg(long, overrides_with = "summary")]
        no_summary: bool,

        /// Drop commits already on the base (default)
        #[arg(long, overrides_with = "no_skip_merged")]
        skip_merged: bool,
        #[arg(long, overrides_with = "skip_merged")]
        no_skip_merged: bool,
    },

    /// Preview or perform a merge with rename detection and a backup
    SmartMerge {
        /// Branch to merge from
        #[arg(long)]
        branch: String,

        /// Branch to merge into (default: current)
        #[arg(long)]
        into: Option<String>,

        #[command(flatten)]
        apply: ApplyArgs,

        #[command(flatten)]
        safety: SafetyArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[arg(long)]
        auto_resolve_trivial: bool,
    },

    /// Preview or perform reverts with a backup
    SmartRevert {
        /// Commits to revert, comma separated
        #[arg(long, value_delimiter = ',')]
        commits: Vec<String>,

        #[arg(long)]
        range: Option<String>,

        #[arg(long)]
        count: Option<usize>,

        #[command(flatten)]
        apply: ApplyArgs,

        #[command(flatten)]
        safety: SafetyArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[arg(long)]
        max_conflicts: Option<usize>,
    },

    /// Print commits matching log filters
    SelectReverts {
        #[arg(long)]
        range: Option<String>,

        #[arg(long)]
        count: Option<usize>,

        #[arg(long)]
        grep: Option<String>,

        #[arg(long)]
        author: Option<String>,
    },

    /// Print the first candidate base that shares history with HEAD
    SelectBase {
        #[arg(long, num_args = 1..)]
        preferred: Vec<String>,

        #[arg(long, default_value = FALLBACK_BASE)]
        fallback: String,
    },

    /// Fetch, then check the worktree, the tip commit and divergence from a base
    PreflightCheck {
        #[arg(long, default_value = "origin/main")]
        base: String,

        /// Branch to check (default: current)
        #[arg(long)]
        branch: Option<String>,

        #[arg(long, overrides_with = "no_allow_dirty")]
        allow_dirty: bool,
        #[arg(long, overrides_with = "allow_dirty")]
        no_allow_dirty: bool,

        /// Accept a tip commit whose subject marks it as WIP
        #[arg(long, overrides_with = "no_allow_wip")]
        allow_wip: bool,
        #[arg(long, overrides_with = "allow_wip")]
        no_allow_wip: bool,

        #[command(flatten)]
        dry_run: DryRunArgs,
    },

    /// Cherry-pick commits onto a base in chunks, on a new branch
    ChunkedReplay {
        #[arg(long)]
        base: String,

        /// Commits to replay, oldest first, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        commits: Vec<String>,

        #[arg(long)]
        chunk_size: usize,
    },

    /// Import or export the rerere cache
    RerereShare {
        #[arg(long, value_enum)]
        action: RerereAction,

        #[arg(long)]
        path: PathBuf,
    },

    /// Continue a stopped cherry-pick or rebase
    AutoContinue,

    /// Continue a stopped cherry-pick or rebase once git reports its conflicts
    AutoResolveTrivial,

    /// Compare two commit ranges
    RangeDiff { old: String, new: String },
}

/// `--prompt/--no-prompt` and `--backup/--no-backup`.
#[derive(Args, Debug, Clone, Default)]
pub struct SafetyArgs {
    #[arg(long, overrides_with = "no_prompt")]
    prompt: bool,
    #[arg(long, overrides_with = "prompt")]
    no_prompt: bool,
    #[arg(long, overrides_with = "no_backup")]
    backup: bool,
    #[arg(long, overrides_with = "backup")]
    no_backup: bool,
}

impl SafetyArgs {
    fn prompt(&self) -> bool {
        flag(self.prompt, self.no_prompt, true)
    }

    fn backup(&self) -> bool {
        flag(self.backup, self.no_backup, true)
    }
}

/// `--dry-run/--no-dry-run`.
#[derive(Args, Debug, Clone, Default)]
pub struct DryRunArgs {
    /// Report what would happen without changing anything
    #[arg(long, overrides_with = "no_dry_run")]
    dry_run: bool,
    #[arg(long, overrides_with = "dry_run")]
    no_dry_run: bool,
}

impl DryRunArgs {
    fn dry_run(&self) -> bool {
        flag(self.dry_run, self.no_dry_run, false)
    }
}

/// `--apply/--no-apply`; previews by default.
#[derive(Args, Debug, Clone, Default)]
pub struct ApplyArgs {
    #[arg(long, overrides_with = "no_apply")]
    apply: bool,
    #[arg(long, overrides_with = "apply")]
    no_apply: bool,
}

/// Merge tuning flags shared by replay, merge and revert.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Run git with conflict-friendly settings
    #[arg(long, overrides_with = "no_optimize_merge")]
    optimize_merge: bool,
    #[arg(long, overrides_with = "optimize_merge")]
    no_optimize_merge: bool,

    #[arg(long, value_enum, default_value_t = ConflictBias::None)]
    conflict_bias: ConflictBias,

    #[arg(long, overrides_with = "no_rename_detect")]
    rename_detect: bool,
    #[arg(long, overrides_with = "rename_detect")]
    no_rename_detect: bool,

    /// Rename similarity percentage (0-100)
    #[arg(long)]
    rename_threshold: Option<u8>,
}

impl From<TuningArgs> for MergeTuning {
    fn from(args: TuningArgs) -> Self {
        MergeTuning {
            optimize_merge: flag(args.optimize_merge, args.no_optimize_merge, false),
            conflict_bias: args.conflict_bias,
            rename_detect: flag(args.rename_detect, args.no_rename_detect, true),
            rename_threshold: args.rename_threshold,
        }
    }
}

/// Resolves a `--x/--no-x` pair; clap keeps only the last one given.
fn flag(on: bool, off: bool, default: bool) -> bool {
    if off {
        false
    } else if on {
        true
    } else {
        default
    }
}

/// Installs the stderr log subscriber.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn current_exe() -> Result<String, TidyError> {
    let exe = env::current_exe().map_err(|e| TidyError::io("cannot locate own executable", e))?;
    Ok(exe.to_string_lossy().to_string())
}

/// Runs one parsed subcommand against the system `git`.
fn dispatch(command: Command) -> Result<Outcome, TidyError> {
    let mut git = SystemGit;
    let mut prompter = DialoguerConfirmPrompter;

    match command {
        Command::GroupCommits {
            base,
            threshold,
            dry_run,
            no_prompt,
        } => {
            let opts = GroupOptions {
                base,
                threshold,
                dry_run,
                prompt: !no_prompt,
            };
            let exe = current_exe()?;
            group::run(&mut git, &mut prompter, &opts, &exe)
        }
        Command::SplitCommits {
            base,
            dry_run,
            no_prompt,
        } => {
            let opts = SplitOptions {
                base,
                dry_run,
                prompt: !no_prompt,
            };
            split::run(&mut git, &mut prompter, &opts)
        }
        Command::SquashAll { base } => squash::run(&mut git, base.as_deref()),
        Command::ConfigureRepo {
            scope,
            preset,
            dry_run,
        } => configure::run(&mut git, &ConfigureOptions { scope, preset, dry_run }),
        Command::RebaseSkipMerged {
            base,
            branch,
            dry_run,
            safety,
            chunk_size,
            max_conflicts,
            tuning,
            rerere_cache,
            use_rerere_cache,
            auto_resolve_trivial,
        } => {
            let opts = SkipMergedOptions {
                base,
                branch,
                dry_run,
                prompt: safety.prompt(),
                backup: safety.backup(),
                chunk_size,
                max_conflicts,
                tuning: tuning.into(),
                rerere_cache,
                use_rerere_cache,
                auto_resolve_trivial,
            };
            skip_merged::run(&mut git, &mut prompter, &opts)
        }
        Command::SmartRebase {
            branch,
            base,
            dry_run,
            safety,
            tuning,
            chunk_size,
            max_conflicts,
            auto_resolve_trivial,
            no_auto_resolve_trivial,
            summary,
            no_summary,
            skip_merged,
            no_skip_merged,
        } => {
            let opts = SmartRebaseOptions {
                branch,
                base,
                dry_run: dry_run.dry_run(),
                prompt: safety.prompt(),
                backup: safety.backup(),
                tuning: tuning.into(),
                chunk_size,
                max_conflicts,
                auto_resolve_trivial: flag(auto_resolve_trivial, no_auto_resolve_trivial, false),
                summary: flag(summary, no_summary, true),
                skip_merged: flag(skip_merged, no_skip_merged, true),
            };
            smart_rebase::run(&mut git, &mut prompter, &opts)
        }
        Command::SmartMerge {
            branch,
            into,
            apply,
            safety,
            tuning,
            auto_resolve_trivial,
        } => {
            let opts = MergeOptions {
                source: branch,
                into,
                apply: flag(apply.apply, apply.no_apply, false),
                prompt: safety.prompt(),
                backup: safety.backup(),
                tuning: tuning.into(),
                auto_resolve_trivial,
            };
            merge::run(&mut git, &mut prompter, &opts)
        }
        Command::SmartRevert {
            commits,
            range,
            count,
            apply,
            safety,
            tuning,
            max_conflicts,
        } => {
            let opts = RevertOptions {
                commits,
                range,
                count,
                apply: flag(apply.apply, apply.no_apply, false),
                prompt: safety.prompt(),
                backup: safety.backup(),
                tuning: tuning.into(),
                max_conflicts,
            };
            revert::run(&mut git, &mut prompter, &opts)
        }
        Command::SelectReverts {
            range,
            count,
            grep,
            author,
        } => {
            let filters = SelectRevertsOptions {
                range,
                count,
                grep,
                author,
            };
            for sha in select_reverts(&mut git, &filters)? {
                println!("{}", sha);
            }
            Ok(Outcome::Completed)
        }
        Command::SelectBase { preferred, fallback } => {
            let preferred = if preferred.is_empty() {
                PREFERRED_BASES.iter().map(|s| s.to_string()).collect()
            } else {
                preferred
            };
            println!("{}", inspect::select_base(&mut git, &preferred, &fallback)?);
            Ok(Outcome::Completed)
        }
        Command::PreflightCheck {
            base,
            branch,
            allow_dirty,
            no_allow_dirty,
            allow_wip,
            no_allow_wip,
            dry_run,
        } => {
            let opts = PreflightOptions {
                base,
                branch,
                allow_dirty: flag(allow_dirty, no_allow_dirty, false),
                allow_wip: flag(allow_wip, no_allow_wip, false),
                dry_run: dry_run.dry_run(),
            };
            preflight::run(&mut git, &opts)
        }
        Command::ChunkedReplay {
            base,
            commits,
            chunk_size,
        } => {
            let opts = ChunkedReplayOptions {
                base,
                commits,
                chunk_size,
            };
            chunked::run(&mut git, &opts)
        }
        Command::RerereShare { action, path } => rerere::run(&mut git, action, &path),
        Command::AutoContinue => {
            resume::run(&mut git)?;
            Ok(Outcome::Completed)
        }
        Command::AutoResolveTrivial => {
            resume::run_trivial(&mut git)?;
            Ok(Outcome::Completed)
        }
        Command::RangeDiff { old, new } => {
            println!("{}", inspect::range_diff(&mut git, &old, &new)?);
            Ok(Outcome::Completed)
        }
    }
}

/// Main CLI entry point for `git-tidy`.
///
/// When git launches the binary as its sequence editor
/// (`git-tidy --sequence-editor <plan> <todo>`), the plan is installed
/// into the todo file and nothing else happens. Otherwise the arguments
/// are parsed, logging is set up and the chosen workflow runs.
///
/// # Exit Codes
///
/// * `0` – The workflow completed, had nothing to do, or was cancelled.
/// * Non-zero – Argument errors (clap's code) or any workflow failure.
pub fn entry() -> Result<i32, ()> {
    let args: Vec<String> = env::args().collect();

    // Special case: act as the rebase sequence editor.
    if args.len() >= 2 && args[1] == "--sequence-editor" {
        let plan = args.get(2).map(|s| s.as_str());
        let todo = args.get(3).map(|s| s.as_str());
        return match sequence_editor::run(plan, todo) {
            Ok(()) => Ok(0),
            Err(e) => {
                eprintln!("{}", style(format!("Sequence editor error: {}", e)).red().bold());
                Err(())
            }
        };
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(e.exit_code());
        }
    };

    init_logging(cli.verbose);

    if which::which("git").is_err() {
        eprintln!("{}", style("Error: `git` not found in PATH.").red().bold());
        return Err(());
    }

    match dispatch(cli.command) {
        Ok(Outcome::Completed) => Ok(0),
        Ok(Outcome::NoOp(reason)) => {
            println!("{}", style(reason).yellow());
            Ok(0)
        }
        Ok(Outcome::Cancelled) => {
            println!("{}", style("Cancelled by user. No changes made.").yellow().bold());
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", style(format!("Error: {}", e)).red().bold());
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn group_defaults() {
        let cli = parse(&["git-tidy", "group-commits"]);
        match cli.command {
            Command::GroupCommits {
                base,
                threshold,
                dry_run,
                no_prompt,
            } => {
                assert_eq!(base, None);
                assert_eq!(threshold, 0.3);
                assert!(!dry_run);
                assert!(!no_prompt);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn group_flags_parse() {
        let cli = parse(&[
            "git-tidy",
            "-v",
            "group-commits",
            "--base",
            "main",
            "--threshold",
            "0.5",
            "--dry-run",
            "--no-prompt",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::GroupCommits { ref base, threshold, dry_run: true, no_prompt: true }
                if base.as_deref() == Some("main") && threshold == 0.5
        ));
    }

    #[test]
    fn split_accepts_no_prompt() {
        let cli = parse(&["git-tidy", "split-commits", "--no-prompt", "--base", "HEAD~3"]);
        assert!(matches!(
            cli.command,
            Command::SplitCommits { no_prompt: true, dry_run: false, .. }
        ));
    }

    #[test]
    fn last_of_paired_flags_wins() {
        let cli = parse(&[
            "git-tidy",
            "rebase-skip-merged",
            "--no-prompt",
            "--prompt",
            "--no-backup",
        ]);
        match cli.command {
            Command::RebaseSkipMerged { safety, base, .. } => {
                assert!(safety.prompt());
                assert!(!safety.backup());
                assert_eq!(base, "origin/main");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn tuning_converts_to_merge_settings() {
        let cli = parse(&[
            "git-tidy",
            "smart-merge",
            "--branch",
            "topic",
            "--optimize-merge",
            "--conflict-bias",
            "theirs",
            "--no-rename-detect",
        ]);
        match cli.command {
            Command::SmartMerge { tuning, apply, .. } => {
                let tuning = MergeTuning::from(tuning);
                assert!(tuning.optimize_merge);
                assert_eq!(tuning.conflict_bias, ConflictBias::Theirs);
                assert!(!tuning.rename_detect);
                assert!(!flag(apply.apply, apply.no_apply, false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn smart_merge_requires_branch() {
        assert!(Cli::try_parse_from(["git-tidy", "smart-merge"]).is_err());
    }

    #[test]
    fn revert_commits_split_on_commas() {
        let cli = parse(&["git-tidy", "smart-revert", "--commits", "abc,def", "--apply"]);
        match cli.command {
            Command::SmartRevert { commits, apply, .. } => {
                assert_eq!(commits, vec!["abc", "def"]);
                assert!(flag(apply.apply, apply.no_apply, false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rerere_share_parses_action() {
        let cli = parse(&[
            "git-tidy",
            "rerere-share",
            "--action",
            "export",
            "--path",
            "/tmp/rr",
        ]);
        assert!(matches!(
            cli.command,
            Command::RerereShare { action: RerereAction::Export, .. }
        ));
    }

    #[test]
    fn range_diff_takes_two_positionals() {
        let cli = parse(&["git-tidy", "range-diff", "a..b", "c..d"]);
        assert!(matches!(
            cli.command,
            Command::RangeDiff { ref old, ref new } if old == "a..b" && new == "c..d"
        ));
    }

    #[test]
    fn smart_rebase_defaults_skip_merged_and_summary() {
        let cli = parse(&["git-tidy", "smart-rebase"]);
        match cli.command {
            Command::SmartRebase {
                base,
                dry_run,
                summary,
                no_summary,
                skip_merged,
                no_skip_merged,
                ..
            } => {
                assert_eq!(base, None);
                assert!(!dry_run.dry_run());
                assert!(flag(summary, no_summary, true));
                assert!(flag(skip_merged, no_skip_merged, true));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn smart_rebase_negated_flags() {
        let cli = parse(&[
            "git-tidy",
            "smart-rebase",
            "--base",
            "main",
            "--no-skip-merged",
            "--no-summary",
            "--dry-run",
            "--chunk-size",
            "3",
        ]);
        match cli.command {
            Command::SmartRebase {
                base,
                dry_run,
                chunk_size,
                summary,
                no_summary,
                skip_merged,
                no_skip_merged,
                ..
            } => {
                assert_eq!(base.as_deref(), Some("main"));
                assert!(dry_run.dry_run());
                assert_eq!(chunk_size, Some(3));
                assert!(!flag(summary, no_summary, true));
                assert!(!flag(skip_merged, no_skip_merged, true));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn preflight_defaults_to_origin_main() {
        let cli = parse(&["git-tidy", "preflight-check", "--allow-wip"]);
        match cli.command {
            Command::PreflightCheck {
                base,
                allow_dirty,
                no_allow_dirty,
                allow_wip,
                no_allow_wip,
                ..
            } => {
                assert_eq!(base, "origin/main");
                assert!(!flag(allow_dirty, no_allow_dirty, false));
                assert!(flag(allow_wip, no_allow_wip, false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn chunked_replay_requires_its_arguments() {
        let cli = parse(&[
            "git-tidy",
            "chunked-replay",
            "--base",
            "main",
            "--commits",
            "a,b,c",
            "--chunk-size",
            "2",
        ]);
        assert!(matches!(
            cli.command,
            Command::ChunkedReplay { ref commits, chunk_size: 2, .. } if commits.len() == 3
        ));
        assert!(Cli::try_parse_from(["git-tidy", "chunked-replay", "--base", "main"]).is_err());
    }

    #[test]
    fn auto_resolve_trivial_is_a_subcommand() {
        let cli = parse(&["git-tidy", "auto-resolve-trivial"]);
        assert!(matches!(cli.command, Command::AutoResolveTrivial));
    }

    #[test]
    fn flag_defaults_when_neither_given() {
        assert!(flag(false, false, true));
        assert!(!flag(false, false, false));
        assert!(!flag(true, true, true));
    }
}
