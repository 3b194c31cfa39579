//! # git-tidy
//!
//! A CLI tool to reorganize a range of commits before sharing it.
//!
//! This crate provides functionality to:
//! - Group commits that touch similar files and reorder the range so each
//!   group is contiguous
//! - Split multi-file commits into one commit per file
//! - Guard every history rewrite with a backup branch that is restored on
//!   failure
//! - Rebase, merge and revert with conflict-friendly settings
//!
//! ## Usage
//!
//! ```bash
//! # Preview how the last commits would be grouped
//! git-tidy group-commits --dry-run
//!
//! # Reorder without asking
//! git-tidy group-commits --base main --threshold 0.5 --no-prompt
//!
//! # One commit per file
//! git-tidy split-commits --base HEAD~5
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`commands`] - One workflow per subcommand
//! - [`grouping`] - File-set similarity and the greedy grouping pass
//! - [`plan`] - Replay plans and the scripted rebase
//! - [`split`] - Per-file split plans and their execution
//! - [`backup`] - Backup branches and the workflow supervisor
//! - [`git`] - The `Git` seam and query helpers
//! - [`sequence_editor`] - Installs a replay plan into the rebase todo file
//! - [`prompt`] - Confirmation abstraction
//! - [`banner`] - Boxed summaries

pub mod backup;
pub mod banner;
pub mod cli;
pub mod commands;
pub mod commit;
pub mod error;
pub mod git;
pub mod grouping;
pub mod plan;
pub mod prompt;
pub mod sequence_editor;
pub mod split;
