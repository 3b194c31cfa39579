//! `configure-repo`: turn on git settings that make merges and rebases
//! less painful.

use crate::backup::Outcome;
use crate::error::TidyError;
use crate::git::Git;

use console::style;
use tracing::warn;

/// Where settings are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scope {
    #[default]
    Local,
    Global,
}

impl Scope {
    fn flag(self) -> &'static str {
        match self {
            Scope::Local => "--local",
            Scope::Global => "--global",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    #[default]
    Safe,
    Opinionated,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureOptions {
    pub scope: Scope,
    pub preset: Preset,
    pub dry_run: bool,
}

/// The conservative preset.
pub const SAFE_SETTINGS: [(&str, &str); 12] = [
    ("rerere.enabled", "true"),
    ("rerere.autoUpdate", "true"),
    ("merge.conflictStyle", "zdiff3"),
    ("diff.algorithm", "patience"),
    ("diff.indentHeuristic", "true"),
    ("diff.renames", "true"),
    ("merge.renames", "true"),
    ("merge.renameLimit", "32767"),
    ("rebase.backend", "merge"),
    ("rebase.autoStash", "true"),
    ("diff.colorMoved", "zebra"),
    ("color.ui", "auto"),
];

pub fn run<G: Git + ?Sized>(git: &mut G, opts: &ConfigureOptions) -> Result<Outcome, TidyError> {
    if opts.preset != Preset::Safe {
        warn!(preset = ?opts.preset, "preset not implemented, applying safe");
        eprintln!(
            "{}",
            style("Only the safe preset is available; applying it.").yellow()
        );
    }

    let scope = opts.scope.flag();
    if opts.dry_run {
        println!("Planned git configuration changes:");
        for (key, value) in SAFE_SETTINGS {
            println!("  git config {} {} {}", scope, key, value);
        }
        return Ok(Outcome::Completed);
    }

    for (key, value) in SAFE_SETTINGS {
        git.run(&["config", scope, key, value])?;
    }
    println!(
        "{}",
        style(format!("Applied {} settings ({})", SAFE_SETTINGS.len(), scope)).green()
    );
    Ok(Outcome::Completed)
}
