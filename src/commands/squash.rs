//! `squash-all`: print the commands that collapse a range into one commit.

use crate::backup::Outcome;
use crate::commands::group::load_range;
use crate::commit::short;
use crate::error::TidyError;
use crate::git::{self, Git};

/// Instructions for squashing everything after `base` into one commit.
pub fn instructions(base: &str, count: usize) -> Vec<String> {
    let base = short(base);
    vec![
        String::from("To squash all commits into one, run these commands:"),
        format!("  git reset --soft {}", base),
        String::from("  git commit -m \"Your new commit message\""),
        String::new(),
        String::from("This will:"),
        format!("  - Reset to commit {} (keeping all changes staged)", base),
        String::from("  - Allow you to create a single commit with all changes"),
        format!("  - Combine {} commits into 1 commit", count),
    ]
}

/// Lists the range and prints squash instructions. Never mutates.
pub fn run<G: Git + ?Sized>(git: &mut G, base: Option<&str>) -> Result<Outcome, TidyError> {
    let commits = load_range(git, base)?;
    if commits.is_empty() {
        return Ok(Outcome::NoOp(String::from("No commits found to squash")));
    }

    let parent = git::parent_of(git, &commits[0].sha)?.ok_or_else(|| {
        TidyError::Precondition(String::from(
            "Range starts at the root commit; nothing to reset onto",
        ))
    })?;

    println!("Found {} commits to squash:", commits.len());
    for commit in &commits {
        println!("  {} {}", commit.short_sha(), commit.subject);
    }
    println!();
    for line in instructions(&parent, commits.len()) {
        println!("{}", line);
    }
    Ok(Outcome::Completed)
}
