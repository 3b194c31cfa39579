//! `split-commits`: rebuild a range with one commit per changed file.

use crate::backup::{Outcome, supervise};
use crate::banner::{print_banner, split_lines};
use crate::commands::group::load_range;
use crate::commit::Commit;
use crate::error::TidyError;
use crate::git::{self, Git};
use crate::prompt::{ConfirmPrompter, proceed};
use crate::split::{SplitPlan, execute, needs_splitting};

use console::style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    pub base: Option<String>,
    pub dry_run: bool,
    pub prompt: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            base: None,
            dry_run: false,
            prompt: true,
        }
    }
}

fn preview(commits: &[Commit]) {
    println!("Found {} commits to split:", commits.len());
    for commit in commits {
        let files: Vec<&str> = commit.files.iter().map(String::as_str).collect();
        println!(
            "\n{}",
            style(format!("Commit {}: {}", commit.short_sha(), commit.subject)).bold()
        );
        println!("  Files ({}): {}", files.len(), files.join(", "));
        let plan = SplitPlan::for_commit(commit);
        if plan.is_identity() {
            println!("  Would keep as-is");
        } else {
            println!("  Would create {} separate commits:", plan.derived.len());
            for file in &files {
                println!("    - split off {}", file);
            }
        }
    }
}

/// Runs the split workflow.
pub fn run<G, P>(git: &mut G, prompter: &mut P, opts: &SplitOptions) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    P: ConfirmPrompter + ?Sized,
{
    if opts.dry_run {
        let commits = load_range(git, opts.base.as_deref())?;
        preview(&commits);
        return Ok(Outcome::Completed);
    }

    git::ensure_clean(git, "splitting")?;

    supervise(git, |git, _ctx| {
        let commits = load_range(git, opts.base.as_deref())?;
        if commits.is_empty() {
            return Ok(Outcome::NoOp(String::from("No commits found to split")));
        }
        println!("Found {} commits to split", commits.len());

        if !needs_splitting(&commits) {
            return Ok(Outcome::NoOp(String::from(
                "No commits need splitting - all commits already have single files",
            )));
        }

        let plans: Vec<(Commit, SplitPlan)> = commits
            .iter()
            .map(|c| (c.clone(), SplitPlan::for_commit(c)))
            .collect();
        let total: usize = plans.iter().map(|(_, p)| p.derived.len()).sum();
        print_banner(
            &format!("Splitting {} commits into {} commits", commits.len(), total),
            &split_lines(&plans),
        );

        if !proceed(prompter, opts.prompt, "Proceed with split rebase?")? {
            return Ok(Outcome::Cancelled);
        }

        let base = match git::parent_of(git, &commits[0].sha)? {
            Some(b) => b,
            None => {
                return Err(TidyError::Precondition(String::from(
                    "Cannot split a range that starts at the root commit",
                )));
            }
        };
        println!("Resetting to base commit {}...", crate::commit::short(&base));

        let plans: Vec<SplitPlan> = plans.into_iter().map(|(_, p)| p).collect();
        let created = execute(git, &base, &plans)?;

        println!(
            "{}",
            style(format!("Successfully created {} commits:", created.len()))
                .green()
                .bold()
        );
        for (i, message) in created.iter().enumerate() {
            println!("  {}. {}", i + 1, message.lines().next().unwrap_or(""));
        }
        Ok(Outcome::Completed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::FakeGit;
    use crate::prompt::testing::MockConfirmPrompter;

    fn repo(files_of_a: &str) -> FakeGit {
        let mut git = FakeGit::new();
        git.ok("status --porcelain=v1", "")
            .ok("branch --show-current", "feature")
            .ok("rev-parse HEAD", "eeeeeeeeeeeeeeee")
            .ok("rev-parse --absolute-git-dir", "/nonexistent")
            .ok("log", "aaaaaaaaaa|Change stuff")
            .ok("show --name-only --no-renames --pretty=format: aaaaaaaaaa", files_of_a)
            .ok("show --no-patch --pretty=format:%B aaaaaaaaaa", "Change stuff")
            .ok("rev-parse --verify --quiet aaaaaaaaaa^", "base000000");
        git
    }

    fn opts() -> SplitOptions {
        SplitOptions {
            base: Some("main".to_string()),
            prompt: false,
            ..SplitOptions::default()
        }
    }

    #[test]
    fn dirty_worktree_is_refused_before_backup() {
        let mut git = FakeGit::new();
        git.ok("status --porcelain=v1", " M src/lib.rs");
        let mut prompter = MockConfirmPrompter::answering(true);

        let err = run(&mut git, &mut prompter, &opts()).unwrap_err();
        assert!(matches!(err, TidyError::Precondition(_)));
        assert_eq!(git.calls, vec!["status --porcelain=v1"]);
    }

    #[test]
    fn single_file_commits_are_noop() {
        let mut git = repo("only.rs");
        let mut prompter = MockConfirmPrompter::answering(true);
        let outcome = run(&mut git, &mut prompter, &opts()).unwrap();

        assert!(matches!(outcome, Outcome::NoOp(_)));
        assert!(git.calls_starting("reset").is_empty());
        assert!(git.calls_starting("commit").is_empty());
    }

    #[test]
    fn multi_file_commit_is_split_and_backup_removed() {
        let mut git = repo("b.rs\na.rs");
        let mut prompter = MockConfirmPrompter::answering(true);
        let outcome = run(&mut git, &mut prompter, &opts()).unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert!(git.called("reset --hard base000000"));
        assert!(git.called("commit -m split off a.rs\n\nChange stuff"));
        assert!(git.called("commit -m split off b.rs\n\nChange stuff"));
        assert!(git.called("branch -D backup-eeeeeeee"));
    }

    #[test]
    fn failure_mid_split_restores() {
        let mut git = repo("b.rs\na.rs");
        git.fail("commit -m split off b.rs", "error: nothing to commit");
        let mut prompter = MockConfirmPrompter::answering(true);

        assert!(run(&mut git, &mut prompter, &opts()).is_err());
        assert!(git.called("reset --hard eeeeeeeeeeeeeeee"));
    }
}
