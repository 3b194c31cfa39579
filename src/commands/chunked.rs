//! `chunked-replay`: cherry-pick an explicit list of commits onto a base,
//! a few at a time, on a fresh branch.
//!
//! Nothing existing is rewritten, so no backup is taken. A failed chunk is
//! aborted and the temporary branch is kept for inspection.

use crate::backup::Outcome;
use crate::commands::best_effort;
use crate::error::TidyError;
use crate::git::{self, Git};

use console::style;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedReplayOptions {
    pub base: String,
    /// Commits to replay, oldest first.
    pub commits: Vec<String>,
    pub chunk_size: usize,
}

/// Name of the branch the replay lands on.
pub fn temp_branch(short_head: &str) -> String {
    format!("chunked-{}", short_head)
}

pub fn run<G: Git + ?Sized>(
    git: &mut G,
    opts: &ChunkedReplayOptions,
) -> Result<Outcome, TidyError> {
    if opts.base.is_empty() || opts.commits.is_empty() || opts.chunk_size == 0 {
        return Err(TidyError::Precondition(String::from(
            "chunked-replay needs --base, --commits and a --chunk-size above zero",
        )));
    }
    git::ensure_clean(git, "replaying")?;

    let temp = temp_branch(&git.run(&["rev-parse", "--short", "HEAD"])?);
    git.run(&["switch", "-c", &temp, &opts.base])?;

    let total = opts.commits.len().div_ceil(opts.chunk_size);
    for (i, chunk) in opts.commits.chunks(opts.chunk_size).enumerate() {
        info!(chunk = i + 1, total, "replaying chunk");
        let mut args = vec!["cherry-pick"];
        args.extend(chunk.iter().map(String::as_str));

        let out = git.try_run(&args)?;
        if !out.success() {
            eprintln!("Chunk failed; aborting and leaving temp branch for inspection");
            best_effort(git, &["cherry-pick", "--abort"]);
            return Err(TidyError::Replay(format!(
                "chunk {} of {} stopped on {}: {}",
                i + 1,
                total,
                temp,
                out.stderr.trim()
            )));
        }
    }

    println!(
        "{}",
        style(format!("Chunked replay completed on {}", temp)).green().bold()
    );
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::FakeGit;

    fn opts(chunk_size: usize) -> ChunkedReplayOptions {
        ChunkedReplayOptions {
            base: String::from("origin/main"),
            commits: ["c1", "c2", "c3", "c4", "c5"].iter().map(|s| s.to_string()).collect(),
            chunk_size,
        }
    }

    fn repo() -> FakeGit {
        let mut git = FakeGit::new();
        git.ok("rev-parse --short HEAD", "abc1234");
        git
    }

    #[test]
    fn picks_in_chunks_on_a_new_branch() {
        let mut git = repo();
        assert_eq!(run(&mut git, &opts(2)).unwrap(), Outcome::Completed);
        assert_eq!(
            git.calls,
            vec![
                "status --porcelain=v1",
                "rev-parse --short HEAD",
                "switch -c chunked-abc1234 origin/main",
                "cherry-pick c1 c2",
                "cherry-pick c3 c4",
                "cherry-pick c5",
            ]
        );
    }

    #[test]
    fn failed_chunk_aborts_and_keeps_branch() {
        let mut git = repo();
        git.ok("cherry-pick c1", "").fail("cherry-pick c4", "CONFLICT (content)");

        let err = run(&mut git, &opts(3)).unwrap_err();
        assert!(matches!(err, TidyError::Replay(ref m) if m.contains("chunk 2 of 2")));
        assert!(git.called("cherry-pick --abort"));
        assert!(git.calls_starting("branch -D").is_empty());
        assert!(git.calls_starting("reset").is_empty());
    }

    #[test]
    fn failed_abort_keeps_the_chunk_error() {
        let mut git = repo();
        git.fail("cherry-pick c1", "CONFLICT")
            .fail("cherry-pick --abort", "error: no cherry-pick in progress");
        assert!(matches!(run(&mut git, &opts(5)), Err(TidyError::Replay(_))));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        for bad in [
            ChunkedReplayOptions { chunk_size: 0, ..opts(1) },
            ChunkedReplayOptions { commits: Vec::new(), ..opts(1) },
            ChunkedReplayOptions { base: String::new(), ..opts(1) },
        ] {
            let mut git = FakeGit::new();
            assert!(matches!(run(&mut git, &bad), Err(TidyError::Precondition(_))));
            assert!(git.calls.is_empty());
        }
    }
}
