use crate::commit::Commit;
use crate::error::TidyError;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a single `git` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

impl GitOutput {
    /// Returns `true` when `git` exited with status `0`.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Abstraction over the `git` command-line program.
///
/// Every workflow in this crate is a sequence of calls through this trait.
/// Implementors only provide [`Git::invoke`]; the checked and unchecked
/// helpers are built on top of it. This keeps the sequencing logic testable
/// with a scripted implementation instead of a live repository.
pub trait Git {
    /// Runs `git <args>` with `extra_env` added to the inherited environment.
    ///
    /// # Returns
    ///
    /// * `Ok(GitOutput)` whenever the process ran, whatever its exit code.
    /// * `Err(TidyError::Spawn)` if the process could not be started.
    fn invoke(&mut self, args: &[&str], extra_env: &[(&str, &str)]) -> Result<GitOutput, TidyError>;

    /// Runs a required `git` command and returns its trimmed standard output.
    ///
    /// A non-zero exit becomes [`TidyError::Git`] carrying the command line
    /// and the trimmed standard error.
    fn run(&mut self, args: &[&str]) -> Result<String, TidyError> {
        let out = self.invoke(args, &[])?;
        if out.success() {
            Ok(out.stdout.trim().to_string())
        } else {
            Err(TidyError::Git {
                args: args.join(" "),
                stderr: out.stderr.trim().to_string(),
            })
        }
    }

    /// Runs a `git` command whose failure the caller inspects itself.
    fn try_run(&mut self, args: &[&str]) -> Result<GitOutput, TidyError> {
        self.invoke(args, &[])
    }
}

/// [`Git`] implementation that spawns the system `git` binary in the
/// current working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl Git for SystemGit {
    fn invoke(
        &mut self,
        args: &[&str],
        extra_env: &[(&str, &str)],
    ) -> Result<GitOutput, TidyError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        for (key, value) in extra_env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let out = cmd.output().map_err(|e| TidyError::Spawn {
            args: args.join(" "),
            source: e,
        })?;

        let code = out.status.code().unwrap_or(-1);
        debug!(args = %args.join(" "), code, "git");

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            code,
        })
    }
}

/// Builds the value for the `GIT_SEQUENCE_EDITOR` environment variable.
///
/// Git appends the todo file path to this command, so the resulting
/// invocation is `<exe> --sequence-editor <plan> <todo>`. Git hands the
/// value to the shell, so any path with characters outside a conservative
/// set is single-quoted.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     build_sequence_editor_env("/usr/local/bin/git-tidy", "/tmp/plan.txt"),
///     "/usr/local/bin/git-tidy --sequence-editor /tmp/plan.txt"
/// );
/// ```
pub(crate) fn build_sequence_editor_env(exe_path: &str, plan_path: &str) -> String {
    format!("{} --sequence-editor {}", quote(exe_path), quote(plan_path))
}

fn quote(path: &str) -> String {
    let plain = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:@,=".contains(c));
    if plain {
        path.to_string()
    } else {
        format!("'{}'", path.replace('\'', "'\\''"))
    }
}

/// Detects if a Git rebase is currently in progress.
///
/// This checks for the presence of the `rebase-merge` or `rebase-apply`
/// directories inside the git directory, which Git creates during an
/// interactive or apply-style rebase.
pub fn rebase_in_progress(git_dir: &Path) -> bool {
    git_dir.join("rebase-merge").exists() || git_dir.join("rebase-apply").exists()
}

/// Absolute path of the repository's git directory.
pub fn git_dir<G: Git + ?Sized>(git: &mut G) -> Result<PathBuf, TidyError> {
    git.run(&["rev-parse", "--absolute-git-dir"]).map(PathBuf::from)
}

/// Name of the checked-out branch, or `None` on a detached `HEAD`.
pub fn current_branch<G: Git + ?Sized>(git: &mut G) -> Result<Option<String>, TidyError> {
    let name = git.run(&["branch", "--show-current"])?;
    Ok(if name.is_empty() { None } else { Some(name) })
}

/// Full object id of `HEAD`.
pub fn head<G: Git + ?Sized>(git: &mut G) -> Result<String, TidyError> {
    git.run(&["rev-parse", "HEAD"])
}

/// Returns `true` when `git status --porcelain` reports nothing.
pub fn worktree_clean<G: Git + ?Sized>(git: &mut G) -> Result<bool, TidyError> {
    Ok(git.run(&["status", "--porcelain=v1"])?.is_empty())
}

/// Fails with a precondition error unless the worktree is clean.
///
/// Every workflow that may end in `reset --hard` calls this before taking
/// a backup, so a restore can never discard uncommitted work.
pub fn ensure_clean<G: Git + ?Sized>(git: &mut G, action: &str) -> Result<(), TidyError> {
    if worktree_clean(git)? {
        Ok(())
    } else {
        Err(TidyError::Precondition(format!(
            "Working tree has uncommitted changes; commit or stash them before {}",
            action
        )))
    }
}

/// Parent of `sha`, or `None` when `sha` is a root commit.
pub fn parent_of<G: Git + ?Sized>(git: &mut G, sha: &str) -> Result<Option<String>, TidyError> {
    let rev = format!("{}^", sha);
    let out = git.try_run(&["rev-parse", "--verify", "--quiet", &rev])?;
    if out.success() {
        Ok(Some(out.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}

/// Set of paths touched by `sha`.
///
/// Renames are reported as a deletion plus an addition so that both paths
/// can be staged independently.
pub fn commit_files<G: Git + ?Sized>(
    git: &mut G,
    sha: &str,
) -> Result<BTreeSet<String>, TidyError> {
    let out = git.run(&["show", "--name-only", "--no-renames", "--pretty=format:", sha])?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Full commit message body of `sha`.
pub fn commit_message<G: Git + ?Sized>(git: &mut G, sha: &str) -> Result<String, TidyError> {
    git.run(&["show", "--no-patch", "--pretty=format:%B", sha])
}

/// Lists the commits in `base..HEAD`, oldest first, with their file sets
/// and messages.
pub fn list_commits<G: Git + ?Sized>(git: &mut G, base: &str) -> Result<Vec<Commit>, TidyError> {
    let range = format!("{}..HEAD", base);
    let log = git.run(&["log", &range, "--pretty=format:%H|%s", "--reverse"])?;

    let mut commits = Vec::new();
    for line in log.lines().filter(|l| !l.is_empty()) {
        let (sha, subject) = Commit::parse_log_line(line)?;
        let files = commit_files(git, &sha)?;
        let message = commit_message(git, &sha)?;
        commits.push(Commit::new(sha, subject, message, files));
    }
    Ok(commits)
}

const MAIN_BRANCHES: [&str; 4] = ["main", "master", "origin/main", "origin/master"];
const RECENT_COMMITS: usize = 10;

/// Picks the base of the range to tidy when none was given.
///
/// On `main`/`master` or a detached `HEAD` the last ten commits are used.
/// On any other branch the merge-base with the first main branch that
/// differs from `HEAD` is used, falling back to the last ten commits.
pub fn default_base<G: Git + ?Sized>(git: &mut G) -> Result<String, TidyError> {
    let branch = current_branch(git).unwrap_or(None);
    let on_main = match branch.as_deref() {
        None => true,
        Some(b) => b == "main" || b == "master",
    };

    if !on_main {
        let head_sha = head(git)?;
        for candidate in MAIN_BRANCHES {
            let out = git.try_run(&["merge-base", "HEAD", candidate])?;
            if !out.success() {
                continue;
            }
            let base = out.stdout.trim().to_string();
            if !base.is_empty() && base != head_sha {
                return Ok(base);
            }
        }
    }

    recent_base(git)
}

fn recent_base<G: Git + ?Sized>(git: &mut G) -> Result<String, TidyError> {
    let count = git
        .run(&["rev-list", "--count", "HEAD"])
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);
    let n = count.min(RECENT_COMMITS);
    if n <= 1 {
        Ok(String::from("HEAD"))
    } else {
        Ok(format!("HEAD~{}", n - 1))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeGit;
    use super::*;
    use std::fs;

    #[test]
    fn sequence_editor_quotes_when_needed() {
        let s = build_sequence_editor_env("/Users/me/My App/bin", "/tmp/plan.txt");
        assert_eq!(s, "'/Users/me/My App/bin' --sequence-editor /tmp/plan.txt");
    }

    #[test]
    fn sequence_editor_quotes_plan_path() {
        let s = build_sequence_editor_env("/usr/local/bin/git-tidy", "/tmp/my plan.txt");
        assert_eq!(s, "/usr/local/bin/git-tidy --sequence-editor '/tmp/my plan.txt'");
    }

    #[test]
    fn sequence_editor_quotes_shell_metacharacters() {
        let s = build_sequence_editor_env("/opt/$HOME&co/git-tidy", "/tmp/it's.txt");
        assert_eq!(
            s,
            "'/opt/$HOME&co/git-tidy' --sequence-editor '/tmp/it'\\''s.txt'"
        );
    }

    #[test]
    fn rebase_progress_detection_smoke() {
        let dir = tempfile::tempdir().expect("tempdir");
        let git_dir = dir.path().join(".git");
        fs::create_dir_all(&git_dir).expect("create .git");
        assert!(!rebase_in_progress(&git_dir));
        fs::create_dir_all(git_dir.join("rebase-merge")).expect("create rebase-merge");
        assert!(rebase_in_progress(&git_dir));
    }

    #[test]
    fn rebase_apply_counts_as_in_progress() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("rebase-apply")).expect("create rebase-apply");
        assert!(rebase_in_progress(dir.path()));
    }

    #[test]
    fn run_turns_non_zero_exit_into_error() {
        let mut git = FakeGit::new();
        git.fail("rev-parse", "fatal: not a git repository");
        let err = git.run(&["rev-parse", "HEAD"]).unwrap_err();
        assert!(err.to_string().contains("not a git repository"));
    }

    #[test]
    fn detached_head_has_no_branch() {
        let mut git = FakeGit::new();
        git.ok("branch --show-current", "\n");
        assert_eq!(current_branch(&mut git).unwrap(), None);
    }

    #[test]
    fn list_commits_parses_log_and_files() {
        let mut git = FakeGit::new();
        git.ok("log", "aaa|First\nbbb|Second | with bar")
            .ok("show --name-only --no-renames --pretty=format: aaa", "x.rs\ny.rs\n")
            .ok("show --no-patch --pretty=format:%B aaa", "First\n\nbody")
            .ok("show --name-only --no-renames --pretty=format: bbb", "z.rs\n")
            .ok("show --no-patch --pretty=format:%B bbb", "Second | with bar");

        let commits = list_commits(&mut git, "base").unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, "aaa");
        assert_eq!(commits[0].message, "First\n\nbody");
        assert_eq!(commits[0].files.len(), 2);
        assert_eq!(commits[1].subject, "Second | with bar");
        assert!(git.called("log base..HEAD --pretty=format:%H|%s --reverse"));
    }

    #[test]
    fn default_base_on_main_uses_recent_commits() {
        let mut git = FakeGit::new();
        git.ok("branch --show-current", "main").ok("rev-list --count HEAD", "25");
        assert_eq!(default_base(&mut git).unwrap(), "HEAD~9");
    }

    #[test]
    fn default_base_with_single_commit_is_head() {
        let mut git = FakeGit::new();
        git.ok("branch --show-current", "").ok("rev-list --count HEAD", "1");
        assert_eq!(default_base(&mut git).unwrap(), "HEAD");
    }

    #[test]
    fn default_base_on_feature_branch_uses_merge_base() {
        let mut git = FakeGit::new();
        git.ok("branch --show-current", "feature")
            .ok("rev-parse HEAD", "head123")
            .fail("merge-base HEAD main", "fatal")
            .ok("merge-base HEAD master", "base456");
        assert_eq!(default_base(&mut git).unwrap(), "base456");
    }

    #[test]
    fn root_commit_has_no_parent() {
        let mut git = FakeGit::new();
        git.fail("rev-parse --verify --quiet", "");
        assert_eq!(parent_of(&mut git, "abc").unwrap(), None);
    }
}
