//! Safety branches around history-rewriting workflows.
//!
//! A [`WorkflowContext`] moves through `Idle -> BackedUp -> CleanedUp` on
//! success, or `Idle -> BackedUp -> Restored` when the wrapped work fails.
//! [`supervise`] drives these transitions around a workflow body.

use crate::commit::short;
use crate::error::TidyError;
use crate::git::{self, Git};

use console::style;
use tracing::{info, warn};

/// Prefix of every safety branch name.
pub const BACKUP_PREFIX: &str = "backup-";

/// Where the repository stood before a workflow began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHandle {
    /// `None` when `HEAD` was detached.
    pub original_branch: Option<String>,
    pub original_head: String,
    pub branch: String,
}

impl BackupHandle {
    fn new(original_branch: Option<String>, original_head: String) -> Self {
        let branch = format!("{}{}", BACKUP_PREFIX, short(&original_head));
        Self {
            original_branch,
            original_head,
            branch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupState {
    Idle,
    BackedUp(BackupHandle),
    CleanedUp,
    Restored,
}

/// How a supervised workflow ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Nothing needed doing; the reason is shown to the user.
    NoOp(String),
    /// The user declined at a confirmation prompt.
    Cancelled,
}

/// Backup bookkeeping for one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    state: BackupState,
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowContext {
    pub fn new() -> Self {
        Self {
            state: BackupState::Idle,
        }
    }

    pub fn state(&self) -> &BackupState {
        &self.state
    }

    /// The live backup, if any.
    pub fn handle(&self) -> Option<&BackupHandle> {
        match &self.state {
            BackupState::BackedUp(h) => Some(h),
            _ => None,
        }
    }

    /// Records the current position and creates the safety branch there.
    pub fn back_up<G: Git + ?Sized>(&mut self, git: &mut G) -> Result<BackupHandle, TidyError> {
        if let BackupState::BackedUp(h) = &self.state {
            return Err(TidyError::BackupActive(h.branch.clone()));
        }

        let branch = git::current_branch(git)?;
        let head = git::head(git)?;
        let handle = BackupHandle::new(branch, head);
        git.run(&["branch", &handle.branch, "HEAD"])?;

        println!("Created backup branch: {}", style(&handle.branch).cyan());
        info!(branch = %handle.branch, "backup created");

        self.state = BackupState::BackedUp(handle.clone());
        Ok(handle)
    }

    /// Deletes the safety branch after a successful workflow.
    pub fn clean_up<G: Git + ?Sized>(&mut self, git: &mut G) -> Result<(), TidyError> {
        let handle = match &self.state {
            BackupState::BackedUp(h) => h.clone(),
            _ => return Ok(()),
        };

        let out = git.try_run(&["branch", "-D", &handle.branch])?;
        if !out.success() {
            warn!(
                branch = %handle.branch,
                stderr = %out.stderr.trim(),
                "backup branch not deleted"
            );
        }
        println!("Cleaned up backup branch: {}", style(&handle.branch).cyan());

        self.state = BackupState::CleanedUp;
        Ok(())
    }

    /// Returns the repository to the recorded position.
    ///
    /// An unfinished rebase is aborted first, then `HEAD` is reset hard to
    /// the original commit and the safety branch is deleted.
    pub fn restore<G: Git + ?Sized>(&mut self, git: &mut G) -> Result<(), TidyError> {
        let handle = match &self.state {
            BackupState::BackedUp(h) => h.clone(),
            _ => return Ok(()),
        };

        eprintln!("{}", style("Restoring from backup due to error...").yellow());

        match git::git_dir(git) {
            Ok(dir) => {
                if git::rebase_in_progress(&dir) {
                    eprintln!("{}", style("Aborting incomplete rebase...").yellow());
                    let out = git.try_run(&["rebase", "--abort"])?;
                    if !out.success() {
                        warn!(stderr = %out.stderr.trim(), "rebase --abort failed");
                    }
                }
            }
            Err(e) => warn!(error = %e, "cannot locate git dir; skipping rebase check"),
        }

        git.run(&["reset", "--hard", &handle.original_head])?;
        let out = git.try_run(&["branch", "-D", &handle.branch])?;
        if !out.success() {
            warn!(branch = %handle.branch, "backup branch not deleted after restore");
        }
        info!(head = %handle.original_head, "restored");

        self.state = BackupState::Restored;
        Ok(())
    }
}

/// Runs `body` between a backup and its cleanup or restore.
///
/// `Ok` outcomes delete the safety branch. An `Err` restores the
/// repository and is then returned to the caller; if the restore itself
/// fails, that failure is logged and the original error still wins.
pub fn supervise<G, F>(git: &mut G, body: F) -> Result<Outcome, TidyError>
where
    G: Git + ?Sized,
    F: FnOnce(&mut G, &WorkflowContext) -> Result<Outcome, TidyError>,
{
    let mut ctx = WorkflowContext::new();
    ctx.back_up(git)?;

    match body(git, &ctx) {
        Ok(outcome) => {
            ctx.clean_up(git)?;
            Ok(outcome)
        }
        Err(e) => {
            if let Err(restore_err) = ctx.restore(git) {
                warn!(error = %restore_err, "restore failed");
                eprintln!(
                    "{}",
                    style(format!("Restore failed: {}", restore_err)).red().bold()
                );
            }
            Err(e)
        }
    }
}
