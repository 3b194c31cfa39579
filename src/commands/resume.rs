//! `auto-continue` and `auto-resolve-trivial`: resume a stopped
//! cherry-pick or rebase.

use crate::error::TidyError;
use crate::git::Git;

use tracing::debug;

/// What `auto-continue` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumed {
    CherryPick,
    Rebase,
    Nothing,
}

/// Tries `cherry-pick --continue`, then `rebase --continue`.
///
/// `GIT_EDITOR` is set to `true` so the recorded message is reused without
/// opening an editor.
pub fn auto_continue<G: Git + ?Sized>(git: &mut G) -> Result<Resumed, TidyError> {
    let env = [("GIT_EDITOR", "true")];

    let pick = git.invoke(&["cherry-pick", "--continue"], &env)?;
    if pick.success() {
        return Ok(Resumed::CherryPick);
    }
    debug!(stderr = %pick.stderr.trim(), "no cherry-pick to continue");

    let rebase = git.invoke(&["rebase", "--continue"], &env)?;
    if rebase.success() {
        return Ok(Resumed::Rebase);
    }
    debug!(stderr = %rebase.stderr.trim(), "no rebase to continue");

    Ok(Resumed::Nothing)
}

/// Continues only when git can report the unmerged paths.
///
/// Returns `None` when no conflict information is available, for example
/// outside a repository.
pub fn auto_resolve_trivial<G: Git + ?Sized>(git: &mut G) -> Result<Option<Resumed>, TidyError> {
    let unmerged = git.try_run(&["diff", "--name-only", "--diff-filter=U"])?;
    if !unmerged.success() {
        debug!(stderr = %unmerged.stderr.trim(), "no conflict information");
        return Ok(None);
    }
    auto_continue(git).map(Some)
}

pub fn run_trivial<G: Git + ?Sized>(git: &mut G) -> Result<(), TidyError> {
    match auto_resolve_trivial(git)? {
        None => println!("No conflict information available"),
        Some(Resumed::CherryPick) => println!("Continued after trivial resolution (cherry-pick)"),
        Some(Resumed::Rebase) => println!("Continued after trivial resolution (rebase)"),
        Some(Resumed::Nothing) => println!("Trivial auto-resolution not applicable"),
    }
    Ok(())
}

pub fn run<G: Git + ?Sized>(git: &mut G) -> Result<(), TidyError> {
    match auto_continue(git)? {
        Resumed::CherryPick => println!("Continued cherry-pick"),
        Resumed::Rebase => println!("Continued rebase"),
        Resumed::Nothing => println!("Nothing to continue"),
    }
    Ok(())
}
