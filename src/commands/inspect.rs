//! Read-only helpers: `select-base` and `range-diff`.

use crate::error::TidyError;
use crate::git::Git;

/// Candidates tried by `select-base` when none are given.
pub const PREFERRED_BASES: [&str; 4] = ["origin/main", "main", "origin/master", "master"];
pub const FALLBACK_BASE: &str = "HEAD~10";

/// First candidate that shares history with `HEAD`, or `fallback`.
pub fn select_base<G: Git + ?Sized>(
    git: &mut G,
    preferred: &[String],
    fallback: &str,
) -> Result<String, TidyError> {
    for candidate in preferred {
        let out = git.try_run(&["merge-base", "HEAD", candidate])?;
        if out.success() && !out.stdout.trim().is_empty() {
            return Ok(candidate.clone());
        }
    }
    Ok(fallback.to_string())
}

/// Output of `git range-diff old new`.
///
/// Git's error text is returned instead when the comparison fails, so the
/// report is printed either way.
pub fn range_diff<G: Git + ?Sized>(git: &mut G, old: &str, new: &str) -> Result<String, TidyError> {
    let out = git.try_run(&["range-diff", old, new])?;
    Ok(if out.success() { out.stdout } else { out.stderr })
}
