//! `rerere-share`: move recorded conflict resolutions between the
//! repository and a shared directory.

use crate::backup::Outcome;
use crate::error::TidyError;
use crate::git::{self, Git};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RerereAction {
    Import,
    Export,
}

/// Location of the rerere cache inside a git directory.
pub fn cache_dir(git_dir: &Path) -> PathBuf {
    git_dir.join("rr-cache")
}

/// Copies every file under `src` into `dst`, creating directories as
/// needed and overwriting files that already exist.
///
/// Files that fail to copy are skipped with a warning; the number copied
/// is returned.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, TidyError> {
    fs::create_dir_all(dst)
        .map_err(|e| TidyError::io(format!("cannot create {}", dst.display()), e))?;

    let entries =
        fs::read_dir(src).map_err(|e| TidyError::io(format!("cannot read {}", src.display()), e))?;
    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| TidyError::io(format!("cannot read {}", src.display()), e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            match fs::copy(&from, &to) {
                Ok(_) => copied += 1,
                Err(e) => warn!(file = %from.display(), error = %e, "skipped"),
            }
        }
    }
    Ok(copied)
}

/// Copies a shared cache at `shared` into the repository's `rr-cache`.
pub fn import(git_dir: &Path, shared: &Path) -> Result<usize, TidyError> {
    if !shared.is_dir() {
        return Err(TidyError::Precondition(format!(
            "Invalid rerere cache path: {}",
            shared.display()
        )));
    }
    copy_tree(shared, &cache_dir(git_dir))
}

/// Copies the repository's `rr-cache` out to `shared`.
pub fn export(git_dir: &Path, shared: &Path) -> Result<usize, TidyError> {
    let local = cache_dir(git_dir);
    if !local.is_dir() {
        return Err(TidyError::Precondition(String::from(
            "No local rerere cache to export",
        )));
    }
    copy_tree(&local, shared)
}

pub fn run<G: Git + ?Sized>(
    git: &mut G,
    action: RerereAction,
    path: &Path,
) -> Result<Outcome, TidyError> {
    let git_dir = git::git_dir(git)?;
    match action {
        RerereAction::Import => {
            let n = import(&git_dir, path)?;
            println!("Imported rerere cache ({} files)", n);
        }
        RerereAction::Export => {
            let n = export(&git_dir, path)?;
            println!("Exported rerere cache ({} files)", n);
        }
    }
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_copies_nested_files() {
        let shared = tempfile::tempdir().expect("tempdir");
        let git_dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(shared.path().join("abc123")).expect("mkdir");
        fs::write(shared.path().join("abc123").join("preimage"), "<<<<<<<").expect("write");
        fs::write(shared.path().join("abc123").join("postimage"), "resolved").expect("write");

        let n = import(git_dir.path(), shared.path()).unwrap();
        assert_eq!(n, 2);
        let post =
            fs::read_to_string(git_dir.path().join("rr-cache/abc123/postimage")).expect("read");
        assert_eq!(post, "resolved");
    }

    #[test]
    fn import_rejects_missing_directory() {
        let git_dir = tempfile::tempdir().expect("tempdir");
        let missing = git_dir.path().join("nope");
        assert!(matches!(
            import(git_dir.path(), &missing),
            Err(TidyError::Precondition(_))
        ));
    }

    #[test]
    fn export_requires_local_cache() {
        let git_dir = tempfile::tempdir().expect("tempdir");
        let shared = tempfile::tempdir().expect("tempdir");
        assert!(export(git_dir.path(), shared.path()).is_err());

        fs::create_dir_all(cache_dir(git_dir.path()).join("x")).expect("mkdir");
        fs::write(cache_dir(git_dir.path()).join("x/preimage"), "a").expect("write");
        assert_eq!(export(git_dir.path(), shared.path()).unwrap(), 1);
        assert!(shared.path().join("x/preimage").exists());
    }

    #[test]
    fn copy_overwrites_existing_files() {
        let src = tempfile::tempdir().expect("tempdir");
        let dst = tempfile::tempdir().expect("tempdir");
        fs::write(src.path().join("f"), "new").expect("write");
        fs::write(dst.path().join("f"), "old").expect("write");
        copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(fs::read_to_string(dst.path().join("f")).expect("read"), "new");
    }
}
