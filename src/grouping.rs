//! File-overlap grouping of commits.
//!
//! Commits that touch similar sets of files are gathered into groups so
//! they can be replayed next to each other. The pass is greedy and stable:
//! each group is seeded by the oldest unplaced commit and grows by scanning
//! forward only, and a commit never leaves the group it first joins.

use crate::commit::Commit;

use std::collections::BTreeSet;

/// Similarity bar used when none is given on the command line.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Number of paths listed by [`Group::describe`] before truncating.
const DESCRIBE_LIMIT: usize = 3;

/// Jaccard similarity of two changed-file sets.
///
/// Two empty sets are fully similar and an empty set is not similar to a
/// non-empty one.
pub fn similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

/// Commits placed together by [`group_commits`], in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    commits: Vec<Commit>,
}

impl Group {
    fn seed(first: Commit) -> Self {
        Self {
            commits: vec![first],
        }
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Highest similarity between `files` and any current member.
    fn max_similarity(&self, files: &BTreeSet<String>) -> f64 {
        self.commits
            .iter()
            .map(|c| similarity(&c.files, files))
            .fold(0.0, f64::max)
    }

    /// Union of every member's changed files.
    pub fn files(&self) -> BTreeSet<&str> {
        self.commits
            .iter()
            .flat_map(|c| c.files.iter().map(String::as_str))
            .collect()
    }

    /// Short summary of the group's file footprint.
    ///
    /// Lists up to three paths in sorted order, followed by `and N more`
    /// when the union is larger.
    pub fn describe(&self) -> String {
        let files = self.files();
        let shown = files
            .iter()
            .take(DESCRIBE_LIMIT)
            .copied()
            .collect::<Vec<&str>>()
            .join(", ");

        if files.len() <= DESCRIBE_LIMIT {
            shown
        } else {
            format!("{} and {} more", shown, files.len() - DESCRIBE_LIMIT)
        }
    }
}

/// Partitions `commits` (oldest first) into similarity groups.
///
/// For each commit not yet placed, a new group is started and every later
/// unplaced commit whose best similarity against the group's current
/// members reaches `threshold` (inclusive) is appended to it.
pub fn group_commits(commits: &[Commit], threshold: f64) -> Vec<Group> {
    let mut used = vec![false; commits.len()];
    let mut groups = Vec::new();

    for i in 0..commits.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut group = Group::seed(commits[i].clone());

        for j in (i + 1)..commits.len() {
            if used[j] {
                continue;
            }
            if group.max_similarity(&commits[j].files) >= threshold {
                group.commits.push(commits[j].clone());
                used[j] = true;
            }
        }

        groups.push(group);
    }

    groups
}
