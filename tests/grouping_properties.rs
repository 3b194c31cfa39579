use git_tidy::commit::Commit;
use git_tidy::grouping::{Group, group_commits, similarity};
use git_tidy::plan::{PlanLine, ReplayPlan};
use git_tidy::split::SplitPlan;

use std::collections::BTreeSet;

fn files(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

fn commit(sha: &str, paths: &[&str]) -> Commit {
    Commit::new(sha, format!("touch {}", sha), format!("touch {}\n\nbody", sha), files(paths))
}

fn shas(groups: &[Group]) -> Vec<Vec<&str>> {
    groups
        .iter()
        .map(|g| g.commits().iter().map(|c| c.sha.as_str()).collect())
        .collect()
}

/// A mixed history: overlapping sources, docs, and two empty commits.
fn history() -> Vec<Commit> {
    vec![
        commit("c0", &["src/a.rs", "src/b.rs"]),
        commit("c1", &["README.md"]),
        commit("c2", &["src/a.rs"]),
        commit("c3", &["src/b.rs", "src/c.rs", "src/d.rs"]),
        commit("c4", &["docs/guide.md", "README.md"]),
        commit("c5", &[]),
        commit("c6", &["src/c.rs"]),
        commit("c7", &[]),
    ]
}

const THRESHOLDS: [f64; 9] = [0.0, 0.1, 0.25, 0.3, 0.34, 0.5, 0.75, 1.0, 1.5];

#[test]
fn similarity_is_commutative_and_reflexive() {
    let sets = [
        files(&[]),
        files(&["a"]),
        files(&["a", "b"]),
        files(&["b", "c", "d"]),
    ];
    for a in &sets {
        for b in &sets {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
        assert_eq!(similarity(a, a), 1.0);
    }
    assert_eq!(similarity(&files(&["a"]), &files(&[])), 0.0);
}

#[test]
fn grouping_is_an_order_preserving_partition() {
    let input = history();
    for t in THRESHOLDS {
        let groups = group_commits(&input, t);

        let mut seen: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.commits().iter().map(|c| c.sha.as_str()))
            .collect();
        for group in &groups {
            let positions: Vec<usize> = group
                .commits()
                .iter()
                .map(|c| input.iter().position(|i| i.sha == c.sha).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "threshold {}", t);
        }
        seen.sort();
        let mut expected: Vec<&str> = input.iter().map(|c| c.sha.as_str()).collect();
        expected.sort();
        assert_eq!(seen, expected, "threshold {}", t);
    }
}

#[test]
fn grouping_is_deterministic() {
    let input = history();
    for t in THRESHOLDS {
        assert_eq!(group_commits(&input, t), group_commits(&input, t));
    }
}

#[test]
fn higher_threshold_never_grows_groups() {
    let input = history();
    let mut last_largest = usize::MAX;
    let mut last_count = 0;
    for t in THRESHOLDS {
        let groups = group_commits(&input, t);
        let largest = groups.iter().map(Group::len).max().unwrap();
        assert!(largest <= last_largest, "threshold {}", t);
        assert!(groups.len() >= last_count, "threshold {}", t);
        last_largest = largest;
        last_count = groups.len();
    }
}

#[test]
fn zero_threshold_makes_one_group() {
    let groups = group_commits(&history(), 0.0);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        shas(&groups)[0],
        vec!["c0", "c1", "c2", "c3", "c4", "c5", "c6", "c7"]
    );
}

#[test]
fn threshold_of_one_only_joins_identical_sets() {
    let groups = group_commits(&history(), 1.0);
    assert_eq!(groups.len(), 7);
    assert!(shas(&groups).contains(&vec!["c5", "c7"]));
}

#[test]
fn threshold_above_one_keeps_everything_apart() {
    let groups = group_commits(&history(), 1.5);
    assert_eq!(groups.len(), 8);
    assert!(groups.iter().all(|g| g.len() == 1));
}

#[test]
fn inclusive_threshold_joins_half_overlap() {
    let input = vec![
        commit("A", &["x", "y"]),
        commit("B", &["z"]),
        commit("C", &["x"]),
    ];
    let groups = group_commits(&input, 0.5);
    assert_eq!(shas(&groups), vec![vec!["A", "C"], vec!["B"]]);
}

#[test]
fn disjoint_commits_stay_in_order() {
    let input = vec![commit("A", &["x"]), commit("B", &["y"]), commit("C", &["z"])];
    let groups = group_commits(&input, 0.3);
    assert_eq!(shas(&groups), vec![vec!["A"], vec!["B"], vec!["C"]]);
    assert!(ReplayPlan::build(&groups).is_some());
}

#[test]
fn descriptor_truncates_after_three_paths() {
    let groups = group_commits(&[commit("A", &["e", "d", "c", "b", "a"])], 0.3);
    let text = groups[0].describe();
    assert!(text.starts_with("a, b, c"));
    assert!(text.ends_with("and 2 more"));

    let three = group_commits(&[commit("A", &["p", "q", "r"])], 0.3);
    assert_eq!(three[0].describe(), "p, q, r");

    let four = group_commits(&[commit("A", &["p", "q", "r", "s"])], 0.3);
    assert_eq!(four[0].describe(), "p, q, r and 1 more");
}

#[test]
fn single_group_needs_no_replay() {
    let groups = group_commits(&history(), 0.0);
    assert!(ReplayPlan::build(&groups).is_none());
}

#[test]
fn plan_lists_groups_contiguously_with_boundaries() {
    let groups = group_commits(&history(), 0.3);
    let plan = ReplayPlan::build(&groups).expect("several groups");

    let picks: Vec<&str> = plan.picks().collect();
    assert_eq!(picks, vec!["c0", "c2", "c1", "c4", "c3", "c6", "c5", "c7"]);

    let boundaries = plan
        .lines()
        .iter()
        .filter(|l| matches!(l, PlanLine::Boundary { .. }))
        .count();
    assert_eq!(boundaries, groups.len() - 1);
    assert!(plan.to_todo().contains("# Group 2: Files: README.md, docs/guide.md"));
}

#[test]
fn split_keeps_empty_and_single_file_commits() {
    let empty = SplitPlan::for_commit(&commit("E", &[]));
    assert!(empty.is_identity());
    assert_eq!(empty.derived[0].file, None);
    assert_eq!(empty.derived[0].message, "touch E\n\nbody");

    let multi = SplitPlan::for_commit(&commit("M", &["b.rs", "a.rs"]));
    let targets: Vec<Option<&str>> = multi.derived.iter().map(|d| d.file.as_deref()).collect();
    assert_eq!(targets, vec![Some("a.rs"), Some("b.rs")]);
    assert!(multi.derived[0].message.starts_with("split off a.rs\n\n"));
}
