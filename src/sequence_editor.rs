use std::fs::{read_to_string, write};
use std::path::Path;

/// Entry point when git invokes this program as `GIT_SEQUENCE_EDITOR`.
///
/// # Arguments
///
/// * `plan_path` - The prepared todo list written by the replay step.
/// * `todo_path` - The todo file git asks to be edited.
///
/// # Returns
///
/// * `Ok(())` once the todo file holds the plan.
/// * `Err(String)` if a path is missing, the plan does not cover the same
///   commits as git's todo list, or an I/O operation fails. A non-zero exit
///   makes git abandon the rebase before touching anything.
pub fn run(plan_path: Option<&str>, todo_path: Option<&str>) -> Result<(), String> {
    match (plan_path, todo_path) {
        (Some(plan), Some(todo)) => install(Path::new(plan), Path::new(todo)),
        (None, _) => Err(String::from("missing plan file path")),
        (_, None) => Err(String::from("missing todo file path")),
    }
}

/// Replaces the contents of `todo` with the plan at `plan`.
pub fn install(plan: &Path, todo: &Path) -> Result<(), String> {
    let plan_body = match read_to_string(plan) {
        Ok(content) => content,
        Err(e) => return Err(format!("read plan failed: {}", e)),
    };
    let todo_body = match read_to_string(todo) {
        Ok(content) => content,
        Err(e) => return Err(format!("read todo failed: {}", e)),
    };

    let mut planned = picked_ids(&plan_body);
    let mut listed = picked_ids(&todo_body);
    planned.sort();
    listed.sort();
    if planned.len() != listed.len()
        || planned.iter().zip(&listed).any(|(a, b)| !same_commit(a, b))
    {
        return Err(String::from("plan does not match the commits being rebased"));
    }

    let mut body = plan_body.trim_end().to_string();
    body.push('\n');
    match write(todo, body) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("write failed: {}", e)),
    }
}

/// Object ids named by `pick` lines, skipping comments and blank lines.
fn picked_ids(body: &str) -> Vec<&str> {
    body.lines()
        .map(str::trim_start)
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("pick") | Some("p"), Some(id)) => Some(id),
                _ => None,
            }
        })
        .collect()
}

/// Abbreviated ids name the same commit when one is a prefix of the other.
fn same_commit(a: &str, b: &str) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

#[cfg(test)]
mod tests {
    use super::{picked_ids, run};
    use std::io::Write;

    fn temp_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        write!(file, "{}", content).expect("failed to write temp file");
        file
    }

    #[test]
    fn plan_replaces_todo() {
        let plan = temp_with("pick bbbbbbbb two\n# Group 2: Files: x\npick aaaaaaaa one");
        let todo = temp_with("pick aaaaaaa one\npick bbbbbbb two\n\n# Rebase abc..def onto abc\n");

        run(plan.path().to_str(), todo.path().to_str()).expect("sequence editor run failed");

        let s = std::fs::read_to_string(todo.path()).expect("failed to read todo");
        assert_eq!(s, "pick bbbbbbbb two\n# Group 2: Files: x\npick aaaaaaaa one\n");
    }

    #[test]
    fn mismatched_plan_leaves_todo_untouched() {
        let plan = temp_with("pick cccccccc three\n");
        let todo = temp_with("pick aaaaaaa one\n");

        let result = run(plan.path().to_str(), todo.path().to_str());
        assert!(result.is_err());

        let s = std::fs::read_to_string(todo.path()).expect("failed to read todo");
        assert_eq!(s, "pick aaaaaaa one\n");
    }

    #[test]
    fn picked_ids_skip_comments() {
        let ids = picked_ids("# pick deadbeef comment\n  pick abc one\nexec make\np def two");
        assert_eq!(ids, vec!["abc", "def"]);
    }

    #[test]
    fn run_without_paths_returns_error() {
        assert_eq!(run(None, Some("todo")).unwrap_err(), "missing plan file path");
        assert_eq!(run(Some("plan"), None).unwrap_err(), "missing todo file path");
    }
}
