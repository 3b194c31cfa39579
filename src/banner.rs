use console::{measure_text_width, style};

/// Prints a boxed, colorized summary of a proposed history rewrite.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so that ANSI color codes inside the
/// content do not throw off the padding. Borders are styled separately
/// from the inner text.
///
/// # Examples
///
/// ```no_run
/// use git_tidy::banner::print_banner;
///
/// print_banner("Proposed grouping", &["Group 1: 2 commits".to_string()]);
/// ```
pub fn print_banner(title: &str, body: &[String]) {
    let lines = banner_lines(title, body);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let pad = max_width - measure_text_width(&line);
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Title in bold, a blank separator, then the body lines.
fn banner_lines(title: &str, body: &[String]) -> Vec<String> {
    std::iter::once(style(title).bold().to_string())
        .chain(std::iter::once(String::new()))
        .chain(body.iter().cloned())
        .collect()
}

/// Summary lines for a grouping: one line per group plus its picks.
pub fn grouping_lines(groups: &[crate::grouping::Group]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        lines.push(
            style(format!(
                "Group {}: {} commits - Files: {}",
                i + 1,
                group.len(),
                group.describe()
            ))
            .cyan()
            .to_string(),
        );
        for commit in group.commits() {
            lines.push(format!("    {} {}", commit.short_sha(), commit.subject));
        }
    }
    lines
}

/// Summary lines for a split: what happens to each commit.
pub fn split_lines(plans: &[(crate::commit::Commit, crate::split::SplitPlan)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (commit, plan) in plans {
        let n = commit.files.len();
        if plan.is_identity() {
            lines.push(format!(
                "Commit {}: {} file -> keep as-is",
                commit.short_sha(),
                n
            ));
            continue;
        }
        lines.push(
            style(format!(
                "Commit {}: {} files -> {} commits",
                commit.short_sha(),
                n,
                plan.derived.len()
            ))
            .cyan()
            .to_string(),
        );
        for file in &commit.files {
            lines.push(format!("    - split off {}", file));
        }
    }
    lines
}
