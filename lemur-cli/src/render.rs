//! Terminal rendering of trees, candidates and match results.

use lemur_dom::{DomTree, NodeId};
use lemur_select::{GeneratedSelector, MatchResult};
use owo_colors::OwoColorize;
use std::collections::HashSet;

/// Print the element tree, one node per line, indented by depth. Nodes in
/// `highlight` get a marker; `check` uses this to show matches in place.
pub fn print_tree(tree: &DomTree, highlight: &HashSet<NodeId>) {
    for id in tree.iter() {
        let Some(node) = tree.get(id) else { continue };
        let indent = "  ".repeat(node.depth);
        let marker = if highlight.contains(&id) {
            format!("{} ", "▶".green().bold())
        } else {
            String::new()
        };

        let mut line = format!("<{}", node.tag_name.cyan());
        if let Some(id_attr) = node.id_attr() {
            line.push_str(&format!(" id=\"{}\"", id_attr.green()));
        }
        if let Some(class) = node.attr("class") {
            line.push_str(&format!(" class=\"{}\"", class.yellow()));
        }
        line.push('>');
        if let Some(text) = &node.text {
            line.push_str(&format!(" {}", truncate(text, 40).dimmed()));
        }

        println!("{indent}{marker}{line}  {}", format!("[{id}]").dimmed());
    }
}

/// Print ranked candidates as a table: rank, kind, weight, selector.
pub fn print_candidates(candidates: &[GeneratedSelector]) {
    for (rank, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>2}. {:<5} {:>4}  {}",
            rank + 1,
            candidate.kind.to_string().magenta(),
            candidate.specificity,
            candidate.text.bold()
        );
    }
}

/// Print a match result summary line.
pub fn print_result(result: &MatchResult) {
    if let Some(error) = &result.error {
        println!("{}: {error}", "error".red().bold());
        return;
    }
    let count = result.match_count();
    let noun = if count == 1 { "node" } else { "nodes" };
    if count == 0 {
        println!("{}: no matches", "ok".yellow().bold());
    } else {
        let listed: Vec<String> = result.matched.iter().map(ToString::to_string).collect();
        println!(
            "{}: {count} {noun}: {}",
            "ok".green().bold(),
            listed.join(", ")
        );
    }
}

/// Clip display text to `max` characters on a character boundary.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max).collect();
        format!("{clipped}…")
    }
}
