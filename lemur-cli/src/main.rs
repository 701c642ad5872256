//! Lemur CLI, a headless stand-in for the inspector UI.
//!
//! Loads a document (file, inline markup, or URL), prints its element
//! tree, generates candidate selectors for a chosen node, and tests
//! arbitrary CSS/XPath selectors against the tree.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use lemur_dom::{DomTree, NodeId};
use lemur_select::{SelectorKind, match_selector, synthesize};
use serde_json::json;

mod fetch;
mod render;

#[derive(Parser)]
#[command(name = "lemur", version, about = "HTML element tree and selector inspector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the element tree with node ids.
    Tree {
        #[command(flatten)]
        source: Source,
    },
    /// Generate ranked candidate selectors for a node.
    Suggest {
        /// Target node id as shown by `tree`, e.g. node-3.
        node: NodeId,
        #[command(flatten)]
        source: Source,
        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Match a selector against the tree and report the result.
    Check {
        /// The selector text.
        selector: String,
        /// Selector language: css or xpath.
        #[arg(long, default_value = "css")]
        kind: SelectorKind,
        #[command(flatten)]
        source: Source,
        /// Emit machine-readable JSON instead of a summary.
        #[arg(long)]
        json: bool,
        /// Also print the tree with matches marked.
        #[arg(long)]
        show_tree: bool,
    },
}

/// Where the document comes from. Exactly one of the three.
#[derive(Args)]
struct Source {
    /// Path to an HTML file.
    file: Option<PathBuf>,
    /// Inline HTML markup.
    #[arg(long, conflicts_with = "file")]
    html: Option<String>,
    /// Fetch the document from a URL.
    #[arg(long, conflicts_with_all = ["file", "html"])]
    url: Option<String>,
}

impl Source {
    /// Load and parse the document into a fresh tree. Each call builds a
    /// new tree wholesale; nothing from a previous document survives.
    fn load(&self) -> Result<DomTree> {
        let markup = if let Some(html) = &self.html {
            html.clone()
        } else if let Some(url) = &self.url {
            fetch::fetch_text(url)?
        } else if let Some(path) = &self.file {
            fs::read_to_string(path)
                .with_context(|| format!("could not read '{}'", path.display()))?
        } else {
            bail!("provide a file path, --html, or --url");
        };
        lemur_html::parse(&markup).context("could not parse the markup")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tree { source } => {
            let tree = source.load()?;
            render::print_tree(&tree, &HashSet::new());
        }
        Command::Suggest { node, source, json } => {
            let tree = source.load()?;
            let candidates = synthesize(&tree, node);
            if candidates.is_empty() {
                bail!("no node '{node}' in this document (it has {} nodes)", tree.len());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                render::print_candidates(&candidates);
            }
        }
        Command::Check {
            selector,
            kind,
            source,
            json,
            show_tree,
        } => {
            let tree = source.load()?;
            let result = match_selector(&tree, &selector, kind);
            if json {
                let matched: Vec<String> =
                    result.matched.iter().map(ToString::to_string).collect();
                let payload = json!({
                    "selector": result.selector,
                    "kind": result.kind.to_string(),
                    "matchCount": result.match_count(),
                    "matchedNodeIds": matched,
                    "error": result.error,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                render::print_result(&result);
                if show_tree {
                    let highlight: HashSet<NodeId> = result.matched.iter().copied().collect();
                    render::print_tree(&tree, &highlight);
                }
            }
        }
    }
    Ok(())
}
