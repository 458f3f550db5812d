use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::{TraversalOrder, Visit};
use anyhow::Context;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct TraverseOptions {
    pub revision: String,
    pub order: TraversalOrder,
    pub depth: Option<usize>,
    pub include_self: bool,
    pub edges: bool,
}

/// Print the ids reachable from a revision, one per line
///
/// With `edges`, each line is `<predecessor> -> <id>`; the start commit has
/// no predecessor and is printed on its own.
pub fn traverse(
    repository: &Repository,
    opts: &TraverseOptions,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    let start = repository
        .resolve(&opts.revision)
        .with_context(|| format!("cannot resolve {}", opts.revision))?;

    let mut rev_list = start
        .traverse()
        .order(opts.order)
        .ignore_self(!opts.include_self)
        .as_edge(opts.edges);
    if let Some(depth) = opts.depth {
        rev_list = rev_list.depth(depth);
    }

    for visit in rev_list {
        match visit? {
            Visit::Edge(Some(predecessor), commit) => {
                writeln!(writer, "{predecessor} -> {commit}")?
            }
            Visit::Edge(None, commit) | Visit::Commit(commit) => writeln!(writer, "{commit}")?,
        }
    }

    Ok(())
}
