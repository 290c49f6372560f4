//! The `check` command: parse a tree and summarize it.

use std::{collections::BTreeMap, fs, sync::Arc};

use schema::{Block, Map};
use storefront_engine::{NoopHost, RenderTree};

use crate::{cli::CheckArgs, error::Result};

/// Block counts per kind, over every root and its descendants.
fn kind_counts(roots: &[Block]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for block in roots.iter().flat_map(Block::walk) {
        *counts.entry(block.kind.name()).or_insert(0) += 1;
    }
    counts
}

/// Parse the tree, print block counts and the visibility state a first render seeds.
pub fn run(args: &CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.blocks)?;
    let tree = RenderTree::from_json(&text, Arc::new(NoopHost))?;
    println!("{}: {} root block(s)", args.blocks.display(), tree.roots().len());
    for (kind, count) in kind_counts(tree.roots()) {
        println!("  {kind:<14} {count}");
    }

    let out = tree.render(&Map::new());
    let states = tree.visibility().snapshot();
    if !states.is_empty() {
        println!("visibility:");
        for (id, visible) in &states {
            println!("  {id:<20} {visible}");
        }
    }
    for d in &out.diagnostics {
        println!("warning: {d}");
    }
    Ok(())
}
