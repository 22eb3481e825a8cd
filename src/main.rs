//! FileScout — lazy filesystem indexer and search cache.
//!
//! Thin binary entry point. All logic lives in the `filescout-core` crate;
//! this file only parses arguments, wires the engine to the persisted
//! index, and prints results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use filescout_core::cache::progress::WalkProgress;
use filescout_core::cache::walk::start_cache_walk;
use filescout_core::cache::CacheEngine;
use filescout_core::model::{DirTree, NodeIndex};
use filescout_core::platform::filesystem_roots;
use filescout_core::search::SearchService;
use filescout_core::store::{IndexStore, DEFAULT_INDEX_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "filescout",
    about = "Lazy filesystem indexer and search cache",
    version
)]
struct Cli {
    /// Path of the persisted index file.
    #[arg(long, global = true, default_value = DEFAULT_INDEX_FILE)]
    index_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Eagerly cache one or more directory subtrees into the index.
    Scan {
        /// Roots to cache; defaults to every filesystem root.
        roots: Vec<PathBuf>,
    },
    /// Search cached entries by name substring.
    Search {
        text: String,
        /// Include files in the results.
        #[arg(long)]
        files: bool,
        /// Include directories in the results.
        #[arg(long)]
        dirs: bool,
    },
    /// List one directory the way the table view would show it.
    List { path: PathBuf },
    /// Print the directory tree expanded to a fixed depth.
    Tree {
        /// Root to start from; defaults to every filesystem root under the
        /// synthetic top-level node.
        root: Option<PathBuf>,
        #[arg(long, default_value_t = 2)]
        depth: usize,
    },
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let store = IndexStore::new(&cli.index_file);
    let engine = CacheEngine::new();
    engine.restore(store.load());
    tracing::info!(
        "index loaded from {} ({} records)",
        store.path().display(),
        engine.len()
    );

    match cli.command {
        Command::Scan { roots } => run_scan(&engine, roots),
        Command::Search { text, files, dirs } => run_search(&engine, &text, files, dirs),
        Command::List { path } => run_list(&engine, path),
        Command::Tree { root, depth } => run_tree(&engine, root, depth),
    }

    // Shutdown save: best effort, never a hard failure.
    let index = engine.shared_index();
    if let Err(err) = store.save(&index.read()) {
        tracing::warn!("failed to persist index: {err}");
    }
    Ok(())
}

fn run_scan(engine: &CacheEngine, roots: Vec<PathBuf>) {
    let roots = if roots.is_empty() {
        filesystem_roots()
    } else {
        roots
    };

    for root in roots {
        let handle = start_cache_walk(engine.clone(), root.clone());
        for message in handle.progress_rx.iter() {
            match message {
                WalkProgress::Update {
                    files,
                    dirs,
                    current_path,
                } => {
                    tracing::info!("{files} files / {dirs} dirs — {}", current_path.display());
                }
                WalkProgress::Error { path, message } => {
                    tracing::debug!("skipped {}: {message}", path.display());
                }
                WalkProgress::Complete { stats, duration } => {
                    println!(
                        "{}: {} files, {} dirs, {} skipped in {:.1?}",
                        root.display(),
                        stats.files,
                        stats.dirs,
                        stats.errors,
                        duration
                    );
                    break;
                }
                WalkProgress::Cancelled => break,
            }
        }
    }
}

fn run_search(engine: &CacheEngine, text: &str, files: bool, dirs: bool) {
    // Neither flag on the command line means "both": a query that can
    // never match anything is useless interactively.
    let (files, dirs) = if !files && !dirs {
        (true, true)
    } else {
        (files, dirs)
    };

    let hits = SearchService::new(engine.clone()).query(text, files, dirs);
    for hit in &hits {
        println!("{}\t{}", hit.name, hit.detail);
    }
    tracing::info!("{} hits for \"{text}\"", hits.len());
}

fn run_list(engine: &CacheEngine, path: PathBuf) {
    if !engine.gateway().is_directory(&path) {
        tracing::warn!("{} is not a directory", path.display());
        return;
    }

    engine.cache_entry(&path, true);
    let mut rows = engine.entries_in(&path);
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    for record in rows {
        println!("{}\t{}", record.name, record.detail_label());
    }
}

fn run_tree(engine: &CacheEngine, root: Option<PathBuf>, depth: usize) {
    let roots = root.map(|r| vec![r]).unwrap_or_else(filesystem_roots);
    let mut tree = DirTree::new(&roots);

    let top = tree.root();
    expand_to_depth(&mut tree, engine, top, depth);
    print_subtree(&tree, top, 0);
}

fn expand_to_depth(tree: &mut DirTree, engine: &CacheEngine, index: NodeIndex, depth: usize) {
    if depth == 0 {
        return;
    }
    tree.expand(index, engine);
    let children: Vec<NodeIndex> = tree.children(index).to_vec();
    for child in children {
        expand_to_depth(tree, engine, child, depth - 1);
    }
}

fn print_subtree(tree: &DirTree, index: NodeIndex, indent: usize) {
    println!("{}{}", "  ".repeat(indent), tree.label(index));
    for child in tree.children(index) {
        print_subtree(tree, *child, indent + 1);
    }
}
