use annotate::{AnnotationSession, STAR_ANCHOR_TAG};
use clap::Parser;
use core_types::CoreError;
use html::dom_utils::outline;
use html::traverse::find_elements_by_tag;
use html::{Document, DomError, NodeSpec};
use mimalloc::MiMalloc;
use net::YoudaoClient;
use overlay::{Label, OverlayMount};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use store::{CachedLookup, DefinitionCache, KeyValueStorage, Settings, StarredWords, SyncStarStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "osmosis", about = "Annotate starred words in a text document", version)]
struct Cli {
    /// Text file; paragraphs are separated by blank lines.
    input: PathBuf,

    /// JSON storage file holding starred words, settings and cached definitions.
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Star a word before rendering. Repeatable.
    #[arg(long = "star", value_name = "WORD")]
    stars: Vec<String>,

    /// Look up every anchored word and print its label.
    #[arg(long)]
    lookup: bool,

    /// Write the storage file back after running.
    #[arg(long, requires = "storage")]
    save: bool,

    #[arg(long, default_value_t = 200)]
    max_lines: usize,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("document error: {0}")]
    Dom(#[from] DomError),
    #[error("cannot read {path}: {source}")]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("osmosis: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let storage = match &cli.storage {
        Some(path) => KeyValueStorage::load(path)?,
        None => KeyValueStorage::new(),
    };
    let stars = SyncStarStore::new(storage.clone());
    for word in &cli.stars {
        let word = stars.star(word)?;
        log::info!(target: "osmosis", "starred {word}");
    }

    let text = fs::read_to_string(&cli.input).map_err(|source| AppError::Input {
        path: cli.input.clone(),
        source,
    })?;
    let mut doc = Document::new();
    let body = doc.body();
    for paragraph in paragraphs(&text) {
        doc.append_fragment(body, &NodeSpec::paragraph(&paragraph))?;
    }

    let mut session = AnnotationSession::new(stars.clone());
    let stats = session.render(&mut doc)?;
    log::info!(
        target: "osmosis",
        "visited {} nodes, {} anchors",
        stats.visited,
        stats.anchored
    );

    for line in outline(&doc, body, cli.max_lines) {
        println!("{line}");
    }

    if cli.lookup {
        let settings = Settings::load(&storage);
        let lookup = CachedLookup::new(YoudaoClient::default(), DefinitionCache::new(storage.clone()));
        let mut mount = OverlayMount::new(lookup, stars);
        mount.mount_all(&mut doc, body);
        println!();
        for anchor in find_elements_by_tag(&doc, body, STAR_ANCHOR_TAG) {
            let Some(overlay) = mount.get(anchor) else {
                continue;
            };
            let label = Label::new(&overlay.text, &overlay.content, &settings);
            match &label.corner {
                Some(corner) => println!("{} [{}]", label.text, corner),
                None => println!("{}", label.text),
            }
        }
    }

    if cli.save {
        if let Some(path) = &cli.storage {
            storage.save(path)?;
        }
    }
    Ok(())
}

/// Blank-line separated paragraphs, inner line breaks kept.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}
