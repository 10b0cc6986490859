//! duet - a collaborative terminal line editor
//! Main entry point

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use duet::args::Args;
use duet::document::Document;
use duet::editor::Editor;
use duet::term::crossterm::CrosstermBackend;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    // Keep the log worker alive for the whole session
    let _log_guard = init_logging();

    // Load every file before touching the terminal, so failures print cleanly
    let docs = match load_documents(&args) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("duet: {e:#}");
            std::process::exit(1);
        }
    };

    let backend = match CrosstermBackend::new() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("duet: failed to create terminal backend: {e}");
            std::process::exit(1);
        }
    };

    let mut editor = Editor::new(backend, docs, args.live_config());
    if let Err(e) = editor.run() {
        eprintln!("duet: {e}");
        std::process::exit(1);
    }
}

fn load_documents(args: &Args) -> anyhow::Result<Vec<Arc<Mutex<Document>>>> {
    args.files
        .iter()
        .map(|path| {
            let doc = Document::from_file(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            Ok(Arc::new(Mutex::new(doc)))
        })
        .collect()
}

/// Route tracing output to a file; stdout belongs to the raw-mode UI
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(".", "duet.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("DUET_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
