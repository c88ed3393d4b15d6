//! Live preview for a project directory.
//!
//! Watches `index.html`, `style.css` and `script.js` in a directory and keeps
//! `preview.html` next to them up to date through the debounced preview engine.

mod file_host;

use file_host::FileHost;
use livepen_preview::{PreviewConfig, PreviewController, SourceKind, Sources};
use log::{debug, info, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tokio::sync::mpsc;

const PREVIEW_FILE: &str = "preview.html";
const CONFIG_FILE: &str = "livepen.yaml";
const CONFIG_ENV: &str = "LIVEPEN_CONFIG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(dir) = env::args().nth(1) else {
        eprintln!("Usage: watch <project-dir>");
        eprintln!();
        eprintln!("Watches {} and writes {} in the same directory.", watched_files(), PREVIEW_FILE);
        eprintln!("Config: {} in the directory, or the path in ${}.", CONFIG_FILE, CONFIG_ENV);
        process::exit(1);
    };

    if let Err(e) = run(PathBuf::from(dir)).await {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn watched_files() -> String {
    SourceKind::ALL
        .iter()
        .map(|k| k.file_name())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn run(dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&dir)?;
    let sources = read_sources(&dir)?;

    let host = FileHost::new(dir.join(PREVIEW_FILE), config.frame.clone());
    let output = host.path().display().to_string();
    let controller = PreviewController::with_sources(&config, host, sources)?;
    controller.force_rebuild_now();
    info!(
        "watching {} (debounce {}ms), writing {}",
        dir.display(),
        config.debounce_ms,
        output
    );

    let (_watcher, mut rx) = start_fs_watcher(&dir)?;

    loop {
        tokio::select! {
            changed = rx.recv() => {
                let Some(path) = changed else {
                    warn!("filesystem watcher channel closed");
                    break;
                };
                apply_change(&controller, &path);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    controller.dispose();
    Ok(())
}

fn load_config(dir: &Path) -> Result<PreviewConfig, livepen_preview::PreviewError> {
    let path = match env::var(CONFIG_ENV) {
        Ok(p) => PathBuf::from(p),
        Err(_) => dir.join(CONFIG_FILE),
    };
    if path.exists() {
        info!("loading config from {}", path.display());
        return PreviewConfig::load(&path);
    }
    let mut config = PreviewConfig::default();
    config.apply_env()?;
    Ok(config)
}

/// Reads a source file. A missing file is an empty buffer.
fn read_source(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        other => other,
    }
}

fn read_sources(dir: &Path) -> io::Result<Sources> {
    let read = |kind: SourceKind| {
        let path = dir.join(kind.file_name());
        read_source(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("cannot read {}: {}", path.display(), e))
        })
    };
    Ok(Sources::new(
        read(SourceKind::Markup)?,
        read(SourceKind::Style)?,
        read(SourceKind::Script)?,
    ))
}

/// Feeds a changed source file into its buffer. Other files (including our own output) are ignored.
fn apply_change(controller: &PreviewController<FileHost>, path: &Path) {
    let Some(kind) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(SourceKind::from_file_name)
    else {
        return;
    };
    let text = match read_source(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            return;
        }
    };
    let unchanged = controller
        .get_buffer(kind)
        .is_some_and(|buf| buf.content() == text);
    if unchanged {
        return;
    }
    debug!("{} changed ({} bytes)", kind, text.len());
    controller.set_content(kind, text);
}

fn start_fs_watcher(
    dir: &Path,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<PathBuf>), String> {
    let (tx, rx) = mpsc::unbounded_channel::<PathBuf>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            for path in event.paths {
                let _ = tx.send(path);
            }
        }
        Err(e) => warn!("watch error: {}", e),
    })
    .map_err(|e| format!("failed to initialize filesystem watcher: {e}"))?;

    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("failed to watch {}: {e}", dir.display()))?;

    Ok((watcher, rx))
}
