//! Storage watcher: renders the tree on startup, then re-renders on changes.

use std::path::Path;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::error;
use crate::registry::Registry;
use crate::render;

/// Debounce delay between filesystem events and re-render.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Refresh the registry and print the tree. A failed refresh is reported
/// and the previous tree is rendered instead.
fn render_once(registry: &mut Registry, collapsed: bool) {
    if let Err(e) = registry.refresh() {
        eprintln!("error: {e}");
    }

    let tree = registry.tree();
    let rendered = if collapsed {
        render::render_collapsed(tree)
    } else {
        render::render_tree(tree)
    };
    print!("{rendered}");
    return;
}

/// Entry point for the watch command.
///
/// Renders the tree immediately, then watches the storage directory and
/// re-renders whenever the favourites or notes files change, however they
/// were changed. Runs until interrupted.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created or
/// attached to the storage directory.
pub fn run(
    registry: &mut Registry,
    storage_dir: &Path,
    collapsed: bool,
) -> Result<(), error::Error> {
    render_once(registry, collapsed);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    watcher
        .watch(storage_dir, RecursiveMode::NonRecursive)
        .map_err(|e| {
            return error::Error::WatchFailed {
                reason: format!("cannot watch {}: {e}", storage_dir.display()),
            };
        })?;

    eprintln!(
        "watch: monitoring {}, press Ctrl+C to stop",
        storage_dir.display()
    );

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        render_once(registry, collapsed);
    }

    return Ok(());
}
