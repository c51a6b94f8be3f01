//! Watch mode: re-run fixtures when fixture files or their sources change.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::fixture::loader::is_fixture_file;

/// Quiet period that groups a burst of file events into one re-run
const DEBOUNCE: Duration = Duration::from_millis(300);

/// Decides which file events can change what a fixture run sees.
///
/// Fixture files (`*.toml`, which includes the project file) always count.
/// Other files count only when tracked, i.e. when a fixture reads its source
/// from them. Editor swap files and unrelated files in a watched directory
/// are ignored.
#[derive(Debug, Clone, Default)]
pub struct WatchFilter {
    tracked: HashSet<PathBuf>,
}

impl WatchFilter {
    pub fn new<I, P>(tracked: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut filter = Self::default();
        filter.set_tracked(tracked);
        filter
    }

    /// Replace the tracked files, e.g. after the registry was rebuilt
    pub fn set_tracked<I, P>(&mut self, tracked: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.tracked = tracked
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .collect();
    }

    pub fn tracked(&self) -> impl Iterator<Item = &Path> {
        self.tracked.iter().map(|p| p.as_path())
    }

    pub fn is_relevant_path(&self, path: &Path) -> bool {
        is_fixture_file(path) || self.tracked.contains(&normalize(path))
    }

    /// Whether an event touches a fixture file or a tracked source
    pub fn is_relevant(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) && event.paths.iter().any(|p| self.is_relevant_path(p))
    }
}

/// Absolute form of a path for comparison. A removed file cannot be
/// canonicalized, so fall back to its canonical parent.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Directory whose events cover a tracked file
fn watch_dir_for(file: &Path) -> Option<&Path> {
    file.parent().filter(|dir| dir.is_dir())
}

/// Block, calling `on_change` after each burst of relevant file events.
///
/// `on_change` may update the filter, and the watcher then also covers the
/// directories of newly tracked files. Returns when the watcher shuts down.
pub fn watch_paths<F>(paths: &[PathBuf], mut filter: WatchFilter, mut on_change: F) -> Result<()>
where
    F: FnMut(&mut WatchFilter),
{
    let (tx, rx) = mpsc::channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )?;

    let mut watched: HashSet<PathBuf> = HashSet::new();
    for path in paths.iter().filter(|p| p.exists()) {
        let path = normalize(path);
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&path, mode)?;
        log::info!("watching {}", path.display());
        watched.insert(path);
    }

    if watched.is_empty() {
        log::warn!("no existing paths to watch");
        return Ok(());
    }

    let mut watch_tracked = |filter: &WatchFilter, watched: &mut HashSet<PathBuf>| {
        let dirs: Vec<PathBuf> = filter
            .tracked()
            .filter_map(watch_dir_for)
            .filter(|dir| !watched.iter().any(|w| w.is_dir() && dir.starts_with(w)))
            .map(Path::to_path_buf)
            .collect();
        for dir in dirs {
            match watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    log::debug!("watching sources in {}", dir.display());
                    watched.insert(dir);
                }
                Err(e) => log::warn!("cannot watch {}: {}", dir.display(), e),
            }
        }
    };
    watch_tracked(&filter, &mut watched);

    while let Ok(res) = rx.recv() {
        match res {
            Ok(event) if filter.is_relevant(&event) => {
                log::debug!("change detected: {:?}", event.paths);
                while rx.recv_timeout(DEBOUNCE).is_ok() {}
                on_change(&mut filter);
                watch_tracked(&filter, &mut watched);
            }
            Ok(event) => log::trace!("ignoring {:?} on {:?}", event.kind, event.paths),
            Err(e) => log::error!("file watcher error: {}", e),
        }
    }

    Ok(())
}
