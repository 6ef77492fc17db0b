//! Loading a directory of plain-text files into an [`Engine`].

use crate::engine::Engine;
use crate::index::IndexMode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub root: PathBuf,
    /// Accepted file extensions, compared case-insensitively and without the
    /// leading dot. Empty accepts every file.
    pub extensions: Vec<String>,
}

impl CorpusConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf(), extensions: vec!["txt".to_string()] }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let e: String = e.into();
                e.trim_start_matches('.').to_ascii_lowercase()
            })
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walk `config.root` and hand every accepted file to `engine`, keyed by its
/// base file name. Failures are logged per file and never stop the walk.
pub fn scan(engine: &Engine, config: &CorpusConfig, mode: IndexMode) -> ScanSummary {
    let mut summary = ScanSummary::default();
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(&config.root).follow_links(true) {
        match entry {
            Ok(e) if e.file_type().is_file() && config.accepts(e.path()) => files.push(e.into_path()),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                summary.failed += 1;
            }
        }
    }
    // Doc ids follow path order, independent of directory listing order.
    files.sort();

    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if mode == IndexMode::Incremental && engine.contains(&name) {
            summary.skipped += 1;
            continue;
        }
        let result = File::open(&path)
            .map_err(|source| crate::Error::Read { name: name.clone(), source })
            .and_then(|file| engine.index_reader(&name, file, mode));
        match result {
            Ok(outcome) if outcome.is_skipped() => summary.skipped += 1,
            Ok(_) => summary.indexed += 1,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to index file");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        root = %config.root.display(),
        indexed = summary.indexed,
        skipped = summary.skipped,
        failed = summary.failed,
        "corpus scan complete"
    );
    summary
}
