use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Case-insensitive substring match of `keyword_lower` against the full path.
/// `keyword_lower` must already be lowercased; matching on the full path means
/// a keyword can also hit directory names along the way.
pub fn path_matches(path: &Path, keyword_lower: &str) -> bool {
    path.to_string_lossy().to_lowercase().contains(keyword_lower)
}

/// Walks `root` recursively and collects every regular file whose full path
/// contains `keyword`, case-insensitively, in traversal order.
///
/// `should_cancel` is polled before each entry is processed; when it returns
/// true the walk stops and the matches accumulated so far are returned as a
/// partial result. Unreadable entries are skipped, the walk continues with
/// their siblings. The keyword is used as-is; trimming is the caller's job.
pub fn scan(root: &Path, keyword: &str, mut should_cancel: impl FnMut() -> bool) -> Vec<PathBuf> {
    let keyword_lower = keyword.to_lowercase();
    let mut matches = Vec::new();
    let mut cancelled = false;

    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .into_iter();
    loop {
        if should_cancel() {
            cancelled = true;
            break;
        }
        let Some(entry) = walker.next() else {
            break;
        };
        // Permission errors and broken symlinks surface here; skip them.
        let Ok(entry) = entry else {
            continue;
        };
        if entry.file_type().is_file() && path_matches(entry.path(), &keyword_lower) {
            matches.push(entry.path().to_path_buf());
        }
    }

    if cancelled {
        debug!(
            root = %root.display(),
            partial = matches.len(),
            "scan cancelled at traversal checkpoint"
        );
    } else {
        info!(root = %root.display(), matches = matches.len(), "scan finished");
    }
    matches
}
