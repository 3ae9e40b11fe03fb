use std::path::Path;

/// Result rows show paths relative to the searched folder when possible;
/// paths outside it (or when stripping fails) fall back to the absolute form.
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}

const HISTORY_CAP: usize = 10;

/// Recently searched keywords, most recent first, for in-window suggestions.
/// Held in memory only; nothing is persisted across runs.
#[derive(Debug, Default)]
pub struct KeywordHistory {
    entries: Vec<String>,
}

impl KeywordHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a searched keyword. Re-searching an old keyword moves it to
    /// the front rather than duplicating it; the list is capped.
    pub fn push(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return;
        }
        self.entries.retain(|k| k != keyword);
        self.entries.insert(0, keyword.to_string());
        self.entries.truncate(HISTORY_CAP);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
