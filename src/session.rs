use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

use crate::scanner::scan;

/// What to search and where. Immutable once a session starts.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub root: PathBuf,
    pub keyword: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Cancelling,
    Completed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A session was launched; the id identifies its eventual completion.
    Started(u64),
    /// Keyword was empty after trimming; nothing was launched.
    EmptyKeyword,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelling,
    NoActiveSearch,
}

struct ActiveSession {
    id: u64,
    cancel: Arc<AtomicBool>,
}

struct Completion {
    session_id: u64,
    results: Vec<PathBuf>,
}

/// Owns the lifecycle of at most one in-flight scan.
///
/// The controller lives on the UI thread: it is the only writer of the cancel
/// flag and the current-session reference. Each `start` spawns a fresh worker
/// thread that runs the scanner once, sends its results tagged with the
/// session id, and exits. Completions are drained with [`poll`]; a completion
/// whose id does not match the current session was superseded by a later
/// `start` and is dropped without effect.
///
/// [`poll`]: SearchController::poll
pub struct SearchController {
    next_session_id: u64,
    current: Option<ActiveSession>,
    state: SessionState,
    done_tx: Sender<Completion>,
    done_rx: Receiver<Completion>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            next_session_id: 1,
            current: None,
            state: SessionState::Idle,
            done_tx,
            done_rx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while a session is Running or Cancelling.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Running | SessionState::Cancelling)
    }

    /// Starts a new search session, superseding any session still in flight.
    ///
    /// A superseded session is told to cancel; its completion message is later
    /// identified by session id and discarded. An empty or whitespace-only
    /// keyword is rejected synchronously and leaves the controller untouched.
    pub fn start(&mut self, request: SearchRequest) -> StartOutcome {
        let keyword = request.keyword.trim().to_string();
        if keyword.is_empty() {
            return StartOutcome::EmptyKeyword;
        }

        if let Some(old) = self.current.take() {
            old.cancel.store(true, Ordering::Relaxed);
            debug!(session = old.id, "superseded in-flight session");
        }

        let id = self.next_session_id;
        self.next_session_id = self.next_session_id.saturating_add(1);
        let cancel = Arc::new(AtomicBool::new(false));
        self.current = Some(ActiveSession {
            id,
            cancel: Arc::clone(&cancel),
        });
        self.state = SessionState::Running;

        info!(session = id, root = %request.root.display(), keyword = %keyword, "search started");
        let tx = self.done_tx.clone();
        let root = request.root;
        thread::spawn(move || {
            let results = scan(&root, &keyword, || cancel.load(Ordering::Relaxed));
            // Controller may be gone; nobody is left to care about the result.
            let _ = tx.send(Completion {
                session_id: id,
                results,
            });
        });

        StartOutcome::Started(id)
    }

    /// Requests cancellation of the in-flight session, if any.
    ///
    /// The flag is only ever set, never cleared; calling this while already
    /// Cancelling is harmless. The worker observes the flag at its next
    /// traversal checkpoint and completes with a partial result.
    pub fn cancel(&mut self) -> CancelOutcome {
        let Some(session) = &self.current else {
            return CancelOutcome::NoActiveSearch;
        };
        session.cancel.store(true, Ordering::Relaxed);
        self.state = SessionState::Cancelling;
        debug!(session = session.id, "cancellation requested");
        CancelOutcome::Cancelling
    }

    /// Drains completed sessions; must be called from the controlling thread.
    ///
    /// Returns the current session's results once, when its worker finishes.
    /// Stale completions from superseded sessions are dropped here.
    pub fn poll(&mut self) -> Option<Vec<PathBuf>> {
        let mut delivered = None;
        while let Ok(done) = self.done_rx.try_recv() {
            match &self.current {
                Some(session) if session.id == done.session_id => {
                    self.current = None;
                    self.state = SessionState::Completed;
                    delivered = Some(done.results);
                }
                _ => {
                    debug!(session = done.session_id, "dropped stale completion");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    fn test_root(name: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!("sherlock-rs-session-{name}-{nonce}"))
    }

    fn write_files(root: &Path, names: &[&str]) -> Vec<PathBuf> {
        fs::create_dir_all(root).expect("create root");
        names
            .iter()
            .map(|name| {
                let path = root.join(name);
                fs::write(&path, "x").expect("write file");
                path
            })
            .collect()
    }

    fn poll_until_done(controller: &mut SearchController) -> Vec<PathBuf> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(results) = controller.poll() {
                return results;
            }
            assert!(Instant::now() < deadline, "worker did not complete in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn empty_keyword_is_rejected_without_starting() {
        let mut controller = SearchController::new();
        let outcome = controller.start(SearchRequest {
            root: PathBuf::from("/tmp"),
            keyword: "   ".to_string(),
        });
        assert_eq!(outcome, StartOutcome::EmptyKeyword);
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.is_active());
    }

    #[test]
    fn completed_search_delivers_matches_once() {
        let root = test_root("deliver");
        let files = write_files(&root, &["resume.pdf", "notes.txt"]);

        let mut controller = SearchController::new();
        let outcome = controller.start(SearchRequest {
            root: root.clone(),
            keyword: "resume".to_string(),
        });
        assert!(matches!(outcome, StartOutcome::Started(_)));
        assert_eq!(controller.state(), SessionState::Running);

        let results = poll_until_done(&mut controller);
        assert_eq!(results, vec![files[0].clone()]);
        assert_eq!(controller.state(), SessionState::Completed);
        assert!(controller.poll().is_none());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn keyword_is_trimmed_before_matching() {
        let root = test_root("trim");
        let files = write_files(&root, &["resume.pdf"]);

        let mut controller = SearchController::new();
        controller.start(SearchRequest {
            root: root.clone(),
            keyword: "  resume  ".to_string(),
        });
        let results = poll_until_done(&mut controller);
        assert_eq!(results, files);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn cancel_without_session_reports_no_active_search() {
        let mut controller = SearchController::new();
        assert_eq!(controller.cancel(), CancelOutcome::NoActiveSearch);
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn cancel_moves_running_session_to_cancelling() {
        let root = test_root("cancel-state");
        let _ = write_files(&root, &["resume.pdf"]);

        let mut controller = SearchController::new();
        controller.start(SearchRequest {
            root: root.clone(),
            keyword: "resume".to_string(),
        });
        assert_eq!(controller.cancel(), CancelOutcome::Cancelling);
        assert_eq!(controller.state(), SessionState::Cancelling);
        // Repeated cancel is a no-op on an already-set flag.
        assert_eq!(controller.cancel(), CancelOutcome::Cancelling);

        let _ = poll_until_done(&mut controller);
        assert_eq!(controller.state(), SessionState::Completed);
        assert!(!controller.is_active());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn cancelled_session_delivers_subset_of_full_matches() {
        let root = test_root("cancel-subset");
        fs::create_dir_all(&root).expect("create root");
        for i in 0..200 {
            fs::write(root.join(format!("match-{i:03}.txt")), "x").expect("write file");
        }
        let full = crate::scanner::scan(&root, "match", || false);

        let mut controller = SearchController::new();
        controller.start(SearchRequest {
            root: root.clone(),
            keyword: "match".to_string(),
        });
        controller.cancel();
        let partial = poll_until_done(&mut controller);

        assert!(partial.len() <= full.len());
        for path in &partial {
            assert!(full.contains(path));
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn superseded_session_results_are_dropped() {
        let old_root = test_root("supersede-old");
        let new_root = test_root("supersede-new");
        let _ = write_files(&old_root, &["resume_old.pdf"]);
        let new_files = write_files(&new_root, &["resume_new.pdf"]);

        let mut controller = SearchController::new();
        controller.start(SearchRequest {
            root: old_root.clone(),
            keyword: "resume".to_string(),
        });
        controller.start(SearchRequest {
            root: new_root.clone(),
            keyword: "resume".to_string(),
        });

        let results = poll_until_done(&mut controller);
        assert_eq!(results, new_files);

        // Give the superseded worker time to flush; its completion must not
        // resurface as a second delivery.
        thread::sleep(Duration::from_millis(100));
        assert!(controller.poll().is_none());
        assert_eq!(controller.state(), SessionState::Completed);
        let _ = fs::remove_dir_all(&old_root);
        let _ = fs::remove_dir_all(&new_root);
    }

    #[test]
    fn controller_accepts_new_search_after_completion() {
        let root = test_root("restart");
        let files = write_files(&root, &["resume.pdf", "notes.txt"]);

        let mut controller = SearchController::new();
        controller.start(SearchRequest {
            root: root.clone(),
            keyword: "resume".to_string(),
        });
        let _ = poll_until_done(&mut controller);

        let outcome = controller.start(SearchRequest {
            root: root.clone(),
            keyword: "notes".to_string(),
        });
        assert!(matches!(outcome, StartOutcome::Started(_)));
        let results = poll_until_done(&mut controller);
        assert_eq!(results, vec![files[1].clone()]);
        let _ = fs::remove_dir_all(&root);
    }
}
