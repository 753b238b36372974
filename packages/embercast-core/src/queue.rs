//! Track queue abstraction.
//!
//! The upstream cast controller owns playlist content; the engine only needs
//! an ordered view around the active track and a way to move the cursor
//! forward when a transition fires.

use parking_lot::Mutex;
use serde::Serialize;

/// Reference to a playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRef {
    /// Opaque track identifier understood by the media resolver.
    pub id: String,
}

impl TrackRef {
    /// Creates a track reference from any id-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Ordered view around the queue cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    /// Track before the cursor, if any.
    pub previous: Option<String>,
    /// Track at the cursor, if any.
    pub current: Option<String>,
    /// Track after the cursor, if any.
    pub next: Option<String>,
}

/// Upstream ordered-queue collaborator.
pub trait TrackQueue: Send + Sync {
    /// Returns the previous/current/next view around the cursor.
    fn snapshot(&self) -> QueueSnapshot;

    /// Moves the cursor to the next track and returns it, or `None` when the
    /// queue is exhausted.
    fn advance(&self) -> Option<TrackRef>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Implementation
// ─────────────────────────────────────────────────────────────────────────────

struct QueueInner {
    tracks: Vec<TrackRef>,
    cursor: Option<usize>,
}

/// Simple in-memory [`TrackQueue`] used by the server binary and tests.
pub struct InMemoryQueue {
    inner: Mutex<QueueInner>,
}

impl InMemoryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                tracks: Vec::new(),
                cursor: None,
            }),
        }
    }

    /// Replaces the queue contents and clears the cursor.
    pub fn set_tracks(&self, tracks: Vec<TrackRef>) {
        let mut inner = self.inner.lock();
        inner.tracks = tracks;
        inner.cursor = None;
    }

    /// Appends a track to the end of the queue.
    pub fn push(&self, track: TrackRef) {
        self.inner.lock().tracks.push(track);
    }

    /// Moves the cursor onto `index`, returning the track there.
    pub fn jump_to(&self, index: usize) -> Option<TrackRef> {
        let mut inner = self.inner.lock();
        let track = inner.tracks.get(index)?.clone();
        inner.cursor = Some(index);
        Some(track)
    }

    /// Number of queued tracks.
    pub fn len(&self) -> usize {
        self.inner.lock().tracks.len()
    }

    /// Whether the queue holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().tracks.is_empty()
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackQueue for InMemoryQueue {
    fn snapshot(&self) -> QueueSnapshot {
        let inner = self.inner.lock();
        let Some(cursor) = inner.cursor else {
            return QueueSnapshot::default();
        };

        QueueSnapshot {
            previous: cursor
                .checked_sub(1)
                .and_then(|i| inner.tracks.get(i))
                .map(|t| t.id.clone()),
            current: inner.tracks.get(cursor).map(|t| t.id.clone()),
            next: inner.tracks.get(cursor + 1).map(|t| t.id.clone()),
        }
    }

    fn advance(&self) -> Option<TrackRef> {
        let mut inner = self.inner.lock();
        let next_index = match inner.cursor {
            None if !inner.tracks.is_empty() => 0,
            Some(i) if i + 1 < inner.tracks.len() => i + 1,
            _ => return None,
        };
        inner.cursor = Some(next_index);
        Some(inner.tracks[next_index].clone())
    }
}
