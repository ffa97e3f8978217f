use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// Booking window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// Booking lifecycle status. Starts at `Waiting`; `Approved` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

/// A persisted reservation of an item by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub span: Span,
    pub status: BookingStatus,
    pub booker_id: Ulid,
    pub item_id: Ulid,
}

/// A booking about to be persisted. The store assigns the id and the
/// initial `Waiting` status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub span: Span,
    pub booker_id: Ulid,
    pub item_id: Ulid,
}

/// An item listed for sharing. Owned by the item catalog; the engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Ulid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: Ulid,
    /// Request that prompted this listing, if any.
    pub request_id: Option<Ulid>,
}

/// A user profile as resolved by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Ulid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Ulid,
    pub item_id: Ulid,
    pub author_id: Ulid,
    pub text: String,
    pub created_at: Ms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub item_id: Ulid,
    pub author_id: Ulid,
    pub text: String,
    pub created_at: Ms,
}

/// Listing filter relative to a reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

/// Explicit pagination: either the whole ordered result or a window.
/// `from` is a zero-based offset; `size` a limit. Validation happens in
/// the engine's list operations, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Unpaged,
    Window { from: i64, size: i64 },
}

impl Page {
    pub fn window(from: i64, size: i64) -> Self {
        Page::Window { from, size }
    }

    /// Apply the window to an already-ordered result.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        match *self {
            Page::Unpaged => items,
            Page::Window { from, size } => items
                .into_iter()
                .skip(from.max(0) as usize)
                .take(size.max(0) as usize)
                .collect(),
        }
    }
}

// ── Derived view types (recomputed on every read, never persisted) ──

/// A booking merged with its resolved booker and item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingView {
    pub id: Ulid,
    pub span: Span,
    pub status: BookingStatus,
    pub booker: Profile,
    pub item: Item,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: Ulid,
    pub text: String,
    pub author_name: String,
    pub created_at: Ms,
}

/// An item annotated with its nearest approved bookings and comments.
/// The booking annotations are owner-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: Ulid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: Ulid,
    pub request_id: Option<Ulid>,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
    pub comments: Vec<CommentView>,
}
