use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::*;

use super::EngineError;

// ── Collaborator traits ──────────────────────────────────────────
//
// The engine is storage-agnostic: all state lives behind these seams.
// Implementations assign identifiers; the engine never generates them.

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Ulid) -> Result<Profile, EngineError>;
}

#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn find_by_id(&self, id: Ulid) -> Result<Item, EngineError>;

    /// Items owned by `owner_id`, ordered by id ascending.
    async fn list_by_owner(&self, owner_id: Ulid, page: &Page) -> Result<Vec<Item>, EngineError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a new booking with status `Waiting` and a store-assigned id.
    async fn save(&self, booking: NewBooking) -> Result<Booking, EngineError>;

    /// Atomic compare-and-set of the lifecycle status.
    ///
    /// Contract: the read of the current status and the write of the new
    /// one happen under the same row lock. Fails with `AlreadyDecided`
    /// unless the booking is still `Waiting`, so two concurrent
    /// transitions on the same booking yield exactly one success.
    async fn transition(
        &self,
        booking_id: Ulid,
        status: BookingStatus,
    ) -> Result<Booking, EngineError>;

    async fn find_by_id(&self, id: Ulid) -> Result<Option<Booking>, EngineError>;

    /// Bookings by booker, ordered start descending.
    async fn find_by_booker(&self, booker_id: Ulid, page: &Page)
        -> Result<Vec<Booking>, EngineError>;

    /// Bookings on an item, ordered start descending.
    async fn find_by_item(&self, item_id: Ulid, page: &Page) -> Result<Vec<Booking>, EngineError>;

    /// All approved bookings, ordered start descending. Feeds the batched
    /// item list view.
    async fn find_approved(&self) -> Result<Vec<Booking>, EngineError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn save(&self, comment: NewComment) -> Result<Comment, EngineError>;

    /// Comments on an item, ordered created ascending.
    async fn find_by_item(&self, item_id: Ulid) -> Result<Vec<Comment>, EngineError>;

    /// Every comment, for grouping by item in the list view.
    async fn find_all(&self) -> Result<Vec<Comment>, EngineError>;
}

// ── In-memory implementations ────────────────────────────────────
//
// Test and embedding fakes. They honor the same contracts as a real
// backend, including the atomic `transition`: DashMap serializes
// read-modify-write per entry.

#[derive(Default)]
pub struct InMemoryDirectory {
    users: DashMap<Ulid, Profile>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, email: &str) -> Profile {
        let profile = Profile {
            id: Ulid::new(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.users.insert(profile.id, profile.clone());
        profile
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_id(&self, id: Ulid) -> Result<Profile, EngineError> {
        self.users
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(EngineError::UserNotFound(id))
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    items: DashMap<Ulid, Item>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(
        &self,
        name: &str,
        description: &str,
        available: bool,
        owner_id: Ulid,
        request_id: Option<Ulid>,
    ) -> Item {
        let item = Item {
            id: Ulid::new(),
            name: name.to_string(),
            description: description.to_string(),
            available,
            owner_id,
            request_id,
        };
        self.items.insert(item.id, item.clone());
        item
    }
}

#[async_trait]
impl ItemCatalog for InMemoryCatalog {
    async fn find_by_id(&self, id: Ulid) -> Result<Item, EngineError> {
        self.items
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(EngineError::ItemNotFound(id))
    }

    async fn list_by_owner(&self, owner_id: Ulid, page: &Page) -> Result<Vec<Item>, EngineError> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|e| e.value().owner_id == owner_id)
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(page.apply(items))
    }
}

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: DashMap<Ulid, Booking>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect, order start descending (id descending breaks ties), page.
    fn collect_sorted<F>(&self, pred: F, page: &Page) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|e| pred(e.value()))
            .map(|e| e.value().clone())
            .collect();
        bookings.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then_with(|| b.id.cmp(&a.id))
        });
        page.apply(bookings)
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn save(&self, booking: NewBooking) -> Result<Booking, EngineError> {
        let booking = Booking {
            id: Ulid::new(),
            span: booking.span,
            status: BookingStatus::Waiting,
            booker_id: booking.booker_id,
            item_id: booking.item_id,
        };
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn transition(
        &self,
        booking_id: Ulid,
        status: BookingStatus,
    ) -> Result<Booking, EngineError> {
        // get_mut holds the shard lock for the whole read-modify-write.
        let mut entry = self
            .bookings
            .get_mut(&booking_id)
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        if entry.status != BookingStatus::Waiting {
            return Err(EngineError::AlreadyDecided(booking_id));
        }
        entry.status = status;
        Ok(entry.clone())
    }

    async fn find_by_id(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        Ok(self.bookings.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_booker(
        &self,
        booker_id: Ulid,
        page: &Page,
    ) -> Result<Vec<Booking>, EngineError> {
        Ok(self.collect_sorted(|b| b.booker_id == booker_id, page))
    }

    async fn find_by_item(&self, item_id: Ulid, page: &Page) -> Result<Vec<Booking>, EngineError> {
        Ok(self.collect_sorted(|b| b.item_id == item_id, page))
    }

    async fn find_approved(&self) -> Result<Vec<Booking>, EngineError> {
        Ok(self.collect_sorted(|b| b.status == BookingStatus::Approved, &Page::Unpaged))
    }
}

#[derive(Default)]
pub struct InMemoryCommentStore {
    comments: DashMap<Ulid, Comment>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn save(&self, comment: NewComment) -> Result<Comment, EngineError> {
        let comment = Comment {
            id: Ulid::new(),
            item_id: comment.item_id,
            author_id: comment.author_id,
            text: comment.text,
            created_at: comment.created_at,
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_item(&self, item_id: Ulid) -> Result<Vec<Comment>, EngineError> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|e| e.value().item_id == item_id)
            .map(|e| e.value().clone())
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn find_all(&self) -> Result<Vec<Comment>, EngineError> {
        let mut comments: Vec<Comment> = self.comments.iter().map(|e| e.value().clone()).collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }
}
