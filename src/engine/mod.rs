mod availability;
mod error;
mod mutations;
mod queries;
pub mod store;
mod views;

pub use availability::{derive_nearest, filter_by_state, parse_state};
pub use error::EngineError;
pub use views::{assemble_booking_view, assemble_item_list_view, assemble_item_view};

use std::sync::Arc;

use ulid::Ulid;

use crate::model::*;

use store::{BookingStore, CommentStore, ItemCatalog, UserDirectory};

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as Ms
}

/// Booking lifecycle engine. Holds no state of its own; everything lives
/// behind the injected stores, so one engine can serve any number of
/// concurrent requests.
pub struct Engine {
    pub(super) users: Arc<dyn UserDirectory>,
    pub(super) items: Arc<dyn ItemCatalog>,
    pub(super) bookings: Arc<dyn BookingStore>,
    pub(super) comments: Arc<dyn CommentStore>,
}

impl Engine {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        items: Arc<dyn ItemCatalog>,
        bookings: Arc<dyn BookingStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            comments,
        }
    }

    /// Resolve a booking's booker and item and compose the read view.
    pub(super) async fn booking_view(&self, booking: Booking) -> Result<BookingView, EngineError> {
        let booker = self.users.find_by_id(booking.booker_id).await?;
        let item = self.items.find_by_id(booking.item_id).await?;
        Ok(views::assemble_booking_view(booking, booker, item))
    }

    pub(super) async fn booking_views(
        &self,
        bookings: Vec<Booking>,
    ) -> Result<Vec<BookingView>, EngineError> {
        let mut out = Vec::with_capacity(bookings.len());
        for booking in bookings {
            out.push(self.booking_view(booking).await?);
        }
        Ok(out)
    }

    /// Resolve author names for a batch of comments.
    pub(super) async fn comment_views(
        &self,
        comments: Vec<Comment>,
    ) -> Result<Vec<CommentView>, EngineError> {
        let mut out = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = self.users.find_by_id(comment.author_id).await?;
            out.push(CommentView {
                id: comment.id,
                text: comment.text,
                author_name: author.name,
                created_at: comment.created_at,
            });
        }
        Ok(out)
    }

    /// Ids of every item owned by `owner_id`.
    pub(super) async fn owned_item_ids(&self, owner_id: Ulid) -> Result<Vec<Ulid>, EngineError> {
        Ok(self
            .items
            .list_by_owner(owner_id, &Page::Unpaged)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect())
    }
}
