use tracing::info;
use ulid::Ulid;

use crate::model::*;
use crate::observability;

use super::{now_ms, Engine, EngineError};

impl Engine {
    /// Request a reservation of `item_id` for `[start, end)`. The booking
    /// is persisted as WAITING; the item's owner decides it later. No
    /// store write happens unless every precondition passes.
    pub async fn create_booking(
        &self,
        requester_id: Ulid,
        item_id: Ulid,
        start: Ms,
        end: Ms,
    ) -> Result<BookingView, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidTimeRange { start, end });
        }
        let item = self.items.find_by_id(item_id).await?;
        if item.owner_id == requester_id {
            return Err(EngineError::OwnershipConflict(item_id));
        }
        if !item.available {
            return Err(EngineError::NotAvailable(item_id));
        }
        let booker = self.users.find_by_id(requester_id).await?;

        let booking = self
            .bookings
            .save(NewBooking {
                span: Span::new(start, end),
                booker_id: requester_id,
                item_id,
            })
            .await?;

        info!(
            "booking {} created: item {item_id}, booker {requester_id}",
            booking.id
        );
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);

        Ok(super::views::assemble_booking_view(booking, booker, item))
    }

    /// Approve or reject a waiting booking. Only the item's owner may
    /// decide, and a booking that already left WAITING cannot be decided
    /// again. The store enforces that check under its row lock, so
    /// concurrent decisions on one booking resolve to a single winner.
    pub async fn decide_booking(
        &self,
        decider_id: Ulid,
        booking_id: Ulid,
        approve: bool,
    ) -> Result<BookingView, EngineError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        let item = self.items.find_by_id(booking.item_id).await?;
        if item.owner_id != decider_id {
            return Err(EngineError::NotOwner {
                user_id: decider_id,
                item_id: item.id,
            });
        }
        if booking.status != BookingStatus::Waiting {
            return Err(EngineError::AlreadyDecided(booking_id));
        }

        let status = if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let updated = self.bookings.transition(booking_id, status).await?;

        let outcome = observability::decision_label(approve);
        info!("booking {booking_id} {outcome}");
        metrics::counter!(observability::BOOKING_DECISIONS_TOTAL, "outcome" => outcome)
            .increment(1);

        self.booking_view(updated).await
    }

    /// Leave a comment on an item. Only a user whose booking on the item
    /// has already ended may comment.
    pub async fn add_comment(
        &self,
        author_id: Ulid,
        item_id: Ulid,
        text: String,
    ) -> Result<CommentView, EngineError> {
        let now = now_ms();
        self.items.find_by_id(item_id).await?;
        let finished = self
            .bookings
            .find_by_item(item_id, &Page::Unpaged)
            .await?
            .iter()
            .any(|b| b.booker_id == author_id && b.span.end < now);
        if !finished {
            return Err(EngineError::NotAuthorized(author_id));
        }
        let author = self.users.find_by_id(author_id).await?;

        let comment = self
            .comments
            .save(NewComment {
                item_id,
                author_id,
                text,
                created_at: now,
            })
            .await?;

        info!("comment {} added on item {item_id}", comment.id);

        Ok(CommentView {
            id: comment.id,
            text: comment.text,
            author_name: author.name,
            created_at: comment.created_at,
        })
    }
}
