use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;
use ulid::Ulid;

use crate::model::*;
use crate::observability;

use super::availability::{filter_by_state, parse_state};
use super::views::{assemble_item_list_view, assemble_item_view};
use super::{now_ms, Engine, EngineError};

pub(super) fn validate_page(page: &Page) -> Result<(), EngineError> {
    if let Page::Window { from, size } = *page
        && (from < 0 || size <= 0)
    {
        return Err(EngineError::InvalidPage { from, size });
    }
    Ok(())
}

impl Engine {
    /// Fetch one booking. Visible only to the booker or the item's owner.
    pub async fn get_booking(
        &self,
        requester_id: Ulid,
        booking_id: Ulid,
    ) -> Result<BookingView, EngineError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(EngineError::BookingNotFound(booking_id))?;
        let item = self.items.find_by_id(booking.item_id).await?;
        if requester_id != booking.booker_id && requester_id != item.owner_id {
            return Err(EngineError::NotAuthorized(requester_id));
        }
        let booker = self.users.find_by_id(booking.booker_id).await?;
        Ok(super::views::assemble_booking_view(booking, booker, item))
    }

    /// Bookings requested by `booker_id`, most-recent-start first. The
    /// store page is fetched first, then the state filter narrows it.
    pub async fn list_by_booker(
        &self,
        booker_id: Ulid,
        state: &str,
        page: &Page,
    ) -> Result<Vec<BookingView>, EngineError> {
        let started = Instant::now();
        self.users.find_by_id(booker_id).await?;
        let filter = parse_state(state)?;
        validate_page(page)?;

        let bookings = self.bookings.find_by_booker(booker_id, page).await?;
        let bookings = filter_by_state(bookings, filter, now_ms());
        debug!("list_by_booker {booker_id}: {} bookings after {state}", bookings.len());

        let views = self.booking_views(bookings).await;
        metrics::histogram!(observability::LIST_QUERY_DURATION_SECONDS, "op" => "by_booker")
            .record(started.elapsed().as_secs_f64());
        views
    }

    /// Bookings on every item owned by `owner_id`, most-recent-start
    /// first. Per-item fetches are not globally ordered, so the merged
    /// result is re-sorted before the state filter applies.
    pub async fn list_by_owner(
        &self,
        owner_id: Ulid,
        state: &str,
        page: &Page,
    ) -> Result<Vec<BookingView>, EngineError> {
        let started = Instant::now();
        self.users.find_by_id(owner_id).await?;
        let filter = parse_state(state)?;
        validate_page(page)?;

        let mut bookings = Vec::new();
        for item_id in self.owned_item_ids(owner_id).await? {
            bookings.extend(self.bookings.find_by_item(item_id, page).await?);
        }
        bookings.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then_with(|| b.id.cmp(&a.id))
        });
        let bookings = filter_by_state(bookings, filter, now_ms());
        debug!("list_by_owner {owner_id}: {} bookings after {state}", bookings.len());

        let views = self.booking_views(bookings).await;
        metrics::histogram!(observability::LIST_QUERY_DURATION_SECONDS, "op" => "by_owner")
            .record(started.elapsed().as_secs_f64());
        views
    }

    /// Single-item read view. Booking annotations are owner-only; the
    /// comment list attaches for every viewer.
    pub async fn get_item(&self, viewer_id: Ulid, item_id: Ulid) -> Result<ItemView, EngineError> {
        self.users.find_by_id(viewer_id).await?;
        let item = self.items.find_by_id(item_id).await?;

        let bookings = if viewer_id == item.owner_id {
            self.bookings.find_by_item(item_id, &Page::Unpaged).await?
        } else {
            Vec::new()
        };
        let comments = self.comment_views(self.comments.find_by_item(item_id).await?).await?;

        Ok(assemble_item_view(item, &bookings, comments, viewer_id, now_ms()))
    }

    /// Read views for every item owned by `owner_id`. One approved-booking
    /// query and one comment query feed all items, grouped by item id, so
    /// assembling N items needs no per-item store round trips.
    pub async fn list_items(
        &self,
        owner_id: Ulid,
        page: &Page,
    ) -> Result<Vec<ItemView>, EngineError> {
        let started = Instant::now();
        self.users.find_by_id(owner_id).await?;
        validate_page(page)?;
        let items = self.items.list_by_owner(owner_id, page).await?;

        let mut bookings_by_item: HashMap<Ulid, Vec<Booking>> = HashMap::new();
        for booking in self.bookings.find_approved().await? {
            bookings_by_item.entry(booking.item_id).or_default().push(booking);
        }

        let mut grouped: HashMap<Ulid, Vec<Comment>> = HashMap::new();
        for comment in self.comments.find_all().await? {
            grouped.entry(comment.item_id).or_default().push(comment);
        }
        let mut comments_by_item: HashMap<Ulid, Vec<CommentView>> = HashMap::new();
        for (item_id, comments) in grouped {
            comments_by_item.insert(item_id, self.comment_views(comments).await?);
        }

        let views = assemble_item_list_view(
            items,
            &bookings_by_item,
            comments_by_item,
            owner_id,
            now_ms(),
        );
        metrics::histogram!(observability::LIST_QUERY_DURATION_SECONDS, "op" => "items")
            .record(started.elapsed().as_secs_f64());
        Ok(views)
    }
}
