use std::collections::HashMap;

use ulid::Ulid;

use crate::model::*;

use super::availability::derive_nearest;

// ── Read-view assembly (pure composition, no store access) ───────

pub fn assemble_booking_view(booking: Booking, booker: Profile, item: Item) -> BookingView {
    BookingView {
        id: booking.id,
        span: booking.span,
        status: booking.status,
        booker,
        item,
    }
}

/// Merge an item with its bookings and comments. The `last_booking` /
/// `next_booking` annotations are derived only when the viewer owns the
/// item; everyone gets the comment list.
pub fn assemble_item_view(
    item: Item,
    bookings: &[Booking],
    comments: Vec<CommentView>,
    viewer_id: Ulid,
    now: Ms,
) -> ItemView {
    let (last_booking, next_booking) = if viewer_id == item.owner_id {
        derive_nearest(bookings, now)
    } else {
        (None, None)
    };
    ItemView {
        id: item.id,
        name: item.name,
        description: item.description,
        available: item.available,
        owner_id: item.owner_id,
        request_id: item.request_id,
        last_booking,
        next_booking,
        comments,
    }
}

/// Batched variant of [`assemble_item_view`]: bookings and comments are
/// pre-grouped by item id so assembling N items needs no per-item store
/// round trips. Produces exactly the per-item result.
pub fn assemble_item_list_view(
    items: Vec<Item>,
    bookings_by_item: &HashMap<Ulid, Vec<Booking>>,
    mut comments_by_item: HashMap<Ulid, Vec<CommentView>>,
    viewer_id: Ulid,
    now: Ms,
) -> Vec<ItemView> {
    static EMPTY: Vec<Booking> = Vec::new();
    items
        .into_iter()
        .map(|item| {
            let bookings = bookings_by_item.get(&item.id).unwrap_or(&EMPTY);
            let comments = comments_by_item.remove(&item.id).unwrap_or_default();
            assemble_item_view(item, bookings, comments, viewer_id, now)
        })
        .collect()
}
