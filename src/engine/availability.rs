use crate::model::*;

use super::EngineError;

// ── Time-relative classification ─────────────────────────────────

/// Parse a state filter token from the request layer. Exact uppercase
/// tokens only; anything else is a client error naming the token, never a
/// silent fallback to ALL.
pub fn parse_state(token: &str) -> Result<StateFilter, EngineError> {
    match token {
        "ALL" => Ok(StateFilter::All),
        "CURRENT" => Ok(StateFilter::Current),
        "PAST" => Ok(StateFilter::Past),
        "FUTURE" => Ok(StateFilter::Future),
        "WAITING" => Ok(StateFilter::Waiting),
        "REJECTED" => Ok(StateFilter::Rejected),
        other => Err(EngineError::UnknownState(other.to_string())),
    }
}

/// Narrow a booking listing by status or position relative to `now`.
/// CURRENT is `start <= now < end` (strict upper bound), so PAST,
/// CURRENT, and FUTURE partition any booking set.
pub fn filter_by_state(mut bookings: Vec<Booking>, filter: StateFilter, now: Ms) -> Vec<Booking> {
    match filter {
        StateFilter::All => {}
        StateFilter::Waiting => bookings.retain(|b| b.status == BookingStatus::Waiting),
        StateFilter::Rejected => bookings.retain(|b| b.status == BookingStatus::Rejected),
        StateFilter::Past => bookings.retain(|b| b.span.end < now),
        StateFilter::Future => bookings.retain(|b| b.span.start > now),
        StateFilter::Current => bookings.retain(|b| b.span.contains_instant(now)),
    }
    bookings
}

/// Nearest approved bookings around `now`: the one that ended last and
/// the one that starts next. Waiting and rejected bookings never
/// participate. Ties break deterministically: highest id for `last`,
/// lowest id for `next`.
pub fn derive_nearest(bookings: &[Booking], now: Ms) -> (Option<Booking>, Option<Booking>) {
    let mut last: Option<&Booking> = None;
    let mut next: Option<&Booking> = None;

    for b in bookings.iter().filter(|b| b.status == BookingStatus::Approved) {
        if b.span.end < now {
            let better = match last {
                Some(l) => (b.span.end, b.id) > (l.span.end, l.id),
                None => true,
            };
            if better {
                last = Some(b);
            }
        }
        if b.span.start > now {
            let better = match next {
                Some(n) => (b.span.start, b.id) < (n.span.start, n.id),
                None => true,
            };
            if better {
                next = Some(b);
            }
        }
    }

    (last.cloned(), next.cloned())
}
