//! Tests for the booking state machine, windows and state filters.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ItemDraft, NewItem};

#[fixture]
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

fn item(available: bool) -> Item {
    Item::from_new(
        ItemId::new(10),
        NewItem::new(ItemDraft {
            owner: UserId::new(1),
            name: "Ladder".to_owned(),
            description: "Three metre ladder".to_owned(),
            available,
            request_id: None,
        })
        .expect("valid item"),
    )
}

fn booking(start: NaiveDateTime, end: NaiveDateTime, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::new(1),
        start,
        end,
        item: BookedItem {
            id: ItemId::new(10),
            name: "Ladder".to_owned(),
            owner: UserId::new(1),
        },
        booker: UserId::new(2),
        status,
    }
}

#[rstest]
#[case(BookingStatus::Waiting, ApprovalDecision::Approve, Ok(BookingStatus::Approved))]
#[case(BookingStatus::Waiting, ApprovalDecision::Reject, Ok(BookingStatus::Rejected))]
#[case(BookingStatus::Rejected, ApprovalDecision::Approve, Ok(BookingStatus::Approved))]
#[case(BookingStatus::Rejected, ApprovalDecision::Reject, Ok(BookingStatus::Rejected))]
#[case(BookingStatus::Approved, ApprovalDecision::Reject, Ok(BookingStatus::Rejected))]
#[case(
    BookingStatus::Approved,
    ApprovalDecision::Approve,
    Err(TransitionError::AlreadyApproved)
)]
#[case(
    BookingStatus::Canceled,
    ApprovalDecision::Approve,
    Err(TransitionError::Terminal { status: BookingStatus::Canceled })
)]
#[case(
    BookingStatus::Canceled,
    ApprovalDecision::Reject,
    Err(TransitionError::Terminal { status: BookingStatus::Canceled })
)]
fn transition_table(
    #[case] from: BookingStatus,
    #[case] decision: ApprovalDecision,
    #[case] expected: Result<BookingStatus, TransitionError>,
) {
    assert_eq!(from.transition(decision), expected);
}

#[rstest]
#[case("true", Ok(ApprovalDecision::Approve))]
#[case("false", Ok(ApprovalDecision::Reject))]
#[case("yes", Err(ParseApprovalDecisionError("yes".to_owned())))]
fn parses_approval_flag(
    #[case] raw: &str,
    #[case] expected: Result<ApprovalDecision, ParseApprovalDecisionError>,
) {
    assert_eq!(raw.parse::<ApprovalDecision>(), expected);
}

#[rstest]
#[case("", BookingState::All)]
#[case("ALL", BookingState::All)]
#[case("CURRENT", BookingState::Current)]
#[case("PAST", BookingState::Past)]
#[case("FUTURE", BookingState::Future)]
#[case("WAITING", BookingState::Waiting)]
#[case("REJECTED", BookingState::Rejected)]
fn parses_known_states(#[case] raw: &str, #[case] expected: BookingState) {
    assert_eq!(raw.parse::<BookingState>(), Ok(expected));
}

#[rstest]
#[case("future")]
#[case("CANCELED")]
#[case("UNKNOWN")]
fn unknown_state_reports_fixed_message(#[case] raw: &str) {
    let err = raw.parse::<BookingState>().expect_err("unsupported state");
    assert_eq!(err.to_string(), UNSUPPORTED_STATE_MESSAGE);
    assert_eq!(err.requested, raw);
}

#[rstest]
fn status_round_trips_through_storage_text() {
    for status in [
        BookingStatus::Waiting,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Canceled,
    ] {
        assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
    }
}

#[rstest]
fn status_serialises_in_upper_case() {
    let json = serde_json::to_string(&BookingStatus::Waiting).expect("serialise status");
    assert_eq!(json, "\"WAITING\"");
}

#[rstest]
fn window_accepts_future_interval(now: NaiveDateTime) {
    let window = BookingWindow::new(now + Duration::days(1), now + Duration::days(2), now)
        .expect("future window");
    assert_eq!(window.start(), now + Duration::days(1));
    assert_eq!(window.end(), now + Duration::days(2));
}

#[rstest]
#[case(Duration::days(-2), Duration::days(-1), BookingWindowError::EndInPast)]
#[case(Duration::days(2), Duration::days(1), BookingWindowError::EndNotAfterStart)]
#[case(Duration::days(1), Duration::days(1), BookingWindowError::EndNotAfterStart)]
#[case(Duration::days(-1), Duration::days(1), BookingWindowError::StartInPast)]
#[case(Duration::zero(), Duration::days(1), BookingWindowError::StartInPast)]
fn window_rejects_invalid_intervals(
    now: NaiveDateTime,
    #[case] start: Duration,
    #[case] end: Duration,
    #[case] expected: BookingWindowError,
) {
    assert_eq!(BookingWindow::new(now + start, now + end, now), Err(expected));
}

#[rstest]
fn owner_cannot_book_own_item(now: NaiveDateTime) {
    let window = BookingWindow::new(now + Duration::hours(1), now + Duration::hours(2), now)
        .expect("future window");
    assert_eq!(
        NewBooking::for_item(&item(true), UserId::new(1), window),
        Err(BookingRuleError::OwnItem { item: ItemId::new(10) })
    );
}

#[rstest]
fn unavailable_item_cannot_be_booked(now: NaiveDateTime) {
    let window = BookingWindow::new(now + Duration::hours(1), now + Duration::hours(2), now)
        .expect("future window");
    assert_eq!(
        NewBooking::for_item(&item(false), UserId::new(2), window),
        Err(BookingRuleError::Unavailable { item: ItemId::new(10) })
    );
}

#[rstest]
fn new_booking_starts_waiting(now: NaiveDateTime) {
    let window = BookingWindow::new(now + Duration::hours(1), now + Duration::hours(2), now)
        .expect("future window");
    let booking = NewBooking::for_item(&item(true), UserId::new(2), window).expect("bookable");
    assert_eq!(booking.status(), BookingStatus::Waiting);
    assert_eq!(booking.item(), ItemId::new(10));
    assert_eq!(booking.booker(), UserId::new(2));
}

#[rstest]
#[case(BookingState::Current, Duration::hours(-1), Duration::hours(1), true)]
#[case(BookingState::Current, Duration::hours(1), Duration::hours(2), false)]
#[case(BookingState::Past, Duration::hours(-2), Duration::hours(-1), true)]
#[case(BookingState::Past, Duration::hours(-2), Duration::zero(), false)]
#[case(BookingState::Future, Duration::hours(1), Duration::hours(2), true)]
#[case(BookingState::Future, Duration::zero(), Duration::hours(2), false)]
fn temporal_states_use_strict_bounds(
    now: NaiveDateTime,
    #[case] state: BookingState,
    #[case] start: Duration,
    #[case] end: Duration,
    #[case] expected: bool,
) {
    let booking = booking(now + start, now + end, BookingStatus::Approved);
    assert_eq!(state.matches(&booking, now), expected);
}

#[rstest]
fn filter_keeps_page_order_and_drops_non_matching(now: NaiveDateTime) {
    let mut waiting = booking(now + Duration::hours(1), now + Duration::hours(2), BookingStatus::Waiting);
    waiting.id = BookingId::new(3);
    let mut rejected =
        booking(now + Duration::hours(3), now + Duration::hours(4), BookingStatus::Rejected);
    rejected.id = BookingId::new(2);
    let mut other_waiting =
        booking(now - Duration::hours(4), now - Duration::hours(3), BookingStatus::Waiting);
    other_waiting.id = BookingId::new(1);

    let page = vec![waiting, rejected, other_waiting];
    let ids: Vec<_> = BookingState::Waiting
        .filter(page.clone(), now)
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![BookingId::new(3), BookingId::new(1)]);
    assert_eq!(BookingState::All.filter(page.clone(), now), page);
}

#[rstest]
fn visibility_is_limited_to_booker_and_owner(now: NaiveDateTime) {
    let booking = booking(now, now + Duration::hours(1), BookingStatus::Waiting);
    assert!(booking.is_visible_to(UserId::new(1)));
    assert!(booking.is_visible_to(UserId::new(2)));
    assert!(!booking.is_visible_to(UserId::new(3)));
}

#[rstest]
#[case(BookingStatus::Approved, Duration::hours(-1), true)]
#[case(BookingStatus::Approved, Duration::hours(1), false)]
#[case(BookingStatus::Waiting, Duration::hours(-1), false)]
#[case(BookingStatus::Rejected, Duration::hours(-1), false)]
fn completion_requires_approved_and_ended(
    now: NaiveDateTime,
    #[case] status: BookingStatus,
    #[case] end: Duration,
    #[case] expected: bool,
) {
    let booking = booking(now - Duration::days(1), now + end, status);
    assert_eq!(booking.is_completed(now), expected);
}
