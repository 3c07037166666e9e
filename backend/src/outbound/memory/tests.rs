//! Tests for the in-memory repository adapter.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{BookingWindow, CommentText, ItemDraft};

#[fixture]
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

fn hours(count: i64) -> TimeDelta {
    TimeDelta::hours(count)
}

async fn user(store: &MemoryStore, name: &str) -> User {
    UserRepository::insert(
        store,
        &NewUser::new(name, format!("{}@example.com", name.to_lowercase())).expect("valid user"),
    )
    .await
    .expect("user stored")
}

async fn item(store: &MemoryStore, owner: UserId, name: &str, available: bool) -> Item {
    let draft = ItemDraft {
        owner,
        name: name.to_owned(),
        description: format!("{name} for borrowing"),
        available,
        request_id: None,
    };
    ItemRepository::insert(store, &NewItem::new(draft).expect("valid item"))
        .await
        .expect("item stored")
}

async fn booking(
    store: &MemoryStore,
    item: &Item,
    booker: UserId,
    start: NaiveDateTime,
    end: NaiveDateTime,
    created_at: NaiveDateTime,
) -> Booking {
    let window = BookingWindow::new(start, end, created_at).expect("valid window");
    let new_booking = NewBooking::for_item(item, booker, window).expect("bookable item");
    BookingRepository::insert(store, &new_booking)
        .await
        .expect("booking stored")
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = MemoryStore::new();
    user(&store, "Ada").await;

    let error = UserRepository::insert(
        &store,
        &NewUser::new("Other", "ada@example.com").expect("valid user"),
    )
    .await
    .expect_err("duplicate email");

    assert!(matches!(error, UserPersistenceError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn updating_to_own_email_is_allowed() {
    let store = MemoryStore::new();
    let ada = user(&store, "Ada").await;

    let renamed = User::from_parts(ada.id(), "Ada L.".to_owned(), ada.email().to_owned());
    let updated = UserRepository::update(&store, &renamed)
        .await
        .expect("update succeeds");

    assert_eq!(updated.name(), "Ada L.");
}

#[rstest]
#[tokio::test]
async fn deleting_user_cascades_to_items_and_bookings(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    booking(&store, &drill, booker.id(), now + hours(1), now + hours(2), now).await;

    assert!(UserRepository::delete(&store, owner.id()).await.expect("delete"));

    assert!(ItemRepository::find_by_id(&store, drill.id())
        .await
        .expect("lookup")
        .is_none());
    let page = PageRequest::new(0, 10).expect("valid page");
    assert!(store
        .list_by_booker(booker.id(), page)
        .await
        .expect("listing")
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn deleting_unknown_user_reports_false() {
    let store = MemoryStore::new();
    assert!(!UserRepository::delete(&store, UserId::new(42))
        .await
        .expect("delete"));
}

#[rstest]
#[case("DRILL")]
#[case("borrow")]
#[tokio::test]
async fn search_is_case_insensitive_over_available_items(#[case] text: &str) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    item(&store, owner.id(), "Drill press", false).await;

    let page = PageRequest::new(0, 10).expect("valid page");
    let found = store.search(text, page).await.expect("search");

    assert_eq!(found, vec![drill]);
}

#[rstest]
#[tokio::test]
async fn booking_carries_item_name_and_owner(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;

    let stored = booking(&store, &drill, booker.id(), now + hours(1), now + hours(2), now).await;

    assert_eq!(stored.status, BookingStatus::Waiting);
    assert_eq!(stored.item.name, "Drill");
    assert_eq!(stored.item_owner(), owner.id());
}

#[rstest]
#[tokio::test]
async fn status_update_of_missing_booking_is_not_found() {
    let store = MemoryStore::new();
    let error = store
        .update_status(BookingId::new(5), BookingStatus::Waiting, BookingStatus::Approved)
        .await
        .expect_err("missing booking");

    assert!(matches!(error, BookingRepositoryError::NotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn status_update_from_stale_status_is_refused(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    let stored = booking(&store, &drill, booker.id(), now + hours(1), now + hours(2), now).await;
    store
        .update_status(stored.id, BookingStatus::Waiting, BookingStatus::Approved)
        .await
        .expect("first approval");

    let error = store
        .update_status(stored.id, BookingStatus::Waiting, BookingStatus::Approved)
        .await
        .expect_err("second writer read WAITING");

    assert_eq!(error, BookingRepositoryError::status_changed(stored.id));
    let current = BookingRepository::find_by_id(&store, stored.id)
        .await
        .expect("lookup")
        .expect("still stored");
    assert_eq!(current.status, BookingStatus::Approved);
}

#[rstest]
#[tokio::test]
async fn owner_listing_is_newest_start_first_and_paged(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    let early = booking(&store, &drill, booker.id(), now + hours(1), now + hours(2), now).await;
    let late = booking(&store, &drill, booker.id(), now + hours(5), now + hours(6), now).await;
    let middle = booking(&store, &drill, booker.id(), now + hours(3), now + hours(4), now).await;

    let first = PageRequest::new(0, 2).expect("valid page");
    let second = PageRequest::new(2, 2).expect("valid page");
    let page_one = store.list_by_item_owner(owner.id(), first).await.expect("page");
    let page_two = store.list_by_item_owner(owner.id(), second).await.expect("page");

    let ids = |bookings: &[Booking]| bookings.iter().map(|b| b.id).collect::<Vec<_>>();
    assert_eq!(ids(&page_one), vec![late.id, middle.id]);
    assert_eq!(ids(&page_two), vec![early.id]);
}

#[rstest]
#[tokio::test]
async fn adjacent_lookup_skips_rejected_bookings(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    let past_created = now - hours(10);
    let past = booking(
        &store,
        &drill,
        booker.id(),
        now - hours(5),
        now - hours(4),
        past_created,
    )
    .await;
    let soon = booking(&store, &drill, booker.id(), now + hours(1), now + hours(2), now).await;
    let later = booking(&store, &drill, booker.id(), now + hours(3), now + hours(4), now).await;
    store
        .update_status(soon.id, BookingStatus::Waiting, BookingStatus::Rejected)
        .await
        .expect("reject");

    let last = store
        .find_adjacent(drill.id(), now, BookingStatus::Rejected, Direction::Last)
        .await
        .expect("lookup");
    let next = store
        .find_adjacent(drill.id(), now, BookingStatus::Rejected, Direction::Next)
        .await
        .expect("lookup");

    assert_eq!(last.map(|b| b.id), Some(past.id));
    assert_eq!(next.map(|b| b.id), Some(later.id));
}

#[rstest]
#[tokio::test]
async fn completed_booking_requires_approval_and_past_end(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;
    let running = booking(
        &store,
        &drill,
        booker.id(),
        now - hours(1),
        now + hours(1),
        now - hours(2),
    )
    .await;
    let waiting = store
        .find_completed(booker.id(), drill.id(), now + hours(2))
        .await
        .expect("lookup");
    store
        .update_status(running.id, BookingStatus::Waiting, BookingStatus::Approved)
        .await
        .expect("approve");

    let before = store
        .find_completed(booker.id(), drill.id(), now)
        .await
        .expect("lookup");
    let after = store
        .find_completed(booker.id(), drill.id(), now + hours(2))
        .await
        .expect("lookup");

    assert!(waiting.is_none());
    assert!(before.is_none());
    assert_eq!(after.map(|b| b.id), Some(running.id));
}

#[rstest]
#[tokio::test]
async fn comments_carry_author_name(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let owner = user(&store, "Owner").await;
    let booker = user(&store, "Booker").await;
    let drill = item(&store, owner.id(), "Drill", true).await;

    CommentRepository::insert(
        &store,
        &NewComment {
            text: CommentText::new("Works well").expect("valid text"),
            item: drill.id(),
            author: booker.id(),
            created: now,
        },
    )
    .await
    .expect("comment stored");

    let comments = store.list_by_item(drill.id()).await.expect("listing");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_name, "Booker");
    assert_eq!(comments[0].text, "Works well");
}

#[rstest]
#[tokio::test]
async fn others_requests_exclude_caller_newest_first(now: NaiveDateTime) {
    let store = MemoryStore::new();
    let ada = user(&store, "Ada").await;
    let bob = user(&store, "Bob").await;
    let older = NewItemRequest::new("Need a drill", bob.id(), now - hours(2)).expect("valid");
    let newer = NewItemRequest::new("Need a ladder", bob.id(), now).expect("valid");
    let own = NewItemRequest::new("Need a saw", ada.id(), now).expect("valid");
    for request in [&older, &newer, &own] {
        ItemRequestRepository::insert(&store, request)
            .await
            .expect("request stored");
    }

    let page = PageRequest::new(0, 10).expect("valid page");
    let listed = store
        .list_excluding_requestor(ada.id(), page)
        .await
        .expect("listing");

    let descriptions: Vec<&str> = listed.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Need a ladder", "Need a drill"]);
}
