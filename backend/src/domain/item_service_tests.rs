//! Tests for the catalog service and the comment gate.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use mockall::predicate::eq;
use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockBookingRepository, MockCommentRepository, MockItemRepository, MockItemRequestRepository,
    MockUserRepository,
};
use crate::domain::{
    BookedItem, Booking, BookingId, BookingStatus, BookingSummary, CommentId, Direction,
    ErrorCode, ItemDraft, ItemRequestId, NewUser, User,
};
use crate::test_support::FixtureClock;

const OWNER: UserId = UserId::new(1);
const BOOKER: UserId = UserId::new(2);
const ITEM: ItemId = ItemId::new(10);

type Service = ItemService<
    MockItemRepository,
    MockBookingRepository,
    MockCommentRepository,
    MockUserRepository,
    MockItemRequestRepository,
>;

#[fixture]
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

fn draft(request_id: Option<ItemRequestId>) -> ItemDraft {
    ItemDraft {
        owner: OWNER,
        name: "Drill".to_owned(),
        description: "Cordless drill".to_owned(),
        available: true,
        request_id,
    }
}

fn item() -> Item {
    Item::from_new(ITEM, NewItem::new(draft(None)).expect("valid item"))
}

fn booking(id: i64, start: NaiveDateTime, end: NaiveDateTime) -> Booking {
    Booking {
        id: BookingId::new(id),
        start,
        end,
        item: BookedItem {
            id: ITEM,
            name: "Drill".to_owned(),
            owner: OWNER,
        },
        booker: BOOKER,
        status: BookingStatus::Approved,
    }
}

fn known_users() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| {
        Ok([OWNER, BOOKER].contains(&id).then(|| {
            User::from_new(
                id,
                NewUser::new(format!("user-{id}"), format!("user{id}@example.com"))
                    .expect("valid user"),
            )
        }))
    });
    users
}

fn known_item() -> MockItemRepository {
    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .with(eq(ITEM))
        .returning(|_| Ok(Some(item())));
    items
}

fn no_comments() -> MockCommentRepository {
    let mut comments = MockCommentRepository::new();
    comments.expect_list_by_item().returning(|_| Ok(Vec::new()));
    comments
}

struct Mocks {
    items: MockItemRepository,
    bookings: MockBookingRepository,
    comments: MockCommentRepository,
    users: MockUserRepository,
    requests: MockItemRequestRepository,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            items: known_item(),
            bookings: MockBookingRepository::new(),
            comments: no_comments(),
            users: known_users(),
            requests: MockItemRequestRepository::new(),
        }
    }
}

fn make_service(mocks: Mocks, now: NaiveDateTime) -> Service {
    ItemService::new(
        ItemStores {
            items: Arc::new(mocks.items),
            bookings: Arc::new(mocks.bookings),
            comments: Arc::new(mocks.comments),
            users: Arc::new(mocks.users),
            requests: Arc::new(mocks.requests),
        },
        Arc::new(FixtureClock::at(now)),
    )
}

#[rstest]
#[tokio::test]
async fn create_checks_referenced_request(now: NaiveDateTime) {
    let mut requests = MockItemRequestRepository::new();
    requests
        .expect_find_by_id()
        .with(eq(ItemRequestId::new(5)))
        .return_once(|_| Ok(None));
    let mut items = MockItemRepository::new();
    items.expect_insert().times(0);

    let service = make_service(
        Mocks {
            items,
            requests,
            ..Mocks::default()
        },
        now,
    );
    let new_item = NewItem::new(draft(Some(ItemRequestId::new(5)))).expect("valid item");
    let error = service.create(new_item).await.expect_err("missing request");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Request 5 not found");
}

#[rstest]
#[tokio::test]
async fn create_stores_item_for_known_owner(now: NaiveDateTime) {
    let mut items = MockItemRepository::new();
    items
        .expect_insert()
        .withf(|new| new.owner() == OWNER && new.name() == "Drill")
        .times(1)
        .returning(|new| Ok(Item::from_new(ITEM, new.clone())));

    let service = make_service(Mocks { items, ..Mocks::default() }, now);
    let created = service
        .create(NewItem::new(draft(None)).expect("valid item"))
        .await
        .expect("item created");

    assert_eq!(created.id(), ITEM);
}

#[rstest]
#[tokio::test]
async fn update_by_non_owner_is_forbidden(now: NaiveDateTime) {
    let mut items = known_item();
    items.expect_update().times(0);

    let service = make_service(Mocks { items, ..Mocks::default() }, now);
    let error = service
        .update(BOOKER, ITEM, ItemPatch::default())
        .await
        .expect_err("non-owner update");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_applies_patch(now: NaiveDateTime) {
    let mut items = known_item();
    items
        .expect_update()
        .withf(|item| !item.available() && item.name() == "Drill")
        .times(1)
        .returning(|item| Ok(item.clone()));

    let service = make_service(Mocks { items, ..Mocks::default() }, now);
    let updated = service
        .update(
            OWNER,
            ITEM,
            ItemPatch {
                available: Some(false),
                ..ItemPatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert!(!updated.available());
}

#[rstest]
#[tokio::test]
async fn update_rejects_blank_name(now: NaiveDateTime) {
    let service = make_service(Mocks::default(), now);
    let error = service
        .update(
            OWNER,
            ITEM,
            ItemPatch {
                name: Some(" ".to_owned()),
                ..ItemPatch::default()
            },
        )
        .await
        .expect_err("blank name");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn owner_view_is_annotated(now: NaiveDateTime) {
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_adjacent()
        .with(eq(ITEM), eq(now), eq(BookingStatus::Rejected), eq(Direction::Last))
        .return_once(move |_, _, _, _| {
            Ok(Some(booking(1, now - Duration::days(2), now - Duration::days(1))))
        });
    bookings
        .expect_find_adjacent()
        .with(eq(ITEM), eq(now), eq(BookingStatus::Rejected), eq(Direction::Next))
        .return_once(move |_, _, _, _| {
            Ok(Some(booking(2, now + Duration::days(1), now + Duration::days(2))))
        });

    let service = make_service(Mocks { bookings, ..Mocks::default() }, now);
    let details = service.get(OWNER, ITEM).await.expect("item view");

    assert_eq!(
        details.availability.last_booking,
        Some(BookingSummary {
            id: BookingId::new(1),
            booker_id: BOOKER
        })
    );
    assert_eq!(
        details.availability.next_booking.map(|s| s.id),
        Some(BookingId::new(2))
    );
}

#[rstest]
#[tokio::test]
async fn non_owner_view_carries_comments_only(now: NaiveDateTime) {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find_adjacent().times(0);
    let mut comments = MockCommentRepository::new();
    comments
        .expect_list_by_item()
        .with(eq(ITEM))
        .return_once(move |_| {
            Ok(vec![Comment {
                id: CommentId::new(1),
                text: "Great drill".to_owned(),
                item: ITEM,
                author: BOOKER,
                author_name: "user-2".to_owned(),
                created: now - Duration::hours(1),
            }])
        });

    let service = make_service(
        Mocks {
            bookings,
            comments,
            ..Mocks::default()
        },
        now,
    );
    let details = service.get(BOOKER, ITEM).await.expect("item view");

    assert!(details.availability.last_booking.is_none());
    assert!(details.availability.next_booking.is_none());
    assert_eq!(details.comments.len(), 1);
}

#[rstest]
#[tokio::test]
async fn owner_listing_annotates_every_item(now: NaiveDateTime) {
    let mut items = MockItemRepository::new();
    items
        .expect_list_by_owner()
        .with(eq(OWNER), eq(PageRequest::default()))
        .return_once(|_, _| {
            let second = Item::from_new(ItemId::new(11), NewItem::new(draft(None)).expect("valid"));
            Ok(vec![item(), second])
        });
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_adjacent()
        .times(4)
        .returning(|_, _, _, _| Ok(None));

    let service = make_service(
        Mocks {
            items,
            bookings,
            ..Mocks::default()
        },
        now,
    );
    let listed = service
        .list_owned(OWNER, PageRequest::default())
        .await
        .expect("listing succeeds");

    assert_eq!(listed.len(), 2);
}

#[rstest]
#[tokio::test]
async fn empty_search_text_returns_nothing(now: NaiveDateTime) {
    let mut items = MockItemRepository::new();
    items.expect_search().times(0);

    let service = make_service(Mocks { items, ..Mocks::default() }, now);
    let found = service
        .search(BOOKER, String::new(), PageRequest::default())
        .await
        .expect("search succeeds");

    assert!(found.is_empty());
}

#[rstest]
#[tokio::test]
async fn search_delegates_to_store(now: NaiveDateTime) {
    let mut items = MockItemRepository::new();
    items
        .expect_search()
        .withf(|text, page| text == "dRiLl" && *page == PageRequest::default())
        .times(1)
        .returning(|_, _| Ok(vec![item()]));

    let service = make_service(Mocks { items, ..Mocks::default() }, now);
    let found = service
        .search(BOOKER, "dRiLl".to_owned(), PageRequest::default())
        .await
        .expect("search succeeds");

    assert_eq!(found.len(), 1);
}

#[rstest]
#[tokio::test]
async fn comment_without_completed_booking_is_rejected(now: NaiveDateTime) {
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_completed()
        .with(eq(BOOKER), eq(ITEM), eq(now))
        .return_once(|_, _, _| Ok(None));
    let mut comments = MockCommentRepository::new();
    comments.expect_insert().times(0);

    let service = make_service(
        Mocks {
            bookings,
            comments,
            ..Mocks::default()
        },
        now,
    );
    let error = service
        .add_comment(BOOKER, ITEM, CommentText::new("Nice").expect("valid text"))
        .await
        .expect_err("gate closed");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Booking not found");
}

#[rstest]
#[tokio::test]
async fn comment_after_completed_booking_is_stored(now: NaiveDateTime) {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find_completed().return_once(move |_, _, _| {
        Ok(Some(booking(1, now - Duration::days(3), now - Duration::days(1))))
    });
    let mut comments = MockCommentRepository::new();
    comments
        .expect_insert()
        .withf(move |new| new.author == BOOKER && new.item == ITEM && new.created == now)
        .times(1)
        .returning(|new| {
            Ok(Comment {
                id: CommentId::new(7),
                text: new.text.as_str().to_owned(),
                item: new.item,
                author: new.author,
                author_name: "user-2".to_owned(),
                created: new.created,
            })
        });

    let service = make_service(
        Mocks {
            bookings,
            comments,
            ..Mocks::default()
        },
        now,
    );
    let comment = service
        .add_comment(BOOKER, ITEM, CommentText::new("Nice").expect("valid text"))
        .await
        .expect("comment stored");

    assert!(comment.created <= now);
    assert_eq!(comment.author_name, "user-2");
}

#[rstest]
#[tokio::test]
async fn comment_on_missing_item_is_not_found(now: NaiveDateTime) {
    let mut items = MockItemRepository::new();
    items.expect_find_by_id().return_once(|_| Ok(None));
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find_completed().times(0);

    let service = make_service(
        Mocks {
            items,
            bookings,
            ..Mocks::default()
        },
        now,
    );
    let error = service
        .add_comment(BOOKER, ITEM, CommentText::new("Nice").expect("valid text"))
        .await
        .expect_err("missing item");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
