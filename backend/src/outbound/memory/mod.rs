//! In-process store implementing every repository port.
//!
//! `MemoryStore` backs the server when no database is configured and gives
//! integration tests a real adapter without PostgreSQL. Tables live behind a
//! single `RwLock`, so every port call is atomic with respect to the others.
//! Deleting a user cascades to everything that references it, mirroring the
//! foreign keys of the SQL schema.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pagination::PageRequest;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CommentRepository, CommentRepositoryError,
    ItemRepository, ItemRepositoryError, ItemRequestRepository, ItemRequestRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    BookedItem, Booking, BookingId, BookingStatus, Comment, CommentId, Direction, Item, ItemId,
    ItemRequest, ItemRequestId, NewBooking, NewComment, NewItem, NewItemRequest, NewUser, User,
    UserId,
};

const POISONED: &str = "memory store lock poisoned";

#[derive(Debug, Clone)]
struct BookingRecord {
    id: BookingId,
    start: NaiveDateTime,
    end: NaiveDateTime,
    item: ItemId,
    booker: UserId,
    status: BookingStatus,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: CommentId,
    text: String,
    item: ItemId,
    author: UserId,
    created: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    items: BTreeMap<ItemId, Item>,
    bookings: BTreeMap<BookingId, BookingRecord>,
    comments: BTreeMap<CommentId, CommentRecord>,
    requests: BTreeMap<ItemRequestId, ItemRequest>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }

    fn hydrate(&self, record: &BookingRecord) -> Option<Booking> {
        let item = self.items.get(&record.item)?;
        Some(Booking {
            id: record.id,
            start: record.start,
            end: record.end,
            item: BookedItem {
                id: item.id(),
                name: item.name().to_owned(),
                owner: item.owner(),
            },
            booker: record.booker,
            status: record.status,
        })
    }

    fn bookings_where<F>(&self, keep: F) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        self.bookings
            .values()
            .filter_map(|record| self.hydrate(record))
            .filter(|booking| keep(booking))
            .collect()
    }

    fn comment(&self, record: &CommentRecord) -> Comment {
        let author_name = self
            .users
            .get(&record.author)
            .map(|user| user.name().to_owned())
            .unwrap_or_default();
        Comment {
            id: record.id,
            text: record.text.clone(),
            item: record.item,
            author: record.author,
            author_name,
            created: record.created,
        }
    }

    fn remove_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let owned: Vec<ItemId> = self
            .items
            .values()
            .filter(|item| item.is_owned_by(id))
            .map(Item::id)
            .collect();
        self.items.retain(|item_id, _| !owned.contains(item_id));
        self.bookings
            .retain(|_, booking| booking.booker != id && !owned.contains(&booking.item));
        self.comments
            .retain(|_, comment| comment.author != id && !owned.contains(&comment.item));
        self.requests.retain(|_, request| request.requestor != id);
        true
    }
}

/// Thread-safe in-memory implementation of the repository ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<E>(&self, error: impl FnOnce(&'static str) -> E) -> Result<RwLockReadGuard<'_, Tables>, E> {
        self.tables.read().map_err(|_| error(POISONED))
    }

    fn write<E>(
        &self,
        error: impl FnOnce(&'static str) -> E,
    ) -> Result<RwLockWriteGuard<'_, Tables>, E> {
        self.tables.write().map_err(|_| error(POISONED))
    }
}

fn page_of<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    page.slice(rows).to_vec()
}

fn newest_start_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.write(UserPersistenceError::query)?;
        if tables.email_taken(user.email(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        let id = UserId::new(tables.next_id());
        let stored = User::from_new(id, user.clone());
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut tables = self.write(UserPersistenceError::query)?;
        if !tables.users.contains_key(&user.id()) {
            return Err(UserPersistenceError::not_found(user.id()));
        }
        if tables.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.write(UserPersistenceError::query)?;
        Ok(tables.remove_user(id))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.read(UserPersistenceError::query)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.read(UserPersistenceError::query)?;
        Ok(tables.users.values().cloned().collect())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError> {
        let mut tables = self.write(ItemRepositoryError::query)?;
        let id = ItemId::new(tables.next_id());
        let stored = Item::from_new(id, item.clone());
        tables.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, item: &Item) -> Result<Item, ItemRepositoryError> {
        let mut tables = self.write(ItemRepositoryError::query)?;
        match tables.items.get_mut(&item.id()) {
            Some(slot) => {
                *slot = item.clone();
                Ok(item.clone())
            }
            None => Err(ItemRepositoryError::not_found(item.id())),
        }
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let tables = self.read(ItemRepositoryError::query)?;
        Ok(tables.items.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let tables = self.read(ItemRepositoryError::query)?;
        let owned: Vec<Item> = tables
            .items
            .values()
            .filter(|item| item.is_owned_by(owner))
            .cloned()
            .collect();
        Ok(page_of(&owned, page))
    }

    async fn search(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let needle = text.to_lowercase();
        let tables = self.read(ItemRepositoryError::query)?;
        let matches: Vec<Item> = tables
            .items
            .values()
            .filter(|item| item.available())
            .filter(|item| {
                item.name().to_lowercase().contains(&needle)
                    || item.description().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(page_of(&matches, page))
    }

    async fn list_by_request(
        &self,
        request: ItemRequestId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let tables = self.read(ItemRepositoryError::query)?;
        Ok(tables
            .items
            .values()
            .filter(|item| item.request_id() == Some(request))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut tables = self.write(BookingRepositoryError::query)?;
        let id = BookingId::new(tables.next_id());
        let record = BookingRecord {
            id,
            start: booking.window().start(),
            end: booking.window().end(),
            item: booking.item(),
            booker: booking.booker(),
            status: booking.status(),
        };
        let stored = tables.hydrate(&record).ok_or_else(|| {
            BookingRepositoryError::query(format!("item {} does not exist", record.item))
        })?;
        tables.bookings.insert(id, record);
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Booking, BookingRepositoryError> {
        let mut tables = self.write(BookingRepositoryError::query)?;
        let record = tables
            .bookings
            .get_mut(&id)
            .ok_or_else(|| BookingRepositoryError::not_found(id))?;
        if record.status != expected {
            return Err(BookingRepositoryError::status_changed(id));
        }
        record.status = status;
        let record = record.clone();
        tables
            .hydrate(&record)
            .ok_or_else(|| BookingRepositoryError::not_found(id))
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.read(BookingRepositoryError::query)?;
        Ok(tables
            .bookings
            .get(&id)
            .and_then(|record| tables.hydrate(record)))
    }

    async fn list_by_booker(
        &self,
        booker: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.read(BookingRepositoryError::query)?;
        let mut bookings = tables.bookings_where(|booking| booking.booker == booker);
        newest_start_first(&mut bookings);
        Ok(page_of(&bookings, page))
    }

    async fn list_by_item_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.read(BookingRepositoryError::query)?;
        let mut bookings = tables.bookings_where(|booking| booking.item_owner() == owner);
        newest_start_first(&mut bookings);
        Ok(page_of(&bookings, page))
    }

    async fn find_adjacent(
        &self,
        item: ItemId,
        now: NaiveDateTime,
        excluded: BookingStatus,
        direction: Direction,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.read(BookingRepositoryError::query)?;
        let bookings = tables.bookings_where(|booking| booking.item.id == item);
        Ok(direction.select(&bookings, now, excluded).cloned())
    }

    async fn find_completed(
        &self,
        booker: UserId,
        item: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.read(BookingRepositoryError::query)?;
        Ok(tables
            .bookings_where(|booking| {
                booking.booker == booker && booking.item.id == item && booking.is_completed(now)
            })
            .into_iter()
            .next())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.write(CommentRepositoryError::query)?;
        let id = CommentId::new(tables.next_id());
        let record = CommentRecord {
            id,
            text: comment.text.as_str().to_owned(),
            item: comment.item,
            author: comment.author,
            created: comment.created,
        };
        let stored = tables.comment(&record);
        tables.comments.insert(id, record);
        Ok(stored)
    }

    async fn list_by_item(&self, item: ItemId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.read(CommentRepositoryError::query)?;
        Ok(tables
            .comments
            .values()
            .filter(|record| record.item == item)
            .map(|record| tables.comment(record))
            .collect())
    }
}

#[async_trait]
impl ItemRequestRepository for MemoryStore {
    async fn insert(
        &self,
        request: &NewItemRequest,
    ) -> Result<ItemRequest, ItemRequestRepositoryError> {
        let mut tables = self.write(ItemRequestRepositoryError::query)?;
        let id = ItemRequestId::new(tables.next_id());
        let stored = ItemRequest::from_new(id, request.clone());
        tables.requests.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: ItemRequestId,
    ) -> Result<Option<ItemRequest>, ItemRequestRepositoryError> {
        let tables = self.read(ItemRequestRepositoryError::query)?;
        Ok(tables.requests.get(&id).cloned())
    }

    async fn list_by_requestor(
        &self,
        requestor: UserId,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError> {
        let tables = self.read(ItemRequestRepositoryError::query)?;
        let mut requests: Vec<ItemRequest> = tables
            .requests
            .values()
            .filter(|request| request.requestor == requestor)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(requests)
    }

    async fn list_excluding_requestor(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError> {
        let tables = self.read(ItemRequestRepositoryError::query)?;
        let mut requests: Vec<ItemRequest> = tables
            .requests
            .values()
            .filter(|request| request.requestor != user)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(page_of(&requests, page))
    }
}

#[cfg(test)]
mod tests;
