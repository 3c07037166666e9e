//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after a migration changes a table.

diesel::table! {
    /// Registered users. `email` carries a unique constraint.
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
    }
}

diesel::table! {
    /// Item requests posted by users looking for something to borrow.
    requests (id) {
        id -> Int8,
        description -> Varchar,
        requestor_id -> Int8,
        created -> Timestamp,
    }
}

diesel::table! {
    /// Catalog items offered by their owners.
    items (id) {
        id -> Int8,
        name -> Varchar,
        description -> Varchar,
        is_available -> Bool,
        owner_id -> Int8,
        /// Request this item was created in answer to, if any.
        request_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Reservations of an item for a time window.
    bookings (id) {
        id -> Int8,
        start_date -> Timestamp,
        end_date -> Timestamp,
        item_id -> Int8,
        booker_id -> Int8,
        /// One of `WAITING`, `APPROVED`, `REJECTED`, `CANCELED`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Reviews left on items by past bookers.
    comments (id) {
        id -> Int8,
        text -> Varchar,
        item_id -> Int8,
        author_id -> Int8,
        created -> Timestamp,
    }
}

diesel::joinable!(bookings -> items (item_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(items -> requests (request_id));

diesel::allow_tables_to_appear_in_same_query!(users, requests, items, bookings, comments);
