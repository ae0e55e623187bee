//! Client for the backing PostgREST store.
//!
//! The store is opaque: one list endpoint taking filter/sort/pagination
//! query parameters and answering with a JSON array of records plus a
//! `Content-Range` count header.

mod client;

pub use client::{StoreClient, StoreError, StoreResponse};
