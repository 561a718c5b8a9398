//! Query modules for the price SDK.
//!
//! Each query struct borrows the [`SnapshotClient`](crate::client::SnapshotClient)
//! and exposes methods returning `Result<T>` with typed snapshot payloads.

pub mod listings;

pub use listings::ListingQuery;
