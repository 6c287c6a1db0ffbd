//! Collaborator interfaces
//!
//! The relational store and the external newspaper-resolution service sit
//! outside this crate; only their contracts live here. The crawl pipeline
//! consumes these traits, tests supply in-memory fakes, and the hosting
//! application wires in real implementations.

mod traits;

pub use traits::{ArticleStore, Newspaper, NewspaperResolver, StoreError, StoreResult};
