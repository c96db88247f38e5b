//! Document domain model.
//!
//! # Responsibility
//! - Define the canonical record used by storage, codecs and services.
//!
//! # Invariants
//! - Every stored object is identified by a unique string `DocumentId`.
//! - Deletion removes the record; there are no tombstones.

pub mod document;
