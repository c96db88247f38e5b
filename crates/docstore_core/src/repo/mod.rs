//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define the document data access contract.
//! - Isolate concurrent map details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Document::validate()` before storage.
//! - Repository APIs return semantic errors (`Conflict`, `NotFound`) for
//!   write paths; reads and deletes treat absence as a normal result.

pub mod document_repo;
