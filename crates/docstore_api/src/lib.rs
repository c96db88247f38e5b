//! Transport-facing adapter over `docstore_core`.

pub mod api;

pub use api::{
    ApiResponse, DocumentApi, STATUS_BAD_REQUEST, STATUS_CONFLICT, STATUS_CREATED,
    STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND, STATUS_NO_CONTENT, STATUS_OK,
};
