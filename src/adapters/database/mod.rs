//! Database abstraction layer
//!
//! Callers hold an `Arc<dyn DocumentStore>` and never name a concrete backend.

pub mod factory;
pub mod traits;

pub use factory::{create_document_store, StoreMode};
pub use traits::{ContainerInfo, ContainerStatus, DocumentStore};
