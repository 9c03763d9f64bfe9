//! permtree-storage: Inventory storage
//!
//! This crate provides the data side of permtree, including:
//! - `MemoryInventoryStore`, implementing every resolver collaborator trait
//! - JSON inventory snapshots for seeding a store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              permtree-storage                │
//! ├─────────────────────────────────────────────┤
//! │  memory.rs   - In-memory implementation     │
//! │  snapshot.rs - JSON snapshot load/save      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod snapshot;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryInventoryStore;
pub use snapshot::{InventorySnapshot, UserEntry};
