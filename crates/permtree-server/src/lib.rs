//! permtree-server: Configuration, query handlers and the CLI
//!
//! This crate wires storage and resolution together:
//! - Configuration management
//! - Logging initialisation
//! - Permission query handler
//! - Bootstrapping a handler from configuration and an inventory snapshot
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               permtree-server                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs        - Configuration           │
//! │  observability.rs - Logging                 │
//! │  bootstrap.rs     - Store + resolver wiring │
//! │  handlers/        - Query handlers          │
//! │  main.rs          - `permtree` CLI          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod observability;

// Re-exports for convenience
pub use bootstrap::{build_handler, BootstrapError, StoreHandler};
pub use config::{AppConfig, ConfigLoadError};
pub use handlers::{HandlerError, PermissionQueryHandler};
