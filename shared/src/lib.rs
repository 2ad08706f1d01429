//! Shared types for the DPP admin client
//!
//! Common types used across the client crates: session/role aggregates,
//! the platform API response envelope, and tenant entity records.

pub mod models;
pub mod response;
pub mod session;

// Re-exports
pub use models::{BrandRecord, SupplierRecord};
pub use response::{ApiEnvelope, Payload};
pub use session::{Role, RoleBinding, SessionContext};
