//! DPP Client - API client for the Digital Product Passport platform
//!
//! Provides the tenant-scoped HTTP dispatcher, credential role probing,
//! key persistence, and login orchestration used by the admin desktop
//! application. View models consume [`ApiClient`] for CRUD calls and
//! [`LoginManager`] for session lifecycle.

pub mod client;
pub mod config;
pub mod error;
pub mod probe;
pub mod session;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use probe::{probe, ProbeOutcome};
pub use session::{
    CredentialSlot, LoginError, LoginManager, LoginState, SettingsStore, StoreError, StoredKey,
};

// Re-export shared types for convenience
pub use shared::{ApiEnvelope, BrandRecord, Payload, Role, RoleBinding, SessionContext, SupplierRecord};
