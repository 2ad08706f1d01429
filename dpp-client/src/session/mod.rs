//! Session lifecycle: key persistence and login orchestration

mod login;
mod store;

pub use login::{CredentialSlot, LoginError, LoginManager, LoginState};
pub use store::{SettingsStore, StoreError, StoredKey};
