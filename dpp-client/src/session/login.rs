//! Login orchestration
//!
//! Drives prober, store, and dispatcher to produce one installed
//! [`SessionContext`], or a precise failure. Credential inputs are
//! independent slots: the UI may label one "brand key" and another
//! "supplier key", but a label is not a contract and any slot may
//! resolve to any role.
//!
//! Slots are probed strictly in order so that a failure in an earlier
//! slot aborts the attempt before later slots are touched; a partial
//! session is never installed.

use crate::client::ApiClient;
use crate::probe::{probe, ProbeOutcome};
use crate::session::store::{SettingsStore, StoreError, StoredKey};
use shared::SessionContext;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// Before `resume` has run
    Idle,
    /// Re-validating stored keys at startup
    AutoValidating,
    /// Waiting for credentials
    AwaitingInput,
    /// Probing submitted credentials
    Probing,
    /// Session installed
    Authenticated,
}

/// One labeled credential input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSlot {
    pub label: String,
    pub value: String,
}

impl CredentialSlot {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Blank slots are never probed and never block the other slots.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Login failure, always a value, never a panic across this boundary
#[derive(Debug, Error)]
pub enum LoginError {
    /// The platform answered and rejected the key
    #[error("credential rejected for {slot}")]
    Rejected { slot: String },

    /// No answer from the platform for any role
    #[error("no response from server while checking {slot}")]
    Unreachable { slot: String },

    /// One or more stored keys failed startup re-validation; the whole
    /// stored set was discarded
    #[error("saved credentials are no longer valid")]
    SavedCredentialsInvalid,

    /// Every supplied credential probed with zero matches
    #[error("no valid role found")]
    NoRoleResolved,

    /// Submission with nothing filled in
    #[error("no credentials supplied")]
    NoCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coordinates prober, store, and dispatcher into one session lifecycle.
///
/// Owns the single live [`SessionContext`]; consumers borrow it through
/// [`LoginManager::session`] instead of reaching for global state. It is
/// replaced wholesale on the next successful login and dropped on logout.
pub struct LoginManager {
    client: Arc<ApiClient>,
    store: SettingsStore,
    session: Option<SessionContext>,
    state: LoginState,
}

impl LoginManager {
    pub fn new(client: Arc<ApiClient>, store: SettingsStore) -> Self {
        Self {
            client,
            store,
            session: None,
            state: LoginState::Idle,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Rebuild a session from stored keys at startup.
    ///
    /// Stored role labels are not trusted; every key is re-run through
    /// the prober and the binding comes from the fresh probe. The policy
    /// is all-or-nothing: if any stored key fails, the entire set is
    /// discarded and the user falls back to manual login. Nobody can
    /// safely guess which role a partially valid set was meant to drop.
    ///
    /// `Ok(None)` means no keys were stored and input is awaited.
    pub async fn resume(&mut self) -> Result<Option<&SessionContext>, LoginError> {
        let stored = self.store.load_keys();
        if stored.is_empty() {
            self.state = LoginState::AwaitingInput;
            return Ok(None);
        }

        self.state = LoginState::AutoValidating;
        info!(count = stored.len(), "re-validating stored keys");

        let mut context = SessionContext::new();
        for entry in &stored {
            match probe(&self.client, &entry.key).await {
                ProbeOutcome::Matched(binding) => context.bind(binding),
                outcome => {
                    warn!(
                        name = %entry.name,
                        ?outcome,
                        "stored key failed re-validation, discarding the whole set"
                    );
                    self.store.clear_keys()?;
                    self.state = LoginState::AwaitingInput;
                    return Err(LoginError::SavedCredentialsInvalid);
                }
            }
        }

        self.install(context).await;
        Ok(self.session.as_ref())
    }

    /// Manual login from labeled credential slots.
    ///
    /// Blank slots are skipped. Filled slots are probed in order; the
    /// first failure aborts the attempt with a slot-specific error and
    /// nothing is installed. On success the stored key set is rewritten
    /// when `remember` is set, cleared otherwise.
    pub async fn login(
        &mut self,
        slots: &[CredentialSlot],
        remember: bool,
    ) -> Result<&SessionContext, LoginError> {
        let filled: Vec<&CredentialSlot> = slots.iter().filter(|s| !s.is_blank()).collect();
        if filled.is_empty() {
            return Err(LoginError::NoCredentials);
        }

        self.state = LoginState::Probing;
        let mut context = SessionContext::new();
        for slot in filled {
            match probe(&self.client, slot.value.trim()).await {
                ProbeOutcome::Matched(binding) => {
                    info!(slot = %slot.label, role = %binding.role, "slot resolved");
                    context.bind(binding);
                }
                ProbeOutcome::NoMatch => {
                    self.state = LoginState::AwaitingInput;
                    return Err(LoginError::Rejected {
                        slot: slot.label.clone(),
                    });
                }
                ProbeOutcome::Unreachable => {
                    self.state = LoginState::AwaitingInput;
                    return Err(LoginError::Unreachable {
                        slot: slot.label.clone(),
                    });
                }
            }
        }

        if context.is_empty() {
            self.state = LoginState::AwaitingInput;
            return Err(LoginError::NoRoleResolved);
        }

        if remember {
            let keys: Vec<StoredKey> = context.bindings().map(StoredKey::from).collect();
            self.store.save_keys(&keys)?;
        } else {
            self.store.clear_keys()?;
        }

        self.install(context).await;
        match &self.session {
            Some(session) => Ok(session),
            None => Err(LoginError::NoRoleResolved),
        }
    }

    /// Explicit logout: clears the session, the admin lane, and the
    /// stored keys. Unrelated preferences in the settings file survive.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        info!("logging out");
        self.session = None;
        self.client.set_admin_key(None).await;
        self.store.clear_keys()?;
        self.state = LoginState::AwaitingInput;
        Ok(())
    }

    async fn install(&mut self, context: SessionContext) {
        let admin_key = context.admin().map(|b| b.credential.clone());
        self.client.set_admin_key(admin_key).await;
        info!(
            admin = context.is_admin(),
            brand = context.is_brand(),
            supplier = context.is_supplier(),
            "session installed"
        );
        self.session = Some(context);
        self.state = LoginState::Authenticated;
    }
}
