//! Credential role probing
//!
//! Classifies one opaque key into at most one role by asking the
//! platform, in fixed priority order: Admin, then Brand, then Supplier.
//!
//! The order matters. The brand/supplier listing endpoints answer
//! successfully for *any* valid tenant key, not just the caller's own,
//! so HTTP success alone proves nothing. A tenant role is accepted only
//! when the first returned record's own `api_key` field equals the
//! probed key (ownership-equality check).

use crate::client::ApiClient;
use shared::{BrandRecord, RoleBinding, SupplierRecord};
use tracing::{debug, info};

/// Brand listing endpoint; also the admin probe's privileged read
pub const BRAND_LIST_PATH: &str = "api/brands";
/// Supplier listing endpoint
pub const SUPPLIER_LIST_PATH: &str = "api/suppliers";

/// Result of probing one credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The key proved ownership of exactly this role
    Matched(RoleBinding),
    /// At least one endpoint answered and the key owned no role
    NoMatch,
    /// No endpoint produced an answer at all
    Unreachable,
}

/// Probe a credential against all three roles.
///
/// Idempotent and side-effect-free: the client's installed admin lane
/// is never touched, and the same key always yields the same outcome
/// for the same backend state. A transport or parse failure at one step
/// means "this role does not match" and probing continues; the outcome
/// is [`ProbeOutcome::Unreachable`] only when every step failed to get
/// an answer.
pub async fn probe(client: &ApiClient, credential: &str) -> ProbeOutcome {
    if credential.is_empty() {
        return ProbeOutcome::NoMatch;
    }

    let mut answered = false;

    // Admin: a privileged read succeeding under the candidate key is
    // proof in itself; admins have no entity record.
    match client
        .get_as_admin_candidate::<BrandRecord>(BRAND_LIST_PATH, credential)
        .await
    {
        Ok(_) => {
            info!("credential resolved as admin");
            return ProbeOutcome::Matched(RoleBinding::admin(credential));
        }
        Err(e) => {
            if !e.is_transport() {
                answered = true;
            }
            debug!(error = %e, "admin check did not match");
        }
    }

    // Brand: tenant-lane read plus ownership-equality.
    match client
        .get::<BrandRecord>(BRAND_LIST_PATH, Some(credential))
        .await
    {
        Ok(payload) => {
            answered = true;
            if let Some(record) = payload.first() {
                if record.api_key == credential {
                    info!(brand = %record.brand_name, "credential resolved as brand");
                    return ProbeOutcome::Matched(RoleBinding::brand(
                        credential,
                        record.brand_name.as_str(),
                        record.id,
                    ));
                }
            }
            debug!("brand listing answered but record ownership did not match");
        }
        Err(e) => {
            if !e.is_transport() {
                answered = true;
            }
            debug!(error = %e, "brand check did not match");
        }
    }

    // Supplier: same procedure against the supplier listing.
    match client
        .get::<SupplierRecord>(SUPPLIER_LIST_PATH, Some(credential))
        .await
    {
        Ok(payload) => {
            answered = true;
            if let Some(record) = payload.first() {
                if record.api_key == credential {
                    info!(supplier = %record.supplier_name, "credential resolved as supplier");
                    return ProbeOutcome::Matched(RoleBinding::supplier(
                        credential,
                        record.supplier_name.as_str(),
                        record.id,
                    ));
                }
            }
            debug!("supplier listing answered but record ownership did not match");
        }
        Err(e) => {
            if !e.is_transport() {
                answered = true;
            }
            debug!(error = %e, "supplier check did not match");
        }
    }

    if answered {
        ProbeOutcome::NoMatch
    } else {
        ProbeOutcome::Unreachable
    }
}
