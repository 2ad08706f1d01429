//! Session and role types
//!
//! A login session may hold up to one binding per role. Roles are not
//! mutually exclusive: a user can be a brand and a supplier at the same
//! time, each proven by a different key.

use serde::{Deserialize, Serialize};

/// Access role a credential may grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Brand,
    Supplier,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Brand => write!(f, "brand"),
            Role::Supplier => write!(f, "supplier"),
        }
    }
}

/// A role paired with the credential and identity that proved it
///
/// Created by the role prober, immutable afterwards. `entity_id` is the
/// backend identity of the owning brand/supplier; admins have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role: Role,
    pub credential: String,
    pub display_name: String,
    pub entity_id: Option<i64>,
}

impl RoleBinding {
    pub fn admin(credential: impl Into<String>) -> Self {
        Self {
            role: Role::Admin,
            credential: credential.into(),
            display_name: "Administrator".to_string(),
            entity_id: None,
        }
    }

    pub fn brand(credential: impl Into<String>, display_name: impl Into<String>, entity_id: i64) -> Self {
        Self {
            role: Role::Brand,
            credential: credential.into(),
            display_name: display_name.into(),
            entity_id: Some(entity_id),
        }
    }

    pub fn supplier(credential: impl Into<String>, display_name: impl Into<String>, entity_id: i64) -> Self {
        Self {
            role: Role::Supplier,
            credential: credential.into(),
            display_name: display_name.into(),
            entity_id: Some(entity_id),
        }
    }
}

/// Aggregate of all roles authenticated in one login
///
/// Mutable only while the login orchestrator is assembling it; consumers
/// treat it as read-only. An empty context is never installed as the
/// active session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    admin: Option<RoleBinding>,
    brand: Option<RoleBinding>,
    supplier: Option<RoleBinding>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, replacing any prior binding for the same role.
    pub fn bind(&mut self, binding: RoleBinding) {
        match binding.role {
            Role::Admin => self.admin = Some(binding),
            Role::Brand => self.brand = Some(binding),
            Role::Supplier => self.supplier = Some(binding),
        }
    }

    pub fn binding(&self, role: Role) -> Option<&RoleBinding> {
        match role {
            Role::Admin => self.admin.as_ref(),
            Role::Brand => self.brand.as_ref(),
            Role::Supplier => self.supplier.as_ref(),
        }
    }

    pub fn admin(&self) -> Option<&RoleBinding> {
        self.admin.as_ref()
    }

    pub fn brand(&self) -> Option<&RoleBinding> {
        self.brand.as_ref()
    }

    pub fn supplier(&self) -> Option<&RoleBinding> {
        self.supplier.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }

    pub fn is_brand(&self) -> bool {
        self.brand.is_some()
    }

    pub fn is_supplier(&self) -> bool {
        self.supplier.is_some()
    }

    /// Informational only, never used for authorization branching.
    pub fn has_multiple_roles(&self) -> bool {
        self.role_count() >= 2
    }

    pub fn is_empty(&self) -> bool {
        self.role_count() == 0
    }

    fn role_count(&self) -> usize {
        [self.admin.is_some(), self.brand.is_some(), self.supplier.is_some()]
            .iter()
            .filter(|present| **present)
            .count()
    }

    /// All bindings in fixed role order (admin, brand, supplier).
    pub fn bindings(&self) -> impl Iterator<Item = &RoleBinding> {
        [self.admin.as_ref(), self.brand.as_ref(), self.supplier.as_ref()]
            .into_iter()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_no_roles() {
        let ctx = SessionContext::new();
        assert!(ctx.is_empty());
        assert!(!ctx.is_admin());
        assert!(!ctx.is_brand());
        assert!(!ctx.is_supplier());
        assert!(!ctx.has_multiple_roles());
    }

    #[test]
    fn bind_sets_role_flags() {
        let mut ctx = SessionContext::new();
        ctx.bind(RoleBinding::brand("brandkey123", "Acme", 7));
        assert!(ctx.is_brand());
        assert!(!ctx.is_admin());
        assert!(!ctx.has_multiple_roles());
        assert_eq!(ctx.brand().unwrap().entity_id, Some(7));
        assert_eq!(ctx.brand().unwrap().display_name, "Acme");
    }

    #[test]
    fn two_roles_mark_multiple() {
        let mut ctx = SessionContext::new();
        ctx.bind(RoleBinding::brand("bk", "Acme", 7));
        ctx.bind(RoleBinding::supplier("sk", "Mills", 12));
        assert!(ctx.is_brand());
        assert!(ctx.is_supplier());
        assert!(!ctx.is_admin());
        assert!(ctx.has_multiple_roles());
    }

    #[test]
    fn rebind_replaces_prior_binding() {
        let mut ctx = SessionContext::new();
        ctx.bind(RoleBinding::brand("old", "Old Brand", 1));
        ctx.bind(RoleBinding::brand("new", "New Brand", 2));
        let brand = ctx.brand().unwrap();
        assert_eq!(brand.credential, "new");
        assert_eq!(brand.entity_id, Some(2));
        assert!(!ctx.has_multiple_roles());
    }

    #[test]
    fn admin_binding_has_no_entity() {
        let binding = RoleBinding::admin("master");
        assert_eq!(binding.entity_id, None);
        assert_eq!(binding.display_name, "Administrator");
    }

    #[test]
    fn bindings_iterate_in_role_order() {
        let mut ctx = SessionContext::new();
        ctx.bind(RoleBinding::supplier("sk", "Mills", 12));
        ctx.bind(RoleBinding::admin("ak"));
        let roles: Vec<Role> = ctx.bindings().map(|b| b.role).collect();
        assert_eq!(roles, vec![Role::Admin, Role::Supplier]);
    }
}
