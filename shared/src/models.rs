//! Tenant entity records
//!
//! Records returned by the brand/supplier listing endpoints. Each record
//! embeds its own `api_key`; the prober compares that field against the
//! presented credential to prove ownership, because the listing endpoints
//! answer successfully for any valid tenant key.

use serde::{Deserialize, Serialize};

/// Brand record as returned by the brand listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: i64,
    pub brand_name: String,
    pub api_key: String,
}

/// Supplier record as returned by the supplier listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: i64,
    pub supplier_name: String,
    pub api_key: String,
}
