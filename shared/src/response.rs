//! Platform API response envelope
//!
//! Every endpoint answers with a JSON object carrying either a `data`
//! field (array or lone object) or an `error` string. The shape is
//! resolved once here, at the transport boundary, so callers work with
//! a typed payload instead of sniffing JSON on every check.

use serde::Deserialize;

/// Response envelope: `{ "data": ... }` on success, `{ "error": "..." }` on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<Payload<T>>,
    pub error: Option<String>,
}

/// The `data` field is either an array of records or a lone record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Payload<T> {
    /// First array element, or the lone object. `None` for an empty array.
    pub fn first(&self) -> Option<&T> {
        match self {
            Payload::Many(items) => items.first(),
            Payload::One(item) => Some(item),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Payload::Many(items) => items,
            Payload::One(item) => vec![item],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Many(items) => items.len(),
            Payload::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> ApiEnvelope<T> {
    /// First record of the payload, if the envelope carried data at all.
    pub fn first(&self) -> Option<&T> {
        self.data.as_ref().and_then(Payload::first)
    }
}
