use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::utils::price::parse_unit_price;

pub const FIELD_PRICE: &str = "price";
pub const FIELD_MAX_PARTICIPANTS: &str = "maxParticipants";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_KIND: &str = "kind";
pub const FIELD_PHOTOS: &str = "photos";
pub const FIELD_HOST_ID: &str = "hostId";
pub const FIELD_PUBLISHED: &str = "published";

#[derive(Debug, Error)]
pub enum ListingKindError {
    #[error("Invalid listing kind: {0}")]
    InvalidKind(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Home,
    Experience,
    Service,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self {
            ListingKind::Home => "home",
            ListingKind::Experience => "experience",
            ListingKind::Service => "service",
        };
        write!(f, "{kind_str}")
    }
}

impl FromStr for ListingKind {
    type Err = ListingKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(ListingKind::Home),
            "experience" => Ok(ListingKind::Experience),
            "service" => Ok(ListingKind::Service),
            other => Err(ListingKindError::InvalidKind(other.to_string())),
        }
    }
}

/// A listing document as stored by the document store. Only the fields with
/// accessors below are interpreted; everything else is carried through
/// untouched on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Listing {
    pub fn from_document(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.fields
    }

    pub fn unit_price(&self) -> f64 {
        self.fields
            .get(FIELD_PRICE)
            .map(parse_unit_price)
            .unwrap_or(0.0)
    }

    /// The listing's own participant cap, or `default` when it has none.
    pub fn max_participants(&self, default: u32) -> u32 {
        self.fields
            .get(FIELD_MAX_PARTICIPANTS)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            })
            .filter(|max| *max >= 1)
            .map(|max| max.min(u32::MAX as u64) as u32)
            .unwrap_or(default)
    }

    pub fn title(&self) -> &str {
        self.fields
            .get(FIELD_TITLE)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ListingKind> {
        self.fields
            .get(FIELD_KIND)
            .and_then(Value::as_str)
            .and_then(|s| s.to_lowercase().parse().ok())
    }

    pub fn host_id(&self) -> Option<&str> {
        self.fields.get(FIELD_HOST_ID).and_then(Value::as_str)
    }

    pub fn published(&self) -> bool {
        self.fields
            .get(FIELD_PUBLISHED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_published(&mut self, published: bool) {
        self.fields
            .insert(FIELD_PUBLISHED.to_string(), Value::Bool(published));
    }

    pub fn photos(&self) -> Vec<String> {
        self.fields
            .get(FIELD_PHOTOS)
            .and_then(Value::as_array)
            .map(|photos| {
                photos
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_photos(&mut self, photos: Vec<String>) {
        let values = photos.into_iter().map(Value::String).collect();
        self.fields
            .insert(FIELD_PHOTOS.to_string(), Value::Array(values));
    }
}
