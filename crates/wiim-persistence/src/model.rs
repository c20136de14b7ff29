//! Request and query types for the persistence layer
//!
//! Create requests are typed per entity and validated with `validator`
//! before they reach the query service. Every field has a serde default so
//! that an absent field surfaces as a validation error naming it, rather
//! than as a deserialization failure.

use sea_orm::{NotSet, Set, Value};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{process, record, server, site, tag, zone};

/// Quality stored on records that do not report one
pub const DEFAULT_QUALITY: &str = "Unknown";

// ============================================================================
// List options
// ============================================================================

/// Sort direction on an entity's order column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse an optional `order` parameter, treating unknown tokens as absent
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        param.and_then(|v| v.parse().ok())
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// Exact-match column filters, combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<(String, Value)>);

impl Filters {
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((column.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.0.iter()
    }
}

/// Pagination, cursor, ordering and filtering applied to every list query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Maximum rows to return; zero means the configured ceiling
    pub limit: u64,
    /// When positive, only ids strictly greater than this are returned
    pub since_id: i32,
    /// `None` leaves the result order to the database
    pub order: Option<SortOrder>,
    pub filters: Filters,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn since(mut self, since_id: i32) -> Self {
        self.since_id = since_id;
        self
    }

    pub fn order(mut self, order: Option<SortOrder>) -> Self {
        self.order = order;
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters = self.filters.eq(column, value);
        self
    }
}

/// Clamp a requested page size to the ceiling; zero selects the ceiling
#[inline]
pub fn effective_limit(requested: u64, ceiling: u64) -> u64 {
    if requested == 0 || requested > ceiling {
        ceiling
    } else {
        requested
    }
}

// ============================================================================
// Create requests
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewSite {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 120))]
    pub comment: String,
}

impl From<NewSite> for site::ActiveModel {
    fn from(req: NewSite) -> Self {
        site::ActiveModel {
            id: NotSet,
            name: Set(req.name),
            comment: Set(req.comment),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewZone {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 120))]
    pub comment: String,
    #[validate(range(min = 1))]
    pub site_id: i32,
}

impl From<NewZone> for zone::ActiveModel {
    fn from(req: NewZone) -> Self {
        zone::ActiveModel {
            id: NotSet,
            name: Set(req.name),
            comment: Set(req.comment),
            site_id: Set(req.site_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewProcess {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(max = 120))]
    pub comment: Option<String>,
    #[validate(range(min = 1))]
    pub zone_id: i32,
}

impl From<NewProcess> for process::ActiveModel {
    fn from(req: NewProcess) -> Self {
        process::ActiveModel {
            id: NotSet,
            name: Set(req.name),
            comment: Set(req.comment),
            zone_id: Set(req.zone_id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewServer {
    #[validate(length(min = 1, max = 64))]
    pub uid: String,
}

impl From<NewServer> for server::ActiveModel {
    fn from(req: NewServer) -> Self {
        server::ActiveModel {
            id: NotSet,
            uid: Set(req.uid),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewTag {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub alias: String,
    #[validate(length(max = 120))]
    pub comment: Option<String>,
    #[validate(length(max = 64))]
    pub unit: Option<String>,
    #[validate(length(max = 255))]
    pub icon: Option<String>,
    #[validate(range(min = 1))]
    pub server_id: i32,
    /// Processes the new tag joins; at least one is required
    #[validate(length(min = 1))]
    pub processes: Vec<i32>,
}

impl NewTag {
    /// Split the join targets from the tag row itself
    pub(crate) fn into_parts(self) -> (tag::ActiveModel, Vec<i32>) {
        let model = tag::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            alias: Set(self.alias),
            comment: Set(self.comment),
            unit: Set(self.unit),
            icon: Set(self.icon),
            server_id: Set(self.server_id),
        };
        (model, self.processes)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NewRecord {
    #[validate(required)]
    pub time_opc: Option<chrono::NaiveDateTime>,
    #[validate(required, length(max = 120))]
    pub value: Option<String>,
    #[validate(length(max = 64))]
    pub quality: Option<String>,
    #[validate(range(min = 1))]
    pub tag_id: i32,
}

impl NewRecord {
    /// Build the row to insert, stamping the ingestion time
    pub(crate) fn into_active_model(self, time_db: chrono::NaiveDateTime) -> record::ActiveModel {
        record::ActiveModel {
            id: NotSet,
            time_opc: Set(self.time_opc.unwrap_or(time_db)),
            time_db: Set(time_db),
            value: Set(self.value.unwrap_or_default()),
            quality: Set(self
                .quality
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| DEFAULT_QUALITY.to_string())),
            tag_id: Set(self.tag_id),
        }
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// A tag paired with its most recent record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub tag: tag::Model,
    pub record: record::Model,
}
