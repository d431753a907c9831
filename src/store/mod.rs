// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Access to the remote tour collection.
//!
//! [`TourStore`] is the seam between the UI and persistence: `HttpTourStore`
//! speaks the hosted datastore's REST dialect, `MemoryTourStore` backs demo
//! mode and tests with the same query semantics.

pub mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::model::{IdError, ParseTourTypeError, Tour, TourFields, TourId};
use crate::query::TourQuery;

pub use http::HttpTourStore;
pub use memory::MemoryTourStore;

/// One page of list results plus the total row count behind the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TourPage {
    pub rows: Vec<Tour>,
    pub total: usize,
}

#[async_trait]
pub trait TourStore: Send + Sync {
    async fn list(&self, query: &TourQuery) -> Result<TourPage, StoreError>;

    async fn fetch(&self, id: &TourId) -> Result<Tour, StoreError>;

    /// True when another row already uses the slug. `exclude` skips the row
    /// being edited so saving a record against itself passes.
    async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<&TourId>,
    ) -> Result<bool, StoreError>;

    async fn insert(&self, fields: &TourFields) -> Result<Tour, StoreError>;

    async fn update(&self, id: &TourId, fields: &TourFields) -> Result<Tour, StoreError>;

    /// Idempotent: deleting an id that no longer exists is not an error.
    async fn delete(&self, id: &TourId) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Transport {
        source: reqwest::Error,
    },
    /// The datastore's access policy rejected the operation (code 42501 or an
    /// HTTP 401/403).
    PermissionDenied {
        message: String,
    },
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },
    BadContentRange {
        value: String,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    InvalidTourType {
        value: String,
        source: Box<ParseTourTypeError>,
    },
    MissingRow {
        id: TourId,
    },
    NoRows {
        context: &'static str,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { source } => write!(f, "datastore request failed: {source}"),
            Self::PermissionDenied { message } => {
                write!(f, "permission denied by the datastore: {message}")
            }
            Self::Api {
                status,
                code,
                message,
            } => match code {
                Some(code) => {
                    write!(f, "datastore returned status {status} (code {code}): {message}")
                }
                None => write!(f, "datastore returned status {status}: {message}"),
            },
            Self::Decode { context, source } => write!(f, "cannot decode {context}: {source}"),
            Self::BadContentRange { value } => {
                write!(f, "cannot parse Content-Range header: {value:?}")
            }
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidTourType { value, source } => {
                write!(f, "invalid tour type {value:?}: {source}")
            }
            Self::MissingRow { id } => write!(f, "tour {id} not found"),
            Self::NoRows { context } => {
                write!(f, "datastore returned no rows for {context}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport { source } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidTourType { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl StoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
