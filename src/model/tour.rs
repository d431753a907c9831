// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::ids::TourId;

/// Tour-type enumeration as stored in the `tour_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourType {
    Group,
    Private,
    SelfGuided,
    Custom,
}

impl TourType {
    pub const ALL: [TourType; 4] = [
        TourType::Group,
        TourType::Private,
        TourType::SelfGuided,
        TourType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Private => "private",
            Self::SelfGuided => "self_guided",
            Self::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Private => "Private",
            Self::SelfGuided => "Self-guided",
            Self::Custom => "Custom",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Self::Group => Self::Private,
            Self::Private => Self::SelfGuided,
            Self::SelfGuided => Self::Custom,
            Self::Custom => Self::Group,
        }
    }
}

impl fmt::Display for TourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTourTypeError {
    value: String,
}

impl fmt::Display for ParseTourTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tour type {:?}", self.value)
    }
}

impl std::error::Error for ParseTourTypeError {}

impl FromStr for TourType {
    type Err = ParseTourTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(Self::Group),
            "private" => Ok(Self::Private),
            "self_guided" => Ok(Self::SelfGuided),
            "custom" => Ok(Self::Custom),
            other => Err(ParseTourTypeError {
                value: other.to_owned(),
            }),
        }
    }
}

/// The six JSON document columns of a tour row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonField {
    Content,
    Logistics,
    Itinerary,
    Provisions,
    Requirements,
    Pricing,
}

impl JsonField {
    pub const ALL: [JsonField; 6] = [
        JsonField::Content,
        JsonField::Logistics,
        JsonField::Itinerary,
        JsonField::Provisions,
        JsonField::Requirements,
        JsonField::Pricing,
    ];

    /// Wire column name in the remote collection.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Logistics => "logistics",
            Self::Itinerary => "itinerary",
            Self::Provisions => "provisions",
            Self::Requirements => "requirements",
            Self::Pricing => "pricing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Content => "Content",
            Self::Logistics => "Logistics",
            Self::Itinerary => "Itinerary",
            Self::Provisions => "Provisions",
            Self::Requirements => "Requirements",
            Self::Pricing => "Pricing",
        }
    }

    /// Starting value for a fresh draft. The itinerary is array-shaped by
    /// convention; the other documents are objects.
    pub fn default_document(&self) -> Document {
        match self {
            Self::Itinerary => Document::empty_list(),
            _ => Document::empty_map(),
        }
    }
}

/// The editable payload of a tour row: everything except the id and the
/// server-assigned creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TourFields {
    title: String,
    slug: String,
    tour_type: TourType,
    destination: String,
    promo_url: Option<String>,
    content: Document,
    logistics: Document,
    itinerary: Document,
    provisions: Document,
    requirements: Document,
    pricing: Document,
}

impl Default for TourFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            tour_type: TourType::Group,
            destination: String::new(),
            promo_url: None,
            content: JsonField::Content.default_document(),
            logistics: JsonField::Logistics.default_document(),
            itinerary: JsonField::Itinerary.default_document(),
            provisions: JsonField::Provisions.default_document(),
            requirements: JsonField::Requirements.default_document(),
            pricing: JsonField::Pricing.default_document(),
        }
    }
}

impl TourFields {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn tour_type(&self) -> TourType {
        self.tour_type
    }

    pub fn set_tour_type(&mut self, tour_type: TourType) {
        self.tour_type = tour_type;
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    pub fn promo_url(&self) -> Option<&str> {
        self.promo_url.as_deref()
    }

    pub fn set_promo_url<T: Into<String>>(&mut self, promo_url: Option<T>) {
        self.promo_url = promo_url.map(Into::into);
    }

    pub fn document(&self, field: JsonField) -> &Document {
        match field {
            JsonField::Content => &self.content,
            JsonField::Logistics => &self.logistics,
            JsonField::Itinerary => &self.itinerary,
            JsonField::Provisions => &self.provisions,
            JsonField::Requirements => &self.requirements,
            JsonField::Pricing => &self.pricing,
        }
    }

    pub fn set_document(&mut self, field: JsonField, document: Document) {
        match field {
            JsonField::Content => self.content = document,
            JsonField::Logistics => self.logistics = document,
            JsonField::Itinerary => self.itinerary = document,
            JsonField::Provisions => self.provisions = document,
            JsonField::Requirements => self.requirements = document,
            JsonField::Pricing => self.pricing = document,
        }
    }

    /// Required-field checks performed before any save is dispatched.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.slug.trim().is_empty() {
            return Err(ValidationError::SlugRequired);
        }
        Ok(())
    }

    /// Payload for a duplicate row: same documents, marked title, fresh slug.
    pub fn duplicated(&self, unix_millis: u64) -> Self {
        let mut copy = self.clone();
        copy.title = format!("{} (copy)", self.title);
        copy.slug = format!("{}-copy-{unix_millis}", self.slug);
        copy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    SlugRequired,
    SlugTaken,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleRequired => f.write_str("title is required"),
            Self::SlugRequired => f.write_str("slug is required"),
            Self::SlugTaken => f.write_str("slug is already in use"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// One row of the remote `tours` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    id: TourId,
    created_at: Option<String>,
    fields: TourFields,
}

impl Tour {
    pub fn new(id: TourId, fields: TourFields) -> Self {
        Self {
            id,
            created_at: None,
            fields,
        }
    }

    pub fn id(&self) -> &TourId {
        &self.id
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn set_created_at<T: Into<String>>(&mut self, created_at: Option<T>) {
        self.created_at = created_at.map(Into::into);
    }

    pub fn fields(&self) -> &TourFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut TourFields {
        &mut self.fields
    }

    pub fn into_fields(self) -> TourFields {
        self.fields
    }
}
