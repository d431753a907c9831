// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Tours are rows of one remote collection: scalar columns plus six
//! independently edited JSON documents.

pub mod document;
pub(crate) mod fixtures;
pub mod ids;
pub mod tour;

pub use document::Document;
pub use ids::{Id, IdError, TourId};
pub use tour::{
    JsonField, ParseTourTypeError, Tour, TourFields, TourType, ValidationError,
};
