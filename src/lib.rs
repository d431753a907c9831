// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Caravel — terminal admin console for tour catalogs.
//!
//! A paged catalog browser and a tabbed tour editor over a PostgREST-style
//! datastore, with AI-assisted editing of the per-tour JSON documents.

pub mod ai;
pub mod config;
pub mod editor;
pub mod model;
pub mod query;
pub mod remote;
pub mod render;
pub mod store;
pub mod tui;
pub mod ui;
