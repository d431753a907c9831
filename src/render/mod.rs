// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Presentation of structured documents.
//!
//! The tree renderer flattens a document into labeled rows the TUI can draw
//! with its own styling; it carries no terminal concerns itself.

pub mod tree;

pub use tree::{humanize_key, render_tree, TreeRow, TreeValue};
