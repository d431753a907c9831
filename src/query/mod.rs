// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Catalog query model.
//!
//! One [`TourQuery`] describes a list-view request: search text, sort column,
//! direction, page. Both stores interpret it through the helpers here, so the
//! in-memory semantics and the remote filter translation stay in agreement.

use std::cmp::Ordering;

use crate::model::Tour;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Columns the list view can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Title,
    Slug,
    Destination,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::CreatedAt,
        SortKey::Title,
        SortKey::Slug,
        SortKey::Destination,
    ];

    /// Wire column name used in `order=` expressions.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Destination => "destination",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreatedAt => "Created",
            Self::Title => "Title",
            Self::Slug => "Slug",
            Self::Destination => "Destination",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Self::CreatedAt => Self::Title,
            Self::Title => Self::Slug,
            Self::Slug => Self::Destination,
            Self::Destination => Self::CreatedAt,
        }
    }

    /// Natural direction when the column is first selected.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            Self::CreatedAt => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Wire suffix in `order=` expressions.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// One list-view request against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourQuery {
    search: String,
    sort: SortKey,
    direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for TourQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::CreatedAt,
            direction: SortDirection::Descending,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TourQuery {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Sets the search text and rewinds to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Advances to the next sort column, resetting the direction to that
    /// column's natural one and rewinding to the first page.
    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.cycle();
        self.direction = self.sort.default_direction();
        self.page = 0;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggle();
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.page * self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Last page index for a total row count, never below zero.
    pub fn last_page(&self, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            (total - 1) / self.page_size
        }
    }

    /// True when the trimmed search text is non-empty.
    pub fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

/// Case-insensitive substring match over the fixed text-field set (title,
/// slug, destination).
pub fn matches_search(tour: &Tour, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        tour.fields().title(),
        tour.fields().slug(),
        tour.fields().destination(),
    ]
    .iter()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Row ordering for a sort column, ties broken by id so paging is stable.
pub fn compare(a: &Tour, b: &Tour, sort: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match sort {
        SortKey::CreatedAt => a.created_at().unwrap_or("").cmp(b.created_at().unwrap_or("")),
        SortKey::Title => a.fields().title().cmp(b.fields().title()),
        SortKey::Slug => a.fields().slug().cmp(b.fields().slug()),
        SortKey::Destination => a.fields().destination().cmp(b.fields().destination()),
    };

    let ordering = match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    ordering.then_with(|| a.id().cmp(b.id()))
}
