// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::{Tour, TourFields, TourId};
use crate::query;
use crate::query::TourQuery;

use super::{StoreError, TourPage, TourStore};

/// In-memory catalog with the same filter/order/paging semantics as the
/// remote collection. Backs `--demo` and tests.
pub struct MemoryTourStore {
    inner: Mutex<Inner>,
}

struct Inner {
    rows: BTreeMap<TourId, Tour>,
    insert_seq: u64,
}

impl MemoryTourStore {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<Tour>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rows: rows
                    .into_iter()
                    .map(|tour| (tour.id().clone(), tour))
                    .collect(),
                insert_seq: 0,
            }),
        }
    }

    /// Seeded with the sample catalog.
    pub fn demo() -> Self {
        Self::with_rows(crate::model::fixtures::sample_catalog())
    }
}

impl Default for MemoryTourStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn next_tour(&mut self, fields: TourFields) -> Tour {
        self.insert_seq += 1;
        let id = TourId::new(format!("t:mem-{:04}", self.insert_seq)).expect("generated id");
        let mut tour = Tour::new(id, fields);
        // Microsecond suffix keeps lexical order aligned with insert order.
        tour.set_created_at(Some(format!(
            "2026-06-01T00:00:00.{:06}Z",
            self.insert_seq
        )));
        tour
    }
}

#[async_trait]
impl TourStore for MemoryTourStore {
    async fn list(&self, query: &TourQuery) -> Result<TourPage, StoreError> {
        let inner = self.inner.lock().await;

        let mut rows: Vec<Tour> = inner
            .rows
            .values()
            .filter(|tour| query::matches_search(tour, query.search()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| query::compare(a, b, query.sort(), query.direction()));

        let total = rows.len();
        let rows = rows
            .into_iter()
            .skip(query.offset())
            .take(query.page_size())
            .collect();

        Ok(TourPage { rows, total })
    }

    async fn fetch(&self, id: &TourId) -> Result<Tour, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .rows
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::MissingRow { id: id.clone() })
    }

    async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<&TourId>,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().any(|tour| {
            tour.fields().slug() == slug && Some(tour.id()) != exclude
        }))
    }

    async fn insert(&self, fields: &TourFields) -> Result<Tour, StoreError> {
        let mut inner = self.inner.lock().await;
        let tour = inner.next_tour(fields.clone());
        inner.rows.insert(tour.id().clone(), tour.clone());
        Ok(tour)
    }

    async fn update(&self, id: &TourId, fields: &TourFields) -> Result<Tour, StoreError> {
        let mut inner = self.inner.lock().await;
        let tour = inner
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRow { id: id.clone() })?;
        *tour.fields_mut() = fields.clone();
        Ok(tour.clone())
    }

    async fn delete(&self, id: &TourId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.rows.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTourStore;
    use crate::model::fixtures::sample_catalog;
    use crate::model::{TourFields, TourId};
    use crate::query::TourQuery;
    use crate::store::{StoreError, TourStore};

    fn seeded() -> MemoryTourStore {
        MemoryTourStore::with_rows(sample_catalog())
    }

    fn draft(title: &str, slug: &str) -> TourFields {
        let mut fields = TourFields::default();
        fields.set_title(title);
        fields.set_slug(slug);
        fields
    }

    #[tokio::test]
    async fn list_pages_and_counts_the_full_filter() {
        let store = seeded();
        let mut query = TourQuery::with_page_size(2);

        let page = store.list(&query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].fields().title(), "Patagonia Ice Fields");

        query.set_page(2);
        let page = store.list(&query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].fields().title(), "Fjord Week");
    }

    #[tokio::test]
    async fn list_applies_the_search_filter() {
        let store = seeded();
        let mut query = TourQuery::default();
        query.set_search("norway");

        let page = store.list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].fields().slug(), "fjord-week");
    }

    #[tokio::test]
    async fn fetch_reports_missing_rows() {
        let store = seeded();
        let missing = TourId::new("t:nope").unwrap();

        let err = store.fetch(&missing).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRow { .. }));
    }

    #[tokio::test]
    async fn slug_probe_honors_the_exclusion() {
        let store = seeded();
        let fjord = TourId::new("t:fjord").unwrap();

        assert!(store.slug_exists("fjord-week", None).await.unwrap());
        assert!(!store.slug_exists("fjord-week", Some(&fjord)).await.unwrap());
        assert!(!store.slug_exists("unused-slug", None).await.unwrap());
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = MemoryTourStore::new();

        let first = store.insert(&draft("A", "a")).await.unwrap();
        let second = store.insert(&draft("B", "b")).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert!(first.created_at().unwrap() < second.created_at().unwrap());
    }

    #[tokio::test]
    async fn update_keeps_id_and_timestamp() {
        let store = seeded();
        let fjord = TourId::new("t:fjord").unwrap();
        let before = store.fetch(&fjord).await.unwrap();

        let updated = store
            .update(&fjord, &draft("Fjord Fortnight", "fjord-fortnight"))
            .await
            .unwrap();

        assert_eq!(updated.id(), &fjord);
        assert_eq!(updated.created_at(), before.created_at());
        assert_eq!(updated.fields().title(), "Fjord Fortnight");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = seeded();
        let fjord = TourId::new("t:fjord").unwrap();

        store.delete(&fjord).await.unwrap();
        store.delete(&fjord).await.unwrap();

        assert!(matches!(
            store.fetch(&fjord).await.unwrap_err(),
            StoreError::MissingRow { .. }
        ));
    }
}
