// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Document, JsonField, Tour, TourFields, TourId, TourType};
use crate::query::TourQuery;

use super::{StoreError, TourPage, TourStore};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a hosted PostgREST-style datastore.
///
/// `base_url` points at the REST root (e.g. `https://x.supabase.co/rest/v1`);
/// the collection name is fixed. Every request carries the service key both as
/// `apikey` and as a bearer token.
pub struct HttpTourStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

const COLLECTION: &str = "tours";

impl HttpTourStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, COLLECTION)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn read_rows(
        response: reqwest::Response,
        context: &'static str,
    ) -> Result<Vec<Tour>, StoreError> {
        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Transport { source })?;
        let rows: Vec<TourRow> = serde_json::from_str(&body)
            .map_err(|source| StoreError::Decode { context, source })?;
        rows.into_iter().map(tour_from_row).collect()
    }
}

#[async_trait]
impl TourStore for HttpTourStore {
    async fn list(&self, query: &TourQuery) -> Result<TourPage, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &self.collection_url())
            .query(&list_params(query))
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let total = match response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
        {
            Some(raw) => parse_content_range(raw).ok_or_else(|| StoreError::BadContentRange {
                value: raw.to_owned(),
            })?,
            None => {
                return Err(StoreError::BadContentRange {
                    value: "<missing>".to_owned(),
                })
            }
        };

        let rows = Self::read_rows(response, "tour rows").await?;
        Ok(TourPage { rows, total })
    }

    async fn fetch(&self, id: &TourId) -> Result<Tour, StoreError> {
        let response = self
            .request(reqwest::Method::GET, &self.collection_url())
            .query(&[
                ("select", "*".to_owned()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_owned()),
            ])
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Self::read_rows(response, "tour row")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::MissingRow { id: id.clone() })
    }

    async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<&TourId>,
    ) -> Result<bool, StoreError> {
        let mut params = vec![
            ("select", "id".to_owned()),
            ("slug", format!("eq.{slug}")),
            ("limit", "1".to_owned()),
        ];
        if let Some(id) = exclude {
            params.push(("id", format!("neq.{id}")));
        }

        let response = self
            .request(reqwest::Method::GET, &self.collection_url())
            .query(&params)
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Transport { source })?;
        let rows: Vec<IdOnlyRow> = serde_json::from_str(&body).map_err(|source| {
            StoreError::Decode {
                context: "slug probe",
                source,
            }
        })?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, fields: &TourFields) -> Result<Tour, StoreError> {
        let response = self
            .request(reqwest::Method::POST, &self.collection_url())
            .header("Prefer", "return=representation")
            .json(&input_row(fields))
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Self::read_rows(response, "inserted row")
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NoRows {
                context: "insert",
            })
    }

    async fn update(&self, id: &TourId, fields: &TourFields) -> Result<Tour, StoreError> {
        let response = self
            .request(reqwest::Method::PATCH, &self.collection_url())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&input_row(fields))
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Self::read_rows(response, "updated row")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::MissingRow { id: id.clone() })
    }

    async fn delete(&self, id: &TourId) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, &self.collection_url())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|source| StoreError::Transport { source })?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

/// Query parameters for a list request. Kept separate from the client so the
/// translation can be asserted against the in-memory semantics.
pub(crate) fn list_params(query: &TourQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_owned()),
        (
            "order",
            format!(
                "{}.{}",
                query.sort().column(),
                query.direction().suffix()
            ),
        ),
        ("offset", query.offset().to_string()),
        ("limit", query.page_size().to_string()),
    ];

    if query.has_search() {
        params.push(("or", search_filter(query.search())));
    }

    params
}

/// `or=` disjunction over the fixed text-field set. The reserved `,`/`(`/`)`
/// characters act as separators in the filter grammar, so they are blanked out
/// of the needle instead of quoted.
pub(crate) fn search_filter(search: &str) -> String {
    let needle: String = search
        .trim()
        .chars()
        .map(|c| if matches!(c, ',' | '(' | ')') { ' ' } else { c })
        .collect();
    let pattern = format!("*{needle}*");
    format!("(title.ilike.{pattern},slug.ilike.{pattern},destination.ilike.{pattern})")
}

/// Total row count from a `Content-Range` header such as `0-9/57` or `*/0`.
pub(crate) fn parse_content_range(value: &str) -> Option<usize> {
    let (_, total) = value.split_once('/')?;
    total.trim().parse().ok()
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a failed response to the error taxonomy. Permission failures are
/// recognized by the datastore's `42501` code as well as by plain HTTP
/// 401/403.
pub(crate) fn classify_error(status: u16, body: &str) -> StoreError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code.clone());
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_owned());

    if status == 401 || status == 403 || code.as_deref() == Some("42501") {
        StoreError::PermissionDenied { message }
    } else {
        StoreError::Api {
            status,
            code,
            message,
        }
    }
}

async fn error_from_response(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    classify_error(status, &body)
}

#[derive(Debug, Deserialize)]
struct IdOnlyRow {
    #[allow(dead_code)]
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TourRow {
    id: String,
    #[serde(default)]
    created_at: Option<String>,
    title: String,
    slug: String,
    tour_type: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    promo_url: Option<String>,
    #[serde(default)]
    content: Document,
    #[serde(default)]
    logistics: Document,
    #[serde(default)]
    itinerary: Document,
    #[serde(default)]
    provisions: Document,
    #[serde(default)]
    requirements: Document,
    #[serde(default)]
    pricing: Document,
}

fn tour_from_row(row: TourRow) -> Result<Tour, StoreError> {
    let id = TourId::new(row.id.clone()).map_err(|source| StoreError::InvalidId {
        field: "id",
        value: row.id,
        source: Box::new(source),
    })?;
    let tour_type =
        row.tour_type
            .parse::<TourType>()
            .map_err(|source| StoreError::InvalidTourType {
                value: row.tour_type.clone(),
                source: Box::new(source),
            })?;

    let mut fields = TourFields::default();
    fields.set_title(row.title);
    fields.set_slug(row.slug);
    fields.set_tour_type(tour_type);
    fields.set_destination(row.destination);
    fields.set_promo_url(row.promo_url);
    fields.set_document(JsonField::Content, row.content);
    fields.set_document(JsonField::Logistics, row.logistics);
    fields.set_document(JsonField::Itinerary, row.itinerary);
    fields.set_document(JsonField::Provisions, row.provisions);
    fields.set_document(JsonField::Requirements, row.requirements);
    fields.set_document(JsonField::Pricing, row.pricing);

    let mut tour = Tour::new(id, fields);
    tour.set_created_at(row.created_at);
    Ok(tour)
}

#[derive(Debug, Serialize)]
struct TourInputRow<'a> {
    title: &'a str,
    slug: &'a str,
    tour_type: &'a str,
    destination: &'a str,
    promo_url: Option<&'a str>,
    content: &'a Document,
    logistics: &'a Document,
    itinerary: &'a Document,
    provisions: &'a Document,
    requirements: &'a Document,
    pricing: &'a Document,
}

fn input_row(fields: &TourFields) -> TourInputRow<'_> {
    TourInputRow {
        title: fields.title(),
        slug: fields.slug(),
        tour_type: fields.tour_type().as_str(),
        destination: fields.destination(),
        promo_url: fields.promo_url(),
        content: fields.document(JsonField::Content),
        logistics: fields.document(JsonField::Logistics),
        itinerary: fields.document(JsonField::Itinerary),
        provisions: fields.document(JsonField::Provisions),
        requirements: fields.document(JsonField::Requirements),
        pricing: fields.document(JsonField::Pricing),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        classify_error, list_params, parse_content_range, search_filter, tour_from_row, TourRow,
    };
    use crate::model::Document;
    use crate::query::TourQuery;
    use crate::store::StoreError;

    fn row(id: &str, tour_type: &str) -> TourRow {
        TourRow {
            id: id.to_owned(),
            created_at: Some("2026-01-01T00:00:00Z".to_owned()),
            title: "Fjord Week".to_owned(),
            slug: "fjord-week".to_owned(),
            tour_type: tour_type.to_owned(),
            destination: "Norway".to_owned(),
            promo_url: None,
            content: Document::empty_map(),
            logistics: Document::empty_map(),
            itinerary: Document::empty_list(),
            provisions: Document::empty_map(),
            requirements: Document::empty_map(),
            pricing: Document::empty_map(),
        }
    }

    #[test]
    fn list_params_cover_order_and_paging() {
        let mut query = TourQuery::with_page_size(25);
        query.set_page(2);

        let params = list_params(&query);

        assert!(params.contains(&("order", "created_at.desc".to_owned())));
        assert!(params.contains(&("offset", "50".to_owned())));
        assert!(params.contains(&("limit", "25".to_owned())));
        assert!(!params.iter().any(|(name, _)| *name == "or"));
    }

    #[test]
    fn list_params_add_search_disjunction() {
        let mut query = TourQuery::default();
        query.set_search("fjord");

        let params = list_params(&query);
        let or = params
            .iter()
            .find(|(name, _)| *name == "or")
            .map(|(_, value)| value.as_str())
            .expect("or param");

        assert_eq!(
            or,
            "(title.ilike.*fjord*,slug.ilike.*fjord*,destination.ilike.*fjord*)"
        );
    }

    #[test]
    fn search_filter_blanks_reserved_characters() {
        assert_eq!(
            search_filter("a,(b)"),
            "(title.ilike.*a  b *,slug.ilike.*a  b *,destination.ilike.*a  b *)"
        );
    }

    #[rstest]
    #[case("0-9/57", Some(57))]
    #[case("*/0", Some(0))]
    #[case("0-0/1", Some(1))]
    #[case("garbage", None)]
    #[case("0-9/many", None)]
    fn content_range_totals(#[case] raw: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_content_range(raw), expected);
    }

    #[test]
    fn classify_error_maps_42501_to_permission_denied() {
        let err = classify_error(
            400,
            r#"{"code":"42501","message":"permission denied for table tours"}"#,
        );
        assert!(matches!(err, StoreError::PermissionDenied { .. }));
        assert!(err.to_string().contains("permission denied"));
    }

    #[rstest]
    #[case(401)]
    #[case(403)]
    fn classify_error_maps_auth_statuses(#[case] status: u16) {
        let err = classify_error(status, "JWT expired");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn classify_error_keeps_other_codes_generic() {
        let err = classify_error(
            409,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        match err {
            StoreError::Api { status, code, .. } => {
                assert_eq!(status, 409);
                assert_eq!(code.as_deref(), Some("23505"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tour_from_row_validates_id_and_type() {
        let tour = tour_from_row(row("t:1", "group")).expect("valid row");
        assert_eq!(tour.id().as_str(), "t:1");

        let err = tour_from_row(row("", "group")).expect_err("empty id");
        assert!(matches!(err, StoreError::InvalidId { field: "id", .. }));

        let err = tour_from_row(row("t:1", "expedition")).expect_err("unknown type");
        assert!(matches!(err, StoreError::InvalidTourType { .. }));
    }
}
