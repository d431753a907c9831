// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::document::Document;
use super::ids::TourId;
use super::tour::{JsonField, Tour, TourFields, TourType};

fn tid(value: &str) -> TourId {
    TourId::new(value).expect("tour id")
}

fn tour(
    id: &str,
    title: &str,
    slug: &str,
    tour_type: TourType,
    destination: &str,
    created_at: &str,
) -> Tour {
    let mut fields = TourFields::default();
    fields.set_title(title);
    fields.set_slug(slug);
    fields.set_tour_type(tour_type);
    fields.set_destination(destination);

    let mut tour = Tour::new(tid(id), fields);
    tour.set_created_at(Some(created_at));
    tour
}

/// Deterministic catalog used by `--demo` and by tests that need a populated
/// store.
pub(crate) fn sample_catalog() -> Vec<Tour> {
    let mut fjord = tour(
        "t:fjord",
        "Fjord Week",
        "fjord-week",
        TourType::Group,
        "Norway",
        "2026-01-12T09:00:00Z",
    );
    fjord.fields_mut().set_promo_url(Some("https://example.com/fjord"));
    fjord.fields_mut().set_document(
        JsonField::Content,
        Document::from([
            ("headline", Document::from("Seven days between Bergen and Flåm")),
            ("family_friendly", Document::from(true)),
        ]),
    );
    fjord.fields_mut().set_document(
        JsonField::Itinerary,
        Document::from(vec![
            Document::from([
                ("day", Document::from(1)),
                ("stop", Document::from("Bergen")),
            ]),
            Document::from([
                ("day", Document::from(2)),
                ("stop", Document::from("Flåm")),
            ]),
        ]),
    );
    fjord.fields_mut().set_document(
        JsonField::Pricing,
        Document::from([
            ("base_price", Document::from(1890)),
            ("currency", Document::from("EUR")),
        ]),
    );

    let mut atlas = tour(
        "t:atlas",
        "Atlas Trek",
        "atlas-trek",
        TourType::Private,
        "Morocco",
        "2026-02-03T14:30:00Z",
    );
    atlas.fields_mut().set_document(
        JsonField::Requirements,
        Document::from([
            ("fitness_level", Document::from("moderate")),
            ("min_age", Document::from(16)),
        ]),
    );
    atlas.fields_mut().set_document(
        JsonField::Provisions,
        Document::from([
            ("meals", Document::from("half board")),
            ("mules", Document::from(true)),
        ]),
    );

    let mut delta = tour(
        "t:delta",
        "Danube Delta Birding",
        "danube-delta-birding",
        TourType::SelfGuided,
        "Romania",
        "2026-02-20T08:15:00Z",
    );
    delta.fields_mut().set_document(
        JsonField::Logistics,
        Document::from([
            ("meeting_point", Document::from("Tulcea harbour")),
            ("boat_transfers", Document::from(3)),
        ]),
    );

    let kyoto = tour(
        "t:kyoto",
        "Kyoto Gardens",
        "kyoto-gardens",
        TourType::Group,
        "Japan",
        "2026-03-08T10:00:00Z",
    );

    let mut patagonia = tour(
        "t:patagonia",
        "Patagonia Ice Fields",
        "patagonia-ice-fields",
        TourType::Custom,
        "Argentina",
        "2026-03-21T16:45:00Z",
    );
    patagonia.fields_mut().set_document(
        JsonField::Pricing,
        Document::from([
            ("base_price", Document::from(3450)),
            ("single_supplement", Document::from(420)),
            ("currency", Document::from("USD")),
        ]),
    );

    vec![fjord, atlas, delta, kyoto, patagonia]
}

#[cfg(test)]
pub(crate) fn single_tour() -> Tour {
    tour(
        "t:solo",
        "Lisbon Food Walk",
        "lisbon-food-walk",
        TourType::Group,
        "Portugal",
        "2026-04-01T11:00:00Z",
    )
}
