// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

pub mod doc {
    use caravel::model::Document;
    use serde_json::{json, Map, Value};

    #[derive(Debug, Clone, Copy)]
    pub enum Case {
        Flat,
        Nested,
        WideList,
        LongStrings,
    }

    impl Case {
        pub fn id(&self) -> &'static str {
            match self {
                Self::Flat => "flat",
                Self::Nested => "nested",
                Self::WideList => "wide_list",
                Self::LongStrings => "long_strings",
            }
        }
    }

    pub fn fixture(case: Case) -> Document {
        let value = match case {
            Case::Flat => flat(24),
            Case::Nested => nested(4, 4),
            Case::WideList => wide_list(240),
            Case::LongStrings => long_strings(16, 400),
        };
        serde_json::from_value(value).expect("document fixture")
    }

    fn flat(entries: usize) -> Value {
        let mut map = Map::new();
        for index in 0..entries {
            let value = match index % 4 {
                0 => json!(format!("entry text {index:03}")),
                1 => json!(index as i64 * 7),
                2 => json!(index % 8 == 2),
                _ => Value::Null,
            };
            map.insert(format!("field_{index:03}"), value);
        }
        Value::Object(map)
    }

    fn nested(width: usize, depth: usize) -> Value {
        if depth == 0 {
            return json!({
                "headline": "leaf section",
                "duration_hours": 6,
                "included": true,
            });
        }

        let mut map = Map::new();
        for index in 0..width {
            map.insert(format!("section_{index:02}"), nested(width, depth - 1));
        }
        Value::Object(map)
    }

    fn wide_list(items: usize) -> Value {
        let days: Vec<Value> = (0..items)
            .map(|index| {
                json!({
                    "day": index + 1,
                    "title": format!("Day {:03} ridge traverse", index + 1),
                    "distance_km": (index % 30) + 4,
                    "camp": index % 3 != 0,
                })
            })
            .collect();
        json!({ "days": days })
    }

    fn long_strings(entries: usize, text_len: usize) -> Value {
        let mut map = Map::new();
        for index in 0..entries {
            map.insert(
                format!("paragraph_{index:02}"),
                json!(ascii_repeat_to_len(
                    &format!("paragraph {index:02} "),
                    'x',
                    text_len
                )),
            );
        }
        Value::Object(map)
    }

    fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
        if prefix.len() >= target_len {
            return prefix[..target_len].to_owned();
        }

        let mut out = String::with_capacity(target_len);
        out.push_str(prefix);
        while out.len() < target_len {
            out.push(fill);
        }
        out
    }
}

pub mod catalog {
    use caravel::model::{Tour, TourFields, TourId, TourType};

    const DESTINATIONS: [&str; 6] = [
        "Norway", "Morocco", "Japan", "Peru", "Iceland", "Portugal",
    ];

    pub fn rows(count: usize) -> Vec<Tour> {
        (0..count).map(row).collect()
    }

    fn row(index: usize) -> Tour {
        let destination = DESTINATIONS[index % DESTINATIONS.len()];

        let mut fields = TourFields::default();
        fields.set_title(format!("{destination} Expedition {index:04}"));
        fields.set_slug(format!("{}-expedition-{index:04}", destination.to_lowercase()));
        fields.set_destination(destination);
        fields.set_tour_type(TourType::ALL[index % TourType::ALL.len()]);

        let id = TourId::new(format!("tour-{index:04}")).expect("tour id");
        let mut tour = Tour::new(id, fields);
        tour.set_created_at(Some(format!(
            "2026-{:02}-{:02}T08:00:00Z",
            1 + index % 12,
            1 + index % 28
        )));
        tour
    }
}
