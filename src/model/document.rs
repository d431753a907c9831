// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One editable JSON field of a tour record.
///
/// Any JSON shape is legal; no schema is enforced. Map keys are kept in a
/// `BTreeMap` so serialization order is stable across round trips. A value of
/// this type is always serializable; there is no partially-applied or error
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<Document>),
    Map(BTreeMap<String, Document>),
}

impl Default for Document {
    fn default() -> Self {
        Self::Null
    }
}

impl Document {
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Pretty-printed serialization with stable key ordering.
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("document serializes to JSON")
    }

    /// Compact serialization, used when embedding the document in a prompt.
    pub fn to_compact(&self) -> String {
        serde_json::to_string(self).expect("document serializes to JSON")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<const N: usize> From<[(&str, Document); N]> for Document {
    fn from(entries: [(&str, Document); N]) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        )
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    fn round_trip(document: &Document) -> Document {
        Document::parse(&document.to_pretty()).expect("reparse")
    }

    #[test]
    fn parse_classifies_every_shape() {
        assert_eq!(Document::parse("null").expect("null"), Document::Null);
        assert_eq!(
            Document::parse("true").expect("bool"),
            Document::Bool(true)
        );
        assert_eq!(
            Document::parse("\"hi\"").expect("text"),
            Document::from("hi")
        );
        assert_eq!(Document::parse("7").expect("number"), Document::from(7));
        assert_eq!(
            Document::parse("[]").expect("list"),
            Document::empty_list()
        );
        assert_eq!(
            Document::parse("{}").expect("map"),
            Document::empty_map()
        );
    }

    #[test]
    fn parse_rejects_invalid_syntax() {
        assert!(Document::parse("{\"open\":").is_err());
        assert!(Document::parse("not json").is_err());
    }

    #[test]
    fn round_trip_preserves_nested_values() {
        let document = Document::from([
            ("title", Document::from("Fjord Week")),
            ("days", Document::from(7)),
            ("guided", Document::from(true)),
            ("notes", Document::Null),
            (
                "stops",
                Document::from(vec![
                    Document::from("Bergen"),
                    Document::from([("port", Document::from("Flåm"))]),
                ]),
            ),
        ]);

        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn round_trip_preserves_fractional_numbers() {
        let document = Document::parse("{\"rate\": 19.5, \"count\": -3}").expect("parse");
        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn round_trip_preserves_empty_containers() {
        let document = Document::from([
            ("empty_list", Document::empty_list()),
            ("empty_map", Document::empty_map()),
        ]);

        assert_eq!(round_trip(&document), document);
    }

    #[test]
    fn pretty_output_orders_keys_stably() {
        let a = Document::parse("{\"b\": 1, \"a\": 2}").expect("parse");
        let b = Document::parse("{\"a\": 2, \"b\": 1}").expect("parse");

        assert_eq!(a.to_pretty(), b.to_pretty());
    }
}
