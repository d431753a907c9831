// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Document;

/// One row of the tree-mode presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub label: Option<String>,
    pub value: TreeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValue {
    /// Plain scalar content (strings, numbers).
    Scalar(String),
    /// Two-state badge for booleans.
    Badge(bool),
    /// A labeled container; its entries follow one level deeper.
    Branch,
    EmptyList,
    EmptyMap,
    NotProvided,
}

impl TreeValue {
    /// Text shown in the value cell; badge and placeholder styling is the
    /// caller's concern.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Scalar(text) => text,
            Self::Badge(true) => "yes",
            Self::Badge(false) => "no",
            Self::Branch => "",
            Self::EmptyList => "(empty list)",
            Self::EmptyMap => "(no entries)",
            Self::NotProvided => "(not provided)",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::EmptyList | Self::EmptyMap | Self::NotProvided)
    }
}

/// Object keys are shown with underscores as spaces.
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Flattens a document into presentation rows.
///
/// Traversal is iterative over an explicit stack, so nesting depth is bounded
/// by memory, not by the call stack; depth only controls indentation. Entry
/// order is the serialization order: map keys sorted, list items positional.
pub fn render_tree(document: &Document) -> Vec<TreeRow> {
    struct Entry<'a> {
        depth: usize,
        label: Option<String>,
        node: &'a Document,
    }

    let mut out = Vec::new();
    let mut stack = vec![Entry {
        depth: 0,
        label: None,
        node: document,
    }];

    while let Some(Entry { depth, label, node }) = stack.pop() {
        match node {
            Document::Null => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::NotProvided,
            }),
            Document::Bool(value) => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::Badge(*value),
            }),
            Document::Number(value) => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::Scalar(value.to_string()),
            }),
            Document::Text(value) => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::Scalar(value.clone()),
            }),
            Document::List(items) if items.is_empty() => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::EmptyList,
            }),
            Document::Map(entries) if entries.is_empty() => out.push(TreeRow {
                depth,
                label,
                value: TreeValue::EmptyMap,
            }),
            Document::List(items) => {
                let child_depth = push_branch(&mut out, depth, label);
                for (index, item) in items.iter().enumerate().rev() {
                    stack.push(Entry {
                        depth: child_depth,
                        label: Some(format!("{}.", index + 1)),
                        node: item,
                    });
                }
            }
            Document::Map(entries) => {
                let child_depth = push_branch(&mut out, depth, label);
                for (key, value) in entries.iter().rev() {
                    stack.push(Entry {
                        depth: child_depth,
                        label: Some(humanize_key(key)),
                        node: value,
                    });
                }
            }
        }
    }

    out
}

/// Emits the container's own row when it is labeled; the root container has
/// no header, its entries start at depth zero.
fn push_branch(out: &mut Vec<TreeRow>, depth: usize, label: Option<String>) -> usize {
    match label {
        Some(label) => {
            out.push(TreeRow {
                depth,
                label: Some(label),
                value: TreeValue::Branch,
            });
            depth + 1
        }
        None => depth,
    }
}

#[cfg(test)]
mod tests {
    use super::{humanize_key, render_tree, TreeValue};
    use crate::model::Document;

    fn labels(document: &Document) -> Vec<Option<String>> {
        render_tree(document).into_iter().map(|row| row.label).collect()
    }

    #[test]
    fn scalar_roots_render_one_row() {
        let rows = render_tree(&Document::from("hello"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[0].value, TreeValue::Scalar("hello".to_owned()));
    }

    #[test]
    fn empty_shapes_render_distinct_markers() {
        let null_text = render_tree(&Document::Null)[0].value.display_text().to_owned();
        let list_text = render_tree(&Document::empty_list())[0]
            .value
            .display_text()
            .to_owned();
        let map_text = render_tree(&Document::empty_map())[0]
            .value
            .display_text()
            .to_owned();

        assert_ne!(null_text, list_text);
        assert_ne!(null_text, map_text);
        assert_ne!(list_text, map_text);
    }

    #[test]
    fn map_keys_are_humanized_and_sorted() {
        let document = Document::from([
            ("base_price", Document::from(100)),
            ("add_on_fees", Document::from(10)),
        ]);

        let rows = render_tree(&document);
        assert_eq!(
            rows.iter().map(|r| r.label.clone()).collect::<Vec<_>>(),
            vec![
                Some("add on fees".to_owned()),
                Some("base price".to_owned()),
            ]
        );
    }

    #[test]
    fn booleans_render_as_badges() {
        let document = Document::from([("family_friendly", Document::from(true))]);
        let rows = render_tree(&document);

        assert_eq!(rows[0].value, TreeValue::Badge(true));
        assert_eq!(rows[0].value.display_text(), "yes");
        assert_eq!(TreeValue::Badge(false).display_text(), "no");
    }

    #[test]
    fn list_items_get_positional_labels() {
        let document = Document::from(vec![
            Document::from("Bergen"),
            Document::from("Flåm"),
        ]);

        assert_eq!(
            labels(&document),
            vec![Some("1.".to_owned()), Some("2.".to_owned())]
        );
    }

    #[test]
    fn labeled_containers_emit_branch_rows() {
        let document = Document::from([(
            "stops",
            Document::from(vec![Document::from("Bergen")]),
        )]);

        let rows = render_tree(&document);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label.as_deref(), Some("stops"));
        assert_eq!(rows[0].value, TreeValue::Branch);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].label.as_deref(), Some("1."));
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn nested_placeholders_keep_their_labels() {
        let document = Document::from([
            ("gallery", Document::empty_list()),
            ("notes", Document::Null),
            ("extras", Document::empty_map()),
        ]);

        let rows = render_tree(&document);
        let by_label: Vec<(Option<String>, TreeValue)> = rows
            .into_iter()
            .map(|row| (row.label, row.value))
            .collect();

        assert!(by_label.contains(&(Some("gallery".to_owned()), TreeValue::EmptyList)));
        assert!(by_label.contains(&(Some("notes".to_owned()), TreeValue::NotProvided)));
        assert!(by_label.contains(&(Some("extras".to_owned()), TreeValue::EmptyMap)));
    }

    #[test]
    fn depth_follows_nesting() {
        let document = Document::parse(r#"{"a": {"b": {"c": 1}}}"#).expect("parse");
        let rows = render_tree(&document);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows[2].value, TreeValue::Scalar("1".to_owned()));
    }

    #[test]
    fn pathological_nesting_does_not_overflow() {
        let mut document = Document::from(7);
        for _ in 0..4096 {
            document = Document::from(vec![document]);
        }

        let rows = render_tree(&document);
        assert_eq!(rows.len(), 4096);
        assert_eq!(rows.last().map(|row| row.depth), Some(4095));
    }

    #[test]
    fn humanize_only_touches_underscores() {
        assert_eq!(humanize_key("base_price"), "base price");
        assert_eq!(humanize_key("meeting-point"), "meeting-point");
        assert_eq!(humanize_key("plain"), "plain");
    }
}
