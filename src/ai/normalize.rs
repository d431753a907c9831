// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?").expect("static fence pattern"))
}

/// Strips markdown code-fence markers from model output and trims whitespace.
///
/// Best-effort cleanup, not a sanitizer: prose outside the payload still fails
/// the JSON parse downstream. The pattern is global, not boundary-anchored, so
/// a triple-backtick run inside a string value is stripped as well.
pub fn normalize(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_tagged_fences() {
        assert_eq!(
            normalize("```json\n{\"base_price\": 150}\n```"),
            "{\"base_price\": 150}"
        );
    }

    #[test]
    fn strips_untagged_fences() {
        assert_eq!(normalize("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(normalize("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  \n null \n"), "null");
    }

    #[test]
    fn keeps_prose_for_the_parser_to_reject() {
        assert_eq!(
            normalize("Sure! Here is the update: {\"a\": 1}"),
            "Sure! Here is the update: {\"a\": 1}"
        );
    }

    #[test]
    fn fence_runs_inside_string_values_are_stripped_too() {
        // Known fragility of the global pattern, kept on purpose.
        assert_eq!(
            normalize("{\"snippet\": \"```code```\"}"),
            "{\"snippet\": \"code\"}"
        );
    }
}
