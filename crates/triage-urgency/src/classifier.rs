// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic urgency scoring.
//!
//! Matching is case-insensitive substring presence with no tokenization,
//! so "disbursement" hits both `disburse` and `disbursement`.

use triage_core::UrgencyLevel;

/// Points added per distinct high-urgency keyword present.
pub const HIGH_KEYWORD_WEIGHT: u32 = 10;

/// Points added per distinct medium-urgency keyword present.
pub const MEDIUM_KEYWORD_WEIGHT: u32 = 5;

/// Scores at or above this are `high`.
pub const HIGH_THRESHOLD: u32 = 15;

/// Scores at or above this (and below [`HIGH_THRESHOLD`]) are `medium`.
pub const MEDIUM_THRESHOLD: u32 = 5;

/// Loan-approval anxiety, account lockout, and explicit urgency.
pub const HIGH_URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "emergency",
    "immediately",
    "asap",
    "critical",
    "loan approval",
    "disbursed",
    "disburse",
    "disbursement",
    "when will i get",
    "waiting for loan",
    "approved yet",
    "rejected",
    "denied",
    "freeze",
    "frozen",
    "locked out",
    "cant access",
    "cannot access",
    "blocked",
];

/// Status checks and account maintenance.
pub const MEDIUM_URGENCY_KEYWORDS: &[&str] = &[
    "application status",
    "loan status",
    "pending",
    "update",
    "change",
    "modify",
    "payment",
    "document",
    "verification",
    "verify",
];

/// Result of scoring a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyAssessment {
    /// Summed keyword score.
    pub score: u32,
    /// Tier derived from `score`.
    pub level: UrgencyLevel,
}

/// Keyword-counting urgency classifier.
///
/// Each keyword contributes at most once regardless of how often it
/// occurs. A single high-urgency keyword (10 points) lands in `medium`;
/// crossing into `high` takes two high hits, or one high plus one medium.
#[derive(Debug, Clone)]
pub struct UrgencyClassifier {
    high: &'static [&'static str],
    medium: &'static [&'static str],
}

impl UrgencyClassifier {
    /// Create a classifier with the built-in keyword lists.
    pub fn new() -> Self {
        Self {
            high: HIGH_URGENCY_KEYWORDS,
            medium: MEDIUM_URGENCY_KEYWORDS,
        }
    }

    /// Score a message and assign its tier.
    pub fn classify(&self, text: &str) -> UrgencyAssessment {
        let lower = text.to_lowercase();

        let high_hits = Self::count_present(&lower, self.high);
        let medium_hits = Self::count_present(&lower, self.medium);
        let score = high_hits * HIGH_KEYWORD_WEIGHT + medium_hits * MEDIUM_KEYWORD_WEIGHT;

        let level = Self::score_to_level(score);
        tracing::trace!(score, %level, high_hits, medium_hits, "urgency classified");

        UrgencyAssessment { score, level }
    }

    /// Map a summed score to its tier.
    pub fn score_to_level(score: u32) -> UrgencyLevel {
        if score >= HIGH_THRESHOLD {
            UrgencyLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }

    fn count_present(haystack: &str, keywords: &[&str]) -> u32 {
        keywords.iter().filter(|k| haystack.contains(*k)).count() as u32
    }
}

impl Default for UrgencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(text: &str) -> UrgencyAssessment {
        UrgencyClassifier::new().classify(text)
    }

    #[test]
    fn empty_text_is_low() {
        assert_eq!(
            classify(""),
            UrgencyAssessment {
                score: 0,
                level: UrgencyLevel::Low
            }
        );
    }

    #[test]
    fn neutral_text_is_low() {
        let result = classify("Hello, I just wanted to say thanks for the help.");
        assert_eq!(result.score, 0);
        assert_eq!(result.level, UrgencyLevel::Low);
    }

    #[test]
    fn single_high_keyword_lands_in_medium() {
        let result = classify("This is URGENT");
        assert_eq!(result.score, 10);
        assert_eq!(result.level, UrgencyLevel::Medium);
    }

    #[test]
    fn two_high_keywords_are_high() {
        let result = classify("Emergency: my application was rejected");
        assert_eq!(result.score, 20);
        assert_eq!(result.level, UrgencyLevel::High);
    }

    #[test]
    fn one_high_plus_one_medium_crosses_threshold() {
        let result = classify("my payment is blocked");
        assert_eq!(result.score, 15);
        assert_eq!(result.level, UrgencyLevel::High);
    }

    #[test]
    fn three_medium_keywords_reach_high_boundary() {
        let result = classify("pending payment, please verify");
        assert_eq!(result.score, 15);
        assert_eq!(result.level, UrgencyLevel::High);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let result = classify("urgent urgent urgent URGENT");
        assert_eq!(result.score, 10);
        assert_eq!(result.level, UrgencyLevel::Medium);
    }

    #[test]
    fn overlapping_keywords_each_count() {
        // "disbursement" contains "disburse" as a substring.
        let result = classify("any news on the disbursement?");
        assert_eq!(result.score, 20);
        assert_eq!(result.level, UrgencyLevel::High);
    }

    #[test]
    fn substring_inside_a_larger_word_matches() {
        // "updated" contains "update".
        let result = classify("I updated my address");
        assert_eq!(result.score, 5);
        assert_eq!(result.level, UrgencyLevel::Medium);
    }

    #[test]
    fn threshold_boundaries() {
        assert_eq!(UrgencyClassifier::score_to_level(0), UrgencyLevel::Low);
        assert_eq!(UrgencyClassifier::score_to_level(4), UrgencyLevel::Low);
        assert_eq!(UrgencyClassifier::score_to_level(5), UrgencyLevel::Medium);
        assert_eq!(UrgencyClassifier::score_to_level(14), UrgencyLevel::Medium);
        assert_eq!(UrgencyClassifier::score_to_level(15), UrgencyLevel::High);
        assert_eq!(UrgencyClassifier::score_to_level(200), UrgencyLevel::High);
    }

    #[test]
    fn keyword_lists_are_lowercase() {
        for k in HIGH_URGENCY_KEYWORDS.iter().chain(MEDIUM_URGENCY_KEYWORDS) {
            assert_eq!(*k, k.to_lowercase(), "keyword {k} must be lowercase");
        }
    }

    fn contains_any_keyword(text: &str) -> bool {
        let lower = text.to_lowercase();
        HIGH_URGENCY_KEYWORDS
            .iter()
            .chain(MEDIUM_URGENCY_KEYWORDS)
            .any(|k| lower.contains(k))
    }

    proptest! {
        #[test]
        fn keyword_free_text_scores_zero(text in "[0-9 .,!?]{0,80}") {
            prop_assume!(!contains_any_keyword(&text));
            let result = classify(&text);
            prop_assert_eq!(result.score, 0);
            prop_assert_eq!(result.level, UrgencyLevel::Low);
        }

        #[test]
        fn classification_ignores_case(idx in 0..HIGH_URGENCY_KEYWORDS.len()) {
            let keyword = HIGH_URGENCY_KEYWORDS[idx];
            let lower = classify(keyword);
            let upper = classify(&keyword.to_uppercase());
            prop_assert_eq!(lower, upper);
        }

        #[test]
        fn score_is_a_multiple_of_five(text in ".{0,120}") {
            prop_assert_eq!(classify(&text).score % MEDIUM_KEYWORD_WEIGHT, 0);
        }

        #[test]
        fn level_is_a_function_of_score(text in ".{0,120}") {
            let result = classify(&text);
            prop_assert_eq!(result.level, UrgencyClassifier::score_to_level(result.score));
        }

        #[test]
        fn two_distinct_isolated_high_keywords_score_twenty(
            a in prop::sample::select(vec!["urgent", "emergency", "critical", "rejected", "locked out"]),
            b in prop::sample::select(vec!["asap", "denied", "frozen", "blocked"]),
        ) {
            let result = classify(&format!("{a} and {b}"));
            prop_assert_eq!(result.score, 20);
            prop_assert_eq!(result.level, UrgencyLevel::High);
        }
    }
}
