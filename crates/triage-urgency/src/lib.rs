// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Urgency classification for incoming support messages.
//!
//! [`UrgencyClassifier`] scores message text against two fixed keyword
//! lists and maps the summed score to a [`UrgencyLevel`]. Pure, no I/O.

pub mod classifier;

pub use classifier::{
    HIGH_URGENCY_KEYWORDS, MEDIUM_URGENCY_KEYWORDS, UrgencyAssessment, UrgencyClassifier,
};
pub use triage_core::UrgencyLevel;
