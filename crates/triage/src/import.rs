// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `triage import` implementation: bulk-load messages from CSV.
//!
//! Expected headers: `customer_name, customer_email, message_text, tier,
//! account_balance`. Each row goes through the ticket service, so customers
//! are deduplicated by email and every message is classified. A bad row is
//! logged and skipped.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};

use triage_bus::EventBus;
use triage_config::TriageConfig;
use triage_core::{CustomerTier, TicketStore, TriageError};
use triage_service::{SubmitMessage, TicketService};

use crate::serve::open_storage;

#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    customer_email: String,
    #[serde(default)]
    message_text: String,
    #[serde(default)]
    tier: Option<String>,
    #[serde(default)]
    account_balance: Option<String>,
}

impl ImportRow {
    fn into_submission(self) -> SubmitMessage {
        let tier = self.tier.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(|raw| {
            raw.parse::<CustomerTier>().unwrap_or_else(|_| {
                warn!(tier = raw, "unknown tier, using standard");
                CustomerTier::Standard
            })
        });
        let balance = self
            .account_balance
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|b| b.is_finite())
            .unwrap_or(0.0);

        SubmitMessage {
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            message_text: self.message_text,
            tier,
            account_balance: Some(balance),
        }
    }
}

/// Outcome of an import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

/// Import every row from `reader` through `service`.
pub async fn import_reader<R: Read>(
    service: &TicketService,
    reader: R,
) -> Result<ImportSummary, TriageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let mut summary = ImportSummary::default();

    for (index, record) in csv_reader.deserialize::<ImportRow>().enumerate() {
        let line = index + 2; // header is line 1
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                error!(line, error = %e, "unreadable CSV row");
                summary.failed += 1;
                continue;
            }
        };
        let name = row.customer_name.clone().unwrap_or_default();
        match service.submit_message(row.into_submission()).await {
            Ok(ticket) => {
                info!(
                    line,
                    customer = %name,
                    ticket_id = ticket.id(),
                    urgency = %ticket.record.urgency_level,
                    "imported message"
                );
                summary.imported += 1;
            }
            Err(e) => {
                error!(line, customer = %name, error = %e, "failed to import message");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Runs `triage import <path>` against the configured database.
pub async fn run_import(config: TriageConfig, path: &Path) -> Result<ImportSummary, TriageError> {
    let file = std::fs::File::open(path).map_err(|e| TriageError::Storage {
        source: Box::new(e),
    })?;

    let storage = open_storage(&config).await?;
    let store: Arc<dyn TicketStore> = storage.clone();
    let service = TicketService::new(store, Arc::new(EventBus::new(config.server.observer_buffer)));

    let summary = import_reader(&service, file).await;
    storage.close().await?;
    let summary = summary?;

    info!(
        path = %path.display(),
        imported = summary.imported,
        failed = summary.failed,
        "import complete"
    );
    Ok(summary)
}
