// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket (support message) operations: insert, joined reads, filtered
//! queue listing, lifecycle updates, and substring search.

use rusqlite::params;
use rusqlite::types::Value;
use triage_core::{TicketStatus, TriageError};

use super::parse_column;
use crate::database::Database;
use crate::models::{NewTicket, Ticket, TicketFilter, TicketRecord};

/// Joined projection shared by every read that returns [`Ticket`].
const TICKET_SELECT: &str = "SELECT m.id, m.customer_id, m.message_text, m.urgency_level,
        m.urgency_score, m.status, m.assigned_to, m.response_text, m.responded_at,
        m.created_at, c.name, c.email, c.tier, c.account_balance, a.name
     FROM messages m
     JOIN customers c ON c.id = m.customer_id
     LEFT JOIN agents a ON a.id = m.assigned_to";

/// Queue order: most urgent first, then newest, then highest id.
const QUEUE_ORDER: &str = "ORDER BY m.urgency_score DESC, m.created_at DESC, m.id DESC";

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRecord> {
    Ok(TicketRecord {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        message_text: row.get(2)?,
        urgency_level: parse_column(row, 3)?,
        urgency_score: row.get(4)?,
        status: parse_column(row, 5)?,
        assigned_to: row.get(6)?,
        response_text: row.get(7)?,
        responded_at: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn row_to_ticket(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        record: row_to_record(row)?,
        customer_name: row.get(10)?,
        customer_email: row.get(11)?,
        customer_tier: parse_column(row, 12)?,
        account_balance: row.get(13)?,
        agent_name: row.get(14)?,
    })
}

/// Escape `LIKE` wildcards so the query matches as a literal substring.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Fail with `NotFound` when an update touched no rows.
fn ensure_updated(changed: usize, id: i64) -> Result<(), TriageError> {
    if changed == 0 {
        Err(TriageError::ticket_not_found(id))
    } else {
        Ok(())
    }
}

/// Insert a ticket with status `new` and return the new row id.
pub async fn create_ticket(db: &Database, ticket: &NewTicket) -> Result<i64, TriageError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages
                    (customer_id, message_text, urgency_level, urgency_score, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    ticket.customer_id,
                    ticket.message_text,
                    ticket.urgency_level.to_string(),
                    ticket.urgency_score,
                    TicketStatus::New.to_string(),
                    ticket.created_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get one ticket with its joined customer and agent fields.
pub async fn get_ticket(db: &Database, id: i64) -> Result<Option<Ticket>, TriageError> {
    db.connection()
        .call(move |conn| {
            let sql = format!("{TICKET_SELECT} WHERE m.id = ?1");
            match conn.query_row(&sql, params![id], row_to_ticket) {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List tickets matching every supplied filter, in queue order.
pub async fn list_tickets(db: &Database, filter: &TicketFilter) -> Result<Vec<Ticket>, TriageError> {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(status) = filter.status {
        clauses.push("m.status = ?");
        values.push(Value::Text(status.to_string()));
    }
    if let Some(urgency) = filter.urgency {
        clauses.push("m.urgency_level = ?");
        values.push(Value::Text(urgency.to_string()));
    }
    if let Some(agent_id) = filter.assigned_to {
        clauses.push("m.assigned_to = ?");
        values.push(Value::Integer(agent_id));
    }
    if filter.unassigned {
        clauses.push("m.assigned_to IS NULL");
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!("{TICKET_SELECT} {where_clause} {QUEUE_ORDER}");

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values), row_to_ticket)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Assign a ticket to an agent and move it to `in-progress`.
pub async fn assign_ticket(db: &Database, id: i64, agent_id: i64) -> Result<(), TriageError> {
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET assigned_to = ?1, status = ?2 WHERE id = ?3",
                params![agent_id, TicketStatus::InProgress.to_string(), id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    ensure_updated(changed, id)
}

/// Record a response and resolve the ticket.
///
/// The assignee is overwritten with `agent_id`, including clearing it when
/// no responder is given.
pub async fn record_response(
    db: &Database,
    id: i64,
    response_text: &str,
    agent_id: Option<i64>,
    responded_at: &str,
) -> Result<(), TriageError> {
    let response_text = response_text.to_string();
    let responded_at = responded_at.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages
                 SET response_text = ?1, responded_at = ?2, assigned_to = ?3, status = ?4
                 WHERE id = ?5",
                params![
                    response_text,
                    responded_at,
                    agent_id,
                    TicketStatus::Resolved.to_string(),
                    id,
                ],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    ensure_updated(changed, id)
}

/// Override a ticket's status without touching assignment or response.
pub async fn set_ticket_status(
    db: &Database,
    id: i64,
    status: TicketStatus,
) -> Result<(), TriageError> {
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE messages SET status = ?1 WHERE id = ?2",
                params![status.to_string(), id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    ensure_updated(changed, id)
}

/// A customer's tickets, newest first.
pub async fn tickets_for_customer(
    db: &Database,
    customer_id: i64,
) -> Result<Vec<TicketRecord>, TriageError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_id, message_text, urgency_level, urgency_score, status,
                        assigned_to, response_text, responded_at, created_at
                 FROM messages WHERE customer_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![customer_id], row_to_record)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Case-insensitive literal substring search over message text, customer
/// name, and customer email, in queue order.
pub async fn search_tickets(db: &Database, query: &str) -> Result<Vec<Ticket>, TriageError> {
    let pattern = like_pattern(query);
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "{TICKET_SELECT}
                 WHERE m.message_text LIKE ?1 ESCAPE '\\'
                    OR c.name LIKE ?1 ESCAPE '\\'
                    OR c.email LIKE ?1 ESCAPE '\\'
                 {QUEUE_ORDER}"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![pattern], row_to_ticket)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
