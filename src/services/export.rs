//! CSV serialization of a work-order listing.
//!
//! Header and column order follow the store's schema order. Quoting is
//! RFC 4180: fields containing commas, quotes, or line breaks are wrapped in
//! double quotes with embedded quotes doubled.

use crate::models::WorkOrder;

pub const CSV_HEADER: &str =
    "id,machine_id,issue,priority,status,created_at,closed_at,updated_at,assigned_to,notes";

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[must_use]
pub fn work_orders_to_csv(rows: &[WorkOrder]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for row in rows {
        let fields = [
            row.id.to_string(),
            escape(&row.machine_id),
            escape(&row.issue),
            row.priority.to_string(),
            row.status.to_string(),
            escape(&row.created_at),
            row.closed_at.as_deref().map(escape).unwrap_or_default(),
            escape(&row.updated_at),
            row.assigned_to.as_deref().map(escape).unwrap_or_default(),
            row.notes.as_deref().map(escape).unwrap_or_default(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}
