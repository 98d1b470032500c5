//! Text rendering of pass records for the terminal

use super::records::{PassRecord, Payment};
use serde::Serialize;
use serde_json::Value;

/// Render one record as a card. Absent fields are left out entirely.
pub fn format_pass_card(record: &PassRecord, index: usize) -> String {
    let mut out = format!("## Pass {}\n", record.display_key(index));

    if let Some(name) = &record.name {
        out.push_str(&format!("**Name:** {}\n", name));
    }

    if let Some(category) = &record.category {
        out.push_str(&format!("**Category:** {}\n", category));
    }

    // Zero counts are hidden, as on the web page
    if let Some(n) = record.no_of_passes.filter(|n| *n != 0) {
        out.push_str(&format!("**No Of Passes:** {}\n", n));
    }

    if let Some(n) = record.people_count.filter(|n| *n != 0) {
        out.push_str(&format!("**People Count:** {}\n", n));
    }

    if let Some(payment) = &record.payment {
        out.push_str(&format!("**Payment:** {}\n", format_payment(payment)));
    }

    if let Some(numbers) = &record.pass_numbers {
        let joined = numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("**Pass Numbers:** {}\n", joined));
    }

    if let Some(statuses) = record.pass_numbers_status.as_ref().filter(|s| !s.is_empty()) {
        out.push_str("**Pass Status:**\n");
        for status in statuses {
            let number = status
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            if status.details.is_empty() {
                out.push_str(&format!("- {}\n", number));
            } else {
                let details = status
                    .details
                    .iter()
                    .map(|(k, v)| match v.as_str() {
                        Some(s) => format!("{}: {}", k, s),
                        None => format!("{}: {}", k, v),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push_str(&format!("- {} ({})\n", number, details));
            }
        }
    }

    out
}

fn format_payment(payment: &Payment) -> String {
    format!(
        "UPI: {} | Cash: {} | Card: {}",
        format_amount(payment.upi),
        format_amount(payment.cash),
        format_amount(payment.card)
    )
}

/// Missing amounts display as 0
fn format_amount(amount: Option<f64>) -> String {
    let amount = amount.unwrap_or(0.0);
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
    }
}

/// Render a whole result set, or the empty-state message
pub fn format_results(records: &[PassRecord], query: &str) -> String {
    if records.is_empty() {
        return if query.is_empty() {
            "No entry passes found\n".to_string()
        } else {
            "No results found\n".to_string()
        };
    }

    let mut out = if query.is_empty() {
        format!("# Entry Passes ({})\n\n", records.len())
    } else {
        format!("# Entry Passes matching \"{}\" ({})\n\n", query, records.len())
    };

    for (index, record) in records.iter().enumerate() {
        out.push_str(&format_pass_card(record, index));
        out.push('\n');
    }

    out
}

/// JSON output envelope; `results` holds the records exactly as fetched
#[derive(Debug, Serialize)]
struct JsonResults<'a> {
    query: &'a str,
    count: usize,
    results: Vec<&'a Value>,
}

/// Render a result set as JSON
pub fn format_results_json(records: &[PassRecord], query: &str) -> String {
    let output = JsonResults {
        query,
        count: records.len(),
        results: records.iter().map(PassRecord::raw).collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}
