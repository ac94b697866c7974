//! Contract record normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use firmscope_shared::{ContractCustomer, ContractStatus, ProcurementContract};
use serde_json::Value;

/// Upstream status of a tender that is still open.
pub(crate) const IN_PROGRESS_STATUS: &str = "Probíhající";

/// Title used when a record has none.
const UNTITLED: &str = "Bez názvu";

/// Settings that shape every normalized contract.
pub(crate) struct ContractShape<'a> {
    pub currency: &'a str,
    pub detail_url_base: &'a str,
}

/// Normalize one search hit, judging activity against `now`.
pub(crate) fn normalize_contract(
    raw: Value,
    shape: &ContractShape<'_>,
    now: DateTime<Utc>,
) -> ProcurementContract {
    let id = text(&raw, "id").unwrap_or_default();
    let upstream_status = text(&raw, "stavVZ");
    let deadline = text(&raw, "lhutaDoruceni");
    let is_active = is_active_at(
        deadline.as_deref().and_then(parse_deadline),
        upstream_status.as_deref(),
        now,
    );

    let customer = raw
        .get("zadavatel")
        .map(|c| ContractCustomer {
            name: text(c, "nazev"),
            registry_number: text(c, "ico"),
        })
        .unwrap_or_default();

    ProcurementContract {
        url: format!("{}/{id}", shape.detail_url_base.trim_end_matches('/')),
        title: text(&raw, "nazev").unwrap_or_else(|| UNTITLED.into()),
        description: text(&raw, "popis").unwrap_or_default(),
        price: amount(&raw, "konecnaHodnotaBezDph")
            .or_else(|| amount(&raw, "odhadovanaHodnotaBezDph")),
        currency: shape.currency.to_string(),
        status: map_status(upstream_status.as_deref()),
        date_published: text(&raw, "datumUverejneni"),
        deadline,
        customer,
        categories: categories(&raw),
        is_active,
        id,
        raw,
    }
}

/// A contract is active while its response deadline lies in the future;
/// without a usable deadline, the upstream "in progress" status decides.
pub(crate) fn is_active_at(
    deadline: Option<DateTime<Utc>>,
    upstream_status: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    match deadline {
        Some(deadline) => deadline > now,
        None => upstream_status == Some(IN_PROGRESS_STATUS),
    }
}

/// Parse the deadline formats the contracts API emits. Offset-less values are UTC.
pub(crate) fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn map_status(upstream: Option<&str>) -> ContractStatus {
    match upstream {
        Some(IN_PROGRESS_STATUS) => ContractStatus::Active,
        Some("Ukončená") => ContractStatus::Completed,
        Some("Zrušená") => ContractStatus::Cancelled,
        Some("Připravovaná") => ContractStatus::Planned,
        _ => ContractStatus::Unknown,
    }
}

/// CPV category names, falling back to their codes.
fn categories(raw: &Value) -> Vec<String> {
    raw.get("cpv")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|c| text(c, "nazev").or_else(|| text(c, "kod")))
                .collect()
        })
        .unwrap_or_default()
}

fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn amount(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
