//! Registry record normalization.
//!
//! The registry API publishes loosely typed JSON whose optional members come
//! and go between schema versions. Every accessor here tolerates absence and
//! type drift (numbers where strings are expected), so normalization is total:
//! a record either has a usable registry number or is rejected, and every
//! other field ends up with real data or a sentinel.

use firmscope_shared::{
    CompanyProfile, CompanyStatus, FirmscopeError, NOT_PROVIDED, RegistryNumber, Result,
    UNKNOWN_NAME,
};
use serde_json::Value;

/// Status code the registry uses for a live company.
const ACTIVE_STATUS_CODE: &str = "AKTIVNI";

/// Normalize one registry record.
///
/// `requested` is used when the record itself carries no valid registry number
/// (single lookups always know which number they asked for).
pub(crate) fn normalize_record(
    raw: Value,
    requested: Option<&RegistryNumber>,
) -> Result<CompanyProfile> {
    let registry_number = match text(&raw, "ico").map(|ico| RegistryNumber::parse(&ico)) {
        Some(Ok(ico)) => ico,
        _ => requested.cloned().ok_or_else(|| {
            FirmscopeError::parse("registry record has no valid registry number")
        })?,
    };

    let (industry_code, industry_description) = industry(&raw);

    Ok(CompanyProfile {
        registry_number,
        tax_id: text(&raw, "dic"),
        name: name(&raw),
        legal_form: legal_form(&raw),
        address: address(&raw),
        status: status(&raw),
        date_established: text(&raw, "datumVzniku").unwrap_or_else(|| NOT_PROVIDED.into()),
        date_terminated: text(&raw, "datumZaniku"),
        industry_code,
        industry_description,
        raw,
    })
}

/// Non-empty text under `key`, accepting numbers as well as strings.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn name(raw: &Value) -> String {
    text(raw, "obchodniJmeno")
        .or_else(|| text(raw, "nazev"))
        .unwrap_or_else(|| UNKNOWN_NAME.into())
}

fn legal_form(raw: &Value) -> String {
    match raw.get("pravniForma") {
        Some(form @ Value::Object(_)) => text(form, "nazev"),
        _ => None,
    }
    .unwrap_or_else(|| NOT_PROVIDED.into())
}

fn address(raw: &Value) -> String {
    let Some(seat) = raw.get("sidlo") else {
        return NOT_PROVIDED.into();
    };

    let parts: Vec<String> = [
        text(seat, "nazevUlice"),
        text(seat, "cisloDomovni"),
        text(seat, "cisloOrientacni").map(|n| format!("/{n}")),
        text(seat, "nazevObce").map(|m| format!(", {m}")),
        text(seat, "psc").map(|p| format!(", {p}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        NOT_PROVIDED.into()
    } else {
        parts.join(" ")
    }
}

fn status(raw: &Value) -> CompanyStatus {
    if text(raw, "datumZaniku").is_some() {
        return CompanyStatus::Terminated;
    }
    match text(raw, "stavSubjektu") {
        Some(code) if code == ACTIVE_STATUS_CODE => CompanyStatus::Active,
        Some(code) => CompanyStatus::Unknown(code),
        None => CompanyStatus::Active,
    }
}

/// First entry of the industry classification array.
///
/// Older records use `nace`, newer ones `czNace`; entries are either
/// `{kod, nazev}` objects or bare code strings.
fn industry(raw: &Value) -> (Option<String>, String) {
    let first = raw
        .get("czNace")
        .or_else(|| raw.get("nace"))
        .and_then(Value::as_array)
        .and_then(|entries| entries.first());

    match first {
        Some(Value::String(code)) if !code.trim().is_empty() => {
            (Some(code.trim().to_string()), NOT_PROVIDED.into())
        }
        Some(entry @ Value::Object(_)) => (
            text(entry, "kod"),
            text(entry, "nazev").unwrap_or_else(|| NOT_PROVIDED.into()),
        ),
        _ => (None, NOT_PROVIDED.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load_fixture(name: &str) -> Value {
        let path = format!("../../../fixtures/json/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        serde_json::from_str(&content).expect("fixture is valid JSON")
    }

    #[test]
    fn full_record_normalizes() {
        let profile = normalize_record(load_fixture("registry-company.json"), None).unwrap();

        assert_eq!(profile.registry_number.as_str(), "27082440");
        assert_eq!(profile.tax_id.as_deref(), Some("CZ27082440"));
        assert_eq!(profile.name, "Alza.cz a.s.");
        assert_eq!(profile.legal_form, "Akciová společnost");
        assert_eq!(profile.address, "Jankovcova 1522 /53 , Praha , 17000");
        assert_eq!(profile.status, CompanyStatus::Active);
        assert_eq!(profile.date_established, "2003-08-26");
        assert!(profile.date_terminated.is_none());
        assert_eq!(profile.industry_code.as_deref(), Some("47910"));
        assert_eq!(
            profile.industry_description,
            "Maloobchod prostřednictvím internetu nebo zásilkové služby"
        );
        assert_eq!(profile.raw["obchodniJmeno"], "Alza.cz a.s.");
    }

    #[test]
    fn minimal_record_uses_sentinels() {
        let raw = json!({ "obchodniJmeno": "Alza.cz a.s.", "ico": "27082440" });
        let profile = normalize_record(raw, None).unwrap();

        assert_eq!(profile.name, "Alza.cz a.s.");
        assert_eq!(profile.status, CompanyStatus::Active);
        assert_eq!(profile.address, NOT_PROVIDED);
        assert_eq!(profile.legal_form, NOT_PROVIDED);
        assert_eq!(profile.date_established, NOT_PROVIDED);
        assert_eq!(profile.industry_description, NOT_PROVIDED);
        assert!(profile.industry_code.is_none());
        assert!(profile.tax_id.is_none());
    }

    #[test]
    fn empty_record_falls_back_to_requested_number() {
        let requested = RegistryNumber::parse("00006947").unwrap();
        let profile = normalize_record(json!({}), Some(&requested)).unwrap();
        assert_eq!(profile.registry_number, requested);
        assert_eq!(profile.name, UNKNOWN_NAME);
    }

    #[test]
    fn record_without_number_is_rejected_in_lists() {
        let err = normalize_record(json!({ "obchodniJmeno": "X" }), None).unwrap_err();
        assert!(matches!(err, FirmscopeError::Parse { .. }));
    }

    #[test]
    fn name_falls_back_to_general_name() {
        let raw = json!({
            "ico": "00006947",
            "obchodniJmeno": "  ",
            "nazev": "Ministerstvo financí"
        });
        assert_eq!(name(&raw), "Ministerstvo financí");
    }

    #[test]
    fn termination_date_wins_over_status_code() {
        let raw = json!({ "datumZaniku": "2020-01-31", "stavSubjektu": "AKTIVNI" });
        assert_eq!(status(&raw), CompanyStatus::Terminated);
    }

    #[test]
    fn unmapped_status_code_passes_through() {
        let raw = json!({ "stavSubjektu": "V_LIKVIDACI" });
        assert_eq!(status(&raw), CompanyStatus::Unknown("V_LIKVIDACI".into()));
    }

    #[test]
    fn address_tolerates_numeric_parts() {
        let raw = json!({
            "sidlo": { "nazevObce": "Brno", "cisloDomovni": 12, "psc": 60200 }
        });
        assert_eq!(address(&raw), "12 , Brno , 60200");
    }

    #[test]
    fn empty_seat_is_not_provided() {
        assert_eq!(address(&json!({ "sidlo": {} })), NOT_PROVIDED);
    }

    #[test]
    fn industry_reads_legacy_field_and_bare_codes() {
        let legacy = json!({ "nace": [{ "kod": "62010", "nazev": "Programování" }] });
        assert_eq!(
            industry(&legacy),
            (Some("62010".into()), "Programování".into())
        );

        let bare = json!({ "czNace": ["62020", "63110"] });
        assert_eq!(industry(&bare), (Some("62020".into()), NOT_PROVIDED.into()));

        let empty = json!({ "czNace": [] });
        assert_eq!(industry(&empty), (None, NOT_PROVIDED.into()));
    }
}
