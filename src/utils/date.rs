use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::{AppError, AppResult};

/// Lagringsformat för förfallodatum
pub const DUE_DATE_FORMAT: &str = "%Y%m%d%H%M";

/// Äldre format utan klockslag (läses fortfarande)
pub const LEGACY_DUE_DATE_FORMAT: &str = "%Y%m%d";

/// Lagringsformat för ändringstid
pub const MODIFIED_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// "Inget förfallodatum" lagras som största möjliga datum så att
/// stigande sortering lägger odaterade uppgifter sist.
pub const NO_DUE_DATE: &str = "999912312359";

fn sentinel_day() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
}

/// Koda ett förfallodatum för lagring
pub fn encode_due_date(due: Option<NaiveDateTime>) -> String {
    match due {
        Some(dt) => dt.format(DUE_DATE_FORMAT).to_string(),
        None => NO_DUE_DATE.to_string(),
    }
}

/// Avkoda ett lagrat förfallodatum.
///
/// Båda formaten accepteras. Ett datum som infaller på sentinel-dagen
/// (9999-12-31) betyder "inget förfallodatum". Text som inte matchar
/// något format ger `AppError::InvalidDate`; anroparen väljer policy.
pub fn decode_due_date(s: &str) -> AppResult<Option<NaiveDateTime>> {
    let s = s.trim();

    let parsed = NaiveDateTime::parse_from_str(s, DUE_DATE_FORMAT).ok().or_else(|| {
        NaiveDate::parse_from_str(s, LEGACY_DUE_DATE_FORMAT)
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    });

    match parsed {
        Some(dt) if Some(dt.date()) == sentinel_day() => Ok(None),
        Some(dt) => Ok(Some(dt)),
        None => Err(AppError::invalid_date(s)),
    }
}

/// Koda en ändringstid för lagring (tom sträng om den saknas)
pub fn encode_modified_date(modified: Option<NaiveDateTime>) -> String {
    modified
        .map(|dt| dt.format(MODIFIED_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Avkoda en lagrad ändringstid
pub fn decode_modified_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), MODIFIED_DATE_FORMAT).ok()
}

/// Aktuell lokal tid, trunkerad till hela sekunder
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Formatera ett datum för visning
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
