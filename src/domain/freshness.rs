use crate::domain::model::{Probe, ProbeOutcome, RaceSlug, SkipReason};
use chrono::NaiveDateTime;

/// Reads an HTTP date such as `Tue, 03 Dec 2025 10:00:00 GMT`.
///
/// The weekday is not cross-checked against the date and the zone token is
/// read as UTC.
pub fn parse_last_modified(value: &str) -> Option<NaiveDateTime> {
    let (weekday, rest) = value.trim().split_once(", ")?;
    if weekday.is_empty() || !weekday.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let (stamp, zone) = rest.trim().rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, "%d %b %Y %H:%M:%S").ok()
}

/// Turns the `Last-Modified` header of a successful probe into an outcome.
/// A missing or blank header leaves the page undated.
pub fn outcome_from_header(last_modified: Option<&str>) -> ProbeOutcome {
    match last_modified.filter(|raw| !raw.trim().is_empty()) {
        None => ProbeOutcome::Fresh {
            last_modified: None,
        },
        Some(raw) => match parse_last_modified(raw) {
            Some(at) => ProbeOutcome::Fresh {
                last_modified: Some(at),
            },
            None => ProbeOutcome::Skipped(SkipReason::UnreadableLastModified(raw.to_string())),
        },
    }
}

/// Picks the probe with the latest timestamp. Skipped probes never win; on a
/// tie the earlier probe is kept.
pub fn select_latest(probes: &[Probe]) -> Option<(&RaceSlug, Option<NaiveDateTime>)> {
    let mut best: Option<(&RaceSlug, Option<NaiveDateTime>)> = None;

    for probe in probes {
        let ProbeOutcome::Fresh { last_modified } = probe.outcome else {
            continue;
        };
        match best {
            Some((_, best_at)) if last_modified <= best_at => {}
            _ => best = Some((&probe.slug, last_modified)),
        }
    }

    best
}
