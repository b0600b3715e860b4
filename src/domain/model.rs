use chrono::NaiveDateTime;
use std::fmt;

/// Path segment naming one race of a season, e.g. `abou-dhabi`.
///
/// Only lowercase ASCII letters, digits and hyphens are accepted, so a slug
/// can always be spliced into a URL path or a sheet name as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RaceSlug(String);

impl RaceSlug {
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaceSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Network(String),
    Status(u16),
    UnreadableLastModified(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Network(message) => write!(f, "request failed: {}", message),
            SkipReason::Status(code) => write!(f, "HTTP {}", code),
            SkipReason::UnreadableLastModified(raw) => {
                write!(f, "unreadable Last-Modified header: {:?}", raw)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The results page answered. `None` means no `Last-Modified` header,
    /// which ranks below every dated page.
    Fresh { last_modified: Option<NaiveDateTime> },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub slug: RaceSlug,
    pub outcome: ProbeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub slug: RaceSlug,
    pub last_modified: Option<NaiveDateTime>,
    pub probes: Vec<Probe>,
}

/// One HTML table: a header row plus data rows of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn normalize_headers(&mut self) {
        for header in &mut self.headers {
            let trimmed = header.trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// Local time of the run as `YYYYMMDD_HHMM`.
    pub run_timestamp: String,
    pub year: u16,
    pub race_slug: RaceSlug,
}

impl RunRecord {
    pub fn new(year: u16, race_slug: RaceSlug, started_at: NaiveDateTime) -> Self {
        Self {
            run_timestamp: started_at.format("%Y%m%d_%H%M").to_string(),
            year,
            race_slug,
        }
    }

    pub fn output_file_name(&self) -> String {
        format!(
            "statsf1_{}_{}_{}.xlsx",
            self.year, self.race_slug, self.run_timestamp
        )
    }
}

/// Raw body of one sub-page, or why it could not be fetched.
#[derive(Debug, Clone)]
pub struct PageFetch {
    pub page: String,
    pub url: String,
    pub body: std::result::Result<String, String>,
}

#[derive(Debug, Clone)]
pub struct PageHarvest {
    pub page: String,
    pub url: String,
    pub tables: std::result::Result<Vec<Table>, String>,
}

impl PageHarvest {
    pub fn table_count(&self) -> usize {
        self.tables.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub run: RunRecord,
    pub probes: Vec<Probe>,
    pub pages: Vec<PageFetch>,
}

#[derive(Debug, Clone)]
pub struct Harvest {
    pub run: RunRecord,
    pub probes: Vec<Probe>,
    pub pages: Vec<PageHarvest>,
}

impl Harvest {
    pub fn failed_pages(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|p| p.tables.is_err())
            .map(|p| p.page.as_str())
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.pages.iter().map(PageHarvest::table_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_race_slug_charset() {
        assert!(RaceSlug::parse("abou-dhabi").is_some());
        assert!(RaceSlug::parse("grand-prix-2").is_some());
        assert!(RaceSlug::parse("").is_none());
        assert!(RaceSlug::parse("..").is_none());
        assert!(RaceSlug::parse("Las-Vegas").is_none());
        assert!(RaceSlug::parse("sao_paulo").is_none());
        assert!(RaceSlug::parse("são-paulo").is_none());
    }

    #[test]
    fn test_normalize_headers_trims_whitespace() {
        let mut table = Table {
            headers: vec!["  Pos ".to_string(), "Driver".to_string(), "\tTime\n".to_string()],
            rows: vec![],
        };
        table.normalize_headers();
        assert_eq!(table.headers, vec!["Pos", "Driver", "Time"]);
    }

    #[test]
    fn test_output_file_name() {
        let started_at = NaiveDate::from_ymd_opt(2025, 12, 8)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let run = RunRecord::new(2025, RaceSlug::parse("abou-dhabi").unwrap(), started_at);

        assert_eq!(run.run_timestamp, "20251208_0905");
        assert_eq!(run.output_file_name(), "statsf1_2025_abou-dhabi_20251208_0905.xlsx");
    }
}
