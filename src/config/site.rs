use crate::domain::model::RaceSlug;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.statsf1.com";
pub const DEFAULT_YEAR: u16 = 2025;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
/// A race page known to exist for the season; its menus link to every race.
pub const DEFAULT_ANCHOR_SLUG: &str = "abou-dhabi";
pub const DEFAULT_RESULTS_PAGE: &str = "classement.aspx";
pub const DEFAULT_PAGES: [&str; 8] = [
    "engages.aspx",
    "qualification.aspx",
    "grille.aspx",
    "classement.aspx",
    "en-tete.aspx",
    "meilleur-tour.aspx",
    "tour-par-tour.aspx",
    "championnat.aspx",
];
pub const PAGE_EXTENSION: &str = ".aspx";

/// Immutable settings for one harvesting run.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub base_url: String,
    pub year: u16,
    pub user_agent: String,
    pub anchor_slug: String,
    /// Sub-page probed for freshness and used as the discovery anchor.
    pub results_page: String,
    /// Sub-pages harvested for the selected race, in sheet order.
    pub pages: Vec<String>,
    pub discovery_timeout: Duration,
    pub probe_timeout: Duration,
    pub page_timeout: Duration,
    pub output_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: DEFAULT_YEAR,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            anchor_slug: DEFAULT_ANCHOR_SLUG.to_string(),
            results_page: DEFAULT_RESULTS_PAGE.to_string(),
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
            discovery_timeout: Duration::from_secs(20),
            probe_timeout: Duration::from_secs(15),
            page_timeout: Duration::from_secs(20),
            output_dir: ".".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn race_page_url(&self, slug: &str, page: &str) -> String {
        format!(
            "{}/en/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.year,
            slug,
            page
        )
    }

    pub fn anchor_url(&self) -> String {
        self.race_page_url(&self.anchor_slug, &self.results_page)
    }

    pub fn results_url(&self, slug: &RaceSlug) -> String {
        self.race_page_url(slug.as_str(), &self.results_page)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("site.base_url", &self.base_url)?;
        validation::validate_range("season.year", self.year, 1950, 2100)?;
        validation::validate_non_empty_string("site.user_agent", &self.user_agent)?;

        if RaceSlug::parse(&self.anchor_slug).is_none() {
            return Err(HarvestError::InvalidConfigValue {
                field: "season.anchor_slug".to_string(),
                value: self.anchor_slug.clone(),
                reason: "Slug may only contain lowercase letters, digits and hyphens".to_string(),
            });
        }

        validation::validate_page_name("pages.results", &self.results_page)?;
        if self.pages.is_empty() {
            return Err(HarvestError::InvalidConfigValue {
                field: "pages.harvest".to_string(),
                value: "[]".to_string(),
                reason: "At least one sub-page is required".to_string(),
            });
        }
        for page in &self.pages {
            validation::validate_page_name("pages.harvest", page)?;
        }

        validation::validate_positive_number(
            "timeouts.discovery_seconds",
            self.discovery_timeout.as_secs(),
            1,
        )?;
        validation::validate_positive_number(
            "timeouts.probe_seconds",
            self.probe_timeout.as_secs(),
            1,
        )?;
        validation::validate_positive_number("timeouts.page_seconds", self.page_timeout.as_secs(), 1)?;
        validation::validate_path("output.directory", &self.output_dir)?;

        Ok(())
    }
}
