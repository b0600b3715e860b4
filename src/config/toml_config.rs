use crate::config::site::SiteConfig;
use crate::utils::error::{HarvestError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Optional overrides read from a TOML file. Every section and key may be
/// omitted; missing values fall back to [`SiteConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub site: Option<SiteSection>,
    pub season: Option<SeasonSection>,
    pub pages: Option<PagesSection>,
    pub timeouts: Option<TimeoutsSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeasonSection {
    pub year: Option<u16>,
    pub anchor_slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagesSection {
    pub results: Option<String>,
    pub harvest: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsSection {
    pub discovery_seconds: Option<u64>,
    pub probe_seconds: Option<u64>,
    pub page_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub directory: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarvestError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values. Unset
    /// variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarvestError::Config {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Layers the values present in this file on top of `base`.
    pub fn apply_to(&self, mut base: SiteConfig) -> SiteConfig {
        if let Some(site) = &self.site {
            if let Some(base_url) = &site.base_url {
                base.base_url = base_url.clone();
            }
            if let Some(user_agent) = &site.user_agent {
                base.user_agent = user_agent.clone();
            }
        }

        if let Some(season) = &self.season {
            if let Some(year) = season.year {
                base.year = year;
            }
            if let Some(anchor_slug) = &season.anchor_slug {
                base.anchor_slug = anchor_slug.clone();
            }
        }

        if let Some(pages) = &self.pages {
            if let Some(results) = &pages.results {
                base.results_page = results.clone();
            }
            if let Some(harvest) = &pages.harvest {
                base.pages = harvest.clone();
            }
        }

        if let Some(timeouts) = &self.timeouts {
            if let Some(secs) = timeouts.discovery_seconds {
                base.discovery_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = timeouts.probe_seconds {
                base.probe_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = timeouts.page_seconds {
                base.page_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(directory) = self.output.as_ref().and_then(|o| o.directory.as_ref()) {
            base.output_dir = directory.clone();
        }

        base
    }
}
