use crate::adapters::http::SiteClient;
use crate::adapters::workbook::{check_table_fits, WorkbookWriter};
use crate::config::SiteConfig;
use crate::domain::freshness::select_latest;
use crate::domain::model::{
    Extraction, Harvest, PageFetch, PageHarvest, Probe, ProbeOutcome, RaceSlug, RunRecord,
    Selection, Table,
};
use crate::domain::ports::{Pipeline, Storage};
use crate::domain::sheet_name::table_sheet_name;
use crate::domain::slugs::discover_slugs;
use crate::domain::tables::extract_tables;
use crate::utils::error::{HarvestError, Result};
use chrono::Local;

/// Harvests the most recently updated race of one season.
pub struct HarvestPipeline<S: Storage> {
    storage: S,
    config: SiteConfig,
    client: SiteClient,
}

impl<S: Storage> HarvestPipeline<S> {
    pub fn new(storage: S, config: SiteConfig) -> Result<Self> {
        let client = SiteClient::new(&config.user_agent)?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Reads the anchor page and returns the sorted race slugs it links to.
    pub async fn discover(&self) -> Result<Vec<RaceSlug>> {
        let url = self.config.anchor_url();
        tracing::info!("🔎 Discovering races from {}", url);

        let html = self
            .client
            .fetch_page(&url, self.config.discovery_timeout)
            .await?;
        let slugs = discover_slugs(&html, self.config.year)?;

        if slugs.is_empty() {
            return Err(HarvestError::NoCandidates { url });
        }

        tracing::info!("📋 Found {} candidate races", slugs.len());
        Ok(slugs)
    }

    /// Probes every candidate's results page and keeps the freshest one.
    pub async fn select(&self, candidates: Vec<RaceSlug>) -> Result<Selection> {
        let mut probes = Vec::with_capacity(candidates.len());

        for slug in candidates {
            let url = self.config.results_url(&slug);
            let outcome = self.client.probe(&url, self.config.probe_timeout).await;
            match &outcome {
                ProbeOutcome::Fresh { last_modified } => {
                    tracing::debug!("Probe {}: last modified {:?}", slug, last_modified)
                }
                ProbeOutcome::Skipped(reason) => {
                    tracing::debug!("Probe {} skipped: {}", slug, reason)
                }
            }
            probes.push(Probe { slug, outcome });
        }

        let Some((slug, last_modified)) = select_latest(&probes) else {
            return Err(HarvestError::NoLatestRace {
                year: self.config.year,
                candidates: probes.len(),
            });
        };
        let (slug, last_modified) = (slug.clone(), last_modified);

        match last_modified {
            Some(at) => tracing::info!("🏁 Latest race: {} (modified {})", slug, at),
            None => tracing::info!("🏁 Latest race: {} (no modification date)", slug),
        }

        Ok(Selection {
            slug,
            last_modified,
            probes,
        })
    }

    async fn fetch_pages(&self, slug: &RaceSlug) -> Vec<PageFetch> {
        let mut fetches = Vec::with_capacity(self.config.pages.len());

        for page in &self.config.pages {
            let url = self.config.race_page_url(slug.as_str(), page);
            let body = match self.client.fetch_page(&url, self.config.page_timeout).await {
                Ok(body) => Ok(body),
                Err(e) => {
                    tracing::warn!("⚠️ Could not fetch {}: {}", url, e);
                    Err(e.to_string())
                }
            };
            fetches.push(PageFetch {
                page: page.clone(),
                url,
                body,
            });
        }

        fetches
    }
}

/// A page whose tables cannot all be written fails as a whole.
fn fit_on_sheets(tables: Vec<Table>) -> std::result::Result<Vec<Table>, String> {
    for (index, table) in tables.iter().enumerate() {
        check_table_fits(table).map_err(|reason| format!("table {}: {}", index + 1, reason))?;
    }
    Ok(tables)
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for HarvestPipeline<S> {
    async fn extract(&self) -> Result<Extraction> {
        let candidates = self.discover().await?;
        let selection = self.select(candidates).await?;

        let run = RunRecord::new(
            self.config.year,
            selection.slug.clone(),
            Local::now().naive_local(),
        );
        let pages = self.fetch_pages(&selection.slug).await;

        Ok(Extraction {
            run,
            probes: selection.probes,
            pages,
        })
    }

    async fn transform(&self, extraction: Extraction) -> Result<Harvest> {
        let pages = extraction
            .pages
            .into_iter()
            .map(|fetch| {
                let tables = fetch.body.and_then(|html| {
                    extract_tables(&html)
                        .map(|mut tables| {
                            tables.iter_mut().for_each(|t| t.normalize_headers());
                            tables
                        })
                        .map_err(|e| e.to_string())
                        .and_then(fit_on_sheets)
                });
                match &tables {
                    Ok(found) => tracing::debug!("{}: {} tables", fetch.page, found.len()),
                    Err(reason) => tracing::debug!("{}: no tables ({})", fetch.page, reason),
                }
                PageHarvest {
                    page: fetch.page,
                    url: fetch.url,
                    tables,
                }
            })
            .collect();

        Ok(Harvest {
            run: extraction.run,
            probes: extraction.probes,
            pages,
        })
    }

    async fn load(&self, harvest: Harvest) -> Result<String> {
        let mut writer = WorkbookWriter::new();
        writer.write_run_log(&harvest)?;

        let slug = harvest.run.race_slug.as_str();
        for page in &harvest.pages {
            let Ok(tables) = &page.tables else {
                continue;
            };
            for (index, table) in tables.iter().enumerate() {
                let name = table_sheet_name(slug, &page.page, index + 1);
                writer.write_table(&name, table)?;
            }
        }

        tracing::debug!("Serialising {} sheets", writer.sheet_names().len());
        let bytes = writer.finish()?;
        let file_name = harvest.run.output_file_name();
        let saved_to = self.storage.write_file(&file_name, &bytes).await?;

        tracing::debug!("Workbook written ({} bytes)", bytes.len());
        Ok(saved_to)
    }
}
