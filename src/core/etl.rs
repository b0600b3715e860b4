use crate::core::Pipeline;
use crate::utils::error::Result;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: String,
    pub race_slug: String,
    pub tables_written: usize,
    /// Sub-pages that could not be fetched or parsed.
    pub failed_pages: Vec<String>,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty()
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting harvest");

        let extraction = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Fetched {} sub-pages for {}",
            extraction.pages.iter().filter(|p| p.body.is_ok()).count(),
            extraction.run.race_slug
        );

        let harvest = self.pipeline.transform(extraction).await?;
        let race_slug = harvest.run.race_slug.to_string();
        let tables_written = harvest.table_count();
        let failed_pages: Vec<String> = harvest
            .failed_pages()
            .into_iter()
            .map(str::to_string)
            .collect();
        tracing::info!("🔧 Extracted {} tables", tables_written);
        for page in &failed_pages {
            tracing::warn!("⚠️ {} produced no data", page);
        }

        let output_path = self.pipeline.load(harvest).await?;
        tracing::info!("📁 Workbook saved to {}", output_path);

        Ok(RunReport {
            output_path,
            race_slug,
            tables_written,
            failed_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Extraction, Harvest};
    use crate::domain::model::{PageFetch, PageHarvest, RaceSlug, RunRecord, Table};
    use chrono::NaiveDate;

    struct MockPipeline;

    fn run_record() -> RunRecord {
        let started_at = NaiveDate::from_ymd_opt(2025, 12, 8)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        RunRecord::new(2025, RaceSlug::parse("abou-dhabi").unwrap(), started_at)
    }

    #[async_trait::async_trait]
    impl Pipeline for MockPipeline {
        async fn extract(&self) -> Result<Extraction> {
            Ok(Extraction {
                run: run_record(),
                probes: vec![],
                pages: vec![
                    PageFetch {
                        page: "grille.aspx".to_string(),
                        url: "http://test/grille.aspx".to_string(),
                        body: Ok(String::new()),
                    },
                    PageFetch {
                        page: "championnat.aspx".to_string(),
                        url: "http://test/championnat.aspx".to_string(),
                        body: Err("timed out".to_string()),
                    },
                ],
            })
        }

        async fn transform(&self, extraction: Extraction) -> Result<Harvest> {
            let pages = extraction
                .pages
                .into_iter()
                .map(|fetch| PageHarvest {
                    page: fetch.page,
                    url: fetch.url,
                    tables: fetch.body.map(|_| vec![Table::default(), Table::default()]),
                })
                .collect();
            Ok(Harvest {
                run: extraction.run,
                probes: extraction.probes,
                pages,
            })
        }

        async fn load(&self, harvest: Harvest) -> Result<String> {
            Ok(harvest.run.output_file_name())
        }
    }

    #[tokio::test]
    async fn test_run_reports_partial_harvest() {
        let report = EtlEngine::new(MockPipeline).run().await.unwrap();

        assert_eq!(report.output_path, "statsf1_2025_abou-dhabi_20251208_1230.xlsx");
        assert_eq!(report.race_slug, "abou-dhabi");
        assert_eq!(report.tables_written, 2);
        assert_eq!(report.failed_pages, vec!["championnat.aspx"]);
        assert!(report.is_partial());
    }
}
