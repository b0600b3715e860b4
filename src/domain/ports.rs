use crate::domain::model::{Extraction, Harvest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Writes `data` and returns the location it ended up at.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Discovery, freshness selection and raw sub-page fetches.
    async fn extract(&self) -> Result<Extraction>;
    /// Table extraction from every fetched sub-page.
    async fn transform(&self, extraction: Extraction) -> Result<Harvest>;
    /// Workbook serialisation; returns where the workbook was saved.
    async fn load(&self, harvest: Harvest) -> Result<String>;
}
