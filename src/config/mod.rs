pub mod cli;
pub mod site;
pub mod toml_config;

pub use site::SiteConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "statsf1-harvest")]
#[command(about = "Export the tables of the latest statsf1.com race into an xlsx workbook")]
pub struct CliConfig {
    /// Season to harvest
    #[arg(long)]
    pub year: Option<u16>,

    /// Site root, e.g. https://www.statsf1.com
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory the workbook is written to
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Discover and select the race, then stop before harvesting
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Resolves defaults, then the TOML file, then command line flags.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let mut site = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.apply_to(SiteConfig::default()),
            None => SiteConfig::default(),
        };

        if let Some(year) = self.year {
            site.year = year;
        }
        if let Some(base_url) = &self.base_url {
            site.base_url = base_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            site.output_dir = output_dir.clone();
        }

        Ok(site)
    }
}
