use clap::Parser;
use statsf1_harvest::utils::{logger, validation::Validate};
use statsf1_harvest::{CliConfig, EtlEngine, HarvestError, HarvestPipeline, LocalStorage};
use std::path::Path;

fn exit_with(e: &HarvestError) -> ! {
    tracing::error!(
        "❌ Harvest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    let site = match cli.site_config() {
        Ok(site) => site,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = site.validate() {
        exit_with(&e);
    }
    tracing::debug!("Resolved configuration: {:?}", site);

    let storage = LocalStorage::new(site.output_dir.clone());
    let pipeline = match HarvestPipeline::new(storage, site) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN - discovery and selection only");
        let selection = match pipeline.discover().await {
            Ok(candidates) => pipeline.select(candidates).await,
            Err(e) => Err(e),
        };
        match selection {
            Ok(selection) => {
                println!("Latest race: {}", selection.slug);
                for page in &pipeline.config().pages {
                    println!(
                        "  {}",
                        pipeline.config().race_page_url(selection.slug.as_str(), page)
                    );
                }
            }
            Err(e) => exit_with(&e),
        }
        return;
    }

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(report) => {
            let saved = std::fs::canonicalize(&report.output_path)
                .unwrap_or_else(|_| Path::new(&report.output_path).to_path_buf());
            for page in &report.failed_pages {
                eprintln!("⚠️ {} could not be harvested, see the RunLog sheet", page);
            }
            println!("Saved: {}", saved.display());
            if report.is_partial() {
                std::process::exit(2);
            }
        }
        Err(e) => exit_with(&e),
    }
}
