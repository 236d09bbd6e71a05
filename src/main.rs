use anyhow::Context;
use clap::Parser;
use jumun_match::adapters::seed;
use jumun_match::config::FileConfig;
use jumun_match::core::matcher::MatchEngine;
use jumun_match::domain::model::MatchStatus;
use jumun_match::domain::ports::{AbbreviationWriter, CatalogStore};
use jumun_match::utils::{logger, validation::Validate};
use jumun_match::{CliConfig, ConversionEngine, ConversionSession, MemoryCatalog, RemoteCatalog};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting jumun-match CLI");

    if let Some(path) = config.config.clone() {
        let file = FileConfig::load_from_file(Path::new(&path))
            .with_context(|| format!("failed to load config file {}", path))?;
        config.merge_file(&file);
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let text = read_order_text(&config)?;
    if text.trim().is_empty() {
        anyhow::bail!("order text is empty");
    }

    let session = if let Some(url) = config.catalog_url.clone() {
        tracing::info!("🌐 Using remote catalog at {}", url);
        let catalog = Arc::new(RemoteCatalog::new(url));
        convert(Arc::clone(&catalog), catalog, &text, config.accept_pending).await
    } else {
        let catalog = Arc::new(MemoryCatalog::new());
        let products = seed::load_products_csv(&catalog, Path::new(&config.products_file))
            .await
            .with_context(|| format!("failed to load products from {}", config.products_file))?;
        let abbreviations =
            seed::load_abbreviations_csv(&catalog, Path::new(&config.abbreviations_file))
                .await
                .with_context(|| {
                    format!(
                        "failed to load abbreviations from {}",
                        config.abbreviations_file
                    )
                })?;
        tracing::info!(
            "📚 Loaded {} products and {} seed abbreviations",
            products,
            abbreviations
        );
        convert(Arc::clone(&catalog), catalog, &text, config.accept_pending).await
    };

    report(&session, config.output.as_deref())
}

async fn convert<S, W>(
    store: Arc<S>,
    writer: Arc<W>,
    text: &str,
    accept_pending: bool,
) -> ConversionSession
where
    S: CatalogStore + 'static,
    W: AbbreviationWriter + 'static,
{
    let engine = ConversionEngine::new(MatchEngine::new(store, writer));
    let mut session = engine.run(text).await;

    if accept_pending {
        let pending: Vec<_> = session
            .finalize()
            .into_iter()
            .filter(|line| line.status == MatchStatus::Pending)
            .cloned()
            .collect();
        for line in pending {
            tracing::info!(
                "✅ Accepting similar match for line {} ({}%)",
                line.line_number,
                line.confidence
            );
            let confirmed = engine.matcher().confirm_pending(&line).await;
            session.upsert(confirmed);
        }
    }

    engine.shutdown().await;
    session
}

fn read_order_text(config: &CliConfig) -> anyhow::Result<String> {
    match &config.input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read order text from stdin")?;
            Ok(text)
        }
    }
}

fn report(session: &ConversionSession, output: Option<&str>) -> anyhow::Result<()> {
    let stats = session.stats();
    let pending = session
        .finalize()
        .iter()
        .filter(|l| l.status == MatchStatus::Pending)
        .count();
    let failed = session
        .finalize()
        .iter()
        .filter(|l| l.status == MatchStatus::Failed)
        .count();

    tracing::info!(
        "✅ Conversion finished: {} items ({} auto, {} edited)",
        stats.total_items,
        stats.auto_matched,
        stats.manually_edited
    );
    if pending > 0 {
        tracing::warn!("⚠️ {} similar matches left unconfirmed", pending);
    }
    if failed > 0 {
        tracing::warn!("❌ {} items failed to match and need manual selection", failed);
    }

    let tsv = session.to_tsv();
    match output {
        Some(path) => {
            std::fs::write(path, &tsv).with_context(|| format!("failed to write {}", path))?;
            tracing::info!("📁 Output saved to: {}", path);
            println!("📁 Output saved to: {}", path);
        }
        None => {
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
    }

    Ok(())
}
