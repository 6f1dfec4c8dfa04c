use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use introcar_data::settings::resolve_path;
use introcar_data::{Lookbook, LookbookCsvJob, LookbookProductsJob, LookbookSet, Settings};

use super::percent;
use crate::cli_types::LookbookOutputArgs;
use crate::error::CliError;

/// Resolved output locations and image prefix shared by both lookbook jobs.
struct LookbookOutputs {
    lookbooks: PathBuf,
    hotspot_index: PathBuf,
    image_base_url: String,
}

fn resolve_outputs(
    settings: &Settings,
    out: LookbookOutputArgs,
) -> Result<LookbookOutputs, CliError> {
    let paths = &settings.paths;
    Ok(LookbookOutputs {
        lookbooks: resolve_path(out.output, paths.lookbooks_output.as_ref(), "lookbooks_output")?,
        hotspot_index: resolve_path(
            out.hotspot_index,
            paths.hotspot_index_output.as_ref(),
            "hotspot_index_output",
        )?,
        image_base_url: out
            .image_base_url
            .unwrap_or_else(|| settings.image_base_url()),
    })
}

/// Build lookbooks from the dedicated lookbook CSV.
pub(crate) fn run_lookbooks_csv(
    settings: &Settings,
    input: Option<PathBuf>,
    out: LookbookOutputArgs,
) -> Result<(), CliError> {
    let outputs = resolve_outputs(settings, out)?;
    let job = LookbookCsvJob {
        input: resolve_path(input, settings.paths.lookbook_csv.as_ref(), "lookbook_csv")?,
        lookbooks_output: outputs.lookbooks,
        hotspot_output: outputs.hotspot_index,
        image_base_url: outputs.image_base_url,
    };
    let set = job.run()?;

    log_totals(&set);
    log::info!("{} lookbooks have images", set.with_images());

    log::info!("");
    log::info!(
        "{}",
        "Top 10 most referenced parent SKUs:".if_supports_color(Stdout, |t| t.bold())
    );
    for (sku, refs) in set.hotspots.most_referenced(10) {
        log::info!(
            "   {}: appears in {refs} catalogues",
            sku.if_supports_color(Stdout, |t| t.cyan())
        );
    }

    if let Some(sample) = set.lookbooks.first() {
        log::info!("");
        log::info!("{}", "Sample lookbook:".if_supports_color(Stdout, |t| t.bold()));
        log_sample(sample);
    }
    Ok(())
}

/// Build lookbooks from the product export, with optional CSV image mapping.
pub(crate) fn run_lookbooks_products(
    settings: &Settings,
    products: Option<PathBuf>,
    image_map: Option<PathBuf>,
    out: LookbookOutputArgs,
) -> Result<(), CliError> {
    let outputs = resolve_outputs(settings, out)?;
    let job = LookbookProductsJob {
        products: resolve_path(
            products,
            settings.paths.products_json.as_ref(),
            "products_json",
        )?,
        image_map_csv: image_map.or_else(|| settings.paths.image_map_csv.clone()),
        lookbooks_output: outputs.lookbooks,
        hotspot_output: outputs.hotspot_index,
        image_base_url: outputs.image_base_url,
    };
    let outcome = job.run()?;
    let set = &outcome.set;

    log::info!("Loaded {} products", outcome.products_loaded);
    log::info!("Found {} lookbook products", set.len());
    if job.image_map_csv.is_some() {
        log::info!("Loaded {} image mappings from CSV", outcome.image_mappings);
    }

    log::info!("");
    log_totals(set);

    let total = set.len();
    log::info!("");
    log::info!("{}", "Coverage stats:".if_supports_color(Stdout, |t| t.bold()));
    for (count, label) in [
        (set.with_images(), "have images"),
        (set.with_fitment(), "have fitment data"),
        (set.with_category(), "have categories"),
    ] {
        log::info!(
            "   {count} lookbooks {label} ({:.1}%)",
            percent(count, total)
        );
    }

    log::info!("");
    log::info!("Unique makes: {}", set.unique_makes().join(", "));
    log::info!("Unique categories: {}", set.unique_categories().join(", "));

    let sample = set
        .lookbooks
        .iter()
        .find(|l| {
            l.metadata
                .as_ref()
                .is_some_and(|m| !m.fitment.is_empty() && m.category.is_some())
        })
        .or_else(|| set.lookbooks.first());
    if let Some(sample) = sample {
        log::info!("");
        log::info!(
            "{}",
            "Sample lookbook with metadata:".if_supports_color(Stdout, |t| t.bold())
        );
        log_sample(sample);
    }
    Ok(())
}

fn log_totals(set: &LookbookSet) {
    let check = "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string();
    log::info!("{check} Processed {} lookbooks/catalogues", set.len());
    log::info!(
        "{check} Created hotspot index with {} unique parent SKUs",
        set.hotspots.len()
    );
}

fn log_sample(lookbook: &Lookbook) {
    log::info!("   ID: {}", lookbook.id);
    log::info!("   Title: {}", lookbook.title);
    log::info!(
        "   Image: {}",
        lookbook.image_url.as_deref().unwrap_or("(none)")
    );
    if let Some(meta) = &lookbook.metadata {
        let more = if meta.models.len() > 3 { ", ..." } else { "" };
        log::info!("   Makes: {}", meta.makes.join(", "));
        log::info!("   Models: {}{more}", meta.models[..meta.models.len().min(3)].join(", "));
        log::info!(
            "   Category: {}/{}",
            meta.category.as_deref().unwrap_or("-"),
            meta.subcategory.as_deref().unwrap_or("-")
        );
        log::info!("   Fitment entries: {}", meta.fitment.len());
    }
    log::info!("   Hotspots: {} parts", lookbook.hotspot_count);
}
