//! Run command - execute the patch pipelines and write the override layer.

use std::path::PathBuf;

use colored::Colorize;
use stratum::{Dataset, EngineReport, PatchEngine, StageReport};

use crate::manifest::PatchManifest;

pub fn run(
    dataset: PathBuf,
    manifest: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dataset.exists() {
        return Err(format!("Dataset not found: {}", dataset.display()).into());
    }

    let manifest = PatchManifest::load(&manifest)?;
    let store = Dataset::load(&dataset)?.into_store();

    let engine =
        PatchEngine::new(manifest.engine_config()).with_registry(manifest.build_registry());
    let outcome = engine.run(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print_report(&outcome.report, verbose);
    }

    let output_path = output.unwrap_or_else(|| {
        let stem = dataset.file_stem().unwrap_or_default().to_string_lossy();
        dataset.with_file_name(format!("{}.patch.json", stem))
    });
    outcome.overrides.save(&output_path)?;

    if !json {
        println!();
        println!(
            "{} override layer to: {}",
            "Wrote".green().bold(),
            output_path.display().to_string().cyan()
        );
    }

    Ok(())
}

fn print_report(report: &EngineReport, verbose: bool) {
    println!(
        "{} plugins: [{}]",
        "Active".cyan().bold(),
        report.contributors.join(", ")
    );

    for stage in &report.stages {
        print_stage(stage, verbose);
    }

    println!();
    println!(
        "{} {} overrides, {} annotations added",
        "Created".green().bold(),
        report.overrides_created.to_string().white().bold(),
        report.annotations_added().to_string().white().bold()
    );
}

fn print_stage(stage: &StageReport, verbose: bool) {
    if verbose {
        println!(
            "{} stage '{}': {} entities examined",
            "Running".cyan(),
            stage.stage,
            stage.examined
        );
    }

    for patched in &stage.patched {
        let label = patched.label.as_deref().unwrap_or("-");
        println!(
            "{} entity {} ({})",
            "Patched".green(),
            patched.id.to_string().white().bold(),
            label
        );
        for index in &patched.indices {
            println!("  added annotation to sub-entity {}", index);
        }
    }

    for id in &stage.unresolved {
        println!(
            "{} unable to resolve record {}, skipped",
            "Warning:".yellow().bold(),
            id
        );
    }

    for id in &stage.layout_mismatches {
        println!(
            "{} entity {} does not mirror the canonical layout, skipped",
            "Warning:".yellow().bold(),
            id
        );
    }
}
