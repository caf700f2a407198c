//! Status command - layer and annotation counts for a dataset.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use stratum::Dataset;

#[derive(Serialize)]
struct LayerStatus {
    id: String,
    enabled: bool,
    entities: usize,
    annotations: usize,
}

pub fn run(
    dataset: PathBuf,
    json: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dataset.exists() {
        return Err(format!("Dataset not found: {}", dataset.display()).into());
    }

    let loaded = Dataset::load(&dataset)?;

    let statuses: Vec<LayerStatus> = loaded
        .layers
        .iter()
        .map(|layer| LayerStatus {
            id: layer.id.as_str().to_string(),
            enabled: layer.enabled,
            entities: layer.entities.len(),
            annotations: layer.annotation_count(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("{} {}", "Dataset:".cyan().bold(), dataset.display());
    println!();

    for status in &statuses {
        let state = if status.enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        };
        println!(
            "  {} [{}] - {} entities, {} annotations",
            status.id.white().bold(),
            state,
            status.entities,
            status.annotations
        );
    }

    println!();
    println!(
        "{} {} layers, {} entities",
        "Total:".cyan().bold(),
        statuses.len(),
        statuses.iter().map(|s| s.entities).sum::<usize>()
    );

    Ok(())
}
