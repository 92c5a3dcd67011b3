use anyhow::{Context, Result};

use kerpic::config::ClientConfig;
use kerpic::model::{FolderInfo, ImageRef};
use kerpic::remote::{ImageService, RemoteClient};
use kerpic::replay::{ReplayReport, replay};

use crate::Commands;

pub(crate) fn handle_command(command: Commands, config: &ClientConfig) -> Result<()> {
    match command {
        Commands::Folders { json } => {
            let client = RemoteClient::new(&config.server_url)?;
            let folders = client.list_folders()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&folders).context("serialize folders json")?
                );
            } else {
                for folder in &folders {
                    print_tree(folder, 0);
                }
            }
        }
        Commands::Images { folder, json } => {
            let client = RemoteClient::new(&config.server_url)?;
            let images = client.list_images(&folder)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&images).context("serialize images json")?
                );
            } else if images.is_empty() {
                println!("No images");
            } else {
                for img in images {
                    println!("{}\t{}\t{}", img.path, img.size, img.mod_time);
                }
            }
        }
        Commands::Replay { keys, json, images } => {
            let images: Vec<ImageRef> = images.into_iter().map(ImageRef::from).collect();
            let keys: Vec<String> = keys.split_whitespace().map(str::to_string).collect();
            let report = replay(&images, &keys, &config.keys)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("serialize replay json")?
                );
            } else {
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn print_tree(folder: &FolderInfo, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}/ ({} images)", indent, folder.name, folder.images.len());
    for sub in &folder.subfolders {
        print_tree(sub, depth + 1);
    }
}

fn print_report(report: &ReplayReport) {
    for step in &report.steps {
        let command = step.command.as_deref().unwrap_or("-");
        match &step.error {
            Some(err) => println!("{:<12} {:<18} error: {}", step.key, command, err),
            None => {
                let best = step.best.as_ref().map_or("-", ImageRef::as_str);
                let candidate = step.candidate.as_ref().map_or("-", ImageRef::as_str);
                println!(
                    "{:<12} {:<18} best={} candidate={}",
                    step.key, command, best, candidate
                );
            }
        }
    }

    let s = &report.summary;
    let list = |v: &[ImageRef]| {
        v.iter().map(ImageRef::as_str).collect::<Vec<_>>().join(", ")
    };
    println!("winner: {}", s.winner);
    println!("saved: {}", list(&s.saved));
    println!("rejected: {}", list(&s.rejected));
    println!("remaining: {}", list(&s.remaining));
    println!("resolved: {}", s.resolved);
    println!("decisions: {}", s.decisions);
}
