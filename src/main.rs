#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sherlock_files::app::SherlockFilesApp;
use sherlock_files::scanner::scan;

#[derive(Parser, Debug)]
#[command(name = "sherlockfiles")]
#[command(about = "Find files whose path contains a keyword")]
struct Args {
    #[arg(default_value = "")]
    keyword: String,
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[arg(long, default_value_t = false)]
    cli: bool,
}

fn run_cli(args: &Args) -> Result<()> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("failed to canonicalize root {}", args.root.display()))?;
    let keyword = args.keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("enter a keyword to search");
    }

    for path in scan(&root, keyword, || false) {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_gui(args: &Args) -> Result<()> {
    let folder = args.root.canonicalize().ok();
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport =
        eframe::egui::ViewportBuilder::default().with_inner_size(eframe::egui::vec2(600.0, 400.0));
    let keyword = args.keyword.clone();

    eframe::run_native(
        "Sherlock Files",
        native_options,
        Box::new(move |_cc| Ok(Box::new(SherlockFilesApp::new(folder, keyword)))),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if args.cli {
        run_cli(&args)
    } else {
        run_gui(&args)
    }
}
