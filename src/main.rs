use chrono::Utc;
use clap::Parser;
use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod agents;
mod cli;
mod config;
mod errors;
mod fence;
mod gateway;
mod materialize;
mod memory;
mod planner;
mod prompt;
mod provider;
mod safety;
mod update;
mod ux;
mod wire;

use agents::ContentGenerator;
use gateway::Gateway;
use materialize::Materializer;
use memory::MemoryStore;
use planner::Planner;
use update::Updater;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_args(&args);

    let run_id = Uuid::new_v4();
    tracing::debug!(%run_id, provider = ?cfg.provider, model = %cfg.model, "starting");
    run(args, cfg, run_id)
        .instrument(tracing::info_span!("run", id = %run_id))
        .await
}

async fn run(args: cli::Args, cfg: config::Config, run_id: Uuid) -> anyhow::Result<()> {
    let prov = provider::make_provider(&cfg)?;
    let gw = Gateway::new(prov, &cfg);
    let notes = MemoryStore::new(&cfg.notes_path);

    // ===== PHASE 1: PLAN =====
    let project = match args.project {
        Some(p) => p,
        None => ux::prompt_line("Enter the project description:"),
    };

    println!("Fresh is generating the task plan...");
    let plan = Planner::new(&gw).plan(&project).await;
    println!("Task plan generated:");
    ux::print_plan_json(&plan);
    ux::show_plan(&plan);

    // ===== PHASE 2: GENERATE =====
    if let Err(e) = fs::create_dir_all(&cfg.project_dir) {
        tracing::warn!(error = %e, "could not create project directory");
    }
    println!("Generating files from the plan...");
    let gen = ContentGenerator::new(&gw);
    let generated = Materializer::new(&gen)
        .with_progress(!args.no_progress)
        .materialize(&plan, &cfg.project_dir, &project)
        .await;
    ux::print_materialize_dashboard(&generated);
    println!("The project was generated in '{}'.", cfg.project_dir.display());

    // ===== PHASE 3: UPDATE (optional) =====
    let source = if let Some(p) = args.update {
        Some(p)
    } else if args.no_update {
        None
    } else if ux::confirm("Do you want to update an existing project?") {
        Some(ux::prompt_line("Enter the path of the project to update:"))
    } else {
        None
    };

    if let Some(src) = source.filter(|s| !s.is_empty()) {
        let src = PathBuf::from(src);
        if src.is_dir() {
            let updated = Updater::new(&gen, &cfg.update_exclude)
                .with_progress(!args.no_progress)
                .update_tree(&src, &cfg.updated_dir)
                .await;
            ux::print_update_dashboard(&updated);
            println!("The updated project was generated in '{}'.", cfg.updated_dir.display());
        } else {
            let msg = format!("Error reading {}: not a directory", src.display());
            tracing::warn!("{msg}");
            gw.memory().record(&msg);
            println!("{msg}");
        }
    }

    notes.record(&memory::closing_note(&project, run_id, Utc::now()));
    println!(
        "History saved in '{}' and notes in '{}'.",
        gw.memory().path().display(),
        notes.path().display()
    );
    Ok(())
}
