use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod annotate;
mod config;
mod cycle;
mod guard;
mod scheduler;
mod session;
mod uploader;

use config::{CameraBackend, Cli, Config};
use guard::CycleGuard;
use lapse_hw::SimCamera;
use session::Session;
use uploader::Uploader;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;

    tracing::info!(
        root = %cfg.root.display(),
        interval_secs = cfg.interval_secs,
        upload = cfg.upload,
        mode = %cfg.initial_mode,
        "lapsed starting"
    );

    std::fs::create_dir_all(&cfg.root)
        .with_context(|| format!("creating capture root {}", cfg.root.display()))?;
    std::fs::create_dir_all(cfg.root.join(lapse_core::archive::NOON_DIR))?;
    std::fs::create_dir_all(cfg.root.join(lapse_core::archive::VIDEO_DIR))?;

    let camera = match cfg.backend {
        CameraBackend::Sim => SimCamera::new(cfg.preset),
    };
    let uploader = Uploader::new(cfg.upload_host.clone(), cfg.credential_file.clone());
    let guard = CycleGuard::new();
    let mut session = Session::new(cfg, camera);

    cycle::run_warmup(&mut session).await;

    if cli.oneshot {
        // Nothing else can hold the permit before the scheduler starts.
        let _permit = guard.try_enter().expect("guard free at startup");
        cycle::run_cycle(&mut session, &uploader).await;
        return Ok(());
    }

    let interval = session.cfg.interval();
    let (ticks_tx, mut ticks_rx) = mpsc::channel(1);
    let _ticker = scheduler::spawn_ticker(interval, guard, ticks_tx);

    // Single consumer: the cycle body never runs on two contexts at once.
    let _worker = tokio::spawn(async move {
        while let Some(permit) = ticks_rx.recv().await {
            cycle::run_cycle(&mut session, &uploader).await;
            drop(permit);
        }
    });

    // Runs until interrupted. An in-flight cycle is abandoned; partial
    // files are acceptable.
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received; exiting");
    Ok(())
}
