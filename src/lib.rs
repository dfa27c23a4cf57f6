// src/lib.rs

pub mod askpass;
pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod reactor;
pub mod task;
pub mod transport;
pub mod types;
pub mod writer;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::askpass::DefaultAskpass;
use crate::cli::CliArgs;
use crate::color::Palette;
use crate::config::{load_optional, resolve_settings};
use crate::engine::{Engine, EngineOptions};
use crate::task::Task;
use crate::writer::{FileWriter, OutputWriter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI merging
/// - optional stdin capture for `-I`
/// - the output-file writer
/// - one task per target, driven by the engine on a blocking thread
/// - Ctrl-C handling
///
/// Returns the process exit code derived from the run summary.
pub async fn run(args: CliArgs) -> Result<i32> {
    let raw = load_optional(args.config.as_deref())?;
    let settings = resolve_settings(&args, raw)?;
    info!(
        targets = settings.targets.len(),
        par = settings.parallelism,
        timeout = ?settings.timeout,
        "resolved settings"
    );

    let input: Option<Arc<[u8]>> = if settings.send_input {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("reading stdin for --send-input")?;
        debug!(bytes = buf.len(), "captured stdin for all targets");
        Some(Arc::from(buf))
    } else {
        None
    };

    let file_writer = if settings.outdir.is_some() || settings.errdir.is_some() {
        Some(Arc::new(FileWriter::spawn(
            settings.outdir.clone(),
            settings.errdir.clone(),
        )?))
    } else {
        None
    };
    let writer = file_writer
        .as_ref()
        .map(|w| Arc::clone(w) as Arc<dyn OutputWriter>);

    let palette = Palette::detect();
    let tasks: Vec<Task> = settings
        .targets
        .iter()
        .map(|target| {
            let argv = settings.transport.command_for(target, &settings.command);
            Task::new(
                target.clone(),
                argv,
                settings.task_options.clone(),
                input.clone(),
            )
            .with_palette(palette)
        })
        .collect();

    let options = EngineOptions {
        parallelism: settings.parallelism,
        timeout: settings.timeout,
        ..EngineOptions::default()
    };
    let mut engine = Engine::new(options, writer, Box::new(DefaultAskpass::locate()));

    // Ctrl-C → kill running tasks, cancel the rest.
    let interrupt = engine.interrupt_handle();
    let ctrl_c = tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        interrupt.store(true, Ordering::SeqCst);
    });

    let summary = tokio::task::spawn_blocking(move || {
        let summary = engine.run(tasks);
        if let Some(writer) = file_writer {
            writer.shutdown()?;
        }
        summary
    })
    .await
    .context("engine thread panicked")??;

    ctrl_c.abort();

    let code = summary.exit_code();
    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        code,
        "run complete"
    );
    Ok(code)
}
