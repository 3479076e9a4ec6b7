use crate::{MergeCommand, MergeUpdate, StatusStore, TaskId};
use invoice_merge::{MergeOptions, ProgressReport, calculate_statistics, validate_inputs};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Async worker task that processes merge commands and sends updates.
///
/// Commands are handled one at a time, in the order received. The task
/// ends when every command sender has been dropped.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<MergeCommand>,
    update_tx: mpsc::UnboundedSender<MergeUpdate>,
    store: StatusStore,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &update_tx, &store).await;
    }

    log::debug!("Command channel closed, worker stopping");
}

async fn process_command(
    cmd: MergeCommand,
    update_tx: &mpsc::UnboundedSender<MergeUpdate>,
    store: &StatusStore,
) {
    match cmd {
        MergeCommand::Merge {
            task_id,
            inputs,
            output,
            options,
        } => {
            handle_merge(task_id, inputs, output, options, update_tx, store).await;
        }
        MergeCommand::CalculateStats { inputs, options } => {
            handle_calculate_stats(inputs, options, update_tx);
        }
        MergeCommand::LoadConfig { path } => {
            handle_load_config(path, update_tx).await;
        }
    }
}

async fn handle_merge(
    task_id: TaskId,
    inputs: Vec<PathBuf>,
    output: PathBuf,
    options: MergeOptions,
    update_tx: &mpsc::UnboundedSender<MergeUpdate>,
    store: &StatusStore,
) {
    log::info!("Task {}: merging {} files", task_id, inputs.len());
    store.insert_pending(task_id, inputs.len());

    let progress_store = store.clone();
    let progress_tx = update_tx.clone();
    let on_progress = move |report: &ProgressReport| {
        progress_store.record_progress(task_id, report);
        let _ = progress_tx.send(MergeUpdate::Progress {
            task_id,
            report: report.clone(),
        });
    };

    match invoice_merge::merge(inputs, output.clone(), options, on_progress).await {
        Ok(report) => {
            log::info!(
                "Task {}: wrote {} pages to {}",
                task_id,
                report.output_pages,
                output.display()
            );
            store.complete(task_id, &report);
            let _ = update_tx.send(MergeUpdate::Completed { task_id, report });
        }
        Err(e) => {
            let message = format!("Merge failed: {}", e);
            log::error!("Task {}: {}", task_id, message);
            store.fail(task_id, message.clone());
            let _ = update_tx.send(MergeUpdate::Error {
                task_id: Some(task_id),
                message,
            });
        }
    }
}

fn handle_calculate_stats(
    inputs: Vec<PathBuf>,
    options: MergeOptions,
    update_tx: &mpsc::UnboundedSender<MergeUpdate>,
) {
    let result = validate_inputs(&inputs)
        .and_then(|documents| calculate_statistics(documents.len(), &options));

    match result {
        Ok(stats) => {
            let _ = update_tx.send(MergeUpdate::StatsCalculated { stats });
        }
        Err(e) => {
            log::warn!("Statistics unavailable: {}", e);
            let _ = update_tx.send(MergeUpdate::Error {
                task_id: None,
                message: format!("Failed to calculate statistics: {}", e),
            });
        }
    }
}

async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<MergeUpdate>) {
    match MergeOptions::load(&path).await {
        Ok(options) => {
            log::info!("Loaded configuration from {}", path.display());
            let _ = update_tx.send(MergeUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}", path.display(), e);
            let _ = update_tx.send(MergeUpdate::Error {
                task_id: None,
                message: format!("Failed to load config: {}", e),
            });
        }
    }
}
