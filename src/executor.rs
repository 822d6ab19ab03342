use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::batch::{Action, Batch, OperationStatus, PlannedOperation};
use crate::error::MutationError;
use crate::fs_ops::rename_no_clobber;
use crate::tag_writer::{LoftyTagWriter, TagWriter};

/// What happened to one operation during an execution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Dry run: the mutation that would have been performed.
    Simulated { description: String },
    Succeeded { description: String },
    Failed { reason: String },
    Skipped { reason: String },
    /// A stop was requested before this item was reached.
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeEvent {
    pub index: usize,
    pub source: PathBuf,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub simulated: usize,
    pub not_run: usize,
    pub stopped: bool,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Simulated { .. } => self.simulated += 1,
            Outcome::Succeeded { .. } => self.succeeded += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::NotRun => self.not_run += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    Item(OutcomeEvent),
    Finished(Summary),
}

/// Lets a caller ask the executor to stop before its next item.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Applies a planned [`Batch`], one operation at a time, in plan order.
pub struct Executor<W: TagWriter> {
    tag_writer: W,
}

impl Executor<LoftyTagWriter> {
    pub fn with_lofty() -> Self {
        Self::new(LoftyTagWriter::new())
    }
}

impl<W: TagWriter> Executor<W> {
    pub fn new(tag_writer: W) -> Self {
        Self { tag_writer }
    }

    pub fn tag_writer(&self) -> &W {
        &self.tag_writer
    }

    /// Runs every operation of `batch`, reporting each through `on_event`
    /// followed by a final [`ExecutionEvent::Finished`].
    ///
    /// In dry-run mode nothing is mutated and statuses stay `Planned`.
    /// In commit mode each `Planned` operation becomes `Succeeded` or
    /// `Failed`; a failure never stops the remaining items.
    pub fn execute<F>(&self, batch: &mut Batch, dry_run: bool, stop: &StopSignal, mut on_event: F) -> Summary
    where
        F: FnMut(ExecutionEvent),
    {
        let mut summary = Summary {
            total: batch.operations.len(),
            ..Summary::default()
        };

        info!(total = summary.total, dry_run, "Executing batch");

        for (index, op) in batch.operations.iter_mut().enumerate() {
            if !summary.stopped && stop.is_stop_requested() {
                warn!("Stop requested; remaining items will not run");
                summary.stopped = true;
            }

            let outcome = self.run_one(op, dry_run, summary.stopped);
            summary.record(&outcome);
            on_event(ExecutionEvent::Item(OutcomeEvent {
                index,
                source: op.source.clone(),
                outcome,
            }));
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            simulated = summary.simulated,
            not_run = summary.not_run,
            "Batch finished"
        );
        on_event(ExecutionEvent::Finished(summary.clone()));
        summary
    }

    fn run_one(&self, op: &mut PlannedOperation, dry_run: bool, stopped: bool) -> Outcome {
        match &op.status {
            OperationStatus::Skipped(reason) => {
                return Outcome::Skipped {
                    reason: reason.clone(),
                };
            }
            // a previous pass already settled these
            OperationStatus::Succeeded => {
                return Outcome::Succeeded {
                    description: op.describe(),
                };
            }
            OperationStatus::Failed(reason) => {
                return Outcome::Failed {
                    reason: reason.clone(),
                };
            }
            OperationStatus::Planned => {}
        }

        if stopped {
            return Outcome::NotRun;
        }

        let description = op.describe();
        if dry_run {
            info!("Dry-run: would {}", description);
            return Outcome::Simulated { description };
        }

        match self.apply(op) {
            Ok(()) => {
                info!("Processed: {}", description);
                op.status = OperationStatus::Succeeded;
                Outcome::Succeeded { description }
            }
            Err(e) => {
                let reason = e.to_string();
                error!("Failed to {}: {}", description, reason);
                op.status = OperationStatus::Failed(reason.clone());
                Outcome::Failed { reason }
            }
        }
    }

    fn apply(&self, op: &PlannedOperation) -> Result<(), MutationError> {
        match &op.action {
            Some(Action::Rename { target }) => rename_no_clobber(&op.source, target),
            Some(Action::WriteTags { tags }) => self.tag_writer.write_tags(&op.source, tags),
            None => Err(MutationError::NoAction(op.source.clone())),
        }
    }
}

/// Runs [`Executor::execute`] on a blocking worker thread.
///
/// Events arrive on the receiver in plan order; the handle resolves to the
/// executed batch and its summary once the last item is done.
pub fn spawn_execution<W>(
    executor: Executor<W>,
    mut batch: Batch,
    dry_run: bool,
    stop: StopSignal,
) -> (JoinHandle<(Batch, Summary)>, UnboundedReceiver<ExecutionEvent>)
where
    W: TagWriter + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::task::spawn_blocking(move || {
        let summary = executor.execute(&mut batch, dry_run, &stop, |event| {
            // the caller may stop listening; the batch still runs to the end
            let _ = tx.send(event);
        });
        (batch, summary)
    });

    (handle, rx)
}
