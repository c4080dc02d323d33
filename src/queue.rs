//! In-process queue for contact deletions.
//!
//! `/unsubscribe` only enqueues a `DeletionJob` and answers, a single worker task
//! drains the queue in order. The worker is idempotent: a contact that can no longer
//! be found counts as already removed.

use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{error, info};

use crate::contacts_client::{self, ContactsClient};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionJob {
    pub email: String,
}

/// The sending half, cheap to clone into every handler.
#[derive(Debug, Clone)]
pub struct DeletionQueue {
    sender: mpsc::Sender<DeletionJob>,
}

/// Handle to the worker task. It stops once every `DeletionQueue` is dropped
/// and the remaining jobs are processed.
#[derive(Debug)]
pub struct DeletionWorker {
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Deleted,
    AlreadyAbsent,
    Failed,
}

// ###################################
// ->   IMPLs
// ###################################
/// Creates a queue holding up to `capacity` jobs and spawns its worker.
/// Must be called from within a tokio runtime.
pub fn spawn(client: ContactsClient, capacity: usize) -> (DeletionQueue, DeletionWorker) {
    let (sender, receiver) = mpsc::channel(capacity);
    let handle = tokio::spawn(run(client, receiver));
    info!("{:<12} - Deletion worker spawned (capacity: {capacity})", "queue");

    (DeletionQueue { sender }, DeletionWorker { handle })
}

impl DeletionQueue {
    /// Never waits: a full or closed queue is an error.
    pub fn enqueue<S: Into<String>>(&self, email: S) -> QueueResult<()> {
        self.sender
            .try_send(DeletionJob {
                email: email.into(),
            })
            .map_err(|er| match er {
                TrySendError::Full(_) => QueueError::Full,
                TrySendError::Closed(_) => QueueError::Closed,
            })
    }
}

impl DeletionWorker {
    /// Waits until the worker has drained the queue.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }
}

async fn run(client: ContactsClient, mut receiver: mpsc::Receiver<DeletionJob>) {
    while let Some(job) = receiver.recv().await {
        process(&client, &job).await;
    }
    info!("{:<12} - Deletion queue closed and drained", "queue");
}

#[tracing::instrument(name = "Deleting a contact", skip_all, fields(email = %job.email))]
pub async fn process(client: &ContactsClient, job: &DeletionJob) -> JobOutcome {
    match client.delete_contact(&job.email).await {
        Ok(()) => JobOutcome::Deleted,
        Err(contacts_client::Error::ContactNotFound) => {
            info!("contact already absent, nothing to delete");
            JobOutcome::AlreadyAbsent
        }
        Err(er) => {
            error!(error = %er, "contact deletion failed");
            JobOutcome::Failed
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type QueueResult<T> = core::result::Result<T, QueueError>;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("deletion queue is full")]
    Full,
    #[error("deletion queue is closed")]
    Closed,
}
