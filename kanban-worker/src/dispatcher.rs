/// Reminder dispatcher
///
/// Main worker loop: every poll interval it claims due reminders and pushes a
/// notification to each of the task owner's browser subscriptions.
///
/// ```text
/// ReminderDispatcher
///   ├─> ReminderQueue: claim due tasks
///   ├─> PushSubscription: owner's endpoints
///   └─> PushDelivery: one message per endpoint
///         └─> Gone (404/410): delete subscription
/// ```
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kanban_shared::push::{VapidKeys, WebPushSender};
/// use kanban_worker::dispatcher::{DispatcherConfig, ReminderDispatcher};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, keys: VapidKeys) -> Result<(), Box<dyn std::error::Error>> {
/// let sender = Arc::new(WebPushSender::new(keys)?);
/// let dispatcher = ReminderDispatcher::new(pool, sender, DispatcherConfig::default());
///
/// dispatcher.run().await;
/// # Ok(())
/// # }
/// ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use kanban_shared::models::push_subscription::PushSubscription;
use kanban_shared::models::task::Task;
use kanban_shared::push::{PushError, WebPushSender};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::{WorkerConfig, DEFAULT_BATCH_SIZE, DEFAULT_POLL_INTERVAL_SECS};
use crate::reminders::{ReminderError, ReminderQueue};

/// Anything that can deliver a push message to a subscription endpoint
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn deliver(&self, endpoint: &str) -> Result<(), PushError>;
}

#[async_trait]
impl PushDelivery for WebPushSender {
    async fn deliver(&self, endpoint: &str) -> Result<(), PushError> {
        self.send(endpoint).await
    }
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub poll_interval: Duration,
    pub batch_size: i64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl From<&WorkerConfig> for DispatcherConfig {
    fn from(config: &WorkerConfig) -> Self {
        DispatcherConfig {
            poll_interval: config.poll_interval,
            batch_size: config.batch_size,
        }
    }
}

/// Outcome of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub reminders: usize,
    pub delivered: usize,
    pub removed: usize,
    pub failed: usize,
}

impl DispatchSummary {
    fn absorb(&mut self, other: DispatchSummary) {
        self.reminders += other.reminders;
        self.delivered += other.delivered;
        self.removed += other.removed;
        self.failed += other.failed;
    }
}

pub struct ReminderDispatcher {
    queue: ReminderQueue,
    push: Arc<dyn PushDelivery>,
    config: DispatcherConfig,
    shutdown_token: CancellationToken,
}

impl ReminderDispatcher {
    pub fn new(db: PgPool, push: Arc<dyn PushDelivery>, config: DispatcherConfig) -> Self {
        ReminderDispatcher {
            queue: ReminderQueue::new(db, config.batch_size),
            push,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Cancel it to stop [`ReminderDispatcher::run`] after the current scan
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Polls until the shutdown token is cancelled
    ///
    /// Scan errors are logged and retried on the next tick; they never stop
    /// the loop.
    pub async fn run(&self) {
        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            batch_size = self.config.batch_size,
            "Reminder dispatcher starting"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => break,
                _ = interval.tick() => {}
            }

            match self.run_once().await {
                Ok(summary) if summary.reminders > 0 => {
                    tracing::info!(
                        reminders = summary.reminders,
                        delivered = summary.delivered,
                        removed = summary.removed,
                        failed = summary.failed,
                        "Reminders dispatched"
                    );
                }
                Ok(_) => tracing::trace!("No reminders due"),
                Err(e) => tracing::error!(error = %e, "Reminder scan failed"),
            }
        }

        tracing::info!("Reminder dispatcher stopped");
    }

    /// Claims every reminder due now and delivers it
    ///
    /// Only the claim can fail the scan. Claimed tasks are already marked, so
    /// a failure on one of them is logged and the rest of the batch goes on.
    pub async fn run_once(&self) -> Result<DispatchSummary, ReminderError> {
        let tasks = self.queue.claim_due(Utc::now()).await?;

        Ok(remind_each(tasks, |task| self.remind(task)).await)
    }

    #[tracing::instrument(skip(self, task), fields(task_id = %task.id, user_id = %task.user_id))]
    async fn remind(&self, task: Task) -> Result<DispatchSummary, ReminderError> {
        let db = self.queue.pool();
        let subscriptions = PushSubscription::list_by_user(db, task.user_id).await?;

        if subscriptions.is_empty() {
            tracing::debug!("Owner has no push subscriptions");
            return Ok(DispatchSummary::default());
        }

        let outcome = deliver_all(self.push.as_ref(), &subscriptions).await;

        for id in &outcome.gone {
            PushSubscription::delete(db, *id).await?;
        }

        Ok(DispatchSummary {
            reminders: 0,
            delivered: outcome.delivered,
            removed: outcome.gone.len(),
            failed: outcome.failed,
        })
    }
}

async fn remind_each<F, Fut>(tasks: Vec<Task>, mut remind: F) -> DispatchSummary
where
    F: FnMut(Task) -> Fut,
    Fut: Future<Output = Result<DispatchSummary, ReminderError>>,
{
    let mut summary = DispatchSummary::default();

    for task in tasks {
        let task_id = task.id;
        summary.reminders += 1;

        match remind(task).await {
            Ok(outcome) => summary.absorb(outcome),
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "Reminder delivery failed");
                summary.failed += 1;
            }
        }
    }

    summary
}

#[derive(Debug, Default)]
struct Delivery {
    delivered: usize,
    failed: usize,

    /// Subscriptions the push service no longer knows
    gone: Vec<Uuid>,
}

async fn deliver_all(push: &dyn PushDelivery, subscriptions: &[PushSubscription]) -> Delivery {
    let results = futures::future::join_all(
        subscriptions
            .iter()
            .map(|subscription| push.deliver(&subscription.endpoint)),
    )
    .await;

    let mut outcome = Delivery::default();
    for (subscription, result) in subscriptions.iter().zip(results) {
        match result {
            Ok(()) => outcome.delivered += 1,
            Err(PushError::Gone) => {
                tracing::info!(endpoint = %subscription.endpoint, "Removing expired push subscription");
                outcome.gone.push(subscription.id);
            }
            Err(e) => {
                tracing::warn!(endpoint = %subscription.endpoint, error = %e, "Push delivery failed");
                outcome.failed += 1;
            }
        }
    }

    outcome
}
