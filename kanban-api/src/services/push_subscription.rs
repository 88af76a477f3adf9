//! Browser push subscriptions
//!
//! Subscriptions are keyed by endpoint: subscribing again from the same
//! browser refreshes its keys and owner instead of adding a row.

use kanban_shared::{
    dtos::push::{PushSubscriptionDto, RemovePushSubscriptionDto},
    models::push_subscription::{CreatePushSubscription, PushSubscription},
    DomainError, DomainResult,
};
use sqlx::PgPool;

pub struct PushSubscriptionService {
    db: PgPool,
}

impl PushSubscriptionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[tracing::instrument(skip(self, dto), fields(user_id = %dto.user_id))]
    pub async fn subscribe(&self, dto: PushSubscriptionDto) -> DomainResult<PushSubscription> {
        let subscription = PushSubscription::upsert(
            &self.db,
            CreatePushSubscription {
                user_id: dto.user_id,
                endpoint: dto.endpoint,
                p256dh: dto.p256dh,
                auth: dto.auth,
            },
        )
        .await?;

        tracing::info!(subscription_id = %subscription.id, "Push subscription stored");
        Ok(subscription)
    }

    #[tracing::instrument(skip(self, dto), fields(user_id = %dto.user_id))]
    pub async fn unsubscribe(&self, dto: RemovePushSubscriptionDto) -> DomainResult<()> {
        let removed =
            PushSubscription::delete_by_endpoint(&self.db, dto.user_id, &dto.endpoint).await?;

        if !removed {
            return Err(DomainError::not_found("Subscription not found"));
        }

        Ok(())
    }
}
