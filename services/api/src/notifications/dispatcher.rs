//! Intent channel and the task that turns intents into notifications

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::NotificationHub;
use crate::{
    error::ApiResult,
    models::notification::{NotificationIntent, NotificationView},
    repositories::{NotificationRepository, UserRepository},
};

/// Sending half handed to request handlers
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<NotificationIntent>,
}

impl Notifier {
    /// Queue an intent for delivery; self-notifications are dropped
    pub fn notify(&self, intent: NotificationIntent) {
        if intent.is_self_notification() {
            debug!("Skipping self-notification for {}", intent.recipient);
            return;
        }
        if self.tx.send(intent).is_err() {
            warn!("Notification dispatcher is not running, intent dropped");
        }
    }
}

/// Persists intents and fans them out to live sockets
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: NotificationRepository,
    users: UserRepository,
    hub: NotificationHub,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: NotificationRepository,
        users: UserRepository,
        hub: NotificationHub,
    ) -> Self {
        Self {
            notifications,
            users,
            hub,
        }
    }

    /// Persist one intent and push it to the recipient's room
    pub async fn deliver(&self, intent: NotificationIntent) -> ApiResult<NotificationView> {
        let notification = self.notifications.create(intent).await?;
        let sender = match notification.sender {
            Some(id) => self.users.person(id).await?,
            None => None,
        };

        let view = NotificationView::new(notification, sender);
        let reached = self.hub.publish(view.recipient, view.clone()).await;
        debug!(
            "Notification {} delivered to {} live connection(s)",
            view.id, reached
        );
        Ok(view)
    }

    /// Start the dispatcher task; intents are delivered one at a time, in order
    pub fn spawn(self) -> Notifier {
        let (tx, mut rx) = mpsc::unbounded_channel::<NotificationIntent>();
        tokio::spawn(async move {
            while let Some(intent) = rx.recv().await {
                if let Err(e) = self.deliver(intent).await {
                    warn!("Failed to deliver notification: {}", e);
                }
            }
            info!("Notification dispatcher stopped");
        });
        Notifier { tx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationType;
    use crate::models::user::NewUser;
    use common::DocumentStore;
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_dispatch_persists_and_pushes() -> ApiResult<()> {
        let store = DocumentStore::in_memory();
        let users = UserRepository::new(&store);
        let notifications = NotificationRepository::new(&store);
        let hub = NotificationHub::new();

        let sender = users
            .create(NewUser {
                name: "Sam Sender".into(),
                email: "sam@example.com".into(),
                password: "Secret1".into(),
            })
            .await?;
        let recipient = Uuid::new_v4();
        let mut live = hub.subscribe(recipient).await;

        let notifier =
            NotificationDispatcher::new(notifications.clone(), users, hub.clone()).spawn();
        notifier.notify(NotificationIntent::new(
            recipient,
            recipient,
            NotificationType::Like,
            "Ignored",
            "Self notifications never arrive",
            "/projects/1",
        ));
        notifier.notify(NotificationIntent::new(
            recipient,
            sender.id,
            NotificationType::Like,
            "New like",
            "Sam liked your project",
            "/projects/1",
        ));

        let pushed = tokio::time::timeout(Duration::from_secs(2), live.recv())
            .await
            .expect("notification pushed in time")
            .expect("room open");
        assert_eq!(pushed.title, "New like");
        assert_eq!(pushed.sender.as_ref().map(|s| s.id), Some(sender.id));
        assert_eq!(notifications.unread_count(recipient).await?, 1);
        Ok(())
    }
}
