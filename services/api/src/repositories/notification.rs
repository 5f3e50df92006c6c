//! Notification repository

use common::{Collection, DocumentStore, Filter, FindOptions, Sort, SortKey};
use uuid::Uuid;

use crate::{
    error::ApiResult,
    models::{
        Page,
        notification::{Notification, NotificationIntent},
    },
    repositories::find_page,
};

#[derive(Clone)]
pub struct NotificationRepository {
    notifications: Collection<Notification>,
}

fn for_recipient(recipient: Uuid) -> Filter {
    Filter::new().eq("recipient", recipient.to_string())
}

impl NotificationRepository {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            notifications: store.collection(),
        }
    }

    pub async fn create(&self, intent: NotificationIntent) -> ApiResult<Notification> {
        let notification = Notification::from_intent(intent);
        self.notifications.insert(&notification).await?;
        Ok(notification)
    }

    /// Newest first
    pub async fn list_for(&self, recipient: Uuid, page: Page) -> ApiResult<(Vec<Notification>, u64)> {
        let sort = vec![Sort::desc("createdAt", SortKey::Timestamp)];
        Ok(find_page(&self.notifications, &for_recipient(recipient), sort, page).await?)
    }

    pub async fn unread_count(&self, recipient: Uuid) -> ApiResult<u64> {
        let filter = for_recipient(recipient).eq("isRead", false);
        Ok(self.notifications.count(&filter).await?)
    }

    /// Mark one of the recipient's notifications read; None when it is not theirs
    pub async fn mark_read(&self, id: Uuid, recipient: Uuid) -> ApiResult<Option<Notification>> {
        let Some(mut notification) = self
            .notifications
            .get(id)
            .await?
            .filter(|n| n.recipient == recipient)
        else {
            return Ok(None);
        };
        if notification.mark_read() {
            self.notifications.replace(&notification).await?;
        }
        Ok(Some(notification))
    }

    /// Returns how many notifications changed
    pub async fn mark_all_read(&self, recipient: Uuid) -> ApiResult<u64> {
        let filter = for_recipient(recipient).eq("isRead", false);
        let unread = self
            .notifications
            .find(&filter, &FindOptions::default())
            .await?;

        let mut changed = 0;
        for mut notification in unread {
            if notification.mark_read() && self.notifications.replace(&notification).await? {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
