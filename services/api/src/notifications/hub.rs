//! Registry of live notification channels, one room per user

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;
use uuid::Uuid;

use crate::models::notification::NotificationView;

/// Buffered notifications per room before slow sockets start lagging
const ROOM_CAPACITY: usize = 32;

type Rooms = HashMap<Uuid, broadcast::Sender<Arc<NotificationView>>>;

#[derive(Debug, Clone, Default)]
pub struct NotificationHub {
    rooms: Arc<RwLock<Rooms>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the user's room, creating it on first use
    pub async fn subscribe(&self, user: Uuid) -> broadcast::Receiver<Arc<NotificationView>> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(user)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Push to every socket in the user's room; returns how many were reached
    pub async fn publish(&self, user: Uuid, notification: NotificationView) -> usize {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(&user) else {
            debug!("No live connection for {}, notification stored only", user);
            return 0;
        };
        match room.send(Arc::new(notification)) {
            Ok(reached) => reached,
            Err(_) => {
                debug!("Room of {} has no receivers", user);
                0
            }
        }
    }

    /// Drop the user's room once its last socket has gone
    pub async fn release(&self, user: Uuid) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(&user).is_some_and(|room| room.receiver_count() == 0) {
            rooms.remove(&user);
            debug!("Released notification room of {}", user);
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::{Notification, NotificationIntent, NotificationType};

    fn view(recipient: Uuid) -> NotificationView {
        let notification = Notification::from_intent(NotificationIntent::new(
            recipient,
            Uuid::new_v4(),
            NotificationType::Like,
            "New like",
            "Someone liked your post",
            "/blogs/1",
        ));
        NotificationView::new(notification, None)
    }

    #[tokio::test]
    async fn test_publish_reaches_every_socket_of_the_user() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let mut first = hub.subscribe(user).await;
        let mut second = hub.subscribe(user).await;

        assert_eq!(hub.publish(user, view(user)).await, 2);
        assert_eq!(first.recv().await.unwrap().recipient, user);
        assert_eq!(second.recv().await.unwrap().recipient, user);
    }

    #[tokio::test]
    async fn test_publish_without_room_is_dropped() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        assert_eq!(hub.publish(user, view(user)).await, 0);
    }

    #[tokio::test]
    async fn test_release_only_drops_empty_rooms() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let first = hub.subscribe(user).await;
        let second = hub.subscribe(user).await;

        drop(first);
        hub.release(user).await;
        assert_eq!(hub.room_count().await, 1);

        drop(second);
        hub.release(user).await;
        assert_eq!(hub.room_count().await, 0);
    }
}
