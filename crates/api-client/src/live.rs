use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use eventdeck_api::AttendeeUpdate;

/// Source of realtime attendee updates.
///
/// The trait seam exists so the dashboard can be driven by a channel-backed
/// fake in tests; production uses [`WsLiveFeedProvider`].
pub trait LiveFeedProvider: Send + Sync {
    fn subscribe(&self, base_url: &str) -> Option<LiveSubscription>;
}

/// Connects to the service's WebSocket channel at `{base_url}/api/events/live`
/// on a background tokio task and forwards decoded frames in receipt order.
pub struct WsLiveFeedProvider {
    handle: tokio::runtime::Handle,
}

impl WsLiveFeedProvider {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl LiveFeedProvider for WsLiveFeedProvider {
    fn subscribe(&self, base_url: &str) -> Option<LiveSubscription> {
        let ws_url = ws_url(base_url)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicBool::new(true));
        let task_active = Arc::clone(&active);

        let task = self.handle.spawn(async move {
            run_feed(ws_url, tx, task_active).await;
        });

        Some(LiveSubscription {
            rx,
            active,
            task: Some(task),
        })
    }
}

/// Swap the HTTP scheme for the WebSocket one and append the channel path.
fn ws_url(base_url: &str) -> Option<String> {
    let base = base_url.trim_end_matches('/');
    let swapped = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return None;
    };
    Some(format!("{swapped}/api/events/live"))
}

async fn run_feed(
    ws_url: String,
    tx: mpsc::UnboundedSender<AttendeeUpdate>,
    active: Arc<AtomicBool>,
) {
    match connect_async(&ws_url).await {
        Ok((mut stream, _)) => {
            debug!("live feed connected: {ws_url}");
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<AttendeeUpdate>(&text) {
                        Ok(update) => {
                            // Receiver dropped means the view tore down.
                            if tx.send(update).is_err() {
                                break;
                            }
                        }
                        Err(e) => debug!("ignoring malformed live frame: {e}"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("live feed read error: {e}");
                        break;
                    }
                }
            }
        }
        Err(e) => warn!("live feed connect failed: {e}"),
    }
    active.store(false, Ordering::Relaxed);
}

/// A handle to an active realtime subscription.
///
/// Updates are buffered in arrival order and drained with
/// [`LiveSubscription::poll_update`]; each update is delivered exactly once,
/// so tearing down and re-subscribing cannot double-count. Dropping the
/// subscription aborts the feed task.
pub struct LiveSubscription {
    rx: mpsc::UnboundedReceiver<AttendeeUpdate>,
    active: Arc<AtomicBool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl LiveSubscription {
    /// Build a subscription from a plain channel. Used by in-process feeds
    /// and test fakes.
    pub fn from_channel(rx: mpsc::UnboundedReceiver<AttendeeUpdate>) -> Self {
        Self {
            rx,
            active: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    /// Non-blocking: the next buffered update, if any.
    pub fn poll_update(&mut self) -> Option<AttendeeUpdate> {
        self.rx.try_recv().ok()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_swaps_scheme_and_appends_channel_path() {
        assert_eq!(
            ws_url("http://localhost:4000/").as_deref(),
            Some("ws://localhost:4000/api/events/live")
        );
        assert_eq!(
            ws_url("https://events.example.com").as_deref(),
            Some("wss://events.example.com/api/events/live")
        );
        assert_eq!(ws_url("ftp://nope"), None);
    }

    #[test]
    fn channel_subscription_delivers_each_update_once_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub = LiveSubscription::from_channel(rx);

        for user in ["u1", "u2"] {
            tx.send(AttendeeUpdate {
                event_id: "ev-1".to_string(),
                user_id: user.to_string(),
            })
            .unwrap();
        }

        assert_eq!(sub.poll_update().unwrap().user_id, "u1");
        assert_eq!(sub.poll_update().unwrap().user_id, "u2");
        assert!(sub.poll_update().is_none());
    }
}
