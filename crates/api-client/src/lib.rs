//! HTTP + realtime client for the Eventdeck API.

mod client;
mod live;

pub use client::ApiClient;
pub use live::{LiveFeedProvider, LiveSubscription, WsLiveFeedProvider};
