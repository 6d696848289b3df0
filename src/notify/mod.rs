// src/notify/mod.rs
//! Outbound message channels and the fan-out multiplexer.

pub mod discord;
pub mod format;
pub mod slack;
pub mod telegram;

use anyhow::Result;

pub use format::{format_extraction_alert, format_notification, FormatConfig};

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, text: &str) -> Result<()>;
}

/// Sends one text to every configured channel. A failing channel is logged and
/// does not affect the others.
#[derive(Default)]
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Enables Telegram, Discord and Slack when their env credentials are set.
    pub fn from_env() -> Self {
        let mut channels: Vec<Box<dyn Notifier>> = Vec::new();
        if let Some(t) = telegram::TelegramNotifier::from_env() {
            channels.push(Box::new(t));
        }
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL") {
            if !url.trim().is_empty() {
                channels.push(Box::new(discord::DiscordNotifier::new(url)));
            }
        }
        if let Some(s) = slack::SlackNotifier::from_env() {
            channels.push(Box::new(s));
        }
        Self { channels }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Returns how many channels accepted the message.
    pub async fn notify(&self, text: &str) -> usize {
        if self.channels.is_empty() {
            tracing::info!(target: "notify", "no channel configured; message follows\n{text}");
            return 0;
        }
        let mut delivered = 0usize;
        for ch in &self.channels {
            match ch.send(text).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::info!(target: "notify", channel = ch.name(), "message sent");
                }
                Err(e) => {
                    tracing::warn!(target: "notify", channel = ch.name(), "send failed: {e:#}");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>, bool);

    #[async_trait::async_trait]
    impl Notifier for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }
        async fn send(&self, _text: &str) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            if self.1 {
                Ok(())
            } else {
                anyhow::bail!("boom")
            }
        }
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_others() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mux = NotifierMux::new(vec![
            Box::new(Counting(hits.clone(), false)),
            Box::new(Counting(hits.clone(), true)),
        ]);
        assert_eq!(mux.notify("hi").await, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_mux_delivers_nothing() {
        let mux = NotifierMux::default();
        assert!(mux.is_empty());
        assert_eq!(mux.notify("hi").await, 0);
    }
}
