//! Background proactive messaging.
//!
//! One persistent loop, independent of any screen: every poll tick it
//! checks the injected [`ActivityTracker`] and, once the idle window has
//! elapsed, emits one message picked uniformly from a fixed set. There is
//! no dedupe across ticks; any user interaction resets the window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rand::Rng;
use shared::activity::ActivityTracker;
use shared::events::{ProactiveMessage, ProactiveSender};

const PROACTIVE_LINES: [&str; 4] = [
    "Hey there! Just checking in. Need help with anything?",
    "I'm here if you need me. What would you like to work on today?",
    "Just a friendly reminder that I'm here to help whenever you need me!",
    "I noticed you haven't been active for a while. Ready to continue?",
];

pub const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub poll_interval: Duration,
    pub idle_threshold: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            idle_threshold: IDLE_THRESHOLD,
        }
    }
}

pub struct ProactiveNotifier {
    activity: Arc<ActivityTracker>,
    config: NotifierConfig,
    tx: ProactiveSender,
}

impl ProactiveNotifier {
    pub fn new(activity: Arc<ActivityTracker>, tx: ProactiveSender) -> Self {
        Self::with_config(activity, tx, NotifierConfig::default())
    }

    pub fn with_config(
        activity: Arc<ActivityTracker>,
        tx: ProactiveSender,
        config: NotifierConfig,
    ) -> Self {
        Self {
            activity,
            config,
            tx,
        }
    }

    /// One poll tick: a message iff the idle window has elapsed. A failure
    /// while composing is logged and swallowed; the loop keeps running.
    pub fn tick(&self) -> Option<ProactiveMessage> {
        let idle = self.activity.idle();
        if idle < self.config.idle_threshold {
            return None;
        }
        match self.compose(idle) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(error = %e, "proactive message generation failed");
                None
            }
        }
    }

    fn compose(&self, idle: Duration) -> anyhow::Result<ProactiveMessage> {
        tracing::debug!(
            idle_minutes = idle.as_secs() / 60,
            "user inactive, composing proactive message"
        );
        let line = PROACTIVE_LINES[rand::thread_rng().gen_range(0..PROACTIVE_LINES.len())];
        Ok(ProactiveMessage::new(line))
    }

    /// Spawn the loop on a dedicated thread with its own runtime. Returns
    /// `None` when the runtime or thread fails to start; the notifier stops
    /// and the rest of the app is unaffected.
    pub fn spawn(self) -> Option<NotifierHandle> {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "notifier runtime failed to start; stopping");
                return None;
            }
        };

        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        let thread = std::thread::Builder::new()
            .name("proactive-notifier".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    loop {
                        tokio::time::sleep(self.config.poll_interval).await;
                        if flag.load(Ordering::Relaxed) {
                            break;
                        }
                        if let Some(message) = self.tick() {
                            if self.tx.send(message).is_err() {
                                // Receiver gone: the app is shutting down.
                                break;
                            }
                        }
                    }
                });
            });

        match thread {
            Ok(thread) => Some(NotifierHandle { shutdown, thread }),
            Err(e) => {
                tracing::error!(error = %e, "notifier thread failed to start; stopping");
                None
            }
        }
    }
}

/// Stops the loop at its next tick. The thread is detached; it exits on its
/// own once the flag is observed or the receiver goes away.
pub struct NotifierHandle {
    shutdown: Arc<AtomicBool>,
    #[allow(dead_code)]
    thread: JoinHandle<()>,
}

impl NotifierHandle {
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn notifier(idle_threshold: Duration) -> (ProactiveNotifier, shared::events::ProactiveReceiver)
    {
        let (tx, rx) = channel();
        let notifier = ProactiveNotifier::with_config(
            Arc::new(ActivityTracker::new()),
            tx,
            NotifierConfig {
                poll_interval: Duration::from_millis(10),
                idle_threshold,
            },
        );
        (notifier, rx)
    }

    #[test]
    fn a_tick_past_the_idle_threshold_emits_one_message() {
        let (notifier, _rx) = notifier(Duration::ZERO);
        let message = notifier.tick().expect("idle window elapsed");
        assert!(PROACTIVE_LINES.contains(&message.text.as_str()));
    }

    #[test]
    fn recent_activity_suppresses_emission() {
        let (notifier, _rx) = notifier(Duration::from_secs(30 * 60));
        notifier.activity.touch();
        assert!(notifier.tick().is_none());
    }

    #[test]
    fn the_loop_delivers_over_the_channel_and_stops() {
        let (notifier, rx) = notifier(Duration::ZERO);
        let handle = notifier.spawn().expect("runtime starts");

        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(PROACTIVE_LINES.contains(&message.text.as_str()));
        handle.stop();
    }
}
