//! Per-channel crawl session management
//!
//! A channel maps one seed URL to at most one live crawl session. The
//! manager reference-counts viewers per channel: the first viewer starts
//! the crawl engine, the last one to leave aborts it. Channels are fully
//! independent of each other.

use crate::config::ChannelConfig;
use crate::crawler::{CrawlEngine, CrawlEvent};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Events buffered per channel for slow viewers before they start lagging
const EVENT_BUFFER: usize = 256;

/// Maps channel names to crawl sessions, refcounted by viewer
pub struct SessionManager {
    channels: Mutex<HashMap<String, ChannelState>>,
}

struct ChannelState {
    seed_url: String,
    pool: usize,
    session: Option<CrawlSession>,
}

/// One live crawl run: the engine task, the relay that fans its events
/// out, and the broadcast sender viewers subscribe to
struct CrawlSession {
    events: broadcast::Sender<CrawlEvent>,
    engine_task: JoinHandle<()>,
    relay_task: JoinHandle<()>,
}

impl CrawlSession {
    /// Aborts the engine and relay; no event is observable after this
    /// returns
    fn stop(self) {
        self.engine_task.abort();
        self.relay_task.abort();
    }
}

/// Channel entry as reported by the listing endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSummary {
    pub name: String,
    #[serde(rename = "seedUrl")]
    pub seed_url: String,
    pub viewers: usize,
}

impl SessionManager {
    /// Creates a manager for the configured channel table; no crawl
    /// starts until a viewer joins
    pub fn new(channels: &[ChannelConfig]) -> Self {
        let channels = channels
            .iter()
            .map(|channel| {
                (
                    channel.name.clone(),
                    ChannelState {
                        seed_url: channel.seed_url.clone(),
                        pool: 0,
                        session: None,
                    },
                )
            })
            .collect();

        Self {
            channels: Mutex::new(channels),
        }
    }

    /// True if `channel` is in the configured table
    pub fn contains(&self, channel: &str) -> bool {
        self.channels.lock().unwrap().contains_key(channel)
    }

    /// Registers a viewer on a channel
    ///
    /// Starts the channel's crawl on the 0→1 viewer transition. Returns
    /// a receiver of every event emitted from the moment of subscription
    /// on, or `None` for an unknown channel.
    pub fn join(&self, channel: &str) -> Option<broadcast::Receiver<CrawlEvent>> {
        let mut channels = self.channels.lock().unwrap();
        let state = channels.get_mut(channel)?;

        state.pool += 1;
        if state.pool == 1 {
            tracing::info!(
                "First viewer on '{}', starting crawl of {}",
                channel,
                state.seed_url
            );
            state.session = Some(start_session(channel, &state.seed_url));
        }

        state
            .session
            .as_ref()
            .map(|session| session.events.subscribe())
    }

    /// Deregisters a viewer from a channel
    ///
    /// Aborts the channel's crawl on the 1→0 transition; in-flight work
    /// is discarded and no further events are emitted.
    pub fn leave(&self, channel: &str) {
        let mut channels = self.channels.lock().unwrap();
        let Some(state) = channels.get_mut(channel) else {
            return;
        };

        if state.pool == 0 {
            return;
        }

        state.pool -= 1;
        if state.pool == 0 {
            if let Some(session) = state.session.take() {
                session.stop();
                tracing::info!("Last viewer left '{}', crawl stopped", channel);
            }
        }
    }

    /// Current viewer count, or `None` for an unknown channel
    pub fn viewer_count(&self, channel: &str) -> Option<usize> {
        self.channels
            .lock()
            .unwrap()
            .get(channel)
            .map(|state| state.pool)
    }

    /// Snapshot of the channel table, sorted by name
    pub fn summaries(&self) -> Vec<ChannelSummary> {
        let channels = self.channels.lock().unwrap();
        let mut summaries: Vec<ChannelSummary> = channels
            .iter()
            .map(|(name, state)| ChannelSummary {
                name: name.clone(),
                seed_url: state.seed_url.clone(),
                viewers: state.pool,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}

/// Spawns the engine and relay tasks for one crawl run
///
/// The engine emits into an mpsc sender it owns; the relay forwards each
/// event into the broadcast channel viewers subscribe to. Both tasks are
/// aborted together on teardown.
fn start_session(channel: &str, seed_url: &str) -> CrawlSession {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, _) = broadcast::channel(EVENT_BUFFER);

    let seed = seed_url.to_string();
    let name = channel.to_string();
    let engine_task = tokio::spawn(async move {
        match CrawlEngine::new(&seed, event_tx) {
            Ok(engine) => engine.run().await,
            Err(e) => tracing::error!("Failed to start crawl for '{}': {}", name, e),
        }
    });

    let relay_tx = broadcast_tx.clone();
    let relay_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            // send() errs only while no viewer is subscribed
            let _ = relay_tx.send(event);
        }
    });

    CrawlSession {
        events: broadcast_tx,
        engine_task,
        relay_task,
    }
}
