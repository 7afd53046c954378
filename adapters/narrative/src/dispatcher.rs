use std::{io, sync::Arc, time::Duration};

use los_gemini_system_session::{Effect, SessionEvent};
use tokio::{
    runtime::{Builder, Runtime},
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};

use crate::NarrativeSource;

const WORKER_THREADS: usize = 2;

/// Runs narrative requests in the background and reports their outcomes as
/// session events.
///
/// Every dispatched request produces exactly one event. Failures are logged
/// and turned into the matching `*Failed` event, so the session never sees an
/// error value.
#[derive(Debug)]
pub struct NarrativeDispatcher<S> {
    runtime: Runtime,
    source: Arc<S>,
    sender: UnboundedSender<SessionEvent>,
    receiver: UnboundedReceiver<SessionEvent>,
    outstanding: usize,
}

impl<S> NarrativeDispatcher<S>
where
    S: NarrativeSource + Send + Sync + 'static,
{
    /// Starts the background runtime.
    pub fn new(source: S) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("los-gemini-narrative")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            source: Arc::new(source),
            sender,
            receiver,
            outstanding: 0,
        })
    }

    /// Starts the request described by `effect`.
    ///
    /// Returns `false` without doing anything for effects that are not
    /// narrative requests.
    pub fn dispatch(&mut self, effect: &Effect) -> bool {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        match effect {
            Effect::GenerateMission { reputation } => {
                let reputation = *reputation;
                log::debug!("requesting mission (reputation={reputation})");
                let _ = self.runtime.spawn(async move {
                    let event = match source.generate_mission(reputation).await {
                        Ok(mission) => SessionEvent::MissionGenerated(mission),
                        Err(error) => {
                            log::warn!("mission request failed: {error}");
                            SessionEvent::MissionFailed
                        }
                    };
                    let _ = sender.send(event);
                });
            }
            Effect::GenerateBroadcast {
                wanted_level,
                mission_title,
            } => {
                let wanted_level = *wanted_level;
                let mission_title = mission_title.clone();
                log::debug!("requesting broadcast (wanted_level={wanted_level})");
                let _ = self.runtime.spawn(async move {
                    let event = match source
                        .generate_broadcast(wanted_level, mission_title.as_deref())
                        .await
                    {
                        Ok(transcript) => SessionEvent::BroadcastReceived(transcript),
                        Err(error) => {
                            log::warn!("broadcast request failed: {error}");
                            SessionEvent::BroadcastFailed
                        }
                    };
                    let _ = sender.send(event);
                });
            }
            Effect::GenerateDialogue {
                npc_kind,
                player_action,
            } => {
                let npc_kind = npc_kind.clone();
                let player_action = player_action.clone();
                log::debug!("requesting dialogue from {npc_kind}");
                let _ = self.runtime.spawn(async move {
                    let event = match source.npc_dialogue(&npc_kind, &player_action).await {
                        Ok(line) => SessionEvent::DialogueReceived { npc_kind, line },
                        Err(error) => {
                            log::warn!("{npc_kind} did not pick up: {error}");
                            SessionEvent::DialogueFailed
                        }
                    };
                    let _ = sender.send(event);
                });
            }
            Effect::ApplyGraphics(_) => return false,
        }
        self.outstanding += 1;
        true
    }

    /// Moves every completed outcome into `out` without blocking.
    pub fn drain(&mut self, out: &mut Vec<SessionEvent>) {
        while let Ok(event) = self.receiver.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            out.push(event);
        }
    }

    /// Blocks until the next outcome arrives or `timeout` passes.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<SessionEvent> {
        let Self {
            runtime, receiver, ..
        } = self;
        let event = runtime.block_on(async {
            tokio::time::timeout(timeout, receiver.recv())
                .await
                .ok()
                .flatten()
        });
        if event.is_some() {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        event
    }

    /// Number of requests whose outcome has not been collected yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

}
