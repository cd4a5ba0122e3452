//! One task per encounter.
//!
//! `spawn_encounter` moves an `Encounter` and its host into a tokio task
//! and returns a cloneable `EncounterHandle`. Every operation on the
//! encounter goes through the handle's command queue, so submissions,
//! membership changes and resolutions for one encounter never interleave.
//!
//! The task races the command queue against the turn timer. Commands that
//! change the encounter are followed by any pending end-of-turn check, and
//! a check raised by a resolution itself runs on the next turn of the
//! loop. Queries never resolve a round. The timer is re-armed whenever a
//! round resolves.
//!
//! ## Key Types
//!
//! - `EncounterHandle`: async front end, one method per command
//! - `EncounterOutcome`: what the task hands back once the encounter ends

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info_span, Instrument};

use super::action::Targets;
use super::engine::Encounter;
use super::host::CombatHost;
use super::snapshot::EncounterSnapshot;
use crate::cards::{CardKey, Stat};
use crate::combatant::{Combatant, StatPool};
use crate::core::{CombatError, CombatantId, EncounterId, Result};

enum Command {
    Submit {
        card: Option<CardKey>,
        actor: CombatantId,
        targets: Targets,
        reply: oneshot::Sender<Result<bool>>,
    },
    Add {
        combatant: Box<Combatant>,
        reply: oneshot::Sender<Result<()>>,
    },
    Remove {
        id: CombatantId,
        reply: oneshot::Sender<Option<Combatant>>,
    },
    SetConnected {
        id: CombatantId,
        connected: bool,
        reply: oneshot::Sender<bool>,
    },
    Stat {
        id: CombatantId,
        stat: Stat,
        reply: oneshot::Sender<Option<StatPool>>,
    },
    LastResults {
        reply: oneshot::Sender<String>,
    },
    Snapshot {
        reply: oneshot::Sender<EncounterSnapshot>,
    },
}

impl Command {
    /// Queries never trigger an end-of-turn check.
    fn changes_state(&self) -> bool {
        matches!(
            self,
            Self::Submit { .. } | Self::Add { .. } | Self::Remove { .. } | Self::SetConnected { .. }
        )
    }
}

/// Cloneable handle to a running encounter.
#[derive(Clone, Debug)]
pub struct EncounterHandle {
    id: EncounterId,
    tx: mpsc::UnboundedSender<Command>,
}

impl EncounterHandle {
    #[must_use]
    pub fn id(&self) -> EncounterId {
        self.id
    }

    /// Whether the task has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Submit `actor`'s action for the current round.
    pub async fn submit(
        &self,
        card: Option<CardKey>,
        actor: CombatantId,
        targets: impl IntoIterator<Item = CombatantId>,
    ) -> Result<bool> {
        let targets = targets.into_iter().collect();
        self.request(|reply| Command::Submit {
            card,
            actor,
            targets,
            reply,
        })
        .await?
    }

    pub async fn add(&self, combatant: Combatant) -> Result<()> {
        self.request(|reply| Command::Add {
            combatant: Box::new(combatant),
            reply,
        })
        .await?
    }

    /// Remove a combatant and take it back.
    pub async fn remove(&self, id: CombatantId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::Remove { id, reply }).await
    }

    pub async fn set_connected(&self, id: CombatantId, connected: bool) -> Result<bool> {
        self.request(|reply| Command::SetConnected { id, connected, reply })
            .await
    }

    pub async fn get_stat(&self, id: CombatantId, stat: Stat) -> Result<Option<StatPool>> {
        self.request(|reply| Command::Stat { id, stat, reply }).await
    }

    pub async fn last_round_results(&self) -> Result<String> {
        self.request(|reply| Command::LastResults { reply }).await
    }

    pub async fn snapshot(&self) -> Result<EncounterSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .map_err(|_| CombatError::ActorClosed)?;
        response.await.map_err(|_| CombatError::ActorClosed)
    }
}

/// The encounter and host after the task stops.
#[derive(Debug)]
pub struct EncounterOutcome<H> {
    pub encounter: Encounter,
    pub host: H,
}

/// Run `encounter` on its own task.
///
/// The task stops when the encounter ends or every handle is dropped.
pub fn spawn_encounter<H>(encounter: Encounter, host: H) -> (EncounterHandle, JoinHandle<EncounterOutcome<H>>)
where
    H: CombatHost + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let id = encounter.id();
    let span = info_span!("encounter", id = %id);
    let task = tokio::spawn(run(encounter, host, rx).instrument(span));
    (EncounterHandle { id, tx }, task)
}

async fn run<H>(mut encounter: Encounter, mut host: H, mut rx: mpsc::UnboundedReceiver<Command>) -> EncounterOutcome<H>
where
    H: CombatHost,
{
    let timeout = encounter.config().turn_timeout();
    let mut deadline = Instant::now() + timeout;
    let mut round = encounter.round();

    // Autonomous members added before the spawn may have asked for a check.
    settle(&mut encounter, &mut host);

    while !encounter.is_ended() {
        tokio::select! {
            command = rx.recv() => match command {
                Some(command) => {
                    let changes_state = command.changes_state();
                    handle(&mut encounter, &mut host, command);
                    if changes_state {
                        settle(&mut encounter, &mut host);
                    }
                }
                None => {
                    debug!("every handle dropped");
                    break;
                }
            },
            // A resolution can leave autonomous members asking for the next
            // check. Yield first so queued commands are not starved.
            () = tokio::task::yield_now(), if encounter.end_check_requested() => {
                settle(&mut encounter, &mut host);
            }
            () = sleep_until(deadline) => {
                if let Err(err) = encounter.on_timeout(&mut host) {
                    error!(%err, "resolution after timeout failed");
                }
                deadline = Instant::now() + timeout;
            }
        }

        if encounter.round() != round {
            round = encounter.round();
            deadline = Instant::now() + timeout;
        }
    }

    EncounterOutcome { encounter, host }
}

fn settle<H: CombatHost>(encounter: &mut Encounter, host: &mut H) {
    if !encounter.end_check_requested() {
        return;
    }
    if let Err(err) = encounter.check_end_of_turn(host) {
        error!(%err, "end-of-turn resolution failed");
    }
}

fn handle<H: CombatHost>(encounter: &mut Encounter, host: &mut H, command: Command) {
    // A dropped receiver only means the caller stopped waiting.
    match command {
        Command::Submit {
            card,
            actor,
            targets,
            reply,
        } => {
            let _ = reply.send(encounter.submit_action(card, actor, targets, host));
        }
        Command::Add { combatant, reply } => {
            let _ = reply.send(encounter.add_combatant(*combatant, host));
        }
        Command::Remove { id, reply } => {
            let _ = reply.send(encounter.remove_combatant(id, host));
        }
        Command::SetConnected { id, connected, reply } => {
            let _ = reply.send(encounter.set_connected(id, connected));
        }
        Command::Stat { id, stat, reply } => {
            let _ = reply.send(encounter.get_stat(id, stat));
        }
        Command::LastResults { reply } => {
            let _ = reply.send(encounter.last_round_results().to_string());
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(encounter.snapshot());
        }
    }
}
