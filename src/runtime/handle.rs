use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    config::RuntimeConfig,
    controller::LivePositionController,
    error::ControlError,
    remote::RemoteService,
    session::Session,
    variables::VariableSnapshot,
};

use super::events::{Action, AgendaEvent};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("runtime channel closed")]
    ChannelClosed,
}

pub struct AgendaLiveHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<AgendaEvent>,
}

impl Clone for AgendaLiveHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Run {
        action: Action,
        resp: oneshot::Sender<Result<VariableSnapshot, RuntimeError>>,
    },
    Variables {
        resp: oneshot::Sender<Option<VariableSnapshot>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

#[derive(Default)]
struct LoopState {
    session: Option<Session>,
    last: Option<VariableSnapshot>,
    connected: bool,
}

/// Spawns the loop that owns the session and serializes every action.
pub fn spawn_agendalive<R>(remote: Arc<R>, config: RuntimeConfig) -> AgendaLiveHandle
where
    R: RemoteService + ?Sized + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<AgendaEvent>(config.event_queue_bound.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut state = LoopState::default();
        let refresh = (config.refresh_interval_ms > 0).then(|| Duration::from_millis(config.refresh_interval_ms));
        let mut deadline = Instant::now() + refresh.unwrap_or_default();

        if config.reload_on_start {
            let _ = run_action(Action::Reload, &mut state, remote.as_ref(), &events_tx_loop).await;
        }

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    let done = handle_command(cmd, &mut state, remote.as_ref(), &events_tx_loop).await;
                    if done {
                        break;
                    }
                }
                _ = tokio::time::sleep_until(deadline), if refresh.is_some() => {
                    if state.session.is_some() {
                        let _ = run_action(Action::Refresh, &mut state, remote.as_ref(), &events_tx_loop).await;
                    }
                    deadline = Instant::now() + refresh.unwrap_or_default();
                }
            }
        }
        debug!("agendalive runtime stopped");
    });

    AgendaLiveHandle { cmd_tx, events_tx }
}

impl AgendaLiveHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<AgendaEvent> {
        self.events_tx.subscribe()
    }

    /// Reconnects if needed, selects the next event and rebuilds its agenda.
    pub async fn reload(&self) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::Reload).await
    }

    pub async fn refresh(&self) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::Refresh).await
    }

    pub async fn advance(&self) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::Advance).await
    }

    pub async fn reverse(&self) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::Reverse).await
    }

    pub async fn add_time(&self, seconds: i64) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::AddTime(seconds)).await
    }

    pub async fn reduce_time(&self, seconds: i64) -> Result<VariableSnapshot, RuntimeError> {
        self.run(Action::ReduceTime(seconds)).await
    }

    /// Last published variables, without a remote round trip.
    pub async fn variables(&self) -> Result<Option<VariableSnapshot>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Variables { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    async fn run(&self, action: Action) -> Result<VariableSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Run { action, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command<R>(
    cmd: Command,
    state: &mut LoopState,
    remote: &R,
    events_tx: &broadcast::Sender<AgendaEvent>,
) -> bool
where
    R: RemoteService + ?Sized,
{
    match cmd {
        Command::Run { action, resp } => {
            let res = run_action(action, state, remote, events_tx)
                .await
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::Variables { resp } => {
            let _ = resp.send(state.last.clone());
        }
        Command::Shutdown { resp } => {
            let out = if state.connected {
                remote
                    .disconnect()
                    .await
                    .map_err(|e| RuntimeError::Control(ControlError::from(e)))
            } else {
                Ok(())
            };
            state.connected = false;
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

async fn run_action<R>(
    action: Action,
    state: &mut LoopState,
    remote: &R,
    events_tx: &broadcast::Sender<AgendaEvent>,
) -> Result<VariableSnapshot, ControlError>
where
    R: RemoteService + ?Sized,
{
    let res = apply_action(action, state, remote, events_tx).await;
    match &res {
        Ok(snapshot) => {
            if state.last.as_ref() != Some(snapshot) {
                let _ = events_tx.send(AgendaEvent::PositionChanged(snapshot.clone()));
            }
            state.last = Some(snapshot.clone());
        }
        Err(ControlError::NotReady) => {
            warn!(
                action = action.name(),
                "next event not selected yet; try again later or reload manually"
            );
        }
        Err(err) => {
            warn!(action = action.name(), "action failed: {err}");
            let _ = events_tx.send(AgendaEvent::ActionFailed {
                action: action.name(),
                message: err.to_string(),
            });
        }
    }
    res
}

async fn apply_action<R>(
    action: Action,
    state: &mut LoopState,
    remote: &R,
    events_tx: &broadcast::Sender<AgendaEvent>,
) -> Result<VariableSnapshot, ControlError>
where
    R: RemoteService + ?Sized,
{
    if action == Action::Reload {
        if !state.connected {
            remote.connect().await?;
            state.connected = true;
        }

        info!("reloading next event");
        let session = Session::load(remote, Local::now().naive_local()).await?;
        // The new generation is committed only once its live position resolves.
        let position = LivePositionController::new(remote)
            .fetch(session.event().id, session.agenda())
            .await?;
        let snapshot = session.variables(&position);

        let _ = events_tx.send(AgendaEvent::Reloaded {
            event_id: session.event().id,
            agenda_id: session.agenda().id(),
            item_count: session.agenda().len(),
        });
        state.session = Some(session);
        return Ok(snapshot);
    }

    let session = state.session.as_ref().ok_or(ControlError::NotReady)?;
    let event_id = session.event().id;
    let agenda = session.agenda();
    let controller = LivePositionController::new(remote);

    let position = match action {
        Action::Reload | Action::Refresh => controller.fetch(event_id, agenda).await?,
        Action::Advance => controller.advance(event_id, agenda).await?.position(),
        Action::Reverse => controller.reverse(event_id, agenda).await?.position(),
        Action::AddTime(seconds) => controller.add_time(event_id, agenda, seconds).await?.position(),
        Action::ReduceTime(seconds) => controller.reduce_time(event_id, agenda, seconds).await?.position(),
    };

    Ok(session.variables(&position))
}
