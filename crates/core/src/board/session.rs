//! Per-job board session.
//!
//! One session serves one job view. Drag events, persistence completions,
//! remote invalidations and fetch completions all arrive on a single queue and
//! are handled strictly in arrival order; network calls run as spawned tasks
//! whose completions re-enter the same queue.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use super::drag_model::{DragUpdate, DropResult};
use super::drag_orchestrator::DragOrchestrator;
use super::session_model::{BoardCommand, BoardEffect, ReconcilePolicy, SessionOptions};
use crate::candidates::{check_density, Candidate, CandidateGatewayTrait, CandidateId, CandidateMove};
use crate::errors::{Error, Result};
use crate::events::{BoardEvent, BoardEventSink};
use crate::realtime::{InvalidationListener, RealtimeTransport};
use crate::store::CandidateStore;

/// Cloneable handle for feeding a session's queue.
#[derive(Clone)]
pub struct BoardSender {
    sender: mpsc::UnboundedSender<BoardCommand>,
}

impl BoardSender {
    pub fn send(&self, command: BoardCommand) -> Result<()> {
        self.sender.send(command).map_err(|_| Error::SessionClosed)
    }

    pub fn drag_start(&self, candidate_id: CandidateId) -> Result<()> {
        self.send(BoardCommand::DragStarted { candidate_id })
    }

    pub fn drag_update(&self, update: DragUpdate) -> Result<()> {
        self.send(BoardCommand::DragUpdated(update))
    }

    pub fn drop(&self, result: DropResult) -> Result<()> {
        self.send(BoardCommand::Dropped(result))
    }

    pub fn leave(&self) -> Result<()> {
        self.send(BoardCommand::Leave)
    }
}

/// Board session for one job: owns the drag orchestrator, the invalidation
/// listener and the event queue, and writes into the shared store.
pub struct BoardSession {
    job_id: String,
    store: CandidateStore,
    orchestrator: DragOrchestrator,
    gateway: Arc<dyn CandidateGatewayTrait>,
    listener: InvalidationListener,
    sink: Arc<dyn BoardEventSink>,
    options: SessionOptions,
    sender: mpsc::UnboundedSender<BoardCommand>,
    receiver: mpsc::UnboundedReceiver<BoardCommand>,
    active: bool,
}

impl BoardSession {
    pub fn new(
        job_id: impl Into<String>,
        store: CandidateStore,
        gateway: Arc<dyn CandidateGatewayTrait>,
        transport: Arc<dyn RealtimeTransport>,
        sink: Arc<dyn BoardEventSink>,
        options: SessionOptions,
    ) -> Self {
        let job_id = job_id.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let listener = InvalidationListener::new(&job_id, transport);

        Self {
            job_id,
            store,
            orchestrator: DragOrchestrator::new(),
            gateway,
            listener,
            sink,
            options,
            sender,
            receiver,
            active: false,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn orchestrator(&self) -> &DragOrchestrator {
        &self.orchestrator
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener.is_subscribed()
    }

    /// Handle for feeding this session's queue.
    pub fn sender(&self) -> BoardSender {
        BoardSender {
            sender: self.sender.clone(),
        }
    }

    /// Enters the job view: subscribes to the job's topic and issues the
    /// initial fetch. Entering an active session does nothing.
    pub async fn enter(&mut self) -> Result<()> {
        if self.active {
            debug!("Job {} view already entered", self.job_id);
            return Ok(());
        }

        if self.listener.join(self.sender.clone()).await? {
            self.sink.emit(BoardEvent::Subscribed {
                topic: self.listener.topic().to_string(),
            });
        }
        self.active = true;
        info!("Entered board for job {}", self.job_id);

        self.store.invalidate(&self.job_id);
        self.dispatch(vec![BoardEffect::Fetch]);
        Ok(())
    }

    /// Leaves the job view. Requests already in flight are not aborted; their
    /// completions still land in the store, but nothing new is issued.
    pub fn leave(&mut self) {
        if !self.active && !self.listener.is_subscribed() {
            return;
        }
        self.active = false;
        self.orchestrator = DragOrchestrator::new();
        if self.listener.leave() {
            self.sink.emit(BoardEvent::Unsubscribed {
                topic: self.listener.topic().to_string(),
            });
        }
        info!("Left board for job {}", self.job_id);
    }

    /// Processes queued commands until [`BoardCommand::Leave`] or a fatal
    /// error.
    pub async fn run(&mut self) -> Result<()> {
        while self.step().await? {}
        Ok(())
    }

    /// Takes the next command off the queue and processes it. Returns false
    /// once the session has left.
    pub async fn step(&mut self) -> Result<bool> {
        let Some(command) = self.receiver.recv().await else {
            return Err(Error::SessionClosed);
        };
        self.process(command)
    }

    /// Handles one command and dispatches the resulting effects.
    pub fn process(&mut self, command: BoardCommand) -> Result<bool> {
        if matches!(command, BoardCommand::Leave) {
            self.leave();
            return Ok(false);
        }

        match self.handle_command(command) {
            Ok(effects) => {
                self.dispatch(effects);
                Ok(true)
            }
            Err(err) => {
                error!("Board session for job {} stopped: {}", self.job_id, err);
                self.leave();
                Err(err)
            }
        }
    }

    /// Applies one command to the session state and the store, returning the
    /// network effects to run. Does no I/O itself.
    pub fn handle_command(&mut self, command: BoardCommand) -> Result<Vec<BoardEffect>> {
        match command {
            BoardCommand::DragStarted { candidate_id } => {
                if self.active {
                    self.orchestrator.drag_start(candidate_id);
                }
                Ok(Vec::new())
            }
            BoardCommand::DragUpdated(update) => {
                if !self.active {
                    return Ok(Vec::new());
                }
                let collection = self.collection();
                if let Some(projected) = self.orchestrator.drag_update(&collection, &update)? {
                    self.write_optimistic(projected);
                }
                Ok(Vec::new())
            }
            BoardCommand::Dropped(result) => {
                if !self.active {
                    return Ok(Vec::new());
                }
                let collection = self.collection();
                let Some(outcome) = self.orchestrator.drop(&collection, &result)? else {
                    return Ok(Vec::new());
                };
                if outcome.changed {
                    self.write_optimistic(outcome.candidates);
                }
                debug!(
                    "Persisting candidate {} to {}:{}",
                    outcome.request.id, outcome.request.status, outcome.request.position
                );
                Ok(vec![BoardEffect::Persist(outcome.request)])
            }
            BoardCommand::PersistCompleted {
                candidate_move,
                result,
            } => Ok(self.on_persist_completed(candidate_move, result)),
            BoardCommand::RemoteInvalidation { .. } => {
                if !self.active {
                    return Ok(Vec::new());
                }
                debug!("Remote update for job {}, refetching", self.job_id);
                Ok(self.invalidate())
            }
            BoardCommand::FetchCompleted { result } => {
                self.on_fetch_completed(result);
                Ok(Vec::new())
            }
            BoardCommand::Leave => {
                self.leave();
                Ok(Vec::new())
            }
        }
    }

    fn collection(&self) -> Vec<Candidate> {
        self.store.candidates(&self.job_id).unwrap_or_default()
    }

    fn write_optimistic(&self, candidates: Vec<Candidate>) {
        let version = self.store.set_optimistic(&self.job_id, candidates);
        self.sink.emit(BoardEvent::OptimisticUpdate {
            job_id: self.job_id.clone(),
            version,
        });
    }

    /// Marks the store stale and asks for a refetch while the view is open.
    fn invalidate(&self) -> Vec<BoardEffect> {
        self.store.invalidate(&self.job_id);
        if self.active {
            vec![BoardEffect::Fetch]
        } else {
            Vec::new()
        }
    }

    fn on_persist_completed(
        &self,
        candidate_move: CandidateMove,
        result: Result<Candidate>,
    ) -> Vec<BoardEffect> {
        match result {
            Ok(_) => {
                debug!(
                    "Candidate {} persisted for job {}",
                    candidate_move.id, self.job_id
                );
                self.sink.emit(BoardEvent::PersistSucceeded {
                    job_id: self.job_id.clone(),
                    candidate_id: candidate_move.id,
                });
                self.invalidate()
            }
            Err(err) => {
                warn!(
                    "Failed to persist candidate {} for job {}: {}",
                    candidate_move.id, self.job_id, err
                );
                self.sink.emit(BoardEvent::PersistFailed {
                    job_id: self.job_id.clone(),
                    candidate_id: candidate_move.id,
                    message: err.to_string(),
                });
                match self.options.reconcile_policy {
                    ReconcilePolicy::RefetchOnFailure => self.invalidate(),
                    ReconcilePolicy::AwaitInvalidation => Vec::new(),
                }
            }
        }
    }

    fn on_fetch_completed(&self, result: Result<Vec<Candidate>>) {
        match result {
            Ok(candidates) => {
                if let Err(err) = check_density(&candidates) {
                    warn!("Fetched board for job {} is inconsistent: {}", self.job_id, err);
                }
                let candidate_count = candidates.len();
                let version = self.store.replace(&self.job_id, candidates);
                self.sink.emit(BoardEvent::StoreReplaced {
                    job_id: self.job_id.clone(),
                    version,
                    candidate_count,
                });
            }
            Err(err) => {
                warn!("Failed to load candidates for job {}: {}", self.job_id, err);
                self.store.record_load_error(&self.job_id, err.to_string());
                self.sink.emit(BoardEvent::LoadFailed {
                    job_id: self.job_id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Spawns the network work; completions come back through the queue.
    fn dispatch(&self, effects: Vec<BoardEffect>) {
        for effect in effects {
            let gateway = Arc::clone(&self.gateway);
            let job_id = self.job_id.clone();
            let sender = self.sender.clone();

            match effect {
                BoardEffect::Fetch => {
                    tokio::spawn(async move {
                        let result = gateway.fetch_candidates(&job_id).await;
                        // The session may be gone; nothing left to update then.
                        let _ = sender.send(BoardCommand::FetchCompleted { result });
                    });
                }
                BoardEffect::Persist(candidate_move) => {
                    tokio::spawn(async move {
                        let result = gateway.persist_move(&job_id, &candidate_move).await;
                        let _ = sender.send(BoardCommand::PersistCompleted {
                            candidate_move,
                            result,
                        });
                    });
                }
            }
        }
    }
}
