use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use hireboard_connect::{BoardApiClient, PhoenixSocket};
use hireboard_core::board::{
    BoardSender, BoardSession, DragUpdate, DropResult, DropTarget, SessionOptions,
};
use hireboard_core::candidates::{CandidateGatewayTrait, CandidateId};
use hireboard_core::events::BoardEvent;
use hireboard_core::jobs::{Job, JobGatewayTrait};
use hireboard_core::realtime::RealtimeTransport;
use hireboard_core::store::CandidateStore;

use crate::config::{Config, LogFormat};
use crate::events::{CliBoardEventSink, EventBus};
use crate::render::render_board;

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }
}

pub fn build_client(config: &Config) -> anyhow::Result<Arc<BoardApiClient>> {
    let client = BoardApiClient::new(&config.api_url, config.request_timeout)
        .with_context(|| format!("Invalid API URL {}", config.api_url))?;
    Ok(Arc::new(client))
}

/// Looks the job up, failing when the server does not know it.
pub async fn resolve_job(jobs: &dyn JobGatewayTrait, job_id: &str) -> anyhow::Result<Job> {
    jobs.get_job(job_id)
        .await?
        .ok_or_else(|| anyhow!("Job {} does not exist", job_id))
}

/// A board session running on its own task, plus the handles needed to
/// drive and observe it.
pub struct RunningBoard {
    pub job_id: String,
    pub store: CandidateStore,
    pub sender: BoardSender,
    pub events: broadcast::Receiver<BoardEvent>,
    task: Option<JoinHandle<hireboard_core::Result<()>>>,
}

/// Enters the job's board and runs its session until it leaves.
pub fn start_board(
    job_id: &str,
    gateway: Arc<dyn CandidateGatewayTrait>,
    transport: Arc<dyn RealtimeTransport>,
    options: SessionOptions,
) -> RunningBoard {
    let bus = EventBus::new(256);
    let events = bus.subscribe();
    let store = CandidateStore::new();
    let mut session = BoardSession::new(
        job_id,
        store.clone(),
        gateway,
        transport,
        Arc::new(CliBoardEventSink::new(bus)),
        options,
    );
    let sender = session.sender();

    let task = tokio::spawn(async move {
        session.enter().await?;
        session.run().await
    });

    RunningBoard {
        job_id: job_id.to_string(),
        store,
        sender,
        events,
        task: Some(task),
    }
}

impl RunningBoard {
    /// Waits for the next event matching `wanted`. Fails if the session
    /// stops first.
    pub async fn wait_for(
        &mut self,
        wanted: impl Fn(&BoardEvent) -> bool,
    ) -> anyhow::Result<BoardEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) if wanted(&event) => return Ok(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} board event(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    // The sink went away with the session; surface its error.
                    self.join_task().await?;
                    bail!("Board session ended");
                }
            }
        }
    }

    async fn join_task(&mut self) -> anyhow::Result<()> {
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }

    /// Waits until the store holds a fetched collection.
    pub async fn wait_loaded(&mut self) -> anyhow::Result<()> {
        let event = self
            .wait_for(|e| {
                matches!(
                    e,
                    BoardEvent::StoreReplaced { .. } | BoardEvent::LoadFailed { .. }
                )
            })
            .await?;
        if let BoardEvent::LoadFailed { message, .. } = event {
            bail!("Could not load candidates: {}", message);
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        render_board(&self.store.columns(&self.job_id))
    }

    /// Leaves the board and waits for the session task to finish.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        // The session may already have stopped on its own.
        let _ = self.sender.leave();
        self.join_task().await
    }
}

/// Moves one candidate the way a drag gesture would: start, one update over
/// the target, drop. Returns once the move is persisted and the board has
/// been refetched.
pub async fn move_candidate(
    board: &mut RunningBoard,
    candidate_id: CandidateId,
    status: &str,
    index: u32,
) -> anyhow::Result<()> {
    let known = board
        .store
        .candidates(&board.job_id)
        .unwrap_or_default()
        .iter()
        .any(|c| c.id == candidate_id);
    if !known {
        bail!("Candidate {} is not on job {}", candidate_id, board.job_id);
    }

    let target = DropTarget::new(status, index);
    board.sender.drag_start(candidate_id)?;
    board.sender.drag_update(DragUpdate {
        draggable_id: candidate_id,
        destination: Some(target.clone()),
    })?;
    board.sender.drop(DropResult {
        draggable_id: candidate_id,
        destination: Some(target),
    })?;

    let outcome = board
        .wait_for(|e| match e {
            BoardEvent::PersistSucceeded { candidate_id: id, .. }
            | BoardEvent::PersistFailed { candidate_id: id, .. } => *id == candidate_id,
            _ => false,
        })
        .await?;
    if let BoardEvent::PersistFailed { message, .. } = outcome {
        bail!("Move was not saved: {}", message);
    }
    board.wait_loaded().await
}

pub async fn connect_socket(config: &Config) -> anyhow::Result<Arc<PhoenixSocket>> {
    let socket = PhoenixSocket::connect(&config.socket_url)
        .await
        .with_context(|| format!("Could not connect to {}", config.socket_url))?;
    Ok(Arc::new(socket))
}

/// Resolves the selected job, connects the socket and starts its board,
/// returning once the first load has landed.
pub async fn open_board(
    config: &Config,
    client: Arc<BoardApiClient>,
    job_id: Option<String>,
) -> anyhow::Result<RunningBoard> {
    let job_id =
        job_id.ok_or_else(|| anyhow!("No job selected; pass --job or set HB_JOB_ID"))?;
    let job = resolve_job(client.as_ref(), &job_id).await?;
    tracing::info!("Opening board for {} ({})", job.name, job.id);

    let socket = connect_socket(config).await?;
    let options = SessionOptions {
        reconcile_policy: config.reconcile_policy,
    };
    let mut board = start_board(&job.id, client, socket, options);
    board.wait_loaded().await?;
    Ok(board)
}
