mod config;
mod events;
mod main_lib;
mod render;

use clap::{Parser, Subcommand};
use hireboard_core::candidates::CandidateId;
use hireboard_core::events::BoardEvent;
use hireboard_core::jobs::JobGatewayTrait;

use config::Config;
use main_lib::{build_client, init_tracing, move_candidate, open_board};
use render::render_jobs;

#[derive(Parser)]
#[command(name = "hireboard", version, about = "Candidate pipeline board")]
struct Cli {
    /// Job whose board to open (overrides HB_JOB_ID)
    #[arg(long, global = true)]
    job: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List jobs
    Jobs,
    /// Show the board and follow changes until Ctrl-C
    Watch,
    /// Move a candidate to a column and position
    Move {
        candidate: CandidateId,
        status: String,
        index: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let client = build_client(&config)?;
    let job_id = cli.job.or_else(|| config.job_id.clone());

    match cli.command {
        Command::Jobs => {
            let jobs = client.list_jobs().await?;
            print!("{}", render_jobs(&jobs));
            Ok(())
        }
        Command::Watch => {
            let mut board = open_board(&config, client, job_id).await?;
            print!("{}", board.render());
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = board.wait_for(|e| matches!(
                        e,
                        BoardEvent::StoreReplaced { .. } | BoardEvent::OptimisticUpdate { .. }
                    )) => {
                        event?;
                        println!();
                        print!("{}", board.render());
                    }
                }
            }
            board.shutdown().await
        }
        Command::Move {
            candidate,
            status,
            index,
        } => {
            let mut board = open_board(&config, client, job_id).await?;
            move_candidate(&mut board, candidate, &status, index).await?;
            print!("{}", board.render());
            board.shutdown().await
        }
    }
}
