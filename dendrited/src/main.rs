//! dendrited - actor-policy control daemon
//!
//! Loads a trained actor network from a parameter file, connects to a
//! simulation environment's TCP server and runs the control cycle: read
//! state + reward, evaluate the policy, send the action back.
//!
//! Usage:
//!   dendrited [config.json]
//!
//! Without a config file the daemon uses the original pendulum defaults
//! (server 127.0.0.1:1000, extracted_weights.json, 3 -> 50 -> 10 -> 1 -> 1).

use std::path::PathBuf;
use std::process::ExitCode;

use dendrite::network::Network;
use dendrite::params::{load_actor, ParameterFile};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

mod config;
mod error;
mod protocol;

use config::DaemonConfig;
use error::DaemonError;

fn load_config() -> Result<DaemonConfig, DaemonError> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("loading config from {}", path.display());
            DaemonConfig::from_file(&path)
        }
        None => {
            warn!("no config file given, using built-in pendulum defaults");
            Ok(DaemonConfig::default())
        }
    }
}

/// Build the actor network and apply the trained parameters. Any shape
/// disagreement between the file and the compiled topology aborts startup
/// with the offending label in the error.
fn build_actor(cfg: &DaemonConfig) -> Result<Network, DaemonError> {
    info!("loading parameters from {}", cfg.parameter_file.display());
    let text = std::fs::read_to_string(&cfg.parameter_file)?;
    let file = ParameterFile::from_str(&text).map_err(|cause| DaemonError::Params {
        path: cfg.parameter_file.display().to_string(),
        cause,
    })?;

    let mut actor = cfg.policy.build()?;
    load_actor(&mut actor, &file, &cfg.policy).map_err(|cause| DaemonError::Params {
        path: cfg.parameter_file.display().to_string(),
        cause,
    })?;

    Ok(actor)
}

async fn run() -> Result<(), DaemonError> {
    let cfg = load_config()?;
    let mut actor = build_actor(&cfg)?;
    info!(
        "actor '{}' ready: {} state values -> {} action values",
        actor.name(),
        actor.input_dim(),
        actor.output_dim()
    );

    let stream = TcpStream::connect(&cfg.server_addr).await?;
    stream.set_nodelay(true)?;
    info!("connected to environment server at {}", cfg.server_addr);

    // Exit cleanly on Ctrl-C; there is no state to persist.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, shutting down");
            std::process::exit(0);
        }
    });

    let (mut reader, mut writer) = stream.into_split();
    let state_dim = actor.input_dim();
    let mut cycles: u64 = 0;

    loop {
        // The frame carries the state vector plus a trailing reward scalar.
        // The reward is the environment's feedback about the previous
        // action; inference does not consume it, so it is only logged.
        let frame = match protocol::read_state_frame(&mut reader, state_dim).await? {
            Some(frame) => frame,
            None => {
                info!("connection closed by the environment server after {} cycles", cycles);
                return Ok(());
            }
        };
        debug!("cycle {}: reward {}", cycles, frame.reward);

        let action = actor.evaluate(&frame.state)?;
        protocol::write_action_frame(&mut writer, &action).await?;

        cycles += 1;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
