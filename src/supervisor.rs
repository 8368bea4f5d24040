//! Multi-process supervision.
//!
//! The supervisor applies migrations once, then runs `WORKERS` copies of the
//! current executable. Each copy is told its id through
//! [`WORKER_ID_VAR`] and binds the shared listen address with
//! `SO_REUSEPORT`. Workers keep no shared memory: every piece of shared state
//! lives in the store, so a respawned worker is indistinguishable from the one
//! it replaces.

use crate::config::{Config, WORKER_ID_VAR};
use crate::server;

use anyhow::{Context, Result};
use std::future::Future;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Pause before a crashed worker is started again.
const RESPAWN_DELAY: Duration = Duration::from_secs(1);

/// How long a worker may take to drain after shutdown before it is killed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

struct WorkerExit {
    worker_id: usize,
    status: std::io::Result<ExitStatus>,
}

/// Runs the supervisor until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if migrations fail or the current executable cannot be
/// located. Worker failures are logged and the worker is respawned.
pub async fn run(config: Config) -> Result<()> {
    if config.uses_postgres() {
        let pool = server::connect_pool(&config).await?;
        server::run_migrations(&pool).await?;
        pool.close().await;
    }

    let exe = std::env::current_exe().context("Failed to locate the current executable")?;
    supervise(
        config.workers,
        |worker_id| worker_command(&exe, worker_id),
        server::shutdown_signal(),
    )
    .await;

    info!("Supervisor stopped");
    Ok(())
}

/// Keeps `worker_count` workers running until `shutdown` resolves, then
/// stops them all.
async fn supervise<F, S>(worker_count: usize, make_command: F, shutdown: S)
where
    F: Fn(usize) -> Command,
    S: Future<Output = ()>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut workers = JoinSet::new();
    for worker_id in 0..worker_count {
        workers.spawn(run_worker(make_command(worker_id), worker_id, shutdown_rx.clone()));
    }
    info!(workers = worker_count, "Supervisor started");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(joined) = workers.join_next() => {
                let exit = match joined {
                    Ok(exit) => exit,
                    Err(e) => {
                        error!("Worker task failed: {e}");
                        continue;
                    }
                };

                match exit.status {
                    Ok(status) => {
                        warn!(worker = exit.worker_id, %status, "Worker exited, respawning")
                    }
                    Err(e) => error!(worker = exit.worker_id, "Worker could not be run: {e}"),
                }

                tokio::time::sleep(RESPAWN_DELAY).await;
                workers.spawn(run_worker(
                    make_command(exit.worker_id),
                    exit.worker_id,
                    shutdown_rx.clone(),
                ));
            }
        }
    }

    info!("Stopping workers");
    if shutdown_tx.send(true).is_err() {
        warn!("All workers already stopped");
    }
    while let Some(joined) = workers.join_next().await {
        if let Ok(exit) = joined {
            info!(worker = exit.worker_id, "Worker stopped");
        }
    }
}

/// Builds the command line for one worker.
///
/// Workers inherit the environment and arguments of the supervisor.
fn worker_command(exe: &Path, worker_id: usize) -> Command {
    let mut command = Command::new(exe);
    command
        .args(std::env::args_os().skip(1))
        .env(WORKER_ID_VAR, worker_id.to_string())
        .kill_on_drop(true);
    command
}

/// Runs one worker until it exits or shutdown is requested.
///
/// On shutdown the worker gets SIGTERM so it can drain its connections. It is
/// killed only if it is still running after [`SHUTDOWN_GRACE`].
async fn run_worker(
    mut command: Command,
    worker_id: usize,
    mut shutdown: watch::Receiver<bool>,
) -> WorkerExit {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            return WorkerExit {
                worker_id,
                status: Err(e),
            };
        }
    };
    info!(worker = worker_id, pid = ?child.id(), "Worker started");

    let status = tokio::select! {
        status = child.wait() => status,
        _ = shutdown.changed() => {
            if let Err(e) = request_stop(&child) {
                warn!(worker = worker_id, "Failed to signal worker: {e}");
            }

            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!(worker = worker_id, "Worker did not stop in time, killing it");
                    if let Err(e) = child.start_kill() {
                        error!(worker = worker_id, "Failed to kill worker: {e}");
                    }
                    child.wait().await
                }
            }
        }
    };

    WorkerExit { worker_id, status }
}

/// Sends SIGTERM, which the worker treats like Ctrl-C.
#[cfg(unix)]
fn request_stop(child: &Child) -> Result<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = i32::try_from(pid).context("Worker pid out of range")?;
    signal::kill(Pid::from_raw(pid), Signal::SIGTERM).context("kill(SIGTERM) failed")?;
    Ok(())
}

/// Without Unix signals the worker is only stopped by the kill after the grace period.
#[cfg(not(unix))]
fn request_stop(_child: &Child) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    fn shell(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script).kill_on_drop(true);
        command
    }

    #[test]
    fn test_worker_command_sets_worker_id() {
        let command = worker_command(Path::new("/usr/bin/seqlink"), 3);
        let std_command = command.as_std();

        assert_eq!(std_command.get_program(), OsStr::new("/usr/bin/seqlink"));

        let worker_env = std_command
            .get_envs()
            .find(|(key, _)| *key == OsStr::new(WORKER_ID_VAR))
            .and_then(|(_, value)| value);
        assert_eq!(worker_env, Some(OsStr::new("3")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_sends_sigterm_before_grace_expires() {
        let (tx, rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(
            shell("trap 'exit 0' TERM; while true; do sleep 0.05; done"),
            0,
            rx,
        ));

        // Give the shell time to install its trap.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let started = Instant::now();
        tx.send(true).unwrap();
        let exit = worker.await.unwrap();

        assert!(started.elapsed() < SHUTDOWN_GRACE);
        assert_eq!(exit.worker_id, 0);
        assert!(exit.status.unwrap().success());
    }

    #[tokio::test]
    async fn test_worker_exit_is_reported() {
        let (_tx, rx) = watch::channel(false);

        let exit = run_worker(shell("exit 3"), 5, rx).await;

        assert_eq!(exit.worker_id, 5);
        assert_eq!(exit.status.unwrap().code(), Some(3));
    }

    #[tokio::test]
    async fn test_exited_workers_are_respawned() {
        let spawned = Arc::new(AtomicUsize::new(0));
        let counter = spawned.clone();

        supervise(
            1,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                shell("exit 1")
            },
            tokio::time::sleep(RESPAWN_DELAY * 2 + Duration::from_millis(500)),
        )
        .await;

        assert!(spawned.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_supervise_stops_running_workers() {
        let started = Instant::now();

        supervise(
            2,
            |_| shell("trap 'exit 0' TERM; while true; do sleep 0.05; done"),
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await;

        assert!(started.elapsed() < SHUTDOWN_GRACE);
    }
}
