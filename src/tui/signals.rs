//! # Signal Watcher
//!
//! A background task waits for SIGINT, SIGTERM or SIGHUP, restores the
//! terminal, and hands an exit code to `main` over a oneshot channel:
//! 0 for SIGINT, 1 for anything else. `main` selects on that channel
//! alongside the navigation loop and exits with whichever finishes first.

use std::future::Future;
use std::io;

use log::{info, warn};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::oneshot;

use super::terminal::restore_terminal;

/// Process exit code for a received signal.
pub fn exit_code(kind: SignalKind) -> i32 {
    if kind == SignalKind::interrupt() { 0 } else { 1 }
}

/// Watch the real process signals.
pub fn spawn_signal_watcher() -> oneshot::Receiver<i32> {
    spawn_watcher(wait_for_signal(), restore_terminal)
}

/// Spawn a task that awaits `signal`, runs `cleanup`, then sends the exit code.
///
/// If `signal` fails the sender is kept alive forever, so the receiver never
/// resolves and the navigation loop decides the exit code.
pub fn spawn_watcher<F>(signal: F, cleanup: fn()) -> oneshot::Receiver<i32>
where
    F: Future<Output = io::Result<SignalKind>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let kind = match signal.await {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Signal handler unavailable: {}", e);
                std::future::pending::<()>().await;
                return;
            }
        };
        let code = exit_code(kind);
        info!("Received signal {:?}, exiting with {}", kind, code);
        cleanup();
        if tx.send(code).is_err() {
            warn!("Exit code {} dropped: receiver gone", code);
        }
    });
    rx
}

async fn wait_for_signal() -> io::Result<SignalKind> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let kind = tokio::select! {
        _ = interrupt.recv() => SignalKind::interrupt(),
        _ = terminate.recv() => SignalKind::terminate(),
        _ = hangup.recv() => SignalKind::hangup(),
    };
    Ok(kind)
}
