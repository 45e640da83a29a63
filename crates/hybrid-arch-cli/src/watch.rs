//! Project watcher: reload the session when an architecture file changes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use tracing::{info, warn};

use hybrid_arch_config::is_architecture_file;
use hybrid_arch_tools::ArchSession;

/// Watch the project root until the watcher channel closes.
pub async fn run(session: Arc<ArchSession>) -> anyhow::Result<()> {
    let root = session.paths().project_root().to_path_buf();
    report(&session).await;
    tokio::task::spawn_blocking(move || run_watcher(root, session)).await?;
    Ok(())
}

fn run_watcher(root: PathBuf, session: Arc<ArchSession>) {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = match new_debouncer(Duration::from_secs(1), tx) {
        Ok(d) => d,
        Err(e) => {
            warn!("Failed to create file watcher: {e}");
            return;
        }
    };

    if let Err(e) = debouncer
        .watcher()
        .watch(&root, notify::RecursiveMode::Recursive)
    {
        warn!("Failed to watch project directory: {e}");
        return;
    }

    info!("Watching {}", root.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed = events.iter().find(|event| {
                    event.kind == DebouncedEventKind::Any
                        && is_architecture_file(&event.path.to_string_lossy())
                });

                if let Some(event) = changed {
                    info!(path = %event.path.display(), "Architecture file changed, reloading");
                    reload(&session);
                }
            }
            Ok(Err(e)) => {
                warn!("Watcher error: {e:?}");
            }
            Err(_) => {
                info!("Watcher channel closed, stopping");
                break;
            }
        }
    }
}

fn reload(session: &Arc<ArchSession>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let session = session.clone();
            handle.spawn(async move {
                session.reload().await;
                report(&session).await;
            });
        }
        Err(_) => warn!("No tokio runtime available for reload"),
    }
}

async fn report(session: &ArchSession) {
    match session.state().await {
        Ok(snapshot) => info!(
            rules = snapshot.state.merged.rules.len(),
            docs = snapshot.state.merged.docs.len(),
            requested = snapshot.state.skill.requested.len(),
            skills = snapshot.skills.len(),
            "Architecture state loaded"
        ),
        Err(e) => warn!("Failed to resolve architecture state: {e}"),
    }
}
