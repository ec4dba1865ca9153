use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::io::{stdin, stdout};
use tokio::sync::mpsc;
use tower_lsp::{LspService, Server};

use crate::config::{Config, Settings};
use crate::lsp::backend::Backend;
use crate::lsp::handlers::HandleDiagnostics;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_default_env()
        .parse_filters(&config.log_level)
        .init();

    let settings = match &config.settings_path {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings file: {}", e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let settings_path = config.settings_path.clone();

    // If running under the integration test, exit after a short delay so the
    // test can read stdout to EOF.
    if std::env::var("EDL_LS_TEST_EXIT").as_deref() == Ok("1") {
        std::thread::spawn(|| {
            std::thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    let (service, socket) = LspService::build(move |client| {
        let backend = Backend::new(client, settings);
        if let Some(path) = settings_path.clone() {
            spawn_settings_watcher(backend.clone(), path);
        }
        backend
    })
    .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

/// Watch the user settings file and re-validate all open documents when it
/// changes.
///
/// The watcher lives inside the spawned task so it is released together
/// with the server.
fn spawn_settings_watcher(backend: Backend, path: PathBuf) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                    event.kind
                {
                    for path in event.paths {
                        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                            let _ = tx.send(path);
                        }
                    }
                }
            }
            Err(e) => log::warn!("Settings watcher error: {}", e),
        },
        notify::Config::default().with_poll_interval(Duration::from_secs(1)),
    );

    tokio::spawn(async move {
        let mut watcher = match watcher {
            Ok(watcher) => watcher,
            Err(e) => {
                log::warn!("Failed to create settings watcher: {}", e);
                return;
            }
        };

        // Watch the containing directory: editors replace files on save,
        // and the file itself may not exist yet.
        let Some(dir) = path.parent() else {
            return;
        };
        if !dir.exists() {
            log::debug!("Settings directory does not exist, not watching");
            return;
        }
        if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
            log::warn!("Failed to watch settings directory: {}", e);
            return;
        }

        while let Some(changed) = rx.recv().await {
            if changed.file_name() != path.file_name() {
                continue;
            }

            match Settings::load(&path) {
                Ok(new_settings) => {
                    log::info!("Settings file changed: {:?}", new_settings);
                    *backend.settings.lock().await = new_settings;
                }
                Err(e) => {
                    log::warn!("Failed to reload settings file: {}", e);
                    continue;
                }
            }

            backend.revalidate_all().await;
        }
    });
}
