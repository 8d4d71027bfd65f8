use photo_pdf::{BuildProgress, BuildTicket, PhotoPdfError, Session, load_raw_files, save_pdf};
use tokio::sync::mpsc;

use crate::{ExportDestination, ImageSummary, SessionCommand, SessionUpdate};

/// A build task handing its ticket back to the worker
struct FinishedBuild {
    ticket: BuildTicket,
    destination: ExportDestination,
    result: photo_pdf::Result<Vec<u8>>,
}

/// Async worker task that owns a session, processes commands and sends updates.
///
/// Builds run on their own task so edits keep flowing while a document is
/// assembled; the session rejects a second export until the first finishes.
/// The worker exits once the command channel is closed and no build is
/// running.
pub async fn session_worker(
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
) {
    let mut session = Session::new();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<FinishedBuild>();
    let mut commands_open = true;

    while commands_open || session.is_building() {
        tokio::select! {
            // Queued commands are handled before a finished build is collected
            biased;

            cmd = command_rx.recv(), if commands_open => match cmd {
                Some(cmd) => process_command(cmd, &mut session, &done_tx, &update_tx).await,
                None => {
                    log::debug!("Command channel closed");
                    commands_open = false;
                }
            },
            Some(finished) = done_rx.recv() => {
                handle_finished_build(finished, &mut session, &update_tx).await;
            }
        }
    }
}

async fn process_command(
    cmd: SessionCommand,
    session: &mut Session,
    done_tx: &mpsc::UnboundedSender<FinishedBuild>,
    update_tx: &mpsc::UnboundedSender<SessionUpdate>,
) {
    match cmd {
        SessionCommand::AddFiles { files } => {
            add_files(files, session, update_tx).await;
        }
        SessionCommand::AddPaths { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for (name, result) in load_raw_files(&paths).await {
                match result {
                    Ok(file) => files.push(file),
                    Err(e) => {
                        log::warn!("{}", e);
                        let _ = update_tx.send(SessionUpdate::FileSkipped {
                            name,
                            message: e.to_string(),
                        });
                    }
                }
            }
            add_files(files, session, update_tx).await;
        }
        SessionCommand::Remove { id } => match session.remove(id) {
            Ok(_) => send_collection(session, update_tx),
            Err(e) => send_error(e, update_tx),
        },
        SessionCommand::Move { id, delta } => match session.move_image(id, delta) {
            Ok(moved) => {
                if !moved {
                    log::debug!("Ignoring move of {} by {}", id, delta);
                }
                // Unchanged order is still reported so every move gets a reply
                send_collection(session, update_tx);
            }
            Err(e) => send_error(e, update_tx),
        },
        SessionCommand::Rotate { id } => match session.rotate(id) {
            Ok(_) => send_collection(session, update_tx),
            Err(e) => send_error(e, update_tx),
        },
        SessionCommand::Clear => {
            session.clear();
            send_collection(session, update_tx);
        }
        SessionCommand::Export {
            options,
            destination,
        } => {
            let ticket = match session.begin_build(&options, destination.target()) {
                Ok(ticket) => ticket,
                Err(e) => {
                    send_error(e, update_tx);
                    return;
                }
            };

            let page_count = ticket.images().len();
            let _ = update_tx.send(SessionUpdate::BuildStarted { page_count });
            log::info!("Preparing PDF with {} pages", page_count);

            let progress_tx = update_tx.clone();
            let done_tx = done_tx.clone();
            tokio::spawn(async move {
                let result = ticket
                    .build(move |progress| {
                        let (operation, current, total) = match progress {
                            BuildProgress::AddingPage { current, total } => {
                                ("Adding page", current, total)
                            }
                            BuildProgress::Finalizing => ("Finalizing PDF", page_count, page_count),
                        };
                        let _ = progress_tx.send(SessionUpdate::Progress {
                            operation: operation.to_string(),
                            current,
                            total,
                        });
                    })
                    .await;
                let _ = done_tx.send(FinishedBuild {
                    ticket,
                    destination,
                    result,
                });
            });
        }
        SessionCommand::DismissPreview => {
            if session.dismiss_preview() {
                let _ = update_tx.send(SessionUpdate::PreviewDismissed);
            }
        }
    }
}

async fn add_files(
    files: Vec<photo_pdf::RawFile>,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<SessionUpdate>,
) {
    let report = session.add_files(files).await;
    for failure in report.failures {
        let _ = update_tx.send(SessionUpdate::FileSkipped {
            name: failure.name,
            message: failure.error.to_string(),
        });
    }
    log::info!("Added {} images", report.added.len());
    // Sent even when nothing was added so the batch is always acknowledged
    send_collection(session, update_tx);
}

async fn handle_finished_build(
    finished: FinishedBuild,
    session: &mut Session,
    update_tx: &mpsc::UnboundedSender<SessionUpdate>,
) {
    let FinishedBuild {
        ticket,
        destination,
        result,
    } = finished;

    let artifact = match session.finish_build(ticket, result) {
        Ok(artifact) => artifact.clone(),
        // The collection was cleared while building; nothing to hand out
        Err(PhotoPdfError::BuildDiscarded) => {
            log::info!("Discarded conversion of cleared photos");
            return;
        }
        Err(e) => {
            log::error!("Conversion failed: {}", e);
            send_error(e, update_tx);
            return;
        }
    };

    match destination {
        ExportDestination::Directory(dir) => {
            let path = dir.join(&artifact.file_name);
            match save_pdf(&artifact.bytes, &path).await {
                Ok(()) => {
                    log::info!("Saved {}", path.display());
                    let _ = update_tx.send(SessionUpdate::Exported {
                        path,
                        page_count: artifact.page_count,
                    });
                }
                Err(e) => send_error(e, update_tx),
            }
        }
        ExportDestination::Preview => {
            let _ = update_tx.send(SessionUpdate::PreviewReady {
                file_name: artifact.file_name,
                page_count: artifact.page_count,
                bytes: artifact.bytes,
            });
        }
    }
}

fn send_collection(session: &Session, update_tx: &mpsc::UnboundedSender<SessionUpdate>) {
    let images = session
        .collection()
        .iter()
        .map(|img| {
            let (width, height) = img.dimensions();
            ImageSummary {
                id: img.id(),
                name: img.name().to_string(),
                format: img.format(),
                rotation: img.rotation(),
                width,
                height,
            }
        })
        .collect();
    let _ = update_tx.send(SessionUpdate::CollectionChanged { images });
}

fn send_error(error: PhotoPdfError, update_tx: &mpsc::UnboundedSender<SessionUpdate>) {
    let _ = update_tx.send(SessionUpdate::Error {
        message: error.to_string(),
    });
}
