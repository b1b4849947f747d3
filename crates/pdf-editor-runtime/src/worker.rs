use pdf_page_codec::LopdfCodec;
use pdf_session::EditSession;
use tokio::sync::mpsc;

use crate::{EditorCommand, EditorUpdate};

type Session = EditSession<LopdfCodec>;

/// Async worker that owns the editing session and processes commands one
/// at a time. Draining a single receiver is what guarantees at most one
/// codec operation is in flight; commands issued while a commit is
/// pending queue up behind it.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<EditorCommand>,
    update_tx: mpsc::UnboundedSender<EditorUpdate>,
) {
    let mut session: Option<Session> = None;

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut session, &update_tx).await;
    }
}

async fn process_command(
    cmd: EditorCommand,
    session: &mut Option<Session>,
    update_tx: &mpsc::UnboundedSender<EditorUpdate>,
) {
    match cmd {
        EditorCommand::Open { bytes } => {
            match EditSession::open(LopdfCodec::new(), bytes).await {
                Ok(opened) => {
                    log::debug!(
                        "opened document with {} pages",
                        opened.current().page_count()
                    );
                    let state = opened.state();
                    *session = Some(opened);
                    let _ = update_tx.send(EditorUpdate::SessionOpened { state });
                }
                Err(e) => {
                    let _ = update_tx.send(EditorUpdate::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
        EditorCommand::Close => {
            *session = None;
            let _ = update_tx.send(EditorUpdate::SessionClosed);
        }
        cmd => {
            let Some(active) = session.as_mut() else {
                let _ = update_tx.send(EditorUpdate::Error {
                    message: "no document open".to_string(),
                });
                return;
            };

            // Ok(true) means the state actually changed; boundary no-ops
            // (undo at the start of history) publish nothing.
            let result = match cmd {
                // Handled above
                EditorCommand::Open { .. } | EditorCommand::Close => Ok(false),
                EditorCommand::ToggleSelection { index, additive } => {
                    active.toggle_selection(index, additive);
                    Ok(true)
                }
                EditorCommand::SelectAll => {
                    active.select_all();
                    Ok(true)
                }
                EditorCommand::ClearSelection => {
                    active.clear_selection();
                    Ok(true)
                }
                EditorCommand::SetActivePage { index } => {
                    active.set_active_page(index);
                    Ok(true)
                }
                EditorCommand::RotateSelected { delta } => {
                    active.rotate_selected(delta);
                    Ok(true)
                }
                EditorCommand::ReorderPage { from, to } => {
                    active.reorder_page(from, to).await.map(|_| true)
                }
                EditorCommand::Commit => active.commit().await.map(|_| true),
                EditorCommand::DeleteSelected => active.delete_selected().await.map(|_| true),
                EditorCommand::DeletePages { indices } => {
                    active.delete_pages(&indices).await.map(|_| true)
                }
                EditorCommand::InsertBlankPage => active.insert_blank_page().await.map(|_| true),
                EditorCommand::Undo => active.undo(),
                EditorCommand::Redo => active.redo(),
            };

            match result {
                Ok(true) => {
                    let _ = update_tx.send(EditorUpdate::StateChanged {
                        state: active.state(),
                    });
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!("editor command failed: {e}");
                    let _ = update_tx.send(EditorUpdate::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}
