use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Form;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::PromptDispatcher;
use crate::domain::{ChatHistoryEntry, DomainError, TaskRequest};

use super::page::{
    render_not_found, render_page, render_session_ended, Notice, PageView, Panel, PanelForm,
};
use super::session::SessionStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct WebState {
    dispatcher: Arc<PromptDispatcher>,
    sessions: Arc<SessionStore>,
}

impl WebState {
    pub fn new(dispatcher: Arc<PromptDispatcher>) -> Self {
        Self {
            dispatcher,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Discard sessions that have not been visited for `idle_timeout`.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.sessions = Arc::new(SessionStore::with_idle_timeout(idle_timeout));
        self
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }
}

pub fn router(state: WebState) -> axum::Router {
    axum::Router::new()
        .route("/", get(new_session))
        .route("/sessions/{id}/clear", post(clear_history))
        .route("/sessions/{id}/end", post(end_session))
        .route("/sessions/{id}/{panel}", get(show_panel).post(submit_panel))
        .with_state(state)
}

/// Serve the web UI until `shutdown` is cancelled. Idle sessions are swept
/// while serving and open sessions are ended on the way out.
pub async fn serve(
    listener: TcpListener,
    state: WebState,
    shutdown: CancellationToken,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Web UI listening on http://{}", addr);
    }

    let sessions = state.sessions();
    let reaper = sessions.spawn_reaper(shutdown.child_token());

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    reaper.abort();
    sessions.end_all().await;
    info!("Web UI stopped");
    served
}

/// Run one dispatch as its own task, abandoned if `cancel` fires first.
pub async fn run_dispatch(
    dispatcher: Arc<PromptDispatcher>,
    task: TaskRequest,
    cancel: CancellationToken,
) -> Result<String, DomainError> {
    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => Err(DomainError::cancelled(
                "session ended before the response arrived",
            )),
            result = dispatcher.dispatch(&task) => result,
        }
    });

    handle
        .await
        .map_err(|e| DomainError::internal(format!("dispatch task failed: {e}")))?
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found())).into_response()
}

async fn new_session(State(state): State<WebState>) -> Redirect {
    let id = state.sessions.create().await;
    Redirect::to(&format!("/sessions/{id}/{}", Panel::Chat.slug()))
}

async fn show_panel(
    State(state): State<WebState>,
    Path((id, panel)): Path<(String, String)>,
) -> Response {
    let (Some(session), Some(panel)) = (state.sessions.get(&id).await, Panel::from_slug(&panel))
    else {
        return not_found();
    };

    let session = session.lock().await;
    let form = PanelForm::default();
    Html(render_page(&PageView {
        session_id: &id,
        panel,
        transcript: session.transcript(),
        notice: None,
        form: &form,
    }))
    .into_response()
}

async fn submit_panel(
    State(state): State<WebState>,
    Path((id, panel)): Path<(String, String)>,
    Form(form): Form<PanelForm>,
) -> Response {
    let (Some(session), Some(panel)) = (state.sessions.get(&id).await, Panel::from_slug(&panel))
    else {
        return not_found();
    };

    let notice = match form.to_task(panel) {
        Err(warning) => Notice::Warning(warning.to_string()),
        Ok(task) => match task.missing_input() {
            Some(warning) => Notice::Warning(warning.to_string()),
            None => {
                // The lock is released before the call so other requests of
                // this session can render meanwhile.
                let token = session.lock().await.request_token();
                let user_input = task.primary_input().to_string();
                debug!("Session {} submitted {}", id, task.kind());

                match run_dispatch(Arc::clone(&state.dispatcher), task, token).await {
                    Ok(response) => {
                        if panel == Panel::Chat {
                            session
                                .lock()
                                .await
                                .record(ChatHistoryEntry::new(user_input, response.clone()));
                        }
                        Notice::Success {
                            message: panel.success_message().to_string(),
                            body: response,
                        }
                    }
                    Err(e) => Notice::Error(e.to_string()),
                }
            }
        },
    };

    // A delivered chat message moves into the transcript; anything else
    // keeps the form filled for a retry.
    let (notice, form) = match notice {
        Notice::Success { .. } if panel == Panel::Chat => (None, PanelForm::default()),
        other => (Some(other), form),
    };

    let session = session.lock().await;
    Html(render_page(&PageView {
        session_id: &id,
        panel,
        transcript: session.transcript(),
        notice: notice.as_ref(),
        form: &form,
    }))
    .into_response()
}

async fn clear_history(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    let Some(session) = state.sessions.get(&id).await else {
        return not_found();
    };
    session.lock().await.clear_history();
    Redirect::to(&format!("/sessions/{id}/{}", Panel::Chat.slug())).into_response()
}

async fn end_session(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    if state.sessions.end(&id).await {
        Html(render_session_ended()).into_response()
    } else {
        not_found()
    }
}
