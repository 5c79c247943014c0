use crate::errors::AppError;
use crate::form::{self, FormFields, RosterError};
use crate::grid::{CELLS_PER_DAY, DAYS};
use crate::models::{
    BrushRequest, BrushResponse, GridResponse, MemberNameRequest, PointerRequest, PointerResponse,
    RosterResponse, RowResponse, Session, SubmissionRecord, SubmitResponse,
};
use crate::state::AppState;
use crate::storage::record_submission;
use crate::ui::{render_index, render_success};
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Local;
use tracing::{error, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render_index(&session))
}

pub async fn success() -> Html<String> {
    Html(render_success())
}

pub async fn get_grid(State(state): State<AppState>) -> Json<GridResponse> {
    let session = state.session.lock().await;
    Json(GridResponse {
        brush: session.brush,
        grid: session.grid.clone(),
    })
}

pub async fn pointer(
    State(state): State<AppState>,
    Json(payload): Json<PointerRequest>,
) -> Result<Json<PointerResponse>, AppError> {
    let action = payload.action.trim();
    if action != "down" && action != "enter" && action != "up" {
        return Err(AppError::bad_request(
            "action must be 'down', 'enter' or 'up'",
        ));
    }

    let mut session = state.session.lock().await;
    if action == "up" {
        session.gesture.pointer_up();
        return Ok(Json(PointerResponse {
            dragging: false,
            row: None,
        }));
    }

    let (day, index) = cell_target(&payload)?;
    let brush = session.brush;
    let Session { grid, gesture, .. } = &mut *session;
    if action == "down" {
        gesture.pointer_down(grid, day, index, brush);
    } else {
        gesture.pointer_enter(grid, day, index, brush);
    }

    Ok(Json(PointerResponse {
        dragging: gesture.is_dragging(),
        row: Some(RowResponse {
            day,
            cells: grid.row(day),
        }),
    }))
}

fn cell_target(payload: &PointerRequest) -> Result<(u8, usize), AppError> {
    let day = payload
        .day
        .ok_or_else(|| AppError::bad_request("day is required"))?;
    let index = payload
        .index
        .ok_or_else(|| AppError::bad_request("index is required"))?;
    if !DAYS.contains(&day) {
        return Err(AppError::bad_request("day must be between 1 and 3"));
    }
    if index >= CELLS_PER_DAY {
        return Err(AppError::bad_request("index is out of range"));
    }
    Ok((day, index))
}

pub async fn set_brush(
    State(state): State<AppState>,
    Json(payload): Json<BrushRequest>,
) -> Json<BrushResponse> {
    let mut session = state.session.lock().await;
    session.brush = payload.brush;
    Json(BrushResponse {
        brush: session.brush,
    })
}

pub async fn add_member(State(state): State<AppState>) -> Json<RosterResponse> {
    let mut session = state.session.lock().await;
    session.members.add();
    Json(roster_response(&session))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<MemberNameRequest>,
) -> Result<Json<RosterResponse>, AppError> {
    let mut session = state.session.lock().await;
    if !session.members.set(index, payload.name) {
        return Err(AppError::not_found("no such member"));
    }
    Ok(Json(roster_response(&session)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<RosterResponse>, AppError> {
    let mut session = state.session.lock().await;
    match session.members.remove(index) {
        Ok(()) => Ok(Json(roster_response(&session))),
        Err(RosterError::Permanent) => Err(AppError::bad_request(
            "the first two members cannot be removed",
        )),
        Err(RosterError::NoSuchMember) => Err(AppError::not_found("no such member")),
    }
}

pub async fn submit(
    State(state): State<AppState>,
    Json(fields): Json<FormFields>,
) -> Json<SubmitResponse> {
    let session = state.session.lock().await;
    match form::validate(&fields, &session.members, &session.grid) {
        Ok(registration) => {
            info!("registration accepted for band '{}'", registration.band_name);
            let record = SubmissionRecord {
                submitted_at: Local::now().to_rfc3339(),
                registration,
            };
            if let Err(err) = record_submission(&state.submissions_path, &record).await {
                error!("failed to record submission: {}", err.message);
            }
            Json(SubmitResponse {
                ok: true,
                errors: Vec::new(),
                redirect: Some("/success".to_string()),
            })
        }
        Err(errors) => Json(SubmitResponse {
            ok: false,
            errors,
            redirect: None,
        }),
    }
}

fn roster_response(session: &Session) -> RosterResponse {
    RosterResponse {
        members: session.members.names().to_vec(),
    }
}
