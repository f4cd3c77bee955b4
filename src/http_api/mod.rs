use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    DayEntry, Derivation, HeatmapError, MonthKey, PersonId, Roster, RosterCell, RosterStore,
    Settings, ShiftType, TidySchedule, heatmap_path, load_schedule_dir,
};

#[derive(Clone)]
pub struct AppState {
    schedule: Arc<RwLock<TidySchedule>>,
    roster: Arc<RwLock<Option<Roster>>>,
    schedules_dir: PathBuf,
    heatmaps_dir: PathBuf,
    store: Option<Arc<dyn RosterStore + Send + Sync>>,
}

impl AppState {
    pub fn new(settings: &Settings, schedule: TidySchedule) -> Self {
        Self {
            schedule: Arc::new(RwLock::new(schedule)),
            roster: Arc::new(RwLock::new(None)),
            schedules_dir: settings.schedules_dir.clone(),
            heatmaps_dir: settings.heatmaps_dir.clone(),
            store: None,
        }
    }

    /// Persist the session roster through `store` after every edit.
    pub fn with_store(mut self, store: Arc<dyn RosterStore + Send + Sync>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_roster(self, roster: Roster) -> Self {
        *self.roster.write() = Some(roster);
        self
    }

    fn persist(&self, roster: &Roster) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save_roster(roster) {
                warn!("failed to persist roster for {}: {err}", roster.month());
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_holiday: bool,
    pub entries: Vec<DayEntry>,
}

#[derive(Debug, Serialize)]
struct ReloadSummary {
    records: usize,
    loaded: Vec<String>,
    failures: Vec<FailureBody>,
    diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FailureBody {
    path: String,
    error: String,
}

#[derive(Debug, Deserialize)]
struct NewRosterPayload {
    year: i32,
    month: u32,
    #[serde(default)]
    shifts: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterView {
    pub month: MonthKey,
    pub shifts: Vec<ShiftType>,
    pub dates: Vec<NaiveDate>,
    pub cells: Vec<RosterCell>,
}

impl From<&Roster> for RosterView {
    fn from(roster: &Roster) -> Self {
        Self {
            month: roster.month(),
            shifts: roster.shifts().to_vec(),
            dates: roster.dates(),
            cells: roster.cells(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CellEditPayload {
    date: NaiveDate,
    shift: String,
    #[serde(default)]
    person: Option<String>,
}

#[derive(Debug, Serialize)]
struct CellEditResult {
    cell: RosterCell,
    #[serde(skip_serializing_if = "Option::is_none")]
    derivation: Option<Derivation>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedules/reload", post(reload_schedules))
        .route("/schedules/:date", get(get_day_schedule))
        .route("/roster", get(get_roster).post(create_roster))
        .route("/roster/cells", put(edit_cell))
        .route("/roster/export", get(export_roster))
        .route("/heatmaps/:mmyy", get(get_heatmap))
        .with_state(state)
}

/// Load schedules, restore any stored roster, and serve until shutdown.
pub async fn serve(settings: Settings) -> std::io::Result<()> {
    let schedule = match load_schedule_dir(&settings.schedules_dir) {
        Ok(report) => report.schedule,
        Err(err) => {
            warn!(
                "no schedules loaded from {}: {err}",
                settings.schedules_dir.display()
            );
            TidySchedule::empty()
        }
    };
    let mut state = AppState::new(&settings, schedule);

    #[cfg(feature = "sqlite")]
    if let Some(path) = &settings.roster_db {
        let store = crate::SqliteRosterStore::new(path)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        match store.load_roster() {
            Ok(Some(roster)) => {
                info!("restored roster for {} from {}", roster.month(), path.display());
                state = state.with_roster(roster);
            }
            Ok(None) => {}
            Err(err) => warn!("could not restore roster from {}: {err}", path.display()),
        }
        state = state.with_store(Arc::new(store));
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(settings.http_addr).await?;
    info!("roster-tool HTTP API listening on http://{}", settings.http_addr);
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn reload_schedules(State(state): State<AppState>) -> Result<Json<ReloadSummary>, ApiError> {
    let report = load_schedule_dir(&state.schedules_dir).map_err(|err| {
        ApiError::internal(format!(
            "cannot read {}: {err}",
            state.schedules_dir.display()
        ))
    })?;

    let summary = ReloadSummary {
        records: report.schedule.height(),
        loaded: report
            .loaded
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|failure| FailureBody {
                path: failure.path.display().to_string(),
                error: failure.error.to_string(),
            })
            .collect(),
        diagnostics: report
            .diagnostics
            .iter()
            .map(|(path, diagnostic)| format!("{}: {diagnostic}", path.display()))
            .collect(),
    };
    *state.schedule.write() = report.schedule;
    Ok(Json(summary))
}

async fn get_day_schedule(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DaySchedule>, ApiError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::invalid(format!("invalid date '{date}' (YYYY-MM-DD)")))?;
    let entries = {
        let guard = state.schedule.read();
        guard.for_date(date)?
    };
    if entries.is_empty() {
        return Err(ApiError::not_found(format!("No schedule found for {date}")));
    }
    Ok(Json(DaySchedule {
        date,
        is_holiday: entries.iter().any(|e| e.is_holiday),
        entries,
    }))
}

async fn get_roster(State(state): State<AppState>) -> Result<Json<RosterView>, ApiError> {
    let guard = state.roster.read();
    let roster = guard
        .as_ref()
        .ok_or_else(|| ApiError::not_found("no roster in this session"))?;
    Ok(Json(RosterView::from(roster)))
}

async fn create_roster(
    State(state): State<AppState>,
    Json(payload): Json<NewRosterPayload>,
) -> Result<(StatusCode, Json<RosterView>), ApiError> {
    let month = MonthKey::new(payload.year, payload.month)
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    let roster = match payload.shifts {
        Some(labels) => {
            let shifts = labels
                .iter()
                .map(|label| {
                    ShiftType::parse(label)
                        .ok_or_else(|| ApiError::invalid("shift labels must not be blank"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Roster::with_shifts(month, shifts).map_err(|err| ApiError::invalid(err.to_string()))?
        }
        None => Roster::new(month),
    };

    let view = RosterView::from(&roster);
    state.persist(&roster);
    *state.roster.write() = Some(roster);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn edit_cell(
    State(state): State<AppState>,
    Json(payload): Json<CellEditPayload>,
) -> Result<Json<CellEditResult>, ApiError> {
    let shift = ShiftType::parse(&payload.shift)
        .ok_or_else(|| ApiError::invalid("shift label must not be blank"))?;
    let person = match payload.person.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => Some(PersonId::new(name).map_err(|err| ApiError::invalid(err.to_string()))?),
    };

    let mut guard = state.roster.write();
    let roster = guard
        .as_mut()
        .ok_or_else(|| ApiError::not_found("no roster in this session"))?;
    let derivation = roster
        .assign(payload.date, &shift, person)
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    let cell = roster
        .cell(payload.date, &shift)
        .ok_or_else(|| ApiError::internal("cell missing after edit"))?;
    state.persist(roster);
    Ok(Json(CellEditResult { cell, derivation }))
}

async fn export_roster(State(state): State<AppState>) -> Result<Response, ApiError> {
    let guard = state.roster.read();
    let roster = guard
        .as_ref()
        .ok_or_else(|| ApiError::not_found("no roster in this session"))?;
    let body = roster
        .to_raw_grid()
        .to_csv_string()
        .map_err(|err| ApiError::internal(err.to_string()))?;
    let disposition = format!("attachment; filename=\"{}.csv\"", roster.month().file_stem());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn get_heatmap(
    State(state): State<AppState>,
    Path(mmyy): Path<String>,
) -> Result<Response, ApiError> {
    let path = heatmap_path(&state.heatmaps_dir, &mmyy).map_err(|err| match err {
        HeatmapError::InvalidKey(_) => ApiError::invalid(err.to_string()),
        HeatmapError::NotFound { .. } => ApiError::not_found(err.to_string()),
    })?;
    let bytes = std::fs::read(&path).map_err(|err| ApiError::internal(err.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}
