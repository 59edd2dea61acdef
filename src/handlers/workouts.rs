use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{ExerciseEntry, ExerciseType, WorkoutView};
use crate::repositories::{ExerciseTypeRepository, WorkoutRepository};
use crate::stats::round1;

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_type_repo: ExerciseTypeRepository,
}

// Templates
#[derive(Template)]
#[template(path = "workouts/all.html")]
struct AllWorkoutsTemplate {
    user: AuthUser,
    workouts: Vec<WorkoutView>,
}

#[derive(Template)]
#[template(path = "workouts/new.html")]
struct NewWorkoutTemplate {
    user: AuthUser,
    exercise_types: Vec<ExerciseType>,
    error: Option<String>,
}

// Handlers
pub async fn show_all(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
) -> Result<Response> {
    let workouts = state
        .workout_repo
        .find_all_by_user(&auth_user.id)
        .await?
        .into_iter()
        .map(WorkoutView::from)
        .collect();

    let template = AllWorkoutsTemplate {
        user: auth_user,
        workouts,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

/// POST on the workout list deletes the workout named by
/// `delete_workout_id`, but only when the requester owns it.
pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response> {
    let workout_id = form
        .get("delete_workout_id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing delete_workout_id".to_string()))?;

    let deleted = state.workout_repo.delete(workout_id, &auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(Redirect::to("/show_all_workouts").into_response())
}

pub async fn entry_page(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
) -> Result<Response> {
    let exercise_types = state.exercise_type_repo.find_all().await?;

    let template = NewWorkoutTemplate {
        user: auth_user,
        exercise_types,
        error: None,
    };

    Ok(Html(
        template
            .render()
            .map_err(|e| AppError::Internal(e.to_string()))?,
    )
    .into_response())
}

/// The finished session the client posts, after field parsing.
#[derive(Debug, PartialEq)]
struct SessionForm {
    duration: i64,
    weight: Option<f64>,
    entries: Vec<ExerciseEntry>,
}

/// Parse the indexed `exercise_type_{i}` / `exercise_weight_{i}` form
/// layout. Malformed numeric fields are a validation error rather than
/// a panic or a silent zero.
fn parse_session_form(form: &HashMap<String, String>) -> std::result::Result<SessionForm, String> {
    let duration_str = form
        .get("duration_minutes")
        .map(String::as_str)
        .unwrap_or("0");
    // Clients may submit fractional minutes; truncate like the timer does
    let duration = duration_str
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid duration: {duration_str}"))? as i64;
    if duration < 0 {
        return Err("Duration must be non-negative".to_string());
    }

    let weight = parse_optional_weight(form.get("current_weight"), "current_weight")?;

    let exercise_count: usize = match form.get("exercise_count") {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid exercise count: {s}"))?,
        _ => 0,
    };

    let mut entries = Vec::with_capacity(exercise_count);
    for i in 1..=exercise_count {
        let exercise_type_id = form
            .get(&format!("exercise_type_{i}"))
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string());
        let weight = parse_optional_weight(
            form.get(&format!("exercise_weight_{i}")),
            &format!("exercise_weight_{i}"),
        )?;
        entries.push(ExerciseEntry {
            exercise_type_id,
            weight,
        });
    }

    Ok(SessionForm {
        duration,
        weight,
        entries,
    })
}

fn parse_optional_weight(
    value: Option<&String>,
    field: &str,
) -> std::result::Result<Option<f64>, String> {
    match value {
        Some(s) if !s.trim().is_empty() => {
            let parsed: f64 = s
                .trim()
                .parse()
                .map_err(|_| format!("Invalid number in {field}"))?;
            if parsed < 0.0 {
                return Err(format!("{field} must be non-negative"));
            }
            Ok(Some(round1(parsed)))
        }
        _ => Ok(None),
    }
}

pub async fn submit(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response> {
    let session = match parse_session_form(&form) {
        Ok(session) => session,
        Err(message) => {
            let exercise_types = state.exercise_type_repo.find_all().await?;
            let template = NewWorkoutTemplate {
                user: auth_user,
                exercise_types,
                error: Some(message),
            };
            return Ok(Html(
                template
                    .render()
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            )
            .into_response());
        }
    };

    let today = chrono::Local::now().date_naive();
    state
        .workout_repo
        .record_session(
            &auth_user.id,
            today,
            session.duration,
            session.weight,
            session.entries,
        )
        .await?;

    Ok(Redirect::to("/").into_response())
}
