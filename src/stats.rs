//! Aggregation over a user's workout history.
//!
//! Every function here is pure: records are fetched by the repositories
//! and passed in, so the computations are independent of how rows are
//! stored or rendered. The chart-facing outputs serialize directly to
//! JSON for the dashboard templates.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{ExerciseTrendRow, User, Workout, WorkoutWithExercises};

/// Russian 3-letter month abbreviations used for chart labels.
const MONTH_NAMES: [&str; 12] = [
    "янв", "фев", "мар", "апр", "май", "июн", "июл", "авг", "сен", "окт", "ноя", "дек",
];

/// Placeholder trend label for exercises whose catalog entry is gone.
pub const UNNAMED_EXERCISE: &str = "Без названия";

/// Round to one fractional digit, the precision used for all displayed weights.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Averages for a single calendar month of workouts.
///
/// Absence of data yields zeroed averages, never a division failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub count: i64,
    pub avg_duration: f64,
    pub avg_duration_hours: i64,
    pub avg_duration_mins: i64,
    pub avg_exercises: f64,
    pub avg_weight: f64,
}

pub fn monthly_summary(workouts: &[WorkoutWithExercises]) -> MonthlySummary {
    let count = workouts.len() as i64;
    if count == 0 {
        return MonthlySummary {
            count: 0,
            avg_duration: 0.0,
            avg_duration_hours: 0,
            avg_duration_mins: 0,
            avg_exercises: 0.0,
            avg_weight: 0.0,
        };
    }

    let total_duration: f64 = workouts.iter().map(|w| w.workout.duration as f64).sum();
    let total_exercises: f64 = workouts.iter().map(|w| w.exercise_count as f64).sum();
    let total_weight: f64 = workouts
        .iter()
        .map(|w| w.workout.weight.unwrap_or(0.0))
        .sum();

    let avg_duration = total_duration / count as f64;

    MonthlySummary {
        count,
        avg_duration,
        avg_duration_hours: (avg_duration / 60.0) as i64,
        avg_duration_mins: (avg_duration % 60.0) as i64,
        avg_exercises: total_exercises / count as f64,
        avg_weight: total_weight / count as f64,
    }
}

/// One month of the 12-entry yearly chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    pub month_label: String,
    pub count: i64,
    pub avg_weight: f64,
}

/// Workout count and average body weight for each calendar month of `year`.
///
/// Always returns exactly 12 entries, months 1..=12 in order, with empty
/// months as zeros.
pub fn yearly_series(workouts: &[Workout], year: i32) -> Vec<MonthPoint> {
    (1..=12)
        .map(|month| {
            let in_month: Vec<&Workout> = workouts
                .iter()
                .filter(|w| {
                    use chrono::Datelike;
                    w.date.year() == year && w.date.month() == month
                })
                .collect();

            let count = in_month.len() as i64;
            let avg_weight = if count > 0 {
                let sum: f64 = in_month.iter().map(|w| w.weight.unwrap_or(0.0)).sum();
                round1(sum / count as f64)
            } else {
                0.0
            };

            MonthPoint {
                month_label: format!("{} {:02}", MONTH_NAMES[month as usize - 1], year % 100),
                count,
                avg_weight,
            }
        })
        .collect()
}

/// One charted point of an exercise's weight trend, day granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub weight: f64,
}

/// Per-exercise weight history across all time.
///
/// Rows group by exercise-type name (untyped ones under a fixed
/// placeholder) and then by the workout's ISO date string; each point is
/// the day's mean weight rounded to one decimal. Points within a name
/// ascend by date string.
pub fn exercise_trend(rows: &[ExerciseTrendRow]) -> BTreeMap<String, Vec<TrendPoint>> {
    let mut grouped: BTreeMap<String, BTreeMap<String, Vec<f64>>> = BTreeMap::new();

    for row in rows {
        let name = row
            .type_name
            .clone()
            .unwrap_or_else(|| UNNAMED_EXERCISE.to_string());
        let date = row.date.format("%Y-%m-%d").to_string();
        grouped
            .entry(name)
            .or_default()
            .entry(date)
            .or_default()
            .push(row.weight.unwrap_or(0.0));
    }

    grouped
        .into_iter()
        .map(|(name, by_date)| {
            // BTreeMap iteration gives the dates in ascending ISO order.
            let points = by_date
                .into_iter()
                .map(|(date, weights)| {
                    let avg = weights.iter().sum::<f64>() / weights.len() as f64;
                    TrendPoint {
                        date,
                        weight: round1(avg),
                    }
                })
                .collect();
            (name, points)
        })
        .collect()
}

/// How the leaderboard is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Preserve the underlying fetch order.
    #[default]
    None,
    /// Ascending, missing age treated as 0.
    Age,
    /// Descending by average workout weight.
    Weight,
    /// Descending by total workouts.
    Workouts,
}

impl SortKey {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("age") => SortKey::Age,
            Some("weight") => SortKey::Weight,
            Some("workouts") => SortKey::Workouts,
            _ => SortKey::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub first_name: String,
    pub age: Option<u32>,
    pub total_workouts: i64,
    pub average_weight: f64,
}

/// Per-user workout totals, sorted by the requested key.
///
/// All sorts are stable with no secondary tie-break, so ties keep the
/// fetch order.
pub fn leaderboard(users: &[User], workouts: &[Workout], sort: SortKey) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, (i64, f64)> = HashMap::new();
    for w in workouts {
        let entry = totals.entry(w.user_id.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += w.weight.unwrap_or(0.0);
    }

    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|u| {
            let (total_workouts, weight_sum) = totals.get(u.id.as_str()).copied().unwrap_or((0, 0.0));
            let average_weight = if total_workouts > 0 {
                round1(weight_sum / total_workouts as f64)
            } else {
                0.0
            };
            LeaderboardEntry {
                username: u.username.clone(),
                first_name: u.first_name.clone(),
                age: u.age,
                total_workouts,
                average_weight,
            }
        })
        .collect();

    match sort {
        SortKey::None => {}
        SortKey::Age => entries.sort_by_key(|e| e.age.unwrap_or(0)),
        SortKey::Weight => entries.sort_by(|a, b| {
            b.average_weight
                .partial_cmp(&a.average_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Workouts => entries.sort_by(|a, b| b.total_workouts.cmp(&a.total_workouts)),
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn workout(user_id: &str, date: (i32, u32, u32), weight: Option<f64>) -> Workout {
        Workout {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            duration: 60,
            weight,
            workout_number: 1,
            created_at: Utc::now(),
        }
    }

    fn with_exercises(mut w: Workout, duration: i64, count: i64) -> WorkoutWithExercises {
        w.duration = duration;
        WorkoutWithExercises {
            workout: w,
            exercise_count: count,
        }
    }

    fn user(id: &str, username: &str, age: Option<u32>) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            middle_name: String::new(),
            gender: crate::models::Gender::Male,
            age,
            weight: None,
            height: None,
            registration_date: Utc::now(),
        }
    }

    fn trend_row(name: Option<&str>, date: (i32, u32, u32), weight: Option<f64>) -> ExerciseTrendRow {
        ExerciseTrendRow {
            type_name: name.map(|s| s.to_string()),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            weight,
        }
    }

    #[test]
    fn test_monthly_summary_empty() {
        let summary = monthly_summary(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_duration, 0.0);
        assert_eq!(summary.avg_duration_hours, 0);
        assert_eq!(summary.avg_duration_mins, 0);
        assert_eq!(summary.avg_exercises, 0.0);
        assert_eq!(summary.avg_weight, 0.0);
    }

    #[test]
    fn test_monthly_summary_averages() {
        let workouts = vec![
            with_exercises(workout("u1", (2025, 3, 1), Some(80.0)), 90, 4),
            with_exercises(workout("u1", (2025, 3, 15), None), 30, 2),
        ];
        let summary = monthly_summary(&workouts);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_duration, 60.0);
        assert_eq!(summary.avg_duration_hours, 1);
        assert_eq!(summary.avg_duration_mins, 0);
        assert_eq!(summary.avg_exercises, 3.0);
        // Missing weight counts as 0
        assert_eq!(summary.avg_weight, 40.0);
    }

    #[test]
    fn test_monthly_summary_duration_split() {
        let workouts = vec![with_exercises(workout("u1", (2025, 3, 1), None), 95, 0)];
        let summary = monthly_summary(&workouts);
        assert_eq!(summary.avg_duration_hours, 1);
        assert_eq!(summary.avg_duration_mins, 35);
    }

    #[test]
    fn test_yearly_series_always_twelve_entries() {
        assert_eq!(yearly_series(&[], 2025).len(), 12);

        let one = vec![workout("u1", (2025, 7, 4), Some(70.0))];
        assert_eq!(yearly_series(&one, 2025).len(), 12);
    }

    #[test]
    fn test_yearly_series_march_only() {
        let workouts = vec![
            workout("u1", (2025, 3, 2), Some(84.0)),
            workout("u1", (2025, 3, 20), Some(84.6)),
        ];
        let series = yearly_series(&workouts, 2025);

        let march = &series[2];
        assert_eq!(march.count, 2);
        assert_eq!(march.avg_weight, 84.3);
        assert_eq!(march.month_label, "мар 25");

        for (i, point) in series.iter().enumerate() {
            if i == 2 {
                continue;
            }
            assert_eq!(point.count, 0);
            assert_eq!(point.avg_weight, 0.0);
        }
    }

    #[test]
    fn test_yearly_series_ignores_other_years() {
        let workouts = vec![
            workout("u1", (2024, 3, 2), Some(90.0)),
            workout("u1", (2025, 3, 2), Some(80.0)),
        ];
        let series = yearly_series(&workouts, 2025);
        assert_eq!(series[2].count, 1);
        assert_eq!(series[2].avg_weight, 80.0);
    }

    #[test]
    fn test_yearly_series_labels() {
        let series = yearly_series(&[], 2025);
        assert_eq!(series[0].month_label, "янв 25");
        assert_eq!(series[11].month_label, "дек 25");
    }

    #[test]
    fn test_exercise_trend_groups_by_name_and_date() {
        let rows = vec![
            trend_row(Some("Push-ups"), (2025, 3, 1), Some(20.0)),
            trend_row(Some("Push-ups"), (2025, 3, 1), Some(25.0)),
            trend_row(Some("Push-ups"), (2025, 3, 2), Some(22.0)),
            trend_row(Some("Squats"), (2025, 3, 2), Some(45.0)),
        ];
        let trend = exercise_trend(&rows);

        assert_eq!(trend.len(), 2);
        let pushups = &trend["Push-ups"];
        assert_eq!(pushups.len(), 2);
        assert_eq!(pushups[0].date, "2025-03-01");
        assert_eq!(pushups[0].weight, 22.5);
        assert_eq!(pushups[1].date, "2025-03-02");
        assert_eq!(pushups[1].weight, 22.0);
    }

    #[test]
    fn test_exercise_trend_dates_ascend() {
        let rows = vec![
            trend_row(Some("Squats"), (2025, 3, 10), Some(50.0)),
            trend_row(Some("Squats"), (2025, 1, 5), Some(40.0)),
            trend_row(Some("Squats"), (2025, 2, 20), Some(45.0)),
        ];
        let trend = exercise_trend(&rows);
        let dates: Vec<&str> = trend["Squats"].iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-05", "2025-02-20", "2025-03-10"]);
    }

    #[test]
    fn test_exercise_trend_unnamed_placeholder() {
        let rows = vec![trend_row(None, (2025, 3, 1), Some(10.0))];
        let trend = exercise_trend(&rows);
        assert!(trend.contains_key(UNNAMED_EXERCISE));
    }

    #[test]
    fn test_exercise_trend_missing_weight_counts_as_zero() {
        let rows = vec![
            trend_row(Some("Push-ups"), (2025, 3, 1), Some(30.0)),
            trend_row(Some("Push-ups"), (2025, 3, 1), None),
        ];
        let trend = exercise_trend(&rows);
        assert_eq!(trend["Push-ups"][0].weight, 15.0);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse(Some("age")), SortKey::Age);
        assert_eq!(SortKey::parse(Some("weight")), SortKey::Weight);
        assert_eq!(SortKey::parse(Some("workouts")), SortKey::Workouts);
        assert_eq!(SortKey::parse(Some("garbage")), SortKey::None);
        assert_eq!(SortKey::parse(None), SortKey::None);
    }

    #[test]
    fn test_leaderboard_totals() {
        let users = vec![user("u1", "alice", None), user("u2", "bob", None)];
        let workouts = vec![
            workout("u1", (2025, 3, 1), Some(60.0)),
            workout("u1", (2025, 3, 2), None),
        ];
        let board = leaderboard(&users, &workouts, SortKey::None);

        assert_eq!(board[0].total_workouts, 2);
        assert_eq!(board[0].average_weight, 30.0);
        assert_eq!(board[1].total_workouts, 0);
        assert_eq!(board[1].average_weight, 0.0);
    }

    #[test]
    fn test_leaderboard_sort_by_age_missing_as_zero() {
        let users = vec![
            user("u1", "alice", Some(40)),
            user("u2", "bob", None),
            user("u3", "carol", Some(25)),
        ];
        let board = leaderboard(&users, &[], SortKey::Age);
        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol", "alice"]);
    }

    #[test]
    fn test_leaderboard_sort_by_workouts_descending() {
        let users = vec![user("u1", "alice", None), user("u2", "bob", None)];
        let workouts = vec![
            workout("u2", (2025, 1, 1), None),
            workout("u2", (2025, 1, 2), None),
            workout("u1", (2025, 1, 3), None),
        ];
        let board = leaderboard(&users, &workouts, SortKey::Workouts);
        assert_eq!(board[0].username, "bob");
        assert_eq!(board[1].username, "alice");
    }

    #[test]
    fn test_leaderboard_sort_by_weight_descending() {
        let users = vec![user("u1", "alice", None), user("u2", "bob", None)];
        let workouts = vec![
            workout("u1", (2025, 1, 1), Some(60.0)),
            workout("u2", (2025, 1, 2), Some(90.0)),
        ];
        let board = leaderboard(&users, &workouts, SortKey::Weight);
        assert_eq!(board[0].username, "bob");
    }

    #[test]
    fn test_leaderboard_none_preserves_fetch_order() {
        let users = vec![
            user("u2", "bob", Some(20)),
            user("u1", "alice", Some(50)),
        ];
        let board = leaderboard(&users, &[], SortKey::None);
        assert_eq!(board[0].username, "bob");
        assert_eq!(board[1].username, "alice");
    }

    #[test]
    fn test_month_series_json_round_trip() {
        let workouts = vec![workout("u1", (2025, 3, 2), Some(84.3))];
        let series = yearly_series(&workouts, 2025);

        let json = serde_json::to_string(&series).unwrap();
        let parsed: Vec<MonthPoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, series);
    }

    #[test]
    fn test_exercise_trend_json_round_trip() {
        let rows = vec![
            trend_row(Some("Squats"), (2025, 3, 10), Some(50.0)),
            trend_row(Some("Squats"), (2025, 1, 5), Some(40.0)),
            trend_row(None, (2025, 2, 1), None),
        ];
        let trend = exercise_trend(&rows);

        let json = serde_json::to_string(&trend).unwrap();
        let parsed: BTreeMap<String, Vec<TrendPoint>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, trend);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(84.25), 84.3);
        assert_eq!(round1(84.24), 84.2);
        assert_eq!(round1(0.0), 0.0);
    }
}
