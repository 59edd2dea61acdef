pub mod exercise;
pub mod exercise_type;
pub mod from_row;
pub mod user;
pub mod workout;

pub use exercise::{Exercise, ExerciseEntry, ExerciseTrendRow};
pub use exercise_type::ExerciseType;
pub use from_row::FromSqliteRow;
pub use user::{Gender, LoginCredentials, RegisterForm, SettingsForm, User, UserProfile};
pub use workout::{Workout, WorkoutView, WorkoutWithExercises};
