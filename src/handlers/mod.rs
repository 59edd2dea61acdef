pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod settings;
pub mod users;
pub mod workouts;
