use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "female" => Gender::Female,
            _ => Gender::Male,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub registration_date: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender_str: String = row.get("gender")?;
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            middle_name: row.get("middle_name")?,
            gender: Gender::parse(&gender_str),
            age: row.get("age")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            registration_date: row.get("registration_date")?,
        })
    }
}

fn text_field(fields: &HashMap<String, String>, key: &str) -> String {
    fields.get(key).cloned().unwrap_or_default()
}

/// Optional integer form field. Empty is None; malformed input is a
/// message for the form re-render rather than a rejected request.
fn parse_optional_u32(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<u32>, String> {
    match fields.get(key) {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {key}")),
        _ => Ok(None),
    }
}

/// Optional decimal form field, same policy as [`parse_optional_u32`].
fn parse_optional_f64(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<f64>, String> {
    match fields.get(key) {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {key}")),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct RegisterForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub email: String,
}

impl RegisterForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, String> {
        Ok(Self {
            username: text_field(fields, "username"),
            password1: text_field(fields, "password1"),
            password2: text_field(fields, "password2"),
            first_name: text_field(fields, "first_name"),
            last_name: text_field(fields, "last_name"),
            middle_name: text_field(fields, "middle_name"),
            gender: Gender::parse(fields.get("gender").map(String::as_str).unwrap_or("")),
            age: parse_optional_u32(fields, "age")?,
            weight: parse_optional_f64(fields, "weight")?,
            height: parse_optional_f64(fields, "height")?,
            email: text_field(fields, "email"),
        })
    }
}

#[derive(Debug)]
pub struct SettingsForm {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub email: String,
}

impl SettingsForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, String> {
        Ok(Self {
            first_name: text_field(fields, "first_name"),
            last_name: text_field(fields, "last_name"),
            middle_name: text_field(fields, "middle_name"),
            gender: Gender::parse(fields.get("gender").map(String::as_str).unwrap_or("")),
            age: parse_optional_u32(fields, "age")?,
            weight: parse_optional_f64(fields, "weight")?,
            height: parse_optional_f64(fields, "height")?,
            email: text_field(fields, "email"),
        })
    }
}

/// Profile fields written back by the settings page.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub email: String,
}
