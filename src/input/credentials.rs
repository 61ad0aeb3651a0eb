//! Credential file parsing.

use std::fs;

use serde::Deserialize;

use crate::input::InputError;
use crate::model::Credentials;

#[derive(Deserialize)]
struct CredentialsFile {
    username: String,
    password: String,
}

/// Load management-controller credentials from a file.
///
/// `.json` files must hold `{"username": ..., "password": ...}`; anything
/// else is parsed as `key=value` lines. One credential pair covers the
/// whole fleet.
pub fn load_credentials(path: &str) -> Result<Credentials, InputError> {
    let content = fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;

    if is_json(path) {
        let file: CredentialsFile =
            serde_json::from_str(&content).map_err(|e| InputError::Json {
                path: path.to_string(),
                source: e,
            })?;
        return Ok(Credentials::new(&file.username, &file.password));
    }

    parse_key_value(path, &content)
}

fn is_json(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Parse `key=value` lines. Unknown keys are ignored; `username` and
/// `password` are both required. Values keep embedded `=` intact, so
/// passwords containing `=` survive.
fn parse_key_value(path: &str, content: &str) -> Result<Credentials, InputError> {
    let mut username = None;
    let mut password = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim().to_ascii_lowercase().as_str() {
                "username" => username = Some(value.trim().to_string()),
                "password" => password = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let username = username.ok_or(InputError::MissingField {
        path: path.to_string(),
        field: "username",
    })?;
    let password = password.ok_or(InputError::MissingField {
        path: path.to_string(),
        field: "password",
    })?;
    Ok(Credentials::new(&username, &password))
}
