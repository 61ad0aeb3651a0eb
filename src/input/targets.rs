//! Server inventory parsing.

use std::fs;

use crate::input::InputError;
use crate::model::ServerTarget;

/// Cluster label for hostnames listed before any cluster header.
pub const DEFAULT_CLUSTER: &str = "default";

/// Load server targets from an inventory file.
///
/// `.csv` files are parsed as CSV with a header row; anything else is
/// parsed as cluster-sectioned text. Input order and duplicates are
/// preserved in both formats.
pub fn load_targets(path: &str) -> Result<Vec<ServerTarget>, InputError> {
    let content = fs::read_to_string(path).map_err(|e| InputError::io(path, e))?;

    let targets = if has_extension(path, "csv") {
        parse_csv(path, &content)?
    } else {
        parse_sectioned_text(&content)
    };

    if targets.is_empty() {
        return Err(InputError::Empty {
            path: path.to_string(),
        });
    }
    Ok(targets)
}

fn has_extension(path: &str, ext: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Parse the cluster-sectioned text format:
///
/// ```text
/// Cluster: production-east
/// web-01.example.com
/// web-02.example.com
///
/// Cluster: staging
/// stage-01.example.com
/// ```
///
/// Blank lines and `#` comments are skipped. Hostnames before the first
/// header land in [`DEFAULT_CLUSTER`].
fn parse_sectioned_text(content: &str) -> Vec<ServerTarget> {
    let mut targets = Vec::new();
    let mut cluster = DEFAULT_CLUSTER.to_string();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = header_cluster_name(line) {
            cluster = if name.is_empty() {
                DEFAULT_CLUSTER.to_string()
            } else {
                name.to_string()
            };
            continue;
        }
        targets.push(ServerTarget::new(line, &cluster));
    }
    targets
}

/// Recognize a `Cluster: <name>` header, case-insensitively.
fn header_cluster_name(line: &str) -> Option<&str> {
    let (key, value) = line.split_once(':')?;
    if key.trim().eq_ignore_ascii_case("cluster") {
        Some(value.trim())
    } else {
        None
    }
}

/// Parse the CSV format: a header row naming a `Hostname` column
/// (case-insensitive) and optionally a `Cluster` column. Any other
/// columns are ignored.
fn parse_csv(path: &str, content: &str) -> Result<Vec<ServerTarget>, InputError> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };
    let columns: Vec<String> = header
        .split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .collect();

    let host_idx = columns
        .iter()
        .position(|c| c == "hostname")
        .ok_or(InputError::MissingColumn {
            path: path.to_string(),
            column: "Hostname",
        })?;
    let cluster_idx = columns.iter().position(|c| c == "cluster");

    let mut targets = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        let host = match fields.get(host_idx) {
            Some(h) if !h.is_empty() => *h,
            _ => continue,
        };
        let cluster = cluster_idx
            .and_then(|i| fields.get(i).copied())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CLUSTER);
        targets.push(ServerTarget::new(host, cluster));
    }
    Ok(targets)
}
