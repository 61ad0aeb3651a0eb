//! CSV rendering.

use crate::report::aggregate::Report;

const HEADER: &str = "Cluster,Hostname,Protocol,Category,Component,Health,Severity,State,Detail";

/// Render the report as CSV, one line per component row.
///
/// Empty optional fields render as `-` so spreadsheet filters behave.
pub fn render_csv(report: &Report) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for cluster in &report.clusters {
        for result in &cluster.results {
            for row in &result.rows {
                let fields = [
                    cluster.name.as_str(),
                    result.target.identifier.as_str(),
                    result.protocol.as_str(),
                    row.category.as_str(),
                    row.name.as_str(),
                    row.health.as_str(),
                    row.severity().as_str(),
                    row.state.as_deref().unwrap_or("-"),
                    row.detail.as_deref().unwrap_or("-"),
                ];
                let line: Vec<String> = fields.iter().map(|f| escape(f)).collect();
                out.push_str(&line.join(","));
                out.push('\n');
            }
        }
    }
    out
}

/// Quote a field when it would break the row.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
