use chrono::DateTime;
use serde::Serialize;

/// Timestamp for tables: RFC 3339 input is shown as `YYYY-MM-DD HH:MM:SS`,
/// anything unparseable is shown as given.
pub fn format_when(s: Option<&str>) -> String {
    match s.map(str::trim) {
        None | Some("") => "—".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// Pretty JSON, falling back to `Debug` output if serialization fails.
pub fn pretty<T: Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// `0.123456789` -> `"0.123457"`; `None` -> `"—"`.
pub fn fixed6(v: Option<f64>) -> String {
    v.map_or_else(|| "—".to_string(), |n| format!("{n:.6}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_when(Some("2026-03-01T09:30:00Z")), "2026-03-01 09:30:00");
        assert_eq!(format_when(Some("yesterday")), "yesterday");
        assert_eq!(format_when(Some("  ")), "—");
        assert_eq!(format_when(None), "—");
    }

    #[test]
    fn fixed_six_places() {
        assert_eq!(fixed6(Some(1.2)), "1.200000");
        assert_eq!(fixed6(None), "—");
    }
}
