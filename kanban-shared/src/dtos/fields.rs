//! Field readers over untyped JSON payloads
//!
//! Each reader answers one question about one key and never panics. Absence
//! (missing key or `null`) is distinguished from malformed content so the
//! DTO constructors can pick the right message.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Non-empty text value. Numbers are accepted in their decimal form.
pub fn text(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `true` when the key exists with a non-null value
pub fn is_present(object: &Value, key: &str) -> bool {
    !matches!(object.get(key), None | Some(Value::Null))
}

/// Optional UUID; present-but-malformed yields `Invalid <label>`
pub fn uuid(object: &Value, key: &str, label: &str) -> Result<Option<Uuid>, String> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| format!("Invalid {}", label)),
        Some(_) => Err(format!("Invalid {}", label)),
    }
}

/// Required UUID: absent → `Missing <label>`, malformed → `Invalid <label>`
pub fn required_uuid(object: &Value, key: &str, label: &str) -> Result<Uuid, String> {
    uuid(object, key, label)?.ok_or_else(|| format!("Missing {}", label))
}

/// Boolean flag with string coercion
///
/// Absent → `default`; a JSON boolean is taken as is; anything else is
/// `true` only when it is the string `"true"`.
pub fn flag(object: &Value, key: &str, default: bool) -> bool {
    match object.get(key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(_) => false,
    }
}

/// Optional flag with the same coercion, `None` when absent
pub fn optional_flag(object: &Value, key: &str) -> Option<bool> {
    object.get(key).map(|_| flag(object, key, false))
}

/// Integer with numeric-string coercion; `Err(())` when not a whole number
pub fn integer(object: &Value, key: &str, default: i64) -> Result<i64, ()> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n.as_i64().ok_or(()),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| ()),
        Some(_) => Err(()),
    }
}

/// Tri-state date used by partial updates
///
/// - `Ok(None)`: key absent, leave untouched
/// - `Ok(Some(None))`: explicit `null`, clear the value
/// - `Ok(Some(Some(t)))`: RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC)
pub fn date(object: &Value, key: &str) -> Result<Option<Option<DateTime<Utc>>>, String> {
    match object.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => parse_date(s)
            .map(|d| Some(Some(d)))
            .ok_or_else(|| format!("Invalid {}", key)),
        Some(_) => Err(format!("Invalid {}", key)),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Array of UUIDs; any non-array or malformed element yields `Invalid <label>`
pub fn uuid_list(object: &Value, key: &str, label: &str) -> Result<Option<Vec<Uuid>>, String> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| format!("Invalid {}", label))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(format!("Invalid {}", label)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_treats_empty_as_missing() {
        let payload = json!({ "name": "", "title": "Task", "count": 3 });
        assert_eq!(text(&payload, "name"), None);
        assert_eq!(text(&payload, "title").as_deref(), Some("Task"));
        assert_eq!(text(&payload, "count").as_deref(), Some("3"));
        assert_eq!(text(&payload, "absent"), None);
    }

    #[test]
    fn test_flag_coercion() {
        let payload = json!({ "a": true, "b": "true", "c": "false", "d": "yes", "e": 1 });
        assert!(flag(&payload, "a", false));
        assert!(flag(&payload, "b", false));
        assert!(!flag(&payload, "c", true));
        assert!(!flag(&payload, "d", true));
        assert!(!flag(&payload, "e", true));
        assert!(flag(&payload, "missing", true));
    }

    #[test]
    fn test_uuid_reader() {
        let id = Uuid::new_v4();
        let payload = json!({ "boardId": id.to_string(), "bad": "nope" });

        assert_eq!(uuid(&payload, "boardId", "board"), Ok(Some(id)));
        assert_eq!(uuid(&payload, "bad", "board"), Err("Invalid board".to_string()));
        assert_eq!(
            required_uuid(&payload, "missing", "board"),
            Err("Missing board".to_string())
        );
    }

    #[test]
    fn test_integer_coercion() {
        let payload = json!({ "page": "2", "limit": 5, "bad": "x", "float": 1.5 });
        assert_eq!(integer(&payload, "page", 1), Ok(2));
        assert_eq!(integer(&payload, "limit", 10), Ok(5));
        assert_eq!(integer(&payload, "missing", 10), Ok(10));
        assert!(integer(&payload, "bad", 1).is_err());
        assert!(integer(&payload, "float", 1).is_err());
    }

    #[test]
    fn test_date_tristate() {
        let payload = json!({
            "startDate": "2024-05-01T10:00:00Z",
            "endDate": null,
            "day": "2024-05-01",
            "bad": "tomorrow"
        });

        assert!(matches!(date(&payload, "startDate"), Ok(Some(Some(_)))));
        assert_eq!(date(&payload, "endDate"), Ok(Some(None)));
        assert_eq!(date(&payload, "missing"), Ok(None));
        assert!(matches!(date(&payload, "day"), Ok(Some(Some(_)))));
        assert_eq!(date(&payload, "bad"), Err("Invalid bad".to_string()));
    }

    #[test]
    fn test_uuid_list() {
        let id = Uuid::new_v4();
        let payload = json!({ "labels": [id.to_string()], "broken": [1, 2] });
        assert_eq!(uuid_list(&payload, "labels", "labels"), Ok(Some(vec![id])));
        assert!(uuid_list(&payload, "broken", "labels").is_err());
        assert_eq!(uuid_list(&payload, "missing", "labels"), Ok(None));
    }
}
