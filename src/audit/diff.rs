//! Change summaries for audit entries

use serde_json::Value;

/// Fields that change on every write and carry no information for a reader
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING_CHARS: usize = 40;

/// Summarize the top-level fields that differ between two snapshots
///
/// Returns `None` when nothing but bookkeeping fields changed.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let changes: Vec<String> = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut keys: Vec<&String> = before_obj.keys().chain(after_obj.keys()).collect();
            keys.sort();
            keys.dedup();

            keys.into_iter()
                .filter(|key| !IGNORED_FIELDS.contains(&key.as_str()))
                .filter_map(|key| match (before_obj.get(key), after_obj.get(key)) {
                    (Some(b), Some(a)) if b != a => {
                        Some(format!("{}: {} -> {}", key, format_value(b), format_value(a)))
                    }
                    (Some(b), None) => Some(format!("{}: {} -> (removed)", key, format_value(b))),
                    (None, Some(a)) => Some(format!("{}: (added) -> {}", key, format_value(a))),
                    _ => None,
                })
                .collect()
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_in_key_order() {
        let before = json!({"note": "Lunch", "amount": 100, "wallet_id": "a"});
        let after = json!({"note": "Dinner", "amount": 250, "wallet_id": "a"});

        let diff = summarize_changes(&before, &after).unwrap();
        assert_eq!(diff, "amount: 100 -> 250, note: \"Lunch\" -> \"Dinner\"");
    }

    #[test]
    fn test_updated_at_alone_is_not_a_change() {
        let before = json!({"name": "Cash", "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"name": "Cash", "updated_at": "2025-02-01T00:00:00Z"});

        assert!(summarize_changes(&before, &after).is_none());
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"category_id": "c1"});
        let after = json!({"destination_wallet_id": "w2"});

        let diff = summarize_changes(&before, &after).unwrap();
        assert!(diff.contains("category_id: \"c1\" -> (removed)"));
        assert!(diff.contains("destination_wallet_id: (added) -> \"w2\""));
    }

    #[test]
    fn test_null_to_value() {
        let before = json!({"category_id": null});
        let after = json!({"category_id": "c1"});

        let diff = summarize_changes(&before, &after).unwrap();
        assert_eq!(diff, "category_id: null -> \"c1\"");
    }

    #[test]
    fn test_long_multibyte_string_is_truncated_safely() {
        let before = json!({"note": "Ăn trưa ".repeat(10)});
        let after = json!({"note": "x"});

        let diff = summarize_changes(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_non_object_values() {
        assert_eq!(
            summarize_changes(&json!(1), &json!(2)).as_deref(),
            Some("1 -> 2")
        );
        assert!(summarize_changes(&json!([1]), &json!([1])).is_none());
    }
}
