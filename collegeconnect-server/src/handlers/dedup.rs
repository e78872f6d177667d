//! Duplicate detection shared by manual submission and peer reconciliation.
//!
//! Two notices are the same when their normalized titles match and their
//! trimmed contents match exactly. `id`, `type` and `datetime` are ignored.

use crate::entities::{Update, UpdatesDocument};

const ALERT_MARKER: &str = "alert:";

/// Lower-case, trim, drop a leading `alert:` marker, trim again.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let trimmed = lowered.trim();
    trimmed
        .strip_prefix(ALERT_MARKER)
        .unwrap_or(trimmed)
        .trim()
        .to_owned()
}

pub fn is_duplicate(title_a: &str, content_a: &str, title_b: &str, content_b: &str) -> bool {
    normalize_title(title_a) == normalize_title(title_b) && content_a.trim() == content_b.trim()
}

/// First stored record equivalent to the `(title, content)` candidate.
pub fn find_duplicate<'a>(
    document: &'a UpdatesDocument,
    title: &str,
    content: &str,
) -> Option<&'a Update> {
    document
        .updates
        .iter()
        .find(|existing| is_duplicate(&existing.title, &existing.content, title, content))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_alert_marker_and_case() {
        assert_eq!(normalize_title("  Alert: Exam Friday "), "exam friday");
        assert_eq!(normalize_title("ALERT:exam friday"), "exam friday");
        assert_eq!(normalize_title("Exam Friday"), "exam friday");
    }

    #[test]
    fn marker_only_stripped_at_start() {
        assert_eq!(normalize_title("Fire alert: drill"), "fire alert: drill");
    }

    #[test]
    fn content_is_case_sensitive_but_trimmed() {
        assert!(is_duplicate("Exam", " Room 101 ", "exam", "Room 101"));
        assert!(!is_duplicate("Exam", "room 101", "Exam", "Room 101"));
    }

    #[test]
    fn type_does_not_participate() {
        let doc = UpdatesDocument {
            updates: vec![Update {
                id: 1,
                title: "Alert: Exam Friday".into(),
                content: "Room 101".into(),
                kind: "assignment".into(),
                datetime: "2025-01-01T00:00:00".into(),
            }],
        };
        let found = find_duplicate(&doc, "exam friday", "Room 101");
        assert_eq!(found.map(|u| u.id), Some(1));
        assert!(find_duplicate(&doc, "exam friday", "Room 102").is_none());
    }
}
