//! Merge of a CampusFlow snapshot (assignments + alerts) into the board.
//!
//! Every peer item is mapped onto the update schema and appended unless an
//! equivalent notice already exists, including ones appended earlier in the
//! same call. Merging the same snapshot twice therefore adds nothing the
//! second time.

use crate::entities::{now_iso, Update, UpdatesDocument};
use crate::handlers::dedup::find_duplicate;
use crate::schemas::sync::{PeerAlert, PeerAssignment, PeerSnapshot};

const ASSIGNMENT_TITLE_PREFIX: &str = "New Assignment: ";
const ASSIGNMENT_KIND: &str = "assignment";
const ALERT_KIND: &str = "alert";
const ALERT_FALLBACK_TITLE: &str = "Alert";

/// Merge `snapshot` into `document`. Returns the number of records added.
pub fn reconcile(document: &mut UpdatesDocument, snapshot: PeerSnapshot) -> usize {
    let mut added = 0;

    let candidates = snapshot
        .assignments
        .unwrap_or_default()
        .into_iter()
        .map(from_assignment)
        .chain(snapshot.alerts.unwrap_or_default().into_iter().map(from_alert));

    for candidate in candidates {
        if find_duplicate(document, &candidate.title, &candidate.content).is_some() {
            continue;
        }
        let id = document.next_id();
        document.updates.push(Update { id, ..candidate });
        added += 1;
    }
    added
}

/// Candidate record for an assignment; `id` is filled in on append.
fn from_assignment(assignment: PeerAssignment) -> Update {
    let content = non_empty(assignment.description)
        .or_else(|| non_empty(assignment.content))
        .unwrap_or_default();
    Update {
        id: 0,
        title: format!(
            "{ASSIGNMENT_TITLE_PREFIX}{}",
            assignment.title.unwrap_or_default()
        ),
        content,
        kind: ASSIGNMENT_KIND.to_owned(),
        datetime: non_empty(assignment.due_date).unwrap_or_else(now_iso),
    }
}

fn from_alert(alert: PeerAlert) -> Update {
    let title = non_empty(alert.title)
        .or_else(|| non_empty(alert.message.clone()))
        .unwrap_or_else(|| ALERT_FALLBACK_TITLE.to_owned());
    Update {
        id: 0,
        title,
        content: alert.message.unwrap_or_default(),
        kind: ALERT_KIND.to_owned(),
        datetime: non_empty(alert.timestamp).unwrap_or_else(now_iso),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
