use crate::data::types::Alert;

/// In-memory alert collection held on the client side. Nothing here talks to
/// the server; dismissal and read state live only for the process lifetime.
#[derive(Debug, Default)]
pub struct AlertInbox {
    alerts: Vec<Alert>,
}

impl AlertInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with a freshly fetched batch, preserving the
    /// read state of alerts that are still present.
    pub fn sync(&mut self, fetched: Vec<Alert>) {
        let read_ids: Vec<String> = self
            .alerts
            .iter()
            .filter(|a| a.is_read)
            .map(|a| a.id.clone())
            .collect();

        self.alerts = fetched
            .into_iter()
            .map(|alert| {
                if read_ids.contains(&alert.id) {
                    alert.as_read()
                } else {
                    alert
                }
            })
            .collect();
    }

    /// Add a locally synthesized alert.
    pub fn push(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Acknowledge an alert. Transitions `is_read` false to true exactly
    /// once; re-marking is a no-op. Returns whether the state changed.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id && !a.is_read) {
            Some(alert) => {
                *alert = alert.as_read();
                true
            }
            None => false,
        }
    }

    /// Drop an alert from the collection. Client-only; there is no
    /// server-side delete.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert(id: &str) -> Alert {
        serde_json::from_value(json!({"id": id, "title": "t", "message": "m"})).unwrap()
    }

    #[test]
    fn mark_read_transitions_once_and_is_idempotent() {
        let mut inbox = AlertInbox::new();
        inbox.push(alert("a1"));

        assert_eq!(inbox.unread_count(), 1);
        assert!(inbox.mark_read("a1"));
        assert_eq!(inbox.unread_count(), 0);

        // Re-marking is a no-op
        assert!(!inbox.mark_read("a1"));
        assert_eq!(inbox.unread_count(), 0);
    }

    #[test]
    fn mark_read_on_unknown_id_is_a_no_op() {
        let mut inbox = AlertInbox::new();
        inbox.push(alert("a1"));
        assert!(!inbox.mark_read("missing"));
        assert_eq!(inbox.unread_count(), 1);
    }

    #[test]
    fn dismiss_removes_from_collection() {
        let mut inbox = AlertInbox::new();
        inbox.push(alert("a1"));
        inbox.push(alert("a2"));

        assert!(inbox.dismiss("a1"));
        assert!(!inbox.dismiss("a1"));
        assert_eq!(inbox.alerts().len(), 1);
        assert_eq!(inbox.alerts()[0].id, "a2");
    }

    #[test]
    fn sync_keeps_read_state_for_surviving_alerts() {
        let mut inbox = AlertInbox::new();
        inbox.push(alert("a1"));
        inbox.push(alert("a2"));
        inbox.mark_read("a1");

        inbox.sync(vec![alert("a1"), alert("a3")]);

        assert_eq!(inbox.alerts().len(), 2);
        assert!(inbox.alerts()[0].is_read, "a1 stays read after sync");
        assert!(!inbox.alerts()[1].is_read);
        assert_eq!(inbox.unread_count(), 1);
    }
}
