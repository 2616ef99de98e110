//! A single DNS request as logged by the filtering server.

/// A DNS request and how the filter handled it.
///
/// Served newest-first by `GET /queries/{size}` and pushed one at a time on
/// the websocket as `{"query": {...}}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DnsQuery {
    /// Server-side request id.
    pub id: i64,

    /// When the request arrived, Unix milliseconds.
    pub req_time: i64,

    /// Record type ("A", "AAAA", "HTTPS", ... or "Unknown").
    pub req_type: String,

    /// Queried domain name, without the trailing dot.
    pub name: String,

    /// Whether an answer was sent back to the client.
    pub responded: bool,

    /// Textual form of the answer, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reply: Option<String>,

    /// `Some(true)` if an approve rule matched, `Some(false)` if a reject
    /// rule matched, `None` if no rule applied.
    #[cfg_attr(feature = "serde", serde(default))]
    pub filtered: Option<bool>,

    /// The rule or block-list entry responsible for the decision.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reason: Option<String>,

    /// Time taken to answer, in milliseconds.
    pub resp_time: u64,
}

/// How a query was treated, derived from `responded` and `filtered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Approved,
    Rejected,
    Passed,
    Failed,
}

impl Verdict {
    /// Short label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::Rejected => "Blocked",
            Verdict::Passed => "Passed",
            Verdict::Failed => "Failed",
        }
    }
}

impl DnsQuery {
    /// Classify the query the same way the dashboard series do.
    pub fn verdict(&self) -> Verdict {
        if !self.responded {
            return Verdict::Failed;
        }
        match self.filtered {
            Some(true) => Verdict::Approved,
            Some(false) => Verdict::Rejected,
            None => Verdict::Passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(responded: bool, filtered: Option<bool>) -> DnsQuery {
        DnsQuery {
            id: 1,
            req_time: 1_700_000_000_000,
            req_type: "A".to_string(),
            name: "example.com".to_string(),
            responded,
            reply: None,
            filtered,
            reason: None,
            resp_time: 3,
        }
    }

    #[test]
    fn test_verdict() {
        assert_eq!(query(true, Some(true)).verdict(), Verdict::Approved);
        assert_eq!(query(true, Some(false)).verdict(), Verdict::Rejected);
        assert_eq!(query(true, None).verdict(), Verdict::Passed);
        assert_eq!(query(false, Some(false)).verdict(), Verdict::Failed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decode_server_payload() {
        let json = r#"{
            "id": 4412,
            "req_time": 1700000000123,
            "req_type": "AAAA",
            "name": "ads.example.net",
            "responded": true,
            "reply": "0.0.0.0",
            "filtered": false,
            "reason": "block-list",
            "resp_time": 2
        }"#;
        let q: DnsQuery = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, 4412);
        assert_eq!(q.reply.as_deref(), Some("0.0.0.0"));
        assert_eq!(q.verdict(), Verdict::Rejected);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_optional_fields_may_be_absent_or_null() {
        let json = r#"{"id":1,"req_time":0,"req_type":"A","name":"a.b","responded":true,"filtered":null,"resp_time":0}"#;
        let q: DnsQuery = serde_json::from_str(json).unwrap();
        assert_eq!(q.reply, None);
        assert_eq!(q.filtered, None);
        assert_eq!(q.reason, None);
    }
}
