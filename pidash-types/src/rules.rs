//! Filter configuration exchanged with `GET /config` and `POST /config`.

/// Current filter configuration as served by `GET /config`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConfigRules {
    /// Approve rules, one per line as the user wrote them.
    pub approve_rules: Vec<String>,

    /// Reject rules, one per line as the user wrote them.
    pub reject_rules: Vec<String>,

    /// Block-list sources and how many entries each contributed.
    pub block_list: Vec<(String, u64)>,
}

/// Form submitted to `POST /config`.
///
/// Each list is sent newline-separated under the field names the server
/// expects (`approveRules`, `rejectRules`, `updatedBlockList`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigUpdate {
    pub approve_rules: Vec<String>,
    pub reject_rules: Vec<String>,
    pub updated_block_list: Vec<String>,
}

impl ConfigUpdate {
    /// Build an update that resubmits the given configuration.
    pub fn from_rules(rules: &ConfigRules) -> Self {
        Self {
            approve_rules: rules.approve_rules.clone(),
            reject_rules: rules.reject_rules.clone(),
            updated_block_list: rules.block_list.iter().map(|(src, _)| src.clone()).collect(),
        }
    }

    /// Form fields in submission order.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("approveRules", self.approve_rules.join("\n")),
            ("rejectRules", self.reject_rules.join("\n")),
            ("updatedBlockList", self.updated_block_list.join("\n")),
        ]
    }
}

/// One rule line, classified by its prefix.
///
/// A leading `#` disables the rule, a leading `*` marks the expression as a
/// regular expression; both may be combined as `# * expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub expr: String,
    pub is_regex: bool,
    pub enabled: bool,
}

impl FilterRule {
    /// Classify a rule line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim();
        if rest.is_empty() {
            return None;
        }
        let enabled = match rest.strip_prefix('#') {
            Some(r) => {
                rest = r.trim();
                false
            }
            None => true,
        };
        let is_regex = match rest.strip_prefix('*') {
            Some(r) => {
                rest = r.trim();
                true
            }
            None => false,
        };
        if rest.is_empty() {
            return None;
        }
        Some(Self {
            expr: rest.to_string(),
            is_regex,
            enabled,
        })
    }

    /// Render back to the line syntax the server accepts.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        if !self.enabled {
            line.push_str("# ");
        }
        if self.is_regex {
            line.push_str("* ");
        }
        line.push_str(&self.expr);
        line
    }

    /// Flip the enabled flag.
    pub fn toggled(&self) -> Self {
        Self {
            enabled: !self.enabled,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_prefixes() {
        let plain = FilterRule::parse("example.com").unwrap();
        assert!(plain.enabled && !plain.is_regex);

        let regex = FilterRule::parse("* .*ads.*").unwrap();
        assert!(regex.enabled && regex.is_regex);
        assert_eq!(regex.expr, ".*ads.*");

        let disabled = FilterRule::parse("# * .*track.*").unwrap();
        assert!(!disabled.enabled && disabled.is_regex);
        assert_eq!(disabled.to_line(), "# * .*track.*");

        assert_eq!(FilterRule::parse("   "), None);
        assert_eq!(FilterRule::parse("#"), None);
    }

    #[test]
    fn test_toggle_round_trips_line() {
        let rule = FilterRule::parse("tracker.net").unwrap();
        let off = rule.toggled();
        assert_eq!(off.to_line(), "# tracker.net");
        assert_eq!(off.toggled(), rule);
    }

    #[test]
    fn test_form_fields_are_newline_joined() {
        let rules = ConfigRules {
            approve_rules: vec!["a.com".to_string(), "* b.*".to_string()],
            reject_rules: vec![],
            block_list: vec![("https://lists.example/hosts".to_string(), 1200)],
        };
        let update = ConfigUpdate::from_rules(&rules);
        let fields = update.form_fields();
        assert_eq!(fields[0], ("approveRules", "a.com\n* b.*".to_string()));
        assert_eq!(fields[1], ("rejectRules", String::new()));
        assert_eq!(fields[2], ("updatedBlockList", "https://lists.example/hosts".to_string()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decode_config_with_block_list() {
        let json = r##"{"approve_rules":["a.com"],"reject_rules":["# b.com"],"block_list":[["https://x/hosts",42]]}"##;
        let rules: ConfigRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.block_list, vec![("https://x/hosts".to_string(), 42)]);
        assert_eq!(rules.reject_rules, vec!["# b.com".to_string()]);
    }
}
