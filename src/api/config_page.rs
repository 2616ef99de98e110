use pidash_types::{ConfigRules, ConfigUpdate, FilterRule};

/// Load status of the config page. Unlike the shared state, the page only
/// remembers that loading failed, not why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Loading,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleList {
    Approve,
    Reject,
}

/// Local state of the config page: the rules being edited, whether the
/// last submission succeeded, and whether a submission is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPage {
    pub status: PageStatus,
    pub rules: ConfigRules,
    /// Result of the last submission, `None` before the first one.
    pub updated: Option<bool>,
    pub update_enabled: bool,
    selected: usize,
}

impl Default for ConfigPage {
    fn default() -> Self {
        Self {
            status: PageStatus::Loading,
            rules: ConfigRules::default(),
            updated: None,
            update_enabled: true,
            selected: 0,
        }
    }
}

impl ConfigPage {
    pub fn loaded(&mut self, rules: ConfigRules) {
        *self = Self {
            status: PageStatus::Done,
            rules,
            ..Self::default()
        };
    }

    pub fn failed(&mut self) {
        *self = Self {
            status: PageStatus::Error,
            ..Self::default()
        };
    }

    /// Approve rules followed by reject rules.
    pub fn rule_count(&self) -> usize {
        self.rules.approve_rules.len() + self.rules.reject_rules.len()
    }

    /// The selected rule as (list, index within that list).
    pub fn selected(&self) -> Option<(RuleList, usize)> {
        let approve = self.rules.approve_rules.len();
        if self.selected < approve {
            Some((RuleList::Approve, self.selected))
        } else if self.selected < self.rule_count() {
            Some((RuleList::Reject, self.selected - approve))
        } else {
            None
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rule_count() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Enable or disable the selected rule by adding or removing its `#`
    /// prefix. Returns whether a rule was changed.
    pub fn toggle_selected(&mut self) -> bool {
        let Some((list, idx)) = self.selected() else {
            return false;
        };
        let lines = match list {
            RuleList::Approve => &mut self.rules.approve_rules,
            RuleList::Reject => &mut self.rules.reject_rules,
        };
        match FilterRule::parse(&lines[idx]) {
            Some(rule) => {
                lines[idx] = rule.toggled().to_line();
                true
            }
            None => false,
        }
    }

    /// Start a submission. Returns `None` while another one is in flight or
    /// before the rules have loaded.
    pub fn begin_update(&mut self) -> Option<ConfigUpdate> {
        if self.status != PageStatus::Done || !self.update_enabled {
            return None;
        }
        self.update_enabled = false;
        Some(ConfigUpdate::from_rules(&self.rules))
    }

    pub fn finish_update(&mut self, updated: bool) {
        self.updated = Some(updated);
        self.update_enabled = true;
    }
}
