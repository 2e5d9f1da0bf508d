use crate::model::ActionKey;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A reference in the source data that points at nothing.
///
/// ResWare keeps rows around after the things they point at are deleted, so these are facts
/// about the data, not build failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissingReference {
    /// An affect or trigger targets an action instance that is not in any group.
    Action(ActionKey),
    /// A create-group affect names a group that does not exist or has no actions.
    Group { group_id: i64 },
    ActionDefinition { action_id: i64 },
    GroupDefinition { group_id: i64 },
    EmailTemplate { email_id: i64 },
    ExternalAction { external_action_id: i64 },
    DocumentType { document_type_id: i64 },
    ActionEvent { action_event_id: i64 },
    Partner { partner_id: i64 },
    PartnerType { partner_type_id: i64 },
    Template { template_id: i64 },
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReference::Action(key) => write!(f, "action {}", key),
            MissingReference::Group { group_id } => write!(f, "group {} (or it has no actions)", group_id),
            MissingReference::ActionDefinition { action_id } => {
                write!(f, "action definition {}", action_id)
            }
            MissingReference::GroupDefinition { group_id } => {
                write!(f, "group definition {}", group_id)
            }
            MissingReference::EmailTemplate { email_id } => write!(f, "email template {}", email_id),
            MissingReference::ExternalAction { external_action_id } => {
                write!(f, "external action {}", external_action_id)
            }
            MissingReference::DocumentType { document_type_id } => {
                write!(f, "document type {}", document_type_id)
            }
            MissingReference::ActionEvent { action_event_id } => {
                write!(f, "action event {}", action_event_id)
            }
            MissingReference::Partner { partner_id } => write!(f, "partner {}", partner_id),
            MissingReference::PartnerType { partner_type_id } => {
                write!(f, "partner type {}", partner_type_id)
            }
            MissingReference::Template { template_id } => write!(f, "template {}", template_id),
        }
    }
}

/// Everything worth reporting about one build that did not stop it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    missing: BTreeSet<MissingReference>,
    pruned_affects: usize,
    duplicate_actions: usize,
}

impl Diagnostics {
    /// Records a missing reference, logging it only the first time it is seen in this build.
    pub fn record(&mut self, missing: MissingReference) -> bool {
        let is_new = self.missing.insert(missing);
        if is_new {
            tracing::warn!(missing = %missing, "Skipping reference to missing record");
        }
        is_new
    }

    /// Missing references in a stable order.
    pub fn missing(&self) -> impl Iterator<Item = &MissingReference> {
        self.missing.iter()
    }

    pub fn contains(&self, missing: &MissingReference) -> bool {
        self.missing.contains(missing)
    }

    /// Action keys targeted by affects or triggers that resolved to nothing.
    pub fn dangling_actions(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.missing.iter().filter_map(|m| match m {
            MissingReference::Action(key) => Some(*key),
            _ => None,
        })
    }

    /// Affects dropped because they pointed into an empty group.
    pub fn pruned_affects(&self) -> usize {
        self.pruned_affects
    }

    /// Group action rows skipped because their action instance already existed.
    pub fn duplicate_actions(&self) -> usize {
        self.duplicate_actions
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }

    pub(crate) fn add_pruned(&mut self, count: usize) {
        self.pruned_affects += count;
    }

    pub(crate) fn add_duplicate_action(&mut self) {
        self.duplicate_actions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_each_reference_once() {
        let mut diagnostics = Diagnostics::default();
        let missing = MissingReference::Action(ActionKey::new(3, 4));
        assert!(diagnostics.record(missing));
        assert!(!diagnostics.record(missing));
        assert!(diagnostics.record(MissingReference::Group { group_id: 3 }));

        assert_eq!(diagnostics.missing().count(), 2);
        assert_eq!(
            diagnostics.dangling_actions().collect::<Vec<_>>(),
            vec![ActionKey::new(3, 4)]
        );
        assert!(!diagnostics.is_clean());
    }
}
