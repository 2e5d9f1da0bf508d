//! Resolves flat records into a cross-referenced action list graph.
//!
//! Building runs in two passes because affects and triggers may point at actions that have not
//! been constructed yet, including actions in groups processed later:
//!
//! 1. **Construct** every group known to the system (not only the action list's, since affects
//!    can create actions in other groups), with its actions, emails, triggers and unbound affects.
//! 2. **Prune** affects that point into groups with no actions and no triggers.
//! 3. **Bind** every affect to the action instance it targets, recording dangling ones.

use crate::error::BuildError;
use crate::model::{
    Action, ActionId, ActionKey, ActionList, Affect, Context, Email, ExternalAction, Group,
    GroupId, Partner, PartnerRestrictions, PartnerType, Task, TemplateRef, Trigger,
};
use crate::records::{
    ActionEmailRecord, GroupActionRecord, GroupRecord, RecordSource, Records, TriggerRecord,
};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

pub mod classify;
pub mod diagnostics;
pub mod partners;

pub use classify::{classify, classify_columns};
pub use diagnostics::{Diagnostics, MissingReference};
pub use partners::{Restricted, RestrictionRow, attach, build_partners};

/// The result of one build: the entity arena, the requested list, and what went missing.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub context: Context,
    pub action_list: ActionList,
    pub diagnostics: Diagnostics,
}

impl BuiltGraph {
    pub fn into_parts(self) -> (Context, ActionList, Diagnostics) {
        (self.context, self.action_list, self.diagnostics)
    }

    /// The action list's own groups, in group order.
    pub fn list_groups(&self) -> impl Iterator<Item = &Group> {
        self.action_list
            .groups
            .iter()
            .map(|id| self.context.group(*id))
    }
}

/// Builds action list graphs out of a loaded record set.
///
/// A builder can be reused; every `build` gets its own `Context`.
pub struct GraphBuilder<'a> {
    records: &'a Records,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(records: &'a Records) -> Self {
        Self { records }
    }

    /// Loads every table from `source` and builds `action_list_id` in one go.
    ///
    /// Schema errors at the source abort the build before anything is constructed.
    pub fn build_from_source(
        source: &impl RecordSource,
        action_list_id: i64,
    ) -> Result<BuiltGraph, BuildError> {
        let records = Records::load(source)?;
        GraphBuilder::new(&records).build(action_list_id)
    }

    pub fn build(&self, action_list_id: i64) -> Result<BuiltGraph, BuildError> {
        let list_record = self
            .records
            .action_lists
            .get(&action_list_id)
            .ok_or(BuildError::UnknownActionList(action_list_id))?;

        let mut diagnostics = Diagnostics::default();
        let mut ctx = Context::default();
        let partners = build_partners(self.records, &mut diagnostics);

        // Pass 1: the list's groups in group order, then every other group by id.
        let mut list_groups = Vec::new();
        let mut seen = AHashSet::new();
        let memberships = self
            .records
            .action_list_groups
            .get(&action_list_id)
            .into_iter()
            .flatten()
            .sorted_by_key(|m| m.order);
        for membership in memberships {
            if !seen.insert(membership.group_id) {
                continue;
            }
            match self.records.groups.get(&membership.group_id) {
                Some(record) => {
                    let id = self.construct_group(
                        &mut ctx,
                        record,
                        membership.optional,
                        &partners,
                        &mut diagnostics,
                    );
                    list_groups.push(id);
                }
                None => {
                    diagnostics.record(MissingReference::GroupDefinition {
                        group_id: membership.group_id,
                    });
                }
            }
        }
        let other_groups = self
            .records
            .groups
            .values()
            .filter(|g| !seen.contains(&g.id))
            .sorted_by_key(|g| g.id);
        for record in other_groups {
            // Groups off the list only materialize on a file if an affect creates them.
            self.construct_group(&mut ctx, record, true, &partners, &mut diagnostics);
        }

        prune_empty_groups(&mut ctx, &mut diagnostics);

        // Pass 2
        bind(&mut ctx, &mut diagnostics);
        ctx.set_partners(partners);

        tracing::info!(
            action_list = action_list_id,
            groups = list_groups.len(),
            actions = ctx.actions().count(),
            missing = diagnostics.missing().count(),
            "Built action list"
        );

        Ok(BuiltGraph {
            context: ctx,
            action_list: ActionList {
                id: list_record.id,
                name: list_record.name.clone(),
                groups: list_groups,
            },
            diagnostics,
        })
    }

    fn construct_group(
        &self,
        ctx: &mut Context,
        record: &GroupRecord,
        optional: bool,
        partners: &AHashMap<i64, Partner>,
        diagnostics: &mut Diagnostics,
    ) -> GroupId {
        let mut group = Group {
            id: ctx.next_group_id(),
            group_id: record.id,
            name: record.name.clone(),
            optional,
            actions: Vec::new(),
            triggers: Vec::new(),
            restrictions: PartnerRestrictions::default(),
        };
        if let Some(rows) = self.records.group_partner_restrictions.get(&record.id) {
            attach(&mut group, rows, partners, diagnostics);
        }
        let id = ctx.insert_group(group);

        let group_actions = self
            .records
            .group_actions
            .get(&record.id)
            .into_iter()
            .flatten()
            .sorted_by_key(|ga| (ga.order.is_none(), ga.order));
        for group_action in group_actions {
            self.construct_action(ctx, id, group_action, partners, diagnostics);
        }

        let triggers: Vec<Trigger> = self
            .records
            .triggers
            .get(&record.id)
            .into_iter()
            .flatten()
            .flat_map(|row| self.construct_triggers(row, diagnostics))
            .collect();
        ctx.group_mut(id).triggers = triggers;
        id
    }

    fn construct_action(
        &self,
        ctx: &mut Context,
        group: GroupId,
        record: &GroupActionRecord,
        partners: &AHashMap<i64, Partner>,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(definition) = self.records.actions.get(&record.action_id) else {
            diagnostics.record(MissingReference::ActionDefinition {
                action_id: record.action_id,
            });
            return;
        };
        let key = ActionKey::new(record.group_id, record.action_id);
        if ctx.lookup_action(key).is_some() {
            tracing::debug!(action = %key, "Skipping duplicate group action row");
            diagnostics.add_duplicate_action();
            return;
        }

        let mut action = Action {
            id: ctx.next_action_id(),
            group,
            key,
            name: definition.name.clone(),
            display_name: definition.display_name.clone(),
            description: definition.description.clone(),
            hidden: definition.hidden,
            dynamic: record.dynamic,
            start_emails: Vec::new(),
            complete_emails: Vec::new(),
            start_affects: Vec::new(),
            complete_affects: Vec::new(),
            restrictions: PartnerRestrictions::default(),
        };

        // Affect order matters to ResWare; rows without an order keep their source position.
        let affect_rows = self
            .records
            .group_action_affects
            .get(&(key.group_id, key.action_id))
            .into_iter()
            .flatten()
            .sorted_by_key(|a| (a.order.is_none(), a.order));
        for row in affect_rows {
            match row.task {
                Some(Task::Start) => action.start_affects.extend(classify(row)),
                Some(Task::Complete) => action.complete_affects.extend(classify(row)),
                None => tracing::debug!(action = %key, "Skipping affect row with no task"),
            }
        }

        for row in self.records.action_emails.get(&key.action_id).into_iter().flatten() {
            let Some(email) = self.construct_email(key, row, partners, diagnostics) else {
                continue;
            };
            match email.task {
                Task::Start => action.start_emails.push(email),
                Task::Complete => action.complete_emails.push(email),
            }
        }

        if let Some(rows) = self
            .records
            .group_action_partner_restrictions
            .get(&(key.group_id, key.action_id))
        {
            attach(&mut action, rows, partners, diagnostics);
        }

        ctx.insert_action(action);
    }

    fn construct_email(
        &self,
        key: ActionKey,
        row: &ActionEmailRecord,
        partners: &AHashMap<i64, Partner>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Email> {
        let records = self.records;
        let email_id = row.email_id;
        let Some(template) = records.emails.get(&email_id) else {
            diagnostics.record(MissingReference::EmailTemplate { email_id });
            return None;
        };

        let mut recipients = Vec::new();
        for rel in records.email_recipients.get(&email_id).into_iter().flatten() {
            match records.partner_types.get(&rel.partner_type_id) {
                Some(t) => recipients.push(PartnerType {
                    id: t.id,
                    name: t.name.clone(),
                }),
                None => {
                    diagnostics.record(MissingReference::PartnerType {
                        partner_type_id: rel.partner_type_id,
                    });
                }
            }
        }

        let mut documents = Vec::new();
        for rel in records.email_documents.get(&email_id).into_iter().flatten() {
            match records.document_types.get(&rel.document_type_id) {
                Some(doc) => documents.push(doc.name.clone()),
                None => {
                    diagnostics.record(MissingReference::DocumentType {
                        document_type_id: rel.document_type_id,
                    });
                }
            }
        }

        let mut templates = Vec::new();
        for rel in records.email_templates.get(&email_id).into_iter().flatten() {
            match records.templates.get(&rel.template_id) {
                Some(t) => templates.push(TemplateRef {
                    id: t.id,
                    name: t.name.clone(),
                    filename: t.filename.clone(),
                }),
                None => {
                    diagnostics.record(MissingReference::Template {
                        template_id: rel.template_id,
                    });
                }
            }
        }

        let mut email = Email {
            email_id,
            key,
            name: template.name.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            task: row.task,
            recipients,
            documents,
            templates,
            restrictions: PartnerRestrictions::default(),
        };
        if let Some(rows) = records.email_partner_restrictions.get(&email_id) {
            attach(&mut email, rows, partners, diagnostics);
        }
        Some(email)
    }

    fn construct_triggers(&self, row: &TriggerRecord, diagnostics: &mut Diagnostics) -> Vec<Trigger> {
        let Some(external_action) = self.construct_external_action(row, diagnostics) else {
            return Vec::new();
        };
        classify(row)
            .into_iter()
            .map(|affect| Trigger {
                external_action: external_action.clone(),
                affect,
            })
            .collect()
    }

    fn construct_external_action(
        &self,
        row: &TriggerRecord,
        diagnostics: &mut Diagnostics,
    ) -> Option<ExternalAction> {
        let records = self.records;
        let id = row.external_action_id;
        let Some(definition) = records.external_actions.get(&id) else {
            diagnostics.record(MissingReference::ExternalAction {
                external_action_id: id,
            });
            return None;
        };
        let name = definition.name.clone();

        if let Some(document_type_id) = row.document_type_id {
            let Some(doc) = records.document_types.get(&document_type_id) else {
                diagnostics.record(MissingReference::DocumentType { document_type_id });
                return None;
            };
            return Some(ExternalAction::DocumentAdded {
                id,
                name,
                document_type_id: doc.id,
                document_name: doc.name.clone(),
            });
        }
        if let Some(action_event_id) = row.action_event_id {
            let Some(event) = records.action_events.get(&action_event_id) else {
                diagnostics.record(MissingReference::ActionEvent { action_event_id });
                return None;
            };
            return Some(ExternalAction::ActionEventReceived {
                id,
                name,
                action_event_id: event.id,
                action_event_name: event.name.clone(),
            });
        }
        Some(ExternalAction::Plain { id, name })
    }
}

/// Drops affects pointing into groups with no actions and no triggers, since nothing exists
/// there to draw.
///
/// Runs once: if pruning empties another group, affects into that group are left to dangle.
fn prune_empty_groups(ctx: &mut Context, diagnostics: &mut Diagnostics) {
    let empty: AHashSet<i64> = ctx
        .groups()
        .filter(|g| g.is_empty())
        .map(|g| g.group_id)
        .collect();
    if empty.is_empty() {
        return;
    }

    let keep = |affect: &Affect| !empty.contains(&affect.group_id());
    let mut pruned = 0;
    for action in ctx.actions_mut() {
        let before = action.start_affects.len() + action.complete_affects.len();
        action.start_affects.retain(keep);
        action.complete_affects.retain(keep);
        pruned += before - action.start_affects.len() - action.complete_affects.len();
    }
    for group in ctx.groups_mut() {
        let before = group.triggers.len();
        group.triggers.retain(|t| keep(&t.affect));
        pruned += before - group.triggers.len();
    }

    tracing::debug!(
        empty_groups = empty.len(),
        pruned_affects = pruned,
        "Pruned affects into empty groups"
    );
    diagnostics.add_pruned(pruned);
}

/// Snapshot of the lookup tables affects are bound against.
struct Resolver {
    actions: AHashMap<ActionKey, ActionId>,
    first_actions: AHashMap<i64, Option<ActionId>>,
}

impl Resolver {
    fn snapshot(ctx: &Context) -> Self {
        Self {
            actions: ctx.actions().map(|a| (a.key, a.id)).collect(),
            first_actions: ctx
                .groups()
                .map(|g| (g.group_id, g.actions.first().copied()))
                .collect(),
        }
    }

    fn bind(&self, affect: &mut Affect, diagnostics: &mut Diagnostics) {
        let resolved = match affect.target_key() {
            Some(key) => {
                let resolved = self.actions.get(&key).copied();
                if resolved.is_none() {
                    diagnostics.record(MissingReference::Action(key));
                }
                resolved
            }
            None => {
                // Create-group affects point at the created group's first action.
                let group_id = affect.group_id();
                let resolved = self.first_actions.get(&group_id).copied().flatten();
                if resolved.is_none() {
                    diagnostics.record(MissingReference::Group { group_id });
                }
                resolved
            }
        };
        affect.set_resolved(resolved);
    }
}

fn bind(ctx: &mut Context, diagnostics: &mut Diagnostics) {
    let resolver = Resolver::snapshot(ctx);
    for action in ctx.actions_mut() {
        for affect in action
            .start_affects
            .iter_mut()
            .chain(action.complete_affects.iter_mut())
        {
            resolver.bind(affect, diagnostics);
        }
    }
    for group in ctx.groups_mut() {
        for trigger in group.triggers.iter_mut() {
            resolver.bind(&mut trigger.affect, diagnostics);
        }
    }
}
