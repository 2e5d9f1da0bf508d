use super::affect::ActionKey;
use super::entity::{Action, Group, Partner};
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

/// Index of an action instance in its build's `Context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActionId(pub(crate) usize);

/// Index of a group in its build's `Context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(pub(crate) usize);

impl ActionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl GroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every entity of one build and the lookup tables between them.
///
/// Entities refer to each other by `ActionId`/`GroupId` into this arena instead of holding
/// references, so there are no ownership cycles between actions, groups and affects. A context
/// is written only while its build runs and is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Context {
    actions: Vec<Action>,
    groups: Vec<Group>,
    action_index: AHashMap<ActionKey, ActionId>,
    group_index: AHashMap<i64, GroupId>,
    partners: AHashMap<i64, Partner>,
}

/// Ids are only meaningful for the build that produced them. `action` and `group` panic on an
/// id from another build that is out of range; `get_action` returns `None` instead.
impl Context {
    pub fn action(&self, id: ActionId) -> &Action {
        &self.actions[id.0]
    }

    pub fn get_action(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id.0)
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// All action instances, in build order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// All groups, in build order: the action list's groups first, then the rest by id.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn lookup_action(&self, key: ActionKey) -> Option<ActionId> {
        self.action_index.get(&key).copied()
    }

    pub fn find_action(&self, key: ActionKey) -> Option<&Action> {
        self.lookup_action(key).map(|id| self.action(id))
    }

    pub fn lookup_group(&self, group_id: i64) -> Option<GroupId> {
        self.group_index.get(&group_id).copied()
    }

    pub fn find_group(&self, group_id: i64) -> Option<&Group> {
        self.lookup_group(group_id).map(|id| self.group(id))
    }

    pub fn group_of(&self, action: &Action) -> &Group {
        self.group(action.group)
    }

    /// `Group/Action`, the way ResWare users refer to an action instance.
    pub fn action_path(&self, id: ActionId) -> String {
        let action = self.action(id);
        format!("{}/{}", self.group_of(action).name, action.name)
    }

    pub fn partner(&self, id: i64) -> Option<&Partner> {
        self.partners.get(&id)
    }

    pub fn partners(&self) -> impl Iterator<Item = &Partner> {
        self.partners.values()
    }

    pub(crate) fn set_partners(&mut self, partners: AHashMap<i64, Partner>) {
        self.partners = partners;
    }

    pub(crate) fn next_action_id(&self) -> ActionId {
        ActionId(self.actions.len())
    }

    pub(crate) fn next_group_id(&self) -> GroupId {
        GroupId(self.groups.len())
    }

    /// Registers an action. Returns `false`, leaving the context untouched, when its key exists.
    pub(crate) fn insert_action(&mut self, action: Action) -> bool {
        if self.action_index.contains_key(&action.key) {
            return false;
        }
        debug_assert_eq!(action.id, self.next_action_id());
        self.action_index.insert(action.key, action.id);
        self.groups[action.group.0].actions.push(action.id);
        self.actions.push(action);
        true
    }

    pub(crate) fn insert_group(&mut self, group: Group) -> GroupId {
        let id = group.id;
        debug_assert_eq!(id, self.next_group_id());
        self.group_index.insert(group.group_id, id);
        self.groups.push(group);
        id
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }

    pub(crate) fn groups_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.groups.iter_mut()
    }

    pub(crate) fn actions_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        self.actions.iter_mut()
    }
}
