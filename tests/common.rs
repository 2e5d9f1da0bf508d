//! Common test utilities for assembling ResWare table dumps.
#![allow(dead_code)]

use actiongraph::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

pub const START: i64 = 1;
pub const COMPLETE: i64 = 2;

/// Builds a `JsonDump` table by table, going through the real row-mapping boundary on load.
#[derive(Default)]
pub struct DumpBuilder {
    tables: BTreeMap<&'static str, Vec<Value>>,
}

impl DumpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, table: &'static str, row: Value) -> Self {
        self.tables.entry(table).or_default().push(row);
        self
    }

    pub fn action_list(self, id: i64, name: &str) -> Self {
        self.row("ActionListDef", json!({ "ActionListDefID": id, "Name": name }))
    }

    /// A group definition placed on `list` at `order`.
    pub fn list_group(self, list: i64, id: i64, name: &str, order: i64) -> Self {
        self.group(id, name).row(
            "ActionListGroupsDef",
            json!({
                "ActionListDefId": list,
                "ActionListGroupDefId": id,
                "GroupOrder": order,
                "Optional": 0,
            }),
        )
    }

    /// A group definition that is on no action list.
    pub fn group(self, id: i64, name: &str) -> Self {
        self.row(
            "ActionListGroupDef",
            json!({ "ActionListGroupDefID": id, "ActionListGroupName": name }),
        )
    }

    /// A global action definition.
    pub fn action_def(self, id: i64, name: &str) -> Self {
        self.row(
            "ActionDef",
            json!({
                "ActionDefID": id,
                "Name": name,
                "DisplayName": name,
                "Description": null,
                "Hidden": false,
            }),
        )
    }

    /// An instance of action `action` in `group`, at `order`.
    pub fn group_action(self, group: i64, action: i64, order: i64) -> Self {
        self.row(
            "ActionListGroupActionDef",
            json!({
                "ActionListGroupDefID": group,
                "ActionDefID": action,
                "ActionOrder": order,
                "Dynamic": false,
            }),
        )
    }

    /// Defines an action and places it in a group in one go.
    pub fn action(self, group: i64, action: i64, name: &str) -> Self {
        self.action_def(action, name).group_action(group, action, action)
    }

    pub fn external_action(self, id: i64, name: &str) -> Self {
        self.row(
            "ExternalActionDef",
            json!({ "ExternalActionDefID": id, "Name": name }),
        )
    }

    /// An affect row fired by `task` of the action instance `from`.
    pub fn affect(self, from: (i64, i64), task: i64, columns: Value) -> Self {
        let mut row = object(columns);
        row.insert("ActionListGroupDefID".into(), json!(from.0));
        row.insert("ActionDefID".into(), json!(from.1));
        row.insert("ActionTypeID".into(), json!(task));
        self.row("ActionGroupAffectDef", Value::Object(row))
    }

    /// A trigger row on `group` for `external_action`.
    pub fn trigger(self, group: i64, external_action: i64, columns: Value) -> Self {
        let mut row = object(columns);
        row.insert("ActionListGroupDefID".into(), json!(group));
        row.insert("ExternalActionDefID".into(), json!(external_action));
        self.row("ActionListGroupExternalTriggerAffectsDef", Value::Object(row))
    }

    pub fn to_value(&self) -> Value {
        json!(self.tables)
    }

    pub fn build(&self) -> JsonDump {
        JsonDump::from_value(self.to_value()).expect("Failed to parse test dump")
    }

    pub fn records(&self) -> Records {
        Records::load(&self.build()).expect("Failed to load test records")
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => panic!("Expected affect columns as an object, got {}", other),
    }
}

/// Affect columns that shift the target's task by `hours`.
pub fn offset(target: (i64, i64), task: i64, hours: f64) -> Value {
    json!({
        "AffectActionListGroupDefID": target.0,
        "AffectActionDefID": target.1,
        "AffectActionTypeID": task,
        "AffectOffset": hours,
    })
}

/// Affect columns that mark the target's task done.
pub fn mark_done(target: (i64, i64), task: i64) -> Value {
    json!({
        "AffectActionListGroupDefID": target.0,
        "AffectActionDefID": target.1,
        "AffectActionTypeID": task,
        "AffectAutoComplete": 1,
    })
}

pub fn create_action(target: (i64, i64)) -> Value {
    json!({
        "CreateActionActionListGroupDefID": target.0,
        "CreateActionActionDefID": target.1,
    })
}

pub fn create_group(group: i64) -> Value {
    json!({ "CreateGroupActionListGroupDefID": group })
}

pub const LIST: i64 = 1;
pub const OPENING: i64 = 10;
pub const CLOSING: i64 = 20;
pub const ORDER_TITLE: (i64, i64) = (OPENING, 1);
pub const REVIEW_TITLE: (i64, i64) = (OPENING, 2);
pub const SCHEDULE_CLOSING: (i64, i64) = (CLOSING, 3);
pub const FILE_CREATED: i64 = 14;

/// One action list with two groups: Opening (Order Title, Review Title) and Closing
/// (Schedule Closing).
///
/// Completing Order Title marks Review Title done, starting it shifts Schedule Closing by 24
/// hours, and a "File Created" trigger on Opening creates Review Title.
pub fn purchase_list() -> DumpBuilder {
    DumpBuilder::new()
        .action_list(LIST, "Purchase")
        .list_group(LIST, OPENING, "Opening", 1)
        .list_group(LIST, CLOSING, "Closing", 2)
        .action(OPENING, ORDER_TITLE.1, "TX: Order Title")
        .action(OPENING, REVIEW_TITLE.1, "Review Title")
        .action(CLOSING, SCHEDULE_CLOSING.1, "Schedule Closing")
        .affect(ORDER_TITLE, COMPLETE, mark_done(REVIEW_TITLE, COMPLETE))
        .affect(ORDER_TITLE, START, offset(SCHEDULE_CLOSING, START, 24.0))
        .external_action(FILE_CREATED, "File Created")
        .trigger(OPENING, FILE_CREATED, create_action(REVIEW_TITLE))
}

/// Builds `dump` for `LIST`, failing the test on any error.
pub fn build(dump: &DumpBuilder) -> BuiltGraph {
    GraphBuilder::new(&dump.records())
        .build(LIST)
        .expect("Failed to build action list")
}

/// The ids of the actions in `graph` with the given keys.
pub fn ids(graph: &BuiltGraph, keys: &[(i64, i64)]) -> Vec<ActionId> {
    keys.iter()
        .map(|(g, a)| {
            graph
                .context
                .lookup_action(ActionKey::new(*g, *a))
                .expect("Action was not built")
        })
        .collect()
}
