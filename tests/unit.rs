//! Unit tests for core actiongraph types.
mod common;
use actiongraph::builder::classify;
use actiongraph::dot::strip_label_prefix;
use actiongraph::error::MissingReason;
use actiongraph::prelude::*;
use actiongraph::records::{AffectRecord, Table};
use serde_json::json;

#[test]
fn test_task_and_key_display() {
    assert_eq!(format!("{}", Task::Start), "START");
    assert_eq!(format!("{}", Task::Complete), "COMPLETE");
    assert_eq!(format!("{}", ActionKey::new(10, 7)), "10/7");
}

#[test]
fn test_external_action_labels() {
    let plain = ExternalAction::Plain {
        id: 14,
        name: "File Created".to_string(),
    };
    let document = ExternalAction::DocumentAdded {
        id: 121,
        name: "Document Added".to_string(),
        document_type_id: 5,
        document_name: "Survey".to_string(),
    };
    let event = ExternalAction::ActionEventReceived {
        id: 154,
        name: "Received Action Event".to_string(),
        action_event_id: 3,
        action_event_name: "Payoff Received".to_string(),
    };
    assert_eq!(plain.label(), "File Created");
    assert_eq!(document.label(), "Survey Added");
    assert_eq!(event.label(), "Event: Payoff Received");
    assert_eq!(event.id(), 154);
}

#[test]
fn test_label_prefix_is_stripped() {
    assert_eq!(strip_label_prefix("TX: Order Survey"), "Order Survey");
    assert_eq!(strip_label_prefix("Order Survey"), "Order Survey");
    assert_eq!(strip_label_prefix("Note:Order"), "Note:Order");
}

#[test]
fn test_classify_record_with_offset_and_auto_complete() {
    let row: Row = serde_json::from_value(json!({
        "ActionListGroupDefID": 1,
        "ActionDefID": 2,
        "ActionTypeID": 2,
        "AffectActionListGroupDefID": 3,
        "AffectActionDefID": 4,
        "AffectActionTypeID": 1,
        "AffectOffset": -12.5,
        "AffectAutoComplete": true,
    }))
    .unwrap();
    let record = AffectRecord::from_row(&row).unwrap();
    let affects = classify(&record);

    assert_eq!(affects.len(), 2);
    assert!(affects.iter().all(|a| a.target_key() == Some(ActionKey::new(3, 4))));
    match &affects[0] {
        Affect::Offset(offset) => assert_eq!(offset.hours, -12.5),
        other => panic!("Expected an offset affect, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let err = RecordError::ColumnMissing {
        table: "ActionDef",
        field: "name",
        column: "Name",
        reason: MissingReason::Null,
    };
    assert_eq!(
        err.to_string(),
        "ActionDef field name expected a column named Name in the row but got NULL from the db"
    );

    let err = BuildError::UnknownActionList(42);
    assert_eq!(err.to_string(), "Action list 42 does not exist");

    let err = BuildError::from(RecordError::DuplicateKey {
        table: "ActionDef",
        key: "7".to_string(),
    });
    assert!(err.to_string().contains("Was expecting a single ActionDef row for key 7"));

    let err = AffectError::NotMarkDone(Some(false));
    assert!(err.to_string().contains("Some(false)"));
}

#[test]
fn test_duplicate_unique_key_fails_load() {
    let dump = common::DumpBuilder::new()
        .action_def(7, "Order Survey")
        .action_def(7, "Order Survey Again");
    let err = Records::load(&dump.build()).unwrap_err();
    assert_eq!(
        err,
        RecordError::DuplicateKey {
            table: "ActionDef",
            key: "7".to_string(),
        }
    );
}
