use super::row::Row;
use super::tables::*;
use crate::error::RecordError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// Supplies the raw rows of one table per call. This is the only way data enters the crate.
pub trait RecordSource {
    fn fetch(&self, table: &'static str) -> Result<Vec<Row>, RecordError>;
}

/// A record source backed by a JSON export: an object of table name to an array of row objects.
///
/// Tables absent from the export yield no rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonDump {
    tables: AHashMap<String, Vec<Row>>,
}

impl JsonDump {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json)
            .map_err(|e| RecordError::Source(format!("Failed to parse table dump: {}", e)))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
        serde_json::from_value(value)
            .map_err(|e| RecordError::Source(format!("Failed to parse table dump: {}", e)))
    }

    pub fn from_file(path: &str) -> Result<Self, RecordError> {
        let content = fs::read_to_string(path).map_err(|e| {
            RecordError::Source(format!("Could not read table dump '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, table: &str, rows: Vec<Row>) {
        self.tables.insert(table.to_string(), rows);
    }
}

impl RecordSource for JsonDump {
    fn fetch(&self, table: &'static str) -> Result<Vec<Row>, RecordError> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }
}

/// Loads a table whose key is unique, rejecting a second row for the same key.
pub fn load_unique<T: Table>(
    source: &impl RecordSource,
) -> Result<AHashMap<T::Key, T>, RecordError> {
    let mut results = AHashMap::new();
    for row in source.fetch(T::NAME)? {
        let record = T::from_row(&row)?;
        let key = record.key();
        if results.contains_key(&key) {
            return Err(RecordError::DuplicateKey {
                table: T::NAME,
                key: format!("{:?}", key),
            });
        }
        results.insert(key, record);
    }
    Ok(results)
}

/// Loads a one-to-many table, keeping rows in source order under each key.
pub fn load_many<T: Table>(
    source: &impl RecordSource,
) -> Result<AHashMap<T::Key, Vec<T>>, RecordError> {
    let mut results: AHashMap<T::Key, Vec<T>> = AHashMap::new();
    for row in source.fetch(T::NAME)? {
        let record = T::from_row(&row)?;
        results.entry(record.key()).or_default().push(record);
    }
    Ok(results)
}

/// Every table the graph builder reads, fully materialized.
///
/// Action lists never run to more than a few thousand steps, so loading everything at once is
/// cheaper than issuing targeted queries per group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    pub actions: AHashMap<i64, ActionRecord>,
    pub action_lists: AHashMap<i64, ActionListRecord>,
    pub action_list_groups: AHashMap<i64, Vec<ActionListGroupRecord>>,
    pub groups: AHashMap<i64, GroupRecord>,
    pub group_actions: AHashMap<i64, Vec<GroupActionRecord>>,
    pub group_action_affects: AHashMap<(i64, i64), Vec<AffectRecord>>,
    pub triggers: AHashMap<i64, Vec<TriggerRecord>>,
    pub external_actions: AHashMap<i64, ExternalActionRecord>,
    pub action_events: AHashMap<i64, ActionEventRecord>,
    pub document_types: AHashMap<i64, DocumentTypeRecord>,
    pub emails: AHashMap<i64, EmailRecord>,
    pub action_emails: AHashMap<i64, Vec<ActionEmailRecord>>,
    pub email_recipients: AHashMap<i64, Vec<EmailRecipientRecord>>,
    pub email_documents: AHashMap<i64, Vec<EmailDocumentRecord>>,
    pub email_templates: AHashMap<i64, Vec<EmailTemplateRecord>>,
    pub templates: AHashMap<i64, TemplateRecord>,
    pub email_partner_restrictions: AHashMap<i64, Vec<EmailPartnerRecord>>,
    pub group_partner_restrictions: AHashMap<i64, Vec<GroupPartnerRecord>>,
    pub group_action_partner_restrictions: AHashMap<(i64, i64), Vec<GroupActionPartnerRecord>>,
    pub partners: AHashMap<i64, PartnerRecord>,
    pub partner_types: AHashMap<i64, PartnerTypeRecord>,
    pub partner_type_rels: AHashMap<i64, Vec<PartnerTypeRelRecord>>,
    pub partner_auto_adds: AHashMap<i64, Vec<PartnerAutoAddRecord>>,
}

impl Records {
    /// Fetches and maps every table once. Any schema error aborts the whole load.
    pub fn load(source: &impl RecordSource) -> Result<Self, RecordError> {
        let mut email_partner_restrictions = load_many::<EmailPartnerRecord>(source)?;
        // Placeholder rows with no partner mean "no restriction"; drop them and any emptied lists.
        email_partner_restrictions.retain(|_, rows| {
            rows.retain(|r| r.partner_id.is_some());
            !rows.is_empty()
        });

        let records = Self {
            actions: load_unique(source)?,
            action_lists: load_unique(source)?,
            action_list_groups: load_many(source)?,
            groups: load_unique(source)?,
            group_actions: load_many(source)?,
            group_action_affects: load_many(source)?,
            triggers: load_many(source)?,
            external_actions: load_unique(source)?,
            action_events: load_unique(source)?,
            document_types: load_unique(source)?,
            emails: load_unique(source)?,
            action_emails: load_many(source)?,
            email_recipients: load_many(source)?,
            email_documents: load_many(source)?,
            email_templates: load_many(source)?,
            templates: load_unique(source)?,
            email_partner_restrictions,
            group_partner_restrictions: load_many(source)?,
            group_action_partner_restrictions: load_many(source)?,
            partners: load_unique(source)?,
            partner_types: load_unique(source)?,
            partner_type_rels: load_many(source)?,
            partner_auto_adds: load_many(source)?,
        };
        tracing::debug!(
            actions = records.actions.len(),
            groups = records.groups.len(),
            action_lists = records.action_lists.len(),
            "Loaded records"
        );
        Ok(records)
    }

    /// Saves the loaded records to a file using the bincode format.
    pub fn save_snapshot(&self, path: &str) -> Result<(), RecordError> {
        let bytes = self.to_snapshot_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| {
            RecordError::Snapshot(format!("Could not create file '{}': {}", path, e))
        })?;
        file.write_all(&bytes).map_err(|e| {
            RecordError::Snapshot(format!("Could not write to file '{}': {}", path, e))
        })?;
        Ok(())
    }

    /// Loads records previously written by `save_snapshot`.
    pub fn from_snapshot(path: &str) -> Result<Self, RecordError> {
        let mut file = fs::File::open(path)
            .map_err(|e| RecordError::Snapshot(format!("Could not open file '{}': {}", path, e)))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| {
            RecordError::Snapshot(format!("Could not read from file '{}': {}", path, e))
        })?;
        Self::from_snapshot_bytes(&bytes)
    }

    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, RecordError> {
        encode_to_vec(self, standard())
            .map_err(|e| RecordError::Snapshot(format!("Serialization failed: {}", e)))
    }

    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        decode_from_slice(bytes, standard())
            .map(|(records, _)| records)
            .map_err(|e| RecordError::Snapshot(format!("Deserialization failed: {}", e)))
    }
}
