//! Oracle bulk loader step metadata
//!
//! Configures a `sqlldr` based load: target schema and table, the files
//! the loader reads and writes, load tuning limits and the mapping between
//! table columns and stream fields.

use tracing::warn;

use crate::models::database::{DatabaseMeta, find_database};
use crate::models::step::{StepMeta, StepMetaError, parse_flag, parse_int, parse_text};
use crate::xml::{XmlNode, add_tag_value, close_tag, open_tag};

pub const METHOD_AUTO_CONCURRENT: &str = "AUTO_CONCURRENT";
pub const METHOD_AUTO_END: &str = "AUTO_END";
pub const METHOD_MANUAL: &str = "MANUAL";

pub const ACTION_APPEND: &str = "APPEND";
pub const ACTION_INSERT: &str = "INSERT";
pub const ACTION_REPLACE: &str = "REPLACE";
pub const ACTION_TRUNCATE: &str = "TRUNCATE";

pub const DATE_MASK_DATE: &str = "DATE";
pub const DATE_MASK_DATETIME: &str = "DATETIME";

const DEFAULT_COMMIT_SIZE: &str = "100000";
const DEFAULT_MAX_ERRORS: i32 = 50;

/// Metadata of the Oracle bulk loader step
#[derive(Debug, Clone, PartialEq)]
pub struct OraBulkLoaderMeta {
    schema_name: String,
    table_name: String,
    sqlldr: String,
    control_file: String,
    data_file: String,
    log_file: String,
    bad_file: String,
    discard_file: String,
    commit_size: String,
    bind_size: i32,
    read_size: i32,
    max_errors: i32,
    load_method: String,
    load_action: String,
    encoding: String,
    character_set_name: String,
    direct_path: bool,
    erase_files: bool,
    db_name_override: String,
    fail_on_warning: bool,
    fail_on_error: bool,
    parallel: bool,
    alt_record_term: String,
    /// Table columns to load
    field_table: Vec<String>,
    /// Stream field feeding each table column
    field_stream: Vec<String>,
    /// Date mask per column ("DATE", "DATETIME" or empty)
    date_mask: Vec<String>,
    database_meta: Option<DatabaseMeta>,
}

impl Default for OraBulkLoaderMeta {
    fn default() -> Self {
        let mut meta = Self {
            schema_name: String::new(),
            table_name: String::new(),
            sqlldr: String::new(),
            control_file: String::new(),
            data_file: String::new(),
            log_file: String::new(),
            bad_file: String::new(),
            discard_file: String::new(),
            commit_size: String::new(),
            bind_size: 0,
            read_size: 0,
            max_errors: 0,
            load_method: String::new(),
            load_action: String::new(),
            encoding: String::new(),
            character_set_name: String::new(),
            direct_path: false,
            erase_files: false,
            db_name_override: String::new(),
            fail_on_warning: false,
            fail_on_error: false,
            parallel: false,
            alt_record_term: String::new(),
            field_table: Vec::new(),
            field_stream: Vec::new(),
            date_mask: Vec::new(),
            database_meta: None,
        };
        meta.set_default();
        meta
    }
}

macro_rules! accessors {
    ($($field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            pub fn $field(&self) -> &$ty {
                &self.$field
            }

            pub fn $setter(&mut self, value: $ty) {
                self.$field = value;
            }
        )*
    };
}

impl OraBulkLoaderMeta {
    pub fn new() -> Self {
        Self::default()
    }

    accessors! {
        schema_name, set_schema_name: String;
        table_name, set_table_name: String;
        sqlldr, set_sqlldr: String;
        control_file, set_control_file: String;
        data_file, set_data_file: String;
        log_file, set_log_file: String;
        bad_file, set_bad_file: String;
        discard_file, set_discard_file: String;
        commit_size, set_commit_size: String;
        load_method, set_load_method: String;
        load_action, set_load_action: String;
        encoding, set_encoding: String;
        character_set_name, set_character_set_name: String;
        db_name_override, set_db_name_override: String;
        alt_record_term, set_alt_record_term: String;
        field_table, set_field_table: Vec<String>;
        field_stream, set_field_stream: Vec<String>;
        date_mask, set_date_mask: Vec<String>;
        database_meta, set_database_meta: Option<DatabaseMeta>;
    }

    pub fn bind_size(&self) -> i32 {
        self.bind_size
    }

    pub fn set_bind_size(&mut self, bind_size: i32) {
        self.bind_size = bind_size;
    }

    pub fn read_size(&self) -> i32 {
        self.read_size
    }

    pub fn set_read_size(&mut self, read_size: i32) {
        self.read_size = read_size;
    }

    pub fn max_errors(&self) -> i32 {
        self.max_errors
    }

    pub fn set_max_errors(&mut self, max_errors: i32) {
        self.max_errors = max_errors;
    }

    pub fn is_direct_path(&self) -> bool {
        self.direct_path
    }

    pub fn set_direct_path(&mut self, direct_path: bool) {
        self.direct_path = direct_path;
    }

    pub fn is_erase_files(&self) -> bool {
        self.erase_files
    }

    pub fn set_erase_files(&mut self, erase_files: bool) {
        self.erase_files = erase_files;
    }

    pub fn is_fail_on_warning(&self) -> bool {
        self.fail_on_warning
    }

    pub fn set_fail_on_warning(&mut self, fail_on_warning: bool) {
        self.fail_on_warning = fail_on_warning;
    }

    pub fn is_fail_on_error(&self) -> bool {
        self.fail_on_error
    }

    pub fn set_fail_on_error(&mut self, fail_on_error: bool) {
        self.fail_on_error = fail_on_error;
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Reset the three mapping arrays to `nrvalues` empty entries
    pub fn allocate(&mut self, nrvalues: usize) {
        self.field_table = vec![String::new(); nrvalues];
        self.field_stream = vec![String::new(); nrvalues];
        self.date_mask = vec![String::new(); nrvalues];
    }

    /// Bring `field_stream` and `date_mask` to the length of `field_table`.
    ///
    /// Metadata injection may fill the mapping arrays independently; this
    /// pads the shorter ones with empty entries so that every table column
    /// has a stream field and a date mask slot. Nothing happens while
    /// `field_table` is empty.
    pub fn after_injection_synchronization(&mut self) {
        let nrfields = self.field_table.len();
        if nrfields == 0 {
            return;
        }
        normalize_length(&mut self.field_stream, nrfields);
        normalize_length(&mut self.date_mask, nrfields);
    }
}

fn normalize_length(values: &mut Vec<String>, len: usize) {
    if values.len() < len {
        values.resize(len, String::new());
    }
}

impl StepMeta for OraBulkLoaderMeta {
    fn step_type_id() -> &'static str {
        "OraBulkLoader"
    }

    fn set_default(&mut self) {
        self.field_table.clear();
        self.field_stream.clear();
        self.date_mask.clear();
        self.database_meta = None;
        self.commit_size = DEFAULT_COMMIT_SIZE.to_string();
        self.bind_size = 0;
        self.read_size = 0;
        self.max_errors = DEFAULT_MAX_ERRORS;
        self.schema_name = String::new();
        self.table_name = String::new();
        self.load_method = METHOD_AUTO_END.to_string();
        self.load_action = ACTION_APPEND.to_string();
        self.sqlldr = "sqlldr".to_string();
        self.control_file = "control${Internal.Step.CopyNr}.cfg".to_string();
        self.data_file = "load${Internal.Step.CopyNr}.dat".to_string();
        self.log_file = String::new();
        self.bad_file = String::new();
        self.discard_file = String::new();
        self.encoding = String::new();
        self.character_set_name = String::new();
        self.direct_path = false;
        self.erase_files = true;
        self.db_name_override = String::new();
        self.fail_on_warning = false;
        self.fail_on_error = false;
        self.parallel = false;
        self.alt_record_term = String::new();
    }

    fn get_xml(&self) -> Result<String, StepMetaError> {
        if self.field_stream.len() > self.field_table.len()
            || self.date_mask.len() > self.field_table.len()
        {
            return Err(StepMetaError::Inconsistent {
                step: Self::step_type_id().to_string(),
                reason: format!(
                    "{} table fields but {} stream fields and {} date masks",
                    self.field_table.len(),
                    self.field_stream.len(),
                    self.date_mask.len()
                ),
            });
        }

        let mut xml = String::with_capacity(1024 + self.field_table.len() * 128);
        let connection = self
            .database_meta
            .as_ref()
            .map(DatabaseMeta::name)
            .unwrap_or("");

        for line in [
            add_tag_value("commit", &self.commit_size),
            add_tag_value("bind_size", &self.bind_size),
            add_tag_value("read_size", &self.read_size),
            add_tag_value("errors", &self.max_errors),
            add_tag_value("connection", connection),
            add_tag_value("schema", &self.schema_name),
            add_tag_value("table", &self.table_name),
            add_tag_value("load_method", &self.load_method),
            add_tag_value("load_action", &self.load_action),
            add_tag_value("sqlldr", &self.sqlldr),
            add_tag_value("control_file", &self.control_file),
            add_tag_value("data_file", &self.data_file),
            add_tag_value("log_file", &self.log_file),
            add_tag_value("bad_file", &self.bad_file),
            add_tag_value("discard_file", &self.discard_file),
            add_tag_value("direct_path", &self.direct_path),
            add_tag_value("erase_files", &self.erase_files),
            add_tag_value("encoding", &self.encoding),
            add_tag_value("character_set", &self.character_set_name),
            add_tag_value("dbname_override", &self.db_name_override),
            add_tag_value("fail_on_warning", &self.fail_on_warning),
            add_tag_value("fail_on_error", &self.fail_on_error),
            add_tag_value("parallel", &self.parallel),
            add_tag_value("alt_rec_term", &self.alt_record_term),
        ] {
            xml.push_str("    ");
            xml.push_str(&line);
        }

        xml.push_str("    ");
        xml.push_str(&open_tag("mappings"));
        for (i, table_field) in self.field_table.iter().enumerate() {
            let stream_field = self.field_stream.get(i).map(String::as_str).unwrap_or("");
            let date_mask = self.date_mask.get(i).map(String::as_str).unwrap_or("");
            xml.push_str("      ");
            xml.push_str(&open_tag("mapping"));
            xml.push_str("        ");
            xml.push_str(&add_tag_value("stream_name", table_field));
            xml.push_str("        ");
            xml.push_str(&add_tag_value("field_name", stream_field));
            xml.push_str("        ");
            xml.push_str(&add_tag_value("date_mask", date_mask));
            xml.push_str("      ");
            xml.push_str(&close_tag("mapping"));
        }
        xml.push_str("    ");
        xml.push_str(&close_tag("mappings"));

        Ok(xml)
    }

    fn load_xml(
        &mut self,
        step_node: &XmlNode,
        databases: &[DatabaseMeta],
    ) -> Result<(), StepMetaError> {
        let connection = parse_text(step_node, "connection");
        self.database_meta = find_database(databases, &connection).cloned();
        if self.database_meta.is_none() && !connection.is_empty() {
            warn!(
                "Connection '{}' referenced by {} is not defined",
                connection,
                Self::step_type_id()
            );
        }

        self.commit_size = parse_text(step_node, "commit");
        self.bind_size = parse_int(step_node, "bind_size", 0)?;
        self.read_size = parse_int(step_node, "read_size", 0)?;
        self.max_errors = parse_int(step_node, "errors", DEFAULT_MAX_ERRORS)?;
        self.schema_name = parse_text(step_node, "schema");
        self.table_name = parse_text(step_node, "table");
        self.load_method = parse_text(step_node, "load_method");
        self.load_action = parse_text(step_node, "load_action");
        self.sqlldr = parse_text(step_node, "sqlldr");
        self.control_file = parse_text(step_node, "control_file");
        self.data_file = parse_text(step_node, "data_file");
        self.log_file = parse_text(step_node, "log_file");
        self.bad_file = parse_text(step_node, "bad_file");
        self.discard_file = parse_text(step_node, "discard_file");
        self.direct_path = parse_flag(step_node, "direct_path", false)?;
        self.erase_files = parse_flag(step_node, "erase_files", true)?;
        self.encoding = parse_text(step_node, "encoding");
        self.character_set_name = parse_text(step_node, "character_set");
        self.db_name_override = parse_text(step_node, "dbname_override");
        self.fail_on_warning = parse_flag(step_node, "fail_on_warning", false)?;
        self.fail_on_error = parse_flag(step_node, "fail_on_error", false)?;
        self.parallel = parse_flag(step_node, "parallel", false)?;
        self.alt_record_term = parse_text(step_node, "alt_rec_term");

        let nrvalues = step_node
            .sub_node("mappings")
            .map(|m| m.count_nodes("mapping"))
            .unwrap_or(0);
        self.allocate(nrvalues);
        if let Some(mappings) = step_node.sub_node("mappings") {
            for (i, mapping) in mappings.sub_nodes("mapping").enumerate() {
                self.field_table[i] = parse_text(mapping, "stream_name");
                self.field_stream[i] = parse_text(mapping, "field_name");
                self.date_mask[i] = parse_text(mapping, "date_mask");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = OraBulkLoaderMeta::new();
        assert_eq!(meta.commit_size(), "100000");
        assert_eq!(meta.max_errors(), 50);
        assert_eq!(meta.load_method(), METHOD_AUTO_END);
        assert_eq!(meta.load_action(), ACTION_APPEND);
        assert_eq!(meta.sqlldr(), "sqlldr");
        assert!(meta.is_erase_files());
        assert!(!meta.is_direct_path());
        assert!(meta.field_table().is_empty());
        assert!(meta.database_meta().is_none());
    }

    #[test]
    fn test_synchronization_pads_shorter_arrays() {
        let mut meta = OraBulkLoaderMeta::new();
        meta.set_field_table(vec!["a".into(), "b".into(), "c".into()]);
        meta.set_field_stream(vec!["x".into()]);
        meta.set_date_mask(vec![]);
        meta.after_injection_synchronization();
        assert_eq!(
            meta.field_stream(),
            &vec!["x".to_string(), String::new(), String::new()]
        );
        assert_eq!(meta.date_mask(), &vec![String::new(); 3]);
    }

    #[test]
    fn test_synchronization_ignores_empty_table_fields() {
        let mut meta = OraBulkLoaderMeta::new();
        meta.set_field_stream(vec!["x".into()]);
        meta.after_injection_synchronization();
        assert_eq!(meta.field_stream().len(), 1);
        assert!(meta.date_mask().is_empty());
    }

    #[test]
    fn test_unsynchronized_mappings_cannot_be_written() {
        let mut meta = OraBulkLoaderMeta::new();
        meta.set_field_stream(vec!["x".into()]);
        let err = meta.get_xml().unwrap_err();
        assert!(matches!(err, StepMetaError::Inconsistent { .. }));
    }

    #[test]
    fn test_unknown_connection_loads_as_none() {
        let xml = "<connection>nowhere</connection>";
        let meta = OraBulkLoaderMeta::from_xml(xml, &[]).unwrap();
        assert!(meta.database_meta().is_none());
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let err = OraBulkLoaderMeta::from_xml("<bind_size>lots</bind_size>", &[]).unwrap_err();
        assert!(matches!(err, StepMetaError::InvalidValue { ref tag, .. } if tag == "bind_size"));
    }
}
