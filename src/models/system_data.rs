//! "Get System Info" step metadata
//!
//! Holds a list of output fields, each with a name and the kind of system
//! information it carries. Serialized as:
//!
//! ```xml
//!     <fields>
//!       <field>
//!         <name>hostname</name>
//!         <type>Hostname</type>
//!         </field>
//!       </fields>
//! ```

use crate::models::database::DatabaseMeta;
use crate::models::enums::{DescribedEnum, SystemDataType};
use crate::models::step::{StepMeta, StepMetaError, parse_text};
use crate::xml::{XmlNode, add_tag_value};

/// Metadata of the "Get System Info" step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemDataMeta {
    field_name: Vec<String>,
    field_type: Vec<SystemDataType>,
}

impl SystemDataMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset both field arrays to `nrfields` empty entries
    pub fn allocate(&mut self, nrfields: usize) {
        self.field_name = vec![String::new(); nrfields];
        self.field_type = vec![SystemDataType::None; nrfields];
    }

    pub fn field_name(&self) -> &[String] {
        &self.field_name
    }

    pub fn field_name_mut(&mut self) -> &mut [String] {
        &mut self.field_name
    }

    pub fn set_field_name(&mut self, field_name: Vec<String>) {
        self.field_name = field_name;
    }

    pub fn field_type(&self) -> &[SystemDataType] {
        &self.field_type
    }

    pub fn field_type_mut(&mut self) -> &mut [SystemDataType] {
        &mut self.field_type
    }

    pub fn set_field_type(&mut self, field_type: Vec<SystemDataType>) {
        self.field_type = field_type;
    }

    /// Append one output field
    pub fn add_field(&mut self, name: impl Into<String>, data_type: SystemDataType) {
        self.field_name.push(name.into());
        self.field_type.push(data_type);
    }

    /// Number of output fields
    pub fn len(&self) -> usize {
        self.field_name.len().max(self.field_type.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StepMeta for SystemDataMeta {
    fn step_type_id() -> &'static str {
        "SystemInfo"
    }

    fn set_default(&mut self) {
        self.allocate(0);
    }

    fn get_xml(&self) -> Result<String, StepMetaError> {
        let mut xml = String::with_capacity(64 + self.len() * 96);
        xml.push_str("    <fields>\n");
        for i in 0..self.len() {
            let name = self.field_name.get(i).map(String::as_str).unwrap_or("");
            let data_type = self.field_type.get(i).copied().unwrap_or_default();
            xml.push_str("      <field>\n");
            xml.push_str("        ");
            xml.push_str(&add_tag_value("name", name));
            xml.push_str("        ");
            xml.push_str(&add_tag_value("type", data_type.description()));
            xml.push_str("        </field>\n");
        }
        xml.push_str("      </fields>\n");
        Ok(xml)
    }

    fn load_xml(
        &mut self,
        step_node: &XmlNode,
        _databases: &[DatabaseMeta],
    ) -> Result<(), StepMetaError> {
        let Some(fields) = step_node.sub_node("fields") else {
            self.allocate(0);
            return Ok(());
        };

        self.allocate(fields.count_nodes("field"));
        for (i, field) in fields.sub_nodes("field").enumerate() {
            self.field_name[i] = parse_text(field, "name");
            self.field_type[i] = SystemDataType::get_type_from_string(&parse_text(field, "type"));
        }
        Ok(())
    }
}
