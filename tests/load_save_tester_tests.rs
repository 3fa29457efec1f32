//! Tests for the load/save tester itself, using deliberately faulty steps

use step_metadata_sdk::environment;
use step_metadata_sdk::loadsave::{
    AttributeRegistry, BooleanValidator, FieldValidator, GenerationContext, HarnessConfig,
    HarnessError, IntegerValidator, LoadSaveTester, Stage, StringValidator, ValidatorRegistry,
};
use step_metadata_sdk::models::{DatabaseMeta, StepMeta, StepMetaError, SystemDataType};
use step_metadata_sdk::xml::{XmlNode, add_tag_value};

/// Step that loses `count` on save and inverts `flag` on clone
#[derive(Debug, Default, PartialEq)]
struct LeakyMeta {
    label: String,
    count: i32,
    flag: bool,
}

impl Clone for LeakyMeta {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            count: self.count,
            flag: !self.flag,
        }
    }
}

impl StepMeta for LeakyMeta {
    fn step_type_id() -> &'static str {
        "Leaky"
    }

    fn set_default(&mut self) {
        *self = Self::default();
    }

    fn get_xml(&self) -> Result<String, StepMetaError> {
        Ok(format!(
            "{}{}",
            add_tag_value("label", &self.label),
            add_tag_value("flag", &self.flag)
        ))
    }

    fn load_xml(
        &mut self,
        node: &XmlNode,
        _databases: &[DatabaseMeta],
    ) -> Result<(), StepMetaError> {
        self.label = node.get_tag_value("label").unwrap_or_default();
        self.flag = node.get_tag_value("flag").as_deref() == Some("Y");
        Ok(())
    }
}

/// Step whose save output cannot be parsed back
#[derive(Debug, Default, Clone)]
struct GarbledMeta {
    label: String,
}

impl StepMeta for GarbledMeta {
    fn step_type_id() -> &'static str {
        "Garbled"
    }

    fn set_default(&mut self) {
        self.label.clear();
    }

    fn get_xml(&self) -> Result<String, StepMetaError> {
        Ok(format!("<label>{}</lable>", self.label))
    }

    fn load_xml(
        &mut self,
        node: &XmlNode,
        _databases: &[DatabaseMeta],
    ) -> Result<(), StepMetaError> {
        self.label = node.get_tag_value("label").unwrap_or_default();
        Ok(())
    }
}

fn leaky_attributes() -> AttributeRegistry<LeakyMeta> {
    AttributeRegistry::<LeakyMeta>::new()
        .attribute("label", |m| m.label.clone(), |m, v| m.label = v)
        .xml_tag("label")
        .attribute("count", |m| m.count, |m, v| m.count = v)
        .xml_tag("count")
        .attribute("flag", |m| m.flag, |m, v| m.flag = v)
        .xml_tag("flag")
}

fn leaky_validators() -> ValidatorRegistry {
    let count = IntegerValidator::with_range(1, 1000);
    ValidatorRegistry::with_defaults(5).for_attribute("count", count)
}

#[test]
fn test_every_failing_attribute_and_stage_is_reported() {
    environment::init().unwrap();
    let tester = LoadSaveTester::from_registry(leaky_attributes(), leaky_validators()).unwrap();

    let report = tester.run(17).unwrap();
    assert!(!report.is_success());
    assert!(report.has_failure("flag", Stage::Clone));
    assert!(report.has_failure("count", Stage::Serialize));
    assert!(report.has_failure("count", Stage::RoundTrip));
    assert!(!report.has_failure("label", Stage::Clone));
    assert!(!report.has_failure("label", Stage::RoundTrip));
    assert!(!report.has_failure("flag", Stage::RoundTrip));
    assert_eq!(report.failures.len(), 3);
    assert_eq!(report.seed, 17);
}

#[test]
fn test_serialization_fails_with_report() {
    environment::init().unwrap();
    let tester = LoadSaveTester::from_registry(leaky_attributes(), leaky_validators())
        .unwrap()
        .with_config(HarnessConfig::seeded(4));

    let err = tester.test_serialization().unwrap_err();
    let report = err.report().expect("validation failure carries a report");
    assert_eq!(report.seed, 4);
    let message = err.to_string();
    assert!(message.contains("flag [clone]"));
    assert!(message.contains("count [serialize]"));
    assert!(message.contains("count [roundtrip]"));

    let json = report.to_json().unwrap();
    assert!(json.contains("\"roundtrip\""));
}

#[test]
fn test_validator_without_accessor_is_rejected_before_building() {
    let validators = leaky_validators().for_attribute("ratio", IntegerValidator::new());
    let err = LoadSaveTester::from_registry(leaky_attributes(), validators).unwrap_err();
    match err {
        HarnessError::Configuration(message) => assert!(message.contains("ratio")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_declared_attribute_without_accessor_is_rejected() {
    let err = LoadSaveTester::new(
        &["label", "missing"],
        leaky_attributes(),
        leaky_validators(),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("missing")));
}

#[test]
fn test_attribute_without_validator_is_rejected() {
    let attributes = AttributeRegistry::<LeakyMeta>::new()
        .attribute("label", |m| m.label.clone(), |m, v| m.label = v)
        .attribute("kind", |_| SystemDataType::None, |_, _: SystemDataType| {});
    let err = LoadSaveTester::from_registry(attributes, ValidatorRegistry::with_defaults(5))
        .unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("kind")));
}

#[test]
fn test_duplicate_declaration_is_rejected() {
    let err = LoadSaveTester::new(&["label", "label"], leaky_attributes(), leaky_validators())
        .unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(_)));

    let twice = leaky_attributes().attribute("label", |m| m.label.clone(), |m, v| m.label = v);
    let err = LoadSaveTester::from_registry(twice, leaky_validators()).unwrap_err();
    assert!(matches!(err, HarnessError::Configuration(_)));
}

#[test]
fn test_unparsable_output_is_malformed_input() {
    environment::init().unwrap();
    let attributes = AttributeRegistry::<GarbledMeta>::new()
        .attribute("label", |m| m.label.clone(), |m, v| m.label = v);
    let tester = LoadSaveTester::from_registry(
        attributes,
        ValidatorRegistry::new().for_type(StringValidator::alphanumeric()),
    )
    .unwrap();

    let err = tester.run(1).unwrap_err();
    match err {
        HarnessError::MalformedInput { step, xml, .. } => {
            assert_eq!(step, "Garbled");
            assert!(xml.contains("</lable>"));
        }
        other => panic!("expected malformed input, got {:?}", other),
    }
}

#[test]
fn test_same_seed_reproduces_the_run() {
    environment::init().unwrap();
    let tester = LoadSaveTester::from_registry(leaky_attributes(), leaky_validators()).unwrap();
    let first = tester.run(2024).unwrap();
    let second = tester.run(2024).unwrap();
    assert_eq!(first.xml, second.xml);
    assert_eq!(first.failures, second.failures);
}

#[test]
fn test_builtin_validators_are_reflexive_over_many_seeds() {
    let validators: Vec<Box<dyn FieldValidator>> = vec![
        Box::new(StringValidator::new()),
        Box::new(BooleanValidator),
        Box::new(IntegerValidator::new()),
    ];
    for validator in &validators {
        for seed in 0..200 {
            let mut ctx = GenerationContext::new(seed);
            let value = validator.generate(&mut ctx);
            assert!(validator.validate(&value, &value), "seed {}", seed);
        }
    }
}
