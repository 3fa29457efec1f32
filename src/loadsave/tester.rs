//! Load/save round-trip tester
//!
//! Drives one step metadata type through build, repair, clone, save and
//! load, checking every declared attribute with its validator at each
//! stage. Mismatches are collected into a [`RoundTripReport`] rather than
//! stopping the run at the first one.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::attribute::AttributeRegistry;
use super::config::HarnessConfig;
use super::context::GenerationContext;
use super::error::{HarnessError, HarnessResult};
use super::registry::ValidatorRegistry;
use super::report::{RoundTripReport, Stage};
use super::validator::FieldValidator;
use super::value::AttributeValue;
use crate::environment;
use crate::models::step::{StepMeta, StepMetaError};
use crate::xml::XmlNode;

type RepairHook<M> = Box<dyn Fn(&mut M) + Send + Sync>;

/// Declared attribute with its resolved validator
struct AttributeCheck {
    index: usize,
    validator: Arc<dyn FieldValidator>,
}

/// Round-trip tester for the step metadata type `M`
///
/// # Example
///
/// ```rust
/// use step_metadata_sdk::environment;
/// use step_metadata_sdk::loadsave::{
///     ArrayValidator, AttributeRegistry, EnumValidator, LoadSaveTester, StringValidator,
///     ValidatorRegistry,
/// };
/// use step_metadata_sdk::models::{SystemDataMeta, SystemDataType};
///
/// environment::init().unwrap();
///
/// let attributes = AttributeRegistry::<SystemDataMeta>::new()
///     .attribute("fieldName", |m| m.field_name().to_vec(), |m, v| m.set_field_name(v))
///     .attribute("fieldType", |m| m.field_type().to_vec(), |m, v| m.set_field_type(v));
/// let validators = ValidatorRegistry::new()
///     .for_attribute("fieldName", ArrayValidator::new(StringValidator::new(), 5))
///     .for_attribute("fieldType", ArrayValidator::new(EnumValidator::<SystemDataType>::new(), 5));
///
/// let tester = LoadSaveTester::new(&["fieldName", "fieldType"], attributes, validators).unwrap();
/// let report = tester.run(42).unwrap();
/// assert!(report.is_success(), "{}", report);
/// ```
pub struct LoadSaveTester<M: StepMeta> {
    attributes: AttributeRegistry<M>,
    checks: Vec<AttributeCheck>,
    repair: Option<RepairHook<M>>,
    config: HarnessConfig,
}

impl<M: StepMeta> LoadSaveTester<M> {
    /// Create a tester for the `declared` attributes.
    ///
    /// Fails with [`HarnessError::Configuration`] when a declared name is
    /// repeated or has no accessor pair, when a validator is registered for
    /// a name that is not declared, or when an attribute has no validator
    /// of its declared type. An integer validator whose range does not fit
    /// the accessor's integer width is rejected too. Nothing is constructed
    /// in that case.
    pub fn new(
        declared: &[&str],
        attributes: AttributeRegistry<M>,
        validators: ValidatorRegistry,
    ) -> HarnessResult<Self> {
        let mut registered = HashSet::new();
        for name in attributes.names() {
            if !registered.insert(name) {
                return Err(HarnessError::Configuration(format!(
                    "attribute '{}' is registered more than once for {}",
                    name,
                    M::step_type_id()
                )));
            }
        }

        let mut seen = HashSet::new();
        for name in declared {
            if !seen.insert(*name) {
                return Err(HarnessError::Configuration(format!(
                    "attribute '{}' is declared more than once",
                    name
                )));
            }
        }

        for name in validators.attribute_names() {
            if !seen.contains(name) || attributes.get(name).is_none() {
                return Err(HarnessError::Configuration(format!(
                    "validator registered for '{}' but {} has no such attribute",
                    name,
                    M::step_type_id()
                )));
            }
        }

        let mut checks = Vec::with_capacity(declared.len());
        for name in declared {
            let Some(index) = attributes.position(name) else {
                return Err(HarnessError::Configuration(format!(
                    "attribute '{}' has no getter/setter on {}",
                    name,
                    M::step_type_id()
                )));
            };
            let descriptor = attributes.at(index);
            let Some(validator) = validators.resolve(name, descriptor.value_type()) else {
                return Err(HarnessError::Configuration(format!(
                    "no validator for attribute '{}' of type {}",
                    name,
                    descriptor.value_type()
                )));
            };
            if &validator.value_type() != descriptor.value_type() {
                return Err(HarnessError::Configuration(format!(
                    "validator for '{}' produces {} but the attribute is {}",
                    name,
                    validator.value_type(),
                    descriptor.value_type()
                )));
            }
            let ranges = (validator.integer_range(), descriptor.integer_range());
            if let (Some((min, max)), Some((lo, hi))) = ranges
                && (min < lo || max > hi)
            {
                return Err(HarnessError::Configuration(format!(
                    "validator for '{}' generates {}..={} but the attribute holds {}..={}",
                    name, min, max, lo, hi
                )));
            }
            checks.push(AttributeCheck { index, validator });
        }

        debug!(
            "Load/save tester for {} covers {} attribute(s)",
            M::step_type_id(),
            checks.len()
        );

        Ok(Self {
            attributes,
            checks,
            repair: None,
            config: HarnessConfig::default(),
        })
    }

    /// Tester for every attribute in `attributes`, in registration order
    pub fn from_registry(
        attributes: AttributeRegistry<M>,
        validators: ValidatorRegistry,
    ) -> HarnessResult<Self> {
        let names: Vec<String> = attributes.names().map(str::to_string).collect();
        let declared: Vec<&str> = names.iter().map(String::as_str).collect();
        Self::new(&declared, attributes, validators)
    }

    /// Run `hook` on every built instance before it is checked.
    ///
    /// The expected values are re-read from the instance after the hook,
    /// so clone and round trip are checked against the repaired state.
    pub fn with_repair(mut self, hook: impl Fn(&mut M) + Send + Sync + 'static) -> Self {
        self.repair = Some(Box::new(hook));
        self
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Declared attribute names in check order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.checks
            .iter()
            .map(|c| self.attributes.at(c.index).name())
            .collect()
    }

    /// Run one verification with values generated from `seed`
    pub fn run(&self, seed: u64) -> HarnessResult<RoundTripReport> {
        if !environment::is_initialized() {
            return Err(HarnessError::EnvironmentNotInitialized);
        }

        let step = M::step_type_id();
        let array_length = self.config.generation.array_length;
        let mut ctx = GenerationContext::new(seed).with_array_length(array_length);
        let mut report = RoundTripReport::new(step, seed);

        // Build
        let mut meta = M::default();
        let mut expected = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            let value = check.validator.generate(&mut ctx);
            let descriptor = self.attributes.at(check.index);
            descriptor.set(&mut meta, value.clone())?;
            expected.push(value);
        }

        // Repair
        if let Some(repair) = &self.repair {
            repair(&mut meta);
            expected = self.read_values(&meta);
            debug!("Applied repair hook to {}", step);
        }

        // Clone
        let copy = meta.clone();
        self.compare(&copy, &expected, Stage::Clone, &mut report);

        // Serialize
        let xml = meta.get_xml().map_err(|source| HarnessError::Serialize {
            step: step.to_string(),
            source,
        })?;
        let node = XmlNode::parse_fragment(&xml).map_err(|e| HarnessError::MalformedInput {
            step: step.to_string(),
            source: StepMetaError::from(e),
            xml: xml.clone(),
        })?;
        for check in &self.checks {
            let descriptor = self.attributes.at(check.index);
            if let Some(tag) = descriptor.xml_tag()
                && !node.contains_tag(tag)
            {
                let expected = format!("<{}>", tag);
                report.record(descriptor.name(), Stage::Serialize, expected, "missing");
            }
        }

        // Deserialize
        let mut loaded = M::default();
        loaded
            .load_xml(&node, ctx.databases())
            .map_err(|source| HarnessError::MalformedInput {
                step: step.to_string(),
                source,
                xml: xml.clone(),
            })?;
        report.xml = xml;

        // Round trip
        self.compare(&loaded, &expected, Stage::RoundTrip, &mut report);

        if report.is_success() {
            debug!("{} round trip passed (seed {})", step, seed);
        } else {
            warn!(
                "{} round trip failed for {} attribute check(s) (seed {})",
                step,
                report.failures.len(),
                seed
            );
        }
        Ok(report)
    }

    /// Run the configured number of verifications.
    ///
    /// Seeds are consecutive from the configured seed, or from a random
    /// one which is logged so a failure can be replayed.
    pub fn test_serialization(&self) -> HarnessResult<()> {
        let base_seed = match self.config.generation.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!("Testing {} with random seed {}", M::step_type_id(), seed);
                seed
            }
        };

        let iterations = self.config.generation.iterations.max(1);
        for i in 0..iterations {
            let report = self.run(base_seed.wrapping_add(u64::from(i)))?;
            if !report.is_success() {
                return Err(HarnessError::ValidationFailed(Box::new(report)));
            }
        }

        info!(
            "{} survived {} load/save round trip(s)",
            M::step_type_id(),
            iterations
        );
        Ok(())
    }

    fn read_values(&self, meta: &M) -> Vec<AttributeValue> {
        self.checks
            .iter()
            .map(|c| self.attributes.at(c.index).get(meta))
            .collect()
    }

    fn compare(
        &self,
        actual: &M,
        expected: &[AttributeValue],
        stage: Stage,
        report: &mut RoundTripReport,
    ) {
        for (check, expected) in self.checks.iter().zip(expected) {
            let descriptor = self.attributes.at(check.index);
            let value = descriptor.get(actual);
            if !check.validator.validate(expected, &value) {
                report.record(
                    descriptor.name(),
                    stage,
                    expected.to_string(),
                    value.to_string(),
                );
            }
        }
    }
}

impl<M: StepMeta> std::fmt::Debug for LoadSaveTester<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadSaveTester")
            .field("step", &M::step_type_id())
            .field("attributes", &self.attribute_names())
            .field("repair", &self.repair.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadsave::validator::{
        ArrayValidator, EnumValidator, IntegerValidator, StringValidator,
    };
    use crate::models::{SystemDataMeta, SystemDataType};
    use crate::xml::add_tag_value;

    fn system_data_attributes() -> AttributeRegistry<SystemDataMeta> {
        AttributeRegistry::new()
            .attribute(
                "fieldName",
                |m: &SystemDataMeta| m.field_name().to_vec(),
                |m, v| m.set_field_name(v),
            )
            .xml_tag("name")
            .attribute(
                "fieldType",
                |m: &SystemDataMeta| m.field_type().to_vec(),
                |m, v| m.set_field_type(v),
            )
    }

    fn system_data_validators() -> ValidatorRegistry {
        ValidatorRegistry::new()
            .for_attribute("fieldName", ArrayValidator::new(StringValidator::new(), 3))
            .for_attribute(
                "fieldType",
                ArrayValidator::new(EnumValidator::<SystemDataType>::new(), 3),
            )
    }

    #[test]
    fn test_run_reports_success() {
        environment::init().unwrap();
        let tester = LoadSaveTester::new(
            &["fieldName", "fieldType"],
            system_data_attributes(),
            system_data_validators(),
        )
        .unwrap();
        let report = tester.run(5).unwrap();
        assert!(report.is_success(), "{}", report);
        assert!(report.xml.contains("<fields>"));
        assert_eq!(report.step_type, "SystemInfo");
    }

    #[test]
    fn test_undeclared_validator_is_a_configuration_error() {
        let validators = system_data_validators()
            .for_attribute("fieldLength", IntegerValidator::new());
        let err = LoadSaveTester::new(
            &["fieldName", "fieldType"],
            system_data_attributes(),
            validators,
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("fieldLength")));
    }

    #[test]
    fn test_validator_type_must_match_attribute() {
        let types = ArrayValidator::new(EnumValidator::<SystemDataType>::new(), 3);
        let validators = ValidatorRegistry::new()
            .for_attribute("fieldName", StringValidator::new())
            .for_attribute("fieldType", types);
        let attributes = system_data_attributes();
        let err = LoadSaveTester::from_registry(attributes, validators).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("String[]")));
    }

    #[derive(Debug, Default, Clone)]
    struct CounterMeta {
        count: i32,
        totals: Vec<i64>,
    }

    impl StepMeta for CounterMeta {
        fn step_type_id() -> &'static str {
            "Counter"
        }

        fn set_default(&mut self) {
            *self = Self::default();
        }

        fn get_xml(&self) -> Result<String, StepMetaError> {
            let totals: Vec<String> = self.totals.iter().map(i64::to_string).collect();
            Ok(format!(
                "{}{}",
                add_tag_value("count", &self.count),
                add_tag_value("totals", &totals.join(","))
            ))
        }

        fn load_xml(
            &mut self,
            node: &XmlNode,
            _databases: &[crate::models::DatabaseMeta],
        ) -> Result<(), StepMetaError> {
            let count = node.get_tag_value("count").unwrap_or_default();
            self.count = count.parse().unwrap_or_default();
            let totals = node.get_tag_value("totals").unwrap_or_default();
            self.totals = totals.split(',').filter_map(|t| t.parse().ok()).collect();
            Ok(())
        }
    }

    fn counter_attributes() -> AttributeRegistry<CounterMeta> {
        AttributeRegistry::new()
            .attribute("count", |m: &CounterMeta| m.count, |m, v| m.count = v)
            .attribute(
                "totals",
                |m: &CounterMeta| m.totals.clone(),
                |m, v| m.totals = v,
            )
    }

    #[test]
    fn test_integer_range_wider_than_attribute_is_rejected() {
        let wide = IntegerValidator::with_range(0, i64::MAX);
        let validators = ValidatorRegistry::with_defaults(2).for_attribute("count", wide);
        let err = LoadSaveTester::from_registry(counter_attributes(), validators).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(ref m) if m.contains("count")));

        let below = IntegerValidator::with_range(i64::from(i32::MIN) - 1, 0);
        let validators = ValidatorRegistry::with_defaults(2).for_attribute("count", below);
        let err = LoadSaveTester::from_registry(counter_attributes(), validators).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
    }

    #[test]
    fn test_integer_range_within_attribute_is_accepted() {
        let wide = ArrayValidator::new(IntegerValidator::with_range(0, i64::MAX), 2);
        let validators = ValidatorRegistry::with_defaults(2)
            .for_attribute("count", IntegerValidator::with_range(-5, 5))
            .for_attribute("totals", wide);
        assert!(LoadSaveTester::from_registry(counter_attributes(), validators).is_ok());
    }

    #[test]
    fn test_run_uses_configured_array_length() {
        environment::init().unwrap();
        let mut config = HarnessConfig::seeded(6);
        config.generation.array_length = 2;
        let validators = ValidatorRegistry::configured();
        let tester = LoadSaveTester::from_registry(counter_attributes(), validators)
            .unwrap()
            .with_config(config);
        let report = tester.run(6).unwrap();
        assert!(report.is_success(), "{}", report);

        let loaded = CounterMeta::from_xml(&report.xml, &[]).unwrap();
        assert_eq!(loaded.totals.len(), 2);
    }

    #[test]
    fn test_repair_refreshes_expected_values() {
        environment::init().unwrap();
        let attributes = system_data_attributes();
        let tester = LoadSaveTester::from_registry(attributes, system_data_validators())
            .unwrap()
            .with_repair(|m: &mut SystemDataMeta| m.allocate(1));
        let report = tester.run(9).unwrap();
        assert!(report.is_success(), "{}", report);

        let root = XmlNode::parse_fragment(&report.xml).unwrap();
        let fields = root.sub_node("fields").unwrap();
        assert_eq!(fields.count_nodes("field"), 1);
    }
}
