//! Environment bootstrap ordering
//!
//! Kept in its own test binary so no other test initializes the
//! environment first.

use step_metadata_sdk::environment;
use step_metadata_sdk::loadsave::{
    AttributeRegistry, HarnessError, LoadSaveTester, StringValidator, ValidatorRegistry,
};
use step_metadata_sdk::models::OraBulkLoaderMeta;

#[test]
fn test_tester_requires_initialized_environment() {
    let attributes = AttributeRegistry::<OraBulkLoaderMeta>::new().attribute(
        "schemaName",
        |m| m.schema_name().clone(),
        |m, v| m.set_schema_name(v),
    );
    let tester = LoadSaveTester::from_registry(
        attributes,
        ValidatorRegistry::new().for_attribute("schemaName", StringValidator::new()),
    )
    .unwrap();

    assert!(!environment::is_initialized());
    let err = tester.run(1).unwrap_err();
    assert!(matches!(err, HarnessError::EnvironmentNotInitialized));

    let env = environment::init().unwrap();
    assert_eq!(env.step_types(), &["SystemInfo", "OraBulkLoader"]);
    assert!(std::ptr::eq(env, environment::init().unwrap()));

    let report = tester.run(1).unwrap();
    assert!(report.is_success(), "{}", report);
}
