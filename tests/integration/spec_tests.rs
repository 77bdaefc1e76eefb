//! Spec validation tests.
//!
//! An invalid spec never yields a catalog, an orchestrator or a service.

use crate::mocks::*;
use rulekit::error::SpecError;
use rulekit::spec::validate_spec;
use rulekit::{Catalog, CategorySpec, CheckService, EngineConfig, Error, PluginInfo, RuleSpec, RuleType};

fn assert_rule_error(result: Result<Catalog, SpecError>) {
    assert!(matches!(result, Err(SpecError::Rule(_))), "{:?}", result.err());
}

fn assert_category_error(result: Result<Catalog, SpecError>) {
    assert!(matches!(result, Err(SpecError::Category(_))), "{:?}", result.err());
}

#[test]
fn test_valid_spec_builds_catalog() {
    let spec = three_rule_spec();
    assert!(validate_spec(&spec).is_ok());
    let catalog = Catalog::new(&spec).unwrap();
    assert_eq!(catalog.rules().len(), 3);
    assert_eq!(catalog.categories().len(), 2);
    let rule3 = catalog.rule("RULE3").unwrap();
    let category_ids: Vec<&str> = rule3.category_ids().collect();
    assert_eq!(category_ids, vec!["CATEGORY1", "CATEGORY2"]);
}

#[test]
fn test_duplicate_id_across_rules_and_categories() {
    let mut spec = three_rule_spec();
    spec.categories.push(CategorySpec::new("RULE1", "Clashes with a rule."));
    let err = Catalog::new(&spec).unwrap_err();
    assert!(matches!(err, SpecError::Spec(ref message) if message.contains("RULE1")));
}

#[test]
fn test_duplicate_rule_ids() {
    let mut spec = three_rule_spec();
    spec.rules
        .push(RuleSpec::new("RULE2", "Checks two again.", RuleType::Lint, noop_handler()));
    assert!(matches!(Catalog::new(&spec), Err(SpecError::Spec(_))));
}

#[test]
fn test_empty_spec_rejected() {
    let spec = rulekit::Spec::default();
    assert!(matches!(Catalog::new(&spec), Err(SpecError::Spec(_))));
}

#[test]
fn test_replacements_require_deprecation() {
    let mut spec = three_rule_spec();
    spec.rules[1].replacement_ids = vec!["RULE2".to_string()];
    assert_rule_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.categories[0].replacement_ids = vec!["CATEGORY1".to_string()];
    assert_category_error(Catalog::new(&spec));
}

#[test]
fn test_replacement_must_exist_and_be_current() {
    let mut spec = three_rule_spec();
    spec.rules[2] = spec.rules[2].clone().deprecated_by(["RULE9"]);
    assert_rule_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.rules[2] = spec.rules[2].clone().deprecated_by(["RULE3"]);
    spec.rules[0] = spec.rules[0].clone().deprecated_by(["RULE1"]);
    assert_rule_error(Catalog::new(&spec));
}

#[test]
fn test_category_replacement_must_exist_and_be_current() {
    let mut spec = three_rule_spec();
    spec.categories[0] = spec.categories[0].clone().deprecated_by(["CATEGORY9"]);
    assert_category_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.categories[0] = spec.categories[0].clone().deprecated_by(["CATEGORY1"]);
    spec.categories[1] = spec.categories[1].clone().deprecated_by(["CATEGORY2"]);
    assert_category_error(Catalog::new(&spec));
}

#[test]
fn test_category_cannot_be_replaced_by_rule() {
    let mut spec = three_rule_spec();
    spec.categories[0] = spec.categories[0].clone().deprecated_by(["RULE3"]);
    assert_category_error(Catalog::new(&spec));
}

#[test]
fn test_deprecated_category_with_current_replacement() {
    let mut spec = three_rule_spec();
    spec.categories[0] = spec.categories[0].clone().deprecated_by(["CATEGORY1"]);
    let catalog = Catalog::new(&spec).unwrap();
    let category2 = catalog.category("CATEGORY2").unwrap();
    assert!(category2.deprecated());
    assert_eq!(category2.replacement_ids(), ["CATEGORY1".to_string()]);
    assert!(!catalog.category("CATEGORY1").unwrap().deprecated());
}

#[test]
fn test_deprecated_rule_with_current_replacement() {
    let mut spec = three_rule_spec();
    spec.rules[2] = spec.rules[2].clone().deprecated_by(["RULE3"]);
    let catalog = Catalog::new(&spec).unwrap();
    let rule2 = catalog.rule("RULE2").unwrap();
    assert!(rule2.deprecated());
    assert_eq!(rule2.replacement_ids(), ["RULE3".to_string()]);
}

#[test]
fn test_default_rule_cannot_be_deprecated() {
    let mut spec = three_rule_spec();
    spec.rules[1] = spec.rules[1].clone().deprecated_by(["RULE2"]);
    assert_rule_error(Catalog::new(&spec));
}

#[test]
fn test_rule_referencing_missing_category() {
    let mut spec = three_rule_spec();
    spec.rules[0].category_ids.push("CATEGORY9".to_string());
    assert_rule_error(Catalog::new(&spec));
}

#[test]
fn test_unreferenced_category() {
    let mut spec = three_rule_spec();
    spec.categories.push(CategorySpec::new("CATEGORY3", "Groups nothing."));
    assert_category_error(Catalog::new(&spec));
}

#[test]
fn test_rule_fields_required() {
    let mut spec = three_rule_spec();
    spec.rules[0].handler = None;
    assert_rule_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.rules[0].rule_type = None;
    assert_rule_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.rules[0].purpose = "checks three".to_string();
    assert_rule_error(Catalog::new(&spec));

    let mut spec = three_rule_spec();
    spec.rules[0].id = "rule3".to_string();
    assert_rule_error(Catalog::new(&spec));
}

#[test]
fn test_invalid_plugin_info_prevents_startup() {
    let mut spec = three_rule_spec();
    spec.info = Some(PluginInfo {
        url: "not a url".to_string(),
        doc_short: "Documents things.".to_string(),
        ..Default::default()
    });
    let err = CheckService::new(&spec, &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Spec(_)));
}
