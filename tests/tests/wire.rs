
use anyhow::Result;
use common::*;
use ruleql::{FilterRule, JsonFilterRule};
use ruleql_core::{apply, BuildError, BuildOptions, ErrorKind};

fn labels(node: Option<ruleql::RuleNode>) -> Result<Vec<&'static str>> {
    Ok(apply(node.as_ref(), contents(), &BuildOptions::default())?.map(|c| c.label).collect())
}

fn filter_rule(json: &str) -> Result<Vec<&'static str>> {
    let rule: FilterRule = serde_json::from_str(json)?;
    labels(rule.to_rule_node()?)
}

fn json_rule(json: &str) -> Result<Vec<&'static str>> {
    let rule: JsonFilterRule = serde_json::from_str(json)?;
    labels(rule.to_rule_node()?)
}

fn wire_error(json: &str) -> ErrorKind {
    let rule: JsonFilterRule = serde_json::from_str(json).unwrap();
    match rule.to_rule_node() {
        Err(e) => BuildError::from(e).kind(),
        Ok(node) => match apply(node.as_ref(), contents(), &BuildOptions::default()) {
            Err(e) => e.kind(),
            Ok(_) => panic!("expected {} to fail", json),
        },
    }
}

#[test]
fn test_query_builder_payload() -> Result<()> {
    let payload = r#"{
        "condition": "AND",
        "rules": [{
            "id": "ContentTypeId",
            "field": "ContentTypeId",
            "type": "integer",
            "input": "select",
            "operator": "in",
            "value": ["1", "2"]
        }],
        "valid": true
    }"#;
    assert_eq!(filter_rule(payload)?, vec!["a", "b", "c"]);
    assert_eq!(json_rule(payload)?, vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_pascal_case_keys() -> Result<()> {
    let payload = r#"{"Condition": "or", "Rules": [
        {"Field": "StatValue", "Type": "double", "Operator": "greater", "Value": ["2"]},
        {"Field": "IsPossiblyNotSetBool", "Type": "boolean", "Operator": "equal", "Value": ["true"]}
    ]}"#;
    assert_eq!(filter_rule(payload)?, vec!["a", "d"]);
    Ok(())
}

#[test]
fn test_json_values() -> Result<()> {
    assert_eq!(json_rule(r#"{"field": "ContentTypeId", "type": "integer", "operator": "equal", "value": 2}"#)?, vec!["b", "c"]);
    assert_eq!(json_rule(r#"{"field": "ContentTypeId", "type": "integer", "operator": "between", "value": [1, 2]}"#)?, vec!["a", "b", "c"]);
    assert_eq!(json_rule(r#"{"field": "IsSelected", "type": "boolean", "operator": "equal", "value": false}"#)?, vec!["b", "d"]);
    assert_eq!(json_rule(r#"{"field": "StatValue", "type": "double", "operator": "in", "value": [1.12, "2.5"]}"#)?, vec!["b", "d"]);
    assert_eq!(json_rule(r#"{"field": "NullableContentTypeId", "type": "integer", "operator": "is_null", "value": null}"#)?, vec!["b", "d"]);
    Ok(())
}

#[test]
fn test_id_stands_in_for_field() -> Result<()> {
    assert_eq!(filter_rule(r#"{"id": "ContentTypeId", "type": "integer", "operator": "equal", "value": ["3"]}"#)?, vec!["d"]);
    Ok(())
}

#[test]
fn test_operator_and_type_names_are_case_insensitive() -> Result<()> {
    assert_eq!(filter_rule(r#"{"field": "ContentTypeId", "type": "Integer", "operator": "LESS_OR_EQUAL", "value": ["1"]}"#)?, vec!["a"]);
    Ok(())
}

#[test]
fn test_attribute_less_rule_is_no_filter() -> Result<()> {
    assert_eq!(filter_rule("{}")?, all());
    assert_eq!(json_rule(r#"{"condition": "and", "rules": []}"#)?, all());
    assert_eq!(FilterRule::default().to_rule_node()?, None);
    Ok(())
}

#[test]
fn test_wire_errors() {
    let rule = |operator: &str, type_tag: &str| {
        format!(r#"{{"condition": "and", "rules": [{{"field": "ContentTypeId", "type": "{}", "operator": "{}", "value": ["2"]}}]}}"#, type_tag, operator)
    };
    assert_eq!(wire_error(&rule("NOT_AN_OPERATOR", "integer")), ErrorKind::UnsupportedOperator);
    assert_eq!(wire_error(&rule("NOT_AN_OPERATOR", "NOT_A_TYPE")), ErrorKind::UnsupportedOperator);
    assert_eq!(wire_error(&rule("equal", "NOT_A_TYPE")), ErrorKind::MalformedRule);
    assert_eq!(wire_error(&rule("equal", "integer").replace("\"and\"", "\"xor\"")), ErrorKind::InvalidGroup);
    assert_eq!(wire_error(r#"{"rules": []}"#), ErrorKind::InvalidGroup);
    assert_eq!(wire_error(r#"{"condition": "and", "rules": [{}]}"#), ErrorKind::MalformedRule);
    assert_eq!(wire_error(r#"{"field": "ContentTypeId", "type": "integer", "operator": "in", "value": [1, null]}"#), ErrorKind::MalformedRule);
    assert_eq!(wire_error(r#"{"field": "ContentTypeId", "type": "integer", "operator": "equal", "value": ["2"], "rules": []}"#), ErrorKind::MalformedRule);
    assert_eq!(wire_error(r#"{"field": "ContentTypeId", "type": "integer", "value": ["2"]}"#), ErrorKind::MalformedRule);
    assert_eq!(wire_error(r#"{"field": "ContentTypeId", "type": "integer", "operator": "equal", "value": ["hello"]}"#), ErrorKind::InvalidValue);
}
