//! Rule Case Checks
//!
//! Data-driven checks over the shared `Content` fixture. Cases are loaded from `tests/rule_cases.json`; each names the
//! records it selects or the kind of error it fails with.


use common::*;
use ruleql::JsonFilterRule;
use ruleql_core::{apply, BuildError, BuildOptions};
use serde::Deserialize;

const RULE_CASES_JSON: &str = include_str!("../rule_cases.json");

#[derive(Debug, Deserialize)]
struct RuleCases {
    suites: Vec<TestSuite>,
}
#[derive(Debug, Deserialize)]
struct TestSuite {
    name: String,
    cases: Vec<TestCase>,
}
#[derive(Debug, Deserialize)]
struct TestCase {
    name: String,
    rule: JsonFilterRule,
    #[serde(default)]
    options: BuildOptions,
    #[serde(default)]
    matches: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

fn run(case: &TestCase) -> Result<Vec<&'static str>, BuildError> {
    let node = case.rule.to_rule_node()?;
    Ok(apply(node.as_ref(), contents(), &case.options)?.map(|content| content.label).collect())
}

#[test]
fn test_rule_cases() {
    let cases: RuleCases = serde_json::from_str(RULE_CASES_JSON).expect("parse");
    let mut checked = 0;
    for suite in &cases.suites {
        for case in &suite.cases {
            let context = format!("suite={} case={}", suite.name, case.name);
            match (run(case), &case.matches, &case.error) {
                (Ok(labels), Some(expected), None) => assert_eq!(labels, *expected, "{}", context),
                (Err(err), None, Some(kind)) => assert_eq!(format!("{:?}", err.kind()), *kind, "{} error={}", context, err),
                (result, matches, error) => panic!("{}: got {:?}, expected matches={:?} error={:?}", context, result, matches, error),
            }
            checked += 1;
        }
    }
    assert!(checked > 0);
}
