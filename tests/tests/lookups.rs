
use anyhow::Result;
use common::*;
use ruleql::{JsonFilterRule, Operator, RuleNode, TypeTag};
use ruleql_core::{apply, BuildOptions, ErrorKind, Record};
use std::collections::HashMap;

#[derive(Debug, Record)]
struct Indexed {
    #[record(indexer, skip)]
    values: HashMap<String, i32>,
}

#[derive(Debug, Record)]
#[record(rename_all = "PascalCase")]
struct DataValue {
    string_value: String,
}

#[derive(Debug, Record)]
#[record(rename_all = "PascalCase")]
struct DictionaryRecord {
    id: i32,
    data: HashMap<String, DataValue>,
}

#[derive(Debug, Record)]
#[record(name = "Owner")]
struct Owner {
    #[record(rename = "Name")]
    name: String,
    #[record(rename = "Data", indexer = "Values")]
    data: HashMap<String, String>,
}

#[derive(Debug, Record)]
struct Pet {
    #[record(rename = "Name")]
    name: String,
    #[record(rename = "Owner")]
    owner: Option<Owner>,
}

fn indexed(pairs: &[(&str, i32)]) -> Indexed { Indexed { values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect() } }

fn dictionary(id: i32, entries: &[(&str, &str)]) -> DictionaryRecord {
    let data = entries.iter().map(|(k, v)| (k.to_string(), DataValue { string_value: v.to_string() })).collect();
    DictionaryRecord { id, data }
}

fn pet(name: &str, owner: Option<&str>) -> Pet {
    let owner = owner.map(|owner| Owner { name: owner.to_string(), data: [("city".to_string(), "Lisbon".to_string())].into_iter().collect() });
    Pet { name: name.to_string(), owner }
}

#[test]
fn test_indexed_property_mode() -> Result<()> {
    let options = BuildOptions::default().with_indexed_property("Item");
    let records = || vec![indexed(&[("ContentTypeId", 2)]), indexed(&[("ContentTypeId", 3)]), indexed(&[])];

    let two = rule("ContentTypeId", TypeTag::Integer, Operator::Equal, &["2"]);
    assert_eq!(apply(Some(&two), records(), &options)?.count(), 1);

    let four = rule("ContentTypeId", TypeTag::Integer, Operator::Equal, &["4"]);
    assert_eq!(apply(Some(&four), records(), &options)?.count(), 0);

    // a missing key reads as null
    let not_two = rule("ContentTypeId", TypeTag::Integer, Operator::NotEqual, &["2"]);
    assert_eq!(apply(Some(&not_two), records(), &options)?.count(), 2);
    let missing = rule("ContentTypeId", TypeTag::Integer, Operator::IsNull, &[]);
    assert_eq!(apply(Some(&missing), records(), &options)?.count(), 1);

    // without indexed mode the record has no members at all
    let err = apply(Some(&two), records(), &BuildOptions::default()).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::UnknownField));
    Ok(())
}

#[test]
fn test_indexer_name_must_match() -> Result<()> {
    let two = rule("ContentTypeId", TypeTag::Integer, Operator::Equal, &["2"]);
    let wrong = BuildOptions::default().with_indexed_property("Values");
    let err = apply(Some(&two), vec![indexed(&[])], &wrong).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::UnknownField));

    let city = rule("city", TypeTag::String, Operator::Equal, &["LISBON"]);
    let values = BuildOptions::default().with_indexed_property("values");
    assert_eq!(Owner::schema().indexer().map(|i| i.name), Some("Values"));
    assert_eq!(apply(Some(&city), vec![pet("Rex", Some("Ann")).owner.unwrap()], &values)?.count(), 1);
    Ok(())
}

#[test]
fn test_dictionary_member() -> Result<()> {
    let records = || vec![dictionary(1, &[("myKey", "BillyBob")]), dictionary(2, &[("myKey", "NotBillyBob")]), dictionary(3, &[("other", "BillyBob")])];

    let wire: JsonFilterRule = serde_json::from_value(serde_json::json!({
        "condition": "and",
        "rules": [{
            "field": "Data[\"myKey\"].StringValue",
            "id": "MyKey",
            "input": "text",
            "operator": "equal",
            "type": "string",
            "value": "BillyBob"
        }]
    }))?;
    let node = wire.to_rule_node()?;
    let matched: Vec<DictionaryRecord> = apply(node.as_ref(), records(), &BuildOptions::default())?.collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].data["myKey"].string_value, "BillyBob");

    let ids = |rule: &RuleNode| -> Result<Vec<i32>> { Ok(apply(Some(rule), records(), &BuildOptions::default())?.map(|r| r.id).collect()) };
    assert_eq!(ids(&rule(r#"Data['myKey'].StringValue"#, TypeTag::String, Operator::Equal, &["billybob"]))?, vec![1]);
    assert_eq!(ids(&rule(r#"Data["myKey"].StringValue"#, TypeTag::String, Operator::NotEqual, &["BillyBob"]))?, vec![2, 3]);
    assert_eq!(ids(&rule(r#"Data["myKey"].StringValue"#, TypeTag::String, Operator::EndsWith, &["bob"]))?, vec![1, 2]);
    assert_eq!(ids(&rule(r#"Data["other"].StringValue"#, TypeTag::String, Operator::IsNull, &[]))?, vec![1, 2]);
    Ok(())
}

#[test]
fn test_nested_records() -> Result<()> {
    let pets = || vec![pet("Rex", Some("Ann")), pet("Tom", None), pet("Kit", Some("Bob"))];
    let names = |rule: &RuleNode| -> Result<Vec<String>> { Ok(apply(Some(rule), pets(), &BuildOptions::default())?.map(|p| p.name).collect()) };

    assert_eq!(names(&rule("Owner.Name", TypeTag::String, Operator::Equal, &["ann"]))?, vec!["Rex"]);
    assert_eq!(names(&rule("owner.name", TypeTag::String, Operator::NotEqual, &["ann"]))?, vec!["Tom", "Kit"]);
    assert_eq!(names(&rule("Owner.Name", TypeTag::String, Operator::IsNull, &[]))?, vec!["Tom"]);
    assert_eq!(names(&rule("Owner.Data[\"city\"]", TypeTag::String, Operator::BeginsWith, &["lis"]))?, vec!["Rex", "Kit"]);
    assert_eq!(names(&rule("Owner[\"city\"]", TypeTag::String, Operator::Equal, &["Lisbon"]))?, vec!["Rex", "Kit"]);

    let err = apply(Some(&rule("Owner", TypeTag::String, Operator::Equal, &["x"])), pets(), &BuildOptions::default()).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::UnknownField));
    let err = apply(Some(&rule("Owner.Name[", TypeTag::String, Operator::Equal, &["x"])), pets(), &BuildOptions::default()).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::UnknownField));
    Ok(())
}

#[test]
fn test_list_positions() -> Result<()> {
    assert_eq!(matching(&rule("StrList[1]", TypeTag::String, Operator::Equal, &["str2"]))?, vec!["a"]);
    assert_eq!(matching(&rule("StrList[1]", TypeTag::String, Operator::NotEqual, &["str2"]))?, vec!["b", "c", "d"]);
    assert_eq!(matching(&rule("IntList[0]", TypeTag::Integer, Operator::IsNull, &[]))?, vec!["c"]);
    assert_eq!(matching(&rule("IntList[0]", TypeTag::Integer, Operator::GreaterOrEqual, &["2"]))?, vec!["b", "d"]);
    Ok(())
}
