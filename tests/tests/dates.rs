
use anyhow::Result;
use common::*;
use ruleql::{Operator, RuleNode, TypeTag};
use ruleql_core::{BuildOptions, DateMode, ErrorKind};

fn check(field: &str, type_tag: TypeTag, operator: Operator, values: &[&str]) -> Result<Vec<&'static str>> {
    Ok(matching(&rule(field, type_tag, operator, values))?)
}

#[test]
fn test_date_equality_ignores_time_of_day() -> Result<()> {
    assert_eq!(check("LastModified", TypeTag::Date, Operator::Equal, &["2/23/2016"])?, vec!["a"]);
    assert_eq!(check("LastModified", TypeTag::Date, Operator::Equal, &["2016-02-23"])?, vec!["a"]);
    assert_eq!(check("LastModified", TypeTag::DateTime, Operator::Equal, &["2/23/2016"])?, Vec::<&str>::new());
    assert_eq!(check("LastModified", TypeTag::DateTime, Operator::Equal, &["2016-02-23 10:00:00"])?, vec!["a"]);
    Ok(())
}

#[test]
fn test_date_ranges() -> Result<()> {
    use Operator::*;
    assert_eq!(check("LastModified", TypeTag::Date, Greater, &["2016-02-23"])?, vec!["b", "d"]);
    assert_eq!(check("LastModified", TypeTag::Date, LessOrEqual, &["2016-02-23"])?, vec!["a", "c"]);
    assert_eq!(check("LastModified", TypeTag::Date, Between, &["2/22/2016", "2/24/2016"])?, vec!["a", "b", "c"]);
    assert_eq!(check("LastModified", TypeTag::Date, NotBetween, &["2/22/2016", "2/24/2016"])?, vec!["d"]);
    assert_eq!(check("LastModified", TypeTag::DateTime, Less, &["2016-02-23T10:00:00"])?, vec!["c"]);
    assert_eq!(check("LastModified", TypeTag::DateTime, GreaterOrEqual, &["2016-02-23 10:00"])?, vec!["a", "b", "d"]);
    Ok(())
}

#[test]
fn test_nullable_dates() -> Result<()> {
    use Operator::*;
    assert_eq!(check("LastModifiedIfPresent", TypeTag::Date, Equal, &["2/23/2016"])?, vec!["a"]);
    assert_eq!(check("LastModifiedIfPresent", TypeTag::Date, NotEqual, &["2/23/2016"])?, vec!["b", "c", "d"]);
    assert_eq!(check("LastModifiedIfPresent", TypeTag::DateTime, IsNull, &[""])?, vec!["b", "d"]);
    assert_eq!(check("LastModifiedIfPresent", TypeTag::DateTime, Less, &["2100-01-01"])?, vec!["a", "c"]);
    Ok(())
}

#[test]
fn test_date_lists() -> Result<()> {
    use Operator::*;
    assert_eq!(check("DateList", TypeTag::Date, In, &["2/23/2016"])?, vec!["a"]);
    assert_eq!(check("DateList", TypeTag::Date, In, &["2016-02-24"])?, vec!["a", "b"]);
    assert_eq!(check("DateList", TypeTag::Date, NotIn, &["2016-02-24"])?, vec!["c", "d"]);
    assert_eq!(check("DateList", TypeTag::Date, IsEmpty, &[])?, vec!["c"]);
    Ok(())
}

#[test]
fn test_blank_dates_are_rejected() {
    let blank = matching(&rule("LastModified", TypeTag::Date, Operator::Equal, &[""])).unwrap_err();
    assert_eq!(blank.kind(), ErrorKind::InvalidValue);
    let short = matching(&rule("DateList", TypeTag::Date, Operator::Between, &[""])).unwrap_err();
    assert_eq!(short.kind(), ErrorKind::Arity);
    let garbage = matching(&rule("LastModified", TypeTag::DateTime, Operator::Less, &["yesterday"])).unwrap_err();
    assert_eq!(garbage.to_string(), "Invalid value 'yesterday' for datetime condition on 'LastModified'");
}

#[test]
fn test_offsets_in_utc_mode() -> Result<()> {
    let utc = BuildOptions::default().with_date_mode(DateMode::Utc);
    let shifted = rule("LastModified", TypeTag::DateTime, Operator::Equal, &["2016-02-23T12:00:00+02:00"]);
    assert_eq!(matching_with(&shifted, &utc)?, vec!["a"]);

    let late = rule("LastModified", TypeTag::Date, Operator::Equal, &["2016-02-22T23:30:00-01:00"]);
    assert_eq!(matching_with(&late, &utc)?, vec!["a"]);

    // naive inputs do not depend on the mode
    let naive = rule("LastModified", TypeTag::DateTime, Operator::Equal, &["2016-02-23 10:00"]);
    assert_eq!(matching_with(&naive, &utc)?, matching_with(&naive, &BuildOptions::default())?);
    Ok(())
}

#[test]
fn test_date_mode_from_configuration() -> Result<()> {
    let options: BuildOptions = serde_json::from_str(r#"{"date_mode": "utc"}"#)?;
    assert_eq!(options.date_mode, DateMode::Utc);
    assert!(!options.use_indexed_property);

    let grouped = RuleNode::or(vec![
        RuleNode::condition("LastModified", TypeTag::DateTime, Operator::Equal, &["2016-02-23T10:00:00Z"]),
        RuleNode::condition("LastModified", TypeTag::Date, Operator::Equal, &["2016-03-01"]),
    ]);
    assert_eq!(matching_with(&grouped, &options)?, vec!["a", "d"]);
    Ok(())
}
