//! Push-down vs local evaluation
//!
//! `SqlTable` stands in for a database-backed source: it accepts any predicate `generate_where` can render, records
//! the SQL it would run, and evaluates the predicate in memory in place of the database.


use anyhow::Result;
use common::*;
use ruleql::{Operator, RuleNode, TypeTag};
use ruleql_core::sql::generate_where;
use ruleql_core::{apply, BuildOptions, Constructs, FilteredStream, Predicate, QuerySource};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    fn push(&self, entry: String) { self.0.borrow_mut().push(entry) }
    fn take(&self) -> Vec<String> { self.0.borrow_mut().drain(..).collect() }
}

struct SqlTable {
    rows: Vec<Content>,
    log: Log,
}

impl QuerySource for SqlTable {
    type Record = Content;
    type Deferred = FilteredStream<std::vec::IntoIter<Content>>;
    type Local = Vec<Content>;

    fn capabilities(&self) -> Constructs { Constructs::SQL }

    fn query(self, predicate: Predicate) -> Self::Deferred {
        let sql = generate_where(&predicate).expect("pushed-down predicates render");
        self.log.push(format!("SELECT * FROM content WHERE {}", sql));
        FilteredStream::new(self.rows.into_iter(), predicate)
    }

    fn materialize(self) -> Self::Local {
        self.log.push("SELECT * FROM content".to_string());
        self.rows
    }
}

fn run(rule: &RuleNode, log: &Log) -> Result<Vec<&'static str>> {
    let table = SqlTable { rows: contents(), log: log.clone() };
    Ok(apply(Some(rule), table, &BuildOptions::default())?.map(|c| c.label).collect())
}

#[test]
fn test_comparisons_push_down() -> Result<()> {
    let log = Log::default();
    let rule = RuleNode::and(vec![
        RuleNode::condition("ContentTypeId", TypeTag::Integer, Operator::In, &["1", "2"]),
        RuleNode::condition("LongerTextToFilter", TypeTag::String, Operator::NotContains, &["else"]),
    ]);
    assert_eq!(run(&rule, &log)?, vec!["a", "b"]);
    assert_eq!(log.take(), vec![r#"SELECT * FROM content WHERE "ContentTypeId" IN (1, 2) AND NOT (LOWER("LongerTextToFilter") LIKE '%else%' ESCAPE '\')"#]);

    let dated = RuleNode::or(vec![
        RuleNode::condition("LastModified", TypeTag::Date, Operator::Equal, &["2/23/2016"]),
        RuleNode::condition("NullableContentTypeId", TypeTag::Integer, Operator::IsNull, &[]),
    ]);
    assert_eq!(run(&dated, &log)?, vec!["a", "b", "d"]);
    assert_eq!(
        log.take(),
        vec![r#"SELECT * FROM content WHERE (CAST("LastModified" AS DATE) = '2016-02-23' OR "NullableContentTypeId" IS NULL)"#]
    );
    Ok(())
}

#[test]
fn test_unsupported_constructs_materialize() -> Result<()> {
    let log = Log::default();
    let unsupported = [
        rule("StrList", TypeTag::String, Operator::In, &["str2"]),
        rule("IsSelected", TypeTag::Boolean, Operator::IsNull, &[]),
        rule("StrList[0]", TypeTag::String, Operator::Equal, &["str1"]),
    ];
    for rule in &unsupported {
        let local = run(rule, &log)?;
        assert_eq!(log.take(), vec!["SELECT * FROM content"]);
        assert_eq!(local, matching(rule)?);
    }
    Ok(())
}

#[test]
fn test_both_paths_agree() -> Result<()> {
    let log = Log::default();
    let rules = [
        rule("NullableContentTypeId", TypeTag::Integer, Operator::NotEqual, &["1"]),
        rule("PossiblyEmptyStatValue", TypeTag::Double, Operator::NotBetween, &["1", "1.12"]),
        rule("LongerTextToFilter", TypeTag::String, Operator::IsNotEmpty, &[]),
        rule("NullableContentTypeGuid", TypeTag::Guid, Operator::NotIn, &[GUID_A]),
        rule("IsPossiblyNotSetBool", TypeTag::Boolean, Operator::NotEqual, &["true"]),
        rule("LastModifiedIfPresent", TypeTag::DateTime, Operator::Less, &["2016-02-23"]),
    ];
    for rule in &rules {
        let pushed = run(rule, &log)?;
        let entries = log.take();
        assert!(entries[0].contains("WHERE"), "{:?}", entries);
        assert_eq!(pushed, matching(rule)?, "{:?}", entries);
    }
    Ok(())
}
