//! Wire shapes emitted by the filter-builder widget.
//!
//! Two shapes exist in the wild. [`FilterRule`] carries `value` as an array of strings; [`JsonFilterRule`] carries it
//! as an arbitrary JSON value (a bare string, a number, an array, or null). Both accept lowercase keys as sent by the
//! widget and PascalCase keys as sent by typed clients, and both normalize into the same [`RuleNode`] tree.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ast::{Condition, Conjunction, Group, Operator, RuleNode, TypeTag};
use crate::error::RuleError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRule {
    #[serde(alias = "Condition", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(alias = "Field", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "Input", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(alias = "Operator", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(alias = "Rules", skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FilterRule>>,
    #[serde(rename = "type", alias = "Type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(alias = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFilterRule {
    #[serde(alias = "Condition", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(alias = "Field", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "Input", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(alias = "Operator", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(alias = "Rules", skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<JsonFilterRule>>,
    #[serde(rename = "type", alias = "Type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(alias = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FilterRule {
    /// Normalize into a rule tree. `Ok(None)` means the rule is attribute-less and filters nothing.
    pub fn to_rule_node(&self) -> Result<Option<RuleNode>, RuleError> { normalize_root(self) }
}

impl JsonFilterRule {
    /// Normalize into a rule tree. `Ok(None)` means the rule is attribute-less and filters nothing.
    pub fn to_rule_node(&self) -> Result<Option<RuleNode>, RuleError> { normalize_root(self) }
}

/// Common view over both wire shapes
trait WireRule: Sized {
    fn condition(&self) -> Option<&str>;
    fn field(&self) -> Option<&str>;
    fn id(&self) -> Option<&str>;
    fn input(&self) -> Option<&str>;
    fn operator(&self) -> Option<&str>;
    fn rules(&self) -> Option<&[Self]>;
    fn type_tag(&self) -> Option<&str>;
    fn values(&self) -> Result<Vec<String>, RuleError>;
}

impl WireRule for FilterRule {
    fn condition(&self) -> Option<&str> { self.condition.as_deref() }
    fn field(&self) -> Option<&str> { self.field.as_deref() }
    fn id(&self) -> Option<&str> { self.id.as_deref() }
    fn input(&self) -> Option<&str> { self.input.as_deref() }
    fn operator(&self) -> Option<&str> { self.operator.as_deref() }
    fn rules(&self) -> Option<&[Self]> { self.rules.as_deref() }
    fn type_tag(&self) -> Option<&str> { self.type_tag.as_deref() }
    fn values(&self) -> Result<Vec<String>, RuleError> { Ok(self.value.clone().unwrap_or_default()) }
}

impl WireRule for JsonFilterRule {
    fn condition(&self) -> Option<&str> { self.condition.as_deref() }
    fn field(&self) -> Option<&str> { self.field.as_deref() }
    fn id(&self) -> Option<&str> { self.id.as_deref() }
    fn input(&self) -> Option<&str> { self.input.as_deref() }
    fn operator(&self) -> Option<&str> { self.operator.as_deref() }
    fn rules(&self) -> Option<&[Self]> { self.rules.as_deref() }
    fn type_tag(&self) -> Option<&str> { self.type_tag.as_deref() }
    fn values(&self) -> Result<Vec<String>, RuleError> {
        use serde_json::Value;
        match &self.value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().map(json_text).collect(),
            Some(other) => Ok(vec![json_text(other)?]),
        }
    }
}

fn json_text(value: &serde_json::Value) -> Result<String, RuleError> {
    use serde_json::Value;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(RuleError::MalformedRule("null inside a value list".to_string())),
        Value::Array(_) | Value::Object(_) => Err(RuleError::MalformedRule(format!("nested value {} is not supported", value))),
    }
}

fn normalize_root<R: WireRule>(rule: &R) -> Result<Option<RuleNode>, RuleError> {
    if rule.rules().is_none() && rule.field().is_none() && rule.id().is_none() && rule.operator().is_none() {
        trace!("attribute-less root rule, no filter");
        return Ok(None);
    }
    let node = normalize(rule)?;
    trace!("normalized rule tree with {} conditions", node.condition_count());
    Ok(Some(node))
}

fn normalize<R: WireRule>(rule: &R) -> Result<RuleNode, RuleError> {
    match (rule.rules(), rule.field().or(rule.id())) {
        (Some(_), Some(field)) if rule.field().is_some() => {
            Err(RuleError::MalformedRule(format!("rule on '{}' has both nested rules and a field", field)))
        }
        (Some(children), _) => {
            let conjunction: Conjunction =
                rule.condition().ok_or_else(|| RuleError::InvalidGroup("group without a conjunction".to_string()))?.parse()?;
            let children = children.iter().map(normalize::<R>).collect::<Result<Vec<_>, _>>()?;
            Ok(RuleNode::Group(Group { conjunction, children }))
        }
        (None, Some(field)) => {
            let operator: Operator = rule
                .operator()
                .ok_or_else(|| RuleError::MalformedRule(format!("condition on '{}' has no operator", field)))?
                .parse()?;
            let type_tag: TypeTag = rule
                .type_tag()
                .ok_or_else(|| RuleError::MalformedRule(format!("condition on '{}' has no type", field)))?
                .parse()
                .map_err(|e| match e {
                    RuleError::UnknownType(t) => RuleError::MalformedRule(format!("condition on '{}' has unknown type '{}'", field, t)),
                    other => other,
                })?;
            Ok(RuleNode::Condition(Condition {
                id: rule.id().map(str::to_string),
                field: field.to_string(),
                type_tag,
                operator,
                values: rule.values()?,
                input: rule.input().map(str::to_string),
            }))
        }
        (None, None) => Err(RuleError::MalformedRule("rule has neither nested rules nor a field".to_string())),
    }
}
