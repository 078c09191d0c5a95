use ruleql::{Conjunction, RuleNode};

use crate::error::BuildError;
use crate::options::BuildOptions;
use crate::predicate::{build_condition, Predicate};
use crate::record::{Record, RecordSchema};

/// Compile a rule tree into a predicate over `R`
pub fn compile<R: Record>(rule: &RuleNode, options: &BuildOptions) -> Result<Predicate, BuildError> { compile_for(rule, R::schema(), options) }

/// Compile a rule tree against an explicit schema.
///
/// Groups fold their children with AND / OR; a group with no children is vacuously true whatever its conjunction.
/// The first condition that fails to build aborts the whole tree.
pub fn compile_for(rule: &RuleNode, schema: &'static RecordSchema, options: &BuildOptions) -> Result<Predicate, BuildError> {
    match rule {
        RuleNode::Condition(condition) => build_condition(condition, schema, options),
        RuleNode::Group(group) if group.children.is_empty() => Ok(Predicate::True),
        RuleNode::Group(group) => {
            let children = group.children.iter().map(|child| compile_for(child, schema, options)).collect::<Result<Vec<_>, _>>()?;
            Ok(match group.conjunction {
                Conjunction::And => Predicate::And(children),
                Conjunction::Or => Predicate::Or(children),
            })
        }
    }
}
