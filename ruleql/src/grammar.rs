use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "field_path.pest"]
pub struct FieldPathParser;
