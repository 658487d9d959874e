// Syntax tree of the plan text language.

#[derive(Debug, Clone, PartialEq)]
pub enum PlanExpr {
    Twice(Box<PlanExpr>),
    Append(Vec<PlanExpr>),
    // column definitions, rows
    Values(Vec<ColumnDef>, Vec<Vec<Literal>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub type_name: TypeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Text,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    // kept as written, range checked when lowered
    Integer(String),
    Text(String),
    Bool(bool),
    Null,
}
