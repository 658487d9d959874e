//! Plan text parsing and lowering.
//!
//! ```text
//! twice(append(values(n integer) {(5), (7)}, values(n integer) {(9)}))
//! ```

use crate::ast::{ColumnDef, Literal, PlanExpr, TypeName};
use crate::catalog::attribute::Attribute;
use crate::error::{ExecError, ExecResult};
use crate::plan::Plan;
use crate::tuple::TupleDesc;
use crate::ty::{Datum, TypeLabel};

lalrpop_mod!(pub plan_parser);

pub fn parse_plan_expr(text: &str) -> ExecResult<PlanExpr> {
    plan_parser::PlanParser::new()
        .parse(text)
        .map_err(|e| ExecError::Parse(e.to_string()))
}

/// Parses plan text into a checked plan tree.
pub fn parse_plan(text: &str) -> ExecResult<Plan> {
    let expr = parse_plan_expr(text)?;
    lower(&expr)
}

pub fn lower(expr: &PlanExpr) -> ExecResult<Plan> {
    match expr {
        PlanExpr::Twice(inner) => Ok(Plan::twice(lower(inner)?)),
        PlanExpr::Append(inners) => {
            if inners.is_empty() {
                return Err(ExecError::Parse("append needs at least one plan".to_string()));
            }

            let children = inners.iter().map(lower).collect::<ExecResult<Vec<Plan>>>()?;
            Ok(Plan::append(children))
        }
        PlanExpr::Values(cols, rows) => lower_values(cols, rows),
    }
}

fn lower_values(cols: &[ColumnDef], rows: &[Vec<Literal>]) -> ExecResult<Plan> {
    if cols.is_empty() {
        return Err(ExecError::Parse("values needs at least one column".to_string()));
    }

    let attrs: Vec<Attribute> = cols
        .iter()
        .map(|c| Attribute::new(c.name.clone(), type_label(c.type_name)))
        .collect();
    let mut datums = Vec::with_capacity(rows.len());

    for (rowno, row) in rows.iter().enumerate() {
        if row.len() != attrs.len() {
            return Err(ExecError::Parse(format!(
                "row {} has {} values but {} columns are defined",
                rowno + 1,
                row.len(),
                attrs.len()
            )));
        }

        let values = row
            .iter()
            .zip(attrs.iter())
            .map(|(lit, attr)| literal_to_datum(lit, attr))
            .collect::<ExecResult<Vec<Datum>>>()?;
        datums.push(values);
    }

    Ok(Plan::values(TupleDesc::new(attrs), datums))
}

fn type_label(type_name: TypeName) -> TypeLabel {
    match type_name {
        TypeName::Integer => TypeLabel::Integer,
        TypeName::Text => TypeLabel::Text,
        TypeName::Boolean => TypeLabel::Boolean,
    }
}

fn literal_to_datum(lit: &Literal, attr: &Attribute) -> ExecResult<Datum> {
    let datum = match lit {
        Literal::Null => Datum::Null,
        Literal::Integer(s) => {
            let i = s
                .parse::<i32>()
                .map_err(|_| ExecError::Parse(format!("integer out of range: {}", s)))?;
            Datum::Integer(i)
        }
        Literal::Text(s) => Datum::Text(s.clone()),
        Literal::Bool(b) => Datum::Boolean(*b),
    };

    if !datum.conforms_to(attr.type_label) {
        return Err(ExecError::Parse(format!(
            "column {} is {}, got {}",
            attr.name,
            attr.type_label,
            datum.as_string()
        )));
    }

    Ok(datum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twice_stmt() {
        assert!(parse_plan_expr("twice(values(n integer) {(5), (7)})").is_ok());
        assert!(parse_plan_expr("twice(twice(values(n integer) {}))").is_ok());
    }

    #[test]
    fn append_stmt() {
        assert!(parse_plan_expr("append(values(a text) {('x')}, values(a text) {(null)})").is_ok());
    }

    #[test]
    fn values_stmt() {
        let expr = parse_plan_expr("values(id integer, ok boolean, name text) {(-1, true, 'a b')}").unwrap();

        assert_eq!(
            expr,
            PlanExpr::Values(
                vec![
                    ColumnDef { name: "id".to_string(), type_name: TypeName::Integer },
                    ColumnDef { name: "ok".to_string(), type_name: TypeName::Boolean },
                    ColumnDef { name: "name".to_string(), type_name: TypeName::Text },
                ],
                vec![vec![
                    Literal::Integer("-1".to_string()),
                    Literal::Bool(true),
                    Literal::Text("a b".to_string()),
                ]],
            )
        );
    }

    #[test]
    fn syntax_error() {
        assert!(matches!(parse_plan("twice(values(n integer) {(5)}"), Err(ExecError::Parse(_))));
        assert!(matches!(parse_plan("thrice(values(n integer) {})"), Err(ExecError::Parse(_))));
    }

    #[test]
    fn lowering_errors() {
        assert!(parse_plan("values(n integer) {(1, 2)}").is_err());
        assert!(parse_plan("values(n integer) {('one')}").is_err());
        assert!(parse_plan("values(n integer) {(99999999999)}").is_err());
        assert!(parse_plan("values() {}").is_err());
        assert!(parse_plan("append()").is_err());
    }

    #[test]
    fn lowered_shape() {
        let plan = parse_plan("twice(values(n integer) {(5), (null)})").unwrap();

        match plan {
            Plan::Twice(twice) => match *twice.lefttree {
                Plan::ValuesScan(scan) => {
                    assert_eq!(scan.desc.attrs()[0], Attribute::new("n", TypeLabel::Integer));
                    assert_eq!(scan.rows, vec![vec![Datum::Integer(5)], vec![Datum::Null]]);
                }
                other => panic!("unexpected child {:?}", other),
            },
            other => panic!("unexpected plan {:?}", other),
        }
    }
}
