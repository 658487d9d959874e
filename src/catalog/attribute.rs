// This is for columns.

use std::fmt;

use crate::ty::TypeLabel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    // name of attribute
    pub name: String,
    pub type_label: TypeLabel,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_label: TypeLabel) -> Attribute {
        Attribute {
            name: name.into(),
            type_label,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.type_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let attr = Attribute::new("age", TypeLabel::Integer);

        assert_eq!(attr.to_string(), "age integer");
    }
}
