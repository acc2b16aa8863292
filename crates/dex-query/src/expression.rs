use bson::Bson;
use regex::Regex;

/// A recursive filter expression tree.
///
/// Owns field names and values so the expression can outlive the filter
/// document it was parsed from.
#[derive(Debug, Clone)]
pub enum Expression {
    // Logical
    And(Vec<Expression>),
    Or(Vec<Expression>),
    // Comparison: field name + value, owned
    Eq(String, Bson),
    Ne(String, Bson),
    // Pattern: regex is compiled once at parse time
    Regex(String, Regex),
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::And(a), Expression::And(b)) => a == b,
            (Expression::Or(a), Expression::Or(b)) => a == b,
            (Expression::Eq(f1, v1), Expression::Eq(f2, v2)) => f1 == f2 && v1 == v2,
            (Expression::Ne(f1, v1), Expression::Ne(f2, v2)) => f1 == f2 && v1 == v2,
            (Expression::Regex(f1, r1), Expression::Regex(f2, r2)) => {
                f1 == f2 && r1.as_str() == r2.as_str()
            }
            _ => false,
        }
    }
}
