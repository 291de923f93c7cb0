//! Scalar expressions carried by filters and projections.
//! Only enough structure for rules to reason about predicates and column references.
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Column(String),
    Literal(Literal),
    Comparison(ComparisonOperator, Box<Expression>, Box<Expression>),
    And(Vec<Expression>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Text(String),
    Null,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
}

impl Expression {
    pub fn column(name: &str) -> Expression {
        Expression::Column(name.to_string())
    }

    pub fn integer(value: i64) -> Expression {
        Expression::Literal(Literal::Integer(value))
    }

    pub fn text(value: &str) -> Expression {
        Expression::Literal(Literal::Text(value.to_string()))
    }

    pub fn boolean(value: bool) -> Expression {
        Expression::Literal(Literal::Boolean(value))
    }

    pub fn compare(op: ComparisonOperator, left: Expression, right: Expression) -> Expression {
        Expression::Comparison(op, Box::new(left), Box::new(right))
    }

    pub fn equal(left: Expression, right: Expression) -> Expression {
        Expression::compare(ComparisonOperator::Equal, left, right)
    }

    /// Conjunction of two predicates, nested conjunctions are flattened so that
    /// merging filters repeatedly does not build a deep tree.
    pub fn and(left: Expression, right: Expression) -> Expression {
        let mut terms = vec![];
        for side in [left, right] {
            match side {
                Expression::And(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        Expression::And(terms)
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expression::Literal(Literal::Boolean(true)))
    }

    pub fn as_column(&self) -> Option<&str> {
        match self {
            Expression::Column(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Column(c) => write!(f, "{}", c),
            Expression::Literal(l) => write!(f, "{}", l),
            Expression::Comparison(op, l, r) => write!(f, "({} {} {})", l, op, r),
            Expression::And(terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                write!(f, "({})", rendered.join(" AND "))
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Text(t) => write!(f, "'{}'", t),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThan => ">",
        };
        write!(f, "{}", symbol)
    }
}
