use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
}

// Two-character symbols first, otherwise ">=" would be read as ">"
const OPERATORS: [(&str, Comparison); 6] = [
    (">=", Comparison::GreaterOrEqual),
    ("<=", Comparison::LessOrEqual),
    ("==", Comparison::Equal),
    ("!=", Comparison::NotEqual),
    (">", Comparison::Greater),
    ("<", Comparison::Less),
];

impl Comparison {
    fn holds(&self, value: f64, bound: f64) -> bool {
        match self {
            Comparison::Greater => value > bound,
            Comparison::GreaterOrEqual => value >= bound,
            Comparison::Less => value < bound,
            Comparison::LessOrEqual => value <= bound,
            Comparison::Equal => value == bound,
            Comparison::NotEqual => value != bound,
        }
    }

    /// `0 < x` is the same condition as `x > 0`
    fn flipped(&self) -> Comparison {
        match self {
            Comparison::Greater => Comparison::Less,
            Comparison::GreaterOrEqual => Comparison::LessOrEqual,
            Comparison::Less => Comparison::Greater,
            Comparison::LessOrEqual => Comparison::GreaterOrEqual,
            Comparison::Equal => Comparison::Equal,
            Comparison::NotEqual => Comparison::NotEqual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub comparison: Comparison,
    pub bound: f64,
}

/// Accepted domain of one argument, written as text, e.g. `"x>0"` or `"x >= 0 & x <= 90"`
///
/// The variable name is free (`x`, `value`, ...) and may sit on either side of the operator.
/// Clauses are joined with `&`, `&&` or `and`. An empty string places no constraint on the argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    text: String,
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let trimmed: &str = text.trim();
        if trimmed.is_empty() {
            return Ok(Predicate {
                text: String::new(),
                conditions: Vec::new(),
            });
        }

        let normalised: String = trimmed.replace("&&", "&").replace(" and ", "&");

        let mut conditions: Vec<Condition> = Vec::new();
        for clause in normalised.split('&') {
            let condition: Condition = parse_clause(clause.trim(), trimmed)?;
            conditions.push(condition);
        }

        return Ok(Predicate {
            text: trimmed.to_string(),
            conditions,
        });
    }

    pub fn as_str(&self) -> &str {
        return &self.text;
    }

    pub fn conditions(&self) -> &[Condition] {
        return &self.conditions;
    }

    pub fn is_unconstrained(&self) -> bool {
        return self.conditions.is_empty();
    }

    /// NaN is rejected by every non-empty predicate, including `x != 0`
    pub fn accepts(&self, value: f64) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        if value.is_nan() {
            return false;
        }
        return self.conditions.iter().all(|condition| condition.comparison.holds(value, condition.bound));
    }
}

fn parse_clause(clause: &str, predicate: &str) -> Result<Condition, Error> {
    let invalid = |reason: String| Error::InvalidPredicate {
        predicate: predicate.to_string(),
        reason,
    };

    if clause.is_empty() {
        return Err(invalid("empty clause".to_string()));
    }

    for (symbol, comparison) in OPERATORS {
        if let Some(position) = clause.find(symbol) {
            let left: &str = clause[..position].trim();
            let right: &str = clause[position + symbol.len()..].trim();

            let condition: Condition = match (is_variable(left), is_variable(right)) {
                (true, false) => Condition {
                    comparison,
                    bound: parse_bound(right).map_err(&invalid)?,
                },
                (false, true) => Condition {
                    comparison: comparison.flipped(),
                    bound: parse_bound(left).map_err(&invalid)?,
                },
                _ => {
                    return Err(invalid(format!("clause `{}` needs exactly one variable and one number", clause)));
                }
            };
            return Ok(condition);
        }
    }

    return Err(invalid(format!("no comparison operator in clause `{}`", clause)));
}

fn is_variable(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn parse_bound(token: &str) -> Result<f64, String> {
    let bound: f64 = token.parse::<f64>().map_err(|_| format!("`{}` is not a number", token))?;
    if bound.is_nan() {
        return Err("bound cannot be NaN".to_string());
    }
    return Ok(bound);
}

#[test]
fn test_predicate_single_clause() {
    let predicate: Predicate = Predicate::parse("x>0").expect("valid predicate");
    assert_eq!(predicate.as_str(), "x>0");
    assert_eq!(predicate.conditions().len(), 1);
    assert!(predicate.accepts(1.0e-9));
    assert!(!predicate.accepts(0.0));
    assert!(!predicate.accepts(-3.0));
    assert!(!predicate.accepts(f64::NAN));
    assert!(predicate.accepts(f64::INFINITY));
}

#[test]
fn test_predicate_conjunction_and_flipped_operands() {
    let predicate: Predicate = Predicate::parse("0 <= value and value < 90").expect("valid predicate");
    assert!(predicate.accepts(0.0));
    assert!(predicate.accepts(89.9));
    assert!(!predicate.accepts(90.0));
    assert!(!predicate.accepts(-0.1));

    let predicate: Predicate = Predicate::parse("x >= -40 && x != 0").expect("valid predicate");
    assert!(predicate.accepts(-40.0));
    assert!(!predicate.accepts(0.0));
    assert!(!predicate.accepts(f64::NAN)); // NaN != 0 is true in IEEE, but NaN is still rejected
}

#[test]
fn test_predicate_empty_is_unconstrained() {
    let predicate: Predicate = Predicate::parse("  ").expect("valid predicate");
    assert!(predicate.is_unconstrained());
    assert!(predicate.accepts(f64::NAN));
    assert!(predicate.accepts(-1.0e300));
}

#[test]
fn test_predicate_malformed() {
    for text in ["x=0", "x>", "x>y", "1>2", "x>0 &", "x>NaN", "x > zero"] {
        let result: Result<Predicate, Error> = Predicate::parse(text);
        assert!(
            matches!(result, Err(Error::InvalidPredicate { .. })),
            "`{}` should not parse, got {:?}",
            text,
            result
        );
    }
}
