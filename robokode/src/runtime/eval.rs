use std::collections::HashMap;

use crate::ir::ast::{BinaryOperator, Expression};
use crate::ir::value::Value;

/// A value only the host can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    EnemyDirection,
    Alive,
}

/// Evaluates expressions against the variable store. Query expressions take
/// their values, in evaluation order, from `answers`; the first query without
/// an answer stops evaluation.
pub struct Evaluator<'a> {
    variables: &'a HashMap<String, Value>,
    answers: &'a [Value],
    next_answer: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a HashMap<String, Value>, answers: &'a [Value]) -> Self {
        Self {
            variables,
            answers,
            next_answer: 0,
        }
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, Query> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            // unset variables read as 0
            Expression::Variable(name) => Ok(self.variables.get(name).cloned().unwrap_or_default()),
            Expression::BinaryOp { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(apply(*op, &left, &right))
            }
            Expression::EnemyDirection => self.answer(Query::EnemyDirection),
            Expression::Alive => self.answer(Query::Alive),
        }
    }

    fn answer(&mut self, query: Query) -> Result<Value, Query> {
        let value = self.answers.get(self.next_answer).cloned().ok_or(query)?;
        self.next_answer += 1;
        Ok(value)
    }
}

/// Applies a binary operator. Comparisons follow the type of the left operand.
pub fn apply(op: BinaryOperator, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOperator::Equal => Value::boolean(same(left, right)),
        BinaryOperator::NotEqual => Value::boolean(!same(left, right)),
        BinaryOperator::Add => match left {
            Value::Number(n) => Value::Number(n + right.to_number()),
            _ => Value::Text(format!("{}{}", left, right)),
        },
        BinaryOperator::Subtract => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => {
            let divisor = right.to_number();
            if divisor == 0.0 {
                log::debug!("division of {} by zero gives 0", left);
                Value::Number(0.0)
            } else {
                Value::Number(left.to_number() / divisor)
            }
        }
        BinaryOperator::Less => match left {
            Value::Number(n) => Value::boolean(*n < right.to_number()),
            _ => Value::boolean(left.to_string() < right.to_string()),
        },
        BinaryOperator::Greater => match left {
            Value::Number(n) => Value::boolean(*n > right.to_number()),
            _ => Value::boolean(left.to_string() > right.to_string()),
        },
    }
}

fn same(left: &Value, right: &Value) -> bool {
    match left {
        Value::Number(_) | Value::Direction(_) => left.to_number() == right.to_number(),
        Value::Text(_) => left.to_string() == right.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::Direction;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(apply(BinaryOperator::Divide, &num(5.0), &num(0.0)), num(0.0));
        assert_eq!(apply(BinaryOperator::Divide, &num(5.0), &num(2.0)), num(2.5));
    }

    #[test]
    fn plus_follows_the_left_operand() {
        assert_eq!(apply(BinaryOperator::Add, &num(1.0), &text("2")), num(3.0));
        assert_eq!(apply(BinaryOperator::Add, &text("pv: "), &num(10.0)), text("pv: 10"));
        assert_eq!(
            apply(BinaryOperator::Add, &Value::Direction(Direction::UpLeft), &text("!")),
            text("HAUTGAUCHE!")
        );
    }

    #[test]
    fn equality_by_left_type() {
        let up_right = Value::Direction(Direction::UpRight);
        assert_eq!(apply(BinaryOperator::Equal, &up_right, &up_right), num(1.0));
        assert_eq!(apply(BinaryOperator::Equal, &up_right, &num(1.0)), num(1.0));
        let down_left = Value::Direction(Direction::DownLeft);
        assert_eq!(apply(BinaryOperator::NotEqual, &up_right, &down_left), num(1.0));
        assert_eq!(apply(BinaryOperator::Equal, &text("a"), &text("a")), num(1.0));
        assert_eq!(apply(BinaryOperator::Equal, &text("1"), &num(1.0)), num(1.0));
        assert_eq!(apply(BinaryOperator::NotEqual, &num(2.0), &num(2.0)), num(0.0));
    }

    #[test]
    fn ordering_by_left_type() {
        assert_eq!(apply(BinaryOperator::Less, &num(2.0), &num(10.0)), num(1.0));
        // lexicographic for text: "2" > "10"
        assert_eq!(apply(BinaryOperator::Less, &text("2"), &num(10.0)), num(0.0));
        assert_eq!(apply(BinaryOperator::Greater, &text("b"), &text("a")), num(1.0));
    }

    #[test]
    fn unset_variable_reads_zero() {
        let variables = HashMap::new();
        let mut evaluator = Evaluator::new(&variables, &[]);
        assert_eq!(evaluator.evaluate(&Expression::Variable("nope".into())), Ok(num(0.0)));
    }

    #[test]
    fn queries_consume_answers_in_order() {
        let variables = HashMap::new();
        let both = Expression::binary(
            Expression::EnemyDirection,
            BinaryOperator::Equal,
            Expression::EnemyDirection,
        );

        let mut evaluator = Evaluator::new(&variables, &[]);
        assert_eq!(evaluator.evaluate(&both), Err(Query::EnemyDirection));

        let one = [Value::Direction(Direction::UpRight)];
        let mut evaluator = Evaluator::new(&variables, &one);
        assert_eq!(evaluator.evaluate(&both), Err(Query::EnemyDirection));

        let two = [Value::Direction(Direction::UpRight), Value::Direction(Direction::UpRight)];
        let mut evaluator = Evaluator::new(&variables, &two);
        assert_eq!(evaluator.evaluate(&both), Ok(num(1.0)));
    }
}
