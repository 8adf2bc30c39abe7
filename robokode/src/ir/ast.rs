use std::collections::HashMap;

use super::value::{Direction, Value};

/// A parsed script: the flat statement list and where each label points.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// print a + 1
    Print(Expression),
    /// input nom
    Input(String),
    /// x = 10
    Assign(Assignment),
    /// goto fin
    Goto(String),
    /// si (cond) ... [sinon ...] finsi
    IfThen {
        condition: Expression,
        else_label: Option<String>,
        end_label: String,
    },
    /// tantque (cond) ... fintantque
    While {
        condition: Expression,
        start_label: String,
        end_label: String,
    },
    /// pour (i = 0 ; i < 3 ; i = i + 1) ... finpour
    For {
        init: Assignment,
        condition: Expression,
        step: Assignment,
        start_label: String,
        end_label: String,
    },
    /// deplacer(HAUTDROIT)
    Move(DirectionSource),
    /// attaquer.tirer(d)
    Shoot(DirectionSource),
    /// attaquer.melee(BASGAUCHE)
    Melee(Direction),
    /// recharger()
    Reload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expression,
}

impl Assignment {
    pub fn new(target: impl Into<String>, value: Expression) -> Self {
        Self {
            target: target.into(),
            value,
        }
    }
}

/// Where an action statement takes its direction from.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionSource {
    Literal(Direction),
    /// Resolved when the statement runs.
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// 10, "texte", HAUTDROIT
    Literal(Value),
    /// x
    Variable(String),
    /// a + 5
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// detecterEnnemi()
    EnemyDirection,
    /// estVivant()
    Alive,
}

impl Expression {
    pub fn number(n: f64) -> Self {
        Expression::Literal(Value::Number(n))
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

/// All operators share one precedence level and associate left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,    // =
    NotEqual, // !
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Less,     // <
    Greater,  // >
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Equal),
            "!" => Some(Self::NotEqual),
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "<" => Some(Self::Less),
            ">" => Some(Self::Greater),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::Equal => '=',
            Self::NotEqual => '!',
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Less => '<',
            Self::Greater => '>',
        }
    }
}
