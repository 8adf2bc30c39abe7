use std::fmt;

/// The four diagonal directions a robot can act in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "HAUTGAUCHE" => Some(Self::UpLeft),
            "HAUTDROIT" => Some(Self::UpRight),
            "BASGAUCHE" => Some(Self::DownLeft),
            "BASDROIT" => Some(Self::DownRight),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::UpLeft => "HAUTGAUCHE",
            Self::UpRight => "HAUTDROIT",
            Self::DownLeft => "BASGAUCHE",
            Self::DownRight => "BASDROIT",
        }
    }

    /// Numeric code used when a direction takes part in a comparison.
    pub fn code(&self) -> f64 {
        match self {
            Self::UpRight => 1.0,
            Self::UpLeft => 2.0,
            Self::DownRight => 3.0,
            Self::DownLeft => 4.0,
        }
    }

    /// Grid offset as (row, column).
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::UpLeft => (-1, -1),
            Self::UpRight => (-1, 1),
            Self::DownLeft => (1, -1),
            Self::DownRight => (1, 1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Direction(Direction),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn boolean(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    /// Text that does not parse as a number counts as 0.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            Value::Direction(d) => d.code(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        self.to_number() != 0.0
    }

    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            Value::Direction(d) => Some(*d),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // through i64 so that -0 prints as 0
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Direction(d) => write!(f, "{}", d),
        }
    }
}

impl From<Direction> for Value {
    fn from(direction: Direction) -> Self {
        Value::Direction(direction)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
