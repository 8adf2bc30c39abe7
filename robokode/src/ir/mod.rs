pub mod ast;
pub mod value;

pub use ast::{Assignment, BinaryOperator, DirectionSource, Expression, Program, Statement};
pub use value::{Direction, Value};
