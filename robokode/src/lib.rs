//! Interpreter for RoboKode, a small French-keyword scripting language that
//! drives a grid robot.
//!
//! A script is tokenized, parsed into a flat list of statements (blocks are
//! compiled down to labels and jumps) and executed one statement at a time.
//! Actions and questions about the game world suspend the run and return a
//! [`Message`] to the host, which applies the action or supplies the answer
//! and then calls [`Interpreter::resume`].
//!
//! ```no_run
//! use robokode::{Direction, Interpreter, Message};
//!
//! let mut robot = Interpreter::new();
//! let script = "si (detecterEnnemi() = HAUTDROIT)\nattaquer.tirer(HAUTDROIT)\nfinsi";
//! let mut message = robot.interpret(script);
//! while message.is_suspension() {
//!     if message == Message::DetectEnemy {
//!         robot.set_direction_result(Direction::UpRight);
//!     }
//!     message = robot.resume();
//! }
//! ```

pub mod error;
pub mod grammar;
pub mod ir;
pub mod parser;
pub mod runtime;
pub mod span;

pub use error::{ErrorKind, SyntaxError};
pub use ir::{Direction, Value};
pub use parser::{parse, ParseResult};
pub use runtime::console::{BufferConsole, Console, StdConsole};
pub use runtime::{EngineConfig, Interpreter, Message, Status, Suspension};
