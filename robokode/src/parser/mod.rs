pub mod lexer;
pub mod parser;

pub use parser::{BlockKind, ParseResult};

/// Main parser entry point: script text to program plus collected errors.
pub fn parse(source: &str) -> ParseResult {
    // Every statement must end with a line break, including the last one.
    let source = format!("{}\n\n", source);
    let tokens = lexer::tokenize(&source);
    parser::parse_tokens(tokens)
}
