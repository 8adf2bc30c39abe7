use std::collections::{HashMap, HashSet};

use crate::error::{ErrorKind, ErrorLog, SyntaxError};
use crate::ir::ast::{self, Assignment, DirectionSource, Expression, Statement};
use crate::ir::value::{Direction, Value};
use super::lexer::{Token, TokenKind};

/// Output of a parse: the program and every syntax error found on the way.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: ast::Program,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseResult {
    let mut parser = Parser::new(tokens);
    parser.parse_program();
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    While,
    For,
}

impl BlockKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::If => "si",
            BlockKind::While => "tantque",
            BlockKind::For => "pour",
        }
    }
}

/// An open block waiting for its closing keyword. `index` is the position of
/// the statement that opened it.
#[derive(Debug, Clone, Copy)]
enum Frame {
    If {
        index: usize,
        else_jump: Option<usize>,
    },
    While {
        index: usize,
    },
    For {
        index: usize,
    },
}

impl Frame {
    fn kind(&self) -> BlockKind {
        match self {
            Frame::If { .. } => BlockKind::If,
            Frame::While { .. } => BlockKind::While,
            Frame::For { .. } => BlockKind::For,
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
    statements: Vec<Statement>,
    labels: HashMap<String, usize>,
    frames: Vec<Frame>,
    // names seen on the left of `=`, accepted where a direction is expected
    assigned: HashSet<String>,
    errors: ErrorLog,
    next_label: u64,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        let eof = tokens
            .last()
            .filter(|t| t.kind == TokenKind::Eof)
            .cloned()
            .unwrap_or_else(Token::eof);
        Self {
            tokens,
            position: 0,
            eof,
            statements: Vec::new(),
            labels: HashMap::new(),
            frames: Vec::new(),
            assigned: HashSet::new(),
            errors: ErrorLog::new(),
            next_label: 0,
        }
    }

    fn finish(self) -> ParseResult {
        ParseResult {
            program: ast::Program {
                statements: self.statements,
                labels: self.labels,
            },
            errors: self.errors.into_errors(),
        }
    }

    fn parse_program(&mut self) {
        loop {
            while self.match_kind(TokenKind::LineBreak) {}

            if self.match_kind(TokenKind::Label) {
                let name = self.last(1).text.clone();
                self.labels.insert(name, self.statements.len());
            } else if self.match_pair(TokenKind::Word, TokenKind::Equals) {
                let name = self.last(2).text.clone();
                self.assigned.insert(name.clone());
                let value = self.expression();
                self.statements.push(Statement::Assign(Assignment::new(name, value)));
            } else if self.match_word("print") {
                let value = self.expression();
                self.statements.push(Statement::Print(value));
            } else if self.match_word("input") {
                let name = self.consume(TokenKind::Word).text;
                self.statements.push(Statement::Input(name));
            } else if self.match_word("goto") {
                let label = self.consume(TokenKind::Word).text;
                self.statements.push(Statement::Goto(label));
            } else if self.match_word("deplacer") {
                self.parse_move();
            } else if self.match_word("attaquer") {
                self.parse_attack();
            } else if self.match_word("pour") {
                self.parse_for();
            } else if self.match_word("finpour") {
                self.close_loop(BlockKind::For, "finpour");
            } else if self.match_word("tantque") {
                self.parse_while();
            } else if self.match_word("fintantque") {
                self.close_loop(BlockKind::While, "fintantque");
            } else if self.match_word("si") {
                self.parse_if();
            } else if self.match_word("sinon") {
                self.parse_else();
            } else if self.match_word("finsi") {
                self.close_if();
            } else if self.match_word("recharger") {
                self.statements.push(Statement::Reload);
                self.consume(TokenKind::LeftParen);
                self.consume(TokenKind::RightParen);
            } else if self.match_kind(TokenKind::Eof) {
                break;
            } else {
                let token = self.get(0).clone();
                self.error_at(ErrorKind::UnexpectedInstruction, &token, true);
                self.skip_line();
            }
        }

        // Blocks still open at the end of input.
        for frame in std::mem::take(&mut self.frames).into_iter().rev() {
            let keyword = frame.kind().keyword();
            self.errors.add_error(ErrorKind::UnclosedBlock, keyword, true);
        }
    }

    // === ACTIONS === //

    fn parse_move(&mut self) {
        self.consume(TokenKind::LeftParen);
        if let Some(source) = self.direction_source() {
            self.statements.push(Statement::Move(source));
        }
        self.consume(TokenKind::RightParen);
    }

    fn parse_attack(&mut self) {
        if self.match_word("tirer") {
            self.consume(TokenKind::LeftParen);
            if let Some(source) = self.direction_source() {
                self.statements.push(Statement::Shoot(source));
            }
            self.consume(TokenKind::RightParen);
        } else if self.match_word("melee") {
            self.consume(TokenKind::LeftParen);
            let token = self.get(0).clone();
            match Direction::from_keyword(&token.text) {
                Some(direction) => self.statements.push(Statement::Melee(direction)),
                None => self.error_at(ErrorKind::InvalidDirection, &token, true),
            }
            self.consume_word(&token.text);
            self.consume(TokenKind::RightParen);
        } else {
            let token = self.get(0).clone();
            self.error_at(ErrorKind::UnexpectedInstruction, &token, true);
            self.skip_line();
        }
    }

    /// A direction keyword, or the name of a variable assigned somewhere
    /// earlier in the script. Whether that variable really holds a direction
    /// is only known at run time.
    fn direction_source(&mut self) -> Option<DirectionSource> {
        let token = self.get(0).clone();
        let source = if self.assigned.contains(&token.text) {
            Some(DirectionSource::Variable(token.text.clone()))
        } else if let Some(direction) = Direction::from_keyword(&token.text) {
            Some(DirectionSource::Literal(direction))
        } else {
            self.error_at(ErrorKind::InvalidDirection, &token, true);
            None
        };
        self.consume_word(&token.text);
        source
    }

    // === BLOCKS === //

    fn parse_for(&mut self) {
        self.consume(TokenKind::LeftParen);
        let init = self.assignment();
        let condition = self.expression();
        let step = self.assignment();
        self.consume(TokenKind::RightParen);

        let index = self.statements.len();
        let start_label = self.mint_label(index);
        self.statements.push(Statement::For {
            init,
            condition,
            step,
            start_label,
            end_label: String::new(),
        });
        self.frames.push(Frame::For { index });
    }

    fn parse_while(&mut self) {
        let condition = self.expression();

        let index = self.statements.len();
        let start_label = self.mint_label(index);
        self.statements.push(Statement::While {
            condition,
            start_label,
            end_label: String::new(),
        });
        self.frames.push(Frame::While { index });
    }

    /// `fintantque` / `finpour`: jump back to the loop head, then mark the exit.
    fn close_loop(&mut self, kind: BlockKind, keyword: &str) {
        let index = match self.frames.last() {
            Some(Frame::While { index }) if kind == BlockKind::While => *index,
            Some(Frame::For { index }) if kind == BlockKind::For => *index,
            _ => {
                self.unexpected_keyword(keyword);
                return;
            }
        };

        let start = match &self.statements[index] {
            Statement::While { start_label, .. } | Statement::For { start_label, .. } => {
                start_label.clone()
            }
            _ => String::new(),
        };
        self.statements.push(Statement::Goto(start));

        let end = self.mint_label(self.statements.len());
        if let Statement::While { end_label, .. } | Statement::For { end_label, .. } =
            &mut self.statements[index]
        {
            *end_label = end;
        }
        self.frames.pop();
    }

    fn parse_if(&mut self) {
        let condition = self.expression();

        let index = self.statements.len();
        self.statements.push(Statement::IfThen {
            condition,
            else_label: None,
            end_label: String::new(),
        });
        self.frames.push(Frame::If {
            index,
            else_jump: None,
        });
    }

    fn parse_else(&mut self) {
        let index = match self.frames.last() {
            Some(Frame::If {
                index,
                else_jump: None,
            }) => *index,
            _ => {
                self.unexpected_keyword("sinon");
                return;
            }
        };

        // The `si` branch ends with a jump over the `sinon` branch; its
        // target is filled in by `finsi`.
        let jump = self.statements.len();
        self.statements.push(Statement::Goto(String::new()));

        let label = self.mint_label(self.statements.len());
        if let Statement::IfThen { else_label, .. } = &mut self.statements[index] {
            *else_label = Some(label);
        }
        if let Some(Frame::If { else_jump, .. }) = self.frames.last_mut() {
            *else_jump = Some(jump);
        }
    }

    fn close_if(&mut self) {
        let (index, else_jump) = match self.frames.last() {
            Some(Frame::If { index, else_jump }) => (*index, *else_jump),
            _ => {
                self.unexpected_keyword("finsi");
                return;
            }
        };

        let end = self.mint_label(self.statements.len());
        if let Some(jump) = else_jump {
            self.statements[jump] = Statement::Goto(end.clone());
        }
        if let Statement::IfThen { end_label, .. } = &mut self.statements[index] {
            *end_label = end;
        }
        self.frames.pop();
    }

    fn unexpected_keyword(&mut self, keyword: &str) {
        let token = self.last(1).clone();
        debug_assert_eq!(token.text, keyword);
        self.error_at(ErrorKind::UnexpectedInstruction, &token, true);
    }

    /// Synthetic labels are plain numbers, which can never collide with a
    /// label written in a script (those start with a letter).
    fn mint_label(&mut self, target: usize) -> String {
        let name = self.next_label.to_string();
        self.next_label += 1;
        self.labels.insert(name.clone(), target);
        name
    }

    // === EXPRESSIONS === //

    /// `name = expr` inside a `pour` header.
    fn assignment(&mut self) -> Assignment {
        if self.match_pair(TokenKind::Word, TokenKind::Equals) {
            let name = self.last(2).text.clone();
            let value = self.expression();
            Assignment::new(name, value)
        } else {
            let token = self.get(0).clone();
            self.error_at(ErrorKind::Expected("an assignment".to_string()), &token, false);
            Assignment::new(String::new(), Expression::number(0.0))
        }
    }

    /// Every operator has the same precedence, so `1 + 2 * 3` is `(1 + 2) * 3`.
    fn expression(&mut self) -> Expression {
        let Some(mut expression) = self.atomic() else {
            return Expression::number(0.0);
        };

        while self.match_kind(TokenKind::Operator) || self.match_kind(TokenKind::Equals) {
            let symbol = self.last(1).clone();
            let right = self.atomic().unwrap_or_else(|| Expression::number(0.0));
            match ast::BinaryOperator::from_symbol(&symbol.text) {
                Some(op) => expression = Expression::binary(expression, op, right),
                None => self.error_at(ErrorKind::UnknownOperator, &symbol, true),
            }
        }

        expression
    }

    fn atomic(&mut self) -> Option<Expression> {
        if let Some(direction) = Direction::from_keyword(&self.get(0).text) {
            if self.get(0).kind == TokenKind::Word {
                self.position += 1;
                return Some(Expression::Literal(Value::Direction(direction)));
            }
        }

        if self.match_word("detecterEnnemi") {
            self.consume(TokenKind::LeftParen);
            self.consume(TokenKind::RightParen);
            Some(Expression::EnemyDirection)
        } else if self.match_word("estVivant") {
            self.consume(TokenKind::LeftParen);
            self.consume(TokenKind::RightParen);
            Some(Expression::Alive)
        } else if self.match_kind(TokenKind::Word) {
            Some(Expression::Variable(self.last(1).text.clone()))
        } else if self.match_kind(TokenKind::Number) {
            let n = self.last(1).text.parse().unwrap_or(0.0);
            Some(Expression::number(n))
        } else if self.match_kind(TokenKind::String) {
            Some(Expression::Literal(Value::Text(self.last(1).text.clone())))
        } else if self.match_kind(TokenKind::LeftParen) {
            let expression = self.expression();
            self.consume(TokenKind::RightParen);
            Some(expression)
        } else {
            let mut token = self.get(0).clone();
            if let Some(frame) = self.frames.last() {
                // point at the block the broken expression belongs to
                token.text = frame.kind().keyword().to_string();
            }
            self.error_at(ErrorKind::MalformedExpression, &token, false);
            self.skip_line();
            None
        }
    }

    // === TOKEN STREAM === //

    fn skip_line(&mut self) {
        while !self.match_kind(TokenKind::Eof) && !self.match_kind(TokenKind::LineBreak) {
            self.position += 1;
        }
        // Eof must stay visible to the statement loop.
        if self.last(1).kind == TokenKind::Eof {
            self.position -= 1;
        }
    }

    fn match_pair(&mut self, first: TokenKind, second: TokenKind) -> bool {
        if self.get(0).kind != first || self.get(1).kind != second {
            return false;
        }
        self.position += 2;
        true
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.get(0).kind != kind {
            return false;
        }
        self.position += 1;
        true
    }

    fn match_word(&mut self, name: &str) -> bool {
        if !self.get(0).is_word(name) {
            return false;
        }
        self.position += 1;
        true
    }

    /// Records an error when the next token is not of `kind`, but moves past
    /// it either way.
    fn consume(&mut self, kind: TokenKind) -> Token {
        let token = self.get(0).clone();
        if token.kind != kind {
            self.error_at(ErrorKind::Expected(kind.to_string()), &token, false);
        }
        self.position += 1;
        token
    }

    /// Records an error when the next token is not the word `name`; only
    /// moves on when it is.
    fn consume_word(&mut self, name: &str) {
        if !self.match_word(name) {
            let token = self.get(0).clone();
            self.error_at(ErrorKind::Expected(format!("'{}'", name)), &token, false);
        }
    }

    fn last(&self, offset: usize) -> &Token {
        self.position
            .checked_sub(offset)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    fn get(&self, offset: usize) -> &Token {
        self.tokens.get(self.position + offset).unwrap_or(&self.eof)
    }

    fn error_at(&mut self, kind: ErrorKind, token: &Token, highlighted: bool) {
        self.errors
            .add(SyntaxError::new(kind, token.text.clone(), highlighted).at(token.span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::BinaryOperator;
    use crate::parser::lexer::tokenize;

    fn parse(source: &str) -> ParseResult {
        parse_tokens(tokenize(&format!("{}\n\n", source)))
    }

    fn kinds(result: &ParseResult) -> Vec<ErrorKind> {
        result.errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn operators_associate_left_to_right() {
        let result = parse("print 1 + 2 * 3");
        assert!(!result.has_errors());
        let expected = Expression::binary(
            Expression::binary(
                Expression::number(1.0),
                BinaryOperator::Add,
                Expression::number(2.0),
            ),
            BinaryOperator::Multiply,
            Expression::number(3.0),
        );
        assert_eq!(result.program.statements, vec![Statement::Print(expected)]);
    }

    #[test]
    fn parentheses_restart_the_chain() {
        let result = parse("x = 1 + (2 * 3)");
        let Statement::Assign(assignment) = &result.program.statements[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(
            &assignment.value,
            Expression::BinaryOp { op: BinaryOperator::Add, right, .. }
                if matches!(**right, Expression::BinaryOp { op: BinaryOperator::Multiply, .. })
        ));
    }

    #[test]
    fn user_labels_point_at_next_statement() {
        let result = parse("x = 1\nboucle:\nx = x + 1\ngoto boucle");
        assert!(!result.has_errors());
        assert_eq!(result.program.label("boucle"), Some(1));
        assert_eq!(result.program.statements[2], Statement::Goto("boucle".into()));
    }

    #[test]
    fn while_block_compiles_to_jumps() {
        let result = parse("tantque (1)\nrecharger()\nfintantque");
        assert!(!result.has_errors());
        let program = &result.program;
        assert_eq!(program.len(), 3);
        let Statement::While { start_label, end_label, .. } = &program.statements[0] else {
            panic!("expected a while");
        };
        assert_eq!(program.label(start_label), Some(0));
        assert_eq!(program.label(end_label), Some(3));
        assert_eq!(program.statements[2], Statement::Goto(start_label.clone()));
    }

    #[test]
    fn if_else_patches_the_skip_jump() {
        let result = parse("si (x = 1)\nprint 1\nsinon\nprint 2\nfinsi\nprint 3");
        assert!(!result.has_errors());
        let program = &result.program;
        // si, print 1, goto end, print 2, print 3
        assert_eq!(program.len(), 5);
        let Statement::IfThen {
            else_label: Some(else_label),
            end_label,
            ..
        } = &program.statements[0]
        else {
            panic!("expected an if with else");
        };
        assert_eq!(program.label(else_label), Some(3));
        assert_eq!(program.label(end_label), Some(4));
        assert_eq!(program.statements[2], Statement::Goto(end_label.clone()));
    }

    #[test]
    fn for_header_parses_three_parts() {
        let result = parse("pour (i = 0 ; i < 3 ; i = i + 1)\nprint i\nfinpour");
        assert!(!result.has_errors(), "{:?}", result.errors);
        let Statement::For { init, step, .. } = &result.program.statements[0] else {
            panic!("expected a for");
        };
        assert_eq!(init.target, "i");
        assert_eq!(step.target, "i");
        assert_eq!(result.program.len(), 3);
    }

    #[test]
    fn directions_from_keywords_and_variables() {
        let result = parse(
            "d = HAUTGAUCHE\ndeplacer(d)\nattaquer.tirer(BASDROIT)\nattaquer.melee(HAUTDROIT)",
        );
        assert!(!result.has_errors(), "{:?}", result.errors);
        let statements = &result.program.statements;
        assert_eq!(statements[1], Statement::Move(DirectionSource::Variable("d".into())));
        assert_eq!(statements[2], Statement::Shoot(DirectionSource::Literal(Direction::DownRight)));
        assert_eq!(statements[3], Statement::Melee(Direction::UpRight));
    }

    #[test]
    fn unknown_direction_is_reported() {
        let result = parse("deplacer(NORD)");
        assert_eq!(kinds(&result), vec![ErrorKind::InvalidDirection]);
        assert_eq!(result.errors[0].token, "NORD");
    }

    #[test]
    fn melee_rejects_variables() {
        let result = parse("d = HAUTDROIT\nattaquer.melee(d)");
        assert_eq!(kinds(&result), vec![ErrorKind::InvalidDirection]);
    }

    #[test]
    fn queries_need_empty_parentheses() {
        let result = parse("d = detecterEnnemi()\nv = estVivant()");
        assert!(!result.has_errors());
        let statements = &result.program.statements;
        assert_eq!(
            statements[0],
            Statement::Assign(Assignment::new("d", Expression::EnemyDirection))
        );
        assert_eq!(statements[1], Statement::Assign(Assignment::new("v", Expression::Alive)));

        let compared = parse("si (detecterEnnemi() = HAUTDROIT)\nfinsi");
        assert!(!compared.has_errors(), "{:?}", compared.errors);

        let broken = parse("d = detecterEnnemi\n");
        assert!(broken.has_errors());
    }

    #[test]
    fn unclosed_block_is_reported() {
        let result = parse("si (1)\nprint 1");
        assert_eq!(kinds(&result), vec![ErrorKind::UnclosedBlock]);
        assert_eq!(result.errors[0].token, "si");
    }

    #[test]
    fn mismatched_closer_leaves_stack_alone() {
        let result = parse("tantque (1)\nfinsi\nfintantque");
        assert_eq!(kinds(&result), vec![ErrorKind::UnexpectedInstruction]);
        assert_eq!(result.errors[0].token, "finsi");
    }

    #[test]
    fn errors_accumulate_across_lines() {
        let result = parse("42 deplacer\nprint 1\n)\nfinpour");
        assert_eq!(
            kinds(&result),
            vec![ErrorKind::UnexpectedInstruction; 3]
        );
        // the statement between the broken lines still parsed
        assert_eq!(result.program.len(), 1);
    }

    #[test]
    fn second_else_is_unexpected() {
        let result = parse("si (1)\nsinon\nsinon\nfinsi");
        assert_eq!(kinds(&result), vec![ErrorKind::UnexpectedInstruction]);
    }

    #[test]
    fn missing_operand_is_a_malformed_expression() {
        let result = parse("x = 1 +\nprint x");
        assert_eq!(kinds(&result), vec![ErrorKind::MalformedExpression]);
        assert_eq!(result.program.len(), 2);
    }
}
