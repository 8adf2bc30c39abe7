pub mod console;
pub mod eval;
pub mod governor;

use std::collections::HashMap;

use crate::error::{ErrorKind, ErrorLog, SyntaxError};
use crate::ir::ast::{Assignment, DirectionSource, Expression, Program, Statement};
use crate::ir::value::{Direction, Value};
use crate::parser;

use console::{Console, StdConsole};
use eval::{Evaluator, Query};
use governor::{Governor, INSTRUCTION_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Statements a single run may execute before it is stopped.
    pub instruction_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instruction_limit: INSTRUCTION_LIMIT,
        }
    }
}

/// Why a run handed control back to the host while it can still continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    Move(Direction),
    Shoot(Direction),
    Melee(Direction),
    /// Answer with `set_direction_result` before resuming. Resuming without
    /// an answer means no enemy is in sight and the query reads as 0.
    DetectEnemy,
    /// Answer with `set_boolean_result` before resuming.
    AliveCheck,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Suspended(Suspension),
    Terminated,
    LoopLimitExceeded,
    /// Stopped by a run-time fault.
    Aborted,
}

/// The single result of every `interpret` and `resume` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Terminated,
    Move(Direction),
    Shoot(Direction),
    Melee(Direction),
    DetectEnemy,
    AliveCheck,
    Reload,
    SyntaxErrors(Vec<SyntaxError>),
    LoopLimitExceeded,
}

impl Message {
    /// `true` when calling `resume` can make progress.
    pub fn is_suspension(&self) -> bool {
        matches!(
            self,
            Message::Move(_)
                | Message::Shoot(_)
                | Message::Melee(_)
                | Message::DetectEnemy
                | Message::AliveCheck
                | Message::Reload
        )
    }
}

impl From<Suspension> for Message {
    fn from(suspension: Suspension) -> Self {
        match suspension {
            Suspension::Move(d) => Message::Move(d),
            Suspension::Shoot(d) => Message::Shoot(d),
            Suspension::Melee(d) => Message::Melee(d),
            Suspension::DetectEnemy => Message::DetectEnemy,
            Suspension::AliveCheck => Message::AliveCheck,
            Suspension::Reload => Message::Reload,
        }
    }
}

impl From<Query> for Suspension {
    fn from(query: Query) -> Self {
        match query {
            Query::EnemyDirection => Suspension::DetectEnemy,
            Query::Alive => Suspension::AliveCheck,
        }
    }
}

/// Why a statement did not run to completion.
#[derive(Debug)]
enum Interrupt {
    /// Needs a host answer; the statement runs again on resume.
    Query(Query),
    Fault(SyntaxError),
}

impl From<Query> for Interrupt {
    fn from(query: Query) -> Self {
        Interrupt::Query(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForPhase {
    /// init or step done, condition not tested yet
    Checking,
    /// condition held, body running
    Iterating,
}

/// Everything that changes while a program runs.
#[derive(Debug, Clone)]
pub struct ExecutionState {
    pub program_counter: usize,
    pub variables: HashMap<String, Value>,
    pub status: Status,
    governor: Governor,
    // host answers for the queries of the statement at `program_counter`
    answers: Vec<Value>,
    loops: HashMap<usize, ForPhase>,
}

impl ExecutionState {
    fn new(instruction_limit: usize) -> Self {
        Self {
            program_counter: 0,
            variables: HashMap::new(),
            status: Status::Terminated,
            governor: Governor::new(instruction_limit),
            answers: Vec::new(),
            loops: HashMap::new(),
        }
    }

    /// Back to the first statement with no variables and a fresh counter.
    fn reset(&mut self) {
        self.program_counter = 0;
        self.variables.clear();
        self.status = Status::Terminated;
        self.governor.reset();
        self.answers.clear();
        self.loops.clear();
    }

    pub fn instruction_count(&self) -> usize {
        self.governor.count()
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    fn evaluate(&self, expression: &Expression) -> Result<Value, Query> {
        Evaluator::new(&self.variables, &self.answers).evaluate(expression)
    }

    fn assign(&mut self, assignment: &Assignment) -> Result<(), Interrupt> {
        let value = self.evaluate(&assignment.value)?;
        self.variables.insert(assignment.target.clone(), value);
        Ok(())
    }

    fn condition(&self, expression: &Expression) -> Result<bool, Interrupt> {
        Ok(self.evaluate(expression)?.is_truthy())
    }

    fn label(&self, program: &Program, label: &str) -> Result<usize, Interrupt> {
        program.label(label).ok_or_else(|| {
            Interrupt::Fault(SyntaxError::new(ErrorKind::UnknownLabel, label, true))
        })
    }

    fn jump(&mut self, program: &Program, label: &str) -> Result<(), Interrupt> {
        self.program_counter = self.label(program, label)?;
        Ok(())
    }

    fn direction(&self, source: &DirectionSource) -> Result<Direction, Interrupt> {
        match source {
            DirectionSource::Literal(direction) => Ok(*direction),
            DirectionSource::Variable(name) => match self.variables.get(name) {
                Some(Value::Direction(direction)) => Ok(*direction),
                Some(other) => {
                    log::debug!(
                        "'{}' holds {} instead of a direction, using HAUTDROIT",
                        name,
                        other
                    );
                    Ok(Direction::UpRight)
                }
                None => Err(Interrupt::Fault(SyntaxError::new(
                    ErrorKind::InvalidVariable,
                    name.clone(),
                    true,
                ))),
            },
        }
    }
}

/// Runs a script one statement at a time, stopping whenever the host has to
/// act or answer.
pub struct Interpreter<C: Console = StdConsole> {
    config: EngineConfig,
    console: C,
    program: Program,
    state: ExecutionState,
    errors: ErrorLog,
    direction_result: Option<Direction>,
    boolean_result: Option<i32>,
}

impl Interpreter<StdConsole> {
    pub fn new() -> Self {
        Self::with_console(StdConsole)
    }
}

impl Default for Interpreter<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> Interpreter<C> {
    pub fn with_console(console: C) -> Self {
        let config = EngineConfig::default();
        Self {
            config,
            console,
            program: Program::default(),
            state: ExecutionState::new(config.instruction_limit),
            errors: ErrorLog::new(),
            direction_result: None,
            boolean_result: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self.state = ExecutionState::new(config.instruction_limit);
        self
    }

    /// Parses `source` and runs it from the first statement. Any syntax error
    /// stops here: nothing is executed and every error is returned.
    pub fn interpret(&mut self, source: &str) -> Message {
        let result = parser::parse(source);
        self.program = result.program;
        self.errors = ErrorLog::from(result.errors);
        self.state.reset();
        self.direction_result = None;
        self.boolean_result = None;

        if self.errors.has_errors() {
            log::debug!("{} syntax error(s), not running", self.errors.errors().len());
            self.state.status = Status::Aborted;
            return Message::SyntaxErrors(self.errors.errors().to_vec());
        }

        log::debug!(
            "running {} statement(s), {} label(s)",
            self.program.len(),
            self.program.labels.len()
        );
        self.run()
    }

    /// Continues after a suspension. After `DetectEnemy` or `AliveCheck` the
    /// statement that asked runs again and receives the value given through
    /// the matching setter.
    pub fn resume(&mut self) -> Message {
        match self.state.status {
            Status::Suspended(Suspension::DetectEnemy) => {
                // no answer means no enemy in sight, which reads as 0
                let answer = self
                    .direction_result
                    .take()
                    .map_or(Value::Number(0.0), Value::Direction);
                self.state.answers.push(answer);
                self.run()
            }
            Status::Suspended(Suspension::AliveCheck) => {
                let alive = self.boolean_result.take().unwrap_or(0);
                self.state.answers.push(Value::Number(alive as f64));
                self.run()
            }
            Status::Suspended(_) | Status::Running => self.run(),
            Status::Terminated => Message::Terminated,
            Status::LoopLimitExceeded => Message::LoopLimitExceeded,
            Status::Aborted => Message::SyntaxErrors(self.errors.errors().to_vec()),
        }
    }

    pub fn set_direction_result(&mut self, direction: Direction) {
        self.direction_result = Some(direction);
    }

    /// 1 when the enemy is alive, 0 otherwise.
    pub fn set_boolean_result(&mut self, value: i32) {
        self.boolean_result = Some(value);
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn errors(&self) -> &[SyntaxError] {
        self.errors.errors()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    fn run(&mut self) -> Message {
        self.state.status = Status::Running;

        while self.state.program_counter < self.program.len() {
            let index = self.state.program_counter;
            self.state.program_counter += 1;
            // runs after the advance so jumps can overwrite it
            let outcome = self.step(index);

            if !matches!(outcome, Err(Interrupt::Query(_))) {
                self.state.answers.clear();
            }

            if self.state.governor.tick() {
                log::debug!("instruction limit of {} exceeded", self.state.governor.limit());
                self.state.status = Status::LoopLimitExceeded;
                return Message::LoopLimitExceeded;
            }

            match outcome {
                Ok(None) => {}
                Ok(Some(suspension)) => return self.suspend(suspension),
                Err(Interrupt::Query(query)) => {
                    self.state.program_counter = index;
                    return self.suspend(query.into());
                }
                Err(Interrupt::Fault(error)) => {
                    log::warn!("run-time fault at statement {}: {}", index, error);
                    self.errors.add(error);
                    self.state.status = Status::Aborted;
                    return Message::SyntaxErrors(self.errors.errors().to_vec());
                }
            }
        }

        self.state.status = Status::Terminated;
        Message::Terminated
    }

    fn suspend(&mut self, suspension: Suspension) -> Message {
        log::debug!("suspended: {:?}", suspension);
        self.state.status = Status::Suspended(suspension);
        suspension.into()
    }

    /// Executes one statement. `Ok(Some(_))` means it completed and the host
    /// must now act on it.
    fn step(&mut self, index: usize) -> Result<Option<Suspension>, Interrupt> {
        let program = &self.program;
        let state = &mut self.state;
        let statement = &program.statements[index];
        log::trace!("[{}] {:?}", index, statement);

        match statement {
            Statement::Print(expression) => {
                let value = state.evaluate(expression)?;
                self.console.print(&value.to_string());
            }
            Statement::Input(name) => {
                // end of input leaves the variable alone
                if let Some(line) = self.console.read_line() {
                    let value = match line.trim().parse::<f64>() {
                        Ok(n) => Value::Number(n),
                        Err(_) => Value::Text(line),
                    };
                    state.variables.insert(name.clone(), value);
                }
            }
            Statement::Assign(assignment) => state.assign(assignment)?,
            Statement::Goto(label) => state.jump(program, label)?,
            Statement::IfThen {
                condition,
                else_label,
                end_label,
            } => {
                let end = state.label(program, end_label)?;
                if !state.condition(condition)? {
                    state.program_counter = match else_label {
                        Some(label) => state.label(program, label)?,
                        None => end,
                    };
                }
            }
            Statement::While {
                condition,
                end_label,
                ..
            } => {
                let end = state.label(program, end_label)?;
                if !state.condition(condition)? {
                    state.program_counter = end;
                }
            }
            Statement::For {
                init,
                condition,
                step,
                end_label,
                ..
            } => {
                let end = state.label(program, end_label)?;
                match state.loops.get(&index).copied() {
                    None => {
                        state.assign(init)?;
                        state.loops.insert(index, ForPhase::Checking);
                        // init is done; only the condition may ask again
                        state.answers.clear();
                    }
                    Some(ForPhase::Iterating) => {
                        state.assign(step)?;
                        state.loops.insert(index, ForPhase::Checking);
                        state.answers.clear();
                    }
                    Some(ForPhase::Checking) => {}
                }

                if state.condition(condition)? {
                    state.loops.insert(index, ForPhase::Iterating);
                } else {
                    state.loops.remove(&index);
                    state.program_counter = end;
                }
            }
            Statement::Move(source) => {
                return Ok(Some(Suspension::Move(state.direction(source)?)));
            }
            Statement::Shoot(source) => {
                return Ok(Some(Suspension::Shoot(state.direction(source)?)));
            }
            Statement::Melee(direction) => return Ok(Some(Suspension::Melee(*direction))),
            Statement::Reload => return Ok(Some(Suspension::Reload)),
        }

        Ok(None)
    }
}
