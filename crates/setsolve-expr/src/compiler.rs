//! Flattening of nested expressions into an ordered command plan.
//!
//! Every operation node gets a temporary key `<namespace>:<n>`, allocated in
//! pre-order before its operands are visited. Commands are emitted in
//! post-order, so each command only reads keys written by commands earlier in
//! the plan. The root is always the last command.

use setsolve_core::Namespace;

use super::ast::{Expr, Operand};
use super::parser::{ExpressionError, MAX_DEPTH};
use super::verbs;

/// A single flattened command.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    verb: String,
    store_verb: String,
    destination: String,
    operands: Vec<Operand>,
}

impl Command {
    /// Operator token as written in the expression.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Translated store-and-compute verb.
    #[must_use]
    pub fn store_verb(&self) -> &str {
        &self.store_verb
    }

    /// Temporary key this command writes in its stored form.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Compiled operands: literals, or temporary keys of nested results.
    #[must_use]
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Whether the command performs a real operation (has source operands).
    #[must_use]
    pub fn is_real(&self) -> bool {
        !self.operands.is_empty()
    }

    /// `[store_verb, destination, operands...]` as strings.
    #[must_use]
    pub fn stored_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.operands.len() + 2);
        args.push(self.store_verb.clone());
        args.push(self.destination.clone());
        args.extend(self.operands.iter().map(ToString::to_string));
        args
    }

    /// `[verb, operands...]` as strings.
    #[must_use]
    pub fn direct_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.operands.len() + 1);
        args.push(self.verb.clone());
        args.extend(self.operands.iter().map(ToString::to_string));
        args
    }

    /// Store command writing the result into [`Command::destination`].
    #[must_use]
    pub fn stored_cmd(&self) -> redis::Cmd {
        let mut cmd = redis::cmd(&self.store_verb);
        cmd.arg(&self.destination).arg(&self.operands);
        cmd
    }

    /// Command with its original read-only semantics, destination dropped.
    #[must_use]
    pub fn direct_cmd(&self) -> redis::Cmd {
        let mut cmd = redis::cmd(&self.verb);
        cmd.arg(&self.operands);
        cmd
    }
}

/// Compiler output: temporary keys to clean up and commands to run, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    temp_keys: Vec<String>,
    commands: Vec<Command>,
}

impl Plan {
    /// All temporary keys allocated, in allocation order.
    #[must_use]
    pub fn temp_keys(&self) -> &[String] {
        &self.temp_keys
    }

    /// Commands in execution order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The outermost command, always last.
    #[must_use]
    pub fn root(&self) -> &Command {
        // A plan is only built from an operation node, which emits at least one command.
        &self.commands[self.commands.len() - 1]
    }

    /// Whether the plan is a single unnested command.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.commands.len() == 1
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always `false`: a compiled plan holds at least one command.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Index of the last real command, whose reply is the plan's result.
    #[must_use]
    pub fn result_index(&self) -> Option<usize> {
        self.commands.iter().rposition(Command::is_real)
    }
}

/// Accumulator threaded through one compilation.
#[derive(Debug)]
struct Compilation<'a> {
    namespace: &'a str,
    temp_keys: Vec<String>,
    commands: Vec<Command>,
}

impl<'a> Compilation<'a> {
    fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            temp_keys: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn allocate(&mut self) -> String {
        let key = format!("{}:{}", self.namespace, self.temp_keys.len());
        self.temp_keys.push(key.clone());
        key
    }

    /// Compile an operation node and return the key holding its result.
    fn node(&mut self, op: &str, args: &[Expr]) -> Result<String, ExpressionError> {
        if op.is_empty() {
            return Err(ExpressionError::InvalidOperator {
                found: "\"\"".to_owned(),
            });
        }

        let destination = self.allocate();
        let operands = args
            .iter()
            .map(|arg| self.operand(arg))
            .collect::<Result<Vec<_>, _>>()?;

        self.commands.push(Command {
            verb: op.to_owned(),
            store_verb: verbs::translate(op),
            destination: destination.clone(),
            operands,
        });
        Ok(destination)
    }

    fn operand(&mut self, expr: &Expr) -> Result<Operand, ExpressionError> {
        match expr {
            Expr::Leaf(operand) => Ok(operand.clone()),
            Expr::Node { op, args } => self.node(op, args).map(Operand::Str),
        }
    }

    fn finish(self) -> Plan {
        Plan {
            temp_keys: self.temp_keys,
            commands: self.commands,
        }
    }
}

/// Compile an expression using the default temporary-key namespace.
pub fn compile(expr: &Expr) -> Result<Plan, ExpressionError> {
    compile_with_namespace(expr, &Namespace::default())
}

/// Compile an expression, allocating temporary keys under `namespace`.
pub fn compile_with_namespace(expr: &Expr, namespace: &Namespace) -> Result<Plan, ExpressionError> {
    let (op, args) = match expr {
        Expr::Node { op, args } => (op, args),
        Expr::Leaf(operand) => {
            return Err(ExpressionError::NotAnOperation {
                found: operand.to_string(),
            });
        }
    };

    let depth = expr.depth();
    if depth > MAX_DEPTH {
        return Err(ExpressionError::TooDeep {
            depth,
            max: MAX_DEPTH,
        });
    }

    let mut compilation = Compilation::new(namespace.as_str());
    compilation.node(op, args)?;
    let plan = compilation.finish();

    tracing::debug!(
        namespace = %namespace,
        commands = plan.len(),
        temp_keys = plan.temp_keys().len(),
        depth,
        "compiled expression"
    );
    Ok(plan)
}
