//! Calculator tool definition.
//!
//! Basic arithmetic on two numbers.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::ToolDefinition;
use crate::core::dispatch::{
    ArgKind, ArgumentRecord, DispatchError, Handler, HandlerOutput, SchemaDescriptor,
};

/// The four supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const NAMES: [&'static str; 4] = ["add", "subtract", "multiply", "divide"];

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Apply the operation. Results outside the finite `f64` range are rejected.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, DispatchError> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide if b == 0.0 => {
                return Err(DispatchError::invalid_operation("Cannot divide by zero"));
            }
            Self::Divide => a / b,
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(DispatchError::invalid_operation(format!(
                "Result of {} {} {} is out of range",
                a, self, b
            )))
        }
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "multiply" => Ok(Self::Multiply),
            "divide" => Ok(Self::Divide),
            other => Err(DispatchError::internal(format!(
                "unsupported operation reached handler: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Calculator tool - `a <op> b`.
pub struct CalculatorTool;

impl ToolDefinition for CalculatorTool {
    const NAME: &'static str = "calculator";
    const DESCRIPTION: &'static str =
        "Perform basic arithmetic (add, subtract, multiply, divide) on two numbers.";

    fn schema() -> Result<SchemaDescriptor, DispatchError> {
        SchemaDescriptor::builder()
            .required(
                "operation",
                ArgKind::one_of(Operation::NAMES),
                "Operation to perform",
            )
            .required("a", ArgKind::Number, "First operand")
            .required("b", ArgKind::Number, "Second operand")
            .build()
    }
}

#[async_trait]
impl Handler for CalculatorTool {
    #[instrument(skip_all)]
    async fn handle(&self, args: &ArgumentRecord) -> Result<HandlerOutput, DispatchError> {
        let operation: Operation = args.choice("operation")?.parse()?;
        let a = args.number("a")?;
        let b = args.number("b")?;

        let result = operation.apply(a, b)?;
        info!("Calculated {} {} {} = {}", a, operation, b, result);

        Ok(format!(
            "{} {} {} = {}",
            format_number(a),
            operation,
            format_number(b),
            format_number(result)
        )
        .into())
    }
}

/// Print integral values without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
