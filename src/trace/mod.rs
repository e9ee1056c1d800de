mod formatter;

pub use formatter::TraceFormatter;

/// A record of how a guard was evaluated, including the claim values it looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardTrace {
    Binary {
        op_symbol: &'static str,
        left: Box<GuardTrace>,
        right: Box<GuardTrace>,
        outcome: bool,
    },
    Unary {
        op_symbol: &'static str,
        child: Box<GuardTrace>,
        outcome: bool,
    },
    Leaf {
        subject: String,
        observed: String,
        expected: Option<String>,
        outcome: bool,
    },
    Always,
    NotEvaluated,
}

impl GuardTrace {
    pub fn outcome(&self) -> bool {
        match self {
            GuardTrace::Binary { outcome, .. }
            | GuardTrace::Unary { outcome, .. }
            | GuardTrace::Leaf { outcome, .. } => *outcome,
            GuardTrace::Always => true,
            GuardTrace::NotEvaluated => false,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            GuardTrace::Binary { op_symbol, .. } => match *op_symbol {
                "OR" => 1,
                "AND" => 2,
                _ => 0,
            },
            GuardTrace::Unary { .. } => 8,
            GuardTrace::Leaf { .. } | GuardTrace::Always | GuardTrace::NotEvaluated => 9,
        }
    }
}
