use super::GuardTrace;

/// Formats guard traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a guard trace into a human-readable explanation.
    pub fn format_trace(trace: &GuardTrace) -> String {
        Self::format_recursive(trace, 0)
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    fn format_recursive(trace: &GuardTrace, parent_precedence: u8) -> String {
        let current_precedence = trace.precedence();
        let needs_parens = current_precedence < parent_precedence;

        let mut result = String::new();
        if needs_parens {
            result.push('(');
        }

        match trace {
            GuardTrace::Binary {
                op_symbol,
                left,
                right,
                ..
            } => {
                let left_str = Self::format_recursive(left, current_precedence);

                // A short-circuited right side is left out; the left side decided the outcome.
                if !matches!(**right, GuardTrace::NotEvaluated) {
                    let right_str = Self::format_recursive(right, current_precedence);
                    result.push_str(&format!("{} {} {}", left_str, op_symbol, right_str));
                } else {
                    result.push_str(&left_str);
                }
            }
            GuardTrace::Unary {
                op_symbol, child, ..
            } => {
                let child_str = Self::format_recursive(child, current_precedence);
                result.push_str(&format!("{} {}", op_symbol, child_str));
            }
            GuardTrace::Leaf {
                subject,
                observed,
                expected,
                ..
            } => match expected {
                Some(expected) => {
                    result.push_str(&format!("{} (was {}) == {}", subject, observed, expected))
                }
                None => result.push_str(&format!("{} (was {})", subject, observed)),
            },
            GuardTrace::Always => result.push_str("always"),
            GuardTrace::NotEvaluated => {}
        }

        if needs_parens {
            result.push(')');
        }
        result
    }
}
