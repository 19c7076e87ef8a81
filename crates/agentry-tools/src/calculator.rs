//! Calculator Tool
//!
//! Evaluates arithmetic expressions with `+ - * / ^`, parentheses, and
//! unary minus.

use async_trait::async_trait;

use agentry_core::error::{AgentError, Result};
use agentry_core::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

/// Calculator tool - evaluates mathematical expressions
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculate".into(),
            description: "Evaluate a mathematical expression".into(),
            parameters: vec![ParameterSchema {
                name: "expression".into(),
                param_type: "string".into(),
                description: "Mathematical expression to evaluate (e.g., '2 + 2', '10 * 5')"
                    .into(),
                required: true,
                default: None,
                enum_values: None,
            }],
            category: Some("math".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let expr = call
            .arguments
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing expression".into()))?;

        match evaluate_expression(expr) {
            Ok(result) => Ok(
                ToolResult::success("calculate", format!("{} = {}", expr, result))
                    .with_data(serde_json::json!(result)),
            ),
            Err(e) => Ok(ToolResult::failure("calculate", e)),
        }
    }
}

/// Simple recursive expression evaluator
fn evaluate_expression(expr: &str) -> std::result::Result<f64, String> {
    let expr = expr.replace(' ', "");
    if expr.is_empty() {
        return Err("Empty expression".into());
    }

    // Handle parentheses recursively
    if let Some(start) = expr.rfind('(') {
        if let Some(end) = expr[start..].find(')') {
            let inner = &expr[start + 1..start + end];
            let inner_result = evaluate_expression(inner)?;
            let new_expr = format!(
                "{}{}{}",
                &expr[..start],
                inner_result,
                &expr[start + end + 1..]
            );
            return evaluate_expression(&new_expr);
        }
        return Err("Unbalanced parentheses".into());
    }

    // Addition/subtraction (lowest precedence, evaluated last)
    for (i, c) in expr.char_indices().rev() {
        if i > 0 && (c == '+' || c == '-') {
            // Make sure it's not a unary minus
            let prev_char = expr[..i].chars().next_back().unwrap_or(' ');
            if prev_char.is_ascii_digit() || prev_char == ')' || prev_char == '.' {
                let left = evaluate_expression(&expr[..i])?;
                let right = evaluate_expression(&expr[i + 1..])?;
                return Ok(if c == '+' { left + right } else { left - right });
            }
        }
    }

    // Multiplication/division
    for (i, c) in expr.char_indices().rev() {
        if c == '*' || c == '/' {
            let left = evaluate_expression(&expr[..i])?;
            let right = evaluate_expression(&expr[i + 1..])?;
            if c == '/' && right == 0.0 {
                return Err("Division by zero".into());
            }
            return Ok(if c == '*' { left * right } else { left / right });
        }
    }

    // Power
    if let Some(i) = expr.find('^') {
        let left = evaluate_expression(&expr[..i])?;
        let right = evaluate_expression(&expr[i + 1..])?;
        return Ok(left.powf(right));
    }

    // Parse number
    expr.parse::<f64>().map_err(|e| format!("Parse error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_arithmetic() {
        assert!((evaluate_expression("2 + 2").unwrap() - 4.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("10 * 5").unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("(2 + 3) * 4").unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("2 ^ 8").unwrap() - 256.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unary_minus() {
        assert!((evaluate_expression("-4 + 6").unwrap() - 2.0).abs() < f64::EPSILON);
        assert!((evaluate_expression("3 * -2").unwrap() + 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(evaluate_expression("1 / 0").is_err());
    }

    #[test]
    fn test_garbage_input() {
        assert!(evaluate_expression("two plus two").is_err());
        assert!(evaluate_expression("").is_err());
    }

    #[tokio::test]
    async fn test_tool_contract() {
        let call = ToolCall::new(
            "calculate",
            [("expression".to_string(), json!("6 * 7"))],
        );
        let result = CalculatorTool.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "6 * 7 = 42");
        assert_eq!(result.data, Some(json!(42.0)));
    }

    #[tokio::test]
    async fn test_failure_is_a_domain_result() {
        let call = ToolCall::new(
            "calculate",
            [("expression".to_string(), json!("1 / 0"))],
        );
        let result = CalculatorTool.execute(&call).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "Division by zero");
    }
}
