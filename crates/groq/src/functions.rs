// GROQ built-in functions.

use serde_json::Value;

use crate::eval::EvalError;

/// Evaluate a built-in GROQ function by name.
pub fn call_builtin(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    match name {
        "count" => builtin_count(args),
        "defined" => builtin_defined(args),
        "coalesce" => Ok(builtin_coalesce(args)),
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

fn builtin_count(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::Array(arr)) => Ok(Value::Number(arr.len().into())),
        Some(Value::Null) => Ok(Value::Null),
        _ => Err(EvalError::TypeError("count() expects an array".into())),
    }
}

fn builtin_defined(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::Null) | None => Ok(Value::Bool(false)),
        _ => Ok(Value::Bool(true)),
    }
}

fn builtin_coalesce(args: &[Value]) -> Value {
    args.iter()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}
