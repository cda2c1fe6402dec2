// GROQ in-memory evaluator.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::ast::{Expr, SPREAD};
use crate::functions::call_builtin;

static NULL: Value = Value::Null;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("type error: {0}")]
    TypeError(String),
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("unsupported expression")]
    Unsupported,
}

/// Evaluation scope: the dataset `*` refers to, bound parameters and the
/// current value that bare attribute names resolve against.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    dataset: &'a [Value],
    params: &'a Value,
    this: &'a Value,
}

impl<'a> Scope<'a> {
    pub fn root(dataset: &'a [Value], params: &'a Value) -> Self {
        Self {
            dataset,
            params,
            this: &NULL,
        }
    }

    fn nested<'b>(&self, this: &'b Value) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            dataset: self.dataset,
            params: self.params,
            this,
        }
    }

    fn deref(&self, reference: &Value) -> Value {
        let Some(id) = reference.get("_ref").and_then(Value::as_str) else {
            return Value::Null;
        };
        self.dataset
            .iter()
            .find(|doc| doc.get("_id").and_then(Value::as_str) == Some(id))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// Evaluate a full query against `dataset` with `params` bound as `$name`.
pub fn evaluate(query: &Expr, dataset: &[Value], params: &Value) -> Result<Value, EvalError> {
    eval_expr(query, &Scope::root(dataset, params))
}

fn predicate(expr: &Expr, scope: &Scope<'_>) -> Result<bool, EvalError> {
    Ok(matches!(eval_expr(expr, scope)?, Value::Bool(true)))
}

pub fn eval_expr(expr: &Expr, scope: &Scope<'_>) -> Result<Value, EvalError> {
    match expr {
        Expr::Everything => Ok(Value::Array(scope.dataset.to_vec())),
        Expr::BoolLiteral(b) => Ok(Value::Bool(*b)),
        Expr::IntLiteral(n) => Ok(Value::Number((*n).into())),
        Expr::StringLiteral(s) => Ok(Value::String(s.clone())),
        Expr::Null => Ok(Value::Null),
        Expr::Array(items) => items
            .iter()
            .map(|item| eval_expr(item, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::Object(fields) => project(fields, scope.this, scope),
        Expr::Ident(name) => Ok(scope.this.get(name).cloned().unwrap_or(Value::Null)),
        Expr::DotAccess(base, field) => {
            let value = eval_expr(base, scope)?;
            Ok(value.get(field).cloned().unwrap_or(Value::Null))
        }
        Expr::Deref(base, field) => {
            let target = scope.deref(&eval_expr(base, scope)?);
            Ok(target.get(field).cloned().unwrap_or(Value::Null))
        }
        Expr::Param(name) => Ok(scope.params.get(name).cloned().unwrap_or(Value::Null)),
        Expr::This => Ok(scope.this.clone()),
        Expr::Eq(l, r) => {
            let (lv, rv) = (eval_expr(l, scope)?, eval_expr(r, scope)?);
            Ok(Value::Bool(lv == rv))
        }
        Expr::Neq(l, r) => {
            let (lv, rv) = (eval_expr(l, scope)?, eval_expr(r, scope)?);
            Ok(Value::Bool(lv != rv))
        }
        Expr::In(l, r) => {
            let needle = eval_expr(l, scope)?;
            match eval_expr(r, scope)? {
                Value::Array(items) => Ok(Value::Bool(items.contains(&needle))),
                _ => Ok(Value::Bool(false)),
            }
        }
        Expr::And(l, r) => Ok(Value::Bool(predicate(l, scope)? && predicate(r, scope)?)),
        Expr::Or(l, r) => Ok(Value::Bool(predicate(l, scope)? || predicate(r, scope)?)),
        Expr::Not(inner) => Ok(Value::Bool(!predicate(inner, scope)?)),
        Expr::Pipeline(stages) => {
            let Some((base, rest)) = stages.split_first() else {
                return Ok(Value::Null);
            };
            let mut value = eval_expr(base, scope)?;
            for stage in rest {
                value = apply_stage(stage, value, scope)?;
            }
            Ok(value)
        }
        Expr::FuncCall(name, args) => {
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, scope))
                .collect::<Result<Vec<_>, _>>()?;
            call_builtin(name, &args)
        }
        Expr::Filter(_) | Expr::Projection(_) | Expr::Order(_) | Expr::Index(_) => {
            Err(EvalError::Unsupported)
        }
    }
}

fn apply_stage(stage: &Expr, value: Value, scope: &Scope<'_>) -> Result<Value, EvalError> {
    match stage {
        Expr::Filter(cond) => match value {
            Value::Array(items) => {
                let mut kept = Vec::new();
                for item in items {
                    if predicate(cond, &scope.nested(&item))? {
                        kept.push(item);
                    }
                }
                Ok(Value::Array(kept))
            }
            _ => Ok(Value::Null),
        },
        Expr::Projection(fields) => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| project(fields, item, scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(_) => project(fields, &value, scope),
            _ => Ok(Value::Null),
        },
        Expr::Order(keys) => match value {
            Value::Array(items) => order(items, keys, scope).map(Value::Array),
            _ => Ok(Value::Null),
        },
        Expr::Index(index) => match value {
            Value::Array(items) => Ok(usize::try_from(*index)
                .ok()
                .and_then(|i| items.into_iter().nth(i))
                .unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        },
        _ => Err(EvalError::Unsupported),
    }
}

fn project(fields: &[(String, Expr)], this: &Value, scope: &Scope<'_>) -> Result<Value, EvalError> {
    let inner = scope.nested(this);
    let mut out = Map::new();
    for (name, expr) in fields {
        if name == SPREAD {
            if let Value::Object(source) = eval_expr(expr, &inner)? {
                out.extend(source);
            }
            continue;
        }
        out.insert(name.clone(), eval_expr(expr, &inner)?);
    }
    Ok(Value::Object(out))
}

fn order(items: Vec<Value>, keys: &[(Expr, bool)], scope: &Scope<'_>) -> Result<Vec<Value>, EvalError> {
    let mut keyed = items
        .into_iter()
        .map(|item| -> Result<(Vec<Value>, Value), EvalError> {
            let values = keys
                .iter()
                .map(|(key, _)| eval_expr(key, &scope.nested(&item)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((values, item))
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, ascending), (x, y))| {
                let ord = total_order(x, y);
                if *ascending {
                    ord
                } else {
                    ord.reverse()
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

/// Ordering between two values of the same comparable type.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Ordering used by `order()`: null < bool < number < string < everything else.
fn total_order(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }
    compare(a, b).unwrap_or_else(|| rank(a).cmp(&rank(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;

    fn dataset() -> Vec<Value> {
        vec![
            json!({"_id": "p1", "_type": "post", "title": "Cash runway", "slug": {"current": "cash-runway"}, "publishedAt": "2024-03-01T09:00:00Z", "author": {"_ref": "person-1"}}),
            json!({"_id": "p2", "_type": "post", "title": "Board decks", "slug": {"current": "board-decks"}, "publishedAt": "2024-05-10T09:00:00Z", "author": "Guest"}),
            json!({"_id": "p3", "_type": "post", "title": "Undated", "slug": {"current": "undated"}}),
            json!({"_id": "n1", "_type": "news", "title": "We moved", "slug": {"current": "we-moved"}, "publishedAt": "2024-04-01T09:00:00Z"}),
            json!({"_id": "person-1", "_type": "person", "name": "Dana Reyes"}),
        ]
    }

    fn run(query: &str, params: Value) -> Value {
        let expr = parse(query).unwrap();
        evaluate(&expr, &dataset(), &params).unwrap()
    }

    #[test]
    fn eval_simple_eq() {
        assert_eq!(run(r#"*[_type == "news"][0]._id"#, json!({})), json!("n1"));
    }

    #[test]
    fn eval_dot_access() {
        assert_eq!(
            run(r#"*[author._ref == "person-1"][0].title"#, json!({})),
            json!("Cash runway")
        );
    }

    #[test]
    fn negation_and_inequality() {
        assert_eq!(
            run(r#"*[_type != "post" && !(_type == "person")][0]._id"#, json!({})),
            json!("n1")
        );
    }

    #[test]
    fn filters_and_orders_descending_with_nulls_last() {
        let result = run(
            r#"*[_type == "post"] | order(publishedAt desc) { title }"#,
            json!({}),
        );
        assert_eq!(
            result,
            json!([{"title": "Board decks"}, {"title": "Cash runway"}, {"title": "Undated"}])
        );
    }

    #[test]
    fn first_match_by_slug_param() {
        let result = run(
            r#"*[_type in ["post", "caseStudy", "news"] && slug.current == $slug][0]{ _id, "slug": slug.current }"#,
            json!({"slug": "we-moved"}),
        );
        assert_eq!(result, json!({"_id": "n1", "slug": "we-moved"}));
    }

    #[test]
    fn missing_slug_yields_null() {
        let result = run(
            r#"*[slug.current == $slug][0]"#,
            json!({"slug": "nope"}),
        );
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn dereference_with_coalesce_fallback() {
        let result = run(
            r#"*[_type == "post" && defined(publishedAt)] | order(publishedAt asc) { "author": coalesce(author->name, author) }"#,
            json!({}),
        );
        assert_eq!(result, json!([{"author": "Dana Reyes"}, {"author": "Guest"}]));
    }

    #[test]
    fn object_literal_groups_queries() {
        let result = run(
            r#"{ "posts": count(*[_type == "post"]), "news": *[_type == "news"]{ title } }"#,
            json!({}),
        );
        assert_eq!(result, json!({"posts": 3, "news": [{"title": "We moved"}]}));
    }

    #[test]
    fn spread_then_override() {
        let result = run(r#"*[_id == "n1"][0]{ ..., "title": "Renamed" }"#, json!({}));
        assert_eq!(result["title"], json!("Renamed"));
        assert_eq!(result["_type"], json!("news"));
    }

    #[test]
    fn index_past_the_end_is_null() {
        assert_eq!(run("*[1]._id", json!({})), json!("p2"));
        assert_eq!(run("*[9]", json!({})), Value::Null);
    }
}
