//! Reducers: condense the mapped values of one field into its output value.
//!
//! Every built-in reducer drops blank values before computing its result.
//! An empty input yields `null` (or an empty array for `unique`).

use anyhow::Result;
use recnorm_model::params::{AnyMatchParams, NoParams, UniqueParams};
use recnorm_model::{Params, compare_values, display_string, strict_equals};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::mappers::not_blank;

/// A function condensing a sequence of values into one value.
pub trait Reducer: Send + Sync + 'static {
    type Params: DeserializeOwned + Send + Sync + 'static;

    fn reduce(&self, values: Vec<Value>, params: &Self::Params) -> Result<Value>;
}

/// A reducer with its parameters bound.
pub type PreparedReducer<'a> = Box<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'a>;

/// Object-safe view of a [`Reducer`] stored in the registry.
pub trait ReducerEntry: Send + Sync {
    fn prepare(&self, params: Params) -> Result<PreparedReducer<'_>, serde_json::Error>;
}

impl<R: Reducer> ReducerEntry for R {
    fn prepare(&self, params: Params) -> Result<PreparedReducer<'_>, serde_json::Error> {
        let params: R::Params = serde_json::from_value(Value::Object(params))?;
        Ok(Box::new(move |values: Vec<Value>| self.reduce(values, &params)))
    }
}

fn sorted(mut values: Vec<Value>) -> Vec<Value> {
    values.sort_by(compare_values);
    values
}

/// Distinct non-blank values, sorted ascending.
pub fn unique_values(values: Vec<Value>) -> Vec<Value> {
    let mut distinct: Vec<Value> = Vec::new();
    for value in not_blank(values) {
        if !distinct.iter().any(|seen| strict_equals(seen, &value)) {
            distinct.push(value);
        }
    }
    sorted(distinct)
}

/// The first non-blank value.
pub struct First;

impl Reducer for First {
    type Params = NoParams;

    fn reduce(&self, values: Vec<Value>, _params: &NoParams) -> Result<Value> {
        Ok(not_blank(values).into_iter().next().unwrap_or(Value::Null))
    }
}

/// The greatest non-blank value.
pub struct Highest;

impl Reducer for Highest {
    type Params = NoParams;

    fn reduce(&self, values: Vec<Value>, _params: &NoParams) -> Result<Value> {
        Ok(sorted(not_blank(values)).pop().unwrap_or(Value::Null))
    }
}

/// The smallest non-blank value.
pub struct Lowest;

impl Reducer for Lowest {
    type Params = NoParams;

    fn reduce(&self, values: Vec<Value>, _params: &NoParams) -> Result<Value> {
        Ok(sorted(not_blank(values))
            .into_iter()
            .next()
            .unwrap_or(Value::Null))
    }
}

/// Sorted distinct values, as an array or joined into one string.
///
/// An empty `join` separator is treated as absent.
pub struct Unique;

impl Reducer for Unique {
    type Params = UniqueParams;

    fn reduce(&self, values: Vec<Value>, params: &UniqueParams) -> Result<Value> {
        let distinct = unique_values(values);
        Ok(match params.join.as_deref() {
            Some(separator) if !separator.is_empty() => Value::String(
                distinct
                    .iter()
                    .map(display_string)
                    .collect::<Vec<_>>()
                    .join(separator),
            ),
            _ => Value::Array(distinct),
        })
    }
}

/// `match` if any non-blank value matches `pattern`, otherwise `nonMatch`.
pub struct AnyMatch;

impl Reducer for AnyMatch {
    type Params = AnyMatchParams;

    fn reduce(&self, values: Vec<Value>, params: &AnyMatchParams) -> Result<Value> {
        let any = not_blank(values)
            .iter()
            .any(|value| params.pattern.is_match(&display_string(value)));
        Ok(if any {
            params.matched.clone()
        } else {
            params.non_match.clone()
        })
    }
}

/// Adapts a closure over raw parameters to the [`Reducer`] trait.
pub struct FnReducer<F>(pub F);

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Vec<Value>, &Params) -> Result<Value> + Send + Sync + 'static,
{
    type Params = Params;

    fn reduce(&self, values: Vec<Value>, params: &Params) -> Result<Value> {
        (self.0)(values, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_params() -> Params {
        Params::new()
    }

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    fn yes_no() -> Params {
        params(json!({"pattern": "Y|y", "match": "Y", "nonMatch": "N"}))
    }

    #[test]
    fn any_match() {
        let reducer = AnyMatch.prepare(yes_no()).unwrap();
        assert_eq!(reducer(vec![json!("y"), json!("n")]).unwrap(), json!("Y"));
        assert_eq!(reducer(vec![json!("a"), json!("n")]).unwrap(), json!("N"));
        assert_eq!(reducer(Vec::new()).unwrap(), json!("N"));
    }

    #[test]
    fn any_match_ignores_blanks() {
        let reducer = AnyMatch
            .prepare(params(json!({"pattern": "^\\s*$", "match": true, "nonMatch": false})))
            .unwrap();
        assert_eq!(reducer(vec![json!("  "), json!("")]).unwrap(), json!(false));
    }

    #[test]
    fn first() {
        let reducer = First.prepare(no_params()).unwrap();
        assert_eq!(reducer(vec![json!("y"), json!("n")]).unwrap(), json!("y"));
        assert_eq!(reducer(vec![json!(" "), json!("n")]).unwrap(), json!("n"));
        assert_eq!(reducer(Vec::new()).unwrap(), Value::Null);
    }

    #[test]
    fn highest_and_lowest() {
        let highest = Highest.prepare(no_params()).unwrap();
        let lowest = Lowest.prepare(no_params()).unwrap();
        assert_eq!(highest(vec![json!(1), json!(3), json!(2)]).unwrap(), json!(3));
        assert_eq!(lowest(vec![json!(2), json!(1), json!(3)]).unwrap(), json!(1));
        assert_eq!(highest(Vec::new()).unwrap(), Value::Null);
        assert_eq!(lowest(Vec::new()).unwrap(), Value::Null);
    }

    #[test]
    fn highest_skips_blanks_regardless_of_input_length() {
        let highest = Highest.prepare(no_params()).unwrap();
        let values = vec![json!("b"), json!(""), json!(null), json!("a")];
        assert_eq!(highest(values).unwrap(), json!("b"));
    }

    #[test]
    fn numbers_sort_by_string_form() {
        let values = || vec![json!(9), json!(10), json!(100)];
        let highest = Highest.prepare(no_params()).unwrap();
        let lowest = Lowest.prepare(no_params()).unwrap();
        let unique = Unique.prepare(no_params()).unwrap();
        assert_eq!(highest(values()).unwrap(), json!(9));
        assert_eq!(lowest(values()).unwrap(), json!(10));
        assert_eq!(unique(values()).unwrap(), json!([10, 100, 9]));
    }

    #[test]
    fn unique_array() {
        let reducer = Unique.prepare(no_params()).unwrap();
        let value = reducer(vec![json!(1), json!(2), json!(2), json!(3)]).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
        assert_eq!(reducer(Vec::new()).unwrap(), json!([]));
    }

    #[test]
    fn unique_sorts_and_joins() {
        let reducer = Unique.prepare(params(json!({"join": ","}))).unwrap();
        let value = reducer(vec![json!("test2"), json!("test1"), json!("test2")]).unwrap();
        assert_eq!(value, json!("test1,test2"));
        assert_eq!(reducer(Vec::new()).unwrap(), json!(""));
    }

    #[test]
    fn unique_empty_join_returns_array() {
        let reducer = Unique.prepare(params(json!({"join": ""}))).unwrap();
        assert_eq!(reducer(vec![json!("b"), json!("a")]).unwrap(), json!(["a", "b"]));
    }
}
