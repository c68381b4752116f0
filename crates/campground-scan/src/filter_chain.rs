use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::dates::parse_day;
use crate::error::ScanError;

/// A named filter together with its parameters, as written in a task config.
///
/// Parameters are positional (`args`), by keyword (`kwargs`), or both; a
/// keyword wins over the positional argument at the same slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Registered filter name.
    pub name: String,

    /// Positional parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,

    /// Keyword parameters.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub kwargs: Map<String, Value>,
}

impl FilterSpec {
    /// A filter with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            kwargs: Map::new(),
        }
    }

    /// Append a positional parameter.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set a keyword parameter.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// Parameter given by keyword `key`, else at `position`.
    pub fn param(&self, position: usize, key: &str) -> Option<&Value> {
        self.kwargs.get(key).or_else(|| self.args.get(position))
    }

    /// Build an [`ScanError::InvalidFilterParams`] for this filter.
    pub fn invalid(&self, reason: impl Into<String>) -> ScanError {
        ScanError::InvalidFilterParams {
            filter: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Required string parameter.
    pub fn str_param(&self, position: usize, key: &str) -> Result<&str, ScanError> {
        match self.param(position, key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(self.invalid(format!("{} must be a string, got {}", key, other))),
            None => Err(self.invalid(format!("missing {}", key))),
        }
    }

    /// Required numeric parameter. Numeric strings are accepted.
    pub fn f64_param(&self, position: usize, key: &str) -> Result<f64, ScanError> {
        let value = self
            .param(position, key)
            .ok_or_else(|| self.invalid(format!("missing {}", key)))?;

        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        number.ok_or_else(|| self.invalid(format!("{} must be a number, got {}", key, value)))
    }

    /// Optional boolean parameter.
    pub fn bool_param(&self, position: usize, key: &str, default: bool) -> Result<bool, ScanError> {
        match self.param(position, key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.invalid(format!("{} must be a boolean, got {}", key, other))),
        }
    }

    /// Required date parameter, given as `YYYY-MM-DD` or a full timestamp.
    pub fn date_param(&self, position: usize, key: &str) -> Result<NaiveDate, ScanError> {
        let raw = self.str_param(position, key)?;
        parse_day(raw).ok_or_else(|| self.invalid(format!("{} is not a date: {}", key, raw)))
    }

    /// String list taken from keyword `key`, else from every positional
    /// argument. Positional lists are flattened one level.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, ScanError> {
        let values: Vec<&Value> = match self.kwargs.get(key) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(single) => vec![single],
            None => self
                .args
                .iter()
                .flat_map(|arg| match arg {
                    Value::Array(items) => items.iter().collect::<Vec<_>>(),
                    single => vec![single],
                })
                .collect(),
        };

        values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.invalid(format!("{} entries must be strings, got {}", key, other))),
            })
            .collect()
    }
}

/// Signature every registered filter shares: take a collection, return the
/// filtered collection.
pub type FilterFn<T> = fn(T, &FilterSpec) -> Result<T, ScanError>;

/// A collection that can be run through a [`FilterChain`].
pub trait Filterable: Clone {
    /// Collection name used in errors and logs.
    const KIND: &'static str;

    /// Every filter name this collection understands.
    fn registry() -> &'static [(&'static str, FilterFn<Self>)];

    /// Filters appended after the caller's, in order.
    fn default_filters() -> Vec<FilterSpec> {
        Vec::new()
    }
}

/// An ordered list of resolved filters.
///
/// Names are resolved when the chain is built, so an unknown name fails
/// before anything is fetched or filtered.
#[derive(Debug, Clone)]
pub struct FilterChain<T: Filterable> {
    steps: Vec<(FilterSpec, FilterFn<T>)>,
}

impl<T: Filterable + 'static> FilterChain<T> {
    /// Resolve `specs`, then append the collection's default filters.
    pub fn new(specs: &[FilterSpec]) -> Result<Self, ScanError> {
        let mut chain = Self::without_defaults(specs)?;
        for spec in T::default_filters() {
            chain.push(spec)?;
        }
        Ok(chain)
    }

    /// Resolve `specs` only.
    pub fn without_defaults(specs: &[FilterSpec]) -> Result<Self, ScanError> {
        let mut chain = Self { steps: Vec::new() };
        for spec in specs {
            chain.push(spec.clone())?;
        }
        Ok(chain)
    }

    /// Append one more filter.
    pub fn push(&mut self, spec: FilterSpec) -> Result<(), ScanError> {
        let filter = Self::resolve(&spec.name)?;
        self.steps.push((spec, filter));
        Ok(())
    }

    /// Filter names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(spec, _)| spec.name.as_str())
    }

    /// Number of filters in the chain.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no filters.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every filter over a copy of `input`.
    ///
    /// `input` is never touched, so a failing filter leaves nothing half
    /// applied.
    pub fn apply(&self, input: &T) -> Result<T, ScanError> {
        self.steps
            .iter()
            .try_fold(input.clone(), |current, (spec, filter)| {
                debug!("Applying {} filter {}", T::KIND, spec.name);
                filter(current, spec)
            })
    }

    fn resolve(name: &str) -> Result<FilterFn<T>, ScanError> {
        T::registry()
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, filter)| *filter)
            .ok_or_else(|| ScanError::UnknownFilter {
                kind: T::KIND,
                name: name.to_string(),
            })
    }
}
