//! Models (variable assignments) and term evaluation

use crate::error::EvalError;
use crate::logic::{FunctionId, Interner, TermId, TermNode, TermStore, VariableId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value of a variable or term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn as_int(self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n),
            Value::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            Value::Int(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// An assignment of values to variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: IndexMap<VariableId, Value>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of `var`, returning its previous value
    pub fn assign(&mut self, var: VariableId, value: Value) -> Option<Value> {
        self.values.insert(var, value)
    }

    pub fn get(&self, var: VariableId) -> Option<Value> {
        self.values.get(&var).copied()
    }

    pub fn remove(&mut self, var: VariableId) -> Option<Value> {
        self.values.shift_remove(&var)
    }

    pub fn contains(&self, var: VariableId) -> bool {
        self.values.contains_key(&var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, Value)> + '_ {
        self.values.iter().map(|(v, val)| (*v, *val))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> ModelDisplay<'a> {
        ModelDisplay {
            model: self,
            interner,
        }
    }
}

impl FromIterator<(VariableId, Value)> for Model {
    fn from_iter<I: IntoIterator<Item = (VariableId, Value)>>(iter: I) -> Self {
        Model {
            values: iter.into_iter().collect(),
        }
    }
}

pub struct ModelDisplay<'a> {
    model: &'a Model,
    interner: &'a Interner,
}

impl<'a> fmt::Display for ModelDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.model.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", self.interner.resolve_variable(var), value)?;
        }
        write!(f, "}}")
    }
}

/// Sort expected at a position, used to pick completion defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sort {
    Int,
    Bool,
}

impl Sort {
    fn default_value(self) -> Value {
        match self {
            Sort::Int => Value::Int(0),
            Sort::Bool => Value::Bool(false),
        }
    }

    fn of(value: Value) -> Sort {
        match value {
            Value::Int(_) => Sort::Int,
            Value::Bool(_) => Sort::Bool,
        }
    }
}

/// Pending work for the evaluator's explicit stack
enum Step {
    Visit(TermId, Sort),
    /// Arguments are on the value stack; apply the function
    Apply(TermId, FunctionId, usize),
    /// The condition is on the value stack; pick a branch
    Branch(TermId, TermId, TermId, Sort),
    /// The branch value is on top of the value stack
    Memo(TermId),
}

/// Evaluates terms under a model.
///
/// Understands integer arithmetic (`+ - * div mod abs`), comparisons
/// (`= distinct < <= > >=`) and boolean connectives
/// (`and or not => xor ite`). Any other function symbol is uninterpreted.
///
/// With completion enabled an unassigned variable gets the default of the
/// sort its position expects: `false` under connectives and `ite`
/// conditions, `0` elsewhere. Arguments of `=` and `distinct` follow the
/// sort of their siblings.
pub struct Evaluator<'a> {
    store: &'a TermStore,
    interner: &'a Interner,
    completion: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(store: &'a TermStore, interner: &'a Interner) -> Self {
        Evaluator {
            store,
            interner,
            completion: false,
        }
    }

    pub fn with_completion(mut self, completion: bool) -> Self {
        self.completion = completion;
        self
    }

    /// Evaluate `term`. With completion enabled, defaults chosen for
    /// unassigned variables are recorded in `model`.
    ///
    /// Only the selected branch of an `ite` is evaluated.
    pub fn eval(&self, model: &mut Model, term: TermId) -> Result<Value, EvalError> {
        let mut cache: HashMap<TermId, Value> = HashMap::new();
        let mut values: Vec<Value> = Vec::new();
        // A bare variable at the root has no context; integers are the default.
        let mut stack = vec![Step::Visit(term, Sort::Int)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(t, sort) => {
                    if let Some(&v) = cache.get(&t) {
                        values.push(v);
                        continue;
                    }
                    match self.store.node(t) {
                        TermNode::Int(n) => values.push(Value::Int(*n)),
                        TermNode::Bool(b) => values.push(Value::Bool(*b)),
                        TermNode::Var(v) => {
                            let value = self.lookup(model, *v, sort)?;
                            cache.insert(t, value);
                            values.push(value);
                        }
                        TermNode::App(func, args) => {
                            let op = self.interner.resolve_function(*func);
                            if op == "ite" {
                                let [cond, then, otherwise] = args.as_slice() else {
                                    return Err(arity(op, 3, args.len()));
                                };
                                stack.push(Step::Branch(t, *then, *otherwise, sort));
                                stack.push(Step::Visit(*cond, Sort::Bool));
                                continue;
                            }
                            let arg_sort = self.argument_sort(model, op, args);
                            stack.push(Step::Apply(t, *func, args.len()));
                            for &arg in args.iter().rev() {
                                stack.push(Step::Visit(arg, arg_sort));
                            }
                        }
                    }
                }
                Step::Apply(t, func, n) => {
                    let args = values.split_off(values.len() - n);
                    let value = self.apply(func, &args)?;
                    cache.insert(t, value);
                    values.push(value);
                }
                Step::Branch(t, then, otherwise, sort) => {
                    let cond = values.pop().and_then(Value::as_bool);
                    let branch = match cond {
                        Some(true) => then,
                        Some(false) => otherwise,
                        None => return Err(mismatch("ite", "boolean")),
                    };
                    stack.push(Step::Memo(t));
                    stack.push(Step::Visit(branch, sort));
                }
                Step::Memo(t) => {
                    if let Some(&v) = values.last() {
                        cache.insert(t, v);
                    }
                }
            }
        }

        values.pop().ok_or_else(|| arity("eval", 1, 0))
    }

    fn lookup(&self, model: &mut Model, var: VariableId, sort: Sort) -> Result<Value, EvalError> {
        match model.get(var) {
            Some(value) => Ok(value),
            None if self.completion => {
                let value = sort.default_value();
                model.assign(var, value);
                Ok(value)
            }
            None => Err(EvalError::Unassigned(
                self.interner.resolve_variable(var).to_string(),
            )),
        }
    }

    fn argument_sort(&self, model: &Model, op: &str, args: &[TermId]) -> Sort {
        match op {
            "and" | "or" | "not" | "=>" | "xor" => Sort::Bool,
            "=" | "distinct" => args
                .iter()
                .find_map(|&a| self.sort_hint(model, a))
                .unwrap_or(Sort::Int),
            _ => Sort::Int,
        }
    }

    /// Sort of `term` when it can be read off its top node
    fn sort_hint(&self, model: &Model, term: TermId) -> Option<Sort> {
        match self.store.node(term) {
            TermNode::Int(_) => Some(Sort::Int),
            TermNode::Bool(_) => Some(Sort::Bool),
            TermNode::Var(v) => model.get(*v).map(Sort::of),
            TermNode::App(func, _) => match self.interner.resolve_function(*func) {
                "+" | "-" | "*" | "div" | "mod" | "abs" => Some(Sort::Int),
                "ite" => None,
                "and" | "or" | "not" | "=>" | "xor" | "=" | "distinct" | "<" | "<=" | ">"
                | ">=" => Some(Sort::Bool),
                _ => None,
            },
        }
    }

    fn apply(&self, func: FunctionId, values: &[Value]) -> Result<Value, EvalError> {
        let op = self.interner.resolve_function(func);
        match op {
            "+" => fold_ints(op, values, 0, i64::checked_add),
            "*" => fold_ints(op, values, 1, i64::checked_mul),
            "-" => match values {
                [x] => {
                    let x = int(op, *x)?;
                    x.checked_neg().map(Value::Int).ok_or_else(|| overflow(op))
                }
                [first, rest @ ..] if !rest.is_empty() => {
                    let mut acc = int(op, *first)?;
                    for v in rest {
                        acc = acc.checked_sub(int(op, *v)?).ok_or_else(|| overflow(op))?;
                    }
                    Ok(Value::Int(acc))
                }
                _ => Err(arity(op, 2, values.len())),
            },
            "div" | "mod" => {
                let [a, b] = values else {
                    return Err(arity(op, 2, values.len()));
                };
                let (a, b) = (int(op, *a)?, int(op, *b)?);
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                let r = if op == "div" {
                    a.checked_div_euclid(b)
                } else {
                    a.checked_rem_euclid(b)
                };
                r.map(Value::Int).ok_or_else(|| overflow(op))
            }
            "abs" => {
                let [a] = values else {
                    return Err(arity(op, 1, values.len()));
                };
                int(op, *a)?.checked_abs().map(Value::Int).ok_or_else(|| overflow(op))
            }
            "<" | "<=" | ">" | ">=" => {
                let [a, b] = values else {
                    return Err(arity(op, 2, values.len()));
                };
                let (a, b) = (int(op, *a)?, int(op, *b)?);
                Ok(Value::Bool(match op {
                    "<" => a < b,
                    "<=" => a <= b,
                    ">" => a > b,
                    _ => a >= b,
                }))
            }
            "=" => {
                if values.len() < 2 {
                    return Err(arity(op, 2, values.len()));
                }
                same_sort(op, values)?;
                Ok(Value::Bool(values.windows(2).all(|w| w[0] == w[1])))
            }
            "distinct" => {
                if values.len() < 2 {
                    return Err(arity(op, 2, values.len()));
                }
                same_sort(op, values)?;
                let all_distinct = values
                    .iter()
                    .enumerate()
                    .all(|(i, a)| values[i + 1..].iter().all(|b| a != b));
                Ok(Value::Bool(all_distinct))
            }
            "and" => {
                let mut acc = true;
                for v in values {
                    acc &= boolean(op, *v)?;
                }
                Ok(Value::Bool(acc))
            }
            "or" => {
                let mut acc = false;
                for v in values {
                    acc |= boolean(op, *v)?;
                }
                Ok(Value::Bool(acc))
            }
            "not" => {
                let [a] = values else {
                    return Err(arity(op, 1, values.len()));
                };
                Ok(Value::Bool(!boolean(op, *a)?))
            }
            "=>" | "xor" => {
                let [a, b] = values else {
                    return Err(arity(op, 2, values.len()));
                };
                let (a, b) = (boolean(op, *a)?, boolean(op, *b)?);
                Ok(Value::Bool(if op == "=>" { !a || b } else { a != b }))
            }
            _ => Err(EvalError::Uninterpreted(op.to_string())),
        }
    }
}

fn int(op: &str, v: Value) -> Result<i64, EvalError> {
    v.as_int().ok_or_else(|| mismatch(op, "integer"))
}

fn boolean(op: &str, v: Value) -> Result<bool, EvalError> {
    v.as_bool().ok_or_else(|| mismatch(op, "boolean"))
}

fn fold_ints(
    op: &str,
    values: &[Value],
    unit: i64,
    step: fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    let mut acc = unit;
    for v in values {
        acc = step(acc, int(op, *v)?).ok_or_else(|| overflow(op))?;
    }
    Ok(Value::Int(acc))
}

fn same_sort(op: &str, values: &[Value]) -> Result<(), EvalError> {
    let ints = values.iter().filter(|v| v.as_int().is_some()).count();
    if ints == 0 || ints == values.len() {
        Ok(())
    } else {
        Err(mismatch(op, "same-sort"))
    }
}

fn arity(op: &str, expected: usize, got: usize) -> EvalError {
    EvalError::Arity {
        op: op.to_string(),
        expected,
        got,
    }
}

fn mismatch(op: &str, expected: &'static str) -> EvalError {
    EvalError::SortMismatch {
        op: op.to_string(),
        expected,
    }
}

fn overflow(op: &str) -> EvalError {
    EvalError::Overflow(op.to_string())
}
