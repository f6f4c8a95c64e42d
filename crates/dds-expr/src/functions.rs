//! Built-in functions.

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Round,
    Floor,
    Ceil,
    Sqrt,
    Min,
    Max,
    Len,
    Upper,
    Lower,
    Trim,
    Concat,
    If,
    Coalesce,
    Number,
    Text,
}

/// Accepted argument counts, inclusive. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    pub fn describe(self) -> String {
        match self.max {
            Some(max) if max == self.min => max.to_string(),
            Some(max) => format!("{} to {max}", self.min),
            None => format!("at least {}", self.min),
        }
    }
}

impl Function {
    pub const ALL: [Function; 16] = [
        Function::Abs,
        Function::Round,
        Function::Floor,
        Function::Ceil,
        Function::Sqrt,
        Function::Min,
        Function::Max,
        Function::Len,
        Function::Upper,
        Function::Lower,
        Function::Trim,
        Function::Concat,
        Function::If,
        Function::Coalesce,
        Function::Number,
        Function::Text,
    ];

    /// Looks up a function by name, case-insensitively.
    pub fn lookup(name: &str) -> Option<Function> {
        Self::ALL
            .into_iter()
            .find(|function| function.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Round => "round",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Sqrt => "sqrt",
            Function::Min => "min",
            Function::Max => "max",
            Function::Len => "len",
            Function::Upper => "upper",
            Function::Lower => "lower",
            Function::Trim => "trim",
            Function::Concat => "concat",
            Function::If => "if",
            Function::Coalesce => "coalesce",
            Function::Number => "number",
            Function::Text => "text",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Function::Round => Arity::between(1, 2),
            Function::Min | Function::Max | Function::Concat | Function::Coalesce => {
                Arity::at_least(1)
            }
            Function::If => Arity::exactly(3),
            _ => Arity::exactly(1),
        }
    }

    /// Applies the function to already evaluated arguments.
    ///
    /// The argument count has been checked at compile time.
    pub fn call(self, args: Vec<Value>) -> Value {
        match self {
            Function::Abs => numeric(&args, f64::abs),
            Function::Floor => numeric(&args, f64::floor),
            Function::Ceil => numeric(&args, f64::ceil),
            Function::Sqrt => numeric(&args, f64::sqrt),
            Function::Round => round(&args),
            Function::Min => fold_numbers(&args, f64::min),
            Function::Max => fold_numbers(&args, f64::max),
            Function::Len => textual(&args, |s| Value::Number(s.chars().count() as f64)),
            Function::Upper => textual(&args, |s| Value::Text(s.to_uppercase())),
            Function::Lower => textual(&args, |s| Value::Text(s.to_lowercase())),
            Function::Trim => textual(&args, |s| Value::Text(s.trim().to_string())),
            Function::Concat => Value::Text(args.iter().map(Value::as_text).collect()),
            Function::If => {
                let mut args = args.into_iter();
                let condition = args.next().unwrap_or_default();
                let then = args.next().unwrap_or_default();
                let otherwise = args.next().unwrap_or_default();
                if condition.is_truthy() {
                    then
                } else {
                    otherwise
                }
            }
            Function::Coalesce => args
                .into_iter()
                .find(|value| !value.is_null())
                .unwrap_or_default(),
            Function::Number => first(&args)
                .as_number()
                .map_or(Value::Null, Value::Number),
            Function::Text => match first(&args) {
                Value::Null => Value::Null,
                value => Value::Text(value.as_text()),
            },
        }
    }
}

fn first(args: &[Value]) -> &Value {
    static NULL: Value = Value::Null;
    args.first().unwrap_or(&NULL)
}

fn numeric(args: &[Value], op: fn(f64) -> f64) -> Value {
    first(args)
        .as_number()
        .map_or(Value::Null, |value| Value::number(op(value)))
}

fn textual(args: &[Value], op: impl FnOnce(&str) -> Value) -> Value {
    match first(args) {
        Value::Null => Value::Null,
        value => op(&value.as_text()),
    }
}

/// Rounds half away from zero to `digits` decimal places (default 0).
fn round(args: &[Value]) -> Value {
    let Some(value) = first(args).as_number() else {
        return Value::Null;
    };
    let digits = match args.get(1) {
        None => 0,
        Some(arg) => match arg.as_number() {
            Some(d) => d.trunc().clamp(-15.0, 15.0) as i32,
            None => return Value::Null,
        },
    };
    let factor = 10f64.powi(digits);
    Value::number((value * factor).round() / factor)
}

/// Folds the numeric arguments; arguments that are not numbers are skipped.
fn fold_numbers(args: &[Value], op: fn(f64, f64) -> f64) -> Value {
    args.iter()
        .filter_map(Value::as_number)
        .reduce(op)
        .map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: f64) -> Value {
        Value::Number(value)
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Function::lookup("ROUND"), Some(Function::Round));
        assert_eq!(Function::lookup("Coalesce"), Some(Function::Coalesce));
        assert_eq!(Function::lookup("eval"), None);
    }

    #[test]
    fn test_arity() {
        assert!(Function::Round.arity().accepts(2));
        assert!(!Function::Round.arity().accepts(3));
        assert!(Function::Max.arity().accepts(7));
        assert!(!Function::Max.arity().accepts(0));
        assert_eq!(Function::If.arity().describe(), "3");
        assert_eq!(Function::Round.arity().describe(), "1 to 2");
        assert_eq!(Function::Concat.arity().describe(), "at least 1");
    }

    #[test]
    fn test_numeric_functions() {
        assert_eq!(Function::Abs.call(vec![num(-2.5)]), num(2.5));
        assert_eq!(Function::Sqrt.call(vec![num(-1.0)]), Value::Null);
        assert_eq!(Function::Floor.call(vec![text("2,7")]), num(2.0));
        assert_eq!(Function::Round.call(vec![num(2.5)]), num(3.0));
        assert_eq!(Function::Round.call(vec![num(-2.5)]), num(-3.0));
        assert_eq!(Function::Round.call(vec![num(3.14159), num(2.0)]), num(3.14));
        assert_eq!(Function::Round.call(vec![num(1234.0), num(-2.0)]), num(1200.0));
        assert_eq!(Function::Ceil.call(vec![Value::Null]), Value::Null);
    }

    #[test]
    fn test_min_max_skip_non_numbers() {
        assert_eq!(
            Function::Max.call(vec![num(1.0), text("x"), Value::Null, text("7")]),
            num(7.0)
        );
        assert_eq!(Function::Min.call(vec![num(1.0), num(-4.0)]), num(-4.0));
        assert_eq!(Function::Min.call(vec![Value::Null]), Value::Null);
    }

    #[test]
    fn test_text_functions() {
        assert_eq!(Function::Len.call(vec![text("héllo")]), num(5.0));
        assert_eq!(Function::Upper.call(vec![text("abc")]), text("ABC"));
        assert_eq!(Function::Trim.call(vec![text("  a ")]), text("a"));
        assert_eq!(Function::Lower.call(vec![Value::Null]), Value::Null);
        assert_eq!(
            Function::Concat.call(vec![text("a"), Value::Null, num(2.0)]),
            text("a2")
        );
        assert_eq!(Function::Text.call(vec![num(1.5)]), text("1.5"));
        assert_eq!(Function::Number.call(vec![text("1 200")]), num(1200.0));
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(
            Function::If.call(vec![Value::Bool(false), text("a"), text("b")]),
            text("b")
        );
        assert_eq!(
            Function::Coalesce.call(vec![Value::Null, num(0.0), num(1.0)]),
            num(0.0)
        );
        assert_eq!(Function::Coalesce.call(vec![Value::Null]), Value::Null);
    }
}
