use std::cmp::Ordering;
use std::fmt;

/// A single field value as the engine sees it.
///
/// Rows hand out `Value`s through [`crate::engine::Row::field`]. The display form
/// (`to_string()`) is what a plain cell shows and what the search matches against.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    // Kinds that never compare by content order against each other.
    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
            Value::Null => 3,
        }
    }

    /// Total order used for sorting.
    ///
    /// Numbers compare numerically, text case-insensitively with digit runs compared
    /// by magnitude ("User 2" < "User 10"). Across kinds: Bool < Number < Text < Null.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => natural_cmp(a, b),
            (Value::Float(a), Value::Float(b)) => float_cmp(*a, *b),
            (Value::Int(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Int(b)) => int_float_cmp(*b, *a).reverse(),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

// -0.0 equals 0.0 so that both stay equal to Int(0). NaN keeps its total_cmp place.
fn float_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

const I64_UPPER: f64 = 9_223_372_036_854_775_808.0; // 2^63

/// Exact comparison of an integer with a float, no rounding through `f64`.
fn int_float_cmp(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_UPPER {
        return Ordering::Less;
    }
    if f < -I64_UPPER {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal),
        o => o,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Case-insensitive comparison that orders embedded numbers by magnitude.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                let ord = cmp_digit_runs(&na, &nb);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(2900).to_string(), "2900");
        assert_eq!(Value::Float(100.0).to_string(), "100");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("Ava Patel").to_string(), "Ava Patel");
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn natural_order_of_text() {
        assert_eq!(natural_cmp("User 2", "User 10"), Ordering::Less);
        assert_eq!(natural_cmp("user 2", "User 2"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "abd"), Ordering::Less);
        assert_eq!(natural_cmp("ab", "abc"), Ordering::Less);
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Equal);
    }

    #[test]
    fn cross_kind_ranking() {
        assert_eq!(Value::Int(5).sort_cmp(&Value::Float(4.5)), Ordering::Greater);
        assert_eq!(Value::Int(5).sort_cmp(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from("z").sort_cmp(&Value::Null), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&Value::Null), Ordering::Equal);
        assert_eq!(Value::Bool(true).sort_cmp(&Value::Int(0)), Ordering::Less);
    }

    #[test]
    fn mixed_numbers_compare_exactly() {
        let big = 1i64 << 53;
        let a = Value::Int(big);
        let b = Value::Float(big as f64);
        let c = Value::Int(big + 1);
        assert_eq!(a.sort_cmp(&b), Ordering::Equal);
        assert_eq!(b.sort_cmp(&c), Ordering::Less);
        assert_eq!(c.sort_cmp(&b), Ordering::Greater);
        assert_eq!(a.sort_cmp(&c), Ordering::Less);

        assert_eq!(Value::Int(-2).sort_cmp(&Value::Float(-2.5)), Ordering::Greater);
        assert_eq!(Value::Int(0).sort_cmp(&Value::Float(-0.0)), Ordering::Equal);
        assert_eq!(Value::Float(-0.0).sort_cmp(&Value::Float(0.0)), Ordering::Equal);
        assert_eq!(Value::Int(i64::MAX).sort_cmp(&Value::Float(9.3e18)), Ordering::Less);
        assert_eq!(Value::Int(i64::MIN).sort_cmp(&Value::Float(f64::NEG_INFINITY)), Ordering::Greater);
        assert_eq!(Value::Int(1).sort_cmp(&Value::Float(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn sorting_mixed_numbers_is_consistent() {
        let big = 1i64 << 53;
        let mut values = vec![
            Value::Int(big + 1),
            Value::Float(big as f64),
            Value::Int(big),
            Value::Float(0.5),
            Value::Int(-3),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            values,
            vec![
                Value::Int(-3),
                Value::Float(0.5),
                Value::Float(big as f64),
                Value::Int(big),
                Value::Int(big + 1),
            ]
        );
    }
}
