//! The `math` library: common mathematical operations.

use reed_eval::{NativeModule, RuntimeError, Value};

use crate::args::{expect_len, number_arg};

pub fn module() -> NativeModule {
    vec![
        ("sin", sin),
        ("asin", asin),
        ("cos", cos),
        ("acos", acos),
        ("tan", tan),
        ("atan", atan),
        ("floor", floor),
        ("ceil", ceil),
        ("abs", abs),
        ("ln", ln),
        ("log10", log10),
        ("sqrt", sqrt),
        ("max", max),
        ("min", min),
        ("rad", rad),
        ("deg", deg),
        ("random", random),
    ]
}

/// Shared body of the single-argument wrappers.
fn unary(name: &str, args: &[Value], f: fn(f64) -> f64) -> Result<Value, RuntimeError> {
    expect_len(name, args, 1)?;
    Ok(Value::Number(f(number_arg(name, args, 0)?)))
}

fn sin(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("sin", args, f64::sin)
}

fn asin(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("asin", args, f64::asin)
}

fn cos(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("cos", args, f64::cos)
}

fn acos(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("acos", args, f64::acos)
}

fn tan(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("tan", args, f64::tan)
}

fn atan(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("atan", args, f64::atan)
}

fn floor(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("floor", args, f64::floor)
}

fn ceil(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("ceil", args, f64::ceil)
}

fn abs(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("abs", args, f64::abs)
}

fn ln(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("ln", args, f64::ln)
}

fn log10(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("log10", args, f64::log10)
}

fn sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    unary("sqrt", args, f64::sqrt)
}

fn max(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("max", args, 2)?;
    let a = number_arg("max", args, 0)?;
    let b = number_arg("max", args, 1)?;
    Ok(Value::Number(a.max(b)))
}

fn min(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("min", args, 2)?;
    let a = number_arg("min", args, 0)?;
    let b = number_arg("min", args, 1)?;
    Ok(Value::Number(a.min(b)))
}

/// Degrees to radians.
fn rad(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("rad", args, 1)?;
    let degrees = number_arg("rad", args, 0)?;
    Ok(Value::Number(degrees.to_radians()))
}

/// Radians to degrees.
fn deg(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("deg", args, 1)?;
    let radians = number_arg("deg", args, 0)?;
    Ok(Value::Number(radians.to_degrees()))
}

/// A random number in `[0, 1)`.
fn random(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_len("random", args, 0)?;
    Ok(Value::Number(rand::random::<f64>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    #[test]
    fn unary_functions() {
        assert_eq!(sin(&[n(0.0)]).unwrap(), n(0.0));
        assert_eq!(floor(&[n(2.7)]).unwrap(), n(2.0));
        assert_eq!(ceil(&[n(2.1)]).unwrap(), n(3.0));
        assert_eq!(abs(&[n(-4.0)]).unwrap(), n(4.0));
        assert_eq!(sqrt(&[n(9.0)]).unwrap(), n(3.0));
        assert_eq!(log10(&[n(1000.0)]).unwrap(), n(3.0));
    }

    #[test]
    fn binary_functions() {
        assert_eq!(max(&[n(1.0), n(2.0)]).unwrap(), n(2.0));
        assert_eq!(min(&[n(1.0), n(2.0)]).unwrap(), n(1.0));
    }

    #[test]
    fn angle_conversions_round_trip() {
        let Value::Number(radians) = rad(&[n(180.0)]).unwrap() else {
            panic!("expected number");
        };
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);

        let Value::Number(degrees) = deg(&[n(std::f64::consts::PI)]).unwrap() else {
            panic!("expected number");
        };
        assert!((degrees - 180.0).abs() < 1e-12);
    }

    #[test]
    fn random_stays_in_unit_interval() {
        for _ in 0..100 {
            let Value::Number(value) = random(&[]).unwrap() else {
                panic!("expected number");
            };
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn arguments_are_validated() {
        assert!(sin(&[]).is_err());
        assert!(sin(&[Value::Str("x".into())]).is_err());
        assert!(max(&[n(1.0)]).is_err());
        assert!(random(&[n(1.0)]).is_err());
    }
}
