use calcora::{eval_source, get_result, interpreter::value::core::Value};
use pretty_assertions::assert_eq;

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src, false).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn eval_value(src: &str) -> Value {
    eval_source(src).unwrap_or_else(|e| panic!("Script failed: {e}"))
                    .unwrap_or_else(|| panic!("Script produced no value: {src}"))
}

fn assert_number(src: &str, expected: f64) {
    match eval_value(src) {
        Value::Number(n) => {
            assert!((n - expected).abs() < 1e-9,
                    "Expected {expected}, got {n} for: {src}");
        },
        other => panic!("Expected a number, got {other:?} for: {src}"),
    }
}

fn assert_display(src: &str, expected: &str) {
    assert_eq!(eval_value(src).to_string(), expected, "for: {src}");
}

#[test]
fn arithmetic_and_precedence() {
    assert_number("2 + 3 * 4", 14.0);
    assert_number("(2 + 3) * 4", 20.0);
    assert_number("10 - 2 - 3", 5.0);
    assert_number("10 / 4", 2.5);
    assert_number("2^3^2", 64.0); // left-associative
    assert_number("2^-1", 0.5);
}

#[test]
fn unary_operators() {
    assert_number("-5 + 8", 3.0);
    assert_number("+7", 7.0);
    assert_number("5!", 120.0);
    assert_number("0!", 1.0);
    assert_number("-4!", -24.0); // negation of the factorial
    assert_number("3!!", 720.0);
    assert_failure("(-4)!");
    assert_failure("2.5!");
}

#[test]
fn implicit_multiplication() {
    assert_number("x = 3; 2x", 6.0);
    assert_number("x = 3; 2 x^2", 18.0); // the exponent binds to x, not 2x
    assert_number("2(3 + 4)", 14.0);
    assert_number("(1 + 1)(2 + 3)", 10.0);
    assert_number("r = 2; pi r^2", 4.0 * std::f64::consts::PI);
    assert_number("2 sin(pi / 2)", 2.0);
}

#[test]
fn statements_and_assignment() {
    assert_number("x = 4; y = x + 1; x * y", 20.0);
    assert_number("x = y = 2; x + y", 4.0); // assignment yields its value
    assert_number("{ x = 1; x + 1 }", 2.0);
    assert_eq!(eval_source("{}").unwrap(), None);
    assert_eq!(eval_source(";;").unwrap(), None);
    assert_failure("x + 1; x = 1"); // use before definition
}

#[test]
fn strings() {
    assert_display("'mass: ' + 3", "mass: 3");
    assert_display("'a' + 'b'", "ab");
    assert_failure("'a' == 'a'"); // only concatenation is defined
    assert_failure("'oops");
}

#[test]
fn booleans_and_comparisons() {
    assert_display("1 < 2", "true");
    assert_display("2 <= 1", "false");
    assert_display("1 == 1 && 2 != 3", "true");
    assert_display("false || true", "true");
    assert_failure("true + false");
    assert_failure("1 && 2");
}

#[test]
fn conditionals() {
    assert_display("if(2 > 1, 'big', 'small')", "big");
    assert_display("x = 0; if (x > 1) 'big' else 'small'", "small");
    assert_number("1 < 2 ? 10 : 20", 10.0);
    assert_failure("if(1, 2, 3)"); // condition must be a boolean
    // Only the selected branch is evaluated.
    assert_number("if(true, 1, undefined_name)", 1.0);
}

#[test]
fn complex_numbers() {
    assert_display("i * i", "-1");
    assert_display("(3 + 4i) * (3 - 4i)", "25");
    assert_display("2 + 3i", "2 + 3i");
    assert_number("abs(3 + 4i)", 5.0);
    assert_number("z = 1 - 2i; z.imag", -2.0);
    assert_number("z = (2 + i) + (3 - i); z.real", 5.0);
    assert_failure("(1 + i) < 2"); // complex numbers have no ordering
}

#[test]
fn arrays() {
    assert_display("[1, 2, 3]", "[1, 2, 3]");
    assert_number("[10, 20, 30][1]", 20.0);
    assert_display("[1, 2] + [3, 4]", "[4, 6]");
    assert_display("[5, 6] - [1, 2]", "[4, 4]");
    assert_display("2 * [1, 2, 3]", "[2, 4, 6]");
    assert_display("[1, 2] * 3", "[3, 6]");
    assert_failure("[1, 2] + [1, 2, 3]");
    assert_failure("[1, 2][5]");
    assert_failure("[1, 2][-1]");
    assert_failure("[1, 2] * [3, 4]");
}

#[test]
fn matrices() {
    assert_display("[[1, 2], [3, 4]] * [[5, 6], [7, 8]]", "[[19, 22], [43, 50]]");
    assert_display("[[1, 2], [3, 4]] + [[1, 1], [1, 1]]", "[[2, 3], [4, 5]]");
    // `m` is also a unit symbol, but still usable as a variable.
    assert_display("m = [[1, 2], [3, 4]]; m[1]", "[3, 4]");
    assert_number("m = [[1, 2], [3, 4]]; m[1][0]", 3.0);
    assert_failure("[[1, 2], [3, 4]] * [[1, 2, 3]]"); // inner dimensions differ
    assert_failure("[[1, 2]] + [[1, 2, 3]]");
}

#[test]
fn units() {
    assert_display("60 km / 2", "30 km");
    assert_display("1 km + 200 m", "1.2 km");
    assert_display("1 h + 30 min", "1.5 h");
    assert_display("2 m * 3 s", "6 m*s");
    assert_display("(3 m)^2", "9 m^2");
    assert_display("5min + 30 s", "5.5 min");
    assert_number("q = 90 km/h; q.value", 90.0);
    assert_display("q = 90 km/h; q.unit", "km/h");
    assert_failure("1 kg + 1 s");
    assert_failure("(2 m)^0.5"); // fractional unit exponent
    assert_failure("2 furlong"); // `furlong` is just an identifier here
}

#[test]
fn unit_cancellation() {
    let Value::Quantity(ratio) = eval_value("60 km / 30 km") else {
        panic!("expected a quantity");
    };

    assert!(ratio.is_dimensionless());
    assert_eq!(ratio.value, 2.0);
}

#[test]
fn builtin_functions() {
    assert_number("sqrt(16)", 4.0);
    assert_number("root(27, 3)", 3.0);
    assert_number("ln(e)", 1.0);
    assert_number("log(1000)", 3.0);
    assert_number("log(8, 2)", 3.0);
    assert_number("max(2, 7)", 7.0);
    assert_number("gcd(12, 18)", 6.0);
    assert_number("lcm(4, 6)", 12.0);
    assert_number("factorial(5)", 120.0);
    assert_number("floor(2.7) + ceil(2.2) + round(2.5)", 8.0);
    assert_number("sign(-42)", -1.0);
    assert_failure("sqrt(-1)");
    assert_failure("ln(0)");
    assert_failure("root(-4, 2)");
    assert_failure("gcd(1.5, 2)");
    assert_failure("sin(1, 2)"); // arity
    assert_failure("sin 1"); // built-ins require parentheses
}

#[test]
fn user_functions() {
    assert_number("f(x) = x^2 + 1; f(3)", 10.0);
    assert_number("add(a, b) = a + b; add(2, 3)", 5.0);
    assert_number("a = 10; f(x) = x + a; f(5)", 15.0); // caller bindings are visible
    assert_number("fact(n) = if(n <= 1, 1, n * fact(n - 1)); fact(6)", 720.0);
    assert_failure("f(x) = x; f(1, 2)");
    assert_failure("f(x) = x + 1; f(0); x"); // parameters do not leak
}

#[test]
fn lambdas_and_closures() {
    assert_number("square = ->(x) x^2; square(5)", 25.0);
    assert_number("inc = -> n n + 1; inc(41)", 42.0); // single bare parameter
    assert_number("a = 1; f = ->(x) x + a; a = 2; f(1)", 3.0); // captured by reference
    assert_number("apply = ->() 42; apply()", 42.0);
    assert_failure("square = ->(x) x^2; square(1, 2)");
}

#[test]
fn derivatives() {
    assert_number("x = 3; d/dx (x^2)", 6.0);
    assert_number("x = 3; d/dx x^2", 6.0); // parentheses are optional
    assert_number("x = 2; d/dx x^3 - x", 10.0); // the `- x` stays outside
    assert_number("x = 2; d/dx (x^3 - x)", 11.0);
    assert_number("x = 0; d/dx (sin(x))", 1.0);
    assert_number("x = 4; d/dx (sqrt(x))", 0.25);
    assert_number("f(t) = t^3; x = 2; d/dx (f(x))", 12.0);
    assert_failure("x = 0; d/dx (2^x)"); // exponent must be a constant
    assert_failure("d/dx ([1, 2])");
}

#[test]
fn property_access() {
    assert_number("z = 3 + 4i; z.real", 3.0);
    assert_display("q = 2 m/s; q.unit", "m/s");
    assert_failure("x = 3; x.real"); // plain numbers expose no properties
}

#[test]
fn division_by_zero_follows_ieee() {
    assert_display("1 / 0", "inf");
    assert_display("0 / 0", "NaN");
}

#[test]
fn parse_errors() {
    assert_failure("2 +");
    assert_failure("if(1 > 0, 2");
    assert_failure("(1 + 2");
    assert_failure("[1, 2");
    assert_failure("1 @ 2");
    assert_failure("f(1 + 2) = 3"); // parameters must be identifiers
}

#[test]
fn comments_are_ignored() {
    assert_number("1 + /* inline */ 2 // trailing", 3.0);
    assert_number("// a whole line\n4", 4.0);
}

#[test]
fn pipe_mode_prints_without_error() {
    assert_success("x = 2; x + 2");
    assert_success("'hello'");
}
