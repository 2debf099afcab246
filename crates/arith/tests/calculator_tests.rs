use arith::*;

// Helper to evaluate with both calculators and check they agree
fn eval_with(src: &str, config: &Config, vars: &Vars) -> std::result::Result<f64, ArithError> {
    let eager = Calculator::evaluate(src, config, vars);
    let lazy = LazyCalculator::evaluate(src, config, vars);
    assert_eq!(eager, lazy, "calculators disagree on {src:?}");
    eager
}

fn eval(src: &str) -> f64 {
    eval_with(src, &Config::default(), &Vars::new()).expect("evaluation failed")
}

fn eval_config(src: &str, config: &Config) -> f64 {
    eval_with(src, config, &Vars::new()).expect("evaluation failed")
}

fn pow(assoc: Assoc) -> Config {
    Config::default().with_operator(
        BinaryOperator::new("^", priority::POW, assoc, |a, b| Ok(a.powf(b))).unwrap(),
    )
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_basic_operators() {
    assert_eq!(eval("2 + 3"), 5.0);
    assert_eq!(eval("2 - 3"), -1.0);
    assert_eq!(eval("2 * 3"), 6.0);
    assert_eq!(eval("2 / 4"), 0.5);
}

#[test]
fn test_priority_and_brackets() {
    assert_eq!(eval("2 + 2 * 2"), 6.0);
    assert_eq!(eval("(2 + 2) * 2"), 8.0);
    assert_eq!(eval("2 + (2 * 2)"), 6.0);
    assert_eq!(eval("10 - 4 - 3"), 3.0);
    assert_eq!(eval("24 / 4 / 2"), 3.0);
}

#[test]
fn test_unary_plus_minus() {
    assert_eq!(eval("2"), 2.0);
    assert_eq!(eval("+(2+3)"), 5.0);
    assert_eq!(eval("-2"), -2.0);
    assert_eq!(eval("-(2+3)"), -5.0);
    assert_eq!(eval("-2 * -2"), 4.0);
    assert_eq!(eval("--2"), 2.0);
}

#[test]
fn test_division_by_zero() {
    let err = Calculator::evaluate("1/0", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(err, ArithError::Calc(CalcError::DivisionByZero));
    let err = LazyCalculator::evaluate("1/0", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(err.to_string(), "Division by zero");
}

#[test]
fn test_left_associative() {
    assert_eq!(eval_config("2 ^ 3 ^ 2", &pow(Assoc::Left)), 64.0);
}

#[test]
fn test_right_associative() {
    assert_eq!(eval_config("2 ^ 3 ^ 2", &pow(Assoc::Right)), 512.0);
}

#[test]
fn test_multichar_operator() {
    let config = Config::default().with_operator(
        BinaryOperator::new("**", priority::POW, Assoc::Right, |a, b| Ok(a.powf(b))).unwrap(),
    );
    assert_eq!(eval_config("2 * 3 ** 4", &config), 162.0);
}

#[test]
fn test_alpha_operators() {
    let mut config = Config::default();
    config.set_operators([
        Operator::from(BinaryOperator::new("add", priority::ADD, Assoc::Left, |a, b| Ok(a + b)).unwrap()),
        Operator::from(BinaryOperator::new("mul", priority::MUL, Assoc::Left, |a, b| Ok(a * b)).unwrap()),
    ]);
    assert_eq!(eval_config("2 add 2 mul 2", &config), 6.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Unary Operators
// ═══════════════════════════════════════════════════════════════════════

fn unary_config(ops: [(&str, UnaryPos, fn(f64) -> f64); 2]) -> Config {
    Config::default().with_operators(ops.map(|(symbol, pos, f)| {
        Operator::from(UnaryOperator::new(symbol, pos, move |a| Ok(f(a))).unwrap())
    }))
}

#[test]
fn test_prefix_order() {
    let config = unary_config([
        ("¿", UnaryPos::Prefix, |a| a * 3.0),
        ("¡", UnaryPos::Prefix, |a| a + 5.0),
    ]);
    assert_eq!(eval_config("¡¿2", &config), 2.0 * 3.0 + 5.0);
    assert_eq!(eval_config("¿¡2", &config), (2.0 + 5.0) * 3.0);
}

#[test]
fn test_postfix_order() {
    let config = unary_config([
        ("?", UnaryPos::Postfix, |a| a * 3.0),
        ("!", UnaryPos::Postfix, |a| a + 5.0),
    ]);
    assert_eq!(eval_config("2?!", &config), 2.0 * 3.0 + 5.0);
    assert_eq!(eval_config("2!?", &config), (2.0 + 5.0) * 3.0);
}

#[test]
fn test_postfix_before_prefix() {
    let config = unary_config([
        ("?", UnaryPos::Postfix, |a| a * 3.0),
        ("¿", UnaryPos::Prefix, |a| a + 5.0),
    ]);
    assert_eq!(eval_config("¿2?", &config), 2.0 * 3.0 + 5.0);
    assert_eq!(eval_config("(¿2)?", &config), (2.0 + 5.0) * 3.0);
}

#[test]
fn test_unary_combinations() {
    let config = Config::default().with_operators([
        Operator::from(UnaryOperator::new("¿", UnaryPos::Prefix, |a| Ok(a * 2.0)).unwrap()),
        Operator::from(UnaryOperator::new("¡", UnaryPos::Prefix, |a| Ok(a + 2.0)).unwrap()),
        Operator::from(UnaryOperator::new("?", UnaryPos::Postfix, |a| Ok(a * 2.0)).unwrap()),
        Operator::from(UnaryOperator::new("!", UnaryPos::Postfix, |a| Ok(a + 2.0)).unwrap()),
    ]);

    assert_eq!(
        eval_config("-2?! + -2!?", &config),
        -(2.0 * 2.0 + 2.0) + -((2.0 + 2.0) * 2.0)
    );
    assert_eq!(
        eval_config("¿-¡2 + ¡+¿2", &config),
        -(2.0 + 2.0) * 2.0 + ((2.0 * 2.0) + 2.0)
    );
}

#[test]
fn test_not_operator() {
    assert_eq!(eval("not 0"), 1.0);
    assert_eq!(eval("not 5"), 0.0);
    assert_eq!(eval("NOT 1 < 2"), 1.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison and Logic
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_comparisons() {
    assert_eq!(eval("1 < 2"), 1.0);
    assert_eq!(eval("2 <= 2"), 1.0);
    assert_eq!(eval("1 > 2"), 0.0);
    assert_eq!(eval("3 >= 4"), 0.0);
    assert_eq!(eval("1 + 1 = 2"), 1.0);
    assert_eq!(eval("2 == 2"), 1.0);
    assert_eq!(eval("1 != 2"), 1.0);
    assert_eq!(eval("1 <> 1"), 0.0);
}

#[test]
fn test_logic_operators() {
    assert_eq!(eval("1 and 2"), 1.0);
    assert_eq!(eval("1 AND 0"), 0.0);
    assert_eq!(eval("0 or 0"), 0.0);
    assert_eq!(eval("0 OR 3"), 1.0);
    assert_eq!(eval("1 < 2 and 3 < 4"), 1.0);
}

// ═══════════════════════════════════════════════════════════════════════
// Functions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_functions() {
    assert_eq!(eval("abs(1 - 3)"), 2.0);
    assert_eq!(eval("@abs(3 - 1)"), 2.0);
    assert_eq!(eval("ABS(-4)"), 4.0);
    assert_eq!(eval("sqrt(16) + floor(2.7) + ceil(2.1)"), 9.0);
    assert_eq!(eval("log(8, 2)").round(), 3.0);
    assert_eq!(eval("round(2.346, 2)"), 2.35);
    assert_eq!(eval("round(1250, -2)"), 1300.0);
}

#[test]
fn test_constants() {
    assert_eq!(eval("pi()"), std::f64::consts::PI);
    assert_eq!(eval("e()"), std::f64::consts::E);
    assert_eq!(eval("true() + false()"), 1.0);
    let nan = Calculator::evaluate("nan()", &Config::default(), &Vars::new()).unwrap();
    assert!(nan.is_nan());
    assert_eq!(eval("inf()"), f64::INFINITY);
}

#[test]
fn test_custom_function() {
    let config = Config::default().with_function(Func::unary("mul2", |a| a * 2.0).unwrap());
    assert_eq!(eval_config("mul2(2)", &config), 4.0);
}

#[test]
fn test_variadic_function() {
    let sum = Func::new("sum", Arity::at_least(1), |args| Ok(args.iter().sum())).unwrap();
    let config = Config::default().with_function(sum);
    assert_eq!(eval_config("sum(1)", &config), 1.0);
    assert_eq!(eval_config("sum(1, 2, 3, 4)", &config), 10.0);
}

#[test]
fn test_custom_error_from_function() {
    let checked = Func::new("checked_sqrt", Arity::exact(1), |args| {
        if args[0] < 0.0 {
            Err(CalcError::Custom(format!("negative input: {}", args[0])))
        } else {
            Ok(args[0].sqrt())
        }
    })
    .unwrap();
    let config = Config::default().with_function(checked);

    let err = eval_with("checked_sqrt(-4)", &config, &Vars::new()).unwrap_err();
    assert_eq!(err.to_string(), "negative input: -4");
}

#[test]
fn test_missing_function() {
    let err = eval_with("MyFunc(1) + 3", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(err.to_string(), "Undefined function: MyFunc");
}

#[test]
fn test_removed_function() {
    let config = Config::default().without_function("abs");
    let err = eval_with("abs(1 - 3)", &config, &Vars::new()).unwrap_err();
    assert_eq!(err.to_string(), "Undefined function: abs");

    let config = Config::default().without_functions();
    let err = eval_with("abs(1 - 3)", &config, &Vars::new()).unwrap_err();
    assert_eq!(err.to_string(), "Undefined function: abs");
}

#[test]
fn test_wrong_argument_count() {
    let err = eval_with("abs()", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient arguments for function abs(): 1 expected but only 0 provided"
    );

    let err = eval_with("abs(1, 2)", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Too many arguments for function abs(): at most 1 expected but 2 provided"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Calculate Trait
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_reuse_parsed_expression() {
    let calc = Calculator::parse("x * 2", &Config::default()).unwrap();
    for x in [1.0, 2.5, -3.0] {
        let vars = Vars::from_pairs([("x", x)]).unwrap();
        assert_eq!(calc.calc(&vars), Ok(x * 2.0));
    }
}

#[test]
fn test_from_parsed() {
    let config = Config::default();
    let parsed = Parser::new(config.clone()).parse("1 + 2 * 3").unwrap();
    let calc = LazyCalculator::from_parsed(parsed.clone(), config);
    assert_eq!(calc.operations(), parsed.operations.as_slice());
    assert_eq!(calc.calc(&Vars::new()), Ok(7.0));
}

#[test]
fn test_parse_error_through_evaluate() {
    let err = Calculator::evaluate("1 +", &Config::default(), &Vars::new()).unwrap_err();
    assert!(matches!(err, ArithError::Parse(_)));
}

#[test]
fn test_empty_expression_is_invalid_sequence() {
    let err = eval_with("", &Config::default(), &Vars::new()).unwrap_err();
    assert_eq!(err, ArithError::Calc(CalcError::InvalidSequence));
}

#[test]
fn test_calculators_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Calculator>();
    assert_send_sync::<LazyCalculator>();
    assert_send_sync::<Config>();
}

#[test]
fn test_shared_across_threads() {
    let calc = std::sync::Arc::new(Calculator::parse("x + 1", &Config::default()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let calc = calc.clone();
            std::thread::spawn(move || {
                let vars = Vars::from_pairs([("x", i as f64)]).unwrap();
                calc.calc(&vars)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Ok(i as f64 + 1.0));
    }
}
