//! Tests scientifiques (campagne) : grammaire + fonctions + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - résultats lus à la précision par défaut (5 décimales) sauf mention

use std::time::{Duration, Instant};

use super::{evaluate, EvalError, DEFAULT_PRECISION};

fn eval_ok(expr: &str) -> f64 {
    evaluate(expr, DEFAULT_PRECISION).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_val(expr: &str, attendu: f64) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

fn assert_err(expr: &str, attendu: &str) {
    match evaluate(expr, DEFAULT_PRECISION) {
        Ok(v) => panic!("expr={expr:?} devrait échouer, obtenu {v}"),
        Err(e) => assert_eq!(e.detail(), attendu, "expr={expr:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Moins unaire ------------------------ */

#[test]
fn sci_moins_unaire() {
    assert_val("-3 + 5", 2.0);
    assert_val("3 - -2", 5.0);
    assert_val("--2", 2.0);
    assert_val("-(-3)", 3.0);
    assert_val("+5", 5.0);
    assert_val("2 * -3", -6.0);
    assert_val("-2 ^ 2", -4.0);
    assert_val("(-2) ^ 2", 4.0);
    assert_val("2 ^ -3", 0.125);
}

/* ------------------------ Appels imbriqués, arguments multiples ------------------------ */

#[test]
fn sci_appels_imbriques() {
    assert_val("sqrt(abs(-16)) + max(1, min(2, 3))", 6.0);
    assert_val("round(cos(0) + sin(0), 2)", 1.0);
    assert_val("max(1, 7, 3, -2)", 7.0);
    assert_val("min(4, 2.5, 9)", 2.5);
    assert_val("max(3)", 3.0);
    assert_val("max(min(1, 2), min(3, 4), -max(5, 6))", 3.0);
    assert_val("pow(2, 10)", 1024.0);
    assert_val("pow(2, 0.5)", 1.41421);
    assert_val("pow(pow(2, 2), 2)", 16.0);
}

#[test]
fn sci_arites() {
    assert_err(
        "sin()",
        "Syntax error: Too few arguments in function sin (expected: 1, actual: 0)",
    );
    assert_err(
        "pow(2)",
        "Syntax error: Too few arguments in function pow (expected: 2, actual: 1)",
    );
    assert_err(
        "sqrt(4, 9)",
        "Syntax error: Too many arguments in function sqrt (expected: 1, actual: 2)",
    );
    assert_err(
        "max()",
        "Syntax error: Too few arguments in function max (expected: 1, actual: 0)",
    );
}

/* ------------------------ Parenthèses mal formées ------------------------ */

#[test]
fn sci_parentheses_mal_formees() {
    assert_err("(1 + 2))", "Syntax error: Unexpected operator ) (char 8)");
    assert_err(")(", "Syntax error: Value expected (char 1)");
    assert_err("((2)", "Syntax error: Parenthesis ) expected (char 5)");
    assert_err("sin(1", "Syntax error: Parenthesis ) expected (char 6)");
    assert_err("max(1 2)", "Syntax error: Unexpected part \"2\" (char 7)");
    assert_err("1 + ", "Syntax error: Unexpected end of expression (char 4)");
}

/* ------------------------ Multiplication implicite ------------------------ */

#[test]
fn sci_multiplication_implicite() {
    assert_val("2PI", 6.28319);
    assert_val("2pi", 6.28319);
    assert_val("2(3)", 6.0);
    assert_val("(1+2)(3+4)", 21.0);
    assert_val("2 sin(PI/2)", 2.0);
    assert_val("6/2(1+2)", 9.0);
    assert_val("3 sqrt(4) max(1, 2)", 12.0);
    assert_err("2 3", "Syntax error: Unexpected part \"3\" (char 3)");
}

#[test]
fn sci_positions_apres_normalisation() {
    // la casse change, pas les positions
    assert_err("SIN + 1", "Syntax error: Function sin requires arguments (char 1)");
    assert_err("2 * pi(1)", "Syntax error: PI is not a function (char 5)");
}

/* ------------------------ Fonctions ------------------------ */

#[test]
fn sci_parties_entieres_et_arrondi() {
    assert_val("round(2.345, 2)", 2.35);
    assert_val("round(-2.5)", -3.0);
    assert_val("trunc(-2.7)", -2.0);
    assert_val("floor(-2.5)", -3.0);
    assert_val("ceil(2.1)", 3.0);
    assert_val("sign(-0.5)", -1.0);
    assert_val("sign(0)", 0.0);
    assert_err(
        "round(1.5, 0.5)",
        "Syntax error: Number of decimals in function round must be an integer from 0 to 64 inclusive",
    );
    assert_eq!(evaluate("round(1/3, 18)", 18), Ok(0.333333333333333333));
}

#[test]
fn sci_transcendantes() {
    assert_val("log(8, 2)", 3.0);
    assert_val("log10(0.001)", -3.0);
    assert_val("exp(0)", 1.0);
    assert_val("ln(E)", 1.0);
    assert_val("atan(1) * 4", 3.14159);
    assert_val("acos(-1)", 3.14159);
    assert_val("cosh(0) + tanh(0) + sinh(0)", 1.0);
    assert_val("E ^ 2", 7.38906);
    assert_val("sqrt2 * sqrt1_2", 1.0);
    assert_val("log2e * ln2", 1.0);
}

#[test]
fn sci_domaines() {
    assert_err("asin(2)", "Result is not a number");
    assert_err("pow(-8, 1/3)", "Result is not a number");
    assert_err("ln(-1)", "Result is not a number");
    assert_err("pow(0, -1)", "Division by zero");
    assert_err("log(0, 2)", "Division by zero");
    assert_err("10^308 * 10", "Division by zero");
    // ln 2 / ln 0 = ln 2 / -∞
    assert_val("log(2, 0)", 0.0);
    assert_eq!(evaluate("(-2) ^ 3", 0), Ok(-8.0));
}

/* ------------------------ Exactitude décimale ------------------------ */

#[test]
fn sci_exactitude_decimale() {
    assert_val("1/3*3", 1.0);
    assert_eq!(evaluate("0.1 * 3", 17), Ok(0.3));
    assert_eq!(evaluate("1.1 + 2.2", 15), Ok(3.3));
    assert_eq!(evaluate("0.7 - 0.1 - 0.6", 20), Ok(0.0));
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // 100 appels imbriqués : sous la limite de profondeur
    let mut expr = "4".to_string();
    for k in 0..100 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("pow({expr}, 2)")
        };
        budget(t0, max);
    }
    assert_val(&expr, 4.0);

    let trop = format!("{}1{}", "(".repeat(200), ")".repeat(200));
    assert!(matches!(evaluate(&trop, 5), Err(EvalError::Syntax(_))));
}

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // 600 termes (sous la longueur maximale), sans récursion (pile RPN)
    let expr = vec!["1/2"; 600].join(" + ");
    budget(t0, max);
    assert_val(&expr, 300.0);
}

#[test]
fn sci_stress_puissances_entieres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 40 puissances 1024 imbriquées : dépassement, mais vite
    let mut expr = "1.0000000001".to_string();
    for _ in 0..40 {
        expr = format!("pow({expr}, 1024)");
    }
    assert_err(&expr, "Division by zero");
    budget(t0, max);

    // 40 puissances côte à côte, toutes finies
    let somme = vec!["pow(1.0000000001, 1024)"; 40].join(" + ");
    assert_val(&somme, 40.0);
    budget(t0, max);

    assert_val("10^1500 / 10^1499", 10.0);
    assert_val("2^-10 * 2^10", 1.0);
    budget(t0, max);
}

#[test]
fn sci_stress_bigint() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // gros numérateur contrôlé (100 chiffres), s'annule exactement
    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7 - {big}/7");
    budget(t0, max);
    assert_eq!(evaluate(&expr, 5), Ok(0.14286));
}
