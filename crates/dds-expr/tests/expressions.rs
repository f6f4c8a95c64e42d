use dds_expr::{ExprError, Value, compile, parse};
use dds_model::Row;
use proptest::prelude::*;

const COLUMNS: [&str; 4] = ["Region", "Units", "Unit Price", "Discount"];

fn row(region: &str, units: &str, price: &str, discount: &str) -> Row {
    [
        ("Region", region),
        ("Units", units),
        ("Unit Price", price),
        ("Discount", discount),
    ]
    .into_iter()
    .collect()
}

#[test]
fn revenue_field() {
    let expr = compile("Units * [Unit Price] * (1 - coalesce(Discount, 0))", &COLUMNS).unwrap();
    assert_eq!(
        expr.evaluate(&row("North", "10", "2,50", "0.2")),
        Value::Number(20.0)
    );
    assert_eq!(
        expr.evaluate(&row("North", "1.000", "3", "")),
        Value::Number(3000.0)
    );
    assert_eq!(expr.evaluate(&row("North", "n/a", "3", "")), Value::Null);
}

#[test]
fn label_field() {
    let expr = compile(
        "if(Units >= 100, upper(Region) & ' (bulk)', trim(Region))",
        &COLUMNS,
    )
    .unwrap();
    assert_eq!(
        expr.evaluate(&row(" north ", "150", "1", "")),
        Value::Text("NORTH (bulk)".to_string())
    );
    assert_eq!(
        expr.evaluate(&row(" north ", "5", "1", "")),
        Value::Text("north".to_string())
    );
}

#[test]
fn parse_tree_rendering() {
    insta::assert_snapshot!(
        parse("not a = 1 or b > 2 and -c ^ 2 + 3 % 2 & 'x'").unwrap().to_string(),
        @r#"((not ([a] = 1)) or (([b] > 2) and ((((-[c]) ^ 2) + (3 % 2)) & "x")))"#
    );
}

#[test]
fn compile_errors_carry_positions() {
    let cases = [
        ("Units +", Some(7)),
        ("[Units", Some(0)),
        ("Units * Price", Some(8)),
        ("sum(Units)", Some(0)),
        ("round()", Some(0)),
        ("", None),
    ];
    for (source, position) in cases {
        let err = compile(source, &COLUMNS).unwrap_err();
        assert_eq!(err.position(), position, "{source}: {err}");
    }
}

#[test]
fn unknown_field_message() {
    let err = compile("Units * Price", &COLUMNS).unwrap_err();
    assert_eq!(
        err,
        ExprError::UnknownField {
            name: "Price".to_string(),
            position: 8
        }
    );
    assert_eq!(
        err.format_with_source("Units * Price"),
        "unknown field \"Price\" at position 8\n  Units * Price\n          ^"
    );
}

proptest! {
    #[test]
    fn evaluation_never_panics(
        units in ".{0,12}",
        price in ".{0,12}",
        region in "[a-zA-Z ]{0,8}",
    ) {
        let expr = compile(
            "round(Units * [Unit Price] / Units, 2) & len(Region) & max(Units, [Unit Price]) ^ 2",
            &COLUMNS,
        ).unwrap();
        let _ = expr.evaluate(&row(&region, &units, &price, ""));
    }

    #[test]
    fn integer_addition_is_exact(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let expr = compile("Units + [Unit Price]", &COLUMNS).unwrap();
        let result = expr.evaluate(&row("", &a.to_string(), &b.to_string(), ""));
        prop_assert_eq!(result, Value::Number((a + b) as f64));
    }
}
