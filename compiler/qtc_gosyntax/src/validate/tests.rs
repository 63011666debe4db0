#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use proptest::prelude::*;

const GO: GoSyntax = GoSyntax;

#[test]
fn for_clauses() {
    for ok in [
        "i := 0; i < n; i++",
        "_, item := range items",
        "range ch",
        "cond",
        "",
        "x := range []int{1, 2}",
    ] {
        assert!(GO.for_clause(ok).is_ok(), "{ok:?}");
    }
    for bad in ["i := 0; i < n", "i = 0 {", "range", "x := range T{1, 2}"] {
        assert!(GO.for_clause(bad).is_err(), "{bad:?}");
    }
}

#[test]
fn if_conditions() {
    assert!(GO.if_condition("x > 0").is_ok());
    assert!(GO.if_condition("v, ok := m[k]; ok").is_ok());
    assert!(GO.if_condition("a && (b || !c)").is_ok());
    assert!(GO.if_condition("").is_err());
    assert!(GO.if_condition("x = 1").is_err());
    assert!(GO.if_condition("x >").is_err());
}

#[test]
fn switch_selectors() {
    assert!(GO.switch_selector("x").is_ok());
    assert!(GO.switch_selector("").is_ok());
    assert!(GO.switch_selector("v := x.(type)").is_ok());
    assert!(GO.switch_selector("x.(type)").is_ok());
    assert!(GO.switch_selector("y := f(); y").is_ok());
    assert!(GO.switch_selector("x +").is_err());
}

#[test]
fn case_lists() {
    assert!(GO.case_list("1").is_ok());
    assert!(GO.case_list("1, 2, 3").is_ok());
    assert!(GO.case_list("\"a\", b.C").is_ok());
    assert!(GO.case_list("").is_err());
    assert!(GO.case_list("1,").is_err());
}

#[test]
fn import_lists() {
    assert!(GO.import_list("\"fmt\"").is_ok());
    assert!(GO.import_list("str \"strings\"").is_ok());
    assert!(GO.import_list("(\n\t\"fmt\"\n\t\"io\"\n)").is_ok());
    assert!(GO.import_list("fmt").is_err());
    assert!(GO.import_list("\"fmt\"\nvar x = 1").is_err());
}

#[test]
fn output_expressions() {
    assert!(GO.output_expr("name").is_ok());
    assert!(GO.output_expr("p.Title()").is_ok());
    assert!(GO.output_expr("len(items) + 1").is_ok());
    assert!(GO.output_expr("").is_err());
    assert!(GO.output_expr("x := 1").is_err());
    assert!(GO.output_expr("a b").is_err());
}

#[test]
fn func_code() {
    assert!(GO.func_code("x := 1\ny := x + 1\n_ = y").is_ok());
    assert!(GO.func_code("").is_ok());
    assert!(GO.func_code("if x { return }").is_ok());
    assert!(GO.func_code("func F() {}").is_err());
    assert!(GO.func_code("x :=").is_err());
}

#[test]
fn template_code() {
    assert!(GO.template_code("type Page struct { Title string }").is_ok());
    assert!(GO.template_code("func helper(a int) int { return a * 2 }").is_ok());
    assert!(GO.template_code("var x = 1\nconst y = 2").is_ok());
    assert!(GO.template_code("").is_ok());
    assert!(GO.template_code("x := 1").is_err());
    assert!(GO.template_code("import \"fmt\"").is_err());
}

#[test]
fn errors_render_with_position() {
    let err = GO.output_expr("a +").unwrap_err();
    assert_eq!(err.to_string(), "1:4: expected operand, found EOF");
}

proptest! {
    #[test]
    fn counting_loops_validate(var in "[a-z]{1,4}", n in 0u32..1000) {
        prop_assume!(crate::structure::is_identifier(&var));
        let clause = format!("{var} := 0; {var} < {n}; {var}++");
        prop_assert!(GO.for_clause(&clause).is_ok());
    }

    #[test]
    fn integer_case_lists_validate(values in proptest::collection::vec(0i64..100, 1..6)) {
        let list = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        prop_assert!(GO.case_list(&list).is_ok());
    }
}

#[test]
fn deeply_nested_output_is_rejected() {
    let depth = 100_000;
    let expr = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let err = GO.output_expr(&expr).unwrap_err();
    assert!(err.message.contains("exceeded max nesting depth"), "{err}");
}
