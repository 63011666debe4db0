#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::tags::{output_filter, split_tag_name_prec, Filter};
use crate::{compile_to_string, CodegenError, CompileOptions, ErrorKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const HEADER: &str = "\
// This file is automatically generated by qtc from \"t.qtpl\".
// See https://github.com/valyala/quicktemplate for details.

package templates

import (
\tqtio422016 \"io\"

\tqt422016 \"github.com/valyala/quicktemplate\"
)

var (
\t_ = qtio422016.Copy
\t_ = qt422016.AcquireByteBuffer
)

";

fn options() -> CompileOptions {
    CompileOptions::default().with_line_comments(false)
}

fn go(src: &str) -> String {
    match compile_to_string(src, "t.qtpl", &options()) {
        Ok(out) => out,
        Err(err) => panic!("{src:?} should compile: {err}"),
    }
}

fn fail(src: &str) -> CodegenError {
    match compile_to_string(src, "t.qtpl", &options()) {
        Ok(out) => panic!("{src:?} should not compile:\n{out}"),
        Err(err) => err,
    }
}

fn in_func(body: &str) -> String {
    go(&format!("{{% func F(x int, xs []int) %}}{body}{{% endfunc %}}"))
}

fn fail_in_func(body: &str) -> CodegenError {
    fail(&format!("{{% func F(x int, xs []int) %}}{body}{{% endfunc %}}"))
}

/// Every `{` line is closed by a `}` line at the same indentation.
fn assert_balanced(go: &str) {
    let mut open = Vec::new();
    for line in go.lines() {
        let code = line.trim_start_matches('\t');
        let indent = line.len() - code.len();
        if code.starts_with('}') {
            let Some(opened) = open.pop() else {
                panic!("unbalanced close {line:?} in\n{go}");
            };
            assert_eq!(opened, indent, "misaligned close {line:?} in\n{go}");
        }
        if code.ends_with('{') {
            open.push(indent);
        }
    }
    assert!(open.is_empty(), "unclosed blocks in\n{go}");
}

// === Functions ===

#[test]
fn greet_function() {
    let out = go("{% func Greet(name string) %}Hello, {%s name %}!{% endfunc %}");
    let expected = format!(
        "{HEADER}\
         func StreamGreet(qw422016 *qt422016.Writer, name string) {{\n\
         \tqw422016.N().S(`Hello, `)\n\
         \tqw422016.E().S(name)\n\
         \tqw422016.N().S(`!`)\n\
         }}\n\
         \n\
         func WriteGreet(qq422016 qtio422016.Writer, name string) {{\n\
         \tqw422016 := qt422016.AcquireWriter(qq422016)\n\
         \tStreamGreet(qw422016, name)\n\
         \tqt422016.ReleaseWriter(qw422016)\n\
         }}\n\
         \n\
         func Greet(name string) string {{\n\
         \tqb422016 := qt422016.AcquireByteBuffer()\n\
         \tWriteGreet(qb422016, name)\n\
         \tqs422016 := string(qb422016.B)\n\
         \tqt422016.ReleaseByteBuffer(qb422016)\n\
         \treturn qs422016\n\
         }}\n\
         \n"
    );
    assert_eq!(out, expected);
}

#[test]
fn method_function() {
    let out = go("{% func (p *Page) Body() %}x{% endfunc %}");
    assert!(out.contains("func (p *Page) StreamBody(qw422016 *qt422016.Writer) {\n"));
    assert!(out.contains("\tp.StreamBody(qw422016)\n"));
    assert!(out.contains("func (p *Page) Body() string {\n"));
}

#[test]
fn functions_cannot_nest() {
    let err = fail("{% func A() %}{% func B() %}{% endfunc %}{% endfunc %}");
    assert!(
        err.to_string()
            .starts_with("unexpected tag found in \"func A()\": \"func\""),
        "{err}"
    );
}

#[test]
fn missing_endfunc() {
    let err = fail("{% func A() %}text");
    assert_eq!(err.kind(), ErrorKind::Grammar);
    assert!(err.to_string().contains("cannot find endfunc tag"), "{err}");
}

#[test]
fn malformed_function_header() {
    let err = fail("{% func A %}{% endfunc %}");
    assert!(
        err.to_string().starts_with("error in \"func A\" at file"),
        "{err}"
    );
    assert!(err.to_string().contains("cannot find '('"), "{err}");
}

#[test]
fn call_tag_streams_inline() {
    let out = in_func("{%= Row(x) %}{%= p.Body() %}");
    assert!(out.contains("\tStreamRow(qw422016, x)\n"));
    assert!(out.contains("\tp.StreamBody(qw422016)\n"));
}

#[test]
fn call_tag_needs_a_call() {
    let err = fail_in_func("{%= x + 1 %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

// === Output tags ===

#[test]
fn output_filters() {
    for tag in ["s", "v", "q", "z", "j", "sz", "qz", "jz"] {
        for suffix in ["", "="] {
            let out = in_func(&format!("{{%{tag}{suffix} x %}}"));
            let expected = format!("\tqw422016.E().{}(x)\n", tag.to_uppercase());
            assert!(out.contains(&expected), "{tag}{suffix}:\n{out}");
        }
    }
    for tag in ["d", "f", "u", "uz"] {
        for suffix in ["", "="] {
            let out = in_func(&format!("{{%{tag}{suffix} x %}}"));
            let expected = format!("\tqw422016.N().{}(x)\n", tag.to_uppercase());
            assert!(out.contains(&expected), "{tag}{suffix}:\n{out}");
        }
    }
}

#[test]
fn filter_table() {
    assert_eq!(output_filter("s"), Some(Filter::Escaped));
    assert_eq!(output_filter("jz"), Some(Filter::Escaped));
    assert_eq!(output_filter("d"), Some(Filter::Unescaped));
    assert_eq!(output_filter("uz"), Some(Filter::Unescaped));
    assert_eq!(output_filter("dz"), None);
    assert_eq!(output_filter(""), None);
}

#[test]
fn float_precision() {
    let out = in_func("{%f.2 x %}{%f. x %}{%f.3= x %}");
    assert!(out.contains("\tqw422016.N().FPrec(x, 2)\n"));
    assert!(out.contains("\tqw422016.N().FPrec(x, 0)\n"));
    assert!(out.contains("\tqw422016.N().FPrec(x, 3)\n"));
}

#[test]
fn tag_name_precision_split() {
    assert_eq!(split_tag_name_prec("f.2"), ("f", Some(2)));
    assert_eq!(split_tag_name_prec("f.10="), ("f", Some(10)));
    assert_eq!(split_tag_name_prec("f."), ("f", Some(0)));
    assert_eq!(split_tag_name_prec("f.="), ("f", Some(0)));
    assert_eq!(split_tag_name_prec("f.-1"), ("f.-1", None));
    assert_eq!(split_tag_name_prec("f.x"), ("f.x", None));
    assert_eq!(split_tag_name_prec("f.1.2"), ("f.1.2", None));
    assert_eq!(split_tag_name_prec("s"), ("s", None));
}

#[test]
fn invalid_precision_is_an_unknown_tag() {
    let err = fail_in_func("{%f.x x %}");
    assert!(err.to_string().contains("\"f.x\""), "{err}");
}

#[test]
fn output_expression_is_validated() {
    let err = fail_in_func("{%s x + %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(
        err.to_string()
            .starts_with("error in \"func F(x int, xs []int)\": invalid output tag value at"),
        "{err}"
    );
}

// === Loops and conditionals ===

#[test]
fn counting_loop() {
    let out = go("{% func F(n int) %}{% for i := 0; i < n; i++ %}{%d i %}{% endfor %}{% endfunc %}");
    assert!(out.contains("\tfor i := 0; i < n; i++ {\n\t\tqw422016.N().D(i)\n\t}\n"));
    assert_eq!(out.matches("for i").count(), 1);
    assert_balanced(&out);
}

#[test]
fn invalid_loop_clause() {
    let err = fail_in_func("{% for i := 0; i < 3 %}{% endfor %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("invalid statement \"for i := 0; i < 3\""), "{err}");
}

#[test]
fn missing_endfor() {
    let err = fail("{% func F() %}{% for %}x");
    assert!(err.to_string().contains("cannot find endfor tag for \"for \""), "{err}");
}

#[test]
fn if_elseif_else() {
    let out = in_func("{% if x > 1 %}a{% elseif x > 0 %}b{% else %}c{% endif %}");
    assert!(out.contains(
        "\tif x > 1 {\n\
         \t\tqw422016.N().S(`a`)\n\
         \t} else if x > 0 {\n\
         \t\tqw422016.N().S(`b`)\n\
         \t} else {\n\
         \t\tqw422016.N().S(`c`)\n\
         \t}\n"
    ));
    assert_balanced(&out);
}

#[test]
fn empty_if_condition() {
    let err = fail_in_func("{% if %}{% endif %}");
    assert!(err.to_string().contains("empty if condition"), "{err}");
}

#[test]
fn elseif_condition_is_validated() {
    let err = fail_in_func("{% if x %}{% elseif x = 1 %}{% endif %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    let err = fail_in_func("{% if x %}{% elseif %}{% endif %}");
    assert!(err.to_string().contains("empty elseif condition"), "{err}");
}

#[test]
fn elseif_after_else() {
    let err = fail_in_func("{% if x %}{% else %}{% elseif y %}{% endif %}");
    assert_eq!(err.kind(), ErrorKind::Grammar);
    assert!(err.to_string().contains("unexpected elseif branch found after else branch"), "{err}");
}

#[test]
fn duplicate_else() {
    let err = fail_in_func("{% if x %}{% else %}{% else %}{% endif %}");
    assert!(err.to_string().contains("duplicate else branch"), "{err}");
}

// === Switch ===

#[test]
fn switch_with_cases_and_default() {
    let out = in_func(
        "{% switch x %}{% case 1 %}one{% case 2, 3 %}few{% default %}many{% endswitch %}",
    );
    assert!(out.contains(
        "\tswitch x {\n\
         \tcase 1:\n\
         \t\tqw422016.N().S(`one`)\n\
         \tcase 2, 3:\n\
         \t\tqw422016.N().S(`few`)\n\
         \tdefault:\n\
         \t\tqw422016.N().S(`many`)\n\
         \t}\n"
    ));
    assert_balanced(&out);
}

#[test]
fn empty_switch() {
    let err = fail_in_func("{% switch x %}{% endswitch %}");
    assert_eq!(err.kind(), ErrorKind::Grammar);
    assert!(err.to_string().contains("empty statement \"switch x\""), "{err}");
}

#[test]
fn duplicate_default() {
    let err = fail_in_func("{% switch x %}{% default %}a{% default %}b{% endswitch %}");
    assert!(err.to_string().contains("duplicate default tag found in \"switch x\""), "{err}");
}

#[test]
fn text_before_first_case_is_a_comment() {
    let out = in_func("{% switch x %}\n  pick one\n{% case 1 %}{% endswitch %}");
    assert!(out.contains("// pick one\n"), "{out}");
    assert!(!out.contains("pick one`"), "{out}");
}

#[test]
fn unexpected_tag_in_switch() {
    let err = fail_in_func("{% switch x %}{%s x %}{% endswitch %}");
    assert!(err.to_string().contains("unexpected tag found in \"switch x\": \"s\""), "{err}");
}

#[test]
fn case_errors_name_the_switch() {
    let err = fail_in_func("{% switch x %}{% case 1, %}{% endswitch %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("error in \"switch x\": invalid statement \"case 1,\""), "{err}");
}

#[test]
fn type_switch() {
    let out = in_func("{% switch v := any(x).(type) %}{% case int %}{%d v %}{% case nil %}{% endswitch %}");
    assert!(out.contains("\tswitch v := any(x).(type) {\n\tcase int:\n"));
}

// === Terminal tags ===

#[test]
fn break_outside_loop_and_switch() {
    let err = fail_in_func("{% break %}");
    assert_eq!(err.kind(), ErrorKind::Grammar);
    assert!(err.to_string().contains("found break tag outside for loop and switch block"), "{err}");
}

#[test]
fn break_and_continue_errors_carry_location() {
    let err = fail("{% func F() %}\n{% break %}{% endfunc %}");
    let msg = err.to_string();
    assert!(msg.contains("outside for loop and switch block at file \"t.qtpl\", line 2"), "{msg}");

    let err = fail("{% func F() %}{% return %}{% continue %}{% endfunc %}");
    let msg = err.to_string();
    assert!(msg.contains("error in \"return\""), "{msg}");
    assert!(msg.contains("found continue tag outside for loop at file \"t.qtpl\", line 1"), "{msg}");
}

#[test]
fn break_at_document_level() {
    let err = fail("{% break %}");
    assert!(err.to_string().contains("unexpected tag found outside func: \"break\""), "{err}");
}

#[test]
fn continue_outside_loop() {
    let err = fail_in_func("{% switch x %}{% case 1 %}{% continue %}{% endswitch %}");
    assert!(err.to_string().contains("found continue tag outside for loop"), "{err}");
}

#[test]
fn break_inside_switch_and_loop() {
    let out = in_func("{% switch x %}{% case 1 %}{% break %}{% endswitch %}");
    assert!(out.contains("\tcase 1:\n\t\tbreak\n\t}\n"));
    let out = in_func("{% for _, v := range xs %}{% if v > 0 %}{% continue %}{% endif %}{%d v %}{% endfor %}");
    assert!(out.contains("\t\t\tcontinue\n\t\t}\n"));
    assert_balanced(&out);
}

#[test]
fn break_after_code_block_in_loop() {
    let out = in_func("{% for range xs %}{% code f := func() {} %}{% break %}{% endfor %}");
    assert!(out.contains("\t\tbreak\n"));
}

#[test]
fn dead_region_emits_nothing() {
    let dead = in_func(
        "a{% return %}b{%s x %}{% if x > 1 %}c{% for %}{% break %}{% endfor %}{% endif %}\
         {% code y := 1 %}{%= Row(x) %}",
    );
    assert_eq!(dead, in_func("a{% return %}"));
    assert!(dead.contains("\treturn\n}\n"));
}

#[test]
fn dead_region_is_validated() {
    let err = fail_in_func("{% return %}{%s x + %}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err.to_string().contains("error in \"return\""), "{err}");

    let err = fail_in_func("{% return %}{% if %}{% endif %}");
    assert!(err.to_string().contains("empty if condition"), "{err}");

    let err = fail_in_func("{% return %}{% switch x %}{% endswitch %}");
    assert!(err.to_string().contains("empty statement"), "{err}");
}

#[test]
fn dead_region_ends_at_enclosing_terminator() {
    let out = in_func("{% if x > 0 %}{% return %}gone{% else %}kept{% endif %}after");
    assert!(out.contains("\t\treturn\n\t} else {\n\t\tqw422016.N().S(`kept`)\n"));
    assert!(out.contains("\tqw422016.N().S(`after`)\n"));
    assert!(!out.contains("gone"));
    assert_balanced(&out);
}

#[test]
fn nested_terminals_restore_output() {
    let out = in_func(
        "{% for _, v := range xs %}{% break %}{% if v > 0 %}{% continue %}{%d v %}{% endif %}{% endfor %}tail",
    );
    assert_eq!(out.matches("continue").count(), 0);
    assert!(out.contains("\tqw422016.N().S(`tail`)\n"));
    assert_balanced(&out);
}

#[test]
fn unexpected_tag_after_terminal() {
    let err = fail_in_func("{% for %}{% break %}{% interface %}{% endfor %}");
    assert!(err.to_string().contains("unexpected tag found after \"break\": \"interface\""), "{err}");
}

// === Text ===

#[test]
fn backticks_in_text() {
    let out = in_func("use `go` here");
    assert!(out.contains(
        "\tqw422016.N().S(`use `)\n\
         \tqw422016.N().S(\"`\")\n\
         \tqw422016.N().S(`go`)\n\
         \tqw422016.N().S(\"`\")\n\
         \tqw422016.N().S(` here`)\n"
    ));
}

#[test]
fn leading_text_is_a_comment() {
    let out = go("Page templates.\n\n{% func F() %}{% endfunc %}");
    assert!(out.starts_with(
        "// This file is automatically generated by qtc from \"t.qtpl\".\n\
         // See https://github.com/valyala/quicktemplate for details.\n\
         \n\
         package templates\n"
    ));
    assert!(out.contains(")\n\n// Page templates.\n\nvar (\n"), "{out}");
}

#[test]
fn leading_comment_paragraphs_keep_one_separator() {
    let out = go("// Hello\n//\n\n\n// World   \n\n{% import \"fmt\" %}{% func F() %}{%s fmt.Sprint(1) %}{% endfunc %}");
    assert!(out.contains(")\n\n// Hello\n//\n// World\n\nimport \"fmt\"\n"), "{out}");
}

#[test]
fn prologue_is_emitted_once() {
    for src in ["only a comment", "", "{% func F() %}{% endfunc %}{% func G() %}{% endfunc %}"] {
        let out = go(src);
        assert_eq!(out.matches("_ = qt422016.AcquireByteBuffer").count(), 1, "{src:?}");
    }
}

// === Document level ===

#[test]
fn imports_come_first() {
    let out = go("{% import \"fmt\" %}{% import (\n\t\"strings\"\n) %}{% func F() %}{% endfunc %}");
    let import = out.find("import \"fmt\"\n").unwrap();
    let prologue = out.find("var (\n").unwrap();
    assert!(import < prologue);
    assert!(out.contains("import (\n\t\"strings\"\n)\n"));
}

#[test]
fn import_after_func() {
    let err = fail("{% func F() %}{% endfunc %}{% import \"fmt\" %}");
    assert_eq!(err.kind(), ErrorKind::Grammar);
    assert!(err.to_string().starts_with("imports must be at the top of the template. Found at"), "{err}");
}

#[test]
fn empty_and_invalid_imports() {
    assert!(fail("{% import %}").to_string().contains("empty import found"));
    assert_eq!(fail("{% import fmt %}").kind(), ErrorKind::Syntax);
}

#[test]
fn template_code() {
    let out = go("{% code type Row struct{ N int } %}{% func F() %}{% code n := 1 %}{%d n %}{% endfunc %}");
    assert!(out.contains("\ntype Row struct{ N int }\n\n"));
    assert!(out.contains("\tn := 1\n\n"));
    assert_eq!(fail("{% code x := 1 %}").kind(), ErrorKind::Syntax);
    assert_eq!(fail_in_func("{% code func G() {} %}").kind(), ErrorKind::Syntax);
}

#[test]
fn interface_declaration() {
    let out = go("{% interface Page {\n\tTitle()\n\tBody(n int)\n} %}");
    assert!(out.contains(
        "type Page interface {\n\
         \tTitle() string\n\
         \tStreamTitle(qw422016 *qt422016.Writer)\n\
         \tWriteTitle(qq422016 qtio422016.Writer)\n\
         \tBody(n int) string\n\
         \tStreamBody(qw422016 *qt422016.Writer, n int)\n\
         \tWriteBody(qq422016 qtio422016.Writer, n int)\n\
         }\n"
    ));
    assert_eq!(go("{% iface P { T() } %}").matches("type P interface").count(), 1);
}

#[test]
fn interface_errors() {
    assert!(fail("{% interface Page %}").to_string().contains("missing '{' in interface"));
    assert!(fail("{% interface { T() } %}").to_string().contains("missing interface name"));
    assert!(fail("{% interface Page {} %}")
        .to_string()
        .contains("interface must contain at least one method"));
    assert!(fail("{% interface Page { fmt.Stringer } %}")
        .to_string()
        .contains("cannot embed"));
    assert!(fail("{% interface Page { T() string } %}")
        .to_string()
        .contains("function cannot return values"));
}

#[test]
fn unknown_tag_outside_func() {
    let err = fail("{% s x %}");
    assert!(err.to_string().starts_with("unexpected tag found outside func: \"s\" at file \"t.qtpl\""), "{err}");
}

#[test]
fn scan_errors_are_fatal() {
    let err = fail("{% func F() %}{%s x");
    assert_eq!(err.kind(), ErrorKind::Scan);
    assert!(matches!(err.root(), CodegenError::Scan(_)));
}

#[test]
fn nested_errors_name_every_construct() {
    let err = fail("{% func F() %}{% for i := 0; i < 3; i++ %}{% if i > %}{% endif %}{% endfor %}{% endfunc %}");
    assert!(
        err.to_string().starts_with(
            "error in \"func F()\": error in \"for i := 0; i < 3; i++\": invalid statement \"if i >\" at"
        ),
        "{err}"
    );
}

// === Line directives ===

#[test]
fn line_directives() {
    let src = "{% func F() %}\nline two{% endfunc %}";
    let with = compile_to_string(src, "dir/t.qtpl", &CompileOptions::default()).unwrap();
    assert!(with.contains("//line dir/t.qtpl:1\npackage templates\n"));
    assert!(with.contains("\t//line dir/t.qtpl:1\n\tqw422016.N().S(`\nline two`)\n"));

    let without = compile_to_string(src, "dir/t.qtpl", &options()).unwrap();
    assert!(!without.contains("//line"));
}

#[test]
fn package_name_option() {
    let out = compile_to_string("", "t.qtpl", &CompileOptions::new("views").with_line_comments(false))
        .unwrap();
    assert!(out.contains("\npackage views\n"));
}

// === Properties ===

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,8}",
        Just("{%d x %}".to_string()),
        Just("{%s= name %}".to_string()),
        (0usize..6).prop_map(|p| format!("{{%f.{p} 1.5 %}}")),
    ]
}

fn body() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        let seq = proptest::collection::vec(inner, 0..4).prop_map(|parts| parts.concat());
        prop_oneof![
            seq.clone()
                .prop_map(|b| format!("{{% for i := 0; i < 3; i++ %}}{b}{{% endfor %}}")),
            (seq.clone(), seq.clone()).prop_map(|(a, b)| {
                format!("{{% if x > 0 %}}{a}{{% else %}}{b}{{% endif %}}")
            }),
            (seq.clone(), seq)
                .prop_map(|(a, b)| format!("{{% switch x %}}{{% case 1 %}}{a}{{% default %}}{b}{{% endswitch %}}")),
        ]
    })
}

proptest! {
    #[test]
    fn nested_blocks_stay_balanced(b in body()) {
        let out = go(&format!("{{% func F(x int, name string) %}}{b}{{% endfunc %}}"));
        assert_balanced(&out);
        prop_assert_eq!(out.matches("func StreamF(").count(), 1);
        prop_assert_eq!(out.matches("func WriteF(").count(), 1);
        prop_assert_eq!(out.matches("func F(").count(), 1);
        prop_assert!(out.contains("\tStreamF(qw422016, x, name)\n"));
        prop_assert!(out.contains("\tWriteF(qb422016, x, name)\n"));
    }

    #[test]
    fn precision_is_passed_through(p in 0usize..1000) {
        let out = in_func(&format!("{{%f.{p} 2.5 %}}"));
        let expected = format!("\tqw422016.N().FPrec(2.5, {p})\n");
        prop_assert!(out.contains(&expected));
    }

    #[test]
    fn text_round_trips_through_raw_strings(text in "[a-z `]{1,20}") {
        let out = in_func(&text);
        let mut rebuilt = String::new();
        for line in out.lines().map(|l| l.trim_start_matches('\t')) {
            if let Some(piece) = line.strip_prefix("qw422016.N().S(`").and_then(|l| l.strip_suffix("`)")) {
                rebuilt.push_str(piece);
            } else if line == "qw422016.N().S(\"`\")" {
                rebuilt.push('`');
            }
        }
        prop_assert_eq!(rebuilt, text);
    }
}
