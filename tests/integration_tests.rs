//! Integration tests for the complete pipeline.
//!
//! These tests run whole programs through tokenization, parsing, resolution
//! and evaluation, including every sample program under `demos/`.

use cobra::{
    compile_source,
    interpreter::{console::Console, value::Value},
    run_source,
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn run_demo(source: &str, file: &str) -> (String, Value) {
    let (interpreter, result) = run_source(source, file, Console::buffer());

    let value = result.unwrap_or_else(|error| panic!("{} failed: {}", file, error));
    (interpreter.console().output().to_string(), value)
}

#[test]
fn test_demo_arr_init() {
    let (_, value) = run_demo(include_str!("../demos/arr_init.cr"), "arr_init.cr");

    assert_eq!(value, Value::Int(3));
}

#[test]
fn test_demo_arrays() {
    let (_, value) = run_demo(include_str!("../demos/arrays.cr"), "arrays.cr");

    assert_eq!(value, Value::Int(8));
}

#[test]
fn test_demo_boolean_operations() {
    let (output, value) = run_demo(include_str!("../demos/boolean_operations.cr"), "boolean_operations.cr");

    assert_eq!(output, "1\n");
    assert_eq!(value.to_string(), "a is not equal to b");
}

#[test]
fn test_demo_factorial() {
    let (_, value) = run_demo(include_str!("../demos/factorial.cr"), "factorial.cr");

    assert_eq!(value, Value::Int(3628800));
}

#[test]
fn test_demo_maps() {
    let (output, value) = run_demo(include_str!("../demos/maps.cr"), "maps.cr");

    assert_eq!(output, "{\"apples\": 5, \"pears\": 5, \"plums\": 1}\n");
    assert_eq!(value, Value::Int(25));
}

#[test]
fn test_demo_loops() {
    let (_, value) = run_demo(include_str!("../demos/loops.cr"), "loops.cr");

    assert_eq!(value, Value::Int(385));
}

#[test]
fn test_demo_closures() {
    let (_, value) = run_demo(include_str!("../demos/closures.cr"), "closures.cr");

    assert_eq!(value, Value::Int(13));
}

#[test]
fn test_bubble_sort_program() {
    let source = "
        xs := [5, 2, 9, 1, 7];
        n := 5;
        i := 0;
        while {i < n} do {
            j := 0;
            while {j < n - i - 1} do {
                if {xs[j] > xs[j + 1]} then {
                    tmp := xs[j]; xs[j] := xs[j + 1]; xs[j + 1] := tmp
                } else { 0 } end;
                j := j + 1
            } end;
            i := i + 1
        } end;
        xs
    ";

    let (_, value) = run_demo(source, "bubble.cr");

    assert_eq!(value.to_string(), "[1, 2, 5, 7, 9]");
    assert_eq!(value, run_demo("sort([5, 2, 9, 1, 7])", "sort.cr").1);
}

#[test]
fn test_higher_order_functions() {
    let source = "
        let map_in_place be fun(xs, n, f) is {
            let i be 0 in
                while {i < n} do { xs[i] := f(xs[i]); i := i + 1 } end in
                xs
            end
        } in
            map_in_place([1, 2, 3], 3, fun(x) is { x * x })
        end
    ";

    let (_, value) = run_demo(source, "map.cr");

    assert_eq!(value.to_string(), "[1, 4, 9]");
}

#[test]
fn test_word_counts() {
    let source = "
        words := [\"a\", \"b\", \"a\", \"c\", \"a\"];
        counts := {\"a\": 0, \"b\": 0, \"c\": 0};
        i := 0;
        while {i < 5} do { w := words[i]; counts.(w) := counts.(w) + 1; i := i + 1 } end;
        counts
    ";

    let (_, value) = run_demo(source, "counts.cr");

    let mut expected = IndexMap::new();
    expected.insert("a".to_string(), Value::Int(3));
    expected.insert("b".to_string(), Value::Int(1));
    expected.insert("c".to_string(), Value::Int(1));
    assert_eq!(value, Value::map(expected));
}

#[test]
fn test_interactive_program() {
    let source = "name := input(\"name? \"); age := input(\"age? \"); print(\"hi \" + name); age + 1";
    let (interpreter, result) = run_source(source, "input.cr", Console::with_input(["ada", "36"]));

    assert_eq!(result.unwrap(), Value::Int(37));
    assert_eq!(interpreter.console().output(), "name? age? hi ada\n");
}

#[test]
fn test_errors_by_stage() {
    let cases = [
        ("x := #", "SyntaxError"),
        ("let x be in x end", "SyntaxError"),
        ("y + 1", "UnboundVariableError"),
        ("if {0} then {1} else {2} end", "TypeError"),
        ("10 % 0", "ZeroDivisionError"),
        ("[1, 2][2]", "IndexError"),
        ("{\"a\": 1}.b", "KeyError"),
        ("(fun(a) is { a })(1, 2)", "ArityError"),
        ("9223372036854775807 * 2", "OverflowError"),
    ];

    for (source, family) in cases {
        let (_, result) = run_source(source, "errors.cr", Console::buffer());
        let error = result.expect_err(source);

        assert_eq!(error.get_error_name(), family, "{}", source);
    }
}

#[test]
fn test_compile_source_resolves_every_reference() {
    let tree = compile_source(include_str!("../demos/closures.cr"), "closures.cr").unwrap();
    let debug = format!("{:?}", tree);

    assert!(!debug.contains("binding: None"));
}
