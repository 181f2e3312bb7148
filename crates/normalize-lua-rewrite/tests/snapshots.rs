//! Snapshot tests for the Python-to-Lua pipeline.
//!
//! These tests verify that reading, rewriting, and emission produce the
//! expected output. Run `cargo insta review` to update snapshots after
//! intentional changes.

use normalize_lua_rewrite::{CompileError, Expr, Module, Stmt, compile, read_python, transform};
use std::rc::Rc;

fn parse(code: &str) -> Module {
    read_python(code).expect("parse failed")
}

fn lua(code: &str) -> String {
    compile(code).expect("compile failed").trim_end().to_string()
}

// ============================================================================
// Reader - verify parsed trees
// ============================================================================

mod python_reader {
    use super::*;
    use serde_json::json;

    #[test]
    fn elif_nests_into_orelse() {
        let module = parse("if a:\n    f()\nelif b:\n    g()\nelse:\n    h()\n");
        let call = |name: &str| json!({ "Expr": { "Call": { "func": { "Name": name }, "args": [] } } });
        assert_eq!(
            serde_json::to_value(&module).unwrap(),
            json!({
                "body": [{
                    "If": {
                        "test": { "Name": "a" },
                        "body": [call("f")],
                        "orelse": [{
                            "If": { "test": { "Name": "b" }, "body": [call("g")], "orelse": [call("h")] }
                        }],
                    }
                }]
            })
        );
    }

    #[test]
    fn target_list_becomes_targets() {
        let module = parse("x, y = 1, 2\n");
        assert_eq!(
            module.body,
            vec![Stmt::assign_many(
                vec![Expr::name("x"), Expr::name("y")],
                Expr::Tuple(vec![Expr::int(1), Expr::int(2)]),
            )]
        );
    }

    #[test]
    fn chained_assignment() {
        let module = parse("a = b = c = 0\n");
        let Stmt::Assign { targets, .. } = &module.body[0] else {
            panic!("expected assignment, got {:?}", module.body[0]);
        };
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn if_inside_else_keeps_its_statements() {
        let module = parse("if a:\n    f()\nelse:\n    x = 1\n    if b:\n        g()\n");
        let Stmt::If { orelse, .. } = &module.body[0] else {
            panic!("expected if, got {:?}", module.body[0]);
        };
        assert_eq!(orelse.len(), 2);
        assert_eq!(orelse[0], Stmt::assign(Expr::name("x"), Expr::int(1)));
    }

    #[test]
    fn statements_without_wrapper() {
        let module = parse("x = 1\nf()\nn += 1\n");
        assert_eq!(module.body.len(), 3);
        assert_eq!(module.body[0].kind(), "Assign");
        assert_eq!(module.body[1].kind(), "Expr");
        assert_eq!(module.body[2].kind(), "AugAssign");
    }

    #[test]
    fn comments_are_skipped() {
        let module = parse("# setup\nx = 1  # one\n");
        assert_eq!(module.body, vec![Stmt::assign(Expr::name("x"), Expr::int(1))]);
    }
}

// ============================================================================
// Lua output - full pipeline
// ============================================================================

mod lua_output {
    use super::*;

    #[test]
    fn range_loop() {
        insta::assert_snapshot!(lua("for i in range(1, 5):\n    print(i)\n"), @r"
i = 1
while (i < 5) do
    print(i)
    i = i + 1
end
");
    }

    #[test]
    fn range_loop_with_step() {
        insta::assert_snapshot!(lua("for i in range(10, 0, -2):\n    total += i\n"), @r"
i = 10
while (i < 0) do
    total = total + i
    i = (i + -2)
end
");
    }

    #[test]
    fn nested_range_loops() {
        insta::assert_snapshot!(lua("for i in range(0, 2):\n    for j in range(0, 3):\n        f(i, j)\n"), @r"
i = 0
while (i < 2) do
    j = 0
    while (j < 3) do
        f(i, j)
        j = j + 1
    end
    i = i + 1
end
");
    }

    #[test]
    fn elif_chain() {
        insta::assert_snapshot!(lua("if a == 1:\n    f()\nelif a == 2:\n    g()\nelse:\n    h()\n"), @r"
if (a == 1) then
    f()
elseif (a == 2) then
    g()
else
    h()
end
");
    }

    #[test]
    fn elif_without_else() {
        insta::assert_snapshot!(lua("if a:\n    f()\nelif b:\n    g()\nelif c:\n    h()\n"), @r"
if a then
    f()
elseif b then
    g()
elseif c then
    h()
end
");
    }

    #[test]
    fn tuple_assignment_is_not_destructured() {
        insta::assert_snapshot!(lua("x, y = 1, 2\n"), @r"
x = {1, 2}
y = {1, 2}
");
    }

    #[test]
    fn chained_assignment_rewrites_value_once() {
        insta::assert_snapshot!(lua("a = b = len(s)\n"), @r"
a = table.getn(s)
b = table.getn(s)
");
    }

    #[test]
    fn function_body() {
        insta::assert_snapshot!(lua("def area(w, h):\n    if w // 2 in sizes:\n        return len(\"abc\")\n    return w * h\n"), @r#"
function area(w, h)
    print("This is an additional statement.")
    if ((w / 2) == sizes) then
        _retval = string.len("abc")
        return _retval
    end
    _retval = (w * h)
    return _retval
end
"#);
    }

    #[test]
    fn return_inside_loop_is_kept() {
        insta::assert_snapshot!(lua("def find(xs):\n    while True:\n        return xs\n"), @r#"
function find(xs)
    print("This is an additional statement.")
    while true do
        return xs
    end
end
"#);
    }

    #[test]
    fn return_inside_range_loop_is_kept() {
        insta::assert_snapshot!(lua("def first(n):\n    for i in range(0, n):\n        return i\n    return None\n"), @r#"
function first(n)
    print("This is an additional statement.")
    i = 0
    while (i < n) do
        do
            return i
        end
        i = i + 1
    end
    _retval = nil
    return _retval
end
"#);
    }

    #[test]
    fn bare_return_hands_back_nil() {
        insta::assert_snapshot!(lua("def stop():\n    return\n"), @r#"
function stop()
    print("This is an additional statement.")
    _retval = nil
    return _retval
end
"#);
    }

    #[test]
    fn diagnostic_is_added_to_every_function() {
        insta::assert_snapshot!(lua("def f():\n    print(\"This is an additional statement.\")\n"), @r#"
function f()
    print("This is an additional statement.")
    print("This is an additional statement.")
end
"#);
    }

    #[test]
    fn lone_if_in_else_joins_chain() {
        insta::assert_snapshot!(lua("if a:\n    f()\nelse:\n    if b:\n        g()\n"), @r"
if a then
    f()
elseif b then
    g()
end
");
    }

    #[test]
    fn else_body_with_if_stays_nested() {
        insta::assert_snapshot!(lua("if a:\n    f()\nelse:\n    x = 1\n    if b:\n        g()\n"), @r"
if a then
    f()
else
    x = 1
    if b then
        g()
    end
end
");
    }

    #[test]
    fn range_loop_in_else() {
        insta::assert_snapshot!(lua("if a:\n    f()\nelse:\n    for i in range(0, 2):\n        g(i)\n"), @r"
if a then
    f()
else
    i = 0
    while (i < 2) do
        g(i)
        i = i + 1
    end
end
");
    }

    #[test]
    fn statements_without_wrapper() {
        insta::assert_snapshot!(lua("x = 1\nf()\nn += 1\n"), @r"
x = 1
f()
n = n + 1
");
    }

    #[test]
    fn not_passes_through() {
        insta::assert_snapshot!(lua("ok = not done\n"), @"ok = not done");
    }
}

// ============================================================================
// Tree properties
// ============================================================================

mod rewritten_tree {
    use super::*;

    #[test]
    fn split_targets_share_value() {
        let module = transform(parse("x, y = 1, 2\n")).unwrap();
        let [
            Stmt::Assign { targets: x, value: first },
            Stmt::Assign { targets: y, value: second },
        ] = module.body.as_slice()
        else {
            panic!("expected two assignments, got {:?}", module.body);
        };
        assert_eq!(x, &vec![Expr::name("x")]);
        assert_eq!(y, &vec![Expr::name("y")]);
        assert!(Rc::ptr_eq(first, second));
        assert_eq!(**first, Expr::Tuple(vec![Expr::int(1), Expr::int(2)]));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let source = "\
if n in seen:
    q = n // 2
elif n > 3:
    a = b = len(n)
else:
    for i in range(0, n):
        total += i
for j in range(1, 9, 2):
    while j > 4:
        break
";
        let once = transform(parse(source)).unwrap();
        let twice = transform(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn syntax_error() {
        let err = compile("def f(:\n    pass\n").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)), "got {err:?}");
    }

    #[test]
    fn unsupported_construct_is_syntax() {
        let err = compile("import os\n").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)), "got {err:?}");
    }

    #[test]
    fn non_range_loop() {
        let err = compile("for x in items:\n    print(x)\n").unwrap_err();
        assert!(matches!(err, CompileError::Precondition(_)), "got {err:?}");
        insta::assert_snapshot!(err, @"cannot rewrite For: only range(start, stop[, step]) can be iterated, got Name");
    }

    #[test]
    fn range_with_one_argument() {
        let err = compile("for i in range(3):\n    pass\n").unwrap_err();
        insta::assert_snapshot!(err, @"cannot rewrite For: range() needs 2 or 3 arguments, got 1");
    }

    #[test]
    fn statement_after_if_in_else() {
        let err = compile("if a:\n    pass\nelse:\n    if b:\n        pass\n    x = 2\n").unwrap_err();
        assert!(matches!(err, CompileError::Precondition(_)), "got {err:?}");
        insta::assert_snapshot!(err, @"cannot rewrite If: Assign statement after an elif branch");
    }

    #[test]
    fn statement_after_if_with_else_in_else() {
        let err = compile(
            "if a:\n    pass\nelse:\n    if b:\n        f()\n    else:\n        g()\n    return 2\n",
        )
        .unwrap_err();
        insta::assert_snapshot!(err, @"cannot rewrite If: elif branch with its own else is followed by Return");
    }

    #[test]
    fn else_of_only_branches() {
        for source in [
            "if a:\n    f()\nelse:\n    if b:\n        g()\n    if c:\n        h()\n",
            "if a:\n    f()\nelse:\n    while c:\n        g()\n",
        ] {
            let err = compile(source).unwrap_err();
            assert!(matches!(err, CompileError::Syntax(_)), "got {err:?}");
        }
    }

    #[test]
    fn continue_is_unsupported() {
        let err = compile("while x:\n    continue\n").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)), "got {err:?}");
    }

    #[test]
    fn len_without_argument() {
        let err = compile("n = len()\n").unwrap_err();
        insta::assert_snapshot!(err, @"cannot rewrite Call: len() called without an argument");
    }
}
