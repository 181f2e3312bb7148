//! Tree-sitter based Python reader.
//!
//! Maps the tree-sitter Python grammar onto [`crate::ir`]. Constructs the
//! rewrite rules have no use for (classes, imports, comprehensions, ...)
//! are rejected with [`ReadError::Unsupported`] rather than dropped, so a
//! successful read never loses statements.
//!
//! `elif` is read the way Python's own `ast` reads it: as an `If` that is
//! the single entry of the enclosing `orelse`, carrying the rest of the
//! chain in its own `orelse`. An `else` body stays a plain statement list.
//! An `else` body made only of `if`/`while` statements (other than a lone
//! `if`, which means the same as `elif`) is rejected, since the If rule would
//! relink it into the chain. One that opens with any other statement is an
//! ordinary `else`.
//!
//! A target list (`a, b = ...`) becomes one target per name, the same shape
//! as `a = b = ...`.
//!
//! `continue` is rejected: a lowered `range` loop keeps its increment at the
//! end of the body, where a jump past it would never reach.

use crate::ir::*;
use crate::traits::{ReadError, Reader};
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the Python reader.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn read(&self, source: &str) -> Result<Module, ReadError> {
        read_python(source)
    }
}

/// Parse Python source into a [`Module`].
pub fn read_python(source: &str) -> Result<Module, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_module(&tree)
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
        node.child_by_field_name(name)
            .ok_or_else(|| ReadError::Parse(format!("{} missing {}", node.kind(), name)))
    }

    fn read_module(&self, tree: &Tree) -> Result<Module, ReadError> {
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ReadError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        Ok(Module::new(self.read_stmts(root)?))
    }

    fn read_stmts(&self, node: Node) -> Result<Vec<Stmt>, ReadError> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            if let Some(stmt) = self.read_stmt(child)? {
                stmts.push(stmt);
            }
        }

        Ok(stmts)
    }

    fn read_stmt(&self, node: Node) -> Result<Option<Stmt>, ReadError> {
        match node.kind() {
            "comment" => Ok(None),

            "expression_statement" => self.read_expression_statement(node).map(Some),

            "if_statement" => self.read_if_statement(node).map(Some),
            "while_statement" => self.read_while_statement(node).map(Some),
            "for_statement" => self.read_for_statement(node).map(Some),
            "function_definition" => self.read_function_definition(node).map(Some),

            "return_statement" => {
                let value = node
                    .named_child(0)
                    .map(|value| self.read_expr(value))
                    .transpose()?;
                Ok(Some(Stmt::return_stmt(value)))
            }

            "pass_statement" => Ok(Some(Stmt::Pass)),
            "break_statement" => Ok(Some(Stmt::Break)),
            "continue_statement" => Err(ReadError::Unsupported(
                "`continue` (no Lua equivalent inside a lowered loop)".into(),
            )),

            // Statement-level assignments may arrive without the wrapper.
            "assignment" => self.read_assignment(node).map(Some),
            "augmented_assignment" => self.read_augmented_assignment(node).map(Some),

            other if other.ends_with("_statement") || other.ends_with("_definition") => {
                Err(ReadError::Unsupported(format!("statement `{other}`")))
            }

            // Bare calls and other expressions at statement level.
            _ => Ok(Some(Stmt::expr(self.read_expr(node)?))),
        }
    }

    fn read_expression_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();

        match children.as_slice() {
            [single] if single.kind() == "assignment" => self.read_assignment(*single),
            [single] if single.kind() == "augmented_assignment" => {
                self.read_augmented_assignment(*single)
            }
            [single] => Ok(Stmt::expr(self.read_expr(*single)?)),
            // `a, b` as a statement
            many => Ok(Stmt::expr(Expr::Tuple(self.read_exprs(many)?))),
        }
    }

    fn read_assignment(&self, node: Node) -> Result<Stmt, ReadError> {
        // `a = b = v` nests: assignment(left: a, right: assignment(left: b, right: v))
        let mut targets = Vec::new();
        let mut current = node;

        loop {
            let left = self.field(current, "left")?;
            self.read_targets(left, &mut targets)?;

            let right = current.child_by_field_name("right").ok_or_else(|| {
                ReadError::Unsupported("annotation without a value".into())
            })?;
            if right.kind() == "assignment" {
                current = right;
                continue;
            }

            return Ok(Stmt::assign_many(targets, self.read_expr(right)?));
        }
    }

    /// Push the targets named by an assignment's left-hand side.
    fn read_targets(&self, node: Node, targets: &mut Vec<Expr>) -> Result<(), ReadError> {
        if node.kind() == "pattern_list" {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                targets.push(self.read_expr(child)?);
            }
        } else {
            targets.push(self.read_expr(node)?);
        }
        Ok(())
    }

    fn read_augmented_assignment(&self, node: Node) -> Result<Stmt, ReadError> {
        let target = self.read_expr(self.field(node, "left")?)?;
        let value = self.read_expr(self.field(node, "right")?)?;
        let op_text = self.node_text(self.field(node, "operator")?);

        let op = op_text
            .strip_suffix('=')
            .and_then(binary_op)
            .ok_or_else(|| ReadError::Unsupported(format!("augmented operator `{op_text}`")))?;

        Ok(Stmt::aug_assign(target, op, value))
    }

    fn read_if_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let test = self.read_expr(self.field(node, "condition")?)?;
        let body = self.read_stmts(self.field(node, "consequence")?)?;

        let mut cursor = node.walk();
        let clauses: Vec<_> = node.children_by_field_name("alternative", &mut cursor).collect();
        let orelse = self.read_alternatives(&clauses)?;

        Ok(Stmt::if_stmt(test, body, orelse))
    }

    /// Nest `elif` clauses right to left, innermost holding the `else` body.
    fn read_alternatives(&self, clauses: &[Node]) -> Result<Vec<Stmt>, ReadError> {
        let Some((clause, rest)) = clauses.split_first() else {
            return Ok(Vec::new());
        };

        match clause.kind() {
            "elif_clause" => {
                let test = self.read_expr(self.field(*clause, "condition")?)?;
                let body = self.read_stmts(self.field(*clause, "consequence")?)?;
                let orelse = self.read_alternatives(rest)?;
                Ok(vec![Stmt::if_stmt(test, body, orelse)])
            }
            "else_clause" => {
                let body = self.read_stmts(self.field(*clause, "body")?)?;
                // Made only of branches, the body would be relinked as `elif`s.
                // A branch followed by plain statements is left for the If
                // rule to reject.
                let only_branches = body.iter().all(|stmt| stmt.branch().is_some());
                let lone_if = matches!(body.as_slice(), [] | [Stmt::If { .. }]);
                if only_branches && !lone_if {
                    return Err(ReadError::Unsupported(
                        "`else` body of only `if`/`while` statements would read as `elif`".into(),
                    ));
                }
                Ok(body)
            }
            other => Err(ReadError::UnexpectedNode {
                expected: "elif_clause or else_clause".into(),
                got: other.into(),
            }),
        }
    }

    fn read_while_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        if node.child_by_field_name("alternative").is_some() {
            return Err(ReadError::Unsupported("while ... else".into()));
        }
        let test = self.read_expr(self.field(node, "condition")?)?;
        let body = self.read_stmts(self.field(node, "body")?)?;
        Ok(Stmt::while_loop(test, body))
    }

    fn read_for_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        if node.child_by_field_name("alternative").is_some() {
            return Err(ReadError::Unsupported("for ... else".into()));
        }
        let target = self.read_expr(self.field(node, "left")?)?;
        let iter = self.read_expr(self.field(node, "right")?)?;
        let body = self.read_stmts(self.field(node, "body")?)?;
        Ok(Stmt::for_loop(target, iter, body))
    }

    fn read_function_definition(&self, node: Node) -> Result<Stmt, ReadError> {
        let name = self.node_text(self.field(node, "name")?);
        let params = node
            .child_by_field_name("parameters")
            .map(|params| self.read_parameters(params))
            .transpose()?
            .unwrap_or_default();
        let body = self.read_stmts(self.field(node, "body")?)?;

        Ok(Stmt::function(name, params, body))
    }

    fn read_parameters(&self, node: Node) -> Result<Vec<String>, ReadError> {
        let mut params = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            let name = match child.kind() {
                "identifier" => child,
                // Type annotations and defaults are dropped; only names matter here.
                "typed_parameter" => child.named_child(0).ok_or_else(|| {
                    ReadError::Parse("typed_parameter missing name".into())
                })?,
                "default_parameter" | "typed_default_parameter" => self.field(child, "name")?,
                other => return Err(ReadError::Unsupported(format!("parameter `{other}`"))),
            };
            if name.kind() != "identifier" {
                return Err(ReadError::Unsupported(format!("parameter `{}`", name.kind())));
            }
            params.push(self.node_text(name).to_string());
        }

        Ok(params)
    }

    fn read_exprs(&self, nodes: &[Node]) -> Result<Vec<Expr>, ReadError> {
        nodes.iter().map(|node| self.read_expr(*node)).collect()
    }

    fn read_named_children(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect();
        self.read_exprs(&children)
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            "integer" => self.read_integer(node),
            "float" => {
                let text = self.node_text(node).replace('_', "");
                text.parse()
                    .map(Expr::float)
                    .map_err(|_| ReadError::Parse(format!("invalid float `{text}`")))
            }
            "string" => self.read_string(node).map(Expr::string),
            "concatenated_string" => {
                let mut joined = String::new();
                let mut cursor = node.walk();
                for part in node.named_children(&mut cursor) {
                    joined.push_str(&self.read_string(part)?);
                }
                Ok(Expr::string(joined))
            }
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "none" => Ok(Expr::none()),

            "identifier" => Ok(Expr::name(self.node_text(node))),

            "binary_operator" => {
                let op_text = self.node_text(self.field(node, "operator")?);
                let op = binary_op(op_text)
                    .ok_or_else(|| ReadError::Unsupported(format!("operator `{op_text}`")))?;
                Ok(Expr::binary(
                    self.read_expr(self.field(node, "left")?)?,
                    op,
                    self.read_expr(self.field(node, "right")?)?,
                ))
            }
            "comparison_operator" => self.read_comparison(node),
            "boolean_operator" => self.read_boolean_operator(node),
            "not_operator" => Ok(Expr::unary(
                UnaryOperator::Not,
                self.read_expr(self.field(node, "argument")?)?,
            )),
            "unary_operator" => {
                let op = match self.node_text(self.field(node, "operator")?) {
                    "-" => UnaryOperator::Neg,
                    "+" => UnaryOperator::Pos,
                    other => return Err(ReadError::Unsupported(format!("operator `{other}`"))),
                };
                Ok(Expr::unary(op, self.read_expr(self.field(node, "argument")?)?))
            }

            "call" => self.read_call(node),

            "attribute" => Ok(Expr::attribute(
                self.read_expr(self.field(node, "object")?)?,
                self.node_text(self.field(node, "attribute")?),
            )),
            "subscript" => {
                let index = self.field(node, "subscript")?;
                if index.kind() == "slice" {
                    return Err(ReadError::Unsupported("slice".into()));
                }
                Ok(Expr::subscript(
                    self.read_expr(self.field(node, "value")?)?,
                    self.read_expr(index)?,
                ))
            }

            "list" => Ok(Expr::List(self.read_named_children(node)?)),
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                Ok(Expr::Tuple(self.read_named_children(node)?))
            }
            "list_pattern" => Ok(Expr::List(self.read_named_children(node)?)),
            "dictionary" => self.read_dictionary(node),

            "parenthesized_expression" => {
                let inner = node.named_child(0).ok_or_else(|| {
                    ReadError::Parse("parenthesized_expression missing inner".into())
                })?;
                self.read_expr(inner)
            }

            other => Err(ReadError::Unsupported(format!("expression `{other}`"))),
        }
    }

    fn read_integer(&self, node: Node) -> Result<Expr, ReadError> {
        let text = self.node_text(node).replace('_', "");
        let lower = text.to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i64::from_str_radix(oct, 8)
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i64::from_str_radix(bin, 2)
        } else {
            lower.parse()
        };
        parsed
            .map(Expr::int)
            .map_err(|_| ReadError::Unsupported(format!("integer literal `{text}`")))
    }

    /// Literal contents of a `string` node, quotes and escapes resolved.
    fn read_string(&self, node: Node) -> Result<String, ReadError> {
        let mut cursor = node.walk();
        if node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "interpolation")
        {
            return Err(ReadError::Unsupported("f-string interpolation".into()));
        }

        let text = self.node_text(node);
        let prefix_len = text.find(['"', '\'']).unwrap_or(0);
        let (prefix, quoted) = text.split_at(prefix_len);
        let prefix = prefix.to_ascii_lowercase();
        if prefix.contains('b') {
            return Err(ReadError::Unsupported("bytes literal".into()));
        }

        let quote = ["\"\"\"", "'''", "\"", "'"]
            .into_iter()
            .find(|quote| quoted.starts_with(quote) && quoted.len() >= quote.len() * 2)
            .ok_or_else(|| ReadError::Parse(format!("unterminated string `{text}`")))?;
        let inner = &quoted[quote.len()..quoted.len() - quote.len()];

        if prefix.contains('r') {
            Ok(inner.to_string())
        } else {
            Ok(unescape(inner))
        }
    }

    fn read_comparison(&self, node: Node) -> Result<Expr, ReadError> {
        let mut cursor = node.walk();
        let operands: Vec<_> = node.named_children(&mut cursor).collect();

        let mut cursor = node.walk();
        let ops = node
            .children_by_field_name("operators", &mut cursor)
            .map(|op| {
                let text = self.node_text(op).split_whitespace().collect::<Vec<_>>().join(" ");
                cmp_op(&text).ok_or_else(|| ReadError::Unsupported(format!("comparison `{text}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some((left, comparators)) = operands.split_first() else {
            return Err(ReadError::Parse("comparison without operands".into()));
        };
        if ops.len() != comparators.len() {
            return Err(ReadError::Parse(format!(
                "comparison has {} operators for {} operands",
                ops.len(),
                operands.len()
            )));
        }

        Ok(Expr::Compare {
            left: Box::new(self.read_expr(*left)?),
            ops,
            comparators: self.read_exprs(comparators)?,
        })
    }

    fn read_boolean_operator(&self, node: Node) -> Result<Expr, ReadError> {
        let op = match self.node_text(self.field(node, "operator")?) {
            "and" => BoolOperator::And,
            "or" => BoolOperator::Or,
            other => return Err(ReadError::Unsupported(format!("operator `{other}`"))),
        };

        // `a and b and c` is left-nested; flatten runs of the same operator.
        let mut values = match self.read_expr(self.field(node, "left")?)? {
            Expr::BoolOp { op: inner, values } if inner == op => values,
            left => vec![left],
        };
        values.push(self.read_expr(self.field(node, "right")?)?);

        Ok(Expr::bool_op(op, values))
    }

    fn read_call(&self, node: Node) -> Result<Expr, ReadError> {
        let func = self.read_expr(self.field(node, "function")?)?;
        let arguments = self.field(node, "arguments")?;
        if arguments.kind() != "argument_list" {
            return Err(ReadError::Unsupported(format!(
                "call with `{}`",
                arguments.kind()
            )));
        }

        let mut args = Vec::new();
        let mut cursor = arguments.walk();
        for arg in arguments.named_children(&mut cursor) {
            match arg.kind() {
                "comment" => {}
                "keyword_argument" | "list_splat" | "dictionary_splat" => {
                    return Err(ReadError::Unsupported(format!("argument `{}`", arg.kind())));
                }
                _ => args.push(self.read_expr(arg)?),
            }
        }

        Ok(Expr::call(func, args))
    }

    fn read_dictionary(&self, node: Node) -> Result<Expr, ReadError> {
        let mut pairs = Vec::new();
        let mut cursor = node.walk();

        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => pairs.push((
                    self.read_expr(self.field(child, "key")?)?,
                    self.read_expr(self.field(child, "value")?)?,
                )),
                "comment" => {}
                other => return Err(ReadError::Unsupported(format!("dictionary entry `{other}`"))),
            }
        }

        Ok(Expr::Dict(pairs))
    }
}

/// Deepest-first search for the node tree-sitter flagged.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

fn binary_op(text: &str) -> Option<Operator> {
    Some(match text {
        "+" => Operator::Add,
        "-" => Operator::Sub,
        "*" => Operator::Mult,
        "/" => Operator::Div,
        "//" => Operator::FloorDiv,
        "%" => Operator::Mod,
        "**" => Operator::Pow,
        _ => return None,
    })
}

fn cmp_op(text: &str) -> Option<CmpOp> {
    Some(match text {
        "==" => CmpOp::Eq,
        "!=" | "<>" => CmpOp::NotEq,
        "<" => CmpOp::Lt,
        "<=" => CmpOp::LtE,
        ">" => CmpOp::Gt,
        ">=" => CmpOp::GtE,
        "in" => CmpOp::In,
        "not in" => CmpOp::NotIn,
        "is" => CmpOp::Is,
        "is not" => CmpOp::IsNot,
        _ => return None,
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // line continuation
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(source: &str) -> Vec<Stmt> {
        read_python(source).expect("parse failed").body
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(read("x = 42"), vec![Stmt::assign(Expr::name("x"), Expr::int(42))]);
    }

    #[test]
    fn test_chained_assignment_collects_targets() {
        assert_eq!(
            read("a = b = 0"),
            vec![Stmt::assign_many(
                vec![Expr::name("a"), Expr::name("b")],
                Expr::int(0)
            )]
        );
    }

    #[test]
    fn test_target_list_is_flattened() {
        assert_eq!(
            read("x, y = 1, 2"),
            vec![Stmt::assign_many(
                vec![Expr::name("x"), Expr::name("y")],
                Expr::Tuple(vec![Expr::int(1), Expr::int(2)])
            )]
        );
    }

    #[test]
    fn test_augmented_assignment() {
        assert_eq!(
            read("n //= 2"),
            vec![Stmt::aug_assign(Expr::name("n"), Operator::FloorDiv, Expr::int(2))]
        );
    }

    #[test]
    fn test_floor_division_kept_distinct() {
        assert_eq!(
            read("q = a // b"),
            vec![Stmt::assign(
                Expr::name("q"),
                Expr::binary(Expr::name("a"), Operator::FloorDiv, Expr::name("b"))
            )]
        );
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            read("print(\"hello\", 42)"),
            vec![Stmt::expr(Expr::call(
                Expr::name("print"),
                vec![Expr::string("hello"), Expr::int(42)]
            ))]
        );
    }

    #[test]
    fn test_function_definition() {
        assert_eq!(
            read("def add(a, b=1):\n    return a + b"),
            vec![Stmt::function(
                "add",
                vec!["a".into(), "b".into()],
                vec![Stmt::return_stmt(Some(Expr::binary(
                    Expr::name("a"),
                    Operator::Add,
                    Expr::name("b")
                )))]
            )]
        );
    }

    #[test]
    fn test_elif_nests_like_python_ast() {
        let body = read(
            "if a == 1:\n    x = 1\nelif a == 2:\n    x = 2\nelse:\n    x = 3\n    y = 3\n",
        );
        let Stmt::If { orelse, .. } = &body[0] else {
            panic!("expected If");
        };
        let [Stmt::If { orelse: inner, .. }] = orelse.as_slice() else {
            panic!("expected a single elif link, got {orelse:?}");
        };
        assert_eq!(
            inner,
            &vec![
                Stmt::assign(Expr::name("x"), Expr::int(3)),
                Stmt::assign(Expr::name("y"), Expr::int(3)),
            ]
        );
    }

    #[test]
    fn test_if_inside_else_stays_in_else_body() {
        let body = read("if a:\n    pass\nelse:\n    if b:\n        pass\n    x = 2\n");
        let Stmt::If { orelse, .. } = &body[0] else {
            panic!("expected If");
        };
        assert_eq!(orelse.len(), 2);
        assert!(matches!(&orelse[0], Stmt::If { orelse, .. } if orelse.is_empty()));
        assert_eq!(orelse[1], Stmt::assign(Expr::name("x"), Expr::int(2)));
    }

    #[test]
    fn test_else_of_only_branches_rejected() {
        let two_ifs = "if a:\n    pass\nelse:\n    if b:\n        f()\n    if c:\n        g()\n";
        assert!(matches!(read_python(two_ifs), Err(ReadError::Unsupported(_))));

        let lone_while = "if a:\n    pass\nelse:\n    while b:\n        f()\n";
        assert!(matches!(read_python(lone_while), Err(ReadError::Unsupported(_))));
    }

    #[test]
    fn test_bare_statements() {
        assert_eq!(
            read("f()\nn += 1\nx\n"),
            vec![
                Stmt::expr(Expr::call(Expr::name("f"), vec![])),
                Stmt::aug_assign(Expr::name("n"), Operator::Add, Expr::int(1)),
                Stmt::expr(Expr::name("x")),
            ]
        );
    }

    #[test]
    fn test_continue_rejected() {
        let err = read_python("while x:\n    continue\n").unwrap_err();
        assert!(matches!(err, ReadError::Unsupported(ref what) if what.contains("continue")));
    }

    #[test]
    fn test_for_loop() {
        assert_eq!(
            read("for i in range(1, 5):\n    print(i)"),
            vec![Stmt::for_loop(
                Expr::name("i"),
                Expr::call(Expr::name("range"), vec![Expr::int(1), Expr::int(5)]),
                vec![Stmt::expr(Expr::call(Expr::name("print"), vec![Expr::name("i")]))]
            )]
        );
    }

    #[test]
    fn test_membership_comparison() {
        assert_eq!(
            read("ok = x not in xs"),
            vec![Stmt::assign(
                Expr::name("ok"),
                Expr::compare(Expr::name("x"), CmpOp::NotIn, Expr::name("xs"))
            )]
        );
    }

    #[test]
    fn test_chained_comparison() {
        let body = read("ok = 0 < x <= 10");
        let Stmt::Assign { value, .. } = &body[0] else {
            panic!("expected Assign");
        };
        assert_eq!(
            **value,
            Expr::Compare {
                left: Box::new(Expr::int(0)),
                ops: vec![CmpOp::Lt, CmpOp::LtE],
                comparators: vec![Expr::name("x"), Expr::int(10)],
            }
        );
    }

    #[test]
    fn test_boolean_chain_flattened() {
        let body = read("ok = a and b and c");
        let Stmt::Assign { value, .. } = &body[0] else {
            panic!("expected Assign");
        };
        assert_eq!(
            **value,
            Expr::bool_op(
                BoolOperator::And,
                vec![Expr::name("a"), Expr::name("b"), Expr::name("c")]
            )
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            read("s = 'a\\tb'"),
            vec![Stmt::assign(Expr::name("s"), Expr::string("a\tb"))]
        );
        assert_eq!(
            read("s = r'a\\tb'"),
            vec![Stmt::assign(Expr::name("s"), Expr::string("a\\tb"))]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            read("t = [0x10, 1.5, None, True, {'k': -1}]"),
            vec![Stmt::assign(
                Expr::name("t"),
                Expr::List(vec![
                    Expr::int(16),
                    Expr::float(1.5),
                    Expr::none(),
                    Expr::bool(true),
                    Expr::Dict(vec![(
                        Expr::string("k"),
                        Expr::unary(UnaryOperator::Neg, Expr::int(1))
                    )]),
                ])
            )]
        );
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = read_python("x = = 1").unwrap_err();
        assert!(matches!(err, ReadError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_unsupported_statement_rejected() {
        assert!(matches!(
            read_python("import os").unwrap_err(),
            ReadError::Unsupported(_)
        ));
        assert!(matches!(
            read_python("for x in xs:\n    pass\nelse:\n    pass\n").unwrap_err(),
            ReadError::Unsupported(_)
        ));
    }
}
