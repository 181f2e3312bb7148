//! Python writer.
//!
//! Prints a (possibly rewritten) [`Module`] back in Python syntax, which is
//! handy for inspecting what the rules did without reading Lua.

use crate::ir::*;
use crate::traits::Writer;
use std::fmt::Write;

/// Static instance of the Python writer.
pub static PYTHON_WRITER: PythonWriterImpl = PythonWriterImpl;

/// Python writer implementing the Writer trait.
pub struct PythonWriterImpl;

impl Writer for PythonWriterImpl {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn write(&self, module: &Module) -> String {
        PythonWriter::emit(module)
    }
}

/// Emits a module as Python source code.
pub struct PythonWriter {
    output: String,
    indent: usize,
}

impl PythonWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit a module to Python source.
    pub fn emit(module: &Module) -> String {
        let mut writer = Self::new();
        for stmt in &module.body {
            writer.write_stmt(stmt);
        }
        writer.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Indented suite; Python needs `pass` for an empty one.
    fn write_suite(&mut self, body: &[Stmt]) {
        self.indent += 1;
        if body.is_empty() {
            self.write_indent();
            self.output.push_str("pass\n");
        }
        for stmt in body {
            self.write_stmt(stmt);
        }
        self.indent -= 1;
    }

    /// Write one statement, including its trailing newline.
    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::FunctionDef { name, params, body } => {
                let _ = writeln!(self.output, "def {}({}):", name, params.join(", "));
                self.write_suite(body);
            }

            Stmt::If { test, body, orelse } => {
                self.output.push_str("if ");
                self.write_if_rest(test, body, orelse);
            }

            Stmt::While { test, body } => {
                self.output.push_str("while ");
                self.write_expr(test);
                self.output.push_str(":\n");
                self.write_suite(body);
            }

            Stmt::For { target, iter, body } => {
                self.output.push_str("for ");
                self.write_expr(target);
                self.output.push_str(" in ");
                self.write_expr(iter);
                self.output.push_str(":\n");
                self.write_suite(body);
            }

            Stmt::Assign { targets, value } => {
                for target in targets {
                    self.write_expr(target);
                    self.output.push_str(" = ");
                }
                self.write_expr(value);
                self.output.push('\n');
            }

            Stmt::AugAssign { target, op, value } => {
                self.write_expr(target);
                self.output.push(' ');
                self.write_binary_op(*op);
                self.output.push_str("= ");
                self.write_expr(value);
                self.output.push('\n');
            }

            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value);
                }
                self.output.push('\n');
            }

            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.output.push('\n');
            }

            Stmt::Pass => self.output.push_str("pass\n"),
            Stmt::Break => self.output.push_str("break\n"),
        }
    }

    /// Everything after the `if `/`elif ` keyword.
    fn write_if_rest(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) {
        self.write_expr(test);
        self.output.push_str(":\n");
        self.write_suite(body);

        match orelse {
            [] => {}
            [Stmt::If { test, body, orelse }] => {
                self.write_indent();
                self.output.push_str("elif ");
                self.write_if_rest(test, body, orelse);
            }
            stmts => {
                self.write_indent();
                self.output.push_str("else:\n");
                self.write_suite(stmts);
            }
        }
    }

    fn write_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_expr(expr);
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Constant(constant) => self.write_constant(constant),

            Expr::Name(id) => self.output.push_str(id),

            Expr::BinOp { left, op, right } => {
                self.output.push('(');
                self.write_expr(left);
                self.output.push(' ');
                self.write_binary_op(*op);
                self.output.push(' ');
                self.write_expr(right);
                self.output.push(')');
            }

            Expr::UnaryOp { op, operand } => {
                self.output.push_str(match op {
                    UnaryOperator::Not => "not ",
                    UnaryOperator::Neg => "-",
                    UnaryOperator::Pos => "+",
                });
                self.write_expr(operand);
            }

            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                self.output.push('(');
                self.write_expr(left);
                for (op, rhs) in ops.iter().zip(comparators) {
                    self.output.push(' ');
                    self.write_cmp_op(*op);
                    self.output.push(' ');
                    self.write_expr(rhs);
                }
                self.output.push(')');
            }

            Expr::BoolOp { op, values } => {
                let sep = match op {
                    BoolOperator::And => " and ",
                    BoolOperator::Or => " or ",
                };
                self.output.push('(');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(sep);
                    }
                    self.write_expr(value);
                }
                self.output.push(')');
            }

            Expr::Call { func, args } => {
                self.write_expr(func);
                self.output.push('(');
                self.write_list(args);
                self.output.push(')');
            }

            Expr::Attribute { value, attr } => {
                self.write_expr(value);
                self.output.push('.');
                self.output.push_str(attr);
            }

            Expr::Subscript { value, index } => {
                self.write_expr(value);
                self.output.push('[');
                self.write_expr(index);
                self.output.push(']');
            }

            Expr::List(items) => {
                self.output.push('[');
                self.write_list(items);
                self.output.push(']');
            }

            Expr::Tuple(items) => {
                self.output.push('(');
                self.write_list(items);
                if items.len() == 1 {
                    self.output.push(',');
                }
                self.output.push(')');
            }

            Expr::Dict(pairs) => {
                self.output.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(key);
                    self.output.push_str(": ");
                    self.write_expr(value);
                }
                self.output.push('}');
            }
        }
    }

    fn write_constant(&mut self, constant: &Constant) {
        match constant {
            Constant::None => self.output.push_str("None"),
            Constant::Bool(true) => self.output.push_str("True"),
            Constant::Bool(false) => self.output.push_str("False"),
            Constant::Int(n) => {
                let _ = write!(self.output, "{}", n);
            }
            Constant::Float(n) => {
                let _ = write!(self.output, "{:?}", n);
            }
            Constant::Str(s) => {
                self.output.push('"');
                for c in s.chars() {
                    match c {
                        '"' => self.output.push_str("\\\""),
                        '\\' => self.output.push_str("\\\\"),
                        '\n' => self.output.push_str("\\n"),
                        '\r' => self.output.push_str("\\r"),
                        '\t' => self.output.push_str("\\t"),
                        _ => self.output.push(c),
                    }
                }
                self.output.push('"');
            }
        }
    }

    fn write_binary_op(&mut self, op: Operator) {
        let s = match op {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mult => "*",
            Operator::Div => "/",
            Operator::FloorDiv => "//",
            Operator::Mod => "%",
            Operator::Pow => "**",
        };
        self.output.push_str(s);
    }

    fn write_cmp_op(&mut self, op: CmpOp) {
        let s = match op {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        };
        self.output.push_str(s);
    }
}

impl Default for PythonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(body: Vec<Stmt>) -> String {
        PythonWriter::emit(&Module::new(body))
    }

    #[test]
    fn test_chained_assignment() {
        let stmt = Stmt::assign_many(vec![Expr::name("a"), Expr::name("b")], Expr::int(0));
        assert_eq!(emit(vec![stmt]), "a = b = 0\n");
    }

    #[test]
    fn test_elif_chain() {
        let chain = Stmt::if_stmt(
            Expr::name("a"),
            vec![Stmt::Pass],
            vec![Stmt::if_stmt(
                Expr::name("b"),
                vec![],
                vec![Stmt::Break],
            )],
        );
        assert_eq!(
            emit(vec![chain]),
            "if a:\n    pass\nelif b:\n    pass\nelse:\n    break\n"
        );
    }

    #[test]
    fn test_function_with_aug_assign() {
        let def = Stmt::function(
            "tick",
            vec!["n".into()],
            vec![
                Stmt::aug_assign(Expr::name("n"), Operator::FloorDiv, Expr::int(2)),
                Stmt::return_stmt(Some(Expr::Tuple(vec![Expr::name("n")]))),
            ],
        );
        assert_eq!(
            emit(vec![def]),
            "def tick(n):\n    n //= 2\n    return (n,)\n"
        );
    }

    #[test]
    fn test_membership() {
        let expr = Expr::compare(Expr::name("x"), CmpOp::NotIn, Expr::List(vec![]));
        assert_eq!(emit(vec![Stmt::expr(expr)]), "(x not in [])\n");
    }
}
