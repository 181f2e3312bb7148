//! Lua writer.
//!
//! Emits a rewritten [`Module`] as Lua source. This is surface-level: a
//! construct with no Lua spelling (a `for` over anything but `range`, an
//! unrewritten membership test) is printed as the closest Lua form without
//! further checks.

use crate::ir::*;
use crate::traits::Writer;
use std::fmt::Write;

/// Static instance of the Lua writer.
pub static LUA_WRITER: LuaWriterImpl = LuaWriterImpl;

/// Lua writer implementing the Writer trait.
pub struct LuaWriterImpl;

impl Writer for LuaWriterImpl {
    fn language(&self) -> &'static str {
        "lua"
    }

    fn extension(&self) -> &'static str {
        "lua"
    }

    fn write(&self, module: &Module) -> String {
        LuaWriter::emit(module)
    }
}

/// Emits a module as Lua source code.
pub struct LuaWriter {
    output: String,
    indent: usize,
}

impl LuaWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Emit a module to Lua source.
    pub fn emit(module: &Module) -> String {
        let mut writer = Self::new();
        writer.write_block(&module.body);
        writer.output
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn write_body(&mut self, body: &[Stmt]) {
        self.indent += 1;
        self.write_block(body);
        self.indent -= 1;
    }

    /// `return` and `break` must end a Lua block; anywhere else they get a
    /// `do ... end` of their own.
    fn write_block(&mut self, body: &[Stmt]) {
        for (i, stmt) in body.iter().enumerate() {
            let is_last = i + 1 == body.len();
            if !is_last && matches!(stmt, Stmt::Return(_) | Stmt::Break) {
                self.write_indent();
                self.output.push_str("do\n");
                self.write_body(std::slice::from_ref(stmt));
                self.write_end();
            } else {
                self.write_stmt(stmt);
            }
            self.output.push('\n');
        }
    }

    fn write_end(&mut self) {
        self.write_indent();
        self.output.push_str("end");
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::FunctionDef { name, params, body } => {
                let _ = writeln!(self.output, "function {}({})", name, params.join(", "));
                self.write_body(body);
                self.write_end();
            }

            Stmt::If { test, body, orelse } => self.write_if(test, body, orelse),

            Stmt::While { test, body } => {
                self.output.push_str("while ");
                self.write_expr(test);
                self.output.push_str(" do\n");
                self.write_body(body);
                self.write_end();
            }

            Stmt::For { target, iter, body } => {
                self.output.push_str("for ");
                match iter {
                    Expr::Call { func, args }
                        if func.as_name() == Some("range") && matches!(args.len(), 2 | 3) =>
                    {
                        // Lua's numeric for includes its upper bound.
                        self.write_expr(target);
                        self.output.push_str(" = ");
                        self.write_expr(&args[0]);
                        self.output.push_str(", ");
                        self.write_expr(&Expr::binary(args[1].clone(), Operator::Sub, Expr::int(1)));
                        if let Some(step) = args.get(2) {
                            self.output.push_str(", ");
                            self.write_expr(step);
                        }
                    }
                    _ => {
                        self.output.push_str("_, ");
                        self.write_expr(target);
                        self.output.push_str(" in ipairs(");
                        self.write_expr(iter);
                        self.output.push(')');
                    }
                }
                self.output.push_str(" do\n");
                self.write_body(body);
                self.write_end();
            }

            Stmt::Assign { targets, value } => {
                self.write_list(targets);
                self.output.push_str(" = ");
                for i in 0..targets.len() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(value);
                }
            }

            Stmt::AugAssign { target, op, value } => {
                self.write_expr(target);
                self.output.push_str(" = ");
                self.write_expr(target);
                self.output.push(' ');
                self.write_binary_op(*op);
                self.output.push(' ');
                self.write_expr(value);
            }

            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expr(value);
                }
            }

            Stmt::Expr(expr) => self.write_expr(expr),

            Stmt::Pass => self.output.push_str("-- pass"),

            Stmt::Break => self.output.push_str("break"),
        }
    }

    /// `if`/`elseif`/`else` with a single closing `end`.
    fn write_if(&mut self, test: &Expr, body: &[Stmt], orelse: &[Stmt]) {
        self.output.push_str("if ");
        self.write_expr(test);
        self.output.push_str(" then\n");
        self.write_body(body);

        let mut orelse = orelse;
        loop {
            match orelse {
                [] => break,
                [Stmt::If { test, body, orelse: next }] => {
                    self.write_indent();
                    self.output.push_str("elseif ");
                    self.write_expr(test);
                    self.output.push_str(" then\n");
                    self.write_body(body);
                    orelse = next.as_slice();
                }
                stmts => {
                    self.write_indent();
                    self.output.push_str("else\n");
                    self.write_body(stmts);
                    break;
                }
            }
        }
        self.write_end();
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
                match op {
                    UnaryOperator::Not => self.output.push_str("not "),
                    UnaryOperator::Neg => self.output.push('-'),
                    UnaryOperator::Pos => {}
                }
                self.write_expr(operand);
            }

            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                // `a < b < c` is `a < b and b < c`.
                self.output.push('(');
                let mut lhs: &Expr = left;
                for (i, (op, rhs)) in ops.iter().zip(comparators).enumerate() {
                    if i > 0 {
                        self.output.push_str(" and ");
                    }
                    self.write_expr(lhs);
                    self.output.push(' ');
                    self.write_cmp_op(*op);
                    self.output.push(' ');
                    self.write_expr(rhs);
                    lhs = rhs;
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

            Expr::List(items) | Expr::Tuple(items) => {
                self.output.push('{');
                self.write_list(items);
                self.output.push('}');
            }

            Expr::Dict(pairs) => {
                self.output.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.output.push('[');
                    self.write_expr(key);
                    self.output.push_str("] = ");
                    self.write_expr(value);
                }
                self.output.push('}');
            }
        }
    }

    fn write_constant(&mut self, constant: &Constant) {
        match constant {
            Constant::None => self.output.push_str("nil"),
            Constant::Bool(true) => self.output.push_str("true"),
            Constant::Bool(false) => self.output.push_str("false"),
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
                        '\0' => self.output.push_str("\\0"),
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
            Operator::Pow => "^",
        };
        self.output.push_str(s);
    }

    fn write_cmp_op(&mut self, op: CmpOp) {
        let s = match op {
            CmpOp::Eq | CmpOp::Is | CmpOp::In => "==",
            CmpOp::NotEq | CmpOp::IsNot | CmpOp::NotIn => "~=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
        };
        self.output.push_str(s);
    }
}

impl Default for LuaWriter {
    fn default() -> Self {
        Self::new()
    }
}
