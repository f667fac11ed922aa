// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! AST unparser: renders a parsed module back to SPACE source text.
//!
//! The unparser is the inverse of the parser: parsing its output yields a
//! structurally equal AST. Operator nodes re-parenthesize their children
//! where precedence demands it, so shapes like `(3 + 4) * 5` survive the
//! round trip.

use std::fmt::Write as _;

use crate::ast::{AccessChain, Block, Expression, Module, Parameter, Statement, TypeName};

/// Renders a module to source text.
#[must_use]
pub fn unparse_module(module: &Module) -> String {
    let mut unparser = Unparser::new();
    for statement in &module.statements {
        unparser.statement(statement);
    }
    unparser.out
}

/// Renders a single expression to source text.
#[must_use]
pub fn unparse_expression(expression: &Expression) -> String {
    render_expression(expression)
}

struct Unparser {
    out: String,
    indent: usize,
}

impl Unparser {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn block(&mut self, header: &str, block: &Block) {
        self.line(&format!("{header} {{"));
        self.indent += 1;
        for statement in &block.statements {
            self.statement(statement);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Var(decl) => {
                let mut text = String::new();
                if let Some(keyword) = decl.modifier.keyword() {
                    let _ = write!(text, "{keyword} ");
                }
                text.push_str(if decl.constant { "const " } else { "var " });
                text.push_str(&decl.name.name);
                if let Some(type_name) = &decl.type_name {
                    let _ = write!(text, ":{}", render_type(type_name));
                }
                if let Some(initializer) = &decl.initializer {
                    let _ = write!(text, " = {}", render_expression(initializer));
                }
                text.push(';');
                self.line(&text);
            }
            Statement::Function(decl) => {
                let mut header = String::new();
                if let Some(keyword) = decl.modifier.keyword() {
                    let _ = write!(header, "{keyword} ");
                }
                header.push_str("function");
                if let Some(return_type) = &decl.return_type {
                    let _ = write!(header, ":{}", render_type(return_type));
                }
                let _ = write!(
                    header,
                    " {}({})",
                    decl.name.name,
                    render_parameters(&decl.parameters)
                );
                self.block(&header, &decl.body);
            }
            Statement::Class(decl) => {
                let mut header = String::new();
                if let Some(keyword) = decl.modifier.keyword() {
                    let _ = write!(header, "{keyword} ");
                }
                let _ = write!(header, "class {}", decl.name.name);
                if !decl.parameters.is_empty() {
                    let _ = write!(header, "({})", render_parameters(&decl.parameters));
                }
                if let Some(superclass) = &decl.superclass {
                    let _ = write!(header, " extends {}", superclass.name);
                }
                if !decl.interfaces.is_empty() {
                    let names: Vec<&str> =
                        decl.interfaces.iter().map(|i| i.name.as_str()).collect();
                    let _ = write!(header, " with {}", names.join(", "));
                }
                self.block(&header, &decl.body);
            }
            Statement::Constructor(decl) => {
                let header = format!(
                    "this::constructor({})",
                    render_parameters(&decl.parameters)
                );
                self.block(&header, &decl.body);
            }
            Statement::Enum(decl) => {
                let entries: Vec<String> = decl
                    .enumerators
                    .iter()
                    .map(|enumerator| {
                        if enumerator.explicit {
                            format!("{} : {}", enumerator.name.name, enumerator.value)
                        } else {
                            enumerator.name.name.to_string()
                        }
                    })
                    .collect();
                self.line(&format!("enum {} {{ {} }}", decl.name.name, entries.join(", ")));
            }
            Statement::Include(path) => self.line(&format!("include \"{}\";", path.name)),
            Statement::Export(path) => self.line(&format!("export \"{}\";", path.name)),
            Statement::If(stmt) => {
                self.block(&format!("if ({})", render_expression(&stmt.condition)), &stmt.body);
            }
            Statement::ElseIf(stmt) => {
                self.block(
                    &format!("else if ({})", render_expression(&stmt.condition)),
                    &stmt.body,
                );
            }
            Statement::Else(body, _) => self.block("else", body),
            Statement::While(stmt) => {
                self.block(
                    &format!("while ({})", render_expression(&stmt.condition)),
                    &stmt.body,
                );
            }
            Statement::Do(stmt) => {
                self.block("do", &stmt.body);
                // Reattach the trailing condition to the closing brace.
                self.out.pop();
                let _ = writeln!(
                    self.out,
                    " while ({});",
                    render_expression(&stmt.condition)
                );
            }
            Statement::For(stmt) => {
                let init = render_inline_statement(&stmt.init);
                let action = render_inline_statement(&stmt.action);
                let header = format!(
                    "for ({init} {}; {action})",
                    render_expression(&stmt.condition)
                );
                self.block(&header, &stmt.body);
            }
            Statement::Check(stmt) => {
                self.line(&format!("check ({}) {{", render_expression(&stmt.value)));
                self.indent += 1;
                for arm in &stmt.body.statements {
                    self.statement(arm);
                }
                self.indent -= 1;
                self.line("}");
            }
            Statement::Is(arm) => {
                self.line(&format!("is {}:", render_expression(&arm.value)));
                self.indent += 1;
                for statement in &arm.body.statements {
                    self.statement(statement);
                }
                self.indent -= 1;
            }
            Statement::Try(stmt) => self.block("try", &stmt.body),
            Statement::Catch(stmt) => {
                self.block(
                    &format!("catch ({} {})", stmt.error_type.name, stmt.name.name),
                    &stmt.body,
                );
            }
            Statement::Return(value, _) => match value {
                Some(expr) => self.line(&format!("return {};", render_expression(expr))),
                None => self.line("return;"),
            },
            Statement::Break(_) => self.line("break;"),
            Statement::Continue(_) => self.line("continue;"),
            Statement::Assignment(assignment) => {
                self.line(&format!(
                    "{} {} {};",
                    render_expression(&assignment.target),
                    assignment.op.as_str(),
                    render_expression(&assignment.value)
                ));
            }
            Statement::Expression(expr, _) => {
                self.line(&format!("{};", render_expression(expr)));
            }
        }
    }
}

/// Renders a statement without indentation or trailing newline, for
/// for-loop headers. The init keeps its semicolon; the action drops it.
fn render_inline_statement(statement: &Statement) -> String {
    match statement {
        Statement::Var(decl) => {
            let mut text = String::new();
            text.push_str(if decl.constant { "const " } else { "var " });
            text.push_str(&decl.name.name);
            if let Some(type_name) = &decl.type_name {
                let _ = write!(text, ":{}", render_type(type_name));
            }
            if let Some(initializer) = &decl.initializer {
                let _ = write!(text, " = {}", render_expression(initializer));
            }
            text.push(';');
            text
        }
        Statement::Assignment(assignment) => format!(
            "{} {} {}",
            render_expression(&assignment.target),
            assignment.op.as_str(),
            render_expression(&assignment.value)
        ),
        Statement::Expression(expr, _) => render_expression(expr),
        other => format!("{other:?}"),
    }
}

fn render_type(type_name: &TypeName) -> String {
    let mut out = type_name.base.to_string();
    for _ in 0..type_name.dimension {
        out.push_str("[]");
    }
    out
}

fn render_parameters(parameters: &[Parameter]) -> String {
    let rendered: Vec<String> = parameters
        .iter()
        .map(|parameter| {
            parameter.type_name.as_ref().map_or_else(
                || parameter.name.name.to_string(),
                |type_name| format!("{}:{}", parameter.name.name, render_type(type_name)),
            )
        })
        .collect();
    rendered.join(", ")
}

/// Precedence used for re-parenthesization; mirrors the parser's binding
/// powers.
fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Logical { .. } => 10,
        Expression::Comparison { .. } => 20,
        Expression::Binary { op, .. } => match op {
            crate::ast::BinaryOp::Add | crate::ast::BinaryOp::Sub => 30,
            _ => 40,
        },
        _ => u8::MAX,
    }
}

fn render_operand(operand: &Expression, parent: u8, is_right: bool) -> String {
    let child = precedence(operand);
    let needs_parens = if is_right { child <= parent } else { child < parent };
    // Leaves (u8::MAX) never need parentheses.
    if needs_parens && child != u8::MAX {
        format!("({})", render_expression(operand))
    } else {
        render_expression(operand)
    }
}

fn render_expression(expression: &Expression) -> String {
    match expression {
        Expression::Integer(text, _) | Expression::Float(text, _) => text.to_string(),
        Expression::Str(text, _) => format!("\"{text}\""),
        Expression::CharArray(text, _) => format!("'{text}'"),
        Expression::Bool(value, _) => value.to_string(),
        Expression::Null(_) => "null".to_string(),
        Expression::This(_) => "this".to_string(),
        Expression::Identifier(identifier) => identifier.name.to_string(),
        Expression::Binary {
            op, left, right, ..
        } => {
            let parent = precedence(expression);
            format!(
                "{} {} {}",
                render_operand(left, parent, false),
                op.as_str(),
                render_operand(right, parent, true)
            )
        }
        Expression::Comparison {
            op, left, right, ..
        } => {
            let parent = precedence(expression);
            format!(
                "{} {} {}",
                render_operand(left, parent, false),
                op.as_str(),
                render_operand(right, parent, true)
            )
        }
        Expression::Logical {
            op, left, right, ..
        } => {
            let parent = precedence(expression);
            format!(
                "{} {} {}",
                render_operand(left, parent, false),
                op.as_str(),
                render_operand(right, parent, true)
            )
        }
        Expression::Call(call) => {
            let arguments: Vec<String> = call
                .arguments
                .iter()
                .map(|argument| {
                    argument.type_name.as_ref().map_or_else(
                        || render_expression(&argument.value),
                        |type_name| {
                            format!(
                                "{}: {}",
                                render_expression(&argument.value),
                                render_type(type_name)
                            )
                        },
                    )
                })
                .collect();
            format!("{}({})", call.name.name, arguments.join(", "))
        }
        Expression::Access(chain) => render_chain(chain),
        Expression::ArrayAccess {
            target, indices, ..
        } => {
            let mut out = render_expression(target);
            for index in indices {
                let _ = write!(out, "[{}]", render_expression(index));
            }
            out
        }
        Expression::ArrayLiteral { elements, .. } => {
            let rendered: Vec<String> = elements.iter().map(render_expression).collect();
            format!("{{{}}}", rendered.join(", "))
        }
        Expression::IncDec { op, target, .. } => {
            format!("{}{}", render_expression(target), op.as_str())
        }
        Expression::Conditional {
            condition,
            if_true,
            if_false,
            ..
        } => format!(
            "{} ? {} : {}",
            render_expression(condition),
            render_expression(if_true),
            render_expression(if_false)
        ),
        Expression::New { target, .. } => format!("new {}", render_expression(target)),
    }
}

fn render_chain(chain: &AccessChain) -> String {
    let mut out = render_expression(&chain.head);
    for link in &chain.links {
        out.push_str(link.op.as_str());
        out.push_str(&render_expression(&link.element));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::source_analysis::{SourceBuffer, lex};

    fn roundtrip(source: &str) -> (String, String) {
        let buffer = SourceBuffer::new("test.spc", source);
        let first = parse(lex(&buffer).unwrap()).unwrap();
        let printed = unparse_module(&first);

        let reparsed_buffer = SourceBuffer::new("test.spc", printed.clone());
        let second = parse(lex(&reparsed_buffer).unwrap()).unwrap();
        let reprinted = unparse_module(&second);
        (printed, reprinted)
    }

    #[test]
    fn unparse_is_a_parse_fixpoint() {
        let sources = [
            "var x:int = 3 + 4 * 5;",
            "var y = (3 + 4) * 5;",
            "const names:String[] = {\"a\", \"b\"};",
            "class A extends Base with I, J { global function:int f(y:int) { return y; } }",
            "class B { this::constructor(p:int) { } }",
            "enum Level { Low, Mid : 10, High }",
            "include \"../math.spc\";",
            "if (a == 1 and b == 2) { } else if (c == 3) { } else { }",
            "while (x < 10) { break; }",
            "do { x += 1; } while (x < 3);",
            "for (var i = 0; i < 10; i++) { total += i; }",
            "check (mode) { is 1: run(); is 2: stop(); }",
            "try { risky(); } catch (Exception e) { log(e); }",
            "var grade = score >= 90 ? 1 : score >= 50 ? 2 : 3;",
            "var item = List->toList().getItem();",
            "var cell = grid[1][2];",
            "var a = new A(1, \"two\");",
            "this.count += 1;",
        ];
        for source in sources {
            let (printed, reprinted) = roundtrip(source);
            assert_eq!(printed, reprinted, "round trip of {source}");
        }
    }

    #[test]
    fn precedence_parentheses_survive() {
        let (printed, _) = roundtrip("var y = (3 + 4) * 5;");
        assert!(printed.contains("(3 + 4) * 5"), "{printed}");
    }

    #[test]
    fn right_nested_subtraction_keeps_parentheses() {
        let (printed, reprinted) = roundtrip("var d = 10 - (4 - 1);");
        assert!(printed.contains("10 - (4 - 1)"), "{printed}");
        assert_eq!(printed, reprinted);
    }

    #[test]
    fn enum_autoincrement_survives_roundtrip() {
        let (printed, _) = roundtrip("enum Level { Low, Mid : 10, High }");
        assert!(printed.contains("Low, Mid : 10, High"), "{printed}");
    }
}
