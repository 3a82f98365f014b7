//! Canonical type notation.
//!
//! Converts a type-expression node into one compact canonical string by
//! structural recursion: a single match on the kind tag, one fixed
//! template per kind. Conditional types render symbolically; nothing is
//! evaluated. Member order in unions and intersections follows
//! declaration order.

use crate::ast::{
    FunctionShape, Member, Param, TemplatePart, TupleSlot, TypeExpr, TypeParam,
};

/// Rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationOptions {
    /// Prefix every rendered node with its raw kind name and modifiers.
    pub verbose: bool,
}

/// Render one type expression into canonical notation.
pub fn render(ty: &TypeExpr, opts: &NotationOptions) -> String {
    let body = match ty {
        TypeExpr::Token(tok) => tok.to_string(),
        TypeExpr::Named { name, args } => {
            if args.is_empty() {
                name.clone()
            } else {
                let rendered: Vec<String> = args.iter().map(|a| render(a, opts)).collect();
                format!("{}<{}>", name, rendered.join(" "))
            }
        }
        TypeExpr::StringLit(s) => format!("\"{s}\""),
        TypeExpr::NumberLit(n) => n.clone(),
        TypeExpr::BoolLit(b) => b.to_string(),
        TypeExpr::Array(inner) => format!("(array {})", render(inner, opts)),
        TypeExpr::Union(arms) => {
            let rendered: Vec<String> = arms.iter().map(|a| render(a, opts)).collect();
            format!("(or {})", rendered.join(" "))
        }
        TypeExpr::Intersection(arms) => {
            let rendered: Vec<String> = arms.iter().map(|a| render(a, opts)).collect();
            format!("(and {})", rendered.join(" "))
        }
        TypeExpr::Tuple(slots) => {
            let rendered: Vec<String> = slots.iter().map(|s| render_slot(s, opts)).collect();
            format!("(tuple {})", rendered.join(" "))
        }
        TypeExpr::Function(shape) => render_callable("function", shape, opts),
        TypeExpr::Constructor(shape) => render_callable("new", shape, opts),
        TypeExpr::Literal(members) => render_literal(members, opts),
        TypeExpr::Mapped {
            key,
            constraint,
            value,
            optional,
            ..
        } => {
            let body = format!(
                "{{:{} in {} {}}}",
                key,
                render(constraint, opts),
                render(value, opts)
            );
            if *optional {
                format!("(optional {body})")
            } else {
                body
            }
        }
        TypeExpr::Conditional {
            check,
            extends,
            then,
            otherwise,
        } => format!(
            "(if (extends {} {}) {} {})",
            render(check, opts),
            render(extends, opts),
            render(then, opts),
            render(otherwise, opts)
        ),
        TypeExpr::Operator { op, operand } => {
            format!("({} {})", op.text(), render(operand, opts))
        }
        TypeExpr::Query(name) => format!("(typeof {name})"),
        TypeExpr::Index { object, index } => {
            format!("(index {} {})", render(object, opts), render(index, opts))
        }
        TypeExpr::Predicate { target, ty } => {
            format!("(is {} {})", target, render(ty, opts))
        }
        TypeExpr::Template(parts) => {
            let rendered: Vec<String> = parts
                .iter()
                .map(|p| match p {
                    TemplatePart::Str(s) => format!("\"{s}\""),
                    TemplatePart::Ty(t) => render(t, opts),
                })
                .collect();
            format!("(template {})", rendered.join(" "))
        }
        TypeExpr::Infer(name) => format!("(infer {name})"),
        TypeExpr::Paren(inner) => render(inner, opts),
        TypeExpr::This => "this".to_string(),
        TypeExpr::Rest(inner) => format!("(rest {})", render(inner, opts)),
        // The catalog stays complete with a flagged gap instead of
        // aborting on a kind this renderer does not know
        TypeExpr::Unknown(kind) => format!("<unknown:{kind}>"),
    };

    if opts.verbose {
        format!("[{}{}]{}", ty.kind_name(), modifier_list(ty), body)
    } else {
        body
    }
}

/// Render a parameter's type, wrapping optional and rest markers.
pub fn render_param(param: &Param, opts: &NotationOptions) -> String {
    let ty = match &param.ty {
        Some(ty) => render(ty, opts),
        None => "any".to_string(),
    };
    if param.rest {
        format!("(rest {ty})")
    } else if param.optional {
        format!("(optional {ty})")
    } else {
        ty
    }
}

/// Render a type parameter: bare name, or `(extends NAME CONSTRAINT)`.
pub fn render_type_param(tp: &TypeParam, opts: &NotationOptions) -> String {
    match &tp.constraint {
        Some(c) => format!("(extends {} {})", tp.name, render(c, opts)),
        None => tp.name.clone(),
    }
}

fn render_callable(keyword: &str, shape: &FunctionShape, opts: &NotationOptions) -> String {
    let params: Vec<String> = shape.params.iter().map(|p| render_param(p, opts)).collect();
    format!(
        "({}{}{})<{}>",
        keyword,
        if params.is_empty() { "" } else { " " },
        params.join(" "),
        render(&shape.ret, opts)
    )
}

fn render_literal(members: &[Member], opts: &NotationOptions) -> String {
    let mut parts = Vec::new();

    for member in members {
        match member {
            Member::Property(p) => {
                let ty = match &p.ty {
                    Some(ty) => render(ty, opts),
                    None => "any".to_string(),
                };
                let name = if p.optional {
                    format!("{}?", p.name)
                } else {
                    p.name.to_string()
                };
                parts.push(format!("{name} {ty}"));
            }
            Member::Method(m) => {
                let shape = FunctionShape {
                    type_params: m.type_params.clone(),
                    params: m.params.clone(),
                    ret: m.ret.clone().unwrap_or(TypeExpr::Token(
                        crate::ast::TypeToken::Any,
                    )),
                };
                parts.push(format!(
                    "{} {}",
                    m.name,
                    render_callable("function", &shape, opts)
                ));
            }
            Member::Call(sig) => {
                let shape = FunctionShape {
                    type_params: sig.type_params.clone(),
                    params: sig.params.clone(),
                    ret: sig
                        .ret
                        .clone()
                        .unwrap_or(TypeExpr::Token(crate::ast::TypeToken::Any)),
                };
                parts.push(render_callable("function", &shape, opts));
            }
            Member::Construct(sig) => {
                let shape = FunctionShape {
                    type_params: sig.type_params.clone(),
                    params: sig.params.clone(),
                    ret: sig
                        .ret
                        .clone()
                        .unwrap_or(TypeExpr::Token(crate::ast::TypeToken::Any)),
                };
                parts.push(render_callable("new", &shape, opts));
            }
            Member::Index(sig) => {
                parts.push(format!(
                    "(index {} {})",
                    render(&sig.key_type, opts),
                    render(&sig.value_type, opts)
                ));
            }
        }
    }

    format!("{{{}}}", parts.join(" "))
}

fn render_slot(slot: &TupleSlot, opts: &NotationOptions) -> String {
    let ty = render(&slot.ty, opts);
    if slot.rest {
        format!("(rest {ty})")
    } else if slot.optional {
        format!("(optional {ty})")
    } else {
        ty
    }
}

fn modifier_list(ty: &TypeExpr) -> String {
    let mut mods: Vec<&str> = Vec::new();
    if let TypeExpr::Mapped {
        optional, readonly, ..
    } = ty
    {
        if *optional {
            mods.push("optional");
        }
        if *readonly {
            mods.push("readonly");
        }
    }
    if mods.is_empty() {
        String::new()
    } else {
        format!(" {}", mods.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_type_str;

    fn norm(src: &str) -> String {
        let ty = parse_type_str(src).unwrap();
        render(&ty, &NotationOptions::default())
    }

    #[test]
    fn array_of_token() {
        assert_eq!(norm("string[]"), "(array string)");
    }

    #[test]
    fn union_keeps_declaration_order() {
        assert_eq!(norm("\"b\" | \"a\" | 3"), "(or \"b\" \"a\" 3)");
    }

    #[test]
    fn intersection() {
        assert_eq!(norm("A & B"), "(and A B)");
    }

    #[test]
    fn conditional_renders_symbolically() {
        assert_eq!(norm("T extends U ? X : Y"), "(if (extends T U) X Y)");
    }

    #[test]
    fn mapped_type_with_optional_wrapper() {
        assert_eq!(
            norm("{ [K in keyof T]?: T[K] }"),
            "(optional {:K in (keyof T) (index T K)})"
        );
    }

    #[test]
    fn function_type() {
        assert_eq!(
            norm("(a: string, b?: number) => void"),
            "(function string (optional number))<void>"
        );
    }

    #[test]
    fn constructor_type() {
        assert_eq!(norm("new (x: string) => W"), "(new string)<W>");
    }

    #[test]
    fn nullary_function() {
        assert_eq!(norm("() => void"), "(function)<void>");
    }

    #[test]
    fn named_reference_with_and_without_args() {
        assert_eq!(norm("Promise<string>"), "Promise<string>");
        assert_eq!(norm("Window"), "Window");
        assert_eq!(norm("Map<K, V>"), "Map<K V>");
    }

    #[test]
    fn template_literal() {
        assert_eq!(norm("`on${string}`"), "(template \"on\" string)");
    }

    #[test]
    fn tuple_with_rest() {
        assert_eq!(
            norm("[string, ...number[]]"),
            "(tuple string (rest (array number)))"
        );
    }

    #[test]
    fn predicate_and_query() {
        assert_eq!(norm("x is HTMLElement"), "(is x HTMLElement)");
        assert_eq!(norm("typeof globalThis"), "(typeof globalThis)");
    }

    #[test]
    fn type_literal() {
        assert_eq!(
            norm("{ a: string; b?: number }"),
            "{a string b? number}"
        );
    }

    #[test]
    fn parenthesized_is_transparent() {
        assert_eq!(norm("(string | null)[]"), "(array (or string null))");
    }

    #[test]
    fn unknown_kind_renders_marker() {
        let ty = TypeExpr::Unknown("TemplateHead".to_string());
        assert_eq!(
            render(&ty, &NotationOptions::default()),
            "<unknown:TemplateHead>"
        );
    }

    #[test]
    fn verbose_mode_prefixes_kind_names() {
        let ty = parse_type_str("string | number").unwrap();
        let rendered = render(&ty, &NotationOptions { verbose: true });
        assert_eq!(rendered, "[Union](or [Token]string [Token]number)");
    }
}
