//! The occurrence model.
//!
//! Given one matched location, find every structurally equivalent
//! location in scope and describe how to rewrite one or all of them
//! consistently. Scope is the nearest enclosing function body, else
//! the whole file. Everything here is computed fresh per attempt and
//! never persisted.

use refract_fmt::prec;
use refract_ir::ast::{ArrowBody, ExprKind, MemberProp, PropKey, StmtKind, UnaryOp};
use refract_ir::visitor::{walk_expr, walk_stmt, Visitor};
use refract_ir::{ExprArena, ExprId, LineIndex, Module, Position, Selection, Span, StmtId};
use rustc_hash::FxHashSet;

use crate::editor::Modification;
use crate::matcher::{find_closest_expr, ExprContext};

/// Cap on inferred variable names; longer inferences fall back to the
/// generic placeholder.
const MAX_INFERRED_NAME_LEN: usize = 20;

/// Placeholder name when inference fails.
const FALLBACK_NAME: &str = "extracted";

/// Shorthand-property context of a site: rewriting the value of
/// `{ name }` must expand it to `name: <new>` over the whole property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandSite {
    pub key: String,
    pub prop_span: Span,
}

/// One expression location, with everything needed to rewrite it in
/// place.
#[derive(Debug, Clone)]
pub struct ExprSite {
    pub id: ExprId,
    pub span: Span,
    /// Minimum binding power of the slot this expression sits in; a
    /// weaker replacement must be parenthesized.
    pub slot_power: u8,
    pub in_assign_target: bool,
    pub shorthand: Option<ShorthandSite>,
    /// Scope-level statement this site lives under.
    pub top_stmt: StmtId,
}

/// Collect every expression site under `roots`, in source order.
pub(crate) fn collect_sites(arena: &ExprArena, roots: &[StmtId]) -> Vec<ExprSite> {
    let mut collector = SiteCollector {
        arena,
        sites: Vec::new(),
        top_stmt: None,
        assign_depth: 0,
    };
    for &root in roots {
        collector.top_stmt = Some(root);
        collector.stmt(root);
    }
    collector.sites
}

struct SiteCollector<'a> {
    arena: &'a ExprArena,
    sites: Vec<ExprSite>,
    top_stmt: Option<StmtId>,
    assign_depth: u32,
}

impl SiteCollector<'_> {
    fn stmt(&mut self, id: StmtId) {
        match &self.arena.stmt(id).kind {
            StmtKind::Expr(expr) => self.expr(*expr, 0, None),
            StmtKind::VarDecl(decl) => {
                for declarator in &decl.declarators {
                    if let Some(init) = declarator.init {
                        self.expr(init, prec::ASSIGN, None);
                    }
                }
            }
            StmtKind::Func(func) => self.stmt(func.body),
            StmtKind::Return(arg) => {
                if let Some(arg) = arg {
                    self.expr(*arg, 0, None);
                }
            }
            StmtKind::If { test, cons, alt } => {
                self.expr(*test, 0, None);
                self.stmt(*cons);
                if let Some(alt) = alt {
                    self.stmt(*alt);
                }
            }
            StmtKind::While { test, body } => {
                self.expr(*test, 0, None);
                self.stmt(*body);
            }
            StmtKind::Block(stmts) => {
                for &stmt in stmts {
                    self.stmt(stmt);
                }
            }
            StmtKind::Empty => {}
        }
    }

    /// Record a site, then descend with the slot powers the printer
    /// would demand for each child position.
    fn expr(&mut self, id: ExprId, slot_power: u8, shorthand: Option<ShorthandSite>) {
        let Some(top_stmt) = self.top_stmt else {
            return;
        };
        self.sites.push(ExprSite {
            id,
            span: self.arena.expr_span(id),
            slot_power,
            in_assign_target: self.assign_depth > 0,
            shorthand,
            top_stmt,
        });

        match &self.arena.expr(id).kind {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Num { .. }
            | ExprKind::Str { .. }
            | ExprKind::Ident(_) => {}
            ExprKind::Template { exprs, .. } => {
                for &expr in exprs {
                    self.expr(expr, 0, None);
                }
            }
            ExprKind::Member { object, property } => {
                self.expr(*object, prec::POSTFIX, None);
                if let MemberProp::Computed(expr) = property {
                    self.expr(*expr, 0, None);
                }
            }
            ExprKind::Call { callee, args } => {
                self.expr(*callee, prec::POSTFIX, None);
                for &arg in args {
                    self.expr(arg, prec::ASSIGN, None);
                }
            }
            ExprKind::Unary { op, arg } => {
                let min = match op {
                    UnaryOp::Minus | UnaryOp::Plus => prec::UNARY + 1,
                    _ => prec::UNARY,
                };
                self.expr(*arg, min, None);
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let power = op.precedence();
                self.expr(*lhs, power, None);
                self.expr(*rhs, power + 1, None);
            }
            ExprKind::Logical { op, lhs, rhs } => {
                let power = op.precedence();
                self.expr(*lhs, power, None);
                self.expr(*rhs, power + 1, None);
            }
            ExprKind::Assign { target, value, .. } => {
                self.assign_depth += 1;
                self.expr(*target, prec::POSTFIX, None);
                self.assign_depth -= 1;
                self.expr(*value, prec::ASSIGN, None);
            }
            ExprKind::Cond { test, cons, alt } => {
                self.expr(*test, prec::COND + 1, None);
                self.expr(*cons, prec::ASSIGN, None);
                self.expr(*alt, prec::ASSIGN, None);
            }
            ExprKind::Arrow { body, .. } => match body {
                ArrowBody::Expr(expr) => self.expr(*expr, prec::ASSIGN, None),
                ArrowBody::Block(block) => self.stmt(*block),
            },
            ExprKind::Function { body, .. } => self.stmt(*body),
            ExprKind::Object { props } => {
                for prop in props {
                    if let PropKey::Computed(key) = &prop.key {
                        self.expr(*key, 0, None);
                    }
                    let shorthand = match (&prop.key, prop.shorthand) {
                        (PropKey::Ident(key), true) => Some(ShorthandSite {
                            key: key.clone(),
                            prop_span: prop.span,
                        }),
                        _ => None,
                    };
                    self.expr(prop.value, prec::ASSIGN, shorthand);
                }
            }
            ExprKind::Array { elements } => {
                for &element in elements {
                    self.expr(element, prec::ASSIGN, None);
                }
            }
        }
    }
}

/// The allow-list of extractable contexts: any expression except
/// assignments and write targets. Declaration-target identifiers,
/// static member keys, and raw template fragments are not expression
/// nodes, so they can never match.
pub fn is_extractable(arena: &ExprArena, id: ExprId, context: ExprContext) -> bool {
    !context.in_assign_target && !matches!(arena.expr(id).kind, ExprKind::Assign { .. })
}

/// One occurrence of the matched pattern.
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub id: ExprId,
    pub span: Span,
    pub selection: Selection,
    /// Scope-level statement containing this occurrence.
    pub top_stmt: StmtId,
    pub shorthand: Option<ShorthandSite>,
}

impl Occurrence {
    /// The edit replacing this occurrence with a reference to `name`.
    pub fn reference_modification(&self, index: &LineIndex, name: &str) -> Modification {
        match &self.shorthand {
            Some(shorthand) if shorthand.key != name => Modification {
                code: format!("{}: {}", shorthand.key, name),
                selection: index.selection_of(shorthand.prop_span),
            },
            _ => Modification {
                code: name.to_owned(),
                selection: self.selection,
            },
        }
    }
}

/// The selected occurrence plus every structurally equivalent one in
/// scope.
#[derive(Debug, Clone)]
pub struct ExtractionSite {
    pub selected: Occurrence,
    pub others: Vec<Occurrence>,
}

impl ExtractionSite {
    /// The occurrences a given answer covers: just the selected one,
    /// or all of them.
    pub fn chosen(&self, all: bool) -> Vec<&Occurrence> {
        let mut chosen: Vec<&Occurrence> = vec![&self.selected];
        if all {
            chosen.extend(self.others.iter());
        }
        chosen.sort_by_key(|occurrence| occurrence.span.start);
        chosen
    }

    /// Where the declaration goes: the start of the scope-level
    /// statement holding the topmost chosen occurrence. Guarantees the
    /// new variable is visible to every replaced use.
    pub fn insertion_anchor(
        &self,
        index: &LineIndex,
        arena: &ExprArena,
        all: bool,
    ) -> Position {
        let chosen = self.chosen(all);
        // `chosen` is sorted and never empty: the selected occurrence
        // is always in it.
        let topmost = &chosen[0];
        index.selection_of(arena.stmt_span(topmost.top_stmt)).start()
    }
}

/// Run the occurrence search for an extraction at `target`.
///
/// Returns `None` when nothing extractable encloses the target.
pub fn find_extraction_site(
    module: &Module,
    index: &LineIndex,
    target: Span,
) -> Option<ExtractionSite> {
    let matched = find_closest_expr(module, target, is_extractable)?;
    let arena = &module.arena;

    let roots: Vec<StmtId> = match matched.fn_bodies.last() {
        Some(&block) => match &arena.stmt(block).kind {
            StmtKind::Block(stmts) => stmts.clone(),
            _ => vec![block],
        },
        None => module.body.clone(),
    };

    let mut selected = None;
    let mut others = Vec::new();
    for site in collect_sites(arena, &roots) {
        if !arena.same_expr(site.id, matched.id) {
            continue;
        }
        let occurrence = Occurrence {
            id: site.id,
            span: site.span,
            selection: index.selection_of(site.span),
            top_stmt: site.top_stmt,
            shorthand: site.shorthand,
        };
        if site.span == matched.span {
            selected = Some(occurrence);
        } else if !site.in_assign_target {
            others.push(occurrence);
        }
    }

    tracing::debug!(
        matched = ?matched.span,
        others = others.len(),
        "occurrence search complete"
    );
    selected.map(|selected| ExtractionSite { selected, others })
}

/// Infer a variable name for the extracted expression, falling back
/// to a generic placeholder when inference fails or the name would be
/// unreasonably long.
pub fn inferred_variable_name(arena: &ExprArena, id: ExprId) -> String {
    let base = match &arena.expr(id).kind {
        ExprKind::Str { value, .. } => camel_cased(value),
        ExprKind::Member {
            property: MemberProp::Ident { name, .. },
            ..
        } => Some(name.clone()),
        ExprKind::Call { callee, .. } => match &arena.expr(*callee).kind {
            ExprKind::Ident(name) => Some(format!("{name}Result")),
            ExprKind::Member {
                property: MemberProp::Ident { name, .. },
                ..
            } => Some(format!("{name}Result")),
            _ => None,
        },
        _ => None,
    };

    match base {
        Some(name)
            if !name.is_empty()
                && name.len() <= MAX_INFERRED_NAME_LEN
                && name.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic()) =>
        {
            name
        }
        _ => FALLBACK_NAME.to_owned(),
    }
}

fn camel_cased(value: &str) -> Option<String> {
    let mut words = value
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty());
    let first = words.next()?;
    let mut name = first.to_lowercase();
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            name.extend(head.to_uppercase());
            name.push_str(&chars.as_str().to_lowercase());
        }
    }
    Some(name)
}

/// Resolve `base` against every name already present in the module,
/// appending a numeric suffix until free.
pub fn free_variable_name(module: &Module, base: &str) -> String {
    let taken = taken_names(module);
    if !taken.contains(base) {
        return base.to_owned();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn taken_names(module: &Module) -> FxHashSet<String> {
    struct Names {
        taken: FxHashSet<String>,
    }

    impl<'ast> Visitor<'ast> for Names {
        fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
            match &arena.expr(id).kind {
                ExprKind::Ident(name) => {
                    self.taken.insert(name.clone());
                }
                ExprKind::Function {
                    name: Some(name), ..
                } => {
                    self.taken.insert(name.clone());
                }
                _ => {}
            }
            walk_expr(self, id, arena);
        }

        fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
            if let StmtKind::Func(func) = &arena.stmt(id).kind {
                self.taken.insert(func.name.clone());
            }
            walk_stmt(self, id, arena);
        }

        fn visit_pattern(
            &mut self,
            pattern: &'ast refract_ir::ast::Pattern,
            arena: &'ast ExprArena,
        ) {
            let mut bound = Vec::new();
            pattern.bound_names(&mut bound);
            for name in bound {
                self.taken.insert(name.to_owned());
            }
            refract_ir::visitor::walk_pattern(self, pattern, arena);
        }
    }

    let mut names = Names {
        taken: FxHashSet::default(),
    };
    names.visit_module(module);
    names.taken
}

/// Identifier references of one declared variable, with the
/// constraints that decide whether inlining it is allowed.
///
/// The destructured variant delegates through its owner: references
/// are rewritten to `<owner>.<key>` instead of the bare value.
#[derive(Debug, Clone)]
pub struct VariableOccurrences {
    /// Selection removing the declaration (or the one declarator).
    pub code_to_remove_selection: Selection,
    /// Selection of the initializer text to read.
    pub value_selection: Selection,
    /// Binding power of the initializer expression.
    pub value_power: u8,
    /// Destructured property key, when the binding came from an
    /// object pattern.
    pub access_key: Option<String>,
    /// Another declaration of the same name exists in scope.
    pub is_redeclared: bool,
    /// The declaration is exported.
    pub is_exported: bool,
    /// Reference sites, in source order.
    pub references: Vec<IdentifierReference>,
}

/// One identifier reference to update.
#[derive(Debug, Clone)]
pub struct IdentifierReference {
    pub selection: Selection,
    pub slot_power: u8,
    pub shorthand: Option<ShorthandReference>,
}

/// Shorthand-property context of a reference, in editor coordinates.
#[derive(Debug, Clone)]
pub struct ShorthandReference {
    pub key: String,
    pub selection: Selection,
}

impl VariableOccurrences {
    pub fn has_identifiers_to_update(&self) -> bool {
        !self.references.is_empty()
    }

    /// Edits substituting `code` (the initializer text, read from the
    /// buffer) at every reference.
    pub fn update_identifiers_with(&self, code: &str) -> Vec<Modification> {
        self.references
            .iter()
            .map(|reference| {
                let inlined = match &self.access_key {
                    Some(key) => format!(
                        "{}.{key}",
                        parenthesized_below(code, self.value_power, prec::POSTFIX)
                    ),
                    None => parenthesized_below(code, self.value_power, reference.slot_power),
                };
                match &reference.shorthand {
                    Some(shorthand) => Modification {
                        code: format!("{}: {inlined}", shorthand.key),
                        selection: shorthand.selection,
                    },
                    None => Modification {
                        code: inlined,
                        selection: reference.selection,
                    },
                }
            })
            .collect()
    }
}

/// Wrap `code` in parentheses when its power is below what the slot
/// demands.
fn parenthesized_below(code: &str, power: u8, min_power: u8) -> String {
    if power < min_power {
        format!("({code})")
    } else {
        code.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Module {
        match refract_parse::parse(source) {
            Ok(module) => module,
            Err(err) => panic!("parse failed: {err}"),
        }
    }

    #[test]
    fn reports_exactly_one_other_occurrence() {
        let source = "console.log(\"Hi\");\nsend(\"Hi\");\n";
        let module = parse(source);
        let index = LineIndex::new(source);
        // Cursor inside the first "Hi".
        let Some(site) = find_extraction_site(&module, &index, Span::point(14)) else {
            panic!("expected an extraction site");
        };
        assert_eq!(site.others.len(), 1);
        assert_eq!(site.selected.selection, Selection::from_coords(0, 12, 0, 16));
        assert_eq!(site.others[0].selection, Selection::from_coords(1, 5, 1, 9));
    }

    #[test]
    fn occurrences_do_not_cross_function_scope() {
        let source = "function f() { send(\"Hi\"); }\nsend(\"Hi\");\n";
        let module = parse(source);
        let index = LineIndex::new(source);
        // Inside the function: the top-level "Hi" is out of scope.
        let Some(site) = find_extraction_site(&module, &index, Span::point(21)) else {
            panic!("expected an extraction site");
        };
        assert_eq!(site.others.len(), 0);
    }

    #[test]
    fn insertion_anchor_is_topmost_chosen_occurrence() {
        let source = "send(\"Hi\");\nconsole.log(\"Hi\");\n";
        let module = parse(source);
        let index = LineIndex::new(source);
        // Select the second occurrence.
        let Some(site) = find_extraction_site(&module, &index, Span::point(25)) else {
            panic!("expected an extraction site");
        };
        // Replacing only the selected one anchors at its own line.
        assert_eq!(
            site.insertion_anchor(&index, &module.arena, false),
            Position::new(1, 0)
        );
        // Replacing all anchors above the first.
        assert_eq!(
            site.insertion_anchor(&index, &module.arena, true),
            Position::new(0, 0)
        );
    }

    #[test]
    fn write_targets_are_not_occurrences() {
        let source = "use(a.b);\na.b = 1;\n";
        let module = parse(source);
        let index = LineIndex::new(source);
        // Cursor on the `b` of the first `a.b`.
        let Some(site) = find_extraction_site(&module, &index, Span::point(6)) else {
            panic!("expected an extraction site");
        };
        assert_eq!(site.others.len(), 0);
    }

    #[test]
    fn infers_name_from_string_content() {
        let source = "console.log(\"Hello\");";
        let module = parse(source);
        let Some(matched) =
            find_closest_expr(&module, Span::point(14), |arena, id, _| {
                matches!(arena.expr(id).kind, ExprKind::Str { .. })
            })
        else {
            panic!("expected a match");
        };
        assert_eq!(inferred_variable_name(&module.arena, matched.id), "hello");
    }

    #[test]
    fn long_inferred_names_fall_back() {
        let source = "log(\"An exceedingly long greeting indeed\");";
        let module = parse(source);
        let Some(matched) =
            find_closest_expr(&module, Span::point(6), |arena, id, _| {
                matches!(arena.expr(id).kind, ExprKind::Str { .. })
            })
        else {
            panic!("expected a match");
        };
        assert_eq!(
            inferred_variable_name(&module.arena, matched.id),
            "extracted"
        );
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let module = parse("const hello = 1;\nconst hello2 = 2;\n");
        assert_eq!(free_variable_name(&module, "hello"), "hello3");
        assert_eq!(free_variable_name(&module, "greeting"), "greeting");
    }

    #[test]
    fn camel_casing() {
        assert_eq!(camel_cased("Hello"), Some("hello".to_owned()));
        assert_eq!(camel_cased("Hello world"), Some("helloWorld".to_owned()));
        assert_eq!(camel_cased("  "), None);
    }
}
