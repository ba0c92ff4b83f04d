use std::ops::Range;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, CallExpression, ExportAllDeclaration, ExportDefaultDeclaration,
    ExportNamedDeclaration, ImportDeclaration, Statement, TSExportAssignment,
    TSImportEqualsDeclaration,
};
use oxc_ast_visit::{Visit, walk};
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::SemanticBuilder;
use oxc_span::{GetSpan, SourceType};

use crate::syntax::error::SyntaxError;

/// Bracket nesting beyond this is rejected before the parser sees the source.
pub(crate) const MAX_NESTING: usize = 512;

const PARSER_STACK_BYTES: usize = 32 * 1024 * 1024;

/// Generator that region code runs inside, mirroring the scene factory's callback.
const BODY_OPEN: &str = "function* scene(view) {\n";
const BODY_CLOSE: &str = "\n}";

/// Check `code` as the statements of a scene generator body.
pub(crate) fn check_body(code: &str) -> Result<(), Vec<SyntaxError>> {
    if let Some(at) = excessive_nesting(code) {
        return Err(vec![nesting_error(at)]);
    }
    let wrapped = format!("{BODY_OPEN}{code}{BODY_CLOSE}");
    let shift = |offset: usize| offset.saturating_sub(BODY_OPEN.len()).min(code.len());

    isolated(|| {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &wrapped, SourceType::tsx()).parse();
        let mut errors = syntax_errors(&ret, shift);
        if !errors.is_empty() {
            return Err(errors);
        }

        let closes_at_end = ret.program.body.len() == 1
            && matches!(
                ret.program.body.first(),
                Some(Statement::FunctionDeclaration(f))
                    if f.body.as_ref().is_some_and(|b| b.span.end as usize == wrapped.len())
            );
        if !closes_at_end {
            let at = ret
                .program
                .body
                .first()
                .map_or(0, |s| s.span().end as usize);
            errors.push(SyntaxError::new(
                shift(at.saturating_sub(1)),
                "'}' closes the scene body early",
            ));
        }

        let mut modules = ModuleSyntax::default();
        modules.visit_program(&ret.program);
        errors.extend(modules.found.into_iter().map(|(start, keyword)| {
            SyntaxError::new(
                shift(start as usize),
                format!("'{keyword}' is not allowed inside the scene body"),
            )
        }));

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    })
}

/// Check a whole scene document and return the byte ranges of every body passed as a
/// generator to `factory`, braces excluded.
pub(crate) fn scene_bodies(
    source: &str,
    factory: &str,
) -> Result<Vec<Range<usize>>, Vec<SyntaxError>> {
    if let Some(at) = excessive_nesting(source) {
        return Err(vec![nesting_error(at)]);
    }

    isolated(|| {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::tsx()).parse();
        let mut errors = syntax_errors(&ret, |offset| offset);

        let mut modules = ModuleSyntax::default();
        modules.visit_program(&ret.program);
        let top_level: Vec<u32> = ret.program.body.iter().map(|s| s.span().start).collect();
        errors.extend(
            modules
                .found
                .into_iter()
                .filter(|(start, _)| !top_level.contains(start))
                .map(|(start, keyword)| {
                    SyntaxError::new(
                        start as usize,
                        format!("'{keyword}' is only allowed at the top level of a module"),
                    )
                }),
        );
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut bodies = SceneBodies {
            factory,
            found: Vec::new(),
        };
        bodies.visit_program(&ret.program);
        Ok(bodies.found)
    })
}

fn syntax_errors(ret: &ParserReturn<'_>, shift: impl Fn(usize) -> usize) -> Vec<SyntaxError> {
    let convert = |d: &OxcDiagnostic| {
        let offset = d
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset());
        SyntaxError::new(shift(offset), d.message.to_string())
    };

    if !ret.errors.is_empty() || ret.panicked {
        return ret.errors.iter().map(convert).collect();
    }
    let semantic = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(&ret.program);
    semantic.errors.iter().map(convert).collect()
}

/// Run the parser on a thread with a generous stack so deep but legal nesting cannot overflow
/// the caller's stack. A parser panic becomes an error.
fn isolated<'env, T, F>(f: F) -> Result<T, Vec<SyntaxError>>
where
    T: Send + 'env,
    F: FnOnce() -> Result<T, Vec<SyntaxError>> + Send + 'env,
{
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("tsx-parse".to_string())
            .stack_size(PARSER_STACK_BYTES)
            .spawn_scoped(scope, f)
            .map_err(|e| vec![SyntaxError::new(0, format!("cannot start parser: {e}"))])?;
        handle.join().unwrap_or_else(|_| {
            tracing::warn!("TSX parser panicked; rejecting source");
            Err(vec![SyntaxError::new(0, "internal parser failure")])
        })
    })
}

fn excessive_nesting(source: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in source.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Some(i);
                }
            }
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn nesting_error(at: usize) -> SyntaxError {
    SyntaxError::new(at, format!("nesting deeper than {MAX_NESTING} levels"))
}

/// Start offsets of import/export declarations anywhere in the tree.
#[derive(Default)]
struct ModuleSyntax {
    found: Vec<(u32, &'static str)>,
}

impl<'a> Visit<'a> for ModuleSyntax {
    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        self.found.push((it.span.start, "import"));
    }

    fn visit_ts_import_equals_declaration(&mut self, it: &TSImportEqualsDeclaration<'a>) {
        self.found.push((it.span.start, "import"));
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        self.found.push((it.span.start, "export"));
        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_default_declaration(&mut self, it: &ExportDefaultDeclaration<'a>) {
        self.found.push((it.span.start, "export"));
        walk::walk_export_default_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &ExportAllDeclaration<'a>) {
        self.found.push((it.span.start, "export"));
    }

    fn visit_ts_export_assignment(&mut self, it: &TSExportAssignment<'a>) {
        self.found.push((it.span.start, "export"));
        walk::walk_ts_export_assignment(self, it);
    }
}

struct SceneBodies<'f> {
    factory: &'f str,
    found: Vec<Range<usize>>,
}

impl<'a> Visit<'a> for SceneBodies<'_> {
    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if it.callee.is_specific_id(self.factory) {
            let body = it.arguments.iter().find_map(|arg| match arg {
                Argument::FunctionExpression(f) if f.generator => f.body.as_ref(),
                _ => None,
            });
            if let Some(body) = body {
                self.found
                    .push(body.span.start as usize + 1..body.span.end as usize - 1);
            }
        }
        walk::walk_call_expression(self, it);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/syntax/parse.rs"]
mod tests;
