//! Template expansion.
//!
//! Walks a compiled template strictly left to right, depth first: literal
//! and capture text goes to the output, call arguments are resolved to
//! plain strings, and each call is recorded only after its arguments — so
//! an argument's own calls always precede the call that encloses them.
//!
//! A call contributes no output text by default; the recorded invocation
//! is the product. Hosts whose downstream renderer consumes call text can
//! set [`Options::render_calls`](crate::Options) to re-emit each top-level
//! call as `$name("arg", ...);` with its arguments resolved. Calls nested
//! inside an argument never contribute text to that argument either way,
//! keeping recorded argument strings independent of the option.

use crate::api::Options;
use crate::{CallExpr, CallInvocation, MatchResult, Template, TemplateSegment};

/// Expand `template` for one match, appending output text to `output` and
/// recorded calls to `calls`.
pub(crate) fn expand(
    template: &Template,
    input: &str,
    found: &MatchResult,
    options: &Options,
    output: &mut String,
    calls: &mut Vec<CallInvocation>,
) {
    for segment in &template.segments {
        match segment {
            TemplateSegment::Literal(text) | TemplateSegment::EscapedLiteral(text) => {
                output.push_str(text);
            }
            TemplateSegment::Capture(group) => {
                output.push_str(capture_text(input, found, *group));
            }
            TemplateSegment::Call(call) => {
                let recorded = resolve_call(call, input, found, calls);
                if options.render_calls {
                    render_call(&calls[recorded], output);
                }
            }
        }
    }
}

/// Resolve one call: arguments first, then the invocation itself. Returns
/// the index of the recorded invocation in `calls`.
///
/// Nesting depth is bounded by the compiled template, which is
/// author-controlled, so plain recursion is fine here.
fn resolve_call(
    call: &CallExpr,
    input: &str,
    found: &MatchResult,
    calls: &mut Vec<CallInvocation>,
) -> usize {
    let mut args = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        let mut text = String::new();
        for segment in &arg.segments {
            match segment {
                TemplateSegment::Literal(t) | TemplateSegment::EscapedLiteral(t) => {
                    text.push_str(t);
                }
                TemplateSegment::Capture(group) => {
                    text.push_str(capture_text(input, found, *group));
                }
                TemplateSegment::Call(inner) => {
                    resolve_call(inner, input, found, calls);
                }
            }
        }
        args.push(text);
    }
    calls.push(CallInvocation {
        name: call.name.clone(),
        args,
    });
    calls.len() - 1
}

/// Re-emit a resolved call as `$name("arg",...)`; used when the host's
/// renderer consumes call text downstream.
fn render_call(call: &CallInvocation, output: &mut String) {
    output.push('$');
    output.push_str(&call.name);
    output.push('(');
    for (i, arg) in call.args.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push('"');
        output.push_str(arg);
        output.push('"');
    }
    output.push_str(");");
}

fn capture_text<'a>(input: &'a str, found: &MatchResult, group: u32) -> &'a str {
    let span = found.captures[(group - 1) as usize];
    &input[span.start..span.end]
}
