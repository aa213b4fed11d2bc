use crate::ansi::AnsiStyle;
use mtc_core::error::{
    Diagnostic, DiagnosticContext, DiagnosticData, Error, ErrorBuffer, Severity, Warning,
};
use mtc_core::session::Session;
use mtc_core::text::{self, TextLocation, TextRange};
use std::io::{BufWriter, Stderr, Write};
use std::path::Path;

pub fn print_errors(session: Option<&Session>, err: ErrorBuffer) {
    let errors = err.collect();
    print_diagnostics(session, &errors, &[], false);
}

/// Renders warnings then errors to stderr. `verbose` switches from
/// the one-line form to source context with marker lines.
pub fn print_diagnostics(
    session: Option<&Session>,
    errors: &[Error],
    warnings: &[Warning],
    verbose: bool,
) {
    let style = AnsiStyle::new();
    let mut handle = BufWriter::new(std::io::stderr());

    for warning in warnings {
        print_diagnostic(session, warning.diagnostic(), Severity::Warning, &style, &mut handle, verbose);
    }
    for error in errors {
        print_diagnostic(session, error.diagnostic(), Severity::Error, &style, &mut handle, verbose);
    }
    let _ = handle.flush();
}

fn print_diagnostic(
    session: Option<&Session>,
    diagnostic: &Diagnostic,
    severity: Severity,
    style: &AnsiStyle,
    handle: &mut BufWriter<Stderr>,
    verbose: bool,
) {
    let wb = style.err.white_bold;
    let r = style.err.reset;

    let _ = writeln!(
        handle,
        "{}{}: {wb}{}{r}",
        severity_color(style, severity),
        severity_name(severity),
        diagnostic.msg,
    );

    let (main, info) = match &diagnostic.data {
        DiagnosticData::Message => {
            let _ = writeln!(handle);
            return;
        }
        DiagnosticData::Context { main, info } => (main, info),
    };
    let Some(session) = session else {
        let _ = writeln!(handle);
        return;
    };

    let mut contexts = Vec::with_capacity(2);
    contexts.push(ContextFmt::new(session, main, severity));
    if let Some(info) = info {
        contexts.push(ContextFmt::new(session, info.context(), Severity::Info));
    }

    if verbose {
        let line_num_offset =
            contexts.iter().map(|fmt| fmt.line_num.len()).max().unwrap_or(0);
        let line_pad = " ".repeat(line_num_offset);
        for (idx, fmt) in contexts.iter().enumerate() {
            let last = idx + 1 == contexts.len();
            let line_num_pad = " ".repeat(line_num_offset - fmt.line_num.len());
            print_context(style, handle, fmt, last, &line_pad, &line_num_pad);
        }
    } else {
        let c = style.err.cyan;
        for (idx, fmt) in contexts.iter().enumerate() {
            let last = idx + 1 == contexts.len();
            let box_char = if last { '└' } else { '├' };
            let space = if fmt.message.is_empty() { "" } else { " " };
            let _ = writeln!(
                handle,
                "{c}{box_char}─ {}:{:?}{space}{}{r}",
                fmt.path.to_string_lossy(),
                fmt.location,
                fmt.message,
            );
        }
    }
    let _ = writeln!(handle);
}

struct ContextFmt<'src> {
    source: &'src str,
    path: &'src Path,
    message: &'src str,
    range: TextRange,
    location: TextLocation,
    line_range: TextRange,
    line_num: String,
    severity: Severity,
}

impl<'src> ContextFmt<'src> {
    fn new(
        session: &'src Session,
        context: &'src DiagnosticContext,
        severity: Severity,
    ) -> ContextFmt<'src> {
        let file = session.file(context.src.module_id);
        let path = file.path.strip_prefix(&session.curr_work_dir).unwrap_or(&file.path);

        let range = context.src.range;
        let location = text::find_text_location(&file.source, range.start(), &file.line_ranges);
        let line_num = location.line().to_string();
        let line_range = file.line_ranges[location.line_index()];

        ContextFmt {
            source: &file.source,
            path,
            message: &context.msg,
            range,
            location,
            line_range,
            line_num,
            severity,
        }
    }
}

fn print_context(
    style: &AnsiStyle,
    handle: &mut BufWriter<Stderr>,
    fmt: &ContextFmt,
    last: bool,
    line_pad: &str,
    line_num_pad: &str,
) {
    let prefix_range = TextRange::new(fmt.line_range.start(), fmt.range.start());
    let source_range = TextRange::new(fmt.range.start(), fmt.line_range.end().min(fmt.range.end()));

    let line_str = &fmt.source[fmt.line_range.as_usize()];
    let prefix_str = &fmt.source[prefix_range.as_usize()];
    let source_str = fmt.source[source_range.as_usize()].trim_end();

    let line = line_str.trim_end().replace('\t', TAB_REPLACE_STR);
    let marker_pad = " ".repeat(normalized_tab_len(prefix_str));
    let marker = severity_marker(fmt.severity).repeat(normalized_tab_len(source_str).max(1));
    let space = if fmt.message.is_empty() { "" } else { " " };
    let message = fmt.message;

    let c = style.err.cyan;
    let r = style.err.reset;
    let box_char = if last { '└' } else { '├' };

    let _ = writeln!(
        handle,
        r#"{line_pad} {c}│
{}{line_num_pad} │{r} {line}
{line_pad} {c}│ {marker_pad}{}{marker}{space}{message}
{line_pad} {c}{box_char}─ {}:{:?}{r}"#,
        fmt.line_num,
        severity_color(style, fmt.severity),
        fmt.path.to_string_lossy(),
        fmt.location,
    );
}

const TAB_SPACE_COUNT: usize = 2;
const TAB_REPLACE_STR: &str = "  ";

fn normalized_tab_len(text: &str) -> usize {
    text.chars().map(|c| if c == '\t' { TAB_SPACE_COUNT } else { 1 }).sum::<usize>()
}

const fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

const fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "─",
        Severity::Error | Severity::Warning => "^",
    }
}

const fn severity_color(style: &AnsiStyle, severity: Severity) -> &'static str {
    match severity {
        Severity::Info => style.err.green_bold,
        Severity::Error => style.err.red_bold,
        Severity::Warning => style.err.yellow_bold,
    }
}
