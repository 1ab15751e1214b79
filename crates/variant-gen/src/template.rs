//! Single-pass template expansion: directive classification plus the
//! two-state scan that turns one template file into its expanded text.
//!
//! Directives live inside the host language's comment syntax so an
//! unexpanded template is still a syntactically valid source file.

use anyhow::{Result, bail};
use log::warn;

use crate::catalog::{self, Datatype};
use crate::initializer;
use crate::substitute;

/// Datatypes in effect before the first `Supported datatypes:` directive.
const INITIAL_SELECTION: [&str; 2] = ["float", "double"];

const SUPPORTED_PHRASE: &str = "Supported datatypes:";
const REPEAT_BEGIN_PHRASE: &str = "Repeat for each data type";
const REPEAT_END_PHRASE: &str = "End repeat";
const INITIALIZER_OPEN: &str = "CREATE_INITIALIZER(";

/// A classified template line. Lines matching none of the four signatures
/// are literal text and classify to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    SupportedDatatypes(Vec<String>),
    RepeatBegin,
    RepeatEnd,
    CreateInitializer(String),
}

/// Match one physical line against the directive signatures, first match
/// wins. Each directive occupies its own line; there is no nesting.
pub fn classify(line: &str) -> Option<Directive> {
    if let Some(at) = comment_phrase(line, SUPPORTED_PHRASE) {
        let names = line[at + SUPPORTED_PHRASE.len()..]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        return Some(Directive::SupportedDatatypes(names));
    }
    if comment_phrase(line, REPEAT_BEGIN_PHRASE).is_some() {
        return Some(Directive::RepeatBegin);
    }
    if comment_phrase(line, REPEAT_END_PHRASE).is_some() {
        return Some(Directive::RepeatEnd);
    }
    if let Some(open) = line.find(INITIALIZER_OPEN) {
        let rest = &line[open + INITIALIZER_OPEN.len()..];
        // Without a closing parenthesis this is not a directive.
        if let Some(close) = rest.find(')') {
            return Some(Directive::CreateInitializer(rest[..close].to_string()));
        }
    }
    None
}

// Position of `phrase` when it appears after a `//` on the line. Existing
// templates write `//Supported datatypes:` with no space after the marker,
// so the phrase may follow the `//` directly.
fn comment_phrase(line: &str, phrase: &str) -> Option<usize> {
    let comment = line.find("//")?;
    let at = line.find(phrase)?;
    (at >= comment).then_some(at)
}

#[derive(Debug, PartialEq, Eq)]
enum State {
    Normal,
    Capturing,
}

/// Mutable scan state for one template file. Constructed fresh per file and
/// discarded afterwards; reprocessing a file never observes another file's
/// selections.
struct ExpansionContext {
    selection: Vec<&'static Datatype>,
    accumulated: Vec<&'static Datatype>,
}

impl ExpansionContext {
    fn new() -> Self {
        let initial: Vec<&'static Datatype> = INITIAL_SELECTION
            .iter()
            .map(|name| catalog::lookup(name).expect("initial selection is canonical"))
            .collect();
        Self {
            selection: initial.clone(),
            accumulated: initial,
        }
    }

    /// Replace the active selection with the resolved name list and append it
    /// to the accumulated support set. Names outside the catalog are dropped;
    /// the templates rely on the drop being non-fatal, so it is only warned.
    fn select(&mut self, names: &[String], line_no: usize) {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            match catalog::lookup(name) {
                Some(dtype) => resolved.push(dtype),
                None => warn!("line {line_no}: dropping unknown datatype '{name}'"),
            }
        }
        self.accumulated.extend(&resolved);
        self.selection = resolved;
    }

    fn accumulate_selection(&mut self) {
        self.accumulated.extend_from_slice(&self.selection);
    }
}

/// Expand one template file to its output text.
///
/// The input is split on `\n` and rejoined the same way, so everything
/// outside directive lines and expansions survives byte-identically,
/// trailing newline included.
pub fn expand_template(source: &str) -> Result<String> {
    let mut ctx = ExpansionContext::new();
    let mut state = State::Normal;
    let mut out: Vec<String> = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for (idx, line) in source.split('\n').enumerate() {
        let line_no = idx + 1;
        match state {
            State::Normal => match classify(line) {
                Some(Directive::SupportedDatatypes(names)) => ctx.select(&names, line_no),
                Some(Directive::RepeatBegin) => {
                    block.clear();
                    state = State::Capturing;
                }
                Some(Directive::RepeatEnd) => {
                    warn!("line {line_no}: 'End repeat' without an open repeat block, ignored");
                }
                Some(Directive::CreateInitializer(name)) => {
                    // Only the accumulated set and the output are affected;
                    // the active selection stays as declared.
                    ctx.accumulate_selection();
                    out.push(initializer::render(&name, &ctx.accumulated));
                }
                None => out.push(line.to_string()),
            },
            State::Capturing => {
                if classify(line) == Some(Directive::RepeatEnd) {
                    let body = block.join("\n");
                    for dtype in &ctx.selection {
                        out.push(substitute::expand(&body, dtype));
                    }
                    block.clear();
                    state = State::Normal;
                } else {
                    block.push(line);
                }
            }
        }
    }

    if state == State::Capturing {
        bail!("template ended inside a repeat block (missing 'End repeat')");
    }
    Ok(out.join("\n"))
}
