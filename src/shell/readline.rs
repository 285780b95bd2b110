//! Readline wrapper with window completion.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};

/// Completes month counts (`2` -> `24`), month tokens (`ju` -> `jun/`, `jul/`)
/// and the session commands.
pub struct WindowHelper {
    candidates: Vec<String>,
    hinter: HistoryHinter,
}

impl WindowHelper {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            hinter: HistoryHinter::default(),
        }
    }
}

impl Helper for WindowHelper {}
impl Validator for WindowHelper {}
impl Highlighter for WindowHelper {}

impl Hinter for WindowHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for WindowHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        // The window is a single token; nothing to complete after a space or a slash
        if before.contains(char::is_whitespace) || before.contains('/') {
            return Ok((pos, Vec::new()));
        }

        let prefix = before.to_lowercase();
        let mut matches: Vec<Pair> = self
            .candidates
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect();

        matches.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        matches.dedup_by(|a, b| a.replacement == b.replacement);

        Ok((0, matches))
    }
}

/// Thin wrapper over `rustyline::Editor` with preset candidates and history path.
pub struct Readline {
    editor: Editor<WindowHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new(candidates: &[&str], history_path: PathBuf) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let helper = WindowHelper::new(candidates);
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(helper));

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            let _ = self.editor.append_history(&self.history_path);
        }
        Ok(line)
    }

    /// Utility for tests to inspect completions without invoking terminal input.
    pub fn completions(&self, line: &str) -> Vec<String> {
        if let Some(helper) = self.editor.helper() {
            let pos = line.len();
            let history = self.editor.history();
            if let Ok((_, pairs)) = helper.complete(line, pos, &Context::new(history)) {
                return pairs.into_iter().map(|p| p.replacement).collect();
            }
        }
        Vec::new()
    }
}
