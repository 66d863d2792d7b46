//! The readline controller: binds the buffer, kill ring, history,
//! shortcut maps and redraw engine to a terminal event stream.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{io::Write, path::PathBuf, time::Instant};

use crate::{
    actions::Action,
    buffer::{self, InputBuffer, Position},
    error,
    history::{History, HistoryItem, HistoryMatches, HistorySearch},
    killring::KillRing,
    render::{self, Prompt},
    shortcuts::{self, Resolution, ShortcutMap, ShortcutStack},
    term, trace_categories,
};

/// What a finished read delivers to the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadResult {
    /// The user accepted this input.
    Input(String),
    /// End of input (Ctrl+D on an empty buffer).
    Eof,
    /// The user abandoned the line (Ctrl+C).
    Interrupted,
}

/// A completion callback: receives the text before and after the cursor
/// and returns completion candidates.
pub type Completer = Box<dyn FnMut(&str, &str) -> whisker_cli::Completions>;

/// Construction-time settings for an [`Editor`].
#[derive(Clone, Debug)]
pub struct EditorOptions {
    /// The primary prompt.
    pub prompt: String,
    /// The prompt for continuation lines.
    pub continuation_prompt: String,
    /// Where to persist history; `None` keeps it in memory only.
    pub history_file: Option<PathBuf>,
    /// Maximum number of history items retained.
    pub max_history_items: usize,
    /// Disables bracketed-paste reporting on the terminal.
    pub disable_bracketed_paste: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            prompt: String::from("> "),
            continuation_prompt: String::from(". "),
            history_file: None,
            max_history_items: 8192,
            disable_bracketed_paste: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LastAction {
    None,
    Kill,
    Yank,
    Completion,
    Other,
}

#[derive(Debug)]
struct CompletionState {
    candidates: Vec<(String, bool)>,
    index: usize,
    span_start: Position,
}

enum State {
    Normal,
    Browsing(HistoryMatches),
    Searching(HistorySearch),
    Completing(CompletionState),
}

/// The interactive line editor.
///
/// The editor owns all editing state and is driven by [`Event`]s from
/// the terminal loop, either externally via [`Editor::handle_event`] or
/// by the blocking [`Editor::read_line`] loop. All state mutation
/// happens on the driving thread.
pub struct Editor {
    buffer: InputBuffer,
    kill_ring: KillRing,
    history: History,
    shortcuts: ShortcutStack,
    pending_keys: Vec<String>,
    state: State,
    last_action: LastAction,
    numeric: Option<i64>,
    numeric_negative: bool,
    yank_span: Option<Position>,
    primary: Prompt,
    continuation: Prompt,
    width: Option<usize>,
    cursor_row: usize,
    completer: Option<Completer>,
    highlighter: Option<Box<render::Highlighter>>,
    shown_at: Instant,
    cwd: String,
    options: EditorOptions,
}

impl Editor {
    /// Constructs an editor.
    pub fn new(options: EditorOptions) -> Result<Self, error::Error> {
        let history = History::new(options.history_file.clone(), options.max_history_items);
        let shortcuts = ShortcutStack::new(default_shortcuts()?);
        let cwd = std::env::current_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            buffer: InputBuffer::new(),
            kill_ring: KillRing::new(),
            history,
            shortcuts,
            pending_keys: Vec::new(),
            state: State::Normal,
            last_action: LastAction::None,
            numeric: None,
            numeric_negative: false,
            yank_span: None,
            primary: Prompt::new(options.prompt.clone()),
            continuation: Prompt::new(options.continuation_prompt.clone()),
            width: None,
            cursor_row: 0,
            completer: None,
            highlighter: None,
            shown_at: Instant::now(),
            cwd,
            options,
        })
    }

    /// Installs a completion callback.
    pub fn set_completer(&mut self, completer: Completer) {
        self.completer = Some(completer);
    }

    /// Installs a syntax highlighter.
    pub fn set_highlighter(&mut self, highlighter: Box<render::Highlighter>) {
        self.highlighter = Some(highlighter);
    }

    /// The edit buffer.
    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    /// The history store.
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Reads one input from the terminal, blocking on its event stream.
    pub fn read_line(&mut self, out: &mut impl Write) -> Result<ReadResult, error::Error> {
        let guard = term::RawModeGuard::new()?;

        write!(out, "{}", term::PROMPT_MARK_PRIMARY)?;
        if !self.options.disable_bracketed_paste {
            write!(out, "{}", term::BRACKETED_PASTE_ON)?;
        }
        write!(out, "{}", term::CURSOR_SHAPE_BAR)?;

        self.reset_for_new_line();
        self.redraw(out)?;

        let result = loop {
            let event = crossterm::event::read()?;
            if let Some(result) = self.handle_event(&event, out)? {
                break result;
            }
        };

        if !self.options.disable_bracketed_paste {
            write!(out, "{}", term::BRACKETED_PASTE_OFF)?;
        }
        write!(out, "{}", term::CURSOR_SHAPE_DEFAULT)?;
        out.flush()?;
        guard.release()?;

        Ok(result)
    }

    /// Feeds one terminal event to the editor. Returns a result when
    /// the read is finished.
    pub fn handle_event(
        &mut self,
        event: &Event,
        out: &mut impl Write,
    ) -> Result<Option<ReadResult>, error::Error> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.on_key(key, out),
            Event::Paste(text) => {
                self.insert_text(text, out)?;
                Ok(None)
            }
            Event::Resize(width, _) => {
                self.width = Some(usize::from(*width));
                self.redraw(out)?;
                Ok(None)
            }
            // Resumed/refocused: the screen contents are suspect.
            Event::FocusGained => {
                self.redraw(out)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn on_key(
        &mut self,
        key: &KeyEvent,
        out: &mut impl Write,
    ) -> Result<Option<ReadResult>, error::Error> {
        if let Some(name) = shortcuts::keystroke_name(key) {
            match self.shortcuts.resolve(&self.pending_keys, &name) {
                Resolution::Action(action) => {
                    self.pending_keys.clear();
                    return self.dispatch(action, out);
                }
                Resolution::Pending => {
                    self.pending_keys.push(name);
                    return Ok(None);
                }
                Resolution::None => {
                    if !self.pending_keys.is_empty() {
                        self.pending_keys.clear();
                        self.bell(out)?;
                        return Ok(None);
                    }
                }
            }
        }

        // Plain text.
        if let KeyCode::Char(c) = key.code {
            if key
                .modifiers
                .difference(KeyModifiers::SHIFT)
                .is_empty()
            {
                let mut tmp = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut tmp), out)?;
            }
        }
        Ok(None)
    }

    /// Inserts text at the cursor (or extends the search query while an
    /// incremental search is active). Paste delivers here as one call.
    pub fn insert_text(
        &mut self,
        text: &str,
        out: &mut impl Write,
    ) -> Result<(), error::Error> {
        if let State::Searching(search) = &mut self.state {
            search.push_query_text(text, &self.history);
            self.sync_search_buffer();
        } else {
            self.leave_transient_state();
            self.buffer.add_text(text);
        }
        self.last_action = LastAction::Other;
        self.redraw(out)
    }

    fn dispatch(
        &mut self,
        action: Action,
        out: &mut impl Write,
    ) -> Result<Option<ReadResult>, error::Error> {
        let repeat = if action.is_numeric_argument() {
            1
        } else {
            self.take_repeat()
        };

        match self.perform(&action, repeat, out) {
            Ok(outcome) => {
                if !action.is_numeric_argument() {
                    self.last_action = classify(&action);
                }
                if outcome.is_none() {
                    self.redraw(out)?;
                }
                Ok(outcome)
            }
            Err(err) if err.is_not_applicable() => {
                self.bell(out)?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn perform(
        &mut self,
        action: &Action,
        repeat: usize,
        out: &mut impl Write,
    ) -> Result<Option<ReadResult>, error::Error> {
        match action {
            Action::Backspace => {
                if let State::Searching(search) = &mut self.state {
                    search.pop_query_char(&self.history)?;
                    self.sync_search_buffer();
                    return Ok(None);
                }
                self.leave_transient_state();
                let erased = self.buffer.erase_chars_before_cursor(repeat, true);
                if erased.is_empty() {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }
            Action::Delete => {
                self.leave_transient_state();
                let erased = self.buffer.erase_chars_after_cursor(repeat, true);
                if erased.is_empty() {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }

            Action::MoveToStartOfLine => {
                self.leave_transient_state();
                self.buffer.move_to_start_of_line();
            }
            Action::MoveToEndOfLine => {
                self.leave_transient_state();
                self.buffer.move_to_end_of_line();
            }
            Action::MoveToStartOfWord => {
                self.leave_transient_state();
                if self.buffer.move_to_start_of_word(repeat, buffer::is_word_char) == 0 {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }
            Action::MoveToEndOfWord => {
                self.leave_transient_state();
                if self.buffer.move_to_end_of_word(repeat, buffer::is_word_char) == 0 {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }
            Action::MoveToStartOfDocument => {
                self.leave_transient_state();
                self.buffer.move_to_start();
            }
            Action::MoveToEndOfDocument => {
                self.leave_transient_state();
                self.buffer.move_to_end();
            }

            Action::CursorLeft => {
                self.leave_transient_state();
                if self.buffer.move_cursor_left(repeat, true) == 0 {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }
            Action::CursorRight => {
                self.leave_transient_state();
                if self.buffer.move_cursor_right(repeat, true) == 0 {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }
            Action::CursorUp => return self.cursor_vertical(true, repeat, out),
            Action::CursorDown => return self.cursor_vertical(false, repeat, out),

            Action::HistoryPrevious => {
                self.ensure_browsing();
                let State::Browsing(matches) = &mut self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let text = matches.previous(repeat)?.to_owned();
                self.buffer.set_text(&text);
            }
            Action::HistoryNext => {
                let State::Browsing(matches) = &mut self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let text = matches.next(repeat)?.to_owned();
                self.buffer.set_text(&text);
            }
            Action::HistoryFirst => {
                self.ensure_browsing();
                let State::Browsing(matches) = &mut self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let text = matches.first().to_owned();
                self.buffer.set_text(&text);
            }
            Action::HistoryLast => {
                let State::Browsing(matches) = &mut self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let text = matches.last().to_owned();
                self.buffer.set_text(&text);
            }

            Action::HistoryIncrementalSearchBackward => self.incremental_search(true, repeat)?,
            Action::HistoryIncrementalSearchForward => self.incremental_search(false, repeat)?,
            Action::TerminateHistorySearchAndRestore => {
                let State::Searching(search) = &self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let original = search.original_input().to_owned();
                self.buffer.set_text(&original);
                self.shortcuts.pop();
                self.state = State::Normal;
            }
            Action::TerminateHistorySearchAndApply => {
                let State::Searching(search) = &self.state else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let applied = search
                    .current_match()
                    .unwrap_or(search.original_input())
                    .to_owned();
                self.buffer.set_text(&applied);
                self.shortcuts.pop();
                self.state = State::Normal;
            }

            Action::KillToEndOfLine => {
                self.leave_transient_state();
                let mut erased = String::new();
                for _ in 0..repeat {
                    erased.push_str(&self.buffer.erase_to_end_of_line());
                }
                self.record_kill(&erased, true)?;
            }
            Action::KillToStartOfLine => {
                self.leave_transient_state();
                let erased = self.buffer.erase_to_start_of_line();
                self.record_kill(&erased, false)?;
            }
            Action::KillNextWord => {
                self.leave_transient_state();
                let mut erased = String::new();
                for _ in 0..repeat {
                    erased.push_str(&self.buffer.erase_next_word(buffer::is_word_char));
                }
                self.record_kill(&erased, true)?;
            }
            Action::KillPreviousWord => {
                self.leave_transient_state();
                let mut erased = String::new();
                for _ in 0..repeat {
                    erased.insert_str(0, &self.buffer.erase_previous_word(buffer::is_word_char));
                }
                self.record_kill(&erased, false)?;
            }
            Action::KillPreviousSpaceWord => {
                self.leave_transient_state();
                let mut erased = String::new();
                for _ in 0..repeat {
                    erased
                        .insert_str(0, &self.buffer.erase_previous_word(buffer::is_space_word_char));
                }
                self.record_kill(&erased, false)?;
            }

            Action::Yank => {
                self.leave_transient_state();
                let Some(text) = self.kill_ring.yank().map(str::to_owned) else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                self.yank_span = Some(self.buffer.cursor());
                self.buffer.add_text(&text);
            }
            Action::PopYank => {
                if self.last_action != LastAction::Yank {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
                let Some(start) = self.yank_span else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                let cursor = self.buffer.cursor();
                self.buffer.erase_between(start, cursor);
                let Some(next) = self.kill_ring.pop_yank().map(str::to_owned) else {
                    return Err(error::ErrorKind::NotApplicable.into());
                };
                self.buffer.add_text(&next);
            }

            Action::AbortCurrentLine => {
                self.leave_transient_state();
                if let State::Searching(_) = self.state {
                    self.shortcuts.pop();
                }
                self.state = State::Normal;
                write!(out, "^C\r\n")?;
                out.flush()?;
                self.buffer.clear();
                self.cursor_row = 0;
                return Ok(Some(ReadResult::Interrupted));
            }
            Action::ClearScreen => {
                write!(out, "\x1b[2J\x1b[H")?;
                self.cursor_row = 0;
            }
            Action::AcceptInput => return self.accept_input(out).map(Some),
            Action::EndInput => {
                if self.buffer.is_empty() {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    return Ok(Some(ReadResult::Eof));
                }
                let erased = self.buffer.erase_chars_after_cursor(repeat, true);
                if erased.is_empty() {
                    return Err(error::ErrorKind::NotApplicable.into());
                }
            }

            Action::CompleteForward => self.complete(false, repeat)?,
            Action::CompleteBackward => self.complete(true, repeat)?,

            Action::NumericArgumentDigit(digit) => {
                self.numeric = Some(
                    self.numeric
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(i64::from(*digit)),
                );
            }
            Action::NumericArgumentMinus => {
                self.numeric_negative = !self.numeric_negative;
            }

            Action::AddText(text) => {
                let text = text.clone();
                for _ in 0..repeat {
                    self.buffer.add_text(&text);
                }
            }
        }

        Ok(None)
    }

    fn accept_input(&mut self, out: &mut impl Write) -> Result<ReadResult, error::Error> {
        if let State::Searching(_) = self.state {
            self.shortcuts.pop();
        }
        self.state = State::Normal;

        write!(out, "\r\n{}", term::PROMPT_MARK_END)?;
        out.flush()?;

        let text = self.buffer.all_text();
        if !text.trim().is_empty() {
            let mut item = HistoryItem::new(text.clone(), self.cwd.clone());
            item.duration = self.shown_at.elapsed().as_secs_f64();
            self.history.add(item);
            if let Err(err) = self.history.write() {
                tracing::warn!(target: trace_categories::INPUT, "failed to write history: {err}");
            }
        }

        self.buffer.clear();
        self.cursor_row = 0;
        Ok(ReadResult::Input(text))
    }

    fn cursor_vertical(
        &mut self,
        up: bool,
        repeat: usize,
        out: &mut impl Write,
    ) -> Result<Option<ReadResult>, error::Error> {
        if matches!(self.state, State::Searching(_)) {
            return Err(error::ErrorKind::NotApplicable.into());
        }

        let layout = render::layout(&self.buffer, &self.primary, &self.continuation, self.width());

        if up && layout.cursor_row == 0 {
            return self.perform(&Action::HistoryPrevious, repeat, out);
        }
        if !up && layout.cursor_row + 1 >= layout.rows.len() {
            return self.perform(&Action::HistoryNext, repeat, out);
        }

        let target = if up {
            layout.cursor_row.saturating_sub(repeat)
        } else {
            (layout.cursor_row + repeat).min(layout.rows.len() - 1)
        };
        let position =
            render::position_for_row_col(&self.buffer, &layout, target, layout.cursor_col);
        self.leave_transient_state();
        self.buffer.set_cursor(position);
        Ok(None)
    }

    fn incremental_search(&mut self, backwards: bool, repeat: usize) -> Result<(), error::Error> {
        match &mut self.state {
            State::Searching(search) => {
                search.advance(backwards, repeat)?;
                self.sync_search_buffer();
            }
            _ => {
                let mut search = HistorySearch::new(backwards, self.buffer.all_text());
                search.refilter(&self.history);
                self.state = State::Searching(search);
                self.shortcuts.push(search_shortcuts()?);
                self.sync_search_buffer();
            }
        }
        Ok(())
    }

    fn sync_search_buffer(&mut self) {
        if let State::Searching(search) = &self.state {
            let shown = search
                .current_match()
                .unwrap_or(search.original_input())
                .to_owned();
            self.buffer.set_text(&shown);
        }
    }

    fn complete(&mut self, backward: bool, repeat: usize) -> Result<(), error::Error> {
        let rotating =
            matches!(self.state, State::Completing(_)) && self.last_action == LastAction::Completion;

        if !rotating {
            let before = self.buffer.text_before_cursor();
            let after = self.buffer.text_after_cursor();
            let Some(completer) = &mut self.completer else {
                return Err(error::ErrorKind::NotApplicable.into());
            };
            let completions = completer(&before, &after);

            let candidates: Vec<(String, bool)> = completions
                .groups
                .iter()
                .flat_map(|group| {
                    group.matches.iter().map(|m| {
                        (
                            std::format!("{}{}", group.word_prefix, m.word),
                            group.no_trailing_space,
                        )
                    })
                })
                .collect();
            if candidates.is_empty() {
                return Err(error::ErrorKind::NotApplicable.into());
            }

            let cursor = self.buffer.cursor();
            let line_before = &self.buffer.current_line()[..cursor.x];
            let span_x = line_before
                .rfind(char::is_whitespace)
                .map_or(0, |index| {
                    index
                        + line_before[index..]
                            .chars()
                            .next()
                            .map_or(1, char::len_utf8)
                });

            let index = if backward { candidates.len() - 1 } else { 0 };
            self.state = State::Completing(CompletionState {
                candidates,
                index,
                span_start: Position::new(span_x, cursor.y),
            });
        } else if let State::Completing(completion) = &mut self.state {
            let len = completion.candidates.len();
            let step = repeat % len;
            completion.index = if backward {
                (completion.index + len - step) % len
            } else {
                (completion.index + step) % len
            };
        }

        let State::Completing(completion) = &self.state else {
            return Err(error::ErrorKind::NotApplicable.into());
        };
        let (word, no_space) = completion.candidates[completion.index].clone();
        let span_start = completion.span_start;

        let cursor = self.buffer.cursor();
        self.buffer.erase_between(span_start, cursor);
        self.buffer.add_text(&word);
        if !no_space {
            self.buffer.add_text(" ");
        }
        Ok(())
    }

    fn ensure_browsing(&mut self) {
        if matches!(self.state, State::Normal | State::Completing(_)) {
            let text = self.buffer.all_text();
            self.state = State::Browsing(self.history.prefix_matches(&text, &text));
        }
    }

    fn leave_transient_state(&mut self) {
        if matches!(self.state, State::Browsing(_) | State::Completing(_)) {
            self.state = State::Normal;
        }
    }

    fn record_kill(&mut self, erased: &str, forward: bool) -> Result<(), error::Error> {
        if erased.is_empty() {
            return Err(error::ErrorKind::NotApplicable.into());
        }
        if self.last_action == LastAction::Kill {
            if forward {
                self.kill_ring.extend_kill_forward(erased);
            } else {
                self.kill_ring.extend_kill_backward(erased);
            }
        } else {
            self.kill_ring.start_kill(erased);
        }
        Ok(())
    }

    fn take_repeat(&mut self) -> usize {
        let value = self.numeric.take();
        let negative = std::mem::take(&mut self.numeric_negative);
        let magnitude = value.unwrap_or(1).unsigned_abs() as usize;
        // Negative counts reverse nothing here; they just mean "once".
        if negative { 1 } else { magnitude.max(1) }
    }

    fn width(&self) -> usize {
        self.width.unwrap_or_else(term::terminal_width)
    }

    fn redraw(&mut self, out: &mut impl Write) -> Result<(), error::Error> {
        self.cursor_row = render::redraw(
            out,
            &self.buffer,
            &self.primary,
            &self.continuation,
            self.width(),
            self.cursor_row,
            self.highlighter.as_deref(),
        )?;
        Ok(())
    }

    fn bell(&self, out: &mut impl Write) -> Result<(), error::Error> {
        write!(out, "{}", term::BELL)?;
        out.flush()?;
        Ok(())
    }

    fn reset_for_new_line(&mut self) {
        self.buffer.clear();
        self.state = State::Normal;
        self.last_action = LastAction::None;
        self.pending_keys.clear();
        self.numeric = None;
        self.numeric_negative = false;
        self.cursor_row = 0;
        self.shown_at = Instant::now();
    }
}

const fn classify(action: &Action) -> LastAction {
    if action.is_kill() {
        LastAction::Kill
    } else if action.is_yank() {
        LastAction::Yank
    } else if action.is_completion() {
        LastAction::Completion
    } else {
        LastAction::Other
    }
}

/// The default key bindings.
fn default_shortcuts() -> Result<ShortcutMap, error::Error> {
    let mut map = ShortcutMap::new();

    map.add("backspace", Action::Backspace)?;
    map.add("ctrl+h", Action::Backspace)?;
    map.add("delete", Action::Delete)?;
    map.add("ctrl+d", Action::EndInput)?;

    map.add("left", Action::CursorLeft)?;
    map.add("ctrl+b", Action::CursorLeft)?;
    map.add("right", Action::CursorRight)?;
    map.add("ctrl+f", Action::CursorRight)?;
    map.add("up", Action::CursorUp)?;
    map.add("down", Action::CursorDown)?;

    map.add("home", Action::MoveToStartOfLine)?;
    map.add("ctrl+a", Action::MoveToStartOfLine)?;
    map.add("end", Action::MoveToEndOfLine)?;
    map.add("ctrl+e", Action::MoveToEndOfLine)?;
    map.add("alt+b", Action::MoveToStartOfWord)?;
    map.add("ctrl+left", Action::MoveToStartOfWord)?;
    map.add("alt+f", Action::MoveToEndOfWord)?;
    map.add("ctrl+right", Action::MoveToEndOfWord)?;
    map.add("ctrl+home", Action::MoveToStartOfDocument)?;
    map.add("ctrl+end", Action::MoveToEndOfDocument)?;

    map.add("ctrl+p", Action::HistoryPrevious)?;
    map.add("ctrl+n", Action::HistoryNext)?;
    map.add("page_up", Action::HistoryFirst)?;
    map.add("page_down", Action::HistoryLast)?;
    map.add("ctrl+r", Action::HistoryIncrementalSearchBackward)?;
    map.add("ctrl+s", Action::HistoryIncrementalSearchForward)?;

    map.add("ctrl+k", Action::KillToEndOfLine)?;
    map.add("ctrl+u", Action::KillToStartOfLine)?;
    map.add("alt+d", Action::KillNextWord)?;
    map.add("alt+backspace", Action::KillPreviousWord)?;
    map.add("ctrl+w", Action::KillPreviousSpaceWord)?;
    map.add("ctrl+y", Action::Yank)?;
    map.add("alt+y", Action::PopYank)?;

    map.add("ctrl+c", Action::AbortCurrentLine)?;
    map.add("ctrl+l", Action::ClearScreen)?;
    map.add("enter", Action::AcceptInput)?;
    map.add("ctrl+j", Action::AcceptInput)?;
    map.add("alt+enter", Action::AddText(String::from("\n")))?;

    map.add("tab", Action::CompleteForward)?;
    map.add("shift+tab", Action::CompleteBackward)?;

    for digit in 0..=9u8 {
        map.add(
            &std::format!("alt+{digit}"),
            Action::NumericArgumentDigit(digit),
        )?;
    }
    map.add("alt+-", Action::NumericArgumentMinus)?;

    Ok(map)
}

/// Bindings layered on top while incremental search is active.
fn search_shortcuts() -> Result<ShortcutMap, error::Error> {
    let mut map = ShortcutMap::new();
    map.add("esc", Action::TerminateHistorySearchAndRestore)?;
    map.add("ctrl+g", Action::TerminateHistorySearchAndRestore)?;
    map.add("enter", Action::TerminateHistorySearchAndApply)?;
    map.add("ctrl+r", Action::HistoryIncrementalSearchBackward)?;
    map.add("ctrl+s", Action::HistoryIncrementalSearchForward)?;
    map.add("up", Action::HistoryIncrementalSearchBackward)?;
    map.add("down", Action::HistoryIncrementalSearchForward)?;
    Ok(map)
}
