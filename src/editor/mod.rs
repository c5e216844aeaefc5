//! The interactive terminal frontend of packsmith

pub mod ack;
pub mod command_mode;
pub mod keystroke_log;
pub mod normal_mode;
pub mod state;
mod widgets;

use crate::config::Config;
use crate::core::{keystrokes_to_string, Path};
use crate::locale::Locales;
use crate::prefs::{Preferences, PrefsError, Theme};
use crate::registry::ModelRegistry;
use crate::routing::{MemoryHistory, Router};
use crate::session::{Session, SessionBuilder, SessionError, SwitchReport};
use crate::view::{
    errors::ErrorsRenderer, source::SourceRenderer, tree::TreeRenderer, Surface, SurfaceView,
};

use ack::Acknowledgement;
use keystroke_log::{Category, KeyStrokeLog};
use state::State;

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{Event, KeyEvent},
    terminal,
};
use serde_json::Value;
use thiserror::Error;
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders},
};

pub(crate) type Terminal = tui::Terminal<CrosstermBackend<io::Stdout>>;

/// The locale keys of every piece of static text in the interface
const STATIC_TEXT: &[&str] = &[
    "undo",
    "redo",
    "reset",
    "copy",
    "download",
    "errors",
    "no_errors",
    "source",
    "tree",
    "language",
    "theme",
    "quit",
];

/// How long the mainloop waits for a key before redrawing anyway (so that acknowledgements
/// disappear on time)
const TICK: Duration = Duration::from_millis(250);

/// The possible ways that an editor command could fail
#[derive(Debug, Error)]
pub enum EditorError {
    /// The session rejected the command
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The theme couldn't be saved
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    /// The exported document couldn't be written
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// The file being written
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },
    /// There is no history entry in that direction
    #[error("nothing to go {0} to")]
    NoHistory(&'static str),
}

/// Turns the result of an editor command into an entry for the keystroke log
pub(crate) fn log_entry(result: Result<String, EditorError>, category: Category) -> (String, Category) {
    match result {
        Ok(description) => (description, category),
        Err(e) => {
            log::warn!("{}", e);
            (e.to_string(), Category::Failed)
        }
    }
}

/// The surfaces that the session's views draw onto
pub struct Surfaces {
    /// The outline of the active document
    pub tree: Rc<Surface>,
    /// The pretty-printed JSON of the active document
    pub source: Rc<Surface>,
    /// The structural problems of the active document
    pub errors: Rc<Surface>,
}

/// Everything the frontend drives: the session, its navigation history and the bits of
/// interface state that aren't part of any document.  This doesn't own the terminal, so that
/// it can be driven without one.
pub struct Editor {
    session: Session,
    router: Router,
    history: MemoryHistory,
    surfaces: Surfaces,
    show_source: bool,
    show_errors: bool,
    prefs: Preferences,
    /// The in-app clipboard register, filled by 'copy'
    clipboard: Option<String>,
    ack: Acknowledgement,
    config: Config,
}

impl Editor {
    /// Creates an editor whose history starts at `initial_path`.  The path decides the initial
    /// kind, falling back on the configured default kind.
    pub fn new(
        config: Config,
        locales: Locales,
        prefs: Preferences,
        initial_path: &str,
    ) -> Result<Self, EditorError> {
        let surfaces = Surfaces {
            tree: Surface::new("tree", TreeRenderer),
            source: Surface::new("source", SourceRenderer),
            errors: Surface::new("errors", ErrorsRenderer),
        };
        let registry = ModelRegistry::with_builtin_kinds(config.undo_depth);
        let router = Router::new(&config.base_path, config.default_kind.clone());
        let initial = router.initial_kind(&registry, initial_path);
        let session = SessionBuilder::new(registry, locales)
            .view(SurfaceView::new(&surfaces.tree))
            .view(SurfaceView::new(&surfaces.source))
            .view(SurfaceView::new(&surfaces.errors))
            .static_text(STATIC_TEXT)
            .start(initial.as_str())?;
        let history = MemoryHistory::new(router.path_for(&initial));
        Ok(Editor {
            session,
            router,
            history,
            surfaces,
            show_source: true,
            show_errors: true,
            prefs,
            clipboard: None,
            ack: Acknowledgement::new(config.ack_duration),
            config,
        })
    }

    /* ===== ACCESSORS ===== */

    /// The session being edited
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The navigation history
    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    /// The surfaces drawn by the panes
    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    /// The current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The chosen theme, if any
    pub fn theme(&self) -> Option<Theme> {
        self.prefs.theme()
    }

    /// The contents of the clipboard register
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// The acknowledgement that is visible at `now`
    pub fn acknowledged(&self, now: Instant) -> Option<&str> {
        self.ack.current(now)
    }

    /// Whether the source pane is visible
    pub fn show_source(&self) -> bool {
        self.show_source
    }

    /// Whether the error pane is visible
    pub fn show_errors(&self) -> bool {
        self.show_errors
    }

    fn acknowledge(&mut self, key: &str) {
        let label = self.session.labels().text(key).to_owned();
        self.ack.trigger(label, Instant::now());
    }

    /* ===== COMMANDS ===== */
    // Every command returns a description for the keystroke log

    /// Switches to `kind` as a user gesture, so a history entry is pushed
    pub fn select_kind(&mut self, kind: &str) -> Result<String, EditorError> {
        let report = self
            .router
            .select(&mut self.session, &mut self.history, kind)?;
        Ok(describe_switch(&report))
    }

    /// Selects the next (or previous) kind in the kind menu
    pub fn cycle_kind(&mut self, forwards: bool) -> Result<String, EditorError> {
        let kinds: Vec<String> = self
            .session
            .registry()
            .kinds()
            .map(|k| k.to_string())
            .collect();
        let kind = cycle(&kinds, self.session.active_kind().as_str(), forwards);
        self.select_kind(&kind)
    }

    /// Goes back in the history without pushing anything
    pub fn back(&mut self) -> Result<String, EditorError> {
        let path = self
            .history
            .back()
            .ok_or(EditorError::NoHistory("back"))?
            .to_owned();
        let report = self.router.navigate(&mut self.session, &path)?;
        Ok(describe_switch(&report))
    }

    /// Goes forward in the history without pushing anything
    pub fn forward(&mut self) -> Result<String, EditorError> {
        let path = self
            .history
            .forward()
            .ok_or(EditorError::NoHistory("forward"))?
            .to_owned();
        let report = self.router.navigate(&mut self.session, &path)?;
        Ok(describe_switch(&report))
    }

    /// Changes the interface language
    pub fn switch_locale(&mut self, code: &str) -> Result<String, EditorError> {
        self.session.switch_locale(code)?;
        Ok(format!("switch language to '{}'", code))
    }

    /// Selects the next language in the language menu
    pub fn cycle_locale(&mut self) -> Result<String, EditorError> {
        let codes: Vec<String> = self
            .session
            .locales()
            .languages()
            .map(|(code, _)| code.to_owned())
            .collect();
        let code = cycle(&codes, self.session.locale(), true);
        self.switch_locale(&code)
    }

    /// Undoes a change to the active document
    pub fn undo(&mut self) -> Result<String, EditorError> {
        Ok(if self.session.undo_active() {
            "undo a change"
        } else {
            "nothing to undo"
        }
        .to_owned())
    }

    /// Redoes a change to the active document
    pub fn redo(&mut self) -> Result<String, EditorError> {
        Ok(if self.session.redo_active() {
            "redo a change"
        } else {
            "nothing to redo"
        }
        .to_owned())
    }

    /// Resets the active document to its default
    pub fn reset(&mut self) -> Result<String, EditorError> {
        self.session.reset_active();
        self.acknowledge("reset");
        Ok(format!("reset {}", self.session.active_kind()))
    }

    /// Writes `value` at `path` in the active document
    pub fn set(&mut self, path: &Path, value: Value) -> Result<String, EditorError> {
        self.session.set_active(path, value)?;
        Ok(format!("set {}", path))
    }

    /// Removes the value at `path` from the active document
    pub fn remove(&mut self, path: &Path) -> Result<String, EditorError> {
        self.session.remove_active(path)?;
        Ok(format!("remove {}", path))
    }

    /// Copies the exported active document into the clipboard register
    pub fn copy(&mut self) -> Result<String, EditorError> {
        self.clipboard = Some(self.session.export_active()?);
        self.acknowledge("copy");
        Ok(format!("copy {}", self.session.active_kind()))
    }

    /// Writes the exported active document to `path`, or to the configured download file
    pub fn download(&mut self, path: Option<PathBuf>) -> Result<String, EditorError> {
        let path = path.unwrap_or_else(|| self.config.download_path.clone());
        let text = self.session.export_active()?;
        std::fs::write(&path, text).map_err(|source| EditorError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {} to {:?}", self.session.active_kind(), path);
        self.acknowledge("download");
        Ok(format!("write to {:?}", path))
    }

    /// Flips between the dark and light themes and remembers the choice
    pub fn toggle_theme(&mut self) -> Result<String, EditorError> {
        let theme = self.prefs.theme().unwrap_or(Theme::Dark).toggled();
        self.prefs.set_theme(theme)?;
        Ok(format!("{} theme", theme.as_str()))
    }

    /// Shows or hides the source pane
    pub fn toggle_source(&mut self) -> Result<String, EditorError> {
        self.show_source = !self.show_source;
        Ok(format!("{} source", if self.show_source { "show" } else { "hide" }))
    }

    /// Shows or hides the error pane
    pub fn toggle_errors(&mut self) -> Result<String, EditorError> {
        self.show_errors = !self.show_errors;
        Ok(format!("{} errors", if self.show_errors { "show" } else { "hide" }))
    }
}

fn describe_switch(report: &SwitchReport) -> String {
    match report.failures.len() {
        0 => format!("switch to {}", report.kind),
        n => format!("switch to {} ({} views failed)", report.kind, n),
    }
}

/// The item after (or before) `current` in `items`, wrapping around at the ends
fn cycle(items: &[String], current: &str, forwards: bool) -> String {
    let len = items.len();
    let index = items.iter().position(|i| i == current).unwrap_or(0);
    let next = if forwards {
        (index + 1) % len.max(1)
    } else {
        (index + len.max(1) - 1) % len.max(1)
    };
    items.get(next).cloned().unwrap_or_else(|| current.to_owned())
}

/// The [`State`] that packsmith is in during a transition function.  This has to exist, but
/// none of the methods should ever be called, since doing so would require the transition
/// function to unexpectedly fail, which is not possible (since the transition function must
/// return a new [`State`] or `panic`, in which case execution stops and the `IntermediateState`
/// is never used).  This is a zero-sized type, so constructing a `Box<IntermediateState>` does
/// not perform any heap allocations.
#[derive(Debug, Copy, Clone)]
struct IntermediateState;

impl State for IntermediateState {
    fn transition(
        self: Box<Self>,
        _key: KeyEvent,
        _editor: &mut Editor,
    ) -> (Box<dyn State>, Option<(String, Category)>) {
        panic!("Invalid state should never exist except during state transitions.");
    }

    fn name(&self) -> &'static str {
        panic!("Invalid state should never exist except during state transitions.");
    }

    fn is_quit(&self) -> bool {
        panic!("Invalid state should never exist except during state transitions.");
    }

    fn keystroke_buffer(&self) -> Cow<'_, str> {
        panic!("Invalid state should never exist except during state transitions.");
    }
}

/// A singleton struct to hold the terminal, along with the [`Editor`] it is showing
pub struct Tui {
    editor: Editor,
    /// The `tui` terminal that the `Editor` is rendering to
    term: Terminal,
    /// The current state-machine [`State`] that packsmith is in
    state: Box<dyn State>,
    /// A list of the keystrokes that have been executed, along with a summary of what they mean
    keystroke_log: KeyStrokeLog,
    /// The keystrokes typed since the last keystroke log entry
    pending_keys: Vec<KeyEvent>,
    log: tui_logger::TuiWidgetState,
}

impl Tui {
    /// Takes over the terminal to show `editor`
    pub fn new(editor: Editor) -> anyhow::Result<Tui> {
        terminal::enable_raw_mode()?;
        let term = match Self::enter_alternate_screen() {
            Ok(term) => term,
            Err(e) => {
                // Don't leave the user's shell in raw mode
                if let Err(raw) = terminal::disable_raw_mode() {
                    log::warn!("Couldn't leave raw mode: {}", raw);
                }
                return Err(e);
            }
        };
        Ok(Tui {
            editor,
            term,
            state: Box::new(normal_mode::State),
            keystroke_log: KeyStrokeLog::new(10),
            pending_keys: Vec::new(),
            log: tui_logger::TuiWidgetState::default(),
        })
    }

    fn enter_alternate_screen() -> anyhow::Result<Terminal> {
        let mut term = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        crossterm::execute!(term.backend_mut(), terminal::EnterAlternateScreen)?;
        Ok(term)
    }

    /* ===== MAIN FUNCTIONS ===== */

    /// Update the terminal UI display
    fn update_display(&mut self) -> anyhow::Result<()> {
        let Self {
            term,
            state,
            editor,
            keystroke_log,
            log,
            ..
        } = self;
        let now = Instant::now();
        let labels = editor.session().labels();
        let colors = editor.config().color_scheme(editor.theme());
        term.draw(|f| {
            let area = f.size();
            let rows = Layout::default()
                .constraints(vec![
                    Constraint::Length(2),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(area);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Min(40), Constraint::Percentage(30)])
                .split(rows[1]);
            let documents = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(if editor.show_source() {
                    vec![Constraint::Percentage(50), Constraint::Percentage(50)]
                } else {
                    vec![Constraint::Percentage(100)]
                })
                .split(cols[0]);
            let details = Layout::default()
                .constraints(if editor.show_errors() {
                    vec![
                        Constraint::Percentage(40),
                        Constraint::Percentage(30),
                        Constraint::Min(5),
                    ]
                } else {
                    vec![Constraint::Percentage(50), Constraint::Min(5)]
                })
                .split(cols[1]);

            f.render_widget(tui::widgets::Clear, area);
            f.render_widget(widgets::Header { labels }, rows[0]);
            f.render_widget(
                widgets::StatusBar {
                    mode: state.name(),
                    keystroke_buffer: &state.keystroke_buffer(),
                    acknowledged: editor.acknowledged(now),
                },
                rows[2],
            );

            let tree = editor.surfaces().tree.tokens();
            f.render_widget(
                widgets::TextView {
                    block: Block::default()
                        .borders(Borders::ALL)
                        .title(labels.text("tree")),
                    tokens: &tree,
                    color_scheme: colors,
                    placeholder: "",
                },
                documents[0],
            );
            if editor.show_source() {
                let source = editor.surfaces().source.tokens();
                f.render_widget(
                    widgets::TextView {
                        block: Block::default()
                            .borders(Borders::ALL)
                            .title(labels.text("source")),
                        tokens: &source,
                        color_scheme: colors,
                        placeholder: "",
                    },
                    documents[1],
                );
            }

            let mut next_detail = 0;
            if editor.show_errors() {
                let errors = editor.surfaces().errors.tokens();
                f.render_widget(
                    widgets::TextView {
                        block: Block::default()
                            .borders(Borders::ALL)
                            .title(labels.text("errors")),
                        tokens: &errors,
                        color_scheme: colors,
                        placeholder: labels.text("no_errors"),
                    },
                    details[0],
                );
                next_detail = 1;
            }
            f.render_widget(&*keystroke_log, details[next_detail]);
            let mut logger = tui_logger::TuiLoggerWidget::default();
            logger.state(&*log);
            f.render_widget(logger, details[next_detail + 1]);
        })?;
        Ok(())
    }

    fn mainloop(&mut self) -> anyhow::Result<()> {
        log::trace!("Starting mainloop");
        self.update_display()?;
        loop {
            // Wake up regularly even without input, so that expired acknowledgements vanish
            if crossterm::event::poll(TICK)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    // Consume the key and use it to move through the state machine.  Here, we
                    // use `std::mem::replace` to allow us to move `self.state` into
                    // `State::transition` by replacing it with the temporary value of
                    // `Box::new(IntermediateState)`.
                    let (new_state, log_entry) = State::transition(
                        std::mem::replace(
                            &mut self.state,
                            Box::new(IntermediateState) as Box<dyn State>,
                        ),
                        key,
                        &mut self.editor,
                    );
                    self.state = new_state;

                    // Log the keys to the keystroke log once they have done something
                    self.pending_keys.push(key);
                    if let Some((description, category)) = log_entry {
                        self.keystroke_log.push(
                            keystrokes_to_string(&self.pending_keys),
                            description,
                            category,
                        );
                        self.pending_keys.clear();
                    }
                }
            }
            // If we have reached `state::Quit` then we should exit the main loop
            if self.state.is_quit() {
                break;
            }

            // Make sure that the logger isn't taller than the screen
            self.keystroke_log
                .set_max_entries(self.term.size()?.height.into());
            self.update_display()?;
        }
        Ok(())
    }

    /// Start the editor and enter the mainloop
    pub fn run(mut self) -> anyhow::Result<()> {
        // Start the mainloop, which will not exit until packsmith is ready to close
        let result = self.mainloop();
        // Always give the terminal back, even if the mainloop failed
        log::trace!("Restoring the terminal");
        crossterm::execute!(
            self.term.backend_mut(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{cycle, Editor};
    use crate::config::Config;
    use crate::core::Path;
    use crate::locale::Locales;
    use crate::prefs::{Preferences, Theme};

    use std::time::Instant;

    use serde_json::json;
    use tempfile::TempDir;

    /// Creates an editor whose files all live in a fresh scratch directory.  The directory is
    /// deleted when the returned [`TempDir`] is dropped.
    pub(crate) fn editor() -> (Editor, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            prefs_path: dir.path().join("prefs.toml"),
            download_path: dir.path().join("data.json"),
            ..Config::default()
        };
        let prefs = Preferences::load(&config.prefs_path).unwrap();
        let editor = Editor::new(config, Locales::bundled().unwrap(), prefs, "/").unwrap();
        (editor, dir)
    }

    #[test]
    fn initial_path() {
        let (editor, dir) = editor();
        assert_eq!(editor.session().active_kind().as_str(), "loot-table");
        assert_eq!(editor.history().len(), 1);

        let config = Config::default();
        let prefs = Preferences::load(dir.path().join("prefs.toml")).unwrap();
        let editor =
            Editor::new(config, Locales::bundled().unwrap(), prefs, "/dimension").unwrap();
        assert_eq!(editor.session().active_kind().as_str(), "dimension");
        assert!(editor.surfaces().source.text().contains("generator"));
    }

    #[test]
    fn cycling() {
        let items: Vec<String> = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        assert_eq!(cycle(&items, "a", true), "b");
        assert_eq!(cycle(&items, "c", true), "a");
        assert_eq!(cycle(&items, "a", false), "c");
        assert_eq!(cycle(&[], "a", true), "a");
    }

    #[test]
    fn back_and_forward() {
        let (mut editor, _dir) = editor();
        editor.select_kind("predicate").unwrap();
        editor.select_kind("sandbox").unwrap();
        editor.back().unwrap();
        assert_eq!(editor.session().active_kind().as_str(), "predicate");
        editor.back().unwrap();
        assert!(editor.back().is_err());
        editor.forward().unwrap();
        assert_eq!(editor.session().active_kind().as_str(), "predicate");
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn copy_and_download_are_acknowledged() {
        let (mut editor, dir) = editor();
        assert_eq!(editor.acknowledged(Instant::now()), None);

        editor.copy().unwrap();
        let exported = editor.session().export_active().unwrap();
        assert_eq!(editor.clipboard(), Some(exported.as_str()));
        assert_eq!(editor.acknowledged(Instant::now()), Some("Copy"));

        editor.download(None).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("data.json")).unwrap(),
            exported
        );
        assert_eq!(editor.acknowledged(Instant::now()), Some("Download"));
    }

    #[test]
    fn acknowledgement_doesnt_touch_documents() {
        let (mut editor, _dir) = editor();
        editor.set(&Path::parse("/type"), json!("x")).unwrap();
        let version = editor.session().active_model().version();
        editor.copy().unwrap();
        assert_eq!(editor.session().active_model().version(), version);
        assert_eq!(editor.session().active_model().undo_depth(), 1);
    }

    #[test]
    fn theme_is_persisted() {
        let (mut editor, dir) = editor();
        assert_eq!(editor.theme(), None);
        editor.toggle_theme().unwrap();
        assert_eq!(editor.theme(), Some(Theme::Light));
        let reloaded = Preferences::load(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(reloaded.theme(), Some(Theme::Light));
        editor.toggle_theme().unwrap();
        assert_eq!(editor.theme(), Some(Theme::Dark));
    }

    #[test]
    fn pane_toggles() {
        let (mut editor, _dir) = editor();
        editor.toggle_source().unwrap();
        assert!(!editor.show_source());
        assert!(editor.show_errors());
        editor.toggle_errors().unwrap();
        editor.toggle_source().unwrap();
        assert!(editor.show_source());
        assert!(!editor.show_errors());
    }
}
