//! Core runtime: the single-threaded tick loop and the hot-swap protocol.

use crate::error::{CoreError, StartupError, SwapError};
use crate::menu::EmergencyMenu;
use crate::scores::ScoreBook;
use crate::translate::{ControlBindings, Translator};
use arcade_api::{Event, PluginKind, Score, UpdateOutcome};
use arcade_plugins::{DisplayPlugin, GamePlugin, LibInfo, PluginSource, Registry};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Runtime configuration, assembled by the application layer from the TOML
/// config and CLI overrides.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound on how long one poll may block. Keeps the loop
    /// responsive to swap and quit requests.
    pub tick_timeout: Duration,
    /// Reserved control key bindings.
    pub bindings: ControlBindings,
    /// Display to activate at startup; the first catalog entry when unset.
    pub initial_display: Option<PathBuf>,
    /// Where to persist scores; scores are not persisted when unset.
    pub score_directory: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_timeout: Duration::from_millis(50),
            bindings: ControlBindings::default(),
            initial_display: None,
            score_directory: None,
        }
    }
}

/// Lifecycle states of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Running,
    SwappingDisplay,
    SwappingGame,
    Terminated,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Previous,
    Next,
}

/// Callback invoked when the active game reports game over.
pub type GameOverHook = Box<dyn FnMut(&str, &Score)>;

/// The orchestrator.
///
/// Owns exactly one active display and one active game at any instant and
/// drives them from a single thread. Plugin cycling happens inline within
/// a tick: the replacement is loaded and validated before the previous
/// instance is dropped, so a failed swap leaves the visible session in its
/// previous state. No component outside the runtime ever holds a reference
/// to an active instance across a swap boundary.
pub struct Runtime<S: PluginSource> {
    source: S,
    registry: Registry,
    translator: Translator,
    tick_timeout: Duration,
    display: DisplayPlugin,
    display_index: usize,
    game: GamePlugin,
    /// Index into the game catalog; `None` while the built-in emergency
    /// menu is active.
    game_index: Option<usize>,
    scores: Option<ScoreBook>,
    on_game_over: Option<GameOverHook>,
    game_over_reported: bool,
    state: State,
}

impl<S: PluginSource> Runtime<S> {
    /// Loads the initial display and game and enters the `Running` state.
    ///
    /// A catalog without displays, or an initial display that fails to
    /// load or open, is fatal: the loop is never entered. A game catalog
    /// where nothing loads is not fatal - the built-in emergency menu
    /// becomes the active game instead.
    pub fn start(source: S, registry: Registry, config: RuntimeConfig) -> Result<Self, CoreError> {
        let displays = registry.displays();
        if displays.is_empty() {
            return Err(StartupError::NoDisplays.into());
        }

        let display_index = match &config.initial_display {
            Some(path) => displays
                .position_of(path)
                .ok_or_else(|| StartupError::UnknownDisplay(path.clone()))?,
            None => 0,
        };
        let display_info = displays.entries()[display_index].clone();

        let mut display = source.load_display(&display_info).map_err(|e| StartupError::DisplayLoad {
            path: display_info.path.clone(),
            source: e,
        })?;
        display.open().map_err(|e| StartupError::DisplayOpen {
            name: display_info.name.clone(),
            source: e,
        })?;
        info!("🖥️ Active display: '{}'", display_info.name);

        let (game, game_index) = Self::initial_game(&source, &registry, &config.bindings);

        let mut runtime = Self {
            source,
            registry,
            translator: Translator::new(config.bindings),
            tick_timeout: config.tick_timeout,
            display,
            display_index,
            game,
            game_index,
            scores: config.score_directory.map(ScoreBook::new),
            on_game_over: None,
            game_over_reported: false,
            state: State::Running,
        };
        runtime.game.init();
        info!("🎮 Active game: '{}'", runtime.game.name());

        Ok(runtime)
    }

    /// First loadable game in catalog order, or the emergency menu.
    fn initial_game(
        source: &S,
        registry: &Registry,
        bindings: &ControlBindings,
    ) -> (GamePlugin, Option<usize>) {
        for (index, info) in registry.games().entries().iter().enumerate() {
            match source.load_game(info) {
                Ok(game) => return (game, Some(index)),
                Err(e) => warn!("⚠️ Failed to load game '{}': {}", info.name, e),
            }
        }

        warn!("🚨 No game plugin could be loaded - starting the emergency menu");
        let names = registry.games().entries().iter().map(|g| g.name.clone()).collect();
        let menu = EmergencyMenu::new(names, bindings.clone());
        (GamePlugin::builtin(Box::new(menu)), None)
    }

    /// Registers a callback fired once per finished game.
    pub fn set_game_over_hook(&mut self, hook: GameOverHook) {
        self.on_game_over = Some(hook);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn active_display_name(&self) -> &str {
        self.display.name()
    }

    pub fn active_game_name(&self) -> &str {
        self.game.name()
    }

    /// Drives ticks until a quit request or a fatal error.
    pub fn run(&mut self) -> Result<(), CoreError> {
        info!(
            "▶️ Entering main loop: display '{}', game '{}'",
            self.display.name(),
            self.game.name()
        );

        while self.state == State::Running {
            if let Err(e) = self.tick() {
                // Fatal mid-loop failure: guarantee teardown before
                // propagating
                self.display.close();
                self.state = State::Terminated;
                return Err(e);
            }
        }
        Ok(())
    }

    /// One loop iteration: exactly one poll, at most one update, at most
    /// one render, in that order. A successful update is always followed
    /// by its render.
    pub fn tick(&mut self) -> Result<(), CoreError> {
        let event = match self.display.poll_event(self.tick_timeout) {
            Some(raw) => match self.translator.translate(&raw) {
                Some(event) => event,
                // Ignored native event: nothing happens this tick
                None => return Ok(()),
            },
            // Idle tick: let the game advance animations
            None => Event::Tick,
        };

        match event {
            Event::Quit => self.terminate(),
            Event::PreviousDisplay => self.swap_display(Direction::Previous)?,
            Event::NextDisplay => self.swap_display(Direction::Next)?,
            Event::PreviousGame => self.swap_game(Direction::Previous)?,
            Event::NextGame => self.swap_game(Direction::Next)?,
            event => {
                let outcome = self.game.update(&event);
                self.render_frame();
                if outcome == UpdateOutcome::Over || self.game.is_over() {
                    self.report_game_over();
                } else {
                    // Re-arms the signal after an in-place restart
                    self.game_over_reported = false;
                }
            }
        }

        Ok(())
    }

    /// Clear, game render pass, present.
    fn render_frame(&mut self) {
        self.display.clear();
        self.game.render(&mut *self.display);
        self.display.present();
    }

    /// Cycles the active display.
    ///
    /// The surface is released first (backends hold exclusive resources
    /// like the terminal or a window), then the replacement is loaded,
    /// opened, and only then substituted - the old instance and its binary
    /// are dropped after the replacement is validated. On failure the old
    /// instance, never torn down, reacquires its surface; only a failed
    /// reacquisition is fatal.
    fn swap_display(&mut self, direction: Direction) -> Result<(), CoreError> {
        let catalog = self.registry.displays();
        if catalog.len() < 2 {
            info!("🔁 Only one display available - nothing to cycle");
            return Ok(());
        }

        self.state = State::SwappingDisplay;
        // The len check above guarantees a non-empty catalog
        let Some(target_index) = (match direction {
            Direction::Next => catalog.next_index(self.display_index),
            Direction::Previous => catalog.previous_index(self.display_index),
        }) else {
            self.state = State::Running;
            return Ok(());
        };
        let target = catalog.entries()[target_index].clone();
        info!("🔄 Switching display: '{}' -> '{}'", self.display.name(), target.name);

        self.display.close();

        match self.load_and_open_display(&target) {
            Ok(replacement) => {
                self.display = replacement;
                self.display_index = target_index;
                info!("🖥️ Active display is now '{}'", target.name);
            }
            Err(swap_err) => {
                warn!("⚠️ {} - keeping display '{}'", swap_err, self.display.name());
                if let Err(e) = self.display.open() {
                    let name = self.display.name().to_string();
                    self.display.close();
                    self.state = State::Terminated;
                    return Err(SwapError::RevertFailed { name, source: e }.into());
                }
            }
        }

        self.state = State::Running;
        // The pending frame is not dropped: render through whichever
        // display is now active
        self.render_frame();
        Ok(())
    }

    fn load_and_open_display(&self, target: &LibInfo) -> Result<DisplayPlugin, SwapError> {
        let mut display =
            self.source.load_display(target).map_err(|e| SwapError::ReplacementFailed {
                kind: PluginKind::Display,
                name: target.name.clone(),
                source: e,
            })?;
        display.open().map_err(|e| SwapError::ReplacementOpenFailed {
            name: target.name.clone(),
            source: e,
        })?;
        Ok(display)
    }

    /// Cycles the active game.
    ///
    /// A replacement that fails to load is never fatal: the previous game
    /// was not torn down and simply stays active.
    fn swap_game(&mut self, direction: Direction) -> Result<(), CoreError> {
        let catalog = self.registry.games();
        if catalog.is_empty() {
            warn!("🔁 No game plugins available to cycle");
            return Ok(());
        }
        if catalog.len() < 2 && self.game_index.is_some() {
            info!("🔁 Only one game available - nothing to cycle");
            return Ok(());
        }

        self.state = State::SwappingGame;
        // The emptiness check above guarantees a non-empty catalog
        let Some(target_index) = (match self.game_index {
            Some(current) => match direction {
                Direction::Next => catalog.next_index(current),
                Direction::Previous => catalog.previous_index(current),
            },
            // Coming from the built-in menu: enter the catalog at its edge
            None => match direction {
                Direction::Next => Some(0),
                Direction::Previous => Some(catalog.len() - 1),
            },
        }) else {
            self.state = State::Running;
            return Ok(());
        };
        let target = catalog.entries()[target_index].clone();
        info!("🔄 Switching game: '{}' -> '{}'", self.game.name(), target.name);

        match self.source.load_game(&target) {
            Ok(mut replacement) => {
                replacement.init();
                self.game = replacement;
                self.game_index = Some(target_index);
                self.game_over_reported = false;
                info!("🎮 Active game is now '{}'", target.name);
            }
            Err(e) => {
                let swap_err = SwapError::ReplacementFailed {
                    kind: PluginKind::Game,
                    name: target.name.clone(),
                    source: e,
                };
                warn!("⚠️ {} - keeping game '{}'", swap_err, self.game.name());
            }
        }

        self.state = State::Running;
        self.render_frame();
        Ok(())
    }

    /// Emits the end-of-game signal. The loop keeps running so another
    /// game or a restart can be selected.
    fn report_game_over(&mut self) {
        if self.game_over_reported {
            return;
        }
        self.game_over_reported = true;

        let name = self.game.name().to_string();
        let score = self.game.score();
        info!("🏁 Game '{}' over - {} scored {}", name, score.player, score.points);

        if let Some(book) = &self.scores {
            if let Err(e) = book.record(&name, &score) {
                warn!("⚠️ Failed to record score for '{}': {}", name, e);
            }
        }
        if let Some(hook) = &mut self.on_game_over {
            hook(&name, &score);
        }
    }

    /// Quit: release the display surface and leave the loop. The active
    /// instances themselves are dropped exactly once, when the runtime is.
    fn terminate(&mut self) {
        info!("👋 Quit requested - tearing down active instances");
        self.display.close();
        self.state = State::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_api::{Cell, Display, Game, Key, MouseButton, Position, RawEvent, TextStyle};
    use arcade_plugins::{Catalog, LoadError};
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::path::PathBuf;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;
    type Script = Rc<RefCell<VecDeque<RawEvent>>>;

    struct ScriptedDisplay {
        name: String,
        script: Script,
        log: Log,
    }

    impl Display for ScriptedDisplay {
        fn open(&mut self) -> Result<(), arcade_api::PluginError> {
            self.log.borrow_mut().push(format!("open:{}", self.name));
            Ok(())
        }

        fn clear(&mut self) {
            self.log.borrow_mut().push(format!("clear:{}", self.name));
        }

        fn draw_cell(&mut self, _position: Position, _cell: Cell) {}

        fn draw_text(&mut self, _position: Position, _text: &str, _style: TextStyle) {}

        fn present(&mut self) {
            self.log.borrow_mut().push(format!("present:{}", self.name));
        }

        fn poll_event(&mut self, _timeout: Duration) -> Option<RawEvent> {
            self.log.borrow_mut().push(format!("poll:{}", self.name));
            self.script.borrow_mut().pop_front()
        }

        fn close(&mut self) {
            self.log.borrow_mut().push(format!("close:{}", self.name));
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    struct RecordingGame {
        name: String,
        log: Log,
        updates: usize,
        over_after: Option<usize>,
    }

    impl Game for RecordingGame {
        fn init(&mut self) {
            self.log.borrow_mut().push(format!("init:{}", self.name));
        }

        fn update(&mut self, event: &Event) -> UpdateOutcome {
            self.updates += 1;
            self.log.borrow_mut().push(format!("update:{}:{:?}", self.name, event));
            if self.is_over() {
                UpdateOutcome::Over
            } else {
                UpdateOutcome::Continue
            }
        }

        fn render(&mut self, _display: &mut dyn Display) {
            self.log.borrow_mut().push(format!("render:{}", self.name));
        }

        fn is_over(&self) -> bool {
            self.over_after.is_some_and(|n| self.updates >= n)
        }

        fn score(&self) -> Score {
            Score::new(self.updates as f32, "tester")
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    /// In-process plugin source; entries in the shared `failing` set
    /// refuse to load, and the set can be edited mid-test.
    struct StubSource {
        scripts: HashMap<PathBuf, Script>,
        failing: Rc<RefCell<HashSet<PathBuf>>>,
        log: Log,
        game_over_after: Option<usize>,
    }

    impl StubSource {
        fn new(log: Log) -> Self {
            Self {
                scripts: HashMap::new(),
                failing: Rc::new(RefCell::new(HashSet::new())),
                log,
                game_over_after: None,
            }
        }

        fn script_for(&mut self, info: &LibInfo, events: Vec<RawEvent>) {
            self.scripts.insert(info.path.clone(), Rc::new(RefCell::new(events.into())));
        }

        fn fail(&self, info: &LibInfo) -> Rc<RefCell<HashSet<PathBuf>>> {
            self.failing.borrow_mut().insert(info.path.clone());
            self.failing.clone()
        }
    }

    impl PluginSource for StubSource {
        fn load_display(&self, info: &LibInfo) -> Result<DisplayPlugin, LoadError> {
            if self.failing.borrow().contains(&info.path) {
                return Err(LoadError::BadImage("stub refused".into()));
            }
            let script = self
                .scripts
                .get(&info.path)
                .cloned()
                .unwrap_or_else(|| Rc::new(RefCell::new(VecDeque::new())));
            Ok(DisplayPlugin::builtin(Box::new(ScriptedDisplay {
                name: info.name.clone(),
                script,
                log: self.log.clone(),
            })))
        }

        fn load_game(&self, info: &LibInfo) -> Result<GamePlugin, LoadError> {
            if self.failing.borrow().contains(&info.path) {
                return Err(LoadError::BadImage("stub refused".into()));
            }
            Ok(GamePlugin::builtin(Box::new(RecordingGame {
                name: info.name.clone(),
                log: self.log.clone(),
                updates: 0,
                over_after: self.game_over_after,
            })))
        }
    }

    fn lib(name: &str, kind: PluginKind) -> LibInfo {
        LibInfo {
            name: name.to_string(),
            path: PathBuf::from(format!("./plugins/lib{name}.so")),
            kind,
        }
    }

    fn registry(displays: Vec<LibInfo>, games: Vec<LibInfo>) -> Registry {
        Registry::from_catalogs(Catalog::new(displays), Catalog::new(games))
    }

    fn quick_config() -> RuntimeConfig {
        RuntimeConfig { tick_timeout: Duration::from_millis(1), ..RuntimeConfig::default() }
    }

    #[test]
    fn startup_without_displays_is_fatal() {
        let log = Log::default();
        let source = StubSource::new(log);
        let reg = registry(vec![], vec![lib("minesweeper", PluginKind::Game)]);

        let err = Runtime::start(source, reg, quick_config()).err().expect("must fail");
        assert!(matches!(err, CoreError::Startup(StartupError::NoDisplays)));
    }

    #[test]
    fn startup_with_unknown_initial_display_is_fatal() {
        let log = Log::default();
        let source = StubSource::new(log);
        let reg = registry(vec![lib("ncurses", PluginKind::Display)], vec![]);
        let config = RuntimeConfig {
            initial_display: Some(PathBuf::from("./plugins/libvulkan.so")),
            ..quick_config()
        };

        let err = Runtime::start(source, reg, config).err().expect("must fail");
        assert!(matches!(err, CoreError::Startup(StartupError::UnknownDisplay(_))));
    }

    #[test]
    fn startup_without_loadable_game_falls_back_to_menu() {
        let log = Log::default();
        let games = vec![lib("minesweeper", PluginKind::Game)];
        let source = StubSource::new(log);
        source.fail(&games[0]);
        let reg = registry(vec![lib("ncurses", PluginKind::Display)], games);

        let runtime = Runtime::start(source, reg, quick_config()).expect("start");
        assert_eq!(runtime.active_game_name(), "emergency-menu");
        assert_eq!(runtime.state(), State::Running);
    }

    #[test]
    fn next_display_swaps_backend_keeps_game_and_renders() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display), lib("sdl", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log.clone());
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::F2)]);
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");

        assert_eq!(runtime.active_display_name(), "sdl");
        assert_eq!(runtime.active_game_name(), "minesweeper");
        assert_eq!(runtime.state(), State::Running);

        let log = log.borrow();
        // Old surface released before the new one is acquired, and the
        // tick's render lands on the new backend
        let close = log.iter().position(|l| l == "close:ncurses").expect("close");
        let open = log.iter().position(|l| l == "open:sdl").expect("open");
        let render = log.iter().rposition(|l| l == "render:minesweeper").expect("render");
        let present = log.iter().position(|l| l == "present:sdl").expect("present");
        assert!(close < open && open < render && render < present);
    }

    #[test]
    fn display_cycling_is_circular() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display), lib("sdl", PluginKind::Display)];

        let mut source = StubSource::new(log);
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::F2)]);
        source.script_for(&displays[1], vec![RawEvent::KeyDown(Key::F2)]);
        let reg = registry(displays, vec![]);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_display_name(), "sdl");
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_display_name(), "ncurses");
    }

    #[test]
    fn previous_display_wraps_to_the_end() {
        let log = Log::default();
        let displays = vec![
            lib("ncurses", PluginKind::Display),
            lib("sdl", PluginKind::Display),
            lib("sfml", PluginKind::Display),
        ];

        let mut source = StubSource::new(log);
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::F1)]);
        let reg = registry(displays, vec![]);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_display_name(), "sfml");
    }

    #[test]
    fn failed_display_swap_reverts_to_previous_backend() {
        let log = Log::default();
        let displays = vec![
            lib("broken_display", PluginKind::Display),
            lib("ncurses", PluginKind::Display),
        ];

        let mut source = StubSource::new(log.clone());
        source.fail(&displays[0]);
        source.script_for(&displays[1], vec![RawEvent::KeyDown(Key::F2)]);
        let reg = registry(displays, vec![]);

        let config = RuntimeConfig {
            initial_display: Some(PathBuf::from("./plugins/libncurses.so")),
            ..quick_config()
        };
        let mut runtime = Runtime::start(source, reg, config).expect("start");
        runtime.tick().expect("tick");

        // Session stays on the previous backend, surface reacquired
        assert_eq!(runtime.active_display_name(), "ncurses");
        assert_eq!(runtime.state(), State::Running);
        let reopened = log.borrow().iter().filter(|l| *l == "open:ncurses").count();
        assert_eq!(reopened, 2);
    }

    #[test]
    fn failed_game_swap_keeps_original_and_loop_continues() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("broken_game", PluginKind::Game), lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log);
        source.fail(&games[0]);
        source.script_for(
            &displays[0],
            vec![RawEvent::KeyDown(Key::F4), RawEvent::KeyDown(Key::Space)],
        );
        let reg = registry(displays, games);

        // minesweeper loads (broken_game is skipped at startup)
        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        assert_eq!(runtime.active_game_name(), "minesweeper");

        // NextGame wraps to broken_game, which refuses to load
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_game_name(), "minesweeper");
        assert_eq!(runtime.state(), State::Running);

        // Loop keeps running and the original game still receives input
        runtime.tick().expect("tick");
        assert_eq!(runtime.state(), State::Running);
    }

    #[test]
    fn tick_ordering_one_poll_one_update_one_render() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log.clone());
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::Space)]);
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        log.borrow_mut().clear();
        runtime.tick().expect("tick");

        let log = log.borrow();
        let interesting: Vec<_> = log
            .iter()
            .filter(|l| !l.starts_with("clear") && !l.starts_with("present"))
            .cloned()
            .collect();
        assert_eq!(
            interesting,
            vec![
                "poll:ncurses".to_string(),
                "update:minesweeper:KeyPress(Space)".to_string(),
                "render:minesweeper".to_string(),
            ]
        );
    }

    #[test]
    fn idle_poll_forwards_a_tick_event() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let source = StubSource::new(log.clone());
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");

        assert!(log.borrow().iter().any(|l| l == "update:minesweeper:Tick"));
    }

    #[test]
    fn ignored_native_events_cause_no_update_and_no_render() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log.clone());
        source.script_for(&displays[0], vec![RawEvent::KeyUp(Key::Space)]);
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        log.borrow_mut().clear();
        runtime.tick().expect("tick");

        let log = log.borrow();
        assert_eq!(log.as_slice(), ["poll:ncurses".to_string()]);
    }

    #[test]
    fn quit_terminates_and_closes_the_display_once() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log.clone());
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::Escape)]);
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.run().expect("run");

        assert_eq!(runtime.state(), State::Terminated);
        let closes = log.borrow().iter().filter(|l| *l == "close:ncurses").count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn mouse_clicks_reach_the_game() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log.clone());
        source.script_for(
            &displays[0],
            vec![RawEvent::MouseDown { button: MouseButton::Left, x: 4, y: 2 }],
        );
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");

        assert!(log
            .borrow()
            .iter()
            .any(|l| l.starts_with("update:minesweeper:MouseClick")));
    }

    #[test]
    fn game_over_emits_signal_once_and_loop_continues() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log);
        source.game_over_after = Some(1);
        source.script_for(
            &displays[0],
            vec![RawEvent::KeyDown(Key::Space), RawEvent::KeyDown(Key::Space)],
        );
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = reports.clone();
        runtime.set_game_over_hook(Box::new(move |name, score| {
            sink.borrow_mut().push((name.to_string(), score.points));
        }));

        runtime.tick().expect("tick");
        assert_eq!(runtime.state(), State::Running);
        runtime.tick().expect("tick");
        assert_eq!(runtime.state(), State::Running);

        // Signalled exactly once even though the game stays over
        assert_eq!(reports.borrow().len(), 1);
        assert_eq!(reports.borrow()[0].0, "minesweeper");
    }

    #[test]
    fn game_over_score_is_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log);
        source.game_over_after = Some(1);
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::Space)]);
        let reg = registry(displays, games);

        let config = RuntimeConfig {
            score_directory: Some(dir.path().to_path_buf()),
            ..quick_config()
        };
        let mut runtime = Runtime::start(source, reg, config).expect("start");
        runtime.tick().expect("tick");

        let book = ScoreBook::new(dir.path());
        let scores = book.load("minesweeper").expect("load");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].player, "tester");
    }

    #[test]
    fn next_game_from_menu_enters_the_catalog() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log);
        // The only game fails at startup, forcing the emergency menu; it
        // becomes loadable again before the user cycles
        let failing = source.fail(&games[0]);
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::F4)]);
        let reg = registry(displays, games.clone());

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        assert_eq!(runtime.active_game_name(), "emergency-menu");

        failing.borrow_mut().remove(&games[0].path);
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_game_name(), "minesweeper");
    }

    #[test]
    fn cycling_a_single_game_is_a_no_op() {
        let log = Log::default();
        let displays = vec![lib("ncurses", PluginKind::Display)];
        let games = vec![lib("minesweeper", PluginKind::Game)];

        let mut source = StubSource::new(log);
        source.script_for(&displays[0], vec![RawEvent::KeyDown(Key::F4)]);
        let reg = registry(displays, games);

        let mut runtime = Runtime::start(source, reg, quick_config()).expect("start");
        runtime.tick().expect("tick");
        assert_eq!(runtime.active_game_name(), "minesweeper");
        assert_eq!(runtime.state(), State::Running);
    }
}
