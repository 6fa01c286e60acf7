use std::path::PathBuf;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::client::RobotClient;
use crate::command::Command;
use crate::config::Config;
use crate::conversation::{Conversation, ReplyOutcome};
use crate::movement::{MoveOutcome, MovementController};
use crate::tabs::{Tab, TabBar};
use crate::theme::Theme;
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing in the conversation input; movement keys are suppressed
    Editing,
}

/// Screen regions recorded during render for mouse hit-testing
#[derive(Debug, Default)]
pub struct HitAreas {
    /// Tab buttons keyed by the pane identifier they target
    pub tabs: Vec<(&'static str, Rect)>,
    pub theme_toggle: Option<Rect>,
    pub buttons: Vec<(&'static str, Rect)>,
    pub input: Option<Rect>,
    pub send: Option<Rect>,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub tabs: TabBar,
    pub theme: Theme,

    pub movement: MovementController,
    pub conversation: Conversation,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub areas: HitAreas,

    pub client: RobotClient,
    /// Where the theme is persisted; `None` keeps it in memory only
    pub config_path: Option<PathBuf>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        config: &Config,
        config_path: Option<PathBuf>,
        client: RobotClient,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let theme = config
            .theme
            .as_deref()
            .map(Theme::from_str)
            .unwrap_or_default();

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            tabs: TabBar::default(),
            theme,
            movement: MovementController::default(),
            conversation: Conversation::default(),
            animation_frame: 0,
            areas: HitAreas::default(),
            client,
            config_path,
            events,
        }
    }

    /// Checkbox handler: checked means dark. Theme and stored value always follow it.
    pub fn set_dark(&mut self, checked: bool) {
        self.theme = Theme::from_checked(checked);

        if let Some(path) = &self.config_path {
            if let Err(e) = Config::save_theme(path, self.theme.as_str()) {
                tracing::warn!("could not persist theme to {}: {:#}", path.display(), e);
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.set_dark(!self.theme.is_dark());
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tabs.activate(tab);
        if tab != Tab::Conversation {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Fire-and-forget: one request per call, reported back as `AppEvent::Movement`
    pub fn send_command(&mut self, command: Command) {
        let seq = self.movement.begin(command);
        let client = self.client.clone();
        let tx = self.events.clone();

        tokio::spawn(async move {
            let result = client.send_command(command).await;
            let _ = tx.send(AppEvent::Movement(MoveOutcome { seq, command, result }));
        });
    }

    /// Buttons carry a semantic command name; bare directions are accepted too
    pub fn press_button(&mut self, name: &str) {
        match Command::from_name(name).or_else(|| Command::from_direction(name)) {
            Some(command) => self.send_command(command),
            None => tracing::warn!("ignoring unknown command '{}'", name),
        }
    }

    pub fn send_text(&mut self) {
        let Some(pending) = self.conversation.take_input() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.events.clone();

        tokio::spawn(async move {
            let result = client.send_text(&pending.text).await;
            let _ = tx.send(AppEvent::Reply(ReplyOutcome { seq: pending.seq, result }));
        });
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
    }
}
