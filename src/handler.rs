use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, InputMode};
use crate::command::Command;
use crate::tabs::Tab;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Movement(outcome) => {
            app.movement.apply(outcome);
        }
        AppEvent::Reply(outcome) => app.conversation.apply_reply(outcome),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    // Drive keys win over everything else while not typing
    if let Some(command) = Command::from_key(key.code) {
        app.send_command(command);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('t') => app.toggle_theme(),

        // Tab switching
        KeyCode::Tab => {
            app.tabs.next();
            let tab = app.tabs.active();
            app.select_tab(tab);
        }
        KeyCode::BackTab => {
            app.tabs.prev();
            let tab = app.tabs.active();
            app.select_tab(tab);
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(tab) = Tab::from_index(c as usize - '1' as usize) {
                app.select_tab(tab);
            }
        }

        // Start typing
        KeyCode::Char('i') | KeyCode::Enter if app.tabs.is_active(Tab::Conversation) => {
            app.input_mode = InputMode::Editing;
        }

        // History scroll
        KeyCode::PageDown | KeyCode::Char('j') if app.tabs.is_active(Tab::Conversation) => {
            app.conversation.scroll = app.conversation.scroll.saturating_add(3);
        }
        KeyCode::PageUp | KeyCode::Char('k') if app.tabs.is_active(Tab::Conversation) => {
            app.conversation.scroll = app.conversation.scroll.saturating_sub(3);
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        // Enter sends instead of doing anything else
        KeyCode::Enter => app.send_text(),
        KeyCode::Backspace => app.conversation.backspace(),
        KeyCode::Delete => app.conversation.delete(),
        KeyCode::Left => app.conversation.cursor_left(),
        KeyCode::Right => app.conversation.cursor_right(),
        KeyCode::Home => app.conversation.cursor_home(),
        KeyCode::End => app.conversation.cursor_end(),
        KeyCode::Char(c)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            app.conversation.insert_char(c)
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;
    let hit = |area: Option<Rect>| area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(app.areas.theme_toggle) {
                app.toggle_theme();
                return;
            }

            let target = app
                .areas
                .tabs
                .iter()
                .find(|(_, r)| point_in_rect(x, y, *r))
                .map(|(t, _)| *t);
            if let Some(target) = target {
                match app.tabs.activate_target(target) {
                    Ok(tab) => app.select_tab(tab),
                    Err(e) => tracing::warn!("{:#}", e),
                }
                return;
            }

            match app.tabs.active() {
                Tab::Controls => {
                    let name = app
                        .areas
                        .buttons
                        .iter()
                        .find(|(_, r)| point_in_rect(x, y, *r))
                        .map(|(n, _)| *n);
                    if let Some(name) = name {
                        app.press_button(name);
                    }
                }
                Tab::Conversation => {
                    if hit(app.areas.send) {
                        app.send_text();
                    } else if hit(app.areas.input) {
                        app.input_mode = InputMode::Editing;
                    }
                }
                Tab::Help => {}
            }
        }
        MouseEventKind::ScrollDown if app.tabs.is_active(Tab::Conversation) => {
            app.conversation.scroll = app.conversation.scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp if app.tabs.is_active(Tab::Conversation) => {
            app.conversation.scroll = app.conversation.scroll.saturating_sub(3);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RobotClient;
    use crate::config::Config;
    use crate::conversation::{ResponsePane, Speaker};
    use crate::movement::ConnectionStatus;
    use crate::testing::{unused_url, MockRobot};
    use crate::theme::Theme;
    use tokio::sync::mpsc;

    fn app_for(url: &str) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(&Config::new(), None, RobotClient::new(url), tx);
        (app, rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(app, AppEvent::Mouse(mouse)).unwrap();
    }

    /// Feed the next task result back through the handler, like the main loop does
    async fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<AppEvent>) {
        let event = rx.recv().await.expect("request task reported back");
        handle_event(app, event).unwrap();
    }

    #[tokio::test]
    async fn test_arrow_up_posts_forward_once() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"success","message":"Moved forward"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());

        press(&mut app, KeyCode::Up);
        pump(&mut app, &mut rx).await;

        let requests = robot.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/move/forward");
        assert_eq!(app.movement.last_command, Some(Command::Forward));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unmapped_key_sends_nothing() {
        let (mut app, mut rx) = app_for(&unused_url());

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::F(5));

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(app.movement.in_flight, 0);
    }

    #[tokio::test]
    async fn test_space_while_typing_is_text_not_stop() {
        let (mut app, mut rx) = app_for(&unused_url());
        app.select_tab(Tab::Conversation);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "a b");
        press(&mut app, KeyCode::Up);

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(app.movement.in_flight, 0);
        assert_eq!(app.conversation.input, "a b");
    }

    #[tokio::test]
    async fn test_failed_move_shows_connection_lost() {
        let (mut app, mut rx) = app_for(&unused_url());

        press(&mut app, KeyCode::Char(' '));
        pump(&mut app, &mut rx).await;

        assert!(app.movement.connection.is_disconnected());
        assert_eq!(app.movement.connection.label(), "Connection Lost");
    }

    #[tokio::test]
    async fn test_button_click_sends_semantic_command() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"success","message":"Moved left"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());
        app.areas.buttons = vec![("turn_left", Rect::new(0, 5, 10, 3))];

        click(&mut app, 4, 6);
        pump(&mut app, &mut rx).await;

        assert_eq!(robot.finish()[0].path, "/move/left");
        assert_eq!(app.movement.connection, ConnectionStatus::Connected);
        assert_eq!(app.movement.last_response.as_deref(), Some("Moved left"));
    }

    #[tokio::test]
    async fn test_button_with_bare_direction_id() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"success","message":"Moved backward"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());
        app.areas.buttons = vec![("backward", Rect::new(0, 5, 10, 3))];

        click(&mut app, 4, 6);
        pump(&mut app, &mut rx).await;

        assert_eq!(robot.finish()[0].path, "/move/backward");
        assert_eq!(app.movement.last_command, Some(Command::Backward));
    }

    #[tokio::test]
    async fn test_unknown_button_sends_nothing() {
        let (mut app, mut rx) = app_for(&unused_url());
        app.press_button("jump");

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(app.movement.in_flight, 0);
    }

    #[tokio::test]
    async fn test_control_chords_not_typed_into_message() {
        let (mut app, _rx) = app_for(&unused_url());
        app.select_tab(Tab::Conversation);
        app.input_mode = InputMode::Editing;

        type_text(&mut app, "hi");
        for c in ['a', 'e', 'w'] {
            let chord = KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
            handle_event(&mut app, AppEvent::Key(chord)).unwrap();
        }
        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        handle_event(&mut app, AppEvent::Key(alt)).unwrap();
        let shifted = KeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT);
        handle_event(&mut app, AppEvent::Key(shifted)).unwrap();

        assert_eq!(app.conversation.input, "hi!");
        assert_eq!(app.conversation.cursor, 3);
    }

    #[tokio::test]
    async fn test_empty_text_sends_nothing() {
        let (mut app, mut rx) = app_for(&unused_url());
        app.select_tab(Tab::Conversation);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(app.conversation.history.is_empty());
    }

    #[tokio::test]
    async fn test_conversation_success_round() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"success","response":"Turning left"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());
        app.select_tab(Tab::Conversation);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "go left");
        press(&mut app, KeyCode::Enter);

        // Optimistic entry before the server answers
        assert_eq!(app.conversation.history[0].speaker, Speaker::You);
        assert_eq!(app.conversation.history[0].text, "go left");
        assert!(app.conversation.input.is_empty());
        assert!(app.conversation.is_waiting());

        pump(&mut app, &mut rx).await;

        assert_eq!(app.conversation.history[0].speaker, Speaker::Robot);
        assert_eq!(app.conversation.history[0].text, "Turning left");
        assert!(matches!(
            &app.conversation.response,
            ResponsePane::Reply { text, .. } if text == "Turning left"
        ));
        robot.finish();
    }

    #[tokio::test]
    async fn test_conversation_failure_round() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"error","message":"bad input"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());
        app.select_tab(Tab::Conversation);
        app.input_mode = InputMode::Editing;
        type_text(&mut app, "go left");
        press(&mut app, KeyCode::Enter);
        pump(&mut app, &mut rx).await;

        assert_eq!(app.conversation.history.len(), 1);
        assert_eq!(app.conversation.history[0].speaker, Speaker::You);
        assert_eq!(
            app.conversation.response,
            ResponsePane::Error("Error: bad input".to_string())
        );
        robot.finish();
    }

    #[tokio::test]
    async fn test_send_button_click() {
        let robot = MockRobot::start(vec![(200, r#"{"status":"success","response":"Hi"}"#)]);
        let (mut app, mut rx) = app_for(&robot.url());
        app.select_tab(Tab::Conversation);
        app.areas.send = Some(Rect::new(50, 20, 8, 3));
        app.conversation.input = "hello".to_string();
        app.conversation.cursor = 5;

        click(&mut app, 52, 21);
        pump(&mut app, &mut rx).await;

        assert_eq!(robot.finish()[0].body, r#"{"text":"hello"}"#);
        assert_eq!(app.conversation.history.len(), 2);
    }

    #[tokio::test]
    async fn test_theme_key_and_checkbox_agree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), Some(path.clone()), RobotClient::new(&unused_url()), tx);
        app.areas.theme_toggle = Some(Rect::new(70, 0, 10, 1));

        for (step, expected) in [Theme::Dark, Theme::Light, Theme::Dark].into_iter().enumerate() {
            if step % 2 == 0 {
                press(&mut app, KeyCode::Char('t'));
            } else {
                click(&mut app, 72, 0);
            }
            assert_eq!(app.theme, expected);
            let stored = Config::load_from(&path).unwrap().theme;
            assert_eq!(stored.as_deref(), Some(expected.as_str()));
        }
    }

    #[tokio::test]
    async fn test_theme_toggle_with_unreadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{"server_url": "http://10.0.0.7:5000",,}"#;
        std::fs::write(&path, original).unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::new(), Some(path.clone()), RobotClient::new(&unused_url()), tx);

        press(&mut app, KeyCode::Char('t'));

        assert_eq!(app.theme, Theme::Dark);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_tab_clicks_keep_one_active() {
        let (mut app, _rx) = app_for(&unused_url());
        app.areas.tabs = vec![
            ("controls", Rect::new(0, 0, 10, 1)),
            ("conversation", Rect::new(10, 0, 14, 1)),
            ("help", Rect::new(24, 0, 6, 1)),
            ("settings", Rect::new(31, 0, 8, 1)),
        ];

        click(&mut app, 12, 0);
        assert_eq!(app.tabs.active(), Tab::Conversation);
        click(&mut app, 12, 0);
        assert_eq!(app.tabs.active(), Tab::Conversation);
        click(&mut app, 25, 0);
        assert_eq!(app.tabs.active(), Tab::Help);
        // A tab with no matching pane leaves the selection alone
        click(&mut app, 33, 0);
        assert_eq!(app.tabs.active(), Tab::Help);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.tabs.active(), Tab::Controls);
    }

    #[tokio::test]
    async fn test_leaving_conversation_stops_editing() {
        let (mut app, _rx) = app_for(&unused_url());
        app.select_tab(Tab::Conversation);
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Char('i'));
        app.select_tab(Tab::Help);
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
