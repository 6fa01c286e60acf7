use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::command::Command;
use crate::conversation::{ResponsePane, Speaker};
use crate::movement::ConnectionStatus;
use crate::tabs::Tab;
use crate::theme::Palette;

const BUTTON_WIDTH: u16 = 14;
const BUTTON_HEIGHT: u16 = 3;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = app.theme.palette();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(palette.base), area);

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, &palette, frame, header_area);

    app.areas.buttons.clear();
    app.areas.input = None;
    app.areas.send = None;

    match app.tabs.active() {
        Tab::Controls => render_controls(app, &palette, frame, body_area),
        Tab::Conversation => render_conversation(app, &palette, frame, body_area),
        Tab::Help => render_help(&palette, frame, body_area),
    }

    render_footer(app, &palette, frame, footer_area);
}

fn render_header(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    frame.render_widget(Paragraph::new("").style(palette.header), area);

    let title = " Robot Panel ";
    let [title_area, tabs_area, status_area, toggle_area] = Layout::horizontal([
        Constraint::Length(title.len() as u16),
        Constraint::Min(0),
        Constraint::Length(20),
        Constraint::Length(10),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(title, Style::default().fg(palette.accent).bold())),
        title_area,
    );

    // Tabs are laid out by hand so each label gets its own clickable rect
    app.areas.tabs.clear();
    let mut x = tabs_area.x;
    for tab in Tab::all() {
        let label = format!(" {} {} ", tab.index() + 1, tab.title());
        let width = (label.chars().count() as u16).min(tabs_area.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        let rect = Rect::new(x, area.y, width, 1);
        let style = if app.tabs.is_active(tab) {
            palette.active
        } else {
            palette.header
        };
        frame.render_widget(Paragraph::new(Span::styled(label, style)), rect);
        app.areas.tabs.push((tab.target(), rect));
        x += width + 1;
    }

    let status = app.movement.connection;
    let status_color = match status {
        ConnectionStatus::Unknown => palette.muted,
        ConnectionStatus::Connected => palette.ok,
        ConnectionStatus::Disconnected => palette.error,
    };
    let mut status_style = Style::default().fg(status_color);
    if status.is_disconnected() {
        status_style = status_style.add_modifier(Modifier::BOLD);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(format!("● {}", status.label()), status_style)),
        status_area,
    );

    let checkbox = if app.theme.is_dark() { "[x] Dark" } else { "[ ] Dark" };
    frame.render_widget(Paragraph::new(checkbox), toggle_area);
    app.areas.theme_toggle = Some(toggle_area);
}

fn render_controls(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Movement ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [pad_area, info_area] = Layout::vertical([
        Constraint::Length(BUTTON_HEIGHT * 3 + 2),
        Constraint::Min(0),
    ])
    .areas(inner);

    // Three rows of buttons: forward / left stop right / backward
    let rows: [&[Option<Command>]; 3] = [
        &[None, Some(Command::Forward), None],
        &[Some(Command::Left), Some(Command::Stop), Some(Command::Right)],
        &[None, Some(Command::Backward), None],
    ];
    let row_areas = Layout::vertical([Constraint::Length(BUTTON_HEIGHT); 3])
        .flex(Flex::Center)
        .split(pad_area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cells = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 3])
            .flex(Flex::Center)
            .spacing(1)
            .split(*row_area);
        for (command, cell) in row.iter().zip(cells.iter()) {
            if let Some(command) = command {
                render_button(palette, frame, *cell, command.label());
                app.areas.buttons.push((command.name(), *cell));
            }
        }
    }

    let last_command = app
        .movement
        .last_command
        .map(|c| c.name())
        .unwrap_or("none");
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Last command: ", Style::default().fg(palette.muted)),
            Span::styled(last_command, Style::default().fg(palette.accent).bold()),
        ]),
        Line::from(vec![
            Span::styled("Server: ", Style::default().fg(palette.muted)),
            Span::raw(app.movement.last_response.clone().unwrap_or_default()),
        ]),
        Line::from(vec![
            Span::styled("Robot server: ", Style::default().fg(palette.muted)),
            Span::raw(app.client.base_url().to_string()),
        ]),
    ];
    if app.movement.in_flight > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} request(s) in flight", app.movement.in_flight),
            Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), info_area);
}

fn render_button(palette: &Palette, frame: &mut Frame, area: Rect, label: &str) {
    let button = Paragraph::new(Line::from(label).centered())
        .style(palette.button)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    frame.render_widget(button, area);
}

fn render_conversation(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let [left_area, history_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(area);

    let [response_area, input_row] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(left_area);

    // Assistant response
    let mut response_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(if app.conversation.is_waiting() { " Robot says (waiting) " } else { " Robot says " });
    if let ResponsePane::Reply { updated_at, .. } = &app.conversation.response {
        response_block = response_block.title_bottom(
            Line::from(format!(" Last updated: {} ", updated_at)).right_aligned(),
        );
    }

    let response_text = match &app.conversation.response {
        ResponsePane::Empty => Text::from(Span::styled(
            "Send a message to talk to the robot.",
            Style::default().fg(palette.muted),
        )),
        ResponsePane::Thinking => {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            Text::from(Span::styled(
                format!("Robot is thinking{}", dots),
                Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
            ))
        }
        ResponsePane::Reply { text, .. } => Text::from(text.as_str()),
        ResponsePane::Error(message) => Text::from(Span::styled(
            message.as_str(),
            Style::default().fg(palette.error).bold(),
        )),
    };
    frame.render_widget(
        Paragraph::new(response_text)
            .block(response_block)
            .wrap(Wrap { trim: true }),
        response_area,
    );

    // Input and send button
    let [input_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(10),
    ])
    .areas(input_row);

    let editing = app.input_mode == InputMode::Editing;
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { palette.accent } else { palette.border }))
        .title(" Message (i to type) ");

    // Horizontal scroll keeps the cursor visible
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.conversation.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };
    let visible_text: String = app
        .conversation
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    frame.render_widget(
        Paragraph::new(visible_text)
            .style(Style::default().fg(palette.you))
            .block(input_block),
        input_area,
    );
    render_button(palette, frame, send_area, "Send");
    app.areas.input = Some(input_area);
    app.areas.send = Some(send_area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }

    // History, newest first
    let history_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Conversation History ");

    let history_text = if app.conversation.history.is_empty() {
        Text::from(Span::styled(
            "No messages yet.",
            Style::default().fg(palette.muted),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for entry in &app.conversation.history {
            let color = match entry.speaker {
                Speaker::You => palette.you,
                Speaker::Robot => palette.robot,
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}:", entry.speaker.as_str()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", entry.timestamp),
                    Style::default().fg(palette.muted),
                ),
            ]));
            for line in entry.text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }
        Text::from(lines)
    };

    frame.render_widget(
        Paragraph::new(history_text)
            .block(history_block)
            .wrap(Wrap { trim: true })
            .scroll((app.conversation.scroll, 0)),
        history_area,
    );
}

fn render_help(palette: &Palette, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(palette.accent).bold();
    let rows = [
        ("↑ ↓ ← →", "drive forward / backward / left / right"),
        ("Space", "stop"),
        ("1 2 3, Tab", "switch tabs"),
        ("t", "toggle dark theme"),
        ("i / Enter", "start typing a message (Conversation tab)"),
        ("Enter", "send message while typing"),
        ("Esc", "stop typing"),
        ("j/k, PgUp/PgDn", "scroll conversation history"),
        ("q, Ctrl-C", "quit"),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:>16}  ", keys), key_style),
                Span::raw(*what),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Keys "),
    );
    frame.render_widget(help, area);
}

fn render_footer(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => palette.active,
        InputMode::Editing => Style::default().bg(palette.robot).fg(palette.base.bg.unwrap_or_default()),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " DRIVE ",
        InputMode::Editing => " TYPING ",
    };

    let key_style = palette.button;
    let label_style = palette.header;

    let hints = match (app.tabs.active(), app.input_mode) {
        (_, InputMode::Editing) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
        (Tab::Conversation, InputMode::Normal) => vec![
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" arrows ", key_style),
            Span::styled(" drive ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (_, InputMode::Normal) => vec![
            Span::styled(" arrows ", key_style),
            Span::styled(" drive ", label_style),
            Span::styled(" Space ", key_style),
            Span::styled(" stop ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" tabs ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(footer_content).style(label_style), area);
}
