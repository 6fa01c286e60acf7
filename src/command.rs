use crossterm::event::KeyCode;

/// One of the five actions the robot accepts on `/move/{direction}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl Command {
    pub fn all() -> [Command; 5] {
        [
            Command::Forward,
            Command::Backward,
            Command::Left,
            Command::Right,
            Command::Stop,
        ]
    }

    /// Path segment used by the server's move endpoint
    pub fn direction(&self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::Left => "left",
            Command::Right => "right",
            Command::Stop => "stop",
        }
    }

    /// Semantic name carried by the control buttons
    pub fn name(&self) -> &'static str {
        match self {
            Command::Forward => "move_forward",
            Command::Backward => "move_backward",
            Command::Left => "turn_left",
            Command::Right => "turn_right",
            Command::Stop => "stop",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Forward => "Forward",
            Command::Backward => "Backward",
            Command::Left => "Left",
            Command::Right => "Right",
            Command::Stop => "Stop",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.name() == name)
    }

    pub fn from_direction(direction: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.direction() == direction)
    }

    /// Keyboard shortcuts: arrows drive, space stops
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Command::Forward),
            KeyCode::Down => Some(Command::Backward),
            KeyCode::Left => Some(Command::Left),
            KeyCode::Right => Some(Command::Right),
            KeyCode::Char(' ') => Some(Command::Stop),
            _ => None,
        }
    }
}
