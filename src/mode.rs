pub mod arrange;
pub mod command;
pub mod insert;
pub mod normal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
    Move,
    Resize,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Move => "MOVE",
            Mode::Resize => "RESIZE",
        }
    }

    /// Modes that consume plain keys instead of treating them as commands
    pub fn owns_input(&self) -> bool {
        matches!(self, Mode::Insert | Mode::Command | Mode::Move | Mode::Resize)
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self, Mode::Move | Mode::Resize)
    }
}
