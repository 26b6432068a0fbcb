use crossterm::style::Color;

/// Presentation category for a display node. Purely cosmetic; the palette
/// follows the construct kinds the walk recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    Root,
    Module,
    Function,
    AsyncFunction,
    Conditional,
    Alternative,
    Loop,
    AsyncLoop,
    While,
    Try,
    Except,
    Finally,
    Class,
    Lambda,
    Call,
    Expression,
    Assignment,
    Return,
    With,
    Import,
}

impl NodeStyle {
    pub fn color(&self) -> Color {
        match self {
            NodeStyle::Root => Color::Blue,
            NodeStyle::Module => Color::Green,
            NodeStyle::Function => Color::Yellow,
            NodeStyle::AsyncFunction => Color::Blue,
            NodeStyle::Conditional => Color::Cyan,
            NodeStyle::Alternative => Color::Magenta,
            NodeStyle::Loop => Color::Red,
            NodeStyle::AsyncLoop => Color::Yellow,
            NodeStyle::While => Color::DarkYellow,
            NodeStyle::Try => Color::Green,
            NodeStyle::Except => Color::Yellow,
            NodeStyle::Finally => Color::Blue,
            NodeStyle::Class => Color::DarkMagenta,
            NodeStyle::Lambda => Color::Green,
            NodeStyle::Call => Color::DarkMagenta,
            NodeStyle::Expression => Color::White,
            NodeStyle::Assignment => Color::Green,
            NodeStyle::Return => Color::Blue,
            NodeStyle::With => Color::Cyan,
            NodeStyle::Import => Color::Magenta,
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(
            self,
            NodeStyle::Root | NodeStyle::Function | NodeStyle::AsyncFunction | NodeStyle::Class
        )
    }
}

/// One visual row of the output tree.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub label: String,
    pub style: NodeStyle,
}

impl NodeData {
    pub fn new(label: impl Into<String>, style: NodeStyle) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }
}
