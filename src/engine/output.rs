use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum OutputBlock {
    Title(String),
    Text(String),
    Event(String),
    Map(String),
    Exits(String),
}

/// Player-facing text produced by one step, in display order.
#[derive(Default, Debug)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, s: impl Into<String>) {
        self.push_non_blank(s.into(), OutputBlock::Title);
    }

    pub fn say(&mut self, s: impl Into<String>) {
        self.push_non_blank(s.into(), OutputBlock::Text);
    }

    /// Something that happened to the player, e.g. a denied door.
    pub fn event(&mut self, s: impl Into<String>) {
        self.push_non_blank(s.into(), OutputBlock::Event);
    }

    /// Pre-formatted ASCII art; whitespace is kept as is.
    pub fn map(&mut self, s: impl Into<String>) {
        self.push_non_blank(s.into(), OutputBlock::Map);
    }

    pub fn set_exits(&mut self, s: impl Into<String>) {
        let s = s.into();
        if s.trim().is_empty() {
            return;
        }

        // only one Exits block, always last
        self.blocks.retain(|b| !matches!(b, OutputBlock::Exits(_)));
        self.blocks.push(OutputBlock::Exits(s));
    }

    fn push_non_blank(&mut self, s: String, make: fn(String) -> OutputBlock) {
        if !s.trim().is_empty() {
            self.blocks.push(make(s));
        }
    }
}
