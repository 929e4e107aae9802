//! Inspector session state
//!
//! The overlay's state machine: a closed super-state gated by `active`, and
//! inside it one of four tabs. Every transition is user-driven.

use fos_dom::NodeId;

use crate::config::DevToolsConfig;

/// Panel tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Display,
    Console,
    Storage,
    Performance,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Display, Tab::Console, Tab::Storage, Tab::Performance];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Console => "console",
            Self::Storage => "storage",
            Self::Performance => "performance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Display => "Display",
            Self::Console => "Console",
            Self::Storage => "Storage",
            Self::Performance => "Performance",
        }
    }

    /// Unknown names yield no tab
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Editable panel field (`ch` actions)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Id,
    ClassName,
    InnerHtml,
    /// The console's script input; edits only the draft
    Script,
}

impl EditField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClassName => "class",
            Self::InnerHtml => "html",
            Self::Script => "script",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "class" => Some(Self::ClassName),
            "html" => Some(Self::InnerHtml),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

/// Special panel action (`sp` actions)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAction {
    /// `tab:<name>`
    SwitchTab(Tab),
    /// `side`
    ToggleSide,
    /// `run`
    RunScript,
    /// `mark`
    Mark,
    /// `stamp`
    Stamp,
}

impl SpecialAction {
    pub fn parse(tag: &str) -> Option<Self> {
        if let Some(name) = tag.strip_prefix("tab:") {
            return Tab::parse(name).map(Self::SwitchTab);
        }
        match tag {
            "side" => Some(Self::ToggleSide),
            "run" => Some(Self::RunScript),
            "mark" => Some(Self::Mark),
            "stamp" => Some(Self::Stamp),
            _ => None,
        }
    }

    pub fn tag(self) -> String {
        match self {
            Self::SwitchTab(tab) => format!("tab:{}", tab.as_str()),
            Self::ToggleSide => "side".to_string(),
            Self::RunScript => "run".to_string(),
            Self::Mark => "mark".to_string(),
            Self::Stamp => "stamp".to_string(),
        }
    }
}

/// Panel position in viewport pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelPosition {
    pub x: i32,
    pub y: i32,
}

/// Inspector session
#[derive(Debug, Clone)]
pub struct InspectorSession {
    pub active: bool,
    /// Set only by an inspect while active. Never owning: a removed
    /// element stays addressable in its detached state.
    pub selected: Option<NodeId>,
    pub current_tab: Tab,
    pub side_mode: bool,
    pub position: PanelPosition,
    pub script_draft: String,
    /// A start mark is placed and waiting for its stamp
    pub measuring: bool,
}

impl InspectorSession {
    pub fn new(config: &DevToolsConfig) -> Self {
        Self {
            active: false,
            selected: None,
            current_tab: config.initial_tab,
            side_mode: config.side_mode,
            position: PanelPosition::default(),
            script_draft: String::new(),
            measuring: false,
        }
    }

    /// Flip activation; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// Record a selection. Ignored while inactive.
    pub fn select(&mut self, node: NodeId, position: PanelPosition) -> bool {
        if !self.active {
            return false;
        }
        self.selected = Some(node);
        self.position = position;
        true
    }
}
