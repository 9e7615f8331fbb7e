use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Para-layer a panel is parented to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelPriority {
    #[default]
    None,
    Prioritary,
    Tutorial,
    Blocker,
}

impl PanelPriority {
    /// Tiers that sit above the popup overlay in the frame scaffold.
    pub fn renders_above_popups(self) -> bool {
        matches!(self, PanelPriority::Tutorial | PanelPriority::Blocker)
    }
}

/// How a window behaves when another one is already in the foreground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPriority {
    /// Opened immediately, preempting the current window.
    #[default]
    ForceForeground,
    /// Queued until the current window closes.
    Enqueue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTraits {
    #[serde(default)]
    pub priority: PanelPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTraits {
    #[serde(default)]
    pub priority: WindowPriority,
    #[serde(default = "default_hide_on_foreground_lost")]
    pub hide_on_foreground_lost: bool,
    #[serde(default)]
    pub is_popup: bool,
}

fn default_hide_on_foreground_lost() -> bool {
    true
}

impl Default for WindowTraits {
    fn default() -> Self {
        Self {
            priority: WindowPriority::ForceForeground,
            hide_on_foreground_lost: true,
            is_popup: false,
        }
    }
}

impl WindowTraits {
    pub fn popup() -> Self {
        Self {
            is_popup: true,
            hide_on_foreground_lost: false,
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: WindowPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_hide_on_foreground_lost(mut self, hide: bool) -> Self {
        self.hide_on_foreground_lost = hide;
        self
    }
}

/// Capability tag carried by every screen. Layers resolve it once when the
/// screen is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenKind {
    Panel(PanelTraits),
    Window(WindowTraits),
}

impl ScreenKind {
    pub fn panel(priority: PanelPriority) -> Self {
        ScreenKind::Panel(PanelTraits { priority })
    }

    pub fn window(traits: WindowTraits) -> Self {
        ScreenKind::Window(traits)
    }

    pub fn as_panel(&self) -> Option<&PanelTraits> {
        match self {
            ScreenKind::Panel(traits) => Some(traits),
            ScreenKind::Window(_) => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowTraits> {
        match self {
            ScreenKind::Window(traits) => Some(traits),
            ScreenKind::Panel(_) => None,
        }
    }

    pub fn is_popup(&self) -> bool {
        self.as_window().is_some_and(|traits| traits.is_popup)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelProperties {
    pub priority: PanelPriority,
    pub data: Option<Value>,
}

impl PanelProperties {
    pub fn new(priority: PanelPriority) -> Self {
        Self {
            priority,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Per-open window configuration.
///
/// Unless `suppress_defaults` is set, only `data` reaches the history entry's
/// behaviour; priority, popup and foreground-lost flags fall back to what
/// the window declared when it was registered.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProperties {
    pub priority: WindowPriority,
    pub hide_on_foreground_lost: bool,
    pub is_popup: bool,
    pub suppress_defaults: bool,
    pub data: Option<Value>,
}

impl Default for WindowProperties {
    fn default() -> Self {
        Self {
            priority: WindowPriority::ForceForeground,
            hide_on_foreground_lost: true,
            is_popup: false,
            suppress_defaults: false,
            data: None,
        }
    }
}

impl WindowProperties {
    pub fn new(priority: WindowPriority) -> Self {
        Self {
            priority,
            hide_on_foreground_lost: false,
            ..Self::default()
        }
    }

    pub fn suppressing_defaults(mut self) -> Self {
        self.suppress_defaults = true;
        self
    }

    pub fn with_hide_on_foreground_lost(mut self, hide: bool) -> Self {
        self.hide_on_foreground_lost = hide;
        self
    }

    pub fn with_popup(mut self, is_popup: bool) -> Self {
        self.is_popup = is_popup;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Traits the window runs with for this open.
    pub fn effective_traits(&self, declared: WindowTraits) -> WindowTraits {
        if self.suppress_defaults {
            WindowTraits {
                priority: self.priority,
                hide_on_foreground_lost: self.hide_on_foreground_lost,
                is_popup: self.is_popup,
            }
        } else {
            declared
        }
    }
}

/// Payload handed to [`ScreenController::show`](super::ScreenController::show).
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenProperties {
    Panel(PanelProperties),
    Window(WindowProperties),
}

impl ScreenProperties {
    pub fn as_window(&self) -> Option<&WindowProperties> {
        match self {
            ScreenProperties::Window(props) => Some(props),
            ScreenProperties::Panel(_) => None,
        }
    }

    pub fn as_panel(&self) -> Option<&PanelProperties> {
        match self {
            ScreenProperties::Panel(props) => Some(props),
            ScreenProperties::Window(_) => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ScreenProperties::Panel(props) => props.data.as_ref(),
            ScreenProperties::Window(props) => props.data.as_ref(),
        }
    }
}

impl From<PanelProperties> for ScreenProperties {
    fn from(props: PanelProperties) -> Self {
        ScreenProperties::Panel(props)
    }
}

impl From<WindowProperties> for ScreenProperties {
    fn from(props: WindowProperties) -> Self {
        ScreenProperties::Window(props)
    }
}
