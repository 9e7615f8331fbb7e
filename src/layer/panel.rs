use std::collections::HashMap;

use crate::error::Result;
use crate::logging::{LogLevel, json_kv};
use crate::metrics::FrameMetrics;
use crate::scene::{NodeId, SharedScene, write_scene};
use crate::screen::{PanelPriority, ScreenKind, ScreenProperties};

use super::registry::{RegisteredScreen, ScreenLayer, ScreenRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityLayerEntry {
    pub priority: PanelPriority,
    pub target: NodeId,
}

impl PriorityLayerEntry {
    pub fn new(priority: PanelPriority, target: NodeId) -> Self {
        Self { priority, target }
    }
}

/// Priority tier → para-layer container, cached on first lookup.
#[derive(Debug, Clone, Default)]
pub struct PriorityLayerList {
    entries: Vec<PriorityLayerEntry>,
    lookup: HashMap<PanelPriority, NodeId>,
}

impl PriorityLayerList {
    pub fn new(entries: Vec<PriorityLayerEntry>) -> Self {
        Self {
            entries,
            lookup: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &[PriorityLayerEntry] {
        &self.entries
    }

    /// Later entries for the same tier win.
    pub fn para_layer_lookup(&mut self) -> &HashMap<PanelPriority, NodeId> {
        if self.lookup.is_empty() {
            self.lookup = self
                .entries
                .iter()
                .map(|entry| (entry.priority, entry.target))
                .collect();
        }
        &self.lookup
    }
}

/// Non-exclusive screens routed by priority tier. No queueing and no
/// history: every panel is shown and hidden on request.
pub struct PanelLayer {
    registry: ScreenRegistry,
    priority_layers: PriorityLayerList,
}

impl PanelLayer {
    pub const TARGET: &'static str = "frame::panel";

    pub fn new(scene: SharedScene, root: NodeId, priority_layers: PriorityLayerList) -> Self {
        Self {
            registry: ScreenRegistry::new("panel", Self::TARGET, scene, root),
            priority_layers,
        }
    }

    pub fn is_panel_visible(&self, id: &str) -> bool {
        self.registry
            .get(id)
            .is_some_and(|panel| panel.handle.is_visible())
    }

    pub fn priority_layers(&self) -> &PriorityLayerList {
        &self.priority_layers
    }

    fn reparent_to_para_layer(&mut self, priority: PanelPriority, node: NodeId) -> Result<()> {
        let target = self
            .priority_layers
            .para_layer_lookup()
            .get(&priority)
            .copied()
            .unwrap_or(self.registry.root());
        write_scene(self.registry.scene()).set_parent(node, target)
    }
}

impl ScreenLayer for PanelLayer {
    fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut ScreenRegistry {
        &mut self.registry
    }

    fn accepts(&self, kind: &ScreenKind) -> bool {
        matches!(kind, ScreenKind::Panel(_))
    }

    fn show_screen(
        &mut self,
        screen: &RegisteredScreen,
        properties: Option<ScreenProperties>,
    ) -> Result<()> {
        screen.handle.show(properties.as_ref());
        self.registry.record(FrameMetrics::record_panel_shown);
        self.registry.report(
            LogLevel::Debug,
            "panel_shown",
            [json_kv("screen_id", screen.id.as_str())],
        );
        Ok(())
    }

    fn hide_screen(&mut self, screen: &RegisteredScreen) -> Result<()> {
        screen.handle.hide(true);
        self.registry.record(FrameMetrics::record_panel_hidden);
        self.registry.report(
            LogLevel::Debug,
            "panel_hidden",
            [json_kv("screen_id", screen.id.as_str())],
        );
        Ok(())
    }

    fn reparent_screen(&mut self, screen: &RegisteredScreen, node: NodeId) -> Result<()> {
        match screen.kind {
            ScreenKind::Panel(traits) => self.reparent_to_para_layer(traits.priority, node),
            ScreenKind::Window(_) => self.registry.place_under_root(node),
        }
    }
}
