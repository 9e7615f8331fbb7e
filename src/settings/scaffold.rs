use crate::error::Result;
use crate::layer::{PanelLayer, PriorityLayerEntry, PriorityLayerList, WindowLayer, WindowParaLayer};
use crate::scene::{NodeId, SceneTree, SharedScene, write_scene};

use super::core::ParaLayerBlueprint;

pub const FRAME_NODE: &str = "UIFrame";
pub const PANEL_LAYER_NODE: &str = "PanelLayer";
pub const WINDOW_LAYER_NODE: &str = "WindowLayer";
pub const POPUP_LAYER_NODE: &str = "PriorityWindowLayer";
pub const DARKEN_NODE: &str = "DarkenBG";

/// Scene hierarchy of a frame plus the two layers living in it.
///
/// Sibling order under the frame node is the draw order: panel layer, window
/// layer, the regular panel para layers, the popup layer with its darken
/// background, then the panel tiers that render above popups.
pub struct FrameScaffold {
    pub frame_node: NodeId,
    pub panel_layer: PanelLayer,
    pub window_layer: WindowLayer,
}

impl FrameScaffold {
    pub fn build(scene: &SharedScene, para_layers: &[ParaLayerBlueprint]) -> Result<Self> {
        let (frame_node, panel_root, window_root, popup_root, darken, entries) = {
            let mut tree = write_scene(scene);
            let frame_node = tree.create_node(FRAME_NODE, None)?;
            let panel_root = tree.create_node(PANEL_LAYER_NODE, Some(frame_node))?;
            let window_root = tree.create_node(WINDOW_LAYER_NODE, Some(frame_node))?;

            let mut entries = Vec::with_capacity(para_layers.len());
            for layer in para_layers.iter().filter(|l| !l.priority.renders_above_popups()) {
                let target = find_or_create(&mut tree, frame_node, &layer.name)?;
                entries.push(PriorityLayerEntry::new(layer.priority, target));
            }

            let popup_root = tree.create_node(POPUP_LAYER_NODE, Some(frame_node))?;
            let darken = tree.create_node(DARKEN_NODE, Some(popup_root))?;
            tree.set_active(darken, false)?;

            for layer in para_layers.iter().filter(|l| l.priority.renders_above_popups()) {
                let target = find_or_create(&mut tree, frame_node, &layer.name)?;
                entries.push(PriorityLayerEntry::new(layer.priority, target));
            }
            (frame_node, panel_root, window_root, popup_root, darken, entries)
        };

        let para = WindowParaLayer::new(scene.clone(), popup_root, darken)?;
        Ok(Self {
            frame_node,
            panel_layer: PanelLayer::new(scene.clone(), panel_root, PriorityLayerList::new(entries)),
            window_layer: WindowLayer::new(scene.clone(), window_root, para),
        })
    }
}

fn find_or_create(tree: &mut SceneTree, parent: NodeId, name: &str) -> Result<NodeId> {
    match tree.find_child(parent, name)? {
        Some(existing) => Ok(existing),
        None => tree.create_node(name, Some(parent)),
    }
}
