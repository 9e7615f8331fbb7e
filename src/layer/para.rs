use crate::error::Result;
use crate::scene::{NodeId, SharedScene, read_scene, write_scene};

/// Overlay container for popups, with a darken background behind them.
pub struct WindowParaLayer {
    scene: SharedScene,
    root: NodeId,
    darken: NodeId,
    contained: Vec<NodeId>,
}

impl WindowParaLayer {
    /// Both nodes must already exist in `scene`.
    pub fn new(scene: SharedScene, root: NodeId, darken: NodeId) -> Result<Self> {
        {
            let tree = read_scene(&scene);
            tree.node(root)?;
            tree.node(darken)?;
        }
        Ok(Self {
            scene,
            root,
            darken,
            contained: Vec::new(),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn darken_node(&self) -> NodeId {
        self.darken
    }

    pub fn contained(&self) -> &[NodeId] {
        &self.contained
    }

    pub fn add_screen(&mut self, node: NodeId) -> Result<()> {
        write_scene(&self.scene).set_parent(node, self.root)?;
        if !self.contained.contains(&node) {
            self.contained.push(node);
        }
        Ok(())
    }

    /// Show the darken background iff a contained screen is active.
    /// Returns the resulting state.
    pub fn refresh_darken(&self) -> bool {
        let mut tree = write_scene(&self.scene);
        let any_active = self
            .contained
            .iter()
            .any(|node| tree.is_active(*node).unwrap_or(false));
        let _ = tree.set_active(self.darken, any_active);
        any_active
    }

    /// Force the darken background on and raise it above its siblings.
    pub fn darken_bg(&self) {
        let mut tree = write_scene(&self.scene);
        let _ = tree.set_active(self.darken, true);
        let _ = tree.set_as_last_sibling(self.darken);
    }

    pub fn is_darkened(&self) -> bool {
        read_scene(&self.scene)
            .is_active(self.darken)
            .unwrap_or(false)
    }
}
