use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{FrameError, Result};

/// Index of a node inside a [`SceneTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    alpha: f32,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            active: true,
            alpha: 1.0,
        }
    }
}

/// Arena backed transform hierarchy. Children render in order, so the last
/// child is drawn on top of its siblings.
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
}

pub type SharedScene = Arc<RwLock<SceneTree>>;

pub fn shared_scene() -> SharedScene {
    Arc::new(RwLock::new(SceneTree::new()))
}

/// Read access that recovers from a poisoned lock.
pub fn read_scene(scene: &SharedScene) -> RwLockReadGuard<'_, SceneTree> {
    scene.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_scene(scene: &SharedScene) -> RwLockWriteGuard<'_, SceneTree> {
    scene.write().unwrap_or_else(PoisonError::into_inner)
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node, appended as the last child of `parent` when given.
    pub fn create_node(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode::new(name.into(), parent));
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.push(id);
        }
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(FrameError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(FrameError::NodeNotFound(id))
    }

    /// Move `child` under `parent` as its last sibling.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.node(parent)?;
        if let Some(previous) = self.node(child)?.parent {
            self.node_mut(previous)?.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    pub fn set_as_last_sibling(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let siblings = &mut self.node_mut(parent)?.children;
        siblings.retain(|c| *c != id);
        siblings.push(id);
        Ok(())
    }

    pub fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn sibling_index(&self, id: NodeId) -> Result<Option<usize>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        Ok(self.node(parent)?.children.iter().position(|c| *c == id))
    }

    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        self.node_mut(id)?.active = active;
        Ok(())
    }

    /// The node's own flag, ignoring ancestors.
    pub fn is_active(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.active)
    }

    pub fn alpha(&self, id: NodeId) -> Result<f32> {
        Ok(self.node(id)?.alpha)
    }

    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) -> Result<()> {
        self.node_mut(id)?.alpha = alpha.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn find_child(&self, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0 as usize].name == name))
    }
}
