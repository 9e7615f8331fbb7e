use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::frame::Frame;
use crate::logging::{FileSink, LogLevel, Logger, json_kv, report};
use crate::scene::{NodeId, SharedScene, write_scene};
use crate::screen::{PanelPriority, ScreenHandle, ScreenKind};

use super::scaffold::FrameScaffold;

const TARGET: &str = "frame::settings";

/// Builds the controller for one blueprint. The node is already created but
/// not yet parented into a layer.
pub type ScreenFactory =
    Arc<dyn Fn(&ScreenBlueprint, NodeId, &SharedScene) -> ScreenHandle + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenBlueprint {
    pub id: String,
    #[serde(flatten)]
    pub kind: ScreenKind,
}

impl ScreenBlueprint {
    pub fn new(id: impl Into<String>, kind: ScreenKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Named container panels of one priority tier are parented to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaLayerBlueprint {
    pub priority: PanelPriority,
    pub name: String,
}

impl ParaLayerBlueprint {
    pub fn new(priority: PanelPriority, name: impl Into<String>) -> Self {
        Self {
            priority,
            name: name.into(),
        }
    }
}

fn default_para_layers() -> Vec<ParaLayerBlueprint> {
    vec![
        ParaLayerBlueprint::new(PanelPriority::None, "PanelLayer"),
        ParaLayerBlueprint::new(PanelPriority::Prioritary, "PriorityPanelLayer"),
        ParaLayerBlueprint::new(PanelPriority::Tutorial, "TutorialPanelLayer"),
    ]
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    1024 * 1024
}

fn default_min_level() -> LogLevel {
    LogLevel::Debug
}

/// JSON-lines log file the frame reports to when no logger is passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    pub path: PathBuf,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_min_level")]
    pub min_level: LogLevel,
}

impl LogSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: default_max_bytes(),
            min_level: default_min_level(),
        }
    }

    pub fn open(&self) -> Result<Logger> {
        let sink = FileSink::new(&self.path, self.max_bytes)?;
        Ok(Logger::new(sink).with_min_level(self.min_level))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSettings {
    #[serde(default)]
    pub screens: Vec<ScreenBlueprint>,
    #[serde(default = "default_true")]
    pub deactivate_screen_nodes: bool,
    #[serde(default = "default_para_layers")]
    pub panel_para_layers: Vec<ParaLayerBlueprint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogSettings>,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            screens: Vec::new(),
            deactivate_screen_nodes: true,
            panel_para_layers: default_para_layers(),
            log: None,
        }
    }
}

impl FrameSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_log(mut self, log: LogSettings) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_screen(mut self, blueprint: ScreenBlueprint) -> Self {
        self.screens.push(blueprint);
        self
    }

    /// Screen ids must be non-empty and unique; para-layer names non-empty.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for blueprint in &self.screens {
            if blueprint.id.is_empty() {
                return Err(FrameError::InvalidSettings("screen id is empty".into()));
            }
            if !seen.insert(blueprint.id.as_str()) {
                return Err(FrameError::InvalidSettings(format!(
                    "duplicate screen id `{}`",
                    blueprint.id
                )));
            }
        }
        if let Some(layer) = self.panel_para_layers.iter().find(|l| l.name.is_empty()) {
            return Err(FrameError::InvalidSettings(format!(
                "para layer for {:?} has no name",
                layer.priority
            )));
        }
        Ok(())
    }

    /// Build the scaffold and the frame. With `register_screens`, every
    /// blueprint is instantiated through `factory`, registered under its id
    /// and parented into its layer. Without an explicit `logger`, the `log`
    /// file settings are used when present.
    pub fn create_frame(
        &self,
        scene: &SharedScene,
        factory: &ScreenFactory,
        register_screens: bool,
        logger: Option<Logger>,
    ) -> Result<Frame> {
        self.validate()?;
        let logger = match logger {
            Some(logger) => Some(logger),
            None => self.log.as_ref().map(LogSettings::open).transpose()?,
        };
        let scaffold = FrameScaffold::build(scene, &self.panel_para_layers)?;
        let mut builder = Frame::builder()
            .panel_layer(scaffold.panel_layer)
            .window_layer(scaffold.window_layer);
        if let Some(logger) = logger.clone() {
            builder = builder.logger(logger);
        }
        let mut frame = builder.build()?;

        if register_screens {
            for blueprint in &self.screens {
                self.instantiate(&mut frame, blueprint, scene, factory, logger.as_ref())?;
            }
        }
        Ok(frame)
    }

    fn instantiate(
        &self,
        frame: &mut Frame,
        blueprint: &ScreenBlueprint,
        scene: &SharedScene,
        factory: &ScreenFactory,
        logger: Option<&Logger>,
    ) -> Result<()> {
        let node = write_scene(scene).create_node(blueprint.id.as_str(), None)?;
        let handle = factory(blueprint, node, scene);
        if handle.kind() != blueprint.kind {
            report(
                logger,
                LogLevel::Warn,
                TARGET,
                "blueprint_kind_mismatch",
                [json_kv("screen_id", blueprint.id.as_str())],
            );
        }
        frame.register_screen(&blueprint.id, handle, Some(node));
        if self.deactivate_screen_nodes {
            write_scene(scene).set_active(node, false)?;
        }
        report(
            logger,
            LogLevel::Debug,
            TARGET,
            "screen_instantiated",
            [json_kv("screen_id", blueprint.id.as_str())],
        );
        Ok(())
    }
}
