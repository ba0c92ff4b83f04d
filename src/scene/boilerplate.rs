use crate::foundation::error::SceneResult;
use crate::scene::document::{SCENE_FACTORY, SceneDocument, frame_body};

/// Import block written above the scene wrapper when a full document is generated.
pub const DEFAULT_HEADER: &str = "/** @jsxImportSource @revideo/2d/lib */
import {Img, Layout, Txt, makeScene2D, Video, Circle, Rect, Rive} from '@revideo/2d';
import {createRef, useScene, waitFor, all, createSignal, easeInBounce, easeInExpo} from '@revideo/core';
import type {View2D} from '@revideo/2d';";

/// Fixed parts of a generated scene document: imports and the wrapper declaration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneBoilerplate {
    /// Text placed before the wrapper (pragma and imports).
    pub header: String,
    /// Name passed as the first argument of the scene factory.
    pub scene_name: String,
    /// Parameter list of the scene generator.
    pub view_param: String,
}

impl Default for SceneBoilerplate {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            scene_name: "main".to_string(),
            view_param: "view: View2D".to_string(),
        }
    }
}

impl SceneBoilerplate {
    /// Wrap `body` into a complete, self-contained scene document.
    pub fn render(&self, body: &str) -> String {
        let name = serde_json::Value::String(self.scene_name.clone());
        format!(
            "{header}\n\nexport default {SCENE_FACTORY}({name}, function* ({param}) {{{body}}});\n",
            header = self.header.trim_end(),
            param = self.view_param,
            body = frame_body(body),
        )
    }

    /// Check that the boilerplate alone renders a document with exactly one mutable region.
    pub fn validate(&self) -> SceneResult<()> {
        SceneDocument::parse(self.render("")).map(|_| ())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/boilerplate.rs"]
mod tests;
