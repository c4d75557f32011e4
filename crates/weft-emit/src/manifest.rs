//! The asset manifest.
//!
//! Entries are deduplicated by content identity: the same visual asset
//! referenced from multiple nodes produces one entry listing every
//! reference site.

use serde::{Deserialize, Serialize};

use weft_core::NodeId;
use weft_semantic::{SemanticOutput, StyleLayers};
use weft_visual::{BackgroundLayer, StyleValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// An exportable vector subtree.
    Vector,
    /// A bitmap image paint.
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Content-identity id.
    pub id: String,
    pub kind: AssetKind,
    /// Every node referencing this asset.
    pub references: Vec<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub entries: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    fn add(&mut self, id: String, kind: AssetKind, reference: NodeId) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                if !entry.references.contains(&reference) {
                    entry.references.push(reference);
                }
            }
            None => self.entries.push(AssetEntry {
                id,
                kind,
                references: vec![reference],
            }),
        }
    }
}

/// Collect the manifest from the generated output: vector units from
/// element `src` attributes, bitmap assets from background layers.
pub(crate) fn collect_manifest(output: &SemanticOutput) -> AssetManifest {
    let mut manifest = AssetManifest::default();

    for element in output.root.walk() {
        if let Some(src) = element.attrs.get("src") {
            let id = src
                .trim_start_matches("assets/")
                .trim_end_matches(".svg")
                .to_string();
            manifest.add(id, AssetKind::Vector, element.node.clone());
        }
    }

    collect_image_layers(&output.layers, &mut manifest);
    manifest
}

fn collect_image_layers(layers: &StyleLayers, manifest: &mut AssetManifest) {
    for rule in layers.tokens.iter().chain(layers.component.iter()) {
        for decl in &rule.declarations {
            if let StyleValue::Layers(background) = &decl.value {
                for layer in background {
                    if let BackgroundLayer::Image(paint) = &layer.value {
                        if !paint.asset.is_empty() {
                            manifest.add(
                                paint.asset.clone(),
                                AssetKind::Image,
                                rule.node.clone(),
                            );
                        }
                    }
                }
            }
        }
    }
}
