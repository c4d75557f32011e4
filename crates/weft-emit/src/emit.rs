//! Final artifact assembly.

use serde::{Deserialize, Serialize};

use weft_core::{Diagnostics, PipelineContext, WeftError};
use weft_semantic::SemanticOutput;
use weft_tokens::{render_custom_properties, render_utility_config, TokenSet};

use crate::manifest::{collect_manifest, AssetManifest};
use crate::markup::render_markup;
use crate::styles::render_layers;

/// Markup output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupDialect {
    #[default]
    Html,
    Jsx,
}

/// Stylesheet capability level. Legacy lacks conic gradient syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CssLevel {
    #[default]
    Modern,
    Legacy,
}

/// The requested output target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetFormat {
    pub markup: MarkupDialect,
    pub css: CssLevel,
}

/// One named stylesheet output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylesheetArtifact {
    pub name: String,
    pub content: String,
}

/// The full artifact set of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    pub markup: String,
    /// The three stylesheet layers, in cascade order.
    pub styles: Vec<StylesheetArtifact>,
    /// Flat custom-property declarations.
    pub token_declarations: String,
    /// Structured utility-framework configuration.
    pub token_config: String,
    pub asset_manifest: AssetManifest,
}

/// Serialize the resolved structures into the requested target's
/// syntax. No new decisions are made here beyond fidelity fallbacks.
pub fn emit(
    output: &SemanticOutput,
    tokens: &TokenSet,
    format: TargetFormat,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> Result<Artifacts, WeftError> {
    let mode = ctx.options.mode.as_deref();
    let token_declarations = render_custom_properties(tokens, mode)?;
    let token_config = render_utility_config(tokens, mode)?;

    let markup = render_markup(&output.root, format.markup);
    let styles = render_layers(&output.layers, &token_declarations, format.css, diag);
    let asset_manifest = collect_manifest(output);

    log::debug!(
        "emitted {} markup byte(s), {} stylesheet(s), {} asset(s)",
        markup.len(),
        styles.len(),
        asset_manifest.entries.len()
    );

    Ok(Artifacts {
        markup,
        styles,
        token_declarations,
        token_config,
        asset_manifest,
    })
}
