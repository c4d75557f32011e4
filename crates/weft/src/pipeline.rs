//! Pipeline orchestration.

use rayon::prelude::*;

use weft_core::{
    Diagnostics, ExtractedNode, NodeKind, PipelineContext, PipelineOptions, VariableTable,
    WeftError,
};
use weft_emit::{emit, Artifacts, TargetFormat};
use weft_extract::{extract, subtree_is_vector_unit, Extractor, RawNode};
use weft_layout::{interpret_all, synthesize_responsive, BreakpointMatcher, NameSuffixMatcher};
use weft_semantic::assign_semantics;
use weft_tokens::TokenSet;
use weft_visual::resolve_all;

use crate::cancel::CancelFlag;

/// Everything a run produces: the artifacts plus the intermediate
/// structures hosts typically want for auditing.
#[derive(Debug)]
pub struct PipelineOutput {
    pub artifacts: Artifacts,
    pub tree: ExtractedNode,
    pub tokens: TokenSet,
    pub diagnostics: Diagnostics,
}

/// A configured pipeline. Construct once, run any number of times;
/// nothing is shared between runs except this configuration, so
/// concurrent runs do not interfere.
pub struct Pipeline {
    options: PipelineOptions,
    variables: VariableTable,
    matcher: Box<dyn BreakpointMatcher + Send + Sync>,
    target: TargetFormat,
    cancel: CancelFlag,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            variables: VariableTable::new(),
            matcher: Box::new(NameSuffixMatcher::new()),
            target: TargetFormat::default(),
            cancel: CancelFlag::new(),
        }
    }

    /// Supply the companion variable-resolution table.
    pub fn with_variables(mut self, variables: VariableTable) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_target(mut self, target: TargetFormat) -> Self {
        self.target = target;
        self
    }

    /// Swap the responsive frame-matching strategy.
    pub fn with_matcher(mut self, matcher: Box<dyn BreakpointMatcher + Send + Sync>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the full transformation.
    pub fn run(&self, raw: &RawNode) -> Result<PipelineOutput, WeftError> {
        let ctx = PipelineContext::new(&self.options, &self.variables);
        let mut diag = Diagnostics::new();

        // Extracted
        let tree = self.extract_stage(raw, &ctx, &mut diag)?;
        self.checkpoint()?;

        // LayoutResolved
        let mut layouts = interpret_all(&tree);
        let top_level: Vec<&ExtractedNode> = tree.children.iter().collect();
        let responsive = synthesize_responsive(&top_level, &mut layouts, self.matcher.as_ref());
        self.checkpoint()?;

        // TokensCollected: the one whole-tree aggregation pass, before
        // any value is finalized.
        let tokens = weft_tokens::collect(&tree, &ctx, &mut diag);
        self.checkpoint()?;

        // VisualResolved
        let visuals = resolve_all(&tree, &tokens, &ctx, &mut diag);
        self.checkpoint()?;

        // SemanticsAssigned
        let semantics = assign_semantics(&tree, &layouts, &visuals, &tokens, &responsive, &ctx);
        self.checkpoint()?;

        // Emitted
        let artifacts = emit(&semantics, &tokens, self.target, &ctx, &mut diag)?;

        log::debug!(
            "pipeline run complete: {} token(s), {} diagnostic(s)",
            tokens.len(),
            diag.len()
        );

        Ok(PipelineOutput {
            artifacts,
            tree,
            tokens,
            diagnostics: diag,
        })
    }

    fn checkpoint(&self) -> Result<(), WeftError> {
        if self.cancel.is_cancelled() {
            Err(WeftError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Extraction, optionally fanned out over independent top-level
    /// sibling subtrees. Parallelism is an optimization only; the
    /// sequential path is the reference behavior.
    fn extract_stage(
        &self,
        raw: &RawNode,
        ctx: &PipelineContext<'_>,
        diag: &mut Diagnostics,
    ) -> Result<ExtractedNode, WeftError> {
        let children = raw.children.as_deref().unwrap_or_default();
        if !self.options.parallel || children.len() < 2 {
            return Ok(extract(raw, ctx, diag)?);
        }

        // Extract the root shell alone, then its subtrees in parallel,
        // each with its own diagnostics, merged in order afterwards.
        let mut shell = raw.clone();
        shell.children = Some(Vec::new());
        let mut root = extract(&shell, ctx, diag)?;

        let origin = raw
            .absolute_bounding_box
            .map(|b| (b.x, b.y))
            .unwrap_or((0.0, 0.0));
        let direction = root.layout.as_ref().map(|l| l.direction);

        let extracted: Vec<(ExtractedNode, Diagnostics)> = children
            .par_iter()
            .filter(|c| c.visible != Some(false))
            .map(|child| {
                let mut child_diag = Diagnostics::new();
                let extractor = Extractor::new(ctx);
                let node = extractor.subtree(child, origin, direction, &mut child_diag);
                (node, child_diag)
            })
            .collect();

        for (node, child_diag) in extracted {
            if self.cancel.is_cancelled() {
                return Err(WeftError::Cancelled);
            }
            root.children.push(node);
            diag.merge(child_diag);
        }

        // The sequential walk collapses vector units bottom-up; redo the
        // root-level check now that the children exist.
        if matches!(root.kind, NodeKind::Frame | NodeKind::Group) && subtree_is_vector_unit(&root) {
            root.kind = NodeKind::VectorContainer;
        }

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(name: &str, x: f64, width: f64, gap: f64, mode: &str) -> serde_json::Value {
        json!({
            "id": format!("card:{name}:{width}"),
            "name": name,
            "type": "FRAME",
            "absoluteBoundingBox": { "x": x, "y": 0.0, "width": width, "height": 200.0 },
            "layoutMode": mode,
            "itemSpacing": gap,
            "fills": [
                { "type": "SOLID", "color": { "r": 0.117, "g": 0.392, "b": 1.0 } }
            ],
            "cornerRadius": 8.0,
            "children": [
                {
                    "id": format!("t:{name}:{width}"),
                    "name": "Title",
                    "type": "TEXT",
                    "characters": "Weft",
                    "style": { "fontFamily": "Inter", "fontSize": 28.0, "fontWeight": 700.0 },
                    "absoluteBoundingBox": { "x": x + 16.0, "y": 16.0, "width": 120.0, "height": 32.0 }
                }
            ]
        })
    }

    fn page() -> RawNode {
        serde_json::from_value(json!({
            "id": "0:0",
            "name": "Page",
            "type": "FRAME",
            "absoluteBoundingBox": { "x": 0.0, "y": 0.0, "width": 1440.0, "height": 900.0 },
            "children": [
                card("Card", 0.0, 320.0, 8.0, "VERTICAL"),
                card("Card#tablet", 340.0, 704.0, 16.0, "VERTICAL"),
                card("Card#desktop", 1100.0, 960.0, 16.0, "HORIZONTAL")
            ]
        }))
        .expect("fixture parses")
    }

    #[test]
    fn test_end_to_end_responsive_card() {
        let output = Pipeline::new(PipelineOptions::default())
            .run(&page())
            .expect("run succeeds");

        // Breakpoint variants are suppressed from markup: one card block.
        assert_eq!(output.artifacts.markup.matches("Weft").count(), 1);

        // The component layer carries ascending min-width overrides, and
        // the direction flip re-emits the reset list.
        let components = &output.artifacts.styles[2].content;
        let tablet = components.find("@media (min-width: 768px)").unwrap();
        let desktop = components.find("@media (min-width: 1024px)").unwrap();
        assert!(tablet < desktop);
        let desktop_block = &components[desktop..];
        assert!(desktop_block.contains("flex-direction: row;"));
        assert!(desktop_block.contains("flex-basis: auto;"));

        // The card fill appears three times across the family, so it
        // promoted to a token.
        assert!(output
            .artifacts
            .token_declarations
            .contains("--color-primary"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let raw = page();
        let sequential = Pipeline::new(PipelineOptions::default())
            .run(&raw)
            .expect("sequential run");
        let parallel = Pipeline::new(PipelineOptions::default().with_parallel(true))
            .run(&raw)
            .expect("parallel run");

        assert_eq!(sequential.artifacts, parallel.artifacts);
        assert_eq!(sequential.diagnostics.len(), parallel.diagnostics.len());
    }

    #[test]
    fn test_cancellation_between_stages() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = Pipeline::new(PipelineOptions::default())
            .with_cancel(cancel)
            .run(&page());
        assert!(matches!(result, Err(WeftError::Cancelled)));
    }

    #[test]
    fn test_missing_root_is_the_only_fatal_input() {
        let raw: RawNode = serde_json::from_value(json!({})).expect("parses");
        let result = Pipeline::new(PipelineOptions::default()).run(&raw);
        assert!(result.is_err());

        // A tree full of recoverable problems still emits.
        let raw: RawNode = serde_json::from_value(json!({
            "id": "0:0",
            "type": "FRAME",
            "children": [
                { "id": "1", "type": "WIDGET", "name": "Embedded thing" },
                { "id": "2", "type": "TEXT", "characters": "ok" }
            ]
        }))
        .expect("parses");
        let output = Pipeline::new(PipelineOptions::default())
            .run(&raw)
            .expect("recoverable problems do not abort");
        assert!(!output.diagnostics.is_empty());
        assert!(output.artifacts.markup.contains("data-unsupported=\"WIDGET\""));
    }
}
