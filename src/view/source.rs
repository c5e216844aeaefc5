//! The raw-source view: the document as pretty-printed JSON.

use super::display_token::{json_tokens, DisplayToken};
use super::Render;
use crate::model::DataModel;

/// Renders the document exactly as it is stored (no reordering)
#[derive(Debug, Copy, Clone, Default)]
pub struct SourceRenderer;

impl Render for SourceRenderer {
    fn render(&self, model: &DataModel) -> Vec<DisplayToken> {
        let mut tokens = Vec::new();
        json_tokens(&model.value(), &mut tokens);
        tokens
    }
}
