//! Template rendering seam

use std::collections::HashMap;

use thiserror::Error;

#[cfg(test)]
use mockall::mock;

/// Context data used to render templates
pub type TemplateContext = HashMap<String, serde_json::Value>;

/// Errors raised while rendering a template
#[derive(Debug, Error)]
pub enum RenderError {
    /// No template is registered under that name
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template exists but could not be rendered
    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

/// Renders named templates
pub trait TemplateRenderer: Send + Sync {
    /// Render the template registered as `name` with `context`
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String, RenderError>;
}

#[cfg(test)]
mock! {
    pub TemplateRenderer {}

    impl TemplateRenderer for TemplateRenderer {
        fn render(&self, name: &str, context: &TemplateContext) -> Result<String, RenderError>;
    }
}
