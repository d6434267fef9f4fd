//! Tera template renderer

use std::{fmt, path::Path, sync::Arc};

use anyhow::anyhow;
use tera::{Context, ErrorKind, Tera};

use crate::domain::communication::templates::{RenderError, TemplateContext, TemplateRenderer};

/// Renders named templates with [Tera](https://keats.github.io/tera/)
#[derive(Clone)]
pub struct TeraRenderer {
    tera: Arc<Tera>,
}

impl TeraRenderer {
    /// Load every template under `template_dir`, named by their path relative to it
    pub fn new(template_dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let glob = template_dir.as_ref().join("**").join("*");
        let pattern = glob
            .to_str()
            .ok_or_else(|| anyhow!("template path is not valid UTF-8: {glob:?}"))?;

        let tera = Tera::new(pattern)
            .map_err(|e| anyhow!("failed to load templates from {pattern}: {e}"))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Register in-memory templates, as `(name, source)` pairs
    pub fn from_raw_templates<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();

        tera.add_raw_templates(templates)
            .map_err(|e| anyhow!("failed to parse templates: {e}"))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Names of the registered templates
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String, RenderError> {
        let context =
            Context::from_serialize(context).map_err(|e| anyhow!("invalid template context: {e}"))?;

        self.tera.render(name, &context).map_err(|e| match &e.kind {
            ErrorKind::TemplateNotFound(missing) => RenderError::TemplateNotFound(missing.clone()),
            _ => RenderError::Render(anyhow!("failed to render {name}: {e:?}")),
        })
    }
}

impl fmt::Debug for TeraRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeraRenderer")
            .field("templates", &self.template_names())
            .finish()
    }
}
