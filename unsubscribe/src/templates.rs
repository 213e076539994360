use crate::utils::error_chain_fmt;
use include_dir::{include_dir, Dir};
use minijinja::{context, Environment};

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Confirmation page shown once a subscription has been removed.
pub const UNSUBSCRIBE_SUCCESSFUL: &str = "unsubscribe-successful.tmpl.html";

#[derive(thiserror::Error)]
pub enum TemplateError {
    #[error("template {0} is not bundled with this function")]
    NotFound(String),
    #[error("template {0} is not valid UTF-8")]
    NotUtf8(String),
    #[error("failed to parse template {0}")]
    InvalidTemplate(String, #[source] minijinja::Error),
    #[error("failed to render template {0}")]
    RenderError(String, #[source] minijinja::Error),
}

impl std::fmt::Debug for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// A parsed template, ready to be rendered any number of times.
pub struct ConfirmationTemplate {
    environment: Environment<'static>,
    name: &'static str,
}

impl ConfirmationTemplate {
    /// Load one of the templates embedded in the binary at build time.
    pub fn load(name: &'static str) -> Result<Self, TemplateError> {
        let source = TEMPLATE_DIR
            .get_file(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
            .contents_utf8()
            .ok_or_else(|| TemplateError::NotUtf8(name.to_string()))?;

        Self::from_source(name, source)
    }

    pub fn from_source(name: &'static str, source: &'static str) -> Result<Self, TemplateError> {
        let mut environment = Environment::new();
        environment
            .add_template(name, source)
            .map_err(|e| TemplateError::InvalidTemplate(name.to_string(), e))?;

        Ok(Self { environment, name })
    }

    /// The confirmation pages are static, so they render with an empty context.
    pub fn render(&self) -> Result<String, TemplateError> {
        self.environment
            .get_template(self.name)
            .and_then(|template| template.render(context! {}))
            .map_err(|e| TemplateError::RenderError(self.name.to_string(), e))
    }
}
