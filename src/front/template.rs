use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::TemplateError;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[("index.hbs", include_str!("templates/index.hbs"))];

/// Compiled page templates. The pages carry no ledger logic; they only call
/// the JSON API from the browser.
#[derive(Clone)]
pub struct Template {
    r: Arc<handlebars::Handlebars<'static>>,
}

impl Template {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = handlebars::Handlebars::new();
        handlebars.set_strict_mode(true);
        for (name, source) in TEMPLATES {
            handlebars.register_template_string(name, *source)?;
        }
        Ok(Self {
            r: Arc::new(handlebars),
        })
    }

    pub fn render<T>(&self, name: &str, data: &T) -> Response
    where
        T: Serialize,
    {
        log::debug!("render '{}'", name);
        match self.r.render(name, data) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                log::error!("failed to render template '{}': {}", name, err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to render page",
                )
                    .into_response()
            }
        }
    }
}
