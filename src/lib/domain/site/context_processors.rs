//! Template context processors

use serde_json::Value;

use crate::domain::communication::templates::TemplateContext;

use super::SiteConfig;

/// Context key set by [`track_visit`]
pub const TRACK_VISIT: &str = "track_visit";

/// Who is making the request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visitor {
    /// Staff members aren't tracked
    pub is_staff: bool,
}

/// Whether analytics should track the current visit.
///
/// Visits aren't tracked in debug mode, under tests, or when the visitor is
/// a staff member.
pub fn track_visit(site: &SiteConfig, visitor: Option<&Visitor>) -> TemplateContext {
    let is_staff = visitor.is_some_and(|v| v.is_staff);
    let track = !(site.debug || site.testing || is_staff);

    TemplateContext::from([(TRACK_VISIT.to_string(), Value::Bool(track))])
}
