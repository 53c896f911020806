//! Replaces `{{content-for "slot"}}` markers in an application shell template.

use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

use crate::context::BootstrapContext;

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{\{\s*content-for\s+['"]([^'"]+)['"]\s*\}\}"#)
            .expect("content-for marker regex")
    })
}

/// Slot names referenced by `template`, in order of appearance.
#[must_use]
pub fn marker_slots(template: &str) -> Vec<String> {
    marker_pattern()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Unknown slots, or an unloaded context, leave an empty string behind.
#[must_use]
pub fn inject(template: &str, context: &BootstrapContext) -> String {
    marker_pattern()
        .replace_all(template, |caps: &Captures<'_>| {
            context.content_for(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}
