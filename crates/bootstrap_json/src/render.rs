//! Fragment builders, one per injection slot.

use std::fmt;

use crate::document::{Bootstrap, Stylesheet, non_empty};

/// Named insertion point in the application shell template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    HeadTag,
    BeforeScriptLoad,
    Head,
    Body,
    BodyFooter,
    Preloaded,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::HeadTag,
        Slot::BeforeScriptLoad,
        Slot::Head,
        Slot::Body,
        Slot::BodyFooter,
        Slot::Preloaded,
    ];

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeadTag => "head-tag",
            Self::BeforeScriptLoad => "before-script-load",
            Self::Head => "head",
            Self::Body => "body",
            Self::BodyFooter => "body-footer",
            Self::Preloaded => "preloaded",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of fragment lines. Empty entries are dropped on `finish`.
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    entries: Vec<String>,
}

impl FragmentBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn push_opt(&mut self, entry: Option<&str>) {
        if let Some(entry) = entry {
            self.push(entry);
        }
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.entries
            .into_iter()
            .filter(|entry| !entry.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn head_tag(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    let class_list = non_empty(bootstrap.html_classes.as_deref())
        .map_or_else(String::new, |classes| format!(" class=\"{classes}\""));
    buffer.push(format!(
        "<head lang=\"{}\"{class_list}>",
        bootstrap.html_lang
    ));
}

fn stylesheet_link(stylesheet: &Stylesheet) -> String {
    let mut link = format!(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"",
        stylesheet.href
    );
    if let Some(media) = non_empty(stylesheet.media.as_deref()) {
        link.push_str(&format!(" media=\"{media}\""));
    }
    if let Some(target) = non_empty(stylesheet.target.as_deref()) {
        link.push_str(&format!(" data-target=\"{target}\""));
    }
    if let Some(theme_id) = stylesheet.theme_id.filter(|id| *id != 0) {
        link.push_str(&format!(" data-theme-id=\"{theme_id}\""));
    }
    link.push('>');
    link
}

fn head(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    if let Some(token) = non_empty(bootstrap.csrf_token.as_deref()) {
        buffer.push("<meta name=\"csrf-param\" content=\"authenticity_token\">");
        buffer.push(format!("<meta name=\"csrf-token\" content=\"{token}\">"));
    }
    if let Some(theme_ids) = bootstrap.theme_ids_text() {
        buffer.push(format!(
            "<meta name=\"discourse_theme_ids\" content=\"{theme_ids}\">"
        ));
    }

    let setup_data: String = bootstrap
        .setup_attributes()
        .map(|(name, value)| format!(" data-{name}=\"{}\"", html_escape(&value)))
        .collect();
    buffer.push(format!("<meta id=\"data-discourse-setup\"{setup_data} />"));

    for stylesheet in bootstrap.stylesheets() {
        buffer.push(stylesheet_link(stylesheet));
    }

    for src in &bootstrap.plugin_js {
        buffer.push(format!("<script src=\"{src}\"></script>"));
    }

    buffer.push_opt(bootstrap.theme_html.translations.as_deref());
    buffer.push_opt(bootstrap.theme_html.js.as_deref());
    buffer.push_opt(bootstrap.theme_html.head_tag.as_deref());
    buffer.push_opt(bootstrap.html.before_head_close.as_deref());
}

fn before_script_load(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    buffer.push_opt(bootstrap.html.before_script_load.as_deref());
    if let Some(locale_script) = non_empty(bootstrap.locale_script.as_deref()) {
        buffer.push(format!("<script src=\"{locale_script}\"></script>"));
    }
    for locale in bootstrap.extra_locales() {
        buffer.push(format!("<script src=\"{locale}\"></script>"));
    }
}

fn body(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    buffer.push_opt(bootstrap.theme_html.header.as_deref());
    buffer.push_opt(bootstrap.html.header.as_deref());
}

fn body_footer(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    buffer.push_opt(bootstrap.theme_html.body_tag.as_deref());
    buffer.push_opt(bootstrap.html.before_body_close.as_deref());
}

fn preloaded(buffer: &mut FragmentBuffer, bootstrap: &Bootstrap) {
    let json = bootstrap
        .preloaded
        .as_ref()
        .map_or_else(String::new, ToString::to_string);
    buffer.push(format!(
        "<div class=\"hidden\" id=\"data-preloaded\" data-preloaded=\"{}\"></div>",
        html_escape(&json)
    ));
}

/// Renders the fragment for `slot`. Pure in `bootstrap`.
#[must_use]
pub fn render(slot: Slot, bootstrap: &Bootstrap) -> String {
    let builder: fn(&mut FragmentBuffer, &Bootstrap) = match slot {
        Slot::HeadTag => head_tag,
        Slot::BeforeScriptLoad => before_script_load,
        Slot::Head => head,
        Slot::Body => body,
        Slot::BodyFooter => body_footer,
        Slot::Preloaded => preloaded,
    };

    let mut buffer = FragmentBuffer::new();
    builder(&mut buffer, bootstrap);
    buffer.finish()
}
