//! `[theme]` section: logo, navigation bar, sidebars and edit-link settings.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::ConfigShapeError;
use crate::expand::expand_env;
use crate::validate::{require_link, require_non_empty, require_present, require_relative_path};

/// Raw theme section as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ThemeConfigRaw {
    logo: Option<String>,
    repo: String,
    edit_links: bool,
    docs_dir: String,
    edit_link_text: String,
    last_updated: bool,
    nav: Vec<NavLinkRaw>,
    sidebar: BTreeMap<String, Vec<SidebarGroupRaw>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NavLinkRaw {
    text: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidebarGroupRaw {
    title: Option<String>,
    #[serde(default = "default_collapsable")]
    collapsable: bool,
    #[serde(default)]
    children: Vec<SidebarChild>,
}

fn default_collapsable() -> bool {
    true
}

/// Theme configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    logo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    edit_links: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    docs_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit_link_text: Option<String>,
    last_updated: bool,
    nav: Vec<NavLink>,
    sidebar: BTreeMap<String, Vec<SidebarGroup>>,
}

/// Top navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    text: String,
    link: String,
}

impl NavLink {
    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Link target: an http(s) URL or a root-relative path.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Whether the link leaves the site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        !self.link.starts_with('/')
    }
}

/// Named cluster of sidebar entries under a path prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    title: String,
    collapsable: bool,
    children: Vec<SidebarChild>,
}

impl SidebarGroup {
    /// Group title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the group can be collapsed by the reader.
    #[must_use]
    pub fn collapsable(&self) -> bool {
        self.collapsable
    }

    /// Entries in display order.
    #[must_use]
    pub fn children(&self) -> &[SidebarChild] {
        &self.children
    }
}

/// Sidebar entry, relative to its section prefix.
///
/// In the site source a bare string is a page whose title comes from the
/// page itself (`""` is the section index). A `[path, title]` pair sets the
/// title explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarChild {
    /// Page path.
    Page(String),
    /// Page path and display title.
    Titled(String, String),
}

impl SidebarChild {
    /// Path relative to the section prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Page(path) | Self::Titled(path, _) => path,
        }
    }

    /// Explicit display title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Page(_) => None,
            Self::Titled(_, title) => Some(title),
        }
    }

    /// Whether this entry is the section index page.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.path().is_empty()
    }
}

impl ThemeConfig {
    /// Logo asset reference.
    #[must_use]
    pub fn logo(&self) -> &str {
        &self.logo
    }

    /// Source repository, if configured.
    #[must_use]
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Whether pages show an "edit this page" link.
    #[must_use]
    pub fn edit_links(&self) -> bool {
        self.edit_links
    }

    /// Docs directory inside the repository, if configured.
    #[must_use]
    pub fn docs_dir(&self) -> Option<&str> {
        self.docs_dir.as_deref()
    }

    /// Custom text for the edit link, if configured.
    #[must_use]
    pub fn edit_link_text(&self) -> Option<&str> {
        self.edit_link_text.as_deref()
    }

    /// Whether pages show their last-updated time.
    #[must_use]
    pub fn last_updated(&self) -> bool {
        self.last_updated
    }

    /// Navigation entries in display order.
    #[must_use]
    pub fn nav(&self) -> &[NavLink] {
        &self.nav
    }

    /// Sidebars keyed by path prefix.
    #[must_use]
    pub fn sidebar(&self) -> &BTreeMap<String, Vec<SidebarGroup>> {
        &self.sidebar
    }

    /// Sidebar groups for a page path.
    ///
    /// The longest prefix that `path` starts with wins, so `/posts/` and a
    /// catch-all `/` can coexist regardless of how the source lists them.
    #[must_use]
    pub fn sidebar_for(&self, path: &str) -> Option<(&str, &[SidebarGroup])> {
        self.sidebar
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, groups)| (prefix.as_str(), groups.as_slice()))
    }

    /// Validate the raw section and expand environment variables.
    pub(crate) fn from_raw(raw: ThemeConfigRaw) -> Result<Self, ConfigShapeError> {
        let logo = require_present(raw.logo, "theme.logo")?;
        let logo = expand_env(&logo, "theme.logo")?;
        require_link(&logo, "theme.logo")?;

        let repo = non_empty(expand_env(&raw.repo, "theme.repo")?);
        if let Some(repo) = &repo {
            require_link(repo, "theme.repo")?;
        }
        if raw.edit_links && repo.is_none() {
            tracing::warn!("theme.edit_links is enabled but theme.repo is not set");
        }

        let nav = resolve_nav(raw.nav)?;
        let sidebar: BTreeMap<String, Vec<SidebarGroup>> = raw
            .sidebar
            .into_iter()
            .map(|(prefix, groups)| {
                let groups = resolve_sidebar(&prefix, groups)?;
                Ok((prefix, groups))
            })
            .collect::<Result<_, ConfigShapeError>>()?;

        Ok(Self {
            logo,
            repo,
            edit_links: raw.edit_links,
            docs_dir: non_empty(raw.docs_dir),
            edit_link_text: non_empty(raw.edit_link_text),
            last_updated: raw.last_updated,
            nav,
            sidebar,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn resolve_nav(raw: Vec<NavLinkRaw>) -> Result<Vec<NavLink>, ConfigShapeError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut nav = Vec::with_capacity(raw.len());

    for (i, entry) in raw.into_iter().enumerate() {
        let text_field = format!("theme.nav[{i}].text");
        let link_field = format!("theme.nav[{i}].link");

        let text = require_present(entry.text, &text_field)?;
        require_non_empty(&text, &text_field)?;

        let link = require_present(entry.link, &link_field)?;
        let link = expand_env(&link, &link_field)?;
        require_link(&link, &link_field)?;

        if let Some(first) = seen.insert(link.clone(), i) {
            return Err(ConfigShapeError::invalid(
                link_field,
                format!("'{link}' duplicates theme.nav[{first}].link"),
            ));
        }

        nav.push(NavLink { text, link });
    }

    Ok(nav)
}

fn resolve_sidebar(
    prefix: &str,
    raw: Vec<SidebarGroupRaw>,
) -> Result<Vec<SidebarGroup>, ConfigShapeError> {
    let base = format!("theme.sidebar.\"{prefix}\"");
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(ConfigShapeError::invalid(
            base,
            "path prefix must start and end with /",
        ));
    }

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut groups = Vec::with_capacity(raw.len());

    for (g, group) in raw.into_iter().enumerate() {
        let title_field = format!("{base}[{g}].title");
        let title = require_present(group.title, &title_field)?;
        require_non_empty(&title, &title_field)?;

        for (c, child) in group.children.iter().enumerate() {
            let field = format!("{base}[{g}].children[{c}]");
            require_relative_path(child.path(), &field)?;
            if let Some(title) = child.title() {
                require_non_empty(title, &field)?;
            }
            if let Some(first) = seen.insert(child.path().to_owned(), field.clone()) {
                return Err(ConfigShapeError::invalid(
                    field,
                    format!("'{}' duplicates {first}", child.path()),
                ));
            }
        }

        groups.push(SidebarGroup {
            title,
            collapsable: group.collapsable,
            children: group.children,
        });
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Doc {
        theme: ThemeConfigRaw,
    }

    fn resolve(toml: &str) -> Result<ThemeConfig, ConfigShapeError> {
        let doc: Doc = toml::from_str(toml).unwrap();
        ThemeConfig::from_raw(doc.theme)
    }

    fn assert_shape_error(toml: &str, field: &str, expected: &str) {
        let err = resolve(toml).unwrap_err();
        assert_eq!(err.field(), Some(field), "unexpected error: {err}");
        let msg = err.to_string();
        assert!(msg.contains(expected), "Expected '{expected}' in: {msg}");
    }

    #[test]
    fn test_minimal_theme() {
        let theme = resolve("[theme]\nlogo = \"/logo.png\"").unwrap();
        assert_eq!(theme.logo(), "/logo.png");
        assert!(theme.repo().is_none());
        assert!(!theme.edit_links());
        assert!(theme.docs_dir().is_none());
        assert!(theme.edit_link_text().is_none());
        assert!(!theme.last_updated());
        assert!(theme.nav().is_empty());
        assert!(theme.sidebar().is_empty());
    }

    #[test]
    fn test_logo_required() {
        assert_shape_error("[theme]\nrepo = \"\"", "theme.logo", "required");
    }

    #[test]
    fn test_logo_must_be_link() {
        assert_shape_error("[theme]\nlogo = \"logo.png\"", "theme.logo", "must start with");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Doc, _> = toml::from_str("[theme]\nlogo = \"/l.png\"\nlogoo = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_link_settings() {
        let theme = resolve(
            r#"[theme]
logo = "/logo.png"
repo = "https://github.com/ShahriyarR/azepug"
edit_links = true
docs_dir = "docs/src"
edit_link_text = "Edit on GitHub"
last_updated = true
"#,
        )
        .unwrap();
        assert_eq!(theme.repo(), Some("https://github.com/ShahriyarR/azepug"));
        assert!(theme.edit_links());
        assert_eq!(theme.docs_dir(), Some("docs/src"));
        assert_eq!(theme.edit_link_text(), Some("Edit on GitHub"));
        assert!(theme.last_updated());
    }

    #[test]
    fn test_edit_links_without_repo_is_allowed() {
        let theme = resolve("[theme]\nlogo = \"/l.png\"\nedit_links = true").unwrap();
        assert!(theme.edit_links());
        assert!(theme.repo().is_none());
    }

    #[test]
    fn test_nav_order_and_external() {
        let theme = resolve(
            r#"[theme]
logo = "/l.png"

[[theme.nav]]
text = "Telegram Group"
link = "https://t.me/azepug"

[[theme.nav]]
text = "Blog Posts"
link = "/posts/"
"#,
        )
        .unwrap();
        let nav = theme.nav();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].text(), "Telegram Group");
        assert!(nav[0].is_external());
        assert_eq!(nav[1].link(), "/posts/");
        assert!(!nav[1].is_external());
    }

    #[test]
    fn test_nav_text_required() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.nav]]\nlink = \"/a/\"",
            "theme.nav[0].text",
            "required",
        );
    }

    #[test]
    fn test_nav_text_non_empty() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.nav]]\ntext = \"\"\nlink = \"/a/\"",
            "theme.nav[0].text",
            "empty",
        );
    }

    #[test]
    fn test_nav_link_invalid() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.nav]]\ntext = \"A\"\nlink = \"a/\"",
            "theme.nav[0].link",
            "must start with",
        );
    }

    #[test]
    fn test_nav_link_duplicate() {
        assert_shape_error(
            r#"[theme]
logo = "/l.png"
[[theme.nav]]
text = "Posts"
link = "/posts/"
[[theme.nav]]
text = "Blog"
link = "/posts/"
"#,
            "theme.nav[1].link",
            "duplicates theme.nav[0].link",
        );
    }

    #[test]
    fn test_sidebar_children() {
        let theme = resolve(
            r#"[theme]
logo = "/l.png"
[[theme.sidebar."/posts/"]]
title = "Posts"
children = ["", ["cpython-internals/", "CPython Internals"]]
"#,
        )
        .unwrap();
        let groups = &theme.sidebar()["/posts/"];
        assert_eq!(groups.len(), 1);
        assert!(groups[0].collapsable());
        let children = groups[0].children();
        assert!(children[0].is_index());
        assert_eq!(children[0].title(), None);
        assert_eq!(children[1].path(), "cpython-internals/");
        assert_eq!(children[1].title(), Some("CPython Internals"));
    }

    #[test]
    fn test_sidebar_prefix_must_be_slashed() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.sidebar.\"posts/\"]]\ntitle = \"Posts\"",
            "theme.sidebar.\"posts/\"",
            "start and end with /",
        );
    }

    #[test]
    fn test_sidebar_group_title_required() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.sidebar.\"/posts/\"]]\nchildren = [\"\"]",
            "theme.sidebar.\"/posts/\"[0].title",
            "required",
        );
    }

    #[test]
    fn test_sidebar_child_absolute_rejected() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.sidebar.\"/posts/\"]]\ntitle = \"P\"\nchildren = [\"/posts/a\"]",
            "theme.sidebar.\"/posts/\"[0].children[0]",
            "relative",
        );
    }

    #[test]
    fn test_sidebar_child_duplicate_across_groups() {
        assert_shape_error(
            r#"[theme]
logo = "/l.png"
[[theme.sidebar."/posts/"]]
title = "A"
children = ["x/"]
[[theme.sidebar."/posts/"]]
title = "B"
children = [["x/", "X"]]
"#,
            "theme.sidebar.\"/posts/\"[1].children[0]",
            "duplicates",
        );
    }

    #[test]
    fn test_sidebar_titled_child_empty_title() {
        assert_shape_error(
            "[theme]\nlogo = \"/l.png\"\n[[theme.sidebar.\"/posts/\"]]\ntitle = \"P\"\nchildren = [[\"a/\", \"\"]]",
            "theme.sidebar.\"/posts/\"[0].children[0]",
            "empty",
        );
    }

    #[test]
    fn test_sidebar_for_longest_prefix() {
        let theme = resolve(
            r#"[theme]
logo = "/l.png"
[[theme.sidebar."/"]]
title = "Home"
[[theme.sidebar."/posts/"]]
title = "Posts"
"#,
        )
        .unwrap();

        let (prefix, groups) = theme.sidebar_for("/posts/cpython-internals/").unwrap();
        assert_eq!(prefix, "/posts/");
        assert_eq!(groups[0].title(), "Posts");

        let (prefix, _) = theme.sidebar_for("/about/").unwrap();
        assert_eq!(prefix, "/");
    }

    #[test]
    fn test_sidebar_for_no_match() {
        let theme = resolve(
            "[theme]\nlogo = \"/l.png\"\n[[theme.sidebar.\"/posts/\"]]\ntitle = \"Posts\"",
        )
        .unwrap();
        assert!(theme.sidebar_for("/about/").is_none());
    }

    #[test]
    fn test_serialize_camel_case() {
        let theme = resolve("[theme]\nlogo = \"/l.png\"\nedit_links = true").unwrap();
        let json = serde_json::to_value(&theme).unwrap();
        assert_eq!(json["editLinks"], serde_json::json!(true));
        assert_eq!(json["lastUpdated"], serde_json::json!(false));
        assert!(json.get("repo").is_none());
    }
}
