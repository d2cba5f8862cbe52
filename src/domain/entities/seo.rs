use std::{borrow::Cow, collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{entities::locale::Locale, errors::AppError, utils::markdown::plain_text_excerpt};

pub const MAX_META_TITLE_LENGTH: u64 = 120;
pub const MAX_META_DESCRIPTION_LENGTH: u64 = 320;
pub const MAX_META_KEYWORDS_LENGTH: u64 = 500;
/// Generated descriptions are cut to what search engines display.
pub const GENERATED_DESCRIPTION_CHARS: usize = 160;

/// Site-wide values every SEO field falls back to last.
#[derive(Debug, Clone)]
pub struct SiteDefaults {
    pub site_url: String,
    pub site_name: String,
    pub description_tr: String,
    pub description_en: String,
    pub keywords: String,
    pub og_image: Option<String>,
}

impl SiteDefaults {
    pub fn description(&self, locale: Locale) -> &str {
        match locale {
            Locale::Tr => &self.description_tr,
            Locale::En => &self.description_en,
        }
    }

    /// Resolves `path` against the site URL; absolute URLs pass through.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        url::Url::parse(&self.site_url)
            .and_then(|base| base.join(path))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}/{}", self.site_url.trim_end_matches('/'), path.trim_start_matches('/')))
    }
}

/// SEO block stored on each project record. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSeo {
    #[validate(length(max = MAX_META_TITLE_LENGTH))]
    pub meta_title: String,

    #[validate(length(max = MAX_META_DESCRIPTION_LENGTH))]
    pub meta_description: String,

    #[validate(length(max = MAX_META_KEYWORDS_LENGTH))]
    pub meta_keywords: String,

    #[validate(length(max = MAX_META_TITLE_LENGTH))]
    pub og_title: String,

    #[validate(length(max = MAX_META_DESCRIPTION_LENGTH))]
    pub og_description: String,

    #[validate(custom(function = "validate_image_ref"))]
    pub og_image: String,
}

/// The project fields SEO values are derived from.
#[derive(Debug, Clone, Copy)]
pub struct SeoSubject<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub technologies: &'a [String],
    pub images: &'a [String],
}

impl ProjectSeo {
    /// Fills every empty subfield independently.
    ///
    /// `metaTitle ← title ← site name`, `metaDescription ← description ←
    /// site description`, `metaKeywords ← technologies ← site keywords`,
    /// `ogTitle ← metaTitle`, `ogDescription ← metaDescription`,
    /// `ogImage ← first image ← site image`.
    pub fn with_fallbacks(&self, subject: SeoSubject<'_>, locale: Locale, defaults: &SiteDefaults) -> ProjectSeo {
        let meta_title = first_non_empty([
            Cow::Borrowed(self.meta_title.as_str()),
            Cow::Borrowed(subject.title),
            Cow::Borrowed(defaults.site_name.as_str()),
        ]);

        let meta_description = first_non_empty([
            Cow::Borrowed(self.meta_description.as_str()),
            Cow::Owned(plain_text_excerpt(subject.description, GENERATED_DESCRIPTION_CHARS)),
            Cow::Borrowed(defaults.description(locale)),
        ]);

        let meta_keywords = first_non_empty([
            Cow::Borrowed(self.meta_keywords.as_str()),
            Cow::Owned(join_keywords(subject.technologies)),
            Cow::Borrowed(defaults.keywords.as_str()),
        ]);

        let og_title = first_non_empty([Cow::Borrowed(self.og_title.as_str()), Cow::Borrowed(meta_title.as_str())]);

        let og_description = first_non_empty([
            Cow::Borrowed(self.og_description.as_str()),
            Cow::Borrowed(meta_description.as_str()),
        ]);

        let og_image = first_non_empty([
            Cow::Borrowed(self.og_image.as_str()),
            Cow::Borrowed(subject.images.first().map(String::as_str).unwrap_or_default()),
            Cow::Borrowed(defaults.og_image.as_deref().unwrap_or_default()),
        ]);

        ProjectSeo {
            meta_title,
            meta_description,
            meta_keywords,
            og_title,
            og_description,
            og_image,
        }
    }
}

impl ProjectSeo {
    /// Clears every subfield still equal to its derived value in `derived`,
    /// so a later [`Self::with_fallbacks`] re-derives it from fresh fields.
    /// Hand-written values survive.
    pub fn forget_derived(&self, derived: &ProjectSeo) -> ProjectSeo {
        let keep = |value: &String, derived: &String| {
            if value == derived { String::new() } else { value.clone() }
        };

        ProjectSeo {
            meta_title: keep(&self.meta_title, &derived.meta_title),
            meta_description: keep(&self.meta_description, &derived.meta_description),
            meta_keywords: keep(&self.meta_keywords, &derived.meta_keywords),
            og_title: keep(&self.og_title, &derived.og_title),
            og_description: keep(&self.og_description, &derived.og_description),
            og_image: keep(&self.og_image, &derived.og_image),
        }
    }
}

fn first_non_empty<const N: usize>(candidates: [Cow<'_, str>; N]) -> String {
    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}

fn join_keywords(technologies: &[String]) -> String {
    technologies
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accepts empty, absolute http(s) URLs and site-relative paths.
pub fn validate_image_ref(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || (value.starts_with('/') && !value.starts_with("//")) {
        return Ok(());
    }

    match url::Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => {
            let mut err = ValidationError::new("invalid_image_ref");
            err.message = Some(Cow::Borrowed("Image must be an http(s) URL or a site-relative path"));
            Err(err)
        }
    }
}

// ───── Page metadata ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    pub alternate_locale: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Everything a page head needs: title, description, canonical link and
/// hreflang alternates keyed by locale code (plus `x-default`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub canonical: String,
    pub alternates: BTreeMap<String, String>,
    pub open_graph: OpenGraph,
}

/// Site pages that carry their own metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SitePage {
    #[default]
    Home,
    Projects,
    About,
    Contact,
}

impl SitePage {
    pub const ALL: [SitePage; 4] = [SitePage::Home, SitePage::Projects, SitePage::About, SitePage::Contact];

    /// Path below the locale prefix.
    pub fn path(self) -> &'static str {
        match self {
            SitePage::Home => "",
            SitePage::Projects => "/projects",
            SitePage::About => "/about",
            SitePage::Contact => "/contact",
        }
    }

    pub fn localized_path(self, locale: Locale) -> String {
        format!("/{}{}", locale, self.path())
    }

    /// Page heading; the home page uses the bare site name.
    pub fn heading(self, locale: Locale) -> Option<&'static str> {
        match (self, locale) {
            (SitePage::Home, _) => None,
            (SitePage::Projects, Locale::Tr) => Some("Projeler"),
            (SitePage::Projects, Locale::En) => Some("Projects"),
            (SitePage::About, Locale::Tr) => Some("Hakkımda"),
            (SitePage::About, Locale::En) => Some("About"),
            (SitePage::Contact, Locale::Tr) => Some("İletişim"),
            (SitePage::Contact, Locale::En) => Some("Contact"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SitePage::Home => "home",
            SitePage::Projects => "projects",
            SitePage::About => "about",
            SitePage::Contact => "contact",
        }
    }
}

impl fmt::Display for SitePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SitePage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SitePage::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown page '{}'", s)))
    }
}
