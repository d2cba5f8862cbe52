use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
    sync::Arc,
};

use crate::{
    entities::{
        locale::Locale,
        project::{project_path, Project},
        seo::{OpenGraph, PageMetadata, SitePage, SiteDefaults},
    },
    errors::AppError,
    use_cases::projects::ProjectHandler,
};

const X_DEFAULT: &str = "x-default";

/// Builds page heads and the sitemap.
pub struct SeoHandler {
    projects: Arc<ProjectHandler>,
}

impl SeoHandler {
    pub fn new(projects: Arc<ProjectHandler>) -> Self {
        SeoHandler { projects }
    }

    fn site(&self) -> &SiteDefaults {
        self.projects.site()
    }

    /// Metadata for a published project page. Alternates list only the
    /// locales with a published record.
    pub async fn project_metadata(&self, locale: Locale, key: &str) -> Result<PageMetadata, AppError> {
        let project = self.projects.resolver.require_published(locale, key).await?.project;
        let seo = self.projects.resolved_seo(&project);
        let translations = self.projects.translations(&project).await?;
        let site = self.site();

        let canonical = site.absolute_url(&project.public_path());

        let mut alternates: BTreeMap<String, String> = translations
            .iter()
            .filter_map(|(code, slug)| {
                let locale = code.parse::<Locale>().ok()?;
                Some((code.clone(), site.absolute_url(&project_path(locale, slug))))
            })
            .collect();

        let x_default = alternates
            .get(Locale::default().as_str())
            .unwrap_or(&canonical)
            .clone();
        alternates.insert(X_DEFAULT.to_string(), x_default);

        let alternate_locale = translations
            .keys()
            .filter_map(|code| code.parse::<Locale>().ok())
            .filter(|l| *l != locale)
            .map(|l| l.og_locale().to_string())
            .collect();

        Ok(PageMetadata {
            title: seo.meta_title.clone(),
            description: seo.meta_description.clone(),
            keywords: seo.meta_keywords.clone(),
            canonical: canonical.clone(),
            alternates,
            open_graph: OpenGraph {
                title: seo.og_title,
                description: seo.og_description,
                image: non_empty(&seo.og_image).map(|img| site.absolute_url(img)),
                url: canonical,
                site_name: site.site_name.clone(),
                locale: locale.og_locale().to_string(),
                alternate_locale,
                kind: "article".to_string(),
            },
        })
    }

    /// Metadata for a fixed site page; both locales always exist.
    pub fn page_metadata(&self, locale: Locale, page: SitePage) -> PageMetadata {
        let site = self.site();

        let title = match page.heading(locale) {
            Some(heading) => format!("{} | {}", heading, site.site_name),
            None => site.site_name.clone(),
        };
        let description = site.description(locale).to_string();
        let canonical = site.absolute_url(&page.localized_path(locale));

        let mut alternates: BTreeMap<String, String> = Locale::ALL
            .iter()
            .map(|l| (l.to_string(), site.absolute_url(&page.localized_path(*l))))
            .collect();
        alternates.insert(
            X_DEFAULT.to_string(),
            site.absolute_url(&page.localized_path(Locale::default())),
        );

        PageMetadata {
            title: title.clone(),
            description: description.clone(),
            keywords: site.keywords.clone(),
            canonical: canonical.clone(),
            alternates,
            open_graph: OpenGraph {
                title,
                description,
                image: site.og_image.as_deref().map(|img| site.absolute_url(img)),
                url: canonical,
                site_name: site.site_name.clone(),
                locale: locale.og_locale().to_string(),
                alternate_locale: vec![locale.other().og_locale().to_string()],
                kind: "website".to_string(),
            },
        }
    }

    /// `sitemap.xml` with hreflang alternates for every published page.
    pub async fn sitemap(&self) -> Result<String, AppError> {
        let published = self.projects.project_repo.list_published().await?;
        Ok(render_sitemap(self.site(), &published))
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

struct SitemapEntry {
    loc: String,
    lastmod: Option<String>,
    alternates: Vec<(String, String)>,
}

pub fn render_sitemap(site: &SiteDefaults, published: &[Project]) -> String {
    let mut entries = Vec::new();

    for page in [SitePage::Home, SitePage::Projects] {
        let mut alternates: Vec<(String, String)> = Locale::ALL
            .iter()
            .map(|l| (l.to_string(), site.absolute_url(&page.localized_path(*l))))
            .collect();
        alternates.push((
            X_DEFAULT.to_string(),
            site.absolute_url(&page.localized_path(Locale::default())),
        ));

        for locale in Locale::ALL {
            entries.push(SitemapEntry {
                loc: site.absolute_url(&page.localized_path(locale)),
                lastmod: None,
                alternates: alternates.clone(),
            });
        }
    }

    let mut by_original_id: HashMap<&str, Vec<&Project>> = HashMap::new();
    for project in published.iter().filter(|p| p.status) {
        by_original_id.entry(project.original_id.as_str()).or_default().push(project);
    }

    for project in published.iter().filter(|p| p.status) {
        let mut alternates: Vec<(String, String)> = by_original_id
            .get(project.original_id.as_str())
            .map(|group| {
                group
                    .iter()
                    .map(|p| (p.locale.to_string(), site.absolute_url(&p.public_path())))
                    .collect()
            })
            .unwrap_or_default();
        alternates.sort();

        entries.push(SitemapEntry {
            loc: site.absolute_url(&project.public_path()),
            lastmod: Some(project.updated_at.format("%Y-%m-%d").to_string()),
            alternates,
        });
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for entry in entries {
        // Writing to a String cannot fail.
        let _ = writeln!(xml, "  <url>\n    <loc>{}</loc>", xml_escape(&entry.loc));
        if let Some(lastmod) = entry.lastmod {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod);
        }
        for (hreflang, href) in entry.alternates {
            let _ = writeln!(
                xml,
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>",
                hreflang,
                xml_escape(&href)
            );
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::seo::ProjectSeo;
    use chrono::{TimeZone, Utc};

    fn site() -> SiteDefaults {
        SiteDefaults {
            site_url: "https://example.dev".into(),
            site_name: "Atölye".into(),
            description_tr: "Seramik".into(),
            description_en: "Ceramics".into(),
            keywords: String::new(),
            og_image: None,
        }
    }

    fn project(locale: Locale, slug: &str, original_id: &str, status: bool) -> Project {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        Project {
            id: slug.into(),
            original_id: original_id.into(),
            locale,
            title: slug.into(),
            description: String::new(),
            technologies: vec![],
            images: vec![],
            status,
            order: 0,
            seo: ProjectSeo::default(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn sitemap_links_published_siblings() {
        let published = vec![
            project(Locale::Tr, "vazo-1", "U1", true),
            project(Locale::En, "vase-1", "U1", true),
            project(Locale::Tr, "tabak", "U2", true),
            project(Locale::En, "plate", "U2", false),
        ];

        let xml = render_sitemap(&site(), &published);

        assert!(xml.contains("<loc>https://example.dev/tr/projects/vazo-1</loc>"));
        assert!(xml.contains("hreflang=\"en\" href=\"https://example.dev/en/projects/vase-1\""));
        assert!(xml.contains("<lastmod>2025-03-14</lastmod>"));
        assert!(!xml.contains("/en/projects/plate"));
        assert!(xml.contains("<loc>https://example.dev/en</loc>"));
        assert!(xml.contains("hreflang=\"x-default\" href=\"https://example.dev/tr/projects\""));
        assert_eq!(xml.matches("<url>").count(), 4 + 3);
    }

    #[test]
    fn urls_are_escaped() {
        assert_eq!(xml_escape("/a?b=1&c=2"), "/a?b=1&amp;c=2");
    }
}
