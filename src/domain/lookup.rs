//! Resolution of post references against the loaded author and category
//! collections, with placeholders for anything that does not resolve.

use std::collections::HashMap;

use entradas_api_types::{Category, Entrada, Usuario};
use serde::Serialize;
use time::{Date, OffsetDateTime, format_description::FormatItem, macros::format_description};
use url::Url;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_SUMMARY: &str = "No description available";

const PLAIN_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Name tables built from the author and category collections of one load.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    authors: HashMap<i64, String>,
    categories: HashMap<i64, String>,
}

impl Directory {
    pub fn new(authors: &[Usuario], categories: &[Category]) -> Self {
        let authors = authors
            .iter()
            .map(|author| (author.id, display_name(author)))
            .collect();
        let categories = categories
            .iter()
            .map(|category| (category.id, category.nombre.clone()))
            .collect();
        Self {
            authors,
            categories,
        }
    }

    pub fn author_name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.authors.get(&id))
            .map_or(UNKNOWN_AUTHOR, String::as_str)
    }

    /// `None` when the post has no category at all; the placeholder when it
    /// references one that is not loaded.
    pub fn category_name(&self, id: Option<i64>) -> Option<&str> {
        id.map(|id| {
            self.categories
                .get(&id)
                .map_or(UNCATEGORIZED, String::as_str)
        })
    }

    /// Build the display card for one post. Media paths resolve against
    /// `media_base`.
    pub fn card(&self, entrada: &Entrada, media_base: &Url) -> PostCard {
        let author = self.author_name(entrada.autor).to_string();
        let author_initial = author.chars().next().map(|c| c.to_uppercase().to_string());
        PostCard {
            id: entrada.id,
            titulo: entrada.titulo.clone(),
            slug: entrada.slug.clone(),
            resumen: entrada
                .resumen
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(NO_SUMMARY)
                .to_string(),
            author,
            author_initial,
            category: self.category_name(entrada.categoria).map(str::to_string),
            published_on: entrada
                .fecha_publicacion
                .as_deref()
                .and_then(parse_publication_date)
                .and_then(|date| date.format(PLAIN_DATE).ok()),
            image_url: entrada
                .imagen
                .as_deref()
                .and_then(|path| media_url(media_base, path)),
        }
    }
}

/// A post ready for display: references resolved, placeholders applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub id: i64,
    pub titulo: String,
    pub slug: String,
    pub resumen: String,
    pub author: String,
    pub author_initial: Option<String>,
    pub category: Option<String>,
    pub published_on: Option<String>,
    pub image_url: Option<String>,
}

fn display_name(author: &Usuario) -> String {
    let full = format!("{} {}", author.first_name.trim(), author.last_name.trim());
    let full = full.trim();
    if full.is_empty() {
        author.username.clone()
    } else {
        full.to_string()
    }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
pub fn parse_publication_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
        .map(OffsetDateTime::date)
        .or_else(|_| Date::parse(raw, PLAIN_DATE))
        .ok()
}

/// Append a server-relative media path to the API base, keeping the base's
/// path prefix. Absolute URLs are returned as they are.
pub fn media_url(base: &Url, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(path) {
        return Some(absolute.into());
    }
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.strip_prefix('/').unwrap_or(path)
    );
    Url::parse(&joined).ok().map(Into::into)
}
