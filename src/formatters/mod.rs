//! Alternative representations of the `/api` envelopes.
//!
//! Handlers wrap their envelope in [`Negotiated`]; the `Accept` header then
//! decides between JSON, XML, HTML and plain text.

mod html;
mod plain_text;
mod xml;

use crate::domain::{BlogDetails, UserDetails};
use crate::services::ServiceError;
use crate::wrappers::{PagedResponse, Response};
use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
    Html,
    PlainText,
}

impl OutputFormat {
    /// Picks the preferred supported representation of an `Accept` header.
    ///
    /// Higher q-values win, ties go to the earlier entry. Wildcards and
    /// unknown or missing types fall back to JSON.
    pub fn from_accept(accept: &str) -> Self {
        let mut best: Option<(Self, f32)> = None;
        for entry in accept.split(',') {
            let mut parts = entry.split(';');
            let media_type = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
            let quality = parts
                .filter_map(|param| {
                    let (key, value) = param.split_once('=')?;
                    (key.trim() == "q").then(|| value.trim().parse::<f32>().ok())?
                })
                .next()
                .unwrap_or(1.0);
            if quality <= 0.0 {
                continue;
            }
            let Some(format) = Self::from_media_type(&media_type) else {
                continue;
            };
            if best.is_none_or(|(_, best_quality)| quality > best_quality) {
                best = Some((format, quality));
            }
        }
        best.map(|(format, _)| format).unwrap_or_default()
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "application/json" | "*/*" | "application/*" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            "text/html" => Some(Self::Html),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::PlainText => "text/plain; charset=utf-8",
        }
    }
}

impl<S> FromRequestParts<S> for OutputFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(OutputFormat::from_accept)
            .unwrap_or_default())
    }
}

/// One rendered property of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: String,
    /// Text values are quoted in the plain text rendering.
    pub is_text: bool,
}

impl Field {
    pub fn number(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
            is_text: false,
        }
    }

    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            is_text: true,
        }
    }

    pub fn timestamp(name: &'static str, value: &DateTime<Utc>) -> Self {
        Self::text(name, value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// An item that can appear in the `data` of an envelope.
pub trait Renderable {
    /// Element wrapping one item in XML.
    const XML_TAG: &'static str;

    fn fields(&self) -> Vec<Field>;
}

impl Renderable for BlogDetails {
    const XML_TAG: &'static str = "blog";

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::number("blogId", self.blog_id),
            Field::text("title", &self.title),
            Field::text("description", &self.description),
            Field::number("authorId", self.author_id),
            Field::text("authorUsername", &self.author_username),
            Field::timestamp("createdAt", &self.created_at),
            Field::timestamp("updatedAt", &self.updated_at),
        ]
    }
}

impl Renderable for UserDetails {
    const XML_TAG: &'static str = "user";

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::number("userId", self.user_id),
            Field::text("username", &self.username),
            Field::text("fullName", &self.full_name),
            Field::text("email", &self.email),
            Field::number("role", self.role),
            Field::timestamp("createdAt", &self.created_at),
            Field::timestamp("updatedAt", &self.updated_at),
            Field::timestamp("passwordChangedAt", &self.password_changed_at),
        ]
    }
}

/// Paging header and trailer shared by every non-JSON rendering.
pub(crate) struct Envelope<'a, R> {
    paging: Option<[(&'static str, i64); 3]>,
    items: Vec<&'a R>,
    succeeded: bool,
    errors: String,
    message: &'a str,
}

fn join_errors(errors: &Option<Vec<String>>) -> String {
    errors.as_deref().map(|e| e.join(", ")).unwrap_or_default()
}

/// An envelope that knows how to print itself in every supported format.
///
/// Only the JSON rendering can fail.
pub trait Document: Serialize {
    fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error>;
}

fn render_envelope<D, R>(
    document: &D,
    envelope: Envelope<'_, R>,
    format: OutputFormat,
) -> Result<String, serde_json::Error>
where
    D: Serialize,
    R: Renderable,
{
    Ok(match format {
        OutputFormat::Html => html::render(&envelope),
        OutputFormat::Xml => xml::render(&envelope),
        OutputFormat::PlainText => plain_text::render(&envelope),
        OutputFormat::Json => serde_json::to_string(document)?,
    })
}

impl<R: Renderable + Serialize> Document for Response<R> {
    fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        render_envelope(
            self,
            Envelope {
                paging: None,
                items: self.data.iter().collect(),
                succeeded: self.succeeded,
                errors: join_errors(&self.errors),
                message: &self.message,
            },
            format,
        )
    }
}

impl<R: Renderable + Serialize> Document for PagedResponse<Vec<R>> {
    fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        render_envelope(
            self,
            Envelope {
                paging: Some([
                    ("pageNumber", self.page_number),
                    ("pageSize", self.page_size),
                    ("totalRecords", self.total_records),
                ]),
                items: self.data.iter().collect(),
                succeeded: self.succeeded,
                errors: join_errors(&self.errors),
                message: &self.message,
            },
            format,
        )
    }
}

/// A response body rendered according to the negotiated [`OutputFormat`].
pub struct Negotiated<T> {
    pub format: OutputFormat,
    pub body: T,
}

impl<T> Negotiated<T> {
    pub fn new(format: OutputFormat, body: T) -> Self {
        Self { format, body }
    }
}

impl<T: Document> IntoResponse for Negotiated<T> {
    fn into_response(self) -> axum::response::Response {
        match self.body.render(self.format) {
            Ok(text) => ([(CONTENT_TYPE, self.format.content_type())], text).into_response(),
            Err(e) => ServiceError::from(
                anyhow::Error::new(e).context("Failed to serialize the response body."),
            )
            .into_response(),
        }
    }
}

/// Escapes the characters with a meaning in HTML and XML.
pub(crate) fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
