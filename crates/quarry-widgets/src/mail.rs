//! Quote form to `mailto:` composer.
//!
//! The contact form never reaches a server. Submitting it builds a `mailto:`
//! URI with a fixed subject and a body listing every field, and points the
//! browsing context at it so the visitor's mail client opens a draft.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Subject line of every quote request.
pub const DEFAULT_SUBJECT: &str = "Quote Request from Website";

/// Shown when the visitor leaves "Service Needed" blank.
pub const SERVICE_FALLBACK: &str = "Not specified";

/// Shown when the visitor leaves "Project Details" blank.
pub const MESSAGE_FALLBACK: &str = "No details provided";

/// Values submitted through the quote form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: Option<String>,
    pub message: Option<String>,
}

impl QuoteRequest {
    /// Collect a request from `(field name, value)` pairs.
    ///
    /// Unknown fields are ignored. Blank optional fields become `None`.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Self::default();

        for (key, value) in fields {
            let value = value.into();
            match key.as_ref() {
                "name" => request.name = value,
                "phone" => request.phone = value,
                "email" => request.email = value,
                "service" => request.service = non_blank(value),
                "message" => request.message = non_blank(value),
                other => tracing::trace!("Ignoring unknown form field '{}'", other),
            }
        }

        request
    }

    /// The first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Errors from composing a quote request.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ComposeError {
    #[error("Required field '{0}' is empty")]
    MissingField(&'static str),
}

/// Where a composed URI is sent. In the browser this is `window.location`.
///
/// A context without a registered mail client ignores the navigation; the
/// composer cannot observe that.
pub trait BrowsingContext {
    fn navigate(&mut self, uri: &str);
}

/// Builds `mailto:` URIs for the quote form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailComposer {
    /// Address the draft is addressed to
    pub recipient: String,

    /// Fixed subject line
    pub subject: String,

    /// First line of the body
    pub heading: String,

    /// Last line of the body, after the `---` rule
    pub signature: String,
}

impl MailComposer {
    /// Composer for `company`'s quote form, sent to `recipient` from `origin` (a host name).
    pub fn new(recipient: &str, company: &str, origin: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            heading: format!("New quote request from {} website:", company),
            signature: format!("Sent from {}", origin),
        }
    }

    /// Plain-text body for a request.
    pub fn body(&self, request: &QuoteRequest) -> String {
        format!(
            "{heading}\n\
             \n\
             Name: {name}\n\
             Phone: {phone}\n\
             Email: {email}\n\
             Service Needed: {service}\n\
             \n\
             Project Details:\n\
             {message}\n\
             \n\
             ---\n\
             {signature}",
            heading = self.heading,
            name = request.name,
            phone = request.phone,
            email = request.email,
            service = request.service.as_deref().unwrap_or(SERVICE_FALLBACK),
            message = request.message.as_deref().unwrap_or(MESSAGE_FALLBACK),
            signature = self.signature,
        )
    }

    /// Build the `mailto:` URI for a request.
    pub fn compose(&self, request: &QuoteRequest) -> Result<MailtoUri, ComposeError> {
        if let Some(field) = request.missing_field() {
            return Err(ComposeError::MissingField(field));
        }

        let uri = format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body(request))
        );

        Ok(MailtoUri(uri))
    }

    /// Compose and hand the URI to the browsing context.
    pub fn submit(
        &self,
        request: &QuoteRequest,
        context: &mut impl BrowsingContext,
    ) -> Result<MailtoUri, ComposeError> {
        let uri = self.compose(request)?;
        tracing::debug!("Opening mail draft to {}", self.recipient);
        context.navigate(uri.as_str());
        Ok(uri)
    }
}

/// A composed `mailto:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailtoUri(String);

impl MailtoUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recipient address.
    pub fn recipient(&self) -> &str {
        let rest = self.0.trim_start_matches("mailto:");
        rest.split('?').next().unwrap_or(rest)
    }

    /// Decoded subject parameter.
    pub fn subject(&self) -> Option<Cow<'_, str>> {
        self.param("subject")
    }

    /// Decoded body parameter.
    pub fn body(&self) -> Option<Cow<'_, str>> {
        self.param("body")
    }

    /// Raw (still encoded) query parameters in order.
    pub fn raw_params(&self) -> Vec<(&str, &str)> {
        let Some((_, query)) = self.0.split_once('?') else {
            return Vec::new();
        };

        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect()
    }

    fn param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.raw_params()
            .into_iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| urlencoding::decode(value).ok())
    }
}

impl fmt::Display for MailtoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
