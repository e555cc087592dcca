//! Quote request composition command.

use std::path::Path;

use anyhow::{Context, Result};
use quarry_content::SiteContent;
use quarry_widgets::{MailComposer, MailtoUri, QuoteRequest};

use crate::config::load_config;

/// Print the mailto URI for a quote request from the configured site.
pub async fn run<I>(config_path: &Path, fields: I) -> Result<()>
where
    I: IntoIterator<Item = (&'static str, String)>,
{
    let content = load_config(config_path)?.load_content()?;
    let uri = compose(&content, fields)?;

    tracing::debug!("Composed quote request to {}", uri.recipient());
    println!("{}", uri);

    Ok(())
}

fn compose<I>(content: &SiteContent, fields: I) -> Result<MailtoUri>
where
    I: IntoIterator<Item = (&'static str, String)>,
{
    let composer = MailComposer::new(
        &content.profile.email,
        content.profile.short_name(),
        content.site.host(),
    );

    composer
        .compose(&QuoteRequest::from_fields(fields))
        .context("Quote request is incomplete")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn composes_for_configured_site() {
        let content = SiteContent::shipped();
        let uri = compose(
            &content,
            [
                ("name", "Jane".to_string()),
                ("phone", "555-1234".to_string()),
                ("email", "jane@example.com".to_string()),
                ("service", String::new()),
                ("message", String::new()),
            ],
        )
        .unwrap();

        assert_eq!(uri.recipient(), "excavat@telus.net");
        let body = uri.body().unwrap();
        assert!(body.starts_with("New quote request from Hansen's Excavating website:\n"));
        assert!(body.contains("Service Needed: Not specified"));
        assert!(body.ends_with("Sent from hansensexcavating.com"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let content = SiteContent::shipped();
        let err = compose(
            &content,
            [
                ("name", "  ".to_string()),
                ("phone", "555-1234".to_string()),
                ("email", "jane@example.com".to_string()),
            ],
        )
        .unwrap_err();

        assert!(err.to_string().contains("incomplete"));
    }
}
