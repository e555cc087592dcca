//! Browser glue generator.
//!
//! Emits the page's single script. Each block mirrors a Rust contract in this
//! crate: the quote form follows [`MailComposer`], the embed loader follows
//! [`EmbedLoader`](crate::EmbedLoader), the services button follows
//! [`ServicesToggle`], and the social feed is fetched like a
//! [`Deferred`](crate::Deferred) section.

use serde::Serialize;

use crate::embed::{EMBED_SCRIPT_MARKER, EMBED_SCRIPT_SRC, FALLBACK_DELAY};
use crate::mail::{MailComposer, MESSAGE_FALLBACK, SERVICE_FALLBACK};
use crate::toggle::ServicesToggle;

/// Values the script needs from the build.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub mail: MailConfig,
    pub embed: EmbedConfig,
    pub services: ServicesLabels,
}

/// Quote form settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailConfig {
    #[serde(flatten)]
    pub composer: MailComposer,
    pub service_fallback: String,
    pub message_fallback: String,
}

/// Embed loader settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    pub src: String,
    pub marker: String,
    pub fallback_delay_ms: u64,
}

/// Services button labels.
#[derive(Debug, Clone, Serialize)]
pub struct ServicesLabels {
    pub collapsed: String,
    pub expanded: String,
}

impl ClientConfig {
    /// Config for a page whose quote form uses `composer`.
    pub fn new(composer: MailComposer) -> Self {
        Self {
            mail: MailConfig {
                composer,
                service_fallback: SERVICE_FALLBACK.to_string(),
                message_fallback: MESSAGE_FALLBACK.to_string(),
            },
            embed: EmbedConfig {
                src: EMBED_SCRIPT_SRC.to_string(),
                marker: EMBED_SCRIPT_MARKER.to_string(),
                fallback_delay_ms: FALLBACK_DELAY.as_millis() as u64,
            },
            services: ServicesLabels {
                collapsed: ServicesToggle::collapsed().label().to_string(),
                expanded: ServicesToggle::expanded().label().to_string(),
            },
        }
    }
}

/// Generate the page script.
pub fn client_script(config: &ClientConfig) -> Result<String, serde_json::Error> {
    let config_json = serde_json::to_string(config)?;
    Ok(CLIENT_TEMPLATE.replace("__QUARRY_CONFIG__", &config_json))
}

const CLIENT_TEMPLATE: &str = r#"(function () {
  'use strict';

  const config = __QUARRY_CONFIG__;

  // Mobile menu
  const menuButton = document.querySelector('[data-menu-toggle]');
  const menu = document.getElementById('mobile-menu');
  if (menuButton && menu) {
    const setMenu = function (open) {
      menu.hidden = !open;
      menuButton.setAttribute('aria-expanded', String(open));
      menuButton.setAttribute('aria-label', open ? 'Close menu' : 'Open menu');
    };
    menuButton.addEventListener('click', function () {
      setMenu(menuButton.getAttribute('aria-expanded') !== 'true');
    });
    menu.querySelectorAll('a').forEach(function (link) {
      link.addEventListener('click', function () { setMenu(false); });
    });
  }

  // Services grid
  const servicesButton = document.querySelector('[data-services-toggle]');
  if (servicesButton) {
    const label = servicesButton.querySelector('[data-label]') || servicesButton;
    servicesButton.addEventListener('click', function () {
      const expanded = servicesButton.getAttribute('aria-expanded') === 'true';
      document.querySelectorAll('[data-service-extra]').forEach(function (card) {
        card.hidden = expanded;
      });
      servicesButton.setAttribute('aria-expanded', String(!expanded));
      label.textContent = expanded ? config.services.collapsed : config.services.expanded;
    });
  }

  // Quote form -> mail client
  const form = document.querySelector('form[data-quote-form]');
  if (form) {
    form.addEventListener('submit', function (event) {
      event.preventDefault();
      const field = function (name) {
        const input = form.elements.namedItem(name);
        return input ? input.value : '';
      };
      const optional = function (name, fallback) {
        const value = field(name);
        return value.trim() ? value : fallback;
      };
      const mail = config.mail;
      const body = [
        mail.heading,
        '',
        'Name: ' + field('name'),
        'Phone: ' + field('phone'),
        'Email: ' + field('email'),
        'Service Needed: ' + optional('service', mail.serviceFallback),
        '',
        'Project Details:',
        optional('message', mail.messageFallback),
        '',
        '---',
        mail.signature
      ].join('\n');
      window.location.href = 'mailto:' + mail.recipient +
        '?subject=' + encodeURIComponent(mail.subject) +
        '&body=' + encodeURIComponent(body);
    });
  }

  // Embed loader: attach once, then signal
  let fallbackTimer = null;
  const rescan = function () {
    if (window.instgrm && window.instgrm.Embeds) {
      window.instgrm.Embeds.process();
    }
  };
  const mountEmbeds = function () {
    if (!document.querySelector('.instagram-media')) return;
    if (!document.querySelector('script[src*="' + config.embed.marker + '"]')) {
      const script = document.createElement('script');
      script.src = config.embed.src;
      script.async = true;
      script.onload = rescan;
      document.body.appendChild(script);
    } else {
      rescan();
    }
    clearTimeout(fallbackTimer);
    fallbackTimer = setTimeout(rescan, config.embed.fallbackDelayMs);
  };

  // Deferred social feed
  const controller = typeof AbortController === 'function' ? new AbortController() : null;
  const slot = document.querySelector('[data-deferred-src]');
  if (slot) {
    const load = function () {
      fetch(slot.getAttribute('data-deferred-src'), controller ? { signal: controller.signal } : {})
        .then(function (res) { return res.ok ? res.text() : Promise.reject(res.status); })
        .then(function (html) {
          slot.outerHTML = html;
          mountEmbeds();
        })
        .catch(function () {
          slot.removeAttribute('aria-busy');
        });
    };
    if ('IntersectionObserver' in window) {
      const observer = new IntersectionObserver(function (entries) {
        if (entries.some(function (e) { return e.isIntersecting; })) {
          observer.disconnect();
          load();
        }
      }, { rootMargin: '400px' });
      observer.observe(slot);
    } else {
      load();
    }
  } else {
    mountEmbeds();
  }

  window.addEventListener('pagehide', function () {
    clearTimeout(fallbackTimer);
    if (controller) controller.abort();
  });

  document.querySelectorAll('[data-current-year]').forEach(function (el) {
    el.textContent = String(new Date().getFullYear());
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> String {
        let composer = MailComposer::new("crew@example.com", "Acme Earthworks", "acme.test");
        client_script(&ClientConfig::new(composer)).unwrap()
    }

    #[test]
    fn embeds_config_as_json() {
        let js = script();

        assert!(!js.contains("__QUARRY_CONFIG__"));
        assert!(js.contains(r#""recipient":"crew@example.com""#));
        assert!(js.contains(r#""subject":"Quote Request from Website""#));
        assert!(js.contains(r#""serviceFallback":"Not specified""#));
        assert!(js.contains(r#""messageFallback":"No details provided""#));
        assert!(js.contains(r#""fallbackDelayMs":1000"#));
    }

    #[test]
    fn embed_loader_checks_for_existing_script() {
        let js = script();

        assert!(js.contains(r#""marker":"instagram.com/embed.js""#));
        assert!(js.contains("script[src*="));
        assert!(js.contains("window.instgrm.Embeds.process()"));
        assert!(js.contains("clearTimeout(fallbackTimer)"));
    }

    #[test]
    fn wires_every_widget() {
        let js = script();

        for hook in [
            "[data-menu-toggle]",
            "[data-services-toggle]",
            "[data-service-extra]",
            "form[data-quote-form]",
            "[data-deferred-src]",
            "[data-current-year]",
        ] {
            assert!(js.contains(hook), "missing hook {}", hook);
        }
    }

    #[test]
    fn config_serializes_labels() {
        let config = ClientConfig::new(MailComposer::new("a@b.c", "A", "b.c"));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["services"]["collapsed"], "See All Services");
        assert_eq!(value["services"]["expanded"], "Show Less");
        assert_eq!(value["mail"]["heading"], "New quote request from A website:");
    }
}
