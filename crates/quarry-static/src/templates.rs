//! Template engine for rendering the page and its sections.

use minijinja::{context, Environment};
use serde::Serialize;

/// Context for rendering the page shell.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Document title
    pub title: String,
    /// Meta description
    pub description: String,
    /// Meta keywords, comma separated
    pub keywords: String,
    /// Canonical URL
    pub canonical: String,
    /// Company name (Open Graph site name)
    pub site_name: String,
    /// Open Graph locale
    pub locale: String,
    /// Geo region tag
    pub region: Option<String>,
    /// Base URL
    pub base_url: String,
    /// Rendered sections, in page order
    pub sections: Vec<String>,
    /// Extra scripts to include (dev server live reload)
    pub scripts: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .unwrap_or_else(|e| panic!("Failed to add template {}: {}", name, e));
        }

        Self { env }
    }

    /// Render a named template with any serializable context.
    pub fn render<S: Serialize>(&self, template: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(ctx)
    }

    /// Render the page shell around already rendered sections.
    pub fn render_page(&self, page: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => &page.title,
            description => &page.description,
            keywords => &page.keywords,
            canonical => &page.canonical,
            site_name => &page.site_name,
            locale => &page.locale,
            region => &page.region,
            base_url => &page.base_url,
            sections => &page.sections,
            scripts => &page.scripts,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    ("page.html", PAGE_TEMPLATE),
    ("header.html", HEADER_TEMPLATE),
    ("hero.html", HERO_TEMPLATE),
    ("mission.html", MISSION_TEMPLATE),
    ("services.html", SERVICES_TEMPLATE),
    ("service_card.html", SERVICE_CARD_TEMPLATE),
    ("about.html", ABOUT_TEMPLATE),
    ("cta.html", CTA_TEMPLATE),
    ("instagram.html", INSTAGRAM_TEMPLATE),
    ("instagram_slot.html", INSTAGRAM_SLOT_TEMPLATE),
    ("embed.html", EMBED_TEMPLATE),
    ("contact.html", CONTACT_TEMPLATE),
    ("footer.html", FOOTER_TEMPLATE),
];

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}">
  {% if keywords %}<meta name="keywords" content="{{ keywords }}">
  {% endif %}<meta name="robots" content="index, follow">
  <link rel="canonical" href="{{ canonical }}">
  <meta property="og:title" content="{{ site_name }}">
  <meta property="og:description" content="{{ description }}">
  <meta property="og:url" content="{{ canonical }}">
  <meta property="og:site_name" content="{{ site_name }}">
  <meta property="og:locale" content="{{ locale }}">
  <meta property="og:type" content="website">
  <meta name="twitter:card" content="summary_large_image">
  {% if region %}<meta name="geo.region" content="{{ region }}">
  {% endif %}<link rel="icon" href="{{ base_url }}favicon.svg" type="image/svg+xml">
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  <a href="#main-content" class="skip-link">Skip to main content</a>
  {% for section in sections %}{{ section | safe }}
  {% endfor %}
  <script src="{{ base_url }}assets/main.js" defer></script>
  {% for script in scripts %}<script src="{{ script }}"></script>
  {% endfor %}
</body>
</html>"##;

const HEADER_TEMPLATE: &str = r##"<header class="site-header" role="banner">
  <div class="container header-inner">
    <a href="#" class="brand" aria-label="{{ name }} home">
      <img src="{{ logo }}" alt="{{ name }} logo - Established {{ founding_year }}" width="48" height="48">
      <span class="brand-name">{{ name }}</span>
    </a>
    <nav class="nav-desktop" aria-label="Main navigation">
      {% for link in nav %}<a href="{{ link.href }}">{{ link.title }}</a>
      {% endfor %}
    </nav>
    <a href="{{ tel }}" class="header-phone">{{ phone_icon | safe }}<span>{{ phone }}</span></a>
    <button type="button" class="menu-button" data-menu-toggle aria-controls="mobile-menu" aria-expanded="false" aria-label="Open menu">{{ menu_icon | safe }}</button>
  </div>
  <nav id="mobile-menu" class="nav-mobile" aria-label="Mobile navigation" hidden>
    {% for link in nav %}<a href="{{ link.href }}">{{ link.title }}</a>
    {% endfor %}
    <a href="{{ tel }}">{{ phone }}</a>
    <a href="{{ mailto }}">{{ email }}</a>
  </nav>
</header>"##;

const HERO_TEMPLATE: &str = r##"<main id="main-content">
<section class="hero" aria-labelledby="hero-heading"{% if hero_image %} style="--hero-image: url('{{ hero_image }}')"{% endif %}>
  <div class="container hero-inner">
    <p class="badge">{{ badge }}</p>
    <h1 id="hero-heading">{{ name }}</h1>
    <p class="tagline">{{ tagline }}</p>
    <div class="hero-actions">
      <a href="{{ tel }}" class="button button-primary" aria-label="Call {{ name }} at {{ phone }}">{{ phone_icon | safe }}{{ phone }}</a>
      <a href="#contact" class="button button-outline">{{ cta }}{{ arrow_icon | safe }}</a>
    </div>
    {% if stats %}<ul class="stats">
      {% for stat in stats %}<li class="stat{% if stat.highlight %} stat-highlight{% endif %}"><span class="stat-value">{{ stat.display }}</span><span class="stat-label">{{ stat.label }}</span></li>
      {% endfor %}
    </ul>{% endif %}
  </div>
</section>"##;

const MISSION_TEMPLATE: &str = r##"<section id="mission" class="mission" aria-labelledby="mission-heading">
  <div class="container narrow">
    <div class="accent-bar"></div>
    <h2 id="mission-heading">{{ headline }}</h2>
    <div class="prose">{{ body | safe }}</div>
  </div>
</section>"##;

const SERVICES_TEMPLATE: &str = r##"<section id="services" class="services" aria-labelledby="services-heading">
  <div class="container">
    <p class="eyebrow">Our Capabilities</p>
    <h2 id="services-heading">What We Do</h2>
    <p class="lead">Heavy equipment and expertise for Alberta's toughest jobs</p>
    <ul class="services-grid">
      {% for card in cards %}{% include "service_card.html" %}
      {% endfor %}{% for card in extra %}{% include "service_card.html" %}
      {% endfor %}
    </ul>
    {% if show_toggle %}<div class="services-toggle">
      <button type="button" class="button button-outline" data-services-toggle aria-expanded="{{ expanded }}"><span data-label>{{ label }}</span>{{ chevron_icon | safe }}</button>
    </div>{% endif %}
  </div>
</section>"##;

const SERVICE_CARD_TEMPLATE: &str = r##"<li class="service-card"{% if card.extra %} hidden data-service-extra{% endif %} data-service="{{ card.slug }}">
        <img src="{{ card.image }}" alt="Professional {{ card.name | lower }} services by {{ company }}" loading="lazy">
        <div class="service-body">{{ card.icon | safe }}<h3>{{ card.name }}</h3></div>
      </li>"##;

const ABOUT_TEMPLATE: &str = r##"<section id="about" class="about" aria-labelledby="about-heading">
  <div class="container narrow">
    <p class="eyebrow">Est. {{ founding_year }}</p>
    <h2 id="about-heading">Our Story</h2>
    <div class="prose">{{ about | safe }}</div>
  </div>
  {% if milestones %}<div class="container timeline-wrap">
    <h3 class="timeline-heading">Our Journey</h3>
    <ol class="timeline">
      {% for milestone in milestones %}<li class="milestone" data-year="{{ milestone.year }}">
        <span class="milestone-year">{{ milestone.year }}</span>
        <div class="milestone-card">
          <img src="{{ milestone.image }}" alt="{{ company }} - {{ milestone.title }}" loading="lazy">
          <div>
            <h4>{{ milestone.title }}</h4>
            <div class="prose">{{ milestone.description | safe }}</div>
          </div>
        </div>
      </li>
      {% endfor %}
    </ol>
  </div>{% endif %}
</section>"##;

const CTA_TEMPLATE: &str = r##"<section class="cta" aria-labelledby="cta-heading">
  <div class="container narrow">
    <h2 id="cta-heading">{{ prompt }}</h2>
    <p class="lead">Ready to break ground? Call us or request a free estimate.</p>
    <div class="hero-actions">
      <a href="{{ tel }}" class="button button-primary">{{ phone_icon | safe }}{{ phone }}</a>
      <a href="#contact" class="button button-dark">{{ cta }}</a>
    </div>
  </div>
</section>"##;

const INSTAGRAM_TEMPLATE: &str = r##"<section id="instagram" class="instagram" aria-labelledby="instagram-heading">
  <div class="container">
    <div class="accent-bar"></div>
    <h2 id="instagram-heading">Follow Our Work</h2>
    <p class="lead">See our latest excavation projects and equipment in action</p>
    <a href="{{ profile_url }}" class="button button-dark" target="_blank" rel="noopener noreferrer" aria-label="Follow {{ company }} on Instagram (opens in new tab)">{{ instagram_icon | safe }}<span>{{ handle }}</span>{{ external_icon | safe }}</a>
    {% if posts %}<ul class="instagram-grid" aria-label="Instagram posts from {{ company }}">
      {% for post in posts %}<li class="instagram-post">{% include "embed.html" %}</li>
      {% endfor %}
    </ul>{% else %}<p class="instagram-empty">Instagram posts will appear here</p>{% endif %}
  </div>
</section>"##;

const INSTAGRAM_SLOT_TEMPLATE: &str = r##"<section id="instagram" class="instagram instagram-pending" data-deferred-src="{{ fragment_url }}" aria-busy="true">
  <p class="loading">Loading...</p>
</section>"##;

const EMBED_TEMPLATE: &str = r##"<blockquote class="instagram-media" data-instgrm-captioned data-instgrm-permalink="{{ post }}" data-instgrm-version="{{ version }}">
          <a href="{{ post }}" target="_blank" rel="noopener noreferrer" class="embed-fallback">View this post on Instagram</a>
          <p class="embed-credit"><a href="{{ post }}" target="_blank" rel="noopener noreferrer">A post shared by {{ company }}</a></p>
        </blockquote>"##;

const CONTACT_TEMPLATE: &str = r##"<section id="contact" class="contact" aria-labelledby="contact-heading">
  <div class="container">
    <div class="accent-bar"></div>
    <h2 id="contact-heading">Get In Touch</h2>
    <p class="lead">Ready to start your project? We're here to help.</p>
    <div class="contact-grid">
      <div class="card">
        <h3>{{ users_icon | safe }}Contact Information</h3>
        <ul class="contact-list">
          {% for contact in contacts %}<li>{{ phone_icon | safe }}<div><p class="contact-label">{{ contact.label }}</p><a href="{{ contact.tel }}">{{ contact.phone }}</a></div></li>
          {% endfor %}<li>{{ mail_icon | safe }}<div><p class="contact-label">Email</p><a href="{{ mailto }}">{{ email }}</a></div></li>
          <li>{{ pin_icon | safe }}<div><p class="contact-label">Location</p><p>{{ location.address }}</p><p>{{ location.city }}, {{ location.province }} {{ location.postal_code }}</p></div></li>
        </ul>
      </div>
      <div class="card">
        <h3>Request a Quote</h3>
        <p class="card-description">Tell us about your project and we'll get back to you with a free estimate.</p>
        <form class="quote-form" data-quote-form aria-label="Request a quote form">
          <div class="form-row">
            <label for="name">Name <span class="required">*</span></label>
            <input id="name" name="name" placeholder="Your name" required aria-required="true">
          </div>
          <div class="form-row">
            <label for="phone">Phone <span class="required">*</span></label>
            <input id="phone" name="phone" type="tel" placeholder="Your phone number" required aria-required="true">
          </div>
          <div class="form-row">
            <label for="email">Email <span class="required">*</span></label>
            <input id="email" name="email" type="email" placeholder="Your email address" required aria-required="true">
          </div>
          <div class="form-row">
            <label for="service">Service Needed</label>
            <input id="service" name="service" placeholder="e.g., {{ service_examples }}">
          </div>
          <div class="form-row">
            <label for="message">Project Details</label>
            <textarea id="message" name="message" placeholder="Tell us about your project..." aria-describedby="message-hint"></textarea>
            <p id="message-hint" class="hint">Describe your project requirements, timeline, and any specific needs.</p>
          </div>
          <button type="submit" class="button button-primary" aria-label="Submit quote request form">{{ mail_icon | safe }}Send Request</button>
          <p class="hint center">This will open your email app with the form details pre-filled.</p>
        </form>
      </div>
    </div>
  </div>
</section>
</main>"##;

const FOOTER_TEMPLATE: &str = r##"<footer class="site-footer" role="contentinfo" aria-label="Site footer">
  <div class="container footer-grid">
    <div class="footer-brand">
      <img src="{{ logo }}" alt="{{ name }} logo" width="40" height="40">
      <div>
        <p class="footer-name">{{ name }}</p>
        <p class="footer-since">Est. {{ founding_year }}</p>
      </div>
    </div>
    <div>
      <h4>Services</h4>
      <ul class="footer-services" aria-label="Our services">
        {% for service in services %}<li>{{ service }}</li>
        {% endfor %}
      </ul>
    </div>
    <div>
      <h4>Contact</h4>
      <address>
        <p><a href="{{ tel }}">{{ phone }}</a></p>
        <p><a href="{{ mailto }}">{{ email }}</a></p>
      </address>
    </div>
    <div>
      <h4>Location</h4>
      <address>
        <p>{{ location.address }}</p>
        <p>{{ location.city }}, {{ location.province }}</p>
        <p>{{ location.postal_code }}</p>
      </address>
    </div>
  </div>
  <p class="copyright">&copy; <span data-current-year>{{ year }}</span> {{ name }}. All rights reserved.</p>
</footer>"##;
