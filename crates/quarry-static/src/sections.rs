//! Section renderers.
//!
//! Each section is a pure function of the site content (plus, for services,
//! the expanded flag) to markup. Sections never read each other's output, so
//! the page renders them in parallel and joins them in page order.

use std::sync::OnceLock;

use chrono::Datelike;
use minijinja::context;
use regex::Regex;
use serde::Serialize;

use quarry_content::profile::tel_href;
use quarry_content::{BusinessProfile, SiteContent};
use quarry_widgets::{embed_permalink, ServicesToggle, EMBED_VERSION};

use crate::icons::icon_svg;
use crate::templates::TemplateEngine;

/// Path of the deferred social-feed fragment, relative to the base URL.
pub const FEED_FRAGMENT: &str = "fragments/instagram.html";

/// Everything a section may read.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub content: &'a SiteContent,
    pub base_url: &'a str,
    pub services: ServicesToggle,
    /// Render the social feed as a placeholder that loads the fragment
    pub defer_feed: bool,
    /// Year printed in the footer before the script updates it
    pub year: i32,
}

impl<'a> SectionContext<'a> {
    pub fn new(content: &'a SiteContent, base_url: &'a str) -> Self {
        Self {
            content,
            base_url,
            services: ServicesToggle::collapsed(),
            defer_feed: true,
            year: current_year(),
        }
    }

    fn profile(&self) -> &'a BusinessProfile {
        &self.content.profile
    }

    /// Resolve a site-absolute path (`/x.webp`) against the base URL.
    fn url(&self, path: &str) -> String {
        site_url(self.base_url, path)
    }
}

/// The page regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Hero,
    Mission,
    Services,
    About,
    CallToAction,
    Instagram,
    Contact,
    Footer,
}

#[derive(Debug, Serialize)]
struct NavLink {
    title: &'static str,
    href: &'static str,
}

const NAV: &[NavLink] = &[
    NavLink {
        title: "Services",
        href: "#services",
    },
    NavLink {
        title: "About",
        href: "#about",
    },
    NavLink {
        title: "Contact",
        href: "#contact",
    },
];

#[derive(Debug, Serialize)]
struct ServiceCard {
    name: String,
    slug: String,
    icon: String,
    image: String,
    extra: bool,
}

#[derive(Debug, Serialize)]
struct MilestoneView {
    year: u16,
    title: String,
    description: String,
    image: String,
}

#[derive(Debug, Serialize)]
struct StatView {
    display: String,
    label: String,
    highlight: bool,
}

#[derive(Debug, Serialize)]
struct ContactView {
    label: String,
    phone: String,
    tel: String,
}

impl Section {
    /// Page order.
    pub const PAGE: [Section; 9] = [
        Section::Header,
        Section::Hero,
        Section::Mission,
        Section::Services,
        Section::About,
        Section::CallToAction,
        Section::Instagram,
        Section::Contact,
        Section::Footer,
    ];

    /// Template used for this section.
    pub fn template(&self, ctx: &SectionContext<'_>) -> &'static str {
        match self {
            Section::Header => "header.html",
            Section::Hero => "hero.html",
            Section::Mission => "mission.html",
            Section::Services => "services.html",
            Section::About => "about.html",
            Section::CallToAction => "cta.html",
            Section::Instagram if ctx.defer_feed => "instagram_slot.html",
            Section::Instagram => "instagram.html",
            Section::Contact => "contact.html",
            Section::Footer => "footer.html",
        }
    }

    /// Render this section.
    pub fn render(
        &self,
        ctx: &SectionContext<'_>,
        engine: &TemplateEngine,
    ) -> Result<String, minijinja::Error> {
        let profile = ctx.profile();
        let template = self.template(ctx);
        let phone = profile.main_phone();
        let tel = tel_href(phone);

        match self {
            Section::Header => engine.render(
                template,
                context! {
                    name => &profile.name,
                    logo => ctx.url(&profile.logo),
                    founding_year => profile.founding_year,
                    nav => NAV,
                    phone => phone,
                    tel => tel,
                    email => &profile.email,
                    mailto => profile.mailto_href(),
                    phone_icon => icon_svg("phone", "icon-sm"),
                    menu_icon => icon_svg("menu", "icon-md"),
                },
            ),

            Section::Hero => {
                let stats: Vec<StatView> = profile
                    .stats
                    .iter()
                    .map(|s| StatView {
                        display: s.display(),
                        label: s.label.clone(),
                        highlight: s.highlight,
                    })
                    .collect();

                engine.render(
                    template,
                    context! {
                        name => &profile.name,
                        tagline => &profile.tagline,
                        badge => hero_badge(profile),
                        hero_image => profile.hero_image.as_deref().map(|p| ctx.url(p)),
                        phone => phone,
                        tel => tel,
                        cta => &profile.calls_to_action.hero,
                        stats => stats,
                        phone_icon => icon_svg("phone", "icon-sm"),
                        arrow_icon => icon_svg("arrow-right", "icon-sm"),
                    },
                )
            }

            Section::Mission => engine.render(
                template,
                context! {
                    headline => &profile.mission.headline,
                    body => render_markdown(&profile.mission.body),
                },
            ),

            Section::Services => {
                let cards = service_cards(ctx, ctx.services.visible(&profile.services), false);
                let extra = service_cards(ctx, ctx.services.hidden(&profile.services), true);

                engine.render(
                    template,
                    context! {
                        cards => cards,
                        extra => extra,
                        company => &profile.name,
                        show_toggle => ServicesToggle::needs_toggle(profile.services.len()),
                        expanded => ctx.services.is_expanded(),
                        label => ctx.services.label(),
                        chevron_icon => icon_svg("chevron-down", "icon-sm"),
                    },
                )
            }

            Section::About => {
                let milestones: Vec<MilestoneView> = profile
                    .history
                    .iter()
                    .map(|m| MilestoneView {
                        year: m.year,
                        title: m.title.clone(),
                        description: render_markdown(&m.description),
                        image: ctx.url(&m.image),
                    })
                    .collect();

                engine.render(
                    template,
                    context! {
                        company => &profile.name,
                        founding_year => profile.founding_year,
                        about => render_markdown(&profile.about),
                        milestones => milestones,
                    },
                )
            }

            Section::CallToAction => engine.render(
                template,
                context! {
                    prompt => &profile.calls_to_action.contact_prompt,
                    cta => &profile.calls_to_action.hero,
                    phone => phone,
                    tel => tel,
                    phone_icon => icon_svg("phone", "icon-sm"),
                },
            ),

            Section::Instagram if ctx.defer_feed => engine.render(
                template,
                context! {
                    fragment_url => ctx.url(&format!("/{}", FEED_FRAGMENT)),
                },
            ),

            Section::Instagram => {
                let feed = &ctx.content.instagram;
                let posts: Vec<String> = feed.posts.iter().map(|p| embed_permalink(p)).collect();

                engine.render(
                    template,
                    context! {
                        company => &profile.name,
                        handle => feed.display_handle(),
                        profile_url => &feed.profile_url,
                        posts => posts,
                        version => EMBED_VERSION,
                        instagram_icon => icon_svg("instagram", "icon-sm"),
                        external_icon => icon_svg("external-link", "icon-xs"),
                    },
                )
            }

            Section::Contact => {
                let contacts: Vec<ContactView> = profile
                    .contacts
                    .iter()
                    .map(|c| ContactView {
                        label: c.label(),
                        phone: c.phone.clone(),
                        tel: c.tel_href(),
                    })
                    .collect();

                let service_examples = profile
                    .services
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");

                engine.render(
                    template,
                    context! {
                        contacts => contacts,
                        email => &profile.email,
                        mailto => profile.mailto_href(),
                        location => &profile.location,
                        service_examples => service_examples,
                        users_icon => icon_svg("users", "icon-md"),
                        phone_icon => icon_svg("phone", "icon-md"),
                        mail_icon => icon_svg("mail", "icon-md"),
                        pin_icon => icon_svg("map-pin", "icon-md"),
                    },
                )
            }

            Section::Footer => engine.render(
                template,
                context! {
                    name => &profile.name,
                    logo => ctx.url(&profile.logo),
                    founding_year => profile.founding_year,
                    services => profile.footer_services(),
                    phone => phone,
                    tel => tel,
                    email => &profile.email,
                    mailto => profile.mailto_href(),
                    location => &profile.location,
                    year => ctx.year,
                },
            ),
        }
    }
}

fn service_cards(ctx: &SectionContext<'_>, services: &[String], extra: bool) -> Vec<ServiceCard> {
    let profile = ctx.profile();

    services
        .iter()
        .map(|name| {
            // Validation guarantees art for every service; render without
            // an image rather than fail if it is missing.
            let (icon, image) = match profile.art_for(name) {
                Some(art) => (icon_svg(&art.icon, "icon-md"), ctx.url(&art.image)),
                None => {
                    tracing::warn!("No art for service '{}'", name);
                    (icon_svg("", "icon-md"), String::new())
                }
            };

            ServiceCard {
                name: name.clone(),
                slug: slugify(name),
                icon,
                image,
                extra,
            }
        })
        .collect()
}

/// "Oil & Gas · Land Reclamation · Earthmoving" style badge from the first services.
fn hero_badge(profile: &BusinessProfile) -> String {
    profile
        .services
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(" \u{2022} ")
}

/// Lower-case, dash-separated identifier for a service name.
pub fn slugify(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

    re.replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Join a site-absolute path onto the base URL. Absolute URLs pass through.
pub fn site_url(base_url: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Calendar year on the build machine. The page script updates it in the
/// browser.
fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Render profile copy (markdown) to HTML.
pub fn render_markdown(content: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let options = Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(section: Section, ctx: &SectionContext<'_>) -> String {
        section.render(ctx, &TemplateEngine::new()).unwrap()
    }

    fn visible_cards(html: &str) -> usize {
        html.matches(r#"<li class="service-card" data-service="#).count()
    }

    fn hidden_cards(html: &str) -> usize {
        html.matches("data-service-extra").count()
    }

    #[test]
    fn collapsed_services_render_six() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");

        let html = render(Section::Services, &ctx);

        assert_eq!(visible_cards(&html), 6);
        assert_eq!(hidden_cards(&html), 3);
        assert!(html.contains("See All Services"));
        assert!(html.contains(r#"aria-expanded="false""#));
    }

    #[test]
    fn expanded_services_render_all() {
        let content = SiteContent::shipped();
        let mut ctx = SectionContext::new(&content, "/");
        ctx.services.toggle();

        let html = render(Section::Services, &ctx);
        assert_eq!(visible_cards(&html), 9);
        assert_eq!(hidden_cards(&html), 0);
        assert!(html.contains("Show Less"));

        ctx.services.toggle();
        let html = render(Section::Services, &ctx);
        assert_eq!(visible_cards(&html), 6);
    }

    #[test]
    fn short_service_list_has_no_toggle() {
        let mut content = SiteContent::shipped();
        content.profile.services.truncate(4);
        let ctx = SectionContext::new(&content, "/");

        let html = render(Section::Services, &ctx);
        assert_eq!(visible_cards(&html), 4);
        assert!(!html.contains("data-services-toggle"));
    }

    #[test]
    fn services_keep_order() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::Services, &ctx);

        let positions: Vec<usize> = content
            .profile
            .services
            .iter()
            .map(|s| html.find(&format!(r#"data-service="{}""#, slugify(s))).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn footer_lists_first_five_services() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::Footer, &ctx);

        assert_eq!(html.matches("<li>").count(), 5);
        assert!(html.contains("<li>Excavation</li>"));
        assert!(html.contains("<li>Land Reclamation</li>"));
        assert!(!html.contains("<li>Acreage Development</li>"));
        assert!(html.find("<li>Excavation</li>") < html.find("<li>Trucking</li>"));
    }

    #[test]
    fn footer_prints_calendar_year() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        assert_eq!(ctx.year, chrono::Local::now().year());

        let html = render(Section::Footer, &ctx);
        assert!(html.contains(&format!("<span data-current-year>{}</span>", ctx.year)));

        let new_year = SectionContext { year: 2028, ..ctx };
        let html = render(Section::Footer, &new_year);
        assert!(html.contains("<span data-current-year>2028</span>"));
    }

    #[test]
    fn timeline_is_chronological() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::About, &ctx);

        let a = html.find(r#"data-year="1976""#).unwrap();
        let b = html.find(r#"data-year="1989""#).unwrap();
        let c = html.find(r#"data-year="2022""#).unwrap();
        assert!(a < b && b < c);
        assert!(html.contains("Humble beginnings"));
    }

    #[test]
    fn contact_lists_every_phone() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::Contact, &ctx);

        for contact in &content.profile.contacts {
            assert!(html.contains(&format!(r#"href="tel:{}""#, contact.phone)));
        }
        assert!(html.contains(r#"href="mailto:excavat@telus.net""#));
        assert_eq!(html.matches(" required ").count(), 3);
        assert!(html.contains("data-quote-form"));
    }

    #[test]
    fn deferred_feed_renders_placeholder() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::Instagram, &ctx);

        assert!(html.contains("data-deferred-src"));
        assert!(html.contains("Loading..."));
        assert!(!html.contains("instagram-media"));
    }

    #[test]
    fn feed_renders_one_placeholder_per_post() {
        let mut content = SiteContent::shipped();
        content.instagram.posts = vec![
            "https://www.instagram.com/p/one".to_string(),
            "https://www.instagram.com/p/two".to_string(),
        ];
        let mut ctx = SectionContext::new(&content, "/");
        ctx.defer_feed = false;

        let html = render(Section::Instagram, &ctx);
        assert_eq!(html.matches(r#"class="instagram-media""#).count(), 2);
        assert_eq!(html.matches("utm_source=ig_embed").count(), 6);
        assert!(html.contains(r#"data-instgrm-version="14""#));
        assert!(html.contains("@hansens_excavating"));
    }

    #[test]
    fn empty_feed_shows_notice() {
        let content = SiteContent::shipped();
        let mut ctx = SectionContext::new(&content, "/");
        ctx.defer_feed = false;

        let html = render(Section::Instagram, &ctx);
        assert!(html.contains("Instagram posts will appear here"));
    }

    #[test]
    fn hero_links_main_phone() {
        let content = SiteContent::shipped();
        let ctx = SectionContext::new(&content, "/");
        let html = render(Section::Hero, &ctx);

        assert!(html.contains(r#"href="tel:(403) 634-2262""#));
        assert!(html.contains("1000+"));
        assert!(html.contains("stat-highlight"));
    }

    #[test]
    fn renders_markdown_copy() {
        assert_eq!(render_markdown("We **dig**."), "<p>We <strong>dig</strong>.</p>\n");
    }

    #[test]
    fn slugifies_service_names() {
        assert_eq!(slugify("Oil & Gas"), "oil-gas");
        assert_eq!(slugify("And More!"), "and-more");
        assert_eq!(slugify("Sewage Design and Installation"), "sewage-design-and-installation");
    }

    #[test]
    fn joins_site_urls() {
        assert_eq!(site_url("/", "/logo.svg"), "/logo.svg");
        assert_eq!(site_url("/site/", "/logo.svg"), "/site/logo.svg");
        assert_eq!(site_url("/", "https://cdn.test/x.png"), "https://cdn.test/x.png");
    }
}
