//! The business profile record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::loader::ContentError;

/// Number of services listed in the footer.
pub const FOOTER_SERVICES: usize = 5;

/// Company facts that drive every section of the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessProfile {
    /// Company name
    pub name: String,

    /// Shorter name used in running text such as the quote email heading
    #[serde(default)]
    pub short_name: Option<String>,

    /// One-line pitch shown in the hero
    pub tagline: String,

    /// Year the company was founded
    pub founding_year: u16,

    /// Street address
    pub location: Location,

    /// Address for `mailto:` links and the quote form
    pub email: String,

    /// Phone contacts; the first is the main office line
    pub contacts: Vec<Contact>,

    /// Services in display order
    pub services: Vec<String>,

    /// Icon and image per service name
    #[serde(default)]
    pub service_art: BTreeMap<String, ServiceArt>,

    /// Company history, oldest first
    #[serde(default)]
    pub history: Vec<Milestone>,

    /// Mission statement
    pub mission: Mission,

    /// Longer "about us" copy (markdown)
    #[serde(default)]
    pub about: String,

    /// Button labels
    #[serde(default)]
    pub calls_to_action: CallsToAction,

    /// Counters shown under the hero
    #[serde(default)]
    pub stats: Vec<Stat>,

    /// Path of the logo image
    #[serde(default = "default_logo")]
    pub logo: String,

    /// Path of the hero background image
    #[serde(default)]
    pub hero_image: Option<String>,
}

fn default_logo() -> String {
    "/logo.svg".to_string()
}

/// Mailing address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// A person or desk reachable by phone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    /// Role shown as the label, e.g. "Owner"
    pub role: String,

    /// Person's name, if any
    #[serde(default)]
    pub name: Option<String>,

    /// Phone number as displayed
    pub phone: String,
}

impl Contact {
    /// Label for the contact list, e.g. "Owner - Devin Hansen".
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} - {}", self.role, name),
            None => self.role.clone(),
        }
    }

    /// `tel:` link for this contact.
    pub fn tel_href(&self) -> String {
        tel_href(&self.phone)
    }
}

/// Icon and photo for one service card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceArt {
    /// Icon name (see the icon set in the static builder)
    pub icon: String,

    /// Card background image
    pub image: String,
}

/// One entry of the history timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub year: u16,
    pub title: String,
    /// Markdown
    pub description: String,
    pub image: String,
}

/// Mission statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub headline: String,
    /// Markdown
    pub body: String,
}

/// Call-to-action labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallsToAction {
    #[serde(default = "default_hero_cta")]
    pub hero: String,

    #[serde(default = "default_contact_prompt")]
    pub contact_prompt: String,
}

fn default_hero_cta() -> String {
    "Request a Free Estimate".to_string()
}

fn default_contact_prompt() -> String {
    "Get in Touch".to_string()
}

impl Default for CallsToAction {
    fn default() -> Self {
        Self {
            hero: default_hero_cta(),
            contact_prompt: default_contact_prompt(),
        }
    }
}

/// A hero counter such as "50+ Years".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stat {
    pub value: u32,

    #[serde(default)]
    pub suffix: String,

    pub label: String,

    /// Render in the accent colour
    #[serde(default)]
    pub highlight: bool,
}

impl Stat {
    /// Counter text, e.g. "1000+".
    pub fn display(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }
}

impl BusinessProfile {
    /// Check the invariants every renderer relies on.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.services.is_empty() {
            return Err(ContentError::NoServices);
        }

        if let Some(missing) = self
            .services
            .iter()
            .find(|s| !self.service_art.contains_key(s.as_str()))
        {
            return Err(ContentError::MissingServiceArt(missing.clone()));
        }

        if self.contacts.is_empty() {
            return Err(ContentError::NoContacts);
        }

        if let Some(contact) = self.contacts.iter().find(|c| c.phone.trim().is_empty()) {
            return Err(ContentError::EmptyPhone(contact.label()));
        }

        for pair in self.history.windows(2) {
            if pair[1].year <= pair[0].year {
                return Err(ContentError::HistoryOutOfOrder {
                    previous: pair[0].year,
                    year: pair[1].year,
                });
            }
        }

        Ok(())
    }

    /// The main office line. Validation guarantees at least one contact.
    pub fn main_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }

    /// Main office phone number, or an empty string before validation.
    pub fn main_phone(&self) -> &str {
        self.main_contact().map(|c| c.phone.as_str()).unwrap_or("")
    }

    /// Services listed in the footer, in profile order.
    pub fn footer_services(&self) -> &[String] {
        let n = self.services.len().min(FOOTER_SERVICES);
        &self.services[..n]
    }

    /// Art for a service name.
    pub fn art_for(&self, service: &str) -> Option<&ServiceArt> {
        self.service_art.get(service)
    }

    /// Short company name, falling back to the full name.
    pub fn short_name(&self) -> &str {
        self.short_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// `mailto:` link for the company address.
    pub fn mailto_href(&self) -> String {
        format!("mailto:{}", self.email)
    }

    /// Whole years the business has been operating as of `current_year`.
    pub fn years_in_business(&self, current_year: u16) -> u16 {
        current_year.saturating_sub(self.founding_year)
    }

    /// "City, Province" line.
    pub fn city_line(&self) -> String {
        format!("{}, {}", self.location.city, self.location.province)
    }
}

/// Build a `tel:` link. The number is used as written.
pub fn tel_href(phone: &str) -> String {
    format!("tel:{}", phone)
}
