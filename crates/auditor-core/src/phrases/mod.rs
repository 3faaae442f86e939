//! Locale-keyed phrase rendering for recommendation text.
//!
//! The engine never hardcodes user-facing copy: rules reference phrase
//! keys (`<rule>.issue` / `<rule>.action`) resolved through a
//! [`PhraseLookup`]. Lookups fall back to the default locale before giving
//! up; a key unresolved even there causes the rule to be skipped.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub mod file_repository;

pub use file_repository::FilePhraseRepository;

/// Variables substituted into a phrase template (`{name}` placeholders).
pub type PhraseVars = Vec<(&'static str, String)>;

/// `(locale, key, vars) -> text` collaborator used to render
/// recommendations. Implementations must fall back to the default locale
/// for unknown locales/keys and return `None` only when the key resolves
/// nowhere.
pub trait PhraseLookup: Send + Sync {
    fn phrase(&self, locale: &str, key: &str, vars: &[(&'static str, String)]) -> Option<String>;
}

/// Substitute `{name}` placeholders; unknown placeholders are left intact.
pub fn interpolate(template: &str, vars: &[(&'static str, String)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }
    rendered
}

/// The built-in English pack. This is the terminal fallback of every
/// lookup chain, so it covers every phrase key the rule tables reference.
#[derive(Debug, Default, Clone)]
pub struct DefaultPhrases;

impl DefaultPhrases {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn template(key: &str) -> Option<&'static str> {
        BUILTIN_EN.get(key).copied()
    }
}

impl PhraseLookup for DefaultPhrases {
    fn phrase(&self, _locale: &str, key: &str, vars: &[(&'static str, String)]) -> Option<String> {
        Self::template(key).map(|template| interpolate(template, vars))
    }
}

static BUILTIN_EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "audit.no_data.issue",
            "No auditable content was found for this page",
        ),
        (
            "audit.no_data.action",
            "Publish a title, description and body content, then re-run the audit",
        ),
        ("audit.missing_title.issue", "The page has no title tag"),
        (
            "audit.missing_title.action",
            "Add a descriptive title of 30-60 characters",
        ),
        (
            "audit.title_too_short.issue",
            "The title is only {length} characters long",
        ),
        (
            "audit.title_too_short.action",
            "Expand the title to at least 30 characters",
        ),
        (
            "audit.title_too_long.issue",
            "The title is {length} characters and will be truncated in results",
        ),
        (
            "audit.title_too_long.action",
            "Shorten the title to 60 characters or fewer",
        ),
        (
            "audit.missing_description.issue",
            "The page has no meta description",
        ),
        (
            "audit.missing_description.action",
            "Add a meta description of 120-160 characters",
        ),
        (
            "audit.description_too_short.issue",
            "The meta description is only {length} characters long",
        ),
        (
            "audit.description_too_short.action",
            "Expand the description to at least 120 characters",
        ),
        (
            "audit.description_too_long.issue",
            "The meta description is {length} characters and will be truncated",
        ),
        (
            "audit.description_too_long.action",
            "Shorten the description to 160 characters or fewer",
        ),
        (
            "audit.missing_primary_heading.issue",
            "The page has no primary (H1) heading",
        ),
        (
            "audit.missing_primary_heading.action",
            "Add exactly one H1 heading describing the page topic",
        ),
        (
            "audit.multiple_primary_headings.issue",
            "The page has {count} primary headings",
        ),
        (
            "audit.multiple_primary_headings.action",
            "Keep a single H1 and demote the others to H2",
        ),
        (
            "audit.broken_links.issue",
            "{count} broken link(s) were found on the page",
        ),
        (
            "audit.broken_links.action",
            "Fix or remove every broken link",
        ),
        (
            "audit.missing_canonical.issue",
            "The page declares no canonical URL",
        ),
        (
            "audit.missing_canonical.action",
            "Add a canonical link element to prevent duplicate-content dilution",
        ),
        (
            "audit.slow_load.issue",
            "The page took {secs}s to load",
        ),
        (
            "audit.slow_load.action",
            "Reduce page weight and defer non-critical assets",
        ),
        (
            "audit.images_missing_alt.issue",
            "{count} image(s) are missing alt text",
        ),
        (
            "audit.images_missing_alt.action",
            "Add descriptive alt text to every image",
        ),
        (
            "audit.content_near_empty.issue",
            "The page body contains only {words} words",
        ),
        (
            "audit.content_near_empty.action",
            "Write substantive content covering the page topic",
        ),
        (
            "audit.thin_content.issue",
            "The page body is thin at {words} words",
        ),
        (
            "audit.thin_content.action",
            "Expand the content to at least 300 words",
        ),
        (
            "audit.below_benchmark_length.issue",
            "Content length ({words} words) is well below the competitive median of {median}",
        ),
        (
            "audit.below_benchmark_length.action",
            "Expand the content toward the competitive median length",
        ),
        (
            "audit.keyword_missing_title.issue",
            "The target phrase \"{phrase}\" does not appear in the title",
        ),
        (
            "audit.keyword_missing_title.action",
            "Work the phrase into the title, ideally near the front",
        ),
        (
            "audit.keyword_missing_description.issue",
            "The target phrase \"{phrase}\" does not appear in the meta description",
        ),
        (
            "audit.keyword_missing_description.action",
            "Mention the phrase once in the meta description",
        ),
        (
            "audit.keyword_missing_primary_heading.issue",
            "The target phrase \"{phrase}\" does not appear in the primary heading",
        ),
        (
            "audit.keyword_missing_primary_heading.action",
            "Include the phrase in the H1 heading",
        ),
        (
            "audit.keyword_missing_body.issue",
            "The target phrase \"{phrase}\" does not appear anywhere in the body",
        ),
        (
            "audit.keyword_missing_body.action",
            "Use the phrase naturally throughout the body copy",
        ),
        (
            "audit.keyword_missing_first_words.issue",
            "The target phrase \"{phrase}\" is absent from the first 100 words",
        ),
        (
            "audit.keyword_missing_first_words.action",
            "Mention the phrase early, within the opening paragraph",
        ),
        (
            "audit.keyword_missing_url.issue",
            "The target phrase \"{phrase}\" is not part of the URL",
        ),
        (
            "audit.keyword_missing_url.action",
            "Use a hyphenated slug containing the phrase",
        ),
        (
            "audit.keyword_density_low.issue",
            "Keyword density is {density}%, below the recommended range",
        ),
        (
            "audit.keyword_density_low.action",
            "Use the phrase {min}-{max} times across the body",
        ),
        (
            "audit.keyword_density_high.issue",
            "Keyword density is {density}%, which reads as stuffing",
        ),
        (
            "audit.keyword_density_high.action",
            "Reduce usage to at most {max} occurrences",
        ),
        (
            "audit.benchmark_overview.issue",
            "{sample} competing pages were analyzed; their median length is {median} words",
        ),
        (
            "audit.benchmark_overview.action",
            "Compare your content depth and structure against these references",
        ),
        (
            "audit.all_good.issue",
            "No significant issues were found",
        ),
        (
            "audit.all_good.action",
            "Keep content fresh and monitor competitors for changes",
        ),
        ("checklist.name.issue", "The business name is missing"),
        (
            "checklist.name.action",
            "Set the exact real-world business name",
        ),
        ("checklist.address.issue", "The address is missing"),
        (
            "checklist.address.action",
            "Add the complete street address",
        ),
        ("checklist.phone.issue", "The phone number is missing"),
        (
            "checklist.phone.action",
            "Add a local phone number customers can call",
        ),
        (
            "checklist.primary_category.issue",
            "No primary category is set",
        ),
        (
            "checklist.primary_category.action",
            "Choose the category that best describes the business",
        ),
        ("checklist.website.issue", "No website link is set"),
        (
            "checklist.website.action",
            "Link the official website",
        ),
        ("checklist.hours.issue", "Opening hours are missing"),
        (
            "checklist.hours.action",
            "Publish accurate opening hours, including holidays",
        ),
        (
            "checklist.description.issue",
            "The business description is missing",
        ),
        (
            "checklist.description.action",
            "Write a description covering services and location",
        ),
        ("checklist.photos.issue", "No photos are uploaded"),
        (
            "checklist.photos.action",
            "Upload recent photos of the premises and products",
        ),
        (
            "checklist.attributes.issue",
            "No attributes are selected",
        ),
        (
            "checklist.attributes.action",
            "Mark applicable attributes such as wifi or accessibility",
        ),
        ("checklist.logo.issue", "No logo is uploaded"),
        ("checklist.logo.action", "Upload a square logo image"),
        (
            "checklist.low_rating.issue",
            "The average rating is {rating}, below 4.0",
        ),
        (
            "checklist.low_rating.action",
            "Respond to negative reviews and address recurring complaints",
        ),
        (
            "checklist.few_reviews.issue",
            "Only {count} reviews have been collected",
        ),
        (
            "checklist.few_reviews.action",
            "Ask satisfied customers to leave a review",
        ),
    ])
});
