//! Localised UI strings.
//!
//! Messages are Fluent resources embedded from `assets/i18n/<locale>.ftl`.
//! Every locale is resolved into a flat table once, when the [`I18n`] is
//! built, so rendering never touches Fluent.

use std::collections::HashMap;
use std::sync::Arc;

use fluent_bundle::{FluentBundle, FluentResource};
use leptos::prelude::*;
use rust_embed::RustEmbed;
use unic_langid::LanguageIdentifier;

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Locales;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationId {
    Contributors,
    ContributorsThanks,
    LastEdit,
    SeeContributors,
}

impl TranslationId {
    pub const ALL: [TranslationId; 4] = [
        TranslationId::Contributors,
        TranslationId::ContributorsThanks,
        TranslationId::LastEdit,
        TranslationId::SeeContributors,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TranslationId::Contributors => "contributors",
            TranslationId::ContributorsThanks => "contributors-thanks",
            TranslationId::LastEdit => "last-edit",
            TranslationId::SeeContributors => "see-contributors",
        }
    }
}

#[derive(Debug, Clone)]
pub struct I18n {
    locale: LanguageIdentifier,
    messages: Arc<HashMap<TranslationId, String>>,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl I18n {
    /// Build the string table for the best available match of `requested`.
    pub fn new(requested: &str) -> Self {
        let fallback = default_locale();
        let locale = resolve_locale(requested, &available_locales()).unwrap_or_else(|| fallback.clone());

        let primary = load_bundle(&locale);
        let secondary = if locale == fallback {
            None
        } else {
            load_bundle(&fallback)
        };

        let messages = TranslationId::ALL
            .into_iter()
            .map(|id| {
                let text = [primary.as_ref(), secondary.as_ref()]
                    .into_iter()
                    .flatten()
                    .find_map(|bundle| format_message(bundle, id.key()))
                    .unwrap_or_else(|| {
                        tracing::warn!(%locale, key = id.key(), "missing translation");
                        id.key().to_string()
                    });
                (id, text)
            })
            .collect();

        Self {
            locale,
            messages: Arc::new(messages),
        }
    }

    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    pub fn tr(&self, id: TranslationId) -> String {
        self.messages
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.key().to_string())
    }
}

fn default_locale() -> LanguageIdentifier {
    DEFAULT_LOCALE.parse().unwrap_or_default()
}

pub fn available_locales() -> Vec<LanguageIdentifier> {
    let mut locales: Vec<LanguageIdentifier> = Locales::iter()
        .filter_map(|file| file.strip_suffix(".ftl").and_then(|name| name.parse().ok()))
        .collect();
    locales.sort_by_key(ToString::to_string);
    locales
}

/// Exact match first, then a locale sharing the requested language.
fn resolve_locale(requested: &str, available: &[LanguageIdentifier]) -> Option<LanguageIdentifier> {
    let requested: LanguageIdentifier = requested.parse().ok()?;

    available
        .iter()
        .find(|locale| **locale == requested)
        .or_else(|| {
            available
                .iter()
                .find(|locale| locale.language == requested.language)
        })
        .cloned()
}

fn load_bundle(locale: &LanguageIdentifier) -> Option<FluentBundle<FluentResource>> {
    let file = Locales::get(&format!("{locale}.ftl"))?;
    let source = String::from_utf8_lossy(file.data.as_ref()).into_owned();

    let resource = FluentResource::try_new(source).unwrap_or_else(|(resource, errors)| {
        tracing::warn!(%locale, ?errors, "skipping malformed translation entries");
        resource
    });

    let mut bundle = FluentBundle::new(vec![locale.clone()]);
    bundle.set_use_isolating(false);
    if let Err(errors) = bundle.add_resource(resource) {
        tracing::warn!(%locale, ?errors, "duplicate translation entries");
    }

    Some(bundle)
}

fn format_message(bundle: &FluentBundle<FluentResource>, key: &str) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = vec![];
    let value = bundle.format_pattern(pattern, None, &mut errors);
    errors.is_empty().then(|| value.into_owned())
}

pub fn provide_i18n(i18n: I18n) {
    provide_context(i18n);
}

pub fn use_i18n() -> I18n {
    use_context::<I18n>().unwrap_or_default()
}

/// Localised text for `id`.
#[component]
pub fn Translation(id: TranslationId) -> impl IntoView {
    use_i18n().tr(id)
}
