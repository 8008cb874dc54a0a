use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::FileContributor;

/// Everything the contributors widget of one page needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContributors {
    pub contributors: Vec<FileContributor>,
    pub last_edit_locale_timestamp: String,
}

#[server]
pub async fn get_file_contributors(path: String) -> Result<PageContributors, ServerFnError> {
    use crate::app::SiteSettings;
    use crate::github::SharedSource;
    use crate::i18n::I18n;

    // Startup warns once when no source is configured.
    let Some(SharedSource(source)) = use_context::<SharedSource>() else {
        tracing::debug!(%path, "no contributor source configured");
        return Ok(PageContributors::default());
    };
    let settings = use_context::<SiteSettings>().unwrap_or_default();
    let i18n = I18n::new(&settings.locale);

    let contributors = source.fetch_contributors(&path).await.map_err(|e| {
        tracing::error!(error = %e, source = source.name(), %path, "failed to load contributors");
        ServerFnError::new(e)
    })?;

    Ok(page_contributors(contributors, i18n.locale()))
}

#[cfg(feature = "ssr")]
fn page_contributors(
    contributors: Vec<FileContributor>,
    locale: &unic_langid::LanguageIdentifier,
) -> PageContributors {
    let last_edit_locale_timestamp = crate::components::last_contributor(&contributors)
        .map(|contributor| format_last_edit(&contributor.date, locale))
        .unwrap_or_default();

    PageContributors {
        contributors,
        last_edit_locale_timestamp,
    }
}

/// Date pattern and month names for a UI locale, US English otherwise.
#[cfg(feature = "ssr")]
fn date_format(locale: &unic_langid::LanguageIdentifier) -> (&'static str, chrono::Locale) {
    match locale.language.as_str() {
        "de" => ("%-d. %B %Y", chrono::Locale::de_DE),
        "es" => ("%-d de %B de %Y", chrono::Locale::es_ES),
        "fr" => ("%-d %B %Y", chrono::Locale::fr_FR),
        _ => ("%b %-d, %Y", chrono::Locale::en_US),
    }
}

/// The day of an RFC 3339 timestamp, written the way `locale` writes dates
/// ("Jan 1, 2024", "1 janvier 2024"). Anything else is shown as given.
#[cfg(feature = "ssr")]
pub fn format_last_edit(date: &str, locale: &unic_langid::LanguageIdentifier) -> String {
    let (pattern, chrono_locale) = date_format(locale);

    chrono::DateTime::parse_from_rfc3339(date)
        .map(|parsed| parsed.format_localized(pattern, chrono_locale).to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use unic_langid::LanguageIdentifier;

    use super::*;

    fn lang(tag: &str) -> LanguageIdentifier {
        tag.parse().unwrap()
    }

    fn contributor(login: &str, date: &str) -> FileContributor {
        FileContributor {
            login: login.to_string(),
            avatar_url: String::new(),
            html_url: String::new(),
            date: date.to_string(),
        }
    }

    #[test]
    fn formats_rfc3339_dates() {
        assert_eq!(format_last_edit("2024-01-01T10:30:00Z", &lang("en-US")), "Jan 1, 2024");
        assert_eq!(format_last_edit("2023-12-25T23:00:00+02:00", &lang("en-US")), "Dec 25, 2023");
    }

    #[test]
    fn formats_dates_for_each_shipped_locale() {
        let date = "2024-03-05T12:00:00Z";

        assert_eq!(format_last_edit(date, &lang("en-US")), "Mar 5, 2024");
        assert_eq!(format_last_edit(date, &lang("fr")), "5 mars 2024");
        assert_eq!(format_last_edit(date, &lang("de")), "5. März 2024");
        assert_eq!(format_last_edit(date, &lang("es")), "5 de marzo de 2024");
    }

    #[test]
    fn regional_variants_share_their_language_format() {
        assert_eq!(
            format_last_edit("2024-03-05T12:00:00Z", &lang("fr-CA")),
            "5 mars 2024"
        );
    }

    #[test]
    fn passes_through_unparsable_dates() {
        assert_eq!(format_last_edit("2024-01-01", &lang("en-US")), "2024-01-01");
        assert_eq!(format_last_edit("", &lang("en-US")), "");
    }

    #[test]
    fn timestamp_comes_from_latest_contributor() {
        let contributors = vec![
            contributor("alice", "2024-03-05T00:00:00Z"),
            contributor("bob", "2023-01-01T00:00:00Z"),
        ];

        let page = page_contributors(contributors.clone(), &lang("en-US"));
        assert_eq!(page.last_edit_locale_timestamp, "Mar 5, 2024");
        assert_eq!(page.contributors.len(), 2);

        let page = page_contributors(contributors, &lang("fr"));
        assert_eq!(page.last_edit_locale_timestamp, "5 mars 2024");
    }

    #[test]
    fn empty_page_has_no_timestamp() {
        let page = page_contributors(vec![], &lang("en-US"));

        assert_eq!(page, PageContributors::default());
    }

    #[tokio::test]
    async fn unconfigured_source_serves_empty_page() {
        let page = get_file_contributors("README.md".to_string()).await.unwrap();

        assert_eq!(page, PageContributors::default());
    }
}
