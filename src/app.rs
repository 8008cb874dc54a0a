use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_params_map,
    StaticSegment, WildcardSegment,
};

use crate::analytics::{matomo_snippet, provide_analytics, Analytics, MatomoConfig};
use crate::api::get_file_contributors;
use crate::breakpoint::provide_viewport;
use crate::components::FileContributors;
use crate::i18n::{provide_i18n, I18n, DEFAULT_LOCALE};

/// Site-wide settings shared by the shell and the app.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSettings {
    pub locale: String,
    pub matomo: Option<MatomoConfig>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            matomo: None,
        }
    }
}

impl SiteSettings {
    /// Settings for the hydrating client, recovered from the served document.
    fn from_document() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(locale) = document()
                .document_element()
                .and_then(|root| root.get_attribute("lang"))
            {
                return Self {
                    locale,
                    matomo: None,
                };
            }
        }

        Self::default()
    }
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    let settings = use_context::<SiteSettings>().unwrap_or_default();
    let i18n = I18n::new(&settings.locale);
    let tracker = settings.matomo.as_ref().and_then(|matomo| {
        matomo_snippet(matomo)
            .inspect_err(|e| tracing::error!(error = %e, "failed to build the Matomo loader"))
            .ok()
    });

    view! {
        <!DOCTYPE html>
        <html lang=i18n.locale().to_string()>
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
                {tracker.map(|snippet| view! { <script inner_html=snippet></script> })}
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let settings = use_context::<SiteSettings>().unwrap_or_else(SiteSettings::from_document);
    provide_i18n(I18n::new(&settings.locale));
    provide_viewport();
    provide_analytics(Analytics::default());

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/file-contributors.css"/>

        <Title text="Docs"/>

        <Router>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=(StaticSegment("docs"), WildcardSegment("path")) view=ContentPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <div class="container">
            <header class="hero">
                <h1>"Docs"</h1>
                <p class="tagline">"every page, with everyone who wrote it"</p>
            </header>
            <nav>
                <a href="/docs/README.md">"README.md"</a>
            </nav>
        </div>
    }
}

#[component]
fn ContentPage() -> impl IntoView {
    let params = use_params_map();
    let path = move || params.read().get("path").unwrap_or_default();
    let contributors = Resource::new(path, get_file_contributors);

    view! {
        <Title text=path/>
        <article class="container content-page">
            <h1 class="content-page__title">{path}</h1>
            <Suspense fallback=|| view! { <p class="content-page__loading">"Loading contributors…"</p> }>
                {move || Suspend::new(async move {
                    match contributors.await {
                        Ok(page) => view! {
                            <FileContributors
                                contributors=page.contributors
                                last_edit_locale_timestamp=page.last_edit_locale_timestamp
                                class="content-page__contributors"
                            />
                        }
                        .into_any(),
                        Err(e) => view! {
                            <p class="content-page__error">{e.to_string()}</p>
                        }
                        .into_any(),
                    }
                })}
            </Suspense>
        </article>
    }
}
