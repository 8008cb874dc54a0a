use leptos::prelude::*;

fn is_external(href: &str) -> bool {
    href.starts_with("https://") || href.starts_with("http://")
}

/// A link inside running text. External links open in a new tab.
#[component]
pub fn InlineLink(#[prop(into)] href: String, children: Children) -> impl IntoView {
    let external = is_external(&href);

    view! {
        <a
            class="inline-link"
            href=href
            target=external.then_some("_blank")
            rel=external.then_some("noopener noreferrer")
        >
            {children()}
        </a>
    }
}
