mod avatar;
mod file_contributors;
mod inline_link;
mod modal;

pub use avatar::{initials, Avatar};
pub use file_contributors::{
    last_contributor, profile_url, Contributor, ContributorList, FileContributor, FileContributors,
    SEE_CONTRIBUTORS_EVENT,
};
pub use inline_link::InlineLink;
pub use modal::{Modal, ModalSize};

/// Render a view to HTML inside its own reactive owner.
#[cfg(all(test, feature = "ssr"))]
pub(crate) fn render_to_html<V>(view: impl FnOnce() -> V) -> String
where
    V: leptos::tachys::view::RenderHtml,
{
    let owner = leptos::prelude::Owner::new();
    owner.with(|| view().to_html())
}
