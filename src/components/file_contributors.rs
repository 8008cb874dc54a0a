use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Avatar, InlineLink, Modal, ModalSize};
use crate::analytics::{use_analytics, Analytics, MatomoEvent};
use crate::breakpoint::{use_breakpoint_value, ResponsiveValue};
use crate::i18n::{Translation, TranslationId};

const PROFILE_BASE: &str = "https://github.com/";
const AVATAR_SIZE: u32 = 40;

pub const SEE_CONTRIBUTORS_EVENT: MatomoEvent = MatomoEvent {
    event_category: "see contributors",
    event_action: "click",
    event_name: "click",
};

/// Someone who edited a page's source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContributor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    /// Time of this contributor's latest edit to the file
    pub date: String,
}

pub fn profile_url(login: &str) -> String {
    format!("{PROFILE_BASE}{login}")
}

/// Contributors are ordered most recent first.
pub fn last_contributor(contributors: &[FileContributor]) -> Option<&FileContributor> {
    contributors.first()
}

/// Open/closed state of the contributors dialog.
#[derive(Debug, Clone, Copy)]
struct ModalToggle {
    is_open: RwSignal<bool>,
}

impl ModalToggle {
    fn new(open: bool) -> Self {
        Self {
            is_open: RwSignal::new(open),
        }
    }

    fn open(&self, analytics: &Analytics) {
        self.is_open.set(true);
        analytics.track(&SEE_CONTRIBUTORS_EVENT);
    }

    fn set_open(&self, open: bool) {
        self.is_open.set(open);
    }
}

#[component]
pub fn ContributorList(children: Children) -> impl IntoView {
    view! { <ul class="contributor-list">{children()}</ul> }
}

#[component]
pub fn Contributor(contributor: FileContributor) -> impl IntoView {
    view! {
        <li class="contributor-list__item">
            <Avatar
                src=contributor.avatar_url
                name=contributor.login.clone()
                size=AVATAR_SIZE
                class="contributor-list__avatar"
            />
            <InlineLink href=profile_url(&contributor.login)>
                {format!("@{}", contributor.login)}
            </InlineLink>
        </li>
    }
}

/// Who edited this page: the latest editor inline, everyone in a dialog.
#[component]
pub fn FileContributors(
    /// Most recent contributor first
    contributors: Vec<FileContributor>,
    /// Already formatted for the reader's locale
    #[prop(into)]
    last_edit_locale_timestamp: String,
    /// Extra classes for the root element
    #[prop(optional, into)]
    class: String,
    #[prop(optional, into)] id: Option<String>,
    /// Show the contributors dialog on first render
    #[prop(optional)]
    default_open: bool,
) -> impl IntoView {
    let toggle = ModalToggle::new(default_open);
    let analytics = use_analytics();
    let modal_size = use_breakpoint_value(ResponsiveValue::new(ModalSize::Xl).md(ModalSize::Md));

    let (last_login, last_avatar) = match last_contributor(&contributors) {
        Some(contributor) => (contributor.login.clone(), contributor.avatar_url.clone()),
        None => (String::new(), String::new()),
    };

    let root_class = if class.is_empty() {
        "file-contributors".to_string()
    } else {
        format!("file-contributors {class}")
    };

    let contributors = StoredValue::new(contributors);

    view! {
        <Modal
            open=toggle.is_open
            on_open_change=move |open: bool| toggle.set_open(open)
            size=modal_size
            title=|| view! { <Translation id=TranslationId::Contributors /> }
        >
            <p class="file-contributors__thanks">
                <Translation id=TranslationId::ContributorsThanks />
            </p>
            <ContributorList>
                <For
                    each=move || contributors.get_value()
                    key=|contributor| contributor.login.clone()
                    children=|contributor| view! { <Contributor contributor /> }
                />
            </ContributorList>
        </Modal>

        <div class=root_class id=id>
            <div class="file-contributors__last-edit">
                <Avatar
                    src=last_avatar
                    name=last_login.clone()
                    size=AVATAR_SIZE
                    class="file-contributors__avatar"
                />
                <p class="file-contributors__summary">
                    <Translation id=TranslationId::LastEdit />
                    ": "
                    <InlineLink href=profile_url(&last_login)>{format!("@{last_login}")}</InlineLink>
                    {format!(", {last_edit_locale_timestamp}")}
                </p>
            </div>
            <div class="file-contributors__actions">
                <button
                    type="button"
                    class="button button--outline file-contributors__button"
                    on:click=move |_| toggle.open(&analytics)
                >
                    <Translation id=TranslationId::SeeContributors />
                </button>
            </div>
        </div>
    }
}
