use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    #[default]
    Md,
    Xl,
}

impl ModalSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ModalSize::Md => "md",
            ModalSize::Xl => "xl",
        }
    }
}

static NEXT_MODAL: AtomicUsize = AtomicUsize::new(0);

fn next_title_id() -> String {
    format!("modal-title-{}", NEXT_MODAL.fetch_add(1, Ordering::Relaxed))
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn is_dismiss_key(key: &str) -> bool {
    key == "Escape"
}

/// Dialog overlay controlled by its parent.
///
/// The root element is always rendered; the overlay exists only while `open`
/// is true. Every dismissal (close button, overlay click, Escape) reports
/// `false` through `on_open_change` and leaves the state change to the
/// parent.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_open_change: Callback<bool>,
    #[prop(into, default = Signal::stored(ModalSize::Md))] size: Signal<ModalSize>,
    #[prop(into)] title: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let dismiss = move || on_open_change.run(false);
    let title_id = next_title_id();

    // Escape dismisses wherever focus is while open.
    #[cfg(target_arch = "wasm32")]
    {
        let listener = StoredValue::new(None);
        let remove_listener = move || {
            if let Some(handle) = listener.try_update_value(Option::take).flatten() {
                handle.remove();
            }
        };

        Effect::new(move |_| {
            remove_listener();
            if open.get() {
                listener.set_value(Some(window_event_listener(leptos::ev::keydown, move |ev| {
                    if is_dismiss_key(&ev.key()) {
                        dismiss();
                    }
                })));
            }
        });
        on_cleanup(remove_listener);
    }

    view! {
        <div class="modal" data-state=move || if open.get() { "open" } else { "closed" }>
            <Show when=move || open.get()>
                <div class="modal__overlay" on:click=move |_| dismiss()>
                    <div
                        class=move || format!("modal__dialog modal__dialog--{}", size.get().as_str())
                        role="dialog"
                        aria-modal="true"
                        aria-labelledby=title_id.clone()
                        tabindex="-1"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <header class="modal__header">
                            <h2 id=title_id.clone() class="modal__title">{title.run()}</h2>
                            <button
                                type="button"
                                class="modal__close"
                                aria-label="Close"
                                on:click=move |_| dismiss()
                            >
                                "×"
                            </button>
                        </header>
                        <div class="modal__body">{children()}</div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_escape_dismisses() {
        assert!(is_dismiss_key("Escape"));
        assert!(!is_dismiss_key("Enter"));
        assert!(!is_dismiss_key("Esc "));
    }

    #[test]
    fn title_ids_are_unique() {
        assert_ne!(next_title_id(), next_title_id());
    }

    #[test]
    fn size_names() {
        assert_eq!(ModalSize::Md.as_str(), "md");
        assert_eq!(ModalSize::Xl.as_str(), "xl");
    }

    #[cfg(feature = "ssr")]
    mod render {
        use super::super::*;
        use crate::components::render_to_html;

        fn title_id_of(html: &str) -> String {
            let start = html.find("aria-labelledby=\"").unwrap() + "aria-labelledby=\"".len();
            let end = start + html[start..].find('"').unwrap();
            html[start..end].to_string()
        }

        #[test]
        fn closed_modal_renders_only_its_root() {
            let html = render_to_html(|| view! {
                <Modal open=false on_open_change=|_| {} title=|| "Title">
                    <p>"body"</p>
                </Modal>
            });

            assert!(html.contains("data-state=\"closed\""));
            assert!(!html.contains("body"));
            assert!(!html.contains("role=\"dialog\""));
        }

        #[test]
        fn open_modal_renders_title_body_and_size() {
            let html = render_to_html(|| view! {
                <Modal open=true on_open_change=|_| {} size=ModalSize::Xl title=|| "Title">
                    <p>"body"</p>
                </Modal>
            });

            assert!(html.contains("data-state=\"open\""));
            assert!(html.contains("role=\"dialog\""));
            assert!(html.contains("modal__dialog--xl"));
            assert!(html.contains("Title"));
            assert!(html.contains("<p>body</p>"));
        }

        #[test]
        fn title_labels_its_own_dialog() {
            let html = render_to_html(|| view! {
                <Modal open=true on_open_change=|_| {} title=|| "First">
                    <p>"one"</p>
                </Modal>
                <Modal open=true on_open_change=|_| {} title=|| "Second">
                    <p>"two"</p>
                </Modal>
            });

            let (first, second) = html.split_at(html.find("<p>one</p>").unwrap());
            let first_id = title_id_of(first);
            let second_id = title_id_of(second);

            assert_ne!(first_id, second_id);
            assert!(first.contains(&format!("id=\"{first_id}\"")));
            assert!(second.contains(&format!("id=\"{second_id}\"")));
        }
    }
}
