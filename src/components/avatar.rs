use leptos::prelude::*;

/// Upper-cased first letters of the first and last words of `name`.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().next());

    first
        .into_iter()
        .chain(last)
        .flat_map(char::to_uppercase)
        .collect()
}

/// A round profile picture. Falls back to the initials of `name` when there
/// is no image or it fails to load, and to a generic glyph when there is no
/// name either.
#[component]
pub fn Avatar(
    #[prop(into)] src: String,
    #[prop(into)] name: String,
    /// Width and height in pixels
    #[prop(default = 40)]
    size: u32,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let (failed, set_failed) = signal(false);
    let style = format!("width: {size}px; height: {size}px");
    let class = if class.is_empty() {
        "avatar".to_string()
    } else {
        format!("avatar {class}")
    };
    let label = initials(&name);

    move || {
        if !src.is_empty() && !failed.get() {
            view! {
                <img
                    class=class.clone()
                    style=style.clone()
                    src=src.clone()
                    alt=name.clone()
                    loading="lazy"
                    on:error=move |_| set_failed.set(true)
                />
            }
            .into_any()
        } else if label.is_empty() {
            view! {
                <span class=format!("{class} avatar--placeholder") style=style.clone() role="img" aria-label="avatar">
                    <svg viewBox="0 0 24 24" width="60%" height="60%" fill="currentColor" aria-hidden="true">
                        <circle cx="12" cy="8" r="4"/>
                        <path d="M4 21c0-4.4 3.6-8 8-8s8 3.6 8 8z"/>
                    </svg>
                </span>
            }
            .into_any()
        } else {
            view! {
                <span class=format!("{class} avatar--initials") style=style.clone() role="img" aria-label=name.clone()>
                    {label.clone()}
                </span>
            }
            .into_any()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_of_single_word() {
        assert_eq!(initials("alice"), "A");
    }

    #[test]
    fn initials_of_first_and_last_word() {
        assert_eq!(initials("ada king lovelace"), "AL");
        assert_eq!(initials("  grace   hopper "), "GH");
    }

    #[test]
    fn initials_of_empty_name() {
        assert_eq!(initials(""), "");
        assert_eq!(initials("   "), "");
    }

    #[cfg(feature = "ssr")]
    mod render {
        use super::super::*;
        use crate::components::render_to_html;

        #[test]
        fn renders_image_when_src_present() {
            let html = render_to_html(|| view! { <Avatar src="a.png" name="alice" /> });

            assert!(html.contains("<img"));
            assert!(html.contains("src=\"a.png\""));
            assert!(html.contains("alt=\"alice\""));
        }

        #[test]
        fn renders_initials_without_src() {
            let html = render_to_html(|| view! { <Avatar src="" name="alice" /> });

            assert!(!html.contains("<img"));
            assert!(html.contains("avatar--initials"));
            assert!(html.contains(">A<"));
        }

        #[test]
        fn renders_placeholder_without_name() {
            let html = render_to_html(|| view! { <Avatar src="" name="" size=24 /> });

            assert!(html.contains("avatar--placeholder"));
            assert!(html.contains("width: 24px; height: 24px"));
        }
    }
}
