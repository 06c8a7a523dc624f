use blog_frontend_common::verification::WidgetControls;
use blog_frontend_common::{VerificationConfig, VerificationWidget, WidgetRef, cn};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

/// A comment ready to be posted, with the verification token it was solved with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
    pub token: Option<String>,
}

#[derive(Properties, Clone, PartialEq)]
pub struct CommentFormProps {
    pub config: VerificationConfig,
    pub on_submit: Callback<CommentDraft>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Notice {
    NeedsVerification,
    Empty,
    Sent,
}

const SUBMIT: &str = "px-4 py-2 rounded-md bg-blue-500 text-white text-sm hover:bg-blue-600";

#[function_component(CommentForm)]
pub fn comment_form(props: &CommentFormProps) -> Html {
    let content = use_state(String::new);
    let token = use_state(|| None::<String>);
    let notice = use_state(|| None::<Notice>);
    let widget_ref = use_state(WidgetRef::new);

    let on_token = {
        let token = token.clone();
        Callback::from(move |value: String| token.set(Some(value)))
    };

    let oninput = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            content.set(input.value());
        })
    };

    let onsubmit = {
        let content = content.clone();
        let token = token.clone();
        let notice = notice.clone();
        let widget_ref = widget_ref.clone();
        let verification_enabled = props.config.is_enabled();
        let on_submit = props.on_submit.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let text = content.trim().to_string();
            if text.is_empty() {
                notice.set(Some(Notice::Empty));
                return;
            }

            // The callback may not have fired yet if the widget solved silently
            let solved = (*token).clone().or_else(|| widget_ref.get_response());
            if verification_enabled && solved.is_none() {
                notice.set(Some(Notice::NeedsVerification));
                return;
            }

            on_submit.emit(CommentDraft {
                content: text,
                token: solved,
            });

            content.set(String::new());
            token.set(None);
            notice.set(Some(Notice::Sent));

            // Tokens are single use
            if verification_enabled && let Err(err) = widget_ref.reset() {
                tracing::debug!(error = %err, "verification widget not mounted");
            }
        })
    };

    let notice_view = match *notice {
        Some(Notice::NeedsVerification) => html! {
            <p class="text-sm text-red-500">{"Please complete the verification first."}</p>
        },
        Some(Notice::Empty) => html! {
            <p class="text-sm text-red-500">{"The comment is empty."}</p>
        },
        Some(Notice::Sent) => html! {
            <p class="text-sm text-green-600 dark:text-green-400">{"Thanks, your comment was sent."}</p>
        },
        None => html! {},
    };

    html! {
        <form
            class="mt-8 p-4 flex flex-col gap-3 rounded-lg bg-white dark:bg-gray-800 shadow"
            {onsubmit}
        >
            <h2 class="text-lg font-semibold text-gray-900 dark:text-white">{"Leave a comment"}</h2>
            <textarea
                class="w-full min-h-24 p-2 rounded-md border border-gray-300 dark:border-gray-600 bg-transparent text-gray-900 dark:text-gray-100"
                placeholder="Say something nice"
                value={(*content).clone()}
                {oninput}
            />
            <VerificationWidget
                config={props.config.clone()}
                {on_token}
                widget_ref={(*widget_ref).clone()}
            />
            { notice_view }
            <button
                type="submit"
                class={cn!(SUBMIT, ("opacity-50 cursor-not-allowed", content.trim().is_empty()))}
            >
                {"Send"}
            </button>
        </form>
    }
}
