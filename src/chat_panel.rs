use std::rc::Rc;

use chrono::Local;
use gloo::timers::callback::Timeout;
use web_sys::{
    HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions,
};
use yew::prelude::*;

use crate::chat::{ChatAction, ChatSession, ReplyTimers, VoiceRecorder, VoiceState};
use crate::config::ChatConfig;
use crate::storage::SharedStore;
use crate::types::ChatMessage;

#[derive(Properties, PartialEq)]
pub struct ChatPanelProps {
    pub store: SharedStore,
    pub config: Rc<ChatConfig>,
}

#[function_component(ChatPanel)]
pub fn chat_panel(props: &ChatPanelProps) -> Html {
    let session = {
        let store = props.store.clone();
        let config = props.config.clone();
        use_reducer(move || ChatSession::new(store, config))
    };
    let timers = {
        let delay_ms = props.config.reply_delay_ms;
        use_mut_ref(move || ReplyTimers::<Timeout>::new(delay_ms))
    };
    let recorder = use_mut_ref(|| None::<VoiceRecorder>);
    let end_ref = use_node_ref();

    // One timer per outstanding reply
    {
        let timers = timers.clone();
        let dispatcher = session.dispatcher();
        use_effect_with(session.pending_replies().to_vec(), move |pending| {
            timers.borrow_mut().sync(pending, |ticket, delay_ms| {
                let dispatcher = dispatcher.clone();
                Timeout::new(delay_ms, move || {
                    dispatcher.dispatch(ChatAction::DeliverReply(ticket));
                })
            });
            || ()
        });
    }

    // Teardown: cancel replies and release the microphone
    {
        let timers = timers.clone();
        let recorder = recorder.clone();
        let dispatcher = session.dispatcher();
        use_effect_with((), move |_| {
            move || {
                let cancelled = timers.borrow_mut().cancel_all();
                if cancelled > 0 {
                    log::debug!("cancelled {cancelled} reply timer(s)");
                }
                dispatcher.dispatch(ChatAction::CancelReplies);
                recorder.borrow_mut().take();
            }
        });
    }

    {
        let end_ref = end_ref.clone();
        use_effect_with(
            (session.messages().len(), session.awaiting_reply()),
            move |_| {
                if let Some(end) = end_ref.cast::<web_sys::Element>() {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    end.scroll_into_view_with_scroll_into_view_options(&options);
                }
                || ()
            },
        );
    }

    match session.user_id() {
        None => html! {
            <LoginCard on_begin={
                let session = session.clone();
                Callback::from(move |user_id: String| session.dispatch(ChatAction::Begin(user_id)))
            } />
        },
        Some(user_id) => {
            let on_mic = {
                let session = session.clone();
                let recorder = recorder.clone();
                Callback::from(move |_: MouseEvent| {
                    if session.voice() == VoiceState::Recording {
                        // Kept until the next start so the final flush is delivered
                        if let Some(active) = recorder.borrow_mut().as_mut() {
                            active.stop();
                        }
                        session.dispatch(ChatAction::RecordingStopped);
                        return;
                    }
                    if recorder.borrow().as_ref().is_some_and(|active| !active.is_stopped()) {
                        return;
                    }
                    recorder.borrow_mut().take();

                    let dispatcher = session.dispatcher();
                    let recorder = recorder.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        let on_data = {
                            let dispatcher = dispatcher.clone();
                            move || dispatcher.dispatch(ChatAction::VoiceCaptured)
                        };
                        let on_stop = {
                            let dispatcher = dispatcher.clone();
                            move || dispatcher.dispatch(ChatAction::CaptureFinished)
                        };
                        match VoiceRecorder::start(on_data, on_stop).await {
                            Ok(active) => {
                                *recorder.borrow_mut() = Some(active);
                                dispatcher.dispatch(ChatAction::RecordingStarted);
                            }
                            Err(e) => {
                                log::error!("voice capture unavailable: {e}");
                                dispatcher.dispatch(ChatAction::RecordingFailed);
                            }
                        }
                    });
                })
            };

            html! {
                <div class="w-full max-w-2xl mx-auto h-[600px] flex flex-col rounded-xl shadow-xl bg-white/90 dark:bg-gray-800/90 backdrop-blur-sm">
                    <div class="p-4 border-b border-gray-200 dark:border-gray-700">
                        <h2 class="text-lg font-semibold text-gray-900 dark:text-white">
                            {format!("User ID: {user_id}")}
                        </h2>
                        <p class="text-sm text-gray-500 dark:text-gray-400">{"Connected to Health Assistant"}</p>
                    </div>

                    <div class="flex-1 overflow-y-auto p-4 space-y-4">
                        { for session.messages().iter().map(message_bubble) }
                        if session.awaiting_reply() {
                            <TypingIndicator />
                        }
                        <div ref={end_ref}></div>
                    </div>

                    <Composer
                        input={session.input().to_string()}
                        recording={session.voice() == VoiceState::Recording}
                        listening={session.is_listening()}
                        on_input={
                            let session = session.clone();
                            Callback::from(move |text: String| session.dispatch(ChatAction::EditInput(text)))
                        }
                        on_send={
                            let session = session.clone();
                            Callback::from(move |text: String| session.dispatch(ChatAction::Send(text)))
                        }
                        {on_mic}
                    />
                </div>
            }
        }
    }
}

fn message_bubble(message: &ChatMessage) -> Html {
    let is_user = message.is_user();
    let time = message
        .timestamp
        .with_timezone(&Local)
        .format("%-I:%M:%S %p")
        .to_string();

    html! {
        <div key={message.id.clone()} class={classes!("flex", if is_user { "justify-end" } else { "justify-start" })}>
            <div
                class={classes!(
                    "max-w-[80%]",
                    "rounded-lg",
                    "p-3",
                    if is_user {
                        "bg-indigo-600 text-white"
                    } else {
                        "bg-gray-100 dark:bg-gray-700 text-gray-900 dark:text-gray-100"
                    }
                )}
            >
                <p class="text-sm whitespace-pre-wrap">{&message.text}</p>
                <span class="block mt-1 text-xs opacity-70">{time}</span>
            </div>
        </div>
    }
}

#[function_component(TypingIndicator)]
fn typing_indicator() -> Html {
    html! {
        <div class="flex justify-start">
            <div class="flex space-x-1 rounded-lg p-3 bg-gray-100 dark:bg-gray-700">
                <span class="w-2 h-2 rounded-full bg-gray-400 animate-bounce"></span>
                <span class="w-2 h-2 rounded-full bg-gray-400 animate-bounce [animation-delay:0.15s]"></span>
                <span class="w-2 h-2 rounded-full bg-gray-400 animate-bounce [animation-delay:0.3s]"></span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct LoginCardProps {
    on_begin: Callback<String>,
}

#[function_component(LoginCard)]
fn login_card(props: &LoginCardProps) -> Html {
    let draft = use_state(String::new);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                draft.set(input.value());
            }
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let on_begin = props.on_begin.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !draft.trim().is_empty() {
                on_begin.emit((*draft).clone());
            }
        })
    };

    html! {
        <div class="w-full max-w-md mx-auto p-6 rounded-xl shadow-xl bg-white/90 dark:bg-gray-800/90 backdrop-blur-sm">
            <h2 class="text-xl font-semibold text-center mb-4 text-gray-900 dark:text-white">
                {"Welcome to Health Chat"}
            </h2>
            <form onsubmit={on_submit} class="space-y-4">
                <input
                    type="text"
                    value={(*draft).clone()}
                    oninput={on_input}
                    placeholder="Enter your user ID"
                    class="w-full px-3 py-2 rounded-lg border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-gray-900 dark:text-white focus:outline-none focus:ring-2 focus:ring-indigo-500"
                />
                <button
                    type="submit"
                    disabled={draft.trim().is_empty()}
                    class="w-full px-4 py-2 rounded-lg bg-indigo-600 text-white font-medium hover:bg-indigo-700 disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                >
                    {"Start Chatting"}
                </button>
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ComposerProps {
    input: String,
    recording: bool,
    listening: bool,
    on_input: Callback<String>,
    on_send: Callback<String>,
    on_mic: Callback<MouseEvent>,
}

#[function_component(Composer)]
fn composer(props: &ComposerProps) -> Html {
    let on_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                on_input.emit(textarea.value());
            }
        })
    };

    let on_keydown = {
        let input = props.input.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                if !input.trim().is_empty() {
                    on_send.emit(input.clone());
                }
            }
        })
    };

    let on_send_click = {
        let input = props.input.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |_: MouseEvent| {
            if !input.trim().is_empty() {
                on_send.emit(input.clone());
            }
        })
    };

    let mic_label = if props.recording { "Stop voice input" } else { "Start voice input" };

    html! {
        <div class="relative p-4 border-t border-gray-200 dark:border-gray-700">
            if props.listening {
                <div class="absolute inset-0 flex items-center justify-center rounded-b-xl bg-indigo-600/10 backdrop-blur-sm z-10 pointer-events-none">
                    <span class="text-indigo-600 dark:text-indigo-300 font-medium animate-pulse">{"Listening..."}</span>
                </div>
            }
            <div class="flex items-end space-x-2">
                <textarea
                    value={props.input.clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    placeholder="Type your message or use voice input..."
                    class="flex-1 px-3 py-2 rounded-lg border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-sm text-gray-900 dark:text-white resize-none focus:outline-none focus:ring-2 focus:ring-indigo-500"
                    rows="2"
                />
                <button
                    type="button"
                    onclick={props.on_mic.clone()}
                    aria-label={mic_label}
                    title={mic_label}
                    class={classes!(
                        "p-2", "rounded-lg", "transition-colors",
                        if props.recording {
                            "bg-red-500 text-white hover:bg-red-600"
                        } else {
                            "bg-gray-100 dark:bg-gray-700 text-gray-700 dark:text-gray-200 hover:bg-gray-200"
                        }
                    )}
                >
                    { mic_icon(props.recording) }
                </button>
                <button
                    type="button"
                    onclick={on_send_click}
                    disabled={props.input.trim().is_empty()}
                    aria-label="Send message"
                    class="p-2 rounded-lg bg-indigo-600 text-white hover:bg-indigo-700 disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                >
                    <svg class="w-5 h-5" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                        <path d="m22 2-7 20-4-9-9-4Z" />
                        <path d="M22 2 11 13" />
                    </svg>
                </button>
            </div>
        </div>
    }
}

fn mic_icon(recording: bool) -> Html {
    html! {
        <svg class="w-5 h-5" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d="M12 2a3 3 0 0 0-3 3v7a3 3 0 0 0 6 0V5a3 3 0 0 0-3-3Z" />
            <path d="M19 10v2a7 7 0 0 1-14 0v-2" />
            <line x1="12" x2="12" y1="19" y2="22" />
            if recording {
                <line x1="2" x2="22" y1="2" y2="22" />
            }
        </svg>
    }
}
