use gloo::timers::callback::Timeout;
use web_sys::{DragEvent, File, HtmlInputElement};
use yew::prelude::*;

use crate::upload::{
    accept_attribute, format_size, ReportFile, UploadModel, UploadState, ANALYSIS_DELAY_MS,
    MAX_REPORT_BYTES,
};

fn report_file(file: &File) -> ReportFile {
    ReportFile::new(file.name(), file.size() as u64, file.type_())
}

/// Pick or drop a health report and run the stand-in analysis on it
#[function_component(UploadPanel)]
pub fn upload_panel() -> Html {
    let model = use_state(UploadModel::default);
    let dragging = use_state(|| false);
    let analysis = use_mut_ref(|| None::<Timeout>);

    // Leaving the panel abandons a running analysis
    {
        let analysis = analysis.clone();
        use_effect_with((), move |_| {
            move || {
                analysis.borrow_mut().take();
            }
        });
    }

    let offer = {
        let model = model.clone();
        Callback::from(move |file: File| {
            let mut next = (*model).clone();
            if let Err(e) = next.select(report_file(&file)) {
                log::info!("report rejected: {e}");
            }
            model.set(next);
        })
    };

    let on_change = {
        let offer = offer.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Some(file) = input.files().and_then(|files| files.get(0)) {
                    offer.emit(file);
                }
                // Allow picking the same file again
                input.set_value("");
            }
        })
    };

    let on_drag_over = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(true);
        })
    };

    let on_drag_leave = {
        let dragging = dragging.clone();
        Callback::from(move |_: DragEvent| dragging.set(false))
    };

    let on_drop = {
        let dragging = dragging.clone();
        let offer = offer.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            dragging.set(false);
            let file = e
                .data_transfer()
                .and_then(|transfer| transfer.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                offer.emit(file);
            }
        })
    };

    let on_analyze = {
        let model = model.clone();
        let analysis = analysis.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*model).clone();
            if !next.begin_analysis() {
                return;
            }
            let finished = next.clone();
            model.set(next);

            let model = model.clone();
            let timeout = Timeout::new(ANALYSIS_DELAY_MS, move || {
                let mut done = finished;
                done.finish_analysis();
                model.set(done);
            });
            *analysis.borrow_mut() = Some(timeout);
        })
    };

    let on_clear = {
        let model = model.clone();
        let analysis = analysis.clone();
        Callback::from(move |_: MouseEvent| {
            analysis.borrow_mut().take();
            model.set(UploadModel::default());
        })
    };

    let body = match &model.state {
        UploadState::Empty => html! {
            <p class="text-sm text-gray-500 dark:text-gray-400">
                {"PDF, PNG, JPEG, CSV or JSON, up to "}{format_size(MAX_REPORT_BYTES)}
            </p>
        },
        UploadState::Selected(file) => html! {
            <div class="flex items-center justify-between w-full">
                <FileSummary file={file.clone()} />
                <div class="flex space-x-2">
                    <button
                        onclick={on_analyze}
                        class="px-4 py-2 rounded-lg bg-indigo-600 text-white text-sm font-medium hover:bg-indigo-700 transition-colors"
                    >
                        {"Analyze Report"}
                    </button>
                    <button
                        onclick={on_clear.clone()}
                        class="px-4 py-2 rounded-lg bg-gray-100 dark:bg-gray-700 text-sm text-gray-700 dark:text-gray-200 hover:bg-gray-200 transition-colors"
                    >
                        {"Clear"}
                    </button>
                </div>
            </div>
        },
        UploadState::Analyzing(file) => html! {
            <div class="flex items-center justify-between w-full">
                <FileSummary file={file.clone()} />
                <span class="text-sm text-indigo-600 dark:text-indigo-300 animate-pulse">{"Analyzing..."}</span>
            </div>
        },
        UploadState::Complete { file, summary } => html! {
            <div class="w-full space-y-3">
                <FileSummary file={file.clone()} />
                <div class="p-3 rounded-lg bg-green-50 dark:bg-green-900/30 text-sm text-green-800 dark:text-green-200">
                    {summary.clone()}
                </div>
                <button
                    onclick={on_clear}
                    class="px-4 py-2 rounded-lg bg-gray-100 dark:bg-gray-700 text-sm text-gray-700 dark:text-gray-200 hover:bg-gray-200 transition-colors"
                >
                    {"Upload another"}
                </button>
            </div>
        },
    };

    let picking_disabled = matches!(model.state, UploadState::Analyzing(_));

    html! {
        <div class="w-full max-w-2xl mx-auto p-6 rounded-xl shadow-xl bg-white/90 dark:bg-gray-800/90 backdrop-blur-sm space-y-4">
            <h2 class="text-lg font-semibold text-gray-900 dark:text-white">{"Upload Health Report"}</h2>
            <label
                ondragover={on_drag_over}
                ondragleave={on_drag_leave}
                ondrop={on_drop}
                class={classes!(
                    "flex", "flex-col", "items-center", "justify-center", "p-8",
                    "border-2", "border-dashed", "rounded-lg", "cursor-pointer", "transition-colors",
                    if *dragging {
                        "border-indigo-500 bg-indigo-50 dark:bg-indigo-900/30"
                    } else {
                        "border-gray-300 dark:border-gray-600"
                    }
                )}
            >
                <span class="text-sm font-medium text-gray-700 dark:text-gray-200">
                    {"Drop a report here or click to browse"}
                </span>
                <input
                    type="file"
                    class="hidden"
                    accept={accept_attribute()}
                    disabled={picking_disabled}
                    onchange={on_change}
                />
            </label>
            if let Some(reason) = &model.rejection {
                <p class="text-sm text-red-600 dark:text-red-400">{reason.clone()}</p>
            }
            <div class="flex items-center">{body}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FileSummaryProps {
    file: ReportFile,
}

#[function_component(FileSummary)]
fn file_summary(props: &FileSummaryProps) -> Html {
    html! {
        <div>
            <p class="text-sm font-medium text-gray-900 dark:text-white">{&props.file.name}</p>
            <p class="text-xs text-gray-500 dark:text-gray-400">{format_size(props.file.size)}</p>
        </div>
    }
}
