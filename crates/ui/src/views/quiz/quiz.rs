use dioxus::document::eval;
use dioxus::prelude::*;

use quiz_core::EnvironmentGuard;
use services::{CompletionView, QuestionView, QuizView};

use crate::context::AppContext;
use crate::platform::{
    DomFullscreen, DomMessage, environment_subscribe_script, environment_unsubscribe_script,
};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizOutcome, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizScreen() -> Element {
    let ctx = use_context::<AppContext>();
    let services = ctx.services();

    // Closed until the document reports otherwise.
    let guard = use_signal(EnvironmentGuard::default);
    let vm = use_signal(|| None::<QuizVm>);
    let busy = use_signal(|| false);

    let resource = use_resource(move || {
        let services = services.clone();
        let mut guard = guard;
        let mut vm = vm;

        async move {
            let mut loaded_guard = guard.peek().clone();
            let before = loaded_guard.violation_count();
            let started = start_quiz(&services, &mut loaded_guard).await;
            guard.with_mut(|current| {
                // Keep hidden edges that arrived while the snapshot was loading.
                let during_load = current.violation_count().saturating_sub(before);
                current.restore_violations(
                    loaded_guard.violation_count().saturating_add(during_load),
                );
            });
            vm.set(Some(started));
            Ok::<_, ViewError>(())
        }
    });

    use_future(move || {
        let mut guard = guard;
        async move {
            let mut bridge = eval(environment_subscribe_script());
            loop {
                let message = match bridge.recv::<DomMessage>().await {
                    Ok(message) => message,
                    Err(err) => {
                        tracing::warn!(error = ?err, "environment bridge closed");
                        break;
                    }
                };

                if let Some(support) = message.support() {
                    if !support.is_complete() {
                        tracing::warn!(?support, "environment lacks integrity signals");
                    }
                    guard.with_mut(|current| {
                        let violations = current.violation_count();
                        *current = EnvironmentGuard::new(support);
                        current.restore_violations(violations);
                    });
                } else if let Some((fullscreen, visibility)) = message.initial() {
                    guard.write().sample(fullscreen, visibility);
                } else if let Some(signal) = message.signal() {
                    let before = guard.peek().violation_count();
                    guard.write().apply(signal);
                    let after = guard.peek().violation_count();
                    if after > before {
                        tracing::info!(violations = after, "tab left during quiz");
                    }
                }
            }
        }
    });

    use_drop(|| {
        let _ = eval(environment_unsubscribe_script());
    });

    let dispatch_intent = use_callback(move |intent: QuizIntent| {
        let mut vm = vm;
        let mut guard = guard;
        let mut busy = busy;

        match intent {
            QuizIntent::EnterFullscreen => {
                if let Err(err) = guard.peek().request_enter(&DomFullscreen) {
                    tracing::warn!(error = %err, "full-screen request failed");
                }
            }
            QuizIntent::ExitFullscreen => {
                if let Err(err) = guard.peek().request_exit(&DomFullscreen) {
                    tracing::warn!(error = %err, "full-screen exit failed");
                }
            }
            QuizIntent::Select(option) => {
                let current_guard = guard.peek().clone();
                if let Some(vm) = vm.write().as_mut() {
                    let _ = vm.select(&current_guard, &option);
                }
            }
            QuizIntent::Advance => {
                if *busy.peek() {
                    return;
                }
                busy.set(true);
                spawn(async move {
                    let local_vm = {
                        let mut slot = vm.write();
                        slot.take()
                    };
                    let Some(mut vm_value) = local_vm else {
                        busy.set(false);
                        return;
                    };

                    let current_guard = guard.peek().clone();
                    let result = vm_value.advance(&current_guard).await;

                    // Always put the quiz back so the screen stays usable.
                    vm.set(Some(vm_value));
                    busy.set(false);

                    if let Ok(QuizOutcome::Completed) = result {
                        tracing::debug!("quiz screen reached completion");
                    }
                });
            }
            QuizIntent::Restart => {
                if *busy.peek() {
                    return;
                }
                busy.set(true);
                spawn(async move {
                    let local_vm = {
                        let mut slot = vm.write();
                        slot.take()
                    };
                    let Some(mut vm_value) = local_vm else {
                        busy.set(false);
                        return;
                    };

                    let mut restart_guard = guard.peek().clone();
                    vm_value.restart(&mut restart_guard).await;
                    guard.write().reset();

                    vm.set(Some(vm_value));
                    busy.set(false);
                });
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, guard);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let screen = {
        let guard_read = guard.read();
        vm.read().as_ref().map(|vm| vm.view(&guard_read))
    };

    rsx! {
        div { class: "page quiz-page", id: "quiz-root",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(()) => match screen {
                    None => rsx! {
                        p { class: "quiz-saving", "Saving..." }
                    },
                    Some(QuizView::Blocked { unsupported }) => rsx! {
                        BlockedPanel { unsupported, on_intent: dispatch_intent }
                    },
                    Some(QuizView::Violated { violations }) => rsx! {
                        ViolationPanel { violations }
                    },
                    Some(QuizView::Question(question)) => rsx! {
                        QuestionCard { question, on_intent: dispatch_intent }
                    },
                    Some(QuizView::Completed(result)) => rsx! {
                        CompletionCard { result, on_intent: dispatch_intent }
                    },
                },
            }
        }
    }
}

#[component]
fn BlockedPanel(unsupported: bool, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "fullscreen-blocker",
            div { role: "alert", class: "alert alert-warning",
                h3 { class: "alert__title", "Please take the test in full view mode." }
                if unsupported {
                    p { class: "alert__detail",
                        "This window cannot enter full view mode, so the test cannot start."
                    }
                } else {
                    button {
                        class: "btn btn-sm",
                        id: "quiz-enter-fullscreen",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::EnterFullscreen),
                        "Enter Full Screen"
                    }
                }
            }
        }
    }
}

#[component]
fn ViolationPanel(violations: u32) -> Element {
    rsx! {
        div { role: "alert", class: "alert alert-error",
            span {
                "You have {violations} violation(s) for moving from the screen. Try reloading or Esc"
            }
        }
    }
}

#[component]
fn QuestionCard(question: QuestionView, on_intent: EventHandler<QuizIntent>) -> Element {
    let locked = question.selected.is_some();
    let progress_label = format!("Question {} / {}", question.number, question.total);

    rsx! {
        div { class: "card quiz-card",
            div { class: "card-body",
                p { class: "quiz-progress", "{progress_label}" }
                h2 { class: "card-title", "{question.prompt}" }
                div { class: "quiz-options",
                    for option in question.options.iter() {
                        OptionButton {
                            key: "{option}",
                            selected: question.selected.as_ref() == Some(option),
                            locked,
                            label: option.clone(),
                            on_intent,
                        }
                    }
                }
                div { class: "card-actions",
                    button {
                        class: "btn btn-primary",
                        id: "quiz-next",
                        r#type: "button",
                        disabled: !question.can_advance,
                        onclick: move |_| on_intent.call(QuizIntent::Advance),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(
    label: String,
    selected: bool,
    locked: bool,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let class = if selected {
        "btn quiz-option quiz-option--selected"
    } else {
        "btn quiz-option"
    };
    let option = label.clone();

    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: locked && !selected,
            aria_pressed: "{selected}",
            onclick: move |_| on_intent.call(QuizIntent::Select(option.clone())),
            "{label}"
        }
    }
}

#[component]
fn CompletionCard(result: CompletionView, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        div { class: "card quiz-card",
            div { class: "card-body",
                h2 { class: "card-title", "Quiz Completed!" }
                p { "Your marks: {result.score} / {result.total}" }
                p { "Violations: {result.violations}" }
                div { class: "card-actions",
                    button {
                        class: "btn btn-secondary",
                        id: "quiz-exit-fullscreen",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::ExitFullscreen),
                        "Exit Full Screen"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "quiz-restart",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Restart),
                        "Restart Quiz"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    guard: Rc<RefCell<Option<Signal<EnvironmentGuard>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        guard: Signal<EnvironmentGuard>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.guard.borrow_mut() = Some(guard);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn guard(&self) -> Signal<EnvironmentGuard> {
        (*self.guard.borrow()).expect("quiz guard registered")
    }
}
