use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::model::QuestionBank;
use services::{AppServices, bundled_bank};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::QuizScreen;
use crate::views::quiz::QuizTestHandles;

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn QuizHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizScreen {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// Run `f` against the screen's guard inside the dom runtime.
    pub fn with_guard(&mut self, f: impl FnOnce(&mut quiz_core::EnvironmentGuard)) {
        let mut guard = self.handles.guard();
        self.dom.in_runtime(|| {
            f(&mut guard.write());
        });
        drive_dom(&mut self.dom);
    }

    pub fn dispatch(&mut self, intent: crate::vm::QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness() -> ViewHarness {
    setup_view_harness_with_storage(Storage::in_memory()).await
}

pub async fn setup_view_harness_with_storage(storage: Storage) -> ViewHarness {
    let mut harness = setup_view_harness_unloaded(storage);
    harness.drive_async().await;
    harness
}

/// Mounts the screen but leaves the snapshot load to the caller.
pub fn setup_view_harness_unloaded(storage: Storage) -> ViewHarness {
    let bank: QuestionBank = bundled_bank().expect("bundled bank");
    let services = AppServices::from_parts(Arc::new(bank), storage.snapshots());
    let handles = QuizTestHandles::default();

    let dom = VirtualDom::new_with_props(
        QuizHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { services }),
            handles: handles.clone(),
        },
    );

    let mut harness = ViewHarness {
        dom,
        storage,
        handles,
    };
    harness.rebuild();
    harness
}
