use crate::ui::common::{Button, ButtonSize, ButtonVariant};
use crate::ui::session::use_workspace_context;
use leptos::prelude::*;

/// Runs the scripted demo: one drop into each target, spaced out in time
#[component]
pub fn DemoButton() -> impl IntoView {
    let ctx = use_workspace_context();

    let on_demo = Callback::new(move |_| {
        #[cfg(feature = "hydrate")]
        {
            use crate::ui::session::now;
            use gloo_timers::future::TimeoutFuture;
            use wasm_bindgen_futures::spawn_local;

            ctx.update(|ws| {
                ws.start_demo(now());
                ws.tick(now());
            });

            spawn_local(async move {
                while let Some(due) = ctx.workspace.with_untracked(|ws| ws.next_due_ms()) {
                    let wait = (due - now().timestamp_millis()).max(0) as u32;
                    TimeoutFuture::new(wait).await;
                    ctx.update(|ws| ws.tick(now()));
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ctx;
    });

    view! {
        <div class="demo-button">
            <Button variant=ButtonVariant::Primary size=ButtonSize::Large on_click=on_demo>
                "🎯 Demo Drag & Drop Functionality"
            </Button>
            <p>"Click to see automated drag and drop demonstration"</p>
        </div>
    }
}
