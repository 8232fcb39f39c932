use crate::core::DragMode;
use crate::ui::session::use_workspace_context;
use leptos::prelude::*;

/// Floating label that follows the pointer during a fallback drag.
///
/// During a native drag the browser shows its own drag image instead.
#[component]
pub fn DragGhost() -> impl IntoView {
    let workspace = use_workspace_context().workspace;

    let ghost = Memo::new(move |_| {
        workspace.with(|ws| {
            let controller = ws.controller();
            controller
                .affordance()
                .filter(|affordance| {
                    affordance.visible && controller.mode() == Some(DragMode::Fallback)
                })
                .cloned()
        })
    });

    move || {
        ghost.get().map(|affordance| {
            view! {
                <div
                    class="drag-ghost"
                    style:background=affordance.color.as_str().to_string()
                    style:left=format!("{}px", affordance.position.x)
                    style:top=format!("{}px", affordance.position.y)
                >
                    {affordance.label}
                </div>
            }
        })
    }
}
