//! Drop zone component
//!
//! Accepts entities through the native drag protocol and, for the pointer
//! fallback, exposes its id through `data-drop-target` so the release can
//! find it.

use crate::core::{DropRecord, TargetKind};
use crate::ui::common::{Button, ButtonSize, ButtonVariant};
use crate::ui::session::use_workspace_context;
use leptos::prelude::*;
use leptos::web_sys;

fn items_label(count: usize) -> String {
    format!("{} item{} dropped", count, if count == 1 { "" } else { "s" })
}

#[component]
pub fn DropZone(kind: TargetKind) -> impl IntoView {
    let ctx = use_workspace_context();
    let workspace = ctx.workspace;

    let records = Memo::new(move |_| workspace.with(|ws| ws.records(kind).to_vec()));
    let is_drag_over = Memo::new(move |_| workspace.with(|ws| ws.targets().get(kind).is_hovered()));

    let set_hovered = move |hovered: bool| {
        let current = workspace.with_untracked(|ws| ws.targets().get(kind).is_hovered());
        if current != hovered {
            ctx.update(|ws| ws.set_target_hovered(kind, hovered));
        }
    };

    let on_mouse_enter = move |_: web_sys::MouseEvent| {
        // Подсветка только во время активного жеста
        if workspace.with_untracked(|ws| !ws.controller().is_idle()) {
            set_hovered(true);
        }
    };

    let on_mouse_leave = move |_: web_sys::MouseEvent| set_hovered(false);

    let on_drag_enter = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_hovered(true);
    };

    let on_drag_over = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        if let Some(transfer) = ev.data_transfer() {
            transfer.set_drop_effect(crate::core::DropEffect::Copy.as_str());
        }
    };

    let on_drag_leave = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            // Переход на дочерний элемент не считается уходом из зоны
            let zone = ev
                .current_target()
                .and_then(|target| target.dyn_into::<web_sys::Node>().ok());
            let entered = ev
                .related_target()
                .and_then(|target| target.dyn_into::<web_sys::Node>().ok());
            if let (Some(zone), Some(entered)) = (zone, entered) {
                if zone.contains(Some(&entered)) {
                    return;
                }
            }
        }
        set_hovered(false);
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        #[cfg(feature = "hydrate")]
        {
            use crate::ui::dom::DomTransfer;
            use crate::ui::session::now;

            match DomTransfer::from_event(&ev) {
                Some(transfer) => {
                    let _ = ctx.update(|ws| ws.native_drop(kind, &transfer, now()));
                }
                None => set_hovered(false),
            }
        }
    };

    let on_clear = Callback::new(move |_| ctx.update(|ws| ws.clear(kind)));

    view! {
        <div
            class="drop-zone"
            class=("drag-over", move || is_drag_over.get())
            data-drop-target=kind.id()
            on:mouseenter=on_mouse_enter
            on:mouseleave=on_mouse_leave
            on:dragenter=on_drag_enter
            on:dragover=on_drag_over
            on:dragleave=on_drag_leave
            on:drop=on_drop
        >
            <h3>{format!("{} {}", kind.icon(), kind.title())}</h3>
            <p>{kind.description()}</p>

            {move || {
                let items = records.get();
                if items.is_empty() {
                    view! { <div class="drop-zone-empty">"Drop ER entities here"</div> }.into_any()
                } else {
                    view! {
                        <div class="dropped-items">
                            <div class="dropped-items-header">
                                <small>{items_label(items.len())}</small>
                                <Button
                                    variant=ButtonVariant::Danger
                                    size=ButtonSize::Small
                                    on_click=on_clear
                                >
                                    "Clear"
                                </Button>
                            </div>
                            {items
                                .into_iter()
                                .map(|record| view! { <DroppedItem record=record/> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn DroppedItem(record: DropRecord) -> impl IntoView {
    let message = record.action_message();
    let on_action = Callback::new(move |_| {
        #[cfg(feature = "hydrate")]
        crate::ui::dom::alert(&message);
        #[cfg(not(feature = "hydrate"))]
        let _ = &message;
    });

    view! {
        <div class="dropped-item">
            <div class="dropped-item-body">
                <strong>{record.payload.name.clone()}</strong>
                <div class="dropped-item-fields">{format!("Fields: {}", record.fields_list())}</div>
                <div class="dropped-item-time">{format!("Dropped at: {}", record.dropped_at)}</div>
            </div>
            <Button variant=ButtonVariant::Success size=ButtonSize::Small on_click=on_action>
                {record.target.action_label()}
            </Button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_label_pluralizes() {
        assert_eq!(items_label(1), "1 item dropped");
        assert_eq!(items_label(0), "0 items dropped");
        assert_eq!(items_label(3), "3 items dropped");
    }
}
