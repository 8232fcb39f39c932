use crate::core::render::render_diagram;
#[cfg(feature = "hydrate")]
use crate::core::render::DrawCommand;
use crate::core::{Point, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::ui::session::use_workspace_context;
use leptos::prelude::*;
use leptos::{html, web_sys};

/// ER diagram surface: paints entities and starts drags
#[component]
pub fn ErCanvas() -> impl IntoView {
    let ctx = use_workspace_context();
    let workspace = ctx.workspace;

    let canvas_ref = NodeRef::<html::Canvas>::new();

    // Позиция курсора для подсказки
    let pointer = RwSignal::new(Point::new(0.0, 0.0));

    let frame = Memo::new(move |_| {
        workspace.with(|ws| render_diagram(ws.diagram(), ws.controller().hovered()))
    });

    let hovered = Memo::new(move |_| {
        workspace.with(|ws| {
            ws.controller()
                .hovered()
                .and_then(|id| ws.diagram().entity(id))
                .map(|entity| (entity.name.clone(), entity.fields.len()))
        })
    });

    let gesture_open = Memo::new(move |_| workspace.with(|ws| !ws.controller().is_idle()));

    // Перерисовка канваса при изменении кадра
    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        let commands = frame.get();
        if let Some(canvas) = canvas_ref.get() {
            if let Some(context) = crate::ui::dom::canvas_context(&canvas) {
                paint(&context, &commands);
            }
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = frame;

    // Глобальные обработчики на время жеста (fallback drag)
    #[cfg(feature = "hydrate")]
    {
        use crate::ui::dom::{DomLocator, client_point};
        use crate::ui::session::now;
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        type GestureListeners = (
            Closure<dyn Fn(web_sys::MouseEvent)>,
            Closure<dyn Fn(web_sys::MouseEvent)>,
            Closure<dyn Fn(web_sys::Event)>,
        );

        // Храним closures в Rc<RefCell> для возможности их удаления
        let closures: Rc<RefCell<Option<GestureListeners>>> = Rc::new(RefCell::new(None));

        Effect::new(move || {
            let open = gesture_open.get();

            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(document) = window.document() else {
                return;
            };

            // Сначала очищаем старые обработчики
            if let Some((old_move, old_up, old_blur)) = closures.borrow_mut().take() {
                let _ = document.remove_event_listener_with_callback(
                    "mousemove",
                    old_move.as_ref().unchecked_ref(),
                );
                let _ = document.remove_event_listener_with_callback(
                    "mouseup",
                    old_up.as_ref().unchecked_ref(),
                );
                let _ = window
                    .remove_event_listener_with_callback("blur", old_blur.as_ref().unchecked_ref());
            }

            if !open {
                return;
            }

            let move_closure = Closure::new(move |ev: web_sys::MouseEvent| {
                let client = client_point(&ev);
                ctx.update(|ws| ws.pointer_move(client));
            });

            let up_closure = Closure::new(move |ev: web_sys::MouseEvent| {
                let client = client_point(&ev);
                if let Some(record) = ctx.update(|ws| ws.release(client, &DomLocator, now())) {
                    leptos::logging::log!(
                        "Dropped {} on {}",
                        record.payload.name,
                        record.target.title()
                    );
                }
            });

            // Окно потеряло фокус: mouseup может уже не прийти
            let blur_closure = Closure::new(move |_: web_sys::Event| {
                ctx.update(|ws| ws.abandon());
            });

            let _ = document
                .add_event_listener_with_callback("mousemove", move_closure.as_ref().unchecked_ref());
            let _ = document
                .add_event_listener_with_callback("mouseup", up_closure.as_ref().unchecked_ref());
            let _ = window
                .add_event_listener_with_callback("blur", blur_closure.as_ref().unchecked_ref());

            // Сохраняем closures для последующего удаления
            *closures.borrow_mut() = Some((move_closure, up_closure, blur_closure));
        });
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = gesture_open;

    let on_mouse_down = move |ev: web_sys::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            use crate::core::PointerSample;
            use crate::ui::dom::{client_point, local_point};
            use crate::ui::session::now;

            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let sample = PointerSample::new(local_point(&ev, &canvas), client_point(&ev));
            ctx.update(|ws| {
                let _ = ws.press(sample, now());
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let on_mouse_move = move |ev: web_sys::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            use crate::ui::dom::{client_point, local_point};

            pointer.set(client_point(&ev));
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let local = local_point(&ev, &canvas);
            let changed = workspace.with_untracked(|ws| {
                ws.diagram().entity_at(local).map(|entity| entity.id) != ws.controller().hovered()
            });
            if changed {
                ctx.update(|ws| ws.hover(local));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let on_mouse_leave = move |_: web_sys::MouseEvent| {
        if workspace.with_untracked(|ws| ws.controller().hovered().is_some()) {
            ctx.update(|ws| ws.leave_surface());
        }
    };

    // Нативный drag начинается с самого канваса. Промах по сущностям отменяет его,
    // а канал без данных оставляет жест fallback-пути с обычными событиями мыши
    let on_drag_start = move |ev: web_sys::DragEvent| {
        #[cfg(feature = "hydrate")]
        {
            use crate::core::DragMode;
            use crate::ui::dom::DomTransfer;

            let Some(mut transfer) = DomTransfer::from_event(&ev) else {
                ev.prevent_default();
                return;
            };
            match ctx.update(|ws| ws.native_drag_start(&mut transfer)) {
                Ok(DragMode::Native) => {}
                Ok(DragMode::Fallback) | Err(_) => ev.prevent_default(),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let on_drag_end = move |_: web_sys::DragEvent| {
        ctx.update(|ws| ws.native_drag_end());
    };

    view! {
        <div class="er-canvas">
            <canvas
                node_ref=canvas_ref
                width={SURFACE_WIDTH as u32}
                height={SURFACE_HEIGHT as u32}
                class="canvas"
                draggable="true"
                style:cursor=move || if hovered.get().is_some() { "grab" } else { "default" }
                on:mousedown=on_mouse_down
                on:mousemove=on_mouse_move
                on:mouseleave=on_mouse_leave
                on:dragstart=on_drag_start
                on:dragend=on_drag_end
            />

            {move || {
                hovered.get().map(|(name, field_count)| {
                    let Point { x, y } = pointer.get();
                    view! {
                        <div
                            class="entity-info"
                            style:left=format!("{}px", x + 10.0)
                            style:top=format!("{}px", y - 50.0)
                        >
                            <strong>{name}</strong>
                            <br/>
                            {format!("Fields: {}", field_count)}
                            <br/>
                            "Click and drag to external tools"
                        </div>
                    }
                })
            }}
        </div>
    }
}

#[cfg(feature = "hydrate")]
fn paint(context: &web_sys::CanvasRenderingContext2d, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Clear(rect) => {
                context.clear_rect(rect.x, rect.y, rect.width, rect.height);
            }
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => {
                context.set_stroke_style_str(color);
                context.set_line_width(*width);
                context.begin_path();
                context.move_to(from.x, from.y);
                context.line_to(to.x, to.y);
                context.stroke();
            }
            DrawCommand::FillRect {
                rect,
                color,
                shadow,
            } => {
                if *shadow {
                    context.set_shadow_color("rgba(0, 0, 0, 0.3)");
                    context.set_shadow_blur(10.0);
                    context.set_shadow_offset_x(3.0);
                    context.set_shadow_offset_y(3.0);
                }
                context.set_fill_style_str(color.as_str());
                context.fill_rect(rect.x, rect.y, rect.width, rect.height);

                context.set_shadow_color("transparent");
                context.set_shadow_blur(0.0);
                context.set_shadow_offset_x(0.0);
                context.set_shadow_offset_y(0.0);
            }
            DrawCommand::StrokeRect { rect, color, width } => {
                context.set_stroke_style_str(color);
                context.set_line_width(*width);
                context.stroke_rect(rect.x, rect.y, rect.width, rect.height);
            }
            DrawCommand::Text {
                text,
                at,
                font,
                align,
                color,
            } => {
                context.set_fill_style_str(color);
                context.set_font(font);
                context.set_text_align(align.as_str());
                let _ = context.fill_text(text, at.x, at.y);
            }
        }
    }
}
