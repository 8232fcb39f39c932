//! Browser adapters for the core transfer and locator traits

use leptos::web_sys;
use wasm_bindgen::JsCast;

use crate::core::{
    DragImage, DropEffect, DropError, DropResult, Point, Rect, TargetKind, TargetLocator,
    TransferChannel, TransferSource,
};

/// Attribute carrying the target id on drop zone elements
pub const DROP_TARGET_ATTR: &str = "data-drop-target";

/// Custom drag images are detached after this delay
const DRAG_IMAGE_TTL_MS: u32 = 100;

/// `DataTransfer` of a native drag event
pub struct DomTransfer {
    inner: web_sys::DataTransfer,
}

impl DomTransfer {
    pub fn from_event(ev: &web_sys::DragEvent) -> Option<Self> {
        ev.data_transfer().map(|inner| Self { inner })
    }
}

impl TransferSource for DomTransfer {
    fn get_data(&self, format: &str) -> Option<String> {
        // Браузер отдаёт пустую строку для отсутствующего формата
        self.inner
            .get_data(format)
            .ok()
            .filter(|data| !data.is_empty())
    }
}

impl TransferChannel for DomTransfer {
    fn set_data(&mut self, format: &str, data: &str) -> DropResult<()> {
        self.inner
            .set_data(format, data)
            .map_err(|e| DropError::UnsupportedCapability(format!("setData({format}): {e:?}")))
    }

    fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.inner.set_effect_allowed(effect.as_str());
    }

    fn set_drag_image(&mut self, image: &DragImage) -> DropResult<()> {
        let unsupported = || DropError::UnsupportedCapability("setDragImage".to_string());

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(unsupported)?;
        let body = document.body().ok_or_else(unsupported)?;
        let element = document.create_element("div").map_err(|_| unsupported())?;

        element.set_text_content(Some(&image.label));
        element.set_class_name("drag-image");
        let _ = element.set_attribute(
            "style",
            &format!("background: {};", image.color.as_str()),
        );
        body.append_child(&element).map_err(|_| unsupported())?;

        self.inner
            .set_drag_image(&element, image.offset.x as i32, image.offset.y as i32);

        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(DRAG_IMAGE_TTL_MS).await;
            element.remove();
        });

        Ok(())
    }
}

/// Finds drop zones under a viewport point by walking up from the topmost
/// element.
pub struct DomLocator;

impl TargetLocator for DomLocator {
    fn target_at(&self, point: Point) -> Option<TargetKind> {
        let document = web_sys::window()?.document()?;
        let element = document.element_from_point(point.x as f32, point.y as f32)?;
        let zone = element
            .closest(&format!("[{}]", DROP_TARGET_ATTR))
            .ok()
            .flatten()?;
        TargetKind::from_id(&zone.get_attribute(DROP_TARGET_ATTR)?)
    }
}

/// Viewport rectangle of an element
pub fn client_rect(element: &web_sys::Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Pointer position in viewport space
pub fn client_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Pointer position relative to `element`
pub fn local_point(ev: &web_sys::MouseEvent, element: &web_sys::Element) -> Point {
    let bounds = client_rect(element);
    let client = client_point(ev);
    Point::new(client.x - bounds.x, client.y - bounds.y)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn canvas_context(
    canvas: &web_sys::HtmlCanvasElement,
) -> Option<web_sys::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .ok()
}
