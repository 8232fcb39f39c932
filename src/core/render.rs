//! Draw commands for the diagram surface.
//!
//! Rendering is split in two: this module decides what to draw, the
//! client replays the commands on a 2D canvas context.

use crate::core::diagram::{Color, Diagram, Entity, EntityId, Point, Rect, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Hovered entities are lightened by this percentage
pub const HOVER_LIGHTEN_PERCENT: f64 = 20.0;

const LINE_COLOR: &str = "#666";
const HOVER_BORDER_COLOR: &str = "#333";
const TEXT_COLOR: &str = "white";
const TITLE_FONT: &str = "bold 14px Arial";
const FIELD_FONT: &str = "11px Arial";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f64,
    },
    FillRect {
        rect: Rect,
        color: Color,
        shadow: bool,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f64,
    },
    Text {
        text: String,
        at: Point,
        font: &'static str,
        align: TextAlign,
        color: String,
    },
}

/// Full frame: relationships below, entities on top.
pub fn render_diagram(diagram: &Diagram, hovered: Option<EntityId>) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear(Rect::new(
        0.0,
        0.0,
        SURFACE_WIDTH,
        SURFACE_HEIGHT,
    ))];

    for (from, to) in diagram.relationships() {
        commands.push(DrawCommand::Line {
            from: from.bounds.right_middle(),
            to: to.bounds.left_middle(),
            color: LINE_COLOR.to_string(),
            width: 2.0,
        });
    }

    for entity in diagram.entities() {
        render_entity(&mut commands, entity, hovered == Some(entity.id));
    }

    commands
}

fn render_entity(commands: &mut Vec<DrawCommand>, entity: &Entity, is_hovered: bool) {
    let Rect { x, y, width, .. } = entity.bounds;

    commands.push(DrawCommand::FillRect {
        rect: entity.bounds,
        color: if is_hovered {
            entity.color.lighten(HOVER_LIGHTEN_PERCENT)
        } else {
            entity.color.clone()
        },
        shadow: is_hovered,
    });

    commands.push(DrawCommand::StrokeRect {
        rect: entity.bounds,
        color: if is_hovered { HOVER_BORDER_COLOR } else { LINE_COLOR }.to_string(),
        width: if is_hovered { 2.0 } else { 1.0 },
    });

    commands.push(DrawCommand::Text {
        text: entity.name.clone(),
        at: Point::new(entity.bounds.center_x(), y + 20.0),
        font: TITLE_FONT,
        align: TextAlign::Center,
        color: TEXT_COLOR.to_string(),
    });

    // Разделитель под заголовком
    commands.push(DrawCommand::Line {
        from: Point::new(x + 5.0, y + 25.0),
        to: Point::new(x + width - 5.0, y + 25.0),
        color: TEXT_COLOR.to_string(),
        width: 1.0,
    });

    for (index, field) in entity.fields.iter().enumerate() {
        commands.push(DrawCommand::Text {
            text: field.clone(),
            at: Point::new(x + 8.0, y + 40.0 + index as f64 * 15.0),
            font: FIELD_FONT,
            align: TextAlign::Left,
            color: TEXT_COLOR.to_string(),
        });
    }
}
