//! Diagram model: entities placed on the drawing surface and the
//! relationships drawn between them.

use derive_more::{Display, From};
use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};

/// Ширина поверхности для рисования
pub const SURFACE_WIDTH: f64 = 600.0;
/// Высота поверхности для рисования
pub const SURFACE_HEIGHT: f64 = 350.0;

/// Identifier of a diagram entity
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

/// Точка в координатах канваса или окна
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn right_middle(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }

    pub fn left_middle(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Display color as `#rrggbb`
#[derive(Clone, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn rgb(&self) -> Option<(i32, i32, i32)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some((
            ((value >> 16) & 0xFF) as i32,
            ((value >> 8) & 0xFF) as i32,
            (value & 0xFF) as i32,
        ))
    }

    /// Lighten every channel by `percent` of the full range, clamping at white.
    ///
    /// Colors that are not valid `#rrggbb` come back unchanged.
    pub fn lighten(&self, percent: f64) -> Self {
        let Some((r, g, b)) = self.rgb() else {
            return self.clone();
        };
        let amount = (2.55 * percent).round() as i32;
        let channel = |c: i32| (c + amount).clamp(0, 255);
        Self(format!(
            "#{:02x}{:02x}{:02x}",
            channel(r),
            channel(g),
            channel(b)
        ))
    }
}

/// Таблица на диаграмме
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub bounds: Rect,
    pub fields: Vec<String>,
    pub color: Color,
}

impl Entity {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: EntityId(id),
            name: name.into(),
            bounds: Rect::default(),
            fields: Vec::new(),
            color: Color::new("#666666"),
        }
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounds = Rect::new(x, y, width, height);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Color::new(color);
        self
    }

    pub fn add_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }
}

/// Связь между таблицами (только для отрисовки)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
}

impl Relationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub type DiagramGraph = StableGraph<Entity, Relationship, Directed>;

/// Fixed set of entities shown on the drawing surface.
///
/// Entities are never added or removed after construction, so node index
/// order is insertion order and hit-testing is deterministic.
#[derive(Clone, Debug, Default)]
pub struct Diagram {
    graph: DiagramGraph,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) -> NodeIndex {
        self.graph.add_node(entity)
    }

    pub fn relate(&mut self, from: NodeIndex, to: NodeIndex, relationship: Relationship) {
        self.graph.add_edge(from, to, relationship);
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities().find(|entity| entity.id == id)
    }

    /// Pairs of (from, to) entities for every relationship edge.
    pub fn relationships(&self) -> impl Iterator<Item = (&Entity, &Entity)> {
        self.graph.edge_indices().filter_map(|edge| {
            let (from, to) = self.graph.edge_endpoints(edge)?;
            Some((&self.graph[from], &self.graph[to]))
        })
    }

    /// First entity, in diagram order, whose bounds contain `point`.
    pub fn entity_at(&self, point: Point) -> Option<&Entity> {
        self.entities().find(|entity| entity.bounds.contains(point))
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Демо-диаграмма интернет-магазина
pub fn create_sample_diagram() -> Diagram {
    let mut diagram = Diagram::new();

    let users = diagram.add_entity(
        Entity::new(1, "Users")
            .with_bounds(50.0, 50.0, 120.0, 100.0)
            .with_color("#4CAF50")
            .add_field("id (PK)")
            .add_field("username")
            .add_field("email")
            .add_field("created_at"),
    );

    let orders = diagram.add_entity(
        Entity::new(2, "Orders")
            .with_bounds(250.0, 50.0, 120.0, 100.0)
            .with_color("#2196F3")
            .add_field("id (PK)")
            .add_field("user_id (FK)")
            .add_field("total")
            .add_field("status"),
    );

    let products = diagram.add_entity(
        Entity::new(3, "Products")
            .with_bounds(450.0, 50.0, 120.0, 100.0)
            .with_color("#FF9800")
            .add_field("id (PK)")
            .add_field("name")
            .add_field("price")
            .add_field("category"),
    );

    let order_items = diagram.add_entity(
        Entity::new(4, "OrderItems")
            .with_bounds(150.0, 200.0, 120.0, 100.0)
            .with_color("#9C27B0")
            .add_field("id (PK)")
            .add_field("order_id (FK)")
            .add_field("product_id (FK)")
            .add_field("quantity"),
    );

    diagram.relate(users, orders, Relationship::new("user_orders"));
    diagram.relate(orders, order_items, Relationship::new("order_items"));
    diagram.relate(products, order_items, Relationship::new("product_items"));

    diagram
}
