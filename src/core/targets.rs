//! Drop targets and the records they accumulate.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::core::diagnostics::Diagnostics;
use crate::core::diagram::Point;
#[cfg(test)]
use crate::core::diagram::Rect;
use crate::core::error::DropResult;
use crate::core::transfer::{TransferPayload, TransferSource, decode_transfer};

/// Tool area an entity can be dropped into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    CodeGenerator,
    Documentation,
    QueryBuilder,
}

impl TargetKind {
    /// Display order
    pub const ALL: [TargetKind; 3] = [
        TargetKind::CodeGenerator,
        TargetKind::Documentation,
        TargetKind::QueryBuilder,
    ];

    /// Identifier used in records and `data-drop-target` attributes
    pub fn id(&self) -> &'static str {
        match self {
            TargetKind::CodeGenerator => "codeGenerator",
            TargetKind::Documentation => "documentation",
            TargetKind::QueryBuilder => "queryBuilder",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            TargetKind::CodeGenerator => "Code Generator",
            TargetKind::Documentation => "Documentation",
            TargetKind::QueryBuilder => "Query Builder",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TargetKind::CodeGenerator => "Drop tables here to generate code",
            TargetKind::Documentation => "Drop tables here to generate docs",
            TargetKind::QueryBuilder => "Drop tables here to build queries",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TargetKind::CodeGenerator => "⚡",
            TargetKind::Documentation => "📚",
            TargetKind::QueryBuilder => "🔍",
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            TargetKind::CodeGenerator => "Generate Code",
            TargetKind::Documentation => "Create Documentation",
            TargetKind::QueryBuilder => "Build Query",
        }
    }
}

/// Payload accepted by a target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRecord {
    #[serde(flatten)]
    pub payload: TransferPayload,
    #[serde(rename = "dropZone")]
    pub target: TargetKind,
    pub received_at: DateTime<Utc>,
    /// Local wall-clock time, `HH:MM:SS`
    pub dropped_at: String,
}

impl DropRecord {
    pub fn new(payload: TransferPayload, target: TargetKind, now: DateTime<Utc>) -> Self {
        Self {
            payload,
            target,
            received_at: now,
            dropped_at: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
        }
    }

    pub fn fields_list(&self) -> String {
        self.payload.fields.join(", ")
    }

    /// Confirmation shown when the user triggers the target action.
    pub fn action_message(&self) -> String {
        format!(
            "{} for \"{}\" table!\n\nFields: {}\n\nThis would typically trigger the actual {} functionality.",
            self.target.action_label(),
            self.payload.name,
            self.fields_list(),
            self.target.id()
        )
    }
}

/// How a payload reaches a target
pub enum Delivery<'a> {
    /// Raw data still sitting in the native transfer channel
    Native(&'a dyn TransferSource),
    /// Payload handed over directly, already typed
    Local(TransferPayload),
}

impl Delivery<'_> {
    /// Validate at the boundary. Rejections are reported to `diagnostics`.
    pub fn into_payload(self, diagnostics: &mut Diagnostics) -> DropResult<TransferPayload> {
        match self {
            Delivery::Native(source) => decode_transfer(source).inspect_err(|e| {
                diagnostics.emit(e.clone());
            }),
            Delivery::Local(payload) => Ok(payload),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DropTarget {
    kind: TargetKind,
    records: Vec<DropRecord>,
    /// Pointer is over the target during an interaction
    hovered: bool,
    /// Client-space bounds for hosts without a DOM to hit-test
    #[cfg(test)]
    bounds: Option<Rect>,
}

impl DropTarget {
    pub fn new(kind: TargetKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            hovered: false,
            #[cfg(test)]
            bounds: None,
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn records(&self) -> &[DropRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    #[cfg(test)]
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    /// Validate and append.
    ///
    /// Rejections leave the list untouched and are reported to `diagnostics`.
    pub fn receive(
        &mut self,
        delivery: Delivery<'_>,
        now: DateTime<Utc>,
        diagnostics: &mut Diagnostics,
    ) -> DropResult<&DropRecord> {
        self.hovered = false;
        let payload = delivery.into_payload(diagnostics)?;
        Ok(self.accept(payload, now))
    }

    /// Append an already validated payload.
    pub fn accept(&mut self, payload: TransferPayload, now: DateTime<Utc>) -> &DropRecord {
        self.hovered = false;
        tracing::info!("{} accepted {}", self.kind.title(), payload.name);
        self.records.push(DropRecord::new(payload, self.kind, now));
        &self.records[self.records.len() - 1]
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Resolves a client-space point to the target under it
pub trait TargetLocator {
    fn target_at(&self, point: Point) -> Option<TargetKind>;
}

/// All drop targets, in display order
#[derive(Clone, Debug)]
pub struct DropTargets {
    targets: Vec<DropTarget>,
}

impl DropTargets {
    pub fn new() -> Self {
        Self {
            targets: TargetKind::ALL.into_iter().map(DropTarget::new).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropTarget> {
        self.targets.iter()
    }

    pub fn get(&self, kind: TargetKind) -> &DropTarget {
        // Every kind is created in `new`
        &self.targets[Self::index(kind)]
    }

    pub fn get_mut(&mut self, kind: TargetKind) -> &mut DropTarget {
        &mut self.targets[Self::index(kind)]
    }

    fn index(kind: TargetKind) -> usize {
        match kind {
            TargetKind::CodeGenerator => 0,
            TargetKind::Documentation => 1,
            TargetKind::QueryBuilder => 2,
        }
    }

    pub fn clear_hover(&mut self) {
        for target in &mut self.targets {
            target.set_hovered(false);
        }
    }

    pub fn total_records(&self) -> usize {
        self.targets.iter().map(DropTarget::len).sum()
    }
}

impl Default for DropTargets {
    fn default() -> Self {
        Self::new()
    }
}

/// Locator over measured bounds, standing in for the DOM in tests
#[cfg(test)]
impl TargetLocator for DropTargets {
    fn target_at(&self, point: Point) -> Option<TargetKind> {
        self.targets
            .iter()
            .find(|target| target.bounds.is_some_and(|bounds| bounds.contains(point)))
            .map(DropTarget::kind)
    }
}
