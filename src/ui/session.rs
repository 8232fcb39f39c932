//! Workspace shared with every component on the page

use leptos::prelude::*;

use crate::core::{AppConfig, Workspace};

#[derive(Clone, Copy)]
pub struct WorkspaceContext {
    pub workspace: RwSignal<Workspace>,
    /// Diagnostics already mirrored to the browser console
    reported: StoredValue<u64>,
}

impl WorkspaceContext {
    fn new(config: AppConfig) -> Self {
        Self {
            workspace: RwSignal::new(Workspace::sample(config)),
            reported: StoredValue::new(0),
        }
    }

    /// Mutate the workspace, then forward fresh diagnostics to the console.
    pub fn update<R>(&self, f: impl FnOnce(&mut Workspace) -> R) -> R {
        let result = {
            let mut workspace = self.workspace.write();
            f(&mut *workspace)
        };
        self.report();
        result
    }

    fn report(&self) {
        let seen = self.reported.get_value();
        let emitted = self.workspace.with_untracked(|workspace| {
            let diagnostics = workspace.diagnostics();
            for error in diagnostics.since(seen).filter(|error| !error.is_routine()) {
                leptos::logging::warn!("[erdrop] {}", error);
            }
            diagnostics.emitted()
        });
        self.reported.set_value(emitted);
    }
}

pub fn provide_workspace_context(config: AppConfig) -> WorkspaceContext {
    let ctx = WorkspaceContext::new(config);
    provide_context(ctx);
    ctx
}

pub fn use_workspace_context() -> WorkspaceContext {
    expect_context::<WorkspaceContext>()
}

/// Wall clock for interactions
#[cfg(feature = "hydrate")]
pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
