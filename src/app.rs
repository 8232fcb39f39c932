use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};

use crate::core::{AppConfig, TargetKind};
use crate::ui::{DemoButton, DragGhost, DropZone, ErCanvas, provide_workspace_context};

/// Body attribute carrying the serialized [`AppConfig`] for hydration
pub const CONFIG_ATTR: &str = "data-erdrop-config";

pub fn shell(options: LeptosOptions) -> impl IntoView {
    let config = use_context::<AppConfig>().unwrap_or_default();
    let config_json = serde_json::to_string(&config).unwrap_or_default();

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body data-erdrop-config=config_json>
                <App/>
            </body>
        </html>
    }
}

/// Reads [`AppConfig`] from context; defaults apply when none is provided.
#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    provide_workspace_context(use_context::<AppConfig>().unwrap_or_default());

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/erdrop.css"/>

        <Title text="ER Diagram Drag & Drop"/>

        <div class="app">
            <div class="canvas-container">
                <h2>"Canvas-Based ER Diagram"</h2>
                <ErCanvas/>
                <DemoButton/>
                <div class="instructions">
                    <h3>"Instructions:"</h3>
                    <ul>
                        <li>"Click and drag any table from the ER diagram"</li>
                        <li>"Drop it into one of the zones on the right"</li>
                        <li>"The drag operation uses the HTML5 DataTransfer API"</li>
                        <li>"Without native drag support the drop is resolved on mouse release"</li>
                        <li>"Hover over tables to see entity information"</li>
                        <li><strong>"Or click the demo button above to see it in action!"</strong></li>
                    </ul>
                </div>
            </div>

            <div class="drop-zones">
                {TargetKind::ALL
                    .into_iter()
                    .map(|kind| view! { <DropZone kind=kind/> })
                    .collect_view()}
            </div>

            <DragGhost/>
        </div>
    }
}
