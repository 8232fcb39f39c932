use leptos::prelude::*;

/// Button variant types
#[derive(Clone, Copy, PartialEq)]
pub enum ButtonVariant {
    /// Demo trigger
    Primary,
    /// Clearing a drop zone
    Danger,
    /// Target actions on dropped records
    Success,
}

/// Button size options
#[derive(Clone, Copy, PartialEq)]
pub enum ButtonSize {
    Small,
    Medium,
    Large,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn-primary",
            ButtonVariant::Danger => "btn-danger",
            ButtonVariant::Success => "btn-success",
        }
    }
}

impl ButtonSize {
    fn class(&self) -> &'static str {
        match self {
            ButtonSize::Small => "btn-sm",
            ButtonSize::Medium => "",
            ButtonSize::Large => "btn-lg",
        }
    }
}

fn button_classes(variant: ButtonVariant, size: ButtonSize, extra: &str) -> String {
    [
        "btn-base",
        variant.class(),
        size.class(),
        extra,
    ]
    .into_iter()
    .filter(|class| !class.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

#[component]
pub fn Button(
    #[prop(default = ButtonVariant::Primary)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Medium)] size: ButtonSize,
    on_click: Callback<()>,
    /// Optional title/tooltip
    #[prop(optional)]
    title: Option<String>,
    children: Children,
    /// Additional CSS classes
    #[prop(default = String::new())]
    class: String,
) -> impl IntoView {
    view! {
        <button
            class=button_classes(variant, size, &class)
            on:click=move |_| on_click.run(())
            title=title
        >
            {children()}
        </button>
    }
}
