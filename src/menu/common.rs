use bevy::prelude::*;

pub(super) fn play_bg() -> Color {
    Color::srgb(0.08, 0.36, 0.14)
}
pub(super) fn play_border() -> Color {
    Color::srgb(0.18, 0.72, 0.28)
}
pub(super) fn play_text() -> Color {
    Color::srgb(0.75, 1.0, 0.80)
}
pub(super) fn quit_bg() -> Color {
    Color::srgb(0.28, 0.06, 0.06)
}
pub(super) fn quit_border() -> Color {
    Color::srgb(0.60, 0.12, 0.12)
}
pub(super) fn quit_text() -> Color {
    Color::srgb(1.0, 0.65, 0.65)
}
pub(super) fn title_color() -> Color {
    Color::srgb(0.92, 0.96, 0.55)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.60, 0.65)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.30, 0.32, 0.38)
}

pub(super) fn toggle_bg() -> Color {
    Color::srgb(0.06, 0.09, 0.18)
}
pub(super) fn toggle_border() -> Color {
    Color::srgb(0.22, 0.28, 0.42)
}
pub(super) fn toggle_active_bg() -> Color {
    Color::srgb(0.12, 0.26, 0.52)
}
pub(super) fn toggle_active_border() -> Color {
    Color::srgb(0.45, 0.70, 1.0)
}
pub(super) fn toggle_text() -> Color {
    Color::srgb(0.80, 0.90, 1.0)
}

pub(super) fn table_text() -> Color {
    Color::srgb(0.85, 0.85, 0.90)
}

pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Spawn a `size`-point text node.
pub(super) fn label(
    parent: &mut ChildSpawnerCommands<'_>,
    text: impl Into<String>,
    size: f32,
    color: Color,
) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    ));
}

/// Spawn a bordered 220×50 button carrying `marker`.
pub(super) fn button(
    parent: &mut ChildSpawnerCommands<'_>,
    text: &str,
    (bg, border, fg): (Color, Color, Color),
    marker: impl Bundle,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(bg),
            BorderColor::all(border),
            marker,
        ))
        .with_children(|btn| label(btn, text, 18.0, fg));
}

/// White text on hover, `idle` otherwise.
pub(super) fn tint_on_hover(
    interaction: &Interaction,
    children: &Children,
    idle: Color,
    texts: &mut Query<&mut TextColor>,
) {
    let color = match interaction {
        Interaction::Hovered | Interaction::Pressed => Color::WHITE,
        Interaction::None => idle,
    };
    for child in children.iter() {
        if let Ok(mut text) = texts.get_mut(child) {
            *text = TextColor(color);
        }
    }
}
