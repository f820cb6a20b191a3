use super::*;

const INSTRUCTIONS: [&str; 4] = [
    "Hold the mouse button to drop a PAS, then draw a loop around some cargo.",
    "Let go inside the PAS circle to close the loop into an autophagosome.",
    "Grab the autophagosome and flick it out of the cell to score its cargo.",
    "Missed loops cost points. Timed-out loops drop a pill. Q gives up.",
];

fn toggle_colors(selected: bool) -> (Color, Color) {
    if selected {
        (toggle_active_bg(), toggle_active_border())
    } else {
        (toggle_bg(), toggle_border())
    }
}

/// Spawn the full-screen intro.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │                GAMEOPHAGY                   │
/// │          An autophagy arcade game           │
/// │                                             │
/// │            (four lines of help)             │
/// │                                             │
/// │      [ EASY ]  [ MEDIUM ]  [ HARD ]         │
/// │                [ PLAY ]                     │
/// │                [ QUIT ]                     │
/// │                                             │
/// │      Enter to play  ·  Esc to quit          │
/// └─────────────────────────────────────────────┘
/// ```
pub(super) fn setup_intro(mut commands: Commands, flow: Res<MenuFlow>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgb(0.02, 0.04, 0.05)),
            IntroRoot,
        ))
        .with_children(|root| {
            label(root, "GAMEOPHAGY", 64.0, title_color());
            spacer(root, 8.0);
            label(root, "An autophagy arcade game", 18.0, subtitle_color());
            spacer(root, 36.0);

            for line in INSTRUCTIONS {
                label(root, line, 15.0, subtitle_color());
                spacer(root, 4.0);
            }

            spacer(root, 32.0);

            root.spawn(Node {
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(12.0),
                ..default()
            })
            .with_children(|row| {
                for difficulty in Difficulty::ALL {
                    let (bg, border) = toggle_colors(difficulty == flow.difficulty);
                    row.spawn((
                        Button,
                        Node {
                            width: Val::Px(140.0),
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BackgroundColor(bg),
                        BorderColor::all(border),
                        DifficultyButton(difficulty),
                    ))
                    .with_children(|btn| {
                        label(btn, difficulty.label().to_uppercase(), 16.0, toggle_text());
                    });
                }
            });

            spacer(root, 24.0);
            button(
                root,
                "PLAY",
                (play_bg(), play_border(), play_text()),
                PlayButton,
            );
            spacer(root, 14.0);
            button(
                root,
                "QUIT",
                (quit_bg(), quit_border(), quit_text()),
                QuitButton,
            );
            spacer(root, 40.0);
            label(root, "Enter to play  ·  Esc to quit", 12.0, hint_color());
        });
}

/// Handle difficulty toggles, Play (button or Enter) and Quit.
#[allow(clippy::type_complexity)]
pub(super) fn intro_button_system(
    difficulty_query: Query<(&Interaction, &DifficultyButton), Changed<Interaction>>,
    play_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<PlayButton>)>,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<QuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<MenuFlow>,
) {
    for (interaction, button) in difficulty_query.iter() {
        if *interaction == Interaction::Pressed {
            *flow = flow.advance(MenuEvent::SelectDifficulty(button.0));
        }
    }

    let wants_play = keys.just_pressed(KeyCode::Enter)
        || play_query
            .iter()
            .any(|(i, _)| *i == Interaction::Pressed);
    if wants_play {
        info!("Starting a {} session", flow.difficulty);
        *flow = flow.advance(MenuEvent::Play);
        return;
    }

    for (interaction, children) in play_query.iter() {
        tint_on_hover(interaction, children, play_text(), &mut btn_text);
    }

    for (interaction, children) in quit_query.iter() {
        if *interaction == Interaction::Pressed {
            *flow = flow.advance(MenuEvent::Quit);
        }
        tint_on_hover(interaction, children, quit_text(), &mut btn_text);
    }
}

/// Keep exactly one difficulty toggle lit.
pub(super) fn highlight_difficulty(
    flow: Res<MenuFlow>,
    mut query: Query<(&DifficultyButton, &mut BackgroundColor, &mut BorderColor)>,
) {
    for (button, mut bg, mut border) in query.iter_mut() {
        let (fill, edge) = toggle_colors(button.0 == flow.difficulty);
        *bg = BackgroundColor(fill);
        *border = BorderColor::all(edge);
    }
}
