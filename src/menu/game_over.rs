use super::*;

/// Append the finished session to the score file and load the table shown on
/// the end screen.  Store errors are logged; the screen still appears.
pub(super) fn record_high_score(flow: Res<MenuFlow>, mut board: ResMut<HighScoreBoard>) {
    let Some(score) = flow.final_score else {
        return;
    };
    let entry = HighScore::today(score, flow.difficulty);
    match board.store.record(entry) {
        Ok(table) => {
            board.top = table.top(HIGH_SCORE_ROWS);
            info!(
                "Recorded score {} ({}) in {}",
                score,
                flow.difficulty,
                board.store.path().display()
            );
        }
        Err(err) => {
            error!("Could not record high score: {err}");
            board.top = board.store.top(HIGH_SCORE_ROWS).unwrap_or_default();
        }
    }
}

/// Spawn the end screen: final score, then the best ten on record.
pub(super) fn setup_game_over(
    mut commands: Commands,
    flow: Res<MenuFlow>,
    board: Res<HighScoreBoard>,
) {
    let final_score = flow.final_score.unwrap_or(0);
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.88)),
            ZIndex(300),
            GameOverRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(40.0)),
                        row_gap: Val::Px(10.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(520.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.03, 0.06, 0.05)),
                    BorderColor::all(Color::srgb(0.30, 0.55, 0.35)),
                ))
                .with_children(|card| {
                    label(
                        card,
                        format!("Final Score: {final_score}"),
                        42.0,
                        title_color(),
                    );
                    label(card, flow.difficulty.label(), 16.0, subtitle_color());
                    spacer(card, 12.0);

                    if board.top.is_empty() {
                        label(card, "No scores on record", 16.0, hint_color());
                    }
                    for (rank, entry) in board.top.iter().enumerate() {
                        score_row(card, rank + 1, entry);
                    }

                    spacer(card, 16.0);
                    button(
                        card,
                        "PLAY AGAIN",
                        (play_bg(), play_border(), play_text()),
                        PlayAgainButton,
                    );
                    button(
                        card,
                        "QUIT",
                        (quit_bg(), quit_border(), quit_text()),
                        QuitButton,
                    );
                    spacer(card, 4.0);
                    label(card, "Press Enter to play again", 12.0, hint_color());
                });
        });
}

fn score_row(parent: &mut ChildSpawnerCommands<'_>, rank: usize, entry: &HighScore) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            column_gap: Val::Px(24.0),
            ..default()
        })
        .with_children(|row| {
            for (text, width) in [
                (format!("{rank}."), 36.0),
                (entry.score.to_string(), 120.0),
                (entry.difficulty.label().to_string(), 100.0),
                (entry.date.clone(), 120.0),
            ] {
                row.spawn(Node {
                    width: Val::Px(width),
                    ..default()
                })
                .with_children(|cell| label(cell, text, 18.0, table_text()));
            }
        });
}

/// Handle Play again (button or Enter) and Quit on the end screen.
#[allow(clippy::type_complexity)]
pub(super) fn game_over_button_system(
    play_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<PlayAgainButton>)>,
    quit_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<QuitButton>)>,
    mut btn_text: Query<&mut TextColor>,
    keys: Res<ButtonInput<KeyCode>>,
    mut flow: ResMut<MenuFlow>,
) {
    let wants_play_again = keys.just_pressed(KeyCode::Enter)
        || play_query.iter().any(|(i, _)| *i == Interaction::Pressed);

    if wants_play_again {
        *flow = flow.advance(MenuEvent::PlayAgain);
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
