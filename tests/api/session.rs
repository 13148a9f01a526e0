use cluecrab::session::approver::ApproverSelection;
use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::test_app::TestApp;
use crate::helpers::test_player::TestPlayer;
use crate::helpers::test_session::{Clue, ReviewedClue, WsMessageIn, WsMessageOut};

#[tokio::test]
async fn create_session_works() {
    let app = TestApp::spawn_app().await;

    let id = app.create_session().await;

    assert_eq!(id.len(), 5);
    assert_eq!(app.get_canonical_session_id(&id).await, id);
}

#[tokio::test]
async fn session_id_is_resolved_ignoring_case() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_without_players()
        .await;
    session.id = "Party".to_string();
    session.add_player("a").await.unwrap();

    assert_eq!(session.app.get_canonical_session_id("PARTY").await, "Party");
    assert_eq!(session.app.get_canonical_session_id("other").await, "other");
}

#[tokio::test]
async fn players_joining_receive_the_roster() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_without_players()
        .await;

    let roster = session.add_player("a").await.unwrap();
    assert_eq!(roster.players.len(), 1);
    assert_eq!(roster.players[0].name, "a");
    assert!(roster.players[0].is_connected);

    let roster = session.add_player("b").await.unwrap();
    assert_eq!(roster.players.len(), 2);
    assert!(!roster.started);
}

#[tokio::test]
async fn leaving_the_lobby_removes_the_player() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_without_players()
        .await;
    session.add_player("a").await.unwrap();
    session.add_player("b").await.unwrap();

    let leaving = session.players.pop().unwrap();
    drop(leaving);

    match session.player("a").receive_until("roster").await {
        WsMessageOut::Roster { players, .. } => {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "a");
        }
        message => panic!("Unexpected message {message:?}"),
    }
}

#[tokio::test]
async fn round_cannot_start_with_a_single_player() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_without_players()
        .await;
    session.add_player("a").await.unwrap();

    session
        .player("a")
        .send_command(WsMessageIn::StartRound {
            guesser: "a".to_string(),
        })
        .await;

    assert_eq!(
        session.player("a").receive_message().await.unwrap(),
        WsMessageOut::Rejected {
            command: "startRound".to_string()
        }
    );
}

#[tokio::test]
async fn guesser_does_not_receive_the_secret_word() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;

    let messages = session
        .broadcast_command(
            "b",
            WsMessageIn::StartRound {
                guesser: "a".to_string(),
            },
            "roundStarted",
        )
        .await;

    let secret_words: Vec<Option<String>> = messages
        .into_iter()
        .map(|message| match message {
            WsMessageOut::RoundStarted {
                round, secret_word, ..
            } => {
                assert_eq!(round, 1);
                secret_word
            }
            message => panic!("Unexpected message {message:?}"),
        })
        .collect();
    assert_eq!(secret_words[0], None);
    assert!(secret_words[1].is_some());
    assert_eq!(secret_words[1], secret_words[2]);
}

#[tokio::test]
async fn cluers_only_see_their_own_clue() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;
    session.start_round("a").await;

    let messages = session
        .broadcast_command(
            "b",
            WsMessageIn::SubmitClue {
                clue: " trunk ".to_string(),
                round: None,
            },
            "cluesUpdated",
        )
        .await;

    let clues_seen_by = |index: usize| match &messages[index] {
        WsMessageOut::CluesUpdated { clues, .. } => clues.clone(),
        message => panic!("Unexpected message {message:?}"),
    };
    assert_eq!(
        clues_seen_by(1),
        vec![
            Clue {
                cluer: "b".to_string(),
                submitted: true,
                clue: Some("trunk".to_string()),
            },
            Clue {
                cluer: "c".to_string(),
                submitted: false,
                clue: None,
            },
        ]
    );
    assert_eq!(
        clues_seen_by(2)[0],
        Clue {
            cluer: "b".to_string(),
            submitted: true,
            clue: None,
        }
    );
}

#[tokio::test]
async fn complete_round_with_automatic_approval() {
    let mut session = TestApp::spawn_app_with_approver(ApproverSelection::Automatic)
        .await
        .create_session_with_players()
        .await;
    let secret_word = session.start_round("a").await;

    session
        .broadcast_command(
            "b",
            WsMessageIn::SubmitClue {
                clue: "trunk".to_string(),
                round: Some(1),
            },
            "cluesUpdated",
        )
        .await;
    let messages = session
        .broadcast_command(
            "c",
            WsMessageIn::SubmitClue {
                clue: "Big".to_string(),
                round: Some(1),
            },
            "guessingStarted",
        )
        .await;
    for message in messages {
        assert_eq!(
            message,
            WsMessageOut::GuessingStarted {
                round: 1,
                guesser: "a".to_string(),
                approved_clues: vec!["Big".to_string(), "trunk".to_string()],
            }
        );
    }

    let messages = session
        .broadcast_command(
            "a",
            WsMessageIn::SubmitGuess {
                guess: format!("  {}  ", secret_word.to_uppercase()),
                round: Some(1),
            },
            "guessResolved",
        )
        .await;
    for message in messages {
        match message {
            WsMessageOut::GuessResolved {
                correct,
                secret_word: revealed,
                ..
            } => {
                assert!(correct);
                assert_eq!(revealed, secret_word);
            }
            message => panic!("Unexpected message {message:?}"),
        }
    }

    // A resolved round can be followed by a new one
    session.start_round("b").await;
}

#[tokio::test]
async fn approver_reviews_duplicated_clues() {
    let mut session = TestApp::spawn_app_with_approver(ApproverSelection::Guesser)
        .await
        .create_session_with_players()
        .await;
    session.start_round("a").await;

    session
        .broadcast_command(
            "b",
            WsMessageIn::SubmitClue {
                clue: "cold".to_string(),
                round: None,
            },
            "cluesUpdated",
        )
        .await;
    let messages = session
        .broadcast_command(
            "c",
            WsMessageIn::SubmitClue {
                clue: "Cold".to_string(),
                round: None,
            },
            "revealClues",
        )
        .await;

    match &messages[0] {
        WsMessageOut::RevealClues {
            approver,
            clues,
            selection,
            ..
        } => {
            assert_eq!(approver.as_deref(), Some("a"));
            assert_eq!(clues.len(), 2);
            assert!(clues.iter().all(|clue| !clue.unique));
            assert_eq!(selection, &Some(vec![]));
        }
        message => panic!("Unexpected message {message:?}"),
    }
    match &messages[1] {
        WsMessageOut::RevealClues {
            clues, selection, ..
        } => {
            assert_eq!(
                clues,
                &vec![ReviewedClue {
                    author: "b".to_string(),
                    text: "cold".to_string(),
                    unique: false,
                }]
            );
            assert_eq!(selection, &None);
        }
        message => panic!("Unexpected message {message:?}"),
    }

    // Only the approver can approve
    session
        .player("b")
        .send_command(WsMessageIn::ApproveClues {
            clues: vec!["cold".to_string()],
            finalize: true,
            round: None,
        })
        .await;
    assert_eq!(
        session.player("b").receive_message().await.unwrap(),
        WsMessageOut::Rejected {
            command: "approveClues".to_string()
        }
    );

    let messages = session
        .broadcast_command(
            "a",
            WsMessageIn::ApproveClues {
                clues: vec![" COLD ".to_string()],
                finalize: true,
                round: None,
            },
            "guessingStarted",
        )
        .await;
    match &messages[2] {
        WsMessageOut::GuessingStarted { approved_clues, .. } => {
            assert_eq!(approved_clues, &vec!["cold".to_string()])
        }
        message => panic!("Unexpected message {message:?}"),
    }
}

#[tokio::test]
async fn commands_for_another_round_are_rejected() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;
    session.start_round("a").await;

    session
        .player("b")
        .send_command(WsMessageIn::SubmitClue {
            clue: "trunk".to_string(),
            round: Some(7),
        })
        .await;

    assert_eq!(
        session.player("b").receive_message().await.unwrap(),
        WsMessageOut::Rejected {
            command: "submitClue".to_string()
        }
    );
}

#[tokio::test]
async fn ending_a_round_returns_to_the_lobby() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;
    session.start_round("a").await;

    session
        .broadcast_command("c", WsMessageIn::EndRound, "roundEnded")
        .await;

    match session.player("a").receive_until("roster").await {
        WsMessageOut::Roster { started, .. } => assert!(!started),
        message => panic!("Unexpected message {message:?}"),
    }
}

#[tokio::test]
async fn new_players_cannot_join_a_started_session() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;
    session.start_round("a").await;

    let result = session.add_player("d").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn rename_is_broadcast_with_the_new_name() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_with_players()
        .await;

    let messages = session
        .broadcast_command(
            "b",
            WsMessageIn::Rename {
                name: "bea".to_string(),
            },
            "roster",
        )
        .await;

    match &messages[0] {
        WsMessageOut::Roster { players, .. } => {
            assert!(players.iter().any(|player| player.name == "bea"));
            assert!(!players.iter().any(|player| player.name == "b"));
        }
        message => panic!("Unexpected message {message:?}"),
    }
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let app = TestApp::spawn_app().await;
    let id = app.create_session().await;
    let (tx, rx) = app.open_session_websocket(&id, "a").await.unwrap().split();
    let mut player = TestPlayer {
        name: "a".to_string(),
        tx,
        rx,
    };
    let _ = player.receive_until("roster").await;

    player.send_message(Message::Text("ping".to_string())).await;

    assert_eq!(player.receive_text().await, "pong");
}

#[tokio::test]
async fn unknown_messages_are_reported_without_closing_the_websocket() {
    let mut session = TestApp::spawn_app()
        .await
        .create_session_without_players()
        .await;
    session.add_player("a").await.unwrap();

    session
        .player("a")
        .send_message(Message::Text(r#"{"kind":"startGame"}"#.to_string()))
        .await;
    match session.player("a").receive_message().await.unwrap() {
        WsMessageOut::Error { r#type, .. } => {
            assert_eq!(r#type, "UNPROCESSABLE_WEBSOCKET_MESSAGE")
        }
        message => panic!("Unexpected message {message:?}"),
    }

    session
        .player("a")
        .send_message(Message::Text("ping".to_string()))
        .await;
    assert_eq!(session.player("a").receive_text().await, "pong");
}
