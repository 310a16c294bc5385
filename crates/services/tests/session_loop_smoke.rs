use std::sync::Arc;

use quiz_core::model::{Question, QuestionId, QuizSettings};
use quiz_core::time::fixed_clock;
use services::{
    LeaderboardService, QuizLoopService, SessionStart, SessionTransition, TickOutcome,
};
use storage::repository::{InMemoryRepository, QuestionRepository};

fn text_question(id: u64) -> Question {
    Question::text(
        QuestionId::new(id),
        format!("Question {id}"),
        "Right",
        ["Wrong 1", "Wrong 2", "Wrong 3"],
    )
    .unwrap()
}

fn image_question(id: u64) -> Question {
    Question::image(
        QuestionId::new(id),
        format!("https://example.com/quiz/{id}.png"),
        "Right",
        ["Wrong 1", "Wrong 2", "Wrong 3"],
    )
    .unwrap()
}

async fn seeded_repo(text: u64, image: u64) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for id in 1..=text {
        repo.upsert_question(&text_question(id)).await.unwrap();
    }
    for id in 101..=(100 + image) {
        repo.upsert_question(&image_question(id)).await.unwrap();
    }
    repo
}

#[tokio::test]
async fn full_quiz_lands_on_the_leaderboard() {
    let repo = seeded_repo(6, 4).await;
    let loop_svc = QuizLoopService::new(
        fixed_clock(),
        QuizSettings::standard(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let SessionStart {
        mut session,
        first_turn,
    } = loop_svc.start_session("Riley").await.unwrap();

    // 5 text + 4 image questions available under the standard caps.
    assert_eq!(session.total_questions(), 9);
    assert_eq!(first_turn.options.len(), 4);

    let mut turn = first_turn;
    loop {
        session.submit_answer(turn.token, "Right").unwrap();
        match loop_svc.advance(&mut session).unwrap() {
            SessionTransition::Question(next) => turn = next,
            SessionTransition::Ended(ended) => {
                // Every answer was correct with the full countdown left.
                assert_eq!(ended.final_score, 9 * 30);
                break;
            }
        }
    }

    let score_id = loop_svc.finalize_score(&mut session).await.unwrap();
    assert_eq!(session.score_id(), Some(score_id));

    let leaderboard = LeaderboardService::new(fixed_clock(), Arc::new(repo));
    let top = leaderboard.top_scores(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_name, "Riley");
    assert_eq!(top[0].score, 270);
}

#[tokio::test]
async fn unanswered_questions_time_out_to_zero_points() {
    let repo = seeded_repo(3, 0).await;
    let loop_svc = QuizLoopService::new(
        fixed_clock(),
        QuizSettings::rapid(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let SessionStart {
        mut session,
        first_turn,
    } = loop_svc.start_session("Sam").await.unwrap();

    let mut turn = first_turn;
    loop {
        // Let the countdown run dry instead of answering.
        let expired = loop {
            match session.tick(turn.token) {
                TickOutcome::Counted { .. } => {}
                TickOutcome::Expired(eval) => break eval,
                TickOutcome::Stale => panic!("live countdown reported stale"),
            }
        };
        assert!(!expired.correct);
        assert_eq!(expired.points_awarded, 0);

        match loop_svc.advance(&mut session).unwrap() {
            SessionTransition::Question(next) => turn = next,
            SessionTransition::Ended(ended) => {
                assert_eq!(ended.final_score, 0);
                break;
            }
        }
    }

    loop_svc.finalize_score(&mut session).await.unwrap();
    let leaderboard = LeaderboardService::new(fixed_clock(), Arc::new(repo));
    let top = leaderboard.top_scores(1).await.unwrap();
    assert_eq!(top[0].score, 0);
}

#[tokio::test]
async fn play_again_reuses_the_player_with_a_fresh_pool() {
    let repo = seeded_repo(8, 0).await;
    let loop_svc = QuizLoopService::new(
        fixed_clock(),
        QuizSettings::standard(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let SessionStart {
        mut session,
        first_turn,
    } = loop_svc.start_session("Noor").await.unwrap();

    let mut turn = first_turn;
    loop {
        session.submit_answer(turn.token, "Wrong 1").unwrap();
        match loop_svc.advance(&mut session).unwrap() {
            SessionTransition::Question(next) => turn = next,
            SessionTransition::Ended(_) => break,
        }
    }

    let replay = loop_svc.play_again(&session).await.unwrap();
    assert_eq!(replay.session.player().as_str(), "Noor");
    assert_eq!(replay.session.total_questions(), 5);
    assert_eq!(replay.session.score(), 0);
}
