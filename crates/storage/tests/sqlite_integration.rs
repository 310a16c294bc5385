use quiz_core::model::{LeaderboardEntry, PlayerName, Question, QuestionId, QuestionKind};
use quiz_core::time::fixed_now;
use storage::repository::{QuestionRepository, ScoreRepository};
use storage::sqlite::SqliteRepository;

fn text_question(id: u64, prompt: &str) -> Question {
    Question::text(
        QuestionId::new(id),
        prompt,
        "Right",
        ["Wrong 1", "Wrong 2", "Wrong 3"],
    )
    .unwrap()
}

fn image_question(id: u64, url: &str) -> Question {
    Question::image(
        QuestionId::new(id),
        url,
        "Right",
        ["Wrong 1", "Wrong 2", "Wrong 3"],
    )
    .unwrap()
}

fn entry(name: &str, score: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(PlayerName::new(name).unwrap(), score, fixed_now())
}

#[tokio::test]
async fn sqlite_roundtrips_both_question_kinds() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_questions?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let text = text_question(1, "What is the capital of Iceland?");
    let image = image_question(2, "https://example.com/quiz/flag-is.png");
    repo.upsert_question(&text).await.unwrap();
    repo.upsert_question(&image).await.unwrap();

    let all = repo.all_questions().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], text);
    assert_eq!(all[1], image);
    assert_eq!(all[1].kind(), QuestionKind::Image);

    let urls = repo.image_urls().await.unwrap();
    assert_eq!(urls, vec!["https://example.com/quiz/flag-is.png".to_string()]);
}

#[tokio::test]
async fn sqlite_upsert_overwrites_existing_question() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_question(&text_question(1, "Old prompt"))
        .await
        .unwrap();
    repo.upsert_question(&text_question(1, "New prompt"))
        .await
        .unwrap();

    let all = repo.all_questions().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].prompt().text(), Some("New prompt"));
}

#[tokio::test]
async fn sqlite_orders_scores_with_insertion_tie_break() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_scores?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.append_score(&entry("A", 50)).await.unwrap();
    repo.append_score(&entry("B", 80)).await.unwrap();
    repo.append_score(&entry("C", 80)).await.unwrap();

    let top = repo.top_scores(3).await.unwrap();
    let names: Vec<&str> = top
        .iter()
        .map(|r| r.entry.player_name().as_str())
        .collect();
    assert_eq!(names, ["B", "C", "A"]);
    assert_eq!(top[0].entry.score(), 80);

    let top_two = repo.top_scores(2).await.unwrap();
    assert_eq!(top_two.len(), 2);
}

#[tokio::test]
async fn sqlite_top_scores_on_empty_store_is_empty() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_empty?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.top_scores(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_append_returns_monotonic_row_ids() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_ids?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let first = repo.append_score(&entry("A", 10)).await.unwrap();
    let second = repo.append_score(&entry("B", 10)).await.unwrap();
    assert!(second > first);
}
