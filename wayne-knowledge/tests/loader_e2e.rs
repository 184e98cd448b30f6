//! End-to-end loading from disk into a chat session, including the degraded
//! path when the knowledge base is missing or broken.

use std::path::PathBuf;

use tempfile::TempDir;

use wayne_knowledge::{
    ChatSession, KnowledgeError, KnowledgeSettings, KnowledgeSource, LoadStatus, MatchOptions,
    Response, UpdateOutcome, load_knowledge_base, source_from_settings, submit_update,
};

const KNOWLEDGE: &str = r#"[
    { "category": "Technology", "questions": [
        { "question": "What is Rust?", "answer": "A language. <a href='https://www.rust-lang.org' target='_blank'>Read more</a>", "keywords": ["rust"] },
        { "question": "What is Cargo?", "answer": "The build tool.", "keywords": ["cargo", "crate"] },
        { "question": 7, "answer": "broken" }
    ] },
    { "category": "Weather", "questions": [
        { "question": "Will it rain today?", "answer": "Bring an umbrella.", "keywords": ["rain"] }
    ] }
]"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("wayne_knowledge=debug")
        .with_test_writer()
        .try_init();
}

/// Write the fixture under a temp data root. Returns (settings, temp).
async fn setup(contents: &str) -> (KnowledgeSettings, TempDir) {
    init_tracing();
    let temp = TempDir::new().expect("tempdir");
    let docs = temp.path().join("docs");
    tokio::fs::create_dir_all(&docs).await.unwrap();
    tokio::fs::write(docs.join("questions.json"), contents)
        .await
        .unwrap();

    let settings = KnowledgeSettings {
        source_path: PathBuf::from("docs/questions.json"),
        data_root_override: Some(temp.path().to_path_buf()),
        ..Default::default()
    };
    (settings, temp)
}

#[tokio::test]
async fn loads_from_data_root_and_answers() {
    let (settings, _temp) = setup(KNOWLEDGE).await;

    let source = source_from_settings(&settings).unwrap();
    let loaded = load_knowledge_base(&source).await.expect("load");
    assert_eq!(loaded.groups, 2);
    assert_eq!(loaded.entries.len(), 3);
    assert_eq!(loaded.skipped, 1);

    let mut session =
        ChatSession::from_loaded(loaded).with_options(MatchOptions::from(&settings));
    assert_eq!(
        session.status(),
        &LoadStatus::Loaded {
            entries: 3,
            skipped: 1
        }
    );
    assert_eq!(session.categories(), vec!["Technology", "Weather"]);

    let answer = session.respond("what is rust?");
    assert!(answer.answer().unwrap().contains("target='_blank'"));

    session.select_category("Weather");
    assert!(matches!(
        session.respond("tell me about cargo"),
        Response::NoMatch { .. }
    ));
}

#[tokio::test]
async fn missing_file_is_unreachable_and_session_degrades() {
    let temp = TempDir::new().unwrap();
    let source = KnowledgeSource::File(temp.path().join("nope.json"));

    let err = load_knowledge_base(&source).await.unwrap_err();
    assert!(matches!(err, KnowledgeError::Unreachable { .. }));
    assert!(err.is_load_error());

    let session = ChatSession::degraded(err.to_string());
    assert!(session.is_degraded());
    assert_eq!(
        session.respond("What is Rust?"),
        Response::NoMatch {
            query: "What is Rust?".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_file_fails_without_partial_entries() {
    let (settings, _temp) = setup(r#"[{ "category": "A", "questions": [] }, { "questions": [] }]"#).await;
    let source = source_from_settings(&settings).unwrap();

    let err = load_knowledge_base(&source).await.unwrap_err();
    assert!(matches!(err, KnowledgeError::MalformedSource(_)));
}

#[tokio::test]
async fn reload_swaps_the_whole_list() {
    let (settings, temp) = setup(KNOWLEDGE).await;
    let source = source_from_settings(&settings).unwrap();
    let mut session = ChatSession::from_loaded(load_knowledge_base(&source).await.unwrap());

    // A failed reload leaves the current list in place
    tokio::fs::write(temp.path().join("docs/questions.json"), "{ broken")
        .await
        .unwrap();
    assert!(load_knowledge_base(&source).await.is_err());
    assert_eq!(session.entries().len(), 3);

    tokio::fs::write(
        temp.path().join("docs/questions.json"),
        r#"[{ "category": "Misc", "questions": [{ "question": "Ping?", "answer": "Pong." }] }]"#,
    )
    .await
    .unwrap();
    session.replace_entries(load_knowledge_base(&source).await.unwrap());
    assert_eq!(session.entries().len(), 1);
    assert_eq!(session.respond("ping?").answer(), Some("Pong."));
}

#[tokio::test]
async fn inline_source_loads_without_io() {
    let loaded = load_knowledge_base(&KnowledgeSource::Inline(KNOWLEDGE.to_string()))
        .await
        .unwrap();
    assert_eq!(loaded.entries.len(), 3);
}

#[test]
fn accepted_update_is_not_searchable_until_appended() {
    let mut session = ChatSession::new(Vec::new());

    let UpdateOutcome::Accepted(submission) =
        submit_update("Q: Opening hours?\nA: Nine to five.\nK: hours")
    else {
        panic!("expected acceptance");
    };
    assert!(matches!(
        session.respond("what are your hours"),
        Response::NoMatch { .. }
    ));

    session.append_entry(submission.into_entry(session.active_category()));
    assert_eq!(
        session.respond("what are your hours").answer(),
        Some("Nine to five.")
    );
}

#[test]
fn rejected_update_leaves_entries_untouched() {
    let mut session = ChatSession::new(Vec::new());
    session.select_category("Any");

    let outcome = submit_update("{ \"question\": \"x\" }");
    assert!(!outcome.is_accepted());
    assert!(session.entries().is_empty());
}

#[test]
fn bundled_sample_knowledge_base_is_valid() {
    let loaded = wayne_knowledge::parse_knowledge_base(include_str!("../../docs/questions.json"))
        .expect("sample parses");
    assert_eq!(loaded.skipped, 0);
    assert_eq!(loaded.categories(), vec!["Weather", "Health", "Technology"]);
    assert!(loaded.entries.iter().all(|entry| !entry.keywords.is_empty()));
}
