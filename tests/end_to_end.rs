use std::{collections::HashMap, io::Cursor};

use paraindex::{
    IndexConfig,
    Indexer,
    PhraseProbabilityModel,
    RecordStore,
    SimpleTokenizer,
    Vocabulary,
    indexer::LineOutcome,
    persist::parse_samples,
    phrase_prob::BASE_PROB,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn config(max_ngram: usize, max_samples: usize) -> IndexConfig {
    IndexConfig {
        max_ngram,
        max_samples,
        num_buckets: 1024,
        ..IndexConfig::default()
    }
}

fn store(tmp: &tempfile::TempDir) -> RecordStore {
    RecordStore::create(&tmp.path().join("index.redb"), true).unwrap()
}

#[test]
fn near_duplicate_lines_count_once() {
    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(config(2, 100), store(&tmp)).unwrap();

    assert!(matches!(
        indexer.process_line("The cat sat.\tneko ga suwat").unwrap(),
        LineOutcome::Indexed { line_id: 0, .. }
    ));
    assert_eq!(
        indexer.process_line("the cat sat\tneko ga suwatta").unwrap(),
        LineOutcome::Duplicate
    );

    let reservoir = &indexer.state().reservoir;
    for phrase in ["the", "cat", "sat", "the cat", "cat sat"] {
        let record = reservoir.get(phrase).unwrap();
        assert_eq!(record.count, 1, "{phrase}");
        assert_eq!(record.samples, vec![0], "{phrase}");
    }
    assert!(reservoir.get("the cat sat").is_none());

    let (stats, store) = indexer.finish().unwrap();
    assert_eq!(stats.lines_indexed, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.phrases, 5);
    assert_eq!(
        store.get("[0]").unwrap().as_deref(),
        Some("The cat sat.\tneko ga suwat")
    );
    assert_eq!(store.get("[1]").unwrap(), None);
    // Five phrases plus one line record.
    assert_eq!(store.len().unwrap(), 6);
}

#[test]
fn quote_styles_deduplicate() {
    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(config(3, 100), store(&tmp)).unwrap();
    indexer
        .process_line("She said \u{201C}hello\u{201D}\tx")
        .unwrap();
    assert_eq!(
        indexer.process_line("SHE SAID \"HELLO\"\ty").unwrap(),
        LineOutcome::Duplicate
    );
}

#[test]
fn vocabulary_keeps_only_listed_phrases() {
    let tmp = tempfile::tempdir().unwrap();
    let mut vocabulary = Vocabulary::new();
    vocabulary.insert("cat sat", &SimpleTokenizer);
    let mut indexer = Indexer::new(config(3, 100), store(&tmp))
        .unwrap()
        .with_vocabulary(vocabulary);

    indexer.process_line("the cat sat").unwrap();
    let (stats, store) = indexer.finish().unwrap();

    assert_eq!(stats.phrases, 1);
    assert_eq!(store.get("cat sat").unwrap().as_deref(), Some("0"));
    for phrase in ["the", "cat", "sat", "the cat"] {
        assert_eq!(store.get(phrase).unwrap(), None);
    }
}

#[test]
fn bracketed_token_does_not_join_next_word() {
    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(config(3, 100), store(&tmp)).unwrap();
    indexer.process_line("(hello) world").unwrap();

    let reservoir = &indexer.state().reservoir;
    assert!(reservoir.get("hello").is_some());
    assert!(reservoir.get("world").is_some());
    assert!(reservoir.get("hello world").is_none());
    assert!(reservoir.get("(hello)").is_none());
}

#[test]
fn samples_are_complete_until_capacity() {
    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(config(1, 10), store(&tmp)).unwrap();
    let input: String =
        (0..10).map(|i| format!("common word{i}\n")).collect();
    indexer.process_records(Cursor::new(input)).unwrap();
    let (_, store) = indexer.finish().unwrap();

    let ids = parse_samples(&store.get("common").unwrap().unwrap()).unwrap();
    assert_eq!(ids, (0..10).collect::<Vec<u64>>());
}

#[test]
fn samples_are_bounded_and_reproducible() {
    let input: String =
        (0..1_000).map(|i| format!("common word{i}\n")).collect();

    let build = |seed: u64| {
        let tmp = tempfile::tempdir().unwrap();
        let mut indexer = Indexer::with_rng(
            config(1, 10),
            store(&tmp),
            ChaCha20Rng::seed_from_u64(seed),
        )
        .unwrap();
        indexer.process_records(Cursor::new(input.clone())).unwrap();
        let (_, store) = indexer.finish().unwrap();
        store.iter().unwrap()
    };

    let first = build(19_780_211);
    assert_eq!(first, build(19_780_211));
    assert_ne!(first, build(7));

    let common = first.iter().find(|(k, _)| k == "common").unwrap();
    let ids = parse_samples(&common.1).unwrap();
    assert_eq!(ids.len(), 10);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert!(ids.iter().all(|id| *id < 1_000));
}

#[test]
fn default_seed_matches_explicit_seed() {
    let input = (0..200)
        .map(|i| format!("shared token {i}\n"))
        .collect::<String>();

    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::new(config(1, 3), store(&tmp)).unwrap();
    indexer.process_records(Cursor::new(input.clone())).unwrap();
    let (_, default_store) = indexer.finish().unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let mut indexer = Indexer::with_rng(
        config(1, 3),
        store(&tmp),
        ChaCha20Rng::seed_from_u64(paraindex::reservoir::DEFAULT_SEED),
    )
    .unwrap();
    indexer.process_records(Cursor::new(input)).unwrap();
    let (_, explicit_store) = indexer.finish().unwrap();

    assert_eq!(default_store.iter().unwrap(), explicit_store.iter().unwrap());
}

#[test]
fn pruning_uses_probability_table_store() {
    let tmp = tempfile::tempdir().unwrap();
    let table = RecordStore::create(&tmp.path().join("prob.redb"), true).unwrap();
    table
        .set_batch(&[
            ("the".to_string(), "0.05".to_string()),
            ("cat".to_string(), "0.001".to_string()),
            ("sat".to_string(), "0.002".to_string()),
        ])
        .unwrap();
    let model = PhraseProbabilityModel::new(Box::new(table));
    assert_eq!(model.estimate("nothing here").unwrap(), BASE_PROB);

    let config = IndexConfig {
        max_words: 2,
        ..config(1, 10)
    };
    let mut indexer = Indexer::new(config, store(&tmp))
        .unwrap()
        .with_phrase_model(model);
    indexer.process_line("the cat sat").unwrap();

    let reservoir = &indexer.state().reservoir;
    assert!(reservoir.get("cat").is_some());
    assert!(reservoir.get("sat").is_some());
    assert!(reservoir.get("the").is_none());
}

#[test]
fn estimates_never_drop_below_floor() {
    let table: HashMap<String, f64> = [
        ("a".to_string(), 1e-7),
        ("b".to_string(), 1e-7),
        ("c".to_string(), 1e-7),
    ]
    .into_iter()
    .collect();
    let model = PhraseProbabilityModel::new(Box::new(table));
    for phrase in ["a", "a b", "a b c", "c b a c b a", "zzz", "a zzz"] {
        assert!(model.estimate(phrase).unwrap() >= BASE_PROB, "{phrase}");
    }
}
