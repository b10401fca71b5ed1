//! paraindex - a sampled keyword index over parallel-sentence corpora.
//!
//! Records are read one per line, with the sentence in the first
//! tab-separated field. For every phrase of up to `max_ngram` words the
//! index keeps an exact count and a reproducible uniform sample of the
//! lines it occurs on, so that example sentences can be fetched without
//! scanning the corpus.
//!
//! # Quick start
//!
//! ```no_run
//! use paraindex::{IndexConfig, Indexer, RecordStore, SampleIndex};
//!
//! let store = RecordStore::create("index.redb".as_ref(), true).unwrap();
//! let indexer = Indexer::new(IndexConfig::default(), store).unwrap();
//! let stats = indexer.run(std::io::stdin().lock()).unwrap();
//! println!("indexed {} lines", stats.lines_indexed);
//!
//! let index = SampleIndex::open("index.redb".as_ref()).unwrap();
//! for example in index.examples("the cat", 5).unwrap() {
//!     println!("[{}] {}", example.id, example.line);
//! }
//! ```

pub mod dedup;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod lookup;
pub mod normalize;
pub mod persist;
pub mod phrase_prob;
pub mod reservoir;
pub mod store;
pub mod tokenizer;
pub mod vocabulary;

pub use dedup::DuplicateFilter;
pub use error::{Error, Result};
pub use extract::PhraseExtractor;
pub use indexer::{IndexConfig, IndexStats, Indexer};
pub use lookup::SampleIndex;
pub use phrase_prob::PhraseProbabilityModel;
pub use reservoir::ReservoirIndex;
pub use store::RecordStore;
pub use tokenizer::{SimpleTokenizer, Tokenizer};
pub use vocabulary::Vocabulary;
