//! Keyword-based intent routing.
//!
//! A [`Lexicon`] counts which keywords of each category appear in a text;
//! the [`IntentRouter`] turns those counts into one [`Intent`].
//!
//! [`Intent`]: medimind_core::Intent

pub mod intent;
pub mod lexicon;

pub use intent::IntentRouter;
pub use lexicon::{Lexicon, contains_any, first_match};
