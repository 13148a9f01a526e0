use rand::{seq::SliceRandom, thread_rng};
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::Error;

/// Draws the secret word for a new round.
pub trait WordSource: Send {
    fn next_word(&mut self) -> String;
}

struct SecretWord {
    value: String,
    is_used: bool,
}

/// Serves words from a pre-shuffled list so that a session does not repeat a
/// word until the whole list has been used.
pub struct ShuffledWords {
    words: Vec<SecretWord>,
}

impl ShuffledWords {
    pub fn new(words: Vec<String>) -> Self {
        let words = if words.is_empty() {
            log::error!("Word source created without words, defaulting to the built-in list of words.");
            ShuffledWords::default_words()
        } else {
            words
        };

        Self {
            words: ShuffledWords::shuffle_words(words),
        }
    }

    pub fn default_words() -> Vec<String> {
        ["summer", "space", "dog", "pizza", "rock", "picnic", "surf"]
            .iter()
            .map(|word| word.to_string())
            .collect()
    }

    fn shuffle_words(words: Vec<String>) -> Vec<SecretWord> {
        let mut words: Vec<SecretWord> = words
            .into_iter()
            .map(|word| SecretWord {
                value: word,
                is_used: false,
            })
            .collect();
        words.shuffle(&mut thread_rng());
        words
    }
}

impl WordSource for ShuffledWords {
    fn next_word(&mut self) -> String {
        if let Some(word) = self.words.iter_mut().find(|word| !word.is_used) {
            word.is_used = true;
            return word.value.to_string();
        }

        log::info!(
            "Ran out of unused words, reshuffling. AmountOfWords: '{}'.",
            self.words.len()
        );
        self.words = ShuffledWords::shuffle_words(
            self.words.drain(..).map(|word| word.value).collect(),
        );
        // Never empty: the constructor falls back to the default words
        match self.words.first_mut() {
            Some(word) => {
                word.is_used = true;
                word.value.to_string()
            }
            None => String::default(),
        }
    }
}

pub fn read_words_from_file(file_path: &str) -> Result<Vec<String>, Error> {
    let file = File::open(file_path).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not load words file. File: '{file_path}', Error: '{error}'."
        ))
    })?;

    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Could not read a line of the words file. File: '{file_path}', Error: '{error}'."
            ))
        })?;
        let word = line.trim().to_lowercase();
        if !word.is_empty() {
            words.push(word);
        }
    }
    Ok(words)
}
