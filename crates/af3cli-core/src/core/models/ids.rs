use std::collections::HashSet;

const ALPHABET_SIZE: usize = 26;

/// Converts a 1-based index into its bijective base-26 letter form.
///
/// The encoding has no zero digit, so the sequence runs `A..Z`, `AA..AZ`,
/// `BA..ZZ`, `AAA..` exactly like spreadsheet column labels.
///
/// # Arguments
///
/// * `num` - The 1-based index to encode.
///
/// # Return
///
/// The letter identifier, or an empty string for `0`.
pub fn num_to_letters(num: usize) -> String {
    let mut letters = Vec::new();
    let mut n = num;
    while n > 0 {
        let rem = (n - 1) % ALPHABET_SIZE;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / ALPHABET_SIZE;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// Inverse of [`num_to_letters`].
///
/// Returns `None` for an empty string, for anything outside `A-Z`, or when
/// the value does not fit into a `usize`.
pub fn letters_to_num(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.bytes().try_fold(0usize, |acc, b| {
        if !b.is_ascii_uppercase() {
            return None;
        }
        let digit = (b - b'A') as usize + 1;
        acc.checked_mul(ALPHABET_SIZE)?.checked_add(digit)
    })
}

/// Tracks the identifiers consumed within a single document.
///
/// Manually registered identifiers and the generation counter are kept
/// independent: registering `"F"` does not move the counter, but generation
/// will skip `"F"` once the counter reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRegister {
    registered: HashSet<String>,
    count: usize,
}

impl IdRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an identifier as consumed. Any string is accepted.
    pub fn register(&mut self, id: impl Into<String>) {
        self.registered.insert(id.into());
    }

    /// Produces the next free identifier and registers it.
    pub fn generate(&mut self) -> String {
        loop {
            self.count += 1;
            let candidate = num_to_letters(self.count);
            if !self.registered.contains(&candidate) {
                self.registered.insert(candidate.clone());
                return candidate;
            }
        }
    }

    pub fn reset(&mut self) {
        self.registered.clear();
        self.count = 0;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registered.contains(id)
    }

    /// Number of generation candidates tried so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
