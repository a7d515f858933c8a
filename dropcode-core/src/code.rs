use rand::Rng;

/// Draws fixed-length codes uniformly from an alphabet.
///
/// The alphabet is assumed to be validated (non-empty, ASCII, no repeats);
/// see [`StoreConfig::validate`](crate::StoreConfig::validate).
#[derive(Debug, Clone)]
pub(crate) struct CodeGenerator {
    alphabet: Vec<u8>,
    length: usize,
    /// Alphabet has no lower-case letters, so typed codes may be upper-cased
    fold_case: bool,
}

impl CodeGenerator {
    pub(crate) fn new(alphabet: &str, length: usize) -> Self {
        Self {
            alphabet: alphabet.as_bytes().to_vec(),
            length,
            fold_case: !alphabet.bytes().any(|b| b.is_ascii_lowercase()),
        }
    }

    /// Cleans up a code typed by a person: trims it and, when the alphabet
    /// is upper-case only, upper-cases it.
    pub(crate) fn normalize(&self, code: &str) -> String {
        let code = code.trim();
        if self.fold_case {
            code.to_ascii_uppercase()
        } else {
            code.to_string()
        }
    }

    /// Draws one code. Each character is picked independently and uniformly.
    pub(crate) fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect()
    }

    /// Returns `true` if `code` could have been produced by this generator.
    pub(crate) fn is_well_formed(&self, code: &str) -> bool {
        code.len() == self.length && code.bytes().all(|b| self.alphabet.contains(&b))
    }

    /// Number of distinct codes, saturating at `usize::MAX`.
    pub(crate) fn capacity(&self) -> usize {
        u32::try_from(self.length)
            .ok()
            .and_then(|len| self.alphabet.len().checked_pow(len))
            .unwrap_or(usize::MAX)
    }
}
