// Host capabilities injected into the validator and processor: the clock and
// a source of random strings. Tests swap in the fixed variants.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::distributions::{Alphanumeric, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

const SPECIAL_CHARS: &[u8] = b"!@#$%^&*()";

pub trait Clock: Send + Sync {
    // Current UTC date and time
    fn now(&self) -> DateTime<Utc>;
}

pub trait RandomSource: Send + Sync {
    // `length` random characters; letters and digits only unless
    // `alphanumeric_only` is false, which adds a few punctuation characters
    fn random_string(&self, length: usize, alphanumeric_only: bool) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random_string(&self, length: usize, alphanumeric_only: bool) -> String {
        sample_string(&mut thread_rng(), length, alphanumeric_only)
    }
}

// Reproducible sequence of strings for a given seed
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn random_string(&self, length: usize, alphanumeric_only: bool) -> String {
        let mut rng = self.rng.lock();
        sample_string(&mut *rng, length, alphanumeric_only)
    }
}

// Always hands back the same characters, cut or padded with 'X' to the
// requested length
#[derive(Debug, Clone)]
pub struct FixedRandom(pub String);

impl RandomSource for FixedRandom {
    fn random_string(&self, length: usize, _alphanumeric_only: bool) -> String {
        self.0
            .chars()
            .chain(std::iter::repeat('X'))
            .take(length)
            .collect()
    }
}

fn sample_string<R: Rng>(rng: &mut R, length: usize, alphanumeric_only: bool) -> String {
    if alphanumeric_only {
        return Alphanumeric
            .sample_iter(rng)
            .take(length)
            .map(char::from)
            .collect();
    }

    let alphabet: Vec<u8> = (b'0'..=b'9')
        .chain(b'a'..=b'z')
        .chain(b'A'..=b'Z')
        .chain(SPECIAL_CHARS.iter().copied())
        .collect();
    let index = Uniform::from(0..alphabet.len());
    (0..length)
        .map(|_| char::from(alphabet[rng.sample(&index)]))
        .collect()
}
