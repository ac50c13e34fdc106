use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

const SUFFIX_LEN: usize = 9;

/// Opaque record id: unix-millis timestamp plus a short random suffix.
/// Collisions are statistically negligible and not otherwise prevented.
pub fn new_record_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();

    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}
