//! CSV datasets.
//!
//! Rows are `key,title,comment,version` after a header line. Lines split into
//! at most four fields, so only the version column may contain commas.

use std::{fs, path::Path};

use eyre::{WrapErr as _, eyre};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One row's payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub title: String,
    pub comment: String,
    /// The `version` column, kept verbatim.
    pub timestamp: String,
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Payload[title={}, comment={}, timestamp={}]",
            self.title, self.comment, self.timestamp
        )
    }
}

/// Rows in file order.
pub type Dataset = Vec<(String, Payload)>;

/// Parse CSV text.
pub fn parse(text: &str) -> eyre::Result<Dataset> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let mut fields = line.splitn(4, ',');
            let mut next = |name: &str| {
                fields
                    .next()
                    .map(str::to_owned)
                    .ok_or_else(|| eyre!("line {}: missing {name}", number + 1))
            };

            let key = next("key")?;
            let payload = Payload {
                title: next("title")?,
                comment: next("comment")?,
                timestamp: next("version")?.trim().trim_matches('"').to_owned(),
            };
            Ok((key, payload))
        })
        .collect()
}

/// Load `path`, or generate `fallback_rows` synthetic rows if it is missing.
pub fn load_or_generate(
    path: &Path,
    fallback_rows: usize,
    keys: usize,
    seed: Option<u64>,
) -> eyre::Result<Dataset> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let data = parse(&text).wrap_err_with(|| format!("parsing {}", path.display()))?;
            info!("Loaded {} entries from {}", data.len(), path.display());
            Ok(data)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "{} not found, generating {fallback_rows} synthetic entries over {keys} keys",
                path.display()
            );
            Ok(generate(fallback_rows, keys, seed))
        }
        Err(err) => Err(err).wrap_err_with(|| format!("reading {}", path.display())),
    }
}

/// Random appends over `KEY000`-style keys.
///
/// Every key appears once before any key repeats, so every key has a
/// version from the first `keys` timestamps on.
pub fn generate(rows: usize, keys: usize, seed: Option<u64>) -> Dataset {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let keys = keys.max(1);
    let mut changes = vec![0usize; keys];

    (0..rows)
        .map(|row| {
            let index = if row < keys { row } else { rng.gen_range(0..keys) };
            changes[index] += 1;

            let key = format!("KEY{index:03}");
            let payload = Payload {
                title: format!("Some Title for {key}"),
                comment: format!("Change {} for key {key}", changes[index]),
                timestamp: (row + 1).to_string(),
            };
            (key, payload)
        })
        .collect()
}
