//! Site list loading.
//!
//! A site list is a comma separated file with one `name, url` pair per row
//! and no header. Blank lines and lines starting with `#` are skipped.

use std::{fs, io, path::Path};

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::target::Target;

/// Load targets from a site list file
pub fn load_site_list(path: impl AsRef<Path>) -> Result<Vec<Target>> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::SiteListMissing(path.to_path_buf()),
        _ => Error::SiteListRead { path: path.to_path_buf(), source },
    })?;

    let targets = parse_site_list(&contents)?;
    debug!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

/// Parse the contents of a site list
pub fn parse_site_list(contents: &str) -> Result<Vec<Target>> {
    let mut targets = Vec::new();

    for (idx, raw) in contents.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let columns =
            split_row(trimmed).map_err(|reason| Error::SiteListParse { line, reason })?;
        let mut columns = columns.iter().map(String::as_str);
        let name = columns.next().unwrap_or_default();
        let url = columns.next().unwrap_or_default();
        // Extra columns are ignored

        if name.is_empty() || url.is_empty() {
            return Err(Error::SiteListParse {
                line,
                reason: "expected `name, url`".to_string(),
            });
        }

        validate_target_url(url).map_err(|reason| Error::SiteListParse { line, reason })?;
        targets.push(Target::new(name, url));
    }

    Ok(targets)
}

/// Validate that a target URL can be probed over HTTP
pub fn validate_target_url(target: &str) -> std::result::Result<(), String> {
    let url = Url::parse(target).map_err(|e| format!("invalid URL `{target}`: {e}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{other}` in `{target}`")),
    }

    if url.host_str().is_none() {
        return Err(format!("missing host in `{target}`"));
    }

    Ok(())
}

/// Split one row into trimmed fields
///
/// A field starting with `"` runs to the matching closing quote and may hold
/// commas; `""` inside it stands for a literal quote.
fn split_row(row: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = row.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut field = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => field.push('"'),
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return Err("unterminated quoted field".to_string()),
                }
            }
        }
        while let Some(c) = chars.next_if(|c| *c != ',') {
            field.push(c);
        }
        fields.push(field.trim().to_string());

        if chars.next().is_none() {
            return Ok(fields);
        }
    }
}
