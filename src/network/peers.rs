use log::debug;
use std::collections::BTreeSet;

use crate::error::LedgerError;

/// Known peer locations (`host[:port]`), deduplicated.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the network location of `address`.
    ///
    /// `http://10.0.0.2:5000/anything` is stored as `10.0.0.2:5000`; an
    /// address without a scheme is kept as given, so `localhost:5000` stays
    /// whole rather than being read as scheme `localhost` and path `5000`.
    pub fn register(&mut self, address: &str) -> Result<(), LedgerError> {
        let location = normalize(address)?;
        if self.peers.insert(location.clone()) {
            debug!("PEERS - registered {location}");
        }
        Ok(())
    }

    /// Register every address, stopping at the first invalid one.
    pub fn register_all<I, S>(&mut self, addresses: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for address in addresses {
            self.register(address.as_ref())?;
        }
        Ok(())
    }

    pub fn list(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

fn normalize(address: &str) -> Result<String, LedgerError> {
    let invalid = || LedgerError::InvalidAddress(address.to_string());

    let trimmed = address.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();

    let authority = match without_query.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => Some(rest),
        _ => without_query.strip_prefix("//"),
    };

    let location = match authority {
        Some(rest) => {
            let (netloc, path) = rest.find('/').map_or((rest, ""), |i| rest.split_at(i));
            if netloc.is_empty() { path } else { netloc }
        }
        None => without_query,
    };

    if location.is_empty() {
        return Err(invalid());
    }
    Ok(location.to_string())
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
