//! Free-text query parsing
//!
//! A search box query is read left to right as a card name followed by at
//! most one qualifier, e.g. `"pikachu vmax"` or `"charizard 4"`.

/// Card-type suffixes recognized as qualifiers
const CARD_TYPE_KEYWORDS: &[&str] = &[
    "ex", "gx", "v", "vmax", "vstar", "break", "prism", "star", "lv.x",
];

/// Longest all-digit token still read as a collector number
const MAX_NUMBER_DIGITS: usize = 4;

/// A query split into name and qualifiers. All parts are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub primary_name: String,
    pub card_type_tokens: Vec<String>,
    pub numeric_tokens: Vec<String>,
}

impl ParsedQuery {
    /// Accumulate name tokens until the first card-type keyword or short
    /// number. That token seeds its qualifier list and ends parsing.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        let mut name_parts = Vec::new();

        for token in query.split_whitespace() {
            let token = token.to_lowercase();
            if is_card_type(&token) {
                parsed.card_type_tokens.push(token);
                break;
            }
            if is_collector_number(&token) {
                parsed.numeric_tokens.push(token);
                break;
            }
            name_parts.push(token);
        }

        parsed.primary_name = name_parts.join(" ");
        parsed
    }

    pub fn first_number(&self) -> Option<&str> {
        self.numeric_tokens.first().map(String::as_str)
    }

    pub fn has_qualifiers(&self) -> bool {
        !self.card_type_tokens.is_empty() || !self.numeric_tokens.is_empty()
    }

    /// Text sent to the catalogs for `raw`, the query this was parsed from.
    ///
    /// Card types are part of catalog card names ("Pikachu VMAX"), so they
    /// narrow the catalog search; collector numbers are not and are only
    /// applied by the local filter. A query with no name is sent as typed.
    pub fn catalog_query(&self, raw: &str) -> String {
        if self.primary_name.is_empty() {
            return raw.trim().to_string();
        }
        match self.card_type_tokens.first() {
            Some(card_type) => format!("{} {}", self.primary_name, card_type),
            None => self.primary_name.clone(),
        }
    }
}

fn is_card_type(token: &str) -> bool {
    CARD_TYPE_KEYWORDS.contains(&token)
}

fn is_collector_number(token: &str) -> bool {
    !token.is_empty() && token.len() <= MAX_NUMBER_DIGITS && token.bytes().all(|b| b.is_ascii_digit())
}

/// Lowercased, whitespace-collapsed form of a query
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
