//! Team name normalization.
//!
//! Sources spell teams differently ("CHIVAS", "Chivas de Guadalajara",
//! "Club América", "America"). Every name is reduced to one canonical
//! spelling so rows from different sites can be joined.
//!
//! Matching is by substring against an ordered alias list: the first alias
//! whose key occurs anywhere in the lower-cased name wins. Order therefore
//! matters, and a short key like `"leon"` also matches inside longer
//! unrelated names.

use crate::utils::title_case;
use serde::{Deserialize, Serialize};

/// Returned for empty or whitespace-only names.
pub const UNKNOWN_TEAM: &str = "Unknown Team";

/// One `(key, canonical)` pair. `key` is matched lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAlias {
    pub key: String,
    pub canonical: String,
}

impl NameAlias {
    pub fn new(key: &str, canonical: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            canonical: canonical.to_string(),
        }
    }
}

/// Liga MX aliases in match order.
pub fn default_aliases() -> Vec<NameAlias> {
    [
        ("américa", "Club América"),
        ("america", "Club América"),
        ("cruz azul", "Cruz Azul"),
        ("chivas", "Guadalajara"),
        ("guadalajara", "Guadalajara"),
        ("pumas", "Pumas UNAM"),
        ("tigres", "Tigres UANL"),
        ("monterrey", "Monterrey"),
        ("santos", "Santos Laguna"),
        ("toluca", "Toluca"),
        ("león", "León"),
        ("leon", "León"),
        ("atlas", "Atlas"),
        ("necaxa", "Necaxa"),
        ("puebla", "Puebla"),
        ("pachuca", "Pachuca"),
        ("tijuana", "Tijuana"),
        ("mazatlán", "Mazatlán FC"),
        ("mazatlan", "Mazatlán FC"),
        ("querétaro", "Querétaro"),
        ("queretaro", "Querétaro"),
        ("juárez", "Juárez"),
        ("juarez", "Juárez"),
        ("atlético san luis", "Atlético San Luis"),
        ("atletico san luis", "Atlético San Luis"),
        ("san luis", "Atlético San Luis"),
    ]
    .into_iter()
    .map(|(k, c)| NameAlias::new(k, c))
    .collect()
}

/// Maps noisy team names to canonical ones.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    aliases: Vec<NameAlias>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(default_aliases())
    }
}

impl NameNormalizer {
    pub fn new(aliases: Vec<NameAlias>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|a| NameAlias::new(&a.key, &a.canonical))
            .filter(|a| !a.key.is_empty())
            .collect();
        Self { aliases }
    }

    /// Canonical spelling of `raw`.
    ///
    /// Falls back to title-casing the trimmed name when no alias matches,
    /// and to [`UNKNOWN_TEAM`] when the name is blank.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return UNKNOWN_TEAM.to_string();
        }
        let lowered = trimmed.to_lowercase();
        self.aliases
            .iter()
            .find(|a| lowered.contains(&a.key))
            .map(|a| a.canonical.clone())
            .unwrap_or_else(|| title_case(&lowered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_substring_insensitive() {
        let n = NameNormalizer::default();
        assert_eq!(n.normalize("CHIVAS"), "Guadalajara");
        assert_eq!(n.normalize("chivas de guadalajara"), "Guadalajara");
        assert_eq!(n.normalize("  Club América\n"), "Club América");
        assert_eq!(n.normalize("AMERICA"), "Club América");
    }

    #[test]
    fn test_blank_is_unknown() {
        let n = NameNormalizer::default();
        assert_eq!(n.normalize(""), UNKNOWN_TEAM);
        assert_eq!(n.normalize("   "), UNKNOWN_TEAM);
    }

    #[test]
    fn test_unmatched_is_title_cased() {
        let n = NameNormalizer::default();
        assert_eq!(n.normalize("  RAYOS del NORTE "), "Rayos Del Norte");
    }

    #[test]
    fn test_first_declared_match_wins() {
        // "san luis" would also match, but the full name is declared first.
        let n = NameNormalizer::default();
        assert_eq!(n.normalize("Atlético San Luis"), "Atlético San Luis");
        // Substring false positive is kept: "leon" inside a longer word.
        assert_eq!(n.normalize("Napoleones FC"), "León");
    }

    #[test]
    fn test_custom_alias_order_is_respected() {
        let n = NameNormalizer::new(vec![
            NameAlias::new("azul", "Azules"),
            NameAlias::new("cruz azul", "Cruz Azul"),
        ]);
        assert_eq!(n.normalize("Cruz Azul"), "Azules");
    }

    #[test]
    fn test_alias_keys_are_lowered() {
        let n = NameNormalizer::new(vec![NameAlias {
            key: "FC JUÁREZ".into(),
            canonical: "Juárez".into(),
        }]);
        assert_eq!(n.normalize("fc juárez"), "Juárez");
    }
}
