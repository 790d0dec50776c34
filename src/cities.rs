use std::collections::HashMap;

use crate::common::constants::SAO_PAULO;
use crate::text::TextNormalizer;

/// Neighborhoods the scraper reported as cities, mapped to their containing city.
const DEFAULT_CORRECTIONS: &[(&str, &str)] = &[
    ("Morumbi (Paraisópolis)", SAO_PAULO),
    ("Paraisópolis", SAO_PAULO),
    ("Brasilândia", SAO_PAULO),
    ("Cidade Tiradentes", SAO_PAULO),
    ("Capão Redondo", SAO_PAULO),
    ("Guaianases", SAO_PAULO),
    ("Heliópolis", SAO_PAULO),
    ("Itaquera", SAO_PAULO),
    ("Jardim Ângela", SAO_PAULO),
    ("Parelheiros", SAO_PAULO),
    ("Perus", SAO_PAULO),
    ("Pirituba", SAO_PAULO),
    ("Sapopemba", SAO_PAULO),
    ("São Mateus", SAO_PAULO),
    ("São Miguel Paulista", SAO_PAULO),
    ("Santo Amaro", SAO_PAULO),
    ("Tatuapé", SAO_PAULO),
    ("Vila Mariana", SAO_PAULO),
    ("Mooca", SAO_PAULO),
    ("Bom Retiro", SAO_PAULO),
];

/// Lookup of known mis-scraped city names.
///
/// Keys are stored normalized, so lookups ignore case, accents and punctuation.
#[derive(Debug, Clone)]
pub struct CityCorrector {
    normalizer: TextNormalizer,
    corrections: HashMap<String, String>,
}

impl Default for CityCorrector {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_CORRECTIONS
                .iter()
                .map(|(raw, city)| (raw.to_string(), city.to_string())),
            TextNormalizer::default(),
        )
    }
}

impl CityCorrector {
    pub fn new(corrections: &HashMap<String, String>, normalizer: TextNormalizer) -> Self {
        Self::from_pairs(
            corrections.iter().map(|(k, v)| (k.clone(), v.clone())),
            normalizer,
        )
    }

    pub fn from_pairs<I>(pairs: I, normalizer: TextNormalizer) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let corrections = pairs
            .into_iter()
            .map(|(raw, city)| (normalizer.normalize(&raw), city))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self {
            normalizer,
            corrections,
        }
    }

    /// The default correction table as raw key/value pairs (used for config defaults).
    pub fn default_table() -> HashMap<String, String> {
        DEFAULT_CORRECTIONS
            .iter()
            .map(|(raw, city)| (raw.to_string(), city.to_string()))
            .collect()
    }

    /// Returns the corrected city, or `raw` unchanged when it is not a known error.
    pub fn correct(&self, raw: &str) -> String {
        self.lookup(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.corrections
            .get(&self.normalizer.normalize(raw))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_neighborhood_is_corrected() {
        let corrector = CityCorrector::default();
        assert_eq!(corrector.correct("Morumbi (Paraisópolis)"), "são paulo");
        assert_eq!(corrector.correct("  morumbi paraisopolis "), "são paulo");
        assert_eq!(corrector.correct("TATUAPE"), "são paulo");
    }

    #[test]
    fn test_unknown_city_is_unchanged() {
        let corrector = CityCorrector::default();
        assert_eq!(corrector.correct("Campinas"), "Campinas");
        assert_eq!(corrector.correct(""), "");
        assert!(corrector.lookup("Campinas").is_none());
    }

    #[test]
    fn test_fixture_table_replaces_defaults() {
        let mut table = HashMap::new();
        table.insert("Barão Geraldo".to_string(), "Campinas".to_string());
        let corrector = CityCorrector::new(&table, TextNormalizer::default());

        assert_eq!(corrector.len(), 1);
        assert_eq!(corrector.correct("barao geraldo"), "Campinas");
        assert_eq!(corrector.correct("Morumbi (Paraisópolis)"), "Morumbi (Paraisópolis)");
    }

    #[test]
    fn test_default_table_round_trips_through_new() {
        let corrector = CityCorrector::new(&CityCorrector::default_table(), TextNormalizer::default());
        assert_eq!(corrector.len(), CityCorrector::default().len());
        assert!(!corrector.is_empty());
    }

    #[test]
    fn test_lenient_normalizer_keeps_punctuation_in_keys() {
        let corrector = CityCorrector::new(&CityCorrector::default_table(), TextNormalizer::lenient());
        assert_eq!(corrector.correct("MORUMBI (PARAISÓPOLIS)"), "são paulo");
        assert_eq!(corrector.correct("Morumbi Paraisópolis"), "Morumbi Paraisópolis");
        assert_eq!(corrector.correct("tatuape"), "são paulo");
    }
}
