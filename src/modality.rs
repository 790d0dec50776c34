use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text::TextNormalizer;

/// Coarse educational format of a course, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// High school integrated with a technical course
    EnsinoMedioIntegrado,
    /// High school in the adult-education (EJA) track
    EnsinoMedioEja,
    /// Regular high school
    EnsinoMedio,
    /// Technical course integrated with something other than high school
    TecnicoIntegrado,
    /// Technical course taken alongside high school elsewhere
    TecnicoConcomitante,
    /// Standalone technical course for students who finished high school
    TecnicoSubsequente,
    /// Anything the rules do not recognize
    Outros,
}

impl Modality {
    pub const ALL: [Modality; 7] = [
        Modality::EnsinoMedioIntegrado,
        Modality::EnsinoMedioEja,
        Modality::EnsinoMedio,
        Modality::TecnicoIntegrado,
        Modality::TecnicoConcomitante,
        Modality::TecnicoSubsequente,
        Modality::Outros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::EnsinoMedioIntegrado => "ensino-medio-integrado",
            Modality::EnsinoMedioEja => "ensino-medio-eja",
            Modality::EnsinoMedio => "ensino-medio",
            Modality::TecnicoIntegrado => "tecnico-integrado",
            Modality::TecnicoConcomitante => "tecnico-concomitante",
            Modality::TecnicoSubsequente => "tecnico-subsequente",
            Modality::Outros => "outros",
        }
    }

    /// The tag with its hyphens read as word breaks (`ensino medio eja`).
    pub fn words(&self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown modality '{s}'"))
    }
}

/// One keyword rule. A name matches when it contains every `all_of` keyword,
/// at least one `any_of` keyword (if any are listed) and none of `none_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityRule {
    pub modality: Modality,
    #[serde(default)]
    pub all_of: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
    #[serde(default)]
    pub none_of: Vec<String>,
}

impl ModalityRule {
    fn new(modality: Modality, all_of: &[&str], any_of: &[&str], none_of: &[&str]) -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            modality,
            all_of: owned(all_of),
            any_of: owned(any_of),
            none_of: owned(none_of),
        }
    }

    fn normalized(&self, normalizer: &TextNormalizer) -> Self {
        let norm = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| normalizer.normalize(w))
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            modality: self.modality,
            all_of: norm(&self.all_of),
            any_of: norm(&self.any_of),
            none_of: norm(&self.none_of),
        }
    }

    fn matches(&self, normalized_name: &str) -> bool {
        self.all_of.iter().all(|k| normalized_name.contains(k.as_str()))
            && (self.any_of.is_empty()
                || self.any_of.iter().any(|k| normalized_name.contains(k.as_str())))
            && !self.none_of.iter().any(|k| normalized_name.contains(k.as_str()))
    }
}

/// Built-in rule list. Order is significant: the first matching rule wins.
pub fn default_rules() -> Vec<ModalityRule> {
    vec![
        ModalityRule::new(Modality::EnsinoMedioIntegrado, &["ensino medio", "integrado"], &[], &[]),
        ModalityRule::new(
            Modality::EnsinoMedioEja,
            &["ensino medio"],
            &["eja", "jovens e adultos"],
            &[],
        ),
        ModalityRule::new(Modality::EnsinoMedio, &["ensino medio"], &[], &[]),
        ModalityRule::new(Modality::TecnicoIntegrado, &["integrado"], &[], &["ensino medio"]),
        ModalityRule::new(Modality::TecnicoConcomitante, &["concomitante"], &[], &[]),
        ModalityRule::new(Modality::TecnicoSubsequente, &["tecnico"], &[], &[]),
    ]
}

/// Classifies course names into a [`Modality`] using ordered keyword rules.
#[derive(Debug, Clone)]
pub struct ModalityClassifier {
    normalizer: TextNormalizer,
    rules: Vec<ModalityRule>,
}

impl Default for ModalityClassifier {
    fn default() -> Self {
        Self::new(&default_rules(), TextNormalizer::default())
    }
}

impl ModalityClassifier {
    pub fn new(rules: &[ModalityRule], normalizer: TextNormalizer) -> Self {
        Self {
            rules: rules.iter().map(|r| r.normalized(&normalizer)).collect(),
            normalizer,
        }
    }

    pub fn classify(&self, course_name: &str) -> Modality {
        let name = self.normalizer.normalize(course_name);
        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map(|rule| rule.modality)
            .unwrap_or(Modality::Outros)
    }

    pub fn rules(&self) -> &[ModalityRule] {
        &self.rules
    }
}
