use serde::{Deserialize, Serialize};

use crate::domain::{FormattedCourse, FormattedInstitution};
use crate::text::TextNormalizer;

/// Optional search criteria; all supplied criteria must match.
///
/// Field names double as the query-string parameters of the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub curso: Option<String>,
    #[serde(default)]
    pub modalidade: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
}

impl SearchCriteria {
    pub fn city(cidade: impl Into<String>) -> Self {
        Self {
            cidade: Some(cidade.into()),
            ..Default::default()
        }
    }

    pub fn course(curso: impl Into<String>) -> Self {
        Self {
            curso: Some(curso.into()),
            ..Default::default()
        }
    }

    pub fn modality(modalidade: impl Into<String>) -> Self {
        Self {
            modalidade: Some(modalidade.into()),
            ..Default::default()
        }
    }

    pub fn name(nome: impl Into<String>) -> Self {
        Self {
            nome: Some(nome.into()),
            ..Default::default()
        }
    }

    /// True when no criterion carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        [&self.cidade, &self.curso, &self.modalidade, &self.nome]
            .into_iter()
            .all(|c| provided(c).is_none())
    }
}

/// Blank values count as "not supplied".
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Substring filtering over normalized text.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    normalizer: TextNormalizer,
}

/// Criteria after normalization; `None` means "do not filter on this".
struct Needles {
    city: Option<String>,
    course: Option<String>,
    modality: Option<String>,
    name: Option<String>,
}

impl QueryFilter {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> TextNormalizer {
        self.normalizer
    }

    /// Returns the records matching every supplied criterion.
    ///
    /// Course and modality criteria narrow each record's course list to the
    /// matching courses; a record is dropped only when none remain.
    pub fn apply(
        &self,
        records: &[FormattedInstitution],
        criteria: &SearchCriteria,
    ) -> Vec<FormattedInstitution> {
        let needles = self.needles(criteria);

        records
            .iter()
            .filter(|r| self.matches_name(r, needles.name.as_deref()))
            .filter(|r| self.matches_city(r, needles.city.as_deref()))
            .filter_map(|r| self.narrow_courses(r, &needles))
            .collect()
    }

    fn needles(&self, criteria: &SearchCriteria) -> Needles {
        let norm = |value: &Option<String>| {
            provided(value)
                .map(|v| self.normalizer.normalize(v))
                .filter(|v| !v.is_empty())
        };
        // tags are hyphenated; read hyphens as word breaks whatever the punctuation setting
        let modality = criteria.modalidade.as_ref().map(|m| m.replace('-', " "));
        Needles {
            city: norm(&criteria.cidade),
            course: norm(&criteria.curso),
            modality: norm(&modality),
            name: norm(&criteria.nome),
        }
    }

    fn contains(&self, haystack: Option<&str>, needle: &str) -> bool {
        self.normalizer.contains(haystack, needle)
    }

    fn matches_name(&self, record: &FormattedInstitution, needle: Option<&str>) -> bool {
        match needle {
            None => true,
            Some(needle) => self.contains(Some(&record.name), needle),
        }
    }

    /// City text may appear in the corrected city, the scraped city, the
    /// address or the institution name.
    fn matches_city(&self, record: &FormattedInstitution, needle: Option<&str>) -> bool {
        let Some(needle) = needle else {
            return true;
        };
        [
            record.cidade.as_deref(),
            record.cidade_original.as_deref(),
            record.endereco.as_deref(),
            Some(record.name.as_str()),
        ]
        .into_iter()
        .any(|field| self.contains(field, needle))
    }

    fn course_matches_modality(&self, course: &FormattedCourse, needle: &str) -> bool {
        self.contains(Some(&course.modalidade.words()), needle)
    }

    fn course_matches_name(&self, course: &FormattedCourse, needle: &str) -> bool {
        self.contains(course.nome.as_deref(), needle)
    }

    fn narrow_courses(
        &self,
        record: &FormattedInstitution,
        needles: &Needles,
    ) -> Option<FormattedInstitution> {
        if needles.modality.is_none() && needles.course.is_none() {
            return Some(record.clone());
        }

        let mut narrowed = record.clone();
        // modality first, then course name over what is left
        if let Some(needle) = needles.modality.as_deref() {
            narrowed.retain_courses(|c| self.course_matches_modality(c, needle));
        }
        if let Some(needle) = needles.course.as_deref() {
            narrowed.retain_courses(|c| self.course_matches_name(c, needle));
        }

        (!narrowed.cursos.is_empty()).then_some(narrowed)
    }
}
