use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{FormattedInstitution, RawInstitution};
use crate::filter::{QueryFilter, SearchCriteria};
use crate::formatter::RecordFormatter;
use crate::modality::Modality;

/// Aggregate figures over the whole catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    #[serde(rename = "totalEtecs")]
    pub total_institutions: usize,
    #[serde(rename = "totalCursos")]
    pub total_courses: usize,
    #[serde(rename = "totalCidades")]
    pub total_cities: usize,
    #[serde(rename = "cursosPorModalidade")]
    pub courses_by_modality: BTreeMap<Modality, usize>,
}

/// The formatted institution collection and its derived indexes.
///
/// Built once at startup and never mutated, so it can be shared behind an
/// `Arc` across request handlers without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    institutions: Vec<FormattedInstitution>,
    cities: Vec<String>,
    courses: Vec<String>,
    filter: QueryFilter,
}

impl Catalog {
    /// Format every raw record, sort by name and compute the indexes.
    ///
    /// Ordering ignores case and accents; ties fall back to the raw name.
    pub fn build(raw: &[RawInstitution], formatter: &RecordFormatter, filter: QueryFilter) -> Self {
        let normalizer = filter.normalizer();
        let mut keyed: Vec<(String, FormattedInstitution)> = raw
            .iter()
            .map(|r| formatter.format(r))
            .map(|f| (normalizer.normalize(&f.name), f))
            .collect();
        keyed.sort_by(|(ka, a), (kb, b)| ka.cmp(kb).then_with(|| a.name.cmp(&b.name)));
        let institutions: Vec<FormattedInstitution> = keyed.into_iter().map(|(_, f)| f).collect();

        let cities: BTreeSet<String> = institutions
            .iter()
            .filter_map(|i| i.cidade.as_deref())
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .collect();

        // de-duplication is by exact string, not by normalized form
        let courses: BTreeSet<String> = institutions
            .iter()
            .flat_map(|i| i.cursos.iter())
            .filter_map(|c| c.nome.clone())
            .collect();

        let catalog = Self {
            institutions,
            cities: cities.into_iter().collect(),
            courses: courses.into_iter().collect(),
            filter,
        };

        info!(
            institutions = catalog.institutions.len(),
            cities = catalog.cities.len(),
            courses = catalog.courses.len(),
            "Catalog built"
        );
        catalog
    }

    pub fn from_raw(raw: &[RawInstitution]) -> Self {
        Self::build(raw, &RecordFormatter::default(), QueryFilter::default())
    }

    pub fn institutions(&self) -> &[FormattedInstitution] {
        &self.institutions
    }

    pub fn names(&self) -> Vec<&str> {
        self.institutions.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn stats(&self) -> CatalogStats {
        let mut courses_by_modality = BTreeMap::new();
        for course in self.institutions.iter().flat_map(|i| i.cursos.iter()) {
            *courses_by_modality.entry(course.modalidade).or_insert(0) += 1;
        }

        CatalogStats {
            total_institutions: self.institutions.len(),
            total_courses: self.institutions.iter().map(|i| i.total_cursos).sum(),
            total_cities: self.cities.len(),
            courses_by_modality,
        }
    }

    pub fn search(&self, criteria: &SearchCriteria) -> Vec<FormattedInstitution> {
        let results = self.filter.apply(&self.institutions, criteria);
        debug!(?criteria, matches = results.len(), "Catalog search");
        results
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }
}
