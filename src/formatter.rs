use crate::cities::CityCorrector;
use crate::domain::{FormattedCourse, FormattedInstitution, RawCourse, RawInstitution};
use crate::modality::ModalityClassifier;

/// Turns raw scraped records into the public output shape.
#[derive(Debug, Clone, Default)]
pub struct RecordFormatter {
    corrector: CityCorrector,
    classifier: ModalityClassifier,
}

impl RecordFormatter {
    pub fn new(corrector: CityCorrector, classifier: ModalityClassifier) -> Self {
        Self {
            corrector,
            classifier,
        }
    }

    pub fn format(&self, raw: &RawInstitution) -> FormattedInstitution {
        let cursos: Vec<FormattedCourse> = raw
            .courses
            .to_courses()
            .into_iter()
            .map(|course| self.format_course(course))
            .collect();

        FormattedInstitution {
            // A missing name still has to sort and search
            name: raw.name.clone().unwrap_or_default(),
            id: raw.id.clone(),
            link: raw.link.clone(),
            endereco: raw.endereco.clone(),
            cep: raw.cep.clone(),
            cidade: raw.cidade.as_deref().map(|c| self.corrector.correct(c)),
            cidade_original: raw.cidade.clone(),
            estado: raw.estado.clone(),
            telefone: raw.telefone.clone(),
            email: raw.email.clone(),
            site: raw.site.clone(),
            total_cursos: cursos.len(),
            cursos,
        }
    }

    fn format_course(&self, course: RawCourse) -> FormattedCourse {
        let modalidade = self.classifier.classify(course.nome.as_deref().unwrap_or_default());
        FormattedCourse {
            nome: course.nome,
            link: course.link,
            periodo: course.periodo,
            vagas: course.vagas,
            modalidade,
        }
    }

    pub fn corrector(&self) -> &CityCorrector {
        &self.corrector
    }

    pub fn classifier(&self) -> &ModalityClassifier {
        &self.classifier
    }
}
