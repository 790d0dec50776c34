use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::modality::Modality;

/// Institution identifier as scraped: some dumps carry numbers, others strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstitutionId {
    Number(i64),
    Text(String),
}

/// Seat count as scraped (40, -1, 40.0, "40" or free text such as "a definir").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeatCount {
    Number(Number),
    Text(String),
}

// Scraped scalars drift between strings and numbers across runs. These helpers
// keep the value when it can be read as text and drop it otherwise, so one odd
// field never costs the whole record.

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<InstitutionId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(
            n.as_i64()
                .map(InstitutionId::Number)
                .unwrap_or_else(|| InstitutionId::Text(n.to_string())),
        ),
        Value::String(s) => Some(InstitutionId::Text(s)),
        _ => None,
    })
}

fn lenient_seats<'de, D>(deserializer: D) -> Result<Option<SeatCount>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(SeatCount::Number(n)),
        Value::String(s) => Some(SeatCount::Text(s)),
        _ => None,
    })
}

/// One structured course entry of a raw record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCourse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub periodo: Option<String>,
    #[serde(default, deserialize_with = "lenient_seats")]
    pub vagas: Option<SeatCount>,
}

impl RawCourse {
    pub fn named(nome: impl Into<String>) -> Self {
        Self {
            nome: Some(nome.into()),
            ..Default::default()
        }
    }
}

/// The two course shapes found across scrape runs, resolved once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CourseListing {
    /// `cursos: [{ nome, link, periodo, vagas }]`
    Structured(Vec<RawCourse>),
    /// `cursos_oferecidos: ["nome", ...]`
    FlatNames(Vec<String>),
    #[default]
    Absent,
}

impl CourseListing {
    /// Project either shape into structured courses; flat names carry only a name.
    pub fn to_courses(&self) -> Vec<RawCourse> {
        match self {
            CourseListing::Structured(courses) => courses.clone(),
            CourseListing::FlatNames(names) => names.iter().map(RawCourse::named).collect(),
            CourseListing::Absent => Vec::new(),
        }
    }
}

/// `cursos` holds objects in most dumps and bare names in some. A list of
/// only names stays flat; objects and names mixed become structured courses.
/// Entries of any other type are dropped, as is a `cursos` that is not a list.
fn lenient_courses<'de, D>(deserializer: D) -> Result<Option<CourseListing>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    if items.iter().all(|item| item.is_string() || item.is_number()) && !items.is_empty() {
        return Ok(Some(CourseListing::FlatNames(
            items.into_iter().filter_map(scalar_text).collect(),
        )));
    }

    let courses = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(_) => serde_json::from_value::<RawCourse>(item).ok(),
            other => scalar_text(other).map(RawCourse::named),
        })
        .collect();
    Ok(Some(CourseListing::Structured(courses)))
}

fn lenient_names<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(scalar_text).collect()),
        _ => None,
    })
}

/// Wire shape of one element of the scraped JSON array
#[derive(Debug, Clone, Default, Deserialize)]
struct RawInstitutionRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<InstitutionId>,
    #[serde(default, deserialize_with = "lenient_string")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    endereco: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cep: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cidade: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    estado: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    telefone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    site: Option<String>,
    #[serde(default, deserialize_with = "lenient_courses")]
    cursos: Option<CourseListing>,
    #[serde(default, deserialize_with = "lenient_names")]
    cursos_oferecidos: Option<Vec<String>>,
}

/// One scraped institution ("ETEC"), immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawInstitutionRecord")]
pub struct RawInstitution {
    pub name: Option<String>,
    pub id: Option<InstitutionId>,
    pub link: Option<String>,
    pub endereco: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub site: Option<String>,
    pub courses: CourseListing,
}

impl From<RawInstitutionRecord> for RawInstitution {
    fn from(record: RawInstitutionRecord) -> Self {
        let courses = match (record.cursos, record.cursos_oferecidos) {
            (Some(listing), _) => listing,
            (None, Some(names)) => CourseListing::FlatNames(names),
            (None, None) => CourseListing::Absent,
        };

        Self {
            name: record.name,
            id: record.id,
            link: record.link,
            endereco: record.endereco,
            cep: record.cep,
            cidade: record.cidade,
            estado: record.estado,
            telefone: record.telefone,
            email: record.email,
            site: record.site,
            courses,
        }
    }
}

/// Public shape of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedCourse {
    pub nome: Option<String>,
    pub link: Option<String>,
    pub periodo: Option<String>,
    pub vagas: Option<SeatCount>,
    pub modalidade: Modality,
}

/// Public shape of an institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedInstitution {
    pub name: String,
    pub id: Option<InstitutionId>,
    pub link: Option<String>,
    pub endereco: Option<String>,
    pub cep: Option<String>,
    /// City after the correction table was applied
    pub cidade: Option<String>,
    /// City exactly as scraped
    #[serde(rename = "cidadeOriginal")]
    pub cidade_original: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "totalCursos")]
    pub total_cursos: usize,
    pub cursos: Vec<FormattedCourse>,
}

impl FormattedInstitution {
    /// Keep only the courses matching `keep`, re-deriving the course count.
    pub fn retain_courses<F>(&mut self, keep: F)
    where
        F: FnMut(&FormattedCourse) -> bool,
    {
        self.cursos.retain(keep);
        self.total_cursos = self.cursos.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_courses() {
        let raw: RawInstitution = serde_json::from_value(json!({
            "name": "Etec de Campinas",
            "id": 12,
            "cidade": "Campinas",
            "cursos": [
                { "nome": "Técnico em Informática", "periodo": "Noite", "vagas": 40 },
                { "nome": "Ensino Médio", "vagas": "a definir" }
            ]
        }))
        .unwrap();

        assert_eq!(raw.id, Some(InstitutionId::Number(12)));
        match &raw.courses {
            CourseListing::Structured(courses) => {
                assert_eq!(courses.len(), 2);
                assert_eq!(courses[0].vagas, Some(SeatCount::Number(40.into())));
                assert_eq!(courses[1].vagas, Some(SeatCount::Text("a definir".into())));
                assert_eq!(courses[1].link, None);
            }
            other => panic!("expected structured courses, got {other:?}"),
        }
    }

    #[test]
    fn test_flat_course_names() {
        let raw: RawInstitution = serde_json::from_value(json!({
            "name": "Etec Flat",
            "cursos_oferecidos": ["Técnico em Química", "Ensino Médio"]
        }))
        .unwrap();

        assert_eq!(
            raw.courses,
            CourseListing::FlatNames(vec!["Técnico em Química".into(), "Ensino Médio".into()])
        );
        let projected = raw.courses.to_courses();
        assert_eq!(projected[0], RawCourse::named("Técnico em Química"));
    }

    #[test]
    fn test_cursos_as_name_list() {
        let raw: RawInstitution = serde_json::from_value(json!({
            "cursos": ["Técnico em Química"]
        }))
        .unwrap();
        assert_eq!(raw.courses, CourseListing::FlatNames(vec!["Técnico em Química".into()]));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let raw: RawInstitution = serde_json::from_value(json!({
            "name": null,
            "cursos": null,
            "id": "etec-001"
        }))
        .unwrap();

        assert_eq!(raw.name, None);
        assert_eq!(raw.id, Some(InstitutionId::Text("etec-001".into())));
        assert_eq!(raw.courses, CourseListing::Absent);
        assert!(raw.courses.to_courses().is_empty());
    }

    #[test]
    fn test_formatted_json_keys() {
        let institution = FormattedInstitution {
            name: "Etec X".into(),
            id: None,
            link: None,
            endereco: None,
            cep: None,
            cidade: Some("são paulo".into()),
            cidade_original: Some("Mooca".into()),
            estado: None,
            telefone: None,
            email: None,
            site: None,
            total_cursos: 0,
            cursos: Vec::new(),
        };
        let value = serde_json::to_value(&institution).unwrap();
        assert_eq!(value["cidadeOriginal"], "Mooca");
        assert_eq!(value["totalCursos"], 0);
        assert!(value["cursos"].as_array().unwrap().is_empty());
    }
}
