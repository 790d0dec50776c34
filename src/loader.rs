use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::common::error::{CatalogError, Result};
use crate::domain::RawInstitution;

/// Read the scraped JSON array from disk.
pub fn load_institutions(path: impl AsRef<Path>) -> Result<Vec<RawInstitution>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        CatalogError::Config(format!("Failed to read data file '{}': {}", path.display(), e))
    })?;
    let institutions = parse_institutions(&content)?;
    info!(path = %path.display(), records = institutions.len(), "Loaded institution data");
    Ok(institutions)
}

/// Parse a JSON array of institution objects.
///
/// Only elements that are not objects are skipped. Inside an object, fields of
/// an unexpected type are read as absent rather than failing the record.
pub fn parse_institutions(content: &str) -> Result<Vec<RawInstitution>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(CatalogError::InvalidData {
            message: "expected a JSON array of institutions at the top level".to_string(),
        });
    };

    let total = items.len();
    let institutions: Vec<RawInstitution> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!(index, "Skipping institution record that is not an object");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(institution) => Some(institution),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed institution record");
                    None
                }
            }
        })
        .collect();

    if institutions.len() < total {
        warn!(skipped = total - institutions.len(), total, "Some institution records were skipped");
    }
    Ok(institutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseListing, InstitutionId, SeatCount};

    #[test]
    fn test_parse_skips_non_objects() {
        let content = r#"[
            { "name": "Etec A", "cidade": "Campinas" },
            "not an object",
            17,
            null,
            { "name": 42 },
            { "name": "Etec B", "cursos_oferecidos": ["Técnico em Química"] }
        ]"#;
        let institutions = parse_institutions(content).unwrap();
        assert_eq!(institutions.len(), 3);
        assert_eq!(institutions[0].name.as_deref(), Some("Etec A"));
        assert_eq!(institutions[1].name.as_deref(), Some("42"));
        assert_eq!(institutions[2].name.as_deref(), Some("Etec B"));
    }

    #[test]
    fn test_parse_keeps_records_with_odd_field_types() {
        let content = r#"[
            { "name": "Etec Cep", "cep": 1232010, "cidade": "Santos" },
            { "name": "Etec Telefone", "telefone": 1138261919, "email": false },
            { "name": "Etec Vagas", "cursos": [
                { "nome": "Técnico em Informática", "vagas": -1 },
                { "nome": "Técnico em Química", "vagas": 40.0 },
                { "nome": "Técnico em Nutrição", "vagas": [40] },
                "Ensino Médio",
                7
            ] },
            { "name": { "nested": true }, "id": 3.5, "cidade": ["Campinas"] },
            { "name": "Etec Valida", "id": 200, "cidade": "Campinas", "cursos": "nenhum" }
        ]"#;
        let institutions = parse_institutions(content).unwrap();
        assert_eq!(institutions.len(), 5);

        assert_eq!(institutions[0].cep.as_deref(), Some("1232010"));
        assert_eq!(institutions[0].cidade.as_deref(), Some("Santos"));

        assert_eq!(institutions[1].telefone.as_deref(), Some("1138261919"));
        assert_eq!(institutions[1].email, None);

        let courses = institutions[2].courses.to_courses();
        assert_eq!(courses.len(), 5);
        assert_eq!(courses[0].vagas, Some(SeatCount::Number((-1).into())));
        assert_eq!(
            courses[1].vagas,
            Some(SeatCount::Number(serde_json::Number::from_f64(40.0).unwrap()))
        );
        assert_eq!(courses[2].nome.as_deref(), Some("Técnico em Nutrição"));
        assert_eq!(courses[2].vagas, None);
        assert_eq!(courses[3].nome.as_deref(), Some("Ensino Médio"));
        assert_eq!(courses[4].nome.as_deref(), Some("7"));

        assert_eq!(institutions[3].name, None);
        assert_eq!(institutions[3].id, Some(InstitutionId::Text("3.5".into())));
        assert_eq!(institutions[3].cidade, None);

        assert_eq!(institutions[4].id, Some(InstitutionId::Number(200)));
        assert_eq!(institutions[4].courses, CourseListing::Absent);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_institutions(r#"{ "name": "Etec A" }"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidData { .. }));

        let err = parse_institutions("not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_institutions("[]").unwrap().is_empty());
    }
}
