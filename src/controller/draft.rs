use chrono::NaiveDate;

use crate::model::{ModelError, TaskFilters, TaskState};

/// Filter form as typed: raw strings, nothing validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    pub titulo: String,
    pub estado: String,
    pub prioridad: Option<bool>,
    pub categoria_id: String,
    pub fecha_desde: String,
    pub fecha_hasta: String,
}

impl FilterDraft {
    /// Converts the form into filters, dropping blank fields.
    pub fn parse(&self) -> Result<TaskFilters, ModelError> {
        Ok(TaskFilters {
            title: non_blank(&self.titulo).map(str::to_string),
            state: non_blank(&self.estado)
                .map(str::parse::<TaskState>)
                .transpose()?,
            priority: self.prioridad,
            categoria_id: non_blank(&self.categoria_id).map(str::to_string),
            date_from: parse_date(&self.fecha_desde)?,
            date_to: parse_date(&self.fecha_hasta)?,
        })
    }
}

/// The two filter slots: what the form shows and what the last search used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSlots {
    pub draft: FilterDraft,
    pub applied: TaskFilters,
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, ModelError> {
    non_blank(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ModelError::InvalidDate(raw.to_string()))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_draft_is_empty_filter_set() {
        let draft = FilterDraft {
            titulo: "  ".into(),
            ..Default::default()
        };
        assert!(draft.parse().unwrap().is_empty());
    }

    #[test]
    fn test_parse_filled_draft() {
        let draft = FilterDraft {
            titulo: " informe ".into(),
            estado: "completada".into(),
            prioridad: Some(true),
            categoria_id: "c1".into(),
            fecha_desde: "2024-03-01".into(),
            fecha_hasta: String::new(),
        };
        let filters = draft.parse().unwrap();
        assert_eq!(filters.title.as_deref(), Some("informe"));
        assert_eq!(filters.state, Some(TaskState::Completed));
        assert_eq!(filters.priority, Some(true));
        assert_eq!(filters.date_from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filters.date_to, None);
    }

    #[test]
    fn test_invalid_draft_values() {
        let draft = FilterDraft {
            estado: "hecha".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.parse().unwrap_err(),
            ModelError::UnknownState("hecha".into())
        );

        let draft = FilterDraft {
            fecha_hasta: "01/03/2024".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.parse().unwrap_err(),
            ModelError::InvalidDate("01/03/2024".into())
        );
    }
}
