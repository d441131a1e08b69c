use crate::api::types::PracticeRecap;

/// Where the current practice sits in its start/finish cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PracticePhase {
    #[default]
    NoSession,
    /// Start request in flight.
    Starting,
    Active,
    /// Finalize request in flight; the local descriptor is already gone.
    Ending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// Modal message; any key dismisses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub lines: Vec<String>,
}

impl Alert {
    pub fn info(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            title: title.into(),
            lines,
        }
    }

    pub fn error(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            lines,
        }
    }

    pub fn practice_finished(recap: Option<&PracticeRecap>) -> Self {
        let Some(recap) = recap else {
            return Self::info("Practice finished", vec!["Your practice was saved.".to_string()]);
        };
        let duration = recap
            .duracion
            .as_ref()
            .map(|d| d.display())
            .unwrap_or_else(|| "-".to_string());
        Self::info(
            "Practice finished",
            vec![
                format!("Language: {}", recap.idioma.to_uppercase()),
                format!("Level: {}", recap.nivel),
                format!("Duration: {duration}"),
                format!("Messages: {}", recap.total_mensajes),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RecapDuration;

    #[test]
    fn test_recap_alert_lists_totals() {
        let recap = PracticeRecap {
            idioma: "en".to_string(),
            nivel: "B1".to_string(),
            duracion: Some(RecapDuration::Minutes(15.0)),
            total_mensajes: 12,
        };
        let alert = Alert::practice_finished(Some(&recap));
        assert_eq!(alert.kind, AlertKind::Info);
        assert_eq!(
            alert.lines,
            vec!["Language: EN", "Level: B1", "Duration: 15 min", "Messages: 12"]
        );
    }

    #[test]
    fn test_recap_alert_without_totals() {
        let alert = Alert::practice_finished(None);
        assert_eq!(alert.title, "Practice finished");
        assert_eq!(alert.lines.len(), 1);
    }
}
