//! Display-safe responses for the embedded terminals. The 16-character cap
//! is a hard device constraint; lines are truncated, never negotiated.

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::enums::RecordType;

pub const DISPLAY_WIDTH: usize = 16;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceFeedback {
    pub request_id: Option<String>,
    #[schema(example = "Ola, Ana")]
    pub line1: String,
    #[schema(example = "Entrada 08:02")]
    pub line2: String,
    #[schema(example = "green")]
    pub led_color: String,
    pub buzzer_pattern: u8,
    pub buzzer_duration_ms: u32,
}

/// Cap at the display width on char boundaries; Portuguese accents must not
/// split mid-codepoint.
pub fn truncate_line(text: &str) -> String {
    text.chars().take(DISPLAY_WIDTH).collect()
}

impl DeviceFeedback {
    pub fn punch_accepted(
        request_id: Option<String>,
        first_name: &str,
        record_type: RecordType,
        instant: NaiveDateTime,
    ) -> Self {
        Self {
            request_id,
            line1: truncate_line(&format!("Ola, {first_name}")),
            line2: truncate_line(&format!(
                "{} {}",
                record_type.display_label(),
                instant.format("%H:%M")
            )),
            led_color: "green".to_string(),
            buzzer_pattern: 1,
            buzzer_duration_ms: 500,
        }
    }

    pub fn rejected(request_id: Option<String>, message: &str) -> Self {
        Self {
            request_id,
            line1: truncate_line("Erro"),
            line2: truncate_line(message),
            led_color: "red".to_string(),
            buzzer_pattern: 2,
            buzzer_duration_ms: 1000,
        }
    }

    /// Internal failures never surface as protocol faults; the terminal
    /// always receives a well-formed payload.
    pub fn internal_error(request_id: Option<String>) -> Self {
        Self {
            request_id,
            line1: "Erro Interno".to_string(),
            line2: "Contate Admin".to_string(),
            led_color: "red".to_string(),
            buzzer_pattern: 2,
            buzzer_duration_ms: 1000,
        }
    }

    pub fn enroll_ok(request_id: Option<String>, sensor_index: i64) -> Self {
        Self {
            request_id,
            line1: truncate_line("Cadastro OK"),
            line2: truncate_line(&format!("ID: {sensor_index}")),
            led_color: "green".to_string(),
            buzzer_pattern: 1,
            buzzer_duration_ms: 500,
        }
    }

    pub fn enroll_failed(request_id: Option<String>, message: &str) -> Self {
        Self {
            request_id,
            line1: truncate_line("Erro Cadastro"),
            line2: truncate_line(message),
            led_color: "red".to_string(),
            buzzer_pattern: 2,
            buzzer_duration_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn lines_never_exceed_the_display_width() {
        let feedback = DeviceFeedback::rejected(None, "Biometria não cadastrada");
        assert_eq!(feedback.line2.chars().count(), DISPLAY_WIDTH);
        assert_eq!(feedback.line2, "Biometria não ca");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let line = truncate_line("ááááááááááááááááááá");
        assert_eq!(line.chars().count(), DISPLAY_WIDTH);
    }

    #[test]
    fn accepted_punch_greets_and_shows_the_time() {
        let instant = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 2, 0)
            .unwrap();
        let feedback =
            DeviceFeedback::punch_accepted(Some("r1".into()), "Ana", RecordType::Entry, instant);

        assert_eq!(feedback.line1, "Ola, Ana");
        assert_eq!(feedback.line2, "Entrada 08:02");
        assert_eq!(feedback.led_color, "green");
    }

    #[test]
    fn long_names_are_cut_at_the_display_width() {
        let instant = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 2, 0)
            .unwrap();
        let feedback = DeviceFeedback::punch_accepted(
            None,
            "Maximiliano Albuquerque",
            RecordType::Exit,
            instant,
        );

        assert_eq!(feedback.line1.chars().count(), DISPLAY_WIDTH);
        assert!(feedback.line1.starts_with("Ola, Maximilian"));
    }
}
