//! Event concierge: answers natural-language questions about the
//! catalog from a fixed set of intents, computed over read-model
//! projections. Entirely deterministic, no model call behind it.

use axum::{extract::State, routing::post, Json, Router};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::response::Envelope;
use crate::state::AppState;
use expohall_catalog::projection::ExpoOverview;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ConciergePayload {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ConciergeReply {
    pub response: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/concierge", post(ask))
}

async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<ConciergePayload>,
) -> Result<Json<Envelope<ConciergeReply>>, AppError> {
    if payload.prompt.trim().is_empty() {
        return Err(AppError::ValidationError("Prompt is required".to_string()));
    }
    let expos = state.expos.list().await?;
    let overviews: Vec<ExpoOverview> = expos.iter().map(ExpoOverview::project).collect();
    let response = answer(&payload.prompt, &overviews);
    Ok(Envelope::ok("Prompt answered", ConciergeReply { response }))
}

// ============================================================================
// Intent Matching
// ============================================================================

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_name(month: u32) -> &'static str {
    MONTHS[(month as usize - 1) % 12]
}

/// First expo whose title appears in the prompt.
fn find_mentioned<'a>(prompt: &str, expos: &'a [ExpoOverview]) -> Option<&'a ExpoOverview> {
    expos
        .iter()
        .find(|e| prompt.contains(&e.title.to_lowercase()))
}

/// Routes the prompt through the intents in priority order. The order
/// matters: "who speaks at TechFair" must hit the speaker intent, not
/// the event-details intent further down.
pub fn answer(prompt: &str, expos: &[ExpoOverview]) -> String {
    let prompt = prompt.to_lowercase();

    // Speaker / host
    if prompt.contains("speaker") || prompt.contains("host") || prompt.contains("who is speaking")
    {
        return match find_mentioned(&prompt, expos) {
            Some(expo) => match &expo.speaker {
                Some(speaker) => format!("The speaker for {} is {}.", expo.title, speaker),
                None => format!(
                    "The speaker for {} is yet to be announced (TBD).",
                    expo.title
                ),
            },
            None => "Please mention the event name to get speaker details.".to_string(),
        };
    }

    // Booth availability
    if prompt.contains("available booth") || prompt.contains("booth availability") {
        return match find_mentioned(&prompt, expos) {
            Some(expo) => format!(
                "{} has {} of {} booths available.",
                expo.title, expo.available_booth_count, expo.booth_capacity
            ),
            None => "Please mention the event name to check booth availability.".to_string(),
        };
    }

    // Exhibitors
    if prompt.contains("exhibitor") {
        return match find_mentioned(&prompt, expos) {
            Some(expo) => {
                if expo.exhibitors.is_empty() {
                    format!("No exhibitors are confirmed yet for {}.", expo.title)
                } else {
                    let names: Vec<String> = expo
                        .exhibitors
                        .iter()
                        .map(|e| format!("{} ({})", e.name, e.company_name))
                        .collect();
                    format!(
                        "{} has {} confirmed exhibitor(s): {}.",
                        expo.title,
                        expo.exhibitors.len(),
                        names.join(", ")
                    )
                }
            }
            None => "Please mention the event name to list its exhibitors.".to_string(),
        };
    }

    // Attendees
    if prompt.contains("attendee") {
        return match find_mentioned(&prompt, expos) {
            Some(expo) => format!(
                "{} has {} registered attendee(s).",
                expo.title, expo.attendee_count
            ),
            None => "Please mention the event name to get attendee numbers.".to_string(),
        };
    }

    // Month filters: "this month", "next month" or an explicit name.
    let now = Utc::now();
    let month = if prompt.contains("this month") {
        Some(now.month())
    } else if prompt.contains("next month") {
        Some(now.month() % 12 + 1)
    } else {
        MONTHS
            .iter()
            .position(|m| prompt.contains(m))
            .map(|idx| idx as u32 + 1)
    };
    if let Some(month) = month {
        let matching: Vec<String> = expos
            .iter()
            .filter(|e| e.date.month() == month)
            .map(|e| {
                format!(
                    "{} on {} at {}",
                    e.title,
                    e.date.format("%Y-%m-%d"),
                    e.location
                )
            })
            .collect();
        return if matching.is_empty() {
            format!("No events are scheduled in {}.", month_name(month))
        } else {
            format!("Events in {}: {}.", month_name(month), matching.join("; "))
        };
    }

    // Location
    if let Some(expo) = expos
        .iter()
        .find(|e| prompt.contains(&e.location.to_lowercase()))
    {
        let here: Vec<String> = expos
            .iter()
            .filter(|e| e.location == expo.location)
            .map(|e| format!("{} on {}", e.title, e.date.format("%Y-%m-%d")))
            .collect();
        return format!("Events at {}: {}.", expo.location, here.join("; "));
    }

    // Details for one named event
    if let Some(expo) = find_mentioned(&prompt, expos) {
        let time = expo.time.as_deref().unwrap_or("TBD");
        return format!(
            "{}: {} Taking place on {} at {}, time {}. {} of {} booths are still available.",
            expo.title,
            expo.description,
            expo.date.format("%Y-%m-%d"),
            expo.location,
            time,
            expo.available_booth_count,
            expo.booth_capacity
        );
    }

    // Catalog overview
    if prompt.contains("event") || prompt.contains("expo") || prompt.contains("show") {
        if expos.is_empty() {
            return "There are no events in the catalog yet.".to_string();
        }
        let listing: Vec<String> = expos
            .iter()
            .map(|e| format!("{} ({})", e.title, e.date.format("%Y-%m-%d")))
            .collect();
        return format!("Upcoming events: {}.", listing.join(", "));
    }

    "I can help with event schedules, speakers, booth availability, exhibitors and attendee \
     numbers. Try asking e.g. \"Which booths are available for TechFair?\""
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use expohall_catalog::booths;
    use expohall_catalog::expo::{Expo, ExpoDraft};
    use expohall_core::identity::ExhibitorId;
    use uuid::Uuid;

    fn catalog() -> Vec<ExpoOverview> {
        let mut techfair = Expo::new(ExpoDraft {
            title: "TechFair".to_string(),
            image_url: "https://cdn.example.com/techfair.png".to_string(),
            date: "2026-09-12T09:00:00Z".parse().unwrap(),
            location: "Hall 7".to_string(),
            description: "Annual technology showcase.".to_string(),
            booth_capacity: 4,
        })
        .unwrap();
        techfair.speaker = Some("Grace Hopper".to_string());
        booths::assign(&mut techfair, 1, ExhibitorId::new(Uuid::new_v4())).unwrap();

        let medexpo = Expo::new(ExpoDraft {
            title: "MedExpo".to_string(),
            image_url: "https://cdn.example.com/medexpo.png".to_string(),
            date: "2026-11-03T09:00:00Z".parse().unwrap(),
            location: "Riverside Center".to_string(),
            description: "Medical devices fair.".to_string(),
            booth_capacity: 10,
        })
        .unwrap();

        vec![
            ExpoOverview::project(&techfair),
            ExpoOverview::project(&medexpo),
        ]
    }

    #[test]
    fn names_the_speaker_when_announced() {
        let reply = answer("Who is the speaker at TechFair?", &catalog());
        assert_eq!(reply, "The speaker for TechFair is Grace Hopper.");
    }

    #[test]
    fn reports_tbd_speakers() {
        let reply = answer("who is hosting medexpo", &catalog());
        assert!(reply.contains("yet to be announced"));
    }

    #[test]
    fn speaker_intent_without_an_event_asks_for_one() {
        let reply = answer("who is the speaker?", &catalog());
        assert!(reply.contains("mention the event name"));
    }

    #[test]
    fn counts_available_booths() {
        let reply = answer("How many available booths does TechFair have?", &catalog());
        assert_eq!(reply, "TechFair has 3 of 4 booths available.");
    }

    #[test]
    fn lists_events_by_month() {
        let reply = answer("What events run in November?", &catalog());
        assert!(reply.contains("MedExpo"));
        assert!(!reply.contains("TechFair"));
    }

    #[test]
    fn reports_empty_months() {
        let reply = answer("anything happening in february?", &catalog());
        assert_eq!(reply, "No events are scheduled in february.");
    }

    #[test]
    fn lists_events_by_location() {
        let reply = answer("What is on at Riverside Center?", &catalog());
        assert!(reply.contains("MedExpo"));
    }

    #[test]
    fn gives_details_for_a_named_event() {
        let reply = answer("Tell me about TechFair", &catalog());
        assert!(reply.contains("Annual technology showcase."));
        assert!(reply.contains("Hall 7"));
    }

    #[test]
    fn lists_the_whole_catalog() {
        let reply = answer("which events are coming up?", &catalog());
        assert!(reply.contains("TechFair"));
        assert!(reply.contains("MedExpo"));
    }

    #[test]
    fn unknown_prompts_get_the_help_text() {
        let reply = answer("what is the meaning of life", &catalog());
        assert!(reply.contains("I can help with"));
    }

    #[test]
    fn exhibitor_intent_reports_empty_lists() {
        let reply = answer("which exhibitors are at techfair", &catalog());
        assert!(reply.contains("No exhibitors are confirmed yet"));
    }
}
