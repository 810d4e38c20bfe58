use crate::booths;
use crate::expo::Expo;
use chrono::{DateTime, Utc};
use expohall_core::pii::Masked;
use serde::Serialize;
use uuid::Uuid;

/// Read model consumed by event listings and the concierge. Derived
/// on demand from the aggregate, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoOverview {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub time: Option<String>,
    pub speaker: Option<String>,
    pub booth_capacity: u32,
    pub assigned_booth_count: usize,
    pub available_booth_count: usize,
    pub attendee_count: usize,
    pub exhibitor_count: usize,
    pub pending_application_count: usize,
    pub exhibitors: Vec<ExhibitorSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitorSummary {
    pub name: String,
    pub company_name: String,
    pub email: Masked<String>,
}

impl ExpoOverview {
    pub fn project(expo: &Expo) -> Self {
        Self {
            id: expo.id,
            title: expo.title.clone(),
            date: expo.date,
            location: expo.location.clone(),
            description: expo.description.clone(),
            time: expo.time.clone(),
            speaker: expo.speaker.clone(),
            booth_capacity: expo.booth_capacity,
            assigned_booth_count: expo.assigned_booths.len(),
            available_booth_count: booths::available_booths(expo).len(),
            attendee_count: expo.attendees.len(),
            exhibitor_count: expo.exhibitors.len(),
            pending_application_count: expo.exhibitor_requests.len(),
            exhibitors: expo
                .exhibitors
                .iter()
                .map(|e| ExhibitorSummary {
                    name: e.name.clone(),
                    company_name: e.company_name.clone(),
                    email: e.email.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expo::{Attendee, ExhibitorProfile, ExpoDraft};
    use expohall_core::identity::ExhibitorId;

    #[test]
    fn counts_reflect_the_aggregate() {
        let mut expo = Expo::new(ExpoDraft {
            title: "TechFair 2026".to_string(),
            image_url: "https://cdn.example.com/techfair.png".to_string(),
            date: "2026-09-12T09:00:00Z".parse().unwrap(),
            location: "Hall 7".to_string(),
            description: "Annual technology showcase".to_string(),
            booth_capacity: 4,
        })
        .unwrap();
        booths::assign(&mut expo, 3, ExhibitorId::new(Uuid::new_v4())).unwrap();
        expo.attendees.push(Attendee {
            name: "Ada".to_string(),
            email: Masked("ada@example.com".to_string()),
        });
        expo.exhibitors.push(ExhibitorProfile {
            id: Uuid::new_v4(),
            name: "Lin".to_string(),
            email: Masked("lin@loop.io".to_string()),
            company_name: "Loop".to_string(),
            products_services: "Robotics".to_string(),
            documents: "https://docs.example.com/loop.pdf".to_string(),
        });

        let overview = ExpoOverview::project(&expo);
        assert_eq!(overview.assigned_booth_count, 1);
        assert_eq!(overview.available_booth_count, 3);
        assert_eq!(overview.attendee_count, 1);
        assert_eq!(overview.exhibitor_count, 1);
        assert_eq!(overview.exhibitors[0].company_name, "Loop");
    }
}
