use chrono::{DateTime, Utc};
use expohall_core::identity::ExhibitorId;
use expohall_core::pii::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a booth request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Pending and approved requests both hold their booth number
    /// against new submissions.
    pub fn is_active(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }
}

/// A confirmed booth grant. Lives in the aggregate's assignment set,
/// which only the ledger mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothAssignment {
    pub booth_number: u32,
    pub exhibitor: ExhibitorId,
}

/// An exhibitor's claim on a booth number, waiting for an organizer
/// decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothRequest {
    pub id: Uuid,
    pub booth_number: u32,
    pub exhibitor: ExhibitorId,
    /// Links the request to the exhibitor application submitted with
    /// it; approval resolves the pending request through this id.
    pub application_id: Option<Uuid>,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
}

/// Business profile attached to an exhibitor application. Moves from
/// the pending list to the confirmed list on approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    pub company_name: String,
    pub products_services: String,
    pub documents: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub name: String,
    pub email: Masked<String>,
}

/// One expo and everything it owns. Booths, requests, exhibitors and
/// the attendee roster all live inside this document so that a single
/// versioned write covers every cross-field invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expo {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    /// Number of booths on the floor; booth numbers run 1..=capacity.
    pub booth_capacity: u32,
    pub time: Option<String>,
    pub speaker: Option<String>,
    #[serde(default)]
    pub assigned_booths: Vec<BoothAssignment>,
    #[serde(default)]
    pub booth_requests: Vec<BoothRequest>,
    /// Exhibitor applications awaiting an organizer decision.
    #[serde(default)]
    pub exhibitor_requests: Vec<ExhibitorProfile>,
    /// Approved exhibitors.
    #[serde(default)]
    pub exhibitors: Vec<ExhibitorProfile>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// Client-supplied fields for creating or updating an expo.
#[derive(Debug, Clone)]
pub struct ExpoDraft {
    pub title: String,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub booth_capacity: u32,
}

/// Schedule fields announced closer to the event date.
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub title: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub speaker: String,
    pub location: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpoError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Booth capacity must be at least 1")]
    ZeroCapacity,
    #[error("Booth capacity cannot change while booths are assigned")]
    CapacityLocked,
    #[error("Booth capacity cannot drop below requested booth {0}")]
    CapacityBelowRequest(u32),
}

fn required(field: &'static str, value: &str) -> Result<(), ExpoError> {
    if value.trim().is_empty() {
        return Err(ExpoError::MissingField(field));
    }
    Ok(())
}

impl Expo {
    /// Validates the draft and builds a fresh expo with empty booth
    /// and roster state. Schedule details start unannounced.
    pub fn new(draft: ExpoDraft) -> Result<Self, ExpoError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title,
            image_url: draft.image_url,
            date: draft.date,
            location: draft.location,
            description: draft.description,
            booth_capacity: draft.booth_capacity,
            time: None,
            speaker: None,
            assigned_booths: Vec::new(),
            booth_requests: Vec::new(),
            exhibitor_requests: Vec::new(),
            exhibitors: Vec::new(),
            attendees: Vec::new(),
        })
    }

    /// Replaces the descriptive fields. Capacity changes are refused
    /// while booths are assigned, and can never strand an active
    /// request beyond the new range.
    pub fn apply_update(&mut self, draft: &ExpoDraft) -> Result<(), ExpoError> {
        draft.validate()?;
        if draft.booth_capacity != self.booth_capacity {
            if !self.assigned_booths.is_empty() {
                return Err(ExpoError::CapacityLocked);
            }
            if let Some(stranded) = self
                .booth_requests
                .iter()
                .filter(|r| r.status.is_active() && r.booth_number > draft.booth_capacity)
                .map(|r| r.booth_number)
                .max()
            {
                return Err(ExpoError::CapacityBelowRequest(stranded));
            }
        }
        self.title = draft.title.clone();
        self.image_url = draft.image_url.clone();
        self.date = draft.date;
        self.location = draft.location.clone();
        self.description = draft.description.clone();
        self.booth_capacity = draft.booth_capacity;
        Ok(())
    }

    /// Announces or revises the public schedule.
    pub fn set_schedule(&mut self, draft: &ScheduleDraft) -> Result<(), ExpoError> {
        required("title", &draft.title)?;
        required("time", &draft.time)?;
        required("speaker", &draft.speaker)?;
        required("location", &draft.location)?;
        self.title = draft.title.clone();
        self.date = draft.date;
        self.time = Some(draft.time.clone());
        self.speaker = Some(draft.speaker.clone());
        self.location = draft.location.clone();
        Ok(())
    }
}

impl ExpoDraft {
    pub fn validate(&self) -> Result<(), ExpoError> {
        required("title", &self.title)?;
        required("imageUrl", &self.image_url)?;
        required("location", &self.location)?;
        required("description", &self.description)?;
        if self.booth_capacity == 0 {
            return Err(ExpoError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpoDraft {
        ExpoDraft {
            title: "TechFair 2026".to_string(),
            image_url: "https://cdn.example.com/techfair.png".to_string(),
            date: "2026-09-12T09:00:00Z".parse().unwrap(),
            location: "Hall 7".to_string(),
            description: "Annual technology showcase".to_string(),
            booth_capacity: 5,
        }
    }

    #[test]
    fn new_expo_starts_with_empty_containers() {
        let expo = Expo::new(draft()).unwrap();
        assert!(expo.assigned_booths.is_empty());
        assert!(expo.booth_requests.is_empty());
        assert!(expo.attendees.is_empty());
        assert_eq!(expo.time, None);
        assert_eq!(expo.speaker, None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert_eq!(Expo::new(d).unwrap_err(), ExpoError::MissingField("title"));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut d = draft();
        d.booth_capacity = 0;
        assert_eq!(Expo::new(d).unwrap_err(), ExpoError::ZeroCapacity);
    }

    #[test]
    fn capacity_is_locked_once_booths_are_assigned() {
        let mut expo = Expo::new(draft()).unwrap();
        crate::booths::assign(&mut expo, 2, ExhibitorId::new(Uuid::new_v4())).unwrap();
        let mut d = draft();
        d.booth_capacity = 10;
        assert_eq!(expo.apply_update(&d).unwrap_err(), ExpoError::CapacityLocked);
    }

    #[test]
    fn capacity_cannot_strand_an_active_request() {
        let mut expo = Expo::new(draft()).unwrap();
        expo.booth_requests.push(BoothRequest {
            id: Uuid::new_v4(),
            booth_number: 4,
            exhibitor: ExhibitorId::new(Uuid::new_v4()),
            application_id: None,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
        });
        let mut d = draft();
        d.booth_capacity = 3;
        assert_eq!(
            expo.apply_update(&d).unwrap_err(),
            ExpoError::CapacityBelowRequest(4)
        );
        d.booth_capacity = 4;
        assert!(expo.apply_update(&d).is_ok());
    }

    #[test]
    fn update_leaves_booth_state_untouched() {
        let mut expo = Expo::new(draft()).unwrap();
        expo.attendees.push(Attendee {
            name: "Ada".to_string(),
            email: Masked("ada@example.com".to_string()),
        });
        let mut d = draft();
        d.title = "TechFair 2027".to_string();
        expo.apply_update(&d).unwrap();
        assert_eq!(expo.title, "TechFair 2027");
        assert_eq!(expo.attendees.len(), 1);
    }

    #[test]
    fn schedule_fills_in_time_and_speaker() {
        let mut expo = Expo::new(draft()).unwrap();
        expo.set_schedule(&ScheduleDraft {
            title: "TechFair 2026".to_string(),
            date: "2026-09-12T09:00:00Z".parse().unwrap(),
            time: "10:00".to_string(),
            speaker: "Grace Hopper".to_string(),
            location: "Hall 7".to_string(),
        })
        .unwrap();
        assert_eq!(expo.time.as_deref(), Some("10:00"));
        assert_eq!(expo.speaker.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn schedule_requires_every_field() {
        let mut expo = Expo::new(draft()).unwrap();
        let err = expo
            .set_schedule(&ScheduleDraft {
                title: "TechFair 2026".to_string(),
                date: Utc::now(),
                time: String::new(),
                speaker: "Grace Hopper".to_string(),
                location: "Hall 7".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, ExpoError::MissingField("time"));
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut expo = Expo::new(draft()).unwrap();
        expo.booth_requests.push(BoothRequest {
            id: Uuid::new_v4(),
            booth_number: 1,
            exhibitor: ExhibitorId::new(Uuid::new_v4()),
            application_id: Some(Uuid::new_v4()),
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
        });
        let doc = serde_json::to_value(&expo).unwrap();
        assert_eq!(doc["boothCapacity"], 5);
        assert_eq!(doc["boothRequests"][0]["status"], "PENDING");
        let back: Expo = serde_json::from_value(doc).unwrap();
        assert_eq!(back.booth_requests.len(), 1);
    }
}
