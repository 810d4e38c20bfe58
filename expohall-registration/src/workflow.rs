//! Booth request workflow. A booth moves Free -> Requested on
//! submission, Requested -> Assigned on approval and Requested -> Free
//! on cancellation; assignments are permanent.

use chrono::Utc;
use expohall_catalog::booths::{self, LedgerError};
use expohall_catalog::expo::{BoothRequest, ExhibitorProfile, Expo, RequestStatus};
use expohall_core::identity::ExhibitorId;
use expohall_core::pii::Masked;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Booth {0} is already requested by another exhibitor")]
    AlreadyRequested(u32),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Exhibitor request not found")]
    RequestNotFound,
}

/// Business profile submitted alongside a booth request.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub products_services: String,
    pub documents: String,
}

impl ApplicationDraft {
    fn validate(&self) -> Result<(), WorkflowError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("companyName", &self.company_name),
            ("productsServices", &self.products_services),
            ("documents", &self.documents),
        ] {
            if value.trim().is_empty() {
                return Err(WorkflowError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// True when any pending or approved request already claims the booth.
/// Rejected requests do not count; their booth went back to Free.
pub fn has_active_request(expo: &Expo, booth_number: u32) -> bool {
    expo.booth_requests
        .iter()
        .any(|r| r.booth_number == booth_number && r.status.is_active())
}

fn check_booth_free(expo: &Expo, booth_number: u32) -> Result<(), WorkflowError> {
    booths::check_range(expo, booth_number)?;
    if booths::is_assigned(expo, booth_number) {
        return Err(LedgerError::AlreadyAssigned(booth_number).into());
    }
    if has_active_request(expo, booth_number) {
        return Err(WorkflowError::AlreadyRequested(booth_number));
    }
    Ok(())
}

/// Free -> Requested. All three conflict checks run before the request
/// list is touched.
pub fn submit_booth_request(
    expo: &mut Expo,
    booth_number: u32,
    exhibitor: ExhibitorId,
) -> Result<BoothRequest, WorkflowError> {
    check_booth_free(expo, booth_number)?;
    let request = BoothRequest {
        id: Uuid::new_v4(),
        booth_number,
        exhibitor,
        application_id: None,
        status: RequestStatus::Pending,
        requested_at: Utc::now(),
    };
    expo.booth_requests.push(request.clone());
    Ok(request)
}

/// Records an exhibitor application and its linked booth request as
/// one mutation. Any failed check leaves the expo untouched.
pub fn submit_application(
    expo: &mut Expo,
    draft: ApplicationDraft,
    booth_number: u32,
    exhibitor: ExhibitorId,
) -> Result<(ExhibitorProfile, BoothRequest), WorkflowError> {
    draft.validate()?;
    check_booth_free(expo, booth_number)?;
    let profile = ExhibitorProfile {
        id: Uuid::new_v4(),
        name: draft.name,
        email: Masked(draft.email),
        company_name: draft.company_name,
        products_services: draft.products_services,
        documents: draft.documents,
    };
    let request = BoothRequest {
        id: Uuid::new_v4(),
        booth_number,
        exhibitor,
        application_id: Some(profile.id),
        status: RequestStatus::Pending,
        requested_at: Utc::now(),
    };
    expo.exhibitor_requests.push(profile.clone());
    expo.booth_requests.push(request.clone());
    Ok((profile, request))
}

/// What an approval produced: the confirmed profile, and the booth
/// that was assigned when a linked pending request existed.
#[derive(Debug, Clone)]
pub struct Approval {
    pub profile: ExhibitorProfile,
    pub assigned_booth: Option<u32>,
}

/// Moves the application from pending to confirmed. A pending booth
/// request linked to it becomes an assignment and leaves the request
/// list; an application without one is approved on its own.
///
/// First approval wins: if the linked booth was assigned in the
/// meantime, the whole approval fails and the aggregate is unchanged.
pub fn approve_exhibitor(expo: &mut Expo, request_id: Uuid) -> Result<Approval, WorkflowError> {
    let idx = expo
        .exhibitor_requests
        .iter()
        .position(|p| p.id == request_id)
        .ok_or(WorkflowError::RequestNotFound)?;

    let linked = expo
        .booth_requests
        .iter()
        .find(|r| r.application_id == Some(request_id) && r.status == RequestStatus::Pending)
        .map(|r| (r.id, r.booth_number, r.exhibitor));

    if let Some((_, booth_number, _)) = linked {
        if booths::is_assigned(expo, booth_number) {
            return Err(LedgerError::AlreadyAssigned(booth_number).into());
        }
    }

    let profile = expo.exhibitor_requests.remove(idx);
    expo.exhibitors.push(profile.clone());

    let assigned_booth = match linked {
        Some((linked_id, booth_number, exhibitor)) => {
            booths::assign(expo, booth_number, exhibitor)?;
            expo.booth_requests.retain(|r| r.id != linked_id);
            Some(booth_number)
        }
        None => None,
    };

    Ok(Approval {
        profile,
        assigned_booth,
    })
}

/// Drops the pending application. Any linked booth request stays
/// pending and keeps holding its booth; freeing it is the caller's
/// explicit follow-up via [`cancel_booth_request`].
pub fn reject_exhibitor(expo: &mut Expo, request_id: Uuid) -> Result<ExhibitorProfile, WorkflowError> {
    let idx = expo
        .exhibitor_requests
        .iter()
        .position(|p| p.id == request_id)
        .ok_or(WorkflowError::RequestNotFound)?;
    Ok(expo.exhibitor_requests.remove(idx))
}

/// Requested -> Free. Removes the pending request linked to an
/// application so its booth number can be requested again. Returns
/// `None` when no such request exists.
pub fn cancel_booth_request(expo: &mut Expo, application_id: Uuid) -> Option<BoothRequest> {
    let idx = expo.booth_requests.iter().position(|r| {
        r.application_id == Some(application_id) && r.status == RequestStatus::Pending
    })?;
    Some(expo.booth_requests.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use expohall_catalog::expo::ExpoDraft;

    fn expo(capacity: u32) -> Expo {
        Expo::new(ExpoDraft {
            title: "TechFair 2026".to_string(),
            image_url: "https://cdn.example.com/techfair.png".to_string(),
            date: "2026-09-12T09:00:00Z".parse().unwrap(),
            location: "Hall 7".to_string(),
            description: "Annual technology showcase".to_string(),
            booth_capacity: capacity,
        })
        .unwrap()
    }

    fn anyone() -> ExhibitorId {
        ExhibitorId::new(Uuid::new_v4())
    }

    fn draft() -> ApplicationDraft {
        ApplicationDraft {
            name: "Lin".to_string(),
            email: "lin@loop.io".to_string(),
            company_name: "Loop Robotics".to_string(),
            products_services: "Warehouse robots".to_string(),
            documents: "https://docs.example.com/loop.pdf".to_string(),
        }
    }

    #[test]
    fn submission_creates_a_pending_request() {
        let mut expo = expo(5);
        let request = submit_booth_request(&mut expo, 3, anyone()).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.application_id, None);
        assert_eq!(expo.booth_requests.len(), 1);
        // A pending request holds the booth but does not assign it.
        assert_eq!(booths::available_booths(&expo), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn second_request_for_the_same_booth_conflicts() {
        let mut expo = expo(5);
        submit_booth_request(&mut expo, 1, anyone()).unwrap();
        let err = submit_booth_request(&mut expo, 1, anyone()).unwrap_err();
        assert_eq!(err, WorkflowError::AlreadyRequested(1));
        assert_eq!(expo.booth_requests.len(), 1);
    }

    #[test]
    fn out_of_range_request_is_rejected_before_any_mutation() {
        let mut expo = expo(3);
        let err = submit_booth_request(&mut expo, 7, anyone()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Ledger(LedgerError::OutOfRange {
                requested: 7,
                capacity: 3
            })
        );
        assert!(expo.booth_requests.is_empty());
    }

    #[test]
    fn application_links_profile_and_request() {
        let mut expo = expo(3);
        let (profile, request) = submit_application(&mut expo, draft(), 2, anyone()).unwrap();
        assert_eq!(request.application_id, Some(profile.id));
        assert_eq!(expo.exhibitor_requests.len(), 1);
        assert_eq!(expo.booth_requests.len(), 1);
    }

    #[test]
    fn application_with_blank_company_is_rejected_atomically() {
        let mut expo = expo(3);
        let mut d = draft();
        d.company_name = "  ".to_string();
        let err = submit_application(&mut expo, d, 2, anyone()).unwrap_err();
        assert_eq!(err, WorkflowError::MissingField("companyName"));
        assert!(expo.exhibitor_requests.is_empty());
        assert!(expo.booth_requests.is_empty());
    }

    #[test]
    fn approval_assigns_the_linked_booth() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 2, anyone()).unwrap();
        let approval = approve_exhibitor(&mut expo, profile.id).unwrap();

        assert_eq!(approval.assigned_booth, Some(2));
        assert_eq!(booths::available_booths(&expo), vec![1, 3]);
        assert!(expo.booth_requests.is_empty());
        assert!(expo.exhibitor_requests.is_empty());
        assert_eq!(expo.exhibitors.len(), 1);
        assert_eq!(expo.exhibitors[0].id, profile.id);
    }

    #[test]
    fn approval_without_a_linked_request_confirms_the_profile_only() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 2, anyone()).unwrap();
        cancel_booth_request(&mut expo, profile.id).unwrap();

        let approval = approve_exhibitor(&mut expo, profile.id).unwrap();
        assert_eq!(approval.assigned_booth, None);
        assert!(expo.assigned_booths.is_empty());
        assert_eq!(expo.exhibitors.len(), 1);
    }

    #[test]
    fn approving_an_unknown_application_fails() {
        let mut expo = expo(3);
        let err = approve_exhibitor(&mut expo, Uuid::new_v4()).unwrap_err();
        assert_eq!(err, WorkflowError::RequestNotFound);
    }

    #[test]
    fn approval_loses_to_an_existing_assignment() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 2, anyone()).unwrap();
        booths::assign(&mut expo, 2, anyone()).unwrap();

        let err = approve_exhibitor(&mut expo, profile.id).unwrap_err();
        assert_eq!(err, WorkflowError::Ledger(LedgerError::AlreadyAssigned(2)));
        // Losing the race must not half-approve the application.
        assert_eq!(expo.exhibitor_requests.len(), 1);
        assert!(expo.exhibitors.is_empty());
    }

    #[test]
    fn rejection_leaves_the_linked_request_pending() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 1, anyone()).unwrap();
        reject_exhibitor(&mut expo, profile.id).unwrap();

        assert!(expo.exhibitor_requests.is_empty());
        assert_eq!(expo.booth_requests.len(), 1);
        // The booth is still held against new submissions.
        let err = submit_booth_request(&mut expo, 1, anyone()).unwrap_err();
        assert_eq!(err, WorkflowError::AlreadyRequested(1));
    }

    #[test]
    fn cancellation_frees_the_booth_for_a_new_request() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 1, anyone()).unwrap();
        reject_exhibitor(&mut expo, profile.id).unwrap();
        let cancelled = cancel_booth_request(&mut expo, profile.id).unwrap();

        assert_eq!(cancelled.booth_number, 1);
        assert!(expo.booth_requests.is_empty());
        assert!(submit_booth_request(&mut expo, 1, anyone()).is_ok());
    }

    #[test]
    fn cancelling_twice_is_a_noop() {
        let mut expo = expo(3);
        let (profile, _) = submit_application(&mut expo, draft(), 1, anyone()).unwrap();
        assert!(cancel_booth_request(&mut expo, profile.id).is_some());
        assert!(cancel_booth_request(&mut expo, profile.id).is_none());
    }

    #[test]
    fn rejected_booth_stays_free_after_re_request() {
        let mut expo = expo(3);
        let (first, _) = submit_application(&mut expo, draft(), 1, anyone()).unwrap();
        reject_exhibitor(&mut expo, first.id).unwrap();
        cancel_booth_request(&mut expo, first.id).unwrap();

        let (second, _) = submit_application(&mut expo, draft(), 1, anyone()).unwrap();
        let approval = approve_exhibitor(&mut expo, second.id).unwrap();
        assert_eq!(approval.assigned_booth, Some(1));
    }
}
