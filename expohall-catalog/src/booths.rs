//! Booth ledger. Booth numbers run `1..=capacity`; a booth is either
//! assigned to exactly one exhibitor or available, and the two sets
//! always partition the declared capacity.

use crate::expo::{BoothAssignment, Expo};
use expohall_core::identity::ExhibitorId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Booth {requested} is out of range, this expo has booths 1 to {capacity}")]
    OutOfRange { requested: u32, capacity: u32 },
    #[error("Booth {0} is already assigned")]
    AlreadyAssigned(u32),
}

/// Booth numbers still open, in ascending order. Always recomputed
/// from the declared capacity, never from the size of any request
/// container.
pub fn available_booths(expo: &Expo) -> Vec<u32> {
    (1..=expo.booth_capacity)
        .filter(|n| !is_assigned(expo, *n))
        .collect()
}

pub fn is_assigned(expo: &Expo, booth_number: u32) -> bool {
    expo.assigned_booths
        .iter()
        .any(|a| a.booth_number == booth_number)
}

pub fn check_range(expo: &Expo, booth_number: u32) -> Result<(), LedgerError> {
    if booth_number < 1 || booth_number > expo.booth_capacity {
        return Err(LedgerError::OutOfRange {
            requested: booth_number,
            capacity: expo.booth_capacity,
        });
    }
    Ok(())
}

/// Sole mutator of the assignment set. Rejects numbers outside the
/// floor plan and booths already granted to someone else.
pub fn assign(
    expo: &mut Expo,
    booth_number: u32,
    exhibitor: ExhibitorId,
) -> Result<(), LedgerError> {
    check_range(expo, booth_number)?;
    if is_assigned(expo, booth_number) {
        return Err(LedgerError::AlreadyAssigned(booth_number));
    }
    expo.assigned_booths.push(BoothAssignment {
        booth_number,
        exhibitor,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expo::ExpoDraft;
    use uuid::Uuid;

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

    #[test]
    fn fresh_expo_has_every_booth_available() {
        let expo = expo(3);
        assert_eq!(available_booths(&expo), vec![1, 2, 3]);
    }

    #[test]
    fn assignment_removes_the_booth_from_the_available_set() {
        let mut expo = expo(3);
        assign(&mut expo, 2, anyone()).unwrap();
        assert_eq!(available_booths(&expo), vec![1, 3]);
        assert!(is_assigned(&expo, 2));
        assert!(!is_assigned(&expo, 1));
    }

    #[test]
    fn assigned_and_available_partition_the_capacity() {
        let mut expo = expo(6);
        assign(&mut expo, 5, anyone()).unwrap();
        assign(&mut expo, 1, anyone()).unwrap();
        let available = available_booths(&expo);
        let assigned: Vec<u32> = expo.assigned_booths.iter().map(|a| a.booth_number).collect();
        assert_eq!(available.len() + assigned.len(), 6);
        for n in &available {
            assert!(!assigned.contains(n));
        }
    }

    #[test]
    fn zero_and_past_capacity_are_out_of_range() {
        let mut expo = expo(3);
        assert_eq!(
            assign(&mut expo, 0, anyone()).unwrap_err(),
            LedgerError::OutOfRange {
                requested: 0,
                capacity: 3
            }
        );
        assert_eq!(
            assign(&mut expo, 4, anyone()).unwrap_err(),
            LedgerError::OutOfRange {
                requested: 4,
                capacity: 3
            }
        );
    }

    #[test]
    fn double_assignment_is_refused() {
        let mut expo = expo(3);
        assign(&mut expo, 1, anyone()).unwrap();
        assert_eq!(
            assign(&mut expo, 1, anyone()).unwrap_err(),
            LedgerError::AlreadyAssigned(1)
        );
        assert_eq!(expo.assigned_booths.len(), 1);
    }

    #[test]
    fn available_booths_stay_sorted() {
        let mut expo = expo(5);
        assign(&mut expo, 4, anyone()).unwrap();
        assign(&mut expo, 2, anyone()).unwrap();
        assert_eq!(available_booths(&expo), vec![1, 3, 5]);
    }
}
