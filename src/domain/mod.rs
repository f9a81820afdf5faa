//! The entity graph.
//!
//! Entities never hold live references to each other; every association is an
//! opaque id (or id set) resolved through the repository layer. Identity is a
//! server-assigned numeric id: two instances are equal iff both ids are
//! present and match, so an unsaved instance is never equal to anything,
//! including another unsaved instance.

pub mod country;
pub mod department;
pub mod employee;
pub mod job;
pub mod job_history;
pub mod location;
pub mod region;
pub mod task;
pub mod user;

pub use country::Country;
pub use department::Department;
pub use employee::Employee;
pub use job::Job;
pub use job_history::{JobHistory, Language};
pub use location::Location;
pub use region::Region;
pub use task::Task;
pub use user::{Authority, User};

/// Identity-based equality: equal iff both ids are present and match.
/// Not `Eq`: an instance without an id is not even equal to itself.
macro_rules! identity_eq {
    ($entity:ty) => {
        impl PartialEq for $entity {
            fn eq(&self, other: &Self) -> bool {
                match (self.id, other.id) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }
    };
}

pub(crate) use identity_eq;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_with_matching_ids_are_equal() {
        let a = Region {
            id: Some(1),
            region_name: Some("Europe".into()),
        };
        let b = Region {
            id: Some(1),
            region_name: Some("EMEA".into()),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn entities_with_different_ids_are_not_equal() {
        let a = Region {
            id: Some(1),
            region_name: None,
        };
        let b = Region {
            id: Some(2),
            region_name: None,
        };
        assert_ne!(a, b);
    }

    #[test]
    fn unsaved_entities_are_never_equal() {
        let a = Region {
            id: None,
            region_name: Some("Europe".into()),
        };
        let b = Region {
            id: None,
            region_name: Some("Europe".into()),
        };
        assert_ne!(a, b);
        // not even to themselves
        assert_ne!(a, a.clone());
    }
}
