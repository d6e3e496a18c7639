//! Principals and the manager-link forest.

use serde::{Deserialize, Serialize};

use meridian_core::{Entity, UserId};

/// A member of the organization, as the access core sees them.
///
/// `manager_id` is a weak back-reference into the same collection (the child
/// does not own the manager); a root principal carries `None`. The links
/// form a forest, but corrupt data may introduce cycles, so traversal never
/// follows links without a visited set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub manager_id: Option<UserId>,
    pub display_name: String,
}

impl Principal {
    pub fn new(id: UserId, manager_id: Option<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            manager_id,
            display_name: display_name.into(),
        }
    }

    pub fn reports_to(&self, manager: UserId) -> bool {
        self.manager_id == Some(manager)
    }
}

impl Entity for Principal {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
