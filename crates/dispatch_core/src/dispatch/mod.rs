pub mod policy;
pub mod types;
pub mod lead_time;
pub mod score_based;

use bevy_ecs::prelude::Resource;

pub use lead_time::LeadTimeMatching;
pub use policy::AssignmentPolicy;
pub use score_based::ScoreBasedMatching;
pub use types::{Assignment, AssignmentOutcome, FreeVehicle};

/// Resource wrapper for the assignment policy trait object.
#[derive(Resource)]
pub struct AssignmentPolicyResource(pub Box<dyn AssignmentPolicy>);

impl AssignmentPolicyResource {
    pub fn new(policy: Box<dyn AssignmentPolicy>) -> Self {
        Self(policy)
    }
}

impl std::ops::Deref for AssignmentPolicyResource {
    type Target = dyn AssignmentPolicy;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
