// Collaborator seams: notifications, submissions and the playground generator.

pub mod notify;
pub mod playground;
pub mod submission;
