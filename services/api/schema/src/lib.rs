//! sea-orm entities for the Skillshare database.

pub mod feedback;
pub mod notifications;
pub mod session_participants;
pub mod sessions;
pub mod users;
