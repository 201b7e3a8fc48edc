pub mod feed;
pub mod profile;

pub use feed::{Candidate, FeedItem, Job};
pub use profile::{EmployerDetails, Mode, Profile, ProfileDetails, ProfileRow, SeekerDetails};
