use serde::{Deserialize, Serialize};

/// Display projection of an employer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub logo: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub posted_at: String,
}

/// Display projection of a seeker profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub title: String,
    pub experience: String,
    pub avatar: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub location: String,
    pub education: String,
}

/// A swipeable card. Seekers see jobs, employers see candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Job(Job),
    Candidate(Candidate),
}

impl FeedItem {
    pub fn id(&self) -> &str {
        match self {
            FeedItem::Job(job) => &job.id,
            FeedItem::Candidate(candidate) => &candidate.id,
        }
    }

    /// Headline shown in list views: the job title or the candidate's name.
    pub fn headline(&self) -> &str {
        match self {
            FeedItem::Job(job) => &job.title,
            FeedItem::Candidate(candidate) => &candidate.name,
        }
    }
}
