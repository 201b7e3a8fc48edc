//! Feed projection: profiles of the counterpart mode rendered as swipe cards.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::Principal;
use crate::models::profile::{DEFAULT_EMPLOYMENT_TYPE, NOT_SPECIFIED};
use crate::models::{Candidate, FeedItem, Job, Mode, Profile, ProfileDetails};
use crate::profiles::{PersistenceError, ProfileGateway};

pub const DEFAULT_LOGO_URL: &str =
    "https://images.unsplash.com/photo-1560179707-f14e90ef3623?w=100&h=100&fit=crop&q=80";
pub const DEFAULT_AVATAR_URL: &str = crate::auth::session::DEFAULT_AVATAR_URL;

/// Relative age of a record as shown on a job card.
pub fn time_ago(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return "Recently".to_string();
    };
    let seconds = (now - created_at).num_seconds().max(0);

    let (count, unit) = match seconds {
        s if s < 60 => return "Just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Projects a stored profile into the card its counterpart swipes on.
pub fn project(profile: Profile, now: DateTime<Utc>) -> FeedItem {
    let id = profile.id.unwrap_or_default();
    match profile.details {
        ProfileDetails::Employer(d) => FeedItem::Job(Job {
            id,
            title: profile.title,
            company: profile.name,
            logo: profile.image.unwrap_or_else(|| DEFAULT_LOGO_URL.to_string()),
            location: profile.location,
            salary: or_default(&d.salary, NOT_SPECIFIED),
            employment_type: or_default(&d.employment_type, DEFAULT_EMPLOYMENT_TYPE),
            description: or_default(&d.description, "No description available."),
            requirements: d.requirements,
            posted_at: time_ago(profile.created_at, now),
        }),
        ProfileDetails::Seeker(d) => FeedItem::Candidate(Candidate {
            id,
            name: profile.name,
            title: profile.title,
            experience: or_default(&d.experience, NOT_SPECIFIED),
            avatar: profile.image.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            bio: or_default(&d.bio, "No bio available."),
            skills: d.skills,
            location: profile.location,
            education: or_default(&d.education, NOT_SPECIFIED),
        }),
    }
}

/// Cards a user in `role` swipes through.
///
/// Demo sessions and unconfigured stores get the bundled seed deck. Otherwise
/// the counterpart's stored profiles are listed, newest first.
pub async fn load_deck(
    profiles: &ProfileGateway,
    principal: Option<&Principal>,
    role: Mode,
) -> Result<Vec<FeedItem>, PersistenceError> {
    let demo = principal.is_some_and(Principal::is_demo);
    if demo || !profiles.is_configured() {
        debug!("Serving seed deck for {role}");
        return Ok(seed_deck(role));
    }

    let now = Utc::now();
    let items: Vec<FeedItem> = profiles
        .list(principal, role.counterpart())
        .await?
        .into_iter()
        .map(|p| project(p, now))
        .collect();
    info!("Loaded {} {} cards for {role}", items.len(), role.counterpart());
    Ok(items)
}

#[allow(clippy::too_many_arguments)]
fn job(
    id: &str,
    title: &str,
    company: &str,
    logo: &str,
    location: &str,
    salary: &str,
    employment_type: &str,
    description: &str,
    requirements: &[&str],
    posted_at: &str,
) -> FeedItem {
    FeedItem::Job(Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        logo: logo.to_string(),
        location: location.to_string(),
        salary: salary.to_string(),
        employment_type: employment_type.to_string(),
        description: description.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
        posted_at: posted_at.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
fn candidate(
    id: &str,
    name: &str,
    title: &str,
    experience: &str,
    avatar: &str,
    bio: &str,
    skills: &[&str],
    location: &str,
    education: &str,
) -> FeedItem {
    FeedItem::Candidate(Candidate {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        experience: experience.to_string(),
        avatar: avatar.to_string(),
        bio: bio.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        location: location.to_string(),
        education: education.to_string(),
    })
}

/// Bundled cards: jobs for seekers, candidates for employers.
pub fn seed_deck(role: Mode) -> Vec<FeedItem> {
    match role {
        Mode::Seeker => vec![
            job(
                "1",
                "Senior Frontend Engineer",
                "TechFlow",
                "https://images.unsplash.com/photo-1549923746-c502d488b3ea?w=100&h=100&fit=crop&q=80",
                "San Francisco, CA (Hybrid)",
                "$140k - $180k",
                "Full-time",
                "We are looking for an experienced Frontend Engineer to lead our core product team. You will be working with React, TypeScript, and Tailwind CSS.",
                &["5+ years React", "TypeScript", "System Design"],
                "2 days ago",
            ),
            job(
                "2",
                "Product Designer",
                "Creative Studio",
                "https://images.unsplash.com/photo-1572044162444-ad6021194360?w=100&h=100&fit=crop&q=80",
                "Remote",
                "$110k - $150k",
                "Contract",
                "Join our award-winning design team. We value creativity, pixel-perfection, and user-centric design approaches.",
                &["Figma", "Prototyping", "Design Systems"],
                "1 day ago",
            ),
            job(
                "3",
                "Backend Developer",
                "DataCorp",
                "https://images.unsplash.com/photo-1560179707-f14e90ef3623?w=100&h=100&fit=crop&q=80",
                "New York, NY",
                "$150k - $190k",
                "Full-time",
                "Scale our distributed systems to handle millions of requests. Experience with Go and Kubernetes is a must.",
                &["Go", "Kubernetes", "PostgreSQL"],
                "3 days ago",
            ),
            job(
                "4",
                "Marketing Manager",
                "Growth.io",
                "https://images.unsplash.com/photo-1599305445671-ac291c95dd0f?w=100&h=100&fit=crop&q=80",
                "Austin, TX",
                "$90k - $120k",
                "Full-time",
                "Lead our growth initiatives and marketing campaigns. You will work closely with the sales team to drive revenue.",
                &["B2B Marketing", "SEO/SEM", "Analytics"],
                "Just now",
            ),
        ],
        Mode::Employer => vec![
            candidate(
                "1",
                "Sarah Chen",
                "Senior Product Designer",
                "6 years",
                "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?w=400&h=400&fit=crop&q=80",
                "Passionate about creating intuitive and beautiful user experiences. I specialize in complex design systems and accessibility.",
                &["Figma", "React", "UI/UX", "Prototyping"],
                "San Francisco, CA",
                "BFA Design, RISD",
            ),
            candidate(
                "2",
                "Marcus Johnson",
                "Full Stack Engineer",
                "4 years",
                "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=400&h=400&fit=crop&q=80",
                "Full stack developer with a focus on scalable backend systems and clean frontend code. Love solving hard problems.",
                &["Node.js", "React", "PostgreSQL", "AWS"],
                "Remote / NY",
                "BS CS, MIT",
            ),
            candidate(
                "3",
                "Emily Davis",
                "Marketing Specialist",
                "3 years",
                "https://images.unsplash.com/photo-1580489944761-15a19d654956?w=400&h=400&fit=crop&q=80",
                "Data-driven marketer with a creative edge. I help brands find their voice and grow their audience through strategic campaigns.",
                &["Content Strategy", "Social Media", "Google Analytics"],
                "Chicago, IL",
                "BA Marketing, UT Austin",
            ),
            candidate(
                "4",
                "David Kim",
                "DevOps Engineer",
                "7 years",
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=400&fit=crop&q=80",
                "Infrastructure as code enthusiast. I build robust CI/CD pipelines and manage cloud infrastructure for high-traffic apps.",
                &["Docker", "Kubernetes", "Terraform", "Python"],
                "Seattle, WA",
                "MS CS, UW",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::fakes::authenticated;
    use crate::auth::SessionContext;
    use crate::models::profile::fixtures::{employer_profile, seeker_profile};
    use crate::profiles::gateway::fakes::MemoryStore;
    use crate::profiles::store::ProfileStore;
    use chrono::Duration;
    use std::sync::Arc;

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(None, now), "Recently");
        assert_eq!(time_ago(Some(now - Duration::seconds(59)), now), "Just now");
        assert_eq!(time_ago(Some(now - Duration::seconds(60)), now), "1 minute ago");
        assert_eq!(time_ago(Some(now - Duration::minutes(59)), now), "59 minutes ago");
        assert_eq!(time_ago(Some(now - Duration::hours(1)), now), "1 hour ago");
        assert_eq!(time_ago(Some(now - Duration::hours(23)), now), "23 hours ago");
        assert_eq!(time_ago(Some(now - Duration::days(1)), now), "1 day ago");
        assert_eq!(time_ago(Some(now - Duration::days(12)), now), "12 days ago");
    }

    #[test]
    fn test_future_timestamp_reads_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(Some(now + Duration::minutes(5)), now), "Just now");
    }

    #[test]
    fn test_employer_profile_projects_to_job_with_defaults() {
        let mut profile = employer_profile();
        profile.id = Some("p-1".to_string());
        profile.image = None;
        if let ProfileDetails::Employer(d) = &mut profile.details {
            d.description.clear();
            d.salary = "  ".to_string();
        }

        match project(profile, Utc::now()) {
            FeedItem::Job(job) => {
                assert_eq!(job.id, "p-1");
                assert_eq!(job.company, "Acme Corp");
                assert_eq!(job.title, "Senior Engineer");
                assert_eq!(job.logo, DEFAULT_LOGO_URL);
                assert_eq!(job.salary, NOT_SPECIFIED);
                assert_eq!(job.description, "No description available.");
                assert_eq!(job.employment_type, "Contract");
                assert_eq!(job.posted_at, "Recently");
            }
            other => panic!("expected a job card, got {other:?}"),
        }
    }

    #[test]
    fn test_seeker_profile_projects_to_candidate() {
        let mut profile = seeker_profile();
        profile.image = None;
        if let ProfileDetails::Seeker(d) = &mut profile.details {
            d.bio.clear();
        }

        match project(profile, Utc::now()) {
            FeedItem::Candidate(c) => {
                assert_eq!(c.name, "Jane Doe");
                assert_eq!(c.avatar, DEFAULT_AVATAR_URL);
                assert_eq!(c.bio, "No bio available.");
                assert_eq!(c.skills, vec!["React", "Typescript"]);
            }
            other => panic!("expected a candidate card, got {other:?}"),
        }
    }

    #[test]
    fn test_seed_deck_serves_counterpart_cards() {
        let jobs = seed_deck(Mode::Seeker);
        assert_eq!(jobs.len(), 4);
        assert!(jobs.iter().all(|item| matches!(item, FeedItem::Job(_))));

        let candidates = seed_deck(Mode::Employer);
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].headline(), "Sarah Chen");
    }

    #[tokio::test]
    async fn test_load_deck_unconfigured_uses_seed() {
        let gateway = ProfileGateway::new(None);
        let deck = load_deck(&gateway, None, Mode::Seeker).await.unwrap();
        assert_eq!(deck, seed_deck(Mode::Seeker));
    }

    #[tokio::test]
    async fn test_load_deck_demo_never_calls_store() {
        let store = Arc::new(MemoryStore::default());
        let gateway = ProfileGateway::new(Some(store.clone() as Arc<dyn ProfileStore>));
        let mut ctx = SessionContext::new();
        let principal = ctx.sign_in_demo().clone();

        let deck = load_deck(&gateway, Some(&principal), Mode::Employer).await.unwrap();

        assert_eq!(deck, seed_deck(Mode::Employer));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_load_deck_lists_counterpart_profiles() {
        let mut job_row = employer_profile().into_row();
        job_row.id = Some("job-1".to_string());
        let mut seeker_row = seeker_profile().into_row();
        seeker_row.id = Some("seeker-1".to_string());
        let store = Arc::new(MemoryStore::with_rows(vec![job_row, seeker_row]));
        let gateway = ProfileGateway::new(Some(store as Arc<dyn ProfileStore>));
        let principal = authenticated("user-1");

        let deck = load_deck(&gateway, Some(&principal), Mode::Seeker).await.unwrap();

        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].id(), "job-1");
        assert!(matches!(deck[0], FeedItem::Job(_)));
    }

    #[tokio::test]
    async fn test_load_deck_propagates_store_failure() {
        let store = Arc::new(MemoryStore::failing(500));
        let gateway = ProfileGateway::new(Some(store as Arc<dyn ProfileStore>));
        assert!(load_deck(&gateway, None, Mode::Seeker).await.is_err());
    }
}
