//! Test data generation.
//!
//! Random users and credentials drawn from fixed pools. A seeded RNG makes
//! the output deterministic where a test needs it.

use rand::Rng;
use serde::Serialize;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Margaret", "Dennis", "Radia", "Ken",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Hamilton", "Ritchie",
    "Perlman", "Thompson",
];

const JOB_TITLES: &[&str] = &[
    "QA Engineer",
    "Site Reliability Engineer",
    "Backend Developer",
    "Release Manager",
    "Platform Architect",
    "Test Automation Lead",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "test.dev"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUser {
    pub name: String,
    pub job: String,
    pub email: String,
    pub phone: String,
}

pub fn generate_user() -> GeneratedUser {
    generate_user_with(&mut rand::thread_rng())
}

pub fn generate_user_with<R: Rng>(rng: &mut R) -> GeneratedUser {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let job = JOB_TITLES[rng.gen_range(0..JOB_TITLES.len())];
    let domain = EMAIL_DOMAINS[rng.gen_range(0..EMAIL_DOMAINS.len())];
    GeneratedUser {
        name: format!("{first} {last}"),
        job: job.to_string(),
        email: format!(
            "{}.{}@{domain}",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        ),
        phone: format!(
            "+1-{:03}-{:03}-{:04}",
            rng.gen_range(200..1000),
            rng.gen_range(200..1000),
            rng.gen_range(0..10_000)
        ),
    }
}

pub fn generate_users(count: usize) -> Vec<GeneratedUser> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| generate_user_with(&mut rng)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCredentials {
    pub email: String,
    pub password: String,
}

pub fn generate_credentials() -> GeneratedCredentials {
    generate_credentials_with(&mut rand::thread_rng())
}

pub fn generate_credentials_with<R: Rng>(rng: &mut R) -> GeneratedCredentials {
    let user = generate_user_with(rng);
    let password: String = (0..16)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
            CHARSET[rng.gen_range(0..CHARSET.len())] as char
        })
        .collect();
    GeneratedCredentials {
        email: user.email,
        password,
    }
}
