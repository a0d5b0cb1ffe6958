use crate::models::Category;

/// Endpoints published by the upstream under `/sfw/...`.
pub const SFW_ENDPOINTS: &[&str] = &[
    "waifu", "neko", "shinobu", "megumin", "bully", "cuddle", "cry", "hug", "awoo", "kiss",
    "lick", "pat", "smug", "bonk", "yeet", "blush", "smile", "wave", "highfive", "handhold",
    "nom", "bite", "glomp", "slap", "kill", "kick", "happy", "wink", "poke", "dance", "cringe",
];

/// Endpoints published by the upstream under `/nsfw/...`.
pub const NSFW_ENDPOINTS: &[&str] = &["waifu", "neko", "trap", "blowjob"];

impl Category {
    pub fn endpoints(&self) -> &'static [&'static str] {
        match self {
            Category::Sfw => SFW_ENDPOINTS,
            Category::Nsfw => NSFW_ENDPOINTS,
        }
    }

    // Exact match, callers lowercase path segments beforehand
    pub fn contains(&self, endpoint: &str) -> bool {
        self.endpoints().contains(&endpoint)
    }
}

/// Check a raw category name and endpoint against the catalog.
/// An unknown category is simply not a match.
pub fn is_valid_endpoint(category: &str, endpoint: &str) -> bool {
    Category::parse(category).is_some_and(|category| category.contains(endpoint))
}
